use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use tracing::{debug, instrument};

use crate::{
    config::scrape::{self, scrape_configs_from_collector_config},
    crd::{
        AnyConfig, OpenTelemetryCollector, TargetAllocatorSpec,
        target_allocator::{AllocationStrategy, FilterStrategy, PrometheusCrSpec},
    },
    labels::{COMPONENT_OPENTELEMETRY_COLLECTOR, selector_labels},
    time::Duration,
    yaml::{self, SerializeOptions},
};

/// Name under which the rendered configuration is persisted, e.g. as the
/// key of a `ConfigMap`.
pub const TARGET_ALLOCATOR_FILENAME: &str = "targetallocator.yaml";

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(transparent)]
    ExtractScrapeConfigs { source: scrape::Error },

    #[snafu(display("failed to serialize target allocator configuration"))]
    SerializeConfig { source: yaml::Error },
}

/// The configuration file read by the target allocator.
///
/// Fields are declared in lexicographic order, which is the order they are
/// rendered in. Optional sections are left out entirely when unset.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TargetAllocatorConfig {
    pub allocation_strategy: AllocationStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_selector: Option<SelectorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PrometheusConfig>,

    pub filter_strategy: FilterStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus_cr: Option<PrometheusCrConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PrometheusConfig {
    pub scrape_configs: Vec<AnyConfig>,
}

/// Discovery settings. Unset monitor selectors are rendered as `null`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PrometheusCrConfig {
    pub enabled: bool,

    pub pod_monitor_selector: Option<SelectorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<Duration>,

    pub service_monitor_selector: Option<SelectorConfig>,
}

/// A label selector as understood by the target allocator. Both criteria are
/// always rendered, even when empty.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub matchlabels: BTreeMap<String, String>,

    #[serde(default)]
    pub matchexpressions: Vec<LabelSelectorRequirement>,
}

impl From<&LabelSelector> for SelectorConfig {
    fn from(selector: &LabelSelector) -> Self {
        Self {
            matchlabels: selector.match_labels.clone().unwrap_or_default(),
            matchexpressions: selector.match_expressions.clone().unwrap_or_default(),
        }
    }
}

impl From<BTreeMap<String, String>> for SelectorConfig {
    fn from(matchlabels: BTreeMap<String, String>) -> Self {
        Self {
            matchlabels,
            matchexpressions: Vec::new(),
        }
    }
}

impl TargetAllocatorConfig {
    /// Renders the configuration as YAML text.
    pub fn to_yaml(&self) -> Result<String> {
        yaml::to_string(self, SerializeOptions::default()).context(SerializeConfigSnafu)
    }
}

/// Builds and renders the target allocator configuration, see
/// [`build_target_allocator_config`].
pub fn synthesize_target_allocator_config(
    spec: &TargetAllocatorSpec,
    collector: Option<&OpenTelemetryCollector>,
) -> Result<String> {
    build_target_allocator_config(spec, collector)?.to_yaml()
}

/// Combines the allocator `spec` and the (optional) `collector` into the
/// configuration of the target allocator.
///
/// The scrape jobs of the spec come first, followed by the jobs extracted
/// from the collector configuration. When both are empty, the `config`
/// section is omitted. Any extraction error fails the whole build.
#[instrument(skip_all, fields(collector = ?collector.map(ResourceExt::name_any)))]
pub fn build_target_allocator_config(
    spec: &TargetAllocatorSpec,
    collector: Option<&OpenTelemetryCollector>,
) -> Result<TargetAllocatorConfig> {
    let collector_selector = collector.map(|collector| {
        SelectorConfig::from(selector_labels(
            &collector.metadata,
            COMPONENT_OPENTELEMETRY_COLLECTOR,
        ))
    });

    let mut scrape_configs = spec.scrape_configs.clone();
    if let Some(collector) = collector {
        scrape_configs.extend(scrape_configs_from_collector_config(
            &collector.spec.config,
        )?);
    }

    debug!(
        spec_scrape_configs = spec.scrape_configs.len(),
        total_scrape_configs = scrape_configs.len(),
        prometheus_cr = spec.prometheus_cr.enabled,
        "built target allocator configuration"
    );

    Ok(TargetAllocatorConfig {
        allocation_strategy: spec.allocation_strategy.unwrap_or_default(),
        collector_selector,
        config: (!scrape_configs.is_empty()).then_some(PrometheusConfig { scrape_configs }),
        filter_strategy: spec.filter_strategy,
        prometheus_cr: prometheus_cr_config(&spec.prometheus_cr),
    })
}

fn prometheus_cr_config(prometheus_cr: &PrometheusCrSpec) -> Option<PrometheusCrConfig> {
    if !prometheus_cr.enabled {
        return None;
    }

    Some(PrometheusCrConfig {
        enabled: true,
        pod_monitor_selector: prometheus_cr.pod_monitor_selector.as_ref().map(Into::into),
        scrape_interval: prometheus_cr
            .scrape_interval
            .filter(|interval| !interval.is_zero()),
        service_monitor_selector: prometheus_cr
            .service_monitor_selector
            .as_ref()
            .map(Into::into),
    })
}
