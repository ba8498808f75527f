//! Conversion of the allocator embedded into an [`OpenTelemetryCollector`]
//! (older schema) into a standalone [`TargetAllocator`] resource.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;
use snafu::Snafu;
use tracing::{debug, instrument};

use crate::{
    config::scrape::{self, scrape_configs_from_collector_config},
    crd::{
        OpenTelemetryCollector, TargetAllocator, TargetAllocatorSpec, collector,
        target_allocator::{AllocationStrategy, FilterStrategy, PrometheusCrSpec},
    },
    labels::{COMPONENT_OPENTELEMETRY_COLLECTOR, selector_labels},
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(transparent)]
    ExtractScrapeConfigs { source: scrape::Error },
}

/// Builds the [`TargetAllocator`] described by the allocator section of
/// `collector`. Returns [`None`] if the embedded allocator is disabled.
///
/// Scheduling and runtime fields are copied as they are, the scrape jobs are
/// extracted from the raw collector configuration. Only extraction can fail.
#[instrument(skip_all, fields(collector = %collector.name_any()))]
pub fn target_allocator_from_collector(
    collector: &OpenTelemetryCollector,
) -> Result<Option<TargetAllocator>> {
    let embedded = &collector.spec.target_allocator;
    if !embedded.enabled {
        debug!("target allocator is disabled, nothing to convert");
        return Ok(None);
    }

    let scrape_configs = scrape_configs_from_collector_config(&collector.spec.config)?;
    debug!(
        scrape_configs = scrape_configs.len(),
        "converted embedded target allocator"
    );

    let mut common = embedded.common.clone();
    common.pod_annotations = collector.spec.pod_annotations.clone();

    Ok(Some(TargetAllocator {
        metadata: ObjectMeta {
            name: collector.metadata.name.clone(),
            namespace: collector.metadata.namespace.clone(),
            annotations: collector.metadata.annotations.clone(),
            labels: collector.metadata.labels.clone(),
            ..ObjectMeta::default()
        },
        spec: TargetAllocatorSpec {
            common,
            collector_selector: LabelSelector {
                match_labels: Some(selector_labels(
                    &collector.metadata,
                    COMPONENT_OPENTELEMETRY_COLLECTOR,
                )),
                match_expressions: None,
            },
            allocation_strategy: embedded.allocation_strategy.map(Into::into),
            filter_strategy: embedded.filter_strategy.into(),
            scrape_configs,
            prometheus_cr: (&embedded.prometheus_cr).into(),
        },
    }))
}

impl From<collector::AllocationStrategy> for AllocationStrategy {
    fn from(strategy: collector::AllocationStrategy) -> Self {
        match strategy {
            collector::AllocationStrategy::ConsistentHashing => Self::ConsistentHashing,
            collector::AllocationStrategy::LeastWeighted => Self::LeastWeighted,
            collector::AllocationStrategy::PerNode => Self::PerNode,
        }
    }
}

impl From<collector::FilterStrategy> for FilterStrategy {
    fn from(strategy: collector::FilterStrategy) -> Self {
        match strategy {
            collector::FilterStrategy::RelabelConfig => Self::RelabelConfig,
            collector::FilterStrategy::None => Self::None,
        }
    }
}

impl From<&collector::PrometheusCr> for PrometheusCrSpec {
    fn from(prometheus_cr: &collector::PrometheusCr) -> Self {
        Self {
            enabled: prometheus_cr.enabled,
            scrape_interval: prometheus_cr.scrape_interval,
            service_monitor_selector: match_labels_selector(
                prometheus_cr.service_monitor_selector.as_ref(),
            ),
            pod_monitor_selector: match_labels_selector(
                prometheus_cr.pod_monitor_selector.as_ref(),
            ),
        }
    }
}

/// A missing label map stays missing, it does not become an empty (match
/// everything) selector.
fn match_labels_selector(labels: Option<&BTreeMap<String, String>>) -> Option<LabelSelector> {
    labels.map(|labels| LabelSelector {
        match_labels: Some(labels.clone()),
        match_expressions: None,
    })
}
