use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{crd::CommonFields, time::Duration};

/// An OpenTelemetry collector deployment. Only the parts relevant for the
/// target allocator are modeled here.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "opentelemetry.io",
    version = "v1alpha1",
    kind = "OpenTelemetryCollector",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryCollectorSpec {
    /// Raw collector configuration. Its scrape jobs live under
    /// `receivers.prometheus.config.scrape_configs`.
    #[serde(default)]
    pub config: String,

    /// Annotations added to the collector pods.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pod_annotations: BTreeMap<String, String>,

    /// Target allocator embedded into the collector resource.
    #[serde(default)]
    pub target_allocator: EmbeddedTargetAllocator,
}

/// The older allocator schema, as embedded into [`OpenTelemetryCollectorSpec`].
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedTargetAllocator {
    /// Whether a target allocator is deployed next to the collector.
    #[serde(default)]
    pub enabled: bool,

    #[serde(flatten)]
    pub common: CommonFields,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_strategy: Option<AllocationStrategy>,

    #[serde(default)]
    pub filter_strategy: FilterStrategy,

    #[serde(default, rename = "prometheusCR")]
    pub prometheus_cr: PrometheusCr,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationStrategy {
    #[default]
    ConsistentHashing,
    LeastWeighted,
    PerNode,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
pub enum FilterStrategy {
    #[default]
    #[serde(rename = "relabel-config")]
    RelabelConfig,

    #[serde(rename = "")]
    None,
}

/// Discovery settings of the older schema. The monitor selectors are plain
/// label maps rather than full label selectors.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusCr {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_monitor_selector: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_monitor_selector: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn deserialize_collector() {
        let collector: OpenTelemetryCollector = serde_yaml::from_str(indoc! {r#"
            apiVersion: opentelemetry.io/v1alpha1
            kind: OpenTelemetryCollector
            metadata:
              name: my-instance
              namespace: default
            spec:
              config: |
                receivers:
                  prometheus:
                    config:
                      scrape_configs: []
              targetAllocator:
                enabled: true
                replicas: 1
                allocationStrategy: least-weighted
                prometheusCR:
                  enabled: true
                  serviceMonitorSelector:
                    release: my-instance
        "#})
        .expect("test YAML is valid");

        let ta = &collector.spec.target_allocator;
        assert!(ta.enabled);
        assert_eq!(ta.common.replicas, Some(1));
        assert_eq!(ta.allocation_strategy, Some(AllocationStrategy::LeastWeighted));
        assert_eq!(ta.filter_strategy, FilterStrategy::RelabelConfig);
        assert_eq!(
            ta.prometheus_cr.service_monitor_selector,
            Some(BTreeMap::from([(
                "release".to_owned(),
                "my-instance".to_owned()
            )]))
        );
        assert_eq!(ta.prometheus_cr.pod_monitor_selector, None);
        assert!(collector.spec.config.contains("scrape_configs: []"));
    }
}
