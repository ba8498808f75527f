use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    crd::{AnyConfig, CommonFields},
    time::Duration,
    utils::crds::raw_object_list_schema,
};

/// Desired state of a target allocator, which distributes Prometheus scrape
/// jobs among the replicas of a collector.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "opentelemetry.io",
    version = "v1alpha2",
    kind = "TargetAllocator",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct TargetAllocatorSpec {
    #[serde(flatten)]
    pub common: CommonFields,

    /// Selects the collector pods the scrape jobs are allocated to.
    #[serde(default)]
    pub collector_selector: LabelSelector,

    /// How scrape jobs are distributed among the collectors. Defaults to
    /// `consistent-hashing` when not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_strategy: Option<AllocationStrategy>,

    /// How targets are filtered before they are distributed.
    #[serde(default)]
    pub filter_strategy: FilterStrategy,

    /// Scrape jobs handed to the allocator in addition to the ones taken
    /// from the collector configuration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(schema_with = "raw_object_list_schema")]
    pub scrape_configs: Vec<AnyConfig>,

    /// Discovery of additional scrape jobs through `ServiceMonitor` and
    /// `PodMonitor` objects.
    #[serde(default, rename = "prometheusCR")]
    pub prometheus_cr: PrometheusCrSpec,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    JsonSchema,
    PartialEq,
    Serialize,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AllocationStrategy {
    #[default]
    ConsistentHashing,
    LeastWeighted,
    PerNode,
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Eq,
    JsonSchema,
    PartialEq,
    Serialize,
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
)]
pub enum FilterStrategy {
    /// Drops targets based on the relabel configs of their scrape job.
    #[default]
    #[serde(rename = "relabel-config")]
    #[strum(serialize = "relabel-config")]
    RelabelConfig,

    /// No filtering. Rendered as an empty string.
    #[serde(rename = "")]
    #[strum(serialize = "")]
    None,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrometheusCrSpec {
    /// Enables discovery of `ServiceMonitor` and `PodMonitor` objects.
    #[serde(default)]
    pub enabled: bool,

    /// Default interval between consecutive scrapes of discovered jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_interval: Option<Duration>,

    /// Selects the `ServiceMonitor`s to watch. `None` selects nothing
    /// specific and is passed on as such.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_monitor_selector: Option<LabelSelector>,

    /// Selects the `PodMonitor`s to watch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_monitor_selector: Option<LabelSelector>,
}
