//! Custom resources consumed by the target allocator configuration:
//!
//! - [`TargetAllocator`], the declarative desired state of an allocator
//!   deployment (newer schema).
//! - [`OpenTelemetryCollector`], the collector (agent) resource which embeds
//!   an older-schema allocator spec and carries the raw collector
//!   configuration text.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    Affinity, EnvVar, PodSecurityContext, ResourceRequirements, SecurityContext, Toleration,
    TopologySpreadConstraint,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod collector;
pub mod schema;
pub mod target_allocator;

pub use collector::{OpenTelemetryCollector, OpenTelemetryCollectorSpec};
pub use schema::CustomResourceExt;
pub use target_allocator::{TargetAllocator, TargetAllocatorSpec};

/// A free-form configuration object with text keys, e.g. a single Prometheus
/// scrape job. Its contents are never interpreted, only relocated.
pub type AnyConfig = serde_json::Map<String, serde_json::Value>;

/// Scheduling and runtime fields shared by the allocator specs of both
/// schemas. They are copied one-to-one when converting between them.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonFields {
    /// Number of allocator replicas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Node labels the allocator pods must be scheduled on.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    /// Compute resources of the allocator container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    /// Name of the service account the allocator pods run as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_security_context: Option<PodSecurityContext>,

    /// Container image of the allocator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topology_spread_constraints: Vec<TopologySpreadConstraint>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,

    /// Additional environment variables of the allocator container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,

    /// Annotations added to the allocator pods.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pod_annotations: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        assert_eq!(serde_yaml::to_string(&CommonFields::default()).unwrap(), "{}\n");

        let spec = TargetAllocatorSpec {
            common: CommonFields {
                replicas: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let rendered = serde_yaml::to_string(&spec).unwrap();
        assert!(!rendered.contains("null"), "{rendered}");
        assert!(rendered.contains("replicas: 1\n"));
        assert!(!rendered.contains("resources"));
        assert!(!rendered.contains("scrapeInterval"));
    }
}
