//! Well-known Kubernetes labels used to group and select the pods managed by
//! the operator.
//!
//! See <https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/>
//! for more information on the recommended labels.

use std::collections::BTreeMap;

use const_format::concatcp;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// The well-known Kubernetes app key prefix.
const K8S_APP_KEY_PREFIX: &str = "app.kubernetes.io/";

/// The well-known Kubernetes app instance key `app.kubernetes.io/instance`. It
/// is used to identify the instance of an application, e.g. `default.my-instance`.
pub const K8S_APP_INSTANCE_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "instance");

/// The well-known Kubernetes app component key `app.kubernetes.io/component`.
/// It is used to specify the component within the architecture, e.g.
/// `opentelemetry-collector`.
pub const K8S_APP_COMPONENT_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "component");

/// The well-known Kubernetes app part-of key `app.kubernetes.io/part-of`.
pub const K8S_APP_PART_OF_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "part-of");

/// The well-known Kubernetes app managed-by key `app.kubernetes.io/managed-by`.
pub const K8S_APP_MANAGED_BY_KEY: &str = concatcp!(K8S_APP_KEY_PREFIX, "managed-by");

pub const MANAGED_BY_VALUE: &str = "opentelemetry-operator";
pub const PART_OF_VALUE: &str = "opentelemetry";

/// Component name of the collector pods.
pub const COMPONENT_OPENTELEMETRY_COLLECTOR: &str = "opentelemetry-collector";

/// Label values must not exceed this number of characters.
const MAX_LABEL_VALUE_LENGTH: usize = 63;

/// Returns the set of labels required to select the pods of the object
/// described by `meta` with the given `component`:
///
/// - `app.kubernetes.io/managed-by`
/// - `app.kubernetes.io/instance`
/// - `app.kubernetes.io/part-of`
/// - `app.kubernetes.io/component`
pub fn selector_labels(meta: &ObjectMeta, component: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (K8S_APP_MANAGED_BY_KEY.to_owned(), MANAGED_BY_VALUE.to_owned()),
        (K8S_APP_INSTANCE_KEY.to_owned(), instance_value(meta)),
        (K8S_APP_PART_OF_KEY.to_owned(), PART_OF_VALUE.to_owned()),
        (K8S_APP_COMPONENT_KEY.to_owned(), component.to_owned()),
    ])
}

/// Formats the `<namespace>.<name>` instance label value.
fn instance_value(meta: &ObjectMeta) -> String {
    let namespace = meta.namespace.as_deref().unwrap_or_default();
    let name = meta.name.as_deref().unwrap_or_default();
    truncate_label_value(&format!("{namespace}.{name}"))
}

/// Cuts `value` down to the maximum label value length. A truncated value
/// must still end with an alphanumeric character.
fn truncate_label_value(value: &str) -> String {
    if value.len() <= MAX_LABEL_VALUE_LENGTH {
        return value.to_owned();
    }

    let mut end = MAX_LABEL_VALUE_LENGTH;
    while !value.is_char_boundary(end) {
        end -= 1;
    }

    value[..end]
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_owned()
}
