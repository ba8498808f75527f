use schemars::{Schema, SchemaGenerator, json_schema};

/// Schema of a list of free-form objects whose contents are not validated by
/// the Kubernetes API server.
pub fn raw_object_list_schema(_: &mut SchemaGenerator) -> Schema {
    json_schema!({
        "type": "array",
        "items": {
            "type": "object",
            "x-kubernetes-preserve-unknown-fields": true,
        }
    })
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::crd::AnyConfig;

    #[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Test {
        #[schemars(schema_with = "raw_object_list_schema")]
        pub scrape_configs: Vec<AnyConfig>,
    }

    #[test]
    fn nested_scrape_configs_are_preserved() {
        let input = r#"
          scrapeConfigs:
            - job_name: otel-collector
              static_configs:
                - targets: ["0.0.0.0:8888"]
        "#;

        let test: Test = serde_yaml::from_str(input).expect("Failed to parse scrape configs");
        assert_eq!(test.scrape_configs.len(), 1);
        assert_eq!(
            test.scrape_configs[0]["static_configs"][0]["targets"][0],
            "0.0.0.0:8888"
        );
    }

    #[test]
    fn schema_preserves_unknown_fields() {
        let schema = schemars::schema_for!(Test);
        let items = schema
            .pointer("/properties/scrapeConfigs/items/x-kubernetes-preserve-unknown-fields")
            .expect("schema must contain the scrape config items");
        assert_eq!(items, &serde_json::Value::Bool(true));
    }
}
