//! Utility functions for processing data in the YAML file format
use std::io::Write;

use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Represents every error which can be encountered during YAML serialization.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize YAML"))]
    SerializeYaml { source: serde_yaml::Error },

    #[snafu(display("failed to write YAML document separator"))]
    WriteDocumentSeparator { source: std::io::Error },

    #[snafu(display("failed to parse bytes as valid UTF-8 string"))]
    ParseUtf8Bytes { source: std::string::FromUtf8Error },
}

/// Provides configurable options during YAML serialization.
///
/// The default implementation [`SerializeOptions::default()`] produces plain
/// YAML text as it is persisted for the target allocator: no leading document
/// marker and enums rendered the way serde renders them.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerializeOptions {
    /// Adds leading triple dashes (`---`) to the output string.
    pub explicit_document: bool,

    /// Serialize enum variants as YAML maps using the variant name as the key.
    pub singleton_map: bool,
}

impl SerializeOptions {
    /// Options used when printing Kubernetes objects, where multiple documents
    /// may end up in the same stream.
    pub fn document() -> Self {
        Self {
            explicit_document: true,
            singleton_map: true,
        }
    }
}

/// Serializes the given data structure and writes it to a [`Writer`](Write).
pub fn serialize<T, W>(value: &T, mut writer: W, options: SerializeOptions) -> Result<()>
where
    T: serde::Serialize,
    W: Write,
{
    if options.explicit_document {
        writer
            .write_all(b"---\n")
            .context(WriteDocumentSeparatorSnafu)?;
    }

    let mut serializer = serde_yaml::Serializer::new(writer);

    if options.singleton_map {
        serde_yaml::with::singleton_map_recursive::serialize(value, &mut serializer)
            .context(SerializeYamlSnafu)?;
    } else {
        value
            .serialize(&mut serializer)
            .context(SerializeYamlSnafu)?;
    }

    Ok(())
}

/// Serializes the given data structure into a [`String`].
pub fn to_string<T>(value: &T, options: SerializeOptions) -> Result<String>
where
    T: serde::Serialize,
{
    let mut buffer = Vec::new();
    serialize(value, &mut buffer, options)?;
    String::from_utf8(buffer).context(ParseUtf8BytesSnafu)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    enum Connection {
        Inline(String),
    }

    #[derive(Serialize)]
    struct Spec {
        connection: Connection,
    }

    #[test]
    fn explicit_document_with_singleton_map() {
        let value = Spec {
            connection: Connection::Inline("http://localhost".into()),
        };

        let actual = to_string(&value, SerializeOptions::document()).unwrap();
        assert_eq!(actual, "---\nconnection:\n  inline: http://localhost\n");
    }

    #[test]
    fn plain_document() {
        let value = std::collections::BTreeMap::from([("b", 1), ("a", 2)]);

        let actual = to_string(&value, SerializeOptions::default()).unwrap();
        assert_eq!(actual, "a: 2\nb: 1\n");
    }
}
