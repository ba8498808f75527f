use std::io::Write;

use snafu::{ResultExt, Snafu};

use crate::yaml::{self, SerializeOptions};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to write CRD YAML schema"))]
    WriteSchema { source: yaml::Error },

    #[snafu(display("failed to generate CRD YAML schema"))]
    GenerateSchema { source: yaml::Error },
}

/// Provides YAML output of the `CustomResourceDefinition` of a custom resource.
///
/// Every schema is written as an explicit document (leading `---`), so the
/// output of multiple resources can be concatenated into a single stream.
pub trait CustomResourceExt: kube::CustomResourceExt {
    /// Writes the YAML schema to `writer`.
    fn write_yaml_schema<W: Write>(writer: W) -> Result<()> {
        yaml::serialize(&Self::crd(), writer, SerializeOptions::document())
            .context(WriteSchemaSnafu)
    }

    /// Prints the YAML schema to [stdout](std::io::stdout).
    fn print_yaml_schema() -> Result<()> {
        Self::write_yaml_schema(std::io::stdout().lock())
    }

    /// Generates the YAML schema and returns it as a [`String`].
    fn yaml_schema() -> Result<String> {
        yaml::to_string(&Self::crd(), SerializeOptions::document()).context(GenerateSchemaSnafu)
    }
}

impl<T> CustomResourceExt for T where T: kube::CustomResourceExt {}
