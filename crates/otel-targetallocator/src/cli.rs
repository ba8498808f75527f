//! Commands of the `otel-targetallocator` binary.
//!
//! ```rust
//! use clap::Parser;
//! use otel_targetallocator::cli::Command;
//!
//! let command = Command::parse_from([
//!     "otel-targetallocator",
//!     "generate",
//!     "--target-allocator",
//!     "targetallocator.yaml",
//! ]);
//! assert!(matches!(command, Command::Generate(_)));
//! ```
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use clap::{Args, Parser};
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};
use tracing::info;

use crate::{
    adapter::{self, target_allocator_from_collector},
    config::{TARGET_ALLOCATOR_FILENAME, synthesize::{self, synthesize_target_allocator_config}},
    crd::{CustomResourceExt, OpenTelemetryCollector, TargetAllocator, schema},
    yaml::{self, SerializeOptions},
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read resource from {path:?}"))]
    ReadResource {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse resource from {path:?}"))]
    ParseResource {
        source: serde_yaml::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to print CRD"))]
    PrintCrd { source: schema::Error },

    #[snafu(display("failed to synthesize the target allocator configuration"))]
    Synthesize { source: synthesize::Error },

    #[snafu(display("failed to convert the collector into a target allocator"))]
    Convert { source: adapter::Error },

    #[snafu(display("failed to serialize the target allocator"))]
    SerializeTargetAllocator { source: yaml::Error },

    #[snafu(display("failed to write the target allocator configuration to {path:?}"))]
    WriteToFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to write to stdout"))]
    WriteToStdout { source: std::io::Error },
}

#[derive(Debug, PartialEq, Eq, Parser)]
#[command(name = "otel-targetallocator", author, version, about)]
pub enum Command {
    /// Print CRD objects.
    Crd,

    /// Generate the configuration file of a target allocator.
    Generate(GenerateArguments),

    /// Convert the target allocator embedded into an OpenTelemetryCollector
    /// into a standalone TargetAllocator resource.
    Convert(ConvertArguments),
}

impl Command {
    /// Runs the command, writing anything that is not a file to `stdout`.
    pub fn run<W: Write>(&self, stdout: W) -> Result<()> {
        match self {
            Self::Crd => print_crds(stdout),
            Self::Generate(arguments) => arguments.run(stdout),
            Self::Convert(arguments) => arguments.run(stdout),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Args)]
pub struct GenerateArguments {
    /// Path to a TargetAllocator resource (YAML).
    #[arg(long, value_name = "FILE", env)]
    pub target_allocator: PathBuf,

    /// Path to the OpenTelemetryCollector resource (YAML) whose scrape jobs
    /// are allocated.
    #[arg(long, value_name = "FILE", env)]
    pub collector: Option<PathBuf>,

    /// Directory the configuration file is written to. Printed to stdout if
    /// not set.
    #[arg(long, value_name = "DIR", env)]
    pub output: Option<PathBuf>,
}

impl GenerateArguments {
    pub fn run<W: Write>(&self, mut stdout: W) -> Result<()> {
        let target_allocator: TargetAllocator = read_resource(&self.target_allocator)?;
        let collector: Option<OpenTelemetryCollector> = self
            .collector
            .as_deref()
            .map(read_resource)
            .transpose()?;

        let config = synthesize_target_allocator_config(&target_allocator.spec, collector.as_ref())
            .context(SynthesizeSnafu)?;

        match &self.output {
            Some(directory) => {
                let path = directory.join(TARGET_ALLOCATOR_FILENAME);
                fs::write(&path, config).context(WriteToFileSnafu { path: &path })?;
                info!(path = %path.display(), "wrote target allocator configuration");
                Ok(())
            }
            None => stdout
                .write_all(config.as_bytes())
                .context(WriteToStdoutSnafu),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Args)]
pub struct ConvertArguments {
    /// Path to an OpenTelemetryCollector resource (YAML).
    #[arg(long, value_name = "FILE", env)]
    pub collector: PathBuf,
}

impl ConvertArguments {
    pub fn run<W: Write>(&self, stdout: W) -> Result<()> {
        let collector: OpenTelemetryCollector = read_resource(&self.collector)?;

        match target_allocator_from_collector(&collector).context(ConvertSnafu)? {
            Some(target_allocator) => {
                yaml::serialize(&target_allocator, stdout, SerializeOptions::document())
                    .context(SerializeTargetAllocatorSnafu)
            }
            None => {
                info!(
                    collector = ?self.collector,
                    "target allocator is disabled, nothing to convert"
                );
                Ok(())
            }
        }
    }
}

fn print_crds<W: Write>(mut stdout: W) -> Result<()> {
    TargetAllocator::write_yaml_schema(&mut stdout).context(PrintCrdSnafu)?;
    OpenTelemetryCollector::write_yaml_schema(&mut stdout).context(PrintCrdSnafu)
}

fn read_resource<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).context(ReadResourceSnafu { path })?;
    serde_yaml::from_str(&contents).context(ParseResourceSnafu { path })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use indoc::indoc;

    use super::*;

    const TARGET_ALLOCATOR: &str = indoc! {"
        apiVersion: opentelemetry.io/v1alpha2
        kind: TargetAllocator
        metadata:
          name: my-instance
          namespace: default
        spec:
          allocationStrategy: least-weighted
    "};

    const COLLECTOR: &str = indoc! {"
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
                  scrape_configs:
                  - job_name: otel-collector
          targetAllocator:
            enabled: true
    "};

    #[test]
    fn verify_cli() {
        Command::command().debug_assert();
    }

    #[test]
    fn parse_generate() {
        let command = Command::try_parse_from([
            "otel-targetallocator",
            "generate",
            "--target-allocator",
            "ta.yaml",
            "--collector",
            "collector.yaml",
        ])
        .unwrap();

        assert_eq!(
            command,
            Command::Generate(GenerateArguments {
                target_allocator: "ta.yaml".into(),
                collector: Some("collector.yaml".into()),
                output: None,
            })
        );
    }

    #[test]
    fn generate_to_stdout() {
        let directory = tempfile::tempdir().unwrap();
        let target_allocator = directory.path().join("ta.yaml");
        let collector = directory.path().join("collector.yaml");
        fs::write(&target_allocator, TARGET_ALLOCATOR).unwrap();
        fs::write(&collector, COLLECTOR).unwrap();

        let mut stdout = Vec::new();
        GenerateArguments {
            target_allocator,
            collector: Some(collector),
            output: None,
        }
        .run(&mut stdout)
        .unwrap();

        let stdout = String::from_utf8(stdout).unwrap();
        assert!(stdout.starts_with("allocation_strategy: least-weighted\n"));
        assert!(stdout.contains("- job_name: otel-collector\n"));
    }

    #[test]
    fn generate_to_directory() {
        let directory = tempfile::tempdir().unwrap();
        let target_allocator = directory.path().join("ta.yaml");
        fs::write(&target_allocator, TARGET_ALLOCATOR).unwrap();

        let mut stdout = Vec::new();
        GenerateArguments {
            target_allocator,
            collector: None,
            output: Some(directory.path().to_owned()),
        }
        .run(&mut stdout)
        .unwrap();

        assert!(stdout.is_empty());
        let written =
            fs::read_to_string(directory.path().join(TARGET_ALLOCATOR_FILENAME)).unwrap();
        assert_eq!(
            written,
            indoc! {"
                allocation_strategy: least-weighted
                filter_strategy: relabel-config
            "}
        );
    }

    #[test]
    fn generate_missing_file() {
        let err = GenerateArguments {
            target_allocator: "/does/not/exist.yaml".into(),
            collector: None,
            output: None,
        }
        .run(Vec::new())
        .unwrap_err();

        assert!(matches!(err, Error::ReadResource { .. }));
    }

    #[test]
    fn convert() {
        let directory = tempfile::tempdir().unwrap();
        let collector = directory.path().join("collector.yaml");
        fs::write(&collector, COLLECTOR).unwrap();

        let mut stdout = Vec::new();
        ConvertArguments { collector }.run(&mut stdout).unwrap();

        let stdout = String::from_utf8(stdout).unwrap();
        assert!(!stdout.contains("null"), "unset fields must be omitted: {stdout}");
        let target_allocator: TargetAllocator = serde_yaml::from_str(&stdout).unwrap();
        assert_eq!(target_allocator.metadata.name.as_deref(), Some("my-instance"));
        assert_eq!(target_allocator.spec.scrape_configs.len(), 1);
        assert_eq!(
            target_allocator.spec.scrape_configs[0]["job_name"],
            "otel-collector"
        );
    }

    #[test]
    fn print_both_crds() {
        let mut stdout = Vec::new();
        Command::Crd.run(&mut stdout).unwrap();

        let stdout = String::from_utf8(stdout).unwrap();
        assert_eq!(stdout.matches("---\n").count(), 2);
        assert!(stdout.contains("kind: TargetAllocator\n"));
        assert!(stdout.contains("kind: OpenTelemetryCollector\n"));
    }
}
