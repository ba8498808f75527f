use snafu::{ResultExt, Snafu};

use crate::{
    config::{
        escape::unescape_dollar_signs,
        navigator::{self, SCRAPE_CONFIGS_PATH, find_sequence},
        normalize::{self, normalize_entry},
    },
    crd::AnyConfig,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse collector configuration"))]
    ParseCollectorConfig { source: serde_yaml::Error },

    #[snafu(display("failed to resolve merge keys of collector configuration"))]
    MergeCollectorConfig { source: serde_yaml::Error },

    #[snafu(transparent)]
    Navigate { source: navigator::Error },

    #[snafu(display("failed to normalize scrape config at index {index}"))]
    NormalizeScrapeConfig {
        source: normalize::Error,
        index: usize,
    },
}

/// Extracts the Prometheus scrape jobs from the raw configuration of a
/// collector.
///
/// Escaped dollar signs (`$$`) are collapsed first, then the text is parsed
/// and merge keys (`<<: *defaults`) are resolved. The sequence at
/// `receivers.prometheus.config.scrape_configs` is returned with all mapping
/// keys converted to text. The order of the jobs is
/// kept as is. Any failure aborts the extraction, no partial list is returned.
pub fn scrape_configs_from_collector_config(collector_config: &str) -> Result<Vec<AnyConfig>> {
    let collector_config = unescape_dollar_signs(collector_config);
    let mut document: serde_yaml::Value =
        serde_yaml::from_str(&collector_config).context(ParseCollectorConfigSnafu)?;
    document.apply_merge().context(MergeCollectorConfigSnafu)?;

    find_sequence(&document, &SCRAPE_CONFIGS_PATH)?
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(entry).context(NormalizeScrapeConfigSnafu { index }))
        .collect()
}
