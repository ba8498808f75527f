use serde_yaml::{Sequence, Value};
use snafu::{OptionExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Location of the scrape jobs inside a collector configuration.
pub const SCRAPE_CONFIGS_PATH: [&str; 4] = ["receivers", "prometheus", "config", "scrape_configs"];

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("no scrape_configs available as part of the configuration"))]
    ScrapeConfigsNotFound,
}

/// Walks `document` along `path`, one mapping key at a time, and returns the
/// sequence found at the end.
///
/// Fails if any key is missing, if a value on the way is not a mapping, or if
/// the final value is not a sequence. An empty sequence is a valid result.
pub fn find_sequence<'a>(document: &'a Value, path: &[&str]) -> Result<&'a Sequence> {
    path.iter()
        .try_fold(document, |current, key| match current {
            Value::Mapping(mapping) => mapping.get(*key),
            _ => None,
        })
        .and_then(Value::as_sequence)
        .context(ScrapeConfigsNotFoundSnafu)
}
