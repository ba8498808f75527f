use std::{borrow::Cow, cmp::Ordering, fmt::Display, num::ParseIntError, ops::Deref, str::FromStr};

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use snafu::{OptionExt, ResultExt, Snafu};
use strum::IntoEnumIterator;

#[derive(Debug, Snafu, PartialEq)]
#[snafu(module)]
pub enum DurationParseError {
    #[snafu(display("invalid input, either empty or contains non-ascii characters"))]
    InvalidInput,

    #[snafu(display("unexpected character {chr:?}"))]
    UnexpectedCharacter { chr: char },

    #[snafu(display("fragment with value {value:?} has no unit"))]
    NoUnit { value: u64 },

    #[snafu(display("invalid fragment order, {current} must be before {previous}"))]
    InvalidUnitOrdering {
        previous: DurationUnit,
        current: DurationUnit,
    },

    #[snafu(display("fragment unit {unit} was specified multiple times"))]
    DuplicateUnit { unit: DurationUnit },

    #[snafu(display("failed to parse fragment unit {unit:?}"))]
    ParseUnit { unit: String },

    #[snafu(display("failed to parse fragment value as integer"))]
    ParseInt { source: ParseIntError },

    #[snafu(display("duration overflows the supported range"))]
    Overflow,
}

/// A duration with a human-readable text representation, e.g. `30s` or `1h10m`.
///
/// It derefs to [`std::time::Duration`], so all associated functions of the
/// std type (like [`std::time::Duration::is_zero`]) are available.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(std::time::Duration);

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use duration_parse_error::{
            DuplicateUnitSnafu, InvalidInputSnafu, InvalidUnitOrderingSnafu, NoUnitSnafu,
            OverflowSnafu, ParseIntSnafu, ParseUnitSnafu, UnexpectedCharacterSnafu,
        };

        let input = s.trim();

        // An empty or non-ascii input is invalid
        if input.is_empty() || !input.is_ascii() {
            return InvalidInputSnafu.fail();
        }

        let mut rest = input;
        let mut duration = std::time::Duration::ZERO;
        let mut last_unit = None;

        while !rest.is_empty() {
            let (value, tail) = split_group(rest, |c| c.is_ascii_digit());
            if value.is_empty() {
                return unexpected_character(tail);
            }
            let value = value.parse::<u64>().context(ParseIntSnafu)?;

            let (unit, tail) = split_group(tail, |c| c.is_ascii_alphabetic());
            if unit.is_empty() {
                return match tail.chars().next() {
                    Some(chr) => UnexpectedCharacterSnafu { chr }.fail(),
                    None => NoUnitSnafu { value }.fail(),
                };
            }
            let unit = unit
                .parse::<DurationUnit>()
                .ok()
                .context(ParseUnitSnafu { unit })?;

            // Units must be strictly decreasing, e.g. `1h10m` but not `10m1h`
            if let Some(last_unit) = last_unit {
                match unit.cmp(&last_unit) {
                    Ordering::Less => {
                        return InvalidUnitOrderingSnafu {
                            previous: last_unit,
                            current: unit,
                        }
                        .fail();
                    }
                    Ordering::Equal => return DuplicateUnitSnafu { unit }.fail(),
                    Ordering::Greater => (),
                }
            }

            let millis = value.checked_mul(unit.millis()).context(OverflowSnafu)?;
            duration = duration
                .checked_add(std::time::Duration::from_millis(millis))
                .context(OverflowSnafu)?;

            last_unit = Some(unit);
            rest = tail;
        }

        Ok(Self(duration))
    }
}

/// Splits `input` after the longest prefix whose characters all satisfy `f`.
fn split_group(input: &str, f: fn(char) -> bool) -> (&str, &str) {
    let end = input.find(|c: char| !f(c)).unwrap_or(input.len());
    input.split_at(end)
}

fn unexpected_character(rest: &str) -> Result<Duration, DurationParseError> {
    match rest.chars().next() {
        Some(chr) => duration_parse_error::UnexpectedCharacterSnafu { chr }.fail(),
        None => duration_parse_error::InvalidInputSnafu.fail(),
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_zero() {
            return write!(f, "0{}", DurationUnit::Seconds);
        }

        let mut millis = self.0.as_millis();

        for unit in DurationUnit::iter() {
            let unit_millis = u128::from(unit.millis());
            let whole = millis / unit_millis;

            if whole > 0 {
                write!(f, "{whole}{unit}")?;
            }

            millis %= unit_millis;
        }

        Ok(())
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Precision is limited to whole milliseconds, the smallest unit of the text
/// form. Anything below is dropped.
impl From<std::time::Duration> for Duration {
    fn from(value: std::time::Duration) -> Self {
        let sub_millis = value.subsec_nanos() % 1_000_000;
        Self(value.saturating_sub(std::time::Duration::from_nanos(u64::from(sub_millis))))
    }
}

impl JsonSchema for Duration {
    fn schema_name() -> Cow<'static, str> {
        "Duration".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
        })
    }
}

/// Serialized in the same text form that [`FromStr`] accepts.
impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

impl Duration {
    /// Creates a new [`Duration`] from the specified number of whole seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(std::time::Duration::from_secs(secs))
    }
}

/// Defines supported [`DurationUnit`]s. The order of variants **MATTERS**, it
/// is used both to reject badly ordered input and to render a
/// [`Duration`] back into its human-readable form.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum DurationUnit {
    #[strum(serialize = "d")]
    Days,

    #[strum(serialize = "h")]
    Hours,

    #[strum(serialize = "m")]
    Minutes,

    #[strum(serialize = "s")]
    Seconds,

    #[strum(serialize = "ms")]
    Milliseconds,
}

impl DurationUnit {
    /// Returns the number of whole milliseconds in each supported unit.
    fn millis(self) -> u64 {
        match self {
            Self::Days => 24 * Self::Hours.millis(),
            Self::Hours => 60 * Self::Minutes.millis(),
            Self::Minutes => 60 * Self::Seconds.millis(),
            Self::Seconds => 1000,
            Self::Milliseconds => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("15d2m2s1000ms", 1296123)]
    #[case("15d2m2s600ms", 1296122)]
    #[case("15d2m2s", 1296122)]
    #[case("70m", 4200)]
    #[case("1h", 3600)]
    #[case("30s", 30)]
    #[case("10s", 10)]
    fn parse_as_secs(#[case] input: &str, #[case] output: u64) {
        let dur: Duration = input.parse().unwrap();
        assert_eq!(dur.as_secs(), output);
    }

    #[rstest]
    #[case("1D", DurationParseError::ParseUnit { unit: "D".into() })]
    #[case("2d2", DurationParseError::NoUnit { value: 2 })]
    #[case("2d-", DurationParseError::UnexpectedCharacter { chr: '-' })]
    #[case("s", DurationParseError::UnexpectedCharacter { chr: 's' })]
    #[case("1ä", DurationParseError::InvalidInput)]
    #[case(" ", DurationParseError::InvalidInput)]
    #[case(
        "15d2h1d",
        DurationParseError::InvalidUnitOrdering {
            previous: DurationUnit::Hours,
            current: DurationUnit::Days,
        }
    )]
    #[case("15d2d", DurationParseError::DuplicateUnit { unit: DurationUnit::Days })]
    fn parse_invalid(#[case] input: &str, #[case] expected_err: DurationParseError) {
        let err = Duration::from_str(input).unwrap_err();
        assert_eq!(err, expected_err);
    }

    #[rstest]
    #[case("70m", "1h10m")]
    #[case("15d2m2s", "15d2m2s")]
    #[case("1h20m", "1h20m")]
    #[case("30s", "30s")]
    #[case("0s", "0s")]
    #[case("1500ms", "1s500ms")]
    fn to_string(#[case] input: &str, #[case] expected: &str) {
        let dur: Duration = input.parse().unwrap();
        assert_eq!(dur.to_string(), expected);
    }

    #[test]
    fn serde_round_trip() {
        #[derive(Deserialize, Serialize)]
        struct S {
            dur: Duration,
        }

        let s: S = serde_yaml::from_str("dur: 15d2m2s").unwrap();
        assert_eq!(s.dur.as_secs(), 1296122);
        assert_eq!(serde_yaml::to_string(&s).unwrap(), "dur: 15d2m2s\n");
    }

    #[test]
    fn deserialize_invalid() {
        let err = serde_yaml::from_str::<Duration>("1D").unwrap_err();
        assert!(
            err.to_string()
                .starts_with("failed to parse fragment unit \"D\"")
        );

        assert!(serde_yaml::from_str::<Duration>("30").is_err());
    }

    #[rstest]
    #[case(std::time::Duration::from_micros(500), "0s")]
    #[case(std::time::Duration::from_nanos(1), "0s")]
    #[case(std::time::Duration::from_micros(1500), "1ms")]
    #[case(std::time::Duration::new(90, 250_000_001), "1m30s250ms")]
    fn sub_millisecond_precision_is_dropped(
        #[case] input: std::time::Duration,
        #[case] expected: &str,
    ) {
        let dur = Duration::from(input);
        assert_eq!(dur.to_string(), expected);
        assert_eq!(dur, expected.parse().unwrap());
    }

    #[test]
    fn from_std() {
        let dur = Duration::from(std::time::Duration::from_secs(30));
        assert_eq!(dur, Duration::from_secs(30));
        assert!(Duration::default().is_zero());
    }
}
