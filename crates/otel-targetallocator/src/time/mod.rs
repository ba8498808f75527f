//! This module contains a common [`Duration`] struct which is able to parse
//! human-readable duration formats, like `5s`, `24h`, `2h20m42s` or `15d2m2s`.
//!
//! Durations show up in resource specs (for example the discovery scrape
//! interval) and have to survive a round trip through the synthesized
//! allocator configuration in exactly this textual form.

mod duration;

pub use duration::*;
