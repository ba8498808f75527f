//! Derivation of the target allocator configuration file.
//!
//! The pipeline is split into small steps, from the leaves up:
//!
//! 1. [`escape`] collapses `$$` escapes of the collector configuration text.
//! 2. [`navigator`] walks a parsed document to the list of scrape jobs.
//! 3. [`normalize`] turns each job into a text-keyed [`AnyConfig`](crate::crd::AnyConfig).
//! 4. [`scrape`] composes the three steps above.
//! 5. [`synthesize`] merges the scrape jobs with the allocator spec and
//!    renders the final document.

pub mod escape;
pub mod navigator;
pub mod normalize;
pub mod scrape;
pub mod synthesize;

pub use scrape::scrape_configs_from_collector_config;
pub use synthesize::{
    TARGET_ALLOCATOR_FILENAME, TargetAllocatorConfig, build_target_allocator_config,
    synthesize_target_allocator_config,
};
