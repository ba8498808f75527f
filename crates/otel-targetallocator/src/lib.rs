//! Configuration of the OpenTelemetry target allocator.
//!
//! The target allocator distributes Prometheus scrape jobs among the
//! replicas of an OpenTelemetry collector. This crate derives the
//! configuration file it reads (see [`config`]) from the [`TargetAllocator`]
//! and [`OpenTelemetryCollector`] custom resources (see [`crd`]), and converts
//! the allocator embedded into older collector resources into a standalone
//! resource (see [`adapter`]).
//!
//! [`TargetAllocator`]: crd::TargetAllocator
//! [`OpenTelemetryCollector`]: crd::OpenTelemetryCollector

pub mod adapter;
pub mod cli;
pub mod config;
pub mod crd;
pub mod labels;
pub mod logging;
pub mod time;
pub mod utils;
pub mod yaml;

// External re-exports
pub use k8s_openapi;
pub use kube;
pub use schemars;
