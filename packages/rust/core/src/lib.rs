//! Build pipeline orchestration for pagesmith.
//!
//! Ties the content repository and the renderers together into the
//! end-to-end static site `build` workflow.

pub mod pipeline;

pub use pipeline::{BuildConfig, BuildResult, ProgressReporter, SilentProgress, build_site};
