//! Launch and invocation settings, re-exported from `tc-domain`.
//!
//! The canonical definitions live in `tc_domain::config` so that the CLI
//! config loader can deserialize them without depending on this crate.

pub use tc_domain::config::{InvokeConfig, ServerLaunchConfig, StderrMode};
