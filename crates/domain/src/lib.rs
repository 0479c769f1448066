//! `tc-domain` — configuration, errors and trace events shared by the
//! toolcall crates.

pub mod config;
pub mod error;
pub mod trace;

pub use error::{Error, Result};
