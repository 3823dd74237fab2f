#![forbid(unsafe_code)]

//! Scenario harness for flicker trace assertions.
//!
//! # Role
//! Turns recorded window/layer traces into pass/fail suite reports. The
//! assertion engine lives in `flicker-assert`; this crate supplies what a
//! test run needs around it.
//!
//! # Primary responsibilities
//! - **Capture**: read recorded traces ([`capture`]) and synthesize
//!   fixtures ([`fixtures`]).
//! - **Configuration**: orientation × navigation run matrices and
//!   environment settings ([`config`]).
//! - **Suites**: named, classified cases of scoped assertions ([`suite`]),
//!   including the open-trampoline scenario ([`trampoline`]).
//! - **Reporting**: JSON/text reports with trace checksums ([`report`]).
//! - **CLI**: the `flicker-harness` binary ([`cli`]).
//! - **Bouncer callbacks**: on-dismiss and cancel handles for lock-screen
//!   transitions ([`bouncer`]), independent of the assertion path.

pub mod bouncer;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod trampoline;

pub use bouncer::BouncerCallbackActions;
pub use cli::run_from_env;
pub use error::{HarnessError, Result};
