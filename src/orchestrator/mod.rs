//! Application-level orchestration utilities.
//!
//! This module owns the run lifecycle (duplicate guard, tool invocation,
//! rename) and post-run processing. The CLI layer calls into this module to
//! keep responsibilities separated.

mod controller;
mod post_process;

pub(crate) use controller::run_batch;
