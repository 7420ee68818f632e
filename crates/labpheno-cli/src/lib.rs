//! CLI library components for labpheno.

#![allow(missing_docs)]

pub mod cli;
pub mod logging;
pub mod summary;
