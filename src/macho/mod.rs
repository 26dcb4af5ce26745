//! Mach-O container format handling.
//!
//! This module provides the format layers for parsing and rebuilding
//! Mach-O files: header detection, the load-command table, the derived
//! segment view, the fat (multi-architecture) wrapper, the slice rebuild
//! engine, and the [`MachFile`] façade that ties them together.

mod builder;
mod commands;
mod constants;
mod container;
mod fat;
mod header;
mod segments;

pub use builder::*;
pub use commands::*;
pub use constants::*;
pub use container::*;
pub use fat::*;
pub use header::*;
pub use segments::*;
