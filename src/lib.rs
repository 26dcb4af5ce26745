//! machedit - Parse, edit, and rebuild Mach-O binaries.
//!
//! This library decodes Mach-O executable containers (thin binaries in all
//! four width/endianness variants, plus fat multi-architecture wrappers),
//! exposes their structure — header, load commands, segments, sections,
//! code-signature presence — and re-serializes a structurally valid binary
//! after edits. The rebuild recomputes every absolute file offset that goes
//! stale when the load-command region grows or shrinks, so inserted or
//! removed commands never leave the output internally inconsistent.
//!
//! # Features
//!
//! - Strict bounds validation across 32/64-bit and both endiannesses
//! - UUID insertion and replacement
//! - Segment injection with deterministic placement
//! - Code-signature stripping and placeholder insertion
//! - Fat slice selection and alignment-correct fat re-layout
//!
//! # Example
//!
//! ```no_run
//! use machedit::MachFile;
//!
//! fn main() -> machedit::Result<()> {
//!     let data = std::fs::read("/usr/lib/libfoo.dylib")?;
//!
//!     let mut file = MachFile::parse(&data)?;
//!     file.set_uuid("00112233-4455-6677-8899-aabbccddeeff")?;
//!     file.strip_code_signature()?;
//!
//!     std::fs::write("libfoo.patched.dylib", file.build()?)?;
//!     Ok(())
//! }
//! ```
//!
//! All operations are pure computations over in-memory buffers; reading and
//! writing files is the caller's responsibility. Each [`MachFile`] owns its
//! buffers exclusively, so distinct instances may be used from parallel
//! threads without coordination.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buf;
pub mod error;
pub mod macho;
pub mod strip;

// Re-export main types
pub use error::{Error, Result};
pub use macho::{CommandVariant, FatInfo, FatSlice, LoadCommand, MachFile, MachHeader, Section, Segment};
pub use strip::strip_signature;
