//! Code-signature stripping convenience built on the container API.

use crate::error::Result;
use crate::macho::MachFile;

/// Parses `data`, removes the first code-signature command of the selected
/// slice if present, and rebuilds.
///
/// Returns the rebuilt bytes and whether a signature command was removed.
/// When none was present the rebuild is still performed, reproducing the
/// input's structure unchanged.
pub fn strip_signature(data: &[u8]) -> Result<(Vec<u8>, bool)> {
    let mut file = MachFile::parse(data)?;
    let removed = file.strip_code_signature()?;
    let output = file.build()?;
    Ok((output, removed))
}
