//! Slice rebuild engine.
//!
//! Re-serializes one slice from its structured state: header, then the
//! current load-command table, then the original trailing payload bytes.
//! When the command region grows or shrinks, every absolute file offset
//! that pointed into the payload region goes stale; the single correction
//! applied here is the delta between the old and new payload start.

use crate::buf::{ByteReader, ByteWriter, Endian};
use crate::error::Result;

use super::commands::LoadCommand;
use super::constants::{align_commands, LC_CODE_SIGNATURE, LC_SEGMENT, LC_SEGMENT_64};
use super::header::MachHeader;

/// Rebuilds a slice from `header`, the current `commands`, and the slice
/// buffer it was parsed from.
///
/// `header.sizeofcmds` must still hold the parse-time value; it locates
/// where payload data began in `slice`. The output is a fresh buffer;
/// `slice` is not modified.
pub fn build_slice(header: &MachHeader, commands: &[LoadCommand], slice: &[u8]) -> Result<Vec<u8>> {
    let endian = header.endian();
    let header_size = header.size();

    let new_sizeofcmds = align_commands(commands.iter().map(|c| c.cmdsize as usize).sum());
    let old_data_start = align_commands(header_size + header.sizeofcmds as usize);
    let new_data_start = align_commands(header_size + new_sizeofcmds);
    let delta = new_data_start as i64 - old_data_start as i64;

    let tail_len = slice.len().saturating_sub(old_data_start);
    let mut writer = ByteWriter::new(new_data_start + tail_len, endian);

    header.encode(&mut writer, commands.len() as u32, new_sizeofcmds as u32)?;

    let mut offset = header_size;
    for lc in commands {
        let data = patch_command(lc, endian, delta, old_data_start as u64)?;
        writer.write_bytes(offset, &data)?;
        offset += lc.cmdsize as usize;
    }

    if tail_len > 0 {
        writer.write_bytes(new_data_start, &slice[old_data_start..])?;
    }

    Ok(writer.into_vec())
}

/// Returns the command bytes to emit, correcting embedded payload offsets.
///
/// Only offsets that point at or past the old payload start are shifted; a
/// zero or header-relative offset never moves. Commands of any other kind
/// are passed through untouched.
fn patch_command(
    lc: &LoadCommand,
    endian: Endian,
    delta: i64,
    old_data_start: u64,
) -> Result<Vec<u8>> {
    if delta == 0 {
        return Ok(lc.data.clone());
    }

    match lc.cmd {
        LC_SEGMENT_64 if lc.data.len() >= 48 => {
            let fileoff = ByteReader::new(&lc.data, endian).u64(40)?;
            if fileoff >= old_data_start {
                let mut w = ByteWriter::from_vec(lc.data.clone(), endian);
                w.set_u64(40, (fileoff as i64 + delta) as u64)?;
                return Ok(w.into_vec());
            }
        }
        LC_SEGMENT if lc.data.len() >= 36 => {
            let fileoff = ByteReader::new(&lc.data, endian).u32(32)?;
            if fileoff as u64 >= old_data_start {
                let mut w = ByteWriter::from_vec(lc.data.clone(), endian);
                w.set_u32(32, (fileoff as i64 + delta) as u32)?;
                return Ok(w.into_vec());
            }
        }
        LC_CODE_SIGNATURE if lc.data.len() >= 12 => {
            let dataoff = ByteReader::new(&lc.data, endian).u32(8)?;
            if dataoff as u64 >= old_data_start {
                let mut w = ByteWriter::from_vec(lc.data.clone(), endian);
                w.set_u32(8, (dataoff as i64 + delta) as u32)?;
                return Ok(w.into_vec());
            }
        }
        _ => {}
    }

    Ok(lc.data.clone())
}
