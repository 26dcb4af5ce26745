//! Segment and section views derived from the load-command table.
//!
//! Segments are a read-through view: they are recomputed from the command
//! table after every mutation, never maintained as independent state, so a
//! stale view cannot exist.

use std::fmt;

use crate::buf::{ByteReader, Endian};
use crate::error::{Error, Result};

use super::commands::{
    name_from_bytes, CommandVariant, LoadCommand, SEGMENT_COMMAND_64_SIZE, SEGMENT_COMMAND_SIZE,
};
use super::constants::{LC_SEGMENT, LC_SEGMENT_64};
use super::header::MachHeader;

/// Size of a 32-bit section record.
const SECTION_SIZE: usize = 68;

/// Size of a 64-bit section record.
const SECTION_64_SIZE: usize = 80;

/// One section within a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section name.
    pub name: String,
    /// Name of the owning segment as recorded in the section itself.
    pub segname: String,
    /// Virtual address.
    pub addr: u64,
    /// Size in bytes.
    pub size: u64,
    /// File offset of the section bytes.
    pub offset: u32,
}

/// One segment, with all address and size fields widened to 64 bits
/// regardless of the source command's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment name.
    pub name: String,
    /// Virtual address.
    pub vmaddr: u64,
    /// Virtual size.
    pub vmsize: u64,
    /// File offset of the mapped bytes.
    pub fileoff: u64,
    /// Mapped byte count.
    pub filesize: u64,
    /// Sections in file order.
    pub sections: Vec<Section>,
    /// Offset of the source command within its slice.
    pub command_offset: u32,
    /// Declared size of the source command.
    pub cmdsize: u32,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment {{ name: \"{}\", vm: {:#x}+{:#x}, file: {:#x}+{:#x}, sects: {} }}",
            self.name,
            self.vmaddr,
            self.vmsize,
            self.fileoff,
            self.filesize,
            self.sections.len()
        )
    }
}

/// Derives the segment list from the current command table.
///
/// Pure function of its inputs; callers re-run it after every command
/// mutation. A segment whose `nsects` implies section records past its own
/// declared size fails with [`Error::SectionOverflow`] rather than reading
/// into the neighboring commands.
pub fn parse_segments(header: &MachHeader, commands: &[LoadCommand]) -> Result<Vec<Segment>> {
    let endian = header.endian();
    let mut segments = Vec::new();

    for lc in commands {
        if lc.cmd != LC_SEGMENT && lc.cmd != LC_SEGMENT_64 {
            continue;
        }
        let segment = match lc.variant(endian)? {
            CommandVariant::Segment32 {
                name,
                vmaddr,
                vmsize,
                fileoff,
                filesize,
                nsects,
            } => Segment {
                name,
                vmaddr: vmaddr as u64,
                vmsize: vmsize as u64,
                fileoff: fileoff as u64,
                filesize: filesize as u64,
                sections: parse_sections(lc, endian, false, nsects)?,
                command_offset: lc.offset,
                cmdsize: lc.cmdsize,
            },
            CommandVariant::Segment64 {
                name,
                vmaddr,
                vmsize,
                fileoff,
                filesize,
                nsects,
            } => Segment {
                name,
                vmaddr,
                vmsize,
                fileoff,
                filesize,
                sections: parse_sections(lc, endian, true, nsects)?,
                command_offset: lc.offset,
                cmdsize: lc.cmdsize,
            },
            _ => continue,
        };
        segments.push(segment);
    }

    Ok(segments)
}

/// Reads `nsects` section records trailing a segment command's fixed part.
fn parse_sections(
    lc: &LoadCommand,
    endian: Endian,
    is_64: bool,
    nsects: u32,
) -> Result<Vec<Section>> {
    let (fixed, record) = if is_64 {
        (SEGMENT_COMMAND_64_SIZE, SECTION_64_SIZE)
    } else {
        (SEGMENT_COMMAND_SIZE, SECTION_SIZE)
    };

    let span = fixed as u64 + nsects as u64 * record as u64;
    if span > lc.cmdsize as u64 {
        return Err(Error::SectionOverflow {
            segment: name_from_bytes(&lc.data[8..24]),
            nsects,
            cmdsize: lc.cmdsize,
        });
    }

    let r = ByteReader::new(&lc.data, endian);
    let mut sections = Vec::with_capacity(nsects as usize);
    let mut off = fixed;
    for _ in 0..nsects {
        sections.push(Section {
            name: name_from_bytes(r.bytes(off, 16)?),
            segname: name_from_bytes(r.bytes(off + 16, 16)?),
            addr: if is_64 { r.u64(off + 32)? } else { r.u32(off + 32)? as u64 },
            size: if is_64 { r.u64(off + 40)? } else { r.u32(off + 36)? as u64 },
            offset: if is_64 { r.u32(off + 48)? } else { r.u32(off + 40)? },
        });
        off += record;
    }
    Ok(sections)
}
