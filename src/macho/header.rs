//! Mach-O header detection and encoding.
//!
//! The magic is read big-endian and classified against the four thin
//! magics; the swapped (CIGAM) forms signal that the remaining header
//! fields, and all structures after them, use little-endian encoding.
//! Fat detection is not done here; [`crate::macho::fat`] runs first.

use std::fmt;

use crate::buf::{ByteReader, ByteWriter, Endian};
use crate::error::{Error, Result};

use super::constants::*;

/// Decoded Mach-O header.
///
/// `ncmds` and `sizeofcmds` hold the values captured at parse time; the
/// rebuild engine supplies fresh counts when re-serializing, so these stay
/// stable while the command table is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachHeader {
    /// Magic as read big-endian from offset 0 (one of the four thin magics).
    pub magic: u32,
    /// True for the 64-bit header layout.
    pub is_64: bool,
    /// True when header fields and command records are little-endian.
    pub little_endian: bool,
    /// CPU type
    pub cputype: u32,
    /// CPU subtype
    pub cpusubtype: u32,
    /// File type (executable, dylib, ...)
    pub filetype: u32,
    /// Number of load commands at parse time
    pub ncmds: u32,
    /// Byte size of the load-command region at parse time
    pub sizeofcmds: u32,
    /// Header flags
    pub flags: u32,
}

impl MachHeader {
    /// Header size for the 32-bit layout.
    pub const SIZE_32: usize = 28;

    /// Header size for the 64-bit layout (includes a reserved word).
    pub const SIZE_64: usize = 32;

    /// Parses a thin Mach-O header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic = ByteReader::new(data, Endian::Big).u32(0)?;
        let (is_64, little_endian) = match magic {
            MH_MAGIC => (false, false),
            MH_MAGIC_64 => (true, false),
            MH_CIGAM => (false, true),
            MH_CIGAM_64 => (true, true),
            other => return Err(Error::BadMagic { magic: other }),
        };

        let endian = if little_endian {
            Endian::Little
        } else {
            Endian::Big
        };
        let r = ByteReader::new(data, endian);
        let header = Self {
            magic,
            is_64,
            little_endian,
            cputype: r.u32(4)?,
            cpusubtype: r.u32(8)?,
            filetype: r.u32(12)?,
            ncmds: r.u32(16)?,
            sizeofcmds: r.u32(20)?,
            flags: r.u32(24)?,
        };
        if data.len() < header.size() {
            return Err(Error::truncated(header.size(), data.len()));
        }
        Ok(header)
    }

    /// Byte size of this header on disk.
    #[inline]
    pub fn size(&self) -> usize {
        if self.is_64 {
            Self::SIZE_64
        } else {
            Self::SIZE_32
        }
    }

    /// Byte order of the header fields and command records.
    #[inline]
    pub fn endian(&self) -> Endian {
        if self.little_endian {
            Endian::Little
        } else {
            Endian::Big
        }
    }

    /// Encodes the header at the start of `writer`.
    ///
    /// All fields are written back verbatim except the command count and
    /// region size, which the caller supplies from the current (possibly
    /// mutated) table. The magic bytes are reproduced exactly as read; the
    /// 64-bit reserved word is written as zero.
    pub fn encode(&self, writer: &mut ByteWriter, ncmds: u32, sizeofcmds: u32) -> Result<()> {
        writer.write_bytes(0, &self.magic.to_be_bytes())?;
        writer.set_u32(4, self.cputype)?;
        writer.set_u32(8, self.cpusubtype)?;
        writer.set_u32(12, self.filetype)?;
        writer.set_u32(16, ncmds)?;
        writer.set_u32(20, sizeofcmds)?;
        writer.set_u32(24, self.flags)?;
        if self.is_64 {
            writer.set_u32(28, 0)?;
        }
        Ok(())
    }
}

impl fmt::Display for MachHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MachO {{ arch: {}, type: {}, {}-bit {}, cmds: {}, flags: {:#x} }}",
            arch_name(self.cputype),
            file_type_name(self.filetype),
            if self.is_64 { 64 } else { 32 },
            if self.little_endian { "LE" } else { "BE" },
            self.ncmds,
            self.flags
        )
    }
}
