//! Mach-O constants and flags.

use bitflags::bitflags;

// =============================================================================
// Magic Numbers
// =============================================================================

/// 32-bit Mach-O magic.
pub const MH_MAGIC: u32 = 0xFEEDFACE;

/// 32-bit Mach-O magic, byte-swapped (content is opposite-endian).
pub const MH_CIGAM: u32 = 0xCEFAEDFE;

/// 64-bit Mach-O magic.
pub const MH_MAGIC_64: u32 = 0xFEEDFACF;

/// 64-bit Mach-O magic, byte-swapped (content is opposite-endian).
pub const MH_CIGAM_64: u32 = 0xCFFAEDFE;

/// Fat (multi-architecture) magic. The outer fat structure is always
/// big-endian on disk.
pub const FAT_MAGIC: u32 = 0xCAFEBABE;

/// Byte-swapped fat magic. Signals opposite-endian *slice content* only;
/// the outer structure is still read big-endian and is never written in
/// swapped form.
pub const FAT_CIGAM: u32 = 0xBEBAFECA;

// =============================================================================
// File Types
// =============================================================================

/// Relocatable object file
pub const MH_OBJECT: u32 = 0x1;
/// Executable
pub const MH_EXECUTE: u32 = 0x2;
/// Dynamically bound shared library
pub const MH_DYLIB: u32 = 0x6;
/// Dynamic link editor
pub const MH_DYLINKER: u32 = 0x7;
/// Bundle
pub const MH_BUNDLE: u32 = 0x8;
/// Debug symbols file
pub const MH_DSYM: u32 = 0xA;

/// Returns a printable name for a header file type.
pub fn file_type_name(filetype: u32) -> &'static str {
    match filetype {
        MH_OBJECT => "object",
        MH_EXECUTE => "executable",
        MH_DYLIB => "dylib",
        MH_DYLINKER => "dylinker",
        MH_BUNDLE => "bundle",
        MH_DSYM => "dsym",
        _ => "unknown",
    }
}

// =============================================================================
// CPU Types
// =============================================================================

/// 64-bit architecture flag
pub const CPU_ARCH_ABI64: u32 = 0x0100_0000;

/// ARM CPU type
pub const CPU_TYPE_ARM: u32 = 12;
/// ARM64 CPU type
pub const CPU_TYPE_ARM64: u32 = CPU_TYPE_ARM | CPU_ARCH_ABI64;
/// x86 CPU type
pub const CPU_TYPE_X86: u32 = 7;
/// x86_64 CPU type
pub const CPU_TYPE_X86_64: u32 = CPU_TYPE_X86 | CPU_ARCH_ABI64;

/// Returns a printable architecture name for a CPU type.
pub fn arch_name(cputype: u32) -> &'static str {
    match cputype {
        CPU_TYPE_ARM64 => "arm64",
        CPU_TYPE_X86_64 => "x86_64",
        CPU_TYPE_ARM => "arm",
        CPU_TYPE_X86 => "i386",
        _ => "unknown",
    }
}

// =============================================================================
// Load Commands
// =============================================================================

/// Load command requiring dynamic linker
pub const LC_REQ_DYLD: u32 = 0x8000_0000;

/// Segment of this file
pub const LC_SEGMENT: u32 = 0x1;
/// Link-edit symbol table info
pub const LC_SYMTAB: u32 = 0x2;
/// Dynamic link-edit symbol table info
pub const LC_DYSYMTAB: u32 = 0xB;
/// Load a dynamically linked shared library
pub const LC_LOAD_DYLIB: u32 = 0xC;
/// Dynamically linked shared lib identification
pub const LC_ID_DYLIB: u32 = 0xD;
/// 64-bit segment
pub const LC_SEGMENT_64: u32 = 0x19;
/// Build identifier
pub const LC_UUID: u32 = 0x1B;
/// Runpath additions
pub const LC_RPATH: u32 = 0x1C | LC_REQ_DYLD;
/// Location of the code signature
pub const LC_CODE_SIGNATURE: u32 = 0x1D;
/// Load and re-export dylib
pub const LC_REEXPORT_DYLIB: u32 = 0x1F | LC_REQ_DYLD;
/// Compressed dyld info only
pub const LC_DYLD_INFO_ONLY: u32 = 0x22 | LC_REQ_DYLD;
/// Local of function starts
pub const LC_FUNCTION_STARTS: u32 = 0x26;
/// Main entry point
pub const LC_MAIN: u32 = 0x28 | LC_REQ_DYLD;
/// 64-bit encrypted segment information
pub const LC_ENCRYPTION_INFO_64: u32 = 0x2C;

/// Returns a printable name for a load command kind.
pub fn command_name(cmd: u32) -> &'static str {
    match cmd {
        LC_SEGMENT => "LC_SEGMENT",
        LC_SYMTAB => "LC_SYMTAB",
        LC_DYSYMTAB => "LC_DYSYMTAB",
        LC_LOAD_DYLIB => "LC_LOAD_DYLIB",
        LC_ID_DYLIB => "LC_ID_DYLIB",
        LC_SEGMENT_64 => "LC_SEGMENT_64",
        LC_UUID => "LC_UUID",
        LC_RPATH => "LC_RPATH",
        LC_CODE_SIGNATURE => "LC_CODE_SIGNATURE",
        LC_REEXPORT_DYLIB => "LC_REEXPORT_DYLIB",
        LC_DYLD_INFO_ONLY => "LC_DYLD_INFO_ONLY",
        LC_FUNCTION_STARTS => "LC_FUNCTION_STARTS",
        LC_MAIN => "LC_MAIN",
        LC_ENCRYPTION_INFO_64 => "LC_ENCRYPTION_INFO_64",
        _ => "LC_?",
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Page granularity used for injected segment virtual addresses.
pub const SEGMENT_PAGE_SIZE: u64 = 0x1000;

/// Fat slice alignment exponent used when a descriptor leaves it
/// unspecified (zero).
pub const DEFAULT_FAT_ALIGN: u32 = 12;

/// Largest accepted fat slice alignment exponent.
pub const MAX_FAT_ALIGN: u32 = 30;

/// Load-command region granularity; the region must end on this boundary.
pub const COMMAND_ALIGN: usize = 8;

/// Rounds `value` up to the next multiple of `alignment` (a power of two).
#[inline]
pub fn align_up(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) & !(alignment - 1)
}

/// Rounds a byte count up to the load-command region boundary.
#[inline]
pub fn align_commands(value: usize) -> usize {
    align_up(value as u64, COMMAND_ALIGN as u64) as usize
}

// =============================================================================
// Header Flags
// =============================================================================

bitflags! {
    /// Mach-O header flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MachFlags: u32 {
        /// The object file has no undefined references
        const NOUNDEFS = 0x1;
        /// The object file is input for the dynamic linker
        const DYLDLINK = 0x4;
        /// The file has its read-only and read-write segments split
        const SPLIT_SEGS = 0x20;
        /// The image is using two-level name space bindings
        const TWOLEVEL = 0x80;
        /// Safe to divide sections into sub-sections for dead code stripping
        const SUBSECTIONS_VIA_SYMBOLS = 0x2000;
        /// The final linked image contains external weak symbols
        const WEAK_DEFINES = 0x8000;
        /// The final linked image uses weak symbols
        const BINDS_TO_WEAK = 0x10000;
        /// The OS will load the main executable at a random address
        const PIE = 0x200000;
        /// Contains a section of thread local variables
        const HAS_TLV_DESCRIPTORS = 0x800000;
        /// The code was linked for use in an application extension
        const APP_EXTENSION_SAFE = 0x2000000;
        /// The dylib is part of the dyld shared cache
        const DYLIB_IN_CACHE = 0x80000000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_basics() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(100, 0x1000), 0x1000);
        assert_eq!(align_commands(76), 80);
    }

    #[test]
    fn names() {
        assert_eq!(command_name(LC_SEGMENT_64), "LC_SEGMENT_64");
        assert_eq!(command_name(0x77), "LC_?");
        assert_eq!(arch_name(CPU_TYPE_ARM64), "arm64");
        assert_eq!(file_type_name(MH_EXECUTE), "executable");
    }
}
