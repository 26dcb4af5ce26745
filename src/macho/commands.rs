//! Load-command table parsing and manipulation.
//!
//! Commands are kept as raw byte records so that unrecognized kinds survive
//! a rebuild byte-for-byte; [`CommandVariant`] offers a typed view of the
//! kinds this crate acts on.

use memchr::memchr;

use crate::buf::{ByteReader, Endian};
use crate::error::{Error, Result};

use super::constants::*;
use super::header::MachHeader;

/// Fixed size of the 32-bit segment command, without section records.
pub const SEGMENT_COMMAND_SIZE: usize = 56;

/// Fixed size of the 64-bit segment command, without section records.
pub const SEGMENT_COMMAND_64_SIZE: usize = 72;

/// Size of a UUID command.
pub const UUID_COMMAND_SIZE: usize = 24;

/// Size of a linkedit-data command (code signature and friends).
pub const LINKEDIT_DATA_COMMAND_SIZE: usize = 16;

/// One load command, carried as its full raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadCommand {
    /// Command kind.
    pub cmd: u32,
    /// Declared total size, including the 8-byte prefix.
    pub cmdsize: u32,
    /// Offset of this command within the slice it was parsed from; zero for
    /// commands synthesized by a mutation.
    pub offset: u32,
    /// The full command bytes (prefix included), `cmdsize` long.
    pub data: Vec<u8>,
}

/// Typed view of a load command.
///
/// Only the kinds this crate interprets are decoded; everything else is
/// [`CommandVariant::Opaque`] and is reproduced verbatim on rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandVariant {
    /// 32-bit segment mapping.
    Segment32 {
        /// Segment name.
        name: String,
        /// Virtual address.
        vmaddr: u32,
        /// Virtual size.
        vmsize: u32,
        /// File offset of the mapped bytes.
        fileoff: u32,
        /// Mapped byte count.
        filesize: u32,
        /// Number of trailing section records.
        nsects: u32,
    },
    /// 64-bit segment mapping.
    Segment64 {
        /// Segment name.
        name: String,
        /// Virtual address.
        vmaddr: u64,
        /// Virtual size.
        vmsize: u64,
        /// File offset of the mapped bytes.
        fileoff: u64,
        /// Mapped byte count.
        filesize: u64,
        /// Number of trailing section records.
        nsects: u32,
    },
    /// 16-byte build identifier.
    Uuid([u8; 16]),
    /// Code-signature descriptor location.
    CodeSignature {
        /// File offset of the signature blob.
        dataoff: u32,
        /// Size of the signature blob.
        datasize: u32,
    },
    /// Any kind this crate does not interpret.
    Opaque,
}

impl LoadCommand {
    /// Decodes the typed view of this command.
    pub fn variant(&self, endian: Endian) -> Result<CommandVariant> {
        let r = ByteReader::new(&self.data, endian);
        match self.cmd {
            LC_SEGMENT => Ok(CommandVariant::Segment32 {
                name: name_from_bytes(r.bytes(8, 16)?),
                vmaddr: r.u32(24)?,
                vmsize: r.u32(28)?,
                fileoff: r.u32(32)?,
                filesize: r.u32(36)?,
                nsects: r.u32(48)?,
            }),
            LC_SEGMENT_64 => Ok(CommandVariant::Segment64 {
                name: name_from_bytes(r.bytes(8, 16)?),
                vmaddr: r.u64(24)?,
                vmsize: r.u64(32)?,
                fileoff: r.u64(40)?,
                filesize: r.u64(48)?,
                nsects: r.u32(64)?,
            }),
            LC_UUID => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(r.bytes(8, 16)?);
                Ok(CommandVariant::Uuid(uuid))
            }
            LC_CODE_SIGNATURE => Ok(CommandVariant::CodeSignature {
                dataoff: r.u32(8)?,
                datasize: r.u32(12)?,
            }),
            _ => Ok(CommandVariant::Opaque),
        }
    }
}

/// Parses the load-command table declared by `header`.
///
/// Decoding is strictly sequential: each command begins exactly where the
/// previous one ended. Every span is checked against the declared region
/// and the buffer before the table is returned.
pub fn parse_commands(data: &[u8], header: &MachHeader) -> Result<Vec<LoadCommand>> {
    let region_end = header.size() + header.sizeofcmds as usize;
    if region_end > data.len() {
        return Err(Error::truncated(region_end, data.len()));
    }

    let r = ByteReader::new(data, header.endian());
    let mut commands = Vec::with_capacity(header.ncmds as usize);
    let mut offset = header.size();

    for index in 0..header.ncmds as usize {
        if offset + 8 > region_end {
            return Err(Error::CommandOverflow { index, offset });
        }
        let cmd = r.u32(offset)?;
        let cmdsize = r.u32(offset + 4)?;
        if cmdsize < 8 {
            return Err(Error::InvalidCommandSize {
                index,
                size: cmdsize,
            });
        }
        let end = offset + cmdsize as usize;
        if end > region_end || end > data.len() {
            return Err(Error::CommandOverflow { index, offset });
        }
        commands.push(LoadCommand {
            cmd,
            cmdsize,
            offset: offset as u32,
            data: data[offset..end].to_vec(),
        });
        offset = end;
    }

    Ok(commands)
}

/// Returns the first command of the given kind, if any.
pub fn find_command(commands: &[LoadCommand], cmd: u32) -> Option<&LoadCommand> {
    commands.iter().find(|c| c.cmd == cmd)
}

/// Removes the first command of the given kind. At most one entry is
/// removed per call; returns whether one was.
pub fn remove_command(commands: &mut Vec<LoadCommand>, cmd: u32) -> bool {
    match commands.iter().position(|c| c.cmd == cmd) {
        Some(index) => {
            commands.remove(index);
            true
        }
        None => false,
    }
}

/// Replaces the first command of `command.cmd`'s kind in place, or appends
/// `command` if no entry of that kind exists.
pub fn replace_or_append(commands: &mut Vec<LoadCommand>, command: LoadCommand) {
    match commands.iter().position(|c| c.cmd == command.cmd) {
        Some(index) => commands[index] = command,
        None => commands.push(command),
    }
}

/// Extracts a NUL-terminated name from a fixed 16-byte field.
pub(crate) fn name_from_bytes(bytes: &[u8]) -> String {
    let end = memchr(0, bytes).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Encodes a name into a NUL-padded 16-byte field.
pub(crate) fn name_to_bytes(name: &str) -> [u8; 16] {
    let mut field = [0u8; 16];
    let bytes = name.as_bytes();
    field[..bytes.len().min(16)].copy_from_slice(&bytes[..bytes.len().min(16)]);
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buf::ByteWriter;

    fn header_with(ncmds: u32, sizeofcmds: u32) -> MachHeader {
        MachHeader {
            magic: MH_CIGAM_64,
            is_64: true,
            little_endian: true,
            cputype: CPU_TYPE_ARM64,
            cpusubtype: 0,
            filetype: MH_EXECUTE,
            ncmds,
            sizeofcmds,
            flags: 0,
        }
    }

    fn uuid_command_bytes(uuid: [u8; 16]) -> Vec<u8> {
        let mut w = ByteWriter::new(UUID_COMMAND_SIZE, Endian::Little);
        w.set_u32(0, LC_UUID).unwrap();
        w.set_u32(4, UUID_COMMAND_SIZE as u32).unwrap();
        w.write_bytes(8, &uuid).unwrap();
        w.into_vec()
    }

    fn file_with_commands(cmds: &[Vec<u8>]) -> (Vec<u8>, MachHeader) {
        let sizeofcmds: usize = cmds.iter().map(|c| c.len()).sum();
        let header = header_with(cmds.len() as u32, sizeofcmds as u32);
        let mut data = vec![0u8; header.size()];
        for cmd in cmds {
            data.extend_from_slice(cmd);
        }
        (data, header)
    }

    #[test]
    fn parse_sequential_commands() {
        let uuid = [7u8; 16];
        let (data, header) = file_with_commands(&[
            uuid_command_bytes(uuid),
            uuid_command_bytes([1u8; 16]),
        ]);
        let commands = parse_commands(&data, &header).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].offset as usize, header.size());
        assert_eq!(
            commands[1].offset as usize,
            header.size() + UUID_COMMAND_SIZE
        );
        assert_eq!(
            commands[0].variant(Endian::Little).unwrap(),
            CommandVariant::Uuid(uuid)
        );
    }

    #[test]
    fn parse_rejects_undersized_command() {
        let mut cmd = uuid_command_bytes([0u8; 16]);
        // Corrupt cmdsize to 4.
        cmd[4..8].copy_from_slice(&4u32.to_le_bytes());
        let (data, header) = file_with_commands(&[cmd]);
        assert!(matches!(
            parse_commands(&data, &header),
            Err(Error::InvalidCommandSize { index: 0, size: 4 })
        ));
    }

    #[test]
    fn parse_rejects_region_past_buffer() {
        let (data, mut header) = file_with_commands(&[uuid_command_bytes([0u8; 16])]);
        header.sizeofcmds = 4096;
        assert!(matches!(
            parse_commands(&data, &header),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn parse_rejects_command_past_region() {
        let mut cmd = uuid_command_bytes([0u8; 16]);
        cmd[4..8].copy_from_slice(&64u32.to_le_bytes());
        let (data, header) = file_with_commands(&[cmd]);
        assert!(matches!(
            parse_commands(&data, &header),
            Err(Error::CommandOverflow { index: 0, .. })
        ));
    }

    #[test]
    fn table_operations() {
        let uuid = LoadCommand {
            cmd: LC_UUID,
            cmdsize: UUID_COMMAND_SIZE as u32,
            offset: 0,
            data: uuid_command_bytes([9u8; 16]),
        };
        let mut commands = vec![uuid.clone()];

        assert!(find_command(&commands, LC_UUID).is_some());
        assert!(find_command(&commands, LC_CODE_SIGNATURE).is_none());

        let replacement = LoadCommand {
            data: uuid_command_bytes([3u8; 16]),
            ..uuid
        };
        replace_or_append(&mut commands, replacement.clone());
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].data, replacement.data);

        assert!(remove_command(&mut commands, LC_UUID));
        assert!(!remove_command(&mut commands, LC_UUID));
        assert!(commands.is_empty());
    }

    #[test]
    fn name_field_round_trip() {
        let field = name_to_bytes("__TEXT");
        assert_eq!(&field[..7], b"__TEXT\0");
        assert_eq!(name_from_bytes(&field), "__TEXT");
        // A full 16-byte name has no terminator.
        let full = name_to_bytes("0123456789abcdef");
        assert_eq!(name_from_bytes(&full), "0123456789abcdef");
    }
}
