//! Mutable container façade over thin and fat Mach-O files.
//!
//! A [`MachFile`] owns its buffers exclusively: the structured header and
//! command table are the source of truth for the command region, the slice
//! byte buffer is the source of truth for payload bytes, and `build()`
//! synthesizes a fresh output without mutating either. Mutations validate
//! first and apply second, so a failed call leaves the container unchanged.

use crate::buf::ByteWriter;
use crate::error::{Error, Result};

use super::builder::build_slice;
use super::commands::{
    find_command, name_to_bytes, parse_commands, remove_command, LoadCommand,
    LINKEDIT_DATA_COMMAND_SIZE, SEGMENT_COMMAND_64_SIZE, SEGMENT_COMMAND_SIZE, UUID_COMMAND_SIZE,
};
use super::constants::{
    align_commands, align_up, LC_CODE_SIGNATURE, LC_SEGMENT, LC_SEGMENT_64, LC_UUID,
    SEGMENT_PAGE_SIZE,
};
use super::fat::{build_fat, extract_slice, is_fat, parse_fat, FatInfo};
use super::header::MachHeader;
use super::segments::{parse_segments, Segment};

/// A parsed, editable Mach-O container.
///
/// Created from an in-memory byte buffer; file I/O is the caller's
/// responsibility. For fat inputs every slice is extracted up front and one
/// slice is selected at a time; mutations and [`MachFile::build`] operate
/// on the selected slice's views. Unselected slices pass through a rebuild
/// byte-identical.
#[derive(Debug)]
pub struct MachFile {
    fat: Option<FatInfo>,
    slices: Vec<Vec<u8>>,
    selected: usize,
    header: MachHeader,
    commands: Vec<LoadCommand>,
    segments: Vec<Segment>,
}

impl MachFile {
    /// Parses a thin or fat Mach-O from `data`.
    ///
    /// All structural validation happens here, before any view is exposed;
    /// a malformed input never yields a partially usable container. For fat
    /// inputs the first slice is selected.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if is_fat(data) {
            let fat = parse_fat(data)?;
            let slices = fat
                .slices
                .iter()
                .map(|s| extract_slice(data, s))
                .collect::<Result<Vec<_>>>()?;
            let (header, commands, segments) = parse_views(&slices[0])?;
            Ok(Self {
                fat: Some(fat),
                slices,
                selected: 0,
                header,
                commands,
                segments,
            })
        } else {
            let (header, commands, segments) = parse_views(data)?;
            Ok(Self {
                fat: None,
                slices: vec![data.to_vec()],
                selected: 0,
                header,
                commands,
                segments,
            })
        }
    }

    /// Returns true if the input was a fat (multi-architecture) container.
    pub fn is_fat(&self) -> bool {
        self.fat.is_some()
    }

    /// The fat descriptor, when the input was fat.
    pub fn fat_info(&self) -> Option<&FatInfo> {
        self.fat.as_ref()
    }

    /// Raw byte buffers of every slice (a single entry for thin inputs).
    pub fn slices(&self) -> &[Vec<u8>] {
        &self.slices
    }

    /// Index of the currently selected slice.
    pub fn selected_slice(&self) -> usize {
        self.selected
    }

    /// Header of the selected slice.
    pub fn header(&self) -> &MachHeader {
        &self.header
    }

    /// Load-command table of the selected slice, in file order.
    pub fn load_commands(&self) -> &[LoadCommand] {
        &self.commands
    }

    /// Segment view of the selected slice, re-derived after every mutation.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Selects a fat slice and re-initializes the views from its buffer.
    ///
    /// Structured mutations on the previously selected slice that were not
    /// built are discarded; `patch` edits persist, since they live in the
    /// slice buffer itself.
    pub fn select_slice(&mut self, index: usize) -> Result<()> {
        if self.fat.is_none() {
            return Err(Error::NotFat);
        }
        if index >= self.slices.len() {
            return Err(Error::SliceIndex {
                index,
                count: self.slices.len(),
            });
        }
        let (header, commands, segments) = parse_views(&self.slices[index])?;
        self.selected = index;
        self.header = header;
        self.commands = commands;
        self.segments = segments;
        Ok(())
    }

    /// Returns the first code-signature command, if any.
    pub fn find_code_signature(&self) -> Option<&LoadCommand> {
        find_command(&self.commands, LC_CODE_SIGNATURE)
    }

    /// Removes the first code-signature command. Returns whether one was
    /// removed; at most one is removed per call.
    pub fn strip_code_signature(&mut self) -> Result<bool> {
        let removed = remove_command(&mut self.commands, LC_CODE_SIGNATURE);
        if removed {
            self.refresh_segments()?;
        }
        Ok(removed)
    }

    /// Sets the build UUID from a 32-hex-digit string (hyphens ignored).
    ///
    /// Replaces the payload of an existing `LC_UUID` command in place — its
    /// size never changes, so no offsets move — or appends a fresh 24-byte
    /// command.
    pub fn set_uuid(&mut self, text: &str) -> Result<()> {
        let uuid = parse_uuid_text(text)?;
        let endian = self.header.endian();

        if let Some(index) = self.commands.iter().position(|c| c.cmd == LC_UUID) {
            let existing = &mut self.commands[index];
            if existing.data.len() < UUID_COMMAND_SIZE {
                return Err(Error::truncated(UUID_COMMAND_SIZE, existing.data.len()));
            }
            existing.data[8..24].copy_from_slice(&uuid);
        } else {
            let mut w = ByteWriter::new(UUID_COMMAND_SIZE, endian);
            w.set_u32(0, LC_UUID)?;
            w.set_u32(4, UUID_COMMAND_SIZE as u32)?;
            w.write_bytes(8, &uuid)?;
            self.commands.push(LoadCommand {
                cmd: LC_UUID,
                cmdsize: UUID_COMMAND_SIZE as u32,
                offset: 0,
                data: w.into_vec(),
            });
        }
        self.refresh_segments()
    }

    /// Injects a new segment carrying `payload`.
    ///
    /// The segment's file offset is the current end of payload data and its
    /// virtual address is the page-aligned address after the highest
    /// existing segment. The payload is embedded after the command's fixed
    /// header and appended to the payload region, so the rebuilt file
    /// carries the bytes at the recorded offset.
    pub fn inject_segment(&mut self, name: &str, payload: &[u8]) -> Result<()> {
        if name.is_empty() || name.len() > 16 {
            return Err(Error::InvalidSegmentName {
                name: name.to_string(),
            });
        }
        if payload.is_empty() {
            return Err(Error::EmptySegmentData);
        }

        let endian = self.header.endian();
        let fileoff = self.pad_payload_region();
        let vmaddr = align_up(
            self.segments
                .iter()
                .map(|s| s.vmaddr + s.vmsize)
                .max()
                .unwrap_or(0),
            SEGMENT_PAGE_SIZE,
        );
        let vmsize = align_up(payload.len() as u64, SEGMENT_PAGE_SIZE);

        let fixed = if self.header.is_64 {
            SEGMENT_COMMAND_64_SIZE
        } else {
            SEGMENT_COMMAND_SIZE
        };
        let cmdsize = align_commands(fixed + payload.len());
        let cmd = if self.header.is_64 {
            LC_SEGMENT_64
        } else {
            LC_SEGMENT
        };

        let mut w = ByteWriter::new(cmdsize, endian);
        w.set_u32(0, cmd)?;
        w.set_u32(4, cmdsize as u32)?;
        w.write_bytes(8, &name_to_bytes(name))?;
        if self.header.is_64 {
            w.set_u64(24, vmaddr)?;
            w.set_u64(32, vmsize)?;
            w.set_u64(40, fileoff)?;
            w.set_u64(48, payload.len() as u64)?;
            w.set_u32(64, 0)?; // nsects
        } else {
            w.set_u32(24, vmaddr as u32)?;
            w.set_u32(28, vmsize as u32)?;
            w.set_u32(32, fileoff as u32)?;
            w.set_u32(36, payload.len() as u32)?;
            w.set_u32(48, 0)?; // nsects
        }
        w.write_bytes(fixed, payload)?;

        self.commands.push(LoadCommand {
            cmd,
            cmdsize: cmdsize as u32,
            offset: 0,
            data: w.into_vec(),
        });
        self.slices[self.selected].extend_from_slice(payload);
        self.refresh_segments()
    }

    /// Appends an empty code-signature command whose descriptor points at
    /// the current end of payload data with zero length.
    pub fn add_placeholder_code_signature(&mut self) -> Result<()> {
        if self.find_code_signature().is_some() {
            return Err(Error::DuplicateSignature);
        }
        let endian = self.header.endian();
        let dataoff = self.pad_payload_region();

        let mut w = ByteWriter::new(LINKEDIT_DATA_COMMAND_SIZE, endian);
        w.set_u32(0, LC_CODE_SIGNATURE)?;
        w.set_u32(4, LINKEDIT_DATA_COMMAND_SIZE as u32)?;
        w.set_u32(8, dataoff as u32)?;
        w.set_u32(12, 0)?;
        self.commands.push(LoadCommand {
            cmd: LC_CODE_SIGNATURE,
            cmdsize: LINKEDIT_DATA_COMMAND_SIZE as u32,
            offset: 0,
            data: w.into_vec(),
        });
        self.refresh_segments()
    }

    /// Overwrites raw bytes of the selected slice at an absolute offset.
    ///
    /// No structural validation is performed beyond the bounds check; the
    /// caller keeps the format consistent. Writes into the command region
    /// are shadowed by the structured table on rebuild.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let slice = &mut self.slices[self.selected];
        let end = offset.checked_add(bytes.len()).unwrap_or(usize::MAX);
        if end > slice.len() {
            return Err(Error::truncated(end, slice.len()));
        }
        slice[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Serializes the container into a new, independent buffer.
    ///
    /// The selected slice is rebuilt from its structured state; for fat
    /// containers the remaining slices pass through byte-identical and the
    /// whole set is re-laid-out behind a canonical big-endian fat header.
    pub fn build(&self) -> Result<Vec<u8>> {
        let rebuilt = build_slice(&self.header, &self.commands, &self.slices[self.selected])?;
        match &self.fat {
            None => Ok(rebuilt),
            Some(fat) => {
                let mut out_slices = Vec::with_capacity(self.slices.len());
                for (index, slice) in self.slices.iter().enumerate() {
                    if index == self.selected {
                        out_slices.push(rebuilt.clone());
                    } else {
                        out_slices.push(slice.clone());
                    }
                }
                build_fat(&fat.slices, &out_slices)
            }
        }
    }

    /// Re-derives the segment view from the current command table.
    fn refresh_segments(&mut self) -> Result<()> {
        self.segments = parse_segments(&self.header, &self.commands)?;
        Ok(())
    }

    /// Returns the current end of payload data in slice coordinates,
    /// padding the slice buffer up to the payload start when the original
    /// file ended inside the alignment gap.
    fn pad_payload_region(&mut self) -> u64 {
        let data_start = align_commands(self.header.size() + self.header.sizeofcmds as usize);
        let slice = &mut self.slices[self.selected];
        if slice.len() < data_start {
            slice.resize(data_start, 0);
        }
        slice.len() as u64
    }
}

/// Parses one slice into its header, command table, and segment view.
fn parse_views(slice: &[u8]) -> Result<(MachHeader, Vec<LoadCommand>, Vec<Segment>)> {
    let header = MachHeader::parse(slice)?;
    let commands = parse_commands(slice, &header)?;
    let segments = parse_segments(&header, &commands)?;
    Ok((header, commands, segments))
}

/// Parses a UUID from 32 hex digits, ignoring hyphens.
fn parse_uuid_text(text: &str) -> Result<[u8; 16]> {
    let hex: String = text.chars().filter(|c| *c != '-').collect();
    if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidUuid {
            value: text.to_string(),
        });
    }
    let mut uuid = [0u8; 16];
    for (i, byte) in uuid.iter_mut().enumerate() {
        // Valid by the check above.
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| Error::InvalidUuid {
            value: text.to_string(),
        })?;
    }
    Ok(uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buf::{ByteReader, Endian};
    use crate::macho::commands::CommandVariant;
    use crate::macho::constants::*;
    use crate::macho::fat::{FatArch, FatHeader};

    /// A little-endian 64-bit executable with one __TEXT segment and
    /// 16 payload bytes.
    fn make_thin(payload: &[u8]) -> Vec<u8> {
        let header_size = MachHeader::SIZE_64;
        let sizeofcmds = 72usize;
        let data_start = align_commands(header_size + sizeofcmds);
        let mut w = ByteWriter::new(data_start + payload.len(), Endian::Little);
        w.set_u32(0, MH_MAGIC_64).unwrap();
        w.set_u32(4, CPU_TYPE_ARM64).unwrap();
        w.set_u32(12, MH_EXECUTE).unwrap();
        w.set_u32(16, 1).unwrap();
        w.set_u32(20, sizeofcmds as u32).unwrap();
        w.set_u32(header_size, LC_SEGMENT_64).unwrap();
        w.set_u32(header_size + 4, 72).unwrap();
        w.write_bytes(header_size + 8, &name_to_bytes("__TEXT")).unwrap();
        w.set_u64(header_size + 24, 0x100000000).unwrap();
        w.set_u64(header_size + 32, 0x4000).unwrap();
        w.set_u64(header_size + 40, data_start as u64).unwrap();
        w.set_u64(header_size + 48, payload.len() as u64).unwrap();
        w.write_bytes(data_start, payload).unwrap();
        w.into_vec()
    }

    /// Wraps thin slices into a fat container with the given magic.
    fn make_fat(magic: u32, slices: &[Vec<u8>]) -> Vec<u8> {
        let table_end = FatHeader::SIZE + slices.len() * FatArch::SIZE;
        let mut offsets = Vec::new();
        let mut cursor = align_up(table_end as u64, 64) as usize;
        for slice in slices {
            offsets.push(cursor);
            cursor += slice.len();
        }
        let mut data = vec![0u8; cursor];
        data[0..4].copy_from_slice(&magic.to_be_bytes());
        data[4..8].copy_from_slice(&(slices.len() as u32).to_be_bytes());
        for (i, slice) in slices.iter().enumerate() {
            let base = 8 + i * 20;
            data[base..base + 4].copy_from_slice(&CPU_TYPE_ARM64.to_be_bytes());
            data[base + 8..base + 12].copy_from_slice(&(offsets[i] as u32).to_be_bytes());
            data[base + 12..base + 16].copy_from_slice(&(slices[i].len() as u32).to_be_bytes());
            data[base + 16..base + 20].copy_from_slice(&6u32.to_be_bytes());
            data[offsets[i]..offsets[i] + slice.len()].copy_from_slice(slice);
        }
        data
    }

    #[test]
    fn unmodified_build_round_trips() {
        let thin = make_thin(b"0123456789abcdef");
        let file = MachFile::parse(&thin).unwrap();
        let out = file.build().unwrap();

        let reparsed = MachFile::parse(&out).unwrap();
        assert_eq!(reparsed.header(), file.header());
        assert_eq!(reparsed.load_commands(), file.load_commands());
        assert_eq!(reparsed.segments(), file.segments());
        assert_eq!(out, thin);
    }

    #[test]
    fn set_uuid_appends_then_replaces() {
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();

        file.set_uuid("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let uuids: Vec<_> = file.load_commands().iter().filter(|c| c.cmd == LC_UUID).collect();
        assert_eq!(uuids.len(), 1);

        // Setting again replaces in place, never duplicates.
        file.set_uuid("ffeeddccbbaa99887766554433221100").unwrap();
        let uuids: Vec<_> = file.load_commands().iter().filter(|c| c.cmd == LC_UUID).collect();
        assert_eq!(uuids.len(), 1);

        let out = file.build().unwrap();
        let reparsed = MachFile::parse(&out).unwrap();
        let uuid = reparsed
            .load_commands()
            .iter()
            .find(|c| c.cmd == LC_UUID)
            .unwrap();
        assert_eq!(
            uuid.variant(Endian::Little).unwrap(),
            CommandVariant::Uuid([
                0xff, 0xee, 0xdd, 0xcc, 0xbb, 0xaa, 0x99, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33,
                0x22, 0x11, 0x00
            ])
        );
    }

    #[test]
    fn set_uuid_rejects_garbage() {
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();
        assert!(matches!(
            file.set_uuid("not-a-uuid"),
            Err(Error::InvalidUuid { .. })
        ));
        assert!(matches!(
            file.set_uuid("00112233445566778899aabbccddeef"),
            Err(Error::InvalidUuid { .. })
        ));
        // Failed mutation leaves the table untouched.
        assert_eq!(file.load_commands().len(), 1);
    }

    #[test]
    fn inject_segment_end_to_end() {
        let payload = b"hello injected world";
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();
        file.inject_segment("__INJECT", payload).unwrap();

        let out = file.build().unwrap();
        let reparsed = MachFile::parse(&out).unwrap();
        let seg = reparsed
            .segments()
            .iter()
            .find(|s| s.name == "__INJECT")
            .expect("injected segment");
        assert_eq!(seg.filesize, payload.len() as u64);
        let start = seg.fileoff as usize;
        assert_eq!(&out[start..start + payload.len()], payload);
        // Page-aligned placement after the existing __TEXT segment.
        assert_eq!(seg.vmaddr, 0x100004000);
        assert_eq!(seg.vmaddr % SEGMENT_PAGE_SIZE, 0);
        // The payload is also embedded in the command itself.
        let lc = reparsed
            .load_commands()
            .iter()
            .find(|c| c.cmd == LC_SEGMENT_64 && name_to_bytes("__INJECT") == c.data[8..24])
            .unwrap();
        assert_eq!(&lc.data[72..72 + payload.len()], payload);
    }

    #[test]
    fn inject_segment_into_empty_table() {
        // Zero load commands: offset delta starts from a bare header.
        let mut w = ByteWriter::new(MachHeader::SIZE_64, Endian::Little);
        w.set_u32(0, MH_MAGIC_64).unwrap();
        w.set_u32(4, CPU_TYPE_ARM64).unwrap();
        w.set_u32(12, MH_EXECUTE).unwrap();
        let bare = w.into_vec();

        let mut file = MachFile::parse(&bare).unwrap();
        assert!(file.load_commands().is_empty());
        file.inject_segment("__BLOB", b"abc").unwrap();

        let out = file.build().unwrap();
        let reparsed = MachFile::parse(&out).unwrap();
        let seg = &reparsed.segments()[0];
        assert_eq!(seg.name, "__BLOB");
        assert_eq!(seg.filesize, 3);
        assert_eq!(&out[seg.fileoff as usize..seg.fileoff as usize + 3], b"abc");
    }

    #[test]
    fn inject_segment_validates_inputs() {
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();
        assert!(matches!(
            file.inject_segment("", b"data"),
            Err(Error::InvalidSegmentName { .. })
        ));
        assert!(matches!(
            file.inject_segment("XXXXXXXXXXXXXXXXX", b"data"),
            Err(Error::InvalidSegmentName { .. })
        ));
        assert!(matches!(
            file.inject_segment("OK", b""),
            Err(Error::EmptySegmentData)
        ));
        assert_eq!(file.load_commands().len(), 1);
        assert_eq!(file.segments().len(), 1);
    }

    #[test]
    fn strip_signature_is_idempotent() {
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();
        // Nothing to strip on a clean binary.
        assert!(!file.strip_code_signature().unwrap());
        assert_eq!(file.load_commands().len(), 1);

        file.add_placeholder_code_signature().unwrap();
        assert!(file.find_code_signature().is_some());
        assert!(file.strip_code_signature().unwrap());
        assert!(file.find_code_signature().is_none());
        assert!(!file.strip_code_signature().unwrap());

        let out = file.build().unwrap();
        let reparsed = MachFile::parse(&out).unwrap();
        assert!(reparsed.find_code_signature().is_none());
    }

    #[test]
    fn placeholder_signature_rejects_duplicates() {
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();
        file.add_placeholder_code_signature().unwrap();
        assert!(matches!(
            file.add_placeholder_code_signature(),
            Err(Error::DuplicateSignature)
        ));

        let out = file.build().unwrap();
        let reparsed = MachFile::parse(&out).unwrap();
        let sig = reparsed.find_code_signature().unwrap();
        match sig.variant(Endian::Little).unwrap() {
            CommandVariant::CodeSignature { dataoff, datasize } => {
                assert_eq!(datasize, 0);
                // Descriptor points at the end of the rebuilt payload.
                assert_eq!(dataoff as usize, out.len());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn patch_overwrites_payload() {
        let thin = make_thin(b"0123456789abcdef");
        let data_start = thin.len() - 16;
        let mut file = MachFile::parse(&thin).unwrap();
        file.patch(data_start, b"XXXX").unwrap();
        let out = file.build().unwrap();
        assert_eq!(&out[data_start..data_start + 4], b"XXXX");
        assert!(file.patch(thin.len(), &[1, 2]).is_err());
    }

    #[test]
    fn fat_container_round_trip() {
        let slice_a = make_thin(b"aaaaaaaaaaaaaaaa");
        let slice_b = make_thin(b"bbbbbbbbbbbbbbbb");
        let fat = make_fat(FAT_CIGAM, &[slice_a.clone(), slice_b.clone()]);

        let mut file = MachFile::parse(&fat).unwrap();
        assert!(file.is_fat());
        assert_eq!(file.slices().len(), 2);

        file.select_slice(1).unwrap();
        file.set_uuid("00112233445566778899aabbccddeeff").unwrap();
        let out = file.build().unwrap();

        // Outer header is canonical big-endian FAT_MAGIC even for CIGAM input.
        assert_eq!(&out[0..4], &FAT_MAGIC.to_be_bytes());

        let rebuilt = MachFile::parse(&out).unwrap();
        assert!(rebuilt.is_fat());
        let info = rebuilt.fat_info().unwrap();
        assert_eq!(info.slices.len(), 2);
        // Slice offsets respect the 2^6 alignment from the source descriptors.
        assert_eq!(info.slices[0].offset % 64, 0);
        assert_eq!(info.slices[1].offset % 64, 0);

        // The unselected slice is byte-identical.
        assert_eq!(rebuilt.slices()[0], slice_a);
        // The selected slice gained the UUID command.
        let r = ByteReader::new(&rebuilt.slices()[1], Endian::Little);
        assert_eq!(r.u32(16).unwrap(), 2); // ncmds

        let mut rebuilt = rebuilt;
        rebuilt.select_slice(1).unwrap();
        assert!(rebuilt
            .load_commands()
            .iter()
            .any(|c| c.cmd == LC_UUID));
    }

    #[test]
    fn select_slice_is_guarded() {
        let thin = make_thin(b"0123456789abcdef");
        let mut file = MachFile::parse(&thin).unwrap();
        assert!(matches!(file.select_slice(0), Err(Error::NotFat)));

        let fat = make_fat(FAT_MAGIC, &[thin.clone()]);
        let mut file = MachFile::parse(&fat).unwrap();
        assert!(matches!(
            file.select_slice(3),
            Err(Error::SliceIndex { index: 3, count: 1 })
        ));
        file.select_slice(0).unwrap();
    }

    #[test]
    fn uuid_text_parsing() {
        assert!(parse_uuid_text("00112233-4455-6677-8899-aabbccddeeff").is_ok());
        assert!(parse_uuid_text("00112233445566778899AABBCCDDEEFF").is_ok());
        assert!(parse_uuid_text("").is_err());
        assert!(parse_uuid_text("zz112233445566778899aabbccddeeff").is_err());
        let uuid = parse_uuid_text("00112233445566778899aabbccddeeff").unwrap();
        assert_eq!(uuid[0], 0x00);
        assert_eq!(uuid[15], 0xff);
    }
}
