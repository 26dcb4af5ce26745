//! machedit - Inspect and edit Mach-O binaries.
//!
//! Structural edits on thin and fat Mach-O files: UUID insertion, segment
//! injection, code-signature stripping, and raw byte patching.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use memmap2::Mmap;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use machedit::macho::{arch_name, command_name, file_type_name, MachFlags};
use machedit::{strip_signature, CommandVariant, MachFile};

/// Inspect and edit Mach-O binaries.
#[derive(Parser, Debug)]
#[command(name = "machedit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the header, load commands, and segments of a binary
    Info {
        /// Input Mach-O file
        file: PathBuf,

        /// Fat slice to inspect (default: first)
        #[arg(short, long)]
        slice: Option<usize>,
    },

    /// List the architecture slices of a fat binary
    Arches {
        /// Input Mach-O file
        file: PathBuf,
    },

    /// Set the build UUID
    Uuid {
        /// Input Mach-O file
        file: PathBuf,

        /// UUID as 32 hex digits (hyphens allowed)
        #[arg(short, long)]
        set: String,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Fat slice to edit (default: first)
        #[arg(long)]
        slice: Option<usize>,
    },

    /// Inject a new segment carrying a payload file
    Inject {
        /// Input Mach-O file
        file: PathBuf,

        /// Segment name (1 to 16 bytes)
        #[arg(short, long)]
        name: String,

        /// File whose bytes become the segment payload
        #[arg(short, long)]
        payload: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Fat slice to edit (default: first)
        #[arg(long)]
        slice: Option<usize>,
    },

    /// Remove the code-signature load command
    Strip {
        /// Input Mach-O file
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Overwrite raw bytes at an absolute offset of the selected slice
    Patch {
        /// Input Mach-O file
        file: PathBuf,

        /// Absolute byte offset (hex accepted with 0x prefix)
        #[arg(long)]
        offset: String,

        /// Replacement bytes as hex digits
        #[arg(long)]
        bytes: String,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,

        /// Fat slice to edit (default: first)
        #[arg(long)]
        slice: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { file, slice } => cmd_info(file, slice),
        Commands::Arches { file } => cmd_arches(file),
        Commands::Uuid {
            file,
            set,
            output,
            slice,
        } => cmd_uuid(file, set, output, slice),
        Commands::Inject {
            file,
            name,
            payload,
            output,
            slice,
        } => cmd_inject(file, name, payload, output, slice),
        Commands::Strip { file, output } => cmd_strip(file, output),
        Commands::Patch {
            file,
            offset,
            bytes,
            output,
            slice,
        } => cmd_patch(file, offset, bytes, output, slice),
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Memory-maps an input file and hands the library an owned buffer.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    let file =
        File::open(path).with_context(|| format!("failed to open: {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to map: {}", path.display()))?;
    Ok(mmap.to_vec())
}

/// Opens a container and selects the requested fat slice, if any.
fn open_selected(path: &Path, slice: Option<usize>) -> Result<MachFile> {
    let data = read_input(path)?;
    let mut file = MachFile::parse(&data)
        .with_context(|| format!("failed to parse: {}", path.display()))?;
    if let Some(index) = slice {
        file.select_slice(index)
            .with_context(|| format!("cannot select slice {index}"))?;
    }
    Ok(file)
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("failed to write: {}", path.display()))?;
    info!("wrote {} ({} bytes)", path.display(), data.len());
    Ok(())
}

fn cmd_info(path: PathBuf, slice: Option<usize>) -> Result<()> {
    let file = open_selected(&path, slice)?;
    let header = file.header();

    if file.is_fat() {
        println!(
            "Fat binary, {} slices (showing slice {})",
            file.slices().len(),
            file.selected_slice()
        );
    }
    println!("Architecture: {}", arch_name(header.cputype));
    println!("File type:    {}", file_type_name(header.filetype));
    println!(
        "Layout:       {}-bit, {}",
        if header.is_64 { 64 } else { 32 },
        if header.little_endian {
            "little-endian"
        } else {
            "big-endian"
        }
    );
    println!(
        "Flags:        {:?}",
        MachFlags::from_bits_truncate(header.flags)
    );
    println!("Commands:     {} ({} bytes)", header.ncmds, header.sizeofcmds);

    println!("\nLoad commands:");
    let endian = header.endian();
    for (i, lc) in file.load_commands().iter().enumerate() {
        let detail = match lc.variant(endian) {
            Ok(CommandVariant::Uuid(uuid)) => format!("uuid {}", format_uuid(&uuid)),
            Ok(CommandVariant::CodeSignature { dataoff, datasize }) => {
                format!("dataoff {dataoff:#x}, datasize {datasize:#x}")
            }
            Ok(CommandVariant::Segment32 { name, .. })
            | Ok(CommandVariant::Segment64 { name, .. }) => name,
            _ => String::new(),
        };
        println!(
            "  [{i:2}] {:<22} {:5} bytes  {detail}",
            command_name(lc.cmd),
            lc.cmdsize
        );
    }

    println!("\nSegments:");
    for seg in file.segments() {
        println!("  {seg}");
        for sect in &seg.sections {
            println!(
                "    {},{} addr {:#x} size {:#x} offset {:#x}",
                sect.segname, sect.name, sect.addr, sect.size, sect.offset
            );
        }
    }

    Ok(())
}

fn cmd_arches(path: PathBuf) -> Result<()> {
    let data = read_input(&path)?;
    let file = MachFile::parse(&data)?;

    match file.fat_info() {
        Some(info) => {
            for (i, slice) in info.slices.iter().enumerate() {
                println!(
                    "  [{i}] {:<8} offset {:#x} size {:#x} align 2^{}",
                    arch_name(slice.cputype),
                    slice.offset,
                    slice.size,
                    slice.align
                );
            }
        }
        None => println!("thin binary: {}", arch_name(file.header().cputype)),
    }

    Ok(())
}

fn cmd_uuid(path: PathBuf, uuid: String, output: PathBuf, slice: Option<usize>) -> Result<()> {
    let mut file = open_selected(&path, slice)?;
    file.set_uuid(&uuid)?;
    write_output(&output, &file.build()?)
}

fn cmd_inject(
    path: PathBuf,
    name: String,
    payload_path: PathBuf,
    output: PathBuf,
    slice: Option<usize>,
) -> Result<()> {
    let payload = fs::read(&payload_path)
        .with_context(|| format!("failed to read payload: {}", payload_path.display()))?;
    let mut file = open_selected(&path, slice)?;
    file.inject_segment(&name, &payload)?;
    info!("injected '{}' ({} bytes)", name, payload.len());
    write_output(&output, &file.build()?)
}

fn cmd_strip(path: PathBuf, output: PathBuf) -> Result<()> {
    let data = read_input(&path)?;
    let (stripped, removed) = strip_signature(&data)?;
    if removed {
        info!("removed code signature command");
    } else {
        info!("no code signature command present");
    }
    write_output(&output, &stripped)
}

fn cmd_patch(
    path: PathBuf,
    offset: String,
    bytes: String,
    output: PathBuf,
    slice: Option<usize>,
) -> Result<()> {
    let offset = parse_offset(&offset)?;
    let bytes = parse_hex_bytes(&bytes)?;
    let mut file = open_selected(&path, slice)?;
    file.patch(offset, &bytes)?;
    write_output(&output, &file.build()?)
}

fn parse_offset(text: &str) -> Result<usize> {
    let trimmed = text.trim_start_matches("0x").trim_start_matches("0X");
    if text.starts_with("0x") || text.starts_with("0X") {
        usize::from_str_radix(trimmed, 16).with_context(|| format!("invalid offset: {text}"))
    } else {
        text.parse().with_context(|| format!("invalid offset: {text}"))
    }
}

fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    if text.len() % 2 != 0 || text.is_empty() {
        bail!("byte string must be a non-empty, even number of hex digits");
    }
    (0..text.len() / 2)
        .map(|i| {
            u8::from_str_radix(&text[i * 2..i * 2 + 2], 16)
                .with_context(|| format!("invalid hex bytes: {text}"))
        })
        .collect()
}

fn format_uuid(uuid: &[u8; 16]) -> String {
    let hex: String = uuid.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
