use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use xgfile::index::FileRecord;
use xgfile::record::SLOT_SIZE;
use xgfile::{batch, import, parse_file, ContainerHeader, ImportOptions, Import, RecordStream, SegmentKind};

#[derive(Parser)]
#[command(name = "xgdump", about = "Inspect eXtreme Gammon match files")]
struct Cli {
    /// Skip reading the embedded thumbnail image
    #[arg(long, global = true)]
    no_thumbnail: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the archive entries and segments of a file
    Segments {
        input: PathBuf,
        /// Print the header and archive registry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print every decoded record with its slot offset
    Records {
        input: PathBuf,
    },
    /// Print the assembled match as JSON
    Match {
        input: PathBuf,
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Decode several files and print one summary line each
    Batch {
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = ImportOptions { load_thumbnail: !cli.no_thumbnail, ..Default::default() };

    match cli.command {

        // ── Segments ─────────────────────────────────────────────────────────
        Commands::Segments { input, json } => {
            let imported = open(&input, &opts)?;
            if json {
                let listing = Listing { header: &imported.header, entries: &imported.entries };
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }
            let h = &imported.header;
            println!("── Match file ───────────────────────────────────────────");
            println!("  Path           {}", input.display());
            println!("  Product        {}", h.game_name);
            println!("  GUID           {}", h.game_guid);
            println!("  Header size    {} B", h.header_size);
            println!("  Thumbnail      {} B", h.thumbnail_size);
            println!();
            println!("{:<12} {:>10} {:>10} {:>8}  {:<6} Kind",
                     "Name", "Size", "Stored", "CRC", "Codec");
            for e in &imported.entries {
                let codec = xgfile::codec::CodecId::from_entry_flag(e.compressed);
                println!("{:<12} {:>10} {:>10} {:08x}  {:<6} {:?}",
                    e.name, e.original_size, e.compressed_size, e.crc,
                    codec.name(), SegmentKind::from_entry_name(&e.name));
            }
            println!();
            for s in &imported.segments {
                println!("  {:<16} {:>10} B  {}{}",
                    format!("{:?}", s.kind), s.data.len(),
                    s.name.as_deref().unwrap_or("-"), s.kind.extension());
            }
        }

        // ── Records ──────────────────────────────────────────────────────────
        Commands::Records { input } => {
            let imported = open(&input, &opts)?;
            let Some(game_file) = imported.segment(SegmentKind::GameFile) else {
                return Err("no records segment in file".into());
            };
            let mut stream = RecordStream::new(&game_file.data);
            while let Some(record) = stream.next() {
                let record = record?;
                let offset = stream.last_offset().unwrap_or_default();
                println!("[{:>5} @ {offset:>8}] {record:#?}", offset / SLOT_SIZE);
            }
        }

        // ── Match ────────────────────────────────────────────────────────────
        Commands::Match { input, compact } => {
            let m = parse_file(&input)?;
            if compact {
                println!("{}", serde_json::to_string(&m)?);
            } else {
                println!("{}", m.to_json()?);
            }
        }

        // ── Batch ────────────────────────────────────────────────────────────
        Commands::Batch { inputs } => {
            for (path, result) in batch::parse_files(&inputs) {
                match result {
                    Ok(m) => println!("{}: {} vs {}, {} game(s), {} move(s)",
                        path.display(), m.metadata.player1_name, m.metadata.player2_name,
                        m.games.len(), m.move_count()),
                    Err(e) => println!("{}: error: {}", path.display(), e),
                }
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Listing<'a> {
    header:  &'a ContainerHeader,
    entries: &'a [FileRecord],
}

fn open(path: &Path, opts: &ImportOptions) -> Result<Import, Box<dyn std::error::Error>> {
    Ok(import(BufReader::new(File::open(path)?), opts)?)
}
