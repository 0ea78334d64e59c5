use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use thrpatch::progmem::{format_progmem, MAX_PROGMEM_PATCHES};
use thrpatch::{patch_message, ydl, SyxFile, SysexSink};

/// Upload settings from a .YDL preset file to a Yamaha THR10/THR5
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all patches in a preset file
    List {
        /// Path to the .YDL preset file
        ydl_file: PathBuf,

        /// Strip trailing padding from patch names
        #[arg(long)]
        trim: bool,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert one patch to SysEx and send it to a MIDI device and/or a .syx file
    Convert {
        /// Path to the .YDL preset file
        ydl_file: PathBuf,

        /// Patch number (0-indexed)
        patch_number: usize,

        /// Dump patch into this .syx file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dump patch to this MIDI output port (number or part of its name)
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Print the head of a preset file as a C PROGMEM array
    Progmem {
        /// Path to the .YDL preset file
        ydl_file: PathBuf,

        /// Number of patches to include
        #[arg(short, long, default_value_t = MAX_PROGMEM_PATCHES)]
        num_patches: usize,
    },
    /// List MIDI output ports
    Ports,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::List { ydl_file, trim, json } => {
            let presets = ydl::read_file(&ydl_file)?;

            if json {
                let entries: Vec<_> = presets.entries().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            for entry in presets.entries() {
                if trim {
                    println!("{}: {}", entry.index, trim_name(&entry.name()));
                } else {
                    println!("{}", entry);
                }
            }
        }
        Commands::Convert {
            ydl_file,
            patch_number,
            output,
            device,
        } => {
            if output.is_none() && device.is_none() {
                bail!("nothing to do: give an output file (-o) and/or a MIDI device (-d)");
            }

            let presets = ydl::read_file(&ydl_file)?;
            let message = patch_message(&presets, patch_number)
                .with_context(|| format!("cannot convert patch from {}", ydl_file.display()))?;
            debug!("Patch {} message verifies: {}", patch_number, message.verify());

            if let Some(selector) = device {
                let mut port = open_device(&selector)?;
                port.send(&message)?;
            }

            if let Some(path) = output {
                let mut file = SyxFile::new(path);
                file.send(&message)?;
            }
        }
        Commands::Progmem {
            ydl_file,
            num_patches,
        } => {
            let presets = ydl::read_file(&ydl_file)?;
            print!("{}", format_progmem(&presets, num_patches));
        }
        Commands::Ports => list_ports()?,
    }

    Ok(())
}

/// Presentation-only cleanup of a raw patch name.
fn trim_name(name: &str) -> &str {
    name.trim_end_matches(|c: char| c == '\0' || c.is_whitespace() || c.is_control())
}

#[cfg(feature = "midi")]
fn open_device(selector: &str) -> Result<Box<dyn SysexSink>> {
    Ok(Box::new(thrpatch::sink::MidiPort::open(selector)?))
}

#[cfg(not(feature = "midi"))]
fn open_device(selector: &str) -> Result<Box<dyn SysexSink>> {
    bail!(
        "cannot open MIDI device '{}': built without MIDI support (enable the `midi` feature)",
        selector
    )
}

#[cfg(feature = "midi")]
fn list_ports() -> Result<()> {
    let ports = thrpatch::sink::output_ports()?;
    if ports.is_empty() {
        println!("No output ports found");
    }
    for (i, name) in ports.iter().enumerate() {
        println!("[{}] {}", i, name);
    }
    Ok(())
}

#[cfg(not(feature = "midi"))]
fn list_ports() -> Result<()> {
    bail!("built without MIDI support (enable the `midi` feature)")
}
