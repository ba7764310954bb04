//! Thin CLI front end: looks up a built-in program, assembles it, and
//! writes out a raw binary image.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};

use mc6809::{Assembler, ContiguousBytes, MAX_PASSES};

mod programs;

const EXIT_SUCCESS: u8 = 0;
const EXIT_PROGRAM_NOT_FOUND: u8 = 2;
const EXIT_DATA_ERROR: u8 = 1;

#[derive(Debug, thiserror::Error)]
#[error("no built-in program named {name:?}; known programs: {known}")]
struct ProgramLoadError { name: String, known: String }

/// Two-pass cross-assembler for the MC6809/HD6309 CPU family.
#[derive(Parser, Debug)]
#[command(name = "mc6809-asm", version, about)]
struct Args {
    /// Name of a built-in program to assemble
    source: String,

    /// Write the assembled image to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Bin)]
    format: Format,

    /// Repeat the assembled window this many times back to back
    #[arg(long, default_value_t = 1)]
    repeat: usize,

    /// Logging verbosity: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    verbosity: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Bin,
    Hex,
    Srec,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = args.verbosity.parse().unwrap_or(log::LevelFilter::Warn);
    env_logger::Builder::new().filter_level(level).init();

    match run(&args) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = if err.downcast_ref::<ProgramLoadError>().is_some() {
                EXIT_PROGRAM_NOT_FOUND
            } else {
                EXIT_DATA_ERROR
            };
            ExitCode::from(code)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let program = programs::lookup(&args.source).ok_or_else(|| ProgramLoadError {
        name: args.source.clone(),
        known: programs::names().collect::<Vec<_>>().join(", "),
    })?;
    let statements = program();

    let mut assembler = Assembler::new();
    assembler.assemble(&statements, 0, MAX_PASSES).context("assembling program")?;

    print_labels(&assembler);

    let bytes = match args.format {
        Format::Bin => render_binary(&assembler, args.repeat)?,
        Format::Hex => bail!("hex output is not yet implemented"),
        Format::Srec => bail!("srec output is not yet implemented"),
    };

    write_output(args.output.as_deref(), &bytes)
}

fn render_binary(assembler: &Assembler, repeat: usize) -> anyhow::Result<Vec<u8>> {
    let view = ContiguousBytes::new(assembler.object_code().clone(), None, None, 0x00)?;
    let window = view.to_bytes();
    let mut bytes = Vec::with_capacity(window.len() * repeat);
    for _ in 0..repeat {
        bytes.extend_from_slice(&window);
    }
    Ok(bytes)
}

fn write_output(path: Option<&std::path::Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display())),
        None => std::io::stdout().write_all(bytes).context("writing to stdout"),
    }
}

fn print_labels(assembler: &Assembler) {
    let mut names: Vec<_> = assembler.label_addresses().keys().collect();
    names.sort();
    println!("Labels:");
    for name in names {
        let address = assembler.label_addresses()[name];
        let marker = if assembler.unreferenced_labels().contains(name) { " <unreferenced>" } else { "" };
        println!("  {name:<16} 0x{address:04X}{marker}");
    }
}
