//! Logsim - logic circuit definition checker
//!
//! Parses a circuit definition, reports every error it contains and prints
//! the circuit it describes.
//!
//! # Usage
//!
//! ```bash
//! logsim circuit.def
//! logsim -vv circuit.def
//! ```

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use logsim::{
    dsl::{self, WriterSink},
    error::{LogsimError, Result},
    Circuit, SymbolTable,
};

/// Logic circuit definition checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit definition file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Log parser decisions to stderr (-v for debug, -vv for every token)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn print_summary(circuit: &Circuit, names: &SymbolTable) -> Result<()> {
    println!("Devices ({}):", circuit.devices().len());
    for device in circuit.devices() {
        let name = names.name_of(device.name)?;
        match device.parameter {
            Some(parameter) => println!("  {name}: {} {parameter}", device.kind),
            None => println!("  {name}: {}", device.kind),
        }
    }

    let connections: Vec<_> = circuit.connections().collect();
    println!("Connections ({}):", connections.len());
    for (source, target) in connections {
        println!(
            "  {} -> {}",
            circuit.port_label(names, source)?,
            circuit.port_label(names, target)?
        );
    }

    println!("Monitors ({}):", circuit.monitors().len());
    for &port in circuit.monitors() {
        println!("  {}", circuit.port_label(names, port)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut names = SymbolTable::new();
    let mut circuit = Circuit::new(&mut names);

    // Diagnostics go out as they are found
    let sink = WriterSink::new(io::stderr());
    let errors = dsl::parse_file(&args.circuit_file, &mut names, &mut circuit, sink)?;
    if errors > 0 {
        return Err(LogsimError::DefinitionRejected {
            path: args.circuit_file.display().to_string(),
            errors,
        });
    }

    print_summary(&circuit, &names)
}
