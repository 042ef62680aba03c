//! Quantum Teleportation Demo
//!
//! Sends a single-qubit state from Alice to Bob using a shared Bell pair
//! and two classical bits.

use anyhow::Result;
use clap::Parser;

use qalgo_demos::circuits::{CorrectionMode, TeleportInput};
use qalgo_demos::cli::{CommonArgs, backend};
use qalgo_demos::runners::TeleportRunner;
use qalgo_demos::{init_logging, print_circuit, print_header, print_result, print_section};

#[derive(Parser, Debug)]
#[command(name = "demo-teleport")]
#[command(about = "Teleport a qubit state with a Bell pair")]
struct Args {
    /// State to send: zero, one, plus, minus, plus_i, or "theta,phi" in radians
    #[arg(short, long)]
    input: Option<TeleportInput>,

    /// Correction on Bob's side: classical, coherent or none
    #[arg(short, long)]
    mode: Option<CorrectionMode>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);

    let mut config = args.common.resolve_config()?;
    if let Some(input) = args.input {
        config.teleport.input = input;
    }
    if let Some(mode) = args.mode {
        config.teleport.mode = mode;
    }
    let backend = backend(&config)?;
    let runner = TeleportRunner::from_config(&config);

    if !args.common.json {
        print_header("Quantum Teleportation Demo");
        print_section("Setup");
        print_result("Input state", runner.input);
        print_result("Correction", runner.mode);
        print_result("Shots", runner.shots);
        print_circuit(&runner.circuit()?, args.common.show_qasm)?;
    }

    let report = runner.run(&backend)?;

    if args.common.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print(runner.tolerance);
    }
    Ok(())
}
