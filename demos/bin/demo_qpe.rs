//! Quantum Phase Estimation Demo
//!
//! Estimates the eigenphase of the T gate (1/8) with a counting register.

use anyhow::Result;
use clap::Parser;

use qalgo_demos::cli::{CommonArgs, backend};
use qalgo_demos::runners::QpeRunner;
use qalgo_demos::{init_logging, print_circuit, print_header, print_result, print_section};

#[derive(Parser, Debug)]
#[command(name = "demo-qpe")]
#[command(about = "Estimate the T gate's eigenphase with QPE")]
struct Args {
    /// Number of counting qubits [default: 3]
    #[arg(short = 'n', long)]
    counting: Option<u32>,

    /// Estimate P(2π·phase) instead of T; phase in [0, 1)
    #[arg(short, long)]
    phase: Option<f64>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);

    let mut config = args.common.resolve_config()?;
    if let Some(counting) = args.counting {
        config.qpe.counting_qubits = counting;
    }
    if args.phase.is_some() {
        config.qpe.phase = args.phase;
    }
    config.validate()?;
    let backend = backend(&config)?;
    let runner = QpeRunner::from_config(&config)?;

    if !args.common.json {
        print_header("Quantum Phase Estimation Demo");
        print_section("Setup");
        print_result("Unitary", runner.target);
        print_result("Counting qubits", runner.counting_qubits);
        print_result("Shots", runner.shots);
        print_circuit(&runner.circuit()?, args.common.show_qasm)?;
    }

    let report = runner.run(&backend)?;

    if args.common.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
