//! Quantum Fourier Transform Demo
//!
//! Applies the QFT to a basis state and shows the resulting phases.

use anyhow::Result;
use clap::Parser;

use qalgo_demos::cli::{CommonArgs, backend};
use qalgo_demos::runners::QftRunner;
use qalgo_demos::{init_logging, print_circuit, print_header, print_result, print_section};

#[derive(Parser, Debug)]
#[command(name = "demo-qft")]
#[command(about = "Apply the Quantum Fourier Transform to a basis state")]
struct Args {
    /// Number of qubits [default: 3]
    #[arg(short = 'n', long)]
    qubits: Option<u32>,

    /// Basis state to transform [default: 4, i.e. |100⟩]
    #[arg(short, long)]
    input: Option<u64>,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);

    let mut config = args.common.resolve_config()?;
    if let Some(qubits) = args.qubits {
        config.qft.num_qubits = qubits;
    }
    if let Some(input) = args.input {
        config.qft.input = input;
    }
    config.validate()?;
    let backend = backend(&config)?;
    let runner = QftRunner::from_config(&config);

    if !args.common.json {
        print_header("Quantum Fourier Transform Demo");
        print_section("Setup");
        print_result("Qubits", runner.num_qubits);
        print_result(
            "Input",
            format!(
                "{} = |{:0width$b}⟩",
                runner.input,
                runner.input,
                width = runner.num_qubits as usize
            ),
        );
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
