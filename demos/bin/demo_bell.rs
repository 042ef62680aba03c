//! Bell State Demo
//!
//! Entangles two qubits and shows that their measurements always agree.

use anyhow::Result;
use clap::Parser;

use qalgo_demos::cli::{CommonArgs, backend};
use qalgo_demos::runners::BellRunner;
use qalgo_demos::{init_logging, print_circuit, print_header, print_result, print_section};

#[derive(Parser, Debug)]
#[command(name = "demo-bell")]
#[command(about = "Prepare and measure the Bell state (|00⟩ + |11⟩)/√2")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);

    let config = args.common.resolve_config()?;
    let backend = backend(&config)?;
    let runner = BellRunner::from_config(&config);

    if !args.common.json {
        print_header("Bell State Demo");
        print_section("Setup");
        print_result("Shots", runner.shots);
        print_result("Tolerance", runner.tolerance);
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
