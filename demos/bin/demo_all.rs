//! Complete Demo Suite
//!
//! Runs all four demos in sequence with one shared configuration.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use qalgo_demos::cli::{CommonArgs, backend};
use qalgo_demos::runners::{
    BellReport, BellRunner, QftReport, QftRunner, QpeReport, QpeRunner, TeleportReport,
    TeleportRunner,
};
use qalgo_demos::{
    init_logging, print_circuit, print_header, print_result, print_section, print_success,
    print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-all")]
#[command(about = "Run the Bell, teleportation, QFT and QPE demos")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Serialize)]
struct SuiteReport {
    bell: BellReport,
    teleport: TeleportReport,
    qft: QftReport,
    qpe: QpeReport,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.common.verbose);
    let styled = !args.common.json;
    let start = Instant::now();

    let config = args.common.resolve_config()?;
    let backend = backend(&config)?;

    if styled {
        print_header("qalgo Demo Suite");
        println!("  1. Bell state (entanglement)");
        println!("  2. Quantum teleportation");
        println!("  3. Quantum Fourier Transform");
        println!("  4. Quantum Phase Estimation");
    }

    // =========================================================================
    // Part 1: Bell state
    // =========================================================================
    let bell = BellRunner::from_config(&config);
    if styled {
        print_header("Part 1: Bell State");
        print_circuit(&bell.circuit()?, args.common.show_qasm)?;
    }
    let bell_report = bell.run(&backend).context("Bell demo failed")?;
    if styled {
        bell_report.print();
    }

    // =========================================================================
    // Part 2: Teleportation
    // =========================================================================
    let teleport = TeleportRunner::from_config(&config);
    if styled {
        print_header("Part 2: Quantum Teleportation");
        print_result("Input state", teleport.input);
        print_result("Correction", teleport.mode);
        print_circuit(&teleport.circuit()?, args.common.show_qasm)?;
    }
    let teleport_report = teleport
        .run(&backend)
        .context("teleportation demo failed")?;
    if styled {
        teleport_report.print(teleport.tolerance);
    }

    // =========================================================================
    // Part 3: QFT
    // =========================================================================
    let qft = QftRunner::from_config(&config);
    if styled {
        print_header("Part 3: Quantum Fourier Transform");
        print_result("Input", qft.input);
        print_circuit(&qft.circuit()?, args.common.show_qasm)?;
    }
    let qft_report = qft.run(&backend).context("QFT demo failed")?;
    if styled {
        qft_report.print();
    }

    // =========================================================================
    // Part 4: QPE
    // =========================================================================
    let qpe = QpeRunner::from_config(&config)?;
    if styled {
        print_header("Part 4: Quantum Phase Estimation");
        print_result("Unitary", qpe.target);
        print_circuit(&qpe.circuit()?, args.common.show_qasm)?;
    }
    let qpe_report = qpe.run(&backend).context("QPE demo failed")?;
    if styled {
        qpe_report.print();
    }

    if !styled {
        let suite = SuiteReport {
            bell: bell_report,
            teleport: teleport_report,
            qft: qft_report,
            qpe: qpe_report,
        };
        println!("{}", serde_json::to_string_pretty(&suite)?);
        return Ok(());
    }

    print_header("Summary");
    let checks = [
        ("Bell state", bell_report.passed()),
        ("Teleportation", teleport_report.teleported(teleport.tolerance)),
        ("QFT", qft_report.passed()),
        ("QPE", qpe_report.error <= qpe_report.resolution),
    ];
    for (name, passed) in checks {
        if passed {
            print_success(name);
        } else {
            print_warning(name);
        }
    }
    println!();
    print_section("Total");
    print_result("Time", format!("{:.2?}", start.elapsed()));
    Ok(())
}
