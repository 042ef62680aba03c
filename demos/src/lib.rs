//! qalgo demo suite
//!
//! Four textbook quantum algorithms run on the statevector simulator:
//!
//! - **Bell state**: entanglement and perfectly correlated measurements
//! - **Teleportation**: moving a qubit state with a Bell pair and two classical bits
//! - **QFT**: the Quantum Fourier Transform on a basis state
//! - **QPE**: estimating the T gate's eigenphase
//!
//! Each demo pairs a builder in [`circuits`] with a runner in [`runners`]:
//!
//! ```
//! use qalgo_adapter_sim::SimulatorBackend;
//! use qalgo_demos::runners::QpeRunner;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let report = QpeRunner::new(3).run(&backend).unwrap();
//! assert_eq!(report.most_frequent, "001");
//! ```

pub mod circuits;
pub mod cli;
pub mod config;
pub mod error;
pub mod runners;

use console::style;
use qalgo_hal::{BlochVector, Counts};
use qalgo_ir::Circuit;
use tracing_subscriber::EnvFilter;

use crate::runners::AmplitudeRow;

pub use config::DemoConfig;
pub use error::{DemoError, DemoResult};

/// Outcomes shown in a histogram before the rest are summarised.
const MAX_HISTOGRAM_ROWS: usize = 16;

/// Install the tracing subscriber.
///
/// `-v` enables info, `-vv` debug, `-vvv` trace. Logs go to stderr so
/// `--json` output stays clean.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print counts as a histogram, most frequent first.
pub fn print_counts(counts: &Counts, execution_time_ms: Option<u64>) {
    let sorted = counts.sorted();
    let total = counts.total_shots().max(1) as f64;

    for (bitstring, count) in sorted.iter().take(MAX_HISTOGRAM_ROWS) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > MAX_HISTOGRAM_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - MAX_HISTOGRAM_ROWS);
    }

    if let Some(time_ms) = execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}

/// Print a statevector as a table of amplitudes.
pub fn print_amplitudes(rows: &[AmplitudeRow]) {
    println!(
        "  {:<10} {:>9} {:>9} {:>9} {:>8}",
        style("state").dim(),
        style("re").dim(),
        style("im").dim(),
        style("|a|").dim(),
        style("phase").dim()
    );
    for row in rows {
        println!(
            "  {:<10} {:>+9.4} {:>+9.4} {:>9.4} {:>7.4}τ",
            style(&row.label).cyan(),
            row.re,
            row.im,
            row.magnitude,
            row.phase
        );
    }
}

/// Print a Bloch vector with its length.
pub fn print_bloch(label: &str, vector: &BlochVector) {
    println!(
        "  {} {} |r| = {:.4}",
        style(format!("{label:>6}:")).dim(),
        style(vector).cyan(),
        vector.length()
    );
}

/// Print a circuit summary, and its OpenQASM 3 source with `show_qasm`.
pub fn print_circuit(circuit: &Circuit, show_qasm: bool) -> DemoResult<()> {
    print_section(&format!("Circuit '{}'", circuit.name()));
    print_result("qubits", circuit.num_qubits());
    print_result("classical bits", circuit.num_clbits());
    print_result("depth", circuit.depth());
    print_result("gates", circuit.gate_count());

    if show_qasm {
        let qasm = qalgo_qasm3::emit(circuit)?;
        println!();
        for line in qasm.lines() {
            println!("  {}", style(line).dim());
        }
    }
    Ok(())
}
