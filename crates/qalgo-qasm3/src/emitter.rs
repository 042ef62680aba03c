//! QASM3 emitter for serializing circuits.

use std::f64::consts::PI;

use qalgo_ir::{Circuit, ClassicalCondition, Gate, Instruction, InstructionKind, Register};

use crate::error::{EmitError, EmitResult};

/// Largest power-of-two denominator rendered as a fraction of `pi`.
const MAX_PI_DENOMINATOR: u32 = 1 << 10;

/// Emit a circuit as QASM3 source code.
///
/// Named registers are declared under their own names when they cover every
/// wire; otherwise all wires go into one `q` / `c` register.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    let mut emitter = Emitter::new(circuit);
    emitter.emit_circuit(circuit)
}

/// Declarations and per-wire names for one kind of wire.
struct WireLayout {
    declarations: Vec<(String, u32)>,
    names: Vec<String>,
}

impl WireLayout {
    fn new(registers: &[Register], count: usize, fallback: &str) -> Self {
        let covered: usize = registers.iter().map(|r| r.size as usize).sum();
        let complete = covered == count
            && (0..count).all(|i| {
                u32::try_from(i).is_ok_and(|i| registers.iter().any(|r| r.contains(i)))
            });

        if complete && !registers.is_empty() {
            let names = (0..count)
                .map(|i| {
                    u32::try_from(i)
                        .ok()
                        .and_then(|i| registers.iter().find_map(|r| r.label(i)))
                        .unwrap_or_default()
                })
                .collect();
            Self {
                declarations: registers.iter().map(|r| (r.name.clone(), r.size)).collect(),
                names,
            }
        } else {
            let declarations = if count > 0 {
                vec![(fallback.to_string(), u32::try_from(count).unwrap_or(u32::MAX))]
            } else {
                vec![]
            };
            Self {
                declarations,
                names: (0..count).map(|i| format!("{fallback}[{i}]")).collect(),
            }
        }
    }
}

struct Emitter {
    output: String,
    qubits: WireLayout,
    clbits: WireLayout,
}

impl Emitter {
    fn new(circuit: &Circuit) -> Self {
        Self {
            output: String::new(),
            qubits: WireLayout::new(circuit.qregs(), circuit.num_qubits(), "q"),
            clbits: WireLayout::new(circuit.cregs(), circuit.num_clbits(), "c"),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> EmitResult<String> {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");
        self.writeln("");

        let qregs: Vec<_> = self
            .qubits
            .declarations
            .iter()
            .map(|(name, size)| format!("qubit[{size}] {name};"))
            .collect();
        let cregs: Vec<_> = self
            .clbits
            .declarations
            .iter()
            .map(|(name, size)| format!("bit[{size}] {name};"))
            .collect();
        let declared = !qregs.is_empty() || !cregs.is_empty();
        for line in qregs.into_iter().chain(cregs) {
            self.writeln(&line);
        }
        if declared {
            self.writeln("");
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let call = self.gate_call(gate, instruction);
                match &gate.condition {
                    Some(condition) => {
                        let test = self.condition(gate, condition)?;
                        self.writeln(&format!("if ({test}) {call}"));
                    }
                    None => self.writeln(&call),
                }
            }

            InstructionKind::Measure => {
                let lines: Vec<_> = instruction
                    .qubits
                    .iter()
                    .zip(&instruction.clbits)
                    .map(|(q, c)| {
                        format!(
                            "{} = measure {};",
                            self.clbits.names[c.index()],
                            self.qubits.names[q.index()]
                        )
                    })
                    .collect();
                for line in lines {
                    self.writeln(&line);
                }
            }

            InstructionKind::Reset => {
                let qubits = self.qubit_list(instruction);
                self.writeln(&format!("reset {qubits};"));
            }

            InstructionKind::Barrier => {
                let qubits = self.qubit_list(instruction);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }

        Ok(())
    }

    fn gate_call(&self, gate: &Gate, instruction: &Instruction) -> String {
        let qubits = self.qubit_list(instruction);
        let params = gate.kind.parameters();
        if params.is_empty() {
            format!("{} {qubits};", gate.name())
        } else {
            let params = params
                .iter()
                .map(|&p| format_angle(p))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({params}) {qubits};", gate.name())
        }
    }

    fn condition(&self, gate: &Gate, condition: &ClassicalCondition) -> EmitResult<String> {
        let width = condition.clbits.len();
        if width == 0 {
            return Err(EmitError::EmptyCondition(gate.name().to_string()));
        }
        if width < 64 && condition.value >> width != 0 {
            return Err(EmitError::ConditionOverflow {
                value: condition.value,
                width,
            });
        }
        Ok(condition
            .clbits
            .iter()
            .enumerate()
            .map(|(pos, c)| {
                let bit = (condition.value >> pos) & 1;
                format!("{} == {bit}", self.clbits.names[c.index()])
            })
            .collect::<Vec<_>>()
            .join(" && "))
    }

    fn qubit_list(&self, instruction: &Instruction) -> String {
        instruction
            .qubits
            .iter()
            .map(|q| self.qubits.names[q.index()].as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Render an angle, using `pi` fractions with power-of-two denominators
/// where the value is one.
fn format_angle(value: f64) -> String {
    if value == 0.0 {
        return "0".into();
    }
    let mut denominator = 1u32;
    while denominator <= MAX_PI_DENOMINATOR {
        let numerator = value / PI * f64::from(denominator);
        let rounded = numerator.round();
        if (numerator - rounded).abs() < 1e-9 {
            let sign = if rounded < 0.0 { "-" } else { "" };
            let magnitude = rounded.abs();
            let head = if magnitude == 1.0 {
                "pi".to_string()
            } else {
                format!("{magnitude}*pi")
            };
            return if denominator == 1 {
                format!("{sign}{head}")
            } else {
                format!("{sign}{head}/{denominator}")
            };
        }
        denominator <<= 1;
    }
    format!("{value}")
}
