//! AST-to-Circuit lowering.

use benchpress_ir::{
    Circuit, ClassicalCondition, ClbitId, Gate, Instruction, OpaqueGate, QubitId,
    StandardGate,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::f64::consts::{E, PI, TAU};

use crate::ast::{BinOp, Expression, GateCall, GateDef, Operand, Program, Statement, StatementKind};
use crate::error::{ParseError, ParseResult};

/// Include files whose gates are built in.
const STANDARD_INCLUDES: &[&str] = &["qelib1.inc", "stdgates.inc"];

/// `qelib1.inc` gates with no [`StandardGate`] counterpart, in dependency
/// order. They are inlined on use like any user definition.
const LIBRARY_DEFINITIONS: &str = "OPENQASM 2.0;
gate u0(gamma) q { U(0, 0, 0) q; }
gate cu(theta, phi, lambda, gamma) c, t {
  p(gamma) c;
  p((lambda + phi) / 2) c;
  p((lambda - phi) / 2) t;
  cx c, t;
  u(-theta / 2, 0, -(phi + lambda) / 2) t;
  cx c, t;
  u(theta / 2, phi, 0) t;
}
gate rccx a, b, c {
  u2(0, pi) c; u1(pi/4) c; cx b, c; u1(-pi/4) c; cx a, c;
  u1(pi/4) c; cx b, c; u1(-pi/4) c; u2(0, pi) c;
}
gate rc3x a, b, c, d {
  u2(0, pi) d; u1(pi/4) d; cx c, d; u1(-pi/4) d; u2(0, pi) d;
  cx a, d; u1(pi/4) d; cx b, d; u1(-pi/4) d; cx a, d;
  u1(pi/4) d; cx b, d; u1(-pi/4) d; u2(0, pi) d;
  u1(pi/4) d; cx c, d; u1(-pi/4) d; u2(0, pi) d;
}
gate c3x a, b, c, d {
  h d; p(pi/8) a; p(pi/8) b; p(pi/8) c; p(pi/8) d;
  cx a, b; p(-pi/8) b; cx a, b;
  cx b, c; p(-pi/8) c; cx a, c; p(pi/8) c; cx b, c; p(-pi/8) c; cx a, c;
  cx c, d; p(-pi/8) d; cx b, d; p(pi/8) d; cx c, d; p(-pi/8) d;
  cx a, d; p(pi/8) d; cx c, d; p(-pi/8) d; cx b, d; p(pi/8) d;
  cx c, d; p(-pi/8) d; cx a, d;
  h d;
}
gate c3sqrtx a, b, c, d {
  h d; cu1(pi/8) a, d; h d; cx a, b;
  h d; cu1(-pi/8) b, d; h d; cx a, b;
  h d; cu1(pi/8) b, d; h d; cx b, c;
  h d; cu1(-pi/8) c, d; h d; cx a, c;
  h d; cu1(pi/8) c, d; h d; cx b, c;
  h d; cu1(-pi/8) c, d; h d; cx a, c;
  h d; cu1(pi/8) c, d; h d;
}
gate c4x a, b, c, d, e {
  h e; cu1(pi/2) d, e; h e;
  rc3x a, b, c, d;
  h e; cu1(-pi/2) d, e; h e;
  rc3x a, b, c, d;
  c3sqrtx a, b, c, e;
}
";

/// Lower an AST Program to a Circuit with the given name.
pub(crate) fn lower_to_circuit(program: &Program, name: &str) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::new(name);
    for statement in &program.statements {
        lowerer.lower_statement(statement, None)?;
    }
    Ok(lowerer.circuit)
}

/// Evaluate a constant expression with the given parameter bindings.
pub(crate) fn eval_expression(
    expr: &Expression,
    env: &FxHashMap<String, f64>,
    line: usize,
) -> ParseResult<f64> {
    let value = match expr {
        Expression::Int(v) => *v as f64,
        Expression::Float(v) => *v,
        Expression::Pi => PI,
        Expression::Tau => TAU,
        Expression::Euler => E,
        Expression::Identifier(name) => {
            *env.get(name)
                .ok_or_else(|| ParseError::UndefinedIdentifier {
                    line,
                    name: name.clone(),
                })?
        }
        Expression::Neg(inner) => -eval_expression(inner, env, line)?,
        Expression::BinOp { left, op, right } => {
            let l = eval_expression(left, env, line)?;
            let r = eval_expression(right, env, line)?;
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Pow => l.powf(r),
            }
        }
        Expression::FnCall { name, args } => {
            let [arg] = args.as_slice() else {
                return Err(ParseError::Expression {
                    line,
                    message: format!("function '{name}' takes one argument, got {}", args.len()),
                });
            };
            let x = eval_expression(arg, env, line)?;
            match name.as_str() {
                "sin" => x.sin(),
                "cos" => x.cos(),
                "tan" => x.tan(),
                "asin" | "arcsin" => x.asin(),
                "acos" | "arccos" => x.acos(),
                "atan" | "arctan" => x.atan(),
                "exp" => x.exp(),
                "ln" | "log" => x.ln(),
                "sqrt" => x.sqrt(),
                _ => {
                    return Err(ParseError::Expression {
                        line,
                        message: format!("unknown function '{name}'"),
                    });
                }
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::Expression {
            line,
            message: format!("parameter evaluates to {value}"),
        })
    }
}

/// Lowers statements into a circuit, keeping the symbol tables.
struct Lowerer {
    circuit: Circuit,
    /// Quantum registers: name -> (start id, size).
    qregs: FxHashMap<String, (u32, u32)>,
    /// Classical registers: name -> (start id, size).
    cregs: FxHashMap<String, (u32, u32)>,
    /// User gate definitions, inlined on use.
    gates: FxHashMap<String, GateDef>,
    /// Opaque declarations: name -> (params, qubits).
    opaques: FxHashMap<String, (usize, usize)>,
    /// Definitions that came from an include; a file may redeclare these.
    library: FxHashSet<String>,
}

/// How a gate name resolves.
enum Resolved<'a> {
    Standard,
    Defined(&'a GateDef),
    Opaque,
}

impl Lowerer {
    fn new(name: &str) -> Self {
        Self {
            circuit: Circuit::new(name),
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            gates: FxHashMap::default(),
            opaques: FxHashMap::default(),
            library: FxHashSet::default(),
        }
    }

    /// Load the include-file gates that need inlining. Idempotent.
    fn load_library(&mut self) -> ParseResult<()> {
        if !self.library.is_empty() {
            return Ok(());
        }
        let program = super::parse_ast(LIBRARY_DEFINITIONS)?;
        for statement in &program.statements {
            if let StatementKind::GateDef(def) = &statement.kind {
                if self.gates.contains_key(&def.name) || self.opaques.contains_key(&def.name) {
                    continue;
                }
                self.define_gate(def, statement.line)?;
                self.library.insert(def.name.clone());
            }
        }
        Ok(())
    }

    /// Forget an include-file definition the file is about to replace.
    fn take_over_library_name(&mut self, name: &str) {
        if self.library.remove(name) {
            self.gates.remove(name);
        }
    }

    fn lower_statement(
        &mut self,
        statement: &Statement,
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        let line = statement.line;
        match &statement.kind {
            StatementKind::Include(file) => {
                if STANDARD_INCLUDES.contains(&file.as_str()) {
                    self.load_library()
                } else {
                    Err(ParseError::UnsupportedInclude {
                        line,
                        file: file.clone(),
                    })
                }
            }

            StatementKind::QuantumDecl { name, size } => {
                self.check_fresh_name(name, line)?;
                let ids = self
                    .circuit
                    .add_qreg(name.clone(), *size)
                    .map_err(|source| ParseError::CircuitError { line, source })?;
                let start = ids.first().map_or(self.circuit.num_qubits() as u32, |q| q.0);
                self.qregs.insert(name.clone(), (start, *size));
                Ok(())
            }

            StatementKind::ClassicalDecl { name, size } => {
                self.check_fresh_name(name, line)?;
                let ids = self
                    .circuit
                    .add_creg(name.clone(), *size)
                    .map_err(|source| ParseError::CircuitError { line, source })?;
                let start = ids.first().map_or(self.circuit.num_clbits() as u32, |c| c.0);
                self.cregs.insert(name.clone(), (start, *size));
                Ok(())
            }

            StatementKind::GateDef(def) => self.define_gate(def, line),

            StatementKind::OpaqueDef {
                name,
                params,
                qubits,
            } => {
                self.take_over_library_name(name);
                if self.gates.contains_key(name) || self.opaques.contains_key(name) {
                    return Err(ParseError::DuplicateDeclaration {
                        line,
                        name: name.clone(),
                    });
                }
                self.opaques
                    .insert(name.clone(), (params.len(), qubits.len()));
                Ok(())
            }

            StatementKind::GateCall(call) => self.lower_gate_call(call, condition),

            StatementKind::Measure { qubits, clbits } => {
                self.reject_condition(condition, "conditional measure", line)?;
                let qubits = self.resolve_qubits(qubits, line)?;
                let clbits = self.resolve_clbits(clbits, line)?;
                if qubits.len() != clbits.len() {
                    return Err(ParseError::RegisterSizeMismatch {
                        line,
                        left: qubits.len(),
                        right: clbits.len(),
                    });
                }
                for (q, c) in qubits.into_iter().zip(clbits) {
                    self.push(Instruction::measure(q, c), line)?;
                }
                Ok(())
            }

            StatementKind::Reset(operand) => {
                self.reject_condition(condition, "conditional reset", line)?;
                for q in self.resolve_qubits(operand, line)? {
                    self.push(Instruction::reset(q), line)?;
                }
                Ok(())
            }

            StatementKind::Barrier(operands) => {
                let mut qubits: Vec<QubitId> = Vec::new();
                for operand in operands {
                    for q in self.resolve_qubits(operand, line)? {
                        if !qubits.contains(&q) {
                            qubits.push(q);
                        }
                    }
                }
                self.push(Instruction::barrier(qubits), line)
            }

            StatementKind::If {
                register,
                value,
                body,
            } => {
                self.reject_condition(condition, "nested if", line)?;
                if !self.cregs.contains_key(register) {
                    return Err(ParseError::UndefinedIdentifier {
                        line,
                        name: register.clone(),
                    });
                }
                let condition = ClassicalCondition::new(register.clone(), *value);
                self.lower_statement(body, Some(&condition))
            }
        }
    }

    fn reject_condition(
        &self,
        condition: Option<&ClassicalCondition>,
        what: &str,
        line: usize,
    ) -> ParseResult<()> {
        match condition {
            Some(_) => Err(ParseError::Unsupported {
                line,
                what: what.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn check_fresh_name(&self, name: &str, line: usize) -> ParseResult<()> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateDeclaration {
                line,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn push(&mut self, instruction: Instruction, line: usize) -> ParseResult<()> {
        self.circuit
            .push(instruction)
            .map(|_| ())
            .map_err(|source| ParseError::CircuitError { line, source })
    }

    /// Check a definition body against the names known so far and store it.
    ///
    /// Bodies may only call gates declared earlier, so definitions cannot recurse.
    fn define_gate(&mut self, def: &GateDef, line: usize) -> ParseResult<()> {
        self.take_over_library_name(&def.name);
        if self.gates.contains_key(&def.name) || self.opaques.contains_key(&def.name) {
            return Err(ParseError::DuplicateDeclaration {
                line,
                name: def.name.clone(),
            });
        }
        for call in &def.body {
            for arg in &call.args {
                if arg.index.is_some() || !def.qubits.contains(&arg.name) {
                    return Err(ParseError::UndefinedIdentifier {
                        line: call.line,
                        name: arg.name.clone(),
                    });
                }
            }
            self.resolve_gate(call)?;
        }
        self.gates.insert(def.name.clone(), def.clone());
        Ok(())
    }

    /// Resolve a call by name and arity.
    ///
    /// A standard gate wins over a same-named definition when the arities
    /// agree, so files that define their own `ecr` or `rzz` still produce
    /// the native gate.
    fn resolve_gate(&self, call: &GateCall) -> ParseResult<Resolved<'_>> {
        let line = call.line;
        let (num_params, num_qubits) = (call.params.len(), call.args.len());

        let standard = StandardGate::signature(&call.name);
        if let Some(sig) = standard {
            if sig.params == num_params && sig.qubits as usize == num_qubits {
                return Ok(Resolved::Standard);
            }
        }

        let declared = if let Some(def) = self.gates.get(&call.name) {
            Some((def.params.len(), def.qubits.len(), Resolved::Defined(def)))
        } else {
            self.opaques
                .get(&call.name)
                .map(|&(p, q)| (p, q, Resolved::Opaque))
        };

        let (expected_params, expected_qubits) = match (&declared, standard) {
            (Some((p, q, _)), _) => (*p, *q),
            (None, Some(sig)) => (sig.params, sig.qubits as usize),
            (None, None) => {
                return Err(ParseError::UnknownGate {
                    line,
                    name: call.name.clone(),
                });
            }
        };

        if expected_params != num_params {
            return Err(ParseError::WrongParameterCount {
                line,
                gate: call.name.clone(),
                expected: expected_params,
                got: num_params,
            });
        }
        if expected_qubits != num_qubits {
            return Err(ParseError::WrongQubitCount {
                line,
                gate: call.name.clone(),
                expected: expected_qubits,
                got: num_qubits,
            });
        }
        // Arity matched, so a declaration must be present here.
        Ok(declared.map_or(Resolved::Standard, |(_, _, resolved)| resolved))
    }

    fn lower_gate_call(
        &mut self,
        call: &GateCall,
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        let line = call.line;
        let params = call
            .params
            .iter()
            .map(|p| eval_expression(p, &FxHashMap::default(), line))
            .collect::<ParseResult<Vec<_>>>()?;

        let operands = call
            .args
            .iter()
            .map(|arg| self.resolve_qubits(arg, line))
            .collect::<ParseResult<Vec<_>>>()?;
        let width = broadcast_width(&call.args, &operands, line)?;

        for i in 0..width {
            let qubits: Vec<QubitId> = operands
                .iter()
                .map(|bits| if bits.len() == 1 { bits[0] } else { bits[i] })
                .collect();
            self.apply_gate(call, &params, &qubits, condition)?;
        }
        Ok(())
    }

    /// Apply one resolved gate, inlining user definitions recursively.
    fn apply_gate(
        &mut self,
        call: &GateCall,
        params: &[f64],
        qubits: &[QubitId],
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        let line = call.line;
        let gate = match self.resolve_gate(call)? {
            Resolved::Standard => StandardGate::from_name(&call.name, params)
                .map(Gate::standard)
                .ok_or_else(|| ParseError::UnknownGate {
                    line,
                    name: call.name.clone(),
                })?,
            Resolved::Opaque => Gate::opaque(OpaqueGate::new(
                call.name.clone(),
                qubits.len() as u32,
                params.to_vec(),
            )),
            Resolved::Defined(def) => {
                let def = def.clone();
                return self.inline_definition(&def, params, qubits, condition);
            }
        };

        let gate = match condition {
            Some(c) => gate.with_condition(c.clone()),
            None => gate,
        };
        self.push(Instruction::gate(gate, qubits.iter().copied()), line)
    }

    fn inline_definition(
        &mut self,
        def: &GateDef,
        params: &[f64],
        qubits: &[QubitId],
        condition: Option<&ClassicalCondition>,
    ) -> ParseResult<()> {
        let env: FxHashMap<String, f64> = def
            .params
            .iter()
            .cloned()
            .zip(params.iter().copied())
            .collect();
        let wires: FxHashMap<&str, QubitId> = def
            .qubits
            .iter()
            .map(String::as_str)
            .zip(qubits.iter().copied())
            .collect();

        for inner in &def.body {
            let inner_params = inner
                .params
                .iter()
                .map(|p| eval_expression(p, &env, inner.line))
                .collect::<ParseResult<Vec<_>>>()?;
            let inner_qubits = inner
                .args
                .iter()
                .map(|arg| {
                    wires
                        .get(arg.name.as_str())
                        .copied()
                        .ok_or_else(|| ParseError::UndefinedIdentifier {
                            line: inner.line,
                            name: arg.name.clone(),
                        })
                })
                .collect::<ParseResult<Vec<_>>>()?;
            self.apply_gate(inner, &inner_params, &inner_qubits, condition)?;
        }
        Ok(())
    }

    fn resolve_qubits(&self, operand: &Operand, line: usize) -> ParseResult<Vec<QubitId>> {
        let (start, size) = lookup(&self.qregs, operand, line)?;
        Ok(select(start, size, operand, line)?
            .into_iter()
            .map(QubitId)
            .collect())
    }

    fn resolve_clbits(&self, operand: &Operand, line: usize) -> ParseResult<Vec<ClbitId>> {
        let (start, size) = lookup(&self.cregs, operand, line)?;
        Ok(select(start, size, operand, line)?
            .into_iter()
            .map(ClbitId)
            .collect())
    }
}

fn lookup(
    registers: &FxHashMap<String, (u32, u32)>,
    operand: &Operand,
    line: usize,
) -> ParseResult<(u32, u32)> {
    registers
        .get(&operand.name)
        .copied()
        .ok_or_else(|| ParseError::UndefinedIdentifier {
            line,
            name: operand.name.clone(),
        })
}

fn select(start: u32, size: u32, operand: &Operand, line: usize) -> ParseResult<Vec<u32>> {
    match operand.index {
        Some(index) if index < u64::from(size) => Ok(vec![start + index as u32]),
        Some(index) => Err(ParseError::IndexOutOfBounds {
            line,
            register: operand.name.clone(),
            index,
            size,
        }),
        None => Ok((start..start + size).collect()),
    }
}

/// Number of gate applications for a broadcast call.
///
/// Whole-register operands must all have the same size; single bits repeat.
fn broadcast_width(args: &[Operand], operands: &[Vec<QubitId>], line: usize) -> ParseResult<usize> {
    let mut width: Option<usize> = None;
    for (arg, bits) in args.iter().zip(operands) {
        if arg.index.is_some() {
            continue;
        }
        match width {
            None => width = Some(bits.len()),
            Some(w) if w != bits.len() => {
                return Err(ParseError::RegisterSizeMismatch {
                    line,
                    left: w,
                    right: bits.len(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(width.unwrap_or(1))
}
