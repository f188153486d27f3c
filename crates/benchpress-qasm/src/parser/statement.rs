//! Statement parsing.

use super::Parser;
use crate::ast::{GateCall, GateDef, Operand, Statement, StatementKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let line = self.current_line();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        let kind = match token {
            Token::Include => self.parse_include()?,
            Token::Qreg => self.parse_register_decl(Token::Qreg)?,
            Token::Creg => self.parse_register_decl(Token::Creg)?,
            Token::Qubit => self.parse_typed_decl(Token::Qubit)?,
            Token::Bit => self.parse_typed_decl(Token::Bit)?,
            Token::Gate => self.parse_gate_def()?,
            Token::Opaque => self.parse_opaque_def()?,
            Token::Measure => self.parse_measure()?,
            Token::Reset => self.parse_reset()?,
            Token::Barrier => StatementKind::Barrier(self.parse_barrier()?),
            Token::If => self.parse_if()?,
            Token::Identifier(_) => self.parse_identifier_statement()?,
            other => {
                self.advance();
                return Err(self.unexpected("statement", &other));
            }
        };

        Ok(Statement { kind, line })
    }

    fn parse_include(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Include)?;
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => return Err(self.unexpected("string literal", &other)),
            None => return Err(ParseError::UnexpectedEof("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Include(path))
    }

    /// `qreg q[n];` / `creg c[n];`
    fn parse_register_decl(&mut self, keyword: Token) -> ParseResult<StatementKind> {
        let quantum = keyword == Token::Qreg;
        self.expect(keyword)?;
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_size()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok(declaration(quantum, name, size))
    }

    /// `qubit[n] q;` / `qubit q;` / `bit[n] c;` / `bit c;`
    fn parse_typed_decl(&mut self, keyword: Token) -> ParseResult<StatementKind> {
        let quantum = keyword == Token::Qubit;
        self.expect(keyword)?;
        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_size()?;
            self.expect(Token::RBracket)?;
            size
        } else {
            1
        };
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(declaration(quantum, name, size))
    }

    /// Optional `(a, b, ...)` list of parameter names.
    fn parse_param_names(&mut self) -> ParseResult<Vec<String>> {
        if !self.consume(&Token::LParen) {
            return Ok(vec![]);
        }
        if self.consume(&Token::RParen) {
            return Ok(vec![]);
        }
        let names = self.parse_identifier_list()?;
        self.expect(Token::RParen)?;
        Ok(names)
    }

    fn parse_gate_def(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;
        let params = self.parse_param_names()?;
        let qubits = self.parse_identifier_list()?;
        self.expect(Token::LBrace)?;

        let mut body = Vec::new();
        while !self.consume(&Token::RBrace) {
            match self.peek() {
                // Barriers inside a definition carry no semantics for the expansion.
                Some(Token::Barrier) => {
                    self.parse_barrier()?;
                }
                Some(Token::Identifier(_)) => body.push(self.parse_gate_call()?),
                Some(other) => {
                    let other = other.clone();
                    self.advance();
                    return Err(self.unexpected("gate call or '}'", &other));
                }
                None => return Err(ParseError::UnexpectedEof("'}'".into())),
            }
        }

        Ok(StatementKind::GateDef(GateDef {
            name,
            params,
            qubits,
            body,
        }))
    }

    fn parse_opaque_def(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Opaque)?;
        let name = self.parse_identifier()?;
        let params = self.parse_param_names()?;
        let qubits = self.parse_identifier_list()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::OpaqueDef {
            name,
            params,
            qubits,
        })
    }

    /// `measure q -> c;`
    fn parse_measure(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Measure)?;
        let qubits = self.parse_operand()?;
        self.expect(Token::Arrow)?;
        let clbits = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Measure { qubits, clbits })
    }

    fn parse_reset(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Reset)?;
        let operand = self.parse_operand()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Reset(operand))
    }

    fn parse_barrier(&mut self) -> ParseResult<Vec<Operand>> {
        self.expect(Token::Barrier)?;
        let operands = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;
        Ok(operands)
    }

    /// `if (c == n) qop`
    fn parse_if(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let register = self.parse_identifier()?;
        self.expect(Token::EqEq)?;
        let value = self.parse_int_literal()?;
        self.expect(Token::RParen)?;
        let body = self.parse_statement()?;
        Ok(StatementKind::If {
            register,
            value,
            body: Box::new(body),
        })
    }

    /// A statement starting with an identifier: either `c = measure q;`,
    /// `c[i] = measure q[j];` or a gate call.
    fn parse_identifier_statement(&mut self) -> ParseResult<StatementKind> {
        let is_assignment = matches!(self.peek_nth(1), Some(Token::Eq))
            || (matches!(self.peek_nth(1), Some(Token::LBracket))
                && matches!(self.peek_nth(4), Some(Token::Eq)));

        if is_assignment {
            let clbits = self.parse_operand()?;
            self.expect(Token::Eq)?;
            self.expect(Token::Measure)?;
            let qubits = self.parse_operand()?;
            self.expect(Token::Semicolon)?;
            return Ok(StatementKind::Measure { qubits, clbits });
        }

        Ok(StatementKind::GateCall(self.parse_gate_call()?))
    }

    /// `name(params) a, b[1];`
    fn parse_gate_call(&mut self) -> ParseResult<GateCall> {
        let line = self.current_line();
        let name = self.parse_identifier()?;
        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            vec![]
        };
        let args = self.parse_operand_list()?;
        self.expect(Token::Semicolon)?;
        Ok(GateCall {
            name,
            params,
            args,
            line,
        })
    }

    fn parse_operand_list(&mut self) -> ParseResult<Vec<Operand>> {
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    /// `name` or `name[i]`
    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let name = self.parse_identifier()?;
        if self.consume(&Token::LBracket) {
            let index = self.parse_int_literal()?;
            self.expect(Token::RBracket)?;
            Ok(Operand::indexed(name, index))
        } else {
            Ok(Operand::register(name))
        }
    }
}

fn declaration(quantum: bool, name: String, size: u32) -> StatementKind {
    if quantum {
        StatementKind::QuantumDecl { name, size }
    } else {
        StatementKind::ClassicalDecl { name, size }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Expression, Operand, StatementKind};
    use crate::parser::parse_ast;

    #[test]
    fn test_gate_definition() {
        let program = parse_ast(
            "OPENQASM 2.0;
             gate majority(theta) a, b, c { cx c, b; rz(theta/2) a; barrier a, b; ccx a, b, c; }",
        )
        .unwrap();
        let StatementKind::GateDef(def) = &program.statements[0].kind else {
            panic!("expected a gate definition");
        };
        assert_eq!(def.name, "majority");
        assert_eq!(def.params, vec!["theta"]);
        assert_eq!(def.qubits, vec!["a", "b", "c"]);
        assert_eq!(def.body.len(), 3);
        assert_eq!(def.body[0].args, vec![Operand::register("c"), Operand::register("b")]);
    }

    #[test]
    fn test_qasm3_assignment_measure() {
        let program = parse_ast("OPENQASM 3; qubit[2] q; bit[2] c; c[1] = measure q[0];").unwrap();
        assert_eq!(
            program.statements[2].kind,
            StatementKind::Measure {
                qubits: Operand::indexed("q", 0),
                clbits: Operand::indexed("c", 1),
            }
        );
    }

    #[test]
    fn test_single_bit_declarations() {
        let program = parse_ast("OPENQASM 3.0; qubit a; bit b;").unwrap();
        assert_eq!(
            program.statements[0].kind,
            StatementKind::QuantumDecl {
                name: "a".into(),
                size: 1
            }
        );
        assert_eq!(
            program.statements[1].kind,
            StatementKind::ClassicalDecl {
                name: "b".into(),
                size: 1
            }
        );
    }

    #[test]
    fn test_if_statement() {
        let program =
            parse_ast("OPENQASM 2.0; qreg q[1]; creg c[1]; if (c == 1) x q[0];").unwrap();
        let StatementKind::If {
            register,
            value,
            body,
        } = &program.statements[2].kind
        else {
            panic!("expected if");
        };
        assert_eq!(register, "c");
        assert_eq!(*value, 1);
        assert!(matches!(body.kind, StatementKind::GateCall(_)));
    }

    #[test]
    fn test_statement_lines() {
        let program = parse_ast("OPENQASM 2.0;\nqreg q[1];\n\nh q[0];\n").unwrap();
        let lines: Vec<_> = program.statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_gate_call_parameters() {
        let program = parse_ast("OPENQASM 2.0; qreg q[1]; u3(0.1, -pi, 2) q[0];").unwrap();
        let StatementKind::GateCall(call) = &program.statements[1].kind else {
            panic!("expected a gate call");
        };
        assert_eq!(call.params.len(), 3);
        assert_eq!(call.params[2], Expression::Int(2));
    }
}
