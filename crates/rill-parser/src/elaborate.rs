//! Elaboration of the parsed AST into the semantic statement model.
//!
//! This phase renders every expression to its display text, desugars
//! augmented assignments, and, when I/O detection is enabled, classifies
//! `input`/`print` statements as input and output boxes. The result is an
//! owned [`Program`] with no references back into the source.

use rill_core::semantic::{self, Program};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types as types,
};

/// Configuration for the elaboration phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElaborateConfig {
    detect_io: bool,
}

impl ElaborateConfig {
    /// Create a new configuration.
    ///
    /// `detect_io` enables the input/output statement classification:
    /// `x = input(...)` becomes an input box and `print(...)`/`pprint(...)`
    /// an output box. With it disabled they stay a plain assignment and
    /// call.
    pub fn new(detect_io: bool) -> Self {
        Self { detect_io }
    }

    /// Whether input/output detection is enabled.
    pub fn detect_io(&self) -> bool {
        self.detect_io
    }
}

/// Builder for elaborating a parsed statement sequence.
pub(crate) struct Builder {
    config: ElaborateConfig,
    diagnostics: DiagnosticCollector,
}

impl Builder {
    pub fn new(config: ElaborateConfig) -> Self {
        Self {
            config,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Elaborate the top-level statement sequence into a program.
    pub fn build(mut self, statements: &[types::Statement<'_>]) -> Result<Program, ParseError> {
        let statements = self.sequence(statements);
        self.diagnostics.finish()?;
        Ok(Program::new(statements))
    }

    fn sequence(&mut self, statements: &[types::Statement<'_>]) -> Vec<semantic::Statement> {
        statements
            .iter()
            .filter_map(|statement| self.statement(statement))
            .collect()
    }

    fn statement(&mut self, statement: &types::Statement<'_>) -> Option<semantic::Statement> {
        match statement {
            types::Statement::Assignment(assignment) => Some(self.assignment(assignment)),
            types::Statement::AugAssignment(assignment) => {
                // `x += n` reads as the assignment `x = x + n`
                let target = assignment.target.inner().to_string();
                let value = format!(
                    "{} {} {}",
                    target,
                    assignment.op.as_str(),
                    assignment.value
                );
                Some(semantic::Statement::Assignment(semantic::Assignment {
                    target,
                    value,
                }))
            }
            types::Statement::Expression(expr) => self.expression_statement(expr),
            types::Statement::Conditional(conditional) => {
                Some(semantic::Statement::Conditional(semantic::Conditional {
                    condition: conditional.condition.to_string(),
                    then_branch: self.sequence(&conditional.then_branch),
                    else_branch: self.sequence(&conditional.else_branch),
                }))
            }
        }
    }

    fn assignment(&self, assignment: &types::Assignment<'_>) -> semantic::Statement {
        let target = assignment.target.inner().to_string();

        if self.config.detect_io() && reads_input(&assignment.value) {
            return semantic::Statement::Input(semantic::Input { target });
        }

        semantic::Statement::Assignment(semantic::Assignment {
            target,
            value: assignment.value.to_string(),
        })
    }

    fn expression_statement(&mut self, expr: &types::Expr<'_>) -> Option<semantic::Statement> {
        match expr {
            types::Expr::Call(call) => {
                if self.config.detect_io() && matches!(*call.func.inner(), "print" | "pprint") {
                    let text = call
                        .args
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    Some(semantic::Statement::Output(semantic::Output { text }))
                } else {
                    Some(semantic::Statement::Call(semantic::Call {
                        text: expr.to_string(),
                    }))
                }
            }
            other => {
                self.diagnostics.emit(
                    Diagnostic::error("expression statement is not a call")
                        .with_code(ErrorCode::E300)
                        .with_label(other.span(), "this expression has no effect")
                        .with_help("only calls like `name(...)` may stand alone"),
                );
                None
            }
        }
    }
}

/// Whether an assignment's value reads from standard input.
///
/// Covers `input(...)` directly and a single call wrapping it, treating
/// e.g. `int(input())` as a typecast around the read.
fn reads_input(expr: &types::Expr<'_>) -> bool {
    match expr {
        types::Expr::Call(call) => {
            if *call.func.inner() == "input" {
                return true;
            }
            matches!(
                call.args.first(),
                Some(types::Expr::Call(inner)) if *inner.func.inner() == "input"
            )
        }
        _ => false,
    }
}
