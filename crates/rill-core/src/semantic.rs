//! Semantic statement model.
//!
//! The parser elaborates source text into a [`Program`]: an ordered sequence
//! of [`Statement`]s in which every expression has already been rendered to
//! its display text. Statements are immutable once built; the flow-graph
//! builder walks them read-only.
//!
//! Conditionals own their branches directly, so the statement tree nests
//! strictly downward and contains no cycles.

use std::fmt;

/// A parsed program: the ordered top-level statement sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    statements: Vec<Statement>,
}

impl Program {
    /// Create a program from its top-level statements.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// The top-level statements in source order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Whether the program contains no statements at all.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A single statement.
///
/// Every variant carries the display text derived from its source
/// expression; branches of a [`Conditional`] are themselves statement
/// sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name = expr`
    Assignment(Assignment),
    /// `name = input(...)`, recognized only when I/O detection is enabled.
    Input(Input),
    /// `print(...)` / `pprint(...)`, recognized only when I/O detection is
    /// enabled.
    Output(Output),
    /// A bare call statement.
    Call(Call),
    /// `if expr:` with optional `else:` block.
    Conditional(Conditional),
}

impl Statement {
    /// The label this statement contributes to its diagram box.
    pub fn label(&self) -> String {
        match self {
            Statement::Assignment(assignment) => assignment.to_string(),
            Statement::Input(input) => input.to_string(),
            Statement::Output(output) => output.to_string(),
            Statement::Call(call) => call.to_string(),
            Statement::Conditional(conditional) => conditional.condition.clone(),
        }
    }
}

/// An assignment statement: target name and rendered value expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub value: String,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

/// A value read from the outside world into a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub target: String,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input {}", self.target)
    }
}

/// A value written to the outside world.
///
/// `text` is the rendered argument list of the originating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "output {}", self.text)
    }
}

/// A bare call statement, rendered as `name(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub text: String,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A conditional statement with its two branches.
///
/// Either branch may be empty; an absent `else:` block is simply an empty
/// `else_branch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub condition: String,
    pub then_branch: Vec<Statement>,
    pub else_branch: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_labels() {
        let assignment = Statement::Assignment(Assignment {
            target: "x".to_string(),
            value: "1".to_string(),
        });
        assert_eq!(assignment.label(), "x = 1");

        let input = Statement::Input(Input {
            target: "name".to_string(),
        });
        assert_eq!(input.label(), "input name");

        let output = Statement::Output(Output {
            text: "a, b".to_string(),
        });
        assert_eq!(output.label(), "output a, b");

        let call = Statement::Call(Call {
            text: "run(1, 2)".to_string(),
        });
        assert_eq!(call.label(), "run(1, 2)");
    }

    #[test]
    fn test_conditional_label_is_condition() {
        let conditional = Statement::Conditional(Conditional {
            condition: "x > 0".to_string(),
            then_branch: vec![],
            else_branch: vec![],
        });
        assert_eq!(conditional.label(), "x > 0");
    }

    #[test]
    fn test_empty_program() {
        let program = Program::default();
        assert!(program.is_empty());
        assert!(program.statements().is_empty());
    }
}
