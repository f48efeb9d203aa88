//! AST types produced by the parser.
//!
//! Leaf values (names, literals) are wrapped in [`Spanned`] so diagnostics
//! can point back into the source; composite types derive their spans from
//! their parts. Expressions keep the raw source slices of their leaves and
//! remember explicit parenthesization, so rendering a statement back to text
//! changes nothing but whitespace.

use std::fmt;

use crate::span::{Span, Spanned};

/// A parsed statement, before elaboration.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'src> {
    Assignment(Assignment<'src>),
    AugAssignment(AugAssignment<'src>),
    Expression(Expr<'src>),
    Conditional(Conditional<'src>),
}

/// `target = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'src> {
    pub target: Spanned<&'src str>,
    pub value: Expr<'src>,
}

/// `target op= value`, e.g. `count += 1`
#[derive(Debug, Clone, PartialEq)]
pub struct AugAssignment<'src> {
    pub target: Spanned<&'src str>,
    pub op: BinOp,
    pub value: Expr<'src>,
}

/// `if condition:` with branches; `elif` chains nest in `else_branch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional<'src> {
    pub condition: Expr<'src>,
    pub then_branch: Vec<Statement<'src>>,
    pub else_branch: Vec<Statement<'src>>,
}

/// A call expression: `func(arg, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<'src> {
    pub func: Spanned<&'src str>,
    pub args: Vec<Expr<'src>>,
    /// Span of the whole call including the closing parenthesis.
    pub span: Span,
}

/// An expression.
///
/// `Paren` records parentheses that were present in the source; rendering
/// reproduces exactly those, neither adding nor collapsing any.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'src> {
    Name(Spanned<&'src str>),
    Number(Spanned<&'src str>),
    Str(Spanned<&'src str>),
    Call(Call<'src>),
    Unary {
        op: UnaryOp,
        op_span: Span,
        operand: Box<Expr<'src>>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr<'src>>,
        right: Box<Expr<'src>>,
    },
    Compare {
        first: Box<Expr<'src>>,
        rest: Vec<(CmpOp, Expr<'src>)>,
    },
    Bool {
        op: BoolOp,
        values: Vec<Expr<'src>>,
    },
    Paren {
        inner: Box<Expr<'src>>,
        span: Span,
    },
}

impl Expr<'_> {
    /// The source span this expression covers.
    pub fn span(&self) -> Span {
        match self {
            Expr::Name(spanned) | Expr::Number(spanned) | Expr::Str(spanned) => spanned.span(),
            Expr::Call(call) => call.span,
            Expr::Unary {
                op_span, operand, ..
            } => op_span.union(operand.span()),
            Expr::Binary { left, right, .. } => left.span().union(right.span()),
            Expr::Compare { first, rest } => rest
                .last()
                .map(|(_, last)| first.span().union(last.span()))
                .unwrap_or_else(|| first.span()),
            Expr::Bool { values, .. } => match (values.first(), values.last()) {
                (Some(first), Some(last)) => first.span().union(last.span()),
                _ => Span::default(),
            },
            Expr::Paren { span, .. } => *span,
        }
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::LtEq => "<=",
            CmpOp::GtEq => ">=",
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

// Rendering normalizes whitespace: one space around binary operators and
// after argument commas, none inside parentheses.
impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(name) => write!(f, "{}", name.inner()),
            Expr::Number(text) => write!(f, "{}", text.inner()),
            Expr::Str(text) => write!(f, "{}", text.inner()),
            Expr::Call(call) => {
                write!(f, "{}(", call.func.inner())?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Neg => write!(f, "-{operand}"),
                UnaryOp::Pos => write!(f, "+{operand}"),
                UnaryOp::Not => write!(f, "not {operand}"),
            },
            Expr::Binary { op, left, right } => {
                write!(f, "{left} {} {right}", op.as_str())
            }
            Expr::Compare { first, rest } => {
                write!(f, "{first}")?;
                for (op, operand) in rest {
                    write!(f, " {} {operand}", op.as_str())?;
                }
                Ok(())
            }
            Expr::Bool { op, values } => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.as_str())?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Expr::Paren { inner, .. } => write!(f, "({inner})"),
        }
    }
}
