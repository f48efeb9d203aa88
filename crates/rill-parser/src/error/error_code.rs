//! Error codes for the rill diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Unsupported constructs
//! - `E3xx` - Elaboration errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed on the same line.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that is not valid in this context.
    E002,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Incomplete line.
    ///
    /// The line ended before a complete statement was parsed.
    E101,

    /// Missing `:` after a condition.
    E102,

    /// Unexpected indentation.
    ///
    /// A line is indented deeper than its enclosing block allows.
    E103,

    /// `else` or `elif` without a matching `if`.
    E104,

    /// Missing indented block.
    ///
    /// An `if ...:` or `else:` header has no indented statements under it.
    E105,

    /// Duplicate `else` branch.
    ///
    /// A conditional already has an `else:` block.
    E106,

    // =========================================================================
    // Unsupported Constructs (E2xx)
    // =========================================================================
    /// `for` loop.
    E200,

    /// `while` loop.
    E201,

    /// Function definition.
    E202,

    /// Class definition.
    E203,

    /// Return statement.
    E204,

    /// List literal.
    E205,

    /// Subscript or attribute access.
    E206,

    // =========================================================================
    // Elaboration Errors (E3xx)
    // =========================================================================
    /// Bare expression statement that is not a call.
    ///
    /// Only calls may stand alone as statements; other expressions have no
    /// effect and no flowchart representation.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            // Unsupported constructs
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            // Elaboration errors
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete line",
            ErrorCode::E102 => "missing `:` after condition",
            ErrorCode::E103 => "unexpected indentation",
            ErrorCode::E104 => "`else` without matching `if`",
            ErrorCode::E105 => "missing indented block",
            ErrorCode::E106 => "duplicate `else` branch",
            // Unsupported constructs
            ErrorCode::E200 => "for loop is not supported",
            ErrorCode::E201 => "while loop is not supported",
            ErrorCode::E202 => "function definition is not supported",
            ErrorCode::E203 => "class definition is not supported",
            ErrorCode::E204 => "return statement is not supported",
            ErrorCode::E205 => "list literal is not supported",
            ErrorCode::E206 => "subscript or attribute access is not supported",
            // Elaboration errors
            ErrorCode::E300 => "expression statement is not a call",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
