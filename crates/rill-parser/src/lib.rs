//! # Rill Parser
//!
//! Parser for the rill script subset: straight-line statements and
//! `if`/`else` conditionals in an indentation-structured, Python-style
//! syntax. This crate provides the parsing pipeline from source text to the
//! semantic statement model in [`rill_core::semantic`].
//!
//! ## Usage
//!
//! ```
//! # use rill_parser::{parse, ElaborateConfig};
//! # use rill_parser::error::ParseError;
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "\
//! x = 1
//! if x > 0:
//!     y = 2
//! else:
//!     y = 3
//! print(y)
//! ";
//!
//!     let program = parse(source, ElaborateConfig::default())?;
//!     assert_eq!(program.statements().len(), 3);
//!     Ok(())
//! }
//! ```

pub mod error;

mod elaborate;
mod lexer;
mod lines;
mod parser;
#[cfg(test)]
mod parser_tests;
mod parser_types;
mod span;
mod tokens;

pub use elaborate::ElaborateConfig;
pub use span::{Span, Spanned};

use rill_core::semantic::Program;

use crate::error::ParseError;

/// Parse source text into a semantic program.
///
/// This is the main entry point for parsing script source. It orchestrates
/// the complete parsing pipeline:
///
/// 1. **Tokenize** - Convert source text to positioned tokens
/// 2. **Group** - Split the token stream into logical lines
/// 3. **Parse** - Build the AST, driven by line indentation
/// 4. **Elaborate** - Render statement text and produce the semantic model
///
/// # Arguments
///
/// * `source` - The script source code to parse
/// * `config` - Configuration for the elaboration phase (I/O detection)
///
/// # Returns
///
/// Returns the parsed [`Program`] on success, or a [`ParseError`] carrying
/// every diagnostic collected across the pipeline on failure.
///
/// # Example
///
/// ```
/// # use rill_parser::{parse, ElaborateConfig};
///
/// let program = parse("x = 1", ElaborateConfig::default()).unwrap();
/// assert_eq!(program.statements().len(), 1);
/// ```
pub fn parse(source: &str, config: ElaborateConfig) -> Result<Program, ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Group into logical lines
    let lines = lines::logical_lines(&tokens);

    // Step 3: Parse
    let ast = parser::parse_program(&lines)?;

    // Step 4: Elaborate
    let builder = elaborate::Builder::new(config);
    builder.build(&ast)
}
