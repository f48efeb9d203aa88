//! Grouping of the token stream into logical lines.
//!
//! Block structure in the source language is carried by indentation, so the
//! parser works line by line: each [`Line`] records its indentation width
//! and the content tokens between two newlines. Blank lines and
//! comment-only lines disappear here; they have no flowchart meaning.

use crate::{
    span::Span,
    tokens::{PositionedToken, Token},
};

/// A single logical line: indentation width plus content tokens.
#[derive(Debug, Clone)]
pub(crate) struct Line<'src> {
    /// Indentation width in characters. Tabs count as one character.
    pub indent: usize,
    /// Content tokens, with whitespace and comments stripped.
    pub tokens: Vec<PositionedToken<'src>>,
    /// Span covering the content tokens.
    pub span: Span,
}

impl<'src> Line<'src> {
    /// The first content token. Lines are never empty.
    pub fn first(&self) -> &PositionedToken<'src> {
        &self.tokens[0]
    }
}

/// Split a token stream into logical lines.
pub(crate) fn logical_lines<'src>(tokens: &[PositionedToken<'src>]) -> Vec<Line<'src>> {
    let mut lines = Vec::new();
    let mut indent = 0;
    let mut at_line_start = true;
    let mut content: Vec<PositionedToken<'src>> = Vec::new();

    let mut flush = |indent: &mut usize, content: &mut Vec<PositionedToken<'src>>| {
        if !content.is_empty() {
            let span = content
                .iter()
                .map(|token| token.span)
                .reduce(|acc, span| acc.union(span))
                .unwrap_or_default();
            lines.push(Line {
                indent: *indent,
                tokens: std::mem::take(content),
                span,
            });
        }
        *indent = 0;
    };

    for token in tokens {
        match token.token {
            Token::Newline => {
                flush(&mut indent, &mut content);
                at_line_start = true;
            }
            Token::Whitespace => {
                if at_line_start {
                    indent = token.span.len();
                    at_line_start = false;
                }
            }
            Token::LineComment(_) => {
                at_line_start = false;
            }
            _ => {
                at_line_start = false;
                content.push(*token);
            }
        }
    }
    flush(&mut indent, &mut content);

    lines
}
