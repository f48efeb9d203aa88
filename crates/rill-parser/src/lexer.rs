//! Lexical analyzer for script source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! It handles whitespace, `#` comments, string and number literals, and all
//! language tokens defined in the [`tokens`](super::tokens) module. String
//! and number literals keep their raw source slice so statement text can be
//! reproduced verbatim.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()` to provide detailed error
/// messages with codes, help text, and precise span information.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Parse a quoted string body after determining the quote character.
///
/// Backslash escapes are consumed pairwise but otherwise left alone; the
/// caller captures the raw slice, quotes and escapes included. Strings may
/// not span lines.
fn quoted_string<'a>(input: &mut Input<'a>, quote: char) -> IResult<'a, ()> {
    let start_pos = input.current_token_start();

    quote.void().parse_next(input)?;

    let string_char = alt((
        preceded('\\', any).void(),
        none_of(['\\', '\n', '\r', quote]).void(),
    ));

    cut_err(terminated(repeat::<_, _, (), _, _>(0.., string_char), quote))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add a closing quote on the same line"),
            start: start_pos,
        })
        .void()
        .parse_next(input)
}

/// Parse a complete string literal, single or double quoted.
///
/// The token keeps the raw source slice including its quotes.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        (|input: &mut Input<'a>| quoted_string(input, '"')).take(),
        (|input: &mut Input<'a>| quoted_string(input, '\'')).take(),
    ))
    .map(Token::Str)
    .parse_next(input)
}

/// Parse a number literal: digits with an optional fractional part.
///
/// The token keeps the raw source slice.
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(preceded('.', take_while(1.., |c: char| c.is_ascii_digit()))),
        // Ensure the number is not glued to an identifier like `1x`
        peek(not(one_of(|c: char| c.is_alphanumeric() || c == '_'))),
    )
        .take()
        .map(Token::Number)
        .parse_next(input)
}

/// Parse line comment starting with '#'.
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded('#', take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse keywords with word boundary checking.
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((
            alt((
                literal("if"),
                literal("elif"),
                literal("else"),
                literal("and"),
                literal("or"),
                literal("not"),
                literal("for"),
            )),
            alt((
                literal("while"),
                literal("def"),
                literal("class"),
                literal("return"),
                literal("import"),
                literal("from"),
            )),
        )),
        // Ensure keyword is not followed by identifier character (word boundary)
        peek(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_'))),
    )
    .map(|keyword: &str| match keyword {
        "if" => Token::If,
        "elif" => Token::Elif,
        "else" => Token::Else,
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "for" => Token::For,
        "while" => Token::While,
        "def" => Token::Def,
        "class" => Token::Class,
        "return" => Token::Return,
        "import" => Token::Import,
        "from" => Token::From,
        _ => unreachable!(),
    })
    .parse_next(input)
}

/// Parse identifiers.
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    // Start with letter or underscore, followed by alphanumeric or underscore
    take_while(1.., |c: char| {
        c.is_ascii_alphabetic() || c == '_' || c.is_ascii_digit()
    })
    .verify(|s: &str| {
        s.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    })
    .map(Token::Identifier)
    .parse_next(input)
}

/// Parse multi-character operators (order matters - longest first).
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("==").value(Token::EqEq),
        literal("!=").value(Token::NotEq),
        literal("<=").value(Token::LtEq),
        literal(">=").value(Token::GtEq),
        literal("+=").value(Token::PlusEquals),
        literal("-=").value(Token::MinusEquals),
        literal("*=").value(Token::StarEquals),
        literal("/=").value(Token::SlashEquals),
    ))
    .parse_next(input)
}

/// Parse single character tokens.
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        alt((
            '+'.value(Token::Plus),
            '-'.value(Token::Minus),
            '*'.value(Token::Star),
            '/'.value(Token::Slash),
            '<'.value(Token::Lt),
            '>'.value(Token::Gt),
            '='.value(Token::Equals),
        )),
        alt((
            '('.value(Token::LeftParen),
            ')'.value(Token::RightParen),
            '['.value(Token::LeftBracket),
            ']'.value(Token::RightBracket),
            ','.value(Token::Comma),
            ':'.value(Token::Colon),
            '.'.value(Token::Dot),
        )),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, carriage returns, but not newlines).
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline.
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking.
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,
        string_literal,      // Must come before single char tokens
        multi_char_operator, // Must come before single char operators
        keyword,             // Must come before identifier
        number_literal,
        identifier,
        single_char_token,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => {
                    self.tokens.push(token);
                }
                Err(e) => {
                    // Get position before recovery
                    let error_pos = input.current_token_start();

                    let diagnostic = Self::convert_err_mode(e, error_pos);
                    self.diagnostics.emit(diagnostic);

                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Extracts `LexerDiagnostic` from the error context for rich error info
    /// with code, message, and help. Falls back to E002 (unexpected
    /// character) if no diagnostic context is found.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        // Use the first diagnostic context if available
        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        // Fallback when no context is present
        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Parse tokens from a string input, collecting multiple errors.
///
/// Attempts to recover from errors and continue tokenizing, collecting
/// all errors encountered. This provides better user experience by
/// reporting multiple issues in a single pass.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully parsed
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input);
    lexer.finish()
}
