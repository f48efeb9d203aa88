//! Parser for script tokens.
//!
//! This module transforms the token stream into the parsed AST defined in
//! [`parser_types`](super::parser_types). Block structure is driven by a
//! cursor over logical lines (indentation opens and closes blocks); within a
//! line, statements and expressions are parsed with winnow over a token
//! slice. The public entry point is [`parse_program`].

use winnow::{
    Parser as _,
    combinator::{alt, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lines::Line,
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate the failing token index as:
    /// `tokens.len() - start_offset_value`
    StartOffset(usize),
    /// Error code for a construct-specific diagnostic
    Code(ErrorCode),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Run `f`, converting a backtrack failure into a committed error that
/// records where parsing stopped.
fn cut_with_offset<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Helper to create a Cut error carrying an error code at the current
/// position.
fn cut_error_with_code(input: &Input<'_>, code: ErrorCode) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Code(code));
    e.push(Context::StartOffset(input.eof_offset()));
    ErrMode::Cut(e)
}

/// Parse a single expected token, returning it with its span.
fn token<'src>(
    expected: Token<'static>,
) -> impl FnMut(&mut Input<'src>) -> IResult<PositionedToken<'src>> {
    move |input: &mut Input<'src>| {
        any.verify(move |t: &PositionedToken<'src>| t.token == expected)
            .map(|t: &PositionedToken<'src>| *t)
            .parse_next(input)
    }
}

/// Parse an identifier with span preservation.
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::Identifier(name) => Some(Spanned::new(name, t.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

// =========================================================================
// Expressions
//
// Precedence, loosest first: `or`, `and`, `not`, comparisons, `+`/`-`,
// `*`/`/`, unary sign, atoms. Comparison chains like `a < b < c` stay one
// node, matching how they read.
// =========================================================================

fn expression<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    or_expr(input)
}

fn join_bool<'src>(
    op: types::BoolOp,
    first: types::Expr<'src>,
    rest: Vec<types::Expr<'src>>,
) -> types::Expr<'src> {
    if rest.is_empty() {
        first
    } else {
        let mut values = Vec::with_capacity(rest.len() + 1);
        values.push(first);
        values.extend(rest);
        types::Expr::Bool { op, values }
    }
}

fn or_expr<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let first = and_expr.parse_next(input)?;
    let rest: Vec<types::Expr<'src>> =
        repeat(0.., preceded(token(Token::Or), and_expr)).parse_next(input)?;
    Ok(join_bool(types::BoolOp::Or, first, rest))
}

fn and_expr<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let first = not_expr.parse_next(input)?;
    let rest: Vec<types::Expr<'src>> =
        repeat(0.., preceded(token(Token::And), not_expr)).parse_next(input)?;
    Ok(join_bool(types::BoolOp::And, first, rest))
}

fn not_expr<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    alt((
        (token(Token::Not), not_expr).map(|(not_token, operand)| types::Expr::Unary {
            op: types::UnaryOp::Not,
            op_span: not_token.span,
            operand: Box::new(operand),
        }),
        comparison,
    ))
    .parse_next(input)
}

fn cmp_op<'src>(input: &mut Input<'src>) -> IResult<types::CmpOp> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::EqEq => Some(types::CmpOp::Eq),
        Token::NotEq => Some(types::CmpOp::NotEq),
        Token::LtEq => Some(types::CmpOp::LtEq),
        Token::GtEq => Some(types::CmpOp::GtEq),
        Token::Lt => Some(types::CmpOp::Lt),
        Token::Gt => Some(types::CmpOp::Gt),
        _ => None,
    })
    .parse_next(input)
}

fn comparison<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let first = arith.parse_next(input)?;
    let rest: Vec<(types::CmpOp, types::Expr<'src>)> =
        repeat(0.., (cmp_op, arith)).parse_next(input)?;
    if rest.is_empty() {
        Ok(first)
    } else {
        Ok(types::Expr::Compare {
            first: Box::new(first),
            rest,
        })
    }
}

fn add_op<'src>(input: &mut Input<'src>) -> IResult<types::BinOp> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::Plus => Some(types::BinOp::Add),
        Token::Minus => Some(types::BinOp::Sub),
        _ => None,
    })
    .parse_next(input)
}

fn mul_op<'src>(input: &mut Input<'src>) -> IResult<types::BinOp> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::Star => Some(types::BinOp::Mul),
        Token::Slash => Some(types::BinOp::Div),
        _ => None,
    })
    .parse_next(input)
}

fn fold_binary<'src>(
    first: types::Expr<'src>,
    rest: Vec<(types::BinOp, types::Expr<'src>)>,
) -> types::Expr<'src> {
    rest.into_iter()
        .fold(first, |left, (op, right)| types::Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
}

fn arith<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let first = term.parse_next(input)?;
    let rest: Vec<(types::BinOp, types::Expr<'src>)> =
        repeat(0.., (add_op, term)).parse_next(input)?;
    Ok(fold_binary(first, rest))
}

fn term<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let first = unary.parse_next(input)?;
    let rest: Vec<(types::BinOp, types::Expr<'src>)> =
        repeat(0.., (mul_op, unary)).parse_next(input)?;
    Ok(fold_binary(first, rest))
}

fn sign_op<'src>(input: &mut Input<'src>) -> IResult<(types::UnaryOp, Span)> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::Minus => Some((types::UnaryOp::Neg, t.span)),
        Token::Plus => Some((types::UnaryOp::Pos, t.span)),
        _ => None,
    })
    .parse_next(input)
}

fn unary<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    alt((
        (sign_op, unary).map(|((op, op_span), operand)| types::Expr::Unary {
            op,
            op_span,
            operand: Box::new(operand),
        }),
        postfix,
    ))
    .parse_next(input)
}

/// Parse an atom and reject unsupported postfix syntax (`.` and `[...]`).
fn postfix<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let expr = atom.parse_next(input)?;

    let checkpoint = input.checkpoint();
    let has_postfix = any::<_, ErrMode<ContextError>>
        .verify(|t: &PositionedToken<'src>| matches!(t.token, Token::Dot | Token::LeftBracket))
        .parse_next(input)
        .is_ok();
    input.reset(&checkpoint);

    if has_postfix {
        return Err(cut_error_with_code(input, ErrorCode::E206));
    }
    Ok(expr)
}

fn number<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::Number(text) => Some(types::Expr::Number(Spanned::new(text, t.span))),
        _ => None,
    })
    .parse_next(input)
}

fn string<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::Str(text) => Some(types::Expr::Str(Spanned::new(text, t.span))),
        _ => None,
    })
    .parse_next(input)
}

/// Parse a name or a call: `name` or `name(arg, ...)`.
fn call_or_name<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let name = identifier.parse_next(input)?;

    let checkpoint = input.checkpoint();
    if token(Token::LeftParen).parse_next(input).is_ok() {
        let args: Vec<types::Expr<'src>> =
            separated(0.., expression, token(Token::Comma)).parse_next(input)?;
        let close = cut_with_offset(input, |input| token(Token::RightParen).parse_next(input))?;
        return Ok(types::Expr::Call(types::Call {
            func: name,
            args,
            span: name.span().union(close.span),
        }));
    }
    input.reset(&checkpoint);

    Ok(types::Expr::Name(name))
}

fn paren_expr<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let open = token(Token::LeftParen).parse_next(input)?;
    let inner = cut_with_offset(input, expression)?;
    let close = cut_with_offset(input, |input| token(Token::RightParen).parse_next(input))?;
    Ok(types::Expr::Paren {
        inner: Box::new(inner),
        span: open.span.union(close.span),
    })
}

fn atom<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    // A list literal would start here; give it its own diagnostic instead of
    // a generic unexpected-token error.
    let checkpoint = input.checkpoint();
    let is_list = token(Token::LeftBracket).parse_next(input).is_ok();
    input.reset(&checkpoint);
    if is_list {
        return Err(cut_error_with_code(input, ErrorCode::E205));
    }

    alt((call_or_name, number, string, paren_expr))
        .context(Context::Label("expression"))
        .parse_next(input)
}

// =========================================================================
// Statements
// =========================================================================

fn assignment<'src>(input: &mut Input<'src>) -> IResult<types::Statement<'src>> {
    let target = identifier.parse_next(input)?;
    token(Token::Equals).parse_next(input)?;
    let value = cut_with_offset(input, expression)?;
    Ok(types::Statement::Assignment(types::Assignment {
        target,
        value,
    }))
}

fn aug_op<'src>(input: &mut Input<'src>) -> IResult<types::BinOp> {
    any.verify_map(|t: &PositionedToken<'src>| match t.token {
        Token::PlusEquals => Some(types::BinOp::Add),
        Token::MinusEquals => Some(types::BinOp::Sub),
        Token::StarEquals => Some(types::BinOp::Mul),
        Token::SlashEquals => Some(types::BinOp::Div),
        _ => None,
    })
    .parse_next(input)
}

fn aug_assignment<'src>(input: &mut Input<'src>) -> IResult<types::Statement<'src>> {
    let target = identifier.parse_next(input)?;
    let op = aug_op.parse_next(input)?;
    let value = cut_with_offset(input, expression)?;
    Ok(types::Statement::AugAssignment(types::AugAssignment {
        target,
        op,
        value,
    }))
}

fn simple_statement<'src>(input: &mut Input<'src>) -> IResult<types::Statement<'src>> {
    alt((
        assignment,
        aug_assignment,
        expression.map(types::Statement::Expression),
    ))
    .parse_next(input)
}

/// Parse the remainder of an `if`/`elif` header: the condition and the
/// trailing `:`.
fn conditional_header<'src>(input: &mut Input<'src>) -> IResult<types::Expr<'src>> {
    let condition = cut_with_offset(input, expression)?;
    if token(Token::Colon).parse_next(input).is_err() {
        return Err(cut_error_with_code(input, ErrorCode::E102));
    }
    Ok(condition)
}

// =========================================================================
// Block structure
// =========================================================================

/// Line-cursor parser that assembles statements from logical lines.
struct BlockParser<'src> {
    lines: &'src [Line<'src>],
    pos: usize,
    diagnostics: DiagnosticCollector,
}

impl<'src> BlockParser<'src> {
    fn new(lines: &'src [Line<'src>]) -> Self {
        Self {
            lines,
            pos: 0,
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn peek(&self) -> Option<&'src Line<'src>> {
        self.lines.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Skip any lines indented deeper than `indent` (the body hanging off a
    /// line that was rejected).
    fn skip_block_under(&mut self, indent: usize) {
        while let Some(line) = self.peek() {
            if line.indent > indent {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse consecutive statements at exactly `indent`.
    ///
    /// Stops at a dedent or at an `else`/`elif` line, which belongs to the
    /// caller.
    fn block(&mut self, indent: usize) -> Vec<types::Statement<'src>> {
        let mut statements = Vec::new();

        while let Some(line) = self.peek() {
            if line.indent < indent {
                break;
            }
            if matches!(line.first().token, Token::Else | Token::Elif) {
                break;
            }
            if line.indent > indent {
                self.diagnostics.emit(
                    Diagnostic::error("unexpected indentation")
                        .with_code(ErrorCode::E103)
                        .with_label(line.span, "this line is indented too deep")
                        .with_help("align the line with its enclosing block"),
                );
                self.advance();
                continue;
            }

            if let Some(statement) = self.statement(line) {
                statements.push(statement);
            }
        }

        statements
    }

    /// Parse the statement starting at `line`, which the cursor still points
    /// at. Returns `None` for skipped lines and errors.
    fn statement(&mut self, line: &'src Line<'src>) -> Option<types::Statement<'src>> {
        match line.first().token {
            Token::If => self
                .conditional(line)
                .map(types::Statement::Conditional),
            Token::For | Token::While | Token::Def | Token::Class | Token::Return => {
                self.unsupported(line);
                self.advance();
                self.skip_block_under(line.indent);
                None
            }
            Token::Import | Token::From => {
                // Imports carry no flowchart meaning
                log::debug!("skipping import line");
                self.advance();
                None
            }
            _ => self.simple(line),
        }
    }

    /// Parse a one-line statement with the winnow grammar.
    fn simple(&mut self, line: &'src Line<'src>) -> Option<types::Statement<'src>> {
        self.advance();

        let mut input = TokenSlice::new(&line.tokens);
        match simple_statement(&mut input) {
            Ok(statement) if self.check_line_consumed(&line.tokens, &input) => Some(statement),
            Ok(_) => None,
            Err(err) => {
                self.emit_winnow_error(&line.tokens, line.span, err);
                None
            }
        }
    }

    /// Parse `if cond:` (or `elif cond:`) with its branches.
    fn conditional(&mut self, line: &'src Line<'src>) -> Option<types::Conditional<'src>> {
        self.advance();

        let header_tokens = &line.tokens[1..];
        let mut input = TokenSlice::new(header_tokens);
        let condition = match conditional_header(&mut input) {
            Ok(condition) if self.check_line_consumed(header_tokens, &input) => condition,
            Ok(_) => {
                self.skip_block_under(line.indent);
                return None;
            }
            Err(err) => {
                self.emit_winnow_error(header_tokens, line.span, err);
                self.skip_block_under(line.indent);
                return None;
            }
        };

        let then_branch = self.indented_block(line, "if");
        let mut else_branch = Vec::new();
        let mut else_span = None;

        if let Some(next) = self.peek() {
            if next.indent == line.indent {
                match next.first().token {
                    Token::Elif => {
                        // `elif` is sugar for an `else:` holding a single
                        // nested conditional
                        if let Some(nested) = self.conditional(next) {
                            else_branch.push(types::Statement::Conditional(nested));
                        }
                        return Some(types::Conditional {
                            condition,
                            then_branch,
                            else_branch,
                        });
                    }
                    Token::Else => {
                        else_span = Some(next.span);
                        self.else_header(next);
                        else_branch = self.indented_block(next, "else");
                    }
                    _ => {}
                }
            }
        }

        // A second `else:` at the same indent has nothing left to attach to
        if let (Some(first_else), Some(next)) = (else_span, self.peek()) {
            if next.indent == line.indent && next.first().token == Token::Else {
                self.diagnostics.emit(
                    Diagnostic::error("duplicate `else` branch")
                        .with_code(ErrorCode::E106)
                        .with_label(next.span, "second `else` here")
                        .with_secondary_label(first_else, "first `else` is here"),
                );
                self.advance();
                self.skip_block_under(next.indent);
            }
        }

        Some(types::Conditional {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// Consume an `else:` line, checking its shape.
    fn else_header(&mut self, line: &'src Line<'src>) {
        self.advance();

        match line.tokens.get(1).map(|t| t.token) {
            Some(Token::Colon) => {
                if let Some(extra) = line.tokens.get(2) {
                    self.diagnostics.emit(
                        Diagnostic::error(format!("unexpected token `{}`", extra))
                            .with_code(ErrorCode::E100)
                            .with_label(extra.span, "expected end of line"),
                    );
                }
            }
            _ => {
                self.diagnostics.emit(
                    Diagnostic::error("missing `:` after `else`")
                        .with_code(ErrorCode::E102)
                        .with_label(line.span, "write this as `else:`"),
                );
            }
        }
    }

    /// Parse the indented block belonging to a header line.
    ///
    /// Emits E105 and yields an empty branch when no block follows, so
    /// parsing can continue and report further errors.
    fn indented_block(
        &mut self,
        header: &'src Line<'src>,
        kind: &str,
    ) -> Vec<types::Statement<'src>> {
        match self.peek() {
            Some(line) if line.indent > header.indent => {
                let child_indent = line.indent;
                self.block(child_indent)
            }
            _ => {
                self.diagnostics.emit(
                    Diagnostic::error("missing indented block")
                        .with_code(ErrorCode::E105)
                        .with_label(
                            header.span,
                            format!("this `{kind}` has no indented statements under it"),
                        )
                        .with_help("indent at least one statement under this line"),
                );
                Vec::new()
            }
        }
    }

    /// Report an unsupported construct by its keyword.
    fn unsupported(&mut self, line: &Line<'src>) {
        let token = line.first();
        let (code, message) = match token.token {
            Token::For => (ErrorCode::E200, "`for` loops are not supported"),
            Token::While => (ErrorCode::E201, "`while` loops are not supported"),
            Token::Def => (ErrorCode::E202, "function definitions are not supported"),
            Token::Class => (ErrorCode::E203, "class definitions are not supported"),
            Token::Return => (ErrorCode::E204, "`return` statements are not supported"),
            _ => unreachable!("caller only passes unsupported keywords"),
        };
        self.diagnostics.emit(
            Diagnostic::error(message)
                .with_code(code)
                .with_label(token.span, code.description())
                .with_help("only assignments, calls, and if/else conditionals are supported"),
        );
    }

    /// Report a stray `else`/`elif` at the top of a block.
    fn stray_else(&mut self, line: &Line<'src>) {
        let message = match line.first().token {
            Token::Elif => "`elif` without matching `if`",
            _ => "`else` without matching `if`",
        };
        self.diagnostics.emit(
            Diagnostic::error(message)
                .with_code(ErrorCode::E104)
                .with_label(line.span, "no `if` precedes this line"),
        );
    }

    /// Check that a winnow parse consumed the whole line; report any
    /// leftover token.
    fn check_line_consumed(
        &mut self,
        tokens: &[PositionedToken<'src>],
        input: &Input<'src>,
    ) -> bool {
        let remaining = input.eof_offset();
        if remaining == 0 {
            return true;
        }

        let leftover = &tokens[tokens.len() - remaining];
        self.diagnostics.emit(
            Diagnostic::error(format!("unexpected token `{}`", leftover))
                .with_code(ErrorCode::E100)
                .with_label(leftover.span, "expected end of line"),
        );
        false
    }

    /// Convert a winnow error on `tokens` into a diagnostic.
    fn emit_winnow_error(
        &mut self,
        tokens: &[PositionedToken<'src>],
        line_span: Span,
        err: ErrMode<ContextError<Context>>,
    ) {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        let mut code = None;
        let mut start_offset = None;
        let mut label = None;
        for context in context_error.context() {
            match context {
                Context::Code(c) if code.is_none() => code = Some(*c),
                Context::StartOffset(offset) if start_offset.is_none() => {
                    start_offset = Some(*offset)
                }
                Context::Label(l) if label.is_none() => label = Some(*l),
                _ => {}
            }
        }

        // Construct-specific diagnostics carry their own code
        if let Some(code) = code {
            let span = start_offset
                .map(|remaining| tokens.len().saturating_sub(remaining))
                .and_then(|idx| tokens.get(idx))
                .map(|t| t.span)
                .unwrap_or(line_span);
            let message = match code {
                ErrorCode::E102 => "missing `:` after condition",
                ErrorCode::E205 => "list literals are not supported",
                ErrorCode::E206 => "subscripts and attribute access are not supported",
                _ => code.description(),
            };
            let mut diag = Diagnostic::error(message)
                .with_code(code)
                .with_label(span, code.description());
            if code == ErrorCode::E102 {
                diag = diag.with_help("add `:` at the end of the line");
            }
            self.diagnostics.emit(diag);
            return;
        }

        match start_offset.map(|remaining| tokens.len().saturating_sub(remaining)) {
            Some(idx) if idx < tokens.len() => {
                let token = &tokens[idx];
                let mut diag = Diagnostic::error(format!("unexpected token `{}`", token))
                    .with_code(ErrorCode::E100)
                    .with_label(token.span, "here");
                if let Some(label) = label {
                    diag = diag.with_help(format!("expected {label}"));
                }
                self.diagnostics.emit(diag);
            }
            Some(_) => {
                self.diagnostics.emit(
                    Diagnostic::error("line ends unexpectedly")
                        .with_code(ErrorCode::E101)
                        .with_label(line_span, "statement is incomplete")
                        .with_help("complete the statement on this line"),
                );
            }
            None => {
                let token = &tokens[0];
                self.diagnostics.emit(
                    Diagnostic::error(format!("unexpected token `{}`", token))
                        .with_code(ErrorCode::E100)
                        .with_label(token.span, "a statement cannot start here"),
                );
            }
        }
    }
}

/// Parse logical lines into the top-level statement sequence.
///
/// Collects as many diagnostics as possible in one pass; returns `Err` with
/// all of them if any error was emitted.
pub(crate) fn parse_program<'src>(
    lines: &'src [Line<'src>],
) -> Result<Vec<types::Statement<'src>>, ParseError> {
    let mut parser = BlockParser::new(lines);

    let mut statements = parser.block(0);
    // Only a stray `else`/`elif` can stall the top-level block
    while let Some(line) = parser.peek() {
        parser.stray_else(line);
        parser.advance();
        parser.skip_block_under(line.indent);
        statements.extend(parser.block(0));
    }

    parser.diagnostics.finish()?;
    Ok(statements)
}
