//! Unit tests for the parsing pipeline.
//!
//! These tests drive the full pipeline from source text to the semantic
//! program, verifying statement structure, text rendering, diagnostics,
//! and the I/O detection switch.

use rill_core::semantic::{Program, Statement};

use crate::{ElaborateConfig, error::ErrorCode, error::ParseError, parse};

/// Helper to parse a source string with default configuration.
fn parse_source(source: &str) -> Result<Program, ParseError> {
    parse(source, ElaborateConfig::default())
}

/// Helper to parse a source string and assert success.
fn assert_parses(source: &str) -> Program {
    match parse_source(source) {
        Ok(program) => program,
        Err(e) => panic!("Expected parsing to succeed, but got error: {}", e),
    }
}

/// Helper to parse a source string and return the first error code.
fn first_error_code(source: &str) -> ErrorCode {
    match parse_source(source) {
        Ok(_) => panic!("Expected parsing to fail, but it succeeded"),
        Err(e) => e.diagnostics()[0]
            .code()
            .expect("diagnostic should carry a code"),
    }
}

/// Top-level labels of a program.
fn labels(program: &Program) -> Vec<String> {
    program
        .statements()
        .iter()
        .map(Statement::label)
        .collect()
}

mod statements {
    use super::*;

    #[test]
    fn test_empty_input() {
        let program = assert_parses("");
        assert!(program.is_empty());
    }

    #[test]
    fn test_blank_lines_and_comments_only() {
        let program = assert_parses("\n\n# nothing here\n   \n");
        assert!(program.is_empty());
    }

    #[test]
    fn test_single_assignment() {
        let program = assert_parses("x = 1\n");
        assert_eq!(labels(&program), vec!["x = 1"]);
    }

    #[test]
    fn test_straight_line_sequence() {
        let program = assert_parses("x = 1\ny = x + 2\nrun(y)\n");
        assert_eq!(labels(&program), vec!["x = 1", "y = x + 2", "run(y)"]);
    }

    #[test]
    fn test_call_statement() {
        let program = assert_parses("setup(1, 2)\n");
        match &program.statements()[0] {
            Statement::Call(call) => assert_eq!(call.text, "setup(1, 2)"),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_final_newline() {
        let program = assert_parses("x = 1");
        assert_eq!(labels(&program), vec!["x = 1"]);
    }

    #[test]
    fn test_augmented_assignment_desugars() {
        let program = assert_parses("count += 1\n");
        assert_eq!(labels(&program), vec!["count = count + 1"]);
    }

    #[test]
    fn test_augmented_assignment_operators() {
        let program = assert_parses("a -= 2\nb *= 3\nc /= 4\n");
        assert_eq!(
            labels(&program),
            vec!["a = a - 2", "b = b * 3", "c = c / 4"]
        );
    }

    #[test]
    fn test_import_lines_are_skipped() {
        let program = assert_parses("import math\nfrom math import sqrt\nx = 1\n");
        assert_eq!(labels(&program), vec!["x = 1"]);
    }
}

mod expressions {
    use super::*;

    #[test]
    fn test_whitespace_is_normalized() {
        let program = assert_parses("x=1+2\ny =  x  *  3\n");
        assert_eq!(labels(&program), vec!["x = 1 + 2", "y = x * 3"]);
    }

    #[test]
    fn test_call_argument_spacing() {
        let program = assert_parses("f( 1 ,2,  3 )\n");
        assert_eq!(labels(&program), vec!["f(1, 2, 3)"]);
    }

    #[test]
    fn test_source_parens_are_preserved() {
        let program = assert_parses("y = (a + b) * c\n");
        assert_eq!(labels(&program), vec!["y = (a + b) * c"]);
    }

    #[test]
    fn test_parens_are_not_invented_or_collapsed() {
        let program = assert_parses("y = ((a))\nz = a + b * c\n");
        assert_eq!(labels(&program), vec!["y = ((a))", "z = a + b * c"]);
    }

    #[test]
    fn test_string_literals_kept_verbatim() {
        let program = assert_parses("msg = \"hello, world\"\nname = 'bob'\n");
        assert_eq!(
            labels(&program),
            vec!["msg = \"hello, world\"", "name = 'bob'"]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        let program = assert_parses(r#"msg = "say \"hi\"""#);
        assert_eq!(labels(&program), vec![r#"msg = "say \"hi\"""#]);
    }

    #[test]
    fn test_number_literals_kept_verbatim() {
        let program = assert_parses("pi = 3.14\nn = 042\n");
        assert_eq!(labels(&program), vec!["pi = 3.14", "n = 042"]);
    }

    #[test]
    fn test_boolean_operators() {
        let program = assert_parses("ok = a and b or c\n");
        assert_eq!(labels(&program), vec!["ok = a and b or c"]);
    }

    #[test]
    fn test_comparison_chain() {
        let program = assert_parses("ok = 0 < x < 10\n");
        assert_eq!(labels(&program), vec!["ok = 0 < x < 10"]);
    }

    #[test]
    fn test_unary_operators() {
        let program = assert_parses("a = -1\nb = not done\n");
        assert_eq!(labels(&program), vec!["a = -1", "b = not done"]);
    }

    #[test]
    fn test_nested_calls() {
        let program = assert_parses("x = f(g(1), h(2, 3))\n");
        assert_eq!(labels(&program), vec!["x = f(g(1), h(2, 3))"]);
    }
}

mod conditionals {
    use super::*;

    fn conditional(statement: &Statement) -> &rill_core::semantic::Conditional {
        match statement {
            Statement::Conditional(conditional) => conditional,
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_if_without_else() {
        let program = assert_parses("if x > 0:\n    y = 2\n");
        let c = conditional(&program.statements()[0]);
        assert_eq!(c.condition, "x > 0");
        assert_eq!(c.then_branch.len(), 1);
        assert!(c.else_branch.is_empty());
    }

    #[test]
    fn test_if_with_else() {
        let program = assert_parses("if x > 0:\n    y = 2\nelse:\n    y = 3\n");
        let c = conditional(&program.statements()[0]);
        assert_eq!(c.then_branch[0].label(), "y = 2");
        assert_eq!(c.else_branch[0].label(), "y = 3");
    }

    #[test]
    fn test_worked_example() {
        let source = "x = 1\nif x > 0:\n    y = 2\nelse:\n    y = 3\nprint(y)\n";
        let program = assert_parses(source);

        assert_eq!(program.statements().len(), 3);
        assert_eq!(program.statements()[0].label(), "x = 1");
        let c = conditional(&program.statements()[1]);
        assert_eq!(c.condition, "x > 0");
        assert_eq!(c.then_branch[0].label(), "y = 2");
        assert_eq!(c.else_branch[0].label(), "y = 3");
        // Default configuration keeps `print(y)` a plain call
        match &program.statements()[2] {
            Statement::Call(call) => assert_eq!(call.text, "print(y)"),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_conditionals() {
        let source = "\
if a:
    if b:
        x = 1
    else:
        x = 2
else:
    x = 3
";
        let program = assert_parses(source);
        let outer = conditional(&program.statements()[0]);
        assert_eq!(outer.condition, "a");
        let inner = conditional(&outer.then_branch[0]);
        assert_eq!(inner.condition, "b");
        assert_eq!(inner.then_branch[0].label(), "x = 1");
        assert_eq!(inner.else_branch[0].label(), "x = 2");
        assert_eq!(outer.else_branch[0].label(), "x = 3");
    }

    #[test]
    fn test_elif_desugars_to_nested_else() {
        let source = "\
if a:
    x = 1
elif b:
    x = 2
else:
    x = 3
";
        let program = assert_parses(source);
        let outer = conditional(&program.statements()[0]);
        assert_eq!(outer.condition, "a");
        assert_eq!(outer.else_branch.len(), 1);
        let nested = conditional(&outer.else_branch[0]);
        assert_eq!(nested.condition, "b");
        assert_eq!(nested.then_branch[0].label(), "x = 2");
        assert_eq!(nested.else_branch[0].label(), "x = 3");
    }

    #[test]
    fn test_statements_after_block_dedent() {
        let source = "if a:\n    x = 1\ny = 2\n";
        let program = assert_parses(source);
        assert_eq!(program.statements().len(), 2);
        assert_eq!(program.statements()[1].label(), "y = 2");
    }

    #[test]
    fn test_multi_statement_branches() {
        let source = "if a:\n    x = 1\n    y = 2\n    z = 3\n";
        let program = assert_parses(source);
        let c = conditional(&program.statements()[0]);
        assert_eq!(c.then_branch.len(), 3);
    }

    #[test]
    fn test_parenthesized_condition_preserved() {
        let program = assert_parses("if (x > 0):\n    y = 1\n");
        let c = conditional(&program.statements()[0]);
        assert_eq!(c.condition, "(x > 0)");
    }
}

mod io_detection {
    use super::*;

    fn parse_io(source: &str) -> Program {
        parse(source, ElaborateConfig::new(true)).expect("parsing should succeed")
    }

    #[test]
    fn test_input_assignment() {
        let program = parse_io("name = input()\n");
        match &program.statements()[0] {
            Statement::Input(input) => assert_eq!(input.target, "name"),
            other => panic!("expected input, got {:?}", other),
        }
        assert_eq!(program.statements()[0].label(), "input name");
    }

    #[test]
    fn test_typecast_wrapped_input() {
        let program = parse_io("age = int(input())\n");
        match &program.statements()[0] {
            Statement::Input(input) => assert_eq!(input.target, "age"),
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[test]
    fn test_print_becomes_output() {
        let program = parse_io("print(a, b)\n");
        match &program.statements()[0] {
            Statement::Output(output) => assert_eq!(output.text, "a, b"),
            other => panic!("expected output, got {:?}", other),
        }
        assert_eq!(program.statements()[0].label(), "output a, b");
    }

    #[test]
    fn test_pprint_becomes_output() {
        let program = parse_io("pprint(state)\n");
        assert_eq!(program.statements()[0].label(), "output state");
    }

    #[test]
    fn test_other_calls_stay_calls() {
        let program = parse_io("draw(x)\n");
        assert_eq!(program.statements()[0].label(), "draw(x)");
    }

    #[test]
    fn test_detection_off_by_default() {
        let program = assert_parses("name = input()\nprint(name)\n");
        assert_eq!(labels(&program), vec!["name = input()", "print(name)"]);
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_for_loop_is_rejected() {
        assert_eq!(first_error_code("for i in items:\n    f(i)\n"), ErrorCode::E200);
    }

    #[test]
    fn test_for_loop_names_the_construct() {
        let err = parse_source("for i in items:\n    f(i)\n").unwrap_err();
        assert!(err.diagnostics()[0].message().contains("for"));
    }

    #[test]
    fn test_while_loop_is_rejected() {
        assert_eq!(first_error_code("while x:\n    f()\n"), ErrorCode::E201);
    }

    #[test]
    fn test_def_is_rejected() {
        assert_eq!(first_error_code("def f():\n    g()\n"), ErrorCode::E202);
    }

    #[test]
    fn test_class_is_rejected() {
        assert_eq!(first_error_code("class A:\n    x = 1\n"), ErrorCode::E203);
    }

    #[test]
    fn test_return_is_rejected() {
        assert_eq!(first_error_code("return x\n"), ErrorCode::E204);
    }

    #[test]
    fn test_list_literal_is_rejected() {
        assert_eq!(first_error_code("xs = [1, 2]\n"), ErrorCode::E205);
    }

    #[test]
    fn test_subscript_is_rejected() {
        assert_eq!(first_error_code("y = xs[0]\n"), ErrorCode::E206);
    }

    #[test]
    fn test_attribute_access_is_rejected() {
        assert_eq!(first_error_code("y = point.x\n"), ErrorCode::E206);
    }

    #[test]
    fn test_bare_expression_is_rejected() {
        assert_eq!(first_error_code("x + 1\n"), ErrorCode::E300);
    }

    #[test]
    fn test_missing_colon() {
        assert_eq!(first_error_code("if x > 0\n    y = 1\n"), ErrorCode::E102);
    }

    #[test]
    fn test_stray_else() {
        assert_eq!(first_error_code("else:\n    y = 1\n"), ErrorCode::E104);
    }

    #[test]
    fn test_stray_elif() {
        assert_eq!(first_error_code("elif x:\n    y = 1\n"), ErrorCode::E104);
    }

    #[test]
    fn test_unexpected_indentation() {
        assert_eq!(first_error_code("x = 1\n    y = 2\n"), ErrorCode::E103);
    }

    #[test]
    fn test_missing_indented_block() {
        assert_eq!(first_error_code("if x:\ny = 1\n"), ErrorCode::E105);
    }

    #[test]
    fn test_duplicate_else() {
        let source = "if x:\n    a = 1\nelse:\n    a = 2\nelse:\n    a = 3\n";
        assert_eq!(first_error_code(source), ErrorCode::E106);
    }

    #[test]
    fn test_incomplete_assignment() {
        assert_eq!(first_error_code("x =\n"), ErrorCode::E101);
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(first_error_code("x = 1 2\n"), ErrorCode::E100);
    }

    #[test]
    fn test_multiple_errors_collected() {
        let err = parse_source("for i in xs:\n    f(i)\nreturn 1\n").unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E204]);
    }

    #[test]
    fn test_error_span_points_into_source() {
        let source = "x = 1\nfor i in xs:\n    f(i)\n";
        let err = parse_source(source).unwrap_err();
        let label = &err.diagnostics()[0].labels()[0];
        assert_eq!(&source[label.span().start()..label.span().end()], "for");
    }
}
