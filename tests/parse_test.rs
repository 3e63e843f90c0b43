// Integration tests for the Tython parser

use std::fs;
use std::path::Path;
use tython::parser::{
    parse, parse_with, Node, ParseError, Parser, ParserOptions, Precedence, TokenKind,
};

fn root(source: &str) -> Node {
    parse(source).expect("Parsing failed").root
}

fn syntax_message(source: &str) -> String {
    match parse(source) {
        Err(ParseError::Syntax { message, .. }) => message,
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_program_with_assignment() {
    let root = root("PROGRAM \"p1\"\nA -> 1 + 2\n");
    assert_eq!(root.children().len(), 2);

    let program = root.child(0).unwrap();
    assert_eq!(program.kind(), TokenKind::Program);
    assert_eq!(program.child(0).unwrap().value(), Some("\"p1\""));

    let assign = root.child(1).unwrap();
    assert_eq!(assign.kind(), TokenKind::Assign);
    assert_eq!(assign.child(0).unwrap().value(), Some("A"));
    let expr = assign.child(1).unwrap();
    assert_eq!(expr.kind(), TokenKind::Expr);
    assert_eq!(expr.to_string(), "EXPR\n  PLUS\n    INT_LIT:1\n    INT_LIT:2");
}

#[test]
fn test_block_conditional() {
    let root = root("PROGRAM \"p1\"\nIF A == 1 THEN\nDISP A\nEND\n");
    let branch = root.child(1).unwrap();
    assert_eq!(branch.kind(), TokenKind::If);
    assert_eq!(branch.children().len(), 2);

    let condition = branch.child(0).unwrap();
    assert_eq!(condition.kind(), TokenKind::BoolExpr);
    let eq = condition.child(0).unwrap();
    assert_eq!(eq.kind(), TokenKind::EqualTo);
    assert_eq!(eq.child(0).unwrap().value(), Some("A"));
    assert_eq!(eq.child(1).unwrap().value(), Some("1"));

    let body = branch.child(1).unwrap();
    assert_eq!(body.kind(), TokenKind::Block);
    assert_eq!(body.children().len(), 1);
    let disp = body.child(0).unwrap();
    assert_eq!(disp.kind(), TokenKind::Disp);
    assert_eq!(disp.child(0).unwrap().value(), Some("A"));
}

#[test]
fn test_unclosed_parenthesis() {
    let result = parse("PROGRAM \"p1\"\nB -> (1 + 2\n");
    let err = result.unwrap_err();
    assert!(err.message().contains("not all parentheses closed"));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_function_call_assignment() {
    let root = root("PROGRAM \"p1\"\nC -> SIN(1)\n");
    let assign = root.child(1).unwrap();
    let expr = assign.child(1).unwrap();
    let call = expr.child(0).unwrap();
    assert_eq!(call.kind(), TokenKind::Sin);
    assert_eq!(call.children().len(), 1);
    assert_eq!(call.child(0).unwrap().kind(), TokenKind::IntLit);
    assert_eq!(call.child(0).unwrap().value(), Some("1"));
}

#[test]
fn test_two_comparisons_in_condition() {
    let message = syntax_message("IF A == 1 == 2");
    assert!(message.contains("at most one boolean operator"));
}

#[test]
fn test_empty_conditional_body() {
    let message = syntax_message("IF A == 1 THEN\nEND\n");
    assert_eq!(message, "IF statement must be followed by code");
}

#[test]
fn test_single_numeral_is_a_leaf() {
    for literal in ["7", "2.25", "0xA0", "0b1", "Q", "@R3"] {
        let root = root(&format!("A -> {}", literal));
        let value = root.child(0).unwrap().child(1).unwrap();
        assert!(value.is_leaf(), "{} should be a leaf", literal);
        assert_eq!(value.value(), Some(literal));
    }
}

#[test]
fn test_unmatched_right_parenthesis() {
    for source in ["A -> 1 + 2)", "A -> )1(", "IF (A == 1)) THEN\nDISP A\nEND"] {
        let message = syntax_message(source);
        assert!(message.contains("too many right parentheses"), "{}", source);
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let source =
        fs::read_to_string(Path::new("demos/default.ty")).expect("Failed to read demo file");
    let first = parse(&source).unwrap();
    let second = parse(&source).unwrap();
    assert_eq!(first.root, second.root);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_demo_program() {
    let source =
        fs::read_to_string(Path::new("demos/default.ty")).expect("Failed to read demo file");
    let compilation = parse(&source).expect("Parsing failed");
    let root = &compilation.root;

    assert_eq!(root.name(), Some("quadratic"));
    assert!(compilation.diagnostics.is_empty());
    let kinds: Vec<TokenKind> = root.children().iter().map(Node::kind).collect();
    use TokenKind::*;
    assert_eq!(
        kinds,
        vec![
            Program, Version, Implicit, Real64, Real64, Real64, Int32, Assign, Assign, Assign,
            Assign, If, If, If, Disp, Label, DispStr
        ]
    );

    // (B * B) - (4 * A * C) -> D
    let store = &root.children()[10];
    assert_eq!(store.child(0).unwrap().value(), Some("D"));
    assert_eq!(store.child(1).unwrap().child(0).unwrap().kind(), Minus);

    // IF D > 0 AND A != 0 THEN ... ELSE ... END
    let last_if = &root.children()[13];
    assert_eq!(last_if.children().len(), 3);
    assert_eq!(last_if.child(0).unwrap().kind(), LogicExpr);
}

#[test]
fn test_call_is_not_implemented() {
    let source = fs::read_to_string(Path::new("demos/call.ty")).expect("Failed to read demo file");
    let err = parse(&source).unwrap_err();
    assert!(err.is_not_implemented());
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_precedence_options() {
    let source = "A -> 1 + 2 * 3 - 4 / 2";

    let standard = parse(source).unwrap().root;
    let expected = "\
PROG
  ASSIGN
    VAR:A
    EXPR
      MINUS
        PLUS
          INT_LIT:1
          MUL
            INT_LIT:2
            INT_LIT:3
        DIV
          INT_LIT:4
          INT_LIT:2";
    assert_eq!(standard.to_string(), expected);

    let options = ParserOptions {
        precedence: Precedence::Legacy,
        ..ParserOptions::default()
    };
    let legacy = parse_with(source, options).unwrap().root;
    // ((1 + 2) * (3 - 4)) / 2
    let expected = "\
PROG
  ASSIGN
    VAR:A
    EXPR
      DIV
        MUL
          PLUS
            INT_LIT:1
            INT_LIT:2
          MINUS
            INT_LIT:3
            INT_LIT:4
        INT_LIT:2";
    assert_eq!(legacy.to_string(), expected);
}

#[test]
fn test_strict_options() {
    let lenient = parse("DISP A\nELSE\nDISP B").unwrap();
    assert_eq!(lenient.diagnostics.len(), 1);
    assert_eq!(lenient.diagnostics[0].line, 2);

    let err = parse_with("DISP A\nELSE\nDISP B", ParserOptions::strict()).unwrap_err();
    assert!(err.message().contains("program name"));

    let err = parse_with("PROGRAM \"s\"\nDISP A\nELSE", ParserOptions::strict()).unwrap_err();
    assert_eq!(err.line(), Some(3));
}

#[test]
fn test_parser_reuse_of_tokens() {
    let tokens = tython::parser::tokenize("A -> 2\nDISP A").unwrap();
    let mut parser = Parser::from_tokens(tokens.clone(), ParserOptions::default());
    let tree = parser.parse_program().unwrap();
    assert_eq!(tree.children().len(), 2);
    assert_eq!(parser.tokens(), tokens.as_slice());
    assert!(parser.diagnostics().is_empty());
}

#[test]
fn test_deeply_nested_parentheses_are_an_error() {
    let source = format!("A -> {}1{}", "(".repeat(3000), ")".repeat(3000));
    let message = syntax_message(&source);
    assert_eq!(message, "expression nested too deeply");

    let condition = format!("A == {}1{}", "(".repeat(3000), ")".repeat(3000));
    let source = format!("IF {} THEN\nDISP A\nEND", condition);
    assert_eq!(syntax_message(&source), "expression nested too deeply");
}
