//! Tests for the tree-sitter token view of emitted code

use crate::syntax::{SyntaxError, syntax_tokens};

fn texts(source: &str) -> Vec<String> {
    syntax_tokens(source)
        .unwrap()
        .into_iter()
        .map(|token| token.text)
        .collect()
}

#[test]
fn test_whitespace_and_comments_are_ignored() {
    assert_eq!(
        syntax_tokens("a /* inline */ +\n  b; // trailing\n").unwrap(),
        syntax_tokens("a+b;").unwrap()
    );
}

#[test]
fn test_adjacent_plus_signs_stay_distinct() {
    assert_eq!(texts("a + +b;"), vec!["a", "+", "+", "b", ";"]);
    assert_eq!(texts("a++;"), vec!["a", "++", ";"]);
}

#[test]
fn test_arrow_and_member_access() {
    assert_eq!(
        texts("f = ()=>this.f + 1;"),
        vec!["f", "=", "(", ")", "=>", "this", ".", "f", "+", "1", ";"]
    );
}

#[test]
fn test_regex_after_paren_keeps_its_text() {
    let tokens = syntax_tokens("if(x)/ a /g.test(s);").unwrap();
    let regex = tokens.iter().find(|token| token.kind == "regex").expect("regex token");
    assert_eq!(regex.text, "/ a /g");
}

#[test]
fn test_division_is_not_a_regex() {
    let tokens = syntax_tokens("a = b / c / d;").unwrap();
    assert!(tokens.iter().all(|token| token.kind != "regex"));
}

#[test]
fn test_strings_are_kept_whole() {
    assert_eq!(texts("s = ' a  b ';"), vec!["s", "=", "' a  b '", ";"]);
}

#[test]
fn test_template_chunks_keep_whitespace() {
    assert_eq!(
        texts("t = `a  ${ b }\n c`;"),
        vec!["t", "=", "`a  ", "${", "b", "}", "\n c`", ";"]
    );
    assert_ne!(
        syntax_tokens("t = `a  \nb`;").unwrap(),
        syntax_tokens("t = `a\nb`;").unwrap()
    );
}

#[test]
fn test_syntax_error_reports_position() {
    let err = syntax_tokens("let a = 1;\nclass {").unwrap_err();
    assert!(matches!(err, SyntaxError::Invalid { line: 2, .. }), "{err}");
}
