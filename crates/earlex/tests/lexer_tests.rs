//! Tests for lexis compilation and the maximal-munch lexer

use earlex::compile::{LexisBuilder, compile_lexis};
use earlex::error::{LexError, RegexErrorKind};
use earlex::lexer::{Token, TokenDefinition};

fn statement_lexis() -> Vec<TokenDefinition> {
    vec![
        TokenDefinition::new("identifier", "[a-z]+"),
        TokenDefinition::new("keyword", "var|int").with_precedence(1),
        TokenDefinition::new("number", "[0-9]+"),
        TokenDefinition::new("operator", "=|;"),
        TokenDefinition::new("whitespace", "[\\s\\t\\n]+").omitted(),
    ]
}

fn summary(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| format!("{}@{}:{} {}", t.token_type, t.line, t.column, t.value))
        .collect()
}

#[test]
fn test_lexer_tokenize_statement() {
    let lexis = compile_lexis(statement_lexis()).unwrap();
    let mut lexer = lexis.lexer();
    lexer.set_source("var 111 = 222;");

    let tokens: Vec<Token> = lexer.required().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        summary(&tokens),
        [
            "keyword@1:1 var",
            "number@1:5 111",
            "operator@1:9 =",
            "number@1:11 222",
            "operator@1:14 ;",
        ]
    );
}

#[test]
fn test_omitted_tokens_are_produced_but_not_required() {
    let lexis = compile_lexis(statement_lexis()).unwrap();
    let mut lexer = lexis.lexer();
    lexer.set_source("int x;\n");

    let tokens = lexer.tokenize().unwrap();
    let types: Vec<&str> = tokens.iter().map(|t| t.token_type.as_str()).collect();
    assert_eq!(
        types,
        ["keyword", "whitespace", "identifier", "operator", "whitespace"]
    );
    assert!(tokens.iter().all(|t| t.required != t.is_type("whitespace")));
}

#[test]
fn test_longest_match_beats_precedence() {
    let lexis = compile_lexis(statement_lexis()).unwrap();
    let mut lexer = lexis.lexer();
    lexer.set_source("variable integer");

    let tokens: Vec<Token> = lexer.required().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        summary(&tokens),
        ["identifier@1:1 variable", "identifier@1:10 integer"]
    );
}

#[test]
fn test_equal_precedence_prefers_earlier_definition() {
    let keyword_first = LexisBuilder::new()
        .token("keyword", "if")
        .token("identifier", "[a-z]+")
        .build()
        .unwrap();
    let identifier_first = LexisBuilder::new()
        .token("identifier", "[a-z]+")
        .token("keyword", "if")
        .build()
        .unwrap();

    let mut lexer = keyword_first.lexer();
    lexer.set_source("if");
    assert_eq!(lexer.next_token().unwrap().unwrap().token_type, "keyword");

    let mut lexer = identifier_first.lexer();
    lexer.set_source("if");
    assert_eq!(lexer.next_token().unwrap().unwrap().token_type, "identifier");
}

#[test]
fn test_duplicate_name_adds_alternative() {
    let lexis = LexisBuilder::new()
        .token("bracket", "\\(")
        .token("bracket", "\\)")
        .build()
        .unwrap();
    let mut lexer = lexis.lexer();
    lexer.set_source("()");

    let tokens = lexer.tokenize().unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(|t| t.is_type("bracket")));
    assert_eq!(lexis.types().len(), 1);
}

#[test]
fn test_unknown_token_renders_snippet() {
    let lexis = compile_lexis(statement_lexis()).unwrap();
    let mut lexer = lexis.lexer();
    let source = "var a = 1;\nvar b = @;";
    lexer.set_source(source);

    let err = lexer.tokenize().unwrap_err();
    assert_eq!(err.position(), (2, 9));
    assert!(matches!(err, LexError::UnknownToken { found: '@', .. }));

    let rendered = err.render(source);
    assert!(rendered.contains("2 | var b = @;"));
    assert!(rendered.ends_with("|         ^"));
}

#[test]
fn test_multibyte_characters() {
    let lexis = LexisBuilder::new()
        .token("word", "[a-zé]+")
        .token("arrow", "→")
        .definition(TokenDefinition::new("space", "\\s").omitted())
        .build()
        .unwrap();
    let mut lexer = lexis.lexer();
    lexer.set_source("café → thé");

    let tokens: Vec<Token> = lexer.required().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        summary(&tokens),
        ["word@1:1 café", "arrow@1:6 →", "word@1:8 thé"]
    );
}

#[test]
fn test_invalid_definition_is_reported() {
    let err = LexisBuilder::new()
        .token("number", "[0-9]+")
        .token("broken", "[9-0]")
        .build()
        .unwrap_err();
    assert_eq!(err.pattern, "[9-0]");
    assert_eq!(err.kind, RegexErrorKind::InvalidRange { from: '9', to: '0' });
}

#[test]
fn test_token_display() {
    let token = Token::new(3, 7, "number", "42", true);
    assert_eq!(token.to_string(), "[Ln 3, Col 7] <number>: <42>");
}

#[test]
fn test_unicode_wide_class() {
    let lexis = LexisBuilder::new()
        .token("ascii", "[a-z]+")
        .token("wide", "[\u{80}-\u{FFFF}]+")
        .definition(TokenDefinition::new("space", "\\s").omitted())
        .build()
        .unwrap();
    let mut lexer = lexis.lexer();
    lexer.set_source("abc 日本語 é");

    let tokens: Vec<Token> = lexer.required().collect::<Result<_, _>>().unwrap();
    assert_eq!(
        summary(&tokens),
        ["ascii@1:1 abc", "wide@1:5 日本語", "wide@1:9 é"]
    );
}
