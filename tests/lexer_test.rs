use color_eyre::eyre::{Context, Result};
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use plang::lexer::{
    formatter::{BasicFormatter, ToFormatter, TokenFormatter},
    keyword_lookup, scan, Lexer, LexicalErrorKind, Literal, Token, TokenKind,
};

fn check(input: &str, expected: &str, test_name: &str) {
    let mut scanner = Lexer::new(input);
    let formatter: BasicFormatter = scanner.create_formatter();
    let mut buffer = String::new();
    loop {
        match scanner.next_token() {
            Ok(token) => {
                buffer.push_str(&formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                buffer.push_str(&formatter.format_lexical_error(&error));
            }
        }
        buffer.push('\n');
    }

    assert_eq!(
        buffer.trim_end(),
        expected.trim_end(),
        "Failed the test {test_name}"
    );
}

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .scan_all()
        .tokens
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn smoke_test() {
    check("", "ENDFILE  null", "smoke");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/lexer/in");
    let output_dir = Path::new("./test_data/lexer/out");

    let mut succeeded = true;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "plang" {
            continue;
        }

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            succeeded = false;
        }
    }

    assert!(succeeded, "At least one lexer fixture failed");

    Ok(())
}

#[test]
fn variable_declaration_kinds() {
    let tokens = scan("var x = 1 + 2;").expect("valid source");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::KeywordVar,
            TokenKind::Ident,
            TokenKind::Equal,
            TokenKind::NumericLiteral,
            TokenKind::Plus,
            TokenKind::NumericLiteral,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[3].literal, Some(Literal::Number(1.0)));
    assert_eq!(tokens[5].literal, Some(Literal::Number(2.0)));
    assert!(tokens[0].literal.is_none());
}

#[test]
fn two_character_operators_munch_maximally() {
    assert_eq!(
        kinds("!= ! == = <= < >= >"),
        vec![
            TokenKind::BangEqual,
            TokenKind::Bang,
            TokenKind::EqualEqual,
            TokenKind::Equal,
            TokenKind::LessThanEqual,
            TokenKind::LessThan,
            TokenKind::GreaterThanEqual,
            TokenKind::GreaterThan,
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("!==="),
        vec![TokenKind::BangEqual, TokenKind::EqualEqual, TokenKind::Eof]
    );
}

#[test]
fn ternary_punctuation() {
    assert_eq!(
        kinds("a ? b : c"),
        vec![
            TokenKind::Ident,
            TokenKind::QuestionMark,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_have_no_leading_or_trailing_dot() {
    assert_eq!(
        kinds(".5"),
        vec![TokenKind::Dot, TokenKind::NumericLiteral, TokenKind::Eof]
    );
    assert_eq!(
        kinds("5."),
        vec![TokenKind::NumericLiteral, TokenKind::Dot, TokenKind::Eof]
    );
    let tokens = scan("12.25").expect("valid source");
    assert_eq!(tokens[0].literal, Some(Literal::Number(12.25)));
}

#[test]
fn keywords_are_looked_up() {
    assert_eq!(keyword_lookup("while"), Some(TokenKind::KeywordWhile));
    assert_eq!(keyword_lookup("class"), Some(TokenKind::KeywordClass));
    assert_eq!(keyword_lookup("whiles"), None);
    assert_eq!(
        kinds("orchid or"),
        vec![TokenKind::Ident, TokenKind::KeywordOr, TokenKind::Eof]
    );
}

#[test]
fn line_comments_are_skipped() {
    let tokens = scan("1 // two three\n4").expect("valid source");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[1].literal, Some(Literal::Number(4.0)));
}

#[test]
fn block_comments_count_lines() {
    let tokens = scan("1 /* a\n b * / c\n */ 2").expect("valid source");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::NumericLiteral,
            TokenKind::NumericLiteral,
            TokenKind::Eof
        ]
    );
    assert_eq!(tokens[1].line, 3);
    assert_eq!(tokens[1].column, 5);
}

#[test]
fn unterminated_block_comment_runs_to_end() {
    assert_eq!(
        kinds("1 /* never closed"),
        vec![TokenKind::NumericLiteral, TokenKind::Eof]
    );
}

#[test]
fn strings_span_lines() {
    let source = "\"one\ntwo\" x";
    let tokens = scan(source).expect("valid source");
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].line, 1);
    assert_eq!(tokens[0].literal, Some(Literal::String("one\ntwo".into())));
    assert_eq!(tokens[0].lexeme(source), Some("\"one\ntwo\""));
    assert_eq!(tokens[1].line, 2);
    assert_eq!(tokens[1].column, 6);
}

#[test]
fn columns_count_chars_on_one_long_line() {
    let statements = 20_000;
    let source = format!("\"é\" {}", "1;".repeat(statements));
    let tokens = scan(&source).expect("valid source");
    assert_eq!(tokens.len(), 2 + 2 * statements);
    assert_eq!(tokens[0].column, 1);
    assert_eq!(tokens[1].column, 5);
    assert_eq!(tokens[2].column, 6);

    let last_number = &tokens[2 * statements - 1];
    assert_eq!(last_number.kind, TokenKind::NumericLiteral);
    assert_eq!(last_number.line, 1);
    assert_eq!(last_number.column, 5 + 2 * (statements as u32 - 1));
}

#[test]
fn unexpected_characters_do_not_stop_scanning() {
    let scanned = Lexer::new("1 @ 2 # 3").scan_all();
    assert_eq!(scanned.tokens.len(), 4);
    assert_eq!(scanned.errors.len(), 2);
    assert_eq!(scanned.errors[0].kind, LexicalErrorKind::Unrecognized('@'));
    assert_eq!(
        scanned.errors[1].to_string(),
        "Tokenization Error [line 1:7]: Unexpected character '#'"
    );
}

#[test]
fn unterminated_string_is_reported_at_its_quote() {
    let errors = scan("print\n  \"abc").expect_err("unterminated string");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexicalErrorKind::UnclosedString);
    assert_eq!(errors[0].location.line, 2);
    assert_eq!(errors[0].location.column, 3);
    assert_eq!(errors[0].code(), "LX002");
}

#[test]
fn eof_repeats() {
    let mut scanner = Lexer::new("x");
    assert_eq!(scanner.next_token().map(|t| t.kind), Ok(TokenKind::Ident));
    assert_eq!(scanner.next_token().map(|t| t.kind), Ok(TokenKind::Eof));
    assert_eq!(scanner.next_token().map(|t| t.kind), Ok(TokenKind::Eof));
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(".".to_string()),
        Just("-".to_string()),
        Just("+".to_string()),
        Just(";".to_string()),
        Just("*".to_string()),
        Just("?".to_string()),
        Just(":".to_string()),
        Just("!".to_string()),
        Just("!=".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("<".to_string()),
        Just("<=".to_string()),
        Just(">".to_string()),
        Just(">=".to_string()),
        Just("/".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]+".prop_map(|s| s),          // Integer literals
        "[0-9]+\\.[0-9]+".prop_map(|s| s)  // Decimal literals
    ]
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]*".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("and".to_string()),
        Just("class".to_string()),
        Just("else".to_string()),
        Just("false".to_string()),
        Just("for".to_string()),
        Just("fun".to_string()),
        Just("if".to_string()),
        Just("nil".to_string()),
        Just("or".to_string()),
        Just("print".to_string()),
        Just("return".to_string()),
        Just("super".to_string()),
        Just("this".to_string()),
        Just("true".to_string()),
        Just("var".to_string()),
        Just("while".to_string()),
    ]
}

fn comment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[^\n]*".prop_map(|s: String| format!("//{}\n", s)),
        "[^*]*".prop_map(|s: String| format!("/*{}*/", s)),
    ]
}

fn token_sequence_with_comments_strategy() -> impl Strategy<Value = String> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
            comment_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
    .prop_map(|tokens| tokens.join(" "))
}

fn token_sequence_without_comments_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens_without_comments(input in token_sequence_without_comments_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let mut scanner = Lexer::new(&input);
        let mut num_tokens = 0;
        loop {
            num_tokens += 1;
            match scanner.next_token() {
                Ok(Token {kind: TokenKind::Eof, ..}) => {
                    break;
                },
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
        prop_assert_eq!(num_tokens, expected_num_tokens);
    }

    #[test]
    fn lexer_handles_valid_tokens_with_comments(input in token_sequence_with_comments_strategy()) {
        let mut scanner = Lexer::new(&input);
        loop {
            match scanner.next_token() {
                Ok(Token {kind: TokenKind::Eof, ..}) => {
                    break;
                },
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
    }

    #[test]
    fn scanning_is_idempotent(input in "\\PC*") {
        let first = Lexer::new(&input).scan_all();
        let second = Lexer::new(&input).scan_all();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tokens_are_ordered_by_position(input in token_sequence_with_comments_strategy()) {
        let scanned = Lexer::new(&input).scan_all();
        for pair in scanned.tokens.windows(2) {
            prop_assert!(pair[0].span.end() <= pair[1].span.start);
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }
}
