//! Rule string tokenizer

use once_cell::sync::Lazy;
use regex::Regex;

use crate::rule::ast::Connective;

/// A parenthesis on its own, or a maximal run of other non-whitespace characters
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[()]|[^\s()]+").expect("token pattern is a valid regex")
});

/// Primitive token of a rule string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    OpenParen,
    CloseParen,
    Connective(Connective),
    /// Any other word: attribute, operator or comparison value
    Word(&'a str),
}

impl<'a> Token<'a> {
    fn classify(text: &'a str) -> Self {
        match text {
            "(" => Token::OpenParen,
            ")" => Token::CloseParen,
            _ => match Connective::from_keyword(text) {
                Some(connective) => Token::Connective(connective),
                None => Token::Word(text),
            },
        }
    }
}

/// Split a rule string into raw, non-empty tokens.
///
/// Parentheses always stand alone; whitespace runs are dropped.
pub fn split_tokens(rule: &str) -> impl Iterator<Item = &str> + '_ {
    TOKEN_PATTERN.find_iter(rule).map(|m| m.as_str())
}

/// Lazily tokenize a rule string
pub fn tokenize(rule: &str) -> impl Iterator<Item = Token<'_>> + '_ {
    split_tokens(rule).map(Token::classify)
}
