//! Lexical analysis module

/// Token definitions and utilities
pub mod token;

pub use token::{check_keyword, Item, Token};

use token::quantifier_for;

/// Lexer for Sigma conditions.
///
/// Words are separated by whitespace; `(`, `)` and `|` are always tokens of
/// their own. `1 of` and `all of` are emitted as single quantifier tokens.
/// Lexing cannot fail: every word is at worst an identifier.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    start: usize,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over a condition string
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            start: 0,
            position: 0,
        }
    }

    /// Scan the whole input
    pub fn tokenize(self) -> Vec<Item> {
        self.collect()
    }

    /// Get the next character from the input
    fn next_char(&mut self) -> Option<char> {
        let ch = self.remaining().chars().next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Ignore characters up to current position
    fn ignore(&mut self) {
        self.start = self.position;
    }

    /// Get the collected string from start to current position
    fn collected(&self) -> &'a str {
        &self.input[self.start..self.position]
    }

    /// Get the remaining string from current position
    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.next_char();
        }
        self.ignore();
    }

    /// Consume a word up to whitespace or a separator
    fn accumulate_word(&mut self) -> &'a str {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || Token::from_rune(c).is_some() {
                break;
            }
            self.next_char();
        }
        self.collected()
    }

    /// After `1` or `all`, consume a following `of` if there is one
    fn lex_quantifier_tail(&mut self) -> bool {
        let (start, position) = (self.start, self.position);
        self.skip_whitespace();
        if self.accumulate_word().eq_ignore_ascii_case("of") {
            self.start = start;
            return true;
        }
        self.start = start;
        self.position = position;
        false
    }
}

impl Iterator for Lexer<'_> {
    type Item = token::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let start = self.start;
        let c = self.next_char()?;

        if let Some(token) = Token::from_rune(c) {
            let item = Item::new(token, self.collected(), start);
            self.ignore();
            return Some(item);
        }

        let word = self.accumulate_word();
        let token = match quantifier_for(word) {
            Some(quantifier) if self.lex_quantifier_tail() => quantifier,
            _ => check_keyword(word),
        };
        let item = Item::new(token, self.collected(), start);
        self.ignore();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).map(|item| item.token).collect()
    }

    #[test]
    fn test_simple_condition() {
        assert_eq!(
            tokens("selection and not filter"),
            vec![
                Token::Identifier,
                Token::KeywordAnd,
                Token::KeywordNot,
                Token::Identifier
            ]
        );
    }

    #[test]
    fn test_separators_split_words() {
        let items = Lexer::new("(a or(b))|count").tokenize();
        let values: Vec<&str> = items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, vec!["(", "a", "or", "(", "b", ")", ")", "|", "count"]);
        assert_eq!(items[7].token, Token::SepPipe);
        assert_eq!(items[7].position, 9);
    }

    #[test]
    fn test_quantifiers() {
        let items = Lexer::new("1 of selection_*  and ALL   OF them").tokenize();
        assert_eq!(items[0], Item::new(Token::StmtOneOf, "1 of", 0));
        assert_eq!(items[1].token, Token::IdentifierWithWildcard);
        assert_eq!(items[3], Item::new(Token::StmtAllOf, "ALL   OF", 22));
        assert_eq!(items[4].token, Token::IdentifierAll);
    }

    #[test]
    fn test_quantifier_word_without_of() {
        assert_eq!(
            tokens("all and 1"),
            vec![Token::Identifier, Token::KeywordAnd, Token::Identifier]
        );
        assert_eq!(tokens("1 of(a)")[0], Token::StmtOneOf);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(Lexer::new("  \t\n ").tokenize().is_empty());
        assert!(Lexer::new("").tokenize().is_empty());
    }

    #[test]
    fn test_unicode_positions() {
        let items = Lexer::new("sélection or b").tokenize();
        assert_eq!(items[1].position, "sélection ".len());
    }
}
