//! Condition parser
//!
//! Turns a condition string such as `selection and not (filter1 or filter2)`
//! into a single [`Expr`] by precedence climbing over the lexer's tokens.
//! Search identifiers are resolved against the already-built identifier
//! expressions of the detection block.

use crate::ast::Expr;
use crate::lexer::{Item, Lexer, Token};
use crate::pattern::escape::escape_identifier_glob;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeMap;

/// Parser error types
pub mod error;

pub use error::ParseError;

/// Maximum nesting of parentheses and `not`
const MAX_RECURSION_DEPTH: usize = 50;

/// Binding power of a binary operator token
fn precedence(token: Token) -> Option<u8> {
    match token {
        Token::KeywordOr => Some(0),
        Token::KeywordAnd => Some(1),
        _ => None,
    }
}

/// Parse one condition string.
///
/// `identifiers` maps every search identifier of the detection block to its
/// expression; quantifiers expand over its keys in lexicographic order.
pub fn parse_condition(
    condition: &str,
    identifiers: &BTreeMap<String, Expr>,
) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(condition).tokenize();

    if tokens.is_empty() {
        return Err(ParseError::EmptyCondition);
    }

    let mut parser = Parser {
        tokens: &tokens,
        position: 0,
        identifiers,
    };
    let expr = parser.parse_expression(0, 0)?;

    match parser.peek() {
        None => Ok(expr),
        Some(item) if item.token == Token::SepRpar => Err(ParseError::UnmatchedParenthesis {
            position: item.position,
        }),
        Some(item) => Err(ParseError::unexpected(item)),
    }
}

/// Parser state over a token slice
#[derive(Debug)]
struct Parser<'a> {
    tokens: &'a [Item],
    position: usize,
    identifiers: &'a BTreeMap<String, Expr>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Item> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Item> {
        let item = self.tokens.get(self.position)?;
        self.position += 1;
        Some(item)
    }

    /// Parse a unary term, then every binary operator binding at least as
    /// tightly as `min_precedence`. Runs of the same operator become one
    /// n-ary node.
    fn parse_expression(&mut self, min_precedence: u8, depth: usize) -> Result<Expr, ParseError> {
        let first = self.parse_unary(depth)?;

        let mut operator: Option<Token> = None;
        let mut operands = vec![first];

        while let Some(item) = self.peek() {
            // `expr | aggregation` is the only place a pipe is valid Sigma
            if item.token == Token::SepPipe {
                return Err(ParseError::AggregationUnsupported {
                    position: item.position,
                });
            }
            let Some(prec) = precedence(item.token) else {
                break;
            };
            if prec < min_precedence {
                break;
            }
            if operator.is_some_and(|op| op != item.token) {
                let lhs = combine(operator, std::mem::take(&mut operands));
                operands.push(lhs);
            }
            operator = Some(item.token);
            self.advance();
            operands.push(self.parse_expression(prec + 1, depth)?);
        }

        Ok(combine(operator, operands))
    }

    fn parse_unary(&mut self, depth: usize) -> Result<Expr, ParseError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(ParseError::RecursionLimitExceeded {
                current: depth,
                limit: MAX_RECURSION_DEPTH,
            });
        }

        let item = self.advance().ok_or(ParseError::UnexpectedEof)?;
        match item.token {
            Token::SepLpar => {
                let expr = self.parse_expression(0, depth + 1)?;
                match self.advance() {
                    Some(close) if close.token == Token::SepRpar => Ok(expr),
                    Some(other) => Err(ParseError::unexpected(other)),
                    None => Err(ParseError::UnmatchedParenthesis {
                        position: item.position,
                    }),
                }
            }
            Token::SepRpar => Err(ParseError::UnmatchedParenthesis {
                position: item.position,
            }),
            Token::KeywordNot => Ok(Expr::not(self.parse_unary(depth + 1)?)),
            Token::StmtOneOf | Token::StmtAllOf => self.parse_quantifier(item.token),
            Token::Identifier | Token::IdentifierWithWildcard => self
                .identifiers
                .get(&item.value)
                .cloned()
                .ok_or_else(|| ParseError::missing_condition_item(&item.value)),
            Token::IdentifierAll | Token::KeywordAnd | Token::KeywordOr | Token::SepPipe => {
                Err(ParseError::unexpected(item))
            }
        }
    }

    /// `1 of <target>` or `all of <target>`, the quantifier already consumed
    fn parse_quantifier(&mut self, quantifier: Token) -> Result<Expr, ParseError> {
        let target = self.advance().ok_or(ParseError::UnexpectedEof)?;

        let mut matched: Vec<Expr> = match target.token {
            Token::IdentifierAll => self.identifiers.values().cloned().collect(),
            Token::Identifier | Token::IdentifierWithWildcard => {
                let glob = identifier_glob(&target.value)?;
                self.identifiers
                    .iter()
                    .filter(|(name, _)| glob.is_match(name.as_str()))
                    .map(|(_, expr)| expr.clone())
                    .collect()
            }
            _ => return Err(ParseError::unexpected(target)),
        };

        match matched.len() {
            0 => Err(ParseError::NoMatchingIdentifiers {
                pattern: target.value.clone(),
            }),
            1 => Ok(matched.remove(0)),
            _ if quantifier == Token::StmtAllOf => Ok(Expr::And(matched)),
            _ => Ok(Expr::Or(matched)),
        }
    }
}

/// Build the n-ary node for a run of operands
fn combine(operator: Option<Token>, mut operands: Vec<Expr>) -> Expr {
    match operator {
        Some(Token::KeywordAnd) => Expr::And(operands),
        Some(Token::KeywordOr) => Expr::Or(operands),
        _ => operands.remove(0),
    }
}

/// Compile an identifier pattern where only `*` is a wildcard
fn identifier_glob(pattern: &str) -> Result<GlobMatcher, ParseError> {
    GlobBuilder::new(&escape_identifier_glob(pattern))
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ParseError::InvalidGlobPattern {
            pattern: pattern.to_string(),
            error: e.to_string(),
        })
}
