use std::fmt;

/// Token types in Sigma conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // User-defined word
    /// Search identifier
    Identifier,
    /// Identifier containing `*`, only valid after a quantifier
    IdentifierWithWildcard,
    /// Special identifier "them"
    IdentifierAll,

    // Separators
    /// Left parenthesis separator
    SepLpar,
    /// Right parenthesis separator
    SepRpar,
    /// Pipe separator, introduces an aggregation
    SepPipe,

    // Keywords
    /// AND keyword
    KeywordAnd,
    /// OR keyword
    KeywordOr,
    /// NOT keyword
    KeywordNot,

    // Statements
    /// "1 of" statement
    StmtOneOf,
    /// "all of" statement
    StmtAllOf,
}

impl Token {
    /// Get the literal representation of the token
    pub fn literal(&self) -> &'static str {
        match self {
            Token::Identifier | Token::IdentifierWithWildcard => "identifier",
            Token::IdentifierAll => "them",
            Token::SepLpar => "(",
            Token::SepRpar => ")",
            Token::SepPipe => "|",
            Token::KeywordAnd => "and",
            Token::KeywordOr => "or",
            Token::KeywordNot => "not",
            Token::StmtOneOf => "1 of",
            Token::StmtAllOf => "all of",
        }
    }

    /// Separator token for a single character
    pub fn from_rune(c: char) -> Option<Token> {
        match c {
            '(' => Some(Token::SepLpar),
            ')' => Some(Token::SepRpar),
            '|' => Some(Token::SepPipe),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// Lexical token with its source text and byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The token type
    pub token: Token,
    /// The token text as written
    pub value: String,
    /// Byte offset of the token in the condition
    pub position: usize,
}

impl Item {
    /// Create a new item
    pub fn new(token: Token, value: impl Into<String>, position: usize) -> Self {
        Self {
            token,
            value: value.into(),
            position,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}", self.value, self.position)
    }
}

/// Classify a whitespace-delimited word
pub fn check_keyword(word: &str) -> Token {
    if word.eq_ignore_ascii_case("and") {
        Token::KeywordAnd
    } else if word.eq_ignore_ascii_case("or") {
        Token::KeywordOr
    } else if word.eq_ignore_ascii_case("not") {
        Token::KeywordNot
    } else if word.eq_ignore_ascii_case("them") {
        Token::IdentifierAll
    } else if word.contains('*') {
        Token::IdentifierWithWildcard
    } else {
        Token::Identifier
    }
}

/// Quantifier introduced by `word` when followed by `of`
pub(crate) fn quantifier_for(word: &str) -> Option<Token> {
    if word == "1" {
        Some(Token::StmtOneOf)
    } else if word.eq_ignore_ascii_case("all") {
        Some(Token::StmtAllOf)
    } else {
        None
    }
}
