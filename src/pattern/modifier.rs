//! Field modifier vocabulary

use crate::pattern::ValidationError;
use std::fmt;
use std::str::FromStr;

/// A field modifier, written after the field name as `field|modifier`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Every pattern must match instead of any
    All,
    /// Base64-encode the pattern before matching
    Base64,
    /// Match the pattern at any byte alignment inside a base64 blob
    Base64Offset,
    /// Patterns are IPv4/IPv6 networks
    Cidr,
    /// Substring match
    Contains,
    /// Suffix match
    EndsWith,
    /// Patterns are `%name%` placeholders resolved at match time
    Expand,
    /// Patterns are regular expressions
    Re,
    /// Prefix match
    StartsWith,
    /// `-` and `/` (and dash look-alikes) are interchangeable
    WinDash,
}

impl Modifier {
    /// The token as written in rules
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::All => "all",
            Modifier::Base64 => "base64",
            Modifier::Base64Offset => "base64offset",
            Modifier::Cidr => "cidr",
            Modifier::Contains => "contains",
            Modifier::EndsWith => "endswith",
            Modifier::Expand => "expand",
            Modifier::Re => "re",
            Modifier::StartsWith => "startswith",
            Modifier::WinDash => "windash",
        }
    }
}

impl FromStr for Modifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // exact, case-sensitive tokens
        match s {
            "all" => Ok(Modifier::All),
            "base64" => Ok(Modifier::Base64),
            "base64offset" => Ok(Modifier::Base64Offset),
            "cidr" => Ok(Modifier::Cidr),
            "contains" => Ok(Modifier::Contains),
            "endswith" => Ok(Modifier::EndsWith),
            "expand" => Ok(Modifier::Expand),
            "re" => Ok(Modifier::Re),
            "startswith" => Ok(Modifier::StartsWith),
            "windash" => Ok(Modifier::WinDash),
            "" => Err(ValidationError::EmptyModifier),
            other => Err(ValidationError::UnknownModifier(other.to_string())),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the patterns of an atom are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Sigma wildcards (`*`, `?`), the default
    Glob,
    /// Regular expressions (`re`)
    Regex,
    /// Networks (`cidr`)
    Cidr,
}

/// Validated, ordered list of modifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierSet {
    modifiers: Vec<Modifier>,
}

impl ModifierSet {
    /// Parse modifier tokens in rule order
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ValidationError> {
        let mut modifiers = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let modifier: Modifier = token.as_ref().parse()?;
            if modifier == Modifier::Expand && i != 0 {
                return Err(ValidationError::ExpandNotFirst);
            }
            modifiers.push(modifier);
        }

        let set = Self { modifiers };
        if set.has(Modifier::Re) && set.has(Modifier::Cidr) {
            return Err(ValidationError::ConflictingModifiers(
                Modifier::Re.as_str(),
                Modifier::Cidr.as_str(),
            ));
        }
        Ok(set)
    }

    /// Whether the modifier is present
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Pattern interpretation selected by the modifiers
    pub fn mode(&self) -> PatternMode {
        if self.has(Modifier::Cidr) {
            PatternMode::Cidr
        } else if self.has(Modifier::Re) {
            PatternMode::Regex
        } else {
            PatternMode::Glob
        }
    }

    /// No modifiers at all
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Modifiers in rule order
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().copied()
    }
}
