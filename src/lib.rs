//! Sigma detection rule engine
//!
//! Parses rules written in the YAML-based Sigma language and evaluates them
//! against structured log entries. A rule's `detection` block is compiled
//! once into an expression tree whose leaves are search atoms; evaluating a
//! log entry is a pure, synchronous walk over that tree.
//!
//! # Example
//!
//! ```
//! use sigma_match::{parse_rule, LogEntry, MatchOptions};
//!
//! # fn example() -> sigma_match::Result<()> {
//! let rule = parse_rule(r#"
//! title: Whoami via cmd
//! detection:
//!   selection:
//!     Image|endswith: '\cmd.exe'
//!     CommandLine|windash|contains: '-c whoami'
//!   condition: selection
//! "#)?;
//!
//! let entry = LogEntry::new("process started")
//!     .with_field("Image", "C:\\Windows\\System32\\cmd.exe")
//!     .with_field("CommandLine", "cmd.exe /c whoami");
//!
//! assert!(rule.detection.expr.matches(&entry, &MatchOptions::default()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Loading many rules
//!
//! ```no_run
//! use sigma_match::{LogEntry, MatchOptions, RuleSetBuilder};
//!
//! # fn example() -> anyhow::Result<()> {
//! let ruleset = RuleSetBuilder::new()
//!     .add_rule_path("/path/to/rules")
//!     .fail_on_parse_error(false)
//!     .build()?;
//!
//! let options = MatchOptions::new().with_placeholder("admins", ["root", "admin"]);
//! for rule_match in ruleset.evaluate(&LogEntry::new("hello"), &options) {
//!     println!("{}", rule_match.title);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

// Re-export commonly used items
pub use ast::{Expr, SearchAtom};
pub use error::{LoadError, Result, SigmaError};
pub use event::{Event, LogEntry, MatchOptions};
pub use parser::{parse_condition, ParseError};
pub use pattern::{Modifier, ValidationError};
pub use rule::{parse_rule, Level, Logsource, Rule, RuleDate, Status, Tags};
pub use ruleset::{RuleMatch, RuleSet, RuleSetBuilder};
pub use tree::Detection;

/// Log entries and the event abstraction
pub mod event;

/// Expression tree and matching semantics
pub mod ast;

/// Error types
pub mod error;

/// Lexical analysis of conditions
pub mod lexer;

/// Condition parser
pub mod parser;

/// Rule definitions and YAML parsing
pub mod rule;

/// Search atom pattern compilation
pub mod pattern;

/// Detection building
pub mod tree;

/// RuleSet for managing multiple rules
pub mod ruleset;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber with default settings
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
