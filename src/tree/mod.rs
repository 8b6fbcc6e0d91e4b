use crate::ast::Expr;
use crate::event::{Event, MatchOptions};

pub mod builder;

pub use builder::build_detection;

/// Detection wraps the fully resolved expression for a rule's condition(s)
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Root of the expression tree
    pub expr: Expr,
}

impl Detection {
    /// Create a new Detection with the given root expression
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// Evaluate an event against this detection
    pub fn matches(&self, event: &dyn Event, options: &MatchOptions) -> bool {
        self.expr.matches(event, options)
    }
}
