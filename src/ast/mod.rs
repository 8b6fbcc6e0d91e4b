//! Expression tree for compiled detections
//!
//! Every rule condition resolves to a single [`Expr`]. Evaluation is a pure,
//! short-circuiting walk from left to right; the only state touched is the
//! matcher cache inside each [`SearchAtom`].

use crate::event::{Event, MatchOptions};

/// Search atom leaves
pub mod atom;
pub use atom::SearchAtom;

/// A node of the detection expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A search identifier's expression, tagged with its name
    Named {
        /// Identifier from the `detection` block
        name: String,
        /// The identifier's expression
        expr: Box<Expr>,
    },
    /// Logical complement
    Not(Box<Expr>),
    /// True when every child is true, in order
    And(Vec<Expr>),
    /// True when any child is true, in order
    Or(Vec<Expr>),
    /// Leaf matcher
    SearchAtom(SearchAtom),
}

impl Expr {
    /// Tag an expression with the identifier it came from
    pub fn named(name: impl Into<String>, expr: Expr) -> Self {
        Expr::Named {
            name: name.into(),
            expr: Box::new(expr),
        }
    }

    /// Negate an expression
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// Conjunction, or the only child when there is just one
    pub fn and(mut children: Vec<Expr>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Expr::And(children)
        }
    }

    /// Disjunction, or the only child when there is just one
    pub fn or(mut children: Vec<Expr>) -> Self {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Expr::Or(children)
        }
    }

    /// Evaluate against an event
    pub fn matches(&self, event: &dyn Event, options: &MatchOptions) -> bool {
        match self {
            Expr::Named { expr, .. } => expr.matches(event, options),
            Expr::Not(expr) => !expr.matches(event, options),
            Expr::And(children) => children.iter().all(|c| c.matches(event, options)),
            Expr::Or(children) => children.iter().any(|c| c.matches(event, options)),
            Expr::SearchAtom(atom) => atom.matches(event, options),
        }
    }

    /// Render the tree as condition-like text
    pub fn describe(&self) -> String {
        match self {
            Expr::Named { name, .. } => name.clone(),
            Expr::Not(expr) => format!("not {}", expr.describe_operand()),
            Expr::And(children) => Self::describe_list(children, " and "),
            Expr::Or(children) => Self::describe_list(children, " or "),
            Expr::SearchAtom(atom) => atom.describe(),
        }
    }

    fn describe_operand(&self) -> String {
        match self {
            Expr::And(children) | Expr::Or(children) if children.len() > 1 => {
                format!("({})", self.describe())
            }
            _ => self.describe(),
        }
    }

    fn describe_list(children: &[Expr], separator: &str) -> String {
        children
            .iter()
            .map(Expr::describe_operand)
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Names of the `Named` nodes, in evaluation order
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::Named { name, expr } => {
                names.push(name);
                expr.collect_identifiers(names);
            }
            Expr::Not(expr) => expr.collect_identifiers(names),
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.collect_identifiers(names);
                }
            }
            Expr::SearchAtom(_) => {}
        }
    }
}

impl From<SearchAtom> for Expr {
    fn from(atom: SearchAtom) -> Self {
        Expr::SearchAtom(atom)
    }
}
