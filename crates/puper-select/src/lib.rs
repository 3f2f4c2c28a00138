//! Selector compilation and matching for puper.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector compiler** - one selector expression (`div.note#main[lang=en]`)
//!   into a [`CompiledSelector`], an AND of simple selectors
//! - **Match program** - a flat token list (`div`, `>`, `p`, `,`, `a`) into an
//!   ordered [`MatchProgram`] of combinator steps
//! - **Combinator engine** - running a program over a [`DomTree`] to produce
//!   the selected nodes, union branches concatenated in token order
//!
//! # Not Yet Implemented
//!
//! - Pseudo-classes and pseudo-elements
//! - Subsequent-sibling (`~`) combinator
//! - Specificity (selectors here filter, they never compete)
//!
//! [`DomTree`]: puper_dom::DomTree

pub mod engine;
pub mod error;
pub mod parser;
pub mod program;
pub mod selector;
pub mod tokenize;

pub use engine::{NodeSet, select};
pub use error::SelectorSyntaxError;
pub use parser::compile_selector;
pub use program::{MatchProgram, Step, StepKind, Token};
pub use selector::{AttributeSelector, CompiledSelector, SimpleSelector};
pub use tokenize::tokenize;
