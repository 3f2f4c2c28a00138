//! Selector tokens and the compiled match program.
//!
//! The token list is scanned once, left to right, with a small state machine:
//! `>` and `+` set the combinator for the next selector expression, `,` starts
//! a new union branch, and every expression becomes one [`Step`] carrying the
//! combinator that was pending when it was read. The result is a flat,
//! immutable [`MatchProgram`]; running it lives in [`crate::engine`].

use std::fmt;

use puper_common::warn_once;

use crate::error::SelectorSyntaxError;
use crate::parser::compile_selector;
use crate::selector::CompiledSelector;

/// One atomic item of the selector input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `*` - select everything, a pass-through.
    All,
    /// `>` - the next expression matches direct children only.
    Child,
    /// `+` - the next expression matches the immediately following sibling.
    NextSibling,
    /// `,` - close the current union branch and restart from the root.
    Union,
    /// Any other text: a selector expression for the compiler.
    Expression(&'a str),
}

impl<'a> Token<'a> {
    /// Classify one raw token. Only the exact literals `*`, `>`, `+` and `,`
    /// are combinator symbols; everything else is an expression.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        match raw {
            "*" => Self::All,
            ">" => Self::Child,
            "+" => Self::NextSibling,
            "," => Self::Union,
            _ => Self::Expression(raw),
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// How a step turns the current node set into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// `*`: leaves the current set untouched.
    SelectAll,
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// The implicit combinator between two expressions.
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    Child,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    NextSibling,
    /// `,`: the current branch is finished; the next one starts at the root.
    UnionSplit,
}

/// One instruction of a [`MatchProgram`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The combinator this step applies.
    pub kind: StepKind,
    /// The predicate to filter with; `None` for `SelectAll` and `UnionSplit`.
    pub selector: Option<CompiledSelector>,
}

impl Step {
    const fn marker(kind: StepKind) -> Self {
        Self {
            kind,
            selector: None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selector = self.selector.as_ref().map_or("", CompiledSelector::source);
        match self.kind {
            StepKind::SelectAll => f.write_str("*"),
            StepKind::UnionSplit => f.write_str(","),
            StepKind::Descendant => f.write_str(selector),
            StepKind::Child => write!(f, "> {selector}"),
            StepKind::NextSibling => write!(f, "+ {selector}"),
        }
    }
}

/// An ordered list of steps, compiled once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchProgram {
    steps: Vec<Step>,
}

impl MatchProgram {
    /// Compile a token list.
    ///
    /// Compilation is fail-fast: the first malformed expression aborts and no
    /// program is produced. A combinator symbol with no expression after it
    /// (at the end of the list or right before `,`) has nothing to apply to
    /// and is dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns the [`SelectorSyntaxError`] of the first expression that does
    /// not compile.
    pub fn compile<S: AsRef<str>>(tokens: &[S]) -> Result<Self, SelectorSyntaxError> {
        let mut steps = Vec::with_capacity(tokens.len());
        let mut pending = StepKind::Descendant;

        for raw in tokens {
            match Token::parse(raw.as_ref()) {
                Token::All => steps.push(Step::marker(StepKind::SelectAll)),
                Token::Child => pending = StepKind::Child,
                Token::NextSibling => pending = StepKind::NextSibling,
                Token::Union => {
                    warn_dangling(pending);
                    steps.push(Step::marker(StepKind::UnionSplit));
                    pending = StepKind::Descendant;
                }
                Token::Expression(text) => {
                    let selector = compile_selector(text)?;
                    steps.push(Step {
                        kind: pending,
                        selector: Some(selector),
                    });
                    pending = StepKind::Descendant;
                }
            }
        }
        warn_dangling(pending);

        let program = Self { steps };
        tracing::debug!(program = %program, steps = program.len(), "compiled selector program");
        Ok(program)
    }

    /// The compiled steps, in token order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// True for the program compiled from an empty token list.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

fn warn_dangling(pending: StepKind) {
    let symbol = match pending {
        StepKind::Child => '>',
        StepKind::NextSibling => '+',
        _ => return,
    };
    let _ = warn_once(
        "selector",
        &format!("'{symbol}' is not followed by a selector and is ignored"),
    );
}

impl fmt::Display for MatchProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
