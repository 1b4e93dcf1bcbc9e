//! Stack of pending rules.

use std::fmt;

/// Rules the optimizer knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Turn eligible joins into dependent joins.
    ChooseDependent,
    /// Drop redundant SELECT nodes.
    CleanCriteria,
    /// Move SELECT criteria into access nodes.
    PushSelectCriteria,
}

impl RuleKind {
    /// Rule name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ChooseDependent => "ChooseDependent",
            Self::CleanCriteria => "CleanCriteria",
            Self::PushSelectCriteria => "PushSelectCriteria",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// LIFO stack of rules. The last rule pushed runs first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStack {
    rules: Vec<RuleKind>,
}

impl RuleStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a rule to run next.
    pub fn push(&mut self, rule: RuleKind) {
        self.rules.push(rule);
    }

    /// Pop the next rule to run.
    pub fn pop(&mut self) -> Option<RuleKind> {
        self.rules.pop()
    }

    /// Next rule to run, without removing it.
    pub fn peek(&self) -> Option<RuleKind> {
        self.rules.last().copied()
    }

    /// Whether no rules are pending.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn contains(&self, rule: RuleKind) -> bool {
        self.rules.contains(&rule)
    }
}

impl From<Vec<RuleKind>> for RuleStack {
    /// The last element runs first.
    fn from(rules: Vec<RuleKind>) -> Self {
        Self { rules }
    }
}
