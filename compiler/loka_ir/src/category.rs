//! Node-type categories.
//!
//! Every node tag belongs to exactly one category. The evaluator loads node
//! implementations a category at a time, so a fragment that only uses
//! literals and operators never pulls in the control-flow group.

use std::fmt;
use std::str::FromStr;

use crate::NodeTag;

/// A named bucket of node-type implementations loaded as a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Category {
    /// Literal, template, array and object literals.
    Literals,
    /// Identifiers, `$name`, `@attr`, selectors and member access.
    References,
    /// Binary, unary and conditional expressions.
    Operators,
    /// Call expressions.
    Calls,
    /// Set/get, registry commands and feature definitions.
    Commands,
    /// Sequences, conditionals, loops and the five signal-raising commands.
    Control,
}

impl Category {
    /// Every category, in load-priority order.
    pub const ALL: [Category; 6] = [
        Category::Literals,
        Category::References,
        Category::Operators,
        Category::Calls,
        Category::Commands,
        Category::Control,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Literals => "literals",
            Category::References => "references",
            Category::Operators => "operators",
            Category::Calls => "calls",
            Category::Commands => "commands",
            Category::Control => "control",
        }
    }

    /// Tags owned by this category.
    pub fn tags(self) -> impl Iterator<Item = NodeTag> {
        NodeTag::ALL
            .into_iter()
            .filter(move |tag| tag.category() == self)
    }
}

impl NodeTag {
    /// The category this tag's implementation lives in.
    pub fn category(self) -> Category {
        match self {
            NodeTag::Literal | NodeTag::Template | NodeTag::Array | NodeTag::Object => {
                Category::Literals
            }
            NodeTag::Identifier
            | NodeTag::Dollar
            | NodeTag::AttributeRef
            | NodeTag::Selector
            | NodeTag::Member => Category::References,
            NodeTag::Binary | NodeTag::Unary | NodeTag::Conditional => Category::Operators,
            NodeTag::Call => Category::Calls,
            NodeTag::Set | NodeTag::Get | NodeTag::Command | NodeTag::Def | NodeTag::On => {
                Category::Commands
            }
            NodeTag::Sequence
            | NodeTag::If
            | NodeTag::Repeat
            | NodeTag::Return
            | NodeTag::Exit
            | NodeTag::Halt
            | NodeTag::Break
            | NodeTag::Continue
            | NodeTag::Throw => Category::Control,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests;
