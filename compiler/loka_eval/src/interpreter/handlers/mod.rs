//! Built-in node handlers, grouped by category.
//!
//! Each handler has the `NodeHandler` shape and matches on the one node kind
//! it is registered for.

mod calls;
mod commands;
mod control;
mod literals;
mod operators;
mod references;

use loka_ir::{Category, Node, NodeTag};

use crate::errors::unsupported_node_type;
use crate::loader::CategoryTable;
use crate::ControlAction;

/// The built-in table for `category`.
pub(crate) fn table(category: Category) -> CategoryTable {
    let table = CategoryTable::new(category);
    match category {
        Category::Literals => table
            .with(NodeTag::Literal, literals::literal)
            .with(NodeTag::Template, literals::template)
            .with(NodeTag::Array, literals::array)
            .with(NodeTag::Object, literals::object),
        Category::References => table
            .with(NodeTag::Identifier, references::identifier)
            .with(NodeTag::Dollar, references::dollar)
            .with(NodeTag::AttributeRef, references::attribute)
            .with(NodeTag::Selector, references::selector)
            .with(NodeTag::Member, references::member),
        Category::Operators => table
            .with(NodeTag::Binary, operators::binary)
            .with(NodeTag::Unary, operators::unary)
            .with(NodeTag::Conditional, operators::conditional),
        Category::Calls => table.with(NodeTag::Call, calls::call),
        Category::Commands => table
            .with(NodeTag::Set, commands::set)
            .with(NodeTag::Get, commands::get)
            .with(NodeTag::Command, commands::command)
            .with(NodeTag::Def, commands::def)
            .with(NodeTag::On, commands::on),
        Category::Control => table
            .with(NodeTag::Sequence, control::sequence)
            .with(NodeTag::If, control::if_command)
            .with(NodeTag::Repeat, control::repeat)
            .with(NodeTag::Return, control::return_command)
            .with(NodeTag::Exit, control::signal)
            .with(NodeTag::Halt, control::signal)
            .with(NodeTag::Break, control::signal)
            .with(NodeTag::Continue, control::signal)
            .with(NodeTag::Throw, control::throw),
    }
}

/// A handler was handed a node kind it is not registered for.
#[cold]
fn mismatch(node: &Node) -> ControlAction {
    unsupported_node_type(node.type_name()).into()
}
