//! AST node types.
//!
//! A compiled fragment is a tree of `Node`s. The tree is immutable once the
//! parser hands it out: the compile cache shares one tree across every
//! evaluation of the same source, so nothing in the evaluator takes `&mut Node`.
//!
//! Feature bodies (`def`, `on`) are held behind `Arc` so a function value or a
//! registered event handler can keep its body alive without cloning the tree.

use std::fmt;
use std::sync::Arc;

use crate::{Location, Span};

/// A node with its source span and the line/column of its first token.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub loc: Location,
}

impl Node {
    #[inline]
    pub fn new(kind: NodeKind, span: Span, loc: Location) -> Self {
        Node { kind, span, loc }
    }

    /// The node-type tag used for dispatch.
    #[inline]
    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// The node-type tag as its external string name (e.g. `"literal"`).
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind.tag().as_str()
    }
}

/// Literal values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
}

/// Property side of a member access.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MemberProperty {
    /// `a.b` / `my b` / `a's b`: the literal property name.
    Named(String),
    /// `a[expr]`: the key is evaluated.
    Computed(Box<Node>),
}

/// Object literal key.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ObjectKey {
    /// Bare identifier key: `{ a: 1 }`
    Ident(String),
    /// String or numeric literal key, already rendered as text: `{ "a b": 1, 2: 3 }`
    Literal(String),
    /// Computed key: `{ [expr]: 1 }`
    Computed(Box<Node>),
}

/// Object literal entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectEntry {
    pub key: ObjectKey,
    pub value: Node,
}

/// Where an assignment writes when the target is a bare identifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssignScope {
    /// Existing local, else existing global, else new local.
    #[default]
    Default,
    /// `set local x to ...`
    Local,
    /// `set global x to ...`
    Global,
}

/// The iteration shape of a `repeat` loop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RepeatKind {
    /// `repeat for x in items` / `for x in items`
    ForIn { var: String, iterable: Box<Node> },
    /// `repeat 3 times`
    Times(Box<Node>),
    /// `repeat while cond`
    While(Box<Node>),
    /// `repeat forever`
    Forever,
}

/// One argument of a registry command, with its leading preposition if any.
///
/// `add .active to #menu` has args `[(None, .active), (Some("to"), #menu)]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommandArg {
    pub preposition: Option<String>,
    pub value: Node,
}

/// Binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `==`, `is`
    Eq,
    /// `!=`, `is not`
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    /// `and`, `&&`
    And,
    /// `or`, `||`
    Or,
    In,
    /// `match`, `matches`
    Matches,
    Contains,
}

impl BinaryOp {
    /// Map an operator spelling (symbolic or keyword) to its operator.
    pub fn from_spelling(spelling: &str) -> Option<BinaryOp> {
        Some(match spelling {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" | "mod" => BinaryOp::Mod,
            "==" | "is" => BinaryOp::Eq,
            "!=" | "is not" => BinaryOp::NotEq,
            "===" => BinaryOp::StrictEq,
            "!==" => BinaryOp::StrictNotEq,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::LtEq,
            ">=" => BinaryOp::GtEq,
            "and" | "&&" => BinaryOp::And,
            "or" | "||" => BinaryOp::Or,
            "in" => BinaryOp::In,
            "match" | "matches" => BinaryOp::Matches,
            "contains" => BinaryOp::Contains,
            _ => return None,
        })
    }

    /// Canonical spelling, used in error messages.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::In => "in",
            BinaryOp::Matches => "matches",
            BinaryOp::Contains => "contains",
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
    /// `not`, `!`
    Not,
    /// `no`: true for null, undefined, and empty strings/arrays/collections
    No,
    /// `-`
    Neg,
    /// `+`
    Plus,
}

impl UnaryOp {
    pub fn from_spelling(spelling: &str) -> Option<UnaryOp> {
        Some(match spelling {
            "not" | "!" => UnaryOp::Not,
            "no" => UnaryOp::No,
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Plus,
            _ => return None,
        })
    }
}

/// Node kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeKind {
    // Literals
    Literal(Literal),
    /// Raw template body; `${...}` spans are resolved at evaluation time.
    Template(String),
    Array(Vec<Node>),
    Object(Vec<ObjectEntry>),

    // References
    Identifier(String),
    /// `$name`
    Dollar(String),
    /// `@name`: attribute of `me`
    AttributeRef(String),
    /// CSS selector text from `.cls`, `#id` or `<sel/>`
    Selector(String),
    Member {
        object: Box<Node>,
        property: MemberProperty,
    },

    // Operators
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },

    // Calls
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },

    // Commands
    Set {
        target: Box<Node>,
        value: Box<Node>,
        scope: AssignScope,
    },
    /// `call expr` / `get expr`: evaluates and stores into `it` and `result`.
    Get(Box<Node>),
    /// A command resolved through the command registry at evaluation time.
    Command {
        name: String,
        args: Vec<CommandArg>,
    },
    /// `def name(params) ... end`
    Def {
        name: String,
        params: Vec<String>,
        body: Arc<Node>,
    },
    /// `on event ... end`
    On {
        event: String,
        body: Arc<Node>,
    },

    // Control flow
    Sequence(Vec<Node>),
    If {
        test: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    Repeat {
        kind: RepeatKind,
        body: Box<Node>,
    },
    Return(Option<Box<Node>>),
    Exit,
    Halt,
    Break,
    Continue,
    Throw(Box<Node>),
}

impl NodeKind {
    /// The dispatch tag of this node kind.
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Literal(_) => NodeTag::Literal,
            NodeKind::Template(_) => NodeTag::Template,
            NodeKind::Array(_) => NodeTag::Array,
            NodeKind::Object(_) => NodeTag::Object,
            NodeKind::Identifier(_) => NodeTag::Identifier,
            NodeKind::Dollar(_) => NodeTag::Dollar,
            NodeKind::AttributeRef(_) => NodeTag::AttributeRef,
            NodeKind::Selector(_) => NodeTag::Selector,
            NodeKind::Member { .. } => NodeTag::Member,
            NodeKind::Binary { .. } => NodeTag::Binary,
            NodeKind::Unary { .. } => NodeTag::Unary,
            NodeKind::Conditional { .. } => NodeTag::Conditional,
            NodeKind::Call { .. } => NodeTag::Call,
            NodeKind::Set { .. } => NodeTag::Set,
            NodeKind::Get(_) => NodeTag::Get,
            NodeKind::Command { .. } => NodeTag::Command,
            NodeKind::Def { .. } => NodeTag::Def,
            NodeKind::On { .. } => NodeTag::On,
            NodeKind::Sequence(_) => NodeTag::Sequence,
            NodeKind::If { .. } => NodeTag::If,
            NodeKind::Repeat { .. } => NodeTag::Repeat,
            NodeKind::Return(_) => NodeTag::Return,
            NodeKind::Exit => NodeTag::Exit,
            NodeKind::Halt => NodeTag::Halt,
            NodeKind::Break => NodeTag::Break,
            NodeKind::Continue => NodeTag::Continue,
            NodeKind::Throw(_) => NodeTag::Throw,
        }
    }
}

/// Fieldless mirror of `NodeKind`, used as the dispatch key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NodeTag {
    Literal,
    Template,
    Array,
    Object,
    Identifier,
    Dollar,
    AttributeRef,
    Selector,
    Member,
    Binary,
    Unary,
    Conditional,
    Call,
    Set,
    Get,
    Command,
    Def,
    On,
    Sequence,
    If,
    Repeat,
    Return,
    Exit,
    Halt,
    Break,
    Continue,
    Throw,
}

impl NodeTag {
    /// Every tag, in declaration order.
    pub const ALL: [NodeTag; 27] = [
        NodeTag::Literal,
        NodeTag::Template,
        NodeTag::Array,
        NodeTag::Object,
        NodeTag::Identifier,
        NodeTag::Dollar,
        NodeTag::AttributeRef,
        NodeTag::Selector,
        NodeTag::Member,
        NodeTag::Binary,
        NodeTag::Unary,
        NodeTag::Conditional,
        NodeTag::Call,
        NodeTag::Set,
        NodeTag::Get,
        NodeTag::Command,
        NodeTag::Def,
        NodeTag::On,
        NodeTag::Sequence,
        NodeTag::If,
        NodeTag::Repeat,
        NodeTag::Return,
        NodeTag::Exit,
        NodeTag::Halt,
        NodeTag::Break,
        NodeTag::Continue,
        NodeTag::Throw,
    ];

    /// External node-type name.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeTag::Literal => "literal",
            NodeTag::Template => "templateLiteral",
            NodeTag::Array => "arrayLiteral",
            NodeTag::Object => "objectLiteral",
            NodeTag::Identifier => "identifier",
            NodeTag::Dollar => "dollarExpression",
            NodeTag::AttributeRef => "attributeRef",
            NodeTag::Selector => "selector",
            NodeTag::Member => "memberExpression",
            NodeTag::Binary => "binaryExpression",
            NodeTag::Unary => "unaryExpression",
            NodeTag::Conditional => "conditionalExpression",
            NodeTag::Call => "callExpression",
            NodeTag::Set => "setCommand",
            NodeTag::Get => "getCommand",
            NodeTag::Command => "command",
            NodeTag::Def => "defFeature",
            NodeTag::On => "eventHandler",
            NodeTag::Sequence => "commandSequence",
            NodeTag::If => "ifCommand",
            NodeTag::Repeat => "repeatCommand",
            NodeTag::Return => "returnCommand",
            NodeTag::Exit => "exitCommand",
            NodeTag::Halt => "haltCommand",
            NodeTag::Break => "breakCommand",
            NodeTag::Continue => "continueCommand",
            NodeTag::Throw => "throwCommand",
        }
    }
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
