//! Abstract Syntax Tree for rule expressions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuleError};

/// Maximum number of nodes on any root-to-leaf path.
///
/// Evaluation, depth tagging, JSON encoding and drop all recurse once per
/// level, so every constructor refuses to build anything taller.
pub const MAX_TREE_DEPTH: usize = 256;

/// Boolean connective joining two sub-rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl Connective {
    /// Match `AND` / `OR` in any letter case
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("AND") {
            Some(Connective::And)
        } else if word.eq_ignore_ascii_case("OR") {
            Some(Connective::Or)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl FromStr for Connective {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Connective::from_keyword(s.trim()).ok_or_else(|| RuleError::UnknownConnective(s.to_string()))
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators allowed inside a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Compares the integer view of the attribute
    Ordering(OrderingOp),
    /// Compares the string view of the attribute
    Equality(EqualityOp),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingOp {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOp {
    /// Equal (== or =)
    Equal,
    /// Not equal (!=)
    NotEqual,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            ">" => Operator::Ordering(OrderingOp::Greater),
            "<" => Operator::Ordering(OrderingOp::Less),
            ">=" => Operator::Ordering(OrderingOp::GreaterEqual),
            "<=" => Operator::Ordering(OrderingOp::LessEqual),
            "==" | "=" => Operator::Equality(EqualityOp::Equal),
            "!=" => Operator::Equality(EqualityOp::NotEqual),
            _ => return None,
        };
        Some(op)
    }
}

impl OrderingOp {
    pub fn compare(self, actual: i32, expected: i32) -> bool {
        match self {
            OrderingOp::Greater => actual > expected,
            OrderingOp::Less => actual < expected,
            OrderingOp::GreaterEqual => actual >= expected,
            OrderingOp::LessEqual => actual <= expected,
        }
    }
}

impl EqualityOp {
    pub fn matches(self, actual: &str, expected: &str) -> bool {
        match self {
            EqualityOp::Equal => actual == expected,
            EqualityOp::NotEqual => actual != expected,
        }
    }
}

/// Node kind as seen by introspection and serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    And,
    Or,
    Operand,
}

/// Shape of a node: a connective with two children or a raw comparison clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum RuleExpr {
    #[serde(rename = "AND")]
    And {
        left: Box<RuleNode>,
        right: Box<RuleNode>,
    },
    #[serde(rename = "OR")]
    Or {
        left: Box<RuleNode>,
        right: Box<RuleNode>,
    },
    #[serde(rename = "OPERAND")]
    Operand { clause: String },
}

/// AST node for rule expressions
///
/// Children are owned exclusively by their parent. The only field written
/// after construction is `depth_tag`, see [`assign_depth_tags`]. No tree is
/// ever taller than [`MAX_TREE_DEPTH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireNode")]
pub struct RuleNode {
    #[serde(default)]
    depth_tag: u32,
    #[serde(skip)]
    height: usize,
    #[serde(flatten)]
    expr: RuleExpr,
}

impl RuleNode {
    /// Leaf node holding a comparison clause such as `age > 30`
    pub fn operand(clause: impl Into<String>) -> Self {
        Self {
            depth_tag: 0,
            height: 1,
            expr: RuleExpr::Operand {
                clause: clause.into(),
            },
        }
    }

    /// Connective node over two existing subtrees
    ///
    /// Fails with [`RuleError::NestingTooDeep`] when the result would be
    /// taller than [`MAX_TREE_DEPTH`].
    pub fn combine(connective: Connective, left: RuleNode, right: RuleNode) -> Result<Self> {
        let height = 1 + left.height.max(right.height);
        if height > MAX_TREE_DEPTH {
            return Err(RuleError::NestingTooDeep {
                limit: MAX_TREE_DEPTH,
            });
        }

        let (left, right) = (Box::new(left), Box::new(right));
        let expr = match connective {
            Connective::And => RuleExpr::And { left, right },
            Connective::Or => RuleExpr::Or { left, right },
        };
        Ok(Self {
            depth_tag: 0,
            height,
            expr,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self.expr {
            RuleExpr::And { .. } => NodeKind::And,
            RuleExpr::Or { .. } => NodeKind::Or,
            RuleExpr::Operand { .. } => NodeKind::Operand,
        }
    }

    /// The connective of this node, `None` for leaves
    pub fn connective(&self) -> Option<Connective> {
        match self.expr {
            RuleExpr::And { .. } => Some(Connective::And),
            RuleExpr::Or { .. } => Some(Connective::Or),
            RuleExpr::Operand { .. } => None,
        }
    }

    pub fn expr(&self) -> &RuleExpr {
        &self.expr
    }

    pub fn clause(&self) -> Option<&str> {
        match &self.expr {
            RuleExpr::Operand { clause } => Some(clause),
            _ => None,
        }
    }

    pub fn left(&self) -> Option<&RuleNode> {
        match &self.expr {
            RuleExpr::And { left, .. } | RuleExpr::Or { left, .. } => Some(left),
            RuleExpr::Operand { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&RuleNode> {
        match &self.expr {
            RuleExpr::And { right, .. } | RuleExpr::Or { right, .. } => Some(right),
            RuleExpr::Operand { .. } => None,
        }
    }

    pub fn depth_tag(&self) -> u32 {
        self.depth_tag
    }

    /// Nodes on the longest root-to-leaf path; 1 for a leaf
    pub fn height(&self) -> usize {
        self.height
    }

    /// Encode the tree in its stable JSON shape
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a tree previously produced by [`RuleNode::to_json`]
    ///
    /// Documents nested deeper than [`MAX_TREE_DEPTH`] are refused before
    /// decoding starts.
    pub fn from_json(json: &str) -> Result<Self> {
        if json_nesting_depth(json) > MAX_TREE_DEPTH {
            return Err(RuleError::NestingTooDeep {
                limit: MAX_TREE_DEPTH,
            });
        }

        // Height is bounded above, so serde_json's own limit of 128 is not needed
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let node = RuleNode::deserialize(&mut de)?;
        de.end()?;
        Ok(node)
    }
}

impl fmt::Display for RuleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            RuleExpr::Operand { clause } => f.write_str(clause),
            RuleExpr::And { left, right } => write!(f, "({} AND {})", left, right),
            RuleExpr::Or { left, right } => write!(f, "({} OR {})", left, right),
        }
    }
}

/// Incoming JSON form of a node, checked and rebuilt through [`RuleNode::combine`]
#[derive(Deserialize)]
struct WireNode {
    kind: WireKind,
    #[serde(default)]
    depth_tag: u32,
    #[serde(default)]
    clause: Option<String>,
    #[serde(default)]
    left: Option<Box<WireNode>>,
    #[serde(default)]
    right: Option<Box<WireNode>>,
}

#[derive(Deserialize)]
enum WireKind {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "OPERAND")]
    Operand,
}

impl TryFrom<WireNode> for RuleNode {
    type Error = RuleError;

    fn try_from(wire: WireNode) -> Result<Self> {
        let mut node = match (wire.kind, wire.clause, wire.left, wire.right) {
            (WireKind::Operand, Some(clause), None, None) => RuleNode::operand(clause),
            (WireKind::And, None, Some(left), Some(right)) => {
                RuleNode::combine(Connective::And, (*left).try_into()?, (*right).try_into()?)?
            }
            (WireKind::Or, None, Some(left), Some(right)) => {
                RuleNode::combine(Connective::Or, (*left).try_into()?, (*right).try_into()?)?
            }
            (WireKind::Operand, ..) => {
                return Err(RuleError::Serialization(
                    "OPERAND node needs a clause and no children".to_string(),
                ))
            }
            (WireKind::And | WireKind::Or, ..) => {
                return Err(RuleError::Serialization(
                    "AND/OR node needs left and right and no clause".to_string(),
                ))
            }
        };
        node.depth_tag = wire.depth_tag;
        Ok(node)
    }
}

/// Deepest object/array nesting in a JSON text, ignoring brackets inside strings
fn json_nesting_depth(json: &str) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Tag every node of `root` with its recursion depth, starting at `start`.
///
/// Children are tagged `parent + 1` before the parent receives its own tag,
/// so siblings and cousins at the same depth share a tag. The tag is a
/// structural annotation, not an identity.
pub fn assign_depth_tags(mut root: RuleNode, start: u32) -> RuleNode {
    tag_in_place(&mut root, start);
    root
}

fn tag_in_place(node: &mut RuleNode, tag: u32) {
    if let RuleExpr::And { left, right } | RuleExpr::Or { left, right } = &mut node.expr {
        tag_in_place(left, tag + 1);
        tag_in_place(right, tag + 1);
    }
    node.depth_tag = tag;
}
