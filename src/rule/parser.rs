//! Rule string parser
//!
//! A single left-to-right scan over the tokens with two stacks: built
//! operand nodes and connectives that could not be applied yet.

use crate::error::{Result, RuleError};
use crate::rule::ast::{assign_depth_tags, Connective, RuleNode};
use crate::rule::tokenizer::{tokenize, Token};

/// Depth tag given to the root of every parsed tree
pub const ROOT_DEPTH_TAG: u32 = 1;

/// Parse a rule string into an AST
pub fn parse(rule: &str) -> Result<RuleNode> {
    let mut scan = Scan::default();
    for token in tokenize(rule) {
        scan.push(token)?;
    }
    let root = scan.finish()?;
    Ok(assign_depth_tags(root, ROOT_DEPTH_TAG))
}

#[derive(Default)]
struct Scan {
    operands: Vec<RuleNode>,
    deferred: Vec<Connective>,
    clause: String,
    building: bool,
}

impl Scan {
    fn push(&mut self, token: Token<'_>) -> Result<()> {
        if self.building && matches!(token, Token::Connective(_) | Token::CloseParen) {
            self.finish_clause();
        }

        match token {
            Token::Connective(connective) => {
                if !self.deferred.is_empty() || self.operands.len() < 2 {
                    self.deferred.push(connective);
                } else {
                    self.reduce(connective)?;
                }
            }
            // Grouping only shows through the operand count at the next `)` or connective
            Token::OpenParen => {}
            Token::CloseParen => {
                if self.operands.len() >= 2 {
                    let connective = self.deferred.pop().ok_or(RuleError::StructuralParse {
                        reason: "closing parenthesis without a pending connective",
                        operands: self.operands.len(),
                    })?;
                    self.reduce(connective)?;
                }
            }
            Token::Word(word) => {
                self.clause.push_str(word);
                self.clause.push(' ');
                self.building = true;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<RuleNode> {
        if self.building {
            self.finish_clause();
        }

        while let Some(connective) = self.deferred.pop() {
            self.reduce(connective)?;
        }

        if self.operands.len() > 1 {
            return Err(RuleError::StructuralParse {
                reason: "too many operands",
                operands: self.operands.len(),
            });
        }
        self.operands.pop().ok_or(RuleError::StructuralParse {
            reason: "no expression found",
            operands: 0,
        })
    }

    fn finish_clause(&mut self) {
        self.operands.push(RuleNode::operand(self.clause.trim()));
        self.clause.clear();
        self.building = false;
    }

    /// Replace the top two operands with `connective(left, right)`
    fn reduce(&mut self, connective: Connective) -> Result<()> {
        let operands = self.operands.len();
        match (self.operands.pop(), self.operands.pop()) {
            (Some(right), Some(left)) => {
                let node = RuleNode::combine(connective, left, right).map_err(|_| {
                    RuleError::StructuralParse {
                        reason: "rule nests too deeply",
                        operands,
                    }
                })?;
                self.operands.push(node);
                Ok(())
            }
            _ => Err(RuleError::StructuralParse {
                reason: "connective is missing an operand",
                operands,
            }),
        }
    }
}
