//! Folding several rules into one tree

use crate::error::{Result, RuleError};
use crate::rule::ast::{Connective, RuleNode};
use crate::rule::parser::parse;

/// Left-fold already parsed trees with a single connective.
///
/// `[r1, r2, r3]` becomes `((r1 op r2) op r3)`. Depth tags are not
/// reassigned; run [`assign_depth_tags`](crate::rule::assign_depth_tags)
/// on the result if they matter. Each rule adds one level to the left
/// spine, so folding more than [`MAX_TREE_DEPTH`](crate::rule::MAX_TREE_DEPTH) trees fails with
/// [`RuleError::NestingTooDeep`].
pub fn combine<I>(rules: I, connective: Connective) -> Result<RuleNode>
where
    I: IntoIterator<Item = RuleNode>,
{
    let mut rules = rules.into_iter();
    let first = rules.next().ok_or(RuleError::EmptyCombineInput)?;
    rules.try_fold(first, |acc, rule| RuleNode::combine(connective, acc, rule))
}

/// Parse every rule string, then fold the trees with `connective`
pub fn combine_rules<S>(rules: &[S], connective: Connective) -> Result<RuleNode>
where
    S: AsRef<str>,
{
    let parsed = rules
        .iter()
        .map(|rule| parse(rule.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    combine(parsed, connective)
}
