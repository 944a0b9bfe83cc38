//! Rule evaluator

use smallvec::SmallVec;

use crate::attribute::Attributes;
use crate::error::{Result, RuleError};
use crate::rule::ast::{Operator, RuleExpr, RuleNode};

/// Evaluate an AST against a record of attributes.
///
/// `AND` and `OR` short-circuit: the right subtree is not visited (and
/// cannot fail) once the left one decides the result.
pub fn evaluate(node: &RuleNode, attributes: &Attributes) -> Result<bool> {
    match node.expr() {
        RuleExpr::And { left, right } => {
            Ok(evaluate(left, attributes)? && evaluate(right, attributes)?)
        }
        RuleExpr::Or { left, right } => {
            Ok(evaluate(left, attributes)? || evaluate(right, attributes)?)
        }
        RuleExpr::Operand { clause } => evaluate_clause(clause, attributes),
    }
}

/// Evaluate a single `attribute operator value` clause
pub fn evaluate_clause(clause: &str, attributes: &Attributes) -> Result<bool> {
    // Trailing separators do not count as empty parts
    let parts: SmallVec<[&str; 3]> = clause.trim_end_matches(' ').split(' ').collect();
    let [attribute, symbol, raw_value] = parts.as_slice() else {
        return Err(RuleError::MalformedClause(clause.to_string()));
    };

    let comparison = raw_value.replace('\'', "");

    let actual = attributes
        .get(*attribute)
        .ok_or_else(|| RuleError::MissingAttribute(attribute.to_string()))?;

    let operator =
        Operator::from_symbol(symbol).ok_or_else(|| RuleError::UnknownOperator(symbol.to_string()))?;

    match operator {
        Operator::Ordering(op) => {
            let expected: i32 = comparison
                .parse()
                .map_err(|_| RuleError::MalformedClause(clause.to_string()))?;
            Ok(op.compare(actual.as_integer(), expected))
        }
        Operator::Equality(op) => Ok(op.matches(actual.as_text(), &comparison)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;
    use crate::rule::ast::Connective;
    use crate::rule::parser::parse;

    fn attrs(pairs: &[(&str, AttributeValue)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn employee() -> Attributes {
        attrs(&[
            ("age", 35.into()),
            ("department", "Sales".into()),
            ("salary", 60000.into()),
            ("experience", 3.into()),
        ])
    }

    #[test]
    fn test_simple_comparison() {
        let data = employee();
        assert!(evaluate(&parse("age > 30").unwrap(), &data).unwrap());
        assert!(!evaluate(&parse("age < 30").unwrap(), &data).unwrap());
        assert!(evaluate(&parse("age >= 35").unwrap(), &data).unwrap());
        assert!(evaluate(&parse("age <= 35").unwrap(), &data).unwrap());
        assert!(!evaluate(&parse("age <= 34").unwrap(), &data).unwrap());
    }

    #[test]
    fn test_every_operator_at_the_boundary() {
        let data = attrs(&[("age", 35.into()), ("department", "Sales".into())]);
        let cases = [
            ("age > 35", false),
            ("age < 35", false),
            ("age >= 35", true),
            ("age <= 35", true),
            ("age <= 36", true),
            ("department == Sales", true),
            ("department = Sales", true),
            ("department != Sales", false),
        ];
        for (clause, expected) in cases {
            assert_eq!(evaluate_clause(clause, &data), Ok(expected), "Failed for: {}", clause);
        }
    }

    #[test]
    fn test_string_equality_strips_quotes() {
        let data = employee();
        assert!(evaluate(&parse("department == 'Sales'").unwrap(), &data).unwrap());
        assert!(evaluate(&parse("department = Sales").unwrap(), &data).unwrap());
        assert!(!evaluate(&parse("department = 'Marketing'").unwrap(), &data).unwrap());
        assert!(evaluate(&parse("department != 'Marketing'").unwrap(), &data).unwrap());
        assert!(!evaluate(&parse("department != 'Sales'").unwrap(), &data).unwrap());
    }

    #[test]
    fn test_negative_and_signed_thresholds() {
        let data = attrs(&[("balance", (-5).into())]);
        assert!(evaluate(&parse("balance < 0").unwrap(), &data).unwrap());
        assert!(evaluate(&parse("balance > -10").unwrap(), &data).unwrap());
        assert!(evaluate(&parse("balance >= '-5'").unwrap(), &data).unwrap());
    }

    #[test]
    fn test_and_condition() {
        let data = employee();
        assert!(evaluate(&parse("age > 30 AND department = 'Sales'").unwrap(), &data).unwrap());
        assert!(!evaluate(&parse("age > 30 AND department = 'HR'").unwrap(), &data).unwrap());
    }

    #[test]
    fn test_or_condition() {
        let data = employee();
        assert!(evaluate(&parse("age > 40 OR salary > 50000").unwrap(), &data).unwrap());
        assert!(!evaluate(&parse("age > 40 OR salary > 70000").unwrap(), &data).unwrap());
    }

    #[test]
    fn test_complex_condition() {
        let data = employee();
        let rule = "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)";
        assert!(evaluate(&parse(rule).unwrap(), &data).unwrap());

        let junior = attrs(&[
            ("age", 22.into()),
            ("department", "Marketing".into()),
            ("salary", 20000.into()),
            ("experience", 1.into()),
        ]);
        assert!(!evaluate(&parse(rule).unwrap(), &junior).unwrap());
    }

    #[test]
    fn test_and_short_circuits() {
        // Right side would fail with MissingAttribute if visited
        let tree = RuleNode::combine(
            Connective::And,
            RuleNode::operand("age < 18"),
            RuleNode::operand("unknown > 1"),
        )
        .unwrap();
        assert_eq!(evaluate(&tree, &employee()), Ok(false));
    }

    #[test]
    fn test_or_short_circuits() {
        let tree = RuleNode::combine(
            Connective::Or,
            RuleNode::operand("age > 18"),
            RuleNode::operand("this is not a clause"),
        )
        .unwrap();
        assert_eq!(evaluate(&tree, &employee()), Ok(true));
    }

    #[test]
    fn test_right_side_errors_surface_when_visited() {
        let tree = RuleNode::combine(
            Connective::And,
            RuleNode::operand("age > 18"),
            RuleNode::operand("unknown > 1"),
        )
        .unwrap();
        assert_eq!(
            evaluate(&tree, &employee()),
            Err(RuleError::MissingAttribute("unknown".to_string()))
        );
    }

    #[test]
    fn test_missing_attribute_is_an_error() {
        let ast = parse("age > 30").unwrap();
        assert_eq!(
            evaluate(&ast, &Attributes::new()),
            Err(RuleError::MissingAttribute("age".to_string()))
        );
    }

    #[test]
    fn test_malformed_clause() {
        let data = employee();
        for clause in ["age > ", "age", "age > 30 extra", "age  > 30"] {
            assert!(
                matches!(evaluate_clause(clause, &data), Err(RuleError::MalformedClause(_))),
                "Failed for: {:?}",
                clause
            );
        }
    }

    #[test]
    fn test_trailing_space_is_tolerated() {
        assert_eq!(evaluate_clause("age > 30 ", &employee()), Ok(true));
    }

    #[test]
    fn test_non_numeric_threshold_is_malformed() {
        assert!(matches!(
            evaluate_clause("age > thirty", &employee()),
            Err(RuleError::MalformedClause(_))
        ));
    }

    #[test]
    fn test_unknown_operator() {
        assert_eq!(
            evaluate_clause("age => 30", &employee()),
            Err(RuleError::UnknownOperator("=>".to_string()))
        );
    }

    #[test]
    fn test_missing_attribute_reported_before_operator() {
        assert_eq!(
            evaluate_clause("nope ~ 1", &employee()),
            Err(RuleError::MissingAttribute("nope".to_string()))
        );
    }

    // Documented quirk, not a requirement: equality reads the string view,
    // so an integer attribute never equals its own digits.
    #[test]
    fn test_quirk_integer_attribute_equality_uses_empty_string() {
        let data = employee();
        assert_eq!(evaluate_clause("age == 35", &data), Ok(false));
        assert_eq!(evaluate_clause("age != 35", &data), Ok(true));
        assert_eq!(evaluate_clause("age = ''", &data), Ok(true));
    }

    // Documented quirk, not a requirement: ordering reads the integer view,
    // so a string attribute compares as 0.
    #[test]
    fn test_quirk_string_attribute_ordering_uses_zero() {
        let data = employee();
        assert_eq!(evaluate_clause("department > -1", &data), Ok(true));
        assert_eq!(evaluate_clause("department >= 0", &data), Ok(true));
        assert_eq!(evaluate_clause("department > 0", &data), Ok(false));
    }
}
