//! Parameter extraction
//!
//! Flattens a parsed filter into `(parameter, [{operator, value}])`
//! constraints. Logical structure (`and`, `or`, `not`, grouping) is
//! discarded; only the comparisons matter.

use crate::ast::{CompValue, Expression, ParamExp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Leave the operator off values compared with `eq`
    pub omit_operator_eq: bool,
}

/// All constraints on one parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhirFilter {
    pub param: String,
    pub values: Vec<FhirFilterValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FhirFilterValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub value: String,
}

/// Extract the constraints of a parsed expression
///
/// Entries are unique by `param` and ordered by first occurrence; values of
/// a parameter keep source order.
pub fn extract(expr: &Expression, options: &ExtractOptions) -> Vec<FhirFilter> {
    expr.param_exps()
        .into_iter()
        .map(|param| constraint(param, options))
        .fold(Vec::new(), merge)
}

fn constraint(param: &ParamExp, options: &ExtractOptions) -> (String, FhirFilterValue) {
    let operator = if options.omit_operator_eq && param.operator.is_eq() {
        None
    } else {
        Some(param.operator.as_str().to_string())
    };

    let value = FhirFilterValue {
        operator,
        value: comp_value_text(&param.right),
    };
    (param.left.to_string(), value)
}

fn merge(
    mut filters: Vec<FhirFilter>,
    (param, value): (String, FhirFilterValue),
) -> Vec<FhirFilter> {
    match filters.iter_mut().find(|f| f.param == param) {
        Some(existing) => existing.values.push(value),
        None => filters.push(FhirFilter {
            param,
            values: vec![value],
        }),
    }
    filters
}

/// Text of a comparison value
///
/// Strings lose exactly one leading and one trailing character and are then
/// trimmed. Escape sequences inside the quotes are left as written.
fn comp_value_text(value: &CompValue) -> String {
    match value {
        CompValue::StringLiteral(raw) => strip_quotes(raw).trim().to_string(),
        CompValue::NumberOrDate(raw) | CompValue::Token(raw) => raw.clone(),
    }
}

fn strip_quotes(raw: &str) -> &str {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn param(name: &str, op: &str, right: CompValue) -> BaseExpression {
        BaseExpression::Filter(BaseFilter::Param(ParamExp {
            left: ParamValue::Path(ParamPath::name(name)),
            operator: CompareOp::new(op),
            right,
        }))
    }

    fn value(operator: Option<&str>, value: &str) -> FhirFilterValue {
        FhirFilterValue {
            operator: operator.map(str::to_string),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes(r#""abc""#), "abc");
        assert_eq!(strip_quotes(r#""""#), "");
        assert_eq!(strip_quotes(r#""a\"""#), r#"a\""#);
        assert_eq!(strip_quotes(r#""ő""#), "ő");
    }

    #[test]
    fn test_string_value_is_trimmed() {
        assert_eq!(
            comp_value_text(&CompValue::StringLiteral(r#""  padded ""#.into())),
            "padded"
        );
        assert_eq!(
            comp_value_text(&CompValue::Token("  kept".into())),
            "  kept"
        );
    }

    #[test]
    fn test_merge_by_rendered_key() {
        let expr = Expression::Logical(LogicalExpression {
            head: param("a", "gt", CompValue::NumberOrDate("1".into())),
            rest: vec![
                (
                    Connective::Or,
                    param("b", "eq", CompValue::Token("x".into())),
                ),
                (
                    Connective::And,
                    BaseExpression::Not(NotExpression {
                        group: GroupExpression {
                            expression: Box::new(Expression::Base(param(
                                "a",
                                "lt",
                                CompValue::NumberOrDate("9".into()),
                            ))),
                        },
                    }),
                ),
            ],
        });

        let filters = extract(&expr, &ExtractOptions::default());
        assert_eq!(
            filters,
            vec![
                FhirFilter {
                    param: "a".into(),
                    values: vec![value(Some("gt"), "1"), value(Some("lt"), "9")],
                },
                FhirFilter {
                    param: "b".into(),
                    values: vec![value(Some("eq"), "x")],
                },
            ]
        );
    }

    #[test]
    fn test_omit_operator_eq_only_affects_eq() {
        let expr = Expression::Logical(LogicalExpression {
            head: param("a", "eq", CompValue::Token("x".into())),
            rest: vec![(
                Connective::And,
                param("a", "ne", CompValue::Token("y".into())),
            )],
        });
        let filters = extract(
            &expr,
            &ExtractOptions {
                omit_operator_eq: true,
            },
        );
        assert_eq!(
            filters[0].values,
            vec![value(None, "x"), value(Some("ne"), "y")]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let filter = FhirFilter {
            param: "item.linkId".into(),
            values: vec![value(None, "A"), value(Some("gt"), "2")],
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "param": "item.linkId",
                "values": [{"value": "A"}, {"operator": "gt", "value": "2"}]
            })
        );
    }
}
