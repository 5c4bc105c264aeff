use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{ContentValue, ViewContext};
use crate::error::{DecodeError, DecodeResult, RenderError, RenderResult};

/// Boolean predicate gating whether an optional view renders at all.
///
/// Views hold an `Option<ViewCondition>`; an absent condition always passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewCondition {
    /// The context holds content under `key`
    KeyExists { key: String },
    /// The context holds content under at least one of `keys`
    AnyKeyExists { keys: Vec<String> },
    /// The context holds a plain string under `key` equal to `value`
    KeyEquals { key: String, value: String },
    Not { operand: Box<ViewCondition> },
    And { operands: Vec<ViewCondition> },
    Or { operands: Vec<ViewCondition> },
}

impl ViewCondition {
    /// Decode the raw `condition` object of a template node.
    ///
    /// `null`, a missing `op` and an empty `op` all mean "no condition".
    pub fn from_raw(view_type: &str, raw: &Value) -> DecodeResult<Option<Self>> {
        let object = match raw {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            _ => {
                return Err(DecodeError::InvalidCondition {
                    view_type: view_type.to_string(),
                    reason: "condition must be an object".to_string(),
                })
            }
        };

        match object.get("op") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(op)) if op.is_empty() => return Ok(None),
            _ => {}
        }

        serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|e| DecodeError::InvalidCondition {
                view_type: view_type.to_string(),
                reason: e.to_string(),
            })
    }

    /// Evaluate against the render context on behalf of the view `view_type`
    pub fn evaluate(&self, view_type: &str, ctx: &ViewContext) -> RenderResult<bool> {
        match self {
            ViewCondition::KeyExists { key } => {
                require_key(view_type, key)?;
                Ok(ctx.contains(key))
            }
            ViewCondition::AnyKeyExists { keys } => {
                if keys.is_empty() {
                    return Err(evaluation_error(view_type, "any_key_exists requires at least one key"));
                }
                for key in keys {
                    require_key(view_type, key)?;
                }
                Ok(keys.iter().any(|key| ctx.contains(key)))
            }
            ViewCondition::KeyEquals { key, value } => {
                require_key(view_type, key)?;
                match ctx.get(key) {
                    None => Ok(false),
                    Some(ContentValue::String(content)) => Ok(content == value),
                    Some(other) => Err(evaluation_error(
                        view_type,
                        &format!(
                            "key_equals expects a string at key {} but found {}",
                            key,
                            other.shape_name()
                        ),
                    )),
                }
            }
            ViewCondition::Not { operand } => Ok(!operand.evaluate(view_type, ctx)?),
            ViewCondition::And { operands } => {
                require_operands(view_type, "and", operands)?;
                for operand in operands {
                    if !operand.evaluate(view_type, ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ViewCondition::Or { operands } => {
                require_operands(view_type, "or", operands)?;
                for operand in operands {
                    if operand.evaluate(view_type, ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Evaluate an optional condition; `None` is always true
pub fn evaluate_optional(
    condition: Option<&ViewCondition>,
    view_type: &str,
    ctx: &ViewContext,
) -> RenderResult<bool> {
    match condition {
        Some(condition) => condition.evaluate(view_type, ctx),
        None => Ok(true),
    }
}

fn require_key(view_type: &str, key: &str) -> RenderResult<()> {
    if key.is_empty() {
        return Err(evaluation_error(view_type, "condition key not specified"));
    }
    Ok(())
}

fn require_operands(view_type: &str, op: &str, operands: &[ViewCondition]) -> RenderResult<()> {
    if operands.is_empty() {
        return Err(evaluation_error(
            view_type,
            &format!("{} requires at least one operand", op),
        ));
    }
    Ok(())
}

fn evaluation_error(view_type: &str, reason: &str) -> RenderError {
    RenderError::ConditionEvaluation {
        view_type: view_type.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VIEW: &str = "d_visit_review:standard_subsection";

    fn gender_context(gender: &str) -> ViewContext {
        let mut ctx = ViewContext::new();
        ctx.set("gender", gender);
        ctx
    }

    #[test]
    fn test_empty_op_is_no_condition() {
        assert_eq!(ViewCondition::from_raw(VIEW, &json!({"op": ""})).unwrap(), None);
        assert_eq!(ViewCondition::from_raw(VIEW, &json!({})).unwrap(), None);
        assert_eq!(ViewCondition::from_raw(VIEW, &Value::Null).unwrap(), None);
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result = ViewCondition::from_raw(VIEW, &json!({"op": "gender_is", "key": "gender"}));
        assert!(matches!(result, Err(DecodeError::InvalidCondition { .. })));
    }

    #[test]
    fn test_key_equals() {
        let condition = ViewCondition::from_raw(
            VIEW,
            &json!({"op": "key_equals", "key": "gender", "value": "male"}),
        )
        .unwrap()
        .unwrap();

        assert!(condition.evaluate(VIEW, &gender_context("male")).unwrap());
        assert!(!condition.evaluate(VIEW, &gender_context("female")).unwrap());
        assert!(!condition.evaluate(VIEW, &ViewContext::new()).unwrap());
    }

    #[test]
    fn test_key_equals_on_list_is_an_error() {
        let mut ctx = ViewContext::new();
        ctx.set("gender", vec!["male"]);
        let condition = ViewCondition::KeyEquals {
            key: "gender".to_string(),
            value: "male".to_string(),
        };
        assert!(matches!(
            condition.evaluate(VIEW, &ctx),
            Err(RenderError::ConditionEvaluation { .. })
        ));
    }

    #[test]
    fn test_key_exists_and_any_key_exists() {
        let mut ctx = ViewContext::new();
        ctx.set("patient_visit_alerts", vec!["Allergic to penicillin"]);

        let exists = ViewCondition::KeyExists {
            key: "patient_visit_alerts".to_string(),
        };
        assert!(exists.evaluate(VIEW, &ctx).unwrap());

        let any = ViewCondition::AnyKeyExists {
            keys: vec!["missing".to_string(), "patient_visit_alerts".to_string()],
        };
        assert!(any.evaluate(VIEW, &ctx).unwrap());

        let none = ViewCondition::AnyKeyExists { keys: vec![] };
        assert!(none.evaluate(VIEW, &ctx).is_err());
    }

    #[test]
    fn test_empty_key_is_an_error() {
        let condition = ViewCondition::KeyExists { key: String::new() };
        let err = condition.evaluate(VIEW, &ViewContext::new()).unwrap_err();
        assert_eq!(err.view_type(), VIEW);
    }

    #[test]
    fn test_composition() {
        let raw = json!({
            "op": "and",
            "operands": [
                {"op": "key_equals", "key": "gender", "value": "female"},
                {"op": "not", "operand": {"op": "key_exists", "key": "pregnant"}}
            ]
        });
        let condition = ViewCondition::from_raw(VIEW, &raw).unwrap().unwrap();
        assert!(condition.evaluate(VIEW, &gender_context("female")).unwrap());

        let mut ctx = gender_context("female");
        ctx.set("pregnant", "yes");
        assert!(!condition.evaluate(VIEW, &ctx).unwrap());
    }

    #[test]
    fn test_empty_and_is_an_error() {
        let condition = ViewCondition::from_raw(VIEW, &json!({"op": "and", "operands": []}))
            .unwrap()
            .unwrap();
        assert!(matches!(
            condition.evaluate(VIEW, &ViewContext::new()),
            Err(RenderError::ConditionEvaluation { ref reason, .. }) if reason.contains("and")
        ));
    }

    #[test]
    fn test_empty_or_is_an_error() {
        let condition = ViewCondition::from_raw(VIEW, &json!({"op": "or", "operands": []}))
            .unwrap()
            .unwrap();
        assert!(matches!(
            condition.evaluate(VIEW, &ViewContext::new()),
            Err(RenderError::ConditionEvaluation { ref reason, .. }) if reason.contains("or")
        ));
    }

    #[test]
    fn test_absent_condition_is_true() {
        assert!(evaluate_optional(None, VIEW, &ViewContext::new()).unwrap());
    }
}
