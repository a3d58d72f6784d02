//! Join Options - `type`, `conditions` and `fields` settings and their overlays

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JoinError;
use crate::join::JoinType;

/// Option keys recognized inside a join entry; every other key is a nested join
pub const OPTION_KEYS: [&str; 3] = ["type", "conditions", "fields"];

/// How the ON predicate of a join is obtained
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum JoinConditions {
    /// Derive from association metadata (`conditions: true`)
    #[default]
    Auto,
    /// Use the given predicate verbatim
    Explicit(String),
}

impl TryFrom<Value> for JoinConditions {
    type Error = JoinError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(true) => Ok(JoinConditions::Auto),
            Value::String(conditions) => Ok(JoinConditions::Explicit(conditions)),
            other => Err(JoinError::invalid(format!(
                "'conditions' must be true or a string, got {}",
                other
            ))),
        }
    }
}

impl From<JoinConditions> for Value {
    fn from(conditions: JoinConditions) -> Self {
        match conditions {
            JoinConditions::Auto => Value::Bool(true),
            JoinConditions::Explicit(conditions) => Value::String(conditions),
        }
    }
}

/// Which columns of a joined entity get added to the query selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum FieldSelection {
    /// All columns (`fields: true`)
    #[default]
    All,
    /// Nothing (`fields: false`)
    None,
    /// The listed columns
    Explicit(Vec<String>),
}

impl FieldSelection {
    /// What to ask the field projector for: `Some(None)` for every column,
    /// `Some(Some(list))` for an explicit list, `None` to project nothing
    pub fn projection(&self) -> Option<Option<&[String]>> {
        match self {
            FieldSelection::All => Some(None),
            FieldSelection::Explicit(fields) if !fields.is_empty() => Some(Some(fields.as_slice())),
            FieldSelection::Explicit(_) | FieldSelection::None => None,
        }
    }
}

impl TryFrom<Value> for FieldSelection {
    type Error = JoinError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(true) => Ok(FieldSelection::All),
            Value::Bool(false) | Value::Null => Ok(FieldSelection::None),
            Value::String(field) => Ok(FieldSelection::Explicit(vec![field])),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(field) => Ok(field),
                    other => Err(JoinError::invalid(format!(
                        "'fields' entries must be strings, got {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldSelection::Explicit),
            other => Err(JoinError::invalid(format!(
                "'fields' must be a boolean, a string or a list of strings, got {}",
                other
            ))),
        }
    }
}

impl From<FieldSelection> for Value {
    fn from(fields: FieldSelection) -> Self {
        match fields {
            FieldSelection::All => Value::Bool(true),
            FieldSelection::None => Value::Bool(false),
            FieldSelection::Explicit(fields) => {
                Value::Array(fields.into_iter().map(Value::String).collect())
            }
        }
    }
}

/// Fully resolved settings for one join
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinOptions {
    pub join_type: JoinType,
    pub conditions: JoinConditions,
    pub fields: FieldSelection,
}

impl JoinOptions {
    /// Copy of these options with the given overrides applied
    pub fn overlay(&self, overrides: &OptionOverrides) -> JoinOptions {
        JoinOptions {
            join_type: overrides.join_type.unwrap_or(self.join_type),
            conditions: overrides
                .conditions
                .clone()
                .unwrap_or_else(|| self.conditions.clone()),
            fields: overrides.fields.clone().unwrap_or_else(|| self.fields.clone()),
        }
    }
}

/// Partially specified options from one declaration level or entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionOverrides {
    pub join_type: Option<JoinType>,
    pub conditions: Option<JoinConditions>,
    pub fields: Option<FieldSelection>,
}

impl OptionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = Some(join_type);
        self
    }

    pub fn conditions(mut self, conditions: &str) -> Self {
        self.conditions = Some(JoinConditions::Explicit(conditions.to_string()));
        self
    }

    pub fn fields(mut self, fields: FieldSelection) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.join_type.is_none() && self.conditions.is_none() && self.fields.is_none()
    }

    /// Merge two override sets, `other` wins per key
    pub fn merge(&self, other: &OptionOverrides) -> OptionOverrides {
        OptionOverrides {
            join_type: other.join_type.or(self.join_type),
            conditions: other.conditions.clone().or_else(|| self.conditions.clone()),
            fields: other.fields.clone().or_else(|| self.fields.clone()),
        }
    }

    /// Set one recognized option key from its raw value
    pub(crate) fn set(&mut self, key: &str, value: &Value) -> Result<(), JoinError> {
        match key {
            "type" => match value {
                Value::String(join_type) => self.join_type = Some(join_type.parse()?),
                other => {
                    return Err(JoinError::invalid(format!(
                        "'type' must be a string, got {}",
                        other
                    )))
                }
            },
            "conditions" => self.conditions = Some(JoinConditions::try_from(value.clone())?),
            "fields" => self.fields = Some(FieldSelection::try_from(value.clone())?),
            _ => return Err(JoinError::invalid(format!("'{}' is not a join option", key))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = JoinOptions::default();
        assert_eq!(options.join_type, JoinType::Left);
        assert_eq!(options.conditions, JoinConditions::Auto);
        assert_eq!(options.fields, FieldSelection::All);
    }

    #[test]
    fn test_overlay_only_touches_given_keys() {
        let base = JoinOptions::default();
        let options = base.overlay(&OptionOverrides::new().join_type(JoinType::Inner));

        assert_eq!(options.join_type, JoinType::Inner);
        assert_eq!(options.conditions, JoinConditions::Auto);
        assert_eq!(options.fields, FieldSelection::All);
    }

    #[test]
    fn test_merge_prefers_later_overrides() {
        let outer = OptionOverrides::new().join_type(JoinType::Inner).fields(FieldSelection::None);
        let inner = OptionOverrides::new().join_type(JoinType::Right);
        let merged = outer.merge(&inner);

        assert_eq!(merged.join_type, Some(JoinType::Right));
        assert_eq!(merged.fields, Some(FieldSelection::None));
        assert!(merged.conditions.is_none());
        assert!(OptionOverrides::new().is_empty());
    }

    #[test]
    fn test_conditions_from_value() {
        assert_eq!(JoinConditions::try_from(json!(true)).unwrap(), JoinConditions::Auto);
        assert_eq!(
            JoinConditions::try_from(json!("A.id = B.a_id")).unwrap(),
            JoinConditions::Explicit("A.id = B.a_id".to_string())
        );
        assert!(JoinConditions::try_from(json!(false)).is_err());
        assert!(JoinConditions::try_from(json!(["A.id = B.a_id"])).is_err());
    }

    #[test]
    fn test_field_selection_projection() {
        assert_eq!(FieldSelection::All.projection(), Some(None));
        assert_eq!(FieldSelection::None.projection(), None);
        assert_eq!(FieldSelection::Explicit(vec![]).projection(), None);

        let fields = FieldSelection::try_from(json!(["name", "email"])).unwrap();
        assert_eq!(
            fields.projection(),
            Some(Some(&["name".to_string(), "email".to_string()][..]))
        );

        assert_eq!(
            FieldSelection::try_from(json!("name")).unwrap(),
            FieldSelection::Explicit(vec!["name".to_string()])
        );
        assert!(FieldSelection::try_from(json!([1, 2])).is_err());
        assert!(FieldSelection::try_from(json!(3)).is_err());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut overrides = OptionOverrides::new();
        assert!(overrides.set("type", &json!("inner")).is_ok());
        assert_eq!(overrides.join_type, Some(JoinType::Inner));

        assert!(overrides.set("type", &json!(1)).is_err());
        assert!(overrides.set("type", &json!("UPSIDE")).is_err());
        assert!(overrides.set("order", &json!("id")).is_err());
    }
}
