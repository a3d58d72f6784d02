//! Plugin configuration
//!
//! The base options every resolve call starts from, and whether joined
//! entities' columns are projected into the find query's selection.

use serde::{Deserialize, Serialize};

use crate::declaration::{FieldSelection, JoinConditions, JoinOptions};
use crate::error::{JoinError, JoinResult};
use crate::join::JoinType;

const ENV_JOIN_TYPE: &str = "ELIF_JOINABLE_JOIN_TYPE";
const ENV_PROJECT_FIELDS: &str = "ELIF_JOINABLE_PROJECT_FIELDS";

/// Configuration for join resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinableConfig {
    /// Join type used when a declaration does not give one
    #[serde(rename = "type")]
    pub join_type: JoinType,
    /// Conditions used when a declaration does not give them
    pub conditions: JoinConditions,
    /// Field selection used when a declaration does not give one
    pub fields: FieldSelection,
    /// Append joined entities' columns to the query's field list
    pub project_fields: bool,
}

impl Default for JoinableConfig {
    fn default() -> Self {
        Self {
            join_type: JoinType::Left,
            conditions: JoinConditions::Auto,
            fields: FieldSelection::All,
            project_fields: true,
        }
    }
}

impl JoinableConfig {
    /// Joins only; the query's selection is left alone
    pub fn minimal() -> Self {
        Self {
            project_fields: false,
            ..Self::default()
        }
    }

    /// Parse configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> JoinResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> JoinResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function
    pub fn from_lookup<F>(lookup: F) -> JoinResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(join_type) = lookup(ENV_JOIN_TYPE) {
            config.join_type = join_type.parse()?;
        }

        if let Some(project_fields) = lookup(ENV_PROJECT_FIELDS) {
            config.project_fields = match project_fields.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(JoinError::Configuration(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_PROJECT_FIELDS, project_fields
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> JoinResult<()> {
        if let JoinConditions::Explicit(conditions) = &self.conditions {
            if conditions.trim().is_empty() {
                return Err(JoinError::Configuration(
                    "Default join conditions cannot be empty".to_string(),
                ));
            }
        }

        if let FieldSelection::Explicit(fields) = &self.fields {
            if fields.iter().any(|field| field.is_empty()) {
                return Err(JoinError::Configuration(
                    "Default field list cannot contain empty names".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Base options every resolve call starts from
    pub fn defaults(&self) -> JoinOptions {
        JoinOptions {
            join_type: self.join_type,
            conditions: self.conditions.clone(),
            fields: self.fields.clone(),
        }
    }
}
