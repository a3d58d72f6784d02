//! Join clause records handed to the SQL-generating datasource

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::JoinError;

/// Join types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JoinType {
    Inner,
    #[default]
    Left,
    Right,
    Full,
}

impl JoinType {
    /// Keyword as it appears before `JOIN`
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinType {
    type Err = JoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        match normalized.as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" | "LEFT OUTER" => Ok(JoinType::Left),
            "RIGHT" | "RIGHT OUTER" => Ok(JoinType::Right),
            "FULL" | "FULL OUTER" => Ok(JoinType::Full),
            _ => Err(JoinError::invalid(format!("unknown join type '{}'", s))),
        }
    }
}

impl TryFrom<String> for JoinType {
    type Error = JoinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JoinType> for String {
    fn from(join_type: JoinType) -> Self {
        join_type.as_str().to_string()
    }
}

/// One JOIN for the datasource to render as
/// `<type> JOIN <table> AS <alias> ON <conditions>`.
///
/// `foreignKey` is always `false`: the datasource must take the predicate from
/// `conditions` and never synthesize its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    table: String,
    alias: String,
    #[serde(rename = "type")]
    join_type: JoinType,
    #[serde(rename = "foreignKey", skip_deserializing, default)]
    foreign_key: bool,
    conditions: String,
}

impl JoinClause {
    pub fn new(table: &str, alias: &str, join_type: JoinType, conditions: &str) -> Self {
        Self {
            table: table.to_string(),
            alias: alias.to_string(),
            join_type,
            foreign_key: false,
            conditions: conditions.to_string(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn foreign_key(&self) -> bool {
        self.foreign_key
    }

    pub fn conditions(&self) -> &str {
        &self.conditions
    }
}

impl fmt::Display for JoinClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} AS {} ON {}",
            self.join_type, self.table, self.alias, self.conditions
        )
    }
}
