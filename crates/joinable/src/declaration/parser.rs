//! Parsing of raw `joins` values into [`JoinDeclaration`] trees

use serde_json::{Map, Value};

use crate::error::{JoinError, JoinResult};
use super::options::{OptionOverrides, OPTION_KEYS};
use super::{JoinDeclaration, JoinDeclarationEntry};

const DEFAULTS_KEY: &str = "defaults";

impl JoinDeclaration {
    /// Parse a raw declaration.
    ///
    /// Accepted shapes:
    /// - `null` or empty containers: no joins
    /// - `"Customer"`: a single bare association
    /// - `["Customer", {"Tag": {...}}]`: list-style entries
    /// - `{"Customer": {...}, "0": "Tag", "defaults": {...}}`: named entries,
    ///   numeric keys with string values being bare associations
    ///
    /// Inside a named entry, `type`, `conditions` and `fields` are options;
    /// every other key is a nested join off the associated entity. A string
    /// value (`"Customer": "Address"`) joins the key and then the string as
    /// a nested bare association.
    pub fn parse(value: &Value) -> JoinResult<Self> {
        let mut declaration = JoinDeclaration::new();
        parse_into(value, &mut declaration)?;
        Ok(declaration)
    }

    /// Parse a declaration from JSON text
    pub fn from_json(json: &str) -> JoinResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::parse(&value)
    }
}

impl TryFrom<&Value> for JoinDeclaration {
    type Error = JoinError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        JoinDeclaration::parse(value)
    }
}

fn parse_into(value: &Value, declaration: &mut JoinDeclaration) -> JoinResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::String(name) => {
            declaration.entries.push(bare(name)?);
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(name) => declaration.entries.push(bare(name)?),
                    Value::Object(map) => parse_map(map, declaration)?,
                    other => {
                        return Err(JoinError::invalid(format!(
                            "list entries must be association names or objects, got {}",
                            other
                        )))
                    }
                }
            }
            Ok(())
        }
        Value::Object(map) => parse_map(map, declaration),
        other => Err(JoinError::invalid(format!(
            "expected an association name, a list or an object, got {}",
            other
        ))),
    }
}

fn parse_map(map: &Map<String, Value>, declaration: &mut JoinDeclaration) -> JoinResult<()> {
    for (key, value) in map {
        if key == DEFAULTS_KEY {
            let defaults = parse_defaults(value)?;
            declaration.defaults = declaration.defaults.merge(&defaults);
            continue;
        }

        if key.parse::<u64>().is_ok() {
            match value {
                Value::String(name) => declaration.entries.push(bare(name)?),
                other => {
                    return Err(JoinError::invalid(format!(
                        "positional entry '{}' must be an association name, got {}",
                        key, other
                    )))
                }
            }
            continue;
        }

        declaration.entries.push(parse_entry(key, value)?);
    }
    Ok(())
}

fn parse_entry(name: &str, value: &Value) -> JoinResult<JoinDeclarationEntry> {
    match value {
        Value::Null => bare(name),
        Value::String(_) | Value::Array(_) => Ok(JoinDeclarationEntry::WithOptions {
            name: name.to_string(),
            options: OptionOverrides::new(),
            nested: JoinDeclaration::parse(value)?,
        }),
        Value::Object(map) => {
            let mut options = OptionOverrides::new();
            let mut rest = Map::new();
            for (key, value) in map {
                if OPTION_KEYS.contains(&key.as_str()) {
                    options.set(key, value)?;
                } else {
                    rest.insert(key.clone(), value.clone());
                }
            }

            let mut nested = JoinDeclaration::new();
            parse_map(&rest, &mut nested)?;

            Ok(JoinDeclarationEntry::WithOptions {
                name: name.to_string(),
                options,
                nested,
            })
        }
        other => Err(JoinError::invalid(format!(
            "options for '{}' must be an object, a list or an association name, got {}",
            name, other
        ))),
    }
}

fn parse_defaults(value: &Value) -> JoinResult<OptionOverrides> {
    let Value::Object(map) = value else {
        return Err(JoinError::invalid(format!(
            "'defaults' must be an object, got {}",
            value
        )));
    };

    let mut defaults = OptionOverrides::new();
    for (key, value) in map {
        if OPTION_KEYS.contains(&key.as_str()) {
            defaults.set(key, value)?;
        } else {
            tracing::warn!("Ignoring unknown join option '{}' in defaults", key);
        }
    }
    Ok(defaults)
}

fn bare(name: &str) -> JoinResult<JoinDeclarationEntry> {
    if name.is_empty() {
        return Err(JoinError::invalid("association name cannot be empty"));
    }
    Ok(JoinDeclarationEntry::Bare(name.to_string()))
}
