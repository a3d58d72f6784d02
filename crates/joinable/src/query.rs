//! Find query augmentation
//!
//! [`JoinableBehavior::before_find`] runs before a find query is executed: it
//! consumes the raw `joins` key, replaces it with resolved join clauses and,
//! unless disabled, extends the field selection with the joined columns.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::JoinableConfig;
use crate::declaration::JoinDeclaration;
use crate::entity::{Entity, EntityCatalog};
use crate::error::JoinResult;
use crate::fields::{qualify, AliasedFieldProjector, FieldProjector};
use crate::join::JoinClause;
use crate::resolver::JoinSpecResolver;

/// Contents of a find query's `joins` key.
///
/// Before `before_find` it holds the caller's declaration; afterwards it holds
/// the resolved clauses the datasource renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Joins {
    Resolved(Vec<JoinClause>),
    Declared(Value),
}

impl Joins {
    /// True for a declaration that still has something to resolve.
    ///
    /// `null`, `false`, `0`, `""`, `"0"` and empty containers declare nothing.
    pub fn is_declared(&self) -> bool {
        match self {
            Joins::Resolved(_) => false,
            Joins::Declared(value) => match value {
                Value::Null | Value::Bool(false) => false,
                Value::Number(number) => number.as_f64() != Some(0.0),
                Value::String(name) => !name.is_empty() && name != "0",
                Value::Array(items) => !items.is_empty(),
                Value::Object(map) => !map.is_empty(),
                Value::Bool(true) => true,
            },
        }
    }

    /// Resolved clauses, empty while the joins are still a declaration
    pub fn clauses(&self) -> &[JoinClause] {
        match self {
            Joins::Resolved(clauses) => clauses,
            Joins::Declared(_) => &[],
        }
    }
}

/// A find query as seen by the join plugin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FindQuery {
    /// Join declaration, replaced by resolved clauses in `before_find`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joins: Option<Joins>,

    /// Selected fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Every other query key, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FindQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joins(mut self, joins: Value) -> Self {
        self.joins = Some(Joins::Declared(joins));
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|field| field.to_string()).collect());
        self
    }

    /// True when the query declares at least one join still to be resolved
    pub fn has_joins(&self) -> bool {
        self.joins.as_ref().is_some_and(Joins::is_declared)
    }

    /// Resolved join clauses for the datasource
    pub fn join_clauses(&self) -> &[JoinClause] {
        self.joins.as_ref().map(Joins::clauses).unwrap_or_default()
    }
}

/// Attaches declared joins to find queries
pub struct JoinableBehavior {
    config: JoinableConfig,
    projector: Box<dyn FieldProjector + Send + Sync>,
}

impl Default for JoinableBehavior {
    fn default() -> Self {
        Self::new(JoinableConfig::default())
    }
}

impl JoinableBehavior {
    pub fn new(config: JoinableConfig) -> Self {
        Self {
            config,
            projector: Box::new(AliasedFieldProjector),
        }
    }

    /// Use a custom field projector
    pub fn with_projector<P>(mut self, projector: P) -> Self
    where
        P: FieldProjector + Send + Sync + 'static,
    {
        self.projector = Box::new(projector);
        self
    }

    pub fn config(&self) -> &JoinableConfig {
        &self.config
    }

    /// Rewrite the query's `joins` into join clauses.
    ///
    /// Queries without declared joins are returned unchanged. Otherwise the
    /// field list defaults to `<Alias>.*` and `joins` is replaced by the
    /// resolved clauses.
    pub fn before_find<C>(
        &self,
        catalog: &C,
        entity: &Entity,
        mut query: FindQuery,
    ) -> JoinResult<FindQuery>
    where
        C: EntityCatalog + ?Sized,
    {
        if !query.has_joins() {
            return Ok(query);
        }

        let declaration = match query.joins.take() {
            Some(Joins::Declared(joins)) => JoinDeclaration::parse(&joins)?,
            _ => JoinDeclaration::new(),
        };
        let mut fields = query
            .fields
            .take()
            .unwrap_or_else(|| vec![qualify(entity.alias(), "*")]);

        let resolver = JoinSpecResolver::from_config(catalog, &self.config);
        let clauses = if self.config.project_fields {
            let resolved =
                resolver.resolve_with_fields(entity, &declaration, self.projector.as_ref())?;
            fields.extend(resolved.fields);
            resolved.clauses
        } else {
            resolver.resolve(entity, &declaration)?
        };

        query.fields = Some(fields);
        query.joins = Some(Joins::Resolved(clauses));
        Ok(query)
    }
}
