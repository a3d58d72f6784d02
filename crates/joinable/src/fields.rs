//! Field projection for joined entities
//!
//! When joins are attached to a find query, the columns of each joined entity
//! are usually wanted in the selection too. A [`FieldProjector`] produces the
//! qualified column list for one joined entity; closures work as projectors.

use crate::entity::Entity;

/// Produces qualified field names for a joined entity
pub trait FieldProjector {
    /// `fields` is `None` for "all columns", otherwise the requested columns
    fn project(&self, entity: &Entity, fields: Option<&[String]>) -> Vec<String>;
}

impl<F> FieldProjector for F
where
    F: Fn(&Entity, Option<&[String]>) -> Vec<String>,
{
    fn project(&self, entity: &Entity, fields: Option<&[String]>) -> Vec<String> {
        self(entity, fields)
    }
}

/// Qualifies columns with the entity alias: `Customer.name`.
///
/// "All columns" expands to the entity's schema fields, or `Customer.*` when
/// the schema is unknown. Names that are already qualified are kept as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct AliasedFieldProjector;

impl FieldProjector for AliasedFieldProjector {
    fn project(&self, entity: &Entity, fields: Option<&[String]>) -> Vec<String> {
        let alias = entity.alias();
        match fields {
            Some(fields) => fields.iter().map(|field| qualify(alias, field)).collect(),
            None if entity.fields.is_empty() => vec![qualify(alias, "*")],
            None => entity.fields.iter().map(|field| qualify(alias, field)).collect(),
        }
    }
}

/// `alias.field`, unless `field` is already qualified
pub fn qualify(alias: &str, field: &str) -> String {
    if field.contains('.') {
        field.to_string()
    } else {
        format!("{}.{}", alias, field)
    }
}
