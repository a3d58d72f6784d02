//! Join Spec Resolver - Walks a join declaration and produces join clauses
//!
//! Resolution is depth-first and pre-order: each association's clause(s) are
//! emitted before the clauses of joins nested under it, and siblings keep their
//! declaration order. The accumulator lives for one call only.

use crate::config::JoinableConfig;
use crate::declaration::{JoinDeclaration, JoinDeclarationEntry, JoinOptions, OptionOverrides};
use crate::entity::{Association, Entity, EntityCatalog};
use crate::error::{JoinError, JoinResult};
use crate::fields::FieldProjector;
use crate::join::{JoinClause, JoinClauseBuilder};

/// Join clauses together with the projected fields of the joined entities
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedJoins {
    pub clauses: Vec<JoinClause>,
    pub fields: Vec<String>,
}

/// Resolves join declarations against entity metadata
pub struct JoinSpecResolver<'a, C: EntityCatalog + ?Sized> {
    catalog: &'a C,
    defaults: JoinOptions,
}

/// Working state for one resolve call
struct ResolveState<'p> {
    builder: JoinClauseBuilder,
    fields: Vec<String>,
    projector: Option<&'p dyn FieldProjector>,
}

impl<'a, C: EntityCatalog + ?Sized> JoinSpecResolver<'a, C> {
    /// Create a resolver with `LEFT`, automatic conditions, all fields as defaults
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            defaults: JoinOptions::default(),
        }
    }

    /// Create a resolver using the configured base defaults
    pub fn from_config(catalog: &'a C, config: &JoinableConfig) -> Self {
        Self {
            catalog,
            defaults: config.defaults(),
        }
    }

    /// Replace the base defaults
    pub fn with_defaults(mut self, defaults: JoinOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Base defaults every resolve call starts from
    pub fn defaults(&self) -> &JoinOptions {
        &self.defaults
    }

    /// Resolve a declaration into join clauses
    pub fn resolve(
        &self,
        entity: &Entity,
        declaration: &JoinDeclaration,
    ) -> JoinResult<Vec<JoinClause>> {
        self.resolve_with_defaults(entity, declaration, &self.defaults)
    }

    /// Resolve a declaration starting from the given inherited defaults
    pub fn resolve_with_defaults(
        &self,
        entity: &Entity,
        declaration: &JoinDeclaration,
        inherited: &JoinOptions,
    ) -> JoinResult<Vec<JoinClause>> {
        let resolved = self.run(entity, declaration, inherited, None)?;
        Ok(resolved.clauses)
    }

    /// Resolve a declaration into join clauses and the projected fields of
    /// every joined entity whose `fields` option asks for any
    pub fn resolve_with_fields(
        &self,
        entity: &Entity,
        declaration: &JoinDeclaration,
        projector: &dyn FieldProjector,
    ) -> JoinResult<ResolvedJoins> {
        self.run(entity, declaration, &self.defaults, Some(projector))
    }

    /// Look up an association on `entity` and the entity it points to,
    /// aliased as the association name
    pub fn associated_entity<'e>(
        &self,
        entity: &'e Entity,
        name: &str,
    ) -> JoinResult<(&'e Association, Entity)> {
        let association = entity
            .association(name)
            .ok_or_else(|| JoinError::unresolved(entity.alias(), name))?;

        let associated = self
            .catalog
            .entity(&association.class_name)
            .ok_or_else(|| JoinError::unresolved(entity.alias(), name))?;

        Ok((association, associated.aliased(name)))
    }

    fn run(
        &self,
        entity: &Entity,
        declaration: &JoinDeclaration,
        inherited: &JoinOptions,
        projector: Option<&dyn FieldProjector>,
    ) -> JoinResult<ResolvedJoins> {
        tracing::debug!(
            "Resolving {} declared join(s) for model '{}'",
            declaration.association_count(),
            entity.alias()
        );

        let mut state = ResolveState {
            builder: JoinClauseBuilder::new(),
            fields: Vec::new(),
            projector,
        };
        self.walk(entity, declaration, inherited, &mut state)?;

        let resolved = ResolvedJoins {
            clauses: state.builder.finish(),
            fields: state.fields,
        };
        tracing::debug!(
            "Resolved {} join clause(s) for model '{}'",
            resolved.clauses.len(),
            entity.alias()
        );
        Ok(resolved)
    }

    fn walk(
        &self,
        entity: &Entity,
        declaration: &JoinDeclaration,
        inherited: &JoinOptions,
        state: &mut ResolveState<'_>,
    ) -> JoinResult<()> {
        let defaults = inherited.overlay(&declaration.defaults);
        let no_overrides = OptionOverrides::new();

        for entry in &declaration.entries {
            let (name, overrides, nested) = match entry {
                JoinDeclarationEntry::Bare(name) => (name.as_str(), &no_overrides, None),
                JoinDeclarationEntry::WithOptions { name, options, nested } => {
                    (name.as_str(), options, Some(nested))
                }
            };

            let (association, associated) = self.associated_entity(entity, name)?;
            let options = defaults.overlay(overrides);

            state.builder.build(
                entity,
                name,
                association,
                &associated,
                &options.conditions,
                options.join_type,
            )?;

            if let Some(projector) = state.projector {
                if let Some(fields) = options.fields.projection() {
                    state.fields.extend(projector.project(&associated, fields));
                }
            }

            if let Some(nested) = nested.filter(|nested| !nested.is_empty()) {
                self.walk(&associated, nested, &defaults, state)?;
            }
        }

        Ok(())
    }
}
