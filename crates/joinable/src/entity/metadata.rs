//! Entity Metadata - Model and association definitions consumed by the join resolver

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::{JoinError, JoinResult};
use super::conventions;

/// The kind of an association together with the keys needed to join it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Many-to-one: the owning model carries `foreign_key`
    BelongsTo { foreign_key: String },
    /// One-to-one: the associated model carries `foreign_key`
    HasOne { foreign_key: String },
    /// One-to-many: the associated model carries `foreign_key`
    HasMany { foreign_key: String },
    /// Many-to-many through a join table
    ManyToMany(JoinTable),
    /// Polymorphic association; its join shape depends on row data, so it
    /// can only be joined with explicit conditions
    Polymorphic { type_column: String, id_column: String },
}

impl RelationshipKind {
    fn validate(&self) -> JoinResult<()> {
        match self {
            Self::BelongsTo { foreign_key }
            | Self::HasOne { foreign_key }
            | Self::HasMany { foreign_key } => {
                if foreign_key.is_empty() {
                    return Err(JoinError::Configuration(
                        "Foreign key cannot be empty".to_string(),
                    ));
                }
                Ok(())
            }
            Self::ManyToMany(join_table) => join_table.validate(),
            Self::Polymorphic { type_column, id_column } => {
                if type_column.is_empty() || id_column.is_empty() {
                    return Err(JoinError::Configuration(
                        "Polymorphic type and id columns cannot be empty".to_string(),
                    ));
                }
                if type_column == id_column {
                    return Err(JoinError::Configuration(
                        "Polymorphic type column and id column must be different".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Join table configuration for many-to-many associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTable {
    /// The join table name
    pub table: String,

    /// Alias of the join table model, used on both sides of the join
    pub with: String,

    /// Column in the join table pointing to the owning model
    pub foreign_key: String,

    /// Column in the join table pointing to the associated model
    pub association_foreign_key: String,
}

impl JoinTable {
    /// Create a join table configuration. The `with` alias defaults to the
    /// class-cased table name (`posts_tags` -> `PostsTag`).
    pub fn new(table: &str, foreign_key: &str, association_foreign_key: &str) -> Self {
        Self {
            table: table.to_string(),
            with: conventions::class_name(table),
            foreign_key: foreign_key.to_string(),
            association_foreign_key: association_foreign_key.to_string(),
        }
    }

    /// Override the join table model alias
    pub fn with_alias(mut self, with: &str) -> Self {
        self.with = with.to_string();
        self
    }

    /// Validate the join table configuration
    pub fn validate(&self) -> JoinResult<()> {
        if self.table.is_empty() {
            return Err(JoinError::Configuration(
                "Join table name cannot be empty".to_string(),
            ));
        }

        if self.with.is_empty() {
            return Err(JoinError::Configuration(
                "Join table alias cannot be empty".to_string(),
            ));
        }

        if self.foreign_key.is_empty() || self.association_foreign_key.is_empty() {
            return Err(JoinError::Configuration(
                "Join table keys cannot be empty".to_string(),
            ));
        }

        if self.foreign_key == self.association_foreign_key {
            return Err(JoinError::Configuration(
                "Join table foreign key and association foreign key must be different".to_string(),
            ));
        }

        Ok(())
    }
}

/// A named association from one entity to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Class name of the associated entity in the catalog
    pub class_name: String,

    #[serde(flatten)]
    pub kind: RelationshipKind,
}

impl Association {
    pub fn belongs_to(class_name: &str, foreign_key: &str) -> Self {
        Self::new(class_name, RelationshipKind::BelongsTo { foreign_key: foreign_key.to_string() })
    }

    pub fn has_one(class_name: &str, foreign_key: &str) -> Self {
        Self::new(class_name, RelationshipKind::HasOne { foreign_key: foreign_key.to_string() })
    }

    pub fn has_many(class_name: &str, foreign_key: &str) -> Self {
        Self::new(class_name, RelationshipKind::HasMany { foreign_key: foreign_key.to_string() })
    }

    pub fn many_to_many(class_name: &str, join_table: JoinTable) -> Self {
        Self::new(class_name, RelationshipKind::ManyToMany(join_table))
    }

    pub fn polymorphic(class_name: &str, type_column: &str, id_column: &str) -> Self {
        Self::new(
            class_name,
            RelationshipKind::Polymorphic {
                type_column: type_column.to_string(),
                id_column: id_column.to_string(),
            },
        )
    }

    fn new(class_name: &str, kind: RelationshipKind) -> Self {
        Self {
            class_name: class_name.to_string(),
            kind,
        }
    }

    /// Validate the association metadata
    pub fn validate(&self) -> JoinResult<()> {
        if self.class_name.is_empty() {
            return Err(JoinError::Configuration(
                "Association class name cannot be empty".to_string(),
            ));
        }
        self.kind.validate()
    }
}

fn default_primary_key() -> String {
    "id".to_string()
}

/// A model definition: table, keys, schema fields and associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Class name of the model
    pub name: String,

    /// Alias used in SQL; `None` means the class name
    #[serde(default)]
    pub alias: Option<String>,

    /// Table name
    pub table: String,

    /// Primary key column, defaults to "id"
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Schema columns; empty when the schema is unknown
    #[serde(default)]
    pub fields: Vec<String>,

    /// Association name -> association metadata
    #[serde(default)]
    pub associations: HashMap<String, Association>,
}

impl Entity {
    /// Create an entity using naming conventions: table `orders` for
    /// `Order`, primary key `id`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            table: conventions::table_name(name),
            primary_key: default_primary_key(),
            fields: Vec::new(),
            associations: HashMap::new(),
        }
    }

    /// The alias this entity is referred to by in join conditions
    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Copy of this entity referred to under another alias
    pub fn aliased(&self, alias: &str) -> Self {
        let mut entity = self.clone();
        entity.alias = Some(alias.to_string());
        entity
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    pub fn with_primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = primary_key.to_string();
        self
    }

    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|field| field.to_string()).collect();
        self
    }

    /// Register an association under an explicit name
    pub fn associate(mut self, name: &str, association: Association) -> Self {
        self.associations.insert(name.to_string(), association);
        self
    }

    /// Belongs-to with conventional foreign key (`Customer` -> `customer_id`)
    pub fn belongs_to(self, class_name: &str) -> Self {
        let association =
            Association::belongs_to(class_name, &conventions::foreign_key(class_name));
        self.associate(class_name, association)
    }

    /// Has-one with the owner's conventional foreign key on the other side
    pub fn has_one(self, class_name: &str) -> Self {
        let association = Association::has_one(class_name, &conventions::foreign_key(&self.name));
        self.associate(class_name, association)
    }

    /// Has-many with the owner's conventional foreign key on the other side
    pub fn has_many(self, class_name: &str) -> Self {
        let association = Association::has_many(class_name, &conventions::foreign_key(&self.name));
        self.associate(class_name, association)
    }

    /// Many-to-many through the conventional join table, e.g. `posts_tags`
    /// with alias `PostsTag` and keys `post_id` / `tag_id`
    pub fn has_and_belongs_to_many(self, class_name: &str) -> Self {
        let table = conventions::join_table(&self.table, &conventions::table_name(class_name));
        let join_table = JoinTable::new(
            &table,
            &conventions::foreign_key(&self.name),
            &conventions::foreign_key(class_name),
        );
        self.associate(class_name, Association::many_to_many(class_name, join_table))
    }

    /// Look up an association by name
    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.get(name)
    }

    /// Check if an association exists
    pub fn has_association(&self, name: &str) -> bool {
        self.associations.contains_key(name)
    }

    /// Validate the entity and all of its associations
    pub fn validate(&self) -> JoinResult<()> {
        if self.name.is_empty() {
            return Err(JoinError::Configuration("Entity name cannot be empty".to_string()));
        }

        if self.table.is_empty() {
            return Err(JoinError::Configuration(format!(
                "Entity '{}' must specify a table",
                self.name
            )));
        }

        if self.primary_key.is_empty() {
            return Err(JoinError::Configuration(format!(
                "Entity '{}' must specify a primary key",
                self.name
            )));
        }

        for (name, association) in &self.associations {
            association.validate().map_err(|e| {
                JoinError::Configuration(format!(
                    "Association '{}' on '{}': {}",
                    name, self.name, e
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_conventions() {
        let order = Entity::new("Order").belongs_to("Customer");

        assert_eq!(order.table, "orders");
        assert_eq!(order.primary_key, "id");
        assert_eq!(order.alias(), "Order");
        assert_eq!(
            order.association("Customer").map(|a| &a.kind),
            Some(&RelationshipKind::BelongsTo { foreign_key: "customer_id".to_string() })
        );
    }

    #[test]
    fn test_has_many_uses_owner_foreign_key() {
        let customer = Entity::new("Customer").has_many("Order").has_one("Profile");

        assert_eq!(
            customer.association("Order").map(|a| &a.kind),
            Some(&RelationshipKind::HasMany { foreign_key: "customer_id".to_string() })
        );
        assert_eq!(
            customer.association("Profile").map(|a| &a.kind),
            Some(&RelationshipKind::HasOne { foreign_key: "customer_id".to_string() })
        );
    }

    #[test]
    fn test_habtm_join_table_conventions() {
        let post = Entity::new("Post").has_and_belongs_to_many("Tag");
        let association = post.association("Tag").unwrap();

        match &association.kind {
            RelationshipKind::ManyToMany(join_table) => {
                assert_eq!(join_table.table, "posts_tags");
                assert_eq!(join_table.with, "PostsTag");
                assert_eq!(join_table.foreign_key, "post_id");
                assert_eq!(join_table.association_foreign_key, "tag_id");
            }
            other => panic!("expected many-to-many, got {:?}", other),
        }
    }

    #[test]
    fn test_aliased_entity_keeps_class_name() {
        let user = Entity::new("User");
        let author = user.aliased("Author");

        assert_eq!(author.name, "User");
        assert_eq!(author.alias(), "Author");
        assert_eq!(author.table, "users");
    }

    #[test]
    fn test_validation() {
        assert!(Entity::new("Order").belongs_to("Customer").validate().is_ok());

        let bad_pivot = Entity::new("Post").associate(
            "Tag",
            Association::many_to_many("Tag", JoinTable::new("posts_tags", "id", "id")),
        );
        assert!(matches!(bad_pivot.validate(), Err(JoinError::Configuration(_))));

        let no_key = Entity::new("Order")
            .associate("Customer", Association::belongs_to("Customer", ""));
        assert!(no_key.validate().is_err());

        let poly = Entity::new("Comment").associate(
            "commentable",
            Association::polymorphic("Post", "commentable_type", "commentable_type"),
        );
        assert!(poly.validate().is_err());
    }

    #[test]
    fn test_entity_deserializes_with_defaults() {
        let json = r#"{
            "name": "Post",
            "table": "posts",
            "associations": {
                "Author": { "class_name": "User", "kind": "belongs_to", "foreign_key": "author_id" },
                "Tag": {
                    "class_name": "Tag",
                    "kind": "many_to_many",
                    "table": "posts_tags",
                    "with": "PostsTag",
                    "foreign_key": "post_id",
                    "association_foreign_key": "tag_id"
                }
            }
        }"#;

        let post: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(post.primary_key, "id");
        assert_eq!(post.alias(), "Post");
        assert_eq!(post.association("Author").unwrap().class_name, "User");
        assert!(matches!(
            post.association("Tag").unwrap().kind,
            RelationshipKind::ManyToMany(_)
        ));
        assert!(post.validate().is_ok());
    }
}
