//! Join Clause Builder - Turns one resolved association into join clauses

use crate::declaration::JoinConditions;
use crate::entity::{Association, Entity, RelationshipKind};
use crate::error::{JoinError, JoinResult};
use super::clause::{JoinClause, JoinType};
use super::condition::create_condition;

/// Ordered accumulator of join clauses for a single resolve call.
///
/// Clauses are only ever appended; nothing already emitted is changed.
#[derive(Debug, Default)]
pub struct JoinClauseBuilder {
    clauses: Vec<JoinClause>,
}

impl JoinClauseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the clause(s) joining `association` of `entity`.
    ///
    /// `associated` is the target entity already aliased as the association.
    /// With automatic conditions a many-to-many association first emits a
    /// LEFT join on its join table, then the clause for the far entity.
    pub fn build(
        &mut self,
        entity: &Entity,
        association_name: &str,
        association: &Association,
        associated: &Entity,
        conditions: &JoinConditions,
        join_type: JoinType,
    ) -> JoinResult<()> {
        let conditions = match conditions {
            JoinConditions::Explicit(conditions) => conditions.clone(),
            JoinConditions::Auto => {
                self.derive_conditions(entity, association_name, association, associated)?
            }
        };

        self.push(JoinClause::new(&associated.table, association_name, join_type, &conditions));
        Ok(())
    }

    fn derive_conditions(
        &mut self,
        entity: &Entity,
        association_name: &str,
        association: &Association,
        associated: &Entity,
    ) -> JoinResult<String> {
        match &association.kind {
            RelationshipKind::BelongsTo { foreign_key } => Ok(create_condition(
                association_name,
                &associated.primary_key,
                entity.alias(),
                foreign_key,
            )),
            RelationshipKind::HasOne { foreign_key }
            | RelationshipKind::HasMany { foreign_key } => Ok(create_condition(
                entity.alias(),
                &entity.primary_key,
                association_name,
                foreign_key,
            )),
            RelationshipKind::ManyToMany(join_table) => {
                let join_conditions = create_condition(
                    entity.alias(),
                    &entity.primary_key,
                    &join_table.with,
                    &join_table.foreign_key,
                );
                self.push(JoinClause::new(
                    &join_table.table,
                    &join_table.with,
                    JoinType::Left,
                    &join_conditions,
                ));

                Ok(create_condition(
                    association_name,
                    &associated.primary_key,
                    &join_table.with,
                    &join_table.association_foreign_key,
                ))
            }
            RelationshipKind::Polymorphic { .. } => {
                Err(JoinError::unknown_kind(entity.alias(), association_name))
            }
        }
    }

    fn push(&mut self, clause: JoinClause) {
        tracing::trace!("Adding join: {}", clause);
        self.clauses.push(clause);
    }

    /// Hand the accumulated clauses to the caller
    pub fn finish(self) -> Vec<JoinClause> {
        self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::JoinTable;

    fn build_one(
        entity: &Entity,
        name: &str,
        associated: &Entity,
        conditions: JoinConditions,
    ) -> JoinResult<Vec<JoinClause>> {
        let association = entity.association(name).unwrap().clone();
        let mut builder = JoinClauseBuilder::new();
        builder.build(
            entity,
            name,
            &association,
            &associated.aliased(name),
            &conditions,
            JoinType::Left,
        )?;
        Ok(builder.finish())
    }

    #[test]
    fn test_belongs_to_conditions() {
        let order = Entity::new("Order").belongs_to("Customer");
        let customer = Entity::new("Customer");

        let clauses = build_one(&order, "Customer", &customer, JoinConditions::Auto).unwrap();
        assert_eq!(clauses, vec![JoinClause::new(
            "customers",
            "Customer",
            JoinType::Left,
            "Customer.id = Order.customer_id",
        )]);
    }

    #[test]
    fn test_has_one_and_has_many_share_shape() {
        let customer = Entity::new("Customer")
            .with_primary_key("uuid")
            .has_many("Order")
            .has_one("Profile");

        let orders =
            build_one(&customer, "Order", &Entity::new("Order"), JoinConditions::Auto).unwrap();
        assert_eq!(orders[0].conditions(), "Customer.uuid = Order.customer_id");
        assert_eq!(orders[0].table(), "orders");

        let profile =
            build_one(&customer, "Profile", &Entity::new("Profile"), JoinConditions::Auto)
                .unwrap();
        assert_eq!(profile[0].conditions(), "Customer.uuid = Profile.customer_id");
    }

    #[test]
    fn test_many_to_many_emits_join_table_first() {
        let post = Entity::new("Post").has_and_belongs_to_many("Tag");
        let tag = Entity::new("Tag");

        let clauses = build_one(&post, "Tag", &tag, JoinConditions::Auto).unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[0],
            JoinClause::new("posts_tags", "PostsTag", JoinType::Left, "Post.id = PostsTag.post_id")
        );
        assert_eq!(
            clauses[1],
            JoinClause::new("tags", "Tag", JoinType::Left, "Tag.id = PostsTag.tag_id")
        );
    }

    #[test]
    fn test_join_table_clause_is_always_left() {
        let post = Entity::new("Post").associate(
            "Label",
            Association::many_to_many(
                "Tag",
                JoinTable::new("post_labels", "post_id", "label_id").with_alias("PostLabel"),
            ),
        );
        let association = post.association("Label").unwrap().clone();
        let mut builder = JoinClauseBuilder::new();
        builder
            .build(
                &post,
                "Label",
                &association,
                &Entity::new("Tag").aliased("Label"),
                &JoinConditions::Auto,
                JoinType::Inner,
            )
            .unwrap();

        let clauses = builder.finish();
        assert_eq!(clauses[0].join_type(), JoinType::Left);
        assert_eq!(clauses[0].alias(), "PostLabel");
        assert_eq!(clauses[1].join_type(), JoinType::Inner);
        assert_eq!(clauses[1].alias(), "Label");
        assert_eq!(clauses[1].table(), "tags");
        assert_eq!(clauses[1].conditions(), "Label.id = PostLabel.label_id");
    }

    #[test]
    fn test_explicit_conditions_pass_through() {
        let post = Entity::new("Post").has_and_belongs_to_many("Tag");
        let conditions = "Tag.id = 5 AND  `Tag`.`visible` = 1";

        let clauses = build_one(
            &post,
            "Tag",
            &Entity::new("Tag"),
            JoinConditions::Explicit(conditions.to_string()),
        )
        .unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].conditions(), conditions);
    }

    #[test]
    fn test_polymorphic_requires_explicit_conditions() {
        let comment = Entity::new("Comment").associate(
            "Commentable",
            Association::polymorphic("Post", "commentable_type", "commentable_id"),
        );
        let post = Entity::new("Post");

        let result = build_one(&comment, "Commentable", &post, JoinConditions::Auto);
        assert_eq!(
            result,
            Err(JoinError::UnknownRelationshipKind {
                model: "Comment".to_string(),
                association: "Commentable".to_string(),
            })
        );

        let clauses = build_one(
            &comment,
            "Commentable",
            &post,
            JoinConditions::Explicit(
                "Commentable.id = Comment.commentable_id AND Comment.commentable_type = 'Post'"
                    .to_string(),
            ),
        )
        .unwrap();
        assert_eq!(clauses.len(), 1);
        assert!(!clauses[0].foreign_key());
    }
}
