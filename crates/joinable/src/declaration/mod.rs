//! Join Declarations - Typed tree of the joins requested for a find query
//!
//! Callers usually hand over a raw, loosely shaped value such as
//!
//! ```json
//! {
//!     "Profile": { "type": "RIGHT" },
//!     "Subscription": {
//!         "conditions": "Subscription.id = User.subscription_id AND Subscription.active = 1",
//!         "0": "SubscriptionPlan"
//!     }
//! }
//! ```
//!
//! which [`JoinDeclaration::parse`] turns into a tree of
//! [`JoinDeclarationEntry`] values once, before any resolution happens.

pub mod options;
pub mod parser;

pub use options::*;

/// One declaration level: its `defaults` block plus the joins in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinDeclaration {
    pub defaults: OptionOverrides,
    pub entries: Vec<JoinDeclarationEntry>,
}

/// A single requested join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinDeclarationEntry {
    /// Association name with default options and no nested joins
    Bare(String),
    /// Association with its own options and joins off the associated entity
    WithOptions {
        name: String,
        options: OptionOverrides,
        nested: JoinDeclaration,
    },
}

impl JoinDeclarationEntry {
    /// The association name
    pub fn name(&self) -> &str {
        match self {
            JoinDeclarationEntry::Bare(name) => name,
            JoinDeclarationEntry::WithOptions { name, .. } => name,
        }
    }
}

impl JoinDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override defaults for this level and everything below it
    pub fn with_defaults(mut self, defaults: OptionOverrides) -> Self {
        self.defaults = defaults;
        self
    }

    /// Join an association with default options
    pub fn join(mut self, name: &str) -> Self {
        self.entries.push(JoinDeclarationEntry::Bare(name.to_string()));
        self
    }

    /// Join an association with options and nested joins
    pub fn join_with(
        mut self,
        name: &str,
        options: OptionOverrides,
        nested: JoinDeclaration,
    ) -> Self {
        self.entries.push(JoinDeclarationEntry::WithOptions {
            name: name.to_string(),
            options,
            nested,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of joins declared at every level
    pub fn association_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                JoinDeclarationEntry::Bare(_) => 1,
                JoinDeclarationEntry::WithOptions { nested, .. } => 1 + nested.association_count(),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::JoinType;

    #[test]
    fn test_builder_and_counts() {
        let declaration = JoinDeclaration::new()
            .join("Customer")
            .join_with(
                "Item",
                OptionOverrides::new().join_type(JoinType::Inner),
                JoinDeclaration::new().join("Product").join("Warehouse"),
            );

        assert_eq!(declaration.entries.len(), 2);
        assert_eq!(declaration.association_count(), 4);
        assert_eq!(declaration.entries[1].name(), "Item");
        assert!(!declaration.is_empty());
        assert!(JoinDeclaration::new().is_empty());
    }
}
