//! Naming conventions for tables, foreign keys and join tables.

use inflector::Inflector;

/// Table name for a class: `OrderItem` -> `order_items`
pub fn table_name(class_name: &str) -> String {
    class_name.to_table_case()
}

/// Foreign key pointing at a class: `Customer` -> `customer_id`
pub fn foreign_key(class_name: &str) -> String {
    class_name.to_foreign_key()
}

/// Class name for a table: `posts_tags` -> `PostsTag`
pub fn class_name(table: &str) -> String {
    table.to_class_case()
}

/// Join table for two tables, ordered alphabetically: (`tags`, `posts`) -> `posts_tags`
pub fn join_table(left: &str, right: &str) -> String {
    if left <= right {
        format!("{}_{}", left, right)
    } else {
        format!("{}_{}", right, left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_and_key_names() {
        assert_eq!(table_name("Customer"), "customers");
        assert_eq!(table_name("OrderItem"), "order_items");
        assert_eq!(foreign_key("Customer"), "customer_id");
        assert_eq!(foreign_key("OrderItem"), "order_item_id");
    }

    #[test]
    fn test_join_table_is_order_independent() {
        assert_eq!(join_table("posts", "tags"), "posts_tags");
        assert_eq!(join_table("tags", "posts"), "posts_tags");
        assert_eq!(class_name("posts_tags"), "PostsTag");
    }
}
