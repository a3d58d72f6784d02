//! Join condition strings

/// Build a single equality predicate: `Customer.id = Order.customer_id`
pub fn create_condition(
    primary_model: &str,
    primary_key: &str,
    join_model: &str,
    foreign_key: &str,
) -> String {
    format!("{}.{} = {}.{}", primary_model, primary_key, join_model, foreign_key)
}
