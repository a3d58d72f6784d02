//! Join Module - Join clause records and the builder that emits them

pub mod builder;
pub mod clause;
pub mod condition;

pub use builder::JoinClauseBuilder;
pub use clause::{JoinClause, JoinType};
pub use condition::create_condition;
