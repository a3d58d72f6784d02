//! # elif-joinable: Declarative joins for elif.rs find queries
//!
//! Lets a find query declare the associations to join, possibly nested:
//!
//! ```json
//! { "Customer": { "Address": {} }, "Tag": { "type": "INNER" } }
//! ```
//!
//! and rewrites that declaration into an ordered list of [`JoinClause`]
//! records (`table`, `alias`, `type`, `foreignKey: false`, `conditions`) that a
//! SQL-generating datasource renders as `<type> JOIN <table> AS <alias> ON
//! <conditions>`. Join conditions are derived from association metadata
//! (belongs-to, has-one, has-many, many-to-many through a join table) unless
//! the declaration gives them explicitly.

pub mod config;
pub mod declaration;
pub mod entity;
pub mod error;
pub mod fields;
pub mod join;
pub mod query;
pub mod resolver;

// Re-export core types
pub use config::*;
pub use declaration::*;
pub use entity::*;
pub use error::*;
pub use fields::*;
pub use join::*;
pub use query::*;
pub use resolver::*;
