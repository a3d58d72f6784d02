//! Entity Module - Model metadata the join resolver reads

pub mod conventions;
pub mod metadata;
pub mod registry;

pub use metadata::*;
pub use registry::*;
