//! Facilities for lifting over coordinates.

pub mod machine;

pub use machine::Machine;
pub use machine::Mapping;
