//! Binding of transfo parameters, static or interpolated at a timestamp.
pub mod descriptor;
pub mod resolver;

pub use descriptor::{ColumnRef, FieldDescriptor, FieldSpec};
pub use resolver::ParameterResolver;
