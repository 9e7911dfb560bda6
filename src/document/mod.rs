//! Stored-document layout and the record <-> document mapping.

mod field_set;
pub mod fields;
mod mapper;

pub use field_set::FieldSet;
pub use fields::FieldKind;
pub use mapper::{from_fields, to_fields, write_fields};
