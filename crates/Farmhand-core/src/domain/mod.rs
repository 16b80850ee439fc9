mod field_path;

pub use field_path::FieldPath;
