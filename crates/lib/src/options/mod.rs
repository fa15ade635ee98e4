//! Option schema, values, and concrete assignments.

pub mod map;
pub mod schema;
pub mod value;

pub use map::OptionMap;
pub use schema::{Migrations, OptionDecl, OptionRoles, OptionSchema, SchemaError};
pub use value::{Currency, DbMode, OptionValue, ParseChoiceError};
