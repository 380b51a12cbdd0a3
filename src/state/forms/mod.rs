//! Form domain layer
//!
//! Schema types, the dependent-field wrapper tree and the flat form data
//! that is posted to the server.

mod field;
mod form_data;
mod form_state;
mod schema;
mod wrapper_tree;

pub use field::{ControlKind, FormControl};
pub use form_data::{FormData, TEXT_KEY, TOKEN_KEY};
pub use form_state::{ConfigurationForm, FocusTarget, Form, DEFAULT_TEST_TEXT};
pub use schema::{Field, FieldsResponse};

#[cfg(test)]
pub use schema::FieldOption;
