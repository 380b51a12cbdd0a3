//! Field schema served by `/tts/api/fields`

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// A single configurable backend parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub default_value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<FieldOption>,
    #[serde(default, rename = "desc", alias = "description")]
    pub description: String,
}

/// One legal value of a field, optionally unlocking further fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_fields: Vec<Arc<Field>>,
}

impl Field {
    /// Whether this field renders as a select
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }

    /// Exact-match lookup of an option by value
    pub fn find_option(&self, value: &str) -> Option<&FieldOption> {
        self.options.iter().find(|opt| opt.value == value)
    }

    /// Position of `value` among the options
    pub fn option_index(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|opt| opt.value == value)
    }

    /// Value picked when nothing has been chosen yet
    pub fn initial_choice(&self) -> Option<&str> {
        if !self.default_value.is_empty() {
            Some(&self.default_value)
        } else {
            self.options.first().map(|opt| opt.value.as_str())
        }
    }
}

/// Response body of `/tts/api/fields`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FieldsResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<Arc<Field>>>,
}

/// The server emits `null` for empty lists
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
