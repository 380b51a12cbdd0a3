//! Flat name → value mapping sent to the invoke endpoint

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Key of the server token, always present
pub const TOKEN_KEY: &str = "token";
/// Key of the text to synthesize, always present
pub const TEXT_KEY: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Mutable access to a value, creating it empty if missing
    pub fn value_mut(&mut self, name: &str) -> &mut String {
        self.0.entry(name.to_string()).or_default()
    }

    /// Keep only `visible` keys plus the token and text
    pub fn prune(&mut self, visible: &BTreeSet<&str>) {
        self.0.retain(|key, _| {
            key == TOKEN_KEY || key == TEXT_KEY || visible.contains(key.as_str())
        });
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prune_keeps_token_and_text() {
        let mut form = FormData::new();
        form.set(TOKEN_KEY, "t");
        form.set(TEXT_KEY, "hello");
        form.set("model", "Edge");
        form.set("voice", "en-US-AriaNeural");

        let visible: BTreeSet<&str> = ["model"].into_iter().collect();
        form.prune(&visible);

        let keys: Vec<&str> = form.keys().collect();
        assert_eq!(keys, vec!["model", "text", "token"]);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut form = FormData::new();
        form.set("model", "Edge");
        form.set(TEXT_KEY, "hi");
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json, serde_json::json!({"model": "Edge", "text": "hi"}));
    }

    #[test]
    fn test_value_mut_creates_entry() {
        let mut form = FormData::new();
        form.value_mut("rate").push('1');
        assert_eq!(form.get("rate"), Some("1"));
    }
}
