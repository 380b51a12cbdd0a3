//! Application state definitions

use super::forms::ConfigurationForm;
use std::collections::VecDeque;

/// Progress of the one-shot schema fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldsStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub form: ConfigurationForm,
    pub fields_status: FieldsStatus,
    /// Cleared while an invocation is in flight
    pub listen_enabled: bool,
    /// Server the form talks to, shown in the header
    pub server_address: String,
    /// Pending alerts, shown one at a time
    errors: VecDeque<String>,
}

impl AppState {
    pub fn new(form: ConfigurationForm, server_address: String) -> Self {
        Self {
            form,
            fields_status: FieldsStatus::Loading,
            listen_enabled: true,
            server_address,
            errors: VecDeque::new(),
        }
    }

    pub fn push_error(&mut self, message: String) {
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ConfigurationForm::default(), String::new())
    }
}
