//! Render-ready view of a single form row

/// How a row is edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// Free-text input
    Input,
    /// Select over a fixed list of option values
    Select {
        options: Vec<String>,
        selected: Option<usize>,
    },
}

/// Represents a single form row with its label and current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub label: String,
    pub value: String,
    pub description: String,
    pub kind: ControlKind,
    /// Nesting level in the dependent-field tree
    pub depth: usize,
}

impl FormControl {
    /// Create a free-text row
    pub fn input(label: &str, value: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            kind: ControlKind::Input,
            depth: 0,
        }
    }

    /// Create a select row, marking the option equal to `value` as selected
    pub fn select(label: &str, options: Vec<String>, value: &str, description: &str) -> Self {
        let selected = options.iter().position(|opt| opt == value);
        Self {
            label: label.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            kind: ControlKind::Select { options, selected },
            depth: 0,
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn is_select(&self) -> bool {
        matches!(self.kind, ControlKind::Select { .. })
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.kind {
            ControlKind::Input => self.value.clone(),
            ControlKind::Select { options, selected } => match selected {
                Some(index) => format!("◀ {} ▶  ({}/{})", self.value, index + 1, options.len()),
                // Value recorded but not among the options
                None => format!("◀ {} ▶", self.value),
            },
        }
    }
}
