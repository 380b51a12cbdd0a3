//! Configuration form state: the wrapper tree, the form data and focus

use super::field::FormControl;
use super::form_data::{FormData, TEXT_KEY, TOKEN_KEY};
use super::schema::Field;
use super::wrapper_tree::{NodeId, WrapperTree};
use std::sync::Arc;

/// Pre-filled text for the "Test Text" row
pub const DEFAULT_TEST_TEXT: &str =
    "It is a paragraph for testing, thank you for staring the github repo.";
pub const TOKEN_DESCRIPTION: &str = "Input -token when running server, can be empty";
pub const TEXT_DESCRIPTION: &str = "Text for testing";

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
}

/// Something that can hold keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Token,
    Field(NodeId),
    Text,
    Listen,
    Subscribe,
}

impl FocusTarget {
    pub fn is_button(&self) -> bool {
        matches!(self, Self::Listen | Self::Subscribe)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationForm {
    tree: WrapperTree,
    data: FormData,
    active_field_index: usize,
}

impl Default for ConfigurationForm {
    fn default() -> Self {
        Self::new("", DEFAULT_TEST_TEXT)
    }
}

impl ConfigurationForm {
    pub fn new(token: &str, test_text: &str) -> Self {
        let mut data = FormData::new();
        data.set(TOKEN_KEY, token);
        data.set(TEXT_KEY, test_text);
        Self {
            tree: WrapperTree::default(),
            data,
            active_field_index: 0,
        }
    }

    pub fn tree(&self) -> &WrapperTree {
        &self.tree
    }

    pub fn form_data(&self) -> &FormData {
        &self.data
    }

    /// Replace the dynamic fields with a freshly fetched schema and apply
    /// default selections.
    pub fn load_fields(&mut self, fields: Vec<Arc<Field>>) {
        let focused = self.active_target();
        self.tree = WrapperTree::from_fields(fields);
        self.data.prune(&Default::default());
        let roots = self.tree.roots().to_vec();
        self.initialize(&roots);

        // Keep the cursor on a row that survived the reload
        self.active_field_index = 0;
        self.focus(focused);
    }

    /// Apply default values to newly shown wrappers. Selects cascade through
    /// [`Self::handle_select_change`], inputs are seeded with their default.
    fn initialize(&mut self, ids: &[NodeId]) {
        for &id in ids {
            let Some(wrapper) = self.tree.get(id) else {
                continue;
            };
            let field = Arc::clone(&wrapper.field);
            match field.initial_choice() {
                Some(choice) if field.has_options() => {
                    self.handle_select_change(id, choice);
                }
                _ => {
                    let value = field.default_value.clone();
                    self.data.set(field.name.clone(), value);
                }
            }
        }
    }

    /// Select `value` on wrapper `id`, replacing its dependent fields.
    /// A value matching no option clears the children and is still recorded.
    pub fn handle_select_change(&mut self, id: NodeId, value: &str) {
        let Some(wrapper) = self.tree.get(id) else {
            tracing::debug!("select change on removed wrapper {id:?}");
            return;
        };
        let field = Arc::clone(&wrapper.field);
        let related = field
            .find_option(value)
            .map(|opt| opt.related_fields.clone())
            .unwrap_or_default();

        let new_children = self.tree.replace_children(id, &related);
        self.handle_change(&field.name, value);
        self.initialize(&new_children);

        let visible = self.tree.visible_names();
        self.data.prune(&visible);
    }

    /// Record a raw value
    pub fn handle_change(&mut self, name: &str, value: &str) {
        self.data.set(name, value);
    }

    /// Move the select on `id` one option forward or back, wrapping around
    pub fn cycle_option(&mut self, id: NodeId, forward: bool) {
        let Some(wrapper) = self.tree.get(id) else {
            return;
        };
        let field = Arc::clone(&wrapper.field);
        let count = field.options.len();
        if count == 0 {
            return;
        }
        let current = self
            .data
            .get(&field.name)
            .and_then(|value| field.option_index(value));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(0), false) => count - 1,
            (Some(i), false) => i - 1,
            (None, _) => 0,
        };
        self.handle_select_change(id, &field.options[next].value);
    }

    /// Focusable rows and buttons in display order
    pub fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets = vec![FocusTarget::Token];
        targets.extend(self.tree.visible().into_iter().map(FocusTarget::Field));
        targets.extend([
            FocusTarget::Text,
            FocusTarget::Listen,
            FocusTarget::Subscribe,
        ]);
        targets
    }

    pub fn active_target(&self) -> FocusTarget {
        let targets = self.focus_targets();
        let index = self.active_field_index.min(targets.len() - 1);
        targets[index]
    }

    /// Focus a specific target if it is currently shown
    pub fn focus(&mut self, target: FocusTarget) {
        if let Some(index) = self.focus_targets().iter().position(|t| *t == target) {
            self.active_field_index = index;
        }
    }

    /// Form key of an editable target, `None` for buttons and selects
    fn input_key(&self, target: FocusTarget) -> Option<String> {
        match target {
            FocusTarget::Token => Some(TOKEN_KEY.to_string()),
            FocusTarget::Text => Some(TEXT_KEY.to_string()),
            FocusTarget::Field(id) => self
                .tree
                .get(id)
                .filter(|w| !w.field.has_options())
                .map(|w| w.field.name.clone()),
            FocusTarget::Listen | FocusTarget::Subscribe => None,
        }
    }

    /// Type a character into the focused input
    pub fn input_char(&mut self, c: char) {
        if let Some(key) = self.input_key(self.active_target()) {
            self.data.value_mut(&key).push(c);
        }
    }

    /// Remove the last character of the focused input
    pub fn backspace(&mut self) {
        if let Some(key) = self.input_key(self.active_target()) {
            self.data.value_mut(&key).pop();
        }
    }

    /// Cycle the focused select, if any
    pub fn cycle_active(&mut self, forward: bool) {
        if let FocusTarget::Field(id) = self.active_target() {
            self.cycle_option(id, forward);
        }
    }

    /// Build the render model of one non-button target
    pub fn control(&self, target: FocusTarget) -> Option<FormControl> {
        let value = |key: &str| self.data.get(key).unwrap_or_default().to_string();
        match target {
            FocusTarget::Token => {
                let token = value(TOKEN_KEY);
                Some(FormControl::input("Token", &token, TOKEN_DESCRIPTION))
            }
            FocusTarget::Text => {
                let text = value(TEXT_KEY);
                Some(FormControl::input("Test Text", &text, TEXT_DESCRIPTION))
            }
            FocusTarget::Field(id) => {
                let field = &self.tree.get(id)?.field;
                let control = if field.has_options() {
                    FormControl::select(
                        &field.name,
                        field.options.iter().map(|o| o.value.clone()).collect(),
                        &value(&field.name),
                        &field.description,
                    )
                } else {
                    FormControl::input(&field.name, &value(&field.name), &field.description)
                };
                Some(control.with_depth(self.tree.depth(id)))
            }
            FocusTarget::Listen | FocusTarget::Subscribe => None,
        }
    }
}

impl Form for ConfigurationForm {
    fn field_count(&self) -> usize {
        self.focus_targets().len()
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
}
