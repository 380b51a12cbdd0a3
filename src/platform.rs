//! Platform-specific configuration

use crossterm::event::KeyModifiers;

/// Modifier for the form shortcuts.
/// Terminals rarely forward Cmd on macOS, so Ctrl is used everywhere.
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Listen shortcut display
pub const LISTEN_SHORTCUT: &str = "Ctrl+P";

/// Copy subscribe URL shortcut display
pub const SUBSCRIBE_SHORTCUT: &str = "Ctrl+U";
