//! System clipboard access

use crate::error::TtsError;

#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink: Send {
    fn set_text(&self, text: String) -> Result<(), TtsError>;
}

/// Clipboard of the desktop session, opened per write
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: String) -> Result<(), TtsError> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new().map_err(|e| TtsError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| TtsError::Clipboard(e.to_string()))
    }
}
