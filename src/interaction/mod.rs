/// User dialogs the editor needs, supplied by the UI layer.
///
/// Commands only talk to the user through this trait, so they run headless
/// in tests.
pub trait Interaction {
    /// Ask for a line of text. `None` when the user cancels.
    fn prompt(&self, message: &str, default: &str) -> Option<String>;

    fn confirm(&self, message: &str) -> bool;

    fn alert(&self, message: &str);
}

/// Blocking browser dialogs on `window`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserInteraction;

impl Interaction for BrowserInteraction {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        let window = web_sys::window()?;
        window
            .prompt_with_message_and_default(message, default)
            .ok()
            .flatten()
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
