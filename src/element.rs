use chromiumoxide::element::Element as CrElement;
use chromiumoxide::error::CdpError;

use crate::error::{Error, Result};

/// A located page element. Keeps the selector that matched it so a failed
/// action can say what it was aimed at.
pub struct Element {
    inner: CrElement,
    selector: String,
}

impl Element {
    pub(crate) fn new(inner: CrElement, selector: impl Into<String>) -> Self {
        Self {
            inner,
            selector: selector.into(),
        }
    }

    /// The selector this element was found by.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Click the element, scrolling it into view first.
    pub async fn click(&self) -> Result<()> {
        self.inner
            .click()
            .await
            .map_err(|e| self.action_error("click", e))?;
        Ok(())
    }

    /// Type text into the element as individual key events.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        self.inner
            .type_str(text)
            .await
            .map_err(|e| self.action_error("type into", e))?;
        Ok(())
    }

    /// Send one key press (e.g. "Enter", "Tab") to the element.
    pub async fn press_key(&self, key: &str) -> Result<()> {
        self.inner
            .press_key(key)
            .await
            .map_err(|e| self.action_error("press a key on", e))?;
        Ok(())
    }

    fn action_error(&self, action: &'static str, cause: CdpError) -> Error {
        Error::ActionFailed {
            action,
            selector: self.selector.clone(),
            cause: cause.to_string(),
        }
    }
}
