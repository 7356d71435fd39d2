//! Backend-held editor settings and the assistant API key

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;

/// Number of trailing characters left visible by [`mask_secret`].
pub const VISIBLE_SECRET_CHARS: usize = 4;

/// Editor font stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFont {
    /// CSS font family
    pub font: String,
    /// Size in pixels
    pub font_size: u32,
}

/// Settings persisted by the native side.
#[async_trait(?Send)]
pub trait SettingsService {
    /// Current editor font
    async fn editor_font(&self) -> EditorFont;

    /// Stores the editor font.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the value.
    async fn set_editor_font(&self, font: &EditorFont) -> ServiceResult<()>;

    /// Decrypted API key, if one is stored
    async fn api_key(&self) -> Option<SecretString>;

    /// Stores the API key encrypted at rest.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the value.
    async fn set_api_key(&self, key: SecretString) -> ServiceResult<()>;

    /// Returns true if an API key is stored
    async fn has_api_key(&self) -> bool {
        self.api_key().await.is_some()
    }
}

/// Renders a secret for display, keeping only its last four characters.
///
/// Keys of four characters or fewer are masked completely.
#[must_use]
pub fn mask_secret(secret: &SecretString) -> String {
    let chars: Vec<char> = secret.expose_secret().chars().collect();
    if chars.len() <= VISIBLE_SECRET_CHARS {
        return "*".repeat(chars.len());
    }
    let hidden = chars.len() - VISIBLE_SECRET_CHARS;
    let mut masked = "*".repeat(hidden);
    masked.extend(&chars[hidden..]);
    masked
}
