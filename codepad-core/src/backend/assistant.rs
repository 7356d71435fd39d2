//! Assistant query backend contract and chat records

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BackendResult;
use crate::model::{SubscriptionId, TabId};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

/// Token handler for a streaming response.
pub type TokenHandler = Rc<dyn Fn(&str)>;

/// Completion handler for a streaming response.
pub type CompleteHandler = Rc<dyn Fn()>;

/// Streaming assistant queries.
///
/// Push channels are scoped to the assistant tab that submitted the query,
/// so several assistant tabs can stream at once.
pub trait AssistantBackend {
    /// Dispatches a prompt. Tokens and completion arrive on the tab's channels.
    ///
    /// # Errors
    ///
    /// Returns an error if the query could not be dispatched.
    fn submit(&self, scope: TabId, model: &str, prompt: &str) -> BackendResult<()>;

    /// Subscribes to streamed tokens for the tab
    fn subscribe_tokens(&self, scope: TabId, handler: TokenHandler) -> SubscriptionId;

    /// Subscribes to stream completion for the tab
    fn subscribe_complete(&self, scope: TabId, handler: CompleteHandler) -> SubscriptionId;

    /// Drops a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Typed by the user
    User,
    /// Produced by the model
    Assistant,
}

/// One message of the assistant transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: ChatRole,
    /// Message text
    pub text: String,
    /// Creation time
    pub sent_at: DateTime<Utc>,
    /// True while tokens are still being appended
    #[serde(skip)]
    pub streaming: bool,
}

impl ChatMessage {
    /// Creates a user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            sent_at: Utc::now(),
            streaming: false,
        }
    }

    /// Creates a finished assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            sent_at: Utc::now(),
            streaming: false,
        }
    }
}

/// Collapses runs of whitespace to single spaces and trims the ends.
#[must_use]
pub fn optimize_prompt(prompt: &str) -> String {
    prompt.split_whitespace().collect::<Vec<_>>().join(" ")
}
