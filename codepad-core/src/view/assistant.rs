//! Assistant chat adapter
//!
//! Holds the transcript of one chat tab. A submitted prompt opens a token
//! stream scoped to the tab id; tokens are appended to a streaming
//! assistant message until the completion event closes the stream.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::backend::{ChatMessage, ChatRole, optimize_prompt};
use crate::error::{ValidationError, ViewError, ViewResult};
use crate::host::{Markup, Surface};
use crate::model::{SubscriptionId, TabId};
use crate::registry::BackendSession;
use crate::tracing::span_names;

use super::{ViewAdapter, ViewContext};

struct AssistantInner {
    tab_id: TabId,
    surface: Box<dyn Surface>,
    ctx: ViewContext,
    messages: RefCell<Vec<ChatMessage>>,
    model: RefCell<String>,
    prompt: RefCell<String>,
    working: Cell<bool>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
    destroyed: Cell<bool>,
}

impl AssistantInner {
    fn render(&self) {
        if self.destroyed.get() {
            return;
        }
        let messages = self.messages.borrow().clone();
        self.surface.render(Markup::Transcript {
            messages,
            working: self.working.get(),
        });
    }

    fn on_token(&self, token: &str) {
        if self.destroyed.get() || !self.working.get() {
            return;
        }
        {
            let mut messages = self.messages.borrow_mut();
            match messages.last_mut() {
                Some(last) if last.role == ChatRole::Assistant && last.streaming => {
                    last.text.push_str(token);
                }
                _ => {
                    let mut message = ChatMessage::assistant(token);
                    message.streaming = true;
                    messages.push(message);
                }
            }
        }
        self.render();
    }

    fn on_complete(&self) {
        if self.destroyed.get() {
            return;
        }
        self.finish_stream();
        tracing::debug!(tab_id = %self.tab_id, "Assistant response complete");
        self.render();
    }

    /// Drops the stream subscriptions and closes the streaming message.
    fn finish_stream(&self) {
        let backend = &self.ctx.host.assistant_backend;
        for id in self.subscriptions.borrow_mut().drain(..) {
            backend.unsubscribe(id);
        }
        if let Some(last) = self.messages.borrow_mut().last_mut() {
            last.streaming = false;
        }
        if self.working.replace(false) {
            self.ctx
                .registry
                .borrow_mut()
                .release_session(self.tab_id, BackendSession::AssistantStream);
        }
    }
}

/// Adapter for one assistant chat tab.
#[derive(Clone)]
pub struct AssistantView {
    inner: Rc<AssistantInner>,
}

impl AssistantView {
    /// Creates an empty chat using the configured model.
    #[must_use]
    pub fn new(tab_id: TabId, surface: Box<dyn Surface>, ctx: ViewContext) -> Self {
        let model = ctx.assistant.model.clone();
        let view = Self {
            inner: Rc::new(AssistantInner {
                tab_id,
                surface,
                ctx,
                messages: RefCell::new(Vec::new()),
                model: RefCell::new(model),
                prompt: RefCell::new(String::new()),
                working: Cell::new(false),
                subscriptions: RefCell::new(Vec::new()),
                destroyed: Cell::new(false),
            }),
        };
        view.inner.render();
        view
    }

    fn weak(&self) -> Weak<AssistantInner> {
        Rc::downgrade(&self.inner)
    }

    /// Tab this chat belongs to.
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Transcript so far.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.messages.borrow().clone()
    }

    /// Returns true while a response is streaming.
    #[must_use]
    pub fn is_working(&self) -> bool {
        self.inner.working.get()
    }

    /// Model id used for the next query.
    #[must_use]
    pub fn model(&self) -> String {
        self.inner.model.borrow().clone()
    }

    /// Selects the model for later queries.
    pub fn set_model(&self, model: impl Into<String>) {
        *self.inner.model.borrow_mut() = model.into();
    }

    /// Current prompt draft.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.inner.prompt.borrow().clone()
    }

    /// Replaces the prompt draft.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        *self.inner.prompt.borrow_mut() = prompt.into();
    }

    /// Empties the prompt draft.
    pub fn clear_prompt(&self) {
        self.inner.prompt.borrow_mut().clear();
    }

    /// Removes every message from the transcript.
    pub fn clear_chat(&self) {
        self.inner.messages.borrow_mut().clear();
        self.inner.render();
    }

    /// Abandons the streaming response, keeping what has arrived so far.
    ///
    /// Returns false if nothing was streaming.
    pub fn stop(&self) -> bool {
        let inner = &self.inner;
        if inner.destroyed.get() || !inner.working.get() {
            return false;
        }
        inner.finish_stream();
        tracing::debug!(tab_id = %inner.tab_id, "Assistant response stopped");
        inner.render();
        true
    }

    /// Sends the prompt draft.
    ///
    /// # Errors
    ///
    /// See [`AssistantView::submit`].
    pub fn submit_draft(&self) -> ViewResult<()> {
        let prompt = self.prompt();
        self.submit(&prompt)
    }

    /// Sends a prompt and starts streaming the response into the transcript.
    ///
    /// The transcript shows the prompt as typed; the backend receives it
    /// with whitespace collapsed. A backend failure is recorded as an
    /// assistant message and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is blank, a response is already
    /// streaming, the view is destroyed or the backend rejects the query.
    pub fn submit(&self, prompt: &str) -> ViewResult<()> {
        let inner = &self.inner;
        if inner.destroyed.get() {
            return Err(ViewError::Destroyed(inner.tab_id));
        }
        if prompt.trim().is_empty() {
            tracing::warn!(tab_id = %inner.tab_id, "Empty prompt, not sending");
            return Err(ValidationError::EmptyPrompt.into());
        }
        if inner.working.get() {
            return Err(ViewError::Busy);
        }

        let model = self.model();
        let _span = tracing::info_span!(
            span_names::ASSISTANT_QUERY,
            tab_id = %inner.tab_id,
            model = %model
        )
        .entered();

        let backend = &inner.ctx.host.assistant_backend;
        let on_token = self.weak();
        let on_complete = self.weak();
        let tokens = backend.subscribe_tokens(
            inner.tab_id,
            Rc::new(move |token| {
                if let Some(inner) = on_token.upgrade() {
                    inner.on_token(token);
                }
            }),
        );
        let complete = backend.subscribe_complete(
            inner.tab_id,
            Rc::new(move || {
                if let Some(inner) = on_complete.upgrade() {
                    inner.on_complete();
                }
            }),
        );
        inner.subscriptions.borrow_mut().extend([tokens, complete]);
        inner.working.set(true);
        inner
            .ctx
            .registry
            .borrow_mut()
            .record_session(inner.tab_id, BackendSession::AssistantStream);

        inner.messages.borrow_mut().push(ChatMessage::user(prompt));
        inner.prompt.borrow_mut().clear();
        inner.render();

        if let Err(e) = backend.submit(inner.tab_id, &model, &optimize_prompt(prompt)) {
            tracing::error!(%e, tab_id = %inner.tab_id, "Error sending prompt");
            inner.finish_stream();
            inner
                .messages
                .borrow_mut()
                .push(ChatMessage::assistant(format!("Error: {e}")));
            inner.render();
            return Err(e.into());
        }
        tracing::info!(tab_id = %inner.tab_id, "Prompt sent");
        Ok(())
    }
}

impl ViewAdapter for AssistantView {
    fn show(&self) {
        self.inner.surface.show();
    }

    fn hide(&self) {
        self.inner.surface.hide();
    }

    fn destroy(&self) {
        if self.inner.destroyed.get() {
            return;
        }
        self.inner.finish_stream();
        self.inner.destroyed.set(true);
        self.inner.surface.remove();
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    fn is_modified(&self) -> bool {
        false
    }

    fn change_kind(&self) {}
}
