//! Scriptable terminal, assistant and clipboard backends

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::backend::{
    AssistantBackend, ClipboardBridge, CompleteHandler, ExitHandler, OutputHandler,
    TerminalBackend, TokenHandler,
};
use crate::error::{BackendError, BackendResult};
use crate::model::{SubscriptionId, TabId};

/// Per-tab push channels shared by the fake backends.
struct Channels<H> {
    handlers: RefCell<Vec<(SubscriptionId, TabId, H)>>,
}

impl<H: Clone> Channels<H> {
    fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, id: SubscriptionId, tab: TabId, handler: H) {
        self.handlers.borrow_mut().push((id, tab, handler));
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _, _)| *existing != id);
        handlers.len() != before
    }

    /// Handlers for a tab, cloned so they may unsubscribe while running.
    fn for_tab(&self, tab: TabId) -> Vec<H> {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, scope, _)| *scope == tab)
            .map(|(_, _, handler)| handler.clone())
            .collect()
    }

    fn count(&self, tab: TabId) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, scope, _)| *scope == tab)
            .count()
    }

    fn total(&self) -> usize {
        self.handlers.borrow().len()
    }
}

#[derive(Default)]
struct IdSource(Cell<u64>);

impl IdSource {
    fn next(&self) -> SubscriptionId {
        let id = self.0.get() + 1;
        self.0.set(id);
        SubscriptionId(id)
    }
}

// ===== Terminal =====

/// Pseudo-terminal backend recording every call.
pub struct FakeTerminalBackend {
    ids: IdSource,
    output: Channels<OutputHandler>,
    exit: Channels<ExitHandler>,
    sessions: RefCell<HashSet<TabId>>,
    writes: RefCell<Vec<(TabId, String)>>,
    resizes: RefCell<Vec<(TabId, u16, u16)>>,
    stops: RefCell<Vec<TabId>>,
    unsubscribes: Cell<usize>,
    fail_start: RefCell<Option<String>>,
}

impl Default for FakeTerminalBackend {
    fn default() -> Self {
        Self {
            ids: IdSource::default(),
            output: Channels::new(),
            exit: Channels::new(),
            sessions: RefCell::new(HashSet::new()),
            writes: RefCell::new(Vec::new()),
            resizes: RefCell::new(Vec::new()),
            stops: RefCell::new(Vec::new()),
            unsubscribes: Cell::new(0),
            fail_start: RefCell::new(None),
        }
    }
}

impl FakeTerminalBackend {
    /// Creates a backend where every start succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes later starts fail with `message`.
    pub fn fail_start(&self, message: impl Into<String>) {
        *self.fail_start.borrow_mut() = Some(message.into());
    }

    /// Pushes output to the tab's subscribers.
    pub fn emit_output(&self, tab: TabId, data: &str) {
        for handler in self.output.for_tab(tab) {
            handler(data);
        }
    }

    /// Ends the tab's session and notifies its subscribers.
    pub fn emit_exit(&self, tab: TabId, code: i32) {
        self.sessions.borrow_mut().remove(&tab);
        for handler in self.exit.for_tab(tab) {
            handler(code);
        }
    }

    /// Returns true if a session is running for the tab.
    pub fn is_running(&self, tab: TabId) -> bool {
        self.sessions.borrow().contains(&tab)
    }

    /// Input written to sessions, in order.
    pub fn writes(&self) -> Vec<(TabId, String)> {
        self.writes.borrow().clone()
    }

    /// Successful resize calls, in order.
    pub fn resizes(&self) -> Vec<(TabId, u16, u16)> {
        self.resizes.borrow().clone()
    }

    /// Number of stop calls.
    pub fn stop_count(&self) -> usize {
        self.stops.borrow().len()
    }

    /// Number of unsubscribe calls that removed a subscription.
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.get()
    }

    /// Live output and exit subscriptions for a tab.
    pub fn subscription_count(&self, tab: TabId) -> usize {
        self.output.count(tab) + self.exit.count(tab)
    }
}

impl TerminalBackend for FakeTerminalBackend {
    fn start(&self, tab: TabId) -> BackendResult<()> {
        if let Some(message) = self.fail_start.borrow().clone() {
            return Err(BackendError::Unavailable(message));
        }
        if !self.sessions.borrow_mut().insert(tab) {
            return Err(BackendError::SessionExists(tab));
        }
        Ok(())
    }

    fn write(&self, tab: TabId, data: &str) -> BackendResult<()> {
        if !self.is_running(tab) {
            return Err(BackendError::SessionNotFound(tab));
        }
        self.writes.borrow_mut().push((tab, data.to_owned()));
        Ok(())
    }

    fn resize(&self, tab: TabId, cols: u16, rows: u16) -> BackendResult<()> {
        if !self.is_running(tab) {
            return Err(BackendError::SessionNotFound(tab));
        }
        self.resizes.borrow_mut().push((tab, cols, rows));
        Ok(())
    }

    fn stop(&self, tab: TabId) -> BackendResult<()> {
        self.stops.borrow_mut().push(tab);
        if self.sessions.borrow_mut().remove(&tab) {
            Ok(())
        } else {
            Err(BackendError::SessionNotFound(tab))
        }
    }

    fn subscribe_output(&self, tab: TabId, handler: OutputHandler) -> SubscriptionId {
        let id = self.ids.next();
        self.output.add(id, tab, handler);
        id
    }

    fn subscribe_exit(&self, tab: TabId, handler: ExitHandler) -> SubscriptionId {
        let id = self.ids.next();
        self.exit.add(id, tab, handler);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if self.output.remove(id) || self.exit.remove(id) {
            self.unsubscribes.set(self.unsubscribes.get() + 1);
        }
    }
}

// ===== Assistant =====

/// Prompt received by the fake assistant backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Submitting tab
    pub scope: TabId,
    /// Model id
    pub model: String,
    /// Prompt as sent
    pub prompt: String,
}

/// Assistant backend whose stream is driven by the test.
pub struct FakeAssistantBackend {
    ids: IdSource,
    tokens: Channels<TokenHandler>,
    complete: Channels<CompleteHandler>,
    submissions: RefCell<Vec<Submission>>,
    failure: RefCell<Option<String>>,
}

impl Default for FakeAssistantBackend {
    fn default() -> Self {
        Self {
            ids: IdSource::default(),
            tokens: Channels::new(),
            complete: Channels::new(),
            submissions: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
        }
    }
}

impl FakeAssistantBackend {
    /// Creates a backend accepting every prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes later submissions fail with `message`, or succeed again.
    pub fn set_fail(&self, message: Option<&str>) {
        *self.failure.borrow_mut() = message.map(str::to_owned);
    }

    /// Streams a token to the tab's subscribers.
    pub fn emit_token(&self, scope: TabId, token: &str) {
        for handler in self.tokens.for_tab(scope) {
            handler(token);
        }
    }

    /// Signals the end of the tab's stream.
    pub fn emit_complete(&self, scope: TabId) {
        for handler in self.complete.for_tab(scope) {
            handler();
        }
    }

    /// Prompts received so far.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.borrow().clone()
    }

    /// Live subscriptions across all tabs.
    pub fn subscription_count(&self) -> usize {
        self.tokens.total() + self.complete.total()
    }
}

impl AssistantBackend for FakeAssistantBackend {
    fn submit(&self, scope: TabId, model: &str, prompt: &str) -> BackendResult<()> {
        if let Some(message) = self.failure.borrow().clone() {
            return Err(BackendError::Rejected(message));
        }
        self.submissions.borrow_mut().push(Submission {
            scope,
            model: model.to_owned(),
            prompt: prompt.to_owned(),
        });
        Ok(())
    }

    fn subscribe_tokens(&self, scope: TabId, handler: TokenHandler) -> SubscriptionId {
        let id = self.ids.next();
        self.tokens.add(id, scope, handler);
        id
    }

    fn subscribe_complete(&self, scope: TabId, handler: CompleteHandler) -> SubscriptionId {
        let id = self.ids.next();
        self.complete.add(id, scope, handler);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if !self.tokens.remove(id) {
            self.complete.remove(id);
        }
    }
}

// ===== Clipboard =====

/// Clipboard holding a single string.
#[derive(Debug, Default)]
pub struct FakeClipboard {
    text: RefCell<String>,
    unavailable: Cell<bool>,
}

impl FakeClipboard {
    /// Creates an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clipboard text.
    pub fn contents(&self) -> String {
        self.text.borrow().clone()
    }

    /// Makes every call fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }
}

impl ClipboardBridge for FakeClipboard {
    fn get_text(&self) -> BackendResult<String> {
        if self.unavailable.get() {
            return Err(BackendError::Unavailable("clipboard".into()));
        }
        Ok(self.text.borrow().clone())
    }

    fn set_text(&self, text: &str) -> BackendResult<()> {
        if self.unavailable.get() {
            return Err(BackendError::Unavailable("clipboard".into()));
        }
        *self.text.borrow_mut() = text.to_owned();
        Ok(())
    }
}

