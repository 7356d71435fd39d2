//! Backend contracts reached through the native bridge

mod assistant;
mod clipboard;
mod terminal;

pub use assistant::{
    AssistantBackend, ChatMessage, ChatRole, CompleteHandler, DEFAULT_MODEL, TokenHandler,
    optimize_prompt,
};
pub use clipboard::ClipboardBridge;
pub use terminal::{ExitHandler, OutputHandler, TerminalBackend, exit_trailer, start_failure_line};
