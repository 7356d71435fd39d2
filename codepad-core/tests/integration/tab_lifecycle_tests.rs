//! Tab manager and view adapters working together
//!
//! Every adapter must release what it acquired: listeners, widgets,
//! backend sessions and subscriptions, exactly once.

use std::time::Duration;

use codepad_core::host::SurfaceRole;
use codepad_core::testing::FakeHost;
use codepad_core::{
    AppSettings, BackendSession, ContentKind, Language, NewTab, Orientation, TabUpdate,
    ViewAdapter,
};

fn settings() -> AppSettings {
    AppSettings::default()
}

// ========== Editor tabs ==========

#[test]
fn hidden_tab_keeps_its_editor_state() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let first = manager.active_tab_id().expect("scratch tab");
    let first_widget = host.widgets.last().expect("scratch widget");
    first_widget.type_text("edited ");

    manager
        .create_tab(NewTab::file("b.rs", "fn main() {}", "/b.rs", ContentKind::Code(Language::Rust)))
        .expect("tab created");
    assert_eq!(host.widgets.created(), 2);

    manager.set_active_tab(first);
    assert_eq!(host.widgets.created(), 2);
    assert!(!first_widget.is_disposed());
    assert!(first_widget.text().starts_with("edited "));
    assert_eq!(host.strip.active_ids(), vec![first]);
    assert_eq!(host.strip.title(first).as_deref(), Some("Untitled.txt *"));
}

#[test]
fn language_change_reuses_the_editor_view() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager.active_tab_id().expect("scratch tab");
    host.widgets.last().expect("widget").type_text("{}");

    assert!(manager.update_tab(id, TabUpdate::new().kind(ContentKind::Code(Language::Json))));

    let widget = host.widgets.last().expect("recreated widget");
    assert_eq!(widget.language(), Language::Json);
    assert!(widget.text().starts_with("{}"));
    assert!(manager.view(id).is_some_and(|view| view.as_editor().is_some()));
    assert_eq!(host.listeners.active_count(), 2);
}

#[test]
fn kind_change_across_families_replaces_the_view() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager.active_tab_id().expect("scratch tab");

    manager.update_tab(id, TabUpdate::new().kind(ContentKind::Terminal));

    assert_eq!(host.widgets.live_count(), 0);
    assert!(host.terminal_backend.is_running(id));
    assert!(manager.view(id).is_some_and(|view| view.as_terminal().is_some()));
}

// ========== Split tabs ==========

#[test]
fn split_toggle_keeps_pane_content_and_focus() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("Split", ContentKind::Split).with_orientation(Orientation::Vertical))
        .expect("split tab");
    let view = manager.view(id).expect("split view");
    let split = view.as_split().expect("split adapter");

    split
        .load_file_in_pane(1, "b.py", "def b():\n    pass", ContentKind::Code(Language::Python), None)
        .expect("pane loads");
    split.focus_pane(1).expect("pane exists");
    let created = host.widgets.created();

    assert_eq!(split.toggle_orientation(), Orientation::Horizontal);

    assert_eq!(split.orientation(), Orientation::Horizontal);
    assert_eq!(split.focused_index(), 1);
    assert_eq!(split.pane(1).expect("pane").document().content, "def b():\n    pass");
    assert_eq!(host.widgets.created(), created);
    let root = host.surfaces.last(SurfaceRole::TabContent).expect("split surface");
    assert_eq!(root.orientation(), Some(Orientation::Horizontal));
}

#[test]
fn split_edit_marks_tab_modified() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("Split", ContentKind::Split))
        .expect("split tab");

    host.widgets.last().expect("pane widget").type_text("x");

    assert!(manager.get_tab(id).expect("tab").is_modified());
    assert_eq!(host.strip.title(id).as_deref(), Some("Split *"));
}

#[test]
fn saving_split_pane_clears_tab_star() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("Split", ContentKind::Split))
        .expect("split tab");
    let split = manager
        .view(id)
        .and_then(|view| view.as_split().cloned())
        .expect("split view");
    split.focus_pane(1).expect("valid pane");
    host.widgets.last().expect("pane widget").type_text("x");
    assert_eq!(host.strip.title(id).as_deref(), Some("Split *"));

    split.mark_focused_pane_saved("/src/b.txt", "b.txt");

    assert!(!manager.get_tab(id).expect("tab").is_modified());
    assert_eq!(host.strip.title(id).as_deref(), Some("Split"));
}

#[test]
fn closing_split_releases_both_panes() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("Split", ContentKind::Split))
        .expect("split tab");
    let view = manager.view(id).expect("split view");

    assert!(manager.force_close_tab(id));

    assert!(view.is_destroyed());
    assert_eq!(host.widgets.live_count(), 1);
    assert_eq!(host.listeners.active_count(), 2);
    assert_eq!(manager.registry().borrow().view_kind(id), None);
}

// ========== Terminal tabs ==========

#[test]
fn terminal_destroyed_twice_stops_session_once() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("Terminal", ContentKind::Terminal))
        .expect("terminal tab");
    host.scheduler.advance(Duration::from_millis(100));
    host.terminal_backend.emit_output(id, "$ ");
    let view = manager.view(id).expect("terminal view");

    assert!(manager.force_close_tab(id));
    view.destroy();

    assert_eq!(host.terminal_backend.stop_count(), 1);
    assert_eq!(host.terminal_backend.subscription_count(id), 0);
    assert_eq!(host.terminals.live_count(), 0);
    assert!(!manager.registry().borrow().has_session(id, BackendSession::Terminal));

    host.terminal_backend.emit_output(id, "late");
    assert_eq!(host.terminals.last().expect("terminal").screen(), "$ ");
}

#[test]
fn modified_check_skips_terminal_tabs() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("Terminal", ContentKind::Terminal))
        .expect("terminal tab");
    manager.update_tab(id, TabUpdate::new().modified(true));

    assert!(manager.close_tab(id, |_| false));
}

// ========== Assistant tabs ==========

#[test]
fn closing_assistant_mid_stream_drops_subscriptions() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    let id = manager
        .create_tab(NewTab::of_kind("AI Assistant", ContentKind::Assistant))
        .expect("assistant tab");
    let view = manager.view(id).expect("assistant view");
    let assistant = view.as_assistant().expect("assistant adapter");

    assistant.submit("What is a borrow?").expect("submitted");
    host.assistant_backend.emit_token(id, "A ");
    assert!(assistant.is_working());

    manager.force_close_tab(id);
    host.assistant_backend.emit_token(id, "loan.");
    host.assistant_backend.emit_complete(id);

    assert_eq!(host.assistant_backend.subscription_count(), 0);
    assert_eq!(host.assistant_backend.submissions().len(), 1);
}

// ========== Shutdown ==========

#[test]
fn shutdown_releases_every_view() {
    let host = FakeHost::new();
    let mut manager = host.manager(&settings());
    manager.create_tab(NewTab::of_kind("Terminal", ContentKind::Terminal));
    manager.create_tab(NewTab::of_kind("Split", ContentKind::Split));
    manager.create_tab(NewTab::of_kind("AI Assistant", ContentKind::Assistant));

    manager.shutdown();

    assert_eq!(manager.count(), 4);
    assert_eq!(host.widgets.live_count(), 0);
    assert_eq!(host.terminals.live_count(), 0);
    assert_eq!(host.listeners.active_count(), 0);
    assert_eq!(host.resize.active_count(), 0);
    assert_eq!(host.terminal_backend.stop_count(), 1);
    let registry = manager.registry();
    assert_eq!(registry.borrow().live_view_count(), 0);
    assert_eq!(registry.borrow().open_session_count(), 0);
}
