//! Outline panel bound to editors owned by the tab manager

use std::time::Duration;

use codepad_core::config::OutlineSettings;
use codepad_core::host::TextWidget;
use codepad_core::outline::OutlineStatus;
use codepad_core::testing::FakeHost;
use codepad_core::{AppSettings, ContentKind, Language, NewTab, OutlinePanel, SymbolKind, TabManager};

fn open(host: &FakeHost, manager: &mut TabManager, title: &str, text: &str) -> OutlinePanel {
    let kind = codepad_core::model::content_kind_for(title);
    manager
        .create_tab(NewTab::file(title, text, format!("/src/{title}"), kind))
        .expect("tab created");
    let panel = OutlinePanel::new(host.scheduler.clone(), OutlineSettings::default());
    panel.set_editor(manager.active_view().and_then(|view| view.focused_editor()));
    panel
}

#[test]
fn single_function_is_one_root_and_click_selects_its_line() {
    let host = FakeHost::new();
    let mut manager = host.manager(&AppSettings::default());
    let panel = open(&host, &mut manager, "a.js", "function foo(){}");

    assert_eq!(
        manager.get_active_tab().map(|tab| tab.kind()),
        Some(ContentKind::Code(Language::JavaScript))
    );
    let rows = panel.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label, "foo");
    assert_eq!(rows[0].kind, SymbolKind::Function);
    assert_eq!(rows[0].line, 0);

    assert!(panel.click(&rows[0].path));
    let widget = host.widgets.last().expect("editor widget");
    assert_eq!(widget.highlight(), Some(1));
    assert_eq!(
        manager
            .active_view()
            .and_then(|view| view.focused_editor())
            .and_then(|editor| editor.cursor())
            .map(|cursor| cursor.line),
        Some(1)
    );
}

#[test]
fn class_members_are_sorted_under_the_class() {
    let host = FakeHost::new();
    let mut manager = host.manager(&AppSettings::default());
    let source = "class Animal {\n  speak() {\n  }\n  eat() {\n  }\n}";
    let panel = open(&host, &mut manager, "animal.js", source);

    let tree = panel.tree();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].symbol.name, "Animal");
    assert_eq!(tree[0].symbol.kind, SymbolKind::Class);
    let members: Vec<_> = tree[0]
        .children
        .iter()
        .map(|node| node.symbol.name.as_str())
        .collect();
    assert_eq!(members, ["eat", "speak"]);
}

#[test]
fn typing_reindexes_after_debounce() {
    let host = FakeHost::new();
    let mut manager = host.manager(&AppSettings::default());
    let panel = open(&host, &mut manager, "a.py", "x = 1");
    assert_eq!(panel.status(), OutlineStatus::NoSymbols);

    let widget = host.widgets.last().expect("editor widget");
    widget.replace_range(5, 5, "\ndef run():\n    pass");
    panel.schedule_refresh();
    assert_eq!(panel.status(), OutlineStatus::NoSymbols);

    host.scheduler.advance(Duration::from_secs(1));
    assert_eq!(panel.status(), OutlineStatus::Ready);
    assert_eq!(panel.rows()[0].label, "run");
}

#[test]
fn closing_the_bound_tab_leaves_panel_inert() {
    let host = FakeHost::new();
    let mut manager = host.manager(&AppSettings::default());
    let panel = open(&host, &mut manager, "a.js", "function foo(){}");
    let id = manager.active_tab_id().expect("active tab");

    assert!(manager.force_close_tab(id));

    assert!(!panel.navigate_to_line(0));
    assert_eq!(panel.refresh(), 0);
    assert_eq!(panel.status(), OutlineStatus::NoContent);
}

#[test]
fn switching_tabs_rebinds_panel() {
    let host = FakeHost::new();
    let mut manager = host.manager(&AppSettings::default());
    let panel = open(&host, &mut manager, "a.js", "function foo(){}");
    let first = manager.active_tab_id().expect("active tab");
    manager
        .create_tab(NewTab::file("b.go", "func bar() {\n}", "/src/b.go", ContentKind::Code(Language::Go)))
        .expect("tab created");

    panel.set_editor(manager.active_view().and_then(|view| view.focused_editor()));
    assert_eq!(panel.rows()[0].label, "bar");

    manager.set_active_tab(first);
    panel.set_editor(manager.active_view().and_then(|view| view.focused_editor()));
    assert_eq!(panel.rows()[0].label, "foo");
}
