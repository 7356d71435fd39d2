//! Workspace flows driven the way the shell drives them
//!
//! Actions requested from inside a view reach the workspace observer and
//! are handed back to the workspace, which runs the matching flow.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use codepad_core::config::RecentFiles;
use codepad_core::host::{ExternalAction, MenuAction, Selection, TextWidget};
use codepad_core::services::FileService;
use codepad_core::testing::{FakeHost, FakeStartupService, InMemoryFileService};
use codepad_core::workspace::explain_prompt;
use codepad_core::{AppSettings, ContentKind, Language, NewTab, SaveOutcome, Workspace};

fn workspace(host: &FakeHost, files: &Rc<InMemoryFileService>, startup: &[&str]) -> Workspace {
    Workspace::new(
        host.manager(&AppSettings::default()),
        Rc::clone(files) as Rc<dyn FileService>,
        Rc::new(FakeStartupService::new(
            startup.iter().map(PathBuf::from).collect(),
        )),
        RecentFiles::default(),
    )
}

#[tokio::test]
async fn startup_files_open_in_order_and_last_is_active() {
    let host = FakeHost::new();
    let files = Rc::new(InMemoryFileService::new());
    files.insert_text("/p/main.rs", "fn main() {}");
    files.insert_text("/p/lib.rs", "pub fn lib() {}");
    let workspace = workspace(&host, &files, &["/p/main.rs", "/p/lib.rs"]);

    let opened = workspace.open_startup_files().await;

    assert_eq!(opened.len(), 2);
    let tabs = workspace.tabs();
    let tabs = tabs.borrow();
    assert_eq!(tabs.active_tab_id(), opened.last().copied());
    let titles: Vec<String> = tabs.get_all_tabs().iter().map(|tab| tab.title()).collect();
    assert_eq!(titles, ["Untitled.txt", "main.rs", "lib.rs"]);
    assert_eq!(
        workspace.recent_files().files,
        vec![PathBuf::from("/p/lib.rs"), PathBuf::from("/p/main.rs")]
    );
}

#[tokio::test]
async fn ask_assistant_from_editor_menu() {
    let host = FakeHost::new();
    let files = Rc::new(InMemoryFileService::new());
    files.insert_text("/p/util.py", "def add(a, b):\n    return a + b");
    let workspace = workspace(&host, &files, &[]);
    workspace
        .open_file_by_path(Path::new("/p/util.py"), None)
        .await
        .expect("file opens");

    let widget = host.widgets.last().expect("editor widget");
    widget.set_selection(Selection { anchor: 0, head: 14 });
    let editor = workspace
        .tabs()
        .borrow()
        .active_view()
        .and_then(|view| view.focused_editor())
        .expect("editor");
    assert!(editor.run_menu_action(MenuAction::AskAssistant));

    let actions = host.observer.actions();
    assert_eq!(
        actions,
        vec![ExternalAction::AskAssistant {
            selection: "def add(a, b):".into(),
            language: Language::Python,
        }]
    );
    for action in actions {
        workspace
            .handle_external_action(action)
            .await
            .expect("action handled");
    }

    let tabs = workspace.tabs();
    let tabs = tabs.borrow();
    let active = tabs.get_active_tab().expect("active tab");
    assert_eq!(active.kind(), ContentKind::Assistant);
    let view = tabs.active_view().expect("assistant view");
    assert_eq!(
        view.as_assistant().expect("assistant").prompt(),
        explain_prompt("def add(a, b):", Language::Python)
    );
}

#[tokio::test]
async fn split_pane_open_request_round_trip() {
    let host = FakeHost::new();
    let files = Rc::new(InMemoryFileService::new());
    files.insert_text("/p/left.ts", "const a = 1;");
    files.set_pick(Some(PathBuf::from("/p/left.ts")));
    let workspace = workspace(&host, &files, &[]);
    let id = workspace
        .tabs()
        .borrow_mut()
        .create_tab(NewTab::of_kind("Split", ContentKind::Split))
        .expect("split tab");

    let view = workspace.tabs().borrow().view(id).expect("split view");
    view.as_split().expect("split").request_open(0);
    for action in host.observer.actions() {
        workspace
            .handle_external_action(action)
            .await
            .expect("pane loads");
    }

    let split = view.as_split().expect("split");
    assert_eq!(split.pane(0).expect("pane").document().content, "const a = 1;");
    assert_eq!(split.pane(0).expect("pane").label(), "left.ts");

    host.widgets.last().expect("pane widget").type_text("export ");
    assert_eq!(
        workspace.save_active().await,
        Ok(SaveOutcome::Saved(PathBuf::from("/p/left.ts")))
    );
    assert_eq!(files.text("/p/left.ts").as_deref(), Some("export const a = 1;"));
    assert!(!workspace.tabs().borrow().get_tab(id).expect("tab").is_modified());
}

#[tokio::test]
async fn save_as_renames_tab_and_later_saves_in_place() {
    let host = FakeHost::new();
    let files = Rc::new(InMemoryFileService::new());
    files.set_save_as_target(Some(PathBuf::from("/p/notes.md")));
    let workspace = workspace(&host, &files, &[]);
    let id = workspace.tabs().borrow().active_tab_id().expect("scratch tab");

    workspace.save_active().await.expect("saved as");
    files.set_save_as_target(None);
    host.widgets.last().expect("editor widget").type_text("# ");
    workspace.save_active().await.expect("saved in place");

    let writes = files.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes.iter().all(|(path, _)| path == Path::new("/p/notes.md")));
    assert_eq!(host.strip.title(id).as_deref(), Some("notes.md"));
    assert_eq!(
        workspace.tabs().borrow().get_tab(id).expect("tab").kind(),
        ContentKind::Code(Language::Text)
    );
}
