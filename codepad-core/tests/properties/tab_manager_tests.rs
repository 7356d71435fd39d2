//! Property-based tests for the tab manager
//!
//! Random sequences of create, close and activate operations must keep the
//! tab list, the active pointer and the tab strip consistent.

use std::collections::HashSet;

use proptest::prelude::*;

use codepad_core::config::settings::DEFAULT_TAB_NAME;
use codepad_core::testing::FakeHost;
use codepad_core::{AppSettings, ContentKind, Language, NewTab, TabId, TabManager};

// ============================================================================
// Test Strategies
// ============================================================================

fn kind_strategy() -> impl Strategy<Value = ContentKind> {
    prop_oneof![
        Just(ContentKind::Code(Language::JavaScript)),
        Just(ContentKind::Code(Language::Python)),
        Just(ContentKind::Code(Language::Text)),
        Just(ContentKind::Split),
        Just(ContentKind::Terminal),
        Just(ContentKind::Assistant),
        Just(ContentKind::Image),
    ]
}

#[derive(Debug, Clone)]
enum TabOperation {
    Create(ContentKind),
    /// Close the tab at this index, modulo the tab count
    Close(usize),
    /// Activate the tab at this index, modulo the tab count
    Activate(usize),
    /// Activate an id that was never issued
    ActivateUnknown,
    Next,
    Previous,
}

fn operation_strategy() -> impl Strategy<Value = TabOperation> {
    prop_oneof![
        3 => kind_strategy().prop_map(TabOperation::Create),
        2 => (0usize..32).prop_map(TabOperation::Close),
        2 => (0usize..32).prop_map(TabOperation::Activate),
        1 => Just(TabOperation::ActivateUnknown),
        1 => Just(TabOperation::Next),
        1 => Just(TabOperation::Previous),
    ]
}

fn apply(manager: &mut TabManager, op: &TabOperation) {
    let ids: Vec<TabId> = manager.get_all_tabs().iter().map(|tab| tab.id()).collect();
    match op {
        TabOperation::Create(kind) => {
            manager.create_tab(NewTab::of_kind(kind.to_string(), *kind));
        }
        TabOperation::Close(index) => {
            manager.close_tab(ids[index % ids.len()], |_| true);
        }
        TabOperation::Activate(index) => {
            manager.set_active_tab(ids[index % ids.len()]);
        }
        TabOperation::ActivateUnknown => {
            manager.set_active_tab(TabId::new());
        }
        TabOperation::Next => {
            manager.activate_next();
        }
        TabOperation::Previous => {
            manager.activate_previous();
        }
    }
}

fn assert_consistent(host: &FakeHost, manager: &TabManager) {
    let tabs = manager.get_all_tabs();
    assert!(!tabs.is_empty());
    assert!(tabs.len() <= manager.max_tabs());

    let ids: Vec<TabId> = tabs.iter().map(|tab| tab.id()).collect();
    let unique: HashSet<TabId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());

    let active: Vec<TabId> = tabs
        .iter()
        .filter(|tab| tab.is_active())
        .map(|tab| tab.id())
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(manager.active_tab_id(), Some(active[0]));

    assert_eq!(host.strip.header_ids(), ids);
    assert_eq!(host.strip.active_ids(), active);
    assert!(manager.active_view().is_some());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any operation sequence keeps ids unique and exactly one tab active.
    #[test]
    fn operations_keep_manager_consistent(
        ops in proptest::collection::vec(operation_strategy(), 0..40)
    ) {
        let host = FakeHost::new();
        let mut manager = host.manager(&AppSettings::default());
        assert_consistent(&host, &manager);
        for op in &ops {
            apply(&mut manager, op);
            assert_consistent(&host, &manager);
        }
    }

    /// Closing the active tab activates the tab now at its index, clamped.
    #[test]
    fn closing_active_tab_activates_same_index(
        extra in 1usize..8,
        active_seed in 0usize..16,
    ) {
        let host = FakeHost::new();
        let mut manager = host.manager(&AppSettings::default());
        for i in 0..extra {
            manager.create_tab(NewTab::scratch().with_title(format!("t{i}.txt")));
        }
        let ids: Vec<TabId> = manager.get_all_tabs().iter().map(|tab| tab.id()).collect();
        let index = active_seed % ids.len();
        manager.set_active_tab(ids[index]);

        prop_assert!(manager.force_close_tab(ids[index]));

        let remaining: Vec<TabId> = ids.iter().copied().filter(|id| *id != ids[index]).collect();
        let expected = remaining[index.min(remaining.len() - 1)];
        prop_assert_eq!(manager.active_tab_id(), Some(expected));
    }

    /// Closing an inactive tab never moves the active pointer.
    #[test]
    fn closing_inactive_tab_keeps_active(
        extra in 1usize..8,
        close_seed in 0usize..16,
    ) {
        let host = FakeHost::new();
        let mut manager = host.manager(&AppSettings::default());
        for _ in 0..extra {
            manager.create_tab(NewTab::scratch());
        }
        let active = manager.active_tab_id().expect("active tab");
        let others: Vec<TabId> = manager
            .get_all_tabs()
            .iter()
            .map(|tab| tab.id())
            .filter(|id| *id != active)
            .collect();

        manager.force_close_tab(others[close_seed % others.len()]);

        prop_assert_eq!(manager.active_tab_id(), Some(active));
    }

    /// Closing every tab leaves a single fresh scratch tab.
    #[test]
    fn closing_everything_leaves_one_scratch_tab(extra in 0usize..6) {
        let host = FakeHost::new();
        let mut manager = host.manager(&AppSettings::default());
        for _ in 0..extra {
            manager.create_tab(NewTab::of_kind("Terminal", ContentKind::Terminal));
        }
        let ids: Vec<TabId> = manager.get_all_tabs().iter().map(|tab| tab.id()).collect();
        for id in &ids {
            manager.force_close_tab(*id);
        }

        prop_assert_eq!(manager.count(), 1);
        let tab = manager.get_active_tab().expect("scratch tab");
        prop_assert!(!ids.contains(&tab.id()));
        prop_assert_eq!(tab.title(), DEFAULT_TAB_NAME);
        prop_assert!(!tab.is_modified());
        prop_assert_eq!(host.terminal_backend.stop_count(), extra);
    }

    /// Activating an unknown id changes nothing.
    #[test]
    fn unknown_activation_is_a_no_op(extra in 0usize..6, active_seed in 0usize..8) {
        let host = FakeHost::new();
        let mut manager = host.manager(&AppSettings::default());
        for _ in 0..extra {
            manager.create_tab(NewTab::scratch());
        }
        let ids: Vec<TabId> = manager.get_all_tabs().iter().map(|tab| tab.id()).collect();
        manager.set_active_tab(ids[active_seed % ids.len()]);
        let before = manager.active_tab_id();
        let activations = host.observer.activations().len();

        prop_assert!(manager.set_active_tab(TabId::new()).is_none());

        prop_assert_eq!(manager.active_tab_id(), before);
        prop_assert_eq!(host.observer.activations().len(), activations);
    }

    /// The tab limit is never exceeded and refused creations leave no trace.
    #[test]
    fn tab_limit_is_enforced(max_tabs in 1usize..6, attempts in 0usize..12) {
        let host = FakeHost::new();
        let mut settings = AppSettings::default();
        settings.tabs.max_tabs = max_tabs;
        let mut manager = host.manager(&settings);

        let created = (0..attempts)
            .filter(|_| manager.create_tab(NewTab::scratch()).is_some())
            .count();

        prop_assert_eq!(created, attempts.min(max_tabs - 1));
        prop_assert_eq!(manager.count(), 1 + created);
        prop_assert_eq!(host.strip.header_ids().len(), manager.count());
    }
}
