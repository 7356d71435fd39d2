//! Property-based tests for editor text bookkeeping

use proptest::prelude::*;

use codepad_core::ViewAdapter;
use codepad_core::host::TextWidget;
use codepad_core::testing::FakeHost;
use codepad_core::view::text::{Cursor, cursor_at, line_count, line_start};

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-z {}();\n]{0,60}"
}

proptest! {
    /// The start of every line maps back to column one of that line.
    #[test]
    fn line_start_maps_to_first_column(text in text_strategy(), seed in 0usize..16) {
        let line = 1 + seed % line_count(&text);
        prop_assert_eq!(cursor_at(&text, line_start(&text, line)), Cursor::new(line, 1));
    }

    /// Offsets past the end clamp to the last position.
    #[test]
    fn cursor_past_end_is_clamped(text in text_strategy(), extra in 0usize..10) {
        let len = text.chars().count();
        prop_assert_eq!(cursor_at(&text, len + extra), cursor_at(&text, len));
    }

    /// A change event that leaves the text as it was never marks the
    /// document modified.
    #[test]
    fn identical_text_is_not_a_change(text in text_strategy(), at in 0usize..80) {
        let host = FakeHost::new();
        let view = host.editor("a.js", &text);
        let widget = host.widgets.last().expect("widget created");
        let at = at.min(text.chars().count());

        widget.replace_range(at, at, "");
        let whole = widget.text();
        widget.replace_range(0, whole.chars().count(), &whole);

        prop_assert!(!view.is_modified());
        prop_assert_eq!(view.text(), text);
    }

    /// Any real edit marks the document modified and mirrors the widget.
    #[test]
    fn real_edit_is_tracked(text in text_strategy(), insert in "[a-z]{1,8}") {
        let host = FakeHost::new();
        let view = host.editor("a.js", &text);
        let widget = host.widgets.last().expect("widget created");

        widget.type_text(&insert);

        prop_assert!(view.is_modified());
        prop_assert_eq!(view.document().borrow().content.clone(), format!("{insert}{text}"));
    }
}
