//! Property-based tests for split layout geometry

use proptest::prelude::*;

use codepad_core::host::{Point, Rect, Sizing};
use codepad_core::view::SplitLayout;
use codepad_core::view::split_layout::{DEFAULT_SPLIT_RATIO, MAX_SPLIT_RATIO, MIN_SPLIT_RATIO};
use codepad_core::Orientation;

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Vertical), Just(Orientation::Horizontal)]
}

fn percent(sizing: Sizing) -> f64 {
    match sizing {
        Sizing::Percent(value) => value,
        Sizing::Flexible => panic!("expected a fixed share"),
    }
}

proptest! {
    /// Every applied ratio lies within the allowed band.
    #[test]
    fn applied_ratio_is_clamped(raw in prop::num::f64::ANY) {
        let mut layout = SplitLayout::new(Orientation::Vertical);
        let applied = layout.set_ratio(raw);

        prop_assert!((MIN_SPLIT_RATIO..=MAX_SPLIT_RATIO).contains(&applied));
        prop_assert_eq!(layout.ratio(), Some(applied));
        if raw.is_nan() {
            prop_assert_eq!(applied, DEFAULT_SPLIT_RATIO);
        }
    }

    /// Pane shares always add up to the whole.
    #[test]
    fn pane_shares_sum_to_hundred(raw in -2.0f64..3.0, orientation in orientation_strategy()) {
        let mut layout = SplitLayout::new(orientation);
        layout.set_ratio(raw);
        let [first, second] = layout.pane_sizing();

        prop_assert!((percent(first) + percent(second) - 100.0).abs() < 1e-9);
    }

    /// Dragging inside the bounds tracks the pointer, outside is clamped.
    #[test]
    fn drag_follows_pointer_along_split_axis(
        left in 0.0f64..500.0,
        top in 0.0f64..500.0,
        width in 10.0f64..2000.0,
        height in 10.0f64..2000.0,
        along in -0.5f64..1.5,
        orientation in orientation_strategy(),
    ) {
        let bounds = Rect { left, top, width, height };
        let pointer = Point {
            x: left + along * width,
            y: top + along * height,
        };
        let mut layout = SplitLayout::new(orientation);

        let raw = layout.ratio_at(pointer, bounds);
        prop_assert!((raw - along).abs() < 1e-9);
        let applied = layout.set_ratio(raw);
        prop_assert!((applied - along.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)).abs() < 1e-9);
    }

    /// Toggling twice restores the orientation and leaves panes flexible.
    #[test]
    fn double_toggle_restores_orientation(orientation in orientation_strategy(), raw in 0.0f64..1.0) {
        let mut layout = SplitLayout::new(orientation);
        layout.set_ratio(raw);
        layout.toggle_orientation();
        layout.toggle_orientation();

        prop_assert_eq!(layout.orientation(), orientation);
        prop_assert_eq!(layout.pane_sizing(), [Sizing::Flexible, Sizing::Flexible]);
    }
}
