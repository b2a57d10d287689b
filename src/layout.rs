// SPDX-License-Identifier: GPL-3.0-only

//! Orientation-adaptive layout
//!
//! The viewfinder and the control strip share the screen along a divider at
//! 85% of the long edge. Which edge that is depends only on the current
//! display orientation; the whole configuration is recomputed from scratch on
//! every orientation change, so applying the same orientation twice is a
//! no-op.

/// Fractional position of the divider between viewfinder and controls,
/// measured from the leading edge.
pub const DIVIDER_POSITION: f32 = 0.85;

/// Coarse portrait/landscape classification of the visible window.
///
/// Distinct from the raw physical device heading reported by the
/// accelerometer; this only tracks the width/height relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayOrientation {
    /// Height >= width (initial state before the first resize event)
    #[default]
    Portrait,
    /// Width > height
    Landscape,
}

impl DisplayOrientation {
    /// Classify a window size.
    pub fn from_size(width: f32, height: f32) -> Self {
        if width > height {
            DisplayOrientation::Landscape
        } else {
            DisplayOrientation::Portrait
        }
    }
}

/// Stacking direction of a UI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which screen edge the control strip is pinned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Below the divider, through to the bottom edge (portrait)
    Bottom,
    /// Right of the divider, through to the trailing edge (landscape)
    Trailing,
}

/// Divider element: a line splitting viewfinder from controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    pub axis: Axis,
    /// Fraction of the relevant dimension, measured from the leading edge
    pub position: f32,
}

/// Control strip: the capture/gallery/settings button group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStrip {
    /// Direction the buttons stack in
    pub axis: Axis,
    pub anchor: Anchor,
    /// Whether the strip spans the full cross dimension (it is always
    /// content-sized along the divider normal)
    pub spans_cross_axis: bool,
}

/// Complete structural layout for one orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub divider: Divider,
    pub controls: ControlStrip,
}

/// Compute the layout for the given orientation.
///
/// Pure and stateless: the result depends on nothing but the argument.
pub fn arrange(orientation: DisplayOrientation) -> LayoutConfig {
    match orientation {
        DisplayOrientation::Landscape => LayoutConfig {
            divider: Divider {
                axis: Axis::Vertical,
                position: DIVIDER_POSITION,
            },
            controls: ControlStrip {
                axis: Axis::Vertical,
                anchor: Anchor::Trailing,
                spans_cross_axis: true,
            },
        },
        DisplayOrientation::Portrait => LayoutConfig {
            divider: Divider {
                axis: Axis::Horizontal,
                position: DIVIDER_POSITION,
            },
            controls: ControlStrip {
                axis: Axis::Horizontal,
                anchor: Anchor::Bottom,
                spans_cross_axis: true,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_size() {
        assert_eq!(
            DisplayOrientation::from_size(1920.0, 1080.0),
            DisplayOrientation::Landscape
        );
        assert_eq!(
            DisplayOrientation::from_size(1080.0, 1920.0),
            DisplayOrientation::Portrait
        );
        // Square windows stay portrait, matching the initial state
        assert_eq!(
            DisplayOrientation::from_size(800.0, 800.0),
            DisplayOrientation::Portrait
        );
    }

    #[test]
    fn test_arrange_is_idempotent() {
        for orientation in [DisplayOrientation::Portrait, DisplayOrientation::Landscape] {
            assert_eq!(arrange(orientation), arrange(orientation));
        }
    }

    #[test]
    fn test_orientations_produce_distinct_layouts() {
        assert_ne!(
            arrange(DisplayOrientation::Portrait),
            arrange(DisplayOrientation::Landscape)
        );
    }

    #[test]
    fn test_portrait_layout() {
        let layout = arrange(DisplayOrientation::Portrait);
        assert_eq!(layout.divider.axis, Axis::Horizontal);
        assert_eq!(layout.divider.position, DIVIDER_POSITION);
        assert_eq!(layout.controls.axis, Axis::Horizontal);
        assert_eq!(layout.controls.anchor, Anchor::Bottom);
        assert!(layout.controls.spans_cross_axis);
    }

    #[test]
    fn test_landscape_layout() {
        let layout = arrange(DisplayOrientation::Landscape);
        assert_eq!(layout.divider.axis, Axis::Vertical);
        assert_eq!(layout.divider.position, DIVIDER_POSITION);
        assert_eq!(layout.controls.axis, Axis::Vertical);
        assert_eq!(layout.controls.anchor, Anchor::Trailing);
    }
}
