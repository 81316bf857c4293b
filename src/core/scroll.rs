use crate::core::toggles::{self, Toggles};

/// The delta payload of one scroll-wheel event: every representation the
/// event carries (line, point, fixed-point, each per axis) plus the
/// continuity flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDeltas {
    pub line_vertical: i64,
    pub line_horizontal: i64,
    pub point_vertical: i64,
    pub point_horizontal: i64,
    pub fixed_vertical: f64,
    pub fixed_horizontal: f64,
    /// Trackpads report continuous scroll phases; mice report discrete
    /// wheel clicks. This single flag is a reliable device discriminator.
    pub continuous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDevice {
    Mouse,
    Trackpad,
}

impl ScrollDeltas {
    pub fn device(&self) -> ScrollDevice {
        if self.continuous {
            ScrollDevice::Trackpad
        } else {
            ScrollDevice::Mouse
        }
    }
}

/// Snapshot of the scroll toggles, read once per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollSettings {
    pub enabled: bool,
    pub mouse_vertical: bool,
    pub mouse_horizontal: bool,
    pub trackpad_vertical: bool,
    pub trackpad_horizontal: bool,
}

impl ScrollSettings {
    pub fn from_toggles(t: &Toggles) -> Self {
        Self {
            enabled: t.get(toggles::ENABLED),
            mouse_vertical: t.get(toggles::MOUSE_VERTICAL),
            mouse_horizontal: t.get(toggles::MOUSE_HORIZONTAL),
            trackpad_vertical: t.get(toggles::TRACKPAD_VERTICAL),
            trackpad_horizontal: t.get(toggles::TRACKPAD_HORIZONTAL),
        }
    }
}

/// Rewrite a scroll event according to the settings. Takes the event by
/// value and returns it together with the propagate flag; the transform
/// only ever rewrites, it never drops, so propagate is always true.
pub fn transform(settings: &ScrollSettings, mut event: ScrollDeltas) -> (ScrollDeltas, bool) {
    if !settings.enabled {
        return (event, true);
    }

    let (reverse_vertical, reverse_horizontal) = match event.device() {
        ScrollDevice::Mouse => (settings.mouse_vertical, settings.mouse_horizontal),
        ScrollDevice::Trackpad => (settings.trackpad_vertical, settings.trackpad_horizontal),
    };

    if reverse_vertical {
        event.line_vertical = -event.line_vertical;
        event.point_vertical = -event.point_vertical;
        event.fixed_vertical = -event.fixed_vertical;
    }
    if reverse_horizontal {
        event.line_horizontal = -event.line_horizontal;
        event.point_horizontal = -event.point_horizontal;
        event.fixed_horizontal = -event.fixed_horizontal;
    }

    (event, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse_event(vertical: i64, horizontal: i64) -> ScrollDeltas {
        ScrollDeltas {
            line_vertical: vertical,
            line_horizontal: horizontal,
            point_vertical: vertical * 10,
            point_horizontal: horizontal * 10,
            fixed_vertical: vertical as f64,
            fixed_horizontal: horizontal as f64,
            continuous: false,
        }
    }

    #[test]
    fn test_mouse_vertical_reversal() {
        let settings = ScrollSettings {
            enabled: true,
            mouse_vertical: true,
            ..Default::default()
        };

        let (out, propagate) = transform(&settings, mouse_event(5, 3));
        assert!(propagate);
        assert_eq!(out.line_vertical, -5);
        assert_eq!(out.point_vertical, -50);
        assert_eq!(out.fixed_vertical, -5.0);
        // Horizontal untouched.
        assert_eq!(out.line_horizontal, 3);
        assert_eq!(out.point_horizontal, 30);
        assert_eq!(out.fixed_horizontal, 3.0);
    }

    #[test]
    fn test_disabled_passes_through_unchanged() {
        let settings = ScrollSettings {
            enabled: false,
            mouse_vertical: true,
            mouse_horizontal: true,
            trackpad_vertical: true,
            trackpad_horizontal: true,
        };

        let input = mouse_event(5, 3);
        let (out, propagate) = transform(&settings, input);
        assert!(propagate);
        assert_eq!(out, input);
    }

    #[test]
    fn test_trackpad_flags_only_affect_continuous_events() {
        let settings = ScrollSettings {
            enabled: true,
            trackpad_vertical: true,
            ..Default::default()
        };

        // Discrete event classifies as mouse; trackpad flag is irrelevant.
        let (out, _) = transform(&settings, mouse_event(5, 0));
        assert_eq!(out.line_vertical, 5);

        let mut pad = mouse_event(5, 0);
        pad.continuous = true;
        let (out, propagate) = transform(&settings, pad);
        assert!(propagate);
        assert_eq!(out.line_vertical, -5);
    }

    #[test]
    fn test_both_axes_reversed_independently() {
        let settings = ScrollSettings {
            enabled: true,
            mouse_vertical: true,
            mouse_horizontal: true,
            ..Default::default()
        };

        let (out, _) = transform(&settings, mouse_event(-2, 7));
        assert_eq!(out.line_vertical, 2);
        assert_eq!(out.line_horizontal, -7);
        assert_eq!(out.fixed_horizontal, -7.0);
    }

    #[test]
    fn test_device_classification() {
        assert_eq!(mouse_event(1, 0).device(), ScrollDevice::Mouse);
        let mut pad = mouse_event(1, 0);
        pad.continuous = true;
        assert_eq!(pad.device(), ScrollDevice::Trackpad);
    }
}
