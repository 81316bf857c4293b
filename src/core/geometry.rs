/// Frame geometry in global screen coordinates (points, origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A placement rectangle, either proportional to the screen or already in
/// absolute coordinates. Fractional rects are resolved against the screen
/// frame at apply time, never at definition time, so a layout defined once
/// stays correct across resolution changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementRect {
    /// All four fields in `[0, 1]`, relative to the main screen frame.
    Fractional(Rect),
    /// Used verbatim.
    Absolute(Rect),
}

impl PlacementRect {
    pub fn fractional(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Fractional(Rect::new(x, y, width, height))
    }

    /// Resolve to an absolute frame against the given screen frame.
    pub fn resolve(&self, screen: Rect) -> Rect {
        match *self {
            Self::Fractional(f) => Rect {
                x: screen.x + f.x * screen.width,
                y: screen.y + f.y * screen.height,
                width: f.width * screen.width,
                height: f.height * screen.height,
            },
            Self::Absolute(r) => r,
        }
    }
}

const REASONABLE_ASPECT: f64 = 1024.0 / 768.0;
const REASONABLE_MIN_WIDTH: f64 = 1024.0;
const REASONABLE_MIN_HEIGHT: f64 = 768.0;
const REASONABLE_SCREEN_SHARE: f64 = 0.6;

/// A centered 4:3 frame sized to 60% of the screen on the binding
/// dimension, never smaller than 1024x768.
pub fn reasonable_size(screen: Rect) -> PlacementRect {
    // The binding dimension is whichever screen axis the aspect-held
    // rect hits first.
    let (mut width, mut height) = if screen.width / screen.height > REASONABLE_ASPECT {
        let h = screen.height * REASONABLE_SCREEN_SHARE;
        (h * REASONABLE_ASPECT, h)
    } else {
        let w = screen.width * REASONABLE_SCREEN_SHARE;
        (w, w / REASONABLE_ASPECT)
    };

    if width < REASONABLE_MIN_WIDTH || height < REASONABLE_MIN_HEIGHT {
        width = REASONABLE_MIN_WIDTH;
        height = REASONABLE_MIN_HEIGHT;
    }

    PlacementRect::Absolute(Rect {
        x: screen.x + (screen.width - width) / 2.0,
        y: screen.y + (screen.height - height) / 2.0,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_quarter_on_1080p() {
        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let frame = PlacementRect::fractional(0.0, 0.0, 0.5, 0.5).resolve(screen);
        assert_eq!(frame, Rect::new(0.0, 0.0, 960.0, 540.0));
    }

    #[test]
    fn test_fractional_respects_screen_origin() {
        let screen = Rect::new(100.0, 50.0, 1000.0, 800.0);
        let frame = PlacementRect::fractional(0.5, 0.25, 0.5, 0.75).resolve(screen);
        assert_eq!(frame.x, 100.0 + 0.5 * 1000.0);
        assert_eq!(frame.y, 50.0 + 0.25 * 800.0);
        assert_eq!(frame.width, 500.0);
        assert_eq!(frame.height, 600.0);
    }

    #[test]
    fn test_absolute_is_verbatim() {
        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let rect = Rect::new(10.0, 20.0, 300.0, 400.0);
        assert_eq!(PlacementRect::Absolute(rect).resolve(screen), rect);
    }

    #[test]
    fn test_reasonable_size_bounds() {
        let screens = [
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Rect::new(0.0, 0.0, 1280.0, 800.0),
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            Rect::new(0.0, 0.0, 2560.0, 1440.0),
            Rect::new(0.0, 0.0, 7680.0, 4320.0),
        ];

        for screen in screens {
            let PlacementRect::Absolute(frame) = reasonable_size(screen) else {
                panic!("reasonable_size must be absolute");
            };
            assert!(frame.width >= 1024.0, "width {} on {:?}", frame.width, screen);
            assert!(frame.height >= 768.0, "height {} on {:?}", frame.height, screen);
            let aspect = frame.width / frame.height;
            assert!(
                (aspect - 1024.0 / 768.0).abs() < 1e-9,
                "aspect {} on {:?}",
                aspect,
                screen
            );
        }
    }

    #[test]
    fn test_reasonable_size_centered() {
        let screen = Rect::new(0.0, 0.0, 2560.0, 1440.0);
        let PlacementRect::Absolute(frame) = reasonable_size(screen) else {
            panic!("reasonable_size must be absolute");
        };
        assert!((frame.x - (2560.0 - frame.width) / 2.0).abs() < 1e-9);
        assert!((frame.y - (1440.0 - frame.height) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_reasonable_size_uses_height_on_wide_screens() {
        // Ultrawide: height binds, width follows the aspect ratio.
        let screen = Rect::new(0.0, 0.0, 5120.0, 1440.0);
        let PlacementRect::Absolute(frame) = reasonable_size(screen) else {
            panic!("reasonable_size must be absolute");
        };
        assert!((frame.height - 1440.0 * 0.6).abs() < 1e-9);
    }
}
