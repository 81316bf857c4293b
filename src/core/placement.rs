use crate::core::bindings::{BindingAction, BindingTable, Modifiers};
use crate::core::geometry::{reasonable_size, PlacementRect, Rect};
use crate::core::locator::locate;
use crate::core::toggles::{Toggles, ENABLED};
use crate::platform::{ScreenQuery, WindowSystem};

/// Logical window placements the tiler can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementCommand {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    LeftSide,
    RightSide,
    FullScreen,
    ReasonableSize,
}

/// Gesture families that step through a layout sequence on repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleFamily {
    Left,
    Right,
    Full,
}

const LEFT_CYCLE: [PlacementRect; 3] = [
    PlacementRect::Fractional(Rect {
        x: 0.0,
        y: 0.0,
        width: 0.5,
        height: 1.0,
    }),
    PlacementRect::Fractional(Rect {
        x: 0.0,
        y: 0.0,
        width: 2.0 / 3.0,
        height: 1.0,
    }),
    PlacementRect::Fractional(Rect {
        x: 0.0,
        y: 0.0,
        width: 1.0 / 3.0,
        height: 1.0,
    }),
];

const RIGHT_CYCLE: [PlacementRect; 3] = [
    PlacementRect::Fractional(Rect {
        x: 0.5,
        y: 0.0,
        width: 0.5,
        height: 1.0,
    }),
    PlacementRect::Fractional(Rect {
        x: 1.0 / 3.0,
        y: 0.0,
        width: 2.0 / 3.0,
        height: 1.0,
    }),
    PlacementRect::Fractional(Rect {
        x: 2.0 / 3.0,
        y: 0.0,
        width: 1.0 / 3.0,
        height: 1.0,
    }),
];

const FULL_CYCLE: [PlacementRect; 2] = [
    PlacementRect::Fractional(Rect {
        x: 0.125,
        y: 0.0,
        width: 0.75,
        height: 1.0,
    }),
    PlacementRect::Fractional(Rect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    }),
];

/// One independent modulo counter per gesture family. Never persisted;
/// process restart is the only reset.
#[derive(Debug, Default)]
pub struct CycleState {
    left: usize,
    right: usize,
    full: usize,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current rect for the family and step its counter.
    /// Families never perturb each other.
    fn next(&mut self, family: CycleFamily) -> PlacementRect {
        match family {
            CycleFamily::Left => {
                let rect = LEFT_CYCLE[self.left];
                self.left = (self.left + 1) % LEFT_CYCLE.len();
                rect
            }
            CycleFamily::Right => {
                let rect = RIGHT_CYCLE[self.right];
                self.right = (self.right + 1) % RIGHT_CYCLE.len();
                rect
            }
            CycleFamily::Full => {
                let rect = FULL_CYCLE[self.full];
                self.full = (self.full + 1) % FULL_CYCLE.len();
                rect
            }
        }
    }
}

/// The geometry transform engine: maps a placement command plus the current
/// screen frame to an absolute frame and applies it to the focused window.
#[derive(Debug, Default)]
pub struct PlacementEngine {
    cycles: CycleState,
}

impl PlacementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a placement command. Failures (no focused window, no main
    /// screen) log and return false; the caller does not retry. The cycle
    /// counter for a gesture family steps only when the transform actually
    /// applies, so a failed invocation does not skip a layout.
    pub fn apply<S, C>(&mut self, command: PlacementCommand, sys: &S, screens: &C) -> bool
    where
        S: WindowSystem,
        C: ScreenQuery,
    {
        let Some(target) = locate(sys) else {
            tracing::warn!("No focused window found for {:?}", command);
            return false;
        };

        let Some(screen) = screens.main_screen_frame() else {
            tracing::warn!("No main screen available for {:?}", command);
            return false;
        };

        let rect = self.rect_for(command, screen);
        let frame = rect.resolve(screen);
        tracing::debug!(
            "Applying {:?}: ({}, {}) {}x{}",
            command,
            frame.x,
            frame.y,
            frame.width,
            frame.height
        );

        let moved = sys.set_position(&target.window, frame.x, frame.y);
        let sized = sys.set_size(&target.window, frame.width, frame.height);
        moved && sized
    }

    fn rect_for(&mut self, command: PlacementCommand, screen: Rect) -> PlacementRect {
        match command {
            PlacementCommand::TopLeft => PlacementRect::fractional(0.0, 0.0, 0.5, 0.5),
            PlacementCommand::TopRight => PlacementRect::fractional(0.5, 0.0, 0.5, 0.5),
            PlacementCommand::BottomLeft => PlacementRect::fractional(0.0, 0.5, 0.5, 0.5),
            PlacementCommand::BottomRight => PlacementRect::fractional(0.5, 0.5, 0.5, 0.5),
            PlacementCommand::LeftSide => self.cycles.next(CycleFamily::Left),
            PlacementCommand::RightSide => self.cycles.next(CycleFamily::Right),
            PlacementCommand::FullScreen => self.cycles.next(CycleFamily::Full),
            PlacementCommand::ReasonableSize => reasonable_size(screen),
        }
    }
}

/// Route one observed key chord through the binding table and apply the
/// matched placement. The global enabled toggle is checked first; while it
/// is off, no binding is evaluated at all.
pub fn dispatch_placement<S, C>(
    key_code: u16,
    modifiers: &Modifiers,
    toggles: &Toggles,
    table: &BindingTable,
    engine: &mut PlacementEngine,
    sys: &S,
    screens: &C,
) -> bool
where
    S: WindowSystem,
    C: ScreenQuery,
{
    if !toggles.get(ENABLED) {
        return false;
    }
    let Some(binding) = table.dispatch(key_code, modifiers) else {
        tracing::debug!("Unbound chord, keycode {}", key_code);
        return false;
    };
    let BindingAction::Place(command) = binding.action else {
        return false;
    };
    tracing::info!("Placing focused window: {}", binding.description);
    engine.apply(command, sys, screens)
}
