use crate::platform::WindowSystem;

/// The window a placement command will act on, with its owning application.
pub struct Located<W> {
    pub app: W,
    pub window: W,
}

/// Resolution strategies, tried in order. Kept explicit so the fallback
/// policy is visible and testable instead of buried in conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// System-wide focused application, then its focused window.
    FocusedApplication,
    /// Front-most layer-0 entry of the on-screen window list, then the
    /// first accessibility window of its owning application.
    FrontmostOnScreen,
}

const STRATEGIES: [Strategy; 2] = [Strategy::FocusedApplication, Strategy::FrontmostOnScreen];

impl Strategy {
    fn resolve<S: WindowSystem>(self, sys: &S) -> Option<Located<S::Window>> {
        match self {
            Strategy::FocusedApplication => {
                let app = sys.focused_application()?;
                let window = sys.focused_window(&app)?;
                if !sys.is_window(&window) {
                    tracing::debug!("Focused element does not report the window role");
                    return None;
                }
                Some(Located { app, window })
            }
            Strategy::FrontmostOnScreen => {
                let front = sys.on_screen_windows().into_iter().find(|w| w.layer == 0)?;
                tracing::debug!(
                    "Falling back to front-most on-screen window (pid={}, owner={})",
                    front.pid,
                    front.owner_name
                );
                let app = sys.application(front.pid);
                let window = sys.windows_of(&app).into_iter().next()?;
                Some(Located { app, window })
            }
        }
    }
}

/// Resolve the currently focused window. Resolution happens fresh on every
/// call; the result must never be cached, since the window can close or
/// lose focus between resolution and use.
pub fn locate<S: WindowSystem>(sys: &S) -> Option<Located<S::Window>> {
    STRATEGIES.iter().find_map(|s| s.resolve(sys))
}
