use crate::core::Rect;

/// One entry from the z-ordered on-screen window list, front-most first.
#[derive(Debug, Clone)]
pub struct WindowListEntry {
    pub window_id: u32,
    pub pid: i32,
    pub owner_name: String,
    pub layer: i32,
}

/// Trait for querying and mutating windows through the system.
/// This abstraction allows mocking in tests.
pub trait WindowSystem {
    /// Opaque handle to an accessibility element (application or window).
    type Window;

    fn focused_application(&self) -> Option<Self::Window>;
    fn focused_window(&self, app: &Self::Window) -> Option<Self::Window>;
    /// Whether the element reports the window accessibility role.
    fn is_window(&self, element: &Self::Window) -> bool;
    fn on_screen_windows(&self) -> Vec<WindowListEntry>;
    fn application(&self, pid: i32) -> Self::Window;
    fn windows_of(&self, app: &Self::Window) -> Vec<Self::Window>;

    // Position and size are two independent mutations; a reader observing
    // mid-update may see an inconsistent frame.
    fn set_position(&self, window: &Self::Window, x: f64, y: f64) -> bool;
    fn set_size(&self, window: &Self::Window, width: f64, height: f64) -> bool;
}

/// Trait for querying screen geometry, always at call time.
pub trait ScreenQuery {
    fn main_screen_frame(&self) -> Option<Rect>;
}

/// Keyed boolean settings that survive process restarts.
pub trait PreferenceStore {
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&mut self, key: &str, value: bool);
}

/// macOS implementation of `WindowSystem`.
#[cfg(target_os = "macos")]
pub struct MacWindowSystem;

#[cfg(target_os = "macos")]
impl WindowSystem for MacWindowSystem {
    type Window = crate::macos::AxElement;

    fn focused_application(&self) -> Option<Self::Window> {
        crate::macos::AxElement::system_wide().focused_application().ok()
    }

    fn focused_window(&self, app: &Self::Window) -> Option<Self::Window> {
        app.focused_window().ok()
    }

    fn is_window(&self, element: &Self::Window) -> bool {
        element.role().map(|r| r == "AXWindow").unwrap_or(false)
    }

    fn on_screen_windows(&self) -> Vec<WindowListEntry> {
        crate::macos::on_screen_windows()
    }

    fn application(&self, pid: i32) -> Self::Window {
        crate::macos::AxElement::application(pid)
    }

    fn windows_of(&self, app: &Self::Window) -> Vec<Self::Window> {
        app.windows().unwrap_or_default()
    }

    fn set_position(&self, window: &Self::Window, x: f64, y: f64) -> bool {
        match window.set_position(x, y) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to set window position to ({}, {}): {}", x, y, e);
                false
            }
        }
    }

    fn set_size(&self, window: &Self::Window, width: f64, height: f64) -> bool {
        match window.set_size(width, height) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to set window size to {}x{}: {}", width, height, e);
                false
            }
        }
    }
}

/// macOS implementation of `ScreenQuery`.
#[cfg(target_os = "macos")]
pub struct MacScreenQuery;

#[cfg(target_os = "macos")]
impl ScreenQuery for MacScreenQuery {
    fn main_screen_frame(&self) -> Option<Rect> {
        crate::macos::main_screen_frame()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// What a mock window system saw the engine do, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum FrameCall {
        Position { window: u32, x: f64, y: f64 },
        Size { window: u32, width: f64, height: f64 },
    }

    #[derive(Default)]
    pub struct MockWindowSystem {
        pub focused_app: Option<u32>,
        /// Focused window per application handle.
        pub focused_windows: HashMap<u32, u32>,
        /// Elements that report the window role.
        pub window_roles: Vec<u32>,
        pub on_screen: Vec<WindowListEntry>,
        /// pid -> application handle.
        pub apps_by_pid: HashMap<i32, u32>,
        /// application handle -> its windows.
        pub app_windows: HashMap<u32, Vec<u32>>,
        pub calls: RefCell<Vec<FrameCall>>,
    }

    impl MockWindowSystem {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_focused(mut self, app: u32, window: u32) -> Self {
            self.focused_app = Some(app);
            self.focused_windows.insert(app, window);
            self.window_roles.push(window);
            self
        }

        pub fn with_on_screen(mut self, entries: Vec<WindowListEntry>) -> Self {
            self.on_screen = entries;
            self
        }

        pub fn with_app(mut self, pid: i32, app: u32, windows: Vec<u32>) -> Self {
            self.apps_by_pid.insert(pid, app);
            self.app_windows.insert(app, windows);
            self
        }
    }

    impl WindowSystem for MockWindowSystem {
        type Window = u32;

        fn focused_application(&self) -> Option<u32> {
            self.focused_app
        }

        fn focused_window(&self, app: &u32) -> Option<u32> {
            self.focused_windows.get(app).copied()
        }

        fn is_window(&self, element: &u32) -> bool {
            self.window_roles.contains(element)
        }

        fn on_screen_windows(&self) -> Vec<WindowListEntry> {
            self.on_screen.clone()
        }

        fn application(&self, pid: i32) -> u32 {
            self.apps_by_pid.get(&pid).copied().unwrap_or(0)
        }

        fn windows_of(&self, app: &u32) -> Vec<u32> {
            self.app_windows.get(app).cloned().unwrap_or_default()
        }

        fn set_position(&self, window: &u32, x: f64, y: f64) -> bool {
            self.calls.borrow_mut().push(FrameCall::Position {
                window: *window,
                x,
                y,
            });
            true
        }

        fn set_size(&self, window: &u32, width: f64, height: f64) -> bool {
            self.calls.borrow_mut().push(FrameCall::Size {
                window: *window,
                width,
                height,
            });
            true
        }
    }

    pub struct MockScreens {
        pub frame: Option<Rect>,
    }

    impl ScreenQuery for MockScreens {
        fn main_screen_frame(&self) -> Option<Rect> {
            self.frame
        }
    }

    #[derive(Default)]
    pub struct MemoryStore {
        pub values: HashMap<String, bool>,
    }

    impl PreferenceStore for MemoryStore {
        fn get_bool(&self, key: &str) -> Option<bool> {
            self.values.get(key).copied()
        }

        fn set_bool(&mut self, key: &str, value: bool) {
            self.values.insert(key.to_string(), value);
        }
    }

    pub fn entry(window_id: u32, pid: i32, owner_name: &str, layer: i32) -> WindowListEntry {
        WindowListEntry {
            window_id,
            pid,
            owner_name: owner_name.to_string(),
            layer,
        }
    }
}
