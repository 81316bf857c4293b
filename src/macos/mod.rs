mod accessibility;
mod display;
mod event_tap;
mod status_item;

pub use accessibility::{is_trusted, is_trusted_with_prompt, AxElement};
pub use display::{main_screen_frame, on_screen_windows};
pub use event_tap::{modifiers_from_flags, post_key_chord, KeyChord, KeyMonitor, ScrollTap};
pub use status_item::{MenuCommand, StatusMenu};
