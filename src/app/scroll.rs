use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use anyhow::Result;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
use objc2_foundation::MainThreadMarker;

use super::{check_permission, run_main_loop, Tick};
use crate::core::{
    ScrollSettings, ToggleSpec, Toggles, ENABLED, MOUSE_HORIZONTAL, MOUSE_VERTICAL,
    TRACKPAD_HORIZONTAL, TRACKPAD_VERTICAL,
};
use crate::macos::{MenuCommand, ScrollTap, StatusMenu};
use crate::prefs::JsonFileStore;

const DOMAIN: &str = "dev.tansu.scroll";
const MENU_ICON: &[u8] = include_bytes!("../../assets/menu-icon.png");

const TOGGLES: [ToggleSpec; 5] = [
    ToggleSpec {
        key: ENABLED,
        default: true,
        label: "Enabled",
    },
    ToggleSpec {
        key: MOUSE_VERTICAL,
        default: true,
        label: "Reverse mouse vertical",
    },
    ToggleSpec {
        key: MOUSE_HORIZONTAL,
        default: false,
        label: "Reverse mouse horizontal",
    },
    ToggleSpec {
        key: TRACKPAD_VERTICAL,
        default: false,
        label: "Reverse trackpad vertical",
    },
    ToggleSpec {
        key: TRACKPAD_HORIZONTAL,
        default: false,
        label: "Reverse trackpad horizontal",
    },
];

/// The scroll reverser: rewrites scroll-wheel deltas in flight, per axis
/// and per device class.
pub fn run_scroll() -> Result<()> {
    let mtm = MainThreadMarker::new().expect("Must be called from main thread");
    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

    let toggles = Rc::new(RefCell::new(Toggles::new(
        Box::new(JsonFileStore::open(DOMAIN)),
        &TOGGLES,
    )));
    let permitted = check_permission();

    let (menu_tx, menu_rx) = mpsc::channel::<MenuCommand>();
    let menu = StatusMenu::new(
        "\u{2195}",
        MENU_ICON,
        permitted
            .then(|| toggles.borrow().specs().to_vec())
            .as_deref(),
        &toggles.borrow().snapshot(),
        menu_tx,
        mtm,
    );

    // The tap callback fires inside the same run loop the timer drives, so
    // the RefCell is never borrowed from two places at once.
    let _tap = if permitted {
        let tap_toggles = Rc::clone(&toggles);
        match ScrollTap::start(move || ScrollSettings::from_toggles(&tap_toggles.borrow())) {
            Ok(tap) => Some(tap),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    } else {
        None
    };

    run_main_loop(move || {
        while let Ok(command) = menu_rx.try_recv() {
            match command {
                MenuCommand::Toggle(key) => {
                    let value = toggles.borrow_mut().toggle(key);
                    menu.set_checked(key, value);
                }
                MenuCommand::Quit => return Tick::Quit,
            }
        }

        Tick::Continue
    });

    Ok(())
}
