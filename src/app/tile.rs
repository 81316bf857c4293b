use std::sync::mpsc;

use anyhow::Result;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
use objc2_foundation::MainThreadMarker;

use super::{check_permission, run_main_loop, Tick};
use crate::core::{
    dispatch_placement, parse_hotkey, Binding, BindingAction, BindingTable, PlacementCommand,
    PlacementEngine, ToggleSpec, Toggles, ENABLED,
};
use crate::macos::{KeyChord, KeyMonitor, MenuCommand, StatusMenu};
use crate::platform::{MacScreenQuery, MacWindowSystem};
use crate::prefs::JsonFileStore;

const DOMAIN: &str = "dev.tansu.tile";
const MENU_ICON: &[u8] = include_bytes!("../../assets/menu-icon.png");

const TOGGLES: [ToggleSpec; 1] = [ToggleSpec {
    key: ENABLED,
    default: true,
    label: "Enabled",
}];

const BINDINGS: [(&str, PlacementCommand, &str); 8] = [
    ("ctrl-cmd-1", PlacementCommand::TopLeft, "top-left quarter"),
    ("ctrl-cmd-2", PlacementCommand::TopRight, "top-right quarter"),
    (
        "ctrl-cmd-3",
        PlacementCommand::BottomLeft,
        "bottom-left quarter",
    ),
    (
        "ctrl-cmd-4",
        PlacementCommand::BottomRight,
        "bottom-right quarter",
    ),
    ("ctrl-cmd-left", PlacementCommand::LeftSide, "left side"),
    ("ctrl-cmd-right", PlacementCommand::RightSide, "right side"),
    ("ctrl-cmd-up", PlacementCommand::FullScreen, "full screen"),
    (
        "ctrl-cmd-down",
        PlacementCommand::ReasonableSize,
        "reasonable size",
    ),
];

fn binding_table() -> BindingTable {
    let mut table = BindingTable::new();
    for (trigger, command, description) in BINDINGS {
        match parse_hotkey(trigger) {
            Ok(trigger) => table.add(Binding {
                trigger,
                action: BindingAction::Place(command),
                description,
            }),
            Err(e) => tracing::error!("Invalid built-in binding {:?}: {}", trigger, e),
        }
    }
    table
}

/// The window tiler: hotkeys move the focused window into a grid of
/// screen fractions.
pub fn run_tile() -> Result<()> {
    let mtm = MainThreadMarker::new().expect("Must be called from main thread");
    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

    let mut toggles = Toggles::new(Box::new(JsonFileStore::open(DOMAIN)), &TOGGLES);
    let permitted = check_permission();

    let (menu_tx, menu_rx) = mpsc::channel::<MenuCommand>();
    let menu = StatusMenu::new(
        "\u{25E7}",
        MENU_ICON,
        permitted.then(|| toggles.specs().to_vec()).as_deref(),
        &toggles.snapshot(),
        menu_tx,
        mtm,
    );

    let table = binding_table();
    tracing::info!("Tiler registered {} bindings", table.len());
    let mut engine = PlacementEngine::new();

    let (chord_tx, chord_rx) = mpsc::channel::<KeyChord>();
    let _monitor = if permitted {
        match KeyMonitor::start(chord_tx) {
            Ok(monitor) => Some(monitor),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    } else {
        None
    };

    run_main_loop(move || {
        while let Ok(chord) = chord_rx.try_recv() {
            // Only ctrl+cmd chords belong to the tiler.
            if !(chord.modifiers.ctrl && chord.modifiers.cmd) {
                continue;
            }
            dispatch_placement(
                chord.key_code,
                &chord.modifiers,
                &toggles,
                &table,
                &mut engine,
                &MacWindowSystem,
                &MacScreenQuery,
            );
        }

        while let Ok(command) = menu_rx.try_recv() {
            match command {
                MenuCommand::Toggle(key) => {
                    let value = toggles.toggle(key);
                    menu.set_checked(key, value);
                }
                MenuCommand::Quit => return Tick::Quit,
            }
        }

        Tick::Continue
    });

    Ok(())
}
