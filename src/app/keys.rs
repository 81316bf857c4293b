use std::sync::mpsc;

use anyhow::Result;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
use objc2_foundation::MainThreadMarker;

use super::{check_permission, run_main_loop, Tick};
use crate::core::{
    parse_hotkey, Binding, BindingAction, BindingTable, ToggleSpec, Toggles, ENABLED,
};
use crate::macos::{post_key_chord, KeyChord, KeyMonitor, MenuCommand, StatusMenu};
use crate::prefs::JsonFileStore;

const DOMAIN: &str = "dev.tansu.keys";
const MENU_ICON: &[u8] = include_bytes!("../../assets/menu-icon.png");

const TOGGLES: [ToggleSpec; 1] = [ToggleSpec {
    key: ENABLED,
    default: true,
    label: "Enabled",
}];

// PC-style navigation keys mapped to their macOS line-motion equivalents.
const REMAPS: [(&str, &str, &str); 4] = [
    ("home", "cmd-left", "home to line start"),
    ("end", "cmd-right", "end to line end"),
    ("shift-home", "cmd-shift-left", "select to line start"),
    ("shift-end", "cmd-shift-right", "select to line end"),
];

fn binding_table() -> BindingTable {
    let mut table = BindingTable::new();
    for (trigger, replacement, description) in REMAPS {
        match (parse_hotkey(trigger), parse_hotkey(replacement)) {
            (Ok(trigger), Ok(replacement)) => table.add(Binding {
                trigger,
                action: BindingAction::SynthesizeKey(replacement),
                description,
            }),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Invalid built-in remap {:?}: {}", trigger, e)
            }
        }
    }
    table
}

/// The key remapper: observes navigation chords and posts their
/// replacements.
pub fn run_keys() -> Result<()> {
    let mtm = MainThreadMarker::new().expect("Must be called from main thread");
    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

    let mut toggles = Toggles::new(Box::new(JsonFileStore::open(DOMAIN)), &TOGGLES);
    let permitted = check_permission();

    let (menu_tx, menu_rx) = mpsc::channel::<MenuCommand>();
    let menu = StatusMenu::new(
        "\u{2328}",
        MENU_ICON,
        permitted.then(|| toggles.specs().to_vec()).as_deref(),
        &toggles.snapshot(),
        menu_tx,
        mtm,
    );

    let table = binding_table();
    tracing::info!("Remapper registered {} bindings", table.len());

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
            if !toggles.get(ENABLED) {
                continue;
            }
            let Some(binding) = table.dispatch(chord.key_code, &chord.modifiers) else {
                continue;
            };
            if let BindingAction::SynthesizeKey(replacement) = binding.action {
                tracing::debug!("Remapping: {}", binding.description);
                post_key_chord(replacement);
            }
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
