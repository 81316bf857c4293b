use crate::core::placement::PlacementCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub cmd: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Whether every modifier required here is held in `other`. Extra
    /// modifiers beyond the required set do not prevent a match.
    pub fn is_subset_of(&self, other: &Modifiers) -> bool {
        (!self.cmd || other.cmd)
            && (!self.alt || other.alt)
            && (!self.ctrl || other.ctrl)
            && (!self.shift || other.shift)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key_code: u16,
    pub modifiers: Modifiers,
}

pub fn parse_hotkey(key_str: &str) -> Result<Hotkey, String> {
    let parts: Vec<&str> = key_str.split('-').collect();
    if parts.is_empty() {
        return Err("Empty key string".to_string());
    }

    let mut modifiers = Modifiers::default();
    let key_part = parts.last().unwrap();

    for part in &parts[..parts.len() - 1] {
        match part.to_lowercase().as_str() {
            "cmd" | "super" | "command" => modifiers.cmd = true,
            "alt" | "opt" | "option" => modifiers.alt = true,
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            _ => return Err(format!("Unknown modifier: {}", part)),
        }
    }

    let key_code = parse_key_code(key_part)?;

    Ok(Hotkey {
        key_code,
        modifiers,
    })
}

pub fn format_hotkey(hotkey: &Hotkey) -> String {
    let mut parts = Vec::new();
    if hotkey.modifiers.cmd {
        parts.push("cmd");
    }
    if hotkey.modifiers.alt {
        parts.push("alt");
    }
    if hotkey.modifiers.ctrl {
        parts.push("ctrl");
    }
    if hotkey.modifiers.shift {
        parts.push("shift");
    }
    parts.push(key_code_to_str(hotkey.key_code));
    parts.join("-")
}

/// What firing a binding does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
    /// Run a window placement command.
    Place(PlacementCommand),
    /// Post a synthesized key-down and key-up carrying this chord.
    SynthesizeKey(Hotkey),
}

/// Immutable trigger/action pair, defined once at startup.
#[derive(Debug, Clone)]
pub struct Binding {
    pub trigger: Hotkey,
    pub action: BindingAction,
    pub description: &'static str,
}

/// Ordered dispatch table. Matching is first-match-wins in declaration
/// order: the trigger keycode must equal the event's keycode and the
/// trigger modifiers must be a subset of the event's active modifiers.
#[derive(Default)]
pub struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, binding: Binding) {
        if let Some(earlier) = self.find_shadowing(&binding.trigger) {
            tracing::warn!(
                "Binding {:?} ({}) is shadowed by earlier {:?} ({}) and can never fire",
                format_hotkey(&binding.trigger),
                binding.description,
                format_hotkey(&earlier.trigger),
                earlier.description,
            );
        }
        self.bindings.push(binding);
    }

    /// The earlier binding that would match every event this trigger
    /// matches, if one exists.
    pub fn find_shadowing(&self, trigger: &Hotkey) -> Option<&Binding> {
        self.bindings.iter().find(|b| {
            b.trigger.key_code == trigger.key_code
                && b.trigger.modifiers.is_subset_of(&trigger.modifiers)
        })
    }

    pub fn dispatch(&self, key_code: u16, modifiers: &Modifiers) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.trigger.key_code == key_code && b.trigger.modifiers.is_subset_of(modifiers))
    }

    /// Number of registered bindings, reported once at startup.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

fn parse_key_code(key: &str) -> Result<u16, String> {
    match key.to_lowercase().as_str() {
        // Letters
        "a" => Ok(0x00),
        "b" => Ok(0x0B),
        "c" => Ok(0x08),
        "d" => Ok(0x02),
        "e" => Ok(0x0E),
        "f" => Ok(0x03),
        "g" => Ok(0x05),
        "h" => Ok(0x04),
        "i" => Ok(0x22),
        "j" => Ok(0x26),
        "k" => Ok(0x28),
        "l" => Ok(0x25),
        "m" => Ok(0x2E),
        "n" => Ok(0x2D),
        "o" => Ok(0x1F),
        "p" => Ok(0x23),
        "q" => Ok(0x0C),
        "r" => Ok(0x0F),
        "s" => Ok(0x01),
        "t" => Ok(0x11),
        "u" => Ok(0x20),
        "v" => Ok(0x09),
        "w" => Ok(0x0D),
        "x" => Ok(0x07),
        "y" => Ok(0x10),
        "z" => Ok(0x06),
        // Numbers
        "1" => Ok(0x12),
        "2" => Ok(0x13),
        "3" => Ok(0x14),
        "4" => Ok(0x15),
        "5" => Ok(0x17),
        "6" => Ok(0x16),
        "7" => Ok(0x1A),
        "8" => Ok(0x1C),
        "9" => Ok(0x19),
        "0" => Ok(0x1D),
        // Special keys
        "return" | "enter" => Ok(0x24),
        "tab" => Ok(0x30),
        "space" => Ok(0x31),
        "delete" | "backspace" => Ok(0x33),
        "escape" | "esc" => Ok(0x35),
        "home" => Ok(0x73),
        "end" => Ok(0x77),
        "pageup" => Ok(0x74),
        "pagedown" => Ok(0x79),
        "left" => Ok(0x7B),
        "right" => Ok(0x7C),
        "down" => Ok(0x7D),
        "up" => Ok(0x7E),
        "f1" => Ok(0x7A),
        "f2" => Ok(0x78),
        "f3" => Ok(0x63),
        "f4" => Ok(0x76),
        "f5" => Ok(0x60),
        "f6" => Ok(0x61),
        "f7" => Ok(0x62),
        "f8" => Ok(0x64),
        "f9" => Ok(0x65),
        "f10" => Ok(0x6D),
        "f11" => Ok(0x67),
        "f12" => Ok(0x6F),
        _ => Err(format!("Unknown key: {}", key)),
    }
}

fn key_code_to_str(code: u16) -> &'static str {
    match code {
        0x00 => "a",
        0x0B => "b",
        0x08 => "c",
        0x02 => "d",
        0x0E => "e",
        0x03 => "f",
        0x05 => "g",
        0x04 => "h",
        0x22 => "i",
        0x26 => "j",
        0x28 => "k",
        0x25 => "l",
        0x2E => "m",
        0x2D => "n",
        0x1F => "o",
        0x23 => "p",
        0x0C => "q",
        0x0F => "r",
        0x01 => "s",
        0x11 => "t",
        0x20 => "u",
        0x09 => "v",
        0x0D => "w",
        0x07 => "x",
        0x10 => "y",
        0x06 => "z",
        0x12 => "1",
        0x13 => "2",
        0x14 => "3",
        0x15 => "4",
        0x17 => "5",
        0x16 => "6",
        0x1A => "7",
        0x1C => "8",
        0x19 => "9",
        0x1D => "0",
        0x24 => "return",
        0x30 => "tab",
        0x31 => "space",
        0x33 => "delete",
        0x35 => "escape",
        0x73 => "home",
        0x77 => "end",
        0x74 => "pageup",
        0x79 => "pagedown",
        0x7B => "left",
        0x7C => "right",
        0x7D => "down",
        0x7E => "up",
        0x7A => "f1",
        0x78 => "f2",
        0x63 => "f3",
        0x76 => "f4",
        0x60 => "f5",
        0x61 => "f6",
        0x62 => "f7",
        0x64 => "f8",
        0x65 => "f9",
        0x6D => "f10",
        0x67 => "f11",
        0x6F => "f12",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(cmd: bool, alt: bool, ctrl: bool, shift: bool) -> Modifiers {
        Modifiers {
            cmd,
            alt,
            ctrl,
            shift,
        }
    }

    fn place(trigger: &str, command: PlacementCommand, description: &'static str) -> Binding {
        Binding {
            trigger: parse_hotkey(trigger).unwrap(),
            action: BindingAction::Place(command),
            description,
        }
    }

    #[test]
    fn test_parse_with_modifiers() {
        let hotkey = parse_hotkey("ctrl-cmd-left").unwrap();
        assert_eq!(hotkey.key_code, 0x7B);
        assert!(hotkey.modifiers.ctrl);
        assert!(hotkey.modifiers.cmd);
        assert!(!hotkey.modifiers.alt);
        assert!(!hotkey.modifiers.shift);
    }

    #[test]
    fn test_parse_modifier_aliases_and_case() {
        assert!(parse_hotkey("super-a").unwrap().modifiers.cmd);
        assert!(parse_hotkey("Option-A").unwrap().modifiers.alt);
        assert!(parse_hotkey("CONTROL-home").unwrap().modifiers.ctrl);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_hotkey("meta-a").is_err());
        assert!(parse_hotkey("alt-unknownkey").is_err());
    }

    #[test]
    fn test_parse_format_roundtrip() {
        for input in ["a", "alt-1", "cmd-shift-a", "ctrl-cmd-up", "shift-home"] {
            let hotkey = parse_hotkey(input).unwrap();
            let reparsed = parse_hotkey(&format_hotkey(&hotkey)).unwrap();
            assert_eq!(hotkey, reparsed, "roundtrip failed for {}", input);
        }
    }

    #[test]
    fn test_subset_matching_allows_extra_modifiers() {
        let mut table = BindingTable::new();
        table.add(place("cmd-shift-l", PlacementCommand::LeftSide, "left"));

        // Incoming event holds {cmd, shift, ctrl}: a superset of the
        // required {cmd, shift}.
        let matched = table
            .dispatch(0x25, &mods(true, false, true, true))
            .expect("superset must match");
        assert_eq!(matched.description, "left");

        // Missing a required modifier does not match.
        assert!(table.dispatch(0x25, &mods(true, false, true, false)).is_none());
    }

    #[test]
    fn test_first_match_wins_in_declaration_order() {
        let mut table = BindingTable::new();
        table.add(place("cmd-shift-l", PlacementCommand::LeftSide, "first"));
        table.add(place("ctrl-l", PlacementCommand::RightSide, "second"));
        assert_eq!(table.len(), 2);

        // Both triggers share the keycode; the event satisfies both
        // modifier requirements. Only the first dispatches.
        let matched = table
            .dispatch(0x25, &mods(true, false, true, true))
            .expect("must match");
        assert_eq!(matched.description, "first");
    }

    #[test]
    fn test_no_match_on_different_keycode() {
        let mut table = BindingTable::new();
        table.add(place("cmd-l", PlacementCommand::LeftSide, "left"));
        assert!(table.dispatch(0x26, &mods(true, false, false, false)).is_none());
    }

    #[test]
    fn test_shadowing_detected_at_registration() {
        let mut table = BindingTable::new();
        table.add(place("cmd-l", PlacementCommand::LeftSide, "broad"));

        // cmd-shift-l can never fire: every event carrying {cmd, shift}
        // already matches the earlier cmd-l entry.
        let shadowed = parse_hotkey("cmd-shift-l").unwrap();
        assert_eq!(table.find_shadowing(&shadowed).unwrap().description, "broad");

        // The reverse direction is not shadowing.
        let narrower = parse_hotkey("l").unwrap();
        assert!(table.find_shadowing(&narrower).is_none());
    }
}
