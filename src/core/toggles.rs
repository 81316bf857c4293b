use crate::platform::PreferenceStore;

pub const ENABLED: &str = "enabled";
pub const MOUSE_VERTICAL: &str = "mouse.vertical";
pub const MOUSE_HORIZONTAL: &str = "mouse.horizontal";
pub const TRACKPAD_VERTICAL: &str = "trackpad.vertical";
pub const TRACKPAD_HORIZONTAL: &str = "trackpad.horizontal";

/// A toggle key with its registered default and the label shown in the
/// status menu.
#[derive(Debug, Clone, Copy)]
pub struct ToggleSpec {
    pub key: &'static str,
    pub default: bool,
    pub label: &'static str,
}

/// Named boolean settings backed by the preference store. `toggle` is the
/// only mutation path; defaults are registered once so an absent key reads
/// as a known value instead of forcing null handling at every read site.
pub struct Toggles {
    store: Box<dyn PreferenceStore>,
    specs: Vec<ToggleSpec>,
}

impl Toggles {
    pub fn new(store: Box<dyn PreferenceStore>, specs: &[ToggleSpec]) -> Self {
        Self {
            store,
            specs: specs.to_vec(),
        }
    }

    /// Current value: the persisted one, or the registered default when the
    /// key has never been set. Reading an unregistered key is a programming
    /// error and reads false.
    pub fn get(&self, key: &str) -> bool {
        let Some(spec) = self.specs.iter().find(|s| s.key == key) else {
            tracing::warn!("Read of unregistered toggle {:?}", key);
            return false;
        };
        self.store.get_bool(key).unwrap_or(spec.default)
    }

    /// Flip a toggle, persist it immediately, and report the new value so
    /// the menu indicator can mirror it.
    pub fn toggle(&mut self, key: &str) -> bool {
        let value = !self.get(key);
        self.store.set_bool(key, value);

        // Operator-visible snapshot of all settings, a debugging aid.
        for (k, v) in self.snapshot() {
            tracing::info!("  {} = {}", k, v);
        }

        value
    }

    pub fn specs(&self) -> &[ToggleSpec] {
        &self.specs
    }

    pub fn snapshot(&self) -> Vec<(&'static str, bool)> {
        self.specs.iter().map(|s| (s.key, self.get(s.key))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MemoryStore;

    fn scroll_toggles() -> Toggles {
        Toggles::new(
            Box::new(MemoryStore::default()),
            &[
                ToggleSpec {
                    key: ENABLED,
                    default: true,
                    label: "Enabled",
                },
                ToggleSpec {
                    key: MOUSE_VERTICAL,
                    default: false,
                    label: "Reverse mouse vertical",
                },
            ],
        )
    }

    #[test]
    fn test_absent_key_reads_registered_default() {
        let toggles = scroll_toggles();
        assert!(toggles.get(ENABLED));
        assert!(!toggles.get(MOUSE_VERTICAL));
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let mut toggles = scroll_toggles();
        let before = toggles.get(MOUSE_VERTICAL);
        assert_eq!(toggles.toggle(MOUSE_VERTICAL), !before);
        assert_eq!(toggles.toggle(MOUSE_VERTICAL), before);
        assert_eq!(toggles.get(MOUSE_VERTICAL), before);
    }

    #[test]
    fn test_toggle_persists_immediately() {
        let mut store = MemoryStore::default();
        store.set_bool(ENABLED, true);
        let mut toggles = Toggles::new(
            Box::new(store),
            &[ToggleSpec {
                key: ENABLED,
                default: true,
                label: "Enabled",
            }],
        );

        assert!(!toggles.toggle(ENABLED));
        assert_eq!(toggles.store.get_bool(ENABLED), Some(false));
    }

    #[test]
    fn test_persisted_value_overrides_default() {
        let mut store = MemoryStore::default();
        store.set_bool(ENABLED, false);
        let toggles = Toggles::new(
            Box::new(store),
            &[ToggleSpec {
                key: ENABLED,
                default: true,
                label: "Enabled",
            }],
        );
        assert!(!toggles.get(ENABLED));
    }

    #[test]
    fn test_unregistered_key_reads_false() {
        let toggles = scroll_toggles();
        assert!(!toggles.get("no.such.key"));
    }

    #[test]
    fn test_snapshot_lists_all_registered_keys() {
        let mut toggles = scroll_toggles();
        toggles.toggle(MOUSE_VERTICAL);
        assert_eq!(
            toggles.snapshot(),
            vec![(ENABLED, true), (MOUSE_VERTICAL, true)]
        );
    }
}
