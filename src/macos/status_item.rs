use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::mpsc;

use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{define_class, msg_send, sel, AnyThread, DefinedClass};
use objc2_app_kit::{
    NSControlStateValueOff, NSControlStateValueOn, NSImage, NSMenu, NSMenuItem, NSStatusBar,
    NSStatusItem, NSVariableStatusItemLength,
};
use objc2_foundation::{MainThreadMarker, NSData, NSObject, NSObjectProtocol, NSSize, NSString};

use crate::core::ToggleSpec;

/// What the operator did in the status menu, handled serially by the main
/// loop alongside event callbacks.
#[derive(Debug, Clone, Copy)]
pub enum MenuCommand {
    Toggle(&'static str),
    Quit,
}

struct Ivars {
    command_tx: RefCell<Option<mpsc::Sender<MenuCommand>>>,
    keys: RefCell<Vec<&'static str>>,
}

define_class!(
    #[unsafe(super(NSObject))]
    #[ivars = Ivars]
    struct MenuTarget;

    unsafe impl NSObjectProtocol for MenuTarget {}

    impl MenuTarget {
        #[unsafe(method(toggleClicked:))]
        fn toggle_clicked(&self, sender: &NSMenuItem) {
            let index = sender.tag() as usize;
            let key = self.ivars().keys.borrow().get(index).copied();
            let Some(key) = key else {
                tracing::warn!("Menu item with unknown tag {}", index);
                return;
            };
            let tx = self.ivars().command_tx.borrow();
            if let Some(sender) = tx.as_ref() {
                let _: Result<(), _> = sender.send(MenuCommand::Toggle(key));
            }
        }

        #[unsafe(method(quitClicked:))]
        fn quit_clicked(&self, _sender: &NSMenuItem) {
            let tx = self.ivars().command_tx.borrow();
            if let Some(sender) = tx.as_ref() {
                let _: Result<(), _> = sender.send(MenuCommand::Quit);
            }
        }
    }
);

impl MenuTarget {
    fn new(
        command_tx: mpsc::Sender<MenuCommand>,
        keys: Vec<&'static str>,
        mtm: MainThreadMarker,
    ) -> Retained<Self> {
        let this = mtm.alloc::<Self>();
        let this = this.set_ivars(Ivars {
            command_tx: RefCell::new(Some(command_tx)),
            keys: RefCell::new(keys),
        });
        unsafe { msg_send![super(this), init] }
    }
}

/// The status-bar presence of one utility: icon, per-toggle menu items
/// mirroring the toggle state, and a quit entry. When the accessibility
/// permission is missing, a disabled warning item replaces the toggles.
pub struct StatusMenu {
    status_item: Retained<NSStatusItem>,
    _target: Retained<MenuTarget>,
    toggle_items: HashMap<&'static str, Retained<NSMenuItem>>,
}

impl StatusMenu {
    /// Build the status item. `specs` carries the menu order; `states` the
    /// initial checkmarks. A `None` for `specs` means the permission
    /// precondition failed and the menu degrades to warning + quit.
    pub fn new(
        title_fallback: &str,
        icon_png: &[u8],
        specs: Option<&[ToggleSpec]>,
        states: &[(&'static str, bool)],
        command_tx: mpsc::Sender<MenuCommand>,
        mtm: MainThreadMarker,
    ) -> Self {
        let status_bar = NSStatusBar::systemStatusBar();
        let status_item = status_bar.statusItemWithLength(NSVariableStatusItemLength);

        if let Some(button) = status_item.button(mtm) {
            match decode_icon(icon_png) {
                Some(image) => button.setImage(Some(&image)),
                None => {
                    // The emoji label always works; there is no further
                    // fallback below this one.
                    tracing::warn!("Menu icon failed to decode, using text label");
                    button.setTitle(&NSString::from_str(title_fallback));
                }
            }
        } else {
            tracing::warn!("Could not get button from status item");
        }

        let keys: Vec<&'static str> = specs
            .map(|s| s.iter().map(|spec| spec.key).collect())
            .unwrap_or_default();
        let target = MenuTarget::new(command_tx, keys, mtm);
        let target_obj: &AnyObject =
            unsafe { std::mem::transmute::<&MenuTarget, &AnyObject>(&*target) };

        let menu = NSMenu::new(mtm);
        menu.setAutoenablesItems(false);

        let mut toggle_items = HashMap::new();

        match specs {
            Some(specs) => {
                for (index, spec) in specs.iter().enumerate() {
                    let item = unsafe {
                        NSMenuItem::initWithTitle_action_keyEquivalent(
                            mtm.alloc(),
                            &NSString::from_str(spec.label),
                            Some(sel!(toggleClicked:)),
                            &NSString::from_str(""),
                        )
                    };
                    unsafe { item.setTarget(Some(target_obj)) };
                    item.setTag(index as isize);
                    let on = states
                        .iter()
                        .find(|(key, _)| *key == spec.key)
                        .map(|(_, on)| *on)
                        .unwrap_or(spec.default);
                    item.setState(if on {
                        NSControlStateValueOn
                    } else {
                        NSControlStateValueOff
                    });
                    menu.addItem(&item);
                    toggle_items.insert(spec.key, item);
                }
            }
            None => {
                let warning = unsafe {
                    NSMenuItem::initWithTitle_action_keyEquivalent(
                        mtm.alloc(),
                        &NSString::from_str("Accessibility permission required"),
                        None,
                        &NSString::from_str(""),
                    )
                };
                warning.setEnabled(false);
                menu.addItem(&warning);
            }
        }

        menu.addItem(&NSMenuItem::separatorItem(mtm));

        let quit = unsafe {
            NSMenuItem::initWithTitle_action_keyEquivalent(
                mtm.alloc(),
                &NSString::from_str("Quit"),
                Some(sel!(quitClicked:)),
                &NSString::from_str("q"),
            )
        };
        unsafe { quit.setTarget(Some(target_obj)) };
        menu.addItem(&quit);

        status_item.setMenu(Some(&menu));
        status_item.setVisible(true);

        Self {
            status_item,
            _target: target,
            toggle_items,
        }
    }

    /// Mirror a toggle's new value in its menu checkmark.
    pub fn set_checked(&self, key: &str, on: bool) {
        match self.toggle_items.get(key) {
            Some(item) => item.setState(if on {
                NSControlStateValueOn
            } else {
                NSControlStateValueOff
            }),
            None => tracing::warn!("No menu item for toggle {:?}", key),
        }
    }
}

impl Drop for StatusMenu {
    fn drop(&mut self) {
        tracing::debug!("Removing status item");
        let status_bar = NSStatusBar::systemStatusBar();
        status_bar.removeStatusItem(&self.status_item);
    }
}

fn decode_icon(png: &[u8]) -> Option<Retained<NSImage>> {
    let data = NSData::with_bytes(png);
    let image = unsafe { NSImage::initWithData(NSImage::alloc(), &data) }?;
    unsafe { image.setSize(NSSize::new(18.0, 18.0)) };
    image.setTemplate(true);
    Some(image)
}
