use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use core_foundation::base::TCFType;
use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop, CFRunLoopSource};
use core_foundation_sys::mach_port::CFMachPortRef;
use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventType, CallbackResult, EventField,
};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

use crate::core::{transform, Hotkey, Modifiers, ScrollDeltas, ScrollSettings};

extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

/// One observed key-down: the physical keycode plus the active modifiers.
#[derive(Debug, Clone, Copy)]
pub struct KeyChord {
    pub key_code: u16,
    pub modifiers: Modifiers,
}

pub fn modifiers_from_flags(flags: CGEventFlags) -> Modifiers {
    Modifiers {
        cmd: flags.contains(CGEventFlags::CGEventFlagCommand),
        alt: flags.contains(CGEventFlags::CGEventFlagAlternate),
        ctrl: flags.contains(CGEventFlags::CGEventFlagControl),
        shift: flags.contains(CGEventFlags::CGEventFlagShift),
    }
}

fn flags_from_modifiers(modifiers: Modifiers) -> CGEventFlags {
    let mut flags = CGEventFlags::empty();
    if modifiers.cmd {
        flags |= CGEventFlags::CGEventFlagCommand;
    }
    if modifiers.alt {
        flags |= CGEventFlags::CGEventFlagAlternate;
    }
    if modifiers.ctrl {
        flags |= CGEventFlags::CGEventFlagControl;
    }
    if modifiers.shift {
        flags |= CGEventFlags::CGEventFlagShift;
    }
    flags
}

struct TapHandle {
    _tap: CGEventTap<'static>,
    _source: CFRunLoopSource,
}

/// Passive, observe-only hook for key-down events. Cannot mutate or
/// suppress anything it sees; chords are forwarded to the main loop over
/// the channel. Distinct on purpose from `ScrollTap`, which intercepts.
pub struct KeyMonitor {
    _handle: TapHandle,
}

impl KeyMonitor {
    pub fn start(chord_tx: mpsc::Sender<KeyChord>) -> Result<Self, String> {
        let mach_port_ptr: Arc<AtomicPtr<c_void>> = Arc::new(AtomicPtr::new(ptr::null_mut()));
        let mach_port_for_callback = Arc::clone(&mach_port_ptr);

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            vec![CGEventType::KeyDown],
            move |_proxy, event_type, event| {
                if reenable_if_disabled(event_type, &mach_port_for_callback, "key monitor") {
                    return CallbackResult::Keep;
                }

                let key_code =
                    event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE) as u16;
                let modifiers = modifiers_from_flags(event.get_flags());

                if chord_tx
                    .send(KeyChord {
                        key_code,
                        modifiers,
                    })
                    .is_err()
                {
                    tracing::error!("Failed to forward key chord to main loop");
                }

                CallbackResult::Keep
            },
        )
        .map_err(|_| {
            "Failed to create key monitor. Make sure Accessibility permission is granted."
        })?;

        mach_port_ptr.store(
            tap.mach_port().as_concrete_TypeRef() as *mut c_void,
            Ordering::Release,
        );

        Ok(Self {
            _handle: install(tap, "Key monitor")?,
        })
    }
}

/// Intercepting hook for scroll-wheel events: rewrites delta fields in
/// flight before the event reaches other applications. Never drops an
/// event, only rewrites it.
pub struct ScrollTap {
    _handle: TapHandle,
}

impl ScrollTap {
    pub fn start<F>(settings: F) -> Result<Self, String>
    where
        F: Fn() -> ScrollSettings + 'static,
    {
        let mach_port_ptr: Arc<AtomicPtr<c_void>> = Arc::new(AtomicPtr::new(ptr::null_mut()));
        let mach_port_for_callback = Arc::clone(&mach_port_ptr);

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::Default,
            vec![CGEventType::ScrollWheel],
            move |_proxy, event_type, event| {
                if reenable_if_disabled(event_type, &mach_port_for_callback, "scroll tap") {
                    return CallbackResult::Keep;
                }

                let deltas = read_scroll_deltas(event);
                let (rewritten, propagate) = transform(&settings(), deltas);
                if rewritten != deltas {
                    write_scroll_deltas(event, &rewritten);
                }

                if propagate {
                    CallbackResult::Keep
                } else {
                    CallbackResult::Drop
                }
            },
        )
        .map_err(|_| {
            "Failed to create scroll tap. Make sure Accessibility permission is granted."
        })?;

        mach_port_ptr.store(
            tap.mach_port().as_concrete_TypeRef() as *mut c_void,
            Ordering::Release,
        );

        Ok(Self {
            _handle: install(tap, "Scroll tap")?,
        })
    }
}

fn install(tap: CGEventTap<'static>, name: &str) -> Result<TapHandle, String> {
    tap.enable();

    let source = tap
        .mach_port()
        .create_runloop_source(0)
        .map_err(|_| format!("Failed to create run loop source for {}", name))?;

    CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });
    tracing::info!("{} started", name);

    Ok(TapHandle {
        _tap: tap,
        _source: source,
    })
}

/// The system disables a tap that stalls or sees synthetic user input;
/// turn it back on and keep going.
fn reenable_if_disabled(
    event_type: CGEventType,
    mach_port: &Arc<AtomicPtr<c_void>>,
    name: &str,
) -> bool {
    match event_type {
        CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
            tracing::warn!("{} disabled by the system, re-enabling...", name);
            let ptr = mach_port.load(Ordering::Acquire);
            if !ptr.is_null() {
                unsafe {
                    CGEventTapEnable(ptr as CFMachPortRef, true);
                }
            }
            true
        }
        _ => false,
    }
}

fn read_scroll_deltas(event: &CGEvent) -> ScrollDeltas {
    ScrollDeltas {
        line_vertical: event.get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_1),
        line_horizontal: event.get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_2),
        point_vertical: event
            .get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_1),
        point_horizontal: event
            .get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_2),
        fixed_vertical: event
            .get_double_value_field(EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_1),
        fixed_horizontal: event
            .get_double_value_field(EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_2),
        continuous: event.get_integer_value_field(EventField::SCROLL_WHEEL_EVENT_IS_CONTINUOUS)
            != 0,
    }
}

fn write_scroll_deltas(event: &CGEvent, deltas: &ScrollDeltas) {
    event.set_integer_value_field(
        EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_1,
        deltas.line_vertical,
    );
    event.set_integer_value_field(
        EventField::SCROLL_WHEEL_EVENT_DELTA_AXIS_2,
        deltas.line_horizontal,
    );
    event.set_integer_value_field(
        EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_1,
        deltas.point_vertical,
    );
    event.set_integer_value_field(
        EventField::SCROLL_WHEEL_EVENT_POINT_DELTA_AXIS_2,
        deltas.point_horizontal,
    );
    event.set_double_value_field(
        EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_1,
        deltas.fixed_vertical,
    );
    event.set_double_value_field(
        EventField::SCROLL_WHEEL_EVENT_FIXED_PT_DELTA_AXIS_2,
        deltas.fixed_horizontal,
    );
}

/// Post a synthesized key-down and key-up carrying the chord's keycode and
/// modifier set.
pub fn post_key_chord(chord: Hotkey) {
    let Ok(source) = CGEventSource::new(CGEventSourceStateID::HIDSystemState) else {
        tracing::warn!("Failed to create event source for key synthesis");
        return;
    };
    let flags = flags_from_modifiers(chord.modifiers);

    for key_down in [true, false] {
        match CGEvent::new_keyboard_event(source.clone(), chord.key_code, key_down) {
            Ok(event) => {
                event.set_flags(flags);
                event.post(CGEventTapLocation::HID);
            }
            Err(()) => {
                tracing::warn!(
                    "Failed to synthesize key event (keycode {})",
                    chord.key_code
                );
            }
        }
    }
}
