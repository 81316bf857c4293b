mod keys;
mod scroll;
mod tile;

pub use keys::run_keys;
pub use scroll::run_scroll;
pub use tile::run_tile;

use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, Ordering};

use core_foundation::date::CFAbsoluteTimeGetCurrent;
use core_foundation::runloop::{
    kCFRunLoopDefaultMode, CFRunLoop, CFRunLoopTimer, CFRunLoopTimerContext, CFRunLoopTimerRef,
};
use nix::sys::signal::{self, SigHandler, Signal};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_shutdown_signal(_: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

fn install_signal_handlers() {
    let handler = SigHandler::Handler(handle_shutdown_signal);
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        if let Err(e) = unsafe { signal::signal(sig, handler) } {
            tracing::warn!("Failed to install {} handler: {}", sig, e);
        }
    }
}

/// Outcome of one timer tick: keep spinning or stop the run loop.
enum Tick {
    Continue,
    Quit,
}

/// Drive the process from a CFRunLoop. Event-tap and menu callbacks fire
/// inside this loop; `tick` drains their channels every 50ms so everything
/// runs serially on the main thread.
fn run_main_loop<F>(tick: F)
where
    F: FnMut() -> Tick + 'static,
{
    install_signal_handlers();

    let tick: Box<Box<dyn FnMut() -> Tick>> = Box::new(Box::new(tick));
    let mut timer_context = CFRunLoopTimerContext {
        version: 0,
        info: Box::into_raw(tick) as *mut _,
        retain: None,
        release: None,
        copyDescription: None,
    };

    extern "C" fn timer_callback(_timer: CFRunLoopTimerRef, info: *mut c_void) {
        let tick = unsafe { &mut *(info as *mut Box<dyn FnMut() -> Tick>) };
        let quit = matches!(tick(), Tick::Quit);
        if quit || SHUTDOWN.load(Ordering::SeqCst) {
            if !quit {
                tracing::info!("Shutdown signal received");
            }
            CFRunLoop::get_current().stop();
        }
    }

    let timer = unsafe {
        CFRunLoopTimer::new(
            CFAbsoluteTimeGetCurrent(),
            0.05, // 50ms interval
            0,
            0,
            timer_callback,
            &mut timer_context,
        )
    };

    let run_loop = CFRunLoop::get_current();
    run_loop.add_timer(&timer, unsafe { kCFRunLoopDefaultMode });

    tracing::info!("Entering CFRunLoop");
    CFRunLoop::run_current();
    tracing::info!("CFRunLoop exited");
}

/// Check the accessibility permission, prompting the system dialog on the
/// first failure. The utilities keep running without it, menu only.
fn check_permission() -> bool {
    if crate::macos::is_trusted() {
        return true;
    }
    tracing::warn!("Accessibility permission not granted, requesting...");
    crate::macos::is_trusted_with_prompt();
    false
}
