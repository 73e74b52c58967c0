//! Console output routed to the host
//!
//! The bridge installs a printer that forwards to the host's `Msg`,
//! `Warning` and `ConColorMsg`. Until it does, output goes to the log.

use std::ffi::{c_char, c_int, CString};

use parking_lot::RwLock;

use cvar_unhide_core::{ConsoleOutput, MessageLevel, TracingConsole};

/// `Msg`
pub const CONSOLE_MSG: c_int = 0;
/// `Warning`
pub const CONSOLE_WARNING: c_int = 1;
/// `ConColorMsg`, color in the `rgba` argument
pub const CONSOLE_COLOR: c_int = 2;

/// Host printer: `(level, 0xRRGGBBAA, newline-terminated message)`
pub type ConsolePrintFn = unsafe extern "C" fn(level: c_int, rgba: u32, message: *const c_char);

static PRINTER: RwLock<Option<ConsolePrintFn>> = RwLock::new(None);

/// Install (or with null, remove) the host console printer
#[no_mangle]
pub extern "C" fn rust_set_console_printer(printer: Option<ConsolePrintFn>) {
    *PRINTER.write() = printer;
    tracing::debug!("Console printer {}", if printer.is_some() { "installed" } else { "removed" });
}

/// Console sink used by the exports
#[derive(Debug, Clone, Copy, Default)]
pub struct HostConsole;

impl ConsoleOutput for HostConsole {
    fn print(&mut self, level: MessageLevel, line: &str) {
        let Some(printer) = *PRINTER.read() else {
            TracingConsole.print(level, line);
            return;
        };

        let (code, rgba) = match level {
            MessageLevel::Msg => (CONSOLE_MSG, 0),
            MessageLevel::Warning => (CONSOLE_WARNING, 0),
            MessageLevel::Color(color) => (CONSOLE_COLOR, color.to_rgba()),
        };

        let message = CString::new(format!("{}\n", line.replace('\0', ""))).unwrap_or_default();
        unsafe { printer(code, rgba, message.as_ptr()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    use parking_lot::Mutex;

    use cvar_unhide_core::Color;

    static SEEN: Mutex<Vec<(c_int, u32, String)>> = Mutex::new(Vec::new());

    unsafe extern "C" fn recording_printer(level: c_int, rgba: u32, message: *const c_char) {
        let text = CStr::from_ptr(message).to_string_lossy().into_owned();
        SEEN.lock().push((level, rgba, text));
    }

    #[test]
    fn test_host_console_forwards() {
        rust_set_console_printer(Some(recording_printer));

        let mut console = HostConsole;
        console.warning("console-test warning");
        console.color_msg(Color::CYAN, "console-test cyan");

        let seen = SEEN.lock();
        assert!(seen.contains(&(CONSOLE_WARNING, 0, "console-test warning\n".to_string())));
        assert!(seen.contains(&(CONSOLE_COLOR, 0x00FFFFFF, "console-test cyan\n".to_string())));
    }
}
