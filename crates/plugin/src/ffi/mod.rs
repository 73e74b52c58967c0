//! C ABI surface
//!
//! - [`exports`]: host lifecycle (load, unload, level and client hooks)
//! - [`registration`]: registry mirroring, command dispatch, server classes
//! - [`console`]: console printer installed by the bridge

pub mod console;
pub mod exports;
pub mod registration;

use std::borrow::Cow;
use std::ffi::{c_char, CStr};

/// Borrow a C string, treating null as empty
///
/// Bytes that are not UTF-8 (Latin-1 console input, for one) become
/// U+FFFD instead of dropping the whole string.
///
/// # Safety
/// `ptr` must be null or a valid null-terminated string that outlives the
/// returned reference.
pub(crate) unsafe fn cstr<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        return Cow::Borrowed("");
    }
    CStr::from_ptr(ptr).to_string_lossy()
}

/// Copy a message into a C buffer, truncating to fit
///
/// # Safety
/// - `buffer` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
pub(crate) unsafe fn write_cstr(buffer: *mut c_char, maxlen: usize, msg: &str) {
    if !buffer.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, len);
        *buffer.add(len) = 0;
    }
}
