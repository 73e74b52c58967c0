//! Raw ConVar value storage
//!
//! A ConVar keeps one logical value in three parallel forms: an integer, a
//! float and a NUL-terminated string whose backing block is tracked
//! separately from the string's length. The string block only ever grows.

use std::fmt;

/// NUL-terminated string storage with an explicit capacity
///
/// The capacity is the size of the backing block, terminator included.
/// Writing a value that does not fit releases the old block and allocates a
/// new one of exactly `len + 1` bytes; shorter values are written in place
/// and leave whatever followed the new terminator untouched.
#[derive(Default)]
pub struct RawString {
    buf: Option<Box<[u8]>>,
}

impl RawString {
    /// Allocate storage holding `value`
    pub fn new(value: &str) -> Self {
        let mut raw = Self::default();
        raw.assign(value);
        raw
    }

    /// Size of the backing block in bytes (0 when nothing is allocated)
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, |buf| buf.len())
    }

    /// Whether a backing block exists
    pub fn is_allocated(&self) -> bool {
        self.buf.is_some()
    }

    /// Length of the stored string, excluding the terminator
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the stored string is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes up to (not including) the first terminator
    pub fn as_bytes(&self) -> &[u8] {
        let Some(buf) = self.buf.as_deref() else {
            return &[];
        };
        let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
        &buf[..end]
    }

    /// The stored string
    pub fn as_str(&self) -> &str {
        // Contents always come from a &str and are cut at an ASCII NUL,
        // so they stay valid UTF-8.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Overwrite the stored string
    ///
    /// Returns `true` if the backing block had to be reallocated.
    pub fn assign(&mut self, value: &str) -> bool {
        let needed = value.len() + 1;
        let grow = needed > self.capacity();

        if grow {
            // Old block goes first, then the new one is adopted
            drop(self.buf.take());
            self.buf = Some(vec![0u8; needed].into_boxed_slice());
        }

        if let Some(buf) = self.buf.as_deref_mut() {
            buf[..value.len()].copy_from_slice(value.as_bytes());
            buf[value.len()] = 0;
        }

        grow
    }
}

impl fmt::Debug for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawString")
            .field("value", &self.as_str())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// The three parallel representations of a ConVar value
#[derive(Debug, Default)]
pub struct CvarValue {
    int_value: i32,
    float_value: f32,
    string: RawString,
}

impl CvarValue {
    /// Build a value from its string form, deriving the numeric forms
    pub fn new(value: &str) -> Self {
        Self {
            int_value: parse_int(value),
            float_value: parse_float(value),
            string: RawString::new(value),
        }
    }

    /// Integer representation
    pub fn int_value(&self) -> i32 {
        self.int_value
    }

    /// Floating-point representation
    pub fn float_value(&self) -> f32 {
        self.float_value
    }

    /// String representation
    pub fn string_value(&self) -> &str {
        self.string.as_str()
    }

    /// Raw string storage (for capacity inspection)
    pub fn raw_string(&self) -> &RawString {
        &self.string
    }

    /// Overwrite all three representations from a literal
    ///
    /// No clamping, no change detection. Returns `true` if the string block
    /// was reallocated.
    pub fn overwrite(&mut self, value: &str) -> bool {
        self.int_value = parse_int(value);
        self.float_value = parse_float(value);
        self.string.assign(value)
    }

    /// Store an already-validated float together with its string form
    pub(crate) fn store(&mut self, float_value: f32, string: &str) {
        self.float_value = float_value;
        self.int_value = float_value as i32;
        self.string.assign(string);
    }
}

/// Whitespace as the host's C runtime sees it
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Base-10 integer parse of the longest valid prefix
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. No digits yields 0. Out-of-range values saturate.
pub fn parse_int(s: &str) -> i32 {
    let bytes = s.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(&b) = bytes.get(pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = (value * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
        pos += 1;
    }

    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Floating-point parse of the longest valid prefix
///
/// Accepts leading whitespace, a sign, digits with an optional fraction and
/// an optional exponent, as well as `inf`/`infinity`/`nan`. No digits yields 0.0.
pub fn parse_float(s: &str) -> f32 {
    let trimmed = s.trim_start_matches(|c: char| c.is_ascii() && is_space(c as u8));
    let bytes = trimmed.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let rest = &bytes[pos..];
    for word in ["infinity", "inf", "nan"] {
        if rest.len() >= word.len() && rest[..word.len()].eq_ignore_ascii_case(word.as_bytes()) {
            return trimmed[..pos + word.len()].parse::<f64>().unwrap_or(0.0) as f32;
        }
    }

    let mut digits = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
        digits += 1;
    }
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if bytes.get(exp).is_some_and(|b| b.is_ascii_digit()) {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            pos = exp;
        }
    }

    trimmed[..pos].parse::<f64>().unwrap_or(0.0) as f32
}
