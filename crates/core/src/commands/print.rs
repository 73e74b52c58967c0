//! Console output sink
//!
//! Command output goes through [`ConsoleOutput`] so the same command code can
//! write to the host console, to the log, or into a buffer.

/// RGBA color for colored console messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const YELLOW: Self = Self::new(255, 255, 0, 255);
    pub const CYAN: Self = Self::new(0, 255, 255, 255);
    pub const GREEN: Self = Self::new(0, 255, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xRRGGBBAA`
    pub const fn to_rgba(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

/// Console message channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Msg,
    Warning,
    Color(Color),
}

/// Destination for console lines
///
/// Lines are passed without a trailing newline.
pub trait ConsoleOutput {
    fn print(&mut self, level: MessageLevel, line: &str);

    fn msg(&mut self, line: &str) {
        self.print(MessageLevel::Msg, line);
    }

    fn warning(&mut self, line: &str) {
        self.print(MessageLevel::Warning, line);
    }

    fn color_msg(&mut self, color: Color, line: &str) {
        self.print(MessageLevel::Color(color), line);
    }
}

/// Writes console lines to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl ConsoleOutput for TracingConsole {
    fn print(&mut self, level: MessageLevel, line: &str) {
        match level {
            MessageLevel::Warning => tracing::warn!(target: "console", "{}", line),
            MessageLevel::Msg | MessageLevel::Color(_) => {
                tracing::info!(target: "console", "{}", line)
            }
        }
    }
}

/// Collects console lines in memory
#[derive(Debug, Clone, Default)]
pub struct BufferedConsole {
    lines: Vec<(MessageLevel, String)>,
}

impl BufferedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[(MessageLevel, String)] {
        &self.lines
    }

    /// Text of every line, regardless of level
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, line)| line.as_str()).collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(level, _)| *level == MessageLevel::Warning)
            .map(|(_, line)| line.as_str())
            .collect()
    }

    /// Check if any line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, line)| line.contains(needle))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl ConsoleOutput for BufferedConsole {
    fn print(&mut self, level: MessageLevel, line: &str) {
        self.lines.push((level, line.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        assert_eq!(Color::YELLOW.to_rgba(), 0xFFFF00FF);
        assert_eq!(Color::CYAN.to_rgba(), 0x00FFFFFF);
    }

    #[test]
    fn test_buffered_console_levels() {
        let mut out = BufferedConsole::new();
        out.msg("one");
        out.warning("two");
        out.color_msg(Color::GREEN, "three");

        assert_eq!(out.text(), ["one", "two", "three"]);
        assert_eq!(out.warnings(), ["two"]);
        assert_eq!(out.lines()[2].0, MessageLevel::Color(Color::GREEN));
        assert!(out.contains("thr"));

        out.clear();
        assert!(out.lines().is_empty());
    }
}
