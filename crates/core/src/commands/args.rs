//! Command line tokenization
//!
//! Splits a console line the way the host's command parser does:
//! - whitespace separates tokens
//! - `"..."` forms one token (quotes stripped, unterminated quote runs to the end)
//! - each of `{ } ( ) ' :` is a token on its own
//! - `//` starts a comment that runs to the end of the line

/// Maximum number of tokens in a single command
pub const COMMAND_MAX_ARGC: usize = 64;

/// Maximum length of a single command line
pub const COMMAND_MAX_LENGTH: usize = 512;

const BREAK_CHARS: &[u8] = b"{}()':";

fn is_space(b: u8) -> bool {
    b <= b' '
}

fn is_break(b: u8) -> bool {
    BREAK_CHARS.contains(&b)
}

/// Tokenized console command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    /// Tokens (index 0 is the command name)
    args: Vec<String>,

    /// The full line as given
    raw: String,

    /// Byte offset in `raw` where the arguments after the command name start
    args_start: usize,
}

impl CommandArgs {
    /// Tokenize a command line
    ///
    /// Lines of [`COMMAND_MAX_LENGTH`] bytes or more, and lines with more
    /// than [`COMMAND_MAX_ARGC`] tokens, produce an empty command.
    pub fn tokenize(line: &str) -> Self {
        if line.len() >= COMMAND_MAX_LENGTH {
            tracing::warn!("Tokenize: command overflows the tokenizer buffer, skipping");
            return Self::default();
        }

        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut args = Vec::new();
        let mut args_start = 0;
        let mut pos = 0;

        loop {
            while pos < len && is_space(bytes[pos]) {
                pos += 1;
            }
            if pos >= len || bytes[pos..].starts_with(b"//") {
                break;
            }

            let token = if bytes[pos] == b'"' {
                let start = pos + 1;
                let end = bytes[start..]
                    .iter()
                    .position(|&b| b == b'"')
                    .map_or(len, |offset| start + offset);
                pos = (end + 1).min(len);
                &line[start..end]
            } else if is_break(bytes[pos]) {
                pos += 1;
                &line[pos - 1..pos]
            } else {
                let start = pos;
                while pos < len && !is_space(bytes[pos]) && !is_break(bytes[pos]) {
                    pos += 1;
                }
                &line[start..pos]
            };

            if args.len() >= COMMAND_MAX_ARGC {
                tracing::warn!("Tokenize: command overflows the argument buffer, skipping");
                return Self::default();
            }

            args.push(token.to_string());
            if args.len() == 1 {
                args_start = pos;
            }
        }

        while args_start < len && is_space(bytes[args_start]) {
            args_start += 1;
        }

        Self {
            args,
            raw: line.to_string(),
            args_start,
        }
    }

    /// Get the number of arguments (including command name at index 0)
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Check if nothing was tokenized
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get argument by index (0 = command name)
    ///
    /// Returns empty string if index is out of bounds.
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    /// Get the command name (alias for arg(0))
    pub fn command_name(&self) -> &str {
        self.arg(0)
    }

    /// Get all arguments as a slice
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Everything after the command name, verbatim (quotes and comments included)
    pub fn arg_s(&self) -> &str {
        self.raw.get(self.args_start..).unwrap_or("")
    }

    /// Get the full raw command string
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Check if any argument after the command name equals `name`, ignoring case
    pub fn find_arg(&self, name: &str) -> bool {
        self.args
            .iter()
            .skip(1)
            .any(|arg| arg.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split() {
        let args = CommandArgs::tokenize("cvar_set  sv_cheats   1");
        assert_eq!(args.arg_count(), 3);
        assert_eq!(args.command_name(), "cvar_set");
        assert_eq!(args.arg(1), "sv_cheats");
        assert_eq!(args.arg(2), "1");
        assert_eq!(args.arg(3), "");
        assert_eq!(args.arg_s(), "sv_cheats   1");
    }

    #[test]
    fn test_quotes() {
        let args = CommandArgs::tokenize(r#"say "hello world" x"#);
        assert_eq!(args.args(), ["say", "hello world", "x"]);
        assert_eq!(args.arg_s(), r#""hello world" x"#);
    }

    #[test]
    fn test_unterminated_quote() {
        let args = CommandArgs::tokenize(r#"echo "abc def"#);
        assert_eq!(args.args(), ["echo", "abc def"]);
    }

    #[test]
    fn test_break_chars() {
        let args = CommandArgs::tokenize("bind a:b{c}");
        assert_eq!(args.args(), ["bind", "a", ":", "b", "{", "c", "}"]);
    }

    #[test]
    fn test_comment() {
        let args = CommandArgs::tokenize("echo a // b c");
        assert_eq!(args.args(), ["echo", "a"]);
        assert_eq!(CommandArgs::tokenize("// nothing").arg_count(), 0);
    }

    #[test]
    fn test_command_only() {
        let args = CommandArgs::tokenize("  cvar_unhide_all  ");
        assert_eq!(args.args(), ["cvar_unhide_all"]);
        assert_eq!(args.arg_s(), "");
    }

    #[test]
    fn test_empty() {
        let args = CommandArgs::tokenize("");
        assert!(args.is_empty());
        assert_eq!(args.command_name(), "");
    }

    #[test]
    fn test_too_long_is_rejected() {
        let line = format!("echo {}", "a".repeat(COMMAND_MAX_LENGTH));
        assert!(CommandArgs::tokenize(&line).is_empty());
    }

    #[test]
    fn test_too_many_args_is_rejected() {
        let line = format!("echo{}", " a".repeat(COMMAND_MAX_ARGC));
        assert!(CommandArgs::tokenize(&line).is_empty());

        let line = format!("echo{}", " a".repeat(COMMAND_MAX_ARGC - 1));
        assert_eq!(CommandArgs::tokenize(&line).arg_count(), COMMAND_MAX_ARGC);
    }

    #[test]
    fn test_find_arg_ignores_case_and_name() {
        let args = CommandArgs::tokenize("cvarlist_all HIDDEN");
        assert!(args.find_arg("hidden"));
        assert!(!args.find_arg("cvarlist_all"));
    }
}
