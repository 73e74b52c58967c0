//! Process command line and the `-insecure` launch safeguard

use std::fmt;

use crate::commands::{Color, ConsoleOutput};

/// Launch option required before the plugin will load
pub const INSECURE_PARM: &str = "-insecure";

/// Launch option appended so the operator sees the console on next start
pub const CONSOLE_PARM: &str = "-console";

const RULE: &str = "========================================================================";

/// The game's launch options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    parms: Vec<String>,
}

impl CommandLine {
    /// Split a launch line into parameters (double quotes group)
    pub fn parse(line: &str) -> Self {
        let mut parms = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut has_token = false;

        for c in line.chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    has_token = true;
                }
                c if c.is_whitespace() && !in_quotes => {
                    if has_token {
                        parms.push(std::mem::take(&mut current));
                        has_token = false;
                    }
                }
                c => {
                    current.push(c);
                    has_token = true;
                }
            }
        }
        if has_token {
            parms.push(current);
        }

        Self { parms }
    }

    pub fn parms(&self) -> &[String] {
        &self.parms
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.parms.iter().position(|p| p.eq_ignore_ascii_case(name))
    }

    /// Check if a parameter is present, ignoring case
    pub fn find_parm(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Value following a parameter, if it has one
    ///
    /// Another switch (`-x` or `+x`) directly after `name` means no value.
    pub fn parm_value(&self, name: &str) -> Option<&str> {
        let value = self.parms.get(self.position(name)? + 1)?;
        if value.starts_with('-') || value.starts_with('+') {
            None
        } else {
            Some(value)
        }
    }

    /// Add a parameter, or replace the value of an existing one
    ///
    /// An empty `value` appends just the switch.
    pub fn append_parm(&mut self, name: &str, value: &str) {
        match self.position(name) {
            Some(index) if !value.is_empty() => {
                if self.parm_value(name).is_some() {
                    self.parms[index + 1] = value.to_string();
                } else {
                    self.parms.insert(index + 1, value.to_string());
                }
            }
            Some(_) => {}
            None => {
                self.parms.push(name.to_string());
                if !value.is_empty() {
                    self.parms.push(value.to_string());
                }
            }
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, parm) in self.parms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if parm.is_empty() || parm.contains(char::is_whitespace) {
                write!(f, "\"{}\"", parm)?;
            } else {
                f.write_str(parm)?;
            }
        }
        Ok(())
    }
}

/// Check the `-insecure` safeguard
///
/// Without it the operator gets a banner on the console and `-console` is
/// added to the launch options. Returns whether loading may continue.
pub fn check_insecure(command_line: &mut CommandLine, out: &mut dyn ConsoleOutput) -> bool {
    if command_line.find_parm(INSECURE_PARM) {
        return true;
    }

    tracing::warn!("Missing {} launch option, refusing to load", INSECURE_PARM);

    out.color_msg(Color::YELLOW, RULE);
    out.color_msg(Color::CYAN, "You forgot to add \"-insecure\" to your launch options!");
    out.color_msg(
        Color::CYAN,
        "This plugin only loads on insecure servers, so that nobody ends up connecting to VAC-secured servers with it.",
    );
    out.color_msg(Color::YELLOW, RULE);

    command_line.append_parm(CONSOLE_PARM, "");
    false
}
