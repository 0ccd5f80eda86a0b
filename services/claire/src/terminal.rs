//! Text-only front-end: one line in, one reply out.

use claire_core::{Assistant, assistant::is_exit_command};
use std::io::{self, BufRead, Write};
use tracing::info;

/// Front-end command that clears the conversation history.
pub const CLEAR_COMMAND: &str = "/clear";

pub struct TerminalUi<'a> {
    assistant: &'a mut Assistant,
}

impl<'a> TerminalUi<'a> {
    pub fn new(assistant: &'a mut Assistant) -> Self {
        Self { assistant }
    }

    /// Runs the read-eval-print loop until an exit command or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> io::Result<()> {
        let name = self.assistant.name().to_string();
        let rule = "=".repeat(60);
        writeln!(out, "\n{rule}")?;
        writeln!(out, "  {name} - Terminal Mode")?;
        writeln!(out, "  Type 'help' for commands, 'exit' to quit")?;
        writeln!(out, "{rule}")?;

        let mut buf = Vec::new();
        loop {
            write!(out, "\nYou: ")?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(out, "\n\nGoodbye!")?;
                info!("End of input, leaving terminal mode");
                break;
            }

            // Undecodable bytes become U+FFFD instead of ending the session.
            let line = String::from_utf8_lossy(&buf);
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if text == CLEAR_COMMAND {
                self.assistant.clear_history();
                writeln!(out, "\nConversation history cleared.")?;
                continue;
            }

            let reply = self.assistant.process(text);
            writeln!(out, "\n{name}: {reply}")?;

            if is_exit_command(text) {
                break;
            }
        }
        Ok(())
    }
}
