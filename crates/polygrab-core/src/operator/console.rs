//! Line-oriented console operator over any reader/writer pair.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::{parse_command, Command, Operator, StepPrompt};

pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl ConsoleOperator<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// One line of input, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .context("read operator input")?;
        Ok(if n == 0 { None } else { Some(line) })
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn command(&mut self, prompt: &StepPrompt<'_>) -> Result<Command> {
        loop {
            write!(
                self.output,
                "[{}/{}] {} > ",
                prompt.position, prompt.total, prompt.item_id
            )?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                // End of input: nobody left to pace the run.
                writeln!(self.output)?;
                return Ok(Command::Quit);
            };
            match parse_command(&line) {
                Some(cmd) => return Ok(cmd),
                None => writeln!(
                    self.output,
                    "Unknown command {:?}. Enter = fetch, s = skip, r = relearn, q = quit.",
                    line.trim()
                )?,
            }
        }
    }

    fn confirm(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "\n{}", message)?;
        write!(self.output, "Press Enter when ready... ")?;
        self.output.flush()?;
        self.read_line()?;
        Ok(())
    }

    fn notice(&mut self, message: &str) {
        if writeln!(self.output, "{}", message).is_err() {
            tracing::debug!("operator console not writable");
        }
    }
}
