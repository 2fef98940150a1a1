//! Interactive stream selection on the terminal.

use crate::resolve::Chooser;
use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

/// Prints the options and reads one numeric answer per prompt.
pub struct TerminalChooser<R, W> {
    input: R,
    output: W,
}

impl TerminalChooser<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout, read from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Chooser for TerminalChooser<R, W> {
    fn choose(&mut self, heading: &str, options: &[String]) -> Result<usize> {
        writeln!(self.output, "{}", heading)?;
        for option in options {
            writeln!(self.output, "{}", option)?;
        }
        write!(self.output, "Choice: ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read stream choice")?;
        if read == 0 {
            bail!("No stream choice given (end of input)");
        }

        let answer = line.trim();
        let choice = answer
            .parse::<usize>()
            .with_context(|| format!("Invalid stream choice {:?}: expected a number", answer))?;
        writeln!(self.output)?;
        Ok(choice)
    }
}
