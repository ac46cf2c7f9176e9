//! Terminal handles used by the command runner.
//!
//! Results go to `output`; prompts and notices go to `prompt` so that piping
//! `output` elsewhere keeps it clean.

use std::io::{self, BufRead, Write};

/// Input, output, and prompt streams for one command.
#[derive(Debug)]
pub struct Console<R, W, E> {
    input: R,
    output: W,
    prompt: E,
}

impl<R, W, E> Console<R, W, E>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    /// Bundle the three streams.
    pub fn new(input: R, output: W, prompt: E) -> Self {
        Self {
            input,
            output,
            prompt,
        }
    }

    /// Stream for command results.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Write a notice to the prompt stream.
    pub fn note(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.prompt, "{message}")
    }

    /// Ask a question and return the answer without its line ending.
    ///
    /// End of input yields an empty answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.prompt, "{question}")?;
        self.prompt.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let trimmed = answer.trim_end_matches(['\r', '\n']).len();
        answer.truncate(trimmed);
        Ok(answer)
    }

    /// Ask a yes/no question; anything other than `y` or `yes` is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N] "))?;
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    /// Release the streams.
    pub fn into_parts(self) -> (R, W, E) {
        (self.input, self.output, self.prompt)
    }
}
