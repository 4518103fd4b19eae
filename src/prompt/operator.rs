//! The operator at the other end of the terminal.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::io::{BufRead, IsTerminal, Write};

/// Blocking question-and-answer with whoever runs the tool.
pub trait Operator {
    /// Ask for a free-text answer. Surrounding whitespace is trimmed; end of input reads as blank.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question. Only an explicit yes returns `true`.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

impl<T: Operator + ?Sized> Operator for Box<T> {
    fn input(&mut self, prompt: &str) -> Result<String> {
        (**self).input(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        (**self).confirm(prompt)
    }
}

impl<T: Operator + ?Sized> Operator for &mut T {
    fn input(&mut self, prompt: &str) -> Result<String> {
        (**self).input(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        (**self).confirm(prompt)
    }
}

/// Pick the interactive `dialoguer` operator on a terminal, the line reader otherwise.
pub fn terminal_operator() -> Box<dyn Operator> {
    if std::io::stdin().is_terminal() && console::Term::stderr().is_term() {
        Box::new(TerminalOperator::new())
    } else {
        Box::new(LineOperator::new(std::io::stdin().lock()))
    }
}

/// Prompts rendered with `dialoguer`.
pub struct TerminalOperator {
    theme: ColorfulTheme,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for TerminalOperator {
    fn input(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read answer")?;
        Ok(answer.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

/// Reads one answer per line, for piped input and scripted sessions.
pub struct LineOperator<R> {
    reader: R,
}

impl<R: BufRead> LineOperator<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Operator for LineOperator<R> {
    fn input(&mut self, prompt: &str) -> Result<String> {
        print!("{}: ", prompt);
        std::io::stdout().flush().ok();

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            println!();
        }
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.input(&format!("{} [y/N]", prompt))?;
        Ok(is_affirmative(&answer))
    }
}

/// `y` or `yes`, any case.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
