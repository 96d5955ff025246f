use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Duration;

/// Line-based terminal prompts.
///
/// Generic over reader and writer so scripted input can drive the wizard
/// and the interactive session in tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    typewriter_delay: Duration,
}

impl Prompter<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
            .with_typewriter_delay(Duration::from_millis(18))
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            typewriter_delay: Duration::ZERO,
        }
    }

    pub fn with_typewriter_delay(mut self, delay: Duration) -> Self {
        self.typewriter_delay = delay;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a line of text
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write to stdout")
    }

    /// Print text with a typewriter effect, one character at a time.
    pub fn typewriter(&mut self, text: &str) -> Result<()> {
        if self.typewriter_delay.is_zero() {
            return self.say(text);
        }
        for c in text.chars() {
            write!(self.output, "{}", c).context("Failed to write to stdout")?;
            self.output.flush().ok();
            std::thread::sleep(self.typewriter_delay);
        }
        writeln!(self.output).context("Failed to write to stdout")
    }

    /// Prompt user with a message and return their trimmed input.
    ///
    /// End of input is an error so loops waiting for valid input terminate.
    pub fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write to stdout")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        let read = self
            .input
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed");
        }
        Ok(input.trim().to_string())
    }

    /// Prompt user with a message and a default value. Returns default if input is empty.
    pub fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt user with a yes/no question. Returns bool based on input and default.
    pub fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Re-prompt until the input parses and passes `check`
    pub fn prompt_parsed<T, F>(&mut self, message: &str, default: &str, check: F) -> Result<T>
    where
        T: FromStr,
        F: Fn(&T) -> Result<(), String>,
    {
        loop {
            let raw = self.prompt_with_default(message, default)?;
            match raw.parse::<T>() {
                Ok(value) => match check(&value) {
                    Ok(()) => return Ok(value),
                    Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
                },
                Err(_) => self.say(&format!("  Invalid: '{}' is not a number. Try again.", raw))?,
            }
        }
    }
}
