use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Line-based prompt over any reader/writer pair.
///
/// End of input is reported as `None`, which the games treat as the player
/// walking away.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{}", line).context("Failed to write to console")
    }

    /// Print `prompt` and read one trimmed line
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush console")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from console")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask until the answer is some form of yes or no
    pub fn ask_yes_no(&mut self, prompt: &str) -> Result<Option<bool>> {
        loop {
            let Some(answer) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match parse_yes_no(&answer) {
                Some(yes) => return Ok(Some(yes)),
                None => self.say("Please enter 'y' for yes or 'n' for no.")?,
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Accepts `y`, `yes`, `n`, `no` in any case
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn scripted(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    pub(crate) fn transcript(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("YES"), Some(true));
        assert_eq!(parse_yes_no(" No "), Some(false));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }

    #[test]
    fn test_read_line_trims() {
        let mut console = scripted("  hello \n");
        assert_eq!(console.read_line("> ").unwrap(), Some("hello".to_string()));
        assert_eq!(console.read_line("> ").unwrap(), None);
    }

    #[test]
    fn test_yes_no_reprompts() {
        let mut console = scripted("what\nY\n");
        assert_eq!(console.ask_yes_no("again? ").unwrap(), Some(true));

        let out = transcript(console);
        assert_eq!(out.matches("again? ").count(), 2);
        assert!(out.contains("Please enter 'y' for yes or 'n' for no."));
    }

    #[test]
    fn test_yes_no_eof() {
        let mut console = scripted("bogus\n");
        assert_eq!(console.ask_yes_no("again? ").unwrap(), None);
    }
}
