//! Line oriented prompts for the interactive viewers.
use crate::error::{Error, Result};
use std::{
    io::{BufRead, Write},
    str::FromStr,
};

/// Write a prompt and read back a line of input.
///
/// Works over any reader and writer so the viewers can be driven by something other than a
/// terminal.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// Create a prompt.
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    /// Ask a question and return the answer with surrounding white space removed.
    ///
    /// Returns `None` at the end of the input.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wx_viewer::Prompt;
    ///
    /// let mut out = Vec::new();
    /// let mut prompt = Prompt::new(" OUN \n".as_bytes(), &mut out);
    ///
    /// assert_eq!(prompt.ask("Enter station:").unwrap(), Some("OUN".to_owned()));
    /// assert_eq!(prompt.ask("Enter station:").unwrap(), None);
    /// drop(prompt);
    ///
    /// assert_eq!(String::from_utf8(out).unwrap(), "Enter station: Enter station: ");
    /// ```
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    /// Ask a question and parse the answer.
    ///
    /// An answer that doesn't parse is a `BadInput` error describing what was `expected`.
    pub fn ask_parsed<T: FromStr>(
        &mut self,
        question: &str,
        expected: &'static str,
    ) -> Result<Option<T>> {
        match self.ask(question)? {
            Some(answer) => answer
                .parse()
                .map(Some)
                .map_err(|_| Error::BadInput {
                    input: answer,
                    expected,
                }),
            None => Ok(None),
        }
    }

    /// Write a line of output.
    pub fn say(&mut self, msg: &str) -> Result<()> {
        writeln!(self.output, "{}", msg)?;
        Ok(())
    }

    /// Wait for the user to press enter. Returns false at the end of the input.
    pub fn pause(&mut self, msg: &str) -> Result<bool> {
        Ok(self.ask(msg)?.is_some())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ask_parsed() {
        let mut out = Vec::new();
        let mut prompt = Prompt::new("12\nnoon\n".as_bytes(), &mut out);

        let hour = prompt.ask_parsed::<u32>("Enter time (XXz):", "an hour");
        assert_eq!(hour.unwrap(), Some(12));

        match prompt.ask_parsed::<u32>("Enter time (XXz):", "an hour") {
            Err(Error::BadInput { input, expected }) => {
                assert_eq!(input, "noon");
                assert_eq!(expected, "an hour");
            }
            other => panic!("unexpected {:?}", other),
        }

        let hour = prompt.ask_parsed::<u32>("Enter time (XXz):", "an hour");
        assert_eq!(hour.unwrap(), None);
    }

    #[test]
    fn test_say_and_pause() {
        let mut out = Vec::new();
        {
            let mut prompt = Prompt::new("\n".as_bytes(), &mut out);
            prompt.say("==== BANNER ====").unwrap();
            assert!(prompt.pause("Press enter to continue").unwrap());
            assert!(!prompt.pause("Press enter to continue").unwrap());
        }

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("==== BANNER ====\n"));
    }
}
