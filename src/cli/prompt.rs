//! Interactive yes/no prompt.
//!
//! Only used when `--contour ask` is in effect and stdin is a terminal, so
//! piped and scripted runs never block.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{AppError, ErrorKind};

/// `true` when a prompt could be answered by a person.
pub fn stdin_is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Ask `question (Y/N)` on stdout and read the answer from stdin.
pub fn confirm(question: &str) -> Result<bool, AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm_with(question, &mut stdin.lock(), &mut stdout.lock())
}

/// Prompt loop over arbitrary streams. End of input counts as "no".
pub fn confirm_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool, AppError> {
    let io_err = |e: io::Error| AppError::new(ErrorKind::Io, format!("Failed to prompt: {e}"));

    loop {
        write!(output, "{question} (Y/N)? ").map_err(io_err)?;
        output.flush().map_err(io_err)?;

        let mut line = String::new();
        let bytes = input.read_line(&mut line).map_err(io_err)?;
        if bytes == 0 {
            writeln!(output).map_err(io_err)?;
            return Ok(false);
        }

        match parse_answer(&line) {
            Some(answer) => return Ok(answer),
            None => {
                writeln!(output, "Please answer Y or N.").map_err(io_err)?;
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
