//! Terminal output for the stickerkit CLI.
//!
//! Status lines go to stderr with a right-aligned coloured verb column so
//! stdout stays free for generated completions and metadata.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const VERB_WIDTH: usize = 12;

/// Status printer shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
    verbose: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            verbose: false,
        }
    }

    /// Also print lines sent through [`Printer::verbose`].
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// "     Loading sheet.png"
    pub fn status(&self, verb: &str, message: &str) {
        self.line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.line(YELLOW, verb, message);
    }

    /// Detail shown only with `--verbose`.
    pub fn verbose(&self, verb: &str, message: &str) {
        if self.verbose {
            self.line(DIM, verb, message);
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// `plural(1, "sticker", "stickers")` -> "1 sticker".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// "370x320"
pub fn dimensions(width: u32, height: u32) -> String {
    format!("{}x{}", width, height)
}

/// Path relative to the working directory when it lies beneath it.
pub fn display_path(path: &Path) -> String {
    let Ok(cwd) = std::env::current_dir() else {
        return path.display().to_string();
    };
    match path.strip_prefix(&cwd) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
