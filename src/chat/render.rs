//! Terminal output for the chat application.

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for green text (informational lines).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (diagnostics).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering chat output.
///
/// Allows tests and alternative frontends to capture output instead of
/// writing to the terminal.
pub trait Renderer {
    /// Print an assistant reply.
    fn print_reply(&mut self, text: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);
}

/// Renderer that writes to stdout/stderr with optional ANSI styling.
pub struct PlainTextRenderer {
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a renderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Creates a renderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, text: &str) {
        println!("\n{text}\n");
    }

    fn print_info(&mut self, info: &str) {
        if self.use_color {
            println!("{ANSI_GREEN}{ANSI_BOLD}{info}{ANSI_RESET}");
        } else {
            println!("{info}");
        }
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("{ANSI_RED}{ANSI_BOLD}{error}{ANSI_RESET}");
        } else {
            eprintln!("{error}");
        }
    }
}
