// Operator text - Short status lines on the controller screen
//
// The only feedback channel the operator has during setup: a startup banner
// and, if anything goes wrong, a one-line failure message.

use std::cell::RefCell;
use std::rc::Rc;

/// Number of text lines on the controller screen
pub const TEXT_LINES: usize = 3;

/// Text display driver
pub trait TextDisplay {
    /// Write `text` at the given line and column
    fn set_text(&mut self, line: u8, col: u8, text: &str);
}

impl<T: TextDisplay + ?Sized> TextDisplay for Rc<RefCell<T>> {
    fn set_text(&mut self, line: u8, col: u8, text: &str) {
        self.borrow_mut().set_text(line, col, text);
    }
}

/// Show a status message on the first line
pub fn print(display: &mut dyn TextDisplay, text: &str) {
    display.set_text(0, 0, text);
}

/// Text display kept in memory
///
/// Remembers the current contents of each line plus every message ever
/// written, and optionally echoes messages to stderr. Backs the simulator's
/// window title.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    lines: [String; TEXT_LINES],
    history: Vec<String>,
    echo_stderr: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Echo every message to stderr as well
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo_stderr = echo;
        self
    }

    /// Current contents of a line (empty for lines that do not exist)
    pub fn line(&self, line: usize) -> &str {
        self.lines.get(line).map(String::as_str).unwrap_or("")
    }

    /// Every message written, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl TextDisplay for TextBuffer {
    fn set_text(&mut self, line: u8, col: u8, text: &str) {
        if self.echo_stderr {
            eprintln!("[operator] {}", text);
        }
        self.history.push(text.to_string());

        let Some(current) = self.lines.get_mut(line as usize) else {
            return;
        };
        let col = col as usize;
        let mut rendered: String = current.chars().take(col).collect();
        while rendered.chars().count() < col {
            rendered.push(' ');
        }
        rendered.push_str(text);
        *current = rendered;
    }
}
