//! The pluggable I/O collaborator: a blocking terminal backend for the CLI
//! and a buffered, non-blocking backend for host/wasm embedding.

use std::collections::VecDeque;
use std::io::Write as _;

/// A program's channel to the outside world. `read` returns `None` on
/// end-of-input; the buffered backend returns `None` to mean "no input
/// available yet" rather than "stream closed" (see `needs_input`).
pub trait Io {
    fn write(&mut self, text: &str);
    fn read(&mut self) -> Option<String>;

    /// Lets a host holding a `Box<dyn Io>` recover the concrete backend
    /// (e.g. to drain `BufferedIo`'s output queue after a `step`).
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

/// Blocking terminal backend: writes go straight to stdout, reads block on
/// stdin until a line is available or EOF is reached.
#[derive(Default)]
pub struct StdioIo;

impl StdioIo {
    pub fn new() -> StdioIo {
        StdioIo
    }
}

impl Io for StdioIo {
    fn write(&mut self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }

    fn read(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(_) => None,
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Buffered backend for host embedding (e.g. a wasm bridge): output is
/// queued for the host to drain, input is pushed in by the host. `read`
/// never blocks; when the input queue is empty it sets `waiting_for_input`
/// and returns `None`, signalling the interpreter to suspend as
/// `ExecState::NeedsInput`.
#[derive(Default)]
pub struct BufferedIo {
    input: VecDeque<String>,
    output: VecDeque<String>,
    waiting_for_input: bool,
}

impl BufferedIo {
    pub fn new() -> BufferedIo {
        BufferedIo {
            input: VecDeque::new(),
            output: VecDeque::new(),
            waiting_for_input: false,
        }
    }

    pub fn push_input(&mut self, line: String) {
        self.input.push_back(line);
        self.waiting_for_input = false;
    }

    pub fn pop_output(&mut self) -> Option<String> {
        self.output.pop_front()
    }

    pub fn has_output(&self) -> bool {
        !self.output.is_empty()
    }

    pub fn needs_input(&self) -> bool {
        self.waiting_for_input
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
        self.waiting_for_input = false;
    }
}

impl Io for BufferedIo {
    fn write(&mut self, text: &str) {
        self.output.push_back(text.to_string());
    }

    fn read(&mut self) -> Option<String> {
        match self.input.pop_front() {
            Some(line) => Some(line),
            None => {
                self.waiting_for_input = true;
                None
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_write_queues_output() {
        let mut io = BufferedIo::new();
        io.write("hello");
        assert!(io.has_output());
        assert_eq!(io.pop_output(), Some("hello".to_string()));
        assert!(!io.has_output());
    }

    #[test]
    fn buffered_write_does_not_append_newline() {
        let mut io = BufferedIo::new();
        io.write("no newline");
        assert_eq!(io.pop_output().unwrap(), "no newline");
    }

    #[test]
    fn buffered_read_with_no_input_sets_waiting_flag() {
        let mut io = BufferedIo::new();
        assert_eq!(io.read(), None);
        assert!(io.needs_input());
    }

    #[test]
    fn buffered_push_input_clears_waiting_flag() {
        let mut io = BufferedIo::new();
        let _ = io.read();
        assert!(io.needs_input());
        io.push_input("42".to_string());
        assert!(!io.needs_input());
    }

    #[test]
    fn buffered_read_drains_fifo_in_order() {
        let mut io = BufferedIo::new();
        io.push_input("a".to_string());
        io.push_input("b".to_string());
        assert_eq!(io.read(), Some("a".to_string()));
        assert_eq!(io.read(), Some("b".to_string()));
    }

    #[test]
    fn buffered_clear_resets_everything() {
        let mut io = BufferedIo::new();
        io.write("x");
        io.push_input("y".to_string());
        let _ = io.read();
        let _ = io.read();
        io.clear();
        assert!(!io.has_output());
        assert!(!io.needs_input());
    }
}
