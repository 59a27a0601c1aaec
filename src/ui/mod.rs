//! Terminal presentation: everything here is derived from sequencer
//! events and owns no run lifecycle of its own.

pub mod console;
pub mod dialogs;
pub mod progress;
pub mod rain;
pub mod terminal;
pub mod typing;

use std::io::{self, Write};

/// Write and flush, ignoring a closed stdout
pub(crate) fn emit<W: Write>(out: &mut W, text: &str) {
    let _ = out.write_all(text.as_bytes()).and_then(|_| out.flush());
}

pub(crate) fn emit_line<W: Write>(out: &mut W, text: &str) {
    emit(out, &format!("{}\n", text));
}

/// True when stdout is an interactive terminal
pub fn stdout_is_terminal() -> bool {
    use std::io::IsTerminal;
    io::stdout().is_terminal()
}
