//! Host-embedding surface for wasm builds: a single global interpreter
//! instance exposed as free functions, mirroring the reference runtime's
//! Emscripten bridge (`pseudo_init`/`pseudo_load`/`pseudo_step`/...) but with
//! ownership handled by `wasm-bindgen`'s string marshalling instead of a
//! caller-frees-a-pointer convention — `pop_output` returns an owned
//! `String` directly, so there is no `pseudo_free_output` counterpart here.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::interpreter::{ExecState, Interpreter};
use crate::io::BufferedIo;

thread_local! {
    static INTERPRETER: RefCell<Interpreter> = RefCell::new(Interpreter::new(Box::new(BufferedIo::new())));
}

fn exec_state_code(state: ExecState) -> i32 {
    match state {
        ExecState::Continue => 0,
        ExecState::Done => 1,
        ExecState::NeedsInput => 2,
        ExecState::Error => 3,
    }
}

fn with_buffered<R>(interp: &mut Interpreter, f: impl FnOnce(&mut BufferedIo) -> R, default: R) -> R {
    match interp.io_mut().as_any_mut().downcast_mut::<BufferedIo>() {
        Some(buffered) => f(buffered),
        None => default,
    }
}

/// Resets the global interpreter to a fresh, unloaded state.
#[wasm_bindgen]
pub fn pseudo_init() {
    INTERPRETER.with(|cell| {
        *cell.borrow_mut() = Interpreter::new(Box::new(BufferedIo::new()));
    });
}

/// Parses `source` and prepares it for stepping. Returns `true` even if the
/// source had syntax errors recorded as `Error`/`Missing` nodes — a program
/// with recoverable parse errors still runs as far as it can.
#[wasm_bindgen]
pub fn pseudo_load(source: &str) -> bool {
    INTERPRETER.with(|cell| cell.borrow_mut().load(source))
}

/// Executes one leaf statement. Returns an `ExecState` code: 0 continue,
/// 1 done, 2 needs input, 3 error.
#[wasm_bindgen]
pub fn pseudo_step() -> i32 {
    INTERPRETER.with(|cell| exec_state_code(cell.borrow_mut().step()))
}

/// Pushes a line of input for a suspended `citeste` and resumes execution.
#[wasm_bindgen]
pub fn pseudo_push_input(value: &str) {
    INTERPRETER.with(|cell| {
        let mut interp = cell.borrow_mut();
        with_buffered(&mut interp, |b| b.push_input(value.to_string()), ());
        interp.resume();
    });
}

/// Whether the host has buffered output waiting to be drained.
#[wasm_bindgen]
pub fn pseudo_has_output() -> bool {
    INTERPRETER.with(|cell| {
        let mut interp = cell.borrow_mut();
        with_buffered(&mut interp, |b| b.has_output(), false)
    })
}

/// Pops the oldest queued output line, or an empty string if none is queued.
#[wasm_bindgen]
pub fn pseudo_pop_output() -> String {
    INTERPRETER.with(|cell| {
        let mut interp = cell.borrow_mut();
        with_buffered(&mut interp, |b| b.pop_output(), None).unwrap_or_default()
    })
}

/// Clears buffered input/output without discarding the loaded program.
#[wasm_bindgen]
pub fn pseudo_reset() {
    INTERPRETER.with(|cell| {
        let mut interp = cell.borrow_mut();
        with_buffered(&mut interp, |b| b.clear(), ());
    });
}

#[wasm_bindgen]
pub fn pseudo_needs_input() -> bool {
    INTERPRETER.with(|cell| {
        let mut interp = cell.borrow_mut();
        with_buffered(&mut interp, |b| b.needs_input(), false)
    })
}

/// Returns the current runtime error message, or an empty string if none.
#[wasm_bindgen]
pub fn pseudo_get_error() -> String {
    INTERPRETER.with(|cell| {
        cell.borrow()
            .error()
            .map(|e| e.to_string())
            .unwrap_or_default()
    })
}

#[wasm_bindgen]
pub fn pseudo_get_line() -> u32 {
    INTERPRETER.with(|cell| cell.borrow().current_line())
}

#[wasm_bindgen]
pub fn pseudo_request_stop() {
    INTERPRETER.with(|cell| cell.borrow_mut().request_stop());
}
