//! Tree-walking interpreter for pseudocode programs.
//!
//! The interpreter owns its own AST arenas so that `load` can be called
//! repeatedly on the same instance (matching the host-embedding contract,
//! where a single long-lived interpreter handle is reloaded with new
//! source). Because the parsed tree borrows from those arenas, the
//! interpreter is necessarily self-referential; see `ProgramArenas` below
//! for how that's contained.

use std::fmt;

use crate::arena::Arena;
use crate::arena_ctx::AstContext;
use crate::ast::{AddOp, CompareOp, Expr, Literal, MulOp, Pos, Stmt};
use crate::environment::Environment;
use crate::error::ParseError;
use crate::intern::{Interner, Symbol};
use crate::io::Io;
use crate::parser;
use crate::value::{Value, ValueError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Continue,
    Done,
    NeedsInput,
    Error,
}

#[derive(Debug, Clone)]
pub enum RuntimeErrorKind {
    Value(ValueError),
    UndefinedVariable(String),
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeErrorKind::Value(e) => write!(f, "{e}"),
            RuntimeErrorKind::UndefinedVariable(name) => {
                write!(f, "Variabila '{name}' nu a fost initializata")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub pos: Pos,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (linia {}, coloana {})", self.kind, self.pos.row, self.pos.col)
    }
}

/// Owns the bump arenas backing a loaded program. Boxed so its heap address
/// is stable across moves of the `Interpreter` that holds it; `Interpreter`
/// transmutes borrows of these arenas to `'static` and discards them
/// together with the arenas themselves on the next `load`, so no dangling
/// reference is ever read.
struct ProgramArenas {
    stmts: Arena<Stmt<'static>>,
    exprs: Arena<Expr<'static>>,
    expr_refs: Arena<&'static Expr<'static>>,
    names: Arena<Symbol>,
}

impl ProgramArenas {
    fn new() -> Box<ProgramArenas> {
        Box::new(ProgramArenas {
            stmts: Arena::new(),
            exprs: Arena::new(),
            expr_refs: Arena::new(),
            names: Arena::new(),
        })
    }

    unsafe fn ctx(&self) -> AstContext<'static> {
        unsafe fn extend<T: ?Sized>(x: &T) -> &'static T {
            std::mem::transmute(x)
        }
        AstContext::new(
            extend(&self.stmts),
            extend(&self.exprs),
            extend(&self.expr_refs),
            extend(&self.names),
        )
    }
}

enum Frame {
    Block(&'static [Stmt<'static>], usize),
    For(ForState),
    While(&'static Expr<'static>, &'static [Stmt<'static>]),
    DoWhileTest(&'static Expr<'static>, &'static [Stmt<'static>]),
    RepeatTest(&'static Expr<'static>, &'static [Stmt<'static>]),
    /// `citeste a, b, c` reads one name at a time so a suspension partway
    /// through only re-reads the names not yet consumed.
    ReadStmt(&'static [Symbol], usize),
}

struct ForState {
    var: Symbol,
    stop: Value,
    step: Value,
    body: &'static [Stmt<'static>],
}

enum Entered {
    Leaf,
    Composite,
}

pub struct Interpreter {
    arenas: Option<Box<ProgramArenas>>,
    program: &'static [Stmt<'static>],
    interner: Interner,
    env: Environment,
    io: Box<dyn Io>,
    stack: Vec<Frame>,
    exec_state: ExecState,
    current_pos: Pos,
    runtime_error: Option<RuntimeError>,
    parse_errors: Vec<ParseError>,
    stop_requested: bool,
}

impl Interpreter {
    pub fn new(io: Box<dyn Io>) -> Interpreter {
        Interpreter {
            arenas: None,
            program: &[],
            interner: Interner::new(),
            env: Environment::new(),
            io,
            stack: Vec::new(),
            exec_state: ExecState::Done,
            current_pos: Pos { row: 1, col: 1 },
            runtime_error: None,
            parse_errors: Vec::new(),
            stop_requested: false,
        }
    }

    /// Parses `source` (already normalized) and resets execution state.
    /// Returns `false` if the program contains syntax errors that leave
    /// no usable tree (a single first-error program still loads; only a
    /// completely empty parse fails).
    pub fn load(&mut self, source: &str) -> bool {
        let arenas = ProgramArenas::new();
        self.interner = Interner::new();
        let ctx = unsafe { arenas.ctx() };
        let output = parser::parse(source, ctx, &mut self.interner);

        self.program = output.program;
        self.parse_errors = output.errors;
        self.arenas = Some(arenas);

        self.env.clear();
        self.stack.clear();
        self.stack.push(Frame::Block(self.program, 0));
        self.runtime_error = None;
        self.exec_state = ExecState::Continue;
        self.current_pos = Pos { row: 1, col: 1 };
        self.stop_requested = false;

        true
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }

    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn error(&self) -> Option<&RuntimeError> {
        self.runtime_error.as_ref()
    }

    pub fn current_line(&self) -> u32 {
        self.current_pos.row
    }

    pub fn current_column(&self) -> u32 {
        self.current_pos.col
    }

    /// Gives a host embedding access to the concrete I/O backend, e.g. to
    /// downcast to `BufferedIo` and drain its output queue.
    pub fn io_mut(&mut self) -> &mut dyn Io {
        self.io.as_mut()
    }

    pub fn run(&mut self) -> ExecState {
        loop {
            match self.step() {
                ExecState::Continue => continue,
                other => return other,
            }
        }
    }

    /// Re-enters execution after a `NeedsInput` suspension. The suspended
    /// `Read` statement was left un-advanced on the stack, so this is
    /// equivalent to `step` — provided for symmetry with the external
    /// lifecycle contract (`load/step/run/resume`).
    pub fn resume(&mut self) -> ExecState {
        self.step()
    }

    pub fn step(&mut self) -> ExecState {
        if matches!(self.exec_state, ExecState::Done | ExecState::Error) {
            return self.exec_state;
        }
        if self.stop_requested {
            self.stack.clear();
            self.stop_requested = false;
            self.exec_state = ExecState::Done;
            return self.exec_state;
        }

        loop {
            let Some(frame) = self.stack.pop() else {
                self.exec_state = ExecState::Done;
                return self.exec_state;
            };

            match frame {
                Frame::Block(stmts, idx) => {
                    if idx >= stmts.len() {
                        continue;
                    }
                    let stmt = &stmts[idx];
                    self.current_pos = stmt.pos();
                    self.stack.push(Frame::Block(stmts, idx + 1));
                    match self.enter_stmt(stmt) {
                        Ok(Entered::Leaf) => {
                            self.exec_state = ExecState::Continue;
                            return self.exec_state;
                        }
                        Ok(Entered::Composite) => continue,
                        Err(err) => {
                            self.runtime_error = Some(err);
                            self.exec_state = ExecState::Error;
                            return self.exec_state;
                        }
                    }
                }
                Frame::For(mut state) => match self.advance_for(&mut state) {
                    Ok(Some(body)) => {
                        self.stack.push(Frame::For(state));
                        self.stack.push(Frame::Block(body, 0));
                        continue;
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        self.runtime_error = Some(err);
                        self.exec_state = ExecState::Error;
                        return self.exec_state;
                    }
                },
                Frame::While(cond, body) => match self.eval_expr(cond) {
                    Ok(v) if v.is_truthy() => {
                        self.stack.push(Frame::While(cond, body));
                        self.stack.push(Frame::Block(body, 0));
                        continue;
                    }
                    Ok(_) => continue,
                    Err(kind) => {
                        self.runtime_error = Some(RuntimeError { kind: RuntimeErrorKind::Value(kind), pos: self.current_pos });
                        self.exec_state = ExecState::Error;
                        return self.exec_state;
                    }
                },
                Frame::DoWhileTest(cond, body) => match self.eval_expr(cond) {
                    Ok(v) if v.is_truthy() => {
                        self.stack.push(Frame::DoWhileTest(cond, body));
                        self.stack.push(Frame::Block(body, 0));
                        continue;
                    }
                    Ok(_) => continue,
                    Err(kind) => {
                        self.runtime_error = Some(RuntimeError { kind: RuntimeErrorKind::Value(kind), pos: self.current_pos });
                        self.exec_state = ExecState::Error;
                        return self.exec_state;
                    }
                },
                Frame::RepeatTest(until, body) => match self.eval_expr(until) {
                    Ok(v) if !v.is_truthy() => {
                        self.stack.push(Frame::RepeatTest(until, body));
                        self.stack.push(Frame::Block(body, 0));
                        continue;
                    }
                    Ok(_) => continue,
                    Err(kind) => {
                        self.runtime_error = Some(RuntimeError { kind: RuntimeErrorKind::Value(kind), pos: self.current_pos });
                        self.exec_state = ExecState::Error;
                        return self.exec_state;
                    }
                },
                Frame::ReadStmt(names, idx) => {
                    if idx >= names.len() {
                        continue;
                    }
                    match self.io.read() {
                        Some(line) => {
                            self.env.set(self.interner.resolve(names[idx]), parse_read_value(&line));
                            self.stack.push(Frame::ReadStmt(names, idx + 1));
                            continue;
                        }
                        None => {
                            self.stack.push(Frame::ReadStmt(names, idx));
                            self.exec_state = ExecState::NeedsInput;
                            return self.exec_state;
                        }
                    }
                }
            }
        }
    }

    fn enter_stmt(&mut self, stmt: &'static Stmt<'static>) -> Result<Entered, RuntimeError> {
        let pos = stmt.pos();
        // Dereferencing (Stmt is Copy) so fields bind with their declared
        // types instead of an extra layer of reference from match ergonomics.
        match *stmt {
            Stmt::Assign { name, value, .. } => {
                let v = self.eval_expr(value).map_err(|k| self.value_error(k, pos))?;
                self.env.set(self.interner.resolve(name), v);
                Ok(Entered::Leaf)
            }
            Stmt::Swap { left, right, .. } => {
                let left_name = self.interner.resolve(left).to_string();
                let right_name = self.interner.resolve(right).to_string();
                let lv = self.env.get(&left_name).cloned().unwrap_or(Value::Integer(0));
                let rv = self.env.get(&right_name).cloned().unwrap_or(Value::Integer(0));
                self.env.set(&left_name, rv);
                self.env.set(&right_name, lv);
                Ok(Entered::Leaf)
            }
            Stmt::Read { names, .. } => {
                self.stack.push(Frame::ReadStmt(names, 0));
                Ok(Entered::Composite)
            }
            Stmt::Write { values, .. } => {
                let mut out = String::new();
                for value in values {
                    let v = self.eval_expr(*value).map_err(|k| self.value_error(k, pos))?;
                    out.push_str(&v.to_display_string());
                }
                out.push('\n');
                self.io.write(&out);
                Ok(Entered::Leaf)
            }
            Stmt::If { cond, then_branch, else_branch, .. } => {
                let c = self.eval_expr(cond).map_err(|k| self.value_error(k, pos))?;
                let body = if c.is_truthy() { then_branch } else { else_branch.unwrap_or(&[]) };
                self.stack.push(Frame::Block(body, 0));
                Ok(Entered::Composite)
            }
            Stmt::For { var, start, stop, step, body, .. } => {
                let start_v = self.eval_expr(start).map_err(|k| self.value_error(k, pos))?;
                let stop_v = self.eval_expr(stop).map_err(|k| self.value_error(k, pos))?;
                let step_v = match step {
                    Some(e) => self.eval_expr(e).map_err(|k| self.value_error(k, pos))?,
                    None => Value::Integer(1),
                };
                self.env.set(self.interner.resolve(var), start_v.clone());
                if for_condition_holds(&start_v, &stop_v, &step_v) {
                    self.stack.push(Frame::For(ForState { var, stop: stop_v, step: step_v, body }));
                    self.stack.push(Frame::Block(body, 0));
                }
                Ok(Entered::Composite)
            }
            Stmt::While { cond, body, .. } => {
                self.stack.push(Frame::While(cond, body));
                Ok(Entered::Composite)
            }
            Stmt::DoWhile { body, cond, .. } => {
                self.stack.push(Frame::DoWhileTest(cond, body));
                self.stack.push(Frame::Block(body, 0));
                Ok(Entered::Composite)
            }
            Stmt::Repeat { body, until, .. } => {
                self.stack.push(Frame::RepeatTest(until, body));
                self.stack.push(Frame::Block(body, 0));
                Ok(Entered::Composite)
            }
            Stmt::Missing { .. } | Stmt::Error { .. } => Ok(Entered::Leaf),
        }
    }

    fn value_error(&self, kind: ValueError, pos: Pos) -> RuntimeError {
        RuntimeError { kind: RuntimeErrorKind::Value(kind), pos }
    }

    fn advance_for(&mut self, state: &mut ForState) -> Result<Option<&'static [Stmt<'static>]>, RuntimeError> {
        let name = self.interner.resolve(state.var).to_string();
        let current = self.env.get(&name).cloned().unwrap_or(Value::Integer(0));
        let next = current
            .add(&state.step)
            .map_err(|kind| RuntimeError { kind: RuntimeErrorKind::Value(kind), pos: self.current_pos })?;
        self.env.set(&name, next.clone());
        if for_condition_holds(&next, &state.stop, &state.step) {
            Ok(Some(state.body))
        } else {
            Ok(None)
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, ValueError> {
        // Dereferencing (Expr is Copy) so fields bind with their declared
        // types instead of an extra layer of reference from match ergonomics.
        match *expr {
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Number(n) => Value::Integer(n),
                Literal::Real(r) => Value::Real(r),
                Literal::Text(s) => Value::Text(self.interner.resolve(s).to_string()),
            }),
            Expr::Identifier { name, .. } => {
                let resolved = self.interner.resolve(name).to_string();
                Ok(self.env.get(&resolved).cloned().unwrap_or(Value::Integer(0)))
            }
            Expr::Or { left, right, .. } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(l.or(&r))
            }
            Expr::And { left, right, .. } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(l.and(&r))
            }
            Expr::Not { operand, .. } => Ok(self.eval_expr(operand)?.not()),
            Expr::Compare { op, left, right, .. } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                match op {
                    CompareOp::Eq => l.eq_value(&r),
                    CompareOp::NotEq => l.ne_value(&r),
                    CompareOp::Lt => l.lt(&r),
                    CompareOp::Gt => l.gt(&r),
                    CompareOp::LtEq => l.le(&r),
                    CompareOp::GtEq => l.ge(&r),
                }
            }
            Expr::Add { op, left, right, .. } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                match op {
                    AddOp::Add => l.add(&r),
                    AddOp::Sub => l.sub(&r),
                }
            }
            Expr::Mul { op, left, right, .. } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                match op {
                    MulOp::Mul => l.mul(&r),
                    MulOp::Div => l.div(&r),
                    MulOp::Mod => l.rem(&r),
                }
            }
            Expr::Neg { operand, .. } => self.eval_expr(operand)?.neg(),
            Expr::Sqrt { operand, .. } => self.eval_expr(operand)?.sqrt(),
            Expr::Floor { operand, .. } => self.eval_expr(operand)?.floor(),
            Expr::Paren { inner, .. } => self.eval_expr(inner),
            Expr::Missing { .. } | Expr::Error { .. } => Ok(Value::Integer(0)),
        }
    }
}

fn for_condition_holds(current: &Value, stop: &Value, step: &Value) -> bool {
    if step.to_float() >= 0.0 {
        current.to_float() <= stop.to_float()
    } else {
        current.to_float() >= stop.to_float()
    }
}

/// Interprets a line read from input as a number when it looks like one,
/// falling back to text — matching how `citeste` is taught: the student
/// writes `citeste x` without declaring a type.
fn parse_read_value(line: &str) -> Value {
    let trimmed = line.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(f) = trimmed.parse::<f64>() {
        Value::Real(f)
    } else {
        Value::Text(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufferedIo;

    fn run_program(source: &str) -> (Interpreter, ExecState) {
        let mut interp = Interpreter::new(Box::new(BufferedIo::new()));
        interp.load(source);
        let state = interp.run();
        (interp, state)
    }

    #[test]
    fn runs_simple_assignment_and_write() {
        let (mut interp, state) = run_program("x <- 2 + 3\nscrie x\n");
        assert_eq!(state, ExecState::Done);
        let io = interp.io.as_any_mut().downcast_mut::<BufferedIo>().unwrap();
        assert_eq!(io.pop_output(), Some("5\n".to_string()));
    }

    #[test]
    fn if_else_picks_correct_branch() {
        let (_interp, state) = run_program("daca 1 = 2 atunci\nx <- 1\naltfel\nx <- 2\nsf\n");
        assert_eq!(state, ExecState::Done);
    }

    #[test]
    fn for_loop_counts_correctly() {
        let mut interp = Interpreter::new(Box::new(BufferedIo::new()));
        interp.load("total <- 0\npentru i <- 1, 5 executa\ntotal <- total + i\nsf\nscrie total\n");
        let state = interp.run();
        assert_eq!(state, ExecState::Done);
    }

    #[test]
    fn while_loop_terminates() {
        let (_interp, state) = run_program("x <- 0\ncat timp x < 3 executa\nx <- x + 1\nsf\n");
        assert_eq!(state, ExecState::Done);
    }

    #[test]
    fn repeat_until_runs_body_at_least_once() {
        let (_interp, state) = run_program("x <- 0\nrepeta\nx <- x + 1\npana cand x = 1\n");
        assert_eq!(state, ExecState::Done);
    }

    #[test]
    fn read_with_no_buffered_input_suspends() {
        let mut interp = Interpreter::new(Box::new(BufferedIo::new()));
        interp.load("citeste x\nscrie x\n");
        let state = interp.run();
        assert_eq!(state, ExecState::NeedsInput);
    }

    #[test]
    fn resume_after_push_input_continues_execution() {
        let mut interp = Interpreter::new(Box::new(BufferedIo::new()));
        interp.load("citeste x\nscrie x\n");
        assert_eq!(interp.run(), ExecState::NeedsInput);
        // simulate host pushing input into the buffered backend
        interp.io.as_any_mut().downcast_mut::<BufferedIo>().unwrap().push_input("7".to_string());
        assert_eq!(interp.resume(), ExecState::Continue);
        assert_eq!(interp.run(), ExecState::Done);
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let (interp, state) = run_program("x <- 1 / 0\n");
        assert_eq!(state, ExecState::Error);
        assert!(interp.error().is_some());
    }

    #[test]
    fn request_stop_halts_execution() {
        let mut interp = Interpreter::new(Box::new(BufferedIo::new()));
        interp.load("cat timp 1 = 1 executa\nx <- 1\nsf\n");
        interp.request_stop();
        assert_eq!(interp.run(), ExecState::Done);
    }

    #[test]
    fn current_line_tracks_executing_statement() {
        let mut interp = Interpreter::new(Box::new(BufferedIo::new()));
        interp.load("x <- 1\ny <- 2\n");
        interp.step();
        assert_eq!(interp.current_line(), 1);
        interp.step();
        assert_eq!(interp.current_line(), 2);
    }
}
