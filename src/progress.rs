//! Render progress.
//!
//! A single [`Progress`] is shared by every render task. Each task reports
//! exactly once when it ends, successful or not. The completion count, the
//! console line and the list of failed pages sit behind one lock, so
//! concurrent completions never lose an increment or interleave output.
//!
//! A failed page is logged while the lock is still held, after the bar line
//! has been ended, so the warning never lands in the middle of a frame.

use crate::output;
use crate::page::WriteError;
use log::warn;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct State<W> {
    completed: usize,
    failures: Vec<WriteError>,
    out: W,
}

pub struct Progress<W> {
    total: usize,
    state: Mutex<State<W>>,
}

impl<W: Write> Progress<W> {
    /// Track `total` tasks, drawing the bar on `out`.
    pub fn new(total: usize, out: W) -> Self {
        Self {
            total,
            state: Mutex::new(State {
                completed: 0,
                failures: Vec::new(),
                out,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<W>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count one finished task and redraw the bar. Returns the new count.
    ///
    /// The bar line is ended with a newline when a task fails and once the
    /// count reaches the total. Console errors are ignored: the bar is
    /// cosmetic.
    pub fn record_completion(&self, outcome: Result<(), WriteError>) -> usize {
        let mut state = self.lock();
        state.completed += 1;

        let completed = state.completed;
        let line = output::format_progress(completed, self.total);
        let _ = state.out.write_all(line.as_bytes());
        if outcome.is_err() || completed == self.total {
            let _ = state.out.write_all(b"\n");
        }
        let _ = state.out.flush();

        if let Err(e) = outcome {
            warn!("{}", e);
            state.failures.push(e);
        }
        completed
    }

    pub fn completed(&self) -> usize {
        self.lock().completed
    }

    /// Take the failures recorded so far.
    pub fn take_failures(&self) -> Vec<WriteError> {
        std::mem::take(&mut self.lock().failures)
    }
}
