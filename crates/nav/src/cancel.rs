//! Single-threaded cancellation tokens.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Hook = Box<dyn FnOnce()>;

#[derive(Default)]
struct Inner {
    cancelled: Cell<bool>,
    completed: Cell<bool>,
    hooks: RefCell<Vec<Hook>>,
}

/// A cancellation token shared by the navigator and one in-flight request.
///
/// Clones share state. Hooks registered with [`Cancellation::on_cancel`]
/// run once, on the first `cancel()` before the request completes.
#[derive(Clone, Default)]
pub struct Cancellation {
    inner: Rc<Inner>,
}

impl Cancellation {
    /// Create a new cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Request cancellation and run the registered hooks.
    ///
    /// Cancelling twice, or after [`Cancellation::complete`], runs nothing.
    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) || self.inner.completed.get() {
            return;
        }
        let hooks = self.inner.hooks.take();
        for hook in hooks {
            hook();
        }
    }

    /// Registers a hook to run on cancellation. Runs it immediately if the
    /// token is already cancelled and not yet completed.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.inner.completed.get() {
            return;
        }
        if self.is_cancelled() {
            hook();
        } else {
            self.inner.hooks.borrow_mut().push(Box::new(hook));
        }
    }

    /// Marks the guarded request as finished and drops pending hooks.
    pub fn complete(&self) {
        self.inner.completed.set(true);
        self.inner.hooks.take();
    }
}

impl fmt::Debug for Cancellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cancellation")
            .field("cancelled", &self.is_cancelled())
            .field("completed", &self.inner.completed.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_token_not_cancelled() {
        let token = Cancellation::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn clone_shares_state() {
        let token1 = Cancellation::new();
        let token2 = token1.clone();
        token1.cancel();
        assert!(token2.is_cancelled());
    }

    #[test]
    fn hooks_run_once() {
        let token = Cancellation::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        token.on_cancel(move || counter.set(counter.get() + 1));

        token.cancel();
        token.cancel();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn hook_registered_after_cancel_runs_immediately() {
        let token = Cancellation::new();
        token.cancel();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        token.on_cancel(move || flag.set(true));
        assert!(ran.get());
    }

    #[test]
    fn cancel_after_complete_runs_nothing() {
        let token = Cancellation::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        token.on_cancel(move || flag.set(true));

        token.complete();
        token.cancel();
        assert!(!ran.get());
        assert!(token.is_cancelled());
    }
}
