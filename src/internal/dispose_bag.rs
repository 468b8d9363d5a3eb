//! Internal disposal bag for cleanup hooks.

/// Collects disposal hooks and runs them in LIFO order.
///
/// Each provider and each scope owns one bag. Hooks are registered by
/// factories through `register_disposer` and run when the owner closes:
/// last registered, first disposed, mirroring construction order.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    pub(crate) fn push(&mut self, hook: Box<dyn FnOnce() + Send>) {
        self.hooks.push(hook);
    }

    /// Runs and removes every hook, newest first.
    pub(crate) fn run_all_reverse(&mut self) {
        while let Some(hook) = self.hooks.pop() {
            hook();
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
