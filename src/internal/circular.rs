//! Circular dependency detection.
//!
//! Resolution keeps a thread-local stack of the identifiers currently being
//! resolved. Entering a resolution pushes the identifier; seeing an
//! identifier that is already on the stack means the dependency graph loops
//! back on itself, and resolution aborts with the full path.

use std::cell::RefCell;
use std::panic;

const MAX_DEPTH: usize = 1024;

#[cfg(feature = "smallvec")]
type PathVec = smallvec::SmallVec<[&'static str; 8]>;
#[cfg(not(feature = "smallvec"))]
type PathVec = Vec<&'static str>;

thread_local! {
    static RESOLVE_STACK: RefCell<PathVec> = RefCell::new(PathVec::new());
}

/// Panic payload carrying a detected dependency cycle.
///
/// The path lists every identifier on the resolution stack when the cycle
/// was found, ending with the repeated identifier, e.g.
/// `["ServiceA", "ServiceB", "ServiceA"]`. The payload is raised at the
/// point of detection and caught by the nearest enclosing resolution frame,
/// which converts it into [`DiError::Circular`](crate::DiError::Circular);
/// it only escapes as a panic if user code circumvents the resolver.
#[derive(Debug)]
pub struct CircularPanic {
    /// The complete identifier path forming the cycle.
    pub path: Box<[&'static str]>,
}

// Pushes `name` for the lifetime of the guard. The pop in `Drop` runs on
// both the ordinary return path and during panic unwinding, so the stack
// stays consistent whichever way a resolution frame exits.
struct StackGuard {
    name: &'static str,
}

impl StackGuard {
    fn new(name: &'static str) -> Self {
        RESOLVE_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            // Cycle check happens before pushing, so the repeated name
            // appears exactly twice in the reported path.
            if stack.iter().any(|&frame| frame == name) {
                let mut path = stack.to_vec();
                path.push(name);
                panic::panic_any(CircularPanic {
                    path: path.into_boxed_slice(),
                });
            }

            if stack.len() >= MAX_DEPTH {
                panic::panic_any(crate::error::DiError::DepthExceeded(stack.len()));
            }

            stack.push(name);
        });

        Self { name }
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLVE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.name));
        });
    }
}

/// Runs `f` with `name` pushed onto the resolution stack, converting a
/// [`CircularPanic`] or depth-limit panic raised anywhere beneath it into
/// the matching [`DiError`](crate::DiError). Any other panic resumes
/// unwinding untouched.
pub(crate) fn with_circular_catch<T, F>(name: &'static str, f: F) -> crate::error::DiResult<T>
where
    F: FnOnce() -> crate::error::DiResult<T>,
{
    use std::panic::AssertUnwindSafe;

    let _guard = StackGuard::new(name);

    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            if let Some(circular) = payload.downcast_ref::<CircularPanic>() {
                Err(crate::error::DiError::Circular(circular.path.to_vec()))
            } else if let Some(err) = payload.downcast_ref::<crate::error::DiError>() {
                Err(err.clone())
            } else {
                panic::resume_unwind(payload);
            }
        }
    }
}
