//! Stack growth for the tree-walking evaluator.
//!
//! Evaluation recurses once per nested node and once per script-level call,
//! so a deeply nested expression or a long (but bounded) recursion can run
//! past the native thread stack long before the engine's own call-depth
//! limit fires. Every recursive entry point in `act_eval` goes through
//! [`ensure_sufficient_stack`], which moves execution onto a freshly
//! allocated segment when the current one is nearly used up.
//!
//! On `wasm32` the helpers are plain passthroughs.
//!
//! ```text
//! fn evaluate(&mut self, node: ActionId) -> EvalResult {
//!     ensure_sufficient_stack(|| self.dispatch(node))
//! }
//! ```

/// Grow once less than this much stack remains (128KB).
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment (2MB).
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// within [`RED_ZONE`] of exhaustion.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    grow_with(RED_ZONE, SEGMENT_SIZE, f)
}

/// [`ensure_sufficient_stack`] with explicit thresholds.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn grow_with<R>(red_zone: usize, segment: usize, f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(red_zone, segment, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn grow_with<R>(_red_zone: usize, _segment: usize, f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes left on the current stack segment, when the platform can tell.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests;
