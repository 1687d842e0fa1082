use super::*;

/// Mimics the evaluator: one frame per nested node.
fn nested_sum(depth: u32) -> u64 {
    ensure_sufficient_stack(|| {
        if depth == 0 {
            0
        } else {
            u64::from(depth) + nested_sum(depth - 1)
        }
    })
}

#[test]
fn shallow_nesting_runs_inline() {
    assert_eq!(nested_sum(10), 55);
}

#[test]
fn deep_nesting_does_not_overflow() {
    // Far deeper than the default 8MB main-thread stack would allow with
    // frames of this size.
    let depth = 200_000u32;
    assert_eq!(nested_sum(depth), u64::from(depth) * u64::from(depth + 1) / 2);
}

#[test]
fn passes_results_through() {
    let ok: Result<&str, String> = ensure_sufficient_stack(|| Ok("done"));
    assert_eq!(ok, Ok("done"));
    assert_eq!(grow_with(4096, 64 * 1024, || 7), 7);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn reports_remaining_stack_on_native() {
    assert!(remaining_stack().is_some_and(|left| left > 0));
}
