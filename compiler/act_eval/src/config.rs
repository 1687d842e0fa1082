//! Engine configuration.

use tracing::warn;

/// Default ceiling on nested script calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 2_500;

/// Default seed of the `Math.random` generator.
pub const DEFAULT_RANDOM_SEED: u64 = 0x5EED_A11C_E5EE_D001;

const MAX_CALL_DEPTH_VAR: &str = "ACT_MAX_CALL_DEPTH";
const RANDOM_SEED_VAR: &str = "ACT_RANDOM_SEED";

/// Tunables of one [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Calls nested deeper than this fail with a `RangeError`.
    pub max_call_depth: usize,
    /// Seed for `Math.random`; the same seed replays the same sequence.
    pub random_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `ACT_MAX_CALL_DEPTH` / `ACT_RANDOM_SEED`.
    ///
    /// Malformed values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(MAX_CALL_DEPTH_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_call_depth = depth,
                _ => warn!(variable = MAX_CALL_DEPTH_VAR, value = %raw, "ignoring invalid call depth"),
            }
        }
        if let Some(raw) = lookup(RANDOM_SEED_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.random_seed = seed,
                Err(_) => warn!(variable = RANDOM_SEED_VAR, value = %raw, "ignoring invalid random seed"),
            }
        }
        config
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }
}
