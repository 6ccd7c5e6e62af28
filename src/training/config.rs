use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use super::BatchTail;

const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(16).unwrap();
const DEFAULT_PRINT_STEP_MOD: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

/// The knobs of a `Trainer`. Every field may be omitted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// The amount of samples per mini-batch used by `train`.
    pub batch_size: NonZeroUsize,
    /// A progress line is logged every this many steps.
    pub print_step_mod: NonZeroUsize,
    pub verbose: bool,
    pub batch_tail: BatchTail,
    /// Seeds the batch permutations, drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            print_step_mod: DEFAULT_PRINT_STEP_MOD,
            verbose: true,
            batch_tail: BatchTail::default(),
            seed: None,
        }
    }
}
