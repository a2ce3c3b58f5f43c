//! The aggregate-assembly engine.
//!
//! [`AggregateBuilder`] drives the build loop: sample an orientation, search
//! for a placement offset, fuse the monomer in, re-check the termination
//! criterion. [`RosetteBuilder`] is the anchored variant that joins columns at
//! a shared origin instead of stacking them.

pub mod builder;
pub mod contact;
pub mod merge;
pub mod rosette;

pub use builder::{AggregateBuilder, BuildReport};
pub use contact::{DescentReport, DescentSearch, ExactTouchSearch};
pub use merge::Merge;
pub use rosette::{columns_overlap, ColumnAxisRecord, RosetteBuilder, RosetteConfig, RosetteReport};

use crate::error::{ConfigError, Result};

/// When the build loop stops adding monomers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Termination {
    /// Stop once this many monomers have been placed.
    MonomerCount(usize),
    /// Stop once the aggregate's max planar diameter reaches this value,
    /// re-measured immediately after every merge.
    TargetDiameter(f64),
}

/// How a monomer makes contact with the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPolicy {
    /// Converge to a near-zero gap from above; deterministic, no retries.
    /// Uses the biased Euler orientation sampler.
    ExactTouch,
    /// Drop from above until intersection, re-orienting the aggregate and
    /// retrying on a miss. Uses the uniform SO(3) sampler.
    Overlapping,
}

/// Validated, immutable parameters for one build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildConfig {
    termination: Termination,
    binary_search_steps: usize,
    max_retries: usize,
    seed: Option<u64>,
}

impl BuildConfig {
    /// Validates the termination criterion: exactly one of `num_monomers` and
    /// `target_diameter` must be given.
    ///
    /// # Errors
    ///
    /// Returns an error if both or neither criterion is supplied, the count
    /// is zero, or the diameter is not positive.
    pub fn new(num_monomers: Option<usize>, target_diameter: Option<f64>) -> Result<Self> {
        let termination = match (num_monomers, target_diameter) {
            (None, None) => return Err(ConfigError::NoTermination.into()),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingTermination.into()),
            (Some(n), None) => {
                if n == 0 {
                    return Err(ConfigError::ParameterOutOfRange {
                        parameter: "num_monomers",
                        value: 0.0,
                        min: 1.0,
                        max: f64::INFINITY,
                    }
                    .into());
                }
                Termination::MonomerCount(n)
            }
            (None, Some(d)) => {
                if d <= 0.0 {
                    return Err(ConfigError::ParameterOutOfRange {
                        parameter: "target_diameter",
                        value: d,
                        min: 0.0,
                        max: f64::INFINITY,
                    }
                    .into());
                }
                Termination::TargetDiameter(d)
            }
        };
        Ok(Self {
            termination,
            binary_search_steps: 10,
            max_retries: 10,
            seed: None,
        })
    }

    /// Overrides the number of contact-search iterations.
    #[must_use]
    pub fn with_binary_search_steps(mut self, steps: usize) -> Self {
        self.binary_search_steps = steps;
        self
    }

    /// Overrides the descent retry budget.
    #[must_use]
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Seeds the orientation sampler for a reproducible build.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The termination criterion.
    #[must_use]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Number of contact-search iterations.
    #[must_use]
    pub fn binary_search_steps(&self) -> usize {
        self.binary_search_steps
    }

    /// Descent retry budget.
    #[must_use]
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// The sampler seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}
