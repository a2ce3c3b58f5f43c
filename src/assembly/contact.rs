//! Contact searches along the placement (z) axis.

use tracing::debug;

use crate::error::{AssemblyError, Result};
use crate::kernel::BooleanKernel;
use crate::math::Vector3;
use crate::operations::measure::BoundingBox;
use crate::operations::query::Intersects;
use crate::operations::transform::{CommitRotation, Rotate, Translate};
use crate::sampling::PoseSampler;
use crate::scene::{SceneStore, SolidId};

/// Converges a monomer onto the aggregate from above, leaving a near-zero
/// gap.
///
/// The monomer starts with its box center above the aggregate's box center by
/// the sum of their half heights, then a bounded binary search nudges it up
/// on intersection and down otherwise. After `steps` iterations the remaining
/// gap is at most (monomer half-height) / 2^(steps-1). Deterministic; no
/// randomness beyond the orientations already applied.
pub struct ExactTouchSearch {
    monomer: SolidId,
    aggregate: SolidId,
    steps: usize,
}

impl ExactTouchSearch {
    /// Creates a new `ExactTouchSearch`.
    #[must_use]
    pub fn new(monomer: SolidId, aggregate: SolidId, steps: usize) -> Self {
        Self {
            monomer,
            aggregate,
            steps,
        }
    }

    /// Runs the search, returning the net z offset applied to the monomer.
    ///
    /// # Errors
    ///
    /// Returns an error if either solid is missing or the kernel fails.
    pub fn execute<K: BooleanKernel>(&self, store: &mut SceneStore, kernel: &K) -> Result<f64> {
        let mono = BoundingBox::new(self.monomer).execute(store)?;
        let agg = BoundingBox::new(self.aggregate).execute(store)?;
        let mono_h = mono.z_height();

        let start = agg.center().z + (agg.z_height() + mono_h) / 2.0 - mono.center().z;
        Translate::new(self.monomer, Vector3::new(0.0, 0.0, start)).execute(store)?;
        let mut offset = start;

        let mut step = mono_h / 2.0;
        for i in 0..self.steps {
            let hit = Intersects::new(self.monomer, self.aggregate).execute(store, kernel)?;
            let delta = if hit { step } else { -step };
            Translate::new(self.monomer, Vector3::new(0.0, 0.0, delta)).execute(store)?;
            offset += delta;
            debug!(iteration = i, step, hit, "exact-touch probe");
            step /= 2.0;
        }
        Ok(offset)
    }
}

/// Outcome of a successful descent search.
#[derive(Debug, Clone, Copy)]
pub struct DescentReport {
    /// How many times the aggregate was re-oriented before the hit; attempt
    /// k succeeds after exactly k-1 re-orientations.
    pub reorientations: usize,
    /// Net z offset applied to the monomer.
    pub z_offset: f64,
}

/// Drops a monomer from above the aggregate until intersection.
///
/// An explicit bounded attempt loop: each attempt places the monomer well
/// above the aggregate and walks it down in halving steps, accepting the
/// first intersecting position outright (a strictly decreasing probe, not a
/// converging bisection). A missed attempt re-samples the aggregate's global
/// orientation and tries again; exhausting the budget fails the whole build.
pub struct DescentSearch {
    monomer: SolidId,
    aggregate: SolidId,
    steps: usize,
    max_retries: usize,
}

impl DescentSearch {
    /// Creates a new `DescentSearch`.
    #[must_use]
    pub fn new(monomer: SolidId, aggregate: SolidId, steps: usize, max_retries: usize) -> Self {
        Self {
            monomer,
            aggregate,
            steps,
            max_retries,
        }
    }

    /// Runs the search.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::SearchExhausted`] if no intersection is found
    /// within `max_retries` full descents, or any scene/kernel error.
    pub fn execute<K: BooleanKernel>(
        &self,
        store: &mut SceneStore,
        kernel: &K,
        sampler: &mut PoseSampler,
    ) -> Result<DescentReport> {
        let mut offset = 0.0;

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                let q = sampler.quaternion();
                Rotate::new(self.aggregate, q).execute(store)?;
                CommitRotation::new(self.aggregate).execute(store)?;
                debug!(attempt, "re-oriented aggregate for retry");
            }

            let mono = BoundingBox::new(self.monomer).execute(store)?;
            let agg = BoundingBox::new(self.aggregate).execute(store)?;
            let mono_h = mono.z_height();

            // Start well above: monomer box center a full monomer height
            // past the aggregate's top.
            let lift = agg.max.z + mono_h - mono.center().z;
            Translate::new(self.monomer, Vector3::new(0.0, 0.0, lift)).execute(store)?;
            offset += lift;

            let mut step = agg.z_height() + mono_h;
            for i in 0..self.steps {
                Translate::new(self.monomer, Vector3::new(0.0, 0.0, -step)).execute(store)?;
                offset -= step;

                if Intersects::new(self.monomer, self.aggregate).execute(store, kernel)? {
                    debug!(attempt, iteration = i, "descent hit");
                    return Ok(DescentReport {
                        reorientations: attempt - 1,
                        z_offset: offset,
                    });
                }
                step /= 2.0;
            }
        }

        Err(AssemblyError::SearchExhausted {
            attempts: self.max_retries,
        }
        .into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{AssemblyError, CristalisError};
    use crate::factory::{HexagonalColumn, MonomerFactory};
    use crate::kernel::SoupKernel;
    use crate::operations::measure::BoundingBox;

    // Different sizes keep the prisms' faces out of each other's planes, so
    // the soup probe sees every genuine overlap.
    fn two_columns(store: &mut SceneStore) -> (SolidId, SolidId) {
        let aggregate = HexagonalColumn::new(3.0, 1.4)
            .unwrap()
            .instantiate(store)
            .unwrap();
        let monomer = HexagonalColumn::new(2.0, 1.0)
            .unwrap()
            .instantiate(store)
            .unwrap();
        (monomer, aggregate)
    }

    #[test]
    fn exact_touch_gap_is_within_the_bound() {
        let mut store = SceneStore::new();
        let (monomer, aggregate) = two_columns(&mut store);
        let kernel = SoupKernel::new();
        let steps = 10;

        ExactTouchSearch::new(monomer, aggregate, steps)
            .execute(&mut store, &kernel)
            .unwrap();

        let mono = BoundingBox::new(monomer).execute(&store).unwrap();
        let agg = BoundingBox::new(aggregate).execute(&store).unwrap();
        let gap = mono.min.z - agg.max.z;
        // Half-height 1.0, 10 steps: |gap| <= 1.0 / 2^9.
        let bound = 1.0 / 2f64.powi(steps as i32 - 1);
        assert!(
            gap.abs() <= bound + 1e-12,
            "gap {gap} exceeds bound {bound}"
        );
    }

    #[test]
    fn descent_finds_intersection_without_retries() {
        let mut store = SceneStore::new();
        let (monomer, aggregate) = two_columns(&mut store);
        let kernel = SoupKernel::new();
        let mut sampler = PoseSampler::new(Some(1));

        let report = DescentSearch::new(monomer, aggregate, 10, 10)
            .execute(&mut store, &kernel, &mut sampler)
            .unwrap();
        assert_eq!(report.reorientations, 0);

        // The accepted position actually intersects.
        assert!(Intersects::new(monomer, aggregate)
            .execute(&store, &kernel)
            .unwrap());
    }

    #[test]
    fn success_on_the_second_attempt_reports_one_reorientation() {
        // Misses every probe of the first descent, hits the first probe of
        // the second.
        struct Flaky {
            misses: std::cell::Cell<usize>,
        }
        impl crate::kernel::BooleanKernel for Flaky {
            fn boolean(
                &self,
                _a: &crate::scene::SolidData,
                _b: &crate::scene::SolidData,
                op: crate::kernel::BooleanOp,
            ) -> std::result::Result<Option<crate::scene::TriMesh>, crate::error::KernelError>
            {
                match op {
                    crate::kernel::BooleanOp::Intersect => {
                        if self.misses.get() > 0 {
                            self.misses.set(self.misses.get() - 1);
                            Ok(None)
                        } else {
                            Ok(Some(crate::scene::TriMesh::new(
                                vec![crate::math::Point3::origin(); 3],
                                vec![[0, 1, 2]],
                            )))
                        }
                    }
                    crate::kernel::BooleanOp::Union => Ok(Some(crate::scene::TriMesh::default())),
                }
            }
        }

        let mut store = SceneStore::new();
        let (monomer, aggregate) = two_columns(&mut store);
        let kernel = Flaky {
            misses: std::cell::Cell::new(3),
        };
        let mut sampler = PoseSampler::new(Some(1));

        let report = DescentSearch::new(monomer, aggregate, 3, 10)
            .execute(&mut store, &kernel, &mut sampler)
            .unwrap();
        assert_eq!(report.reorientations, 1);
    }

    #[test]
    fn zero_retry_budget_exhausts_immediately() {
        let mut store = SceneStore::new();
        let (monomer, aggregate) = two_columns(&mut store);
        let kernel = SoupKernel::new();
        let mut sampler = PoseSampler::new(Some(1));

        let result = DescentSearch::new(monomer, aggregate, 10, 0).execute(
            &mut store,
            &kernel,
            &mut sampler,
        );
        assert!(matches!(
            result,
            Err(CristalisError::Assembly(AssemblyError::SearchExhausted {
                attempts: 0
            }))
        ));
    }

    #[test]
    fn exhaustion_reports_the_attempt_budget() {
        let mut store = SceneStore::new();
        let (monomer, aggregate) = two_columns(&mut store);
        // A kernel that never sees an intersection.
        struct Disjoint;
        impl crate::kernel::BooleanKernel for Disjoint {
            fn boolean(
                &self,
                _a: &crate::scene::SolidData,
                _b: &crate::scene::SolidData,
                op: crate::kernel::BooleanOp,
            ) -> std::result::Result<Option<crate::scene::TriMesh>, crate::error::KernelError>
            {
                match op {
                    crate::kernel::BooleanOp::Intersect => Ok(None),
                    crate::kernel::BooleanOp::Union => Ok(Some(crate::scene::TriMesh::default())),
                }
            }
        }
        let mut sampler = PoseSampler::new(Some(1));

        let result =
            DescentSearch::new(monomer, aggregate, 3, 4).execute(&mut store, &Disjoint, &mut sampler);
        assert!(matches!(
            result,
            Err(CristalisError::Assembly(AssemblyError::SearchExhausted {
                attempts: 4
            }))
        ));
    }
}
