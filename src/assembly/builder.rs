use tracing::{debug, info};

use crate::error::Result;
use crate::factory::MonomerFactory;
use crate::kernel::BooleanKernel;
use crate::math::UnitQuaternion;
use crate::operations::measure::PlanarDiameter;
use crate::operations::transform::{CommitRotation, CommitTranslation, Rotate};
use crate::sampling::{Pose, PoseSampler};
use crate::scene::{SceneStore, SolidId};

use super::contact::{DescentSearch, ExactTouchSearch};
use super::merge::Merge;
use super::{BuildConfig, ContactPolicy, Termination};

/// Outcome of a completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Handle of the finished aggregate.
    pub aggregate: SolidId,
    /// Monomers fused into the aggregate (including the first).
    pub monomers: usize,
    /// Merge operations performed; always `monomers - 1`.
    pub merges: usize,
    /// Total aggregate re-orientations spent on descent retries.
    pub reorientations: usize,
    /// Every sampled pose in order: aggregate tumbles carry a zero offset,
    /// monomer placements the offset the contact search settled on.
    pub poses: Vec<Pose>,
    /// Max planar diameter after the first placement and after each merge.
    pub diameters: Vec<f64>,
}

/// Orchestrates one build: sample orientation, search placement, merge,
/// evaluate termination, repeat.
///
/// The loop is an explicit state machine, `Empty -> Growing -> Done` with a
/// failure exit from `Growing`: any placement or merge error aborts the whole
/// build, tears down the working solids, and yields no aggregate. One builder
/// drives one build.
pub struct AggregateBuilder<F, K> {
    config: BuildConfig,
    policy: ContactPolicy,
    factory: F,
    kernel: K,
    sampler: PoseSampler,
}

/// Build-loop state with its accumulated progress.
enum Phase {
    Empty,
    Growing(Progress),
}

struct Progress {
    aggregate: SolidId,
    monomers: usize,
    merges: usize,
    reorientations: usize,
    poses: Vec<Pose>,
    diameters: Vec<f64>,
}

impl Progress {
    fn into_report(self) -> BuildReport {
        BuildReport {
            aggregate: self.aggregate,
            monomers: self.monomers,
            merges: self.merges,
            reorientations: self.reorientations,
            poses: self.poses,
            diameters: self.diameters,
        }
    }
}

impl<F: MonomerFactory, K: BooleanKernel> AggregateBuilder<F, K> {
    /// Creates a builder; the orientation sampler is seeded from the config.
    #[must_use]
    pub fn new(config: BuildConfig, policy: ContactPolicy, factory: F, kernel: K) -> Self {
        let sampler = PoseSampler::new(config.seed());
        Self {
            config,
            policy,
            factory,
            kernel,
            sampler,
        }
    }

    /// Runs the build to completion.
    ///
    /// # Errors
    ///
    /// Configuration has already been validated; this fails on search
    /// exhaustion, merge failure, or kernel errors, aborting the whole build.
    pub fn build(mut self, store: &mut SceneStore) -> Result<BuildReport> {
        let mut phase = Phase::Empty;

        loop {
            phase = match phase {
                Phase::Empty => Phase::Growing(self.place_first(store)?),
                Phase::Growing(mut progress) => {
                    if finished(self.config.termination(), &progress) {
                        info!(
                            monomers = progress.monomers,
                            merges = progress.merges,
                            "aggregate build complete"
                        );
                        return Ok(progress.into_report());
                    }
                    match self.grow_step(store, &mut progress) {
                        Ok(()) => Phase::Growing(progress),
                        Err(err) => {
                            // Failed: abandon the build as a whole.
                            store.remove_solid(progress.aggregate);
                            debug!("build failed, working solids torn down");
                            return Err(err);
                        }
                    }
                }
            };
        }
    }

    /// `Empty -> Growing`: the first monomer becomes the aggregate.
    fn place_first(&mut self, store: &mut SceneStore) -> Result<Progress> {
        let first = self.factory.instantiate(store)?;
        let rotation = self.sample_orientation();
        Rotate::new(first, rotation).execute(store)?;
        CommitRotation::new(first).execute(store)?;
        debug!("promoted first monomer to aggregate");

        let diameter = PlanarDiameter::new(first).execute(store)?.max();
        Ok(Progress {
            aggregate: first,
            monomers: 1,
            merges: 0,
            reorientations: 0,
            poses: vec![Pose {
                rotation,
                z_offset: 0.0,
            }],
            diameters: vec![diameter],
        })
    }

    /// One `Growing` cycle: instantiate, place, merge, re-measure.
    fn grow_step(&mut self, store: &mut SceneStore, progress: &mut Progress) -> Result<()> {
        let monomer = self.factory.instantiate(store)?;
        let placed = self.place_and_merge(store, progress, monomer);
        if placed.is_err() {
            // The merge may or may not have consumed the monomer already.
            store.remove_solid(monomer);
        }
        placed
    }

    fn place_and_merge(
        &mut self,
        store: &mut SceneStore,
        progress: &mut Progress,
        monomer: SolidId,
    ) -> Result<()> {
        let aggregate = progress.aggregate;

        match self.policy {
            ContactPolicy::ExactTouch => {
                // Tumble the aggregate, then lower the untouched monomer
                // onto it.
                let agg_rotation = self.sampler.euler();
                Rotate::new(aggregate, agg_rotation).execute(store)?;
                CommitRotation::new(aggregate).execute(store)?;
                progress.poses.push(Pose {
                    rotation: agg_rotation,
                    z_offset: 0.0,
                });

                let z_offset =
                    ExactTouchSearch::new(monomer, aggregate, self.config.binary_search_steps())
                        .execute(store, &self.kernel)?;
                CommitTranslation::new(monomer).execute(store)?;
                progress.poses.push(Pose {
                    rotation: UnitQuaternion::identity(),
                    z_offset,
                });
            }
            ContactPolicy::Overlapping => {
                let mono_rotation = self.sampler.quaternion();
                Rotate::new(monomer, mono_rotation).execute(store)?;
                CommitRotation::new(monomer).execute(store)?;

                let agg_rotation = self.sampler.quaternion();
                Rotate::new(aggregate, agg_rotation).execute(store)?;
                CommitRotation::new(aggregate).execute(store)?;
                progress.poses.push(Pose {
                    rotation: agg_rotation,
                    z_offset: 0.0,
                });

                let descent = DescentSearch::new(
                    monomer,
                    aggregate,
                    self.config.binary_search_steps(),
                    self.config.max_retries(),
                )
                .execute(store, &self.kernel, &mut self.sampler)?;
                CommitTranslation::new(monomer).execute(store)?;
                progress.reorientations += descent.reorientations;
                progress.poses.push(Pose {
                    rotation: mono_rotation,
                    z_offset: descent.z_offset,
                });
            }
        }

        Merge::new(aggregate, monomer).execute(store, &self.kernel)?;
        progress.merges += 1;
        progress.monomers += 1;

        let diameter = PlanarDiameter::new(aggregate).execute(store)?.max();
        progress.diameters.push(diameter);
        info!(
            monomer = progress.monomers,
            diameter, "placed and merged monomer"
        );
        Ok(())
    }

    fn sample_orientation(&mut self) -> UnitQuaternion {
        match self.policy {
            ContactPolicy::ExactTouch => self.sampler.euler(),
            ContactPolicy::Overlapping => self.sampler.quaternion(),
        }
    }
}

fn finished(termination: Termination, progress: &Progress) -> bool {
    match termination {
        Termination::MonomerCount(n) => progress.monomers >= n,
        Termination::TargetDiameter(target) => {
            // Checked on the measurement taken right after the latest merge;
            // never predicted ahead.
            progress
                .diameters
                .last()
                .is_some_and(|&diameter| diameter >= target)
        }
    }
}
