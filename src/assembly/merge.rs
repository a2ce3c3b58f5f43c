use tracing::debug;

use crate::error::{AssemblyError, Result};
use crate::kernel::{BooleanKernel, BooleanOp};
use crate::scene::{SceneStore, SolidData, SolidId};

/// Fuses a placed monomer into the aggregate.
///
/// The aggregate's entry is replaced by the boolean union under an identity
/// transform; the monomer's entry is removed, invalidating its handle. A
/// union that produces nothing, or that fails to grow the vertex count, is a
/// hard error: a silently failed fuse would poison every later measurement.
pub struct Merge {
    aggregate: SolidId,
    monomer: SolidId,
}

impl Merge {
    /// Creates a new `Merge` operation.
    #[must_use]
    pub fn new(aggregate: SolidId, monomer: SolidId) -> Self {
        Self { aggregate, monomer }
    }

    /// Executes the merge.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::MergeFailed`] if the kernel yields no
    /// geometry, [`AssemblyError::MergeAnomaly`] if the fused mesh did not
    /// grow, or any scene/kernel error.
    pub fn execute<K: BooleanKernel>(&self, store: &mut SceneStore, kernel: &K) -> Result<()> {
        let aggregate = store.solid(self.aggregate)?;
        let monomer = store.solid(self.monomer)?;
        let before = aggregate.mesh.positions.len();

        let fused = kernel
            .boolean(aggregate, monomer, BooleanOp::Union)?
            .ok_or(AssemblyError::MergeFailed)?;
        let after = fused.positions.len();
        if after <= before {
            return Err(AssemblyError::MergeAnomaly { before, after }.into());
        }
        debug!(before, after, "merged monomer into aggregate");

        *store.solid_mut(self.aggregate)? = SolidData::new(fused);
        store.remove_solid(self.monomer);
        Ok(())
    }
}
