use crate::error::Result;
use crate::kernel::{BooleanKernel, BooleanOp};
use crate::scene::{SceneStore, SolidId};

/// Overlap oracle: do two solids intersect?
///
/// Runs the kernel's intersection in transient mode and reports whether the
/// result carries any geometry. Neither operand is modified.
pub struct Intersects {
    solid_a: SolidId,
    solid_b: SolidId,
}

impl Intersects {
    /// Creates a new `Intersects` query.
    #[must_use]
    pub fn new(solid_a: SolidId, solid_b: SolidId) -> Self {
        Self { solid_a, solid_b }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if either solid is missing or the kernel fails.
    pub fn execute<K: BooleanKernel>(&self, store: &SceneStore, kernel: &K) -> Result<bool> {
        let a = store.solid(self.solid_a)?;
        let b = store.solid(self.solid_b)?;
        let probe = kernel.boolean(a, b, BooleanOp::Intersect)?;
        Ok(probe.is_some_and(|mesh| !mesh.is_empty()))
    }
}
