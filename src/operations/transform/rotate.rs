use crate::error::Result;
use crate::math::UnitQuaternion;
use crate::scene::{SceneStore, SolidId};

/// Sets a solid's pending orientation, replacing any uncommitted rotation.
pub struct Rotate {
    solid: SolidId,
    rotation: UnitQuaternion,
}

impl Rotate {
    /// Creates a new `Rotate` operation.
    #[must_use]
    pub fn new(solid: SolidId, rotation: UnitQuaternion) -> Self {
        Self { solid, rotation }
    }

    /// Executes the rotation, updating the solid's transform in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        store.solid_mut(self.solid)?.rotation = self.rotation;
        Ok(())
    }
}

/// Bakes a solid's pending rotation into its vertices.
///
/// Committed separately from translation so the placement policies can apply
/// an orientation about the origin without disturbing a previously settled
/// offset.
pub struct CommitRotation {
    solid: SolidId,
}

impl CommitRotation {
    /// Creates a new `CommitRotation` operation.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        store.solid_mut(self.solid)?.commit_rotation();
        Ok(())
    }
}
