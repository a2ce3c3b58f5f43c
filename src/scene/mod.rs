pub mod mesh;
pub mod solid;

pub use mesh::TriMesh;
pub use solid::{SolidData, SolidId};

use crate::error::SceneError;
use slotmap::SlotMap;

/// Central arena that owns every solid in a build.
///
/// Solids reference each other via generational ids, so a handle to a merged
/// (destroyed) monomer fails loudly instead of silently resolving to
/// something else.
#[derive(Debug, Default)]
pub struct SceneStore {
    solids: SlotMap<SolidId, SolidData>,
}

impl SceneStore {
    /// Creates a new, empty scene store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solid and returns its ID.
    pub fn add_solid(&mut self, data: SolidData) -> SolidId {
        self.solids.insert(data)
    }

    /// Returns a reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid(&self, id: SolidId) -> Result<&SolidData, SceneError> {
        self.solids
            .get(id)
            .ok_or_else(|| SceneError::EntityNotFound("solid".into()))
    }

    /// Returns a mutable reference to the solid data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn solid_mut(&mut self, id: SolidId) -> Result<&mut SolidData, SceneError> {
        self.solids
            .get_mut(id)
            .ok_or_else(|| SceneError::EntityNotFound("solid".into()))
    }

    /// Removes a solid, invalidating its id.
    pub fn remove_solid(&mut self, id: SolidId) -> Option<SolidData> {
        self.solids.remove(id)
    }

    /// Number of solids currently alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` if the store holds no solids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}
