use crate::error::Result;
use crate::math::Vector3;
use crate::scene::{SceneStore, SolidId};

/// Adds a displacement to a solid's pending translation.
pub struct Translate {
    solid: SolidId,
    displacement: Vector3,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(solid: SolidId, displacement: Vector3) -> Self {
        Self {
            solid,
            displacement,
        }
    }

    /// Executes the translation, updating the solid's transform in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        store.solid_mut(self.solid)?.translation += self.displacement;
        Ok(())
    }
}

/// Bakes a solid's pending translation into its vertices.
pub struct CommitTranslation {
    solid: SolidId,
}

impl CommitTranslation {
    /// Creates a new `CommitTranslation` operation.
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
        store.solid_mut(self.solid)?.commit_translation();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::factory::{HexagonalColumn, MonomerFactory};
    use crate::operations::measure::BoundingBox;
    use approx::assert_relative_eq;

    #[test]
    fn translations_accumulate_and_commit() {
        let mut store = SceneStore::new();
        let solid = HexagonalColumn::new(2.0, 1.0)
            .unwrap()
            .instantiate(&mut store)
            .unwrap();

        Translate::new(solid, Vector3::new(0.0, 0.0, 3.0))
            .execute(&mut store)
            .unwrap();
        Translate::new(solid, Vector3::new(0.0, 0.0, -1.0))
            .execute(&mut store)
            .unwrap();
        CommitTranslation::new(solid).execute(&mut store).unwrap();

        let data = store.solid(solid).unwrap();
        assert_eq!(data.translation, Vector3::zeros());

        let aabb = BoundingBox::new(solid).execute(&store).unwrap();
        assert_relative_eq!(aabb.center().z, 2.0, epsilon = 1e-12);
    }
}
