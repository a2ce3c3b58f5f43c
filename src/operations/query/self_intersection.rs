use crate::error::Result;
use crate::kernel::soup_triangles_intersect;
use crate::math::TOLERANCE;
use crate::scene::{SceneStore, SolidId};

/// Detects self-intersecting faces in a solid.
///
/// Tests every pair of triangles that share no vertex; pairs meeting only at
/// shared vertices are legitimate adjacency, not defects. Used as a
/// post-assembly diagnostic: a soup-unioned aggregate of overlapping monomers
/// is expected to trip this, which the exporter reports as a warning.
pub struct SelfIntersection {
    solid: SolidId,
}

impl SelfIntersection {
    /// Creates a new `SelfIntersection` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning `true` if any disjoint triangle pair
    /// intersects.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is not in the store.
    pub fn execute(&self, store: &SceneStore) -> Result<bool> {
        let solid = store.solid(self.solid)?;
        let positions = solid.world_positions();
        let tris = &solid.mesh.triangles;

        for (i, ta) in tris.iter().enumerate() {
            for tb in &tris[i + 1..] {
                if shares_vertex(*ta, *tb) {
                    continue;
                }
                if soup_triangles_intersect(
                    &positions[ta[0] as usize],
                    &positions[ta[1] as usize],
                    &positions[ta[2] as usize],
                    &positions[tb[0] as usize],
                    &positions[tb[1] as usize],
                    &positions[tb[2] as usize],
                    TOLERANCE,
                ) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

fn shares_vertex(a: [u32; 3], b: [u32; 3]) -> bool {
    a.iter().any(|v| b.contains(v))
}
