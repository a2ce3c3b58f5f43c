//! Canonical monomer factories.
//!
//! Each factory produces one freshly constructed solid at a fixed reference
//! pose, as many times as the builder asks. The trait replaces runtime
//! capability probing: a shape either implements it or cannot be aggregated.

use std::f64::consts::FRAC_PI_3;

use crate::error::{ConfigError, Result};
use crate::math::Point3;
use crate::scene::{SceneStore, SolidData, SolidId, TriMesh};

/// Produces canonical monomer solids.
pub trait MonomerFactory {
    /// Creates one monomer at the reference pose and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be constructed.
    fn instantiate(&self, store: &mut SceneStore) -> Result<SolidId>;

    /// Parameter-encoding tag used in export filenames.
    fn label(&self) -> String;
}

/// A hexagonal prism centered at the origin with its long axis along z.
///
/// The canonical monomer for column aggregates; vertices sit at multiples of
/// 60 degrees starting on the +x axis.
#[derive(Debug, Clone, Copy)]
pub struct HexagonalColumn {
    length: f64,
    radius: f64,
}

impl HexagonalColumn {
    /// Creates a column factory.
    ///
    /// # Errors
    ///
    /// Returns an error if the length or radius is not positive.
    pub fn new(length: f64, radius: f64) -> Result<Self> {
        if length <= 0.0 {
            return Err(ConfigError::ParameterOutOfRange {
                parameter: "length",
                value: length,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        if radius <= 0.0 {
            return Err(ConfigError::ParameterOutOfRange {
                parameter: "radius",
                value: radius,
                min: 0.0,
                max: f64::INFINITY,
            }
            .into());
        }
        Ok(Self { length, radius })
    }

    /// Column length along the prism axis.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Circumscribed radius of the hexagonal cross-section.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn build_mesh(&self) -> TriMesh {
        let half = self.length / 2.0;
        let mut positions = Vec::with_capacity(12);
        for &z in &[-half, half] {
            for i in 0..6u32 {
                let angle = FRAC_PI_3 * f64::from(i);
                positions.push(Point3::new(
                    self.radius * angle.cos(),
                    self.radius * angle.sin(),
                    z,
                ));
            }
        }

        // Bottom ring 0..6, top ring 6..12.
        let mut triangles = Vec::with_capacity(20);
        for i in 0..6u32 {
            let j = (i + 1) % 6;
            // Side quad split into two triangles, outward-facing.
            triangles.push([i, j, i + 6]);
            triangles.push([j, j + 6, i + 6]);
        }
        // Caps as fans around vertex 0 (bottom) and 6 (top).
        for i in 1..5u32 {
            triangles.push([0, i + 1, i]);
            triangles.push([6, i + 6, i + 7]);
        }
        TriMesh::new(positions, triangles)
    }
}

impl MonomerFactory for HexagonalColumn {
    fn instantiate(&self, store: &mut SceneStore) -> Result<SolidId> {
        Ok(store.add_solid(SolidData::new(self.build_mesh())))
    }

    fn label(&self) -> String {
        format!(
            "hexagonal_column_l{}_r{}",
            fmt_param(self.length),
            fmt_param(self.radius)
        )
    }
}

/// Renders a numeric parameter for a filename, `.` becoming `p`.
pub(crate) fn fmt_param(value: f64) -> String {
    let s = format!("{value}");
    s.replace('.', "p")
}
