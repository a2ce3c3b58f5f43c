//! Wavefront OBJ export of finished solids.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::assembly::{ContactPolicy, Termination};
use crate::error::{ExportError, Result};
use crate::operations::query::SelfIntersection;
use crate::scene::{SceneStore, SolidData, SolidId};

/// Writes a solid's world-space mesh to `<directory>/<stem>_<token>.obj`.
///
/// The token is a fresh 8-character hex id, so repeated exports of the same
/// build never collide. The mesh is checked for self-intersections first;
/// a hit is logged and the export proceeds, since soup-unioned aggregates of
/// overlapping monomers trip the check by construction.
pub struct ObjExport {
    solid: SolidId,
    directory: PathBuf,
    stem: String,
}

impl ObjExport {
    /// Creates a new `ObjExport` operation.
    #[must_use]
    pub fn new(solid: SolidId, directory: impl AsRef<Path>, stem: impl Into<String>) -> Self {
        Self {
            solid,
            directory: directory.as_ref().to_path_buf(),
            stem: stem.into(),
        }
    }

    /// Executes the export, returning the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing or the file cannot be
    /// written.
    pub fn execute(&self, store: &SceneStore) -> Result<PathBuf> {
        if SelfIntersection::new(self.solid).execute(store)? {
            warn!(stem = %self.stem, "mesh self-intersects, exporting anyway");
        }
        let solid = store.solid(self.solid)?;

        fs::create_dir_all(&self.directory).map_err(ExportError::Io)?;
        let token = Uuid::new_v4().simple().to_string();
        let path = self
            .directory
            .join(format!("{}_{}.obj", self.stem, &token[..8]));

        write_obj(&path, &self.stem, solid).map_err(ExportError::Io)?;
        info!(path = %path.display(), "exported solid");
        Ok(path)
    }
}

fn write_obj(path: &Path, name: &str, solid: &SolidData) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "o {name}")?;
    for p in solid.world_positions() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for t in &solid.mesh.triangles {
        // OBJ indices are 1-based.
        writeln!(out, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1)?;
    }
    out.flush()
}

/// Filename stem for a stacked aggregate: policy, termination, monomer
/// parameters, and the seed when the build was reproducible.
#[must_use]
pub fn aggregate_stem(
    policy: ContactPolicy,
    termination: Termination,
    label: &str,
    seed: Option<u64>,
) -> String {
    let base = match policy {
        ContactPolicy::ExactTouch => "aggregate",
        ContactPolicy::Overlapping => "aggregate_intersecting",
    };
    let criterion = match termination {
        Termination::MonomerCount(n) => format!("n{n}"),
        Termination::TargetDiameter(d) => format!("d{}", fmt_diameter(d)),
    };
    let mut stem = format!("{base}_{criterion}_{label}");
    if let Some(seed) = seed {
        stem.push_str(&format!("_s{seed}"));
    }
    stem
}

/// Filename stem for a rosette: column count, monomer parameters, seed.
#[must_use]
pub fn rosette_stem(count: usize, label: &str, seed: Option<u64>) -> String {
    let mut stem = format!("rosette_n{count}_{label}");
    if let Some(seed) = seed {
        stem.push_str(&format!("_s{seed}"));
    }
    stem
}

fn fmt_diameter(value: f64) -> String {
    format!("{value:.1}").replace('.', "p")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::factory::{HexagonalColumn, MonomerFactory};

    #[test]
    fn export_writes_vertices_and_faces() {
        let mut store = SceneStore::new();
        let solid = HexagonalColumn::new(2.0, 1.0)
            .unwrap()
            .instantiate(&mut store)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = ObjExport::new(solid, dir.path(), "column")
            .execute(&store)
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("column_"));
        assert!(name.ends_with(".obj"));
        // stem + '_' + 8-char token + extension
        assert_eq!(name.len(), "column_".len() + 8 + ".obj".len());

        let body = fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().filter(|l| l.starts_with("v ")).count(), 12);
        assert_eq!(body.lines().filter(|l| l.starts_with("f ")).count(), 20);
        assert!(body.lines().all(|l| {
            !l.starts_with("f ")
                || l.split_whitespace()
                    .skip(1)
                    .all(|i| i.parse::<usize>().unwrap() >= 1)
        }));
    }

    #[test]
    fn repeated_exports_never_collide() {
        let mut store = SceneStore::new();
        let solid = HexagonalColumn::new(2.0, 1.0)
            .unwrap()
            .instantiate(&mut store)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();

        let export = ObjExport::new(solid, dir.path(), "column");
        let first = export.execute(&store).unwrap();
        let second = export.execute(&store).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn stems_encode_the_build_parameters() {
        assert_eq!(
            aggregate_stem(
                ContactPolicy::ExactTouch,
                Termination::MonomerCount(10),
                "hexagonal_column_l2_r1",
                Some(7),
            ),
            "aggregate_n10_hexagonal_column_l2_r1_s7"
        );
        assert_eq!(
            aggregate_stem(
                ContactPolicy::Overlapping,
                Termination::TargetDiameter(50.0),
                "hexagonal_column_l2_r1",
                None,
            ),
            "aggregate_intersecting_d50p0_hexagonal_column_l2_r1"
        );
        assert_eq!(
            rosette_stem(6, "hexagonal_column_l2_r0p1", Some(3)),
            "rosette_n6_hexagonal_column_l2_r0p1_s3"
        );
    }
}
