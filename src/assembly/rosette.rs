//! Rosette assembly: columns joined base-first at a shared origin.

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};
use crate::factory::{HexagonalColumn, MonomerFactory};
use crate::kernel::BooleanKernel;
use crate::math::{UnitQuaternion, Vector3};
use crate::operations::transform::{CommitRotation, CommitTranslation, Rotate, Translate};
use crate::sampling::PoseSampler;
use crate::scene::{SceneStore, SolidId};

use super::merge::Merge;

/// The axis and dimensions of one placed column, kept for overlap checks
/// against later candidates.
#[derive(Debug, Clone, Copy)]
pub struct ColumnAxisRecord {
    /// Unit direction of the column's long axis.
    pub axis: Vector3,
    /// Circumscribed radius of the cross-section.
    pub radius: f64,
    /// Column length along the axis.
    pub length: f64,
}

/// Whether two origin-anchored columns crowd each other.
///
/// Opposite axis directions are folded together: a column along -z blocks a
/// candidate along +z just as a coaxial one would. Two columns overlap when
/// the half-angle between their (folded) axes is tighter than the clearance
/// their radii demand over the shorter length:
/// `sin(theta / 2) < (r1 + r2) / (2 * min(l1, l2))`.
#[must_use]
pub fn columns_overlap(a: &ColumnAxisRecord, b: &ColumnAxisRecord) -> bool {
    let dot = a.axis.dot(&b.axis).clamp(-1.0, 1.0);
    let theta = dot.abs().acos();
    (theta / 2.0).sin() < (a.radius + b.radius) / (2.0 * a.length.min(b.length))
}

fn column_axis(rotation: &UnitQuaternion) -> Vector3 {
    rotation * Vector3::z()
}

/// Validated parameters for one rosette build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosetteConfig {
    count: usize,
    max_attempts: usize,
    seed: Option<u64>,
}

impl RosetteConfig {
    /// Creates a config for `count` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero.
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(ConfigError::ParameterOutOfRange {
                parameter: "count",
                value: 0.0,
                min: 1.0,
                max: f64::INFINITY,
            }
            .into());
        }
        Ok(Self {
            count,
            max_attempts: 100,
            seed: None,
        })
    }

    /// Overrides the per-column orientation attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Seeds the orientation sampler for a reproducible rosette.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Requested number of columns.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Per-column orientation attempt budget.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The sampler seed, if any.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Outcome of a rosette build.
#[derive(Debug, Clone)]
pub struct RosetteReport {
    /// The fused rosette; `None` only if every column was skipped.
    pub aggregate: Option<SolidId>,
    /// Columns actually placed and fused.
    pub placed: usize,
    /// Columns dropped because no clear axis was found in budget.
    pub skipped: usize,
    /// Axis records of the placed columns, in placement order.
    pub records: Vec<ColumnAxisRecord>,
}

/// Builds a rosette of columns radiating from a shared origin.
///
/// Each column is anchored with its base at the origin and its long axis
/// along a sampled direction. A candidate direction is accepted only if it
/// clears every already-placed column; a column that exhausts its attempt
/// budget is skipped rather than failing the build.
pub struct RosetteBuilder<K> {
    config: RosetteConfig,
    factory: HexagonalColumn,
    kernel: K,
    sampler: PoseSampler,
}

impl<K: BooleanKernel> RosetteBuilder<K> {
    /// Creates a builder; the orientation sampler is seeded from the config.
    #[must_use]
    pub fn new(config: RosetteConfig, factory: HexagonalColumn, kernel: K) -> Self {
        let sampler = PoseSampler::new(config.seed());
        Self {
            config,
            factory,
            kernel,
            sampler,
        }
    }

    /// Runs the build.
    ///
    /// # Errors
    ///
    /// Returns an error if a merge fails or the kernel errors; skipped
    /// columns are not errors.
    pub fn build(mut self, store: &mut SceneStore) -> Result<RosetteReport> {
        let mut records: Vec<ColumnAxisRecord> = Vec::new();
        let mut aggregate: Option<SolidId> = None;
        let mut skipped = 0usize;

        for index in 0..self.config.count() {
            let Some((rotation, record)) = self.find_clear_orientation(&records) else {
                skipped += 1;
                warn!(
                    column = index,
                    budget = self.config.max_attempts(),
                    "no clear axis within attempt budget, skipping column"
                );
                continue;
            };

            let column = self.factory.instantiate(store)?;
            if let Err(err) = self.place_column(store, column, rotation, aggregate) {
                store.remove_solid(column);
                if let Some(agg) = aggregate {
                    store.remove_solid(agg);
                }
                return Err(err);
            }
            if aggregate.is_none() {
                aggregate = Some(column);
            }
            records.push(record);
            debug!(column = index, "placed rosette column");
        }

        info!(
            placed = records.len(),
            skipped, "rosette build complete"
        );
        Ok(RosetteReport {
            aggregate,
            placed: records.len(),
            skipped,
            records,
        })
    }

    /// Samples orientations until one clears every placed column. The first
    /// column is trivially clear on its first attempt.
    fn find_clear_orientation(
        &mut self,
        records: &[ColumnAxisRecord],
    ) -> Option<(UnitQuaternion, ColumnAxisRecord)> {
        for _ in 0..self.config.max_attempts() {
            let rotation = self.sampler.euler();
            let candidate = ColumnAxisRecord {
                axis: column_axis(&rotation),
                radius: self.factory.radius(),
                length: self.factory.length(),
            };
            if records.iter().all(|placed| !columns_overlap(placed, &candidate)) {
                return Some((rotation, candidate));
            }
        }
        None
    }

    /// Anchors the column base at the origin, orients it, and fuses it in.
    fn place_column(
        &self,
        store: &mut SceneStore,
        column: SolidId,
        rotation: UnitQuaternion,
        aggregate: Option<SolidId>,
    ) -> Result<()> {
        // Base at the origin: shift up by a half length, bake, then rotate
        // the baked positions about the origin.
        let lift = Vector3::new(0.0, 0.0, self.factory.length() / 2.0);
        Translate::new(column, lift).execute(store)?;
        CommitTranslation::new(column).execute(store)?;
        Rotate::new(column, rotation).execute(store)?;
        CommitRotation::new(column).execute(store)?;

        if let Some(agg) = aggregate {
            Merge::new(agg, column).execute(store, &self.kernel)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::SoupKernel;

    fn record(axis: Vector3, radius: f64, length: f64) -> ColumnAxisRecord {
        ColumnAxisRecord {
            axis: axis.normalize(),
            radius,
            length,
        }
    }

    #[test]
    fn coaxial_and_antiparallel_columns_overlap() {
        let up = record(Vector3::z(), 0.1, 2.0);
        let down = record(-Vector3::z(), 0.1, 2.0);
        assert!(columns_overlap(&up, &up));
        // Opposite directions fold onto the same line.
        assert!(columns_overlap(&up, &down));
    }

    #[test]
    fn thin_perpendicular_columns_are_clear() {
        let z = record(Vector3::z(), 0.1, 2.0);
        let x = record(Vector3::x(), 0.1, 2.0);
        // Half-angle 45 degrees, clearance threshold 0.05.
        assert!(!columns_overlap(&z, &x));
    }

    #[test]
    fn fat_columns_always_overlap() {
        // Threshold (2 + 2) / (2 * 2) = 1.0 exceeds every half-angle sine.
        let a = record(Vector3::z(), 2.0, 2.0);
        let b = record(Vector3::x(), 2.0, 2.0);
        assert!(columns_overlap(&a, &b));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(RosetteConfig::new(0).is_err());
        let config = RosetteConfig::new(6).unwrap();
        assert_eq!(config.max_attempts(), 100);
    }

    #[test]
    fn crowded_rosette_keeps_only_the_first_column() {
        let mut store = SceneStore::new();
        // Radius 2, length 2: every later candidate fails the clearance test.
        let factory = HexagonalColumn::new(2.0, 2.0).unwrap();
        let config = RosetteConfig::new(4).unwrap().with_seed(1);
        let report = RosetteBuilder::new(config, factory, SoupKernel::new())
            .build(&mut store)
            .unwrap();

        assert_eq!(report.placed, 1);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.records.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn thin_rosette_places_mutually_clear_columns() {
        let mut store = SceneStore::new();
        let factory = HexagonalColumn::new(2.0, 0.1).unwrap();
        let config = RosetteConfig::new(4).unwrap().with_seed(3);
        let report = RosetteBuilder::new(config, factory, SoupKernel::new())
            .build(&mut store)
            .unwrap();

        assert_eq!(report.placed + report.skipped, 4);
        assert!(report.placed >= 1);
        for (i, a) in report.records.iter().enumerate() {
            for b in &report.records[i + 1..] {
                assert!(!columns_overlap(a, b));
            }
        }
        // Soup union keeps every placed column's vertices.
        let aggregate = report.aggregate.unwrap();
        assert_eq!(
            store.solid(aggregate).unwrap().mesh.positions.len(),
            report.placed * 12
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn placed_columns_extend_outward_from_the_origin() {
        let mut store = SceneStore::new();
        let factory = HexagonalColumn::new(2.0, 0.1).unwrap();
        let config = RosetteConfig::new(1).unwrap().with_seed(7);
        let report = RosetteBuilder::new(config, factory, SoupKernel::new())
            .build(&mut store)
            .unwrap();

        let aggregate = report.aggregate.unwrap();
        let axis = report.records[0].axis;
        let solid = store.solid(aggregate).unwrap();
        // Every vertex projects onto [0, length] along the column axis.
        for p in solid.world_positions() {
            let t = p.coords.dot(&axis);
            assert!((-0.2..=2.2).contains(&t), "projection {t} out of range");
        }
    }
}
