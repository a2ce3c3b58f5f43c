//! Reference boolean kernel operating on triangle soups.
//!
//! INTERSECT is an emptiness probe: it returns the triangles of `a` that
//! cross `b`'s surface, or a copy of whichever operand is fully contained in
//! the other. That is the full intersection's support, which is all the
//! overlap oracle inspects; it is not a watertight CSG evaluation. UNION
//! concatenates both soups, which downstream voxelization consumes directly.
//! An exact kernel can be slotted in behind [`BooleanKernel`](super::BooleanKernel).

use crate::error::KernelError;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::scene::{SolidData, TriMesh};

use super::{BooleanKernel, BooleanOp};

/// Triangle-soup boolean kernel.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoupKernel;

impl SoupKernel {
    /// Creates the kernel.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BooleanKernel for SoupKernel {
    fn boolean(
        &self,
        a: &SolidData,
        b: &SolidData,
        op: BooleanOp,
    ) -> Result<Option<TriMesh>, KernelError> {
        let wa = WorldSoup::from_solid(a);
        let wb = WorldSoup::from_solid(b);
        match op {
            BooleanOp::Union => Ok(Some(concatenate(&wa, &wb))),
            BooleanOp::Intersect => Ok(intersection_support(&wa, &wb)),
        }
    }
}

/// A solid's triangles resolved into world space.
struct WorldSoup {
    positions: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
    min: Point3,
    max: Point3,
}

impl WorldSoup {
    fn from_solid(solid: &SolidData) -> Self {
        let positions = solid.world_positions();
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Self {
            positions,
            triangles: solid.mesh.triangles.clone(),
            min,
            max,
        }
    }

    fn tri(&self, t: [u32; 3]) -> (&Point3, &Point3, &Point3) {
        (
            &self.positions[t[0] as usize],
            &self.positions[t[1] as usize],
            &self.positions[t[2] as usize],
        )
    }

    fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
    }

    fn boxes_disjoint(&self, other: &Self) -> bool {
        (0..3).any(|i| self.max[i] < other.min[i] - TOLERANCE || other.max[i] < self.min[i] - TOLERANCE)
    }
}

fn concatenate(a: &WorldSoup, b: &WorldSoup) -> TriMesh {
    let mut positions = a.positions.clone();
    let mut triangles = a.triangles.clone();
    let offset = u32::try_from(positions.len()).unwrap_or(u32::MAX);
    positions.extend_from_slice(&b.positions);
    triangles.extend(
        b.triangles
            .iter()
            .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
    );
    TriMesh::new(positions, triangles)
}

fn intersection_support(a: &WorldSoup, b: &WorldSoup) -> Option<TriMesh> {
    if a.is_empty() || b.is_empty() || a.boxes_disjoint(b) {
        return None;
    }

    // Surface crossings: triangles of `a` that intersect any triangle of `b`.
    let mut crossing: Vec<[u32; 3]> = Vec::new();
    for &ta in &a.triangles {
        let (a0, a1, a2) = a.tri(ta);
        let (tmin, tmax) = triangle_bounds(a0, a1, a2);
        for &tb in &b.triangles {
            let (b0, b1, b2) = b.tri(tb);
            let (bmin, bmax) = triangle_bounds(b0, b1, b2);
            if (0..3).any(|i| tmax[i] < bmin[i] - TOLERANCE || bmax[i] < tmin[i] - TOLERANCE) {
                continue;
            }
            if triangles_intersect(a0, a1, a2, b0, b1, b2, TOLERANCE) {
                crossing.push(ta);
                break;
            }
        }
    }
    if !crossing.is_empty() {
        return Some(TriMesh::new(a.positions.clone(), crossing));
    }

    // No surface crossing: one soup may still sit entirely inside the other.
    if point_in_soup(&a.positions[0], b) {
        return Some(TriMesh::new(a.positions.clone(), a.triangles.clone()));
    }
    if point_in_soup(&b.positions[0], a) {
        return Some(TriMesh::new(b.positions.clone(), b.triangles.clone()));
    }
    None
}

fn triangle_bounds(v0: &Point3, v1: &Point3, v2: &Point3) -> (Point3, Point3) {
    let mut min = *v0;
    let mut max = *v0;
    for v in [v1, v2] {
        for i in 0..3 {
            min[i] = min[i].min(v[i]);
            max[i] = max[i].max(v[i]);
        }
    }
    (min, max)
}

/// Ray-triangle intersection using Möller-Trumbore.
///
/// Returns `Some(t)` with the ray parameter at the hit, or `None`.
fn ray_triangle_intersect(
    origin: &Point3,
    direction: &Vector3,
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    epsilon: f64,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < epsilon {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t > epsilon {
        Some(t)
    } else {
        None
    }
}

/// Test if an edge crosses a triangle's interior.
fn edge_triangle_intersect(
    e0: &Point3,
    e1: &Point3,
    v0: &Point3,
    v1: &Point3,
    v2: &Point3,
    epsilon: f64,
) -> bool {
    let direction = e1 - e0;
    if direction.norm_squared() < epsilon * epsilon {
        return false;
    }

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < epsilon {
        return false;
    }

    let f = 1.0 / a;
    let s = e0 - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return false;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return false;
    }

    let t = f * edge2.dot(&q);
    (-epsilon..=1.0 + epsilon).contains(&t)
}

/// Test if two triangles intersect, via edge-triangle tests on all 6 edges.
pub(crate) fn triangles_intersect(
    a0: &Point3,
    a1: &Point3,
    a2: &Point3,
    b0: &Point3,
    b1: &Point3,
    b2: &Point3,
    epsilon: f64,
) -> bool {
    let edges_a = [(a0, a1), (a1, a2), (a2, a0)];
    for (e0, e1) in &edges_a {
        if edge_triangle_intersect(e0, e1, b0, b1, b2, epsilon) {
            return true;
        }
    }
    let edges_b = [(b0, b1), (b1, b2), (b2, b0)];
    for (e0, e1) in &edges_b {
        if edge_triangle_intersect(e0, e1, a0, a1, a2, epsilon) {
            return true;
        }
    }
    false
}

/// Point-in-solid test by ray-crossing parity along +x.
fn point_in_soup(p: &Point3, soup: &WorldSoup) -> bool {
    let dir = Vector3::x();
    let mut crossings = 0usize;
    for &t in &soup.triangles {
        let (v0, v1, v2) = soup.tri(t);
        if ray_triangle_intersect(p, &dir, v0, v1, v2, TOLERANCE).is_some() {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}
