mod soup;

pub use soup::SoupKernel;
pub(crate) use soup::triangles_intersect as soup_triangles_intersect;

use crate::error::KernelError;
use crate::scene::{SolidData, TriMesh};

/// Solid-boolean operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Fuse both solids into one.
    Union,
    /// Keep only the overlapping region.
    Intersect,
}

/// The solid-boolean collaborator the assembly engine drives.
///
/// `boolean` receives both operands by shared reference and must leave them
/// untouched: intersection queries are transient probes, and the union result
/// is returned as a fresh world-space mesh rather than written back. `None`
/// means the operation produced no geometry, which for [`BooleanOp::Intersect`]
/// is the disjoint case and for [`BooleanOp::Union`] a kernel failure the
/// caller must surface.
pub trait BooleanKernel {
    /// Runs the boolean operation on world-space geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot evaluate the operation at all,
    /// as opposed to evaluating it to an empty result.
    fn boolean(
        &self,
        a: &SolidData,
        b: &SolidData,
        op: BooleanOp,
    ) -> Result<Option<TriMesh>, KernelError>;
}
