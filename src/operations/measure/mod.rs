mod bounding_box;
mod planar_diameter;

pub use bounding_box::{Aabb, BoundingBox};
pub use planar_diameter::{PlanarDiameter, PlanarDiameters};
