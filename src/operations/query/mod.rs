mod intersects;
mod self_intersection;

pub use intersects::Intersects;
pub use self_intersection::SelfIntersection;
