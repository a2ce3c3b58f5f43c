pub mod measure;
pub mod query;
pub mod transform;
