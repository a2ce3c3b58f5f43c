mod rotate;
mod translate;

pub use rotate::{CommitRotation, Rotate};
pub use translate::{CommitTranslation, Translate};
