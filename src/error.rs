use thiserror::Error;

/// Top-level error type for the Cristalis synthesis kernel.
#[derive(Debug, Error)]
pub enum CristalisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors raised while validating a build configuration, before any
/// geometry work begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("either a monomer count or a target diameter must be specified")]
    NoTermination,

    #[error("cannot specify both a monomer count and a target diameter")]
    ConflictingTermination,

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to the solid arena.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Errors surfaced by a boolean kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("boolean operation failed: {0}")]
    Failed(String),
}

/// Errors raised during aggregate assembly.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("no intersection found after {attempts} descent attempts")]
    SearchExhausted { attempts: usize },

    #[error("boolean union produced no geometry")]
    MergeFailed,

    #[error("boolean union did not grow the aggregate ({before} -> {after} vertices)")]
    MergeAnomaly { before: usize, after: usize },
}

/// Errors raised while exporting the final aggregate.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write mesh file")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`CristalisError`].
pub type Result<T> = std::result::Result<T, CristalisError>;
