use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolveError {
    #[error("sample set is empty")]
    EmptySamples,

    #[error("sample columns are misaligned: {xs} x values, {ys} y values")]
    MisalignedSamples { xs: usize, ys: usize },

    #[error("malformed row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, EvolveError>;
