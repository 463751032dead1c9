#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {}", .0.join(", "))]
    NotFound(Vec<String>),

    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    #[error("cycle detected while expanding {recipe_id}: depth limit of {limit} exceeded")]
    CycleDetected { recipe_id: String, limit: usize },

    #[error("failed to write flattened cache for {recipe_id}: {reason}")]
    CacheWriteFailed { recipe_id: String, reason: String },

    #[error("{0}")]
    Validate(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(vec![id.into()])
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(value: validator::ValidationErrors) -> Self {
        Self::Validate(value.to_string())
    }
}

impl From<bitcode::Error> for Error {
    fn from(value: bitcode::Error) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail_integrity {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::DataIntegrity(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::DataIntegrity(format!($fmt, $($arg)*)))
    };
}
