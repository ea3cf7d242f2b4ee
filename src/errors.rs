use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortmapError {
    Validation(String),
    AliasConflict(String),
    NotFound(String),
    StorageOperation(String),
    StorageBackendNotFound(String),
    Config(String),
}

impl ShortmapError {
    pub fn code(&self) -> &'static str {
        match self {
            ShortmapError::Validation(_) => "E001",
            ShortmapError::AliasConflict(_) => "E002",
            ShortmapError::NotFound(_) => "E003",
            ShortmapError::StorageOperation(_) => "E004",
            ShortmapError::StorageBackendNotFound(_) => "E005",
            ShortmapError::Config(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ShortmapError::Validation(_) => "Validation Error",
            ShortmapError::AliasConflict(_) => "Alias Conflict",
            ShortmapError::NotFound(_) => "Resource Not Found",
            ShortmapError::StorageOperation(_) => "Storage Operation Error",
            ShortmapError::StorageBackendNotFound(_) => "Storage Backend Not Found",
            ShortmapError::Config(_) => "Configuration Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ShortmapError::Validation(msg) => msg,
            ShortmapError::AliasConflict(msg) => msg,
            ShortmapError::NotFound(msg) => msg,
            ShortmapError::StorageOperation(msg) => msg,
            ShortmapError::StorageBackendNotFound(msg) => msg,
            ShortmapError::Config(msg) => msg,
        }
    }
}

impl fmt::Display for ShortmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ShortmapError {}

// 便捷的构造函数
impl ShortmapError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortmapError::Validation(msg.into())
    }

    pub fn alias_conflict<T: Into<String>>(msg: T) -> Self {
        ShortmapError::AliasConflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortmapError::NotFound(msg.into())
    }

    pub fn storage_operation<T: Into<String>>(msg: T) -> Self {
        ShortmapError::StorageOperation(msg.into())
    }

    pub fn storage_backend_not_found<T: Into<String>>(msg: T) -> Self {
        ShortmapError::StorageBackendNotFound(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortmapError::Config(msg.into())
    }
}

impl From<rusqlite::Error> for ShortmapError {
    fn from(err: rusqlite::Error) -> Self {
        ShortmapError::StorageOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShortmapError {
    fn from(err: std::io::Error) -> Self {
        ShortmapError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ShortmapError {
    fn from(err: toml::de::Error) -> Self {
        ShortmapError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortmapError>;
