use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config Error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Config Error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("Seed Error: {0}")]
    Seed(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Other(err)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("No package with id '{0}'")]
    NotFound(String),
    #[error("No server with id '{0}'")]
    ServerNotFound(String),
    #[error("Package has no script at position {0}")]
    ScriptIndex(usize),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Form level failures, shown inline and never partially applied
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Package name is required")]
    MissingName,
    #[error("Version is required")]
    MissingVersion,
    #[error("Summary is required")]
    MissingSummary,
    #[error("At least one platform is required")]
    NoPlatform,
    #[error("Script name is required")]
    MissingScriptName,
    #[error("Script content cannot be empty")]
    EmptyScript,
    #[error("Script is too large. Maximum size is 10KB.")]
    ScriptTooLarge,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
}
