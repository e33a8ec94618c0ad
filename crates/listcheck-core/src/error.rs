use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site profile {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profile '{key}': {source}")]
    ProfileParse {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid site profile '{key}': {reason}")]
    ProfileValidation { key: String, reason: String },
}

/// Failures reading the authoritative record table. Fatal to the call that
/// triggered them, never to the whole run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read input {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("input has no header row")]
    MissingHeader,

    #[error("input is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("input contains no records")]
    Empty,
}
