use thiserror::Error;

/// Startup configuration problems. These are fatal and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} environment variable not set")]
    MissingCredential { name: &'static str },

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
