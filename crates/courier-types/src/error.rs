use thiserror::Error;

/// Errors from identifier parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{0} id must not be empty")]
    Empty(&'static str),
}

/// Errors from repository operations (used by trait definitions in courier-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("schema error: {0}")]
    Schema(String),
}

/// Errors from encoding or decoding persisted message halves.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode metadata: {0}")]
    MetadataEncode(String),

    #[error("failed to decode metadata: {0}")]
    MetadataDecode(String),

    #[error("failed to decode payload: {0}")]
    PayloadDecode(String),

    #[error("row key {column} does not match metadata key {metadata}")]
    KeyMismatch { column: String, metadata: String },
}

/// Fatal errors raised while constructing a message store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open message database: {0}")]
    Open(#[source] RepositoryError),

    #[error("cannot ensure message schema: {0}")]
    Schema(#[source] RepositoryError),

    #[error("cannot read persisted messages: {0}")]
    Load(#[source] RepositoryError),
}

/// Errors from loading or saving the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("failed to serialize settings: {0}")]
    Serialize(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
