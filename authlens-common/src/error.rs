use sea_orm::DbErr;

#[derive(thiserror::Error, Debug)]
pub enum AuthlensError {
    #[error("cannot open snapshot at {path}: {detail}")]
    SourceUnavailable { path: String, detail: String },
    /// The snapshot predates the `login_events` schema addition. Absorbed
    /// during load; never shown to the caller.
    #[error("snapshot has no login_events table")]
    LegacySchemaGap,
    #[error("malformed row in {table}: {detail}")]
    MalformedRow { table: &'static str, detail: String },
    #[error("no writable source: no snapshot has been opened")]
    NoWritableSource,
    #[error("user {0} no longer exists at the backing source")]
    RecordNotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("failed to parse URL: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("deserialization failed: {0}")]
    DeserializeYaml(#[from] serde_yaml::Error),
}
