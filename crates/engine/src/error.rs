//! The module contains the error the engine can throw.
//!
//! Callers mostly care about four outcomes:
//!
//! - [`Validation`] when the input is incomplete or out of range.
//! - [`NotFound`] when a target row does not exist for the tenant.
//! - [`ReferentialConflict`] when a delete is blocked by dependent rows.
//! - [`StoreUnavailable`] when the store cannot be reached in time. Retryable.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`ReferentialConflict`]: EngineError::ReferentialConflict
//!  [`StoreUnavailable`]: EngineError::StoreUnavailable
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

const SQLITE_FK_FAILED: &str = "FOREIGN KEY constraint failed";

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("{0}")]
    ReferentialConflict(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("nothing to export: no financials recorded")]
    NothingToExport,
    #[error("export failed: {0}")]
    Export(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("password hashing failed: {0}")]
    Password(String),
    #[error(transparent)]
    Database(DbErr),
}

impl EngineError {
    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::ExistingKey(_) => "existing_key",
            Self::ReferentialConflict(_) => "referential_conflict",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::NothingToExport => "nothing_to_export",
            Self::Export(_) => "export",
            Self::Unauthorized => "unauthorized",
            Self::Password(_) => "password",
            Self::Database(_) => "database",
        }
    }

    /// Translate a foreign-key violation into a [`ReferentialConflict`]
    /// carrying `message`; any other store error converts as usual.
    ///
    /// `sql_err` only knows SQLite's primary FK code, so the extended
    /// `RESTRICT` code (1811) is recognised by its message.
    ///
    /// [`ReferentialConflict`]: EngineError::ReferentialConflict
    pub(crate) fn referential(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                Self::ReferentialConflict(message.to_string())
            }
            _ if err.to_string().contains(SQLITE_FK_FAILED) => {
                Self::ReferentialConflict(message.to_string())
            }
            _ => err.into(),
        }
    }

    /// Translate a unique-index violation into [`ExistingKey`] for `key`.
    ///
    /// [`ExistingKey`]: EngineError::ExistingKey
    pub(crate) fn existing(err: DbErr, key: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(key.to_string()),
            _ => err.into(),
        }
    }
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        match value {
            DbErr::ConnectionAcquire(err) => Self::StoreUnavailable(err.to_string()),
            DbErr::Conn(err) => Self::StoreUnavailable(err.to_string()),
            other => Self::Database(other),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::ReferentialConflict(a), Self::ReferentialConflict(b)) => a == b,
            (Self::StoreUnavailable(a), Self::StoreUnavailable(b)) => a == b,
            (Self::NothingToExport, Self::NothingToExport) => true,
            (Self::Export(a), Self::Export(b)) => a == b,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::Password(a), Self::Password(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
