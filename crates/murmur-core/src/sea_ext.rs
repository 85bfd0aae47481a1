use sea_orm::{DbErr, SqlErr};

/// Classification helpers for database errors.
pub trait DbErrExt {
    /// `true` when the statement was rejected by a unique index or primary key.
    fn is_unique_violation(&self) -> bool;
    /// `true` when the statement referenced a row that does not exist.
    fn is_foreign_key_violation(&self) -> bool;
}

impl DbErrExt for DbErr {
    fn is_unique_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }

    fn is_foreign_key_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
    }
}
