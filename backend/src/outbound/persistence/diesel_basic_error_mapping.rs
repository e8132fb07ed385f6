//! Shared Diesel error classification for the store adapters.
//!
//! Adapters turn a [`StoreFailure`] into their own port error; only the follow
//! store gives [`StoreFailure::UniqueViolation`] a dedicated variant.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Adapter-neutral classification of a persistence failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
    UniqueViolation,
}

impl From<PoolError> for StoreFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(?kind, message = info.message(), "diesel operation failed");
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::UniqueViolation
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
                Self::Connection("database connection error".to_owned())
            }
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
                Self::Query("check constraint violated".to_owned())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                Self::Query("foreign key violated".to_owned())
            }
            _ => Self::Query("database error".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct Info;

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("follows")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info))
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, StoreFailure::UniqueViolation)]
    #[case(
        DatabaseErrorKind::ClosedConnection,
        StoreFailure::Connection("database connection error".to_owned())
    )]
    #[case(
        DatabaseErrorKind::CheckViolation,
        StoreFailure::Query("check constraint violated".to_owned())
    )]
    #[case(
        DatabaseErrorKind::ForeignKeyViolation,
        StoreFailure::Query("foreign key violated".to_owned())
    )]
    fn classifies_database_errors(#[case] kind: DatabaseErrorKind, #[case] expected: StoreFailure) {
        assert_eq!(StoreFailure::from(database_error(kind)), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let failure = StoreFailure::from(PoolError::checkout("timed out"));
        assert_eq!(failure, StoreFailure::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            StoreFailure::from(DieselError::NotFound),
            StoreFailure::Query("record not found".to_owned())
        );
    }
}
