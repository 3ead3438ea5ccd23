use thiserror::Error;

/// Everything that can make a mapping operation decline.
///
/// Resolution anomalies (`DuplicateColumn`, `UnresolvedAccessor`) are recovered where they
/// happen and only degrade what the repository can do. The others abort the current
/// operation and reach the caller as [`Outcome::Failed`](crate::Outcome::Failed).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Fault {
    #[error("type `{ty}` does not declare a table, it is not an entity")]
    NotAnEntity { ty: &'static str },

    #[error("column `{column}` is declared more than once in table `{table}`")]
    DuplicateColumn { table: String, column: String },

    #[error("column `{column}` has no valid {accessor}")]
    UnresolvedAccessor {
        column: String,
        accessor: &'static str,
    },

    #[error("table `{table}` has no valid primary key")]
    NoPrimaryKey { table: String },

    #[error("column `{column}` has type `{ty}` which cannot be bound or read")]
    UnsupportedColumnType { column: String, ty: &'static str },

    #[error("backend execution failure: {message}")]
    BackendExecutionFailure { message: String },

    #[error("the repository is not initialized")]
    NotInitialized,

    #[error("could not generate the {statement} statement for table `{table}`")]
    EmptySql {
        statement: &'static str,
        table: String,
    },

    #[error("type `{ty}` has no valid fresh instance factory")]
    NoFreshFactory { ty: &'static str },

    #[error("a key of type `{found}` does not match primary key `{column}` of type `{expected}`")]
    KeyTypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("accessor `{method}` failed: {message}")]
    AccessorFailure { method: &'static str, message: String },

    #[error("column `{column}` is not present in the row")]
    MissingColumn { column: String },

    #[error("cannot convert {from} into {to}")]
    ValueConversion { from: String, to: &'static str },
}

impl Fault {
    /// Turns any error into a fault, keeping the original one when the error already is a [`Fault`].
    pub fn classify(error: anyhow::Error) -> Fault {
        match error.downcast::<Fault>() {
            Ok(fault) => fault,
            Err(error) => Fault::BackendExecutionFailure {
                message: format!("{:#}", error),
            },
        }
    }
}
