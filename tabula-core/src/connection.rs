use crate::{Result, RowLabeled, RowsAffected, SqlWriter, Value};
use std::fmt::Display;

/// A backend: its name and its SQL dialect.
pub trait Driver {
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}

/// How an INSERT reports the keys the backend generated.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedKeys<'a> {
    #[default]
    None,
    /// Return the generated value of this column.
    Returned(&'a str),
}

/// An open session with a backend, used by one caller at a time.
pub trait Connection: Sized {
    type Driver: Driver;
    type Prepared<'c>: Prepared
    where
        Self: 'c;

    /// Opens a connection to the backend addressed by `url`.
    fn connect(url: &str) -> Result<Self>;

    fn driver(&self) -> &Self::Driver;

    /// Prepares `sql`, the statement is released when the returned value is dropped.
    fn prepare(&mut self, sql: &str, keys: GeneratedKeys<'_>) -> Result<Self::Prepared<'_>>;

    /// Prepares and executes a statement without parameters.
    fn run(&mut self, sql: &str) -> Result<RowsAffected> {
        self.prepare(sql, GeneratedKeys::None)?.execute()
    }
}

/// A parameterized statement prepared by the backend.
///
/// Methods binding values return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// prepared.bind_index(42.into(), 1)?.bind_index("hello".into(), 2)?;
/// ```
pub trait Prepared: Display {
    type Rows<'s>: Iterator<Item = Result<RowLabeled>>
    where
        Self: 's;

    /// Binds `value` to the parameter at `position`, starting from 1.
    fn bind_index(&mut self, value: Value, position: u64) -> Result<&mut Self>;

    /// Runs a statement returning no rows.
    fn execute(&mut self) -> Result<RowsAffected>;

    /// Runs a query, the cursor is exhausted or dropped before the statement can run again.
    fn query(&mut self) -> Result<Self::Rows<'_>>;

    /// Keys generated by the last `execute`, when prepared with [`GeneratedKeys::Returned`].
    fn generated_keys(&mut self) -> Result<Option<RowLabeled>>;
}
