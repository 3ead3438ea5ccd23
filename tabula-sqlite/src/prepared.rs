use crate::{
    CBox, error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use libsqlite3_sys::*;
use std::{
    ffi::{CStr, c_char, c_int},
    fmt::{self, Display},
    marker::PhantomData,
    sync::Arc,
};
use tabula_core::{
    Error, GeneratedKeys, Prepared, Result, RowLabeled, RowNames, RowsAffected, Value,
    truncate_long,
};

/// A prepared statement, alive as long as the borrow of its connection.
pub struct SqlitePrepared<'c> {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
    connection: *mut sqlite3,
    key: Option<String>,
    generated: Option<i64>,
    _connection: PhantomData<&'c mut sqlite3>,
}

impl<'c> SqlitePrepared<'c> {
    pub(crate) fn new(
        statement: CBox<*mut sqlite3_stmt>,
        connection: *mut sqlite3,
        keys: GeneratedKeys<'_>,
    ) -> Self {
        unsafe {
            sqlite3_clear_bindings(*statement);
        }
        Self {
            statement,
            connection,
            key: match keys {
                GeneratedKeys::None => None,
                GeneratedKeys::Returned(column) => Some(column.to_string()),
            },
            generated: None,
            _connection: PhantomData,
        }
    }

    fn error(&self, context: impl FnOnce() -> String) -> Error {
        statement_error(self.connection, *self.statement, context)
    }

    fn reset(&mut self) {
        unsafe {
            sqlite3_reset(*self.statement);
        }
    }
}

impl<'c> Prepared for SqlitePrepared<'c> {
    type Rows<'s>
        = SqliteRows<'s>
    where
        Self: 's;

    fn bind_index(&mut self, value: Value, position: u64) -> Result<&mut Self> {
        self.reset();
        let index = position as c_int;
        let statement = *self.statement;
        let rc = unsafe {
            match &value {
                v if v.is_null() => sqlite3_bind_null(statement, index),
                Value::Boolean(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int8(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int16(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int32(Some(v)) => sqlite3_bind_int(statement, index, *v as c_int),
                Value::Int64(Some(v)) => sqlite3_bind_int64(statement, index, *v),
                Value::Float32(Some(v)) => sqlite3_bind_double(statement, index, *v as f64),
                Value::Float64(Some(v)) => sqlite3_bind_double(statement, index, *v),
                Value::Varchar(Some(v)) => sqlite3_bind_text(
                    statement,
                    index,
                    v.as_ptr() as *const c_char,
                    v.len() as c_int,
                    SQLITE_TRANSIENT(),
                ),
                _ => {
                    let error =
                        Error::msg(format!("Cannot use a {:?} as a query parameter", value));
                    log::error!("{:#}", error);
                    return Err(error);
                }
            }
        };
        if rc != SQLITE_OK {
            return Err(self.error(|| format!("Cannot bind parameter {} to query:", position)));
        }
        Ok(self)
    }

    fn execute(&mut self) -> Result<RowsAffected> {
        self.reset();
        loop {
            match unsafe { sqlite3_step(*self.statement) } {
                SQLITE_ROW | SQLITE_BUSY => continue,
                SQLITE_DONE => break,
                _ => return Err(self.error(|| "While executing the query:".to_string())),
            }
        }
        let (changes, last) = unsafe {
            (
                sqlite3_changes(self.connection),
                sqlite3_last_insert_rowid(self.connection),
            )
        };
        if self.key.is_some() {
            self.generated = Some(last);
        }
        Ok(RowsAffected {
            rows_affected: changes.max(0) as u64,
            last_affected_id: self.generated,
        })
    }

    fn query(&mut self) -> Result<SqliteRows<'_>> {
        self.reset();
        let statement = *self.statement;
        let count = unsafe { sqlite3_column_count(statement) };
        let labels = (0..count)
            .map(|i| extract_name(statement, i))
            .collect::<Result<RowNames>>()?;
        Ok(SqliteRows {
            statement,
            connection: self.connection,
            labels,
            done: false,
            _prepared: PhantomData,
        })
    }

    fn generated_keys(&mut self) -> Result<Option<RowLabeled>> {
        Ok(self
            .key
            .as_ref()
            .zip(self.generated)
            .map(|(key, id)| {
                RowLabeled::new(
                    Arc::from([key.clone()]),
                    vec![Value::Int64(Some(id))].into_boxed_slice(),
                )
            }))
    }
}

fn statement_sql(statement: *mut sqlite3_stmt) -> String {
    let sql = unsafe { sqlite3_sql(statement) };
    if sql.is_null() {
        return format!("{:p}", statement);
    }
    unsafe { CStr::from_ptr(sql) }
        .to_string_lossy()
        .into_owned()
}

fn statement_error(
    connection: *mut sqlite3,
    statement: *mut sqlite3_stmt,
    context: impl FnOnce() -> String,
) -> Error {
    let sql = statement_sql(statement);
    let error = Error::msg(error_message_from_ptr(unsafe { sqlite3_errmsg(connection) }))
        .context(format!("{}\n{}", context(), truncate_long!(sql)));
    log::error!("{:#}", error);
    error
}

impl<'c> Display for SqlitePrepared<'c> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = statement_sql(*self.statement);
        write!(f, "{}", truncate_long!(sql))
    }
}

/// Cursor over the rows of a query, ends at the first error.
pub struct SqliteRows<'s> {
    statement: *mut sqlite3_stmt,
    connection: *mut sqlite3,
    labels: RowNames,
    done: bool,
    _prepared: PhantomData<&'s mut ()>,
}

impl<'s> Iterator for SqliteRows<'s> {
    type Item = Result<RowLabeled>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let statement = self.statement;
        loop {
            match unsafe { sqlite3_step(statement) } {
                SQLITE_BUSY => continue,
                SQLITE_ROW => {
                    let values = (0..self.labels.len() as c_int)
                        .map(|i| extract_value(statement, i))
                        .collect::<Result<Box<[Value]>>>();
                    return Some(values.map(|values| RowLabeled {
                        labels: self.labels.clone(),
                        values,
                    }));
                }
                SQLITE_DONE => {
                    self.done = true;
                    return None;
                }
                _ => {
                    self.done = true;
                    return Some(Err(statement_error(self.connection, statement, || {
                        "While fetching the rows of the query:".to_string()
                    })));
                }
            }
        }
    }
}
