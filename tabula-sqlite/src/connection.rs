use crate::{CBox, SqliteDriver, SqlitePrepared, error_message_from_ptr};
use libsqlite3_sys::{
    SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI, sqlite3, sqlite3_close,
    sqlite3_errmsg, sqlite3_exec, sqlite3_finalize, sqlite3_free, sqlite3_open_v2,
    sqlite3_prepare_v2, sqlite3_stmt,
};
use std::{
    ffi::{CStr, CString, c_char},
    ptr,
};
use tabula_core::{Connection, Context, Driver, Error, GeneratedKeys, Result, truncate_long};

/// A connection to a SQLite database file, or to an in memory database.
pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

impl SqliteConnection {
    /// Runs one or more statements separated by `;`, without parameters.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        let context = || format!("While executing the batch:\n{}", truncate_long!(sql));
        let sql = CString::new(sql).with_context(context)?;
        unsafe {
            let mut message: *mut c_char = ptr::null_mut();
            let rc = sqlite3_exec(
                *self.connection,
                sql.as_ptr(),
                None,
                ptr::null_mut(),
                &mut message,
            );
            if rc != SQLITE_OK {
                let error = Error::msg(error_message_from_ptr(message)).context(context());
                sqlite3_free(message.cast());
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        Ok(())
    }
}

impl Connection for SqliteConnection {
    type Driver = SqliteDriver;
    type Prepared<'c> = SqlitePrepared<'c>;

    /// Accepts `sqlite://<path>[?<uri parameters>]`, like `sqlite://data.sqlite?mode=rwc`, and
    /// `sqlite://:memory:`.
    fn connect(url: &str) -> Result<Self> {
        let prefix = format!("{}://", SqliteDriver::NAME);
        let Some(location) = url.strip_prefix(&prefix) else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                prefix
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let context = || format!("Error while decoding connection URL: `{}`", url);
        let location = if location == ":memory:" {
            location.to_string()
        } else {
            format!("file:{}", location)
        };
        let location = CString::new(location).with_context(context)?;
        let mut connection: CBox<*mut sqlite3> = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        unsafe {
            let rc = sqlite3_open_v2(
                location.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_URI | SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let error = Error::msg(if connection.is_null() {
                    format!("sqlite3_open_v2 failed with code {}", rc)
                } else {
                    error_message_from_ptr(sqlite3_errmsg(*connection))
                })
                .context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        Ok(Self { connection })
    }

    fn driver(&self) -> &Self::Driver {
        &SqliteDriver {}
    }

    fn prepare(&mut self, sql: &str, keys: GeneratedKeys<'_>) -> Result<SqlitePrepared<'_>> {
        let context = || format!("While preparing the query:\n{}", truncate_long!(sql));
        let query = CString::new(sql).with_context(context)?;
        let mut statement: CBox<*mut sqlite3_stmt> = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_finalize(p);
        });
        unsafe {
            let mut tail: *const c_char = ptr::null();
            let rc = sqlite3_prepare_v2(
                *self.connection,
                query.as_ptr(),
                -1,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                let error = Error::msg(error_message_from_ptr(sqlite3_errmsg(*self.connection)))
                    .context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
            if !tail.is_null() && !CStr::from_ptr(tail).to_bytes().trim_ascii().is_empty() {
                let error =
                    Error::msg("Cannot prepare more than one statement at a time").context(context());
                log::error!("{:#}", error);
                return Err(error);
            }
        }
        if statement.is_null() {
            let error = Error::msg("The query does not contain any statement").context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(SqlitePrepared::new(statement, *self.connection, keys))
    }
}
