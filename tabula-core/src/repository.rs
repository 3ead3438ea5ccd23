use crate::{
    Attribute, Connection, Driver, Entity, Error, Fault, GeneratedKeys, MethodDef, Prepared,
    RepositoryContext, Result, RowLabeled, Schema, SqlWriter, Value,
    binder::{bind_columns, bind_primary_key},
    hydrator::{capture_generated_key, hydrate_all, hydrate_row},
    resolver::resolve,
};
use std::{
    any::{Any, TypeId, type_name},
    fmt::{self, Debug, Display},
    sync::Arc,
};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    /// Resolution failed, every operation declines.
    Uninitialized,
    Initialized,
}

/// Result of a repository operation, telling apart a missing row from a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Found(T),
    NotFound,
    Failed(Fault),
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(..))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(..))
    }

    /// Collapses both the missing row and the failure into `None`.
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Outcome::Failed(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(v) => Outcome::Found(f(v)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Failed(fault) => Outcome::Failed(fault),
        }
    }
}

/// CRUD by primary key for the entity type `E`, over any [`Connection`].
///
/// The type is resolved once, when the repository is built. The plain operations report a
/// missing row and a failure the same way, the `try_*` ones return an [`Outcome`].
pub struct Repository<E: Entity> {
    context: RepositoryContext,
    state: RepositoryState,
    schema: Schema<E>,
    fresh: Option<&'static MethodDef<E>>,
    faults: Vec<Fault>,
}

impl<E: Entity> Repository<E> {
    pub fn new(context: RepositoryContext) -> Self {
        match resolve::<E>() {
            Ok(resolution) => Self {
                context,
                state: RepositoryState::Initialized,
                schema: resolution.schema,
                fresh: resolution.fresh,
                faults: resolution.faults,
            },
            Err(error) => {
                context.sink.record_error(OffsetDateTime::now_utc(), &error);
                Self {
                    context,
                    state: RepositoryState::Uninitialized,
                    schema: Schema::new(E::table_name().unwrap_or_default()),
                    fresh: None,
                    faults: vec![Fault::classify(error)],
                }
            }
        }
    }

    pub fn context(&self) -> &RepositoryContext {
        &self.context
    }

    pub fn state(&self) -> RepositoryState {
        self.state
    }

    pub fn schema(&self) -> &Schema<E> {
        &self.schema
    }

    pub fn readable(&self) -> Schema<E> {
        self.schema.readable()
    }

    pub fn writable(&self) -> Schema<E> {
        self.schema.writable()
    }

    pub fn persist_writable(&self) -> Schema<E> {
        self.schema.persist_writable()
    }

    pub fn fresh_factory(&self) -> Option<&'static MethodDef<E>> {
        self.fresh
    }

    /// Anomalies found while resolving `E`.
    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    fn ensure_initialized(&self) -> Result<()> {
        match self.state {
            RepositoryState::Initialized => Ok(()),
            RepositoryState::Uninitialized => Err(Fault::NotInitialized.into()),
        }
    }

    fn breadcrumb(&self, message: impl FnOnce() -> String) {
        if self.context.breadcrumbs {
            let message = message();
            log::debug!("{}", message);
            self.context.sink.record(OffsetDateTime::now_utc(), &message);
        }
    }

    fn failed<T>(&self, operation: &str, error: Error) -> Outcome<T> {
        let fault = Fault::classify(error);
        let error = Error::new(fault.clone()).context(format!(
            "While executing {} on table `{}`",
            operation,
            self.schema.table()
        ));
        log::error!("{:#}", error);
        self.context
            .sink
            .record_error(OffsetDateTime::now_utc(), &error);
        Outcome::Failed(fault)
    }

    fn non_empty(&self, sql: String, statement: &'static str) -> Result<String> {
        if sql.is_empty() {
            return Err(Fault::EmptySql {
                statement,
                table: self.schema.table().to_string(),
            }
            .into());
        }
        Ok(sql)
    }

    /// Inserts `entity`, then stores the generated key into it when the key is auto generated.
    pub fn try_create<'e, C: Connection>(
        &self,
        connection: &mut C,
        entity: &'e mut E,
    ) -> Outcome<&'e mut E> {
        match self.insert(connection, entity) {
            Ok(()) => Outcome::Found(entity),
            Err(error) => self.failed("create", error),
        }
    }

    fn insert<C: Connection>(&self, connection: &mut C, entity: &mut E) -> Result<()> {
        self.ensure_initialized()?;
        let sql = self.non_empty(
            connection.driver().sql_writer().sql_insert(&self.schema),
            "INSERT",
        )?;
        let writable = self.schema.writable();
        let key = writable.primary_key().filter(|v| v.is_auto_generated());
        let keys = key.map_or(GeneratedKeys::None, |v| GeneratedKeys::Returned(v.name()));
        self.breadcrumb(|| format!("create: {} ({:?})", sql, keys));
        let mut statement = connection.prepare(&sql, keys)?;
        bind_columns(
            self.schema.persist_writable().attributes(),
            &mut statement,
            entity,
        )?;
        let affected = statement.execute()?;
        self.breadcrumb(|| format!("create: {} rows affected", affected.rows_affected));
        // The row is stored at this point, a key that cannot be captured is only reported
        if let Some(key) = key {
            let captured = statement
                .generated_keys()
                .and_then(|row| match row {
                    Some(row) => Ok(row),
                    None => generated_key_row(key, affected.last_affected_id),
                })
                .and_then(|row| capture_generated_key(key, &row, entity));
            if let Err(error) = captured {
                let error = error.context(format!(
                    "Could not capture the generated key `{}` of table `{}`",
                    key.name(),
                    self.schema.table()
                ));
                log::warn!("{:#}", error);
                self.context
                    .sink
                    .record_error(OffsetDateTime::now_utc(), &error);
            }
        }
        Ok(())
    }

    /// Selects the row with the primary key currently held by `entity` and writes it into `entity`.
    pub fn try_read<'e, C: Connection>(
        &self,
        connection: &mut C,
        entity: &'e mut E,
    ) -> Outcome<&'e mut E> {
        match self.select(connection, entity) {
            Ok(true) => Outcome::Found(entity),
            Ok(false) => {
                self.breadcrumb(|| "read: not found".to_string());
                Outcome::NotFound
            }
            Err(error) => self.failed("read", error),
        }
    }

    fn select<C: Connection>(&self, connection: &mut C, entity: &mut E) -> Result<bool> {
        self.ensure_initialized()?;
        let sql = self.non_empty(
            connection.driver().sql_writer().sql_select_by_key(&self.schema),
            "SELECT",
        )?;
        self.breadcrumb(|| format!("read: {}", sql));
        let writable = self.schema.writable();
        let mut statement = connection.prepare(&sql, GeneratedKeys::None)?;
        bind_primary_key(&writable, &mut statement, entity, 1)?;
        let mut rows = statement.query()?;
        let Some(row) = rows.next() else {
            return Ok(false);
        };
        let row = row?;
        hydrate_row(&writable, &row, entity, self.context.sink.as_ref());
        Ok(true)
    }

    /// Writes `key` into the primary key of `entity`, then reads it.
    ///
    /// The key stays written even when the read declines.
    pub fn try_read_key<'e, C: Connection, K: Any>(
        &self,
        connection: &mut C,
        entity: &'e mut E,
        key: K,
    ) -> Outcome<&'e mut E> {
        if let Err(error) = self.write_key(entity, key) {
            return self.failed("read", error);
        }
        self.try_read(connection, entity)
    }

    fn write_key<K: Any>(&self, entity: &mut E, key: K) -> Result<()> {
        self.ensure_initialized()?;
        let writable = self.schema.writable();
        let Some(attribute) = writable.primary_key() else {
            return Err(Fault::NoPrimaryKey {
                table: self.schema.table().to_string(),
            }
            .into());
        };
        let ty = &attribute.field().ty;
        if TypeId::of::<K>() != ty.type_id() {
            return Err(Fault::KeyTypeMismatch {
                column: attribute.name().to_string(),
                expected: ty.name,
                found: type_name::<K>(),
            }
            .into());
        }
        let Some(writer) = attribute.valid_writer() else {
            return Err(Fault::UnresolvedAccessor {
                column: attribute.name().to_string(),
                accessor: "writer",
            }
            .into());
        };
        writer.write(entity, Box::new(key))
    }

    /// Every row of the table, each one in a new instance produced by the fresh instance factory.
    pub fn try_read_all<C: Connection>(&self, connection: &mut C) -> Outcome<Vec<E>> {
        match self.select_all(connection) {
            Ok(entities) => Outcome::Found(entities),
            Err(error) => self.failed("read all", error),
        }
    }

    fn select_all<C: Connection>(&self, connection: &mut C) -> Result<Vec<E>> {
        self.ensure_initialized()?;
        let Some(fresh) = self.fresh else {
            return Err(Fault::NoFreshFactory {
                ty: type_name::<E>(),
            }
            .into());
        };
        let sql = self.non_empty(
            connection.driver().sql_writer().sql_select_all(&self.schema),
            "SELECT",
        )?;
        self.breadcrumb(|| format!("read all: {}", sql));
        let writable = self.schema.writable();
        let mut statement = connection.prepare(&sql, GeneratedKeys::None)?;
        let entities = hydrate_all(
            &writable,
            fresh,
            statement.query()?,
            self.context.sink.as_ref(),
        )?;
        self.breadcrumb(|| format!("read all: {} rows", entities.len()));
        Ok(entities)
    }

    /// Writes every persisted field of `entity` into the row with its primary key.
    pub fn try_update<'e, C: Connection>(
        &self,
        connection: &mut C,
        entity: &'e E,
    ) -> Outcome<&'e E> {
        match self.modify(connection, entity) {
            Ok(_) => Outcome::Found(entity),
            Err(error) => self.failed("update", error),
        }
    }

    fn modify<C: Connection>(&self, connection: &mut C, entity: &E) -> Result<u64> {
        self.ensure_initialized()?;
        let sql = self.non_empty(
            connection.driver().sql_writer().sql_update(&self.schema),
            "UPDATE",
        )?;
        self.breadcrumb(|| format!("update: {}", sql));
        let columns = self.schema.persist_writable();
        let mut statement = connection.prepare(&sql, GeneratedKeys::None)?;
        bind_columns(columns.attributes(), &mut statement, entity)?;
        bind_primary_key(
            &self.schema,
            &mut statement,
            entity,
            columns.len() as u64 + 1,
        )?;
        let affected = statement.execute()?;
        self.breadcrumb(|| format!("update: {} rows affected", affected.rows_affected));
        Ok(affected.rows_affected)
    }

    /// Deletes the row with the primary key of `entity`, returning the rows affected.
    pub fn try_delete<C: Connection>(&self, connection: &mut C, entity: &E) -> Outcome<u64> {
        match self.remove(connection, entity) {
            Ok(rows) => Outcome::Found(rows),
            Err(error) => self.failed("delete", error),
        }
    }

    fn remove<C: Connection>(&self, connection: &mut C, entity: &E) -> Result<u64> {
        self.ensure_initialized()?;
        let sql = self.non_empty(
            connection.driver().sql_writer().sql_delete(&self.schema),
            "DELETE",
        )?;
        self.breadcrumb(|| format!("delete: {}", sql));
        let mut statement = connection.prepare(&sql, GeneratedKeys::None)?;
        bind_primary_key(&self.schema, &mut statement, entity, 1)?;
        let affected = statement.execute()?;
        self.breadcrumb(|| format!("delete: {} rows affected", affected.rows_affected));
        Ok(affected.rows_affected)
    }

    pub fn create<'e, C: Connection>(
        &self,
        connection: &mut C,
        entity: &'e mut E,
    ) -> Option<&'e mut E> {
        self.try_create(connection, entity).found()
    }

    pub fn read<'e, C: Connection>(
        &self,
        connection: &mut C,
        entity: &'e mut E,
    ) -> Option<&'e mut E> {
        self.try_read(connection, entity).found()
    }

    pub fn read_key<'e, C: Connection, K: Any>(
        &self,
        connection: &mut C,
        entity: &'e mut E,
        key: K,
    ) -> Option<&'e mut E> {
        self.try_read_key(connection, entity, key).found()
    }

    /// Empty when the read fails.
    pub fn read_all<C: Connection>(&self, connection: &mut C) -> Vec<E> {
        self.try_read_all(connection).found().unwrap_or_default()
    }

    pub fn update<'e, C: Connection>(&self, connection: &mut C, entity: &'e E) -> Option<&'e E> {
        self.try_update(connection, entity).found()
    }

    pub fn delete<C: Connection>(&self, connection: &mut C, entity: &E) -> bool {
        self.try_delete(connection, entity).is_found()
    }
}

/// Row holding the last inserted identifier, for backends reporting it only as a count.
fn generated_key_row<E: 'static>(key: &Attribute<E>, id: Option<i64>) -> Result<RowLabeled> {
    let Some(id) = id else {
        return Err(Fault::MissingColumn {
            column: key.name().to_string(),
        }
        .into());
    };
    Ok(RowLabeled::new(
        Arc::from([key.name().to_string()]),
        vec![Value::from(id)].into_boxed_slice(),
    ))
}

impl<E: Entity> Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("state", &self.state)
            .field("schema", &self.schema)
            .field("fresh", &self.fresh.map(|m| m.name))
            .field("faults", &self.faults)
            .finish()
    }
}

impl<E: Entity> Display for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nfresh factory: {}",
            self.schema,
            self.fresh.map_or("null", |m| m.name)
        )
    }
}
