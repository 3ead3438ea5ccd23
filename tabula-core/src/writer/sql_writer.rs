use crate::{
    Attribute, Schema, separated_by,
    writer::{Context, Fragment},
};

/// Dialect printer turning a schema into the CRUD statements by primary key.
///
/// Every `write_*` method leaves `out` untouched when the statement cannot be generated, so the
/// matching `sql_*` method returns an empty string. Columns always follow the schema order, the
/// same order the binder uses for parameter positions.
pub trait SqlWriter {
    fn write_identifier(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push_str(value);
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        context.counter += 1;
        out.push('?');
    }

    /// `column = ?`
    fn write_assignment<E: 'static>(
        &self,
        context: &mut Context,
        out: &mut String,
        attribute: &Attribute<E>,
    ) where
        Self: Sized,
    {
        self.write_identifier(context, out, attribute.name());
        out.push_str(" = ");
        self.write_placeholder(context, out);
    }

    fn write_insert<E: 'static>(&self, out: &mut String, schema: &Schema<E>)
    where
        Self: Sized,
    {
        let columns = schema.persist_writable();
        if columns.is_empty() {
            return;
        }
        out.reserve(32 + columns.len() * 24);
        out.push_str("INSERT INTO ");
        let mut context = Context::new(Fragment::SqlInsertInto);
        self.write_identifier(&mut context, out, columns.table());
        out.push_str(" (");
        separated_by(
            out,
            columns.attributes(),
            |out, v| self.write_identifier(&mut context, out, v.name()),
            ", ",
        );
        out.push_str(") VALUES (");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            columns.attributes(),
            |out, _| self.write_placeholder(&mut context.current, out),
            ", ",
        );
        out.push(')');
    }

    fn write_select_by_key<E: 'static>(&self, out: &mut String, schema: &Schema<E>)
    where
        Self: Sized,
    {
        let writable = schema.writable();
        let Some(key) = writable.valid_primary_key() else {
            return;
        };
        let columns = schema.readable();
        if columns.is_empty() {
            return;
        }
        out.reserve(32 + columns.len() * 16);
        out.push_str("SELECT ");
        let mut context = Context::new(Fragment::SqlSelect);
        separated_by(
            out,
            columns.attributes(),
            |out, v| self.write_identifier(&mut context, out, v.name()),
            ", ",
        );
        out.push_str(" FROM ");
        self.write_identifier(
            &mut context.switch_fragment(Fragment::SqlSelectFrom).current,
            out,
            schema.table(),
        );
        out.push_str(" WHERE ");
        self.write_assignment(
            &mut context.switch_fragment(Fragment::SqlSelectWhere).current,
            out,
            key,
        );
    }

    fn write_select_all<E: 'static>(&self, out: &mut String, schema: &Schema<E>)
    where
        Self: Sized,
    {
        if !schema.has_valid_primary_key() {
            return;
        }
        out.push_str("SELECT * FROM ");
        let mut context = Context::new(Fragment::SqlSelectFrom);
        self.write_identifier(&mut context, out, schema.table());
    }

    fn write_update<E: 'static>(&self, out: &mut String, schema: &Schema<E>)
    where
        Self: Sized,
    {
        let Some(key) = schema.valid_primary_key() else {
            return;
        };
        let columns = schema.persist_writable();
        if columns.is_empty() {
            return;
        }
        out.reserve(32 + columns.len() * 24);
        out.push_str("UPDATE ");
        let mut context = Context::new(Fragment::SqlUpdate);
        self.write_identifier(&mut context, out, schema.table());
        out.push_str(" SET ");
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            separated_by(
                out,
                columns.attributes(),
                |out, v| self.write_assignment(&mut context.current, out, v),
                ", ",
            );
        }
        out.push_str(" WHERE ");
        self.write_assignment(
            &mut context.switch_fragment(Fragment::SqlUpdateWhere).current,
            out,
            key,
        );
    }

    fn write_delete<E: 'static>(&self, out: &mut String, schema: &Schema<E>)
    where
        Self: Sized,
    {
        let Some(key) = schema.valid_primary_key() else {
            return;
        };
        out.push_str("DELETE FROM ");
        let mut context = Context::new(Fragment::SqlDeleteFrom);
        self.write_identifier(&mut context, out, schema.table());
        out.push_str(" WHERE ");
        self.write_assignment(
            &mut context.switch_fragment(Fragment::SqlDeleteFromWhere).current,
            out,
            key,
        );
    }

    fn sql_insert<E: 'static>(&self, schema: &Schema<E>) -> String
    where
        Self: Sized,
    {
        let mut out = String::new();
        self.write_insert(&mut out, schema);
        out
    }

    fn sql_select_by_key<E: 'static>(&self, schema: &Schema<E>) -> String
    where
        Self: Sized,
    {
        let mut out = String::new();
        self.write_select_by_key(&mut out, schema);
        out
    }

    fn sql_select_all<E: 'static>(&self, schema: &Schema<E>) -> String
    where
        Self: Sized,
    {
        let mut out = String::new();
        self.write_select_all(&mut out, schema);
        out
    }

    fn sql_update<E: 'static>(&self, schema: &Schema<E>) -> String
    where
        Self: Sized,
    {
        let mut out = String::new();
        self.write_update(&mut out, schema);
        out
    }

    fn sql_delete<E: 'static>(&self, schema: &Schema<E>) -> String
    where
        Self: Sized,
    {
        let mut out = String::new();
        self.write_delete(&mut out, schema);
        out
    }
}

/// Fallback writer: unquoted identifiers and `?` placeholders.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {}

pub fn build_insert<E: 'static>(schema: &Schema<E>) -> String {
    GenericSqlWriter.sql_insert(schema)
}

pub fn build_select_by_key<E: 'static>(schema: &Schema<E>) -> String {
    GenericSqlWriter.sql_select_by_key(schema)
}

pub fn build_select_all<E: 'static>(schema: &Schema<E>) -> String {
    GenericSqlWriter.sql_select_all(schema)
}

pub fn build_update<E: 'static>(schema: &Schema<E>) -> String {
    GenericSqlWriter.sql_update(schema)
}

pub fn build_delete<E: 'static>(schema: &Schema<E>) -> String {
    GenericSqlWriter.sql_delete(schema)
}
