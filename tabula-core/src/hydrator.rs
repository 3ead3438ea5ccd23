//! Moves row values into entity instances.

use crate::{Attribute, Context, Fault, LogSink, MethodDef, Result, RowLabeled, Schema};
use std::any::Any;
use time::OffsetDateTime;

/// Value of the column of `attribute` in `row`, ready to be passed to its writer.
pub fn read_field<E: 'static>(attribute: &Attribute<E>, row: &RowLabeled) -> Result<Box<dyn Any>> {
    attribute.ensure_supported()?;
    let field = attribute.field();
    let Some(value) = row.get_column(attribute.name()) else {
        return Err(Fault::MissingColumn {
            column: attribute.name().to_string(),
        }
        .into());
    };
    value
        .clone()
        .into_erased(&field.value, field.nullable)
        .with_context(|| format!("While reading column `{}`", attribute.name()))
}

fn write_field<E: 'static>(
    attribute: &Attribute<E>,
    value: Box<dyn Any>,
    target: &mut E,
) -> Result<()> {
    let Some(writer) = attribute.valid_writer() else {
        return Err(Fault::UnresolvedAccessor {
            column: attribute.name().to_string(),
            accessor: "writer",
        }
        .into());
    };
    writer.write(target, value).map_err(|e| {
        Fault::AccessorFailure {
            method: writer.name,
            message: format!("{:#}", e),
        }
        .into()
    })
}

/// Writes every attribute of `schema` found in `row` into `target`.
///
/// An attribute that cannot be read or written is reported to `sink` and skipped, the others
/// are still written. Returns how many attributes were written.
pub fn hydrate_row<E: 'static>(
    schema: &Schema<E>,
    row: &RowLabeled,
    target: &mut E,
    sink: &dyn LogSink,
) -> usize {
    let mut written = 0;
    for attribute in schema.attributes() {
        match read_field(attribute, row).and_then(|v| write_field(attribute, v, target)) {
            Ok(()) => written += 1,
            Err(error) => {
                let error = error.context(format!(
                    "Skipping column `{}` of table `{}`",
                    attribute.name(),
                    schema.table()
                ));
                log::warn!("{:#}", error);
                sink.record_error(OffsetDateTime::now_utc(), &error);
            }
        }
    }
    written
}

/// One instance per row, each created by `fresh` and then hydrated. The cursor is exhausted.
///
/// A row the backend fails to deliver aborts the whole read.
pub fn hydrate_all<E: 'static, I>(
    schema: &Schema<E>,
    fresh: &MethodDef<E>,
    rows: I,
    sink: &dyn LogSink,
) -> Result<Vec<E>>
where
    I: IntoIterator<Item = Result<RowLabeled>>,
{
    let mut result = Vec::new();
    for row in rows {
        let row = row?;
        let mut target = fresh.fresh()?;
        hydrate_row(schema, &row, &mut target, sink);
        result.push(target);
    }
    Ok(result)
}

/// Writes the key generated by an insert into `target`.
///
/// The key is looked up by the column name, falling back to the first column because backends
/// do not agree on how they label it.
pub fn capture_generated_key<E: 'static>(
    key: &Attribute<E>,
    row: &RowLabeled,
    target: &mut E,
) -> Result<()> {
    let field = key.field();
    let Some(value) = row.get_column(key.name()).or_else(|| row.values.first()) else {
        return Err(Fault::MissingColumn {
            column: key.name().to_string(),
        }
        .into());
    };
    let value = value.clone().into_erased(&field.value, field.nullable)?;
    write_field(key, value, target)
}
