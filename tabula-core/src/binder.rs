//! Moves entity values into statement parameters.

use crate::{Attribute, Fault, Prepared, Result, Schema, Value};

/// Current value of `attribute` in `entity`, an absent value becomes the zero of the column type.
pub fn read_value<E: 'static>(attribute: &Attribute<E>, entity: &E) -> Result<Value> {
    attribute.ensure_supported()?;
    let field = attribute.field();
    let Some(reader) = attribute.valid_reader() else {
        return Err(Fault::UnresolvedAccessor {
            column: attribute.name().to_string(),
            accessor: "reader",
        }
        .into());
    };
    let value = Value::from_erased(&field.value, field.nullable, reader.read(entity)?)?;
    Ok(if value.is_null() {
        field.value.zero()
    } else {
        value
    })
}

/// Binds every attribute, in order, at positions `1..=attributes.len()`.
///
/// A column of an unsupported type aborts before anything is bound.
pub fn bind_columns<'p, E: 'static, P: Prepared>(
    attributes: &[Attribute<E>],
    statement: &'p mut P,
    entity: &E,
) -> Result<&'p mut P> {
    for attribute in attributes {
        attribute.ensure_supported()?;
    }
    for (i, attribute) in attributes.iter().enumerate() {
        let value = read_value(attribute, entity)?;
        statement.bind_index(value, i as u64 + 1)?;
    }
    Ok(statement)
}

/// Binds the current primary key of `entity` at `position`.
pub fn bind_primary_key<'p, E: 'static, P: Prepared>(
    schema: &Schema<E>,
    statement: &'p mut P,
    entity: &E,
    position: u64,
) -> Result<&'p mut P> {
    let Some(key) = schema.valid_primary_key() else {
        return Err(Fault::NoPrimaryKey {
            table: schema.table().to_string(),
        }
        .into());
    };
    let value = read_value(key, entity)?;
    statement.bind_index(value, position)
}
