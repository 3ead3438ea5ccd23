use crate::{Fault, FieldDef, MethodDef, Result, util::identity_hash};
use std::fmt::{self, Debug, Display};

/// One persisted field of an entity: the column name, the field it describes and the accessors
/// moving its value in and out of an instance.
///
/// The accessors are optional, and a bound accessor whose signature does not match the field is
/// reported as not valid rather than dropped, consumers check validity before using it.
pub struct Attribute<E: 'static> {
    name: String,
    hash: i32,
    field: &'static FieldDef,
    pub reader: Option<&'static MethodDef<E>>,
    pub writer: Option<&'static MethodDef<E>>,
}

impl<E: 'static> Attribute<E> {
    pub fn new(field: &'static FieldDef) -> Self {
        Self {
            name: field.column.to_string(),
            hash: identity_hash(field.column),
            field,
            reader: None,
            writer: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.hash = identity_hash(&self.name);
    }

    /// Identity of the attribute inside a schema, derived from its name only.
    pub fn hash(&self) -> i32 {
        self.hash
    }

    pub fn field(&self) -> &'static FieldDef {
        self.field
    }

    pub fn has_valid_reader(&self) -> bool {
        self.reader.is_some_and(|m| m.is_reader_of(&self.field.ty))
    }

    pub fn has_valid_writer(&self) -> bool {
        self.writer.is_some_and(|m| m.is_writer_of(&self.field.ty))
    }

    pub fn valid_reader(&self) -> Option<&'static MethodDef<E>> {
        self.reader.filter(|m| m.is_reader_of(&self.field.ty))
    }

    pub fn valid_writer(&self) -> Option<&'static MethodDef<E>> {
        self.writer.filter(|m| m.is_writer_of(&self.field.ty))
    }

    /// Fails with `UnsupportedColumnType` when no value type maps the field.
    pub fn ensure_supported(&self) -> Result<()> {
        if !self.field.value.is_supported() {
            return Err(Fault::UnsupportedColumnType {
                column: self.name.clone(),
                ty: self.field.ty.name,
            }
            .into());
        }
        Ok(())
    }

    pub fn is_primary_key(&self) -> bool {
        self.field.is_primary_key()
    }

    pub fn is_auto_generated(&self) -> bool {
        self.field.is_auto_increment()
    }

    /// Primary key with a valid reader, the only kind usable in a WHERE clause.
    pub fn is_valid_primary_key(&self) -> bool {
        self.is_primary_key() && self.has_valid_reader()
    }
}

impl<E: 'static> Clone for Attribute<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            hash: self.hash,
            field: self.field,
            reader: self.reader,
            writer: self.writer,
        }
    }
}

impl<E: 'static> PartialEq for Attribute<E> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl<E: 'static> Debug for Attribute<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .field("field", &self.field.ident)
            .field("reader", &self.reader.map(|m| m.name))
            .field("writer", &self.writer.map(|m| m.name))
            .finish()
    }
}

impl<E: 'static> Display for Attribute<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column: {}, field: {}, reader: {}, writer: {}, primary key: {}",
            self.name,
            self.field.ident,
            self.reader.map_or("null", |m| m.name),
            self.writer.map_or("null", |m| m.name),
            self.is_valid_primary_key(),
        )
    }
}
