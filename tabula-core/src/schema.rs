use crate::{Attribute, Fault, Result};
use std::fmt::{self, Debug, Display};

/// Ordered, duplicate free attributes of one table.
///
/// The views (`readable`, `writable`, `persist_writable`) are new schemas sharing the table name,
/// recomputed on every call so they follow the current accessor validity.
pub struct Schema<E: 'static> {
    table: String,
    attributes: Vec<Attribute<E>>,
}

impl<E: 'static> Schema<E> {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            attributes: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn attributes(&self) -> &[Attribute<E>] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut [Attribute<E>] {
        &mut self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, hash: i32) -> bool {
        self.attributes.iter().any(|v| v.hash() == hash)
    }

    pub fn get(&self, name: &str) -> Option<&Attribute<E>> {
        self.attributes.iter().find(|v| v.name() == name)
    }

    /// Appends `attribute`, rejecting it when another one has the same identity.
    pub fn insert(&mut self, attribute: Attribute<E>) -> Result<()> {
        if self.contains(attribute.hash()) {
            return Err(Fault::DuplicateColumn {
                table: self.table.clone(),
                column: attribute.name().to_string(),
            }
            .into());
        }
        self.attributes.push(attribute);
        Ok(())
    }

    fn filtered(&self, predicate: impl Fn(&Attribute<E>) -> bool) -> Self {
        Self {
            table: self.table.clone(),
            attributes: self
                .attributes
                .iter()
                .filter(|v| predicate(v))
                .cloned()
                .collect(),
        }
    }

    /// Attributes with a valid reader.
    pub fn readable(&self) -> Self {
        self.filtered(Attribute::has_valid_reader)
    }

    /// Attributes with a valid writer.
    pub fn writable(&self) -> Self {
        self.filtered(Attribute::has_valid_writer)
    }

    /// Readable attributes the caller supplies on insert and update: all but an auto generated key.
    pub fn persist_writable(&self) -> Self {
        self.filtered(|v| v.has_valid_reader() && !v.is_auto_generated())
    }

    pub fn primary_key_index(&self) -> Option<usize> {
        self.attributes.iter().position(Attribute::is_primary_key)
    }

    pub fn primary_key(&self) -> Option<&Attribute<E>> {
        self.primary_key_index().map(|i| &self.attributes[i])
    }

    /// The primary key, provided it also has a valid reader.
    pub fn valid_primary_key(&self) -> Option<&Attribute<E>> {
        self.primary_key().filter(|v| v.is_valid_primary_key())
    }

    pub fn has_valid_primary_key(&self) -> bool {
        self.valid_primary_key().is_some()
    }
}

impl<E: 'static> Clone for Schema<E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<E: 'static> Debug for Schema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("table", &self.table)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl<E: 'static> Display for Schema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table \"{}\"", self.table)?;
        for attribute in &self.attributes {
            write!(f, "\n\t{}", attribute)?;
        }
        Ok(())
    }
}
