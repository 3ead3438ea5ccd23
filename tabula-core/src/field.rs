use crate::Value;
use std::{
    any::{TypeId, type_name},
    fmt::{self, Debug},
};

struct Opaque;

/// Identity of a Rust type as seen by the derive macros: its written name and its `TypeId`.
///
/// Two `TypeInfo` are equal when their `TypeId`s are, the name is only for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: fn() -> TypeId,
}

impl TypeInfo {
    pub const fn new(name: &'static str, id: fn() -> TypeId) -> Self {
        Self { name, id }
    }

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>,
        }
    }

    /// A type that cannot take part in accessor matching (references, `impl Trait`, ...).
    pub const fn opaque(name: &'static str) -> Self {
        Self {
            name,
            id: TypeId::of::<Opaque>,
        }
    }

    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    pub fn is_opaque(&self) -> bool {
        self.type_id() == TypeId::of::<Opaque>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        !self.is_opaque() && self.type_id() == other.type_id()
    }
}

impl Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Primary key marker of a field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryKey {
    /// The backend generates the value, the field is skipped on insert and filled afterwards.
    pub auto_increment: bool,
}

/// Declarative description of a persisted field, emitted by `#[derive(Entity)]`.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier as written in the struct.
    pub ident: &'static str,
    /// Persisted column name.
    pub column: &'static str,
    /// Declared Rust type.
    pub ty: TypeInfo,
    /// Column type prototype, `Value::Null` when the declared type is not supported.
    pub value: Value,
    /// Declared as `Option<T>`.
    pub nullable: bool,
    pub primary_key: Option<PrimaryKey>,
}

impl FieldDef {
    pub fn is_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }

    pub fn is_auto_increment(&self) -> bool {
        self.primary_key.is_some_and(|v| v.auto_increment)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.value, Value::Boolean(..))
    }
}
