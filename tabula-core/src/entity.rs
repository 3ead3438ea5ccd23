use crate::{FieldDef, MethodDef};

/// Method table of a type, emitted by `#[accessors]` on its inherent impl block.
///
/// The default is an empty table: `impl Accessors for MyType {}` declares a type without
/// accessors, all of its attributes stay unresolved.
pub trait Accessors: Sized + 'static {
    fn methods() -> &'static [MethodDef<Self>] {
        &[]
    }
}

/// Static capability of a type whose instances are rows of one table, emitted by `#[derive(Entity)]`.
pub trait Entity: Accessors {
    /// Table declared with `#[tabula(table = "...")]`, `None` when the struct declares none.
    fn table_name() -> Option<&'static str>;

    /// Fields marked with `#[tabula(column = "...")]`, in declaration order.
    fn fields() -> &'static [FieldDef];
}
