//! Maps plain structs to rows of a relational table without hand-written SQL.
//!
//! `#[derive(Entity)]` declares the table and the persisted fields, `#[accessors]` lists the
//! methods reading and writing them, and a [`Repository`] generates, binds and runs the CRUD
//! statements by primary key over any [`Connection`].
pub use tabula_core::*;
pub use tabula_macros::*;
