mod attribute;
mod connection;
mod context;
mod entity;
mod error;
mod field;
mod log_sink;
mod method;
mod repository;
mod row;
mod schema;
mod util;
mod value;

pub mod binder;
pub mod hydrator;
pub mod resolver;
pub mod writer;

pub use ::anyhow::Context;
pub use attribute::*;
pub use connection::*;
pub use context::*;
pub use entity::*;
pub use error::*;
pub use field::*;
pub use log_sink::*;
pub use method::*;
pub use repository::*;
pub use row::*;
pub use schema::*;
pub use util::*;
pub use value::*;
pub use writer::{
    GenericSqlWriter, SqlWriter, build_delete, build_insert, build_select_all,
    build_select_by_key, build_update,
};

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
