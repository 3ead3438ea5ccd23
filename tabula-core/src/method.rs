use crate::{Error, Result, TypeInfo};
use std::{
    any::Any,
    fmt::{self, Debug},
};

/// How a method takes `self`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// Associated function.
    None,
    /// `&self`
    Ref,
    /// `&mut self`
    Mut,
    /// `self`
    Value,
}

/// Explicit metadata attached to a method with `#[tabula(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    None,
    /// `#[tabula(reader = "column")]`
    Reader(&'static str),
    /// `#[tabula(writer = "column")]`
    Writer(&'static str),
    /// `#[tabula(fresh)]`
    Fresh,
}

/// Type erased call into the method, generated only for the shapes that can be accessors.
pub enum Invoke<E> {
    Read(fn(&E) -> Box<dyn Any>),
    Write(fn(&mut E, Box<dyn Any>) -> Result<()>),
    Fresh(fn() -> E),
    Opaque,
}

/// One method of an `#[accessors]` impl block.
pub struct MethodDef<E: 'static> {
    pub name: &'static str,
    pub receiver: Receiver,
    /// Parameters, receiver excluded.
    pub params: &'static [TypeInfo],
    pub returns: TypeInfo,
    pub binding: Binding,
    pub invoke: Invoke<E>,
}

impl<E: 'static> MethodDef<E> {
    /// Zero arguments, `&self`, returning exactly `ty`.
    pub fn is_reader_of(&self, ty: &TypeInfo) -> bool {
        self.receiver == Receiver::Ref
            && self.params.is_empty()
            && self.returns == *ty
            && matches!(self.invoke, Invoke::Read(..))
    }

    /// `&mut self` and a single argument of exactly `ty`.
    pub fn is_writer_of(&self, ty: &TypeInfo) -> bool {
        self.receiver == Receiver::Mut
            && self.params.len() == 1
            && self.params[0] == *ty
            && matches!(self.invoke, Invoke::Write(..))
    }

    /// Zero arguments, no receiver, returning the entity type.
    pub fn is_fresh_factory(&self) -> bool {
        self.receiver == Receiver::None
            && self.params.is_empty()
            && self.returns == TypeInfo::of::<E>()
            && matches!(self.invoke, Invoke::Fresh(..))
    }

    pub fn read(&self, entity: &E) -> Result<Box<dyn Any>> {
        match self.invoke {
            Invoke::Read(f) => Ok(f(entity)),
            _ => Err(Error::msg(format!("`{}` is not a reader", self.name))),
        }
    }

    pub fn write(&self, entity: &mut E, value: Box<dyn Any>) -> Result<()> {
        match self.invoke {
            Invoke::Write(f) => f(entity, value),
            _ => Err(Error::msg(format!("`{}` is not a writer", self.name))),
        }
    }

    pub fn fresh(&self) -> Result<E> {
        match self.invoke {
            Invoke::Fresh(f) => Ok(f()),
            _ => Err(Error::msg(format!(
                "`{}` is not a fresh instance factory",
                self.name
            ))),
        }
    }
}

impl<E: 'static> Debug for MethodDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("binding", &self.binding)
            .field(
                "invoke",
                &match self.invoke {
                    Invoke::Read(..) => "read",
                    Invoke::Write(..) => "write",
                    Invoke::Fresh(..) => "fresh",
                    Invoke::Opaque => "opaque",
                },
            )
            .finish()
    }
}
