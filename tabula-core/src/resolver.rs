use crate::{Attribute, Binding, Entity, Fault, FieldDef, MethodDef, Result, Schema};
use std::any::type_name;

/// Everything discovered about an entity type.
#[derive(Debug)]
pub struct Resolution<E: 'static> {
    pub schema: Schema<E>,
    /// Factory producing the blank instances filled by bulk reads.
    pub fresh: Option<&'static MethodDef<E>>,
    /// Anomalies recovered during the discovery, the schema is degraded accordingly.
    pub faults: Vec<Fault>,
}

/// Conventional reader name of a field: `get_<field>`, or `is_<field>` for booleans.
pub fn reader_name(field: &FieldDef) -> String {
    let prefix = if field.is_boolean() { "is" } else { "get" };
    format!("{}_{}", prefix, field.ident.trim_start_matches('_'))
}

/// Conventional writer name of a field: `set_<field>`.
pub fn writer_name(field: &FieldDef) -> String {
    format!("set_{}", field.ident.trim_start_matches('_'))
}

/// Discovers the persisted attributes of `E`, their accessors and the fresh instance factory.
///
/// Fails only when `E` declares no table. Duplicate columns and missing accessors are
/// recorded in [`Resolution::faults`] and resolution continues with the remaining fields.
pub fn resolve<E: Entity>() -> Result<Resolution<E>> {
    let Some(table) = E::table_name() else {
        let error = Fault::NotAnEntity {
            ty: type_name::<E>(),
        };
        log::error!("{}", error);
        return Err(error.into());
    };
    let methods = E::methods();
    let mut schema = Schema::<E>::new(table);
    let mut faults = Vec::new();
    for field in E::fields() {
        let mut attribute = Attribute::new(field);
        attribute.reader = find_accessor(
            methods,
            attribute.name(),
            &reader_name(field),
            |m| matches!(m.binding, Binding::Reader(c) if c == attribute.name()),
            |m| m.is_reader_of(&field.ty),
        );
        attribute.writer = find_accessor(
            methods,
            attribute.name(),
            &writer_name(field),
            |m| matches!(m.binding, Binding::Writer(c) if c == attribute.name()),
            |m| m.is_writer_of(&field.ty),
        );
        for (accessor, missing) in [
            ("reader", attribute.reader.is_none()),
            ("writer", attribute.writer.is_none()),
        ] {
            if missing {
                let fault = Fault::UnresolvedAccessor {
                    column: attribute.name().to_string(),
                    accessor,
                };
                log::debug!("{}: {}", table, fault);
                faults.push(fault);
            }
        }
        if let Err(error) = schema.insert(attribute) {
            log::warn!("{:#}", error);
            faults.push(Fault::classify(error));
        }
    }
    let fresh = find_fresh(methods);
    Ok(Resolution {
        schema,
        fresh,
        faults,
    })
}

/// An explicit binding is used alone when it is the only one for the column, the naming
/// convention decides otherwise.
fn find_accessor<E: 'static>(
    methods: &'static [MethodDef<E>],
    column: &str,
    conventional: &str,
    explicit: impl Fn(&MethodDef<E>) -> bool,
    valid: impl Fn(&MethodDef<E>) -> bool,
) -> Option<&'static MethodDef<E>> {
    let bound = methods.iter().filter(|m| explicit(m)).collect::<Vec<_>>();
    match bound.as_slice() {
        [method] => {
            if valid(method) {
                return Some(*method);
            }
            log::warn!(
                "method `{}` is bound to column `{}` but its signature does not match the field",
                method.name,
                column
            );
            return None;
        }
        [] => {}
        _ => log::warn!(
            "column `{}` has {} explicitly bound accessors, falling back to `{}`",
            column,
            bound.len(),
            conventional
        ),
    }
    methods
        .iter()
        .find(|m| m.name == conventional && valid(m))
}

fn find_fresh<E: 'static>(methods: &'static [MethodDef<E>]) -> Option<&'static MethodDef<E>> {
    let mut tagged = methods
        .iter()
        .filter(|m| m.binding == Binding::Fresh && m.is_fresh_factory());
    let fresh = tagged.next();
    for ignored in tagged {
        log::warn!(
            "fresh instance factory `{}` is ignored, `{}` was found first",
            ignored.name,
            fresh.map_or("", |m| m.name),
        );
    }
    fresh
}
