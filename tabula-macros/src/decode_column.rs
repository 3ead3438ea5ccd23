use crate::decode_type::{TypeDecoded, decode_type};
use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Field, Ident, LitStr, Type, ext::IdentExt, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
}

/// `None` when the field is not persisted.
pub(crate) fn decode_column(field: &Field) -> Option<ColumnMetadata> {
    let ident = field
        .ident
        .clone()
        .expect("Entity fields are expected to have a name");
    let TypeDecoded { value, nullable } = decode_type(&field.ty);
    let mut name = ident.unraw().to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        ty: field.ty.clone(),
        name,
        value,
        nullable,
        primary_key: false,
        auto_increment: false,
    };
    let mut persisted = false;
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("tabula") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `tabula`, use it like: `#[tabula(column = \"name\", ...)]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("column") {
                persisted = true;
                if arg.input.is_empty() || arg.input.peek(syn::Token![,]) {
                    return Ok(());
                }
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `column`, use it like: `#[tabula(column = \"my_column\")]` or `#[tabula(column)]`"
                    );
                };
                metadata.name = v.value();
            } else if arg.path.is_ident("primary_key") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `primary_key`, use it like: `#[tabula(primary_key)]`");
                };
                metadata.primary_key = true;
            } else if arg.path.is_ident("auto_increment") {
                let Err(..) = arg.value() else {
                    panic!(
                        "Error while parsing `auto_increment`, use it like: `#[tabula(auto_increment)]`"
                    );
                };
                metadata.auto_increment = true;
            } else {
                panic!(
                    "Unknown attribute `{}` inside tabula macro",
                    arg.path.to_token_stream().to_string()
                );
            }
            Ok(())
        });
    }
    if metadata.auto_increment && !metadata.primary_key {
        panic!(
            "Field `{}` is `auto_increment` but not `primary_key`, only a primary key can be generated",
            metadata.ident
        );
    }
    if !persisted {
        if metadata.primary_key {
            panic!(
                "Field `{}` is a primary key but not a column, add `#[tabula(column)]`",
                metadata.ident
            );
        }
        return None;
    }
    Some(metadata)
}
