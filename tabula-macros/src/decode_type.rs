use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// What the field type tells about the column.
pub(crate) struct TypeDecoded {
    /// `::tabula::Value` prototype, `Value::Null` when the type is not supported.
    pub(crate) value: TokenStream,
    pub(crate) nullable: bool,
}

fn option_inner(path: &TypePath) -> Option<&Type> {
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &last.arguments else {
        return None;
    };
    match arguments.args.first()? {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    }
}

fn prototype(ty: &Type) -> Option<TokenStream> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    if !last.arguments.is_none() {
        return None;
    }
    Some(match last.ident.to_string().as_str() {
        "bool" => quote!(::tabula::Value::Boolean(None)),
        "i8" => quote!(::tabula::Value::Int8(None)),
        "i16" => quote!(::tabula::Value::Int16(None)),
        "i32" => quote!(::tabula::Value::Int32(None)),
        "i64" => quote!(::tabula::Value::Int64(None)),
        "f32" => quote!(::tabula::Value::Float32(None)),
        "f64" => quote!(::tabula::Value::Float64(None)),
        "String" => quote!(::tabula::Value::Varchar(None)),
        _ => return None,
    })
}

pub(crate) fn decode_type(ty: &Type) -> TypeDecoded {
    let (inner, nullable) = match ty {
        Type::Path(path) => match option_inner(path) {
            Some(inner) => (inner, true),
            None => (ty, false),
        },
        _ => (ty, false),
    };
    TypeDecoded {
        value: prototype(inner).unwrap_or_else(|| quote!(::tabula::Value::Null)),
        nullable,
    }
}
