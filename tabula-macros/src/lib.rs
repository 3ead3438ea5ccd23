mod decode_column;
mod decode_method;
mod decode_table;
mod decode_type;
mod util;

use decode_method::decode_method;
use decode_table::decode_table;
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{ImplItem, ItemImpl, ItemStruct, parse_macro_input};
use util::{replace_self, type_info};

/// Implements `tabula::Entity`: the table name and the persisted fields.
///
/// ```rust,ignore
/// #[derive(Entity)]
/// #[tabula(table = "people")]
/// struct Person {
///     #[tabula(column = "id", primary_key, auto_increment)]
///     id: i64,
///     #[tabula(column)]
///     first_name: String,
///     cache: Vec<u8>,
/// }
/// ```
///
/// Only the fields marked `column` are persisted. The type must also implement `tabula::Accessors`,
/// usually through `#[accessors]`.
#[proc_macro_derive(Entity, attributes(tabula))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let table = decode_table(parse_macro_input!(input as ItemStruct));
    let name = &table.item.ident;
    let self_ty = name.to_token_stream();
    let table_name = match &table.name {
        Some(v) => quote!(::std::option::Option::Some(#v)),
        None => quote!(::std::option::Option::None),
    };
    let count = table.columns.len();
    let fields = table.columns.iter().map(|column| {
        let ident = column.ident.to_string();
        let name = &column.name;
        let ty = type_info(&replace_self(column.ty.to_token_stream(), &self_ty));
        let value = &column.value;
        let nullable = column.nullable;
        let primary_key = if column.primary_key {
            let auto_increment = column.auto_increment;
            quote!(::std::option::Option::Some(::tabula::PrimaryKey { auto_increment: #auto_increment }))
        } else {
            quote!(::std::option::Option::None)
        };
        quote! {
            ::tabula::FieldDef {
                ident: #ident,
                column: #name,
                ty: #ty,
                value: #value,
                nullable: #nullable,
                primary_key: #primary_key,
            }
        }
    });
    quote! {
        impl ::tabula::Entity for #name {
            fn table_name() -> ::std::option::Option<&'static str> {
                #table_name
            }

            fn fields() -> &'static [::tabula::FieldDef] {
                static FIELDS: [::tabula::FieldDef; #count] = [#(#fields),*];
                &FIELDS
            }
        }
    }
    .into()
}

/// Implements `tabula::Accessors` from an inherent impl block, listing its methods in order.
///
/// Methods can be bound explicitly with `#[tabula(reader = "column")]`,
/// `#[tabula(writer = "column")]`, and the blank instance factory used by bulk reads is marked
/// with `#[tabula(fresh)]`. Unmarked methods are matched by name: `get_x`, `is_x`, `set_x`.
#[proc_macro_attribute]
pub fn accessors(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        panic!("`accessors` takes no arguments, use it like: `#[accessors] impl MyEntity {{ .. }}`");
    }
    let mut item = parse_macro_input!(input as ItemImpl);
    if item.trait_.is_some() {
        panic!("`accessors` must be placed on an inherent impl block");
    }
    if !item.generics.params.is_empty() {
        panic!("`accessors` does not support generic impl blocks");
    }
    let self_ty = item.self_ty.to_token_stream();
    let methods: Vec<_> = item
        .items
        .iter_mut()
        .filter_map(|v| match v {
            ImplItem::Fn(method) => Some(decode_method(method, &self_ty)),
            _ => None,
        })
        .collect();
    let count = methods.len();
    quote! {
        #item

        impl ::tabula::Accessors for #self_ty {
            fn methods() -> &'static [::tabula::MethodDef<Self>] {
                static METHODS: [::tabula::MethodDef<#self_ty>; #count] = [#(#methods),*];
                &METHODS
            }
        }
    }
    .into()
}
