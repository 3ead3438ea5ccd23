use proc_macro2::{Group, TokenStream, TokenTree};
use quote::{ToTokens, quote};

/// Replaces every `Self` with `self_ty`, statics cannot name `Self`.
pub(crate) fn replace_self(input: TokenStream, self_ty: &TokenStream) -> TokenStream {
    input
        .into_iter()
        .flat_map(|token| match token {
            TokenTree::Ident(ident) if ident == "Self" => self_ty.clone(),
            TokenTree::Group(group) => {
                let mut replaced =
                    Group::new(group.delimiter(), replace_self(group.stream(), self_ty));
                replaced.set_span(group.span());
                TokenTree::Group(replaced).into_token_stream()
            }
            token => token.into_token_stream(),
        })
        .collect()
}

/// Types whose `TypeId` cannot be taken or that can never match a field: references, lifetimes,
/// `impl Trait` and inferred types.
pub(crate) fn is_opaque(input: &TokenStream) -> bool {
    input.clone().into_iter().any(|token| match token {
        TokenTree::Punct(punct) => matches!(punct.as_char(), '&' | '\''),
        TokenTree::Ident(ident) => ident == "impl" || ident == "_",
        TokenTree::Group(group) => is_opaque(&group.stream()),
        TokenTree::Literal(..) => false,
    })
}

/// `Option < bool >` => `Option<bool>`
pub(crate) fn type_text(input: &TokenStream) -> String {
    let word = |c: char| c.is_alphanumeric() || c == '_';
    let mut result = String::new();
    let mut pending = false;
    for c in input.to_string().chars() {
        if c.is_whitespace() {
            pending = true;
            continue;
        }
        if pending && word(c) && result.ends_with(word) {
            result.push(' ');
        }
        pending = false;
        result.push(c);
    }
    result
}

pub(crate) fn type_info(ty: &TokenStream) -> TokenStream {
    let name = type_text(ty);
    if is_opaque(ty) {
        quote!(::tabula::TypeInfo::opaque(#name))
    } else {
        quote!(::tabula::TypeInfo::new(#name, ::std::any::TypeId::of::<#ty>))
    }
}
