use crate::util::{is_opaque, replace_self, type_info, type_text};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{FnArg, ImplItemFn, LitStr, ReturnType, Type, ext::IdentExt, parse::ParseBuffer};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Receiver {
    None,
    Ref,
    Mut,
    Value,
}

fn decode_binding(method: &ImplItemFn) -> TokenStream {
    let mut binding = quote!(::tabula::Binding::None);
    for attr in &method.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("tabula") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!("Error while parsing `tabula`, use it like: `#[tabula(reader = \"column\")]`");
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("reader") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `reader`, use it like: `#[tabula(reader = \"column\")]`");
                };
                binding = quote!(::tabula::Binding::Reader(#v));
            } else if arg.path.is_ident("writer") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!("Error while parsing `writer`, use it like: `#[tabula(writer = \"column\")]`");
                };
                binding = quote!(::tabula::Binding::Writer(#v));
            } else if arg.path.is_ident("fresh") {
                let Err(..) = arg.value() else {
                    panic!("Error while parsing `fresh`, use it like: `#[tabula(fresh)]`");
                };
                binding = quote!(::tabula::Binding::Fresh);
            } else {
                panic!(
                    "Unknown attribute `{}` inside tabula macro",
                    arg.path.to_token_stream().to_string()
                );
            }
            Ok(())
        });
    }
    binding
}

/// Builds the `MethodDef` of `method` and strips its `#[tabula(...)]` attributes.
pub(crate) fn decode_method(method: &mut ImplItemFn, self_ty: &TokenStream) -> TokenStream {
    let binding = decode_binding(method);
    method.attrs.retain(|attr| !attr.path().is_ident("tabula"));
    let sig = &method.sig;
    let ident = &sig.ident;
    let name = ident.unraw().to_string();
    let callable = sig.generics.params.is_empty()
        && sig.asyncness.is_none()
        && sig.unsafety.is_none()
        && sig.variadic.is_none();
    let mut receiver = Receiver::None;
    let mut params = Vec::new();
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(r) => {
                receiver = match &*r.ty {
                    Type::Reference(reference) if reference.mutability.is_some() => Receiver::Mut,
                    Type::Reference(..) => Receiver::Ref,
                    _ => Receiver::Value,
                }
            }
            FnArg::Typed(typed) => params.push(replace_self(typed.ty.to_token_stream(), self_ty)),
        }
    }
    let (returns, unit) = match &sig.output {
        ReturnType::Default => (quote!(()), true),
        ReturnType::Type(_, ty) => (
            replace_self(ty.to_token_stream(), self_ty),
            matches!(&**ty, Type::Tuple(tuple) if tuple.elems.is_empty()),
        ),
    };
    let fallible = matches!(
        &sig.output,
        ReturnType::Type(_, ty) if matches!(
            &**ty,
            Type::Path(path) if path.path.segments.last().is_some_and(|v| v.ident == "Result")
        )
    );
    let as_info = |ty: &TokenStream| {
        if callable {
            type_info(ty)
        } else {
            let name = type_text(ty);
            quote!(::tabula::TypeInfo::opaque(#name))
        }
    };
    let receiver_tokens = match receiver {
        Receiver::None => quote!(::tabula::Receiver::None),
        Receiver::Ref => quote!(::tabula::Receiver::Ref),
        Receiver::Mut => quote!(::tabula::Receiver::Mut),
        Receiver::Value => quote!(::tabula::Receiver::Value),
    };
    let invoke = match (receiver, params.as_slice()) {
        (Receiver::Ref, []) if callable && !unit && !is_opaque(&returns) => quote! {
            ::tabula::Invoke::Read(
                |entity: &#self_ty| -> ::std::boxed::Box<dyn ::std::any::Any> {
                    ::std::boxed::Box::new(<#self_ty>::#ident(entity))
                }
            )
        },
        (Receiver::Mut, [param]) if callable && !is_opaque(param) => {
            let message = format!(
                "`{}` expects an argument of type `{}`",
                name,
                type_text(param)
            );
            // A setter returning `Result` rejects the value with its error
            let call = if fallible {
                quote! {
                    if let Err(error) = <#self_ty>::#ident(entity, *value) {
                        return Err(::tabula::Error::msg(::std::format!("{:?}", error)));
                    }
                }
            } else {
                quote!(let _ = <#self_ty>::#ident(entity, *value);)
            };
            quote! {
                ::tabula::Invoke::Write(
                    |entity: &mut #self_ty, value: ::std::boxed::Box<dyn ::std::any::Any>| -> ::tabula::Result<()> {
                        let Ok(value) = value.downcast::<#param>() else {
                            return Err(::tabula::Error::msg(#message));
                        };
                        #call
                        Ok(())
                    }
                )
            }
        }
        (Receiver::None, []) if callable && type_text(&returns) == type_text(self_ty) => quote! {
            ::tabula::Invoke::Fresh(|| -> #self_ty { <#self_ty>::#ident() })
        },
        _ => quote!(::tabula::Invoke::Opaque),
    };
    let params = params.iter().map(|v| as_info(v));
    let returns = as_info(&returns);
    quote! {
        ::tabula::MethodDef {
            name: #name,
            receiver: #receiver_tokens,
            params: &[#(#params),*],
            returns: #returns,
            binding: #binding,
            invoke: #invoke,
        }
    }
}
