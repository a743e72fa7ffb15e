use proc_macro2 as pm2;

use crate::attributes::{JsonapiContainer, JsonapiField, JsonapiMeta};

pub fn derive_model(input: syn::DeriveInput) -> pm2::TokenStream {
    let syn::DeriveInput {
        ident,
        data,
        generics,
        attrs,
        ..
    } = input;

    let mut container = JsonapiContainer::default();
    for attr in attrs.iter() {
        if attr.path.is_ident("jsonapi") {
            match attr.parse_args::<JsonapiContainer>() {
                Ok(parsed) => container.merge(parsed),
                Err(e) => {
                    return syn::Error::into_compile_error(e);
                }
            }
        }
    }

    let model_name = container
        .model_name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));
    let is_abstract = container.is_abstract;

    let mut body = pm2::TokenStream::new();

    let (generics, ty_generics, wc) = generics.split_for_impl();

    if let syn::Data::Struct(s) = data {
        if let syn::Fields::Named(syn::FieldsNamed { named, .. }) = s.fields {
            for field in named.iter() {
                let fieldid = field.ident.as_ref().unwrap();
                let mut meta = JsonapiMeta::default();

                for attr in field.attrs.iter() {
                    if attr.path.is_ident("jsonapi") {
                        match attr.parse_args::<JsonapiMeta>() {
                            Ok(parsed) => meta.merge(parsed),
                            Err(e) => {
                                return syn::Error::into_compile_error(e);
                            }
                        }
                    }
                }

                let fieldname = meta
                    .name
                    .clone()
                    .unwrap_or_else(|| syn::LitStr::new(&fieldid.to_string(), fieldid.span()));
                let kind = match meta.field() {
                    Ok(kind) => kind,
                    Err(e) => {
                        return syn::Error::into_compile_error(e);
                    }
                };

                match kind {
                    JsonapiField::Scalar => {
                        body.extend(quote::quote! {
                            visitor.visit_field(#fieldname);
                        });
                    }
                    JsonapiField::ToOne {
                        target,
                        related_name,
                    } => {
                        let related_name = match related_name {
                            Some(name) => quote::quote! { ::core::option::Option::Some(#name) },
                            None => quote::quote! { ::core::option::Option::None },
                        };
                        body.extend(quote::quote! {
                            visitor.visit_to_one(
                                #fieldname,
                                <#target as ::jsonapi_query::model::Model>::model_id(),
                                #related_name,
                            );
                        });
                    }
                    JsonapiField::Excluded => {}
                }
            }
        } else {
            return syn::Error::new(
                ident.span(),
                "Model can only be derived for structs with named fields.",
            )
            .to_compile_error();
        }
    } else {
        return syn::Error::new(
            ident.span(),
            "Model can only be derived for structs with named fields.",
        )
        .to_compile_error();
    }

    quote::quote! {
        const _: () = {
            #[automatically_derived]
            impl #generics ::jsonapi_query::model::Model for #ident #ty_generics #wc {
                fn model_id() -> ::jsonapi_query::model::ModelId {
                    ::jsonapi_query::model::ModelId::qualified(
                        ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)),
                        #model_name,
                    )
                }

                fn is_abstract() -> bool {
                    #is_abstract
                }

                #[allow(unused_variables)]
                fn accept_visitor<V: ::jsonapi_query::model::ModelVisitor>(visitor: &mut V)
                where
                    Self: Sized
                {
                    #body
                }
            }
        };
    }
}
