use proc_macro::{self, TokenStream};

use proc_macro2 as pm2;

mod attributes;
mod model;

/// Derive the `Model` trait, describing a struct's fields and
/// relations.
///
/// This is only implemented for structs with named fields. Every
/// field is an own scalar field of the model unless annotated to
/// indicate otherwise. The annotations use the `jsonapi` attribute,
/// which has the following options on fields:
///
/// - `#[jsonapi(rename="new_name")]` Describe the annotated member as
///   `new_name` instead of using its name in the source code.
///
/// - `#[jsonapi(exclude)]` Do not describe this field at all.
///
/// - `#[jsonapi(to_one=my_crate::Author)]` This field holds a to-one
///   relation to the model `my_crate::Author`, which must itself
///   implement `Model`.
///
/// - `#[jsonapi(to_one=Author, related_name="books")]` As above, and
///   `Author` reaches back to this model through `books`. Without it,
///   the reverse accessor is `<resource name>_set`.
///
/// And on the struct itself:
///
/// - `#[jsonapi(model_name="Book")]` Identify the model as `Book`
///   instead of using the name of the struct.
///
/// - `#[jsonapi(abstract_model)]` The model is abstract, and cannot
///   be exposed as a resource.
#[proc_macro_derive(Model, attributes(jsonapi))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let derive: syn::DeriveInput = syn::parse_macro_input!(input);

    let res: pm2::TokenStream = model::derive_model(derive);

    res.into()
}
