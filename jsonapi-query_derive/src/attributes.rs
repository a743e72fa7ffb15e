#[derive(Debug)]
pub enum JsonapiItem {
    Rename(syn::LitStr),
    Ignored,
    ToOne(syn::Path),
    RelatedName(syn::LitStr),
    ModelName(syn::LitStr),
    Abstract,
}

impl syn::parse::Parse for JsonapiItem {
    fn parse(input: syn::parse::ParseStream<'_>) -> syn::Result<Self> {
        let attr: syn::Ident = input.parse()?;
        match attr.to_string().as_str() {
            "rename" => {
                // rename = "my_field"
                let _: syn::Token![=] = input.parse()?;
                let new_name: syn::LitStr = input.parse()?;
                Ok(JsonapiItem::Rename(new_name))
            }
            "exclude" => Ok(JsonapiItem::Ignored),
            "to_one" => {
                // to_one = my_crate::Author
                let _: syn::Token![=] = input.parse()?;
                let target = input.call(syn::Path::parse_mod_style)?;
                Ok(JsonapiItem::ToOne(target))
            }
            "related_name" => {
                let _: syn::Token![=] = input.parse()?;
                let name = input.parse()?;
                Ok(JsonapiItem::RelatedName(name))
            }
            "model_name" => {
                let _: syn::Token![=] = input.parse()?;
                let name = input.parse()?;
                Ok(JsonapiItem::ModelName(name))
            }
            "abstract_model" => Ok(JsonapiItem::Abstract),
            _ => Err(syn::Error::new_spanned(
                attr,
                "unsupported jsonapi attribute",
            )),
        }
    }
}

#[derive(Debug)]
pub enum JsonapiField {
    Scalar,
    ToOne {
        target: syn::Path,
        related_name: Option<syn::LitStr>,
    },
    Excluded,
}

/// Markup on a field.
///
/// A field may carry several `jsonapi` attributes; each one only
/// updates the options it names.
#[derive(Debug, Default)]
pub struct JsonapiMeta {
    pub name: Option<syn::LitStr>,
    pub excluded: bool,
    pub target: Option<syn::Path>,
    pub related_name: Option<syn::LitStr>,
}

impl JsonapiMeta {
    pub fn merge(&mut self, other: JsonapiMeta) {
        if other.name.is_some() {
            self.name = other.name;
        }
        self.excluded |= other.excluded;
        if other.target.is_some() {
            self.target = other.target;
        }
        if other.related_name.is_some() {
            self.related_name = other.related_name;
        }
    }

    /// Settle what kind of field the accumulated markup describes.
    pub fn field(self) -> syn::Result<JsonapiField> {
        if self.excluded {
            Ok(JsonapiField::Excluded)
        } else if let Some(target) = self.target {
            Ok(JsonapiField::ToOne {
                target,
                related_name: self.related_name,
            })
        } else if let Some(name) = self.related_name {
            Err(syn::Error::new(name.span(), "related_name requires to_one"))
        } else {
            Ok(JsonapiField::Scalar)
        }
    }
}

impl syn::parse::Parse for JsonapiMeta {
    fn parse(input: syn::parse::ParseStream<'_>) -> syn::Result<Self> {
        let mut res = JsonapiMeta::default();
        let punc =
            syn::punctuated::Punctuated::<JsonapiItem, syn::Token![,]>::parse_terminated(input)?;

        for item in punc {
            match item {
                JsonapiItem::Rename(new_name) => {
                    res.name = Some(new_name);
                }
                JsonapiItem::Ignored => {
                    res.excluded = true;
                }
                JsonapiItem::ToOne(path) => res.target = Some(path),
                JsonapiItem::RelatedName(name) => res.related_name = Some(name),
                JsonapiItem::ModelName(name) => {
                    return Err(syn::Error::new(
                        name.span(),
                        "model_name belongs on the struct, not a field",
                    ));
                }
                JsonapiItem::Abstract => {
                    return Err(syn::Error::new(
                        input.span(),
                        "abstract_model belongs on the struct, not a field",
                    ));
                }
            }
        }

        Ok(res)
    }
}

/// Markup on the struct itself.
#[derive(Debug, Default)]
pub struct JsonapiContainer {
    pub model_name: Option<syn::LitStr>,
    pub is_abstract: bool,
}

impl syn::parse::Parse for JsonapiContainer {
    fn parse(input: syn::parse::ParseStream<'_>) -> syn::Result<Self> {
        let mut res = JsonapiContainer::default();
        let punc =
            syn::punctuated::Punctuated::<JsonapiItem, syn::Token![,]>::parse_terminated(input)?;

        for item in punc {
            match item {
                JsonapiItem::ModelName(name) => res.model_name = Some(name),
                JsonapiItem::Abstract => res.is_abstract = true,
                _ => {
                    return Err(syn::Error::new(
                        input.span(),
                        "only model_name and abstract_model can be applied to a struct",
                    ));
                }
            }
        }

        Ok(res)
    }
}

impl JsonapiContainer {
    pub fn merge(&mut self, other: JsonapiContainer) {
        if other.model_name.is_some() {
            self.model_name = other.model_name;
        }
        self.is_abstract |= other.is_abstract;
    }
}
