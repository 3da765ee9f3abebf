use crate::prelude::*;
use proc_macro_crate::{FoundCrate, crate_name};

macro_rules! extract {
    ($val:expr, $pat:pat, $error_message: expr) => {
        let $pat = $val else {
            return Err(Error::new_spanned($val, $error_message));
        };
    };
}

pub(crate) use extract;

pub fn extract_named_fields(span: Span, data: Data) -> Result<FieldsNamed> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(span, "expected struct"));
    };

    extract!(
        data_struct.fields,
        Fields::Named(named_fields),
        "expected named fields"
    );

    Ok(named_fields)
}

pub fn extract_serde_rename(field: &Field) -> Option<String> {
    #[derive(FromAttributes)]
    #[darling(attributes(serde))]
    struct SerdeAttribute {
        rename: Option<String>,
    }

    SerdeAttribute::from_attributes(&field.attrs)
        .ok()
        .and_then(|attribute| attribute.rename)
}

pub fn variant_ident(field: &Ident) -> Ident {
    Ident::new(
        &field.unraw().to_string().to_upper_camel_case(),
        field.span(),
    )
}

pub fn build_fields_enum<'a>(
    field_idents: impl Iterator<Item = &'a Ident>,
    field_lits: impl Iterator<Item = &'a LitStr>,
) -> TokenStream {
    let variants = field_idents.map(variant_ident).collect_vec();
    let field_lits = field_lits.collect_vec();

    quote! {
        #[derive(
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::fmt::Debug,
            ::std::cmp::PartialEq,
            ::std::cmp::Eq,
            ::std::hash::Hash,
        )]
        pub enum Fields {
            #( #variants ),*
        }

        impl Fields {
            pub const ALL: &'static [Self] = &[ #( Self::#variants ),* ];

            pub const fn as_str(self) -> &'static str {
                match self {
                    #( Self::#variants => #field_lits ),*
                }
            }
        }

        impl ::std::fmt::Display for Fields {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Formatter::write_str(f, self.as_str())
            }
        }

        impl ::std::convert::AsRef<str> for Fields {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::convert::From<Fields> for ::std::string::String {
            fn from(value: Fields) -> Self {
                ::std::string::ToString::to_string(value.as_str())
            }
        }
    }
}

/// Path to the `kurultai` crate as seen from the expansion site.
///
/// The crate declares `extern crate self as kurultai`, so `::kurultai` also
/// resolves inside the crate itself and in its tests.
pub fn krate() -> TokenStream {
    match crate_name("kurultai") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote! { ::#ident }
        }
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::kurultai },
    }
}
