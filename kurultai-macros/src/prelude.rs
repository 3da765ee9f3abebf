pub(crate) use crate::utils::{extract, krate};
pub use darling::FromAttributes;
pub use heck::{ToSnakeCase, ToUpperCamelCase};
pub use itertools::Itertools;
pub use proc_macro2::{Span, TokenStream};
pub use quote::quote;
pub use std::borrow::Cow;
pub use syn::{
    Data, DeriveInput, Error, Expr, Field, Fields, FieldsNamed, Ident, LitStr, Result, Token,
    Visibility,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse2,
    punctuated::Punctuated,
    spanned::Spanned,
};
