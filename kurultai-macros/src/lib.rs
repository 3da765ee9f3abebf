#![warn(clippy::pedantic)]

mod derive_fields;
mod func_construct_expression;
mod prelude;
mod utils;

fn expand<F: FnOnce(proc_macro2::TokenStream) -> syn::Result<proc_macro2::TokenStream>>(
    fun: F,
    input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    fun(input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[proc_macro_derive(Fields)]
pub fn fields(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(derive_fields::derive_fields, input)
}

#[proc_macro]
pub fn expression(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    expand(func_construct_expression::func_construct_expression, input)
}
