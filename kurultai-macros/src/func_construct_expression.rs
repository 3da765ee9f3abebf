use crate::{prelude::*, utils::variant_ident};

const OPERATORS: [&str; 8] = ["Eq", "Ne", "Gt", "Gte", "Lt", "Lte", "In", "Nin"];

struct Input {
    module: Option<Ident>,
    entries: Punctuated<Entry, Token![,]>,
}

impl Parse for Input {
    fn parse(input: ParseStream) -> Result<Self> {
        let module = if input.peek(Ident) && input.peek2(Token![,]) {
            let module = input.parse()?;
            input.parse::<Token![,]>()?;
            Some(module)
        } else {
            None
        };

        let entries = Punctuated::parse_terminated(input)?;

        Ok(Self { module, entries })
    }
}

enum Key {
    Field(Ident),
    Path(LitStr),
}

impl Parse for Key {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            input.parse().map(Self::Path)
        } else {
            Ident::parse_any(input).map(Self::Field)
        }
    }
}

struct Entry {
    key: Key,
    operator: Option<Ident>,
    value: Expr,
}

impl Parse for Entry {
    fn parse(input: ParseStream) -> Result<Self> {
        let key = input.parse()?;
        input.parse::<Token![:]>()?;

        let operator_or_value = input.parse::<Expr>()?;

        let mut operator_and_operand = None;

        if let Expr::Call(expr_call) = &operator_or_value {
            if let Expr::Path(expr_path) = expr_call.func.as_ref() {
                if let Some(ident) = expr_path.path.get_ident() {
                    if OPERATORS.iter().any(|operator| ident == operator)
                        && expr_call.args.len() == 1
                    {
                        operator_and_operand = Some((ident.clone(), expr_call.args[0].clone()));
                    }
                }
            }
        }

        let output = match operator_and_operand {
            Some((operator, operand)) => Self {
                key,
                operator: Some(operator),
                value: operand,
            },
            None => Self {
                key,
                operator: None,
                value: operator_or_value,
            },
        };

        Ok(output)
    }
}

pub fn func_construct_expression(input: TokenStream) -> Result<TokenStream> {
    let input = parse2::<Input>(input)?;

    let output = build(&input);

    Ok(output)
}

fn build(input: &Input) -> TokenStream {
    let krate = krate();
    let expression = Ident::new("__kurultai_expression", Span::mixed_site());

    let statements = input.entries.iter().map(|entry| {
        let key = match (&entry.key, &input.module) {
            (Key::Field(field), Some(module)) => {
                let variant = variant_ident(field);
                quote! { #module::Fields::#variant }
            }
            (Key::Field(field), None) => {
                let lit = LitStr::new(&field.unraw().to_string(), field.span());
                quote! { #lit }
            }
            (Key::Path(path), _) => quote! { #path },
        };

        let value = &entry.value;

        match &entry.operator {
            Some(operator) if operator == "In" || operator == "Nin" => quote! {
                #expression.where_operator(
                    #key,
                    #krate::FilterOperator::#operator(
                        ::std::iter::Iterator::collect(::std::iter::IntoIterator::into_iter(#value))
                    ),
                );
            },
            Some(operator) => quote! {
                #expression.where_operator(#key, #krate::FilterOperator::#operator(#value));
            },
            None => quote! {
                #expression.r#where(#key, #value);
            },
        }
    });

    quote! {
        {
            let mut #expression = #krate::Expression::new();
            #( #statements )*
            #expression
        }
    }
}
