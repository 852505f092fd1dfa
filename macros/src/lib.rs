use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Field, Ident, ItemStruct, parse_macro_input, spanned::Spanned};

/// Attribute macro `#[take_resources]` applied to a struct of peripherals.
///
/// Generates a `take_<struct_name_in_snake_case>!` macro that moves the
/// listed peripherals out of the HAL's peripheral struct `$p` into the
/// bundle.
///
/// # Rules
/// - Only works with structs that have **named fields**.
/// - A field `foo_bar` is taken from `$p.FOO_BAR`.
/// - `#[peri(NAME)]` on a field takes it from `$p.NAME` instead, so a field
///   can be named after its role rather than its pin.
///
/// # Example
///
/// ```rust,ignore
/// #[take_resources]
/// pub struct StatusLedResources<'d> {
///     #[peri(P0_02)]
///     pub led: Peri<'d, P0_02>,
/// }
///
/// // expands to the struct (without the `#[peri]` attribute) plus:
///
/// macro_rules! take_status_led_resources {
///     ($p:ident) => {
///         StatusLedResources {
///             led: $p.P0_02,
///         }
///     };
/// }
/// ```
#[proc_macro_attribute]
pub fn take_resources(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input_struct = parse_macro_input!(item as ItemStruct);
    let struct_name = input_struct.ident.clone();

    let fields = match &mut input_struct.fields {
        syn::Fields::Named(fields_named) => &mut fields_named.named,
        other => {
            return syn::Error::new(
                other.span(),
                "#[take_resources] only works with named struct fields",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut macro_fields = Vec::with_capacity(fields.len());
    for field in fields.iter_mut() {
        let source = match peripheral_name(field) {
            Ok(source) => source,
            Err(e) => return e.to_compile_error().into(),
        };
        field.attrs.retain(|attr| !is_peri_attr(attr));

        let field_name = &field.ident;
        macro_fields.push(quote! {
            #field_name: $p.#source
        });
    }

    let macro_name = Ident::new(
        &format!("take_{}", pascal_to_snake(&struct_name.to_string())),
        struct_name.span(),
    );

    let expanded = quote! {
        #input_struct

        #[macro_export]
        macro_rules! #macro_name {
            ($p:ident) => {
                #struct_name {
                    #(#macro_fields),*
                }
            };
        }
    };
    TokenStream::from(expanded)
}

fn is_peri_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("peri")
}

/// Name of the peripheral a field is taken from: the `#[peri(..)]` override
/// if present, the upper-cased field name otherwise.
fn peripheral_name(field: &Field) -> syn::Result<Ident> {
    if let Some(attr) = field.attrs.iter().find(|a| is_peri_attr(a)) {
        return attr.parse_args::<Ident>();
    }

    // named fields always carry an ident
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
    Ok(Ident::new(
        &ident.to_string().to_ascii_uppercase(),
        ident.span(),
    ))
}

fn pascal_to_snake(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i != 0 {
                snake.push('_');
            }
            snake.push(ch.to_ascii_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_names_become_snake_case() {
        assert_eq!(pascal_to_snake("BleResources"), "ble_resources");
        assert_eq!(pascal_to_snake("StatusLedResources"), "status_led_resources");
    }

    #[test]
    fn fields_map_to_upper_case_peripherals() {
        let field: Field = syn::parse_quote!(pub ppi_ch17: Peri<'p, PPI_CH17>);
        assert_eq!(peripheral_name(&field).unwrap(), "PPI_CH17");
    }

    #[test]
    fn peri_attribute_overrides_the_field_name() {
        let field: Field = syn::parse_quote!(#[peri(P0_02)] pub led: Peri<'p, P0_02>);
        assert_eq!(peripheral_name(&field).unwrap(), "P0_02");
    }
}
