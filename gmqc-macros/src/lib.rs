use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod check_meta;
use check_meta::{parse_check_info, parse_params};

/// Derives `crate::registry::DescribeCheck` for a check type and submits its
/// metadata to the inventory.
///
/// The type must implement `crate::checks::Check`, `Default` and
/// `serde::Deserialize` (with `#[serde(default)]` so omitted parameters fall
/// back to their defaults).
#[proc_macro_derive(QcCheck, attributes(check_meta, param))]
pub fn derive_qc_check(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let info = match parse_check_info(&input) {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let fields = match parse_params(&input) {
        Ok(fields) => fields,
        Err(e) => return e.write_errors().into(),
    };

    let struct_name = &input.ident;
    let check_name = &info.name;
    let description = info.description.clone().unwrap_or_default();

    let granularity = match info.granularity.as_str() {
        "trace" => quote! { crate::registry::Granularity::Trace },
        "stream" => quote! { crate::registry::Granularity::Stream },
        other => {
            let msg = format!("unknown granularity `{}`, expected `trace` or `stream`", other);
            return syn::Error::new_spanned(struct_name, msg).to_compile_error().into();
        }
    };

    let params = fields.iter().filter_map(|f| {
        let field_name = f.ident.as_ref()?.to_string();
        let type_name = extract_type_name(&f.ty);
        let required = f.required;

        let default = match &f.default {
            Some(raw) => quote! {
                Some(serde_json::from_str(#raw).unwrap_or(serde_json::Value::Null))
            },
            None => quote! { None },
        };
        let min = match f.min {
            Some(min) => quote! { Some(#min) },
            None => quote! { None },
        };
        let max = match f.max {
            Some(max) => quote! { Some(#max) },
            None => quote! { None },
        };

        Some(quote! {
            crate::registry::ParameterSchema {
                name: #field_name.to_string(),
                param_type: #type_name.to_string(),
                default: #default,
                required: #required,
                min: #min,
                max: #max,
            }
        })
    });

    let mod_name = syn::Ident::new(
        &format!("__check_registration_{}", struct_name.to_string().to_lowercase()),
        struct_name.span(),
    );

    let factory_fn_name = syn::Ident::new(
        &format!("create_metadata_{}", struct_name.to_string().to_lowercase()),
        struct_name.span(),
    );

    let expanded = quote! {
        impl crate::registry::DescribeCheck for #struct_name {
            fn metadata() -> crate::registry::CheckMetadata {
                crate::registry::CheckMetadata {
                    name: #check_name.to_string(),
                    granularity: #granularity,
                    description: #description.to_string(),
                    parameters: vec![#(#params),*],
                    factory: |params: &serde_json::Value|
                        -> ::std::result::Result<Box<dyn crate::checks::Check>, serde_json::Error>
                    {
                        let check: #struct_name = serde_json::from_value(params.clone())?;
                        Ok(Box::new(check))
                    },
                }
            }
        }

        mod #mod_name {
            use super::*;

            fn #factory_fn_name() -> crate::registry::CheckMetadata {
                <#struct_name as crate::registry::DescribeCheck>::metadata()
            }

            ::inventory::submit! {
                crate::registry::CheckMetadataFactoryWrapper(#factory_fn_name)
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_type_name(ty: &syn::Type) -> &'static str {
    let type_str = quote!(#ty).to_string();

    if type_str.contains("f64") || type_str.contains("f32") {
        "number"
    } else if type_str.contains("u32") || type_str.contains("i32")
        || type_str.contains("u64") || type_str.contains("i64")
        || type_str.contains("usize") || type_str.contains("isize") {
        "integer"
    } else if type_str.contains("String") || type_str.contains("PathBuf") {
        "string"
    } else if type_str.contains("bool") {
        "boolean"
    } else {
        "object"
    }
}
