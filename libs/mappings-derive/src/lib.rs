use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Fields, FieldsNamed,
    Ident, LitStr,
};

/// Derive macro for the structural form of a type.
///
/// Generates `impl mappings::Mappable` with:
///
/// - `fields()`: declared fields and their default wire names.
/// - `flatten_structural()`: one record node, field by field.
/// - `unflatten_structural()`: starts from `Self::default()` and assigns
///   every field present in the node.
///
/// Structs must have named fields and implement `Default`. Enums must be
/// fieldless and map to their variant name.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Mappable)]
/// pub struct Card {
///     pub id: u64,
///     #[mapping(rename = "card-type")]
///     pub card_type: String,
///     #[mapping(skip)]
///     pub cached_html: Option<String>,
/// }
///
/// #[derive(Default, Mappable)]
/// pub enum Stage {
///     #[default]
///     #[mapping(rename = "todo")]
///     Todo,
///     Done,
/// }
/// ```
#[proc_macro_derive(Mappable, attributes(mapping))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(mut input: DeriveInput) -> Result<TokenStream2, syn::Error> {
    let type_params: Vec<Ident> = input.generics.type_params().map(|p| p.ident.clone()).collect();
    let self_ty = {
        let name = &input.ident;
        let (_, ty_generics, _) = input.generics.split_for_impl();
        quote! { #name #ty_generics }
    };
    let is_record = matches!(input.data, Data::Struct(_));

    let where_clause = input.generics.make_where_clause();
    for param in type_params {
        where_clause
            .predicates
            .push(parse_quote! { #param: ::mappings::Mappable });
    }
    // Records unflatten into `Self::default()`.
    if is_record {
        where_clause
            .predicates
            .push(parse_quote! { #self_ty: ::core::default::Default });
    }

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => record_body(fields)?,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Mappable only supports structs with named fields",
                ))
            }
        },
        Data::Enum(data) => enum_body(data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Mappable does not support unions",
            ))
        }
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::mappings::Mappable for #name #ty_generics #where_clause {
            #body
        }
    })
}

/// Parsed `#[mapping(...)]` attribute.
#[derive(Default)]
struct MappingAttr {
    rename: Option<String>,
    skip: bool,
}

fn parse_mapping_attr(attrs: &[Attribute]) -> Result<MappingAttr, syn::Error> {
    let mut out = MappingAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("mapping") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("rename must not be empty"));
                }
                out.rename = Some(value.value());
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else {
                return Err(meta.error("expected `rename = \"...\"` or `skip`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn record_body(fields: &FieldsNamed) -> Result<TokenStream2, syn::Error> {
    let mut infos = Vec::new();
    let mut writes = Vec::new();
    let mut reads = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in &fields.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let attr = parse_mapping_attr(&field.attrs)?;
        if attr.skip {
            continue;
        }

        let ident_str = ident.to_string();
        let ident_str = ident_str.strip_prefix("r#").unwrap_or(&ident_str).to_owned();
        let wire = attr.rename.unwrap_or_else(|| ident_str.clone());
        if seen.contains(&wire) {
            return Err(syn::Error::new_spanned(
                ident,
                format!("wire name `{wire}` is used by more than one field"),
            ));
        }
        seen.push(wire.clone());

        let info = quote! { ::mappings::FieldInfo::new(#ident_str, #wire) };
        writes.push(quote! { __writer.field(&#info, &self.#ident)?; });
        reads.push(quote! { __reader.field(&#info, &mut __out.#ident)?; });
        infos.push(info);
    }

    Ok(quote! {
        fn fields() -> &'static [::mappings::FieldInfo] {
            const FIELDS: &[::mappings::FieldInfo] = &[#(#infos),*];
            FIELDS
        }

        fn flatten_structural(
            &self,
            __cx: &::mappings::Context,
        ) -> ::mappings::Result<::mappings::Value> {
            let mut __writer = __cx.record_writer::<Self>();
            #(#writes)*
            Ok(__writer.finish())
        }

        fn unflatten_structural(
            __node: &::mappings::Value,
            __cx: &::mappings::Context,
        ) -> ::mappings::Result<Self> {
            let __reader = __cx.record_reader::<Self>(__node)?;
            let mut __out = <Self as ::core::default::Default>::default();
            #(#reads)*
            Ok(__out)
        }
    })
}

fn enum_body(data: &DataEnum) -> Result<TokenStream2, syn::Error> {
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "Mappable enums need at least one variant",
        ));
    }

    let mut to_wire = Vec::new();
    let mut from_wire = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Mappable enums must be fieldless; register a rule for richer enums",
            ));
        }
        let attr = parse_mapping_attr(&variant.attrs)?;
        if attr.skip {
            return Err(syn::Error::new_spanned(variant, "variants cannot be skipped"));
        }

        let ident = &variant.ident;
        let wire = attr.rename.unwrap_or_else(|| ident.to_string());
        to_wire.push(quote! { Self::#ident => #wire });
        from_wire.push(quote! { ::core::option::Option::Some(#wire) => Ok(Self::#ident) });
    }

    Ok(quote! {
        fn flatten_structural(
            &self,
            _cx: &::mappings::Context,
        ) -> ::mappings::Result<::mappings::Value> {
            let wire: &str = match self {
                #(#to_wire),*
            };
            Ok(::mappings::Value::from(wire))
        }

        fn unflatten_structural(
            __node: &::mappings::Value,
            _cx: &::mappings::Context,
        ) -> ::mappings::Result<Self> {
            match __node.as_str() {
                #(#from_wire,)*
                _ => Err(::mappings::Error::not_scalar(
                    <Self as ::mappings::Mappable>::type_name(),
                    __node,
                )),
            }
        }
    })
}
