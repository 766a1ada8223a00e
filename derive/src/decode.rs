use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Field, Fields, Ident, LitStr, Result, Type,
    parse::{Parse, ParseStream},
};

pub(crate) fn expand_decode(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new_spanned(
            input,
            "`Decode` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new_spanned(
            input,
            "`Decode` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .collect::<Result<Vec<_>>>()?;

    let assignments = fields.iter().map(|field| {
        let FieldMetadata {
            name,
            key,
            is_option,
        } = field;

        let decode = if *is_option {
            quote! { container.decode_if_present(&#key.to_owned())? }
        } else {
            quote! { container.decode(&#key.to_owned())? }
        };

        quote! { #name: #decode, }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl ::bindery::de::Decode for #name {
            fn decode(
                decoder: &::bindery::de::Decoder<'_>,
            ) -> ::core::result::Result<Self, ::bindery::de::DecodeError> {
                let container = decoder.keyed::<::std::string::String>()?;

                ::core::result::Result::Ok(Self {
                    #(#assignments)*
                })
            }
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    key: LitStr,
    is_option: bool,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Self> {
        let name = field.ident.clone().unwrap();

        let key = match field.attrs.iter().find(|a| a.path().is_ident("key")) {
            Some(attr) => attr.meta.require_list()?.parse_args::<KeyAttribute>()?.name,
            None => LitStr::new(&name.to_string(), name.span()),
        };

        let is_option = match &field.ty {
            Type::Path(path) => path
                .path
                .segments
                .first()
                .is_some_and(|segment| segment.ident == "Option"),
            _ => false,
        };

        Ok(Self {
            name,
            key,
            is_option,
        })
    }
}

#[derive(Debug)]
struct KeyAttribute {
    name: LitStr,
}

impl Parse for KeyAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse::<LitStr>()?;
        Ok(Self { name })
    }
}
