use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, Path};

struct Classified {
    ident: Ident,
    pattern: TokenStream,
    kind: Ident,
}

pub fn expand(args: TokenStream, mut input: DeriveInput) -> TokenStream {
    let kind_type: Path = if args.is_empty() {
        syn::parse_quote!(EppErrorKind)
    } else {
        match syn::parse2(args) {
            Ok(path) => path,
            Err(err) => return err.to_compile_error(),
        }
    };

    let name = input.ident.clone();
    let Data::Enum(data) = &mut input.data else {
        return quote! { compile_error!("epp_exception can only be applied to enums"); };
    };

    let mut classified = Vec::with_capacity(data.variants.len());
    for variant in &mut data.variants {
        let mut kind = None;
        let mut error = None;
        variant.attrs.retain(|attr| {
            if !attr.path().is_ident("kind") {
                return true;
            }
            match attr.parse_args::<Ident>() {
                Ok(ident) if kind.is_none() => kind = Some(ident),
                Ok(_) => {
                    error = Some(syn::Error::new_spanned(attr, "duplicate #[kind(..)] attribute"));
                },
                Err(err) => error = Some(err),
            }
            false
        });
        if let Some(err) = error {
            return err.to_compile_error();
        }
        let Some(kind) = kind else {
            return syn::Error::new_spanned(
                &variant.ident,
                "every epp_exception variant needs a #[kind(..)] attribute",
            )
            .to_compile_error();
        };

        let ident = variant.ident.clone();
        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#ident { .. } },
            Fields::Unnamed(_) => quote! { Self::#ident(..) },
            Fields::Unit => quote! { Self::#ident },
        };
        classified.push(Classified { ident, pattern, kind });
    }

    let has_debug = input.attrs.iter().filter(|a| a.path().is_ident("derive")).any(|attr| {
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            found |= meta.path.segments.last().is_some_and(|s| s.ident == "Debug");
            Ok(())
        });
        found
    });
    let debug = if has_debug { quote! {} } else { quote! { #[derive(Debug)] } };

    let kind_arms = classified.iter().map(|c| {
        let pattern = &c.pattern;
        let kind = &c.kind;
        quote! { #pattern => #kind_type::#kind, }
    });
    let name_arms = classified.iter().map(|c| {
        let pattern = &c.pattern;
        let label = c.ident.to_string();
        quote! { #pattern => #label, }
    });

    quote! {
        #debug
        #[derive(::thiserror::Error)]
        #input

        #[automatically_derived]
        impl #name {
            /// Rejection category used to pick the protocol result code.
            #[must_use]
            pub const fn kind(&self) -> #kind_type {
                match self {
                    #(#kind_arms)*
                }
            }

            /// Protocol result code for this rejection.
            #[must_use]
            pub const fn code(&self) -> u16 {
                self.kind().code()
            }

            /// Stable variant name, suitable for structured logs.
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    }
}
