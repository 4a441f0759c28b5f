use proc_macro::TokenStream;
use quote::quote;
use quote::quote_spanned;
use syn::spanned::Spanned;

/// Turns a function into a test that runs inside an `http_intercept::InterceptionScope` on the
/// global client registry.
///
/// The scope is configured from `MOCK_SWITCH`; an optional configuration function
/// `fn(&mut InterceptionConfiguration)` can adjust it before the scope is entered.
#[proc_macro_attribute]
pub fn http_intercept_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    if args.len() > 1 {
        return quote! {
            compile_error!("At most one configuration function can be passed to the macro");
        }
        .into();
    }

    let configure = match args.first() {
        None => quote! {},
        Some(syn::NestedMeta::Meta(syn::Meta::Path(function_path))) => quote! {
            #function_path(&mut __http_intercept_configuration);
        },
        Some(other) => {
            return quote_spanned! {other.span()=>
                compile_error!("The argument should be a configuration function!");
            }
            .into();
        }
    };

    if !input.sig.inputs.is_empty() {
        return quote_spanned! {input.sig.inputs.span()=>
            compile_error!("Test functions can't take arguments!");
        }
        .into();
    }

    let attributes = &input.attrs;
    let visibility = &input.vis;
    let signature = &input.sig;
    let block = &input.block;

    let test_attribute = if signature.asyncness.is_some() {
        quote! { #[::tokio::test] }
    } else {
        quote! { #[test] }
    };

    let output = quote! {
        #test_attribute
        #(#attributes)*
        #visibility #signature {
            #[allow(unused_mut)]
            let mut __http_intercept_configuration =
                http_intercept::InterceptionConfiguration::from_env();
            #configure
            let __http_intercept_scope = http_intercept::InterceptionScope::enter_with(
                http_intercept::HttpClients::global(),
                &__http_intercept_configuration,
            );

            #block
        }
    };

    TokenStream::from(output)
}
