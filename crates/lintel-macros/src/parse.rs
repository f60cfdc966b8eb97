//! Parsing for `#[interceptor(...)]` attributes.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Expr, ExprLit, Lit, LitStr, Meta, Token,
};

/// Parsed interceptor attributes.
#[derive(Debug, Default)]
pub struct InterceptorAttrs {
    /// Include patterns, in declaration order.
    pub include: Vec<LitStr>,
    /// Exclude patterns, in declaration order.
    pub exclude: Vec<LitStr>,
}

impl Parse for InterceptorAttrs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut attrs = Self::default();

        let meta_list: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in meta_list {
            let nv = match meta {
                Meta::NameValue(nv) => nv,
                _ => return Err(syn::Error::new(meta.span(), "expected name = value")),
            };

            let ident = nv
                .path
                .get_ident()
                .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                .to_string();

            let patterns = string_list(&nv.value)?;
            for pattern in &patterns {
                validate_pattern(pattern)?;
            }

            match ident.as_str() {
                "include" => attrs.include.extend(patterns),
                "exclude" => attrs.exclude.extend(patterns),
                _ => {
                    return Err(syn::Error::new(
                        nv.path.span(),
                        format!("unknown attribute: {ident}"),
                    ))
                }
            }
        }

        Ok(attrs)
    }
}

/// Accepts `"..."` or `["...", "..."]`.
fn string_list(expr: &Expr) -> syn::Result<Vec<LitStr>> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(vec![s.clone()]),
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|elem| match elem {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Ok(s.clone()),
                other => Err(syn::Error::new(other.span(), "expected string literal")),
            })
            .collect(),
        other => Err(syn::Error::new(
            other.span(),
            "expected string literal or array of string literals",
        )),
    }
}

fn validate_pattern(pattern: &LitStr) -> syn::Result<()> {
    let value = pattern.value();
    if value.is_empty() {
        return Err(syn::Error::new(
            pattern.span(),
            "path pattern must not be empty",
        ));
    }
    if !value.starts_with('/') {
        return Err(syn::Error::new(
            pattern.span(),
            format!("path pattern must start with '/': {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn values(lits: &[LitStr]) -> Vec<String> {
        lits.iter().map(LitStr::value).collect()
    }

    #[test]
    fn test_parse_single_values() {
        let attrs: InterceptorAttrs = parse_quote!(include = "/api/**", exclude = "/api/health");
        assert_eq!(values(&attrs.include), ["/api/**"]);
        assert_eq!(values(&attrs.exclude), ["/api/health"]);
    }

    #[test]
    fn test_parse_arrays_and_repeats() {
        let attrs: InterceptorAttrs = parse_quote!(
            include = ["/a/**", "/b/*"],
            include = "/c",
            exclude = ["/a/internal/**"]
        );
        assert_eq!(values(&attrs.include), ["/a/**", "/b/*", "/c"]);
        assert_eq!(values(&attrs.exclude), ["/a/internal/**"]);
    }

    #[test]
    fn test_parse_empty() {
        let attrs: InterceptorAttrs = syn::parse_str("").unwrap();
        assert!(attrs.include.is_empty());
        assert!(attrs.exclude.is_empty());
    }

    #[test]
    fn test_unknown_key() {
        let result = syn::parse_str::<InterceptorAttrs>(r#"paths = "/a""#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("unknown attribute: paths"));
    }

    #[test]
    fn test_pattern_must_start_with_slash() {
        let result = syn::parse_str::<InterceptorAttrs>(r#"include = "api/**""#);
        assert!(result.unwrap_err().to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_non_string_value() {
        let result = syn::parse_str::<InterceptorAttrs>("include = 42");
        assert!(result.is_err());

        let result = syn::parse_str::<InterceptorAttrs>(r#"include = ["/a", 1]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_path_form_rejected() {
        let result = syn::parse_str::<InterceptorAttrs>("include");
        assert!(result.unwrap_err().to_string().contains("expected name = value"));
    }
}
