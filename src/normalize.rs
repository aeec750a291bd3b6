//! Turns framework route templates into plain paths.
//!
//! Registered routes carry parameter tokens (`:id`, `:id?`, `{id}`, `{*rest}`,
//! `*`, `+`). Replacing each token with the literal `param` yields a concrete
//! path that can be checked against the deprecation patterns, which is how the
//! startup report finds the routes a pattern disables.

use regex::Regex;
use std::sync::OnceLock;

/// Literal every parameter token is replaced with.
pub const PARAM_PLACEHOLDER: &str = "param";

fn route_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\{[^/{}]*\})|(:[^/.\-]*\??)|([+*])").expect("route token regex is valid")
    })
}

/// Replace every parameter and wildcard token in `route_path` with `param`.
pub fn normalize_route_path(route_path: &str) -> String {
    route_token_regex()
        .replace_all(route_path, PARAM_PLACEHOLDER)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(
            normalize_route_path("/deprecated-api/v1/test/inner"),
            "/deprecated-api/v1/test/inner"
        );
    }

    #[test]
    fn test_colon_params() {
        assert_eq!(normalize_route_path("/users/:id"), "/users/param");
        assert_eq!(normalize_route_path("/users/:id?"), "/users/param");
        assert_eq!(
            normalize_route_path("/inner/wildcard/:param1?.:param2"),
            "/inner/wildcard/param.param"
        );
        assert_eq!(
            normalize_route_path("/inner/wildcard/:param1?-:param2"),
            "/inner/wildcard/param-param"
        );
        assert_eq!(
            normalize_route_path("/inner/extension/:name.html"),
            "/inner/extension/param.html"
        );
    }

    #[test]
    fn test_wildcards() {
        assert_eq!(normalize_route_path("/inner/wildcard-plus/+"), "/inner/wildcard-plus/param");
        assert_eq!(normalize_route_path("/inner/wildcard-star/*"), "/inner/wildcard-star/param");
    }

    #[test]
    fn test_brace_params() {
        assert_eq!(normalize_route_path("/users/{id}"), "/users/param");
        assert_eq!(normalize_route_path("/files/{*rest}"), "/files/param");
        assert_eq!(
            normalize_route_path("/orders/{order_id}/items/{item_id}"),
            "/orders/param/items/param"
        );
    }

    #[test]
    fn test_normalized_route_matches_pattern() {
        let route = normalize_route_path("/path1/path2/path3/path4/:a-:b.:c");
        assert_eq!(route, "/path1/path2/path3/path4/param-param.param");
        assert!(crate::antpath::matches(
            "/path?/**/path4/param*param*param",
            &route
        ));
        assert!(crate::antpath::matches(
            "/path?/**/path4/{param1}*{param2}*{param3}",
            &route
        ));
    }
}
