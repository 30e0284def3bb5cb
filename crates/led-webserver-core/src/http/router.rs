//! Method + URI pattern routing.
//!
//! Patterns follow the wildcard rules of the ESP-IDF HTTP server:
//! - a trailing `*` matches any remainder (`/files/*` matches `/files/a/b`),
//! - a trailing `?` makes the preceding character optional (`/api/?`
//!   matches `/api` and `/api/`),
//! - both can be combined as `?*` (`/api/?*` matches `/api`, `/api/`
//!   and `/api/x`, but not `/apix`).
//!
//! Routes are tried in registration order; the first match wins.

use super::HttpMethod;

/// A single registered handler.
#[derive(Debug, Clone, Copy)]
pub struct Route<E> {
    pub method: HttpMethod,
    pub uri: &'static str,
    pub endpoint: E,
}

impl<E> Route<E> {
    pub const fn get(uri: &'static str, endpoint: E) -> Self {
        Self {
            method: HttpMethod::Get,
            uri,
            endpoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// No pattern matched the URI.
    NotFound,
    /// A pattern matched, but not for this method.
    MethodNotAllowed,
}

/// Ordered routing table.
#[derive(Debug, Clone, Copy)]
pub struct Router<E: 'static> {
    routes: &'static [Route<E>],
}

impl<E: Copy> Router<E> {
    pub const fn new(routes: &'static [Route<E>]) -> Self {
        Self { routes }
    }

    /// Find the endpoint registered for `method` and `uri`.
    ///
    /// The query string is not part of the match.
    pub fn find(&self, method: HttpMethod, uri: &str) -> Result<E, RouteError> {
        let path = strip_query(uri);
        let mut uri_known = false;
        for route in self.routes {
            if !uri_match_wildcard(route.uri, path) {
                continue;
            }
            if route.method == method {
                return Ok(route.endpoint);
            }
            uri_known = true;
        }
        if uri_known {
            Err(RouteError::MethodNotAllowed)
        } else {
            Err(RouteError::NotFound)
        }
    }
}

/// Cut the URI at the first `?`.
///
/// Routing ignores `#`, unlike [`crate::server::path::uri_path`], matching
/// how the ESP-IDF server matches handlers.
pub fn strip_query(uri: &str) -> &str {
    uri.split_once('?').map_or(uri, |(path, _)| path)
}

/// Match `uri` against a registration `template`.
pub fn uri_match_wildcard(template: &str, uri: &str) -> bool {
    let (template, any_tail) = match template.strip_suffix('*') {
        Some(rest) => (rest, true),
        None => (template, false),
    };
    let (template, optional) = match template.strip_suffix('?') {
        Some(rest) if !rest.is_empty() => {
            let split = rest.len() - rest.chars().next_back().map_or(0, char::len_utf8);
            (&rest[..split], Some(&rest[split..]))
        }
        _ => (template, None),
    };

    let Some(mut rest) = uri.strip_prefix(template) else {
        return false;
    };
    if let Some(optional) = optional {
        match rest.strip_prefix(optional) {
            Some(after) => rest = after,
            None => return rest.is_empty(),
        }
    }
    any_tail || rest.is_empty()
}
