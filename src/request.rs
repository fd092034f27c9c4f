//! Incoming HTTP request type.

use std::collections::HashMap;
use std::str::FromStr;

/// What a handler sees of an incoming request: the matched path parameters.
///
/// The gateway's operations depend on nothing else. Headers are only read by
/// the middleware around dispatch, and the body is never read off the wire.
pub struct Request {
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/recommendations/{id}`, `req.param("id")` on
    /// `/recommendations/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a named path parameter parsed as `T`.
    ///
    /// Routes declared with a typed constraint (`{id:int}`) only match when
    /// the segment parses, so for those this is `Some` in every handler call.
    pub fn param_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.param(key)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_params() {
        let req = Request::new(HashMap::from([("id".to_owned(), "7".to_owned())]));
        assert_eq!(req.param("id"), Some("7"));
        assert_eq!(req.param_as::<i32>("id"), Some(7));
        assert_eq!(req.param_as::<i32>("other"), None);
    }

    #[test]
    fn unparsable_param_is_none() {
        let req = Request::new(HashMap::from([("id".to_owned(), "seven".to_owned())]));
        assert_eq!(req.param_as::<i32>("id"), None);
    }
}
