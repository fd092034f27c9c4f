//! Radix-tree request router with typed path constraints.
//!
//! One tree per HTTP method. O(path-length) lookup. Path parameters use
//! `{name}` syntax; `{name:int}` additionally requires the segment to parse
//! as a 32-bit signed integer. A segment that fails its constraint does not
//! match, so the request is answered `404` before any handler runs.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A route's handler with its concrete closure and response types erased,
/// shared by every connection task.
pub(crate) type BoxedHandler = Arc<dyn Fn(Request) -> BoxFuture + Send + Sync + 'static>;

/// A constraint attached to a path parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Constraint {
    Int,
}

impl Constraint {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            _ => None,
        }
    }

    fn accepts(self, segment: &str) -> bool {
        match self {
            Self::Int => segment.parse::<i32>().is_ok(),
        }
    }
}

struct Route {
    handler: BoxedHandler,
    constraints: Vec<(String, Constraint)>,
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// A handler is any `Fn(Request) -> impl Future<Output = impl IntoResponse>`,
    /// so gateway closures can capture an `Arc<Gateway>`.
    ///
    /// ```rust,no_run
    /// # use postgate::{Method, Request, Response, Router};
    /// # async fn list_posts(_: Request) -> Response { Response::text("") }
    /// # async fn recommendations(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get, "/posts",                    list_posts)
    ///     .on(Method::Get, "/recommendations/{id:int}", recommendations);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics on a malformed path, a conflicting route, or an unknown
    /// constraint name. Routes are fixed at startup, so these are programmer
    /// errors.
    pub fn on<F, Fut, R>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let (pattern, constraints) = split_constraints(path);
        let handler: BoxedHandler = Arc::new(move |req| {
            let fut = handler(req);
            Box::pin(async move { fut.await.into_response() }) as BoxFuture
        });
        let route = Route { handler, constraints };
        self.routes
            .entry(method)
            .or_default()
            .insert(pattern, route)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::Get, …)`.
    pub fn get<F, Fut, R>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.on(Method::Get, path, handler)
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let route = matched.value;

        let satisfied = route.constraints.iter().all(|(name, constraint)| {
            matched.params.get(name).is_some_and(|seg| constraint.accepts(seg))
        });
        if !satisfied {
            return None;
        }

        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((Arc::clone(&route.handler), params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Rewrites `{name:constraint}` segments to plain `{name}` and collects the
/// constraints.
fn split_constraints(path: &str) -> (String, Vec<(String, Constraint)>) {
    let mut constraints = Vec::new();
    let pattern = path
        .split('/')
        .map(|segment| {
            let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
                return segment.to_owned();
            };
            match inner.split_once(':') {
                Some((name, kind)) => {
                    let constraint = Constraint::parse(kind)
                        .unwrap_or_else(|| panic!("unknown route constraint `{kind}` in `{path}`"));
                    constraints.push((name.to_owned(), constraint));
                    format!("{{{name}}}")
                }
                None => segment.to_owned(),
            }
        })
        .collect::<Vec<_>>()
        .join("/");
    (pattern, constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok(_: Request) -> Response {
        Response::text("ok")
    }

    fn app() -> Router {
        Router::new()
            .get("/posts", ok)
            .get("/recommendations/{id:int}", ok)
    }

    #[test]
    fn splits_constraints_from_pattern() {
        let (pattern, constraints) = split_constraints("/a/{id:int}/b/{name}");
        assert_eq!(pattern, "/a/{id}/b/{name}");
        assert_eq!(constraints, vec![("id".to_owned(), Constraint::Int)]);
    }

    #[test]
    #[should_panic(expected = "unknown route constraint")]
    fn unknown_constraint_panics() {
        Router::new().get("/x/{id:guid}", ok);
    }

    #[test]
    fn integer_segment_matches() {
        let (_, params) = app().lookup(Method::Get, "/recommendations/42").unwrap();
        assert_eq!(params["id"], "42");
        assert!(app().lookup(Method::Get, "/recommendations/-3").is_some());
    }

    #[test]
    fn non_integer_segment_does_not_match() {
        let router = app();
        assert!(router.lookup(Method::Get, "/recommendations/abc").is_none());
        assert!(router.lookup(Method::Get, "/recommendations/1.5").is_none());
        assert!(router.lookup(Method::Get, "/recommendations/99999999999").is_none());
    }

    #[tokio::test]
    async fn captured_state_reaches_the_handler() {
        let greeting = std::sync::Arc::new(String::from("top posts"));
        let router = Router::new().get("/recommendations/{id:int}", move |req: Request| {
            let greeting = std::sync::Arc::clone(&greeting);
            async move { format!("{greeting} for {}", req.param("id").unwrap_or_default()) }
        });

        let (handler, params) = router.lookup(Method::Get, "/recommendations/5").unwrap();
        let res = handler(Request::new(params)).await;
        assert_eq!(res.body(), b"top posts for 5");
    }

    #[test]
    fn method_is_part_of_the_key() {
        let router = app();
        assert!(router.lookup(Method::Get, "/posts").is_some());
        assert!(router.lookup(Method::Post, "/posts").is_none());
        assert!(router.lookup(Method::Get, "/nope").is_none());
    }
}
