//! HTTP status codes the gateway emits, as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted — `Response::status()`,
//! `Response::builder().status()`, or as a bare handler return value.
//!
//! ```rust
//! use postgate::{Response, Status};
//!
//! Response::status(Status::NoContent);
//!
//! Response::builder()
//!     .status(Status::ServiceUnavailable)
//!     .text("not ready");
//! ```
//!
//! The set is closed on purpose: a gateway that only answers `GET` needs
//! only a handful of codes, and an unknown one is a bug, not a feature.

/// A status code the gateway can answer with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    NoContent,           // 204

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    NotFound,            // 404
    MethodNotAllowed,    // 405

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
    ServiceUnavailable,  // 503
}

impl Status {
    /// The numeric code, e.g. `404`.
    pub fn as_u16(self) -> u16 {
        self.into()
    }

    /// The canonical reason phrase, used as the `title` of problem details.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok                  => "OK",
            Self::NoContent           => "No Content",
            Self::BadRequest          => "Bad Request",
            Self::NotFound            => "Not Found",
            Self::MethodNotAllowed    => "Method Not Allowed",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceUnavailable  => "Service Unavailable",
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::NoContent           => 204,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::InternalServerError => 500,
            Status::ServiceUnavailable  => 503,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> Self {
        // Every variant maps to a registered code, so this never falls back.
        http::StatusCode::from_u16(s.into()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_http_crate() {
        assert_eq!(http::StatusCode::from(Status::NotFound), http::StatusCode::NOT_FOUND);
        assert_eq!(
            http::StatusCode::from(Status::InternalServerError),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(Status::NoContent.as_u16(), 204);
    }
}
