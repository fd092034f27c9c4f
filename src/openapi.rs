//! OpenAPI 3 description of the gateway, served at `GET /openapi.json`.
//!
//! The document is static: it describes the three data routes and the `Post`
//! and `Recommendation` schemas. The recommendation items are declared as
//! either strings or records, since the shape is a deployment setting.

use serde_json::{Value, json};

use crate::{IntoResponse, Json, Request, Response};

pub async fn handler(_req: Request) -> Response {
    Json(document()).into_response()
}

pub fn document() -> Value {
    let problem = json!({
        "description": "Upstream failure",
        "content": { "application/problem+json": { "schema": { "$ref": "#/components/schemas/ProblemDetails" } } }
    });
    let posts = json!({
        "description": "OK",
        "content": { "application/json": { "schema": {
            "type": "array", "items": { "$ref": "#/components/schemas/Post" }
        } } }
    });

    json!({
        "openapi": "3.0.1",
        "info": { "title": "postgate", "version": env!("CARGO_PKG_VERSION") },
        "paths": {
            "/posts": { "get": {
                "operationId": "GetPosts",
                "responses": { "200": posts.clone(), "500": problem.clone() }
            } },
            "/recommendations/{rowNum}": { "get": {
                "operationId": "GetRecommendations",
                "parameters": [{
                    "name": "rowNum", "in": "path", "required": true,
                    "schema": { "type": "integer", "format": "int32" }
                }],
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": { "application/json": { "schema": {
                            "type": "array",
                            "items": { "oneOf": [
                                { "type": "string" },
                                { "$ref": "#/components/schemas/Recommendation" }
                            ] }
                        } } }
                    },
                    "404": { "description": "Identifier is not an integer" },
                    "500": problem.clone()
                }
            } },
            "/top-posts": { "get": {
                "operationId": "GetTopPosts",
                "responses": { "200": posts, "500": problem }
            } }
        },
        "components": { "schemas": {
            "Post": {
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "format": "int64" },
                    "title": { "type": "string" },
                    "content": { "type": "string" },
                    "tags": { "type": "string" },
                    "link": { "type": "string" },
                    "votes": { "type": "integer", "format": "int64" }
                }
            },
            "Recommendation": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "score": { "type": "string" }
                }
            },
            "ProblemDetails": {
                "type": "object",
                "properties": {
                    "type": { "type": "string" },
                    "title": { "type": "string" },
                    "status": { "type": "integer", "format": "int32" },
                    "detail": { "type": "string" }
                }
            }
        } }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_operation() {
        let doc = document();
        let ids: Vec<&str> = ["/posts", "/recommendations/{rowNum}", "/top-posts"]
            .iter()
            .map(|p| doc["paths"][p]["get"]["operationId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["GetPosts", "GetRecommendations", "GetTopPosts"]);
        assert_eq!(doc["components"]["schemas"]["Recommendation"]["properties"]["score"]["type"], "string");
    }
}
