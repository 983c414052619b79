//! Static pages: route index, about and robots.txt

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;

use crate::api::types::Json;

const ROBOTS_TXT: &str = include_str!("../../static/robots.txt");

/// One documented route
#[derive(Debug, Clone, Serialize)]
pub struct RouteDoc {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// Every public route with a one-line description
pub const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "GET",
        path: "/",
        description: "List the available endpoints.",
    },
    RouteDoc {
        method: "GET",
        path: "/about/",
        description: "Describe the service.",
    },
    RouteDoc {
        method: "GET",
        path: "/robots.txt",
        description: "Crawler rules.",
    },
    RouteDoc {
        method: "POST",
        path: "/keys",
        description: "Create a key from {name, key?}. Returns 201 with the record, 403 without a name.",
    },
    RouteDoc {
        method: "GET",
        path: "/keys",
        description: "List every key. Requires a key credential.",
    },
    RouteDoc {
        method: "GET",
        path: "/keys/{id}",
        description: "Fetch one key by id. Requires a key credential.",
    },
    RouteDoc {
        method: "PATCH",
        path: "/keys/{id}",
        description: "Change the name and/or key of a record. Requires a key credential.",
    },
    RouteDoc {
        method: "DELETE",
        path: "/keys",
        description: "Delete the key matching {id, name?, key?}. Requires a key credential.",
    },
    RouteDoc {
        method: "GET",
        path: "/health",
        description: "Service health.",
    },
    RouteDoc {
        method: "GET",
        path: "/ready",
        description: "Readiness, including a document store ping.",
    },
    RouteDoc {
        method: "GET",
        path: "/live",
        description: "Liveness probe.",
    },
];

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub routes: &'static [RouteDoc],
}

#[derive(Debug, Serialize)]
pub struct AboutResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: ROUTES,
    })
}

/// GET /about/
pub async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: env!("CARGO_PKG_DESCRIPTION"),
    })
}

/// GET /about, answered with a 301 to the canonical path
pub async fn about_redirect() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/about/")])
}

/// GET /robots.txt
pub async fn robots() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], ROBOTS_TXT)
}
