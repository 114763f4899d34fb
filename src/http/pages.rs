//! Page and stylesheet handlers.
//!
//! Every path the API does not claim goes through the page router: a
//! rendering match returns the Layout document, the wildcard returns a
//! temporary redirect to its target.

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::http::server::AppState;
use crate::ui::PageContext;

pub async fn page(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let resolution = state.router.resolve(uri.path());
    if resolution.redirected {
        return Redirect::temporary(&resolution.path).into_response();
    }

    let inner = state.inner.load();
    let snapshot = state.store.current();
    let ctx = PageContext {
        theme: &inner.config.theme,
        snapshot: snapshot.as_deref(),
        rules: inner.engine.rules(),
        page_limit: inner.config.data.default_page_limit,
    };
    Html(state.layout.render(resolution.page, &ctx).into_string()).into_response()
}

pub async fn stylesheet(State(state): State<AppState>) -> impl IntoResponse {
    let css = state.inner.load().config.theme.stylesheet();
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], css)
}
