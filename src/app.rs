use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{api::ApiError, auth, comments, graphql, likes, posts, state::AppState, users};

pub fn build_app(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    let schema = graphql::build_schema(state.clone());

    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(users::router(upload_limit))
                .merge(posts::router(upload_limit))
                .merge(comments::router())
                .merge(likes::router())
                .merge(graphql::router(schema))
                .route("/health", get(|| async { "ok" })),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::map_response(envelope_rejections))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn not_found() -> ApiError {
    ApiError::NotFound(
        "The route you requested does not exist. Please check the URL and try again.".into(),
    )
}

/// Error responses the router produces on its own (405, 413, ...) carry no
/// body; give them the error envelope. `Allow` is kept on 405.
async fn envelope_rejections(res: Response) -> Response {
    let status = res.status();
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|ct| ct.as_bytes().starts_with(b"application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return res;
    }

    let message = match status {
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed".to_string(),
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large".to_string(),
        other => other.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    tracing::warn!(%status, "router rejection");
    let allow = res.headers().get(header::ALLOW).cloned();
    let mut wrapped = ApiError::Rejected(status, message).into_response();
    if let Some(allow) = allow {
        wrapped.headers_mut().insert(header::ALLOW, allow);
    }
    wrapped
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
