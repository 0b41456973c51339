pub mod error;
pub mod handlers;
pub mod ui;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{response::Response, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::client::RouterApi;
use crate::error::Result;
use crate::store::AssignmentStore;

pub use error::ApiError;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<RwLock<AssignmentStore>>,
}

impl ApiState {
    pub fn new(store: AssignmentStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

fn routes(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route(
            "/api/assignments",
            get(handlers::list_assignments).post(handlers::create_assignment),
        )
        .route("/api/assignments/count", get(handlers::count_assignments))
        .route(
            "/api/assignments/:id",
            get(handlers::get_assignment)
                .put(handlers::update_assignment)
                .delete(handlers::delete_assignment),
        )
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Request handler panicked");
    error::internal_error_response()
}

/// Answer handler panics with the generic 500 response.
pub fn catch_panics(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

/// The JSON API on its own, without the browser pages or CORS.
pub fn api_router(state: ApiState) -> Router {
    catch_panics(routes(state).fallback(handlers::route_not_found))
}

/// The full application: JSON API, browser pages, tracing and CORS.
///
/// The browser pages reach the store only through the JSON API, dispatched
/// in-process.
pub fn app_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let pages = ui::router(RouterApi::new(api_router(state.clone())));

    let app = routes(state)
        .merge(pages)
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http());
    catch_panics(app).layer(cors)
}

/// Bind `addr` and serve until `shutdown` is cancelled.
pub async fn run_api_server(
    addr: SocketAddr,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind API server");
            return Err(e.into());
        }
    };
    serve(listener, state, shutdown).await
}

/// Serve on an already bound listener until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "Server running at http://{}", addr);

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
