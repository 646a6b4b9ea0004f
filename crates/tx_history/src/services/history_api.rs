use {
    crate::{
        assembler::{EntityState, ParsedTransactionEntity},
        error::ParseFailure,
        fetcher::TransactionSource,
        pipeline::Pipeline,
    },
    anyhow::Context,
    axum::{
        extract::{Extension, Path},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    },
    serde::{Deserialize, Serialize},
    std::sync::Arc,
    tower_http::trace::TraceLayer,
};

pub async fn serve_api<S: TransactionSource + 'static>(
    listen_url: &str,
    pipeline: Arc<Pipeline<S>>,
) -> anyhow::Result<()> {
    let router = new_router(pipeline);
    let listener = tokio::net::TcpListener::bind(listen_url)
        .await
        .with_context(|| format!("failed to bind {listen_url}"))?;
    log::info!("history api listening on {listen_url}");
    axum::serve(listener, router)
        .await
        .with_context(|| "api failed")
}

pub fn new_router<S: TransactionSource + 'static>(pipeline: Arc<Pipeline<S>>) -> Router {
    Router::new()
        .route("/transactions/:signature", get(transaction::<S>))
        .route("/transactions/:signature/state", get(transaction_state::<S>))
        .route("/transactions/:signature/refetch", post(refetch_transaction::<S>))
        .layer(Extension(pipeline))
        .layer(TraceLayer::new_for_http())
}

/// parsed entity for the signature, unparsed transactions are returned with a `null` summary
async fn transaction<S: TransactionSource + 'static>(
    Path(signature): Path<String>,
    Extension(pipeline): Extension<Arc<Pipeline<S>>>,
) -> Response {
    entity_response(&signature, pipeline.get(&signature).await)
}

async fn refetch_transaction<S: TransactionSource + 'static>(
    Path(signature): Path<String>,
    Extension(pipeline): Extension<Arc<Pipeline<S>>>,
) -> Response {
    entity_response(&signature, pipeline.refetch(&signature).await)
}

/// reports progress without triggering a fetch
async fn transaction_state<S: TransactionSource + 'static>(
    Path(signature): Path<String>,
    Extension(pipeline): Extension<Arc<Pipeline<S>>>,
) -> impl IntoResponse {
    let state = pipeline.state(&signature);
    (
        StatusCode::OK,
        Json(StateResponse {
            id: signature,
            state,
        }),
    )
}

fn entity_response(
    signature: &str,
    result: Result<Arc<ParsedTransactionEntity>, ParseFailure>,
) -> Response {
    match result {
        Ok(entity) => (StatusCode::OK, Json(entity)).into_response(),
        Err(err) => {
            log::error!("failed to load tx({signature}) {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(Error {
                    msg: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub id: String,
    pub state: EntityState,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Error {
    pub msg: String,
}
