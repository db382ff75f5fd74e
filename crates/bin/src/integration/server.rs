//! HTTP API over a shared ranking engine.
//!
//! Every request builds its own ranking session, so concurrent requests never
//! share factor scores.

use super::inputs::LoadedProvider;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use hobart::{EngineError, FactorSnapshot, FactorWeights, Ranking, RankingEngine};
use hobart_factors::SignalProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const SERVICE_NAME: &str = "Hobart Factor Ranking API";
const ENDPOINTS: [&str; 2] = ["/rank", "/factors"];

type ApiError = (StatusCode, String);

/// Response for `GET /`.
#[derive(Debug, Serialize)]
pub(crate) struct ServiceInfo {
    name: &'static str,
    status: &'static str,
    endpoints: [&'static str; 2],
}

/// Query parameters for `POST /rank`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankQuery {
    /// Keep only the best `top` securities
    top: Option<usize>,
}

/// Response for `POST /rank`.
#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    ranked_stocks: Ranking,
}

/// Build the router over a shared engine.
pub(crate) fn router<P>(engine: Arc<RankingEngine<P>>) -> Router
where
    P: SignalProvider + 'static,
{
    Router::new()
        .route("/", get(service_info))
        .route("/factors", get(get_factors::<P>))
        .route("/rank", post(rank_stocks::<P>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Bind `addr` and serve until the process is stopped.
pub(crate) async fn serve(engine: RankingEngine<LoadedProvider>, addr: &str) -> std::io::Result<()> {
    let app = router(Arc::new(engine));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "hobart API listening");
    axum::serve(listener, app).await
}

/// GET / - service name and endpoints
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        status: "running",
        endpoints: ENDPOINTS,
    })
}

/// GET /factors - every factor's scores for the universe
async fn get_factors<P>(
    State(engine): State<Arc<RankingEngine<P>>>,
) -> Result<Json<FactorSnapshot>, ApiError>
where
    P: SignalProvider + 'static,
{
    let snapshot = tokio::task::spawn_blocking(move || engine.load_factor_scores())
        .await
        .map_err(internal)?;
    Ok(Json(snapshot))
}

/// POST /rank - composite ranking under the posted weights
async fn rank_stocks<P>(
    State(engine): State<Arc<RankingEngine<P>>>,
    Query(query): Query<RankQuery>,
    Json(weights): Json<FactorWeights>,
) -> Result<Json<RankResponse>, ApiError>
where
    P: SignalProvider + 'static,
{
    let ranking = tokio::task::spawn_blocking(move || {
        let mut session = engine.session();
        match query.top {
            Some(n) => session.top_n(n, &weights),
            None => session.rank_all(&weights),
        }
    })
    .await
    .map_err(internal)?
    .map_err(|e| match e {
        EngineError::Factor(err) => {
            warn!(error = %err, "rejected ranking request");
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        other => internal(other),
    })?;

    Ok(Json(RankResponse {
        ranked_stocks: ranking,
    }))
}

fn internal(err: impl std::fmt::Display) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hobart_data::SignalSnapshot;

    const SNAPSHOT: &str = "\
symbol,sector,book_to_market,market_cap
AAA,Tech,1.0,100
BBB,Tech,3.0,200
CCC,Tech,2.0,
";

    fn engine() -> Arc<RankingEngine<SignalSnapshot>> {
        let snapshot = SignalSnapshot::from_csv_reader(SNAPSHOT.as_bytes()).unwrap();
        let universe = snapshot.universe();
        Arc::new(RankingEngine::from_provider(snapshot, universe))
    }

    fn value_only() -> FactorWeights {
        FactorWeights {
            value: 1.0,
            size: 0.0,
            momentum: 0.0,
            lowvol: 0.0,
            quality: 0.0,
            market_risk: 0.0,
        }
    }

    #[tokio::test]
    async fn test_service_info() {
        let Json(info) = service_info().await;
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["endpoints"][0], "/rank");
    }

    #[tokio::test]
    async fn test_rank_with_top() {
        let Json(response) = rank_stocks(
            State(engine()),
            Query(RankQuery { top: Some(2) }),
            Json(value_only()),
        )
        .await
        .unwrap();

        let json = serde_json::to_value(response).unwrap();
        let ranked = json["ranked_stocks"].as_array().unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0][0], "BBB");
        assert_eq!(ranked[1][0], "CCC");
    }

    #[tokio::test]
    async fn test_negative_weight_is_unprocessable() {
        let weights = FactorWeights {
            value: -1.0,
            ..value_only()
        };
        let (status, message) = rank_stocks(State(engine()), Query(RankQuery::default()), Json(weights))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("value"));
    }

    #[tokio::test]
    async fn test_factors_shape() {
        let Json(snapshot) = get_factors(State(engine())).await.unwrap();
        let json = serde_json::to_value(snapshot).unwrap();
        assert!(json["size"]["CCC"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 6);
    }
}
