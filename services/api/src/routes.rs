use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use vastrabo::error::AppError;
use vastrabo::kommun::guidance::{APPLICATION_CHECKLIST, QASA_SAFETY_ADVICE, SEARCH_STEPS};
use vastrabo::kommun::{
    KommunLookup, KommunProfile, KommunSummary, LookupError, NormalizedName, PortalLinks,
};

#[derive(Debug, Serialize)]
pub(crate) struct KommunListResponse {
    pub(crate) revision: String,
    pub(crate) kommuner: Vec<KommunSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NormalizeQuery {
    #[serde(default)]
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NormalizeResponse {
    pub(crate) normalized: NormalizedName,
    pub(crate) in_catalog: bool,
    pub(crate) links: PortalLinks,
}

/// Municipality endpoints, independent of the health/metrics plumbing.
pub(crate) fn kommun_router(lookup: Arc<KommunLookup>) -> Router {
    Router::new()
        .route("/api/v1/kommuner", get(list_handler))
        .route("/api/v1/kommuner/:kommun", get(profile_handler))
        .route("/api/v1/normalize", get(normalize_handler))
        .route("/api/v1/guidance", get(guidance_handler))
        .with_state(lookup)
}

pub(crate) fn with_kommun_routes(lookup: Arc<KommunLookup>) -> Router {
    kommun_router(lookup)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_handler(
    State(lookup): State<Arc<KommunLookup>>,
) -> Json<KommunListResponse> {
    Json(KommunListResponse {
        revision: lookup.catalog().revision().to_string(),
        kommuner: lookup.summaries(),
    })
}

pub(crate) async fn profile_handler(
    State(lookup): State<Arc<KommunLookup>>,
    Path(kommun): Path<String>,
) -> Result<Json<KommunProfile>, AppError> {
    // A path segment is never "nothing selected"; blank is just unknown.
    let profile = lookup
        .profile(&kommun)?
        .ok_or(LookupError::UnknownMunicipality(kommun))?;
    Ok(Json(profile))
}

pub(crate) async fn normalize_handler(
    State(lookup): State<Arc<KommunLookup>>,
    Query(query): Query<NormalizeQuery>,
) -> Json<NormalizeResponse> {
    let municipality = lookup.catalog().find(&query.name);
    debug!(name = %query.name, in_catalog = municipality.is_some(), "normalizing name");

    Json(NormalizeResponse {
        normalized: NormalizedName::of(&query.name),
        in_catalog: municipality.is_some(),
        links: PortalLinks::build(
            lookup.templates(),
            &query.name,
            municipality.map(|m| m.boplats).unwrap_or(false),
        ),
    })
}

pub(crate) async fn guidance_handler() -> Json<serde_json::Value> {
    Json(json!({
        "steps": SEARCH_STEPS,
        "application_checklist": APPLICATION_CHECKLIST,
        "qasa_safety_advice": QASA_SAFETY_ADVICE,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use vastrabo::kommun::{MunicipalityCatalog, PortalTemplates};

    fn lookup() -> Arc<KommunLookup> {
        let catalog = MunicipalityCatalog::embedded().expect("embedded catalog loads");
        Arc::new(KommunLookup::new(catalog, PortalTemplates::default()))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = kommun_router(lookup())
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes).expect("body is json");
        (status, body)
    }

    #[tokio::test]
    async fn lists_all_municipalities() {
        let (status, body) = get_json("/api/v1/kommuner").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revision"], "2026.1");
        assert_eq!(body["kommuner"].as_array().map(Vec::len), Some(49));
    }

    #[tokio::test]
    async fn profile_accepts_encoded_names_and_slugs() {
        let (status, body) = get_json("/api/v1/kommuner/G%C3%B6teborg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["official_name"], "Göteborgs kommun");

        let (status, body) = get_json("/api/v1/kommuner/lilla-edet").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["portals"]["homeq"],
            "https://www.homeq.se/lediga-lagenheter/lilla-edets-kommun"
        );
        assert_eq!(body["boplats_note"], "Boplats: ej i deras kommun-lista");
    }

    #[tokio::test]
    async fn unknown_municipality_is_not_found() {
        let (status, body) = get_json("/api/v1/kommuner/Stockholm").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown municipality 'Stockholm'");

        let (status, _) = get_json("/api/v1/kommuner/%20").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn normalize_works_for_names_outside_the_catalog() {
        let (status, body) = get_json("/api/v1/normalize?name=Malm%C3%B6").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["in_catalog"], false);
        assert_eq!(body["normalized"]["slug"], "malmo");
        assert_eq!(body["normalized"]["official_name"], "Malmö kommun");
        assert!(body["links"].get("boplats").is_none());
    }

    #[tokio::test]
    async fn normalize_without_name_is_total() {
        let (status, body) = get_json("/api/v1/normalize").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["normalized"]["slug"], "");
        assert_eq!(body["normalized"]["homeq_query"], "-kommun");
    }

    #[tokio::test]
    async fn normalize_omits_homeq_link_for_punctuation_only_names() {
        let (status, body) = get_json("/api/v1/normalize?name=%3F%3F%3F").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["normalized"]["slug"], "");
        assert!(body["links"].get("homeq").is_none());
        assert!(body["links"]["qasa"].is_string());
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
