//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, PointsQuery, ReportResponse, TimeSlotQuery};
use crate::sim::tariff::Tariff;
use crate::sim::types::SimulationPoint;

fn bad_request(error: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// Returns the report summary.
///
/// `GET /report` → 200 + `ReportResponse` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ReportResponse> {
    Json(ReportResponse::from(&state.report))
}

/// Returns simulated points, optionally filtered by horizon index.
///
/// `GET /points` → 200 + `Vec<SimulationPoint>` JSON
/// `GET /points?from=N&to=M` → filtered range (inclusive)
/// `GET /points?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_points(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointsQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err(bad_request(format!("`from` ({from}) must be <= `to` ({to})")));
    }

    let points: Vec<SimulationPoint> = state
        .report
        .points
        .iter()
        .filter(|p| p.horizon_index >= from && p.horizon_index <= to)
        .cloned()
        .collect();

    Ok(Json(points))
}

/// Returns slot details for an hour of day.
///
/// `GET /timeslot?hour=H` → 200 + `SlotInfo` JSON
/// `GET /timeslot?hour=24` or missing `hour` → 400 + `ErrorResponse`
pub async fn get_timeslot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimeSlotQuery>,
) -> impl IntoResponse {
    let Some(hour) = query.hour else {
        return Err(bad_request("missing query parameter `hour`".to_string()));
    };
    state
        .tariff
        .slot_info(hour)
        .map(Json)
        .map_err(|e| bad_request(e.to_string()))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::sim::Simulator;
    use crate::sim::tariff::TariffSchedule;
    use crate::sim::types::{HourlyForecast, UsagePattern};

    fn make_test_state() -> Arc<AppState> {
        let sim: Simulator = Simulator::default();
        let forecasts: Vec<HourlyForecast> =
            (0..24).map(|h| HourlyForecast::new(h, h as usize, 2.0)).collect();
        let report = sim.run(&forecasts, UsagePattern::Normal, 0.12).unwrap();
        Arc::new(AppState {
            tariff: TariffSchedule::default(),
            report,
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn report_returns_200() {
        let (status, json) = get_json("/report").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["pattern"], "normal");
        assert_eq!(json["horizon_hours"], 24);
        assert!(json.get("totals").is_some());
        assert_eq!(json["by_slot"]["peak"]["hour_count"], 4);
        assert!(json.get("points").is_none());
    }

    #[tokio::test]
    async fn points_returns_all_hours() {
        let (status, json) = get_json("/points").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn points_range_query() {
        let (status, json) = get_json("/points?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6); // horizon indices 5..=10
        assert_eq!(rows[0]["horizon_index"], 5);
        assert_eq!(rows[5]["horizon_index"], 10);
    }

    #[tokio::test]
    async fn points_invalid_range_returns_400() {
        let (status, json) = get_json("/points?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn timeslot_describes_hour() {
        let (status, json) = get_json("/timeslot?hour=18").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["slot"], "peak");
        assert_eq!(json["multiplier"], 1.5);
        assert_eq!(json["next_transition"]["hour"], 21);
        assert_eq!(json["next_transition"]["slot"], "off_peak");
    }

    #[tokio::test]
    async fn timeslot_rejects_invalid_or_missing_hour() {
        let (status, json) = get_json("/timeslot?hour=24").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("24"));

        let (status, _) = get_json("/timeslot").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
