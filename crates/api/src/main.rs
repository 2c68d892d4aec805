use anyhow::Context;
use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html, routing::get, Json, Router};
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wattcast_core::charts::ChartWriter;
use wattcast_core::domain::estimate::{estimate, PriceEstimate};
use wattcast_core::domain::report::UsageReport;
use wattcast_core::predict::{LinearPriceModel, PricePredictor};

mod views;

use views::{ChartUrls, IndexPage, ReportPage, STATIC_PREFIX};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = wattcast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let predictor = LinearPriceModel::load(&settings.model_path).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "prediction artifact unavailable; refusing to start");
        e
    })?;

    std::fs::create_dir_all(&settings.static_dir).with_context(|| {
        format!(
            "failed to create static dir {}",
            settings.static_dir.display()
        )
    })?;

    let state = AppState {
        predictor: Arc::new(predictor),
        charts: Arc::new(ChartWriter::new(&settings.static_dir)),
        rng: Arc::new(Mutex::new(wattcast_core::rng::seeded_rng(
            settings.rng_seed,
        ))),
    };

    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(
        %addr,
        static_dir = %settings.static_dir.display(),
        seeded = settings.rng_seed.is_some(),
        "api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Clone)]
struct AppState {
    predictor: Arc<dyn PricePredictor>,
    charts: Arc<ChartWriter>,
    rng: Arc<Mutex<StdRng>>,
}

fn router(state: AppState) -> Router {
    let static_dir = state.charts.dir().to_path_buf();

    Router::new()
        .route("/", get(index))
        .route("/report", get(report))
        .route("/healthz", get(healthz))
        .route("/api/estimate", get(get_estimate))
        .route("/api/report", get(get_report))
        .nest_service(STATIC_PREFIX, ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let estimate = current_estimate(&state).map_err(internal_error)?;
    render_page(IndexPage::from(&estimate))
}

async fn report(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let report = generate_report(&state).await.map_err(internal_error)?;
    render_page(ReportPage::new(&report, ChartUrls::default()))
}

async fn get_estimate(State(state): State<AppState>) -> Result<Json<PriceEstimate>, StatusCode> {
    current_estimate(&state).map(Json).map_err(internal_error)
}

#[derive(Debug, Serialize)]
struct ApiReport {
    #[serde(flatten)]
    report: UsageReport,
    charts: ChartUrls,
}

async fn get_report(State(state): State<AppState>) -> Result<Json<ApiReport>, StatusCode> {
    let report = generate_report(&state).await.map_err(internal_error)?;
    Ok(Json(ApiReport {
        report,
        charts: ChartUrls::default(),
    }))
}

fn current_estimate(state: &AppState) -> anyhow::Result<PriceEstimate> {
    let now = chrono::Local::now().naive_local();
    let mut rng = state.rng.lock().unwrap_or_else(PoisonError::into_inner);
    estimate(now, state.predictor.as_ref(), &mut *rng)
}

async fn generate_report(state: &AppState) -> anyhow::Result<UsageReport> {
    let report = {
        let mut rng = state.rng.lock().unwrap_or_else(PoisonError::into_inner);
        UsageReport::generate(&mut *rng)
    };

    let charts = Arc::clone(&state.charts);
    let samples = report.samples.clone();
    tokio::task::spawn_blocking(move || charts.render(&samples))
        .await
        .context("chart render task panicked")??;

    tracing::info!(
        weekly_cost = report.weekly_cost,
        energy_saved_kwh = report.energy_saved_kwh,
        "generated usage report"
    );
    Ok(report)
}

fn render_page<T: Template>(page: T) -> Result<Html<String>, StatusCode> {
    page.render()
        .map(Html)
        .map_err(|e| internal_error(anyhow::Error::new(e).context("template render failed")))
}

fn internal_error(err: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = ?err, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &wattcast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;
    use wattcast_core::domain::estimate::NOTIFICATIONS;
    use wattcast_core::domain::features::FeatureVector;

    struct Unavailable;

    impl PricePredictor for Unavailable {
        fn predict(&self, _features: &FeatureVector) -> anyhow::Result<f64> {
            anyhow::bail!("model not loaded")
        }
    }

    fn test_state(dir: &std::path::Path, predictor: Arc<dyn PricePredictor>) -> AppState {
        AppState {
            predictor,
            charts: Arc::new(ChartWriter::new(dir)),
            rng: Arc::new(Mutex::new(wattcast_core::rng::seeded_rng(Some(42)))),
        }
    }

    fn linear_model() -> Arc<dyn PricePredictor> {
        let model = LinearPriceModel::from_json(
            r#"{"intercept": 5.0, "coefficients": [0.25, 0.0, 0.0, 0.0]}"#,
        )
        .unwrap();
        Arc::new(model)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path(), linear_model()));
        let (status, body) = get(&app, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn home_page_renders_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path(), linear_model()));

        let (status, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Current price"));
        assert!(body.contains("Peak hours: "));
        assert!(body.contains("+5h: Rs "));
        assert!(NOTIFICATIONS.iter().any(|n| body.contains(n)));
    }

    #[tokio::test]
    async fn estimate_api_returns_five_upcoming_prices() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path(), linear_model()));

        let (status, body) = get(&app, "/api/estimate").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).unwrap();
        let current = json["current_price"].as_f64().unwrap();
        let upcoming: Vec<f64> = json["upcoming_prices"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert_eq!(upcoming.len(), 5);
        for (i, price) in upcoming.iter().enumerate() {
            let expected = current + 0.25 * (i + 1) as f64;
            assert!((price - expected).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn report_page_writes_charts() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path(), linear_model()));

        let (status, body) = get(&app, "/report").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Total cost for this week: Rs "));
        assert!(body.contains("Today you saved up to "));
        assert!(body.contains("Month 6: Rs "));

        for name in ["daily_graph.svg", "weekly_graph.svg", "monthly_graph.svg"] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }

        let (status, svg) = get(&app, "/static/weekly_graph.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert!(svg.starts_with("<svg"));
    }

    #[tokio::test]
    async fn report_api_costs_follow_samples() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path(), linear_model()));

        let (status, body) = get(&app, "/api/report").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();

        let daily_sum: f64 = json["samples"]["daily"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .sum();
        let weekly_cost = json["weekly_cost"].as_f64().unwrap();
        assert!((weekly_cost - daily_sum * 40.0).abs() < 1e-6);

        let monthly = json["samples"]["monthly"].as_array().unwrap();
        let costs = json["monthly_costs"].as_array().unwrap();
        assert_eq!(costs.len(), 6);
        for (usage, cost) in monthly.iter().zip(costs) {
            assert!((usage.as_f64().unwrap() * 40.0 - cost.as_f64().unwrap()).abs() < 1e-6);
        }

        let saved = json["energy_saved_kwh"].as_f64().unwrap();
        assert!((0.0..=2.0).contains(&saved));
        assert_eq!(json["charts"]["daily"], "/static/daily_graph.svg");
    }

    #[tokio::test]
    async fn prediction_failure_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(dir.path(), Arc::new(Unavailable)));

        let (status, _) = get(&app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (status, _) = get(&app, "/api/estimate").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn chart_write_failure_is_a_server_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let app = router(test_state(file.path(), linear_model()));

        let (status, _) = get(&app, "/report").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
