use crate::gui_bridge::model::{DashboardModel, ViewOptions};
use crate::workflow::config::AnalyzerConfig;
use crate::workflow::session::Session;
use anyhow::Context;
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use thrustcore::table::to_csv;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const MAX_UPLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Session shared between the HTTP handlers. Uploads replace it wholesale.
pub type SharedSession = Arc<RwLock<Session>>;

/// Per-request overrides of the configured view policy.
#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    valid_only: Option<bool>,
    absolute: Option<bool>,
    show_invalid: Option<bool>,
}

impl ViewQuery {
    fn resolve(&self, defaults: &AnalyzerConfig) -> ViewOptions {
        ViewOptions {
            valid_only: self.valid_only.unwrap_or(defaults.valid_only),
            use_absolute: self.absolute.unwrap_or(defaults.use_absolute),
            show_invalid: self.show_invalid.unwrap_or(defaults.show_invalid),
        }
    }
}

fn read(state: &SharedSession) -> RwLockReadGuard<'_, Session> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn routes(
    state: SharedSession,
    defaults: AnalyzerConfig,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let defaults_filter = warp::any().map(move || defaults.clone());

    let records_route = warp::path("records")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedSession| warp::reply::json(&read(&state).records()).into_response());

    let summary_route = warp::path("summary")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ViewQuery>())
        .and(defaults_filter.clone())
        .and(state_filter.clone())
        .map(
            |query: ViewQuery, defaults: AnalyzerConfig, state: SharedSession| {
                let options = query.resolve(&defaults);
                let summary = thrustcore::summary_map(
                    read(&state).records(),
                    thrustcore::SummaryOptions::new(options.valid_only, options.use_absolute),
                );
                warp::reply::json(&summary).into_response()
            },
        );

    let dashboard_route = warp::path("dashboard")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ViewQuery>())
        .and(defaults_filter)
        .and(state_filter.clone())
        .map(
            |query: ViewQuery, defaults: AnalyzerConfig, state: SharedSession| {
                let model = DashboardModel::build(&read(&state), query.resolve(&defaults));
                warp::reply::json(&model).into_response()
            },
        );

    let upload_route = warp::path("upload")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES))
        .and(warp::header::optional::<String>("x-filename"))
        .and(warp::body::bytes())
        .and(state_filter.clone())
        .map(|filename: Option<String>, body: Bytes, state: SharedSession| {
            ingest_upload(&state, filename, &body)
        });

    let export_route = warp::path("export.csv")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter)
        .map(|state: SharedSession| {
            warp::reply::with_header(
                to_csv(read(&state).records()),
                "content-type",
                "text/csv; charset=utf-8",
            )
            .into_response()
        });

    records_route
        .or(summary_route)
        .or(dashboard_route)
        .or(upload_route)
        .or(export_route)
        .with(warp::log("analyzer::bridge"))
}

/// Decodes an uploaded log. A body that yields no records leaves the current
/// session untouched.
fn ingest_upload(state: &SharedSession, filename: Option<String>, body: &[u8]) -> Response {
    let name = filename.unwrap_or_else(|| "upload".to_string());
    let text = String::from_utf8_lossy(body);
    let session = Session::from_text(name.clone(), &text);

    if session.is_empty() {
        warn!("upload {name} produced no records");
        let reply = json!({
            "status": "error",
            "message": format!("No valid data found in {name}"),
        });
        return warp::reply::with_status(
            warp::reply::json(&reply),
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .into_response();
    }

    let message = session.describe();
    let count = session.records().len();
    *state.write().unwrap_or_else(PoisonError::into_inner) = session;
    info!("{message}");

    let reply = json!({"status": "ok", "records": count, "message": message});
    warp::reply::with_status(warp::reply::json(&reply), StatusCode::OK).into_response()
}

/// Serves the bridge until `shutdown` resolves.
pub async fn serve<F>(
    state: SharedSession,
    config: AnalyzerConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config.bind_address()?;
    let (bound, server) = warp::serve(routes(state, config))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .with_context(|| format!("binding HTTP bridge on {addr}"))?;
    info!("HTTP bridge listening on http://{bound}");
    server.await;
    Ok(())
}
