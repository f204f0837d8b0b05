use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{
    path::PathBuf,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::Instant,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::site::contact::{ContactPayload, ContactReply, CONTACT_ENDPOINT, CSRF_HEADER};
use crate::telemetry::{log_event_at, LogLevel};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_CONTACT_MAX_BODY_BYTES: usize = 64 * 1024;

const PORT_BOUNDS: (u16, u16) = (1, 65_535);
const CONTACT_MAX_BODY_BYTES_BOUNDS: (usize, usize) = (1_024, 1024 * 1024);

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_FORWARDED_ID_LEN: usize = 64;
const SERVICE_WORKER_PATH: &str = "/sw.js";

const FIELDS_REQUIRED_MESSAGE: &str = "All fields are required.";
const INVALID_FORMAT_MESSAGE: &str = "Invalid request format.";
const CSRF_REJECTED_MESSAGE: &str = "CSRF verification failed.";
const THANK_YOU_MESSAGE: &str = "Thank you for your message! We will get back to you soon.";

/// Passthrough worker: takes control immediately and leaves every fetch to
/// the network.
const SERVICE_WORKER_SCRIPT: &str = r#"self.addEventListener('install', () => {
    self.skipWaiting();
});

self.addEventListener('activate', (event) => {
    event.waitUntil(self.clients.claim());
});

self.addEventListener('fetch', () => {});
"#;

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    port: u16,
    dist_dir: PathBuf,
    log_level: LogLevel,
    contact_max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_env_with_bounds(&lookup, "PORT", DEFAULT_PORT, PORT_BOUNDS),
            dist_dir: parse_env_non_empty_string(&lookup, "DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR)),
            log_level: parse_env_non_empty_string(&lookup, "LOG_LEVEL")
                .and_then(|value| LogLevel::parse(&value))
                .unwrap_or(DEFAULT_LOG_LEVEL),
            contact_max_body_bytes: parse_env_with_bounds(
                &lookup,
                "CONTACT_MAX_BODY_BYTES",
                DEFAULT_CONTACT_MAX_BODY_BYTES,
                CONTACT_MAX_BODY_BYTES_BOUNDS,
            ),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();
    let bind_address = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        config: Arc::new(config),
    };

    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        &state.config,
        LogLevel::Info,
        "server_listening",
        serde_json::json!({
            "url": format!("http://127.0.0.1:{}", state.config.port),
            "dist_dir": state.config.dist_dir.display().to_string(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    let dist_dir = state.config.dist_dir.clone();
    let static_service = ServeDir::new(&dist_dir).not_found_service(ServeFile::new(dist_dir.join("index.html")));
    let body_limit = DefaultBodyLimit::max(state.config.contact_max_body_bytes);

    Router::new()
        .route(SERVICE_WORKER_PATH, get(service_worker_script))
        .route(CONTACT_ENDPOINT, post(submit_contact).layer(body_limit))
        .fallback_service(static_service)
        .with_state(state)
}

async fn service_worker_script() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("service-worker-allowed", HeaderValue::from_static("/"));
    (StatusCode::OK, headers, SERVICE_WORKER_SCRIPT)
}

/// Development stand-in for the site's contact endpoint. Replies with the
/// same `{success, message}` bodies; only a missing CSRF header changes the
/// status code.
async fn submit_contact(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let request_started_at = Instant::now();
    let submission_id = submission_id(&headers);

    let rejected = |status: StatusCode, error_class: &str, message: &str| {
        log_event(
            &state.config,
            LogLevel::Info,
            "contact_submission_rejected",
            serde_json::json!({
                "submission_id": submission_id.as_str(),
                "path": uri.path(),
                "error_class": error_class,
                "duration_ms": request_started_at.elapsed().as_millis(),
            }),
        );
        contact_response(status, ContactReply::rejected(message), &submission_id)
    };

    if read_csrf_token(&headers).is_none() {
        return rejected(StatusCode::FORBIDDEN, "csrf_missing", CSRF_REJECTED_MESSAGE);
    }

    let payload = match serde_json::from_slice::<ContactPayload>(&body) {
        Ok(payload) => payload.trimmed(),
        Err(_) => return rejected(StatusCode::OK, "invalid_json", INVALID_FORMAT_MESSAGE),
    };

    if !payload.is_complete() {
        return rejected(StatusCode::OK, "missing_fields", FIELDS_REQUIRED_MESSAGE);
    }

    log_event(
        &state.config,
        LogLevel::Info,
        "contact_submission_received",
        serde_json::json!({
            "submission_id": submission_id.as_str(),
            "email_domain": payload.email.rsplit_once('@').map(|(_, domain)| domain),
            "subject_chars": payload.subject.chars().count(),
            "message_chars": payload.message.chars().count(),
            "duration_ms": request_started_at.elapsed().as_millis(),
        }),
    );

    contact_response(StatusCode::OK, ContactReply::accepted(THANK_YOU_MESSAGE), &submission_id)
}

fn read_csrf_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CSRF_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_env_with_bounds<T>(lookup: impl Fn(&str) -> Option<String>, name: &str, default: T, bounds: (T, T)) -> T
where
    T: FromStr + PartialOrd,
{
    lookup(name)
        .and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Id that ties a submission's log lines to its response. A proxy-assigned
/// id is kept when it is short and made of `[A-Za-z0-9_-]`.
fn submission_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| is_forwardable_id(value))
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let sequence = SUBMISSION_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
            format!("contact-{sequence:06}")
        })
}

fn is_forwardable_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_FORWARDED_ID_LEN
        && value
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
}

/// JSON reply for the contact endpoint. Never cached; echoes the submission id.
fn contact_response(status: StatusCode, reply: ContactReply, submission_id: &str) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Ok(value) = HeaderValue::from_str(submission_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    (status, headers, Json(reply)).into_response()
}

fn log_event(config: &ServerConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    log_event_at(config.log_level, level, event, fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_state() -> AppState {
        AppState {
            config: Arc::new(ServerConfig::from_lookup(|_| None)),
        }
    }

    fn contact_headers(csrf_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = csrf_token {
            let name = header::HeaderName::from_bytes(CSRF_HEADER.as_bytes()).expect("valid header name");
            headers.insert(name, HeaderValue::from_str(token).expect("valid header value"));
        }
        headers
    }

    async fn post_contact(csrf_token: Option<&str>, body: &str) -> (StatusCode, ContactReply) {
        let response = submit_contact(
            State(test_state()),
            Uri::from_static(CONTACT_ENDPOINT),
            contact_headers(csrf_token),
            Bytes::from(body.to_string()),
        )
        .await;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let reply = serde_json::from_slice(&bytes).expect("reply is JSON");
        (status, reply)
    }

    #[test]
    fn config_defaults_apply_without_env() {
        let config = ServerConfig::from_lookup(|_| None);

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.contact_max_body_bytes, DEFAULT_CONTACT_MAX_BODY_BYTES);
    }

    #[test]
    fn config_reads_values_within_bounds() {
        let env = HashMap::from([
            ("PORT", " 3000 "),
            ("DIST_DIR", "public"),
            ("LOG_LEVEL", "DEBUG"),
            ("CONTACT_MAX_BODY_BYTES", "2048"),
        ]);
        let config = ServerConfig::from_lookup(|name| env.get(name).map(|value| value.to_string()));

        assert_eq!(config.port, 3000);
        assert_eq!(config.dist_dir, PathBuf::from("public"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.contact_max_body_bytes, 2048);
    }

    #[test]
    fn config_rejects_out_of_bounds_and_garbage() {
        let env = HashMap::from([
            ("PORT", "0"),
            ("DIST_DIR", "   "),
            ("LOG_LEVEL", "chatty"),
            ("CONTACT_MAX_BODY_BYTES", "512"),
        ]);
        let config = ServerConfig::from_lookup(|name| env.get(name).map(|value| value.to_string()));

        assert_eq!(config, ServerConfig::from_lookup(|_| None));
    }

    #[test]
    fn submission_id_keeps_a_well_formed_forwarded_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" edge_7f3a-19 "));

        assert_eq!(submission_id(&headers), "edge_7f3a-19");
    }

    #[test]
    fn submission_id_replaces_unusable_forwarded_ids() {
        let overlong = "a".repeat(MAX_FORWARDED_ID_LEN + 1);
        for forwarded in ["", "abc 123", "id;drop", overlong.as_str()] {
            let mut headers = HeaderMap::new();
            headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(forwarded).expect("valid header value"));

            assert!(submission_id(&headers).starts_with("contact-"), "{forwarded:?}");
        }
    }

    #[test]
    fn contact_response_echoes_submission_id_and_disables_caching() {
        let response = contact_response(StatusCode::OK, ContactReply::accepted("ok"), "contact-000042");

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).and_then(|value| value.to_str().ok()),
            Some("contact-000042")
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }

    #[test]
    fn generated_submission_ids_are_distinct() {
        let first = submission_id(&HeaderMap::new());
        let second = submission_id(&HeaderMap::new());

        assert!(first.starts_with("contact-"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn contact_without_csrf_header_is_forbidden() {
        let body = r#"{"name":"Ada","email":"ada@example.com","subject":"Hi","message":"Hello"}"#;

        let (status, reply) = post_contact(None, body).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(!reply.success);
    }

    #[tokio::test]
    async fn contact_with_blank_field_asks_for_all_fields() {
        let body = r#"{"name":"Ada","email":"ada@example.com","subject":"   ","message":"Hello"}"#;

        let (status, reply) = post_contact(Some("token"), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, ContactReply::rejected(FIELDS_REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn contact_with_malformed_json_reports_format_error() {
        let (status, reply) = post_contact(Some("token"), "{not json").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, ContactReply::rejected(INVALID_FORMAT_MESSAGE));
    }

    #[tokio::test]
    async fn complete_contact_submission_is_accepted() {
        let body = r#"{"name":" Ada ","email":"ada@example.com","subject":"Quote","message":"Need a frame"}"#;

        let (status, reply) = post_contact(Some("token"), body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, ContactReply::accepted(THANK_YOU_MESSAGE));
    }

    #[tokio::test]
    async fn service_worker_is_served_as_javascript() {
        let response = service_worker_script().await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .expect("content type is set");
        assert!(content_type.starts_with("application/javascript"));
        assert_eq!(
            response.headers().get("service-worker-allowed"),
            Some(&HeaderValue::from_static("/"))
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let script = String::from_utf8(bytes.to_vec()).expect("script is UTF-8");
        assert!(script.contains("skipWaiting"));
        assert!(script.contains("clients.claim()"));
    }
}
