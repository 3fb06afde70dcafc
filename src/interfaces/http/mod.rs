mod page;
mod sessions;

pub use sessions::SessionRegistry;

use actix_cors::Cors;
use actix_web::{delete, dev::Server, get, post, put, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::application::RenderedView;
use crate::domain::error::{AppError, Result};
use crate::domain::filter_state::{ControlInput, DisplayMode, FilterControl};
use crate::domain::view::ActiveView;
use crate::infrastructure::config::ServerConfig;

const LOG_CAPACITY: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub sessions: SessionRegistry,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(sessions: SessionRegistry) -> Self {
        Self {
            sessions,
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[derive(Deserialize)]
pub struct ViewRequest {
    pub view: ActiveView,
}

/// `input: null` (or an absent field) is a cleared dropdown
#[derive(Deserialize)]
pub struct ControlRequest {
    #[serde(default)]
    pub input: Option<ControlInput>,
}

#[derive(Deserialize)]
pub struct ModeRequest {
    pub mode: DisplayMode,
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: String,
    pub view: RenderedView,
}

fn parse_session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Session {}", raw)))
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        AppError::ValidationError(_) => HttpResponse::BadRequest().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

fn view_response(data: &HttpState, action: &str, result: Result<RenderedView>) -> HttpResponse {
    match result {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => {
            let level = match e {
                AppError::NotFound(_) | AppError::ValidationError(_) => "WARN",
                _ => "ERROR",
            };
            add_log(&data.logs, level, "HttpApi", &format!("{} failed: {}", action, e));
            error_response(&e)
        }
    }
}

#[get("/")]
async fn dashboard_page() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page::render_page())
}

#[post("/sessions")]
async fn create_session(data: web::Data<HttpState>) -> impl Responder {
    match data.sessions.create() {
        Ok((id, view)) => {
            add_log(&data.logs, "INFO", "HttpApi", &format!("Session {} opened", id));
            HttpResponse::Created().json(SessionCreated {
                session_id: id.to_string(),
                view,
            })
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Session creation failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/sessions/{id}")]
async fn get_session(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let result = parse_session_id(&path).and_then(|id| data.sessions.with_session(id, |c| c.render()));
    view_response(&data, "Render", result)
}

#[put("/sessions/{id}/view")]
async fn switch_view(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<ViewRequest>,
) -> impl Responder {
    let view = req.view;
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Switching view to {}", view.label()),
    );
    let result = parse_session_id(&path)
        .and_then(|id| data.sessions.with_session(id, |c| c.switch_view(view)));
    view_response(&data, "View switch", result)
}

#[put("/sessions/{id}/controls/{control}")]
async fn set_control(
    data: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    req: web::Json<ControlRequest>,
) -> impl Responder {
    let (raw_id, raw_control) = path.into_inner();
    let input = ControlInput::from(req.into_inner().input);
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Control {} <- {:?}", raw_control, input),
    );

    let result = FilterControl::from_id(&raw_control)
        .ok_or_else(|| AppError::NotFound(format!("Control {}", raw_control)))
        .and_then(|control| {
            let id = parse_session_id(&raw_id)?;
            data.sessions
                .with_session(id, |c| c.set_control(control, input))
        });
    view_response(&data, "Control update", result)
}

#[put("/sessions/{id}/mode")]
async fn set_mode(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<ModeRequest>,
) -> impl Responder {
    let mode = req.mode;
    let result = parse_session_id(&path)
        .and_then(|id| data.sessions.with_session(id, |c| c.set_mode(mode)));
    view_response(&data, "Mode update", result)
}

#[delete("/sessions/{id}")]
async fn close_session(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    match parse_session_id(&path).and_then(|id| data.sessions.remove(id)) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .map(|logs| logs.clone())
        .unwrap_or_default();
    HttpResponse::Ok().json(logs)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }
    if let Ok(mut logs) = logs.lock() {
        logs.push(entry.clone());
        if logs.len() > LOG_CAPACITY {
            logs.remove(0);
        }
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Page and `/api` routes, shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard_page).service(
        web::scope("/api")
            .service(create_session)
            .service(get_session)
            .service(switch_view)
            .service(set_control)
            .service(set_mode)
            .service(close_session)
            .service(get_logs),
    );
}

pub fn start_server(state: web::Data<HttpState>, config: &ServerConfig) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Local dashboard, any origin

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::fixtures::scenario_dataset;
    use actix_web::{http::StatusCode, test as actix_test};
    use serde_json::{json, Value};

    fn state() -> web::Data<HttpState> {
        web::Data::new(HttpState::new(SessionRegistry::new(
            Arc::new(scenario_dataset()),
            8,
        )))
    }

    macro_rules! app {
        ($state:expr) => {
            actix_test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    macro_rules! open_session {
        ($app:expr) => {{
            let req = actix_test::TestRequest::post().uri("/api/sessions").to_request();
            let body: Value = actix_test::call_and_read_body_json(&$app, req).await;
            body["session_id"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_page_is_served() {
        let state = state();
        let app = app!(state);
        let req = actix_test::TestRequest::get().uri("/").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn test_session_starts_on_occurrence_view() {
        let state = state();
        let app = app!(state);
        let req = actix_test::TestRequest::post().uri("/api/sessions").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"]["view"], "occurrence");
        assert_eq!(body["view"]["chart"]["x_axis"]["categories"], json!(["E.coli", "S.aureus"]));
    }

    #[actix_web::test]
    async fn test_null_input_resets_control_to_all() {
        let state = state();
        let app = app!(state);
        let id = open_session!(app);

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/view", id))
            .set_json(json!({ "view": "antibiotic_results" }))
            .to_request();
        let _: Value = actix_test::call_and_read_body_json(&app, req).await;

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/controls/organism", id))
            .set_json(json!({ "input": { "kind": "value", "value": "E.coli" } }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dropdowns"][2]["selected"], json!({ "kind": "value", "value": "E.coli" }));

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/controls/organism", id))
            .set_json(json!({ "input": null }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dropdowns"][2]["selected"], json!({ "kind": "all" }));
        assert_eq!(
            body["chart"]["title"],
            "Résultats des tests pour Tous (Type : Tous, Service : Tous)"
        );
    }

    #[actix_web::test]
    async fn test_mode_toggle() {
        let state = state();
        let app = app!(state);
        let id = open_session!(app);

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/view", id))
            .set_json(json!({ "view": "antibiotic_results" }))
            .to_request();
        let _: Value = actix_test::call_and_read_body_json(&app, req).await;

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/mode", id))
            .set_json(json!({ "mode": "stack" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["chart"]["bar_mode"], "stack");
        assert_eq!(body["chart"]["category_order"], json!(["NL", "S", "I", "R"]));
    }

    #[actix_web::test]
    async fn test_error_statuses() {
        let state = state();
        let app = app!(state);
        let id = open_session!(app);

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/controls/organism", id))
            .set_json(json!({ "input": { "kind": "value", "value": "K.pneumoniae" } }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/controls/antibiotic", id))
            .set_json(json!({ "input": null }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/sessions/{}", Uuid::new_v4()))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_close_session() {
        let state = state();
        let app = app!(state);
        let id = open_session!(app);

        let req = actix_test::TestRequest::delete()
            .uri(&format!("/api/sessions/{}", id))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_log_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(LOG_CAPACITY + 5) {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), LOG_CAPACITY);
        assert_eq!(logs[0].message, "entry 5");
    }
}
