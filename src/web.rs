use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::error;

use crate::draw::{DayMode, DrawLists, DrawReport, ListKind};
use crate::error::{DrawError, SessionError};
use crate::session::SessionContext;

/// Shared server state: the single active session and its random source
pub struct AppState {
    pub session: Mutex<SessionContext>,
    pub rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(session: SessionContext, rng: StdRng) -> web::Data<Self> {
        web::Data::new(Self {
            session: Mutex::new(session),
            rng: Mutex::new(rng),
        })
    }
}

#[derive(Deserialize)]
pub struct ModeRequest {
    mode: DayMode,
}

#[derive(Deserialize)]
pub struct ItemRequest {
    value: String,
}

#[derive(Serialize)]
pub struct SessionResponse<'a> {
    mode: DayMode,
    lists: &'a DrawLists,
    has_draw: bool,
}

#[derive(Serialize)]
pub struct DrawResponse<'a> {
    success: bool,
    retry_exhausted: bool,
    report: &'a DrawReport,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("state lock poisoned"))
}

fn parse_list(name: &str) -> std::result::Result<ListKind, SessionError> {
    ListKind::from_name(name).ok_or_else(|| SessionError::UnknownList(name.to_string()))
}

fn error_response(err: SessionError) -> HttpResponse {
    match err {
        SessionError::Draw(DrawError::FatalInput(validation)) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": validation.errors.join("; "),
                "errors": validation.errors,
                "warnings": validation.warnings,
            }))
        }
        SessionError::NoDrawYet => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
        SessionError::EmptyValue
        | SessionError::UnknownList(_)
        | SessionError::IndexOutOfRange { .. } => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
        SessionError::Draw(DrawError::Store(_)) | SessionError::Store(_) => {
            error!(error = %err, "storage failure");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": err.to_string()
            }))
        }
    }
}

// Session snapshot endpoint
async fn get_session(state: web::Data<AppState>) -> Result<HttpResponse> {
    let ctx = lock(&state.session)?;
    let session = ctx.session();
    Ok(HttpResponse::Ok().json(SessionResponse {
        mode: session.mode,
        lists: &session.lists,
        has_draw: session.has_draw(),
    }))
}

// Day mode switch endpoint
async fn set_mode(
    req: web::Json<ModeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut ctx = lock(&state.session)?;
    ctx.set_mode(req.mode);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Mode: {}", req.mode.label())
    })))
}

// Add item endpoint
async fn add_item(
    list: web::Path<String>,
    req: web::Json<ItemRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut ctx = lock(&state.session)?;
    let result = parse_list(&list).and_then(|kind| ctx.add_item(kind, &req.value));
    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Item added"
        }))),
        Err(e) => Ok(error_response(e)),
    }
}

// Remove item endpoint
async fn remove_item(
    path: web::Path<(String, usize)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (list, index) = path.into_inner();
    let mut ctx = lock(&state.session)?;
    let result = parse_list(&list).and_then(|kind| ctx.remove_item(kind, index));
    match result {
        Ok(removed) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "removed": removed
        }))),
        Err(e) => Ok(error_response(e)),
    }
}

// Draw endpoint
async fn run_draw(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut ctx = lock(&state.session)?;
    let mut rng = lock(&state.rng)?;
    match ctx.draw(&mut *rng) {
        Ok(report) => Ok(HttpResponse::Ok().json(DrawResponse {
            success: true,
            retry_exhausted: report.retry_exhausted(),
            report,
        })),
        Err(e) => Ok(error_response(e)),
    }
}

// Printable result endpoint
async fn get_result(state: web::Data<AppState>) -> Result<HttpResponse> {
    let ctx = lock(&state.session)?;
    match ctx.printable() {
        Ok(text) => Ok(HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text)),
        Err(e) => Ok(error_response(e)),
    }
}

// Clear all data endpoint
async fn clear_all(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut ctx = lock(&state.session)?;
    match ctx.clear_all() {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Data cleared"
        }))),
        Err(e) => Ok(error_response(e)),
    }
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/session", web::get().to(get_session))
        .route("/api/mode", web::post().to(set_mode))
        .route("/api/lists/{list}", web::post().to(add_item))
        .route("/api/lists/{list}/{index}", web::delete().to(remove_item))
        .route("/api/draw", web::post().to(run_draw))
        .route("/api/result", web::get().to(get_result))
        .route("/api/clear", web::post().to(clear_all));
}

pub async fn start_server(port: u16, app_state: web::Data<AppState>) -> std::io::Result<()> {
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
