use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{delete, dev::Server, get, post, put, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::application::use_cases::dashboard::EXPORT_FILENAME;
use crate::application::{AppearanceService, DashboardService};
use crate::domain::error::AppError;
use crate::domain::filter::FilterUpdate;
use crate::domain::port_record::SortKey;
use crate::domain::theme::{ThemePreferences, ThemeUpdate};

pub struct HttpState {
    pub dashboard: Arc<DashboardService>,
    pub appearance: Arc<AppearanceService>,
}

fn error_response(err: AppError) -> HttpResponse {
    match &err {
        AppError::DecodeError(_) => HttpResponse::BadRequest().body(err.to_string()),
        AppError::NetworkError(_) => HttpResponse::BadGateway().body(err.to_string()),
        AppError::ValidationError(_) => HttpResponse::Conflict().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[derive(Serialize)]
struct LoadResponse {
    count: usize,
}

#[derive(Deserialize)]
pub struct SortRequest {
    pub key: SortKey,
}

#[derive(Deserialize)]
pub struct PersistFiltersRequest {
    pub enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsResponse {
    persist_filters: bool,
    #[serde(flatten)]
    theme: ThemePreferences,
}

#[get("/view")]
async fn view(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.dashboard.view())
}

#[get("/stats")]
async fn stats(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.dashboard.stats())
}

#[post("/load")]
async fn load(data: web::Data<HttpState>) -> impl Responder {
    match data.dashboard.load_from_backend().await {
        Ok(count) => HttpResponse::Ok().json(LoadResponse { count }),
        Err(e) => {
            error!(error = %e, "Backend load failed");
            error_response(e)
        }
    }
}

#[post("/refresh")]
async fn refresh(data: web::Data<HttpState>) -> impl Responder {
    match data.dashboard.refresh().await {
        Ok(count) => HttpResponse::Ok().json(LoadResponse { count }),
        Err(e) => {
            error!(error = %e, "Refresh failed");
            error_response(e)
        }
    }
}

#[post("/import")]
async fn import(data: web::Data<HttpState>, body: String) -> impl Responder {
    match data.dashboard.load_from_file(&body) {
        Ok(count) => {
            info!(count, "CSV import applied");
            HttpResponse::Ok().json(LoadResponse { count })
        }
        Err(e) => {
            error!(error = %e, "CSV import rejected");
            error_response(e)
        }
    }
}

#[get("/export")]
async fn export(data: web::Data<HttpState>) -> impl Responder {
    let body = data.dashboard.export_current_view();
    HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ))
        .body(body)
}

#[put("/filters")]
async fn set_filters(data: web::Data<HttpState>, req: web::Json<FilterUpdate>) -> impl Responder {
    match data.dashboard.set_filter(req.into_inner()) {
        Ok(filters) => HttpResponse::Ok().json(filters),
        Err(e) => {
            error!(error = %e, "Failed to update filters");
            error_response(e)
        }
    }
}

#[delete("/filters")]
async fn clear_filters(data: web::Data<HttpState>) -> impl Responder {
    match data.dashboard.clear_filters() {
        Ok(filters) => HttpResponse::Ok().json(filters),
        Err(e) => {
            error!(error = %e, "Failed to clear filters");
            error_response(e)
        }
    }
}

#[post("/sort")]
async fn set_sort(data: web::Data<HttpState>, req: web::Json<SortRequest>) -> impl Responder {
    HttpResponse::Ok().json(data.dashboard.set_sort(req.key))
}

#[get("/settings")]
async fn settings(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(SettingsResponse {
        persist_filters: data.dashboard.persist_filters(),
        theme: data.appearance.preferences(),
    })
}

#[put("/settings/persist-filters")]
async fn set_persist_filters(
    data: web::Data<HttpState>,
    req: web::Json<PersistFiltersRequest>,
) -> impl Responder {
    match data.dashboard.set_persist_filters(req.enabled) {
        Ok(()) => HttpResponse::Ok().json(req.enabled),
        Err(e) => {
            error!(error = %e, "Failed to update filter persistence");
            error_response(e)
        }
    }
}

#[put("/settings/theme")]
async fn set_theme(data: web::Data<HttpState>, req: web::Json<ThemeUpdate>) -> impl Responder {
    match data.appearance.update(req.into_inner()) {
        Ok(preferences) => HttpResponse::Ok().json(preferences),
        Err(e) => {
            error!(error = %e, "Failed to update theme preferences");
            error_response(e)
        }
    }
}

fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(view)
        .service(stats)
        .service(load)
        .service(refresh)
        .service(import)
        .service(export)
        .service(set_filters)
        .service(clear_filters)
        .service(set_sort)
        .service(settings)
        .service(set_persist_filters)
        .service(set_theme)
}

pub fn start_server(
    dashboard: Arc<DashboardService>,
    appearance: Arc<AppearanceService>,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { dashboard, appearance });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new().wrap(cors).app_data(state.clone()).service(api_scope())
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
