use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result};
use actix_web::error::ErrorInternalServerError;
use actix_web::middleware::Logger;
use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{auctions, handle, Action, AuctionId, Command, CommandSuccess, PlayerId, Repository, State};
use super::types::{AddAuctionRequest, ApiError, AppState, AuctionDetail, AuctionItem, ConcludeResponse};

// Initialize application state
pub fn init_app_state() -> AppState {
    Arc::new(Mutex::new(HashMap::new()))
}

fn lock(data: &AppState) -> Result<MutexGuard<'_, Repository>> {
    data.lock().map_err(|_| ErrorInternalServerError("auction state is unavailable"))
}

// Read x-jwt-payload header and extract the acting player
fn get_auth_player(req: &HttpRequest) -> Option<PlayerId> {
    let auth_header = req.headers().get("x-jwt-payload")?;
    let auth_str = auth_header.to_str().ok()?;

    let decoded = general_purpose::STANDARD.decode(auth_str).ok()?;
    let json_str = String::from_utf8(decoded).ok()?;
    let json: Value = serde_json::from_str(&json_str).ok()?;

    match json.get("sub")? {
        Value::String(sub) => sub.parse::<PlayerId>().ok(),
        Value::Number(sub) => sub.as_u64().and_then(|id| PlayerId::try_from(id).ok()),
        _ => None,
    }
}

// Middleware to require authentication
async fn with_auth<F>(req: HttpRequest, f: F) -> Result<HttpResponse>
where
    F: FnOnce(PlayerId) -> Result<HttpResponse>
{
    match get_auth_player(&req) {
        Some(player) => f(player),
        None => Ok(HttpResponse::Unauthorized().body("Unauthorized")),
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiError {
        message: "Auction not found".to_string(),
    })
}

// Run a command against the shared repository, keeping the old state on failure
fn run_command(data: &AppState, command: Command) -> Result<std::result::Result<CommandSuccess, String>> {
    let mut app_state = lock(data)?;
    match handle(command, app_state.clone()) {
        Ok((success, new_state)) => {
            *app_state = new_state;
            Ok(Ok(success))
        }
        Err(err) => {
            warn!("command rejected: {}", err);
            Ok(Err(err.to_string()))
        }
    }
}

async fn get_auctions(data: web::Data<AppState>) -> Result<HttpResponse> {
    let app_state = lock(&data)?;
    let auction_list: Vec<AuctionItem> = auctions(&app_state)
        .into_iter()
        .map(AuctionItem::from)
        .collect();

    Ok(HttpResponse::Ok().json(auction_list))
}

async fn get_auction(
    req: HttpRequest,
    path: web::Path<AuctionId>,
    data: web::Data<AppState>
) -> Result<HttpResponse> {
    let auction_id = path.into_inner();
    let caller = get_auth_player(&req);
    let app_state = lock(&data)?;

    match app_state.get(&auction_id) {
        Some(session) => {
            let detail = AuctionDetail {
                id: auction_id,
                status: session.state.summary(),
                players: session.players.clone(),
                valid_actions: caller
                    .map(|player| session.state.valid_actions(player))
                    .unwrap_or_default(),
                result: session.result.clone(),
                log: session.log.clone(),
            };
            Ok(HttpResponse::Ok().json(detail))
        }
        None => Ok(not_found()),
    }
}

async fn create_auction(
    auction_req: web::Json<AddAuctionRequest>,
    data: web::Data<AppState>,
    config: web::Data<Config>
) -> Result<HttpResponse> {
    let command = auction_req.to_command(Uuid::new_v4(), Utc::now(), config.countdown_secs);
    match run_command(&data, command)? {
        Ok(success) => Ok(HttpResponse::Ok().json(success)),
        Err(message) => Ok(HttpResponse::BadRequest().body(message)),
    }
}

async fn act(
    req: HttpRequest,
    path: web::Path<AuctionId>,
    action: web::Json<Action>,
    data: web::Data<AppState>
) -> Result<HttpResponse> {
    let auction_id = path.into_inner();

    with_auth(req, |player| {
        if !lock(&data)?.contains_key(&auction_id) {
            return Ok(not_found());
        }
        let command = Command::Act {
            timestamp: Utc::now(),
            auction_id,
            player,
            action: action.into_inner(),
        };
        match run_command(&data, command)? {
            Ok(success) => Ok(HttpResponse::Ok().json(success)),
            Err(message) => Ok(HttpResponse::BadRequest().body(message)),
        }
    }).await
}

async fn conclude(
    path: web::Path<AuctionId>,
    data: web::Data<AppState>
) -> Result<HttpResponse> {
    let auction_id = path.into_inner();
    if !lock(&data)?.contains_key(&auction_id) {
        return Ok(not_found());
    }
    let command = Command::Conclude {
        timestamp: Utc::now(),
        auction_id,
    };
    match run_command(&data, command)? {
        Ok(CommandSuccess::AuctionConcluded { result, .. }) => {
            let players = lock(&data)?
                .get(&auction_id)
                .map(|session| session.players.clone())
                .unwrap_or_default();
            Ok(HttpResponse::Ok().json(ConcludeResponse { result, players }))
        }
        Ok(other) => Ok(HttpResponse::Ok().json(other)),
        Err(message) => Ok(HttpResponse::BadRequest().body(message)),
    }
}

/// Periodically closes open auctions whose countdown has elapsed.
pub fn spawn_expiry_ticker(data: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let command = Command::Tick { timestamp: Utc::now() };
            match run_command(&data, command) {
                Ok(Ok(CommandSuccess::Ticked { closed, .. })) if !closed.is_empty() => {
                    info!("countdown elapsed for {:?}", closed);
                }
                Ok(_) => {}
                Err(err) => warn!("expiry tick failed: {}", err),
            }
        }
    })
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/auctions", web::get().to(get_auctions))
            .route("/auctions/{id}", web::get().to(get_auction))
            .route("/auctions", web::post().to(create_auction))
            .route("/auctions/{id}/actions", web::post().to(act))
            .route("/auctions/{id}/conclude", web::post().to(conclude))
    );
}

pub async fn run_app(config: Config) -> std::io::Result<()> {
    let app_state = init_app_state();
    let _ticker = spawn_expiry_ticker(app_state.clone(), Duration::from_millis(config.poll_millis));

    info!("Starting server on {}:{}", config.host, config.port);

    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(config.clone())
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind(bind)?
    .run()
    .await
}
