//! JSON API over the tournament engine, backed by the in-memory store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use club_tournament::{
    read_roster_csv, GroupId, MatchId, MemoryStore, Outcome, ParticipantId, ProgressionEngine,
    Tournament, TournamentError, TournamentId, TournamentStore,
};
use serde::Deserialize;
use std::sync::RwLock;

/// One engine for every tournament. The write lock serializes round generation and
/// result recording.
type AppState = Data<RwLock<ProgressionEngine<MemoryStore>>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_capacity")]
    capacity: usize,
    deadline: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

fn default_capacity() -> usize {
    16
}

#[derive(Deserialize)]
struct JoinBody {
    name: String,
}

#[derive(Deserialize)]
struct RecordResultBody {
    outcome: Outcome,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct GroupPath {
    group_id: GroupId,
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::NotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::StructuralInvariant(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        TournamentError::Configuration(_) | TournamentError::InvalidState(_) => {
            HttpResponse::BadRequest().json(body)
        }
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "club-tournament",
    })
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let tournament = Tournament::new(body.name, body.capacity, body.deadline, body.start, body.end)
        .with_description(body.description);
    let mut engine = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.create_tournament(tournament.clone()) {
        Ok(_) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(e),
    }
}

/// Tournament with its roster, rounds and progress.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let engine = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let view = (|| -> Result<serde_json::Value, TournamentError> {
        Ok(serde_json::json!({
            "tournament": engine.store().tournament(path.id)?,
            "participants": engine.store().participants(path.id)?,
            "rounds": engine.rounds(path.id)?,
            "progress": engine.state(path.id)?,
            "max_round_num": Tournament::max_round_num(engine.store().participants(path.id)?.len()),
        }))
    })();
    match view {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => error_response(e),
    }
}

#[post("/api/tournaments/{id}/participants")]
async fn api_join(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<JoinBody>,
) -> HttpResponse {
    let mut engine = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.join(path.id, &body.name, Utc::now()) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(e),
    }
}

/// Join every name in a CSV body (header row with a `name` column), in file order.
/// Nothing is joined if any name is refused.
#[post("/api/tournaments/{id}/participants/import")]
async fn api_import_roster(
    state: AppState,
    path: Path<TournamentPath>,
    body: String,
) -> HttpResponse {
    let names = match read_roster_csv(body.as_bytes()) {
        Ok(names) => names,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    let mut engine = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.join_all(path.id, &names, Utc::now()) {
        Ok(joined) => HttpResponse::Ok().json(joined),
        Err(e) => error_response(e),
    }
}

#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_withdraw(state: AppState, path: Path<TournamentParticipantPath>) -> HttpResponse {
    let mut engine = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.withdraw(path.id, path.participant_id, Utc::now()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// Generate the next round. 204 when there is nothing to generate.
#[post("/api/tournaments/{id}/rounds/next")]
async fn api_generate_next_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut engine = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.generate_next_round(path.id) {
        Ok(Some(round)) => HttpResponse::Ok().json(round),
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}/status")]
async fn api_status(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let engine = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let status = engine.state(path.id).and_then(|progress| {
        Ok(serde_json::json!({
            "complete": engine.is_complete(path.id)?,
            "progress": progress,
        }))
    });
    match status {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => error_response(e),
    }
}

#[put("/api/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let mut engine = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.record_result(path.match_id, body.outcome) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "match_id": path.match_id,
            "outcome": body.outcome,
        })),
        Err(e) => error_response(e),
    }
}

#[get("/api/groups/{group_id}/standings")]
async fn api_standings(state: AppState, path: Path<GroupPath>) -> HttpResponse {
    let engine = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match engine.current_standings(path.group_id) {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(e) => error_response(e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(ProgressionEngine::new(MemoryStore::new())));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_join)
            .service(api_import_roster)
            .service(api_withdraw)
            .service(api_generate_next_round)
            .service(api_status)
            .service(api_record_result)
            .service(api_standings)
    })
    .bind(bind)?
    .run()
    .await
}
