//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DATA_FILE (session JSON, default data/session.json).

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use court_rotation_web::{
    generate_round, import_roster_csv, CommitError, Gender, PlayerId, PlayerUpdate, Session,
    SessionError, Settings, Storage,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::{Mutex, RwLock};

/// The one session this server manages, its file, and the RNG for pool tie-breaks.
struct AppState {
    session: RwLock<Session>,
    storage: Storage,
    rng: Mutex<StdRng>,
}

type SharedState = Data<AppState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    gender: Gender,
    #[serde(default = "default_skill")]
    skill: i64,
}

fn default_skill() -> i64 {
    i64::from(court_rotation_web::models::DEFAULT_SKILL)
}

#[derive(Deserialize)]
struct PresentBody {
    present: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HappyToSitBody {
    happy_to_sit: bool,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

fn error_json(e: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": e.to_string() })
}

/// Map a failed commit: a refused change is the client's fault, an unsaved one is ours.
fn commit_error_response<E: std::fmt::Display>(e: CommitError<E>) -> HttpResponse {
    match e {
        CommitError::Rejected(_) => HttpResponse::BadRequest().json(error_json(e)),
        CommitError::Unsaved(_) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

/// Apply `f` to the session and save the whole document; respond with the session.
fn mutate<F>(state: &AppState, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> Result<(), SessionError>,
{
    let mut session = match state.session.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match state.storage.commit(&mut *session, f) {
        Ok(()) => HttpResponse::Ok().json(&*session),
        Err(e) => commit_error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "court-rotation-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Full session: roster, rounds (oldest first), settings.
#[get("/api/session")]
async fn api_get_session(state: SharedState) -> HttpResponse {
    match state.session.read() {
        Ok(session) => HttpResponse::Ok().json(&*session),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

/// Round history, newest first.
#[get("/api/rounds")]
async fn api_get_rounds(state: SharedState) -> HttpResponse {
    match state.session.read() {
        Ok(session) => {
            let rounds: Vec<_> = session.rounds.iter().rev().collect();
            HttpResponse::Ok().json(rounds)
        }
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

/// Add a player (name, gender, skill 1-10).
#[post("/api/players")]
async fn api_add_player(state: SharedState, body: Json<AddPlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    mutate(&state, |s| {
        s.add_player(&body.name, body.gender, body.skill).map(|_| ())
    })
}

/// Edit a player's name, gender or skill.
#[put("/api/players/{id}")]
async fn api_update_player(
    state: SharedState,
    path: Path<PlayerPath>,
    body: Json<PlayerUpdate>,
) -> HttpResponse {
    let update = body.into_inner();
    mutate(&state, |s| s.update_player(path.id, update))
}

/// Mark a player present or absent for the next round.
#[put("/api/players/{id}/present")]
async fn api_set_present(
    state: SharedState,
    path: Path<PlayerPath>,
    body: Json<PresentBody>,
) -> HttpResponse {
    mutate(&state, |s| s.set_present(path.id, body.present))
}

#[put("/api/players/{id}/happy-to-sit")]
async fn api_set_happy_to_sit(
    state: SharedState,
    path: Path<PlayerPath>,
    body: Json<HappyToSitBody>,
) -> HttpResponse {
    mutate(&state, |s| s.set_happy_to_sit(path.id, body.happy_to_sit))
}

/// Archive (soft-delete) a player; old rounds keep showing them.
#[post("/api/players/{id}/archive")]
async fn api_archive_player(state: SharedState, path: Path<PlayerPath>) -> HttpResponse {
    mutate(&state, |s| s.archive_player(path.id))
}

/// Import players from a CSV body with a `name,gender,skill` header.
#[post("/api/players/import")]
async fn api_import_players(state: SharedState, body: Bytes) -> HttpResponse {
    let mut session = match state.session.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match state
        .storage
        .commit(&mut *session, |s| import_roster_csv(s, &body[..]))
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => commit_error_response(e),
    }
}

/// Replace pairing mode, skill mode, uniqueness importance, rotation focus, courts.
#[put("/api/settings")]
async fn api_set_settings(state: SharedState, body: Json<Settings>) -> HttpResponse {
    let settings = body.into_inner();
    mutate(&state, |s| s.set_settings(settings))
}

/// Generate the next round from the present players.
#[post("/api/rounds/generate")]
async fn api_generate_round(state: SharedState) -> HttpResponse {
    let mut rng = match state.rng.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    mutate(&state, |s| generate_round(s, &mut *rng).map(|_| ()))
}

/// New day: clear rounds and counters, keep roster and settings.
#[post("/api/new-day")]
async fn api_new_day(state: SharedState) -> HttpResponse {
    mutate(&state, |s| {
        s.new_day();
        Ok(())
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_file() -> String {
    "data/session.json".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let data_file = std::env::var("DATA_FILE").unwrap_or_else(|_| default_data_file());
    let bind = (host.as_str(), port);

    let storage = Storage::new(data_file);
    let session = storage.load();
    let state = Data::new(AppState {
        session: RwLock::new(session),
        storage,
        rng: Mutex::new(StdRng::from_entropy()),
    });
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_get_session)
            .service(api_get_rounds)
            .service(api_import_players)
            .service(api_add_player)
            .service(api_update_player)
            .service(api_set_present)
            .service(api_set_happy_to_sit)
            .service(api_archive_player)
            .service(api_set_settings)
            .service(api_generate_round)
            .service(api_new_day)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
