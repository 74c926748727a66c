use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};

use log::{error, info};
use serde::Deserialize;
use rs_markov_core::command::CommandRegistry;
use rs_markov_core::model::brain::Brain;
use rs_markov_core::model::reply_config::ReplyConfig;

/// Corpus loaded at startup; its `.bin` snapshot is preferred when present.
const CORPUS_PATH: &str = "./data/brain.txt";

/// Struct representing query parameters for the `/v1/reply` endpoint
#[derive(Deserialize)]
struct ReplyParams {
	message: String,
	min_depth: Option<usize>,
	max_depth: Option<usize>,
}

#[derive(Deserialize)]
struct KnownQuery {
	word: Option<String>,
}

struct SharedData {
	brain: Brain,
	commands: CommandRegistry,
}

impl ReplyParams {
	/// Determines the extension depths, falling back to the brain's own.
	fn config(&self, default: &ReplyConfig) -> Result<ReplyConfig, String> {
		match (self.min_depth, self.max_depth) {
			(None, None) => Ok(*default),
			(min_depth, max_depth) => ReplyConfig::new(
				min_depth.unwrap_or(default.min_depth()),
				max_depth.unwrap_or(default.max_depth()),
			)
			.map_err(|e| e.to_string()),
		}
	}
}

/// HTTP POST endpoint `/v1/message`
///
/// Chat entry point: a `!command` is executed, any other message is
/// answered from the current brain and then learned.
/// The body may be empty when there is nothing to answer.
#[post("/v1/message")]
async fn post_message(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Brain lock failed"),
	};
	let SharedData { brain, commands } = &mut *shared_data;

	if let Some(answer) = commands.dispatch(brain, &body) {
		return HttpResponse::Ok().body(answer);
	}

	let reply = brain.reply(&body);
	brain.ingest(&body);
	HttpResponse::Ok().body(reply)
}

/// HTTP GET endpoint `/v1/reply`
///
/// Generates a reply without learning from the message.
#[get("/v1/reply")]
async fn get_reply(data: web::Data<Mutex<SharedData>>, query: web::Query<ReplyParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Brain lock failed"),
	};

	let config = match query.config(shared_data.brain.config()) {
		Ok(c) => c,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let reply = shared_data.brain.reply_with_config(&query.message, &config, &mut rand::rng());
	HttpResponse::Ok().body(reply)
}

/// HTTP PUT endpoint `/v1/learn`
///
/// Learns the body and returns one outcome per segment.
#[put("/v1/learn")]
async fn put_learn(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Brain lock failed"),
	};

	let outcomes: Vec<String> = shared_data.brain.ingest(&body).iter().map(ToString::to_string).collect();
	HttpResponse::Ok().body(outcomes.join("\n"))
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Brain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.brain.summary())
}

#[get("/v1/known")]
async fn get_known(data: web::Data<Mutex<SharedData>>, query: web::Query<KnownQuery>) -> impl Responder {
	let word = match &query.word {
		Some(s) if !s.trim().is_empty() => s.trim().to_lowercase(),
		_ => return HttpResponse::BadRequest().body("Missing or empty word"),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Brain lock failed"),
	};
	HttpResponse::Ok().body(shared_data.brain.known(&word))
}

#[put("/v1/save")]
async fn put_save(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Brain lock failed"),
	};

	match shared_data.brain.save(CORPUS_PATH) {
		Ok(_) => HttpResponse::Ok().body(format!("Saved {} lines", shared_data.brain.line_count())),
		Err(e) => {
			error!("Save failed: {e}");
			HttpResponse::InternalServerError().body(format!("Failed to save brain: {e}"))
		}
	}
}

/// Main entry point for the server.
///
/// Loads the brain, wraps it in a `Mutex` so learning never overlaps a
/// reply, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - The brain is not saved on shutdown; call `PUT /v1/save`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let brain = Brain::open(CORPUS_PATH).map_err(std::io::Error::other)?;
	info!("Listening on 127.0.0.1:5000");

	let shared_data = SharedData {
		brain,
		commands: CommandRegistry::default(),
	};
	let shared_brain = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		let cors = Cors::default()
			.allow_any_origin()
			.allowed_methods(vec!["GET", "POST", "PUT"]);

		App::new()
			.wrap(cors)
			.app_data(shared_brain.clone())
			.service(post_message)
			.service(get_reply)
			.service(put_learn)
			.service(get_stats)
			.service(get_known)
			.service(put_save)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
