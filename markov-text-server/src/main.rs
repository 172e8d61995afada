use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use actix_web::middleware::Logger;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use env_logger::Env;
use log::{info, warn};

use serde::Deserialize;
use markov_text_core::MarkovError;
use markov_text_core::io::{corpus_path, get_filename, list_files};
use markov_text_core::model::markov_text::MarkovText;
use markov_text_core::model::options::{
	DeadEndPolicy, EmptyModelPolicy, GenerationOptions, StartSeed, DEFAULT_MAX_LENGTH,
};

/// Folder scanned for `*.txt` corpus files.
const DATA_FOLDER: &str = "./data";
const CORPUS_EXTENSION: &str = "txt";

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_length: Option<usize>,
	dead_end: Option<String>,
	empty_model: Option<String>,
	seed: Option<String> // -> random, none or custom(str)
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>
}

struct SharedData {
	model: MarkovText,
	data_folder: PathBuf,
}

impl GenerateParams {
	/// Resolves the starting seed strategy, defaulting to a random start.
	fn start_seed(&self) -> Result<StartSeed, MarkovError> {
		match &self.seed {
			None => Ok(StartSeed::Random),
			Some(s) => s.parse(),
		}
	}

	fn dead_end(&self, default: DeadEndPolicy) -> Result<DeadEndPolicy, MarkovError> {
		self.dead_end.as_deref().map_or(Ok(default), str::parse)
	}

	fn empty_model(&self, default: EmptyModelPolicy) -> Result<EmptyModelPolicy, MarkovError> {
		self.empty_model.as_deref().map_or(Ok(default), str::parse)
	}

	/// Resolves every parameter, falling back to the model's options.
	fn resolve(&self, defaults: &GenerationOptions) -> Result<Resolved, MarkovError> {
		Ok(Resolved {
			max_length: self.max_length.unwrap_or(defaults.max_length()),
			start_seed: self.start_seed()?,
			dead_end: self.dead_end(defaults.dead_end)?,
			empty_model: self.empty_model(defaults.empty_model)?,
		})
	}
}

struct Resolved {
	max_length: usize,
	start_seed: StartSeed,
	dead_end: DeadEndPolicy,
	empty_model: EmptyModelPolicy,
}

/// Maps a generation error onto an HTTP response.
fn error_response(e: &MarkovError) -> HttpResponse {
	match e {
		MarkovError::InvalidArgument(_) | MarkovError::UnknownSeed(_) => HttpResponse::BadRequest().body(e.to_string()),
		MarkovError::EmptyModel => HttpResponse::Conflict().body(e.to_string()),
		MarkovError::Io { source, .. } if source.kind() == ErrorKind::NotFound => HttpResponse::NotFound().body(e.to_string()),
		MarkovError::Io { .. } => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// GET /v1/generate
///
/// Generates a sequence from the loaded model based on query parameters.
/// Returns the generated tokens joined by single spaces as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<RwLock<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let model = &shared_data.model;

	let params = match query.resolve(model.options()) {
		Ok(p) => p,
		Err(e) => return error_response(&e),
	};

	let result = model
		.generator()
		.dead_end(params.dead_end)
		.empty_model(params.empty_model)
		.generate(params.max_length, params.start_seed.term(), &mut rand::rng());

	match result {
		Ok(tokens) => HttpResponse::Ok().body(tokens.join(" ")),
		Err(e) => {
			if !e.is_caller_error() {
				warn!("generation failed: {e}");
			}
			error_response(&e)
		}
	}
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let folder = match data.read() {
		Ok(m) => m.data_folder.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let names = list_files(&folder, CORPUS_EXTENSION)
		.and_then(|files| files.iter().map(get_filename).collect::<Result<Vec<_>, _>>());
	match names {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.model.corpus_names().join("\n"))
}

/// GET /v1/table
///
/// Returns the transition table of the loaded model as JSON.
#[get("/v1/table")]
async fn get_table(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.model.build_transition_table())
}

/// GET /v1/options
///
/// Returns the default generation options of the loaded model as JSON.
#[get("/v1/options")]
async fn get_options(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.model.options())
}

/// PUT /v1/load_corpora?names=a,b
///
/// Builds a new model from `<data>/a.txt` and `<data>/b.txt`, then swaps it in.
/// Names must be plain file names; anything else is a 400. A missing file is a 404.
#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<RwLock<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let folder = match data.read() {
		Ok(m) => m.data_folder.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let paths: Result<Vec<_>, _> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(|name| corpus_path(&folder, name, CORPUS_EXTENSION))
		.collect();

	// Built before taking the write lock.
	let model = match paths.and_then(MarkovText::from_files) {
		Ok(m) => m,
		Err(e) => {
			warn!("failed to load corpora [{query_names}]: {e}");
			return error_response(&e);
		}
	};

	let mut shared_data = match data.write() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	info!(
		"loaded corpora [{}]: {} tokens, {} distinct",
		model.corpus_names().join(", "),
		model.tokens().len(),
		model.build_transition_table().len()
	);
	shared_data.model = model;

	HttpResponse::Ok().body("Corpora loaded successfully")
}

/// Registers every endpoint on an actix service config.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_corpora)
		.service(put_corpora)
		.service(get_loaded_corpora)
		.service(get_table)
		.service(get_options);
}

/// Main entry point for the server.
///
/// Starts with an empty model wrapped in an `RwLock`: generation takes read
/// locks only, loading corpora takes the write lock to swap the model.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Corpora are read from `./data/*.txt`.
/// - Log level defaults to `info`, override with `RUST_LOG`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let shared_data = SharedData {
		model: MarkovText::default(),
		data_folder: PathBuf::from(DATA_FOLDER),
	};
	let shared_model = web::Data::new(RwLock::new(shared_data));

	let defaults = GenerationOptions::default();
	info!(
		"serving on 127.0.0.1:5000, default max_length {DEFAULT_MAX_LENGTH}, dead_end {}, empty_model {}",
		defaults.dead_end, defaults.empty_model
	);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.app_data(shared_model.clone())
			.configure(configure)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::{test, App};

	fn shared(corpus: &str, data_folder: &str) -> web::Data<RwLock<SharedData>> {
		web::Data::new(RwLock::new(SharedData {
			model: MarkovText::new(corpus),
			data_folder: PathBuf::from(data_folder),
		}))
	}

	#[actix_web::test]
	async fn generate_with_seed() {
		let app = test::init_service(App::new().app_data(shared("a b a c", DATA_FOLDER)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/generate?max_length=3&seed=custom:a").to_request();
		let body = test::call_and_read_body(&app, req).await;
		let text = String::from_utf8(body.to_vec()).unwrap();
		assert!(text == "a b a" || text == "a c", "unexpected '{text}'");
	}

	#[actix_web::test]
	async fn generate_reports_caller_errors() {
		let app = test::init_service(App::new().app_data(shared("a b a c", DATA_FOLDER)).configure(configure)).await;

		for uri in [
			"/v1/generate?max_length=0",
			"/v1/generate?seed=custom:zzz_never_seen",
			"/v1/generate?seed=bogus",
			"/v1/generate?dead_end=sometimes",
		] {
			let req = test::TestRequest::get().uri(uri).to_request();
			let resp = test::call_service(&app, req).await;
			assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
		}
	}

	#[actix_web::test]
	async fn empty_model_policies() {
		let app = test::init_service(App::new().app_data(shared("", DATA_FOLDER)).configure(configure)).await;

		let req = test::TestRequest::get().uri("/v1/generate").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/generate?empty_model=fail").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::CONFLICT);
	}

	#[actix_web::test]
	async fn table_is_served_as_json() {
		let app = test::init_service(App::new().app_data(shared("a b a c", DATA_FOLDER)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/table").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, r#"{"a":["b","c"],"b":["a"],"c":[]}"#.as_bytes());
	}

	#[actix_web::test]
	async fn load_and_list_corpora() {
		let dir = tempfile::tempdir().expect("create tempdir");
		std::fs::write(dir.path().join("alpha.txt"), "x y z").unwrap();
		std::fs::write(dir.path().join("beta.txt"), "w x").unwrap();
		std::fs::write(dir.path().join("my.txtfile.txt"), "m n").unwrap();
		std::fs::write(dir.path().join("notes.txt.txt"), "n o").unwrap();
		let folder = dir.path().to_str().unwrap();

		let app = test::init_service(App::new().app_data(shared("", folder)).configure(configure)).await;

		// only the final extension is stripped
		let req = test::TestRequest::get().uri("/v1/corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "alpha\nbeta\nmy.txtfile\nnotes.txt".as_bytes());

		let req = test::TestRequest::put().uri("/v1/load_corpora?names=my.txtfile,notes.txt").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/loaded_corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "my.txtfile\nnotes.txt".as_bytes());

		let req = test::TestRequest::put().uri("/v1/load_corpora?names=alpha,beta").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);

		let req = test::TestRequest::get().uri("/v1/loaded_corpora").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "alpha\nbeta".as_bytes());

		let req = test::TestRequest::get().uri("/v1/generate?seed=custom:z&max_length=2").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "z w".as_bytes());
	}

	#[actix_web::test]
	async fn load_rejects_names_outside_the_data_folder() {
		let root = tempfile::tempdir().expect("create tempdir");
		let data = root.path().join("data");
		std::fs::create_dir(&data).unwrap();
		std::fs::write(root.path().join("secret.txt"), "TOP SECRET").unwrap();
		std::fs::write(data.join("public.txt"), "a b").unwrap();

		let app = test::init_service(App::new().app_data(shared("", data.to_str().unwrap())).configure(configure)).await;

		for names in ["../secret", "..%2Fsecret", "public,../secret", "sub/public", "."] {
			let uri = format!("/v1/load_corpora?names={names}");
			let req = test::TestRequest::put().uri(&uri).to_request();
			let resp = test::call_service(&app, req).await;
			assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{names}");
		}

		// model left untouched
		let req = test::TestRequest::get().uri("/v1/table").to_request();
		let body = test::call_and_read_body(&app, req).await;
		assert_eq!(body, "{}".as_bytes());
	}

	#[actix_web::test]
	async fn load_missing_corpus_is_not_found() {
		let dir = tempfile::tempdir().expect("create tempdir");
		let app = test::init_service(App::new().app_data(shared("a b", dir.path().to_str().unwrap())).configure(configure)).await;

		let req = test::TestRequest::put().uri("/v1/load_corpora?names=missing").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::NOT_FOUND);
	}

	#[actix_web::test]
	async fn options_are_served_as_json() {
		let app = test::init_service(App::new().app_data(shared("a b", DATA_FOLDER)).configure(configure)).await;
		let req = test::TestRequest::get().uri("/v1/options").to_request();
		let options: serde_json::Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(
			options,
			serde_json::json!({
				"max_length": DEFAULT_MAX_LENGTH,
				"dead_end": "stop_early",
				"empty_model": "return_empty",
				"start": "random"
			})
		);
	}

	#[actix_web::test]
	async fn load_requires_names() {
		let app = test::init_service(App::new().app_data(shared("", DATA_FOLDER)).configure(configure)).await;
		let req = test::TestRequest::put().uri("/v1/load_corpora").to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}
}
