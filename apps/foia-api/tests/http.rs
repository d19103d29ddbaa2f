use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use time::{Date, macros::datetime};
use tower::util::ServiceExt;

use foia_api::{routes, state::AppState};
use foia_config::{Config, Corpus, Postgres, Search, Service, Storage};
use foia_domain::EntityCategory;
use foia_service::{BoxFuture, CompiledQuery, CorpusStore, ExplorerService};
use foia_storage::models::{DailyVolume, EmailRow};

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			postgres: Postgres { dsn: "postgres://localhost/foia".to_string(), pool_max_conns: 1 },
		},
		corpus: Corpus::default(),
		search: Search::default(),
	}
}

struct StubStore {
	failure: Option<fn() -> sqlx::Error>,
}
impl StubStore {
	fn answer<'a, T>(&'a self, value: T) -> BoxFuture<'a, foia_storage::Result<T>>
	where
		T: Send + 'a,
	{
		let failure = self.failure;

		Box::pin(async move {
			if let Some(failure) = failure {
				return Err(foia_storage::Error::Sqlx(failure()));
			}

			Ok(value)
		})
	}
}
impl CorpusStore for StubStore {
	fn entity_labels<'a>(
		&'a self,
		category: EntityCategory,
		_max_entity_id: i32,
	) -> BoxFuture<'a, foia_storage::Result<Vec<String>>> {
		let labels = match category {
			EntityCategory::Person => vec!["Anthony Fauci".to_string()],
			EntityCategory::Org => vec!["CDC".to_string(), "NIH".to_string()],
			EntityCategory::Location => vec!["Wuhan".to_string()],
		};

		self.answer(labels)
	}

	fn topic_labels<'a>(&'a self) -> BoxFuture<'a, foia_storage::Result<Vec<String>>> {
		self.answer(vec!["vaccine".to_string()])
	}

	fn search<'a>(
		&'a self,
		_query: &'a CompiledQuery,
	) -> BoxFuture<'a, foia_storage::Result<Vec<EmailRow>>> {
		self.answer(vec![EmailRow {
			email_id: 7,
			pg_number: 70,
			sent: datetime!(2020-02-14 16:45),
			subject: Some("RE: masks".to_string()),
			from_email: Some("fauci@niaid.nih.gov".to_string()),
			to_emails: Some("press@hhs.gov".to_string()),
			top_topic: Some("vaccine".to_string()),
			entities: Some(vec!["CDC".to_string()]),
		}])
	}

	fn daily_volume<'a>(
		&'a self,
		_file_id: i32,
		since: Date,
	) -> BoxFuture<'a, foia_storage::Result<Vec<DailyVolume>>> {
		self.answer(vec![DailyVolume { date: since, emails: 12 }])
	}
}

fn app_with(failure: Option<fn() -> sqlx::Error>) -> Router {
	let service = ExplorerService::with_store(test_config(), Arc::new(StubStore { failure }));

	routes::router(AppState::from_service(service))
}

fn app(down: bool) -> Router {
	let unreachable: fn() -> sqlx::Error = || sqlx::Error::PoolTimedOut;

	app_with(down.then_some(unreachable))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
	let response = app.oneshot(request).await.expect("Failed to call the router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).expect("Failed to parse response.")
	};

	(status, json)
}

fn get(uri: &str) -> Request<Body> {
	Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request.")
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let (status, _) = call(app(false), get("/health")).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lookups_list_every_bucket() {
	let (status, json) = call(app(false), get("/v1/lookups")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["entities"].as_array().map(Vec::len), Some(4));
	assert_eq!(json["entities"][1]["label"], "CDC");
	assert_eq!(json["entities"][1]["category"], "org");
	assert_eq!(json["topics"][0], "vaccine");
}

#[tokio::test]
async fn entity_lookup_by_category() {
	let (status, json) = call(app(false), get("/v1/lookups/entities?category=organizations")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["category"], "org");
	assert_eq!(json["labels"], serde_json::json!(["CDC", "NIH"]));

	let (status, json) = call(app(false), get("/v1/lookups/entities?category=planet")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
	assert_eq!(json["fields"][0], "category");
}

#[tokio::test]
async fn topic_lookup() {
	let (status, json) = call(app(false), get("/v1/lookups/topics")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["labels"], serde_json::json!(["vaccine"]));
	assert!(json.get("category").is_none());
}

#[tokio::test]
async fn search_returns_rows_and_summary() {
	let payload = serde_json::json!({ "orgs": ["CDC"], "start_date": "2020-02-01" });
	let (status, json) = call(app(false), post_json("/v1/emails/search", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["count"], 1);
	assert_eq!(json["summary"], "1 emails between 2020-02-01 and 2020-05-06 and email references CDC");
	assert_eq!(json["items"][0]["from"], "fauci@niaid.nih.gov");
	assert_eq!(json["items"][0]["to"], "press@hhs.gov");
	assert_eq!(json["items"][0]["sent"], "2020-02-14 16:45:00");
}

#[tokio::test]
async fn inverted_dates_are_rejected() {
	let payload = serde_json::json!({ "start_date": "2020-05-01", "end_date": "2020-04-01" });
	let (status, json) = call(app(false), post_json("/v1/emails/search", payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
	assert_eq!(json["fields"][0], "date_range");
}

#[tokio::test]
async fn undecodable_date_names_its_field() {
	let payload = serde_json::json!({ "persons": ["CDC"], "start_date": "2020-13-01" });
	let (status, json) = call(app(false), post_json("/v1/emails/search", payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
	assert_eq!(json["fields"][0], "start_date");

	let payload = serde_json::json!({ "topics": "vaccine" });
	let (status, json) = call(app(false), post_json("/v1/emails/explain", payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["fields"][0], "topics");
}

#[tokio::test]
async fn null_full_text_is_empty() {
	let payload = serde_json::json!({ "full_text": null, "orgs": null });
	let (status, json) = call(app(false), post_json("/v1/emails/search", payload)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["explanation"], "between 2020-01-23 and 2020-05-06");
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
	let request = Request::builder()
		.method("POST")
		.uri("/v1/emails/search")
		.header("content-type", "application/json")
		.body(Body::from("{\"persons\": ["))
		.expect("Failed to build request.");
	let (status, json) = call(app(false), request).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn missing_category_is_rejected() {
	let (status, json) = call(app(false), get("/v1/lookups/entities")).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
	assert_eq!(json["fields"][0], "category");
}

#[tokio::test]
async fn undecodable_rows_are_500() {
	let failure: fn() -> sqlx::Error = || sqlx::Error::ColumnDecode {
		index: "\"entities\"".to_string(),
		source: "unexpected null".into(),
	};
	let (status, json) =
		call(app_with(Some(failure)), post_json("/v1/emails/search", serde_json::json!({}))).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json["error_code"], "internal_error");
}

#[tokio::test]
async fn explain_shows_placeholders_only() {
	let payload = serde_json::json!({ "persons": ["O'Brien"], "full_text": "masks OR -gloves" });
	let (status, json) = call(app(false), post_json("/v1/emails/explain", payload)).await;

	assert_eq!(status, StatusCode::OK);

	let statement = json["statement"].as_str().expect("statement is a string");

	assert!(statement.contains("websearch_to_tsquery('english', $4::text)"));
	assert!(!statement.contains("O'Brien"));
	assert_eq!(json["fragments"][1], "email references O'Brien");
	assert_eq!(json["predicate_clauses"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unavailable_corpus_is_503() {
	let (status, json) = call(app(true), post_json("/v1/emails/search", serde_json::json!({}))).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(json["error_code"], "data_unavailable");

	let (status, _) = call(app(true), get("/v1/lookups/topics")).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn volume_lists_daily_counts() {
	let (status, json) = call(app(false), get("/v1/emails/volume")).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["items"][0]["date"], "2020-01-01");
	assert_eq!(json["items"][0]["emails"], 12);
}
