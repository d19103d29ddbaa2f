use axum::{
	Json, Router,
	extract::{
		Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use foia_domain::{EntityCategory, FilterInput, ValidationError};
use foia_service::{
	Error as ServiceError, ExplainResponse, LookupOptions, SearchResponse, VolumeResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/lookups", get(lookups))
		.route("/v1/lookups/entities", get(entity_lookups))
		.route("/v1/lookups/topics", get(topic_lookups))
		.route("/v1/emails/search", post(search))
		.route("/v1/emails/explain", post(explain))
		.route("/v1/emails/volume", get(volume))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct EntityLookupQuery {
	category: Option<String>,
}

#[derive(Debug, Serialize)]
struct LabelsResponse {
	#[serde(skip_serializing_if = "Option::is_none")]
	category: Option<EntityCategory>,
	labels: Vec<String>,
}

async fn lookups(State(state): State<AppState>) -> Result<Json<LookupOptions>, ApiError> {
	let response = state.service.all_options().await?;

	Ok(Json(response))
}

async fn entity_lookups(
	State(state): State<AppState>,
	query: Result<Query<EntityLookupQuery>, QueryRejection>,
) -> Result<Json<LabelsResponse>, ApiError> {
	let Query(query) = query?;
	let category = query
		.category
		.ok_or_else(|| ValidationError::new("category", "a category must be given."))?
		.parse::<EntityCategory>()?;
	let labels = state.service.entity_options(category).await?;

	Ok(Json(LabelsResponse { category: Some(category), labels }))
}

async fn topic_lookups(State(state): State<AppState>) -> Result<Json<LabelsResponse>, ApiError> {
	let labels = state.service.topic_options().await?;

	Ok(Json(LabelsResponse { category: None, labels }))
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(filter_input(payload)?).await?;

	tracing::debug!(count = response.count, explanation = %response.explanation, "Search served.");

	Ok(Json(response))
}

async fn explain(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
	let response = state.service.explain(&filter_input(payload)?)?;

	Ok(Json(response))
}

/// Decodes a filter form, naming the first field that does not decode.
fn filter_input(payload: Result<Json<Value>, JsonRejection>) -> Result<FilterInput, ApiError> {
	let Json(value) = payload?;

	serde_json::from_value::<FilterInput>(value.clone()).map_err(|err| {
		let field = undecodable_field(&value).unwrap_or_else(|| "body".to_string());

		ValidationError::new(field, err.to_string()).into()
	})
}

fn undecodable_field(value: &Value) -> Option<String> {
	value
		.as_object()?
		.iter()
		.find(|(key, field)| {
			let single = Map::from_iter([((*key).clone(), (*field).clone())]);

			serde_json::from_value::<FilterInput>(Value::Object(single)).is_err()
		})
		.map(|(key, _)| key.clone())
}

async fn volume(State(state): State<AppState>) -> Result<Json<VolumeResponse>, ApiError> {
	let response = state.service.daily_volume().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		if err.is_retryable() {
			tracing::warn!(error = %err, "Request failed; the corpus may recover.");
		} else {
			tracing::warn!(error = %err, "Request failed.");
		}

		match err {
			ServiceError::Validation { field, message } => json_error(
				StatusCode::BAD_REQUEST,
				"invalid_request",
				format!("{field}: {message}"),
				Some(vec![field]),
			),
			ServiceError::DataUnavailable { message } => json_error(
				StatusCode::SERVICE_UNAVAILABLE,
				"data_unavailable",
				format!("The email corpus is unavailable: {message}"),
				None,
			),
			ServiceError::Timeout { operation } => json_error(
				StatusCode::GATEWAY_TIMEOUT,
				"timeout",
				format!("Timed out waiting for {operation}."),
				None,
			),
			ServiceError::Escaping { message } | ServiceError::Storage { message } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message, None),
		}
	}
}

impl From<ValidationError> for ApiError {
	fn from(err: ValidationError) -> Self {
		ServiceError::from(err).into()
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		tracing::warn!(error = %rejection.body_text(), "Rejected request body.");

		json_error(rejection.status(), "invalid_request", rejection.body_text(), None)
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		tracing::warn!(error = %rejection.body_text(), "Rejected query string.");

		json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			rejection.body_text(),
			Some(vec!["category".to_string()]),
		)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
