use foia_domain::ValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {field}: {message}")]
	Validation { field: String, message: String },
	#[error("Data unavailable: {message}")]
	DataUnavailable { message: String },
	#[error("Timed out waiting for {operation}.")]
	Timeout { operation: String },
	#[error("Escaping failure: {message}")]
	Escaping { message: String },
	#[error("Storage failure: {message}")]
	Storage { message: String },
}
impl Error {
	/// Whether resubmitting the same request may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::DataUnavailable { .. } | Self::Timeout { .. })
	}
}
impl From<ValidationError> for Error {
	fn from(err: ValidationError) -> Self {
		Self::Validation { field: err.field, message: err.message }
	}
}

impl From<foia_storage::Error> for Error {
	fn from(err: foia_storage::Error) -> Self {
		match err {
			err if err.is_unreachable() => Self::DataUnavailable { message: err.to_string() },
			foia_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			foia_storage::Error::InvalidArgument(message) =>
				Self::Validation { field: "storage".to_string(), message },
		}
	}
}
