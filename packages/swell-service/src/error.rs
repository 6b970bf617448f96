pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid {field}: {message}")]
	InvalidField { field: &'static str, message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<swell_storage::Error> for Error {
	fn from(err: swell_storage::Error) -> Self {
		match err {
			swell_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			swell_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			swell_storage::Error::NotFound(message) => Self::NotFound { message },
			swell_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<swell_domain::SelectionError> for Error {
	fn from(err: swell_domain::SelectionError) -> Self {
		Self::InvalidField { field: err.field(), message: err.to_string() }
	}
}

impl From<swell_domain::PageError> for Error {
	fn from(err: swell_domain::PageError) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
