pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, suggestion: Option<String> },
	#[error("Search service is unavailable.")]
	SearchUnavailable,
	#[error("Search error: {message}")]
	Search { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), suggestion: None }
	}

	pub(crate) fn search(err: semhys_providers::Error) -> Self {
		Self::Search { message: err.to_string() }
	}
}
