pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Search timed out: {message}")]
	Timeout { message: String },
	#[error("Search failed: {message}")]
	Index { message: String },
	#[error("Enrichment failed: {message}")]
	Enhance { message: String },
}
impl Error {
	pub(crate) fn enhance(err: tabulae_index::Error) -> Self {
		match err {
			tabulae_index::Error::Timeout { .. } => Self::Timeout { message: err.to_string() },
			other => Self::Enhance { message: other.to_string() },
		}
	}
}
impl From<tabulae_index::Error> for Error {
	fn from(err: tabulae_index::Error) -> Self {
		match err {
			tabulae_index::Error::Timeout { .. } => Self::Timeout { message: err.to_string() },
			other => Self::Index { message: other.to_string() },
		}
	}
}
