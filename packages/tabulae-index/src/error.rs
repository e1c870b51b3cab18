pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error("Request to {url} exceeded its deadline.")]
	Timeout { url: String },
	#[error("Request to {url} failed with status {status}.")]
	Status { status: u16, url: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
