//! Pass-through lookups against the enrichment service.

use tabulae_index::enhance::{EmailVerificationResponse, EnhanceResponse, MediaDatabaseProfile};

use crate::{Error, RequestContext, Result, SearchService};

impl SearchService {
	pub async fn verify_email(
		&self,
		email: &str,
		ctx: RequestContext,
	) -> Result<EmailVerificationResponse> {
		let email = required("email", email)?;

		self.enhance
			.verify_email(email, ctx.deadline)
			.await
			.map_err(|err| enhance_failed(err, "verify"))
	}

	/// Company profile for a website URL or bare domain.
	pub async fn company(&self, url: &str, ctx: RequestContext) -> Result<EnhanceResponse> {
		let domain = required("url", url)?;
		let domain = domain
			.trim_start_matches("https://")
			.trim_start_matches("http://")
			.trim_start_matches("www.")
			.trim_end_matches('/');

		self.enhance
			.company(domain, ctx.deadline)
			.await
			.map_err(|err| enhance_failed(err, "company"))
	}

	pub async fn contact_profile(
		&self,
		email: &str,
		ctx: RequestContext,
	) -> Result<EnhanceResponse> {
		let email = required("email", email)?;

		self.enhance
			.contact_profile(email, ctx.deadline)
			.await
			.map_err(|err| enhance_failed(err, "fullcontact"))
	}

	pub async fn contact_profile_verified(
		&self,
		email: &str,
		ctx: RequestContext,
	) -> Result<EnhanceResponse> {
		let email = required("email", email)?;

		self.enhance
			.contact_profile_verified(email, ctx.deadline)
			.await
			.map_err(|err| enhance_failed(err, "fullcontact2"))
	}

	pub async fn media_database_profile(
		&self,
		email: &str,
		ctx: RequestContext,
	) -> Result<MediaDatabaseProfile> {
		let email = required("email", email)?;

		self.enhance
			.media_database_profile(email, ctx.deadline)
			.await
			.map_err(|err| enhance_failed(err, "md"))
	}
}

fn required<'a>(label: &str, value: &'a str) -> Result<&'a str> {
	let value = value.trim();

	if value.is_empty() {
		return Err(Error::InvalidRequest { message: format!("{label} must be non-empty.") });
	}

	Ok(value)
}

fn enhance_failed(err: tabulae_index::Error, endpoint: &str) -> Error {
	tracing::warn!(error = %err, endpoint, "Enrichment lookup failed.");

	Error::enhance(err)
}
