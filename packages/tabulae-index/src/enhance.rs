//! Client for the contact enrichment service (email verification, company and person
//! profiles).

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Deadline, Error, Result, client};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhanceResponse {
	#[serde(default)]
	pub data: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailVerificationResponse {
	#[serde(default)]
	pub data: EmailVerificationData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerificationData {
	#[serde(default)]
	pub status: i64,
	#[serde(default)]
	pub request_id: String,
	#[serde(default)]
	pub emails: Vec<EmailVerification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerification {
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub domain: String,
	#[serde(default)]
	pub corrected: bool,
	#[serde(default)]
	pub person: String,
	#[serde(default)]
	pub company: String,
	#[serde(default)]
	pub send_safely: bool,
	#[serde(default)]
	pub attributes: EmailAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAttributes {
	#[serde(default)]
	pub valid_syntax: bool,
	#[serde(default)]
	pub deliverable: bool,
	#[serde(default)]
	pub catchall: bool,
	#[serde(default)]
	pub risky: bool,
	#[serde(default)]
	pub disposable: bool,
}

/// Person profile as stored in the media database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaDatabaseProfile {
	#[serde(default)]
	pub data: MediaDatabaseProfileData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaDatabaseProfileData {
	#[serde(default)]
	pub status: i64,
	#[serde(flatten)]
	pub profile: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct EnhanceClient {
	client: Client,
	base_url: String,
	verify_timeout: Duration,
	company_timeout: Duration,
	profile_timeout: Duration,
	media_database_timeout: Duration,
}
impl EnhanceClient {
	pub fn new(cfg: &tabulae_config::Enhance) -> Result<Self> {
		let client = Client::builder().build()?;

		Ok(Self {
			client,
			base_url: cfg.base_url.trim_end_matches('/').to_string(),
			verify_timeout: Duration::from_millis(cfg.verify_timeout_ms),
			company_timeout: Duration::from_millis(cfg.company_timeout_ms),
			profile_timeout: Duration::from_millis(cfg.profile_timeout_ms),
			media_database_timeout: Duration::from_millis(cfg.media_database_timeout_ms),
		})
	}

	pub async fn verify_email(
		&self,
		email: &str,
		deadline: Deadline,
	) -> Result<EmailVerificationResponse> {
		self.get("verify", email, deadline, self.verify_timeout).await
	}

	pub async fn company(&self, domain: &str, deadline: Deadline) -> Result<EnhanceResponse> {
		self.get("company", domain, deadline, self.company_timeout).await
	}

	pub async fn contact_profile(
		&self,
		email: &str,
		deadline: Deadline,
	) -> Result<EnhanceResponse> {
		self.get("fullcontact", email, deadline, self.profile_timeout).await
	}

	/// Person profile together with the email verification verdict.
	pub async fn contact_profile_verified(
		&self,
		email: &str,
		deadline: Deadline,
	) -> Result<EnhanceResponse> {
		self.get("fullcontact2", email, deadline, self.profile_timeout).await
	}

	pub async fn media_database_profile(
		&self,
		email: &str,
		deadline: Deadline,
	) -> Result<MediaDatabaseProfile> {
		let profile: MediaDatabaseProfile =
			self.get("md", email, deadline, self.media_database_timeout).await?;

		if profile.data.status != 200 {
			return Err(Error::InvalidResponse {
				message: format!(
					"Media database profile lookup returned status {}.",
					profile.data.status
				),
			});
		}

		Ok(profile)
	}

	fn url(&self, endpoint: &str, key: &str) -> String {
		format!("{}/{endpoint}/{}", self.base_url, urlencoding::encode(key))
	}

	async fn get<T>(
		&self,
		endpoint: &str,
		key: &str,
		deadline: Deadline,
		call_timeout: Duration,
	) -> Result<T>
	where
		T: serde::de::DeserializeOwned,
	{
		let url = self.url(endpoint, key);
		let request = self.client.get(&url);

		client::send_json(request, &url, deadline, call_timeout).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escapes_lookup_keys() {
		let client = EnhanceClient::new(&tabulae_config::Enhance {
			base_url: "https://enhance.example.org".to_string(),
			verify_timeout_ms: 15_000,
			company_timeout_ms: 15_000,
			profile_timeout_ms: 8_000,
			media_database_timeout_ms: 15_000,
		})
		.expect("Failed to build client.");

		assert_eq!(
			client.url("verify", "jane+press@example.org"),
			"https://enhance.example.org/verify/jane%2Bpress%40example.org"
		);
	}

	#[test]
	fn parses_email_verification() {
		let parsed: EmailVerificationResponse = serde_json::from_value(serde_json::json!({
			"data": {
				"status": 200,
				"requestId": "r-1",
				"emails": [{
					"address": "jane@example.org",
					"sendSafely": true,
					"attributes": { "deliverable": true, "validSyntax": true }
				}]
			}
		}))
		.expect("parse failed");

		assert_eq!(parsed.data.request_id, "r-1");
		assert!(parsed.data.emails[0].send_safely);
		assert!(parsed.data.emails[0].attributes.deliverable);
		assert!(!parsed.data.emails[0].attributes.risky);
	}
}
