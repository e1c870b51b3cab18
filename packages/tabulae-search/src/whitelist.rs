//! Per-request ownership sets: the handles and feed URLs the caller may see content for.

use ahash::AHashSet;
use serde::Deserialize;

/// Social handles of one contact the caller owns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
	#[serde(default)]
	pub twitter: String,
	#[serde(default)]
	pub instagram: String,
}

/// A feed subscription the caller owns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
	#[serde(default, alias = "feedurl")]
	pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
	Twitter,
	Instagram,
	FeedUrl,
}

/// Lower-cased identifier sets. Blank identifiers are never admitted.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
	twitter: AHashSet<String>,
	instagram: AHashSet<String>,
	feed_urls: AHashSet<String>,
}
impl Whitelist {
	pub fn for_contacts(contacts: &[Contact], feeds: &[Feed]) -> Self {
		let mut whitelist = Self::default();

		for contact in contacts {
			whitelist.insert(Dimension::Twitter, &contact.twitter);
			whitelist.insert(Dimension::Instagram, &contact.instagram);
		}
		for feed in feeds {
			whitelist.insert(Dimension::FeedUrl, &feed.url);
		}

		whitelist
	}

	pub fn from_identities<I, S>(dimension: Dimension, identities: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut whitelist = Self::default();

		for identity in identities {
			whitelist.insert(dimension, identity.as_ref());
		}

		whitelist
	}

	pub fn insert(&mut self, dimension: Dimension, identity: &str) {
		let identity = identity.trim();

		if identity.is_empty() {
			return;
		}

		self.set_mut(dimension).insert(identity.to_lowercase());
	}

	pub fn allows(&self, dimension: Dimension, identity: &str) -> bool {
		let identity = identity.trim();

		!identity.is_empty() && self.set(dimension).contains(&identity.to_lowercase())
	}

	pub fn len(&self, dimension: Dimension) -> usize {
		self.set(dimension).len()
	}

	pub fn is_empty(&self) -> bool {
		self.twitter.is_empty() && self.instagram.is_empty() && self.feed_urls.is_empty()
	}

	/// Identities of one dimension in a stable order, for building queries.
	pub fn identities(&self, dimension: Dimension) -> Vec<&str> {
		let mut identities: Vec<&str> = self.set(dimension).iter().map(String::as_str).collect();

		identities.sort_unstable();

		identities
	}

	fn set(&self, dimension: Dimension) -> &AHashSet<String> {
		match dimension {
			Dimension::Twitter => &self.twitter,
			Dimension::Instagram => &self.instagram,
			Dimension::FeedUrl => &self.feed_urls,
		}
	}

	fn set_mut(&mut self, dimension: Dimension) -> &mut AHashSet<String> {
		match dimension {
			Dimension::Twitter => &mut self.twitter,
			Dimension::Instagram => &mut self.instagram,
			Dimension::FeedUrl => &mut self.feed_urls,
		}
	}
}
