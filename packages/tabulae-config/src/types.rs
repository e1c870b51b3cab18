use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub index: Index,
	pub enhance: Enhance,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Index {
	pub base_url: String,
	/// Upper bound for a single call to the index when the caller supplies no deadline.
	pub timeout_ms: u64,
	#[serde(default)]
	pub names: IndexNames,
}

/// One searchable document set: an index plus the comma-separated document types in it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IndexTarget {
	pub index: String,
	pub types: String,
}
impl IndexTarget {
	pub fn new(index: &str, types: &str) -> Self {
		Self { index: index.to_string(), types: types.to_string() }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexNames {
	pub tweets: IndexTarget,
	pub twitter_users: IndexTarget,
	pub contacts_database: IndexTarget,
	pub location_countries: IndexTarget,
	pub location_states: IndexTarget,
	pub location_cities: IndexTarget,
	pub media_database: IndexTarget,
	pub media_database_publications: IndexTarget,
	pub headlines: IndexTarget,
	pub feeds: IndexTarget,
	pub instagram_posts: IndexTarget,
	pub instagram_users: IndexTarget,
	pub instagram_timeseries: IndexTarget,
	pub twitter_timeseries: IndexTarget,
}
impl IndexNames {
	pub fn targets(&self) -> [(&'static str, &IndexTarget); 14] {
		[
			("tweets", &self.tweets),
			("twitter_users", &self.twitter_users),
			("contacts_database", &self.contacts_database),
			("location_countries", &self.location_countries),
			("location_states", &self.location_states),
			("location_cities", &self.location_cities),
			("media_database", &self.media_database),
			("media_database_publications", &self.media_database_publications),
			("headlines", &self.headlines),
			("feeds", &self.feeds),
			("instagram_posts", &self.instagram_posts),
			("instagram_users", &self.instagram_users),
			("instagram_timeseries", &self.instagram_timeseries),
			("twitter_timeseries", &self.twitter_timeseries),
		]
	}
}
impl Default for IndexNames {
	fn default() -> Self {
		Self {
			tweets: IndexTarget::new("tweets", "tweet,md-tweet"),
			twitter_users: IndexTarget::new("tweets", "user"),
			contacts_database: IndexTarget::new("database", "contacts"),
			location_countries: IndexTarget::new("locations", "country"),
			location_states: IndexTarget::new("locations", "state"),
			location_cities: IndexTarget::new("locations", "city"),
			media_database: IndexTarget::new("md1", "contacts"),
			media_database_publications: IndexTarget::new("md1", "publications"),
			headlines: IndexTarget::new("headlines", "headline"),
			feeds: IndexTarget::new("feeds", "feed,md-feed"),
			instagram_posts: IndexTarget::new("instagrams", "instagram"),
			instagram_users: IndexTarget::new("instagrams", "user"),
			instagram_timeseries: IndexTarget::new("timeseries", "instagram"),
			twitter_timeseries: IndexTarget::new("timeseries", "twitter"),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Enhance {
	pub base_url: String,
	#[serde(default = "default_long_timeout_ms")]
	pub verify_timeout_ms: u64,
	#[serde(default = "default_long_timeout_ms")]
	pub company_timeout_ms: u64,
	#[serde(default = "default_short_timeout_ms")]
	pub profile_timeout_ms: u64,
	#[serde(default = "default_long_timeout_ms")]
	pub media_database_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub default_limit: u32,
	pub max_limit: u32,
	#[serde(default = "default_timeseries_limit")]
	pub timeseries_limit: u32,
}

fn default_long_timeout_ms() -> u64 {
	15_000
}

fn default_short_timeout_ms() -> u64 {
	8_000
}

fn default_timeseries_limit() -> u32 {
	31
}
