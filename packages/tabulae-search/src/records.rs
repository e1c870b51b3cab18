//! Typed views of index documents, decoded field by field through [`crate::coerce`].

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use crate::coerce::{self, Coerced, Record};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tweet {
	#[serde(rename = "type")]
	pub kind: String,
	pub text: String,
	#[serde(rename = "tweetid")]
	pub tweet_id: i64,
	#[serde(rename = "tweetidstr")]
	pub tweet_id_str: String,
	pub username: String,
	#[serde(rename = "createdat", with = "crate::rfc3339")]
	pub created_at: Option<OffsetDateTime>,
	pub likes: i64,
	pub retweets: i64,
	pub place: String,
	pub coordinates: String,
	pub retweeted: bool,
}
impl Record for Tweet {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Text" => self.text = coerce::string(value)?,
			"TweetId" => self.tweet_id = coerce::int64(value)?,
			"TweetIdStr" => self.tweet_id_str = coerce::string(value)?,
			"Username" => self.username = coerce::string(value)?,
			"CreatedAt" => self.created_at = coerce::timestamp(value)?,
			"Likes" => self.likes = coerce::int(value)?,
			"Retweets" => self.retweets = coerce::int(value)?,
			"Place" => self.place = coerce::string(value)?,
			"Coordinates" => self.coordinates = coerce::string(value)?,
			"Retweeted" => self.retweeted = coerce::boolean(value)?,
			// Producer-specific blobs with no stable shape.
			"TwitterId" | "Entities" => {},
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstagramPost {
	#[serde(rename = "type")]
	pub kind: String,
	pub video: String,
	pub tags: Vec<String>,
	pub location: String,
	pub coordinates: String,
	pub comments: i64,
	pub likes: i64,
	#[serde(rename = "instagramwidth")]
	pub instagram_width: i64,
	#[serde(rename = "instagramheight")]
	pub instagram_height: i64,
	pub link: String,
	pub image: String,
	pub caption: String,
	#[serde(rename = "instagramid")]
	pub instagram_id: String,
	#[serde(rename = "Username")]
	pub username: String,
	#[serde(rename = "IsDeleted")]
	pub is_deleted: bool,
	#[serde(rename = "createdat", with = "crate::rfc3339")]
	pub created_at: Option<OffsetDateTime>,
}
impl Record for InstagramPost {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Video" => self.video = coerce::string(value)?,
			"Tags" => self.tags = coerce::string_list(value)?,
			"Location" => self.location = coerce::string(value)?,
			"Coordinates" => self.coordinates = coerce::string(value)?,
			"Comments" => self.comments = coerce::int(value)?,
			"Likes" => self.likes = coerce::int(value)?,
			"InstagramWidth" => self.instagram_width = coerce::int(value)?,
			"InstagramHeight" => self.instagram_height = coerce::int(value)?,
			"Link" => self.link = coerce::string(value)?,
			"Image" => self.image = coerce::string(value)?,
			"Caption" => self.caption = coerce::string(value)?,
			"InstagramId" => self.instagram_id = coerce::string(value)?,
			"Username" => self.username = coerce::string(value)?,
			"IsDeleted" => self.is_deleted = coerce::boolean(value)?,
			"CreatedAt" => self.created_at = coerce::timestamp(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Headline {
	#[serde(rename = "type")]
	pub kind: String,
	pub title: String,
	pub author: String,
	pub url: String,
	pub categories: Vec<String>,
	#[serde(rename = "createdat", with = "crate::rfc3339")]
	pub publish_date: Option<OffsetDateTime>,
	pub summary: String,
	#[serde(rename = "feedurl")]
	pub feed_url: String,
	#[serde(rename = "publicationid")]
	pub publication_id: i64,
}
impl Record for Headline {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Title" => self.title = coerce::string(value)?,
			"Author" => self.author = coerce::string(value)?,
			"Url" => self.url = coerce::string(value)?,
			"Categories" => self.categories = coerce::string_list(value)?,
			"PublishDate" => self.publish_date = coerce::timestamp(value)?,
			"Summary" => self.summary = coerce::string(value)?,
			"FeedURL" => self.feed_url = coerce::string(value)?,
			"PublicationId" => self.publication_id = coerce::int64(value)?,
			_ => {},
		}

		Ok(())
	}
}

/// One entry of a contact's combined feed: a headline, a tweet, or an Instagram post.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedItem {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(rename = "createdat", with = "crate::rfc3339")]
	pub created_at: Option<OffsetDateTime>,

	pub title: String,
	pub author: String,
	pub url: String,
	pub summary: String,
	#[serde(rename = "feedurl")]
	pub feed_url: String,
	#[serde(rename = "publicationid")]
	pub publication_id: i64,

	pub text: String,
	#[serde(rename = "tweetid")]
	pub tweet_id: i64,
	#[serde(rename = "tweetidstr")]
	pub tweet_id_str: String,
	pub username: String,
	#[serde(rename = "twitterlikes")]
	pub twitter_likes: i64,
	#[serde(rename = "twitterretweets")]
	pub twitter_retweets: i64,

	#[serde(rename = "instagramusername")]
	pub instagram_username: String,
	#[serde(rename = "instagramid")]
	pub instagram_id: String,
	#[serde(rename = "instagramimage")]
	pub instagram_image: String,
	#[serde(rename = "instagramvideo")]
	pub instagram_video: String,
	#[serde(rename = "instagramlink")]
	pub instagram_link: String,
	#[serde(rename = "instagramlikes")]
	pub instagram_likes: i64,
	#[serde(rename = "instagramcomments")]
	pub instagram_comments: i64,
	#[serde(rename = "instagramwidth")]
	pub instagram_width: i64,
	#[serde(rename = "instagramheight")]
	pub instagram_height: i64,
}
impl Record for FeedItem {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			// Stored singular and capitalized ("Tweet"); exposed as the plural content type.
			"Type" => {
				let kind = coerce::string(value)?;

				self.kind =
					if kind.is_empty() { kind } else { format!("{}s", kind.to_lowercase()) };
			},
			"CreatedAt" => self.created_at = coerce::timestamp(value)?,
			"Title" => self.title = coerce::string(value)?,
			"Author" => self.author = coerce::string(value)?,
			"Url" => self.url = coerce::string(value)?,
			"Summary" => self.summary = coerce::string(value)?,
			"FeedURL" => self.feed_url = coerce::string(value)?,
			"PublicationId" => self.publication_id = coerce::int64(value)?,
			"Text" => self.text = coerce::string(value)?,
			"TweetId" => self.tweet_id = coerce::int64(value)?,
			"TweetIdStr" => self.tweet_id_str = coerce::string(value)?,
			"Username" => self.username = coerce::string(value)?,
			"TwitterLikes" => self.twitter_likes = coerce::int(value)?,
			"TwitterRetweets" => self.twitter_retweets = coerce::int(value)?,
			"InstagramUsername" => self.instagram_username = coerce::string(value)?,
			"InstagramId" => self.instagram_id = coerce::string(value)?,
			"InstagramImage" => self.instagram_image = coerce::string(value)?,
			"InstagramVideo" => self.instagram_video = coerce::string(value)?,
			"InstagramLink" => self.instagram_link = coerce::string(value)?,
			"InstagramLikes" => self.instagram_likes = coerce::int(value)?,
			"InstagramComments" => self.instagram_comments = coerce::int(value)?,
			"InstagramWidth" => self.instagram_width = coerce::int(value)?,
			"InstagramHeight" => self.instagram_height = coerce::int(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TwitterTimeseries {
	pub username: String,
	#[serde(with = "crate::rfc3339")]
	pub created_at: Option<OffsetDateTime>,
	pub followers: i64,
	pub following: i64,
	pub likes: i64,
	pub retweets: i64,
	pub posts: i64,
}
impl Record for TwitterTimeseries {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Username" => self.username = coerce::string(value)?,
			"CreatedAt" => self.created_at = coerce::timestamp(value)?,
			"Followers" => self.followers = coerce::int(value)?,
			"Following" => self.following = coerce::int(value)?,
			"Likes" => self.likes = coerce::int(value)?,
			"Retweets" => self.retweets = coerce::int(value)?,
			"Posts" => self.posts = coerce::int(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstagramTimeseries {
	pub username: String,
	#[serde(with = "crate::rfc3339")]
	pub created_at: Option<OffsetDateTime>,
	pub followers: i64,
	pub following: i64,
	pub likes: i64,
	pub comments: i64,
	pub posts: i64,
}
impl Record for InstagramTimeseries {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Username" => self.username = coerce::string(value)?,
			"CreatedAt" => self.created_at = coerce::timestamp(value)?,
			"Followers" => self.followers = coerce::int(value)?,
			"Following" => self.following = coerce::int(value)?,
			"Likes" => self.likes = coerce::int(value)?,
			"Comments" => self.comments = coerce::int(value)?,
			"Posts" => self.posts = coerce::int(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCountry {
	pub id: String,
	pub country_name: String,
}
impl Record for LocationCountry {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Id" => self.id = coerce::string(value)?,
			"CountryName" => self.country_name = coerce::string(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationState {
	pub id: String,
	#[serde(rename = "countryName")]
	pub country_name: String,
	#[serde(rename = "stateName")]
	pub state_name: String,
}
impl Record for LocationState {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Id" => self.id = coerce::string(value)?,
			"FixedCountryName" => self.country_name = coerce::string(value)?,
			"StateName" => self.state_name = coerce::string(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationCity {
	pub id: String,
	#[serde(rename = "countryName")]
	pub country_name: String,
	#[serde(rename = "stateName")]
	pub state_name: String,
	#[serde(rename = "cityName")]
	pub city_name: String,
}
impl Record for LocationCity {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Id" => self.id = coerce::string(value)?,
			"FixedCountryName" => self.country_name = coerce::string(value)?,
			"FixedStateName" => self.state_name = coerce::string(value)?,
			"CityName" => self.city_name = coerce::string(value)?,
			_ => {},
		}

		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Publication {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub name: String,
	pub url: String,
	#[serde(with = "crate::rfc3339")]
	pub created: Option<OffsetDateTime>,
	#[serde(with = "crate::rfc3339")]
	pub updated: Option<OffsetDateTime>,
}
impl Record for Publication {
	fn assign(&mut self, key: &str, value: &Value) -> Coerced<()> {
		match key {
			"Name" | "OrganizationName" => self.name = coerce::string(value)?,
			"Url" => self.url = coerce::string(value)?,
			"Created" => self.created = coerce::timestamp(value)?,
			"Updated" => self.updated = coerce::timestamp(value)?,
			// Rich per-document settings that are passed through elsewhere.
			"CustomFields" => {},
			_ => {},
		}

		Ok(())
	}
}
