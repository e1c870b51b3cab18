//! Turns raw hits into typed records and drops what the caller does not own.
//!
//! Every function here borrows its input and is free of side effects apart from logging.

use tabulae_index::wire::{Hit, MgetDoc};

use crate::{
	coerce::{self, Decoded, Record},
	records::{FeedItem, Headline, InstagramPost, Tweet},
	whitelist::{Dimension, Whitelist},
};

pub fn tweets(hits: &[Hit], whitelist: &Whitelist) -> Vec<Tweet> {
	reconcile(hits, |decoded: &Decoded<Tweet>| {
		identity_allowed(decoded, whitelist, Dimension::Twitter, "Username", |tweet| {
			&tweet.username
		})
	})
	.into_iter()
	.map(|mut tweet| {
		tweet.kind = "tweets".to_string();

		tweet
	})
	.collect()
}

pub fn instagram_posts(hits: &[Hit], whitelist: &Whitelist) -> Vec<InstagramPost> {
	reconcile(hits, |decoded: &Decoded<InstagramPost>| {
		identity_allowed(decoded, whitelist, Dimension::Instagram, "Username", |post| {
			&post.username
		})
	})
	.into_iter()
	.map(|mut post| {
		post.kind = "instagrams".to_string();

		post
	})
	.collect()
}

/// Headlines carrying a feed URL must come from an owned feed. `None` keeps every hit.
pub fn headlines(hits: &[Hit], whitelist: Option<&Whitelist>) -> Vec<Headline> {
	reconcile(hits, |decoded: &Decoded<Headline>| match whitelist {
		Some(whitelist) if !decoded.record.feed_url.is_empty() =>
			identity_allowed(decoded, whitelist, Dimension::FeedUrl, "FeedURL", |headline| {
				&headline.feed_url
			}),
		_ => true,
	})
	.into_iter()
	.map(|mut headline| {
		headline.kind = "headlines".to_string();

		headline
	})
	.collect()
}

/// Feed entries are checked against the dimension matching their content subtype.
pub fn feed_items(hits: &[Hit], whitelist: &Whitelist) -> Vec<FeedItem> {
	reconcile(hits, |decoded: &Decoded<FeedItem>| {
		let item = &decoded.record;

		if !item.feed_url.is_empty() {
			return identity_allowed(decoded, whitelist, Dimension::FeedUrl, "FeedURL", |item| {
				&item.feed_url
			});
		}

		match item.kind.as_str() {
			"tweets" =>
				identity_allowed(decoded, whitelist, Dimension::Twitter, "Username", |item| {
					&item.username
				}),
			"instagrams" => identity_allowed(
				decoded,
				whitelist,
				Dimension::Instagram,
				"InstagramUsername",
				|item| &item.instagram_username,
			),
			_ => false,
		}
	})
}

/// Decodes found multi-get documents in request order; missing ids are skipped.
pub fn found_documents<T>(docs: &[MgetDoc]) -> Vec<T>
where
	T: Record,
{
	docs.iter()
		.filter(|doc| doc.found)
		.filter_map(|doc| {
			let data = doc.data()?;
			let decoded = coerce::decode::<T>(data);

			log_warnings(&doc.id, &decoded);

			Some(decoded.record)
		})
		.collect()
}

/// Decodes every hit and keeps the ones `keep` accepts, preserving index order.
pub fn reconcile<T, F>(hits: &[Hit], keep: F) -> Vec<T>
where
	T: Record,
	F: Fn(&Decoded<T>) -> bool,
{
	hits.iter()
		.filter_map(|hit| {
			let decoded = decode_hit::<T>(hit)?;

			keep(&decoded).then_some(decoded.record)
		})
		.collect()
}

/// Decodes the `data` object of one hit, logging coercion warnings.
pub fn decode_hit<T>(hit: &Hit) -> Option<Decoded<T>>
where
	T: Record,
{
	let Some(data) = hit.data() else {
		tracing::debug!(id = %hit.id, "Skipping hit without a data object.");

		return None;
	};
	let decoded = coerce::decode::<T>(data);

	log_warnings(&hit.id, &decoded);

	Some(decoded)
}

fn identity_allowed<T, F>(
	decoded: &Decoded<T>,
	whitelist: &Whitelist,
	dimension: Dimension,
	field: &str,
	identity: F,
) -> bool
where
	F: Fn(&T) -> &String,
{
	// An unreadable identity cannot prove ownership.
	if decoded.has_warning_for(field) {
		return false;
	}

	whitelist.allows(dimension, identity(&decoded.record))
}

fn log_warnings<T>(id: &str, decoded: &Decoded<T>) {
	for warning in &decoded.warnings {
		tracing::debug!(
			id,
			field = %warning.field,
			message = %warning.message,
			"Field coercion failed."
		);
	}
}
