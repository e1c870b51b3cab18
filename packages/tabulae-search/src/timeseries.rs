//! Daily follower statistics, stored one document per handle and day.

use time::{Date, Duration, format_description::BorrowedFormatItem, macros::format_description};

use tabulae_config::IndexTarget;
use tabulae_index::wire::Clause;

use crate::{
	Error, Page, RequestContext, Result, SearchPage, SearchService,
	coerce::Record,
	normalize_handles,
	query::{CREATED_AT, QueryBuilder},
	reconcile,
	records::{InstagramTimeseries, TwitterTimeseries},
};

const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Document ids `<handle>-<YYYY-MM-DD>` for each handle and each of the `days` days ending on
/// `today`, newest day first.
pub fn synthetic_ids<S>(handles: &[S], today: Date, days: u32) -> Vec<String>
where
	S: AsRef<str>,
{
	let handles = normalize_handles(handles);
	let dates: Vec<String> = (0..days)
		.map_while(|offset| today.checked_sub(Duration::days(i64::from(offset))))
		.filter_map(|date| date.format(DAY_FORMAT).ok())
		.collect();

	handles
		.iter()
		.flat_map(|handle| dates.iter().map(move |date| format!("{handle}-{date}")))
		.collect()
}

impl SearchService {
	pub async fn twitter_timeseries_by_username(
		&self,
		username: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<TwitterTimeseries>> {
		self.timeseries_by_username(&self.cfg.index.names.twitter_timeseries, username, ctx).await
	}

	pub async fn instagram_timeseries_by_username(
		&self,
		username: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<InstagramTimeseries>> {
		self.timeseries_by_username(&self.cfg.index.names.instagram_timeseries, username, ctx)
			.await
	}

	pub async fn twitter_timeseries_by_usernames(
		&self,
		usernames: &[String],
		today: Date,
		days: u32,
		ctx: RequestContext,
	) -> Result<SearchPage<TwitterTimeseries>> {
		let target = &self.cfg.index.names.twitter_timeseries;

		self.timeseries_by_usernames(target, usernames, today, days, ctx).await
	}

	pub async fn instagram_timeseries_by_usernames(
		&self,
		usernames: &[String],
		today: Date,
		days: u32,
		ctx: RequestContext,
	) -> Result<SearchPage<InstagramTimeseries>> {
		let target = &self.cfg.index.names.instagram_timeseries;

		self.timeseries_by_usernames(target, usernames, today, days, ctx).await
	}

	/// Most recent daily points for one handle, capped at `search.timeseries_limit`.
	async fn timeseries_by_username<T>(
		&self,
		target: &IndexTarget,
		username: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<T>>
	where
		T: Record,
	{
		let username = username.trim().to_lowercase();

		if username.is_empty() {
			return Err(Error::InvalidRequest {
				message: "username must be non-empty.".to_string(),
			});
		}

		let page = Page { offset: 0, limit: self.cfg.search.timeseries_limit };
		let body = QueryBuilder::new(page)
			.must(Clause::term("data.Username", username))
			.newest_first(CREATED_AT)
			.build();
		let hits = self.run_search(target, &body, ctx.deadline).await?;
		let points = reconcile::reconcile::<T, _>(&hits.hits, |_| true);

		Ok(SearchPage::new(points, hits.total))
	}

	async fn timeseries_by_usernames<T>(
		&self,
		target: &IndexTarget,
		usernames: &[String],
		today: Date,
		days: u32,
		ctx: RequestContext,
	) -> Result<SearchPage<T>>
	where
		T: Record,
	{
		let ids = synthetic_ids(usernames, today, days);

		if ids.is_empty() {
			return Ok(SearchPage::empty());
		}

		let docs = self.index.mget(target, &ids, ctx.deadline).await.map_err(|err| {
			tracing::warn!(
				error = %err,
				index = %target.index,
				ids = ids.len(),
				"Index multi-get failed."
			);

			Error::from(err)
		})?;
		let points: Vec<T> = reconcile::found_documents(&docs);
		let total = points.len() as u64;

		Ok(SearchPage::new(points, total))
	}
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	#[test]
	fn ids_walk_back_from_today() {
		assert_eq!(synthetic_ids(&["acme"], date!(2024 - 01 - 03), 3), vec![
			"acme-2024-01-03",
			"acme-2024-01-02",
			"acme-2024-01-01",
		]);
	}

	#[test]
	fn ids_cross_month_boundaries_and_skip_blank_handles() {
		assert_eq!(synthetic_ids(&["AcmeNews", " ", "globex"], date!(2024 - 03 - 01), 2), vec![
			"acmenews-2024-03-01",
			"acmenews-2024-02-29",
			"globex-2024-03-01",
			"globex-2024-02-29",
		]);
	}

	#[test]
	fn repeated_handles_are_fetched_once() {
		let handles = ["acme", "ACME", " Acme ", "globex"];

		assert_eq!(synthetic_ids(&handles, date!(2024 - 01 - 03), 1), vec![
			"acme-2024-01-03",
			"globex-2024-01-03",
		]);
	}

	#[test]
	fn zero_days_yield_no_ids() {
		assert!(synthetic_ids(&["acme"], date!(2024 - 01 - 03), 0).is_empty());
	}
}
