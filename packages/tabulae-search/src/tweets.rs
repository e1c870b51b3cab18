use serde_json::Value;

use tabulae_index::wire::Clause;

use crate::{
	Error, Page, RequestContext, Result, SearchPage, SearchService,
	query::{CREATED_AT, QueryBuilder},
	reconcile,
	records::Tweet,
	whitelist::{Dimension, Whitelist},
};

pub(crate) const USERNAME: &str = "data.Username";

impl SearchService {
	/// Recent tweets of one handle, newest first.
	pub async fn tweets_by_username(
		&self,
		username: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<Tweet>> {
		self.tweets_for(&[username], |handle| Clause::term(USERNAME, handle), ctx).await
	}

	/// Recent tweets across several handles, restricted to those handles.
	pub async fn tweets_by_usernames(
		&self,
		usernames: &[String],
		ctx: RequestContext,
	) -> Result<SearchPage<Tweet>> {
		self.tweets_for(usernames, |handle| Clause::matches(USERNAME, handle), ctx).await
	}

	/// Raw user document of a Twitter handle.
	pub async fn twitter_profile(&self, username: &str, ctx: RequestContext) -> Result<Value> {
		let target = &self.cfg.index.names.twitter_users;

		self.profile(target, username, "Twitter", ctx).await
	}

	async fn tweets_for<S, F>(
		&self,
		usernames: &[S],
		clause: F,
		ctx: RequestContext,
	) -> Result<SearchPage<Tweet>>
	where
		S: AsRef<str>,
		F: Fn(&str) -> Clause,
	{
		let whitelist = Whitelist::from_identities(Dimension::Twitter, usernames);

		if whitelist.is_empty() {
			return Ok(SearchPage::empty());
		}

		let body = whitelist
			.identities(Dimension::Twitter)
			.into_iter()
			.fold(QueryBuilder::new(ctx.page), |builder, handle| builder.should(clause(handle)))
			.newest_first(CREATED_AT)
			.adaptive_thresholds()
			.build();
		let hits = self.run_search(&self.cfg.index.names.tweets, &body, ctx.deadline).await?;

		Ok(SearchPage::new(reconcile::tweets(&hits.hits, &whitelist), hits.total))
	}

	/// First user document whose handle equals `username`.
	pub(crate) async fn profile(
		&self,
		target: &tabulae_config::IndexTarget,
		username: &str,
		network: &str,
		ctx: RequestContext,
	) -> Result<Value> {
		let username = username.trim().to_lowercase();

		if username.is_empty() {
			return Err(Error::InvalidRequest {
				message: format!("Contact does not have a {network} username."),
			});
		}

		let body = QueryBuilder::new(Page { offset: 0, limit: 1 })
			.must(Clause::term(USERNAME, username))
			.build();
		let hits = self.run_search(target, &body, ctx.deadline).await?;
		let Some(data) = hits.hits.into_iter().next().map(|hit| hit.source.data) else {
			return Err(Error::NotFound {
				message: format!("No {network} profile for this username."),
			});
		};

		Ok(data)
	}
}
