use serde_json::Value;

use tabulae_index::wire::Clause;

use crate::{
	RequestContext, Result, SearchPage, SearchService,
	query::{CREATED_AT, QueryBuilder},
	reconcile,
	records::InstagramPost,
	tweets::USERNAME,
	whitelist::{Dimension, Whitelist},
};

impl SearchService {
	/// Recent posts of one Instagram handle, newest first.
	pub async fn instagram_posts_by_username(
		&self,
		username: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<InstagramPost>> {
		let whitelist = Whitelist::from_identities(Dimension::Instagram, [username]);

		if whitelist.is_empty() {
			return Ok(SearchPage::empty());
		}

		let body = whitelist
			.identities(Dimension::Instagram)
			.into_iter()
			.fold(QueryBuilder::new(ctx.page), |builder, handle| {
				builder.should(Clause::term(USERNAME, handle))
			})
			.newest_first(CREATED_AT)
			.adaptive_thresholds()
			.build();
		let hits = self
			.run_search(&self.cfg.index.names.instagram_posts, &body, ctx.deadline)
			.await?;

		Ok(SearchPage::new(reconcile::instagram_posts(&hits.hits, &whitelist), hits.total))
	}

	pub async fn instagram_profile(&self, username: &str, ctx: RequestContext) -> Result<Value> {
		let target = &self.cfg.index.names.instagram_users;

		self.profile(target, username, "Instagram", ctx).await
	}
}
