use tabulae_index::wire::Clause;

use crate::{
	RequestContext, Result, SearchPage, SearchService,
	query::{PUBLISH_DATE, QueryBuilder},
	reconcile,
	records::Headline,
	whitelist::{Dimension, Feed, Whitelist},
};

pub(crate) const FEED_URL: &str = "data.FeedURL";

impl SearchService {
	/// Headlines published on the given feeds.
	pub async fn headlines_by_resource(
		&self,
		feeds: &[Feed],
		ctx: RequestContext,
	) -> Result<SearchPage<Headline>> {
		let whitelist = Whitelist::for_contacts(&[], feeds);

		if whitelist.is_empty() {
			return Ok(SearchPage::empty());
		}

		let body = whitelist
			.identities(Dimension::FeedUrl)
			.into_iter()
			.fold(QueryBuilder::new(ctx.page), |builder, url| {
				builder.should(Clause::matches(FEED_URL, url))
			})
			.newest_first(PUBLISH_DATE)
			.adaptive_thresholds()
			.build();
		let hits = self.run_search(&self.cfg.index.names.headlines, &body, ctx.deadline).await?;

		Ok(SearchPage::new(reconcile::headlines(&hits.hits, Some(&whitelist)), hits.total))
	}

	/// Every headline of one publication. Publications are public, so nothing is filtered.
	pub async fn headlines_by_publication(
		&self,
		publication_id: i64,
		ctx: RequestContext,
	) -> Result<SearchPage<Headline>> {
		if publication_id <= 0 {
			return Ok(SearchPage::empty());
		}

		let body = QueryBuilder::new(ctx.page)
			.must(Clause::term("data.PublicationId", publication_id))
			.newest_first(PUBLISH_DATE)
			.build();
		let hits = self.run_search(&self.cfg.index.names.headlines, &body, ctx.deadline).await?;

		Ok(SearchPage::new(reconcile::headlines(&hits.hits, None), hits.total))
	}
}
