use tabulae_index::wire::Clause;

use crate::{
	RequestContext, Result, SearchPage, SearchService,
	headlines::FEED_URL,
	query::{CREATED_AT, QueryBuilder},
	reconcile,
	records::FeedItem,
	tweets::USERNAME,
	whitelist::{Contact, Dimension, Feed, Whitelist},
};

const INSTAGRAM_USERNAME: &str = "data.InstagramUsername";

impl SearchService {
	/// Combined headlines, tweets and Instagram posts of the given contacts and feeds.
	///
	/// Returns an empty page without touching the index when the caller owns no identity.
	pub async fn feed_for_contacts(
		&self,
		contacts: &[Contact],
		feeds: &[Feed],
		ctx: RequestContext,
	) -> Result<SearchPage<FeedItem>> {
		let whitelist = Whitelist::for_contacts(contacts, feeds);

		if whitelist.is_empty() {
			return Ok(SearchPage::empty());
		}

		let clauses = whitelist
			.identities(Dimension::Twitter)
			.into_iter()
			.map(|handle| Clause::term(USERNAME, handle))
			.chain(
				whitelist
					.identities(Dimension::Instagram)
					.into_iter()
					.map(|handle| Clause::term(INSTAGRAM_USERNAME, handle)),
			)
			.chain(
				whitelist
					.identities(Dimension::FeedUrl)
					.into_iter()
					.map(|url| Clause::matches(FEED_URL, url)),
			);
		let body = clauses
			.fold(QueryBuilder::new(ctx.page), QueryBuilder::should)
			.newest_first(CREATED_AT)
			.adaptive_thresholds()
			.build();
		let hits = self.run_search(&self.cfg.index.names.feeds, &body, ctx.deadline).await?;

		tracing::debug!(
			twitter = whitelist.len(Dimension::Twitter),
			instagram = whitelist.len(Dimension::Instagram),
			feeds = whitelist.len(Dimension::FeedUrl),
			total = hits.total,
			"Feed search completed."
		);

		Ok(SearchPage::new(reconcile::feed_items(&hits.hits, &whitelist), hits.total))
	}
}
