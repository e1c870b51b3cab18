//! Media database, contacts database and publication directory lookups.

use serde::Serialize;
use serde_json::Value;

use tabulae_index::wire::{Hit, SearchBody};

use crate::{
	Error, RequestContext, Result, SearchPage, SearchService,
	criteria::{self, MediaDatabaseQuery},
	query::{MEDIA_DATABASE_CREATED, QueryBuilder},
	reconcile,
	records::Publication,
};

/// A contacts database entry; the document id is the contact's email address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseContact {
	pub email: String,
	pub data: Value,
}

impl SearchService {
	/// Media database contacts, most recently added first.
	pub async fn media_database(&self, ctx: RequestContext) -> Result<SearchPage<Value>> {
		let body = QueryBuilder::new(ctx.page).newest_first(MEDIA_DATABASE_CREATED).build();

		self.media_database_search(&body, ctx).await
	}

	/// Media database contacts matching included criteria and none of the excluded ones.
	pub async fn search_media_database(
		&self,
		query: &MediaDatabaseQuery,
		ctx: RequestContext,
	) -> Result<SearchPage<Value>> {
		let body = criteria::media_database_body(query, ctx.page);

		self.media_database_search(&body, ctx).await
	}

	pub async fn media_database_publications(
		&self,
		ctx: RequestContext,
	) -> Result<SearchPage<Publication>> {
		let body = QueryBuilder::new(ctx.page).build();
		let target = &self.cfg.index.names.media_database_publications;
		let hits = self.run_search(target, &body, ctx.deadline).await?;

		Ok(SearchPage::new(publications(&hits.hits, "media-publications"), hits.total))
	}

	pub async fn contacts_database(
		&self,
		ctx: RequestContext,
	) -> Result<SearchPage<DatabaseContact>> {
		let body = QueryBuilder::new(ctx.page).build();
		let target = &self.cfg.index.names.contacts_database;
		let hits = self.run_search(target, &body, ctx.deadline).await?;
		let contacts = hits
			.hits
			.into_iter()
			.map(|hit| DatabaseContact { email: hit.id, data: hit.source.data })
			.collect();

		Ok(SearchPage::new(contacts, hits.total))
	}

	/// Publications whose name matches `name` in the shared publication directory.
	pub async fn publications_by_name(
		&self,
		name: &str,
		ctx: RequestContext,
	) -> Result<SearchPage<Publication>> {
		let name = name.trim();

		if name.is_empty() {
			return Err(Error::InvalidRequest {
				message: "publication name must be non-empty.".to_string(),
			});
		}

		let target = &self.cfg.index.names.media_database_publications;
		let q = format!("data.organizationName:{name}");
		let hits = self.run_query_string(target, &q, ctx.page, ctx.deadline).await?;

		Ok(SearchPage::new(publications(&hits.hits, "publications"), hits.total))
	}

	/// Field mapping of the media database contacts index.
	pub async fn media_database_schema(&self, ctx: RequestContext) -> Result<Value> {
		let target = &self.cfg.index.names.media_database;

		self.index.mapping(target, ctx.deadline).await.map_err(|err| {
			tracing::warn!(error = %err, index = %target.index, "Index mapping lookup failed.");

			Error::from(err)
		})
	}

	async fn media_database_search(
		&self,
		body: &SearchBody,
		ctx: RequestContext,
	) -> Result<SearchPage<Value>> {
		let target = &self.cfg.index.names.media_database;
		let hits = self.run_search(target, body, ctx.deadline).await?;
		let contacts = hits.hits.into_iter().map(|hit| hit.source.data).collect();

		Ok(SearchPage::new(contacts, hits.total))
	}
}

fn publications(hits: &[Hit], kind: &str) -> Vec<Publication> {
	hits.iter()
		.filter_map(|hit| {
			let mut publication = reconcile::decode_hit::<Publication>(hit)?.record;

			publication.id = hit.id.clone();
			publication.kind = kind.to_string();

			Some(publication)
		})
		.collect()
}
