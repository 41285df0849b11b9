use axum::{
	Json,
	body::Bytes,
	extract::{Path, State},
	http::{HeaderMap, StatusCode, header},
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
	update,
};
use petshop_api_model::adoption::{
	AdoptionConfigInfo, ApiAdoptionInfo, ApiStoryInfo, StoryConfigInfo,
};
use petshop_backend_model::{
	adoption::{AdoptionListingRef, SqlAdoptionStatus},
	db::schema::{self, adoption_listing::dsl as al, adoption_story::dsl as st},
};
use petshop_backend_service::{
	BackendServices, database::SqlConnRef, sql_now, storage::StorageError,
};
use tracing::warn;

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::adoption_listing)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SqlApiAdoptionInfo {
	id: i64,
	pet_name: String,
	species: String,
	breed: Option<i64>,
	age_months: Option<i32>,
	description: Option<String>,
	photo_key: Option<String>,
	status: i16,
	created_at: time::PrimitiveDateTime,
}

impl From<SqlApiAdoptionInfo> for ApiAdoptionInfo {
	fn from(row: SqlApiAdoptionInfo) -> Self {
		ApiAdoptionInfo {
			id: row.id,
			pet_name: row.pet_name,
			species: row.species,
			breed: row.breed,
			age_months: row.age_months,
			description: row.description,
			photo: row.photo_key,
			status: SqlAdoptionStatus::from(row.status).into(),
			created_at: row.created_at,
		}
	}
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::adoption_story)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SqlApiStoryInfo {
	id: i64,
	listing: i64,
	title: String,
	body: String,
	published_at: time::PrimitiveDateTime,
}

impl From<SqlApiStoryInfo> for ApiStoryInfo {
	fn from(row: SqlApiStoryInfo) -> Self {
		ApiStoryInfo {
			id: row.id,
			listing: row.listing,
			title: row.title,
			body: row.body,
			published_at: row.published_at,
		}
	}
}

async fn listing_info(
	db: &mut SqlConnRef,
	id: AdoptionListingRef,
) -> ApiResult<Json<ApiAdoptionInfo>> {
	let row: SqlApiAdoptionInfo = db
		.load_one_select(al::adoption_listing.filter(al::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into()))
}

pub async fn list_adoptions(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiAdoptionInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiAdoptionInfo> = db.load_select(al::adoption_listing).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_adoption(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AdoptionListingRef>,
) -> ApiResult<Json<ApiAdoptionInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiAdoptionInfo> = db
		.load_one_select(al::adoption_listing.filter(al::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "listing not found")?;
	Ok(Json(row.into()))
}

pub async fn new_adoption(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<AdoptionConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiAdoptionInfo>)> {
	let mut db = backend.database.get().await?;
	let id: AdoptionListingRef = db
		.get_result(
			insert_into(al::adoption_listing)
				.values((
					al::pet_name.eq(&info.pet_name),
					al::species.eq(&info.species),
					al::breed.eq(info.breed),
					al::age_months.eq(info.age_months),
					al::description.eq(info.description.as_deref()),
					al::status.eq(SqlAdoptionStatus::from(info.status) as i16),
					al::created_at.eq(sql_now()),
				))
				.returning(al::id),
		)
		.await?;

	Ok((StatusCode::CREATED, listing_info(&mut db, id).await?))
}

pub async fn update_adoption(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AdoptionListingRef>,
	Json(info): Json<AdoptionConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiAdoptionInfo>)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(update(al::adoption_listing.filter(al::id.eq(id))).set((
			al::pet_name.eq(&info.pet_name),
			al::species.eq(&info.species),
			al::breed.eq(info.breed),
			al::age_months.eq(info.age_months),
			al::description.eq(info.description.as_deref()),
			al::status.eq(SqlAdoptionStatus::from(info.status) as i16),
		)))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "listing not found"));
	}

	Ok((StatusCode::ACCEPTED, listing_info(&mut db, id).await?))
}

pub async fn delete_adoption(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AdoptionListingRef>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let photo: Option<Option<String>> = db
		.get_result(
			al::adoption_listing
				.filter(al::id.eq(id))
				.select(al::photo_key)
				.limit(1),
		)
		.await
		.optional()?;
	let photo = photo.or_api_error(StatusCode::NOT_FOUND, "listing not found")?;

	db.execute(delete(st::adoption_story.filter(st::listing.eq(id))))
		.await?;
	db.execute(delete(al::adoption_listing.filter(al::id.eq(id))))
		.await?;
	drop(db);

	if let Some(key) = photo {
		if let Err(err) = backend.storage.delete(&key).await {
			warn!(key, %err, "failed to remove photo of deleted listing");
		}
	}
	Ok((StatusCode::ACCEPTED, "listing deleted"))
}

/// Accepts a raw image body and stores it as the listing photo,
/// replacing any previous one.
pub async fn put_adoption_photo(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AdoptionListingRef>,
	headers: HeaderMap,
	body: Bytes,
) -> ApiResult<(StatusCode, Json<ApiAdoptionInfo>)> {
	let ext = match headers
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
	{
		Some("image/jpeg") => "jpg",
		Some("image/png") => "png",
		Some("image/webp") => "webp",
		_ => {
			return Err(ApiError::CustomRef(
				StatusCode::UNSUPPORTED_MEDIA_TYPE,
				"photo must be JPEG, PNG or WebP",
			));
		}
	};

	let mut db = backend.database.get().await?;
	let previous: Option<Option<String>> = db
		.get_result(
			al::adoption_listing
				.filter(al::id.eq(id))
				.select(al::photo_key)
				.limit(1),
		)
		.await
		.optional()?;
	let previous = previous.or_api_error(StatusCode::NOT_FOUND, "listing not found")?;

	let key = backend.storage.put("adoption", ext, &body).await?;
	db.execute(
		update(al::adoption_listing.filter(al::id.eq(id))).set(al::photo_key.eq(&key)),
	)
	.await?;

	if let Some(previous) = previous {
		match backend.storage.delete(&previous).await {
			Ok(()) | Err(StorageError::NotFound(_)) => {}
			Err(err) => warn!(key = previous, %err, "failed to remove replaced photo"),
		}
	}

	Ok((StatusCode::ACCEPTED, listing_info(&mut db, id).await?))
}

pub async fn list_stories(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiStoryInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiStoryInfo> = db.load_select(st::adoption_story).await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn new_story(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<StoryConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiStoryInfo>)> {
	let mut db = backend.database.get().await?;
	let listing: Option<i64> = db
		.get_result(
			al::adoption_listing
				.filter(al::id.eq(info.listing))
				.select(al::id)
				.limit(1),
		)
		.await
		.optional()?;
	listing.or_api_error(StatusCode::BAD_REQUEST, "unknown listing")?;

	let id: i64 = db
		.get_result(
			insert_into(st::adoption_story)
				.values((
					st::listing.eq(info.listing),
					st::title.eq(&info.title),
					st::body.eq(&info.body),
					st::published_at.eq(sql_now()),
				))
				.returning(st::id),
		)
		.await?;
	let row: SqlApiStoryInfo = db
		.load_one_select(st::adoption_story.filter(st::id.eq(id)).limit(1))
		.await?;

	Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn delete_story(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<i64>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	let rows = db
		.execute(delete(st::adoption_story.filter(st::id.eq(id))))
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "story not found"));
	}
	Ok((StatusCode::ACCEPTED, "story deleted"))
}

#[cfg(test)]
mod test {
	use axum::{
		body::Body,
		http::{Request, StatusCode, header},
	};
	use petshop_api_model::adoption::ApiAdoptionInfo;
	use serde_json::json;

	use crate::routes::test::*;

	async fn make_listing(router: &axum::Router, token: &str, status: &str) -> ApiAdoptionInfo {
		let response = send(
			router,
			json_request(
				"POST",
				"/api/adoption",
				Some(token),
				&json!({
					"pet_name": "Luna",
					"species": "cat",
					"breed": null,
					"age_months": 7,
					"description": "very soft",
					"status": status,
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		read_json(response).await
	}

	#[tokio::test]
	async fn test_gallery_shows_only_available() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;
		make_listing(&router, &token, "available").await;
		make_listing(&router, &token, "adopted").await;

		let response = send(&router, request("GET", "/public/adoption", None)).await;
		assert_eq!(response.status(), StatusCode::OK);
		let gallery: Vec<ApiAdoptionInfo> = read_json(response).await;
		assert_eq!(gallery.len(), 1);

		let response = send(&router, request("GET", "/api/adoption", Some(&token))).await;
		let all: Vec<ApiAdoptionInfo> = read_json(response).await;
		assert_eq!(all.len(), 2);
	}

	#[tokio::test]
	async fn test_photo_upload_and_serve() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;
		let listing = make_listing(&router, &token, "available").await;

		let request = Request::builder()
			.method("PUT")
			.uri(format!("/api/adoption/{}/photo", listing.id))
			.header(header::AUTHORIZATION, format!("Bearer {token}"))
			.header(header::CONTENT_TYPE, "image/png")
			.body(Body::from(&b"not really a png"[..]))
			.unwrap();
		let response = send(&router, request).await;
		assert_eq!(response.status(), StatusCode::ACCEPTED);
		let updated: ApiAdoptionInfo = read_json(response).await;
		let key = updated.photo.unwrap();

		let response = send(
			&router,
			crate::routes::test::request("GET", &format!("/public/photo/{key}"), None),
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(
			response.headers().get(header::CONTENT_TYPE).unwrap(),
			"image/png"
		);
	}

	#[tokio::test]
	async fn test_photo_requires_image_type() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;
		let listing = make_listing(&router, &token, "available").await;

		let request = Request::builder()
			.method("PUT")
			.uri(format!("/api/adoption/{}/photo", listing.id))
			.header(header::AUTHORIZATION, format!("Bearer {token}"))
			.header(header::CONTENT_TYPE, "text/plain")
			.body(Body::from(&b"hello"[..]))
			.unwrap();
		let response = send(&router, request).await;
		assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
	}
}
