//! Unauthenticated endpoints: the service catalog, the adoption gallery
//! and the booking flow.

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{StatusCode, header},
	response::IntoResponse,
	routing::{get, post},
};
use diesel::{ExpressionMethods, QueryDsl};
use petshop_api_model::{adoption::ApiAdoptionInfo, service::ApiServiceInfo};
use petshop_backend_model::{
	adoption::SqlAdoptionStatus,
	db::schema::{adoption_listing::dsl as al, grooming_service::dsl as gs},
};
use petshop_backend_service::{
	BackendServices,
	booking::{BookingReceipt, BookingRequest, SlotAvailability},
};
use serde::Deserialize;
use time::Date;

use super::api::{
	adoptions::SqlApiAdoptionInfo,
	error::{ApiError, ApiResult},
	services::SqlApiServiceInfo,
};

pub fn public_router() -> Router<BackendServices> {
	Router::new()
		.route("/service", get(list_services))
		.route("/adoption", get(list_adoptions))
		.route("/availability", get(availability))
		.route("/booking", post(new_booking))
		.route("/photo/{*key}", get(get_photo))
}

/// Active services only; retired ones stay internal.
async fn list_services(
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiServiceInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiServiceInfo> = db
		.load_select(gs::grooming_service.filter(gs::active.eq(true)))
		.await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// The adoption gallery: listings still looking for a home.
async fn list_adoptions(
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiAdoptionInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiAdoptionInfo> = db
		.load_select(
			al::adoption_listing.filter(al::status.eq(SqlAdoptionStatus::Available as i16)),
		)
		.await?;
	Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
struct AvailabilityParams {
	date: Date,
}

async fn availability(
	State(backend): State<BackendServices>,
	Query(params): Query<AvailabilityParams>,
) -> ApiResult<Json<Vec<SlotAvailability>>> {
	Ok(Json(backend.booking.availability(params.date).await?))
}

async fn new_booking(
	State(backend): State<BackendServices>,
	Json(request): Json<BookingRequest>,
) -> ApiResult<(StatusCode, Json<BookingReceipt>)> {
	let receipt = backend.booking.book(&request).await?;
	Ok((StatusCode::CREATED, Json(receipt)))
}

async fn get_photo(
	State(backend): State<BackendServices>,
	Path(key): Path<String>,
) -> ApiResult<impl IntoResponse> {
	// the store also holds backup snapshots, which stay admin-only
	if !key.starts_with("adoption/") {
		return Err(ApiError::CustomRef(StatusCode::NOT_FOUND, "no such photo"));
	}
	let bytes = backend.storage.get(&key).await?;
	let content_type = match key.rsplit_once('.').map(|(_, ext)| ext) {
		Some("jpg" | "jpeg") => "image/jpeg",
		Some("png") => "image/png",
		Some("webp") => "image/webp",
		_ => "application/octet-stream",
	};
	Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use serde_json::{Value, json};

	use crate::routes::test::*;

	async fn seed_service(router: &axum::Router, token: &str) -> i64 {
		let response = send(
			router,
			json_request(
				"POST",
				"/api/service",
				Some(token),
				&json!({
					"name": "Bath",
					"description": null,
					"price_cents": 5000,
					"duration_min": 45,
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let service: Value = read_json(response).await;
		service["id"].as_i64().unwrap()
	}

	#[tokio::test]
	async fn test_booking_flow() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;
		let service = seed_service(&router, &token).await;

		let booking = json!({
			"client": {
				"name": "Paula",
				"phone": "+55 11 98888-7777",
				"cpf": "529.982.247-25",
				"email": null,
			},
			"scheduled_date": "2026-09-01",
			"time_slot": "10:00",
			"pickup": false,
			"neighborhood": null,
			"pets": [
				{"name": "Bolinha", "species": "dog", "breed": null, "services": [service]},
			],
		});

		let response = send(
			&router,
			json_request("POST", "/public/booking", None, &booking),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let receipt: Value = read_json(response).await;
		assert_eq!(receipt["total_cents"], 5000);

		// slot 10:00 has capacity 1 and is now taken
		let response = send(
			&router,
			request("GET", "/public/availability?date=2026-09-01", None),
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		let slots: Value = read_json(response).await;
		let taken = slots
			.as_array()
			.unwrap()
			.iter()
			.find(|slot| slot["name"] == "10:00")
			.unwrap();
		assert_eq!(taken["booked"], 1);

		let response = send(
			&router,
			json_request("POST", "/public/booking", None, &booking),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CONFLICT);
	}

	#[tokio::test]
	async fn test_booking_rejects_invalid_cpf() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;
		let service = seed_service(&router, &token).await;

		let response = send(
			&router,
			json_request(
				"POST",
				"/public/booking",
				None,
				&json!({
					"client": {
						"name": "Paula",
						"phone": "+55 11 98888-7777",
						"cpf": "11111111111",
						"email": null,
					},
					"scheduled_date": "2026-09-01",
					"time_slot": "09:00",
					"pickup": false,
					"neighborhood": null,
					"pets": [
						{"name": "Bolinha", "species": "dog", "breed": null, "services": [service]},
					],
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_photo_unknown_key() {
		let (router, _backend) = test_router().await;
		let response = send(&router, request("GET", "/public/photo/adoption/nope.png", None)).await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_photo_rejects_non_photo_keys() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(
			&router,
			request("POST", "/api/backup/store?tables=users", Some(&token)),
		)
		.await;
		assert_eq!(response.status(), StatusCode::CREATED);
		let stored: Value = read_json(response).await;
		let path = stored["path"].as_str().unwrap();

		// snapshots never leave the admin surface
		let response = send(
			&router,
			request("GET", &format!("/public/photo/{path}"), None),
		)
		.await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}
}
