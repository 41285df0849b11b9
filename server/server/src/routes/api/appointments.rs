use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use diesel::{
	ExpressionMethods, OptionalExtension, QueryDsl, Queryable, Selectable, delete, insert_into,
	update,
};
use petshop_api_model::appointment::{
	ApiAppointmentInfo, ApiAppointmentItemInfo, AppointmentConfigInfo, AppointmentStatusInfo,
};
use petshop_backend_model::{
	appointment::{AppointmentRef, SqlAppointmentStatus},
	db::schema::{
		self, appointment::dsl as a, appointment_item::dsl as ai, client::dsl as c,
		grooming_service::dsl as gs, neighborhood::dsl as n, pet::dsl as p,
	},
};
use petshop_backend_service::{
	BackendError, BackendServices, booking::BookingError, database::SqlConnRef, sql_now,
};
use petshop_common_model::appointment::AppointmentStatus;

use super::{
	auth::AuthUser,
	error::{ApiError, ApiResult, OptionExt},
};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::appointment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiAppointmentInfo {
	id: i64,
	client: i64,
	scheduled_date: time::Date,
	time_slot: String,
	status: i16,
	status_msg: Option<String>,
	pickup: bool,
	neighborhood: Option<i64>,
	total_cents: i64,
	created_at: time::PrimitiveDateTime,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = schema::appointment_item)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct SqlApiAppointmentItemInfo {
	id: i64,
	pet: i64,
	service: i64,
	price_cents: i64,
}

impl SqlApiAppointmentInfo {
	async fn into_api(self, db: &mut SqlConnRef) -> ApiResult<ApiAppointmentInfo> {
		let items: Vec<SqlApiAppointmentItemInfo> = db
			.load_select(ai::appointment_item.filter(ai::appointment.eq(self.id)))
			.await?;
		Ok(ApiAppointmentInfo {
			id: self.id,
			client: self.client,
			scheduled_date: self.scheduled_date,
			time_slot: self.time_slot,
			status: SqlAppointmentStatus::from(self.status).into_common(self.status_msg),
			pickup: self.pickup,
			neighborhood: self.neighborhood,
			total_cents: self.total_cents,
			created_at: self.created_at,
			items: items
				.into_iter()
				.map(|item| ApiAppointmentItemInfo {
					id: item.id,
					pet: item.pet,
					service: item.service,
					price_cents: item.price_cents,
				})
				.collect(),
		})
	}
}

async fn appointment_info(
	db: &mut SqlConnRef,
	id: AppointmentRef,
) -> ApiResult<Json<ApiAppointmentInfo>> {
	let row: SqlApiAppointmentInfo = db
		.load_one_select(a::appointment.filter(a::id.eq(id)).limit(1))
		.await?;
	Ok(Json(row.into_api(db).await?))
}

pub async fn list_appointments(
	_user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<Json<Vec<ApiAppointmentInfo>>> {
	let mut db = backend.database.get().await?;
	let rows: Vec<SqlApiAppointmentInfo> = db.load_select(a::appointment).await?;
	let mut output = Vec::with_capacity(rows.len());
	for row in rows {
		output.push(row.into_api(&mut db).await?);
	}
	Ok(Json(output))
}

pub async fn get_appointment(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AppointmentRef>,
) -> ApiResult<Json<ApiAppointmentInfo>> {
	let mut db = backend.database.get().await?;
	let row: Option<SqlApiAppointmentInfo> = db
		.load_one_select(a::appointment.filter(a::id.eq(id)).limit(1))
		.await
		.optional()?;
	let row = row.or_api_error(StatusCode::NOT_FOUND, "appointment not found")?;
	Ok(Json(row.into_api(&mut db).await?))
}

pub async fn new_appointment(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Json(info): Json<AppointmentConfigInfo>,
) -> ApiResult<(StatusCode, Json<ApiAppointmentInfo>)> {
	if info.items.is_empty() {
		return Err(BookingError::EmptyBooking.into());
	}
	let slot = backend
		.slots
		.get(&info.time_slot)
		.ok_or_else(|| BookingError::UnknownTimeSlot(info.time_slot.clone()))?;

	let mut db = backend.database.get().await?;
	let exists: Option<i64> = db
		.get_result(
			c::client
				.filter(c::id.eq(info.client))
				.select(c::id)
				.limit(1),
		)
		.await
		.optional()?;
	exists.or_api_error(StatusCode::BAD_REQUEST, "unknown client")?;
	let owned_pets: Vec<i64> = db
		.load(p::pet.filter(p::client.eq(info.client)).select(p::id))
		.await?;
	if info
		.items
		.iter()
		.any(|item| !owned_pets.contains(&item.pet))
	{
		return Err(ApiError::CustomRef(
			StatusCode::BAD_REQUEST,
			"pet does not belong to the client",
		));
	}

	let id = db
		.transaction::<_, BackendError, _>(async |db| {
			let booked: i64 = db
				.get_result(
					a::appointment
						.filter(a::scheduled_date.eq(info.scheduled_date))
						.filter(a::time_slot.eq(&info.time_slot))
						.filter(a::status.ne(SqlAppointmentStatus::Canceled as i16))
						.count(),
				)
				.await?;
			if booked >= slot.capacity as i64 {
				return Err(BookingError::SlotFull(info.time_slot.clone()).into());
			}

			let mut total = 0i64;
			if info.pickup {
				let neighborhood =
					info.neighborhood.ok_or(BookingError::MissingNeighborhood)?;
				let fee: Option<i64> = db
					.get_result(
						n::neighborhood
							.filter(n::id.eq(neighborhood))
							.select(n::pickup_fee_cents)
							.limit(1),
					)
					.await
					.optional()?;
				total += fee.ok_or(BookingError::UnknownNeighborhood(neighborhood))?;
			}

			let mut priced = Vec::with_capacity(info.items.len());
			for item in &info.items {
				let price: Option<i64> = db
					.get_result(
						gs::grooming_service
							.filter(gs::id.eq(item.service))
							.filter(gs::active.eq(true))
							.select(gs::price_cents)
							.limit(1),
					)
					.await
					.optional()?;
				let price = price.ok_or(BookingError::UnknownService(item.service))?;
				total += price;
				priced.push((item.pet, item.service, price));
			}

			let id: AppointmentRef = db
				.get_result(
					insert_into(a::appointment)
						.values((
							a::client.eq(info.client),
							a::scheduled_date.eq(info.scheduled_date),
							a::time_slot.eq(&info.time_slot),
							a::status.eq(SqlAppointmentStatus::Confirmed as i16),
							a::pickup.eq(info.pickup),
							a::neighborhood.eq(info.neighborhood),
							a::total_cents.eq(total),
							a::created_at.eq(sql_now()),
						))
						.returning(a::id),
				)
				.await?;
			let item_rows: Vec<_> = priced
				.into_iter()
				.map(|(pet, service, price)| {
					(
						ai::appointment.eq(id),
						ai::pet.eq(pet),
						ai::service.eq(service),
						ai::price_cents.eq(price),
					)
				})
				.collect();
			db.execute(insert_into(ai::appointment_item).values(item_rows))
				.await?;

			Ok(id)
		})
		.await?;

	Ok((StatusCode::CREATED, appointment_info(&mut db, id).await?))
}

pub async fn set_appointment_status(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AppointmentRef>,
	Json(info): Json<AppointmentStatusInfo>,
) -> ApiResult<(StatusCode, Json<ApiAppointmentInfo>)> {
	let status = SqlAppointmentStatus::from(&info.status) as i16;
	let message = match &info.status {
		AppointmentStatus::Canceled { reason } => Some(reason.as_str()),
		_ => None,
	};

	let mut db = backend.database.get().await?;
	let rows = db
		.execute(
			update(a::appointment.filter(a::id.eq(id)))
				.set((a::status.eq(status), a::status_msg.eq(message))),
		)
		.await?;
	if rows == 0 {
		return Err(ApiError::CustomRef(
			StatusCode::NOT_FOUND,
			"appointment not found",
		));
	}

	Ok((StatusCode::ACCEPTED, appointment_info(&mut db, id).await?))
}

pub async fn delete_appointment(
	_user: AuthUser,
	State(backend): State<BackendServices>,
	Path(id): Path<AppointmentRef>,
) -> ApiResult<(StatusCode, &'static str)> {
	let mut db = backend.database.get().await?;
	db.transaction::<_, BackendError, _>(async |db| {
		// SQLite runs without the foreign_keys pragma, so the items do
		// not cascade on their own
		db.execute(delete(ai::appointment_item).filter(ai::appointment.eq(id)))
			.await?;
		let rows = db
			.execute(delete(a::appointment.filter(a::id.eq(id))))
			.await?;
		if rows == 0 {
			return Err(diesel::result::Error::NotFound.into());
		}
		Ok(())
	})
	.await?;
	Ok((StatusCode::ACCEPTED, "appointment deleted"))
}
