use std::{collections::HashMap, sync::Arc};

use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, insert_into};
use kstring::KString;
use petshop_backend_model::{
	appointment::{AppointmentRef, SqlAppointmentStatus},
	client::{ClientRef, PetRef},
	db::schema::{
		appointment::dsl as a, appointment_item::dsl as ai, client::dsl as c,
		grooming_service::dsl as gs, neighborhood::dsl as n, pet::dsl as p,
	},
};
use petshop_common_model::{appointment::AppointmentStatus, cpf::Cpf, cpf::CpfError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;
use tracing::info;

use crate::{Result, database::DatabaseService, slots::SlotService, sql_now};

/// A public booking request: who, when, and which services per pet.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct BookingRequest {
	pub client: BookingClient,
	pub scheduled_date: Date,
	pub time_slot: String,
	#[serde(default)]
	pub pickup: bool,
	pub neighborhood: Option<i64>,
	pub pets: Vec<BookingPet>,
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct BookingClient {
	pub name: String,
	pub phone: String,
	pub cpf: Option<String>,
	pub email: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct BookingPet {
	pub name: String,
	pub species: String,
	pub breed: Option<i64>,
	/// Selected grooming service ids for this pet.
	pub services: Vec<i64>,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct BookingReceipt {
	pub appointment: AppointmentRef,
	pub client: ClientRef,
	pub total_cents: i64,
	pub status: AppointmentStatus,
}

/// Availability of one configured slot on a given date.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct SlotAvailability {
	pub name: KString,
	pub capacity: u32,
	pub booked: u32,
}

impl SlotAvailability {
	pub fn is_free(&self) -> bool {
		self.booked < self.capacity
	}
}

/// Public appointment booking.
///
/// All writes of one booking (client, pets, appointment, line items) run
/// in a single transaction; a failure anywhere leaves no partial records.
#[derive(Debug)]
pub struct BookingService {
	db: Arc<DatabaseService>,
	slots: Arc<SlotService>,
}

impl BookingService {
	pub fn new(db: Arc<DatabaseService>, slots: Arc<SlotService>) -> Self {
		Self { db, slots }
	}

	/// Lists every configured slot with its booked count for `date`.
	pub async fn availability(&self, date: Date) -> Result<Vec<SlotAvailability>> {
		let mut conn = self.db.get().await?;
		let booked: Vec<String> = conn
			.load(
				a::appointment
					.filter(a::scheduled_date.eq(date))
					.filter(a::status.ne(SqlAppointmentStatus::Canceled as i16))
					.select(a::time_slot),
			)
			.await?;

		let mut counts: HashMap<&str, u32> = HashMap::new();
		for slot in &booked {
			*counts.entry(slot.as_str()).or_default() += 1;
		}

		Ok(self
			.slots
			.iter()
			.map(|slot| SlotAvailability {
				name: slot.name.clone(),
				capacity: slot.capacity,
				booked: counts.get(slot.name.as_str()).copied().unwrap_or(0),
			})
			.collect())
	}

	pub async fn book(&self, request: &BookingRequest) -> Result<BookingReceipt> {
		if request.pets.is_empty() || request.pets.iter().any(|pet| pet.services.is_empty()) {
			return Err(BookingError::EmptyBooking.into());
		}
		let cpf = match &request.client.cpf {
			Some(cpf) => Some(Cpf::parse(cpf).map_err(BookingError::InvalidCpf)?),
			None => None,
		};
		let slot = self
			.slots
			.get(&request.time_slot)
			.ok_or_else(|| BookingError::UnknownTimeSlot(request.time_slot.clone()))?
			.clone();

		let mut conn = self.db.get().await?;
		let receipt = conn
			.transaction::<_, crate::BackendError, _>(async |conn| {
				// READ COMMITTED does not serialize check-then-insert, so
				// concurrent bookings of one slot take a transaction-scoped
				// advisory lock first; sqlite's single writer needs none
				if conn.is_pg() {
					let lock = format!(
						"{}|{}",
						request.scheduled_date,
						slot.name.replace('\'', "''")
					);
					conn.batch_execute(&format!(
						"SELECT pg_advisory_xact_lock(hashtext('{lock}'))"
					))
					.await?;
				}
				let booked: i64 = conn
					.get_result(
						a::appointment
							.filter(a::scheduled_date.eq(request.scheduled_date))
							.filter(a::time_slot.eq(slot.name.as_str()))
							.filter(a::status.ne(SqlAppointmentStatus::Canceled as i16))
							.count(),
					)
					.await?;
				if booked >= slot.capacity as i64 {
					return Err(BookingError::SlotFull(request.time_slot.clone()).into());
				}

				let pickup_fee = if request.pickup {
					let id = request
						.neighborhood
						.ok_or(BookingError::MissingNeighborhood)?;
					let fee: Option<i64> = conn
						.get_result(
							n::neighborhood
								.filter(n::id.eq(id))
								.select(n::pickup_fee_cents)
								.limit(1),
						)
						.await
						.optional()?;
					fee.ok_or(BookingError::UnknownNeighborhood(id))?
				} else {
					0
				};

				// one price lookup per distinct service
				let mut prices: HashMap<i64, i64> = HashMap::new();
				for service in request.pets.iter().flat_map(|pet| &pet.services) {
					if prices.contains_key(service) {
						continue;
					}
					let price: Option<i64> = conn
						.get_result(
							gs::grooming_service
								.filter(gs::id.eq(service))
								.filter(gs::active.eq(true))
								.select(gs::price_cents)
								.limit(1),
						)
						.await
						.optional()?;
					prices.insert(
						*service,
						price.ok_or(BookingError::UnknownService(*service))?,
					);
				}

				let client = self.find_or_create_client(conn, request, &cpf).await?;

				let services_total: i64 = request
					.pets
					.iter()
					.flat_map(|pet| &pet.services)
					.map(|service| prices[service])
					.sum();
				let total_cents = services_total + pickup_fee;

				let appointment: AppointmentRef = conn
					.get_result(
						insert_into(a::appointment)
							.values((
								a::client.eq(client),
								a::scheduled_date.eq(request.scheduled_date),
								a::time_slot.eq(slot.name.as_str()),
								a::status.eq(SqlAppointmentStatus::Pending as i16),
								a::pickup.eq(request.pickup),
								a::neighborhood.eq(request.neighborhood),
								a::total_cents.eq(total_cents),
								a::created_at.eq(sql_now()),
							))
							.returning(a::id),
					)
					.await?;

				let mut items = Vec::new();
				for pet in &request.pets {
					let pet_id = self.find_or_create_pet(conn, client, pet).await?;
					for service in &pet.services {
						items.push((
							ai::appointment.eq(appointment),
							ai::pet.eq(pet_id),
							ai::service.eq(*service),
							ai::price_cents.eq(prices[service]),
						));
					}
				}
				conn.execute(insert_into(ai::appointment_item).values(items))
					.await?;

				Ok(BookingReceipt {
					appointment,
					client,
					total_cents,
					status: AppointmentStatus::Pending,
				})
			})
			.await?;

		info!(
			appointment = receipt.appointment,
			client = receipt.client,
			total_cents = receipt.total_cents,
			"booked appointment"
		);
		Ok(receipt)
	}

	/// Looks a client up by CPF, then by phone; creates one when absent.
	async fn find_or_create_client(
		&self,
		conn: &mut petshop_backend_model::db::BoxedSqlConn,
		request: &BookingRequest,
		cpf: &Option<Cpf>,
	) -> Result<ClientRef> {
		if let Some(cpf) = cpf {
			let found: Option<ClientRef> = conn
				.get_result(
					c::client
						.filter(c::cpf.eq(cpf.as_str()))
						.select(c::id)
						.limit(1),
				)
				.await
				.optional()?;
			if let Some(id) = found {
				return Ok(id);
			}
		}
		let found: Option<ClientRef> = conn
			.get_result(
				c::client
					.filter(c::phone.eq(&request.client.phone))
					.select(c::id)
					.limit(1),
			)
			.await
			.optional()?;
		if let Some(id) = found {
			return Ok(id);
		}

		Ok(conn
			.get_result(
				insert_into(c::client)
					.values((
						c::name.eq(&request.client.name),
						c::phone.eq(&request.client.phone),
						c::cpf.eq(cpf.as_ref().map(|cpf| cpf.as_str().to_owned())),
						c::email.eq(request.client.email.as_deref()),
						c::neighborhood.eq(request.neighborhood),
						c::created_at.eq(sql_now()),
					))
					.returning(c::id),
			)
			.await?)
	}

	async fn find_or_create_pet(
		&self,
		conn: &mut petshop_backend_model::db::BoxedSqlConn,
		client: ClientRef,
		pet: &BookingPet,
	) -> Result<PetRef> {
		let found: Option<PetRef> = conn
			.get_result(
				p::pet
					.filter(p::client.eq(client))
					.filter(p::name.eq(&pet.name))
					.select(p::id)
					.limit(1),
			)
			.await
			.optional()?;
		if let Some(id) = found {
			return Ok(id);
		}

		Ok(conn
			.get_result(
				insert_into(p::pet)
					.values((
						p::client.eq(client),
						p::name.eq(&pet.name),
						p::species.eq(&pet.species),
						p::breed.eq(pet.breed),
					))
					.returning(p::id),
			)
			.await?)
	}
}

#[derive(Debug, Error)]
pub enum BookingError {
	#[error("booking must include at least one pet with at least one service")]
	EmptyBooking,
	#[error("unknown time slot: {0}")]
	UnknownTimeSlot(String),
	#[error("time slot {0} is fully booked")]
	SlotFull(String),
	#[error("unknown or inactive service: {0}")]
	UnknownService(i64),
	#[error("pickup requested without a neighborhood")]
	MissingNeighborhood,
	#[error("unknown neighborhood: {0}")]
	UnknownNeighborhood(i64),
	#[error("invalid CPF: {0}")]
	InvalidCpf(#[source] CpfError),
}

#[cfg(test)]
mod test {
	use diesel::QueryDsl;

	use super::*;
	use crate::{BackendError, test::test_env};

	const DATE: Date = time::macros::date!(2026 - 08 - 25);

	async fn seed(env: &crate::BackendServices) -> (i64, i64, i64) {
		let mut conn = env.database.get().await.unwrap();
		let bath: i64 = conn
			.get_result(
				insert_into(gs::grooming_service)
					.values((
						gs::name.eq("Bath"),
						gs::price_cents.eq(5000),
						gs::duration_min.eq(45),
						gs::active.eq(true),
					))
					.returning(gs::id),
			)
			.await
			.unwrap();
		let trim: i64 = conn
			.get_result(
				insert_into(gs::grooming_service)
					.values((
						gs::name.eq("Nail trim"),
						gs::price_cents.eq(1500),
						gs::duration_min.eq(15),
						gs::active.eq(true),
					))
					.returning(gs::id),
			)
			.await
			.unwrap();
		let downtown: i64 = conn
			.get_result(
				insert_into(n::neighborhood)
					.values((n::name.eq("Downtown"), n::pickup_fee_cents.eq(800)))
					.returning(n::id),
			)
			.await
			.unwrap();
		(bath, trim, downtown)
	}

	fn request(bath: i64, trim: i64, downtown: i64) -> BookingRequest {
		BookingRequest {
			client: BookingClient {
				name: "Maria Silva".to_owned(),
				phone: "+55 11 91234-5678".to_owned(),
				cpf: Some("529.982.247-25".to_owned()),
				email: None,
			},
			scheduled_date: DATE,
			time_slot: "09:00".to_owned(),
			pickup: true,
			neighborhood: Some(downtown),
			pets: vec![
				BookingPet {
					name: "Rex".to_owned(),
					species: "dog".to_owned(),
					breed: None,
					services: vec![bath, trim],
				},
				BookingPet {
					name: "Mimi".to_owned(),
					species: "cat".to_owned(),
					breed: None,
					services: vec![bath],
				},
			],
		}
	}

	#[tokio::test]
	async fn test_booking_totals_and_rows() {
		let env = test_env().await;
		let (bath, trim, downtown) = seed(&env).await;

		let receipt = env
			.booking
			.book(&request(bath, trim, downtown))
			.await
			.unwrap();
		// 5000 + 1500 + 5000 services, 800 pickup
		assert_eq!(receipt.total_cents, 12300);
		assert_eq!(receipt.status, AppointmentStatus::Pending);

		let mut db = env.database.get().await.unwrap();
		assert_eq!(
			db.get_result::<_, i64>(ai::appointment_item.count())
				.await
				.unwrap(),
			3
		);
		assert_eq!(db.get_result::<_, i64>(p::pet.count()).await.unwrap(), 2);
		let stored_cpf: Option<String> = db
			.get_result(c::client.select(c::cpf).limit(1))
			.await
			.unwrap();
		assert_eq!(stored_cpf.as_deref(), Some("52998224725"));
	}

	#[tokio::test]
	async fn test_booking_reuses_client_and_pets() {
		let env = test_env().await;
		let (bath, trim, downtown) = seed(&env).await;

		let first = env
			.booking
			.book(&request(bath, trim, downtown))
			.await
			.unwrap();
		let mut again = request(bath, trim, downtown);
		again.time_slot = "10:00".to_owned();
		let second = env.booking.book(&again).await.unwrap();

		assert_eq!(first.client, second.client);
		let mut db = env.database.get().await.unwrap();
		assert_eq!(db.get_result::<_, i64>(c::client.count()).await.unwrap(), 1);
		assert_eq!(db.get_result::<_, i64>(p::pet.count()).await.unwrap(), 2);
	}

	#[tokio::test]
	async fn test_slot_capacity() {
		let env = test_env().await;
		let (bath, trim, downtown) = seed(&env).await;

		// the 10:00 test slot has capacity 1
		let mut first = request(bath, trim, downtown);
		first.time_slot = "10:00".to_owned();
		env.booking.book(&first).await.unwrap();

		let mut second = request(bath, trim, downtown);
		second.time_slot = "10:00".to_owned();
		second.client.phone = "+55 11 99999-0000".to_owned();
		second.client.cpf = None;
		let err = env.booking.book(&second).await.unwrap_err();
		assert!(matches!(
			err,
			BackendError::BookingError(BookingError::SlotFull(_))
		));

		let availability = env.booking.availability(DATE).await.unwrap();
		let slot = availability.iter().find(|s| s.name == "10:00").unwrap();
		assert_eq!((slot.booked, slot.capacity), (1, 1));
		assert!(!slot.is_free());
	}

	#[tokio::test]
	async fn test_failed_booking_leaves_no_partial_rows() {
		let env = test_env().await;
		let (bath, trim, downtown) = seed(&env).await;

		let mut bad = request(bath, trim, downtown);
		bad.pets[1].services = vec![9999];
		let err = env.booking.book(&bad).await.unwrap_err();
		assert!(matches!(
			err,
			BackendError::BookingError(BookingError::UnknownService(9999))
		));

		let mut db = env.database.get().await.unwrap();
		assert_eq!(db.get_result::<_, i64>(c::client.count()).await.unwrap(), 0);
		assert_eq!(db.get_result::<_, i64>(p::pet.count()).await.unwrap(), 0);
		assert_eq!(
			db.get_result::<_, i64>(a::appointment.count()).await.unwrap(),
			0
		);
		assert_eq!(
			db.get_result::<_, i64>(ai::appointment_item.count())
				.await
				.unwrap(),
			0
		);
	}

	#[tokio::test]
	async fn test_booking_validation() {
		let env = test_env().await;
		let (bath, trim, downtown) = seed(&env).await;

		let mut empty = request(bath, trim, downtown);
		empty.pets.clear();
		assert!(matches!(
			env.booking.book(&empty).await.unwrap_err(),
			BackendError::BookingError(BookingError::EmptyBooking)
		));

		let mut bad_cpf = request(bath, trim, downtown);
		bad_cpf.client.cpf = Some("11111111111".to_owned());
		assert!(matches!(
			env.booking.book(&bad_cpf).await.unwrap_err(),
			BackendError::BookingError(BookingError::InvalidCpf(_))
		));

		let mut bad_slot = request(bath, trim, downtown);
		bad_slot.time_slot = "23:00".to_owned();
		assert!(matches!(
			env.booking.book(&bad_slot).await.unwrap_err(),
			BackendError::BookingError(BookingError::UnknownTimeSlot(_))
		));

		let mut no_hood = request(bath, trim, downtown);
		no_hood.neighborhood = None;
		assert!(matches!(
			env.booking.book(&no_hood).await.unwrap_err(),
			BackendError::BookingError(BookingError::MissingNeighborhood)
		));
	}
}
