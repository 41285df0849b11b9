//! Snapshot row types, one per backed-up table.
//!
//! Every struct carries the full column set, id included, so a restore
//! reproduces rows exactly as exported. Deriving both `Queryable` and
//! `Insertable` from the same struct keeps export and restore in lockstep
//! with the schema.

use diesel::{Insertable, Queryable, Selectable};
use petshop_backend_model::db::schema;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::neighborhood)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NeighborhoodRow {
	pub id: i64,
	pub name: String,
	pub pickup_fee_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::breed)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BreedRow {
	pub id: i64,
	pub name: String,
	pub species: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryRow {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::supplier)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SupplierRow {
	pub id: i64,
	pub name: String,
	pub phone: Option<String>,
	pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::client)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClientRow {
	pub id: i64,
	pub name: String,
	pub phone: String,
	pub cpf: Option<String>,
	pub email: Option<String>,
	pub neighborhood: Option<i64>,
	pub created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::pet)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PetRow {
	pub id: i64,
	pub client: i64,
	pub name: String,
	pub species: String,
	pub breed: Option<i64>,
	pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::grooming_service)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GroomingServiceRow {
	pub id: i64,
	pub name: String,
	pub description: Option<String>,
	pub price_cents: i64,
	pub duration_min: i32,
	pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::product)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductRow {
	pub id: i64,
	pub name: String,
	pub category: Option<i64>,
	pub supplier: Option<i64>,
	pub price_cents: i64,
	pub stock: i32,
	pub min_stock: i32,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::appointment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AppointmentRow {
	pub id: i64,
	pub client: i64,
	pub scheduled_date: Date,
	pub time_slot: String,
	pub status: i16,
	pub status_msg: Option<String>,
	pub pickup: bool,
	pub neighborhood: Option<i64>,
	pub total_cents: i64,
	pub created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::appointment_item)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AppointmentItemRow {
	pub id: i64,
	pub appointment: i64,
	pub pet: i64,
	pub service: i64,
	pub price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::payment_method)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentMethodRow {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::payment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentRow {
	pub id: i64,
	pub appointment: i64,
	pub method: i64,
	pub amount_cents: i64,
	pub paid_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::adoption_listing)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdoptionListingRow {
	pub id: i64,
	pub pet_name: String,
	pub species: String,
	pub breed: Option<i64>,
	pub age_months: Option<i32>,
	pub description: Option<String>,
	pub photo_key: Option<String>,
	pub status: i16,
	pub created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::adoption_story)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AdoptionStoryRow {
	pub id: i64,
	pub listing: i64,
	pub title: String,
	pub body: String,
	pub published_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
	pub id: i64,
	pub email: String,
	pub display_name: String,
	pub password_hash: String,
	pub is_admin: bool,
	pub created_at: PrimitiveDateTime,
}
