use axum::{
	Router,
	routing::{get, patch, post, put},
};
use petshop_backend_service::BackendServices;

pub(crate) mod adoptions;
pub(crate) mod appointments;
pub mod auth;
pub(crate) mod backup;
pub(crate) mod catalog;
pub(crate) mod clients;
pub mod error;
pub(crate) mod functions;
pub(crate) mod payments;
pub(crate) mod pets;
pub(crate) mod products;
pub(crate) mod reports;
pub(crate) mod services;
pub(crate) mod users;

pub fn api_router() -> Router<BackendServices> {
	Router::new()
		.route("/", get(handler))
		.route("/auth/login", post(auth::login))
		.route("/auth/logout", post(auth::logout))
		.route("/auth/me", get(auth::me))
		.route("/client", get(clients::list_clients).post(clients::new_client))
		.route(
			"/client/{id}",
			get(clients::get_client)
				.put(clients::update_client)
				.delete(clients::delete_client),
		)
		.route("/pet", get(pets::list_pets).post(pets::new_pet))
		.route(
			"/pet/{id}",
			get(pets::get_pet).put(pets::update_pet).delete(pets::delete_pet),
		)
		.route(
			"/service",
			get(services::list_services).post(services::new_service),
		)
		.route(
			"/service/{id}",
			get(services::get_service)
				.put(services::update_service)
				.delete(services::delete_service),
		)
		.route(
			"/product",
			get(products::list_products).post(products::new_product),
		)
		.route(
			"/product/{id}",
			get(products::get_product)
				.put(products::update_product)
				.delete(products::delete_product),
		)
		.route(
			"/supplier",
			get(products::list_suppliers).post(products::new_supplier),
		)
		.route(
			"/supplier/{id}",
			get(products::get_supplier)
				.put(products::update_supplier)
				.delete(products::delete_supplier),
		)
		.route(
			"/category",
			get(catalog::list_categories).post(catalog::new_category),
		)
		.route(
			"/category/{id}",
			put(catalog::update_category).delete(catalog::delete_category),
		)
		.route(
			"/neighborhood",
			get(catalog::list_neighborhoods).post(catalog::new_neighborhood),
		)
		.route(
			"/neighborhood/{id}",
			put(catalog::update_neighborhood).delete(catalog::delete_neighborhood),
		)
		.route("/breed", get(catalog::list_breeds).post(catalog::new_breed))
		.route(
			"/breed/{id}",
			put(catalog::update_breed).delete(catalog::delete_breed),
		)
		.route(
			"/payment-method",
			get(catalog::list_payment_methods).post(catalog::new_payment_method),
		)
		.route(
			"/payment-method/{id}",
			put(catalog::update_payment_method).delete(catalog::delete_payment_method),
		)
		.route(
			"/appointment",
			get(appointments::list_appointments).post(appointments::new_appointment),
		)
		.route(
			"/appointment/{id}",
			get(appointments::get_appointment).delete(appointments::delete_appointment),
		)
		.route(
			"/appointment/{id}/status",
			patch(appointments::set_appointment_status),
		)
		.route(
			"/adoption",
			get(adoptions::list_adoptions).post(adoptions::new_adoption),
		)
		.route(
			"/adoption/{id}",
			get(adoptions::get_adoption)
				.put(adoptions::update_adoption)
				.delete(adoptions::delete_adoption),
		)
		.route("/adoption/{id}/photo", put(adoptions::put_adoption_photo))
		.route("/story", get(adoptions::list_stories).post(adoptions::new_story))
		.route("/story/{id}", axum::routing::delete(adoptions::delete_story))
		.route(
			"/payment",
			get(payments::list_payments).post(payments::new_payment),
		)
		.route(
			"/payment/{id}",
			get(payments::get_payment).delete(payments::delete_payment),
		)
		.route("/user", get(users::list_users).post(users::new_user))
		.route(
			"/user/{id}",
			get(users::get_user)
				.patch(users::update_user)
				.delete(users::delete_user),
		)
		.route("/report/dashboard", get(reports::dashboard))
		.route("/report/attendance", get(reports::attendance))
		.route("/report/low-stock", get(reports::low_stock))
		.route("/backup/table", get(backup::list_tables))
		.route("/backup/export", get(backup::export))
		.route("/backup/store", post(backup::export_to_storage))
		.route("/backup/upload", post(backup::upload))
		.route("/functions/delete-user", post(functions::delete_user))
		.route("/functions/validate-cpf", post(functions::validate_cpf))
		.route("/functions/restore-backup", post(functions::restore_backup))
}

async fn handler() -> &'static str {
	concat!("Petshop Server API ", env!("CARGO_PKG_VERSION"))
}
