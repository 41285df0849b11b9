use anyhow::Result;
use axum::{Router, routing::get};
use petshop_backend_service::BackendServices;

pub mod api;
pub mod public;

pub fn make_router(backend_services: BackendServices) -> Result<Router> {
	let router = Router::new()
		.route("/", get(handler))
		.nest("/public", public::public_router())
		.nest("/api", api::api_router())
		.with_state(backend_services);

	Ok(router)
}

async fn handler() -> &'static str {
	concat!("Petshop Server ", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
pub(crate) mod test {
	use std::sync::Arc;

	use axum::{
		Router,
		body::Body,
		http::{Request, Response, StatusCode, header},
	};
	use http_body_util::BodyExt;
	use petshop_backend_service::{
		BackendServices,
		auth::{AdminConfig, AuthService},
		backup::BackupService,
		booking::BookingService,
		config::BackendConfig,
		database::{DatabaseConfig, DatabaseService},
		reports::ReportService,
		slots::{SlotConfig, SlotService},
		storage::{StorageConfig, StorageService},
	};
	use serde::{Serialize, de::DeserializeOwned};
	use tower::ServiceExt;

	pub async fn test_backend() -> BackendServices {
		let config = Arc::new(BackendConfig {
			database: DatabaseConfig {
				url: "sqlite://:memory:".to_string(),
				max_connections: 1,
			},
			storage: StorageConfig {
				path: std::env::temp_dir()
					.join(format!("petshop-server-test-{}", uuid::Uuid::now_v7())),
			},
			admin: AdminConfig {
				email: "admin@petshop.test".to_string(),
				password: "hunter2".to_string(),
				display_name: "Admin".to_string(),
			},
			slot: vec![
				SlotConfig {
					name: "09:00".into(),
					capacity: 2,
				},
				SlotConfig {
					name: "10:00".into(),
					capacity: 1,
				},
			],
		});

		let slots = Arc::new(SlotService::new(&config.slot));
		let storage = Arc::new(StorageService::new(&config.storage).unwrap());
		let database = Arc::new(DatabaseService::new(&config.database).await.unwrap());
		// the in-memory SQLite database loses its schema across
		// connections; migrate the pooled connection before use
		database.migrate_sqlite_for_tests().await.unwrap();
		let auth = Arc::new(AuthService::new(database.clone()));
		let booking = Arc::new(BookingService::new(database.clone(), slots.clone()));
		let backup = Arc::new(BackupService::new(database.clone(), storage.clone()));
		let reports = Arc::new(ReportService::new(database.clone()));
		auth.ensure_admin(&config.admin).await.unwrap();

		BackendServices {
			config,
			slots,
			storage,
			database,
			auth,
			booking,
			backup,
			reports,
		}
	}

	pub async fn test_router() -> (Router, BackendServices) {
		let backend = test_backend().await;
		let router = super::make_router(backend.clone()).unwrap();
		(router, backend)
	}

	pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
		builder(method, uri, token).body(Body::empty()).unwrap()
	}

	pub fn json_request<T: Serialize>(
		method: &str,
		uri: &str,
		token: Option<&str>,
		body: &T,
	) -> Request<Body> {
		builder(method, uri, token)
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(serde_json::to_vec(body).unwrap()))
			.unwrap()
	}

	pub fn raw_request(
		method: &str,
		uri: &str,
		token: Option<&str>,
		body: Vec<u8>,
	) -> Request<Body> {
		builder(method, uri, token).body(Body::from(body)).unwrap()
	}

	fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
		let mut builder = Request::builder().method(method).uri(uri);
		if let Some(token) = token {
			builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
		}
		builder
	}

	pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
		router.clone().oneshot(request).await.unwrap()
	}

	pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
		let bytes = response.into_body().collect().await.unwrap().to_bytes();
		serde_json::from_slice(&bytes).unwrap()
	}

	pub async fn admin_token(router: &Router) -> String {
		let response = send(
			router,
			json_request(
				"POST",
				"/api/auth/login",
				None,
				&serde_json::json!({
					"email": "admin@petshop.test",
					"password": "hunter2",
				}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::OK);
		let session: serde_json::Value = read_json(response).await;
		session["token"].as_str().unwrap().to_owned()
	}

	#[tokio::test]
	async fn test_banner() {
		let (router, _backend) = test_router().await;
		let response = send(&router, request("GET", "/", None)).await;
		assert_eq!(response.status(), StatusCode::OK);
	}
}
