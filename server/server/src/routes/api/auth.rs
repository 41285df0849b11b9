use axum::{
	Json,
	extract::{FromRequestParts, State},
	http::{StatusCode, header, request::Parts},
};
use petshop_api_model::auth::{ApiAuthUser, ApiSession, LoginRequest};
use petshop_backend_service::{BackendServices, auth::AuthUserInfo};

use super::error::{ApiError, ApiResult};

/// Extractor for routes that need a signed-in user.
pub struct AuthUser {
	pub info: AuthUserInfo,
	pub token: String,
}

impl FromRequestParts<BackendServices> for AuthUser {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &BackendServices,
	) -> Result<Self, Self::Rejection> {
		let Some(token) = bearer_token(parts) else {
			return Err(ApiError::AuthRequired);
		};
		match state.auth.authenticate(&token).await? {
			Some(info) => Ok(Self { info, token }),
			None => Err(ApiError::AuthRequired),
		}
	}
}

/// Extractor for routes restricted to administrator accounts.
pub struct AdminUser {
	pub info: AuthUserInfo,
}

impl FromRequestParts<BackendServices> for AdminUser {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &BackendServices,
	) -> Result<Self, Self::Rejection> {
		let AuthUser { info, .. } = AuthUser::from_request_parts(parts, state).await?;
		if !info.is_admin {
			return Err(ApiError::CustomRef(
				StatusCode::FORBIDDEN,
				"administrator access is required",
			));
		}
		Ok(Self { info })
	}
}

fn bearer_token(parts: &Parts) -> Option<String> {
	parts
		.headers
		.get(header::AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.map(str::to_owned)
}

fn into_api(info: AuthUserInfo) -> ApiAuthUser {
	ApiAuthUser {
		id: info.id,
		email: info.email,
		display_name: info.display_name,
		is_admin: info.is_admin,
	}
}

pub async fn login(
	State(backend): State<BackendServices>,
	Json(request): Json<LoginRequest>,
) -> ApiResult<Json<ApiSession>> {
	let session = backend.auth.sign_in(&request.email, &request.password).await?;
	Ok(Json(ApiSession {
		token: session.token,
		expires_at: session.expires_at,
		user: into_api(session.user),
	}))
}

pub async fn logout(
	user: AuthUser,
	State(backend): State<BackendServices>,
) -> ApiResult<StatusCode> {
	backend.auth.sign_out(&user.token).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub async fn me(user: AuthUser) -> Json<ApiAuthUser> {
	Json(into_api(user.info))
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use petshop_api_model::auth::ApiAuthUser;
	use serde_json::json;

	use crate::routes::test::*;

	#[tokio::test]
	async fn test_login_bad_credentials() {
		let (router, _backend) = test_router().await;
		let response = send(
			&router,
			json_request(
				"POST",
				"/api/auth/login",
				None,
				&json!({"email": "admin@petshop.test", "password": "wrong"}),
			),
		)
		.await;
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_me_requires_token() {
		let (router, _backend) = test_router().await;
		let response = send(&router, request("GET", "/api/auth/me", None)).await;
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.headers().get("WWW-Authenticate").unwrap(),
			"Bearer"
		);
	}

	#[tokio::test]
	async fn test_session_roundtrip() {
		let (router, _backend) = test_router().await;
		let token = admin_token(&router).await;

		let response = send(&router, request("GET", "/api/auth/me", Some(&token))).await;
		assert_eq!(response.status(), StatusCode::OK);
		let user: ApiAuthUser = read_json(response).await;
		assert_eq!(user.email, "admin@petshop.test");
		assert!(user.is_admin);

		let response =
			send(&router, request("POST", "/api/auth/logout", Some(&token))).await;
		assert_eq!(response.status(), StatusCode::NO_CONTENT);

		let response = send(&router, request("GET", "/api/auth/me", Some(&token))).await;
		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	}
}
