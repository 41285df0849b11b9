use std::sync::Arc;

use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, delete, insert_into};
use petshop_backend_model::{db::schema::sessions::dsl as s, db::schema::users::dsl as u, user::UserRef};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use time::Duration;
use tracing::info;

use crate::{Result, database::DatabaseService, sql_now};

/// How long a session token stays valid after sign-in.
const SESSION_TTL: Duration = Duration::days(30);

/// The staff account ensured to exist on startup.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdminConfig {
	pub email: String,
	pub password: String,
	#[serde(default = "default_display_name")]
	pub display_name: String,
}

fn default_display_name() -> String {
	"Administrator".to_owned()
}

/// A signed-in user, as seen by request handlers.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct AuthUserInfo {
	pub id: UserRef,
	pub email: String,
	pub display_name: String,
	pub is_admin: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct NewUserInfo {
	pub email: String,
	pub display_name: String,
	pub password: String,
	#[serde(default)]
	pub is_admin: bool,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AuthSession {
	pub token: String,
	pub expires_at: time::PrimitiveDateTime,
	pub user: AuthUserInfo,
}

/// User accounts and bearer-token sessions.
#[derive(Debug)]
pub struct AuthService {
	db: Arc<DatabaseService>,
}

impl AuthService {
	pub fn new(db: Arc<DatabaseService>) -> Self {
		Self { db }
	}

	/// Makes sure the configured admin account exists.
	///
	/// An existing account is left untouched, including its password.
	pub async fn ensure_admin(&self, config: &AdminConfig) -> Result<()> {
		let mut conn = self.db.get().await?;
		let existing: Option<UserRef> = conn
			.get_result(
				u::users
					.filter(u::email.eq(&config.email))
					.select(u::id)
					.limit(1),
			)
			.await
			.optional()?;
		if existing.is_some() {
			return Ok(());
		}
		drop(conn);

		self.create_user(&NewUserInfo {
			email: config.email.clone(),
			display_name: config.display_name.clone(),
			password: config.password.clone(),
			is_admin: true,
		})
		.await?;
		info!(email = config.email, "created admin account from config");
		Ok(())
	}

	pub async fn create_user(&self, info: &NewUserInfo) -> Result<AuthUserInfo> {
		let mut conn = self.db.get().await?;
		let taken: Option<UserRef> = conn
			.get_result(
				u::users
					.filter(u::email.eq(&info.email))
					.select(u::id)
					.limit(1),
			)
			.await
			.optional()?;
		if taken.is_some() {
			return Err(AuthError::EmailTaken(info.email.clone()).into());
		}

		let id: UserRef = conn
			.get_result(
				insert_into(u::users)
					.values((
						u::email.eq(&info.email),
						u::display_name.eq(&info.display_name),
						u::password_hash.eq(hash_password(&info.password)),
						u::is_admin.eq(info.is_admin),
						u::created_at.eq(sql_now()),
					))
					.returning(u::id),
			)
			.await?;
		info!(id, email = info.email, "created user account");

		Ok(AuthUserInfo {
			id,
			email: info.email.clone(),
			display_name: info.display_name.clone(),
			is_admin: info.is_admin,
		})
	}

	/// Deletes a user account and all of its sessions.
	pub async fn delete_user(&self, id: UserRef) -> Result<()> {
		let mut conn = self.db.get().await?;
		conn.transaction::<_, crate::BackendError, _>(async |conn| {
			// explicit instead of relying on the FK cascade, which SQLite
			// only honors with foreign_keys pragma enabled
			conn.execute(delete(s::sessions).filter(s::user_id.eq(id)))
				.await?;
			let rows = conn.execute(delete(u::users).filter(u::id.eq(id)))
				.await?;
			if rows == 0 {
				return Err(AuthError::UserNotFound(id).into());
			}
			Ok(())
		})
		.await?;
		info!(id, "deleted user account");
		Ok(())
	}

	/// Updates an account in place; `None` fields stay unchanged.
	pub async fn update_user(
		&self,
		id: UserRef,
		display_name: Option<&str>,
		password: Option<&str>,
		is_admin: Option<bool>,
	) -> Result<()> {
		if display_name.is_none() && password.is_none() && is_admin.is_none() {
			return Ok(());
		}
		let mut conn = self.db.get().await?;
		let rows = conn
			.execute(diesel::update(u::users.filter(u::id.eq(id))).set((
				display_name.map(|v| u::display_name.eq(v.to_owned())),
				password.map(|v| u::password_hash.eq(hash_password(v))),
				is_admin.map(|v| u::is_admin.eq(v)),
			)))
			.await?;
		if rows == 0 {
			return Err(AuthError::UserNotFound(id).into());
		}
		info!(id, "updated user account");
		Ok(())
	}

	pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
		let mut conn = self.db.get().await?;
		let row: Option<(UserRef, String, String, String, bool)> = conn
			.get_result(
				u::users
					.filter(u::email.eq(email))
					.select((
						u::id,
						u::email,
						u::display_name,
						u::password_hash,
						u::is_admin,
					))
					.limit(1),
			)
			.await
			.optional()?;
		let Some((id, email, display_name, password_hash, is_admin)) = row else {
			return Err(AuthError::InvalidCredentials.into());
		};
		if !verify_password(&password_hash, password) {
			return Err(AuthError::InvalidCredentials.into());
		}

		let token = make_token();
		let now = sql_now();
		let expires_at = now + SESSION_TTL;
		conn.execute(insert_into(s::sessions).values((
			s::token.eq(&token),
			s::user_id.eq(id),
			s::created_at.eq(now),
			s::expires_at.eq(expires_at),
		)))
		.await?;
		info!(user = id, "user signed in");

		Ok(AuthSession {
			token,
			expires_at,
			user: AuthUserInfo {
				id,
				email,
				display_name,
				is_admin,
			},
		})
	}

	/// Revokes a session token. Unknown tokens are ignored.
	pub async fn sign_out(&self, token: &str) -> Result<()> {
		let mut conn = self.db.get().await?;
		conn.execute(delete(s::sessions).filter(s::token.eq(token)))
			.await?;
		Ok(())
	}

	/// Resolves a bearer token into the signed-in user.
	///
	/// Returns `None` for unknown or expired tokens; expired sessions are
	/// removed on the way out.
	pub async fn authenticate(&self, token: &str) -> Result<Option<AuthUserInfo>> {
		let mut conn = self.db.get().await?;
		let session: Option<(UserRef, time::PrimitiveDateTime)> = conn
			.get_result(
				s::sessions
					.filter(s::token.eq(token))
					.select((s::user_id, s::expires_at))
					.limit(1),
			)
			.await
			.optional()?;
		let Some((user_id, expires_at)) = session else {
			return Ok(None);
		};
		if expires_at <= sql_now() {
			conn.execute(delete(s::sessions).filter(s::token.eq(token)))
				.await?;
			return Ok(None);
		}

		let user: Option<(UserRef, String, String, bool)> = conn
			.get_result(
				u::users
					.filter(u::id.eq(user_id))
					.select((u::id, u::email, u::display_name, u::is_admin))
					.limit(1),
			)
			.await
			.optional()?;
		Ok(user.map(|(id, email, display_name, is_admin)| AuthUserInfo {
			id,
			email,
			display_name,
			is_admin,
		}))
	}

	/// Re-checks a signed-in user's password.
	///
	/// Destructive operations (backup restore) require the password to be
	/// replayed even with a valid session.
	pub async fn verify_password(&self, id: UserRef, password: &str) -> Result<bool> {
		let mut conn = self.db.get().await?;
		let hash: Option<String> = conn
			.get_result(
				u::users
					.filter(u::id.eq(id))
					.select(u::password_hash)
					.limit(1),
			)
			.await
			.optional()?;
		match hash {
			Some(hash) => Ok(verify_password(&hash, password)),
			None => Err(AuthError::UserNotFound(id).into()),
		}
	}
}

#[derive(Debug, Error)]
pub enum AuthError {
	#[error("email {0} is already registered")]
	EmailTaken(String),
	#[error("invalid email or password")]
	InvalidCredentials,
	#[error("user {0} not found")]
	UserNotFound(UserRef),
}

fn make_token() -> String {
	let mut bytes = [0u8; 32];
	rand::rng().fill(&mut bytes);
	hex::encode(bytes)
}

/// `hex(salt) ":" hex(sha256(salt || password))`.
fn hash_password(password: &str) -> String {
	let salt: [u8; 16] = rand::rng().random();
	format!("{}:{}", hex::encode(salt), hex::encode(digest(&salt, password)))
}

fn verify_password(stored: &str, password: &str) -> bool {
	let Some((salt, hash)) = stored.split_once(':') else {
		return false;
	};
	let Ok(salt) = hex::decode(salt) else {
		return false;
	};
	hex::encode(digest(&salt, password)) == hash
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
	let mut hasher = Sha256::new();
	hasher.update(salt);
	hasher.update(password.as_bytes());
	hasher.finalize().into()
}
