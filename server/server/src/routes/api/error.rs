use axum::{
	http::StatusCode,
	response::{AppendHeaders, IntoResponse, Response},
};
use petshop_backend_service::{
	BackendError, auth::AuthError, backup::BackupError, booking::BookingError,
	database::DatabaseError, reports::ReportError, storage::StorageError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error(transparent)]
	BackendError(BackendError),

	#[error("api error: {1}")]
	CustomRef(StatusCode, &'static str),
	#[error("api error: {1}")]
	CustomString(StatusCode, String),

	#[error("authentication is required")]
	AuthRequired,
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match self {
			ApiError::CustomRef(status, message) => (status, message).into_response(),
			ApiError::CustomString(status, message) => (status, message).into_response(),
			ApiError::AuthRequired => (
				StatusCode::UNAUTHORIZED,
				AppendHeaders([("WWW-Authenticate", "Bearer")]),
				"authentication is required",
			)
				.into_response(),
			ApiError::BackendError(err) => (status_for(&err), err.to_string()).into_response(),
		}
	}
}

fn status_for(err: &BackendError) -> StatusCode {
	match err {
		BackendError::AuthError(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
		BackendError::AuthError(AuthError::UserNotFound(_)) => StatusCode::NOT_FOUND,
		BackendError::AuthError(AuthError::EmailTaken(_)) => StatusCode::CONFLICT,
		BackendError::BookingError(BookingError::SlotFull(_)) => StatusCode::CONFLICT,
		BackendError::BookingError(_) => StatusCode::BAD_REQUEST,
		// a table failing to dump is a server problem; everything else
		// in a backup error points at the submitted snapshot
		BackendError::BackupError(BackupError::ExportTable { .. }) => {
			StatusCode::INTERNAL_SERVER_ERROR
		}
		BackendError::BackupError(_) => StatusCode::BAD_REQUEST,
		BackendError::StorageError(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
		BackendError::StorageError(StorageError::InvalidKey(_)) => StatusCode::BAD_REQUEST,
		BackendError::DatabaseError(DatabaseError::QueryError(
			diesel::result::Error::NotFound,
		)) => StatusCode::NOT_FOUND,
		BackendError::ReportError(ReportError::EmptyRange { .. }) => StatusCode::BAD_REQUEST,
		_ => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

impl<T: Into<BackendError>> From<T> for ApiError {
	fn from(value: T) -> Self {
		Self::BackendError(value.into())
	}
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

pub(crate) trait IntoCustomApiError {
	fn into_custom_api_error(self, status: StatusCode) -> ApiError;
}

impl IntoCustomApiError for &'static str {
	fn into_custom_api_error(self, status: StatusCode) -> ApiError {
		ApiError::CustomRef(status, self)
	}
}
impl IntoCustomApiError for String {
	fn into_custom_api_error(self, status: StatusCode) -> ApiError {
		ApiError::CustomString(status, self)
	}
}

pub(crate) trait OptionExt<T> {
	fn or_api_error<M: IntoCustomApiError>(
		self,
		status: StatusCode,
		message: M,
	) -> Result<T, ApiError>;
}

impl<T> OptionExt<T> for Option<T> {
	fn or_api_error<M: IntoCustomApiError>(
		self,
		status: StatusCode,
		message: M,
	) -> Result<T, ApiError> {
		match self {
			Some(val) => Ok(val),
			None => Err(message.into_custom_api_error(status)),
		}
	}
}
