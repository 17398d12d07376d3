use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use maud::html;
use thiserror::Error;

use crate::pages;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that end a request (or start-up) instead of redisplaying a form.
#[derive(Debug, Error)]
pub enum AppError {
	/// Missing or sentinel book id, or a path/body id mismatch.
	#[error("Không tìm thấy sách")]
	NotFound,

	/// The row changed underneath an edit.
	#[error("Sách {0} đã bị thay đổi hoặc xoá bởi một yêu cầu khác")]
	Conflict(String),

	#[error("Mã chống giả mạo bị thiếu hoặc không hợp lệ")]
	Csrf,

	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),

	#[error("spreadsheet export error: {0}")]
	Export(#[from] rust_xlsxwriter::XlsxError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Raised while reading configuration from the environment.
	#[error("invalid value for {key}: {value:?}")]
	Config { key: &'static str, value: String },
}

impl AppError {
	pub fn status(&self) -> StatusCode {
		match self {
			AppError::NotFound => StatusCode::NOT_FOUND,
			AppError::Conflict(_) => StatusCode::CONFLICT,
			AppError::Csrf => StatusCode::FORBIDDEN,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = self.status();
		// internals stay in the log, the client gets the status line only
		let message = if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
			"Đã xảy ra lỗi, vui lòng thử lại sau".to_string()
		} else {
			self.to_string()
		};

		let body = pages::layout(status.as_str(), html! {
			h1 { (status) }
			p { (message) }
			a href="/Book" { "Quay lại danh sách" }
		});
		(status, body).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn statuses_follow_error_kind() {
		assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
		assert_eq!(AppError::Conflict("B1".into()).status(), StatusCode::CONFLICT);
		assert_eq!(AppError::Csrf.status(), StatusCode::FORBIDDEN);
		assert_eq!(
			AppError::Database(sqlx::Error::RowNotFound).status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}
}
