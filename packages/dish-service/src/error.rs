pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<dish_storage::Error> for Error {
	fn from(err: dish_storage::Error) -> Self {
		match err {
			dish_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			dish_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
