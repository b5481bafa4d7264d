//! Shared error type for ids and geometry.

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite coordinate for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid identifier: {what}")]
    InvalidId { what: &'static str },
}
