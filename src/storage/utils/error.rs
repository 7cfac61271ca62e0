// Error conversion helpers and wrapping macro for Snafu-based errors
use crate::error::Error;

/// Anything convertible into the crate [`Error`], used as the boxed `source` of wrapped variants.
pub trait IntoConnectorError {
    fn into_error(self) -> Error;
}

impl<E: Into<Error>> IntoConnectorError for E {
    fn into_error(self) -> Error {
        self.into()
    }
}

/// Macro to wrap a Result-producing expression into a Snafu variant with `source: Box<Error>`.
/// Example:
/// wrap_err!(writer.close().await, TransferFailed { path: dest.to_string() })?
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {{
        $expr.map_err(|e| {
            let src: $crate::error::Error = $crate::storage::utils::error::IntoConnectorError::into_error(e);
            $crate::error::Error::$variant { $($field: $value),*, source: Box::new(src) }
        })
    }};
}
