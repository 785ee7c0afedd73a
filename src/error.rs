use thiserror::Error;

/// Exit code for input/usage problems (unreadable file, bad flags, unknown key).
pub const EXIT_INPUT: u8 = 2;
/// Exit code for catalog content that fails validation or normalization.
pub const EXIT_CATALOG: u8 = 3;
/// Exit code for terminal/UI failures.
pub const EXIT_TERMINAL: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Fatal problems found while normalizing a pricing catalog.
///
/// None of these are recovered locally: the first one aborts the run and no
/// partial index is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The document is not a `v1.0` / `AmazonEC2` offer file.
    #[error("unsupported catalog: {field} is '{found}', expected '{expected}'")]
    Schema {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A product's location has no entry in the region table.
    #[error("product {sku}: unknown location '{location}'")]
    Lookup { sku: String, location: String },

    /// A numeric field, lease length, or required attribute is malformed.
    #[error("{context}: {message}")]
    Format { context: String, message: String },

    /// Two products resolved to the same key while duplicates are rejected.
    #[error("products {first} and {second} both resolve to {key}")]
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

impl PricingError {
    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::new(EXIT_CATALOG, format!("Catalog error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_errors_map_to_catalog_exit_code() {
        let err = PricingError::Lookup {
            sku: "ABC".to_string(),
            location: "Mars Colony 1".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.exit_code(), EXIT_CATALOG);
        assert_eq!(
            app.to_string(),
            "Catalog error: product ABC: unknown location 'Mars Colony 1'"
        );
    }
}
