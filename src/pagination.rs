//! This modules defines the common functionality for paging through lists of expenses.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of expenses to return when a request does not specify a limit.
    pub default_limit: u32,
    /// The largest limit a request may ask for.
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

impl PaginationConfig {
    /// Resolve the limit requested by a client.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `requested` is zero or larger than
    /// [PaginationConfig::max_limit].
    pub fn resolve_limit(&self, requested: Option<u32>) -> Result<u32, Error> {
        match requested {
            None => Ok(self.default_limit),
            Some(limit) if (1..=self.max_limit).contains(&limit) => Ok(limit),
            Some(limit) => Err(Error::Validation(format!(
                "limit must be between 1 and {}, got {limit}",
                self.max_limit
            ))),
        }
    }
}
