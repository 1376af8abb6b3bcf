use tracing::warn;

use crate::api_error::ApiError;

/// Gate for mutating endpoints: the request must echo the configured password.
///
/// There are no per-user credentials. Equal-length inputs are compared in constant time.
#[derive(Clone)]
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn verify(&self, provided: Option<&str>) -> Result<(), ApiError> {
        let provided = match provided {
            Some(p) if !p.is_empty() => p,
            _ => {
                warn!("Rejected request without a password");
                return Err(ApiError::Unauthorized);
            }
        };

        if !constant_time_eq(provided.as_bytes(), self.secret.as_bytes()) {
            warn!("Rejected request with a wrong password");
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret").finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
