//! Conversions from external infrastructure errors into domain errors.
//!
//! Request-time HTTP failures never come through here; the transport reports
//! them as `TransportFailure` and the codec classifies them. What remains is
//! adapter setup (building the reqwest client) and keychain access.

use bullboard_common::security::KeychainError;
use bullboard_domain::BullboardError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BullboardError);

impl From<InfraError> for BullboardError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BullboardError> for InfraError {
    fn from(value: BullboardError) -> Self {
        InfraError(value)
    }
}

trait IntoBullboardError {
    fn into_bullboard(self) -> BullboardError;
}

/* -------------------------------------------------------------------------- */
/* KeychainError → BullboardError */
/* -------------------------------------------------------------------------- */

impl IntoBullboardError for KeychainError {
    fn into_bullboard(self) -> BullboardError {
        match self {
            KeychainError::NotFound => BullboardError::NotFound("keychain entry not found".into()),
            KeychainError::AccessFailed(message) => BullboardError::Security(message),
        }
    }
}

impl From<KeychainError> for InfraError {
    fn from(value: KeychainError) -> Self {
        InfraError(value.into_bullboard())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BullboardError (client construction) */
/* -------------------------------------------------------------------------- */

impl IntoBullboardError for HttpError {
    fn into_bullboard(self) -> BullboardError {
        if self.is_builder() {
            return BullboardError::Config(format!("HTTP client misconfigured: {self}"));
        }

        BullboardError::Internal(format!("HTTP client unavailable: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bullboard())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::Client;

    use super::*;

    #[test]
    fn keychain_not_found_maps_to_not_found() {
        let mapped: BullboardError = InfraError::from(KeychainError::NotFound).into();
        match mapped {
            BullboardError::NotFound(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn keychain_access_failure_maps_to_security() {
        let err = KeychainError::AccessFailed("locked".into());
        let mapped: BullboardError = InfraError::from(err).into();
        assert_eq!(mapped, BullboardError::Security("locked".into()));
    }

    #[test]
    fn builder_error_maps_to_config() {
        let error = Client::new().get("not a url").build().unwrap_err();
        assert!(error.is_builder());

        let mapped: BullboardError = InfraError::from(error).into();
        assert!(matches!(mapped, BullboardError::Config(msg) if msg.contains("misconfigured")));
    }
}
