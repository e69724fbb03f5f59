//! Failure policy for delivery-fee requests.
//!
//! Maps a failed fee call to what the caller should do next. The mapping is a
//! plain table on the HTTP status so it can be checked on its own:
//!
//! | Status / error          | Action                 |
//! |-------------------------|------------------------|
//! | 400, 422                | [`FailureAction::RetryWithoutStore`] |
//! | 401, 403, missing token | [`FailureAction::FailSession`]       |
//! | anything else           | [`FailureAction::FailPermanent`]     |

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// No pricing rule for this store; ask again for default pricing.
    RetryWithoutStore,
    /// The session is gone; stop all fee work until the user signs in again.
    FailSession,
    /// Give up on this location only.
    FailPermanent,
}

#[must_use]
pub fn action_for_status(status: u16) -> FailureAction {
    match status {
        400 | 422 => FailureAction::RetryWithoutStore,
        401 | 403 => FailureAction::FailSession,
        _ => FailureAction::FailPermanent,
    }
}

/// Classifies a client error. Errors without a status (network failures,
/// undecodable bodies) are permanent for the location.
#[must_use]
pub fn failure_action(err: &ClientError) -> FailureAction {
    match err {
        ClientError::MissingToken => FailureAction::FailSession,
        other => other
            .status()
            .map_or(FailureAction::FailPermanent, action_for_status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_err(status: u16) -> ClientError {
        ClientError::Status {
            status,
            url: "http://localhost/api/delivery-fees/calculate".to_owned(),
        }
    }

    #[test]
    fn pricing_rule_gaps_retry_without_store() {
        assert_eq!(action_for_status(400), FailureAction::RetryWithoutStore);
        assert_eq!(action_for_status(422), FailureAction::RetryWithoutStore);
    }

    #[test]
    fn auth_failures_end_the_session() {
        assert_eq!(action_for_status(401), FailureAction::FailSession);
        assert_eq!(action_for_status(403), FailureAction::FailSession);
        assert_eq!(
            failure_action(&ClientError::MissingToken),
            FailureAction::FailSession
        );
    }

    #[test]
    fn other_statuses_are_permanent() {
        for status in [404, 409, 429, 500, 502, 503] {
            assert_eq!(
                action_for_status(status),
                FailureAction::FailPermanent,
                "status {status}"
            );
        }
    }

    #[test]
    fn classifies_status_errors_through_the_table() {
        assert_eq!(
            failure_action(&status_err(422)),
            FailureAction::RetryWithoutStore
        );
        assert_eq!(failure_action(&status_err(403)), FailureAction::FailSession);
        assert_eq!(failure_action(&status_err(500)), FailureAction::FailPermanent);
    }

    #[test]
    fn errors_without_status_are_permanent() {
        let source = serde_json::from_str::<()>("invalid").unwrap_err();
        let err = ClientError::Deserialize {
            context: "test".to_owned(),
            source,
        };
        assert_eq!(failure_action(&err), FailureAction::FailPermanent);
        assert_eq!(
            failure_action(&ClientError::Unsuccessful("fee".to_owned())),
            FailureAction::FailPermanent
        );
    }
}
