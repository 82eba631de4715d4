use crate::retry::RetryScope;
use crate::unit_tests::TestError;
use crate::{RequestState, RequestStatus, RetryError};

#[test]
fn test_loading_state() {
    let scope = RetryScope::new();
    let state: RequestState<u8, TestError> =
        RequestState::new(RequestStatus::loading(), 1, scope.handle());
    assert!(state.is_loading());
    assert!(!state.is_success());
    assert!(!state.has_error());
    assert!(!state.is_settled());
    assert_eq!(state.result(), None);
    assert_eq!(state.error(), None);
    assert_eq!(state.retry(), Err(RetryError::NotArmed));
}

#[test]
fn test_success_state() {
    let scope = RetryScope::new();
    let state: RequestState<u8, TestError> =
        RequestState::new(RequestStatus::success(4), 2, scope.handle());
    assert!(!state.is_loading());
    assert!(state.is_success());
    assert!(!state.has_error());
    assert!(state.is_settled());
    assert_eq!(state.result(), Some(&4));
    assert_eq!(state.error(), None);
    assert_eq!(state.attempt, 2);
    assert_eq!(state.into_status(), RequestStatus::success(4));
}

#[test]
fn test_error_state_retries_through_handle() {
    let scope = RetryScope::new();
    let _waiter = scope.arm();
    let error = TestError::failed("oh no");
    let state: RequestState<u8, TestError> =
        RequestState::new(RequestStatus::error(error.clone()), 1, scope.handle());
    assert!(state.has_error());
    assert!(state.is_settled());
    assert_eq!(state.result(), None);
    assert_eq!(state.error(), Some(&error));
    assert_eq!(state.error().map(ToString::to_string), Some("oh no".to_string()));

    assert_eq!(state.retry(), Ok(()));
    assert_eq!(state.retry(), Err(RetryError::NotArmed));
}

#[test]
fn test_states_compare_retry_scope() {
    let scope = RetryScope::new();
    let other = RetryScope::new();
    let first: RequestState<u8, TestError> =
        RequestState::new(RequestStatus::loading(), 1, scope.handle());
    let same: RequestState<u8, TestError> =
        RequestState::new(RequestStatus::loading(), 1, scope.handle());
    let foreign: RequestState<u8, TestError> =
        RequestState::new(RequestStatus::loading(), 1, other.handle());

    assert_eq!(first, same);
    assert_ne!(first, foreign);
}

#[cfg(feature = "serde")]
#[test]
fn test_request_status_serde() {
    use serde_json;

    let loading: RequestStatus<u8, String> = RequestStatus::loading();
    let serialized = serde_json::to_string(&loading).unwrap();
    assert_eq!(serialized, r#""loading""#);

    let success: RequestStatus<u8, String> = RequestStatus::success(3);
    let serialized = serde_json::to_string(&success).unwrap();
    assert_eq!(serialized, r#"{"success":{"value":3}}"#);
    let deserialized: RequestStatus<u8, String> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, success);

    let error: RequestStatus<u8, String> = RequestStatus::error("oh no".to_string());
    let serialized = serde_json::to_string(&error).unwrap();
    assert_eq!(serialized, r#"{"error":{"error":"oh no"}}"#);
    let deserialized: RequestStatus<u8, String> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, error);
}
