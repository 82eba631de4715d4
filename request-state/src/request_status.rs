#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of a single request attempt.
///
/// Exactly one variant holds at a time: a value is only present on `Success`,
/// an error is only present on `Error`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RequestStatus<T, E> {
    Loading,
    Success { value: T },
    Error { error: E },
}

impl<T, E> RequestStatus<T, E> {
    pub fn loading() -> Self {
        RequestStatus::Loading
    }

    pub fn success(value: T) -> Self {
        RequestStatus::Success { value }
    }

    pub fn error(error: E) -> Self {
        RequestStatus::Error { error }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestStatus::Success { .. })
    }

    pub fn has_error(&self) -> bool {
        matches!(self, RequestStatus::Error { .. })
    }

    /// True once the attempt has an outcome, either a value or an error.
    pub fn is_settled(&self) -> bool {
        matches!(self, RequestStatus::Success { .. } | RequestStatus::Error { .. })
    }

    pub fn value_ref(&self) -> Option<&T> {
        match self {
            RequestStatus::Success { value } => Some(value),
            _ => None,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            RequestStatus::Success { value } => Some(value),
            _ => None,
        }
    }

    pub fn error_ref(&self) -> Option<&E> {
        match self {
            RequestStatus::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<E> {
        match self {
            RequestStatus::Error { error } => Some(error),
            _ => None,
        }
    }

    /// Converts a settled status back into the operation's outcome.
    /// Returns `None` while loading.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            RequestStatus::Loading => None,
            RequestStatus::Success { value } => Some(Ok(value)),
            RequestStatus::Error { error } => Some(Err(error)),
        }
    }
}

impl<T, E> Default for RequestStatus<T, E> {
    fn default() -> Self {
        RequestStatus::Loading
    }
}

impl<T, E> From<Result<T, E>> for RequestStatus<T, E> {
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => RequestStatus::Success { value },
            Err(error) => RequestStatus::Error { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading() {
        let loading: RequestStatus<i32, String> = RequestStatus::default();
        assert!(loading.is_loading());
        assert!(!loading.is_success());
        assert!(!loading.has_error());
        assert!(!loading.is_settled());
        assert!(loading.value_ref().is_none());
        assert!(loading.error_ref().is_none());
        assert_eq!(loading.into_result(), None);
    }

    #[test]
    fn test_success() {
        let success: RequestStatus<i32, String> = RequestStatus::success(8);
        assert!(!success.is_loading());
        assert!(success.is_success());
        assert!(!success.has_error());
        assert!(success.is_settled());
        assert_eq!(success.value_ref(), Some(&8));
        assert!(success.error_ref().is_none());
        assert_eq!(success.clone().value(), Some(8));
        assert_eq!(success.into_result(), Some(Ok(8)));
    }

    #[test]
    fn test_error() {
        let error: RequestStatus<i32, String> = RequestStatus::error("oh no".to_string());
        assert!(!error.is_loading());
        assert!(!error.is_success());
        assert!(error.has_error());
        assert!(error.is_settled());
        assert!(error.value_ref().is_none());
        assert_eq!(error.error_ref().map(String::as_str), Some("oh no"));
        assert_eq!(error.clone().into_error(), Some("oh no".to_string()));
        assert_eq!(error.into_result(), Some(Err("oh no".to_string())));
    }

    #[test]
    fn test_from_result() {
        let ok: Result<u8, &str> = Ok(1);
        assert_eq!(RequestStatus::from(ok), RequestStatus::success(1));

        let err: Result<u8, &str> = Err("failed");
        assert_eq!(RequestStatus::from(err), RequestStatus::error("failed"));
    }
}
