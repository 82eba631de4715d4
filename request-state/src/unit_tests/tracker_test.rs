use crate::mock::MockFactory;
use crate::unit_tests::TestError;
use crate::{RequestTracker, RetryError};
use futures::{FutureExt, StreamExt};

#[tokio::test]
async fn test_subscriptions_are_independent() {
    let mock = MockFactory::<String, TestError>::new();
    let tracker = RequestTracker::new(mock.factory());

    let mut first = tracker.subscribe();
    let mut second = tracker.subscribe();
    assert_eq!(mock.calls(), 0);

    assert!(first.next().await.unwrap().is_loading());
    assert!(second.next().await.unwrap().is_loading());
    assert_eq!(mock.calls(), 2);

    assert!(mock.resolve(1, Err(TestError::failed("first only"))));
    let failed = first.next().await.unwrap();
    assert!(failed.has_error());
    assert!(second.next().now_or_never().is_none());

    failed.retry().unwrap();
    let retried = first.next().await.unwrap();
    assert!(retried.is_loading());
    assert_eq!(retried.attempt, 2);
    assert_eq!(mock.calls(), 3);
    assert!(second.next().now_or_never().is_none());

    assert!(mock.resolve(2, Ok("second".to_string())));
    let state = second.next().await.unwrap();
    assert_eq!(state.result(), Some(&"second".to_string()));
    assert_eq!(state.attempt, 1);
    assert_ne!(state.retry_handle(), retried.retry_handle());
}

#[tokio::test]
async fn test_dropping_one_subscription_keeps_the_other() {
    let mock = MockFactory::<u8, TestError>::new();
    let tracker = RequestTracker::new(mock.factory());
    let mut first = tracker.subscribe();
    let mut second = tracker.subscribe();
    let first_loading = first.next().await.unwrap();
    second.next().await.unwrap();

    drop(first);
    assert!(mock.is_abandoned(1));
    assert_eq!(first_loading.retry(), Err(RetryError::Closed));

    assert!(mock.succeed(7));
    assert_eq!(second.next().await.unwrap().result(), Some(&7));
}

#[tokio::test]
async fn test_cloned_tracker_shares_factory() {
    let mock = MockFactory::<u8, TestError>::new();
    let tracker = RequestTracker::new(mock.factory());
    let cloned = tracker.clone();

    tracker.subscribe().next().await.unwrap();
    cloned.subscribe().next().await.unwrap();
    assert_eq!(mock.calls(), 2);
}
