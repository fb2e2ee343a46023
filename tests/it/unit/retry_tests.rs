//! Unit tests for the retry policy.

use countryboard::constants::MAX_RETRY_DELAY;
use countryboard::data::{FetchError, RetryDecision, RetryPolicy};
use std::time::Duration;

#[test]
fn test_default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    assert_eq!(policy.delay_for(4), Duration::from_secs(2));
}

#[test]
fn test_transient_errors_retry_until_budget_spent() {
    let policy = RetryPolicy::fixed(3, Duration::from_millis(10));
    let retry = RetryDecision::RetryAfter(Duration::from_millis(10));

    assert_eq!(policy.decide(1, &FetchError::Timeout), retry);
    assert_eq!(policy.decide(2, &FetchError::ConnectionFailed("reset".into())), retry);
    assert_eq!(policy.decide(3, &FetchError::Timeout), RetryDecision::Fail);
}

#[test]
fn test_permanent_errors_fail_immediately() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.decide(1, &FetchError::HttpStatus(500)), RetryDecision::Fail);
    assert_eq!(
        policy.decide(1, &FetchError::InvalidPayload("not json".into())),
        RetryDecision::Fail
    );
}

#[test]
fn test_none_never_retries() {
    assert_eq!(RetryPolicy::none().decide(1, &FetchError::Timeout), RetryDecision::Fail);
}

#[test]
fn test_exponential_backoff_doubles_and_caps() {
    let policy = RetryPolicy::exponential(20, Duration::from_millis(500));
    assert_eq!(policy.delay_for(1), Duration::from_millis(500));
    assert_eq!(policy.delay_for(2), Duration::from_secs(1));
    assert_eq!(policy.delay_for(3), Duration::from_secs(2));
    assert_eq!(policy.delay_for(15), MAX_RETRY_DELAY);
    assert_eq!(policy.delay_for(u32::MAX), MAX_RETRY_DELAY);
}
