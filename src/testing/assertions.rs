//! Custom assertion helpers for callback outcomes

use crate::models::{FailureReason, NormalizedIdentity};
use crate::testing::mock::{CallbackEvent, RecordingCallback};

/// Assert that exactly one callback fired and it was a success; returns the identity
///
/// # Panics
///
/// Panics if the callback saw anything other than a single success.
#[must_use]
pub fn assert_single_success(callback: &RecordingCallback) -> NormalizedIdentity {
    match callback.events().as_slice() {
        [CallbackEvent::Success(identity)] => identity.clone(),
        other => panic!("Expected exactly one success callback, got {other:?}"),
    }
}

/// Assert that exactly one callback fired and it was a failure; returns the reason
///
/// # Panics
///
/// Panics if the callback saw anything other than a single failure.
#[must_use]
pub fn assert_single_failure(callback: &RecordingCallback) -> FailureReason {
    match callback.events().as_slice() {
        [CallbackEvent::Failure(reason)] => reason.clone(),
        other => panic!("Expected exactly one failure callback, got {other:?}"),
    }
}

/// Assert that no callback fired
///
/// # Panics
///
/// Panics if the callback recorded any event.
pub fn assert_no_callback(callback: &RecordingCallback) {
    let events = callback.events();
    assert!(events.is_empty(), "Expected no callbacks, got {events:?}");
}
