//! Mock objects and fake implementations for testing
//!
//! Every mock is a cheap handle around shared state: keep one clone in the
//! test and hand a boxed clone to the adapter, then inspect what it recorded.

use crate::adapter::{AuthCallback, HostShell, Notice, ProviderSurface};
use crate::models::{FailureReason, NormalizedIdentity};
use crate::session::LaunchRequest;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// One invocation of the authentication callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackEvent {
    Success(NormalizedIdentity),
    Failure(FailureReason),
}

/// Callback that records every outcome it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingCallback {
    events: Arc<Mutex<Vec<CallbackEvent>>>,
}

impl RecordingCallback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed handle sharing this recorder's state
    #[must_use]
    pub fn boxed(&self) -> Box<dyn AuthCallback> {
        Box::new(self.clone())
    }

    #[must_use]
    pub fn events(&self) -> Vec<CallbackEvent> {
        lock(&self.events).clone()
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| matches!(e, CallbackEvent::Success(_)))
            .count()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|e| matches!(e, CallbackEvent::Failure(_)))
            .count()
    }
}

impl AuthCallback for RecordingCallback {
    fn on_success(&mut self, identity: NormalizedIdentity) {
        lock(&self.events).push(CallbackEvent::Success(identity));
    }

    fn on_failure(&mut self, reason: FailureReason) {
        lock(&self.events).push(CallbackEvent::Failure(reason));
    }
}

/// Provider surface that records launch requests instead of opening anything
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    launches: Arc<Mutex<Vec<LaunchRequest>>>,
    closed: Arc<Mutex<bool>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn boxed(&self) -> Box<dyn ProviderSurface> {
        Box::new(self.clone())
    }

    #[must_use]
    pub fn launches(&self) -> Vec<LaunchRequest> {
        lock(&self.launches).clone()
    }

    #[must_use]
    pub fn last_launch(&self) -> Option<LaunchRequest> {
        lock(&self.launches).last().cloned()
    }

    #[must_use]
    pub fn launch_count(&self) -> usize {
        lock(&self.launches).len()
    }

    #[must_use]
    pub fn was_closed(&self) -> bool {
        *lock(&self.closed)
    }
}

impl ProviderSurface for RecordingSurface {
    fn open(&mut self, request: &LaunchRequest) {
        lock(&self.launches).push(request.clone());
    }

    fn close(&mut self) {
        *lock(&self.closed) = true;
    }
}

/// Host shell that records notices
#[derive(Debug, Clone, Default)]
pub struct RecordingShell {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingShell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn boxed(&self) -> Box<dyn HostShell> {
        Box::new(self.clone())
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }
}

impl HostShell for RecordingShell {
    fn show_notice(&mut self, notice: &Notice) {
        lock(&self.notices).push(notice.clone());
    }
}
