#![forbid(unsafe_code)]

//! Pending keyguard-bouncer callbacks.
//!
//! Holds the actions to run once the bouncer is dismissed or cancelled.
//! Nothing in the assertion engine reads these; scenarios that drive a
//! lock-screen transition keep them alongside their context.

use std::fmt;
use std::sync::Arc;

/// Runs after a successful dismissal. Returns whether it deferred the
/// dismissal to a later step.
pub type DismissAction = Arc<dyn Fn() -> bool + Send + Sync>;

/// Runs when the bouncer is cancelled.
pub type CancelAction = Arc<dyn Fn() + Send + Sync>;

/// Optional on-dismiss and cancel handles.
#[derive(Clone, Default)]
pub struct BouncerCallbackActions {
    on_dismiss_action: Option<DismissAction>,
    cancel_action: Option<CancelAction>,
}

impl BouncerCallbackActions {
    pub fn new(
        on_dismiss_action: Option<DismissAction>,
        cancel_action: Option<CancelAction>,
    ) -> Self {
        Self {
            on_dismiss_action,
            cancel_action,
        }
    }

    pub fn on_dismiss_action(&self) -> Option<&DismissAction> {
        self.on_dismiss_action.as_ref()
    }

    pub fn cancel_action(&self) -> Option<&CancelAction> {
        self.cancel_action.as_ref()
    }

    /// Invoke the dismiss action if one is set.
    pub fn dismiss(&self) -> Option<bool> {
        self.on_dismiss_action.as_ref().map(|action| action())
    }

    /// Invoke the cancel action. Returns `false` when none is set.
    pub fn cancel(&self) -> bool {
        match &self.cancel_action {
            Some(action) => {
                action();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for BouncerCallbackActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BouncerCallbackActions")
            .field("on_dismiss_action", &self.on_dismiss_action.is_some())
            .field("cancel_action", &self.cancel_action.is_some())
            .finish()
    }
}
