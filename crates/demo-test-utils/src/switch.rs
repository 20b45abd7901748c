//! [`SwitchRecorder`] for observing variant switch requests.

use std::cell::RefCell;
use std::rc::Rc;

/// Records every variant an engine asks its host to activate.
///
/// Clones share the same log, so the test keeps one handle while the
/// engine owns the requester closure.
#[derive(Debug, Clone, Default)]
pub struct SwitchRecorder {
    requests: Rc<RefCell<Vec<String>>>,
}

impl SwitchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A requester closure appending to this recorder.
    pub fn requester(&self) -> impl FnMut(&str) + 'static {
        let requests = Rc::clone(&self.requests);
        move |variant: &str| requests.borrow_mut().push(variant.to_string())
    }

    /// Every requested variant, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.requests.borrow().last().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }
}
