use std::cell::RefCell;
use std::rc::Rc;

/// How a pop-up chain ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupOutcome {
    Selected { menu: String, item: String },
    Dismissed,
}

/// Single-resolution handle returned by `MenuScreen::context_menu`. The
/// engine fills it exactly once, on selection or dismissal; the caller polls
/// it from its event loop. Cancellation is just the `Dismissed` value.
#[derive(Debug, Clone)]
pub struct PopupHandle {
    slot: Rc<RefCell<Option<PopupOutcome>>>,
}

impl PopupHandle {
    pub(crate) fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// First resolution wins; later calls are ignored.
    pub(crate) fn resolve(&self, outcome: PopupOutcome) {
        let mut slot = self.slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(outcome);
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Consume the outcome, if any. Returns `None` while the pop-up is still
    /// open, and after the outcome has already been taken.
    pub fn try_take(&self) -> Option<PopupOutcome> {
        self.slot.borrow_mut().take()
    }
}
