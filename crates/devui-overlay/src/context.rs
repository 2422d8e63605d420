//! Explicit dependencies handed to every overlay.

use crate::scroll_lock::ScrollLock;
use devui_core::Host;
use std::rc::Rc;

/// The host an overlay renders into plus its shared scroll lock.
///
/// Overlays on one document must share one context so that their scroll
/// lock holds are counted together.
#[derive(Clone)]
pub struct OverlayContext {
    host: Rc<dyn Host>,
    scroll_lock: Rc<ScrollLock>,
}

impl OverlayContext {
    /// Create a context for a host.
    #[must_use]
    pub fn new(host: Rc<dyn Host>) -> Self {
        let scroll_lock = ScrollLock::new(Rc::clone(&host));
        Self { host, scroll_lock }
    }

    /// The host.
    #[must_use]
    pub const fn host(&self) -> &Rc<dyn Host> {
        &self.host
    }

    /// The shared scroll lock.
    #[must_use]
    pub const fn scroll_lock(&self) -> &Rc<ScrollLock> {
        &self.scroll_lock
    }
}
