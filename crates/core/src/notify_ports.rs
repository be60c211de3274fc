//! Port for user-facing notices

use idlerig_domain::Notice;

/// Delivers notices to whatever front end is attached. Delivery is best
/// effort and never fails the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
