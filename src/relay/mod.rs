//! Action relay: dashboard button → downstream service control call
//!
//! A manual action names a service and an action type. The service is looked
//! up in a static directory, the action is normalized to a target mode, and
//! the service is asked to switch to it with a bounded wait. The outcome is
//! written to the activity feed only after the call has finished, so the
//! store is never locked across network I/O.

mod action_relay;
mod directory;
mod error;
mod transport;

pub use action_relay::{ActionMode, ActionReceipt, ActionRelay};
pub use directory::ServiceDirectory;
pub use error::{DownstreamError, RelayError};
pub use transport::{ActionTransport, HttpTransport};
