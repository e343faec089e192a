//! Mock registration and dispatch.
//!
//! This module provides the registration/matching lifecycle:
//! - [`handler::MockHandler`]: registers responses and answers requests
//! - [`store`]: keyed registration storage with cheap snapshots
//! - [`scope`]: nested undo points over a handler
//! - [`response`]: builds responses from matched descriptors

pub mod handler;
pub mod response;
pub mod scope;
pub mod store;

use crate::types::descriptor::ResponseDescriptor;
use crate::types::request::MockRequest;

/// Lookup seam shared by the base handler and layered dispatchers.
pub trait Dispatch {
    /// Descriptor that should answer `request`, if any.
    fn find(&self, request: &MockRequest) -> Option<&ResponseDescriptor>;

    /// Whether a miss is reported as [`MissingRegistration`](crate::MockError::MissingRegistration).
    fn throw_on_missing_registration(&self) -> bool;
}
