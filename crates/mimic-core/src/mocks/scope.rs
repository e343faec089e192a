//! Nested undo points over a handler's registrations and flags.
//!
//! Each scope pushes a snapshot of the handler state on an explicit stack.
//! Ending the scope replaces the live state with that snapshot, discarding
//! everything done inside it. Snapshots share storage with the live state
//! until the first mutation, so opening a scope does not copy the map.

use crate::error::{MockError, MockResult};
use crate::mocks::handler::MockHandler;
use crate::mocks::store::OptionsState;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Scope ids are unique across handlers, so a token never matches a scope
/// on another handler or a clone.
static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to an open scope. Pass it back to [`MockHandler::end_scope`].
#[must_use = "a scope is only restored when its token is passed to `end_scope`"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeToken {
    id: u64,
}

impl ScopeToken {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug)]
pub(crate) struct ScopeFrame {
    id: u64,
    snapshot: OptionsState,
}

impl MockHandler {
    /// Open a scope and return its token.
    pub fn begin_scope(&mut self) -> ScopeToken {
        let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        self.scopes.push(ScopeFrame {
            id,
            snapshot: self.state.clone(),
        });
        debug!(scope = id, depth = self.scopes.len(), "Opened mock scope");
        ScopeToken { id }
    }

    /// Close the innermost scope, restoring the state captured when it opened.
    ///
    /// Fails with [`MockError::InvalidArgument`] if `token` is not open on
    /// this handler, and with [`MockError::ScopeOrder`] if it is open but not
    /// innermost. Nothing is restored in either case.
    pub fn end_scope(&mut self, token: ScopeToken) -> MockResult<()> {
        if !self.scopes.iter().any(|frame| frame.id == token.id) {
            return Err(MockError::invalid(format!(
                "scope #{} is not open on this handler",
                token.id
            )));
        }
        let Some(top) = self.scopes.last() else {
            return Err(MockError::invalid("no scope is open"));
        };
        if top.id != token.id {
            return Err(MockError::ScopeOrder {
                expected: top.id,
                found: token.id,
            });
        }

        if let Some(frame) = self.scopes.pop() {
            self.state = frame.snapshot;
        }
        debug!(scope = token.id, depth = self.scopes.len(), "Restored mock scope");
        Ok(())
    }

    /// Open a scope that is restored when the returned guard drops.
    ///
    /// The guard dereferences to the handler, so registrations made through
    /// it are undone on drop. Nested guards borrow their parent, which keeps
    /// releases in reverse order.
    pub fn scope(&mut self) -> ScopeGuard<'_> {
        let token = self.begin_scope();
        ScopeGuard {
            handler: self,
            token,
        }
    }

    /// Number of open scopes.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Restore the snapshot of `token`, closing it and any scope opened after it.
    fn unwind_to(&mut self, token: ScopeToken) {
        let Some(position) = self.scopes.iter().position(|frame| frame.id == token.id) else {
            return;
        };
        let leaked = self.scopes.len() - position - 1;
        if leaked > 0 {
            warn!(
                scope = token.id,
                leaked, "Closing mock scope with inner scopes still open"
            );
        }
        let mut frames = self.scopes.drain(position..);
        if let Some(frame) = frames.next() {
            self.state = frame.snapshot;
        }
        drop(frames);
        debug!(scope = token.id, depth = self.scopes.len(), "Restored mock scope");
    }
}

/// Scope that restores its handler on drop.
pub struct ScopeGuard<'a> {
    handler: &'a mut MockHandler,
    token: ScopeToken,
}

impl ScopeGuard<'_> {
    pub fn token(&self) -> ScopeToken {
        self.token
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = MockHandler;

    fn deref(&self) -> &MockHandler {
        self.handler
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut MockHandler {
        self.handler
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.handler.unwind_to(self.token);
    }
}
