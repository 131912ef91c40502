//! Host hook points.
//!
//! Two moments in the handshake accept host customization: just before the
//! login redirect is emitted, and just after a validated identity is
//! assembled. Hooks are registered in order, run in order, and see only
//! the context they are given.

use crate::claims::CasIdentity;
use crate::response::CasResponse;

/// Context passed to redirect hooks.
///
/// Hooks may rewrite `redirect_uri`, for example to append a locale hint.
#[derive(Debug, Clone)]
pub struct RedirectContext {
    /// The login redirect target about to be emitted.
    pub redirect_uri: String,

    /// Where the caller will return after the handshake.
    pub return_uri: String,
}

/// Context passed to ticket-created hooks.
///
/// Hooks may inspect the validation response and append or rewrite claims
/// on the identity before it is returned to the host.
pub struct CreatingTicketContext<'a> {
    /// The identity under construction.
    pub identity: &'a mut CasIdentity,

    /// The validation response the identity was built from.
    pub response: &'a CasResponse,
}

type RedirectHook = Box<dyn Fn(&mut RedirectContext) + Send + Sync>;
type CreatingTicketHook = Box<dyn Fn(&mut CreatingTicketContext<'_>) + Send + Sync>;

/// Ordered hook registrations for the handshake.
#[derive(Default)]
pub struct CasEvents {
    redirect_hooks: Vec<RedirectHook>,
    creating_ticket_hooks: Vec<CreatingTicketHook>,
}

impl CasEvents {
    /// Creates an empty registration set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hook invoked before the login redirect is emitted.
    #[must_use]
    pub fn on_redirect<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut RedirectContext) + Send + Sync + 'static,
    {
        self.redirect_hooks.push(Box::new(hook));
        self
    }

    /// Registers a hook invoked after a validated identity is assembled.
    #[must_use]
    pub fn on_creating_ticket<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut CreatingTicketContext<'_>) + Send + Sync + 'static,
    {
        self.creating_ticket_hooks.push(Box::new(hook));
        self
    }

    pub(crate) fn fire_redirect(&self, context: &mut RedirectContext) {
        for hook in &self.redirect_hooks {
            hook(context);
        }
    }

    pub(crate) fn fire_creating_ticket(&self, context: &mut CreatingTicketContext<'_>) {
        for hook in &self.creating_ticket_hooks {
            hook(context);
        }
    }
}
