//! Outbound mail handoff.
//!
//! Delivery itself is external. Handlers pass messages to a [`Mailer`]; the
//! default [`OutboxMailer`] writes them to the `mizan::mail` target where the
//! delivery process picks them up.

use mizan_core::tenant::VerificationNotice;
use tracing::info;

/// Accepts messages for delivery.
pub trait Mailer: Send + Sync + 'static {
    /// Queues the owner verification message of a new workspace.
    fn send_verification(&self, notice: &VerificationNotice);
}

/// Writes each message as a structured record on `mizan::mail`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutboxMailer;

impl Mailer for OutboxMailer {
    fn send_verification(&self, notice: &VerificationNotice) {
        info!(
            target: "mizan::mail",
            kind = "verify_email",
            to = %notice.to,
            workspace = %notice.workspace,
            url = %notice.url,
            "Verification e-mail queued"
        );
    }
}
