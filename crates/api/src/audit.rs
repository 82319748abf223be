//! Post-commit consumer for ledger events.

use mizan_core::ledger::LedgerEvent;
use mizan_core::tenant::TenantContext;
use tracing::info;

/// Emits one structured record per event on the `mizan::audit` target.
pub fn record(tenant: &TenantContext, events: &[LedgerEvent]) {
    for event in events {
        let entry_id = event.entry_id().map(|id| id.to_string());
        match event {
            LedgerEvent::EntryPosted { voucher_number, voucher_type, date, amount, .. } => info!(
                target: "mizan::audit",
                event = event.name(),
                schema = %tenant.schema,
                entry_id = entry_id.as_deref(),
                voucher = %voucher_number,
                voucher_type = voucher_type.as_str(),
                %date,
                %amount,
            ),
            LedgerEvent::EntryUpdated { voucher_number, amount, .. } => info!(
                target: "mizan::audit",
                event = event.name(),
                schema = %tenant.schema,
                entry_id = entry_id.as_deref(),
                voucher = %voucher_number,
                %amount,
            ),
            LedgerEvent::EntryFinalized { voucher_number, .. } => info!(
                target: "mizan::audit",
                event = event.name(),
                schema = %tenant.schema,
                entry_id = entry_id.as_deref(),
                voucher = %voucher_number,
            ),
            LedgerEvent::EntryReversed { original_id, reversal_voucher, .. } => info!(
                target: "mizan::audit",
                event = event.name(),
                schema = %tenant.schema,
                entry_id = entry_id.as_deref(),
                original_id = %original_id,
                voucher = %reversal_voucher,
            ),
            LedgerEvent::AccountDeactivated { ledger_id } => info!(
                target: "mizan::audit",
                event = event.name(),
                schema = %tenant.schema,
                ledger_id = %ledger_id,
            ),
        }
    }
}
