//! Default event consumers: log each verified resource with its key fields.
//!
//! Real deployments register their own handlers; these keep the receiver
//! useful out of the box and show the typed projection for every prefix.

use martian_pay::resources::{PaymentIntent, Payout, Payroll, PayrollItem, Refund};
use martian_pay::{Dispatcher, Event, WebhookError};

fn log_payment_intent(event: &Event, pi: PaymentIntent) -> Result<(), WebhookError> {
    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        payment_intent = %pi.id,
        amount = %pi.amount,
        currency = %pi.currency,
        status = %pi.status,
        "payment intent event"
    );
    Ok(())
}

fn log_refund(event: &Event, refund: Refund) -> Result<(), WebhookError> {
    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        refund = %refund.id,
        payment_intent = refund.payment_intent.as_deref().unwrap_or(""),
        amount = %refund.amount,
        status = %refund.status,
        "refund event"
    );
    Ok(())
}

fn log_payout(event: &Event, payout: Payout) -> Result<(), WebhookError> {
    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        payout = %payout.id,
        amount = %payout.amount,
        status = %payout.status,
        tx = payout.tx_hash.as_deref().unwrap_or(""),
        "payout event"
    );
    Ok(())
}

fn log_payroll(event: &Event, payroll: Payroll) -> Result<(), WebhookError> {
    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        payroll = %payroll.id,
        items = payroll.item_count,
        total = %payroll.total_amount,
        status = %payroll.status,
        "payroll event"
    );
    Ok(())
}

fn log_payroll_item(event: &Event, item: PayrollItem) -> Result<(), WebhookError> {
    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        payroll_item = %item.id,
        payroll = item.payroll.as_deref().unwrap_or(""),
        amount = %item.amount,
        status = %item.status,
        "payroll item event"
    );
    Ok(())
}

/// Dispatcher with a logging handler for every known resource prefix.
pub fn default_dispatcher() -> Dispatcher {
    Dispatcher::builder()
        .on_object(log_payment_intent)
        .on_object(log_refund)
        .on_object(log_payout)
        .on_object(log_payroll)
        .on_object(log_payroll_item)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_resource_prefix() {
        let dispatcher = default_dispatcher();
        let mut prefixes: Vec<_> = dispatcher.prefixes().collect();
        prefixes.sort();
        assert_eq!(
            prefixes,
            vec![
                "payment_intent.",
                "payout.",
                "payroll.",
                "payroll_item.",
                "refund."
            ]
        );
        assert_eq!(dispatcher.route_for("payroll_item.failed"), Some("payroll_item."));
    }
}
