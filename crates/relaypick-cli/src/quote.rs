//! `quote` command: run the delivery step for a cart and print every fee.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use relaypick_client::DeliveryClient;
use relaypick_core::CartSnapshot;
use relaypick_flow::display::{
    empty_directory_notice, fee_label, format_amount, SESSION_EXPIRED_NOTICE,
};
use relaypick_flow::{BatchOutcome, CheckoutDelivery, DeliveryKind, FeeState, SkipReason};

use crate::QuoteMode;

/// Read a cart snapshot from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub(crate) fn load_cart(path: &Path) -> anyhow::Result<CartSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read cart file {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse cart file {}", path.display()))
}

fn skip_message(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::CartNotPriceable => "cart is empty or has no total; fees not requested",
        SkipReason::NoDeliveryModes => "backend returned no delivery modes; fees not requested",
        SkipReason::SessionExpired => SESSION_EXPIRED_NOTICE,
    }
}

/// Open `mode` for the cart in `cart_path`, print each location with its
/// fee, and optionally select one.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or `select` names a location
/// that is not listed.
pub(crate) async fn run_quote(
    client: Arc<DeliveryClient>,
    cart_path: &Path,
    mode: QuoteMode,
    select: Option<i64>,
) -> anyhow::Result<()> {
    let cart = load_cart(cart_path)?;
    let kind = match mode {
        QuoteMode::Pickup => DeliveryKind::Pickup,
        QuoteMode::RelayPoint => DeliveryKind::RelayPoint,
    };

    if kind == DeliveryKind::RelayPoint && !client.has_token() {
        tracing::warn!("RELAYPICK_AUTH_TOKEN is not set, relay point fees will be refused");
    }

    let modes = if kind == DeliveryKind::RelayPoint {
        client.list_delivery_modes().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load delivery modes");
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let mut checkout = CheckoutDelivery::new(client);
    checkout.set_delivery_modes(modes).await;
    checkout.update_cart(Some(cart)).await;
    let outcome = checkout.switch_mode(kind).await;

    if checkout.session_expired() {
        println!("{SESSION_EXPIRED_NOTICE}");
        return Ok(());
    }
    if let Some(BatchOutcome::Skipped(reason)) = outcome {
        println!("{}", skip_message(reason));
    }

    let Some(picker) = checkout.picker() else {
        return Ok(());
    };
    let directory = picker.directory();
    if directory.locations().is_empty() {
        println!("{}", empty_directory_notice(directory.kind()));
        return Ok(());
    }

    println!("{:<8}{:<48}FEE", "ID", "LOCATION");
    for location in directory.locations() {
        println!(
            "{:<8}{:<48}{}",
            location.id,
            location.summary(),
            fee_label(picker.fee_state(location.id))
        );
    }

    if let Some(id) = select {
        let event = checkout.select(id)?;
        let fee = match event.fee_state {
            FeeState::Resolved(Some(_)) => format_amount(event.fee),
            _ => format!("{} (fee not known yet)", format_amount(event.fee)),
        };
        println!("selected {} for {}: {fee}", event.location.name, event.kind);
    }
    Ok(())
}
