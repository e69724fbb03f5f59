//! Read-only listing commands: stores, relay points, delivery modes.

use relaypick_client::DeliveryClient;
use relaypick_core::{relay_pricing_mode, Location};
use relaypick_flow::display::empty_directory_notice;
use relaypick_flow::{Directory, DirectoryKind};

/// Format optional coordinates, returning `"—"` when either is missing.
pub(crate) fn fmt_coords(location: &Location) -> String {
    match (location.latitude, location.longitude) {
        (Some(lat), Some(lng)) => format!("{lat:.5},{lng:.5}"),
        _ => "\u{2014}".to_string(),
    }
}

/// Print the stores or relay points as a table.
///
/// # Errors
///
/// Never fails on backend errors: a failed load prints the empty-list notice.
pub(crate) async fn run_list(client: &DeliveryClient, kind: DirectoryKind) -> anyhow::Result<()> {
    let mut directory = Directory::new(kind);
    directory.load(client).await;

    if directory.locations().is_empty() {
        println!("{}", empty_directory_notice(kind));
        return Ok(());
    }

    println!("{:<8}{:<32}{:<18}{:<16}COORDS", "ID", "NAME", "CITY", "REGION");
    for location in directory.locations() {
        println!(
            "{:<8}{:<32}{:<18}{:<16}{}",
            location.id,
            location.name,
            location.city.as_deref().unwrap_or("\u{2014}"),
            location.region.as_deref().unwrap_or("\u{2014}"),
            fmt_coords(location)
        );
    }
    Ok(())
}

/// Print the delivery modes and the pricing mode relay quotes will use.
///
/// # Errors
///
/// Returns an error if the delivery modes cannot be fetched.
pub(crate) async fn run_modes(client: &DeliveryClient) -> anyhow::Result<()> {
    let modes = client.list_delivery_modes().await?;
    if modes.is_empty() {
        println!("no delivery modes configured");
    } else {
        println!("{:<12}{:<18}LABEL", "ID", "CODE");
        for mode in &modes {
            println!(
                "{:<12}{:<18}{}",
                mode.id.to_string(),
                mode.code.as_deref().unwrap_or("\u{2014}"),
                mode.label
            );
        }
    }
    println!("relay pricing mode: {}", relay_pricing_mode(&modes));
    Ok(())
}
