use anyhow::{Result, bail};
use common::LatLng;
use compute::location::{LocationPicker, lookup};
use serde::Serialize;
use tracing::trace;

use super::Context;

#[derive(Debug, Serialize)]
pub struct Located {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

pub async fn locate(ctx: &Context, lat: f64, lon: f64) -> Result<()> {
    trace!("Entering locate command");
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("Coordinate out of range: {}, {}", lat, lon);
    }

    let geocoder = ctx.geocoder()?;
    let mut picker = LocationPicker::default();
    let ticket = picker.select(LatLng::new(lat, lon));
    let (ticket, outcome) = lookup(&geocoder, ticket).await;

    let Some(address) = picker.settle(ticket, outcome).map(str::to_string) else {
        bail!("No address found for {}, {}", lat, lon);
    };

    let located = Located { lat, lng: lon, address };
    ctx.format.print(&located, |l| l.address.clone())
}
