//! Raw frame passthrough

use cardlab_apdu_core::utils::{from_hex, to_spaced_hex};
use cardlab_apdu_core::{CardTransport, Response};
use cardlab_engine::{AppletId, Simulator};
use tracing::info;

use crate::config::{BenchConfig, Service};
use crate::display::response_line;

/// Send each hex frame to a fresh simulator and print the responses
pub fn send_command(
    config: &BenchConfig,
    frames: &[String],
    select: Option<Service>,
) -> eyre::Result<()> {
    let mut card = Simulator::new(config.simulator_config())?;
    if let Some(service) = select {
        let id = card.select(AppletId::from(service).aid())?;
        info!("Selected {id}");
    }

    for frame in frames {
        let command = from_hex(frame)?;
        let raw = card.transmit_raw(&command)?;
        let response = Response::from_bytes(&raw)?;
        println!("{}", response_line(&to_spaced_hex(&command), &response));
    }

    Ok(())
}
