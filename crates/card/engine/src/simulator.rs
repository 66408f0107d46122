//! In-process card hosting both services
//!
//! The simulator routes SELECT by AID, hands every other frame to the active
//! service and guarantees that a service is deselected exactly once each time
//! it stops being active.

use std::fmt;

use bytes::Bytes;
use cardlab_apdu_core::utils::to_spaced_hex;
use cardlab_apdu_core::{CardTransport, Response, TransportError};
use tracing::{debug, info};

use crate::apdu::ApduBuffer;
use crate::applet::{Applet, error_response, process};
use crate::applets::{CryptoTestApplet, Rsa1024Applet};
use crate::constants::{cla, ins};
use crate::{Error, Result};

/// Services installed on the simulated card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppletId {
    CryptoTest,
    Rsa1024,
}

impl AppletId {
    pub const fn aid(self) -> &'static [u8] {
        match self {
            Self::CryptoTest => CryptoTestApplet::AID,
            Self::Rsa1024 => Rsa1024Applet::AID,
        }
    }

    pub fn from_aid(aid: &[u8]) -> Option<Self> {
        [Self::CryptoTest, Self::Rsa1024]
            .into_iter()
            .find(|id| id.aid() == aid)
    }
}

impl fmt::Display for AppletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CryptoTest => f.write_str(CryptoTestApplet::NAME),
            Self::Rsa1024 => f.write_str(Rsa1024Applet::NAME),
        }
    }
}

/// Configuration options for the simulator
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Service selected after every power-up, if any
    pub auto_select: Option<AppletId>,

    /// Log every frame at debug level
    pub log_frames: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            auto_select: None,
            log_frames: true,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the service selected on power-up
    pub const fn with_auto_select(mut self, applet: Option<AppletId>) -> Self {
        self.auto_select = applet;
        self
    }

    /// Set whether frames are logged
    pub const fn with_log_frames(mut self, log_frames: bool) -> Self {
        self.log_frames = log_frames;
        self
    }
}

/// Simulated card with both services installed
pub struct Simulator {
    config: SimulatorConfig,
    crypto_test: CryptoTestApplet,
    rsa1024: Rsa1024Applet,
    selected: Option<AppletId>,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("config", &self.config)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Install both services and power up
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        let mut simulator = Self {
            crypto_test: CryptoTestApplet::install(),
            rsa1024: Rsa1024Applet::install()?,
            selected: None,
            config,
        };
        simulator.power_up()?;
        info!(selected = ?simulator.selected, "Simulator ready");
        Ok(simulator)
    }

    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub const fn selected(&self) -> Option<AppletId> {
        self.selected
    }

    pub const fn crypto_test(&self) -> &CryptoTestApplet {
        &self.crypto_test
    }

    pub const fn rsa1024(&self) -> &Rsa1024Applet {
        &self.rsa1024
    }

    /// Make the service with `aid` active, deselecting the current one first
    pub fn select(&mut self, aid: &[u8]) -> Result<AppletId> {
        let id = AppletId::from_aid(aid).ok_or_else(|| Error::AppletNotFound(aid.to_vec()))?;
        self.deselect();

        match id {
            AppletId::CryptoTest => self.crypto_test.select(),
            AppletId::Rsa1024 => self.rsa1024.select(),
        }
        self.selected = Some(id);
        debug!(applet = %id, "Selected");
        Ok(id)
    }

    /// Deactivate the current service; a no-op when none is active
    pub fn deselect(&mut self) {
        if let Some(id) = self.selected.take() {
            match id {
                AppletId::CryptoTest => self.crypto_test.deselect(),
                AppletId::Rsa1024 => self.rsa1024.deselect(),
            }
            debug!(applet = %id, "Deselected");
        }
    }

    /// Deselect, then select the configured service again
    pub fn power_cycle(&mut self) -> Result<()> {
        self.deselect();
        self.power_up()
    }

    fn power_up(&mut self) -> Result<()> {
        if let Some(id) = self.config.auto_select {
            self.select(id.aid())?;
        }
        Ok(())
    }

    /// Process one raw frame and return the response
    pub fn process_frame(&mut self, frame: &[u8]) -> Response {
        if self.config.log_frames {
            debug!(frame = %to_spaced_hex(frame), "Command");
        }

        let response = match ApduBuffer::from_frame(frame) {
            Ok(mut apdu) => self.route(&mut apdu),
            Err(e) => error_response("Simulator", &e),
        };

        if self.config.log_frames {
            debug!(response = %to_spaced_hex(&response.to_bytes()), "Response");
        }
        response
    }

    fn route(&mut self, apdu: &mut ApduBuffer) -> Response {
        if is_select(apdu) {
            return match self.select(apdu.incoming()) {
                Ok(_) => apdu.response(0),
                Err(e) => error_response("Simulator", &e),
            };
        }

        match self.selected {
            Some(AppletId::CryptoTest) => process(&mut self.crypto_test, apdu),
            Some(AppletId::Rsa1024) => process(&mut self.rsa1024, apdu),
            None => error_response("Simulator", &Error::NoAppletSelected),
        }
    }
}

fn is_select(apdu: &ApduBuffer) -> bool {
    apdu.cla() == cla::ISO7816 && apdu.ins() == ins::SELECT && apdu.p1() == ins::SELECT_BY_NAME
}

impl CardTransport for Simulator {
    fn do_transmit_raw(&mut self, command: &[u8]) -> std::result::Result<Bytes, TransportError> {
        Ok(self.process_frame(command).into())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn reset(&mut self) -> std::result::Result<(), TransportError> {
        self.power_cycle()
            .map_err(|e| TransportError::other(e.to_string()))
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        self.deselect();
    }
}

#[cfg(test)]
mod tests {
    use cardlab_apdu_core::Command;

    use super::*;
    use crate::constants::{CRYPTO_TEST_AID, RSA1024_AID};

    fn simulator() -> Simulator {
        Simulator::new(SimulatorConfig::new()).unwrap()
    }

    #[test]
    fn test_no_applet_selected() {
        let mut sim = simulator();
        let response = sim.process_frame(&[0xB0, 0x53, 0x00, 0x00]);
        assert_eq!(response.status().to_u16(), 0x6985);
    }

    #[test]
    fn test_select_unknown_aid() {
        let mut sim = simulator();
        let response = sim.transmit(&Command::select(&[0xA0, 0x00, 0x00])).unwrap();
        assert_eq!(response.status().to_u16(), 0x6A82);
        assert_eq!(sim.selected(), None);
    }

    #[test]
    fn test_select_routes_by_aid() {
        let mut sim = simulator();
        assert!(sim.transmit(&Command::select(RSA1024_AID)).unwrap().is_success());
        assert_eq!(sim.selected(), Some(AppletId::Rsa1024));

        // 0x26 exists only in the crypto-primitives table
        let response = sim.process_frame(&[0xB1, 0x26, 0x00, 0x00]);
        assert_eq!(response.status().to_u16(), 0x6D00);

        // Class of the inactive service
        let response = sim.process_frame(&[0xB0, 0x26, 0x00, 0x00]);
        assert_eq!(response.status().to_u16(), 0x6E00);
    }

    #[test]
    fn test_malformed_frame() {
        let mut sim = simulator();
        let response = sim.process_frame(&[0xB0, 0x53]);
        assert_eq!(response.status().to_u16(), 0x6700);
    }

    #[test]
    fn test_auto_select_and_reset() {
        let config = SimulatorConfig::new().with_auto_select(Some(AppletId::CryptoTest));
        let mut sim = Simulator::new(config).unwrap();
        assert_eq!(sim.selected(), Some(AppletId::CryptoTest));

        sim.select(RSA1024_AID).unwrap();
        sim.reset().unwrap();
        assert_eq!(sim.selected(), Some(AppletId::CryptoTest));
    }

    #[test]
    fn test_deselect_twice_is_a_no_op() {
        let mut sim = simulator();
        sim.select(CRYPTO_TEST_AID).unwrap();
        sim.deselect();
        sim.deselect();
        assert_eq!(sim.selected(), None);
    }
}
