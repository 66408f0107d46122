mod bench;
mod run;
mod send;

pub use bench::bench_command;
pub use run::run_command;
pub use send::send_command;

use cardlab_apdu_core::{CardTransport, Command, Response};
use cardlab_engine::Simulator;

use crate::display::response_line;

/// Transmit one command, print the outcome and count failures
struct Session {
    card: Simulator,
    failures: usize,
}

impl Session {
    const fn new(card: Simulator) -> Self {
        Self { card, failures: 0 }
    }

    fn step(&mut self, label: &str, command: &Command) -> eyre::Result<Response> {
        let response = self.card.transmit(command)?;
        if !response.is_success() {
            self.failures += 1;
        }
        println!("{}", response_line(label, &response));
        Ok(response)
    }

    /// Transmit without printing; the command must succeed
    fn quiet(&mut self, command: &Command) -> eyre::Result<Vec<u8>> {
        Ok(self.card.transmit(command)?.into_payload()?.to_vec())
    }

    /// Payload of a step that must succeed
    fn expect(&mut self, label: &str, command: &Command) -> eyre::Result<Vec<u8>> {
        let response = self.step(label, command)?;
        if !response.is_success() {
            eyre::bail!("{label} failed with status {}", response.status());
        }
        Ok(response.payload().to_vec())
    }
}
