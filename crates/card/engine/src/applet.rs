//! Service trait and command dispatch
//!
//! Each service declares its own closed instruction set. Instruction bytes are
//! only ever resolved against the active service's table, so the same byte can
//! mean different operations in different services.

use std::fmt;

use cardlab_apdu_core::{Response, StatusWord};
use tracing::{Level, debug, event};

use crate::apdu::ApduBuffer;
use crate::{Error, Result};

/// A service's instruction table
pub trait Instruction: Sized + Copy + fmt::Debug + 'static {
    /// Every instruction the service answers
    const ALL: &'static [Self];

    /// The INS byte for this instruction
    fn code(self) -> u8;

    /// Resolve an INS byte against this table
    fn from_ins(ins: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|instruction| instruction.code() == ins)
    }
}

/// An on-card service
pub trait Applet: fmt::Debug {
    type Instruction: Instruction;

    const NAME: &'static str;
    /// Class byte of every command the service accepts
    const CLA: u8;
    const AID: &'static [u8];

    /// Called when the service becomes active
    fn select(&mut self) {}

    /// Called once when the service stops being active
    fn deselect(&mut self);

    /// Run one instruction against `apdu`, returning the response length
    ///
    /// Output is written from the start of the data region and may
    /// overwrite the input.
    fn execute(&mut self, instruction: Self::Instruction, apdu: &mut ApduBuffer) -> Result<usize>;
}

/// Check the class, resolve the instruction and run it
///
/// Nothing runs when either check fails.
pub fn dispatch<A: Applet>(applet: &mut A, apdu: &mut ApduBuffer) -> Result<usize> {
    if apdu.cla() != A::CLA {
        return Err(Error::ClassNotSupported(apdu.cla()));
    }
    let instruction =
        A::Instruction::from_ins(apdu.ins()).ok_or(Error::InstructionNotSupported(apdu.ins()))?;

    debug!(applet = A::NAME, ?instruction, lc = apdu.lc(), "Dispatching");
    applet.execute(instruction, apdu)
}

/// Dispatch and turn the outcome into a response
pub fn process<A: Applet>(applet: &mut A, apdu: &mut ApduBuffer) -> Response {
    match dispatch(applet, apdu) {
        Ok(len) => apdu.response(len),
        Err(e) => error_response(A::NAME, &e),
    }
}

/// Response carrying only the status word for `error`
pub(crate) fn error_response(source: &str, error: &Error) -> Response {
    let status = error.status_word();
    log_status(source, status, error);
    Response::error(status)
}

fn log_status(source: &str, status: StatusWord, error: &Error) {
    match status.tracing_level() {
        Level::ERROR => event!(Level::ERROR, source, %status, %error, "Command failed"),
        Level::WARN => event!(Level::WARN, source, %status, %error, "Command failed"),
        Level::INFO => event!(Level::INFO, source, %status, %error, "Command failed"),
        Level::DEBUG => event!(Level::DEBUG, source, %status, %error, "Command failed"),
        _ => event!(Level::TRACE, source, %status, %error, "Command failed"),
    }
}
