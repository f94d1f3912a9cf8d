//! Display printing to the log

use comms_if::eqpt::lcd::LcdMessage;
use log::info;

use crate::runtime::Unit;

/// Display which logs every message shown on it.
#[derive(Default)]
pub struct ConsoleLcd;

impl Unit for ConsoleLcd {
    type Msg = LcdMessage;

    fn on_message(&mut self, msg: LcdMessage) {
        info!("[LCD {:?}] {}", msg.colour, msg.text.replace('\n', " | "));
    }
}
