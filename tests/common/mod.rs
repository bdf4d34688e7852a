#![allow(dead_code)]

use argb_strip_composer::{Duration, Pulse, PulseDriver, TransmitError};

/// Driver that records every pulse train it is handed.
pub struct RecordingDriver {
    pub transmissions: Vec<Vec<Pulse>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            transmissions: Vec::new(),
        }
    }
}

impl PulseDriver for RecordingDriver {
    fn transmit<I>(&mut self, pulses: I, _timeout: Duration) -> Result<(), TransmitError>
    where
        I: IntoIterator<Item = Pulse>,
    {
        self.transmissions.push(pulses.into_iter().collect());
        Ok(())
    }
}

/// Driver that follows a per-call script of outcomes, then succeeds.
pub struct ScriptedDriver {
    script: Vec<Result<(), TransmitError>>,
    pub calls: usize,
}

impl ScriptedDriver {
    pub fn new(script: Vec<Result<(), TransmitError>>) -> Self {
        Self { script, calls: 0 }
    }
}

impl PulseDriver for ScriptedDriver {
    fn transmit<I>(&mut self, pulses: I, _timeout: Duration) -> Result<(), TransmitError>
    where
        I: IntoIterator<Item = Pulse>,
    {
        // Drain the train like real hardware would.
        let _count = pulses.into_iter().count();
        let outcome = self.script.get(self.calls).copied().unwrap_or(Ok(()));
        self.calls += 1;
        outcome
    }
}
