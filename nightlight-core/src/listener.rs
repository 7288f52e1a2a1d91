//! Subscription Listener
//!
//! Einziger Schreiber des RunState. Holt pro Iteration höchstens eine
//! Nachricht vom Broker, "on"/"off" setzen den Zustand, alles andere wird
//! ignoriert. Transport-Fehler werden nach oben gereicht.

use core::convert::Infallible;

use embedded_hal_async::delay::DelayNs;

use crate::state::RunState;
use crate::traits::CommandSource;
use crate::types::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Pause zwischen zwei Abfragen
    pub poll_interval_ms: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
        }
    }
}

pub struct CommandListener<'a, S, D> {
    source: S,
    delay: D,
    run_state: &'a RunState,
    config: ListenerConfig,
}

impl<'a, S, D> CommandListener<'a, S, D>
where
    S: CommandSource,
    D: DelayNs,
{
    pub fn new(source: S, delay: D, run_state: &'a RunState, config: ListenerConfig) -> Self {
        Self {
            source,
            delay,
            run_state,
            config,
        }
    }

    /// Läuft bis die Verbindung einen Fehler meldet
    pub async fn run(&mut self) -> Result<Infallible, S::Error> {
        loop {
            self.poll().await?;
            self.delay.delay_ms(self.config.poll_interval_ms).await;
        }
    }

    /// Holt höchstens eine Nachricht und wendet sie an
    ///
    /// Gibt das erkannte Kommando zurück, `None` wenn nichts ankam oder der
    /// Payload unbekannt war.
    pub async fn poll(&mut self) -> Result<Option<Command>, S::Error> {
        let Some(payload) = self.source.poll().await? else {
            return Ok(None);
        };

        let command = Command::from_payload(payload);
        if let Some(command) = command {
            let running = self.run_state.apply(command);
            info!("MQTT: command '{}', running = {}", command, running);
        }
        Ok(command)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
