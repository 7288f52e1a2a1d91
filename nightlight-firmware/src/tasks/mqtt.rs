// MQTT Listener - Empfängt on/off Kommandos vom Broker
use core::convert::Infallible;

use defmt::{Debug2Format, debug, error, info, warn};
use embassy_net::{IpAddress, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Delay, Duration, Instant, Timer, with_timeout};
use heapless::Vec;
use nightlight_core::{
    Backoff, CommandListener, CommandSource, ListenerConfig, RunState, is_subscribe_rejection,
};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use crate::config::*;
use crate::tasks::wifi::wait_for_network;

type Client<'a> = MqttClient<'a, TcpSocket<'a>, 5, CountingRng>;

/// MQTT Listener - dritter Loop im Scheduler
///
/// Dieser Loop übernimmt die Broker-Verbindung:
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit MQTT Broker und abonniert `MQTT_TOPIC`
/// - Übergibt die Verbindung an den `CommandListener` (einziger Schreiber des RunState)
/// - Reconnect mit Backoff bei Verbindungsverlust
///
/// Nur ein vom Broker abgelehntes SUBSCRIBE ist fatal (Konfigurationsfehler),
/// alle anderen Fehler führen zu einem neuen Verbindungsversuch.
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `run_state`: der gemeinsame RunState (Schreibzugriff)
pub async fn mqtt_listener(
    stack: &'static Stack<'static>,
    run_state: &RunState,
) -> Result<Infallible, MqttError> {
    let mut backoff = Backoff::new(RECONNECT_BACKOFF_INITIAL_MS, RECONNECT_BACKOFF_MAX_MS);

    loop {
        info!("MQTT: Waiting for network...");
        wait_for_network(stack).await;
        info!("MQTT: Network ready");

        match mqtt_session(stack, run_state, &mut backoff).await {
            Ok(never) => match never {},
            Err(e) if e.is_fatal() => {
                error!("MQTT: Fatal error: {}", e);
                return Err(e);
            }
            Err(e) => error!("MQTT: Error: {}", e),
        }

        let delay_ms = backoff.next_delay_ms();
        info!("MQTT: Reconnecting in {} ms...", delay_ms);
        Timer::after(Duration::from_millis(delay_ms)).await;
    }
}

/// Eine Broker-Session: Verbinden, Abonnieren, Kommandos empfangen
///
/// Kehrt nur mit einem Fehler zurück. Der Backoff wird zurückgesetzt
/// sobald das Abonnement steht.
async fn mqtt_session(
    stack: &'static Stack<'static>,
    run_state: &RunState,
    backoff: &mut Backoff,
) -> Result<Infallible, MqttError> {
    // DNS Lookup
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; TCP_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_BUFFER_SIZE];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(TCP_TIMEOUT_SECS)));

    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected");

    // MQTT Client Configuration
    let rng = CountingRng(20000);
    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    // MQTT Buffer
    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    let mut client: Client<'_> = MqttClient::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );

    // MQTT CONNECT
    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected to broker as '{}'", MQTT_CLIENT_ID);

    // MQTT SUBSCRIBE
    client
        .subscribe_to_topic(MQTT_TOPIC)
        .await
        .map_err(|code| {
            warn!("MQTT: Subscribe failed: {}", Debug2Format(&code));
            if is_subscribe_rejection(code.into()) {
                error!("MQTT: Broker rejected subscription to '{}'", MQTT_TOPIC);
                MqttError::SubscribeRejected
            } else {
                MqttError::SubscribeFailed
            }
        })?;
    info!("MQTT: Subscribed to '{}'", MQTT_TOPIC);
    backoff.reset();

    let source = MqttCommandSource::new(client);
    let config = ListenerConfig {
        poll_interval_ms: MQTT_POLL_INTERVAL_MS,
    };
    let mut listener = CommandListener::new(source, Delay, run_state, config);
    listener.run().await
}

/// Broker-Verbindung als `CommandSource`
///
/// `poll()` liest nur, wenn der Socket Daten bereit hat, und blockiert sonst
/// nicht. Ein angefangenes Paket wird immer vollständig gelesen.
/// Hält die Verbindung per PINGREQ am Leben.
pub struct MqttCommandSource<'a> {
    client: Client<'a>,
    payload: Vec<u8, MQTT_PAYLOAD_CAPACITY>,
    last_ping: Instant,
}

impl<'a> MqttCommandSource<'a> {
    fn new(client: Client<'a>) -> Self {
        Self {
            client,
            payload: Vec::new(),
            last_ping: Instant::now(),
        }
    }
}

impl CommandSource for MqttCommandSource<'_> {
    type Error = MqttError;

    async fn poll(&mut self) -> Result<Option<&[u8]>, MqttError> {
        match self.client.receive_message_if_ready().await {
            Ok(Some((topic, payload))) => {
                debug!("MQTT: {} bytes on '{}'", payload.len(), topic);
                self.payload.clear();
                // Zu lange Payloads bleiben leer und werden ignoriert
                if self.payload.extend_from_slice(payload).is_err() {
                    self.payload.clear();
                }
                return Ok(Some(self.payload.as_slice()));
            }
            Ok(None) => {}
            Err(code) => {
                warn!("MQTT: Receive failed: {}", Debug2Format(&code));
                return Err(MqttError::ReceiveFailed);
            }
        }

        // Nur pingen wenn nichts ansteht: send_ping liest das nächste Paket
        // selbst und verwirft ein PUBLISH, das davor eintrifft.
        if self.last_ping.elapsed() >= Duration::from_secs(MQTT_PING_INTERVAL_SECS) {
            self.client
                .send_ping()
                .await
                .map_err(|_| MqttError::PingFailed)?;
            self.last_ping = Instant::now();
            debug!("MQTT: Ping");
        }

        Ok(None)
    }
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<embassy_net::Ipv4Address, MqttError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(MqttError::DnsResolutionFailed),
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Alle möglichen Fehler die während MQTT-Operationen auftreten können.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    SubscribeRejected,
    SubscribeFailed,
    ReceiveFailed,
    PingFailed,
}

impl MqttError {
    /// Fehler, bei denen ein Reconnect nichts ändern würde
    ///
    /// `SubscribeFailed` (Netzwerk/Timeout während SUBSCRIBE) ist nicht fatal.
    pub fn is_fatal(self) -> bool {
        matches!(self, MqttError::SubscribeRejected)
    }
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::SubscribeRejected => defmt::write!(fmt, "Subscribe rejected"),
            MqttError::SubscribeFailed => defmt::write!(fmt, "Subscribe failed"),
            MqttError::ReceiveFailed => defmt::write!(fmt, "Receive failed"),
            MqttError::PingFailed => defmt::write!(fmt, "Ping failed"),
        }
    }
}
