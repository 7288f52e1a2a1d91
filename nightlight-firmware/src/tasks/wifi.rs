// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice};
use nightlight_core::Backoff;

use crate::config::{
    NETWORK_POLL_INTERVAL_SECS, RECONNECT_BACKOFF_INITIAL_MS, RECONNECT_BACKOFF_MAX_MS,
    WIFI_PASSWORD, WIFI_SSID,
};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Verbindet mit Access Point
/// - Überwacht Verbindung und reconnected bei Bedarf
/// - Fehlversuche warten mit gekapptem exponentiellem Backoff, gibt nie auf
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");
    let mut backoff = Backoff::new(RECONNECT_BACKOFF_INITIAL_MS, RECONNECT_BACKOFF_MAX_MS);

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            // Configure WiFi station mode
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                retry_later(&mut backoff).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                retry_later(&mut backoff).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Scan nur für Diagnose (Signalstärke des Ziel-APs)
        match controller
            .scan_with_config_async(ScanConfig::default())
            .await
        {
            Ok(ap_infos) => {
                if let Some(ap_info) = ap_infos.iter().find(|ap| ap.ssid.as_str() == WIFI_SSID) {
                    info!(
                        "WiFi: Target AP found - SSID: {}, Signal: {} dBm",
                        WIFI_SSID, ap_info.signal_strength
                    );
                } else {
                    warn!("WiFi: '{}' not among {} access points", WIFI_SSID, ap_infos.len());
                }
            }
            Err(e) => {
                warn!("WiFi: Scan failed: {}", Debug2Format(&e));
            }
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
                backoff.reset();
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                retry_later(&mut backoff).await;
                continue;
            }
        }

        // Wait for disconnect
        controller
            .wait_for_event(esp_radio::wifi::WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");
        retry_later(&mut backoff).await;
    }
}

async fn retry_later(backoff: &mut Backoff) {
    let delay_ms = backoff.next_delay_ms();
    info!(
        "WiFi: Retry {} in {} ms",
        backoff.attempts(),
        delay_ms
    );
    Timer::after(Duration::from_millis(delay_ms)).await;
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet bis eine IP-Adresse vom DHCP-Server erhalten wurde
/// und loggt dann die Netzwerk-Konfiguration
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    info!("WiFi: Waiting for link and IP address...");
    wait_for_network(stack).await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  IP:      {}", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}

/// Wartet bis Link und DHCP-Lease vorhanden sind (Abfrage jede Sekunde)
pub async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_secs(NETWORK_POLL_INTERVAL_SECS)).await;
    }
}
