// Task-Modul: Die drei Loops des Nightlights plus Netzwerk-Tasks
//
// Atem-LED, Button und MQTT-Listener laufen im Scheduler (main) und teilen
// sich nur den RunState. WiFi, embassy-net Runner und DHCP-Monitor werden
// als eigene Embassy Tasks gespawnt.

pub mod breathing;
pub mod button;
pub mod mqtt;
pub mod wifi;

// Re-export für einfachen Import
pub use breathing::breathing_loop;
pub use button::button_loop;
pub use mqtt::{MqttError, mqtt_listener};
pub use wifi::{connection_task, dhcp_task, net_task};
