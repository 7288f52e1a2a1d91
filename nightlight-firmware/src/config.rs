// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// Pin-Zuordnung (ESP32-C6)
// ============================================================================
//
// Nur für Logging. esp-hal vergibt die Pins als typisierte Peripherals
// (`peripherals.GPIOx`), die Nummern hier müssen zu main.rs passen.

/// GPIO-Pin für die Atem-LED (PWM)
pub const LIGHT_GPIO_PIN: u8 = 0;

/// GPIO-Pin für den Buzzer (PWM)
pub const BUZZER_GPIO_PIN: u8 = 18;

/// GPIO-Pin für den Taster (Input mit Pull-Down, gedrückt = high)
pub const BUTTON_GPIO_PIN: u8 = 20;

/// GPIO-Pin für die RGB LED (WS2812/Neopixel, onboard)
pub const PIXEL_GPIO_PIN: u8 = 8;

// ============================================================================
// LED / PWM Konfiguration
// ============================================================================

/// PWM-Trägerfrequenz der Atem-LED
pub const LIGHT_PWM_FREQUENCY_HZ: u32 = 1000;

/// Ton-Frequenz des Buzzers (A4)
pub const TONE_FREQUENCY_HZ: u32 = 440;

/// Buzzer-Duty solange der Taster gedrückt ist (von 65535)
pub const TONE_DUTY: u16 = 1000;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// Loop-Timing
// ============================================================================

/// Helligkeits-Schritt der Atem-LED (von 65535)
pub const BREATH_STEP: u16 = 500;

/// Pause nach jedem Helligkeits-Schritt
pub const BREATH_STEP_DELAY_MS: u32 = 10;

/// Pause der Atem-LED solange das System gestoppt ist
pub const BREATH_IDLE_DELAY_MS: u32 = 100;

/// Abfrage-Intervall des Tasters
pub const BUTTON_POLL_INTERVAL_MS: u32 = 50;

/// Pause zwischen zwei Broker-Abfragen
pub const MQTT_POLL_INTERVAL_MS: u32 = 100;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort (leer für offene Netzwerke)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Abfrage-Intervall beim Warten auf Link und DHCP-Lease
pub const NETWORK_POLL_INTERVAL_SECS: u64 = 1;

/// Backoff für WiFi- und Broker-Reconnects: Start und Obergrenze
pub const RECONNECT_BACKOFF_INITIAL_MS: u64 = 1_000;
pub const RECONNECT_BACKOFF_MAX_MS: u64 = 30_000;

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
/// Wird zur Build-Zeit aus der Environment Variable MQTT_BROKER geladen
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt)
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
/// Wird zur Build-Zeit aus der Environment Variable MQTT_CLIENT_ID geladen
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Topic für on/off Kommandos
/// Wird zur Build-Zeit aus der Environment Variable MQTT_TOPIC geladen
pub const MQTT_TOPIC: &str = env!(
    "MQTT_TOPIC",
    "MQTT Topic nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Keep-Alive in Sekunden (an den Broker gemeldet)
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// Nach dieser Zeit ohne Ping wird ein PINGREQ gesendet
pub const MQTT_PING_INTERVAL_SECS: u64 = 20;

/// MQTT Buffer-Größe in Bytes
/// Muss groß genug für MQTT-Pakete sein
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// Maximale Payload-Länge, die noch ausgewertet wird
/// "on"/"off" sind kürzer, alles darüber kann kein Kommando sein
pub const MQTT_PAYLOAD_CAPACITY: usize = 16;

/// TCP RX/TX Buffer-Größe in Bytes
pub const TCP_BUFFER_SIZE: usize = 2048;

/// TCP Socket Timeout in Sekunden
pub const TCP_TIMEOUT_SECS: u64 = 10;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;
