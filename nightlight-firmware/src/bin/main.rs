// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{DriveMode, Input, InputConfig, Pull};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_smartled::smart_led_buffer;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use nightlight::config::*;
use nightlight::hal::{HwRngColors, RmtLedWriter};
use nightlight::tasks::{
    breathing_loop, button_loop, connection_task, dhcp_task, mqtt_listener, net_task,
};
use nightlight::{FeedbackOutputs, RunState, scheduler};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und WiFi, spawnt die Netzwerk-Tasks und läuft
/// danach als Scheduler der drei Loops (Atem-LED, Button, MQTT-Listener).
/// Kehrt nie zurück: ein Fehler in einem Loop ist fatal (Panic).
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    defmt::info!(
        "Nightlight: light GPIO{}, buzzer GPIO{}, button GPIO{}, pixel GPIO{}",
        LIGHT_GPIO_PIN,
        BUZZER_GPIO_PIN,
        BUTTON_GPIO_PIN,
        PIXEL_GPIO_PIN
    );

    // ------------------------------------------------------------------------
    // Geräte: Atem-LED + Buzzer (LEDC PWM), Taster, Neopixel
    // ------------------------------------------------------------------------

    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    // Zwei Timer, weil LED und Buzzer unterschiedliche Frequenzen brauchen
    let mut light_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    light_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty13Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_hz(LIGHT_PWM_FREQUENCY_HZ),
        })
        .expect("Failed to configure light PWM timer");

    let mut tone_timer = ledc.timer::<LowSpeed>(timer::Number::Timer1);
    tone_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty13Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_hz(TONE_FREQUENCY_HZ),
        })
        .expect("Failed to configure tone PWM timer");

    // Pins wie LIGHT_GPIO_PIN / BUZZER_GPIO_PIN / BUTTON_GPIO_PIN / PIXEL_GPIO_PIN in config.rs
    let mut light = ledc.channel(channel::Number::Channel0, peripherals.GPIO0);
    light
        .configure(channel::config::Config {
            timer: &light_timer,
            duty_pct: 0,
            drive_mode: DriveMode::PushPull,
        })
        .expect("Failed to configure light PWM channel");

    let mut tone = ledc.channel(channel::Number::Channel1, peripherals.GPIO18);
    tone.configure(channel::config::Config {
        timer: &tone_timer,
        duty_pct: 0,
        drive_mode: DriveMode::PushPull,
    })
    .expect("Failed to configure tone PWM channel");

    // Pull-Down: nicht gedrückt = low
    let button = Input::new(
        peripherals.GPIO20,
        InputConfig::default().with_pull(Pull::Down),
    );

    // Buffer für SmartLED Daten (1 LED), muss länger leben als der Writer
    let mut rmt_buffer = smart_led_buffer!(1);
    let pixel = RmtLedWriter::new(
        peripherals.GPIO8,
        peripherals.RMT,
        RMT_CLOCK_MHZ,
        &mut rmt_buffer,
    )
    .expect("Failed to initialize RMT for SmartLED");

    // ------------------------------------------------------------------------
    // WiFi + Netzwerk-Stack
    // ------------------------------------------------------------------------

    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net (nur ein Socket: MQTT) + DNS
    static RESOURCES: static_cell::StaticCell<StackResources<3>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // ------------------------------------------------------------------------
    // Scheduler: drei Loops, ein gemeinsamer RunState (Start: gestoppt)
    // ------------------------------------------------------------------------

    static RUN_STATE: static_cell::StaticCell<RunState> = static_cell::StaticCell::new();
    let run_state: &'static RunState = RUN_STATE.init(RunState::new());

    let outputs = FeedbackOutputs {
        pixel,
        tone,
        colors: HwRngColors::new(rng),
    };

    let fault = scheduler::run(
        breathing_loop(light, run_state.view()),
        button_loop(button, outputs, run_state.view()),
        mqtt_listener(stack, run_state),
    )
    .await;

    defmt::panic!("Nightlight: fatal {}", fault)
}
