//! Integration Tests für die Nightlight Loops
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Hardware.
//! Die Mock-Delays geben bei jedem Aufruf einmal die CPU ab, damit der
//! Scheduler die Loops wie auf dem Executor verschränkt.

use std::collections::VecDeque;

use embassy_futures::block_on;
use embedded_hal::digital::{self, ErrorType as DigitalErrorType, InputPin};
use embedded_hal::pwm::{self, ErrorType as PwmErrorType, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;
use nightlight_core::{
    BreathingConfig, BreathingLight, ButtonConfig, ButtonFeedback, ColorSource, Command,
    CommandListener, CommandSource, CycleOutcome, Fault, Feedback, FeedbackOutputs, HwError,
    LedError, ListenerConfig, RunState, SmartLedWriter, scheduler,
};
use rgb::RGB8;

// ============================================================================
// Mock Hardware
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl pwm::Error for MockError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// PWM-Ausgang, der alle Duty-Werte aufzeichnet (16 Bit Auflösung)
#[derive(Default)]
pub struct MockPwm {
    pub duties: Vec<u16>,
    pub fail: bool,
}

impl MockPwm {
    fn last(&self) -> Option<u16> {
        self.duties.last().copied()
    }
}

impl PwmErrorType for MockPwm {
    type Error = MockError;
}

impl SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        u16::MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.duties.push(duty);
        Ok(())
    }
}

/// Taster mit vorgegebener Pegel-Folge, hält den letzten Pegel
#[derive(Default)]
pub struct MockButton {
    pub levels: VecDeque<bool>,
    pub level: bool,
    pub fail: bool,
}

impl MockButton {
    fn with_levels(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn press(&mut self) {
        self.levels.push_back(true);
    }

    fn release(&mut self) {
        self.levels.push_back(false);
    }
}

impl DigitalErrorType for MockButton {
    type Error = MockError;
}

impl InputPin for MockButton {
    fn is_high(&mut self) -> Result<bool, MockError> {
        if self.fail {
            return Err(MockError);
        }
        if let Some(level) = self.levels.pop_front() {
            self.level = level;
        }
        Ok(self.level)
    }

    fn is_low(&mut self) -> Result<bool, MockError> {
        self.is_high().map(|high| !high)
    }
}

#[derive(Default)]
pub struct MockPixel {
    pub writes: Vec<RGB8>,
    pub fail_next_write: bool,
}

impl SmartLedWriter for MockPixel {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }
        self.writes.push(color);
        Ok(())
    }
}

/// Deterministische "Zufallsfarben"
#[derive(Default)]
pub struct CountingColors {
    pub count: u8,
}

impl ColorSource for CountingColors {
    fn next_color(&mut self) -> RGB8 {
        self.count = self.count.wrapping_add(1);
        RGB8 {
            r: self.count,
            g: 255 - self.count,
            b: 7,
        }
    }
}

/// Delay, das nur aufzeichnet und einmal yieldet
#[derive(Default)]
pub struct MockDelay {
    pub calls_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls_ms.push(ns / 1_000_000);
        embassy_futures::yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls_ms.push(ms);
        embassy_futures::yield_now().await;
    }
}

/// Delay, das nach `after` Aufrufen das System stoppt
pub struct StoppingDelay<'a> {
    state: &'a RunState,
    after: usize,
    calls: usize,
}

impl StoppingDelay<'_> {
    fn tick(&mut self) {
        self.calls += 1;
        if self.calls == self.after {
            self.state.set_running(false);
        }
    }
}

impl DelayNs for StoppingDelay<'_> {
    async fn delay_ns(&mut self, _ns: u32) {
        self.tick();
    }

    async fn delay_ms(&mut self, _ms: u32) {
        self.tick();
    }
}

pub enum BrokerEvent {
    Message(&'static [u8]),
    Nothing,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

/// Broker mit vorgegebener Ereignis-Folge, danach keine Nachrichten mehr
#[derive(Default)]
pub struct ScriptedBroker {
    pub events: VecDeque<BrokerEvent>,
    pub polls: usize,
}

impl ScriptedBroker {
    fn with_payloads(payloads: &[&'static [u8]]) -> Self {
        Self {
            events: payloads.iter().map(|p| BrokerEvent::Message(*p)).collect(),
            polls: 0,
        }
    }
}

impl CommandSource for ScriptedBroker {
    type Error = Disconnected;

    async fn poll(&mut self) -> Result<Option<&[u8]>, Disconnected> {
        self.polls += 1;
        match self.events.pop_front() {
            Some(BrokerEvent::Message(payload)) => Ok(Some(payload)),
            Some(BrokerEvent::Nothing) | None => Ok(None),
            Some(BrokerEvent::Disconnect) => Err(Disconnected),
        }
    }
}

type TestButton<'a> = ButtonFeedback<'a, MockButton, MockPixel, MockPwm, CountingColors, MockDelay>;

fn button_feedback<'a>(state: &'a RunState, button: MockButton) -> TestButton<'a> {
    ButtonFeedback::new(
        button,
        FeedbackOutputs {
            pixel: MockPixel::default(),
            tone: MockPwm::default(),
            colors: CountingColors::default(),
        },
        MockDelay::default(),
        state.view(),
        ButtonConfig::default(),
    )
}

fn listener<'a>(
    state: &'a RunState,
    broker: ScriptedBroker,
) -> CommandListener<'a, ScriptedBroker, MockDelay> {
    CommandListener::new(broker, MockDelay::default(), state, ListenerConfig::default())
}

/// Schickt alle Payloads durch den Listener
fn deliver(state: &RunState, payloads: &[&'static [u8]]) {
    let mut listener = listener(state, ScriptedBroker::with_payloads(payloads));
    for _ in payloads {
        block_on(listener.poll()).unwrap();
    }
}

// ============================================================================
// Tests: Subscription Listener
// ============================================================================

#[test]
fn test_listener_on_off() {
    let state = RunState::new();
    let mut listener = listener(&state, ScriptedBroker::with_payloads(&[b"on", b"off"]));

    assert_eq!(block_on(listener.poll()), Ok(Some(Command::On)));
    assert!(state.is_running());
    assert_eq!(block_on(listener.poll()), Ok(Some(Command::Off)));
    assert!(!state.is_running());
}

#[test]
fn test_listener_last_valid_command_wins() {
    let sequences: [&[&'static [u8]]; 5] = [
        &[b"on"],
        &[b"on", b"blink", b"ON"],
        &[b"on", b"off", b"on", b"toggle"],
        &[b"off", b"on", b"off", b""],
        &[b"on", b"\xff\x00", b"on "],
    ];

    for payloads in sequences {
        let state = RunState::new();
        deliver(&state, payloads);

        let expected = payloads
            .iter()
            .rev()
            .find_map(|p| Command::from_payload(p))
            .map(Command::is_on)
            .unwrap_or(false);
        assert_eq!(state.is_running(), expected);
    }
}

#[test]
fn test_listener_ignores_unknown_payload() {
    let state = RunState::new();
    state.set_running(true);
    let mut listener = listener(&state, ScriptedBroker::with_payloads(&[b"dim"]));

    assert_eq!(block_on(listener.poll()), Ok(None));
    assert!(state.is_running());
}

#[test]
fn test_listener_duplicate_commands() {
    let state = RunState::new();
    deliver(&state, &[b"on", b"on", b"off", b"off"]);
    assert!(!state.is_running());
}

#[test]
fn test_listener_no_message() {
    let state = RunState::new();
    let mut listener = listener(&state, ScriptedBroker::default());
    assert_eq!(block_on(listener.poll()), Ok(None));
    assert!(!state.is_running());
}

#[test]
fn test_listener_run_propagates_disconnect() {
    let state = RunState::new();
    let broker = ScriptedBroker {
        events: VecDeque::from([
            BrokerEvent::Message(b"on"),
            BrokerEvent::Nothing,
            BrokerEvent::Disconnect,
        ]),
        polls: 0,
    };
    let mut listener = listener(&state, broker);

    let result = block_on(listener.run());
    assert!(matches!(result, Err(Disconnected)));
    assert_eq!(listener.source().polls, 3);
    assert!(state.is_running());
}

// ============================================================================
// Tests: Button Feedback
// ============================================================================

#[test]
fn test_button_press_and_release_while_running() {
    let state = RunState::new();
    state.set_running(true);
    let mut button = button_feedback(&state, MockButton::with_levels(&[true, false]));

    assert_eq!(button.poll(), Ok(Some(Feedback::Activated)));
    let outputs = button.outputs();
    assert_eq!(outputs.pixel.writes, vec![RGB8 { r: 1, g: 254, b: 7 }]);
    assert_eq!(outputs.tone.last(), Some(1000));

    assert_eq!(button.poll(), Ok(Some(Feedback::Cleared)));
    let outputs = button.outputs();
    assert_eq!(outputs.pixel.writes.last(), Some(&RGB8::default()));
    assert_eq!(outputs.tone.last(), Some(0));
}

#[test]
fn test_button_held_fires_once() {
    let state = RunState::new();
    state.set_running(true);
    let mut button = button_feedback(&state, MockButton::with_levels(&[true, true, true, true]));

    let fired: Vec<_> = (0..4).filter_map(|_| button.poll().unwrap()).collect();
    assert_eq!(fired, vec![Feedback::Activated]);
    assert_eq!(button.outputs().pixel.writes.len(), 1);
}

#[test]
fn test_button_counts_edges() {
    let state = RunState::new();
    state.set_running(true);
    let levels = [
        false, true, true, false, false, true, false, true, true, true, false,
    ];
    let mut button = button_feedback(&state, MockButton::with_levels(&levels));

    let fired: Vec<_> = levels
        .iter()
        .filter_map(|_| button.poll().unwrap())
        .collect();

    let rising = levels
        .windows(2)
        .filter(|w| !w[0] && w[1])
        .count()
        + usize::from(levels[0]);
    let falling = levels.windows(2).filter(|w| w[0] && !w[1]).count();

    assert_eq!(
        fired.iter().filter(|f| **f == Feedback::Activated).count(),
        rising
    );
    assert_eq!(
        fired.iter().filter(|f| **f == Feedback::Cleared).count(),
        falling
    );
}

#[test]
fn test_button_ignored_while_stopped() {
    let state = RunState::new();
    let mut button = button_feedback(&state, MockButton::with_levels(&[true, false, true]));

    for _ in 0..3 {
        assert_eq!(button.poll(), Ok(None));
    }
    assert!(button.outputs().pixel.writes.is_empty());
    assert!(button.outputs().tone.duties.is_empty());
}

#[test]
fn test_button_release_while_stopped_not_retroactive() {
    let state = RunState::new();
    state.set_running(true);
    let mut button = button_feedback(&state, MockButton::with_levels(&[true]));

    assert_eq!(button.poll(), Ok(Some(Feedback::Activated)));

    // Loslassen während gestoppt: keine Aktion, Licht bleibt an
    state.set_running(false);
    button.button_mut().release();
    assert_eq!(button.poll(), Ok(None));

    // Wieder an ohne neue Flanke: nichts passiert
    state.set_running(true);
    assert_eq!(button.poll(), Ok(None));
    assert_eq!(button.outputs().pixel.writes.len(), 1);
    assert_eq!(button.outputs().tone.last(), Some(1000));
}

#[test]
fn test_button_pixel_failure_is_fatal() {
    let state = RunState::new();
    state.set_running(true);
    let mut button = button_feedback(&state, MockButton::with_levels(&[true]));
    button.outputs_mut().pixel.fail_next_write = true;

    assert_eq!(
        button.poll(),
        Err(HwError::Pixel(LedError::WriteFailed))
    );
}

#[test]
fn test_button_tone_failure_is_fatal() {
    let state = RunState::new();
    state.set_running(true);
    let mut button = button_feedback(&state, MockButton::with_levels(&[true]));
    button.outputs_mut().tone.fail = true;

    assert_eq!(button.poll(), Err(HwError::Tone));
}

#[test]
fn test_button_read_failure_is_fatal() {
    let state = RunState::new();
    let mut button = button_feedback(
        &state,
        MockButton {
            fail: true,
            ..MockButton::default()
        },
    );
    assert_eq!(block_on(button.run()), Err(HwError::Button));
}

#[test]
fn test_button_run_clears_outputs_at_start() {
    let state = RunState::new();
    let mut button = button_feedback(
        &state,
        MockButton {
            fail: true,
            ..MockButton::default()
        },
    );
    let _ = block_on(button.run());
    assert_eq!(button.outputs().pixel.writes, vec![RGB8::default()]);
    assert_eq!(button.outputs().tone.duties, vec![0]);
}

// ============================================================================
// Tests: Breathing Light
// ============================================================================

fn breathing<'a, D: DelayNs>(state: &'a RunState, delay: D) -> BreathingLight<'a, MockPwm, D> {
    BreathingLight::new(
        MockPwm::default(),
        delay,
        state.view(),
        BreathingConfig::default(),
    )
}

#[test]
fn test_breathing_idle_when_stopped() {
    let state = RunState::new();
    let mut light = breathing(&state, MockDelay::default());

    for _ in 0..5 {
        assert_eq!(block_on(light.cycle()), Ok(CycleOutcome::Idle));
    }
    assert!(light.light().duties.is_empty());
}

#[test]
fn test_breathing_full_cycle() {
    let state = RunState::new();
    state.set_running(true);
    let mut light = breathing(&state, MockDelay::default());

    assert_eq!(block_on(light.cycle()), Ok(CycleOutcome::Completed));

    let duties = &light.light().duties;
    assert_eq!(duties.first(), Some(&0));
    assert_eq!(duties.last(), Some(&0));
    assert_eq!(duties.len(), 265);
    // Scheitelwert genau einmal, kein doppelter Schritt auf voller Helligkeit
    assert_eq!(duties.iter().filter(|d| **d == u16::MAX).count(), 1);

    let peak = duties.iter().position(|d| *d == u16::MAX).unwrap();
    assert!(duties[..=peak].windows(2).all(|w| w[0] <= w[1]));
    assert!(duties[peak..].windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_breathing_interrupted_turns_light_off() {
    let state = RunState::new();
    state.set_running(true);
    let delay = StoppingDelay {
        state: &state,
        after: 20,
        calls: 0,
    };
    let mut light = breathing(&state, delay);

    assert_eq!(block_on(light.cycle()), Ok(CycleOutcome::Interrupted));
    let duties = &light.light().duties;
    assert_eq!(duties.len(), 21);
    assert_eq!(duties.last(), Some(&0));

    // Kein neuer Zyklus solange gestoppt
    assert_eq!(block_on(light.cycle()), Ok(CycleOutcome::Idle));
    assert_eq!(light.light().duties.len(), 21);
}

#[test]
fn test_breathing_write_failure_is_fatal() {
    let state = RunState::new();
    state.set_running(true);
    let mut light = BreathingLight::new(
        MockPwm {
            fail: true,
            ..MockPwm::default()
        },
        MockDelay::default(),
        state.view(),
        BreathingConfig::default(),
    );
    assert_eq!(block_on(light.run()), Err(HwError::Light));
}

// ============================================================================
// Tests: Szenarien
// ============================================================================

#[test]
fn test_scenario_press_after_off_does_nothing() {
    let state = RunState::new();
    let mut listener = listener(&state, ScriptedBroker::with_payloads(&[b"on", b"off"]));
    let mut button = button_feedback(&state, MockButton::default());

    block_on(listener.poll()).unwrap();
    button.button_mut().press();
    assert_eq!(button.poll(), Ok(Some(Feedback::Activated)));
    button.button_mut().release();
    assert_eq!(button.poll(), Ok(Some(Feedback::Cleared)));

    block_on(listener.poll()).unwrap();
    button.button_mut().press();
    assert_eq!(button.poll(), Ok(None));

    assert_eq!(button.outputs().pixel.writes.len(), 2);
    assert_eq!(button.outputs().tone.last(), Some(0));
}

#[test]
fn test_scenario_no_commands() {
    let state = RunState::new();
    let mut listener = listener(&state, ScriptedBroker::default());
    let mut light = breathing(&state, MockDelay::default());
    let mut button = button_feedback(&state, MockButton::with_levels(&[true, false, true]));

    for _ in 0..3 {
        assert_eq!(block_on(listener.poll()), Ok(None));
        assert_eq!(block_on(light.cycle()), Ok(CycleOutcome::Idle));
        assert_eq!(button.poll(), Ok(None));
    }
    assert!(!state.is_running());
    assert!(light.light().duties.is_empty());
    assert!(button.outputs().pixel.writes.is_empty());
}

// ============================================================================
// Tests: Scheduler
// ============================================================================

#[test]
fn test_scheduler_returns_transport_fault() {
    let state = RunState::new();
    let mut light = breathing(&state, MockDelay::default());
    let mut button = button_feedback(&state, MockButton::default());
    let broker = ScriptedBroker {
        events: VecDeque::from([
            BrokerEvent::Nothing,
            BrokerEvent::Message(b"on"),
            BrokerEvent::Nothing,
            BrokerEvent::Disconnect,
        ]),
        polls: 0,
    };
    let mut listener = listener(&state, broker);

    let fault = block_on(scheduler::run(light.run(), button.run(), listener.run()));
    assert_eq!(fault, Fault::Transport(Disconnected));
    assert!(state.is_running());
}

#[test]
fn test_scheduler_returns_hardware_fault() {
    let state = RunState::new();
    let mut light = BreathingLight::new(
        MockPwm {
            fail: true,
            ..MockPwm::default()
        },
        MockDelay::default(),
        state.view(),
        BreathingConfig::default(),
    );
    let mut button = button_feedback(&state, MockButton::default());
    let mut listener = listener(&state, ScriptedBroker::with_payloads(&[b"on"]));

    let fault = block_on(scheduler::run(light.run(), button.run(), listener.run()));
    assert_eq!(fault, Fault::<Disconnected>::Hardware(HwError::Light));
}

#[test]
fn test_scheduler_interleaves_loops() {
    let state = RunState::new();
    let mut light = breathing(&state, MockDelay::default());
    let mut button = button_feedback(&state, MockButton::with_levels(&[false, true]));
    let broker = ScriptedBroker {
        events: VecDeque::from([
            BrokerEvent::Message(b"on"),
            BrokerEvent::Nothing,
            BrokerEvent::Nothing,
            BrokerEvent::Disconnect,
        ]),
        polls: 0,
    };
    let mut listener = listener(&state, broker);

    let fault = block_on(scheduler::run(light.run(), button.run(), listener.run()));
    assert_eq!(fault, Fault::Transport(Disconnected));

    // Atem-LED hat nach "on" begonnen, Button hat die Flanke gesehen
    assert!(!light.light().duties.is_empty());
    assert_eq!(button.outputs().tone.last(), Some(1000));
}
