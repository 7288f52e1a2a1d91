//! Scheduler für die drei Loops
//!
//! Atem-LED, Button und Listener laufen kooperativ im selben Executor.
//! Es gibt keine Supervision: der erste Fehler eines Loops beendet alle drei
//! und wird an den Aufrufer zurückgegeben.

use core::convert::Infallible;

use embassy_futures::select::{Either3, select3};

use crate::error::{Fault, HwError};

/// Startet die drei Loops und wartet auf den ersten Fehler
pub async fn run<B, P, L, T>(breathing: B, button: P, listener: L) -> Fault<T>
where
    B: Future<Output = Result<Infallible, HwError>>,
    P: Future<Output = Result<Infallible, HwError>>,
    L: Future<Output = Result<Infallible, T>>,
{
    match select3(breathing, button, listener).await {
        Either3::First(result) | Either3::Second(result) => Fault::Hardware(into_error(result)),
        Either3::Third(result) => Fault::Transport(into_error(result)),
    }
}

fn into_error<E>(result: Result<Infallible, E>) -> E {
    match result {
        Ok(never) => match never {},
        Err(e) => e,
    }
}
