//! Drivers that turn timer deadlines into [`Scheduler::on_timer`] calls.
//!
//! [`drain`] jumps the virtual clock straight to each deadline and is what the
//! tests and `play --instant` use. [`run_realtime`] sleeps on the tokio clock
//! until each deadline and can be cancelled at any point.

use std::future::Future;

use crate::playback::{
    scheduler::{PlaybackEvent, Scheduler},
    sink::StateSink,
    timer::TimerQueue,
};

/// How a real-time run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    Completed,
    Cancelled,
}

/// Fire every pending timer in deadline order without waiting, until playback
/// goes idle or `max_wakeups` timers have fired. Returns the number fired.
pub fn drain(
    scheduler: &mut Scheduler,
    sink: &mut dyn StateSink,
    queue: &mut TimerQueue,
    max_wakeups: usize,
    mut observe: impl FnMut(PlaybackEvent),
) -> usize {
    let mut fired = 0;
    flush(scheduler, &mut observe);
    while scheduler.is_running() && fired < max_wakeups {
        let Some(due) = queue.next_due() else {
            break;
        };
        queue.advance_to(due);
        while fired < max_wakeups {
            let Some((token, _)) = queue.pop_due() else {
                break;
            };
            scheduler.on_timer(token, sink, queue);
            fired += 1;
            flush(scheduler, &mut observe);
        }
    }
    if fired >= max_wakeups && scheduler.is_running() {
        tracing::warn!(max_wakeups, "wakeup limit reached; playback still running");
    }
    fired
}

/// Play out the pending schedule in real time.
///
/// `queue` keeps the virtual clock in step with tokio's clock, so the
/// scheduler sees the same delays it asked for. If `cancel` resolves first,
/// playback is stopped and the pending timer cancelled.
pub async fn run_realtime<C>(
    scheduler: &mut Scheduler,
    sink: &mut dyn StateSink,
    queue: &mut TimerQueue,
    cancel: C,
    mut observe: impl FnMut(PlaybackEvent),
) -> RunEnd
where
    C: Future<Output = ()>,
{
    tokio::pin!(cancel);
    let origin = tokio::time::Instant::now();
    let base = queue.now();
    flush(scheduler, &mut observe);

    while scheduler.is_running() {
        let Some(due) = queue.next_due() else {
            break;
        };
        let deadline = origin + due.saturating_sub(base);
        tokio::select! {
            _ = &mut cancel => {
                scheduler.stop(sink, queue);
                flush(scheduler, &mut observe);
                return RunEnd::Cancelled;
            }
            _ = tokio::time::sleep_until(deadline) => {
                queue.advance_to(due);
                while let Some((token, _)) = queue.pop_due() {
                    scheduler.on_timer(token, sink, queue);
                }
                flush(scheduler, &mut observe);
            }
        }
    }
    RunEnd::Completed
}

fn flush(scheduler: &mut Scheduler, observe: &mut impl FnMut(PlaybackEvent)) {
    for event in scheduler.take_events() {
        observe(event);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
