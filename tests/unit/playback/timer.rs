use super::*;

#[test]
fn timers_fire_in_due_then_schedule_order() {
    let mut q = TimerQueue::new();
    let late = q.schedule(Wakeup::Advance, Duration::from_millis(800));
    let a = q.schedule(Wakeup::Advance, Duration::from_millis(500));
    let b = q.schedule(Wakeup::Repeat, Duration::from_millis(500));
    assert_eq!(q.next_due(), Some(Duration::from_millis(500)));

    assert_eq!(q.pop_due(), None);
    q.advance_to(Duration::from_millis(500));
    assert_eq!(q.pop_due(), Some((a, Wakeup::Advance)));
    assert_eq!(q.pop_due(), Some((b, Wakeup::Repeat)));
    assert_eq!(q.pop_due(), None);

    q.advance_by(Duration::from_millis(300));
    assert_eq!(q.pop_due(), Some((late, Wakeup::Advance)));
    assert!(q.is_empty());
}

#[test]
fn cancel_is_idempotent() {
    let mut q = TimerQueue::new();
    let t = q.schedule(Wakeup::Advance, Duration::from_millis(10));
    q.cancel(t);
    q.cancel(t);
    assert!(q.is_empty());
    q.advance_to(Duration::from_millis(10));
    assert_eq!(q.pop_due(), None);
    // A token that never existed is fine too.
    q.cancel(TimerToken(99));
}

#[test]
fn clock_never_runs_backwards() {
    let mut q = TimerQueue::new();
    q.advance_to(Duration::from_millis(100));
    q.advance_to(Duration::from_millis(50));
    assert_eq!(q.now(), Duration::from_millis(100));
    let t = q.schedule(Wakeup::Advance, Duration::ZERO);
    assert_eq!(q.pop_due(), Some((t, Wakeup::Advance)));
}
