//! Tests for `TokioScheduler` on a paused tokio clock.

use composable_flux_core::environment::Scheduler;
use composable_flux_runtime::TokioScheduler;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

fn record(log: &Rc<RefCell<Vec<&'static str>>>, entry: &'static str) -> Box<dyn FnOnce()> {
    let log = Rc::clone(log);
    Box::new(move || log.borrow_mut().push(entry))
}

#[tokio::test(start_paused = true)]
async fn test_tasks_fire_in_deadline_order() {
    let scheduler = TokioScheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let start = Instant::now();

    scheduler.schedule(Duration::from_secs(5), record(&log, "toast expired"));
    scheduler.schedule(Duration::from_secs(1), record(&log, "fetch done"));
    assert_eq!(scheduler.pending(), 2);

    scheduler.wait_idle().await;

    assert_eq!(*log.borrow(), vec!["fetch done", "toast expired"]);
    assert_eq!(scheduler.pending(), 0);
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_run_until_leaves_later_tasks_pending() {
    let scheduler = TokioScheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    scheduler.schedule(Duration::from_secs(1), record(&log, "early"));
    scheduler.schedule(Duration::from_secs(10), record(&log, "late"));

    scheduler
        .run_until(tokio::time::sleep(Duration::from_secs(2)))
        .await;

    assert_eq!(*log.borrow(), vec!["early"]);
    assert_eq!(scheduler.pending(), 1);

    scheduler.wait_idle().await;
    assert_eq!(*log.borrow(), vec!["early", "late"]);
}

#[tokio::test(start_paused = true)]
async fn test_wait_idle_covers_tasks_scheduled_by_tasks() {
    let scheduler = Rc::new(TokioScheduler::new());
    let log = Rc::new(RefCell::new(Vec::new()));

    let chained = Rc::clone(&scheduler);
    let chained_log = Rc::clone(&log);
    scheduler.schedule(
        Duration::from_secs(1),
        Box::new(move || {
            chained_log.borrow_mut().push("first");
            chained.schedule(Duration::from_secs(1), record(&chained_log, "second"));
        }),
    );

    scheduler.wait_idle().await;

    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_wait_idle_returns_immediately_when_empty() {
    let scheduler = TokioScheduler::default();
    scheduler.wait_idle().await;
    assert_eq!(scheduler.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_scheduler_discards_pending_tasks() {
    let scheduler = TokioScheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    scheduler.schedule(Duration::from_secs(5), record(&log, "never"));
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(Rc::strong_count(&log), 2);

    drop(scheduler);
    tokio::time::advance(Duration::from_secs(10)).await;

    assert!(log.borrow().is_empty());
    assert_eq!(Rc::strong_count(&log), 1);
}
