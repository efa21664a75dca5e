//! Scripted CLI session for both todo variants.
//!
//! Every state change is logged as JSON by a subscriber. The fetch and the
//! notification expiry are real timers; shorten them with
//! `TODO_FETCH_DELAY_MS` and `TODO_NOTIFICATION_TTL_MS`.

use anyhow::Context;
use composable_flux_core::{Action, Reducer};
use composable_flux_runtime::{Store, Subscription, TokioScheduler};
use serde::Serialize;
use std::rc::Rc;
use todo::selectors::{active_count, completed_count, filter_is_active, visible_todos};
use todo::{
    ActionCreators, NotifyTodoStore, TodoConfig, TodoSlices, VisibilityFilter, create_fetch_store, create_notify_store,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,composable_flux_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    composable_flux_runtime::metrics::register_metrics();

    let config = TodoConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(?config, "Starting todo demo");

    println!("=== Todo Demo: fetching variant ===\n");
    run_fetch_variant(&config).await?;

    println!("\n=== Todo Demo: notifying variant ===\n");
    run_notify_variant(&config).await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}

async fn run_fetch_variant(config: &TodoConfig) -> anyhow::Result<()> {
    let scheduler = Rc::new(TokioScheduler::new());
    let store = Rc::new(create_fetch_store(scheduler.clone()));
    let creators = ActionCreators::new(config);

    let subscription = log_state_changes(&store);

    store.dispatch(creators.add_todo("buy milk"))?;
    store.dispatch(creators.add_todo("walk the dog"))?;
    store.dispatch(ActionCreators::toggle_todo(0))?;
    store.dispatch(ActionCreators::set_visibility_filter(VisibilityFilter::Active))?;
    print_list(&*store.snapshot());

    println!("\nFetching todos ({:?})...", config.fetch_delay);
    store.dispatch(creators.fetch_todos())?;
    println!("Status: {:?}", store.state(|s| s.fetch_status.clone()));

    scheduler.wait_idle().await;

    println!("Status: {:?}", store.state(|s| s.fetch_status.clone()));
    store.dispatch(ActionCreators::set_visibility_filter(VisibilityFilter::All))?;
    print_list(&*store.snapshot());

    subscription.unsubscribe();
    Ok(())
}

async fn run_notify_variant(config: &TodoConfig) -> anyhow::Result<()> {
    let scheduler = Rc::new(TokioScheduler::new());
    let store = Rc::new(create_notify_store(scheduler.clone()));
    let creators = ActionCreators::new(config);

    let subscription = log_state_changes(&store);

    store.dispatch(creators.add_todo_with_notification("buy milk"))?;
    store.dispatch(creators.add_todo_with_notification("walk the dog"))?;
    print_list(&*store.snapshot());
    print_notifications(&store);

    println!("\nWaiting for notifications to expire ({:?})...", config.notification_ttl);
    scheduler.wait_idle().await;
    print_notifications(&store);

    subscription.unsubscribe();
    Ok(())
}

/// Subscribes a callback that logs the state as JSON after every change
fn log_state_changes<R>(store: &Rc<Store<R>>) -> Subscription
where
    R: Reducer + 'static,
    R::State: Serialize + 'static,
    R::Action: Action + 'static,
{
    let weak = Rc::downgrade(store);
    store.subscribe(move || {
        let Some(store) = weak.upgrade() else {
            return;
        };
        match serde_json::to_string(&*store.snapshot()) {
            Ok(json) => tracing::info!(store = %store.config().name, state = %json, "State changed"),
            Err(error) => tracing::warn!(%error, "Failed to serialize state"),
        }
    })
}

fn print_list<S: TodoSlices>(state: &S) {
    let filter = state.visibility_filter();

    println!("\nFilter:");
    for candidate in VisibilityFilter::ALL {
        let marker = if filter_is_active(filter, candidate) { ">" } else { " " };
        println!("  {marker} {candidate}");
    }

    println!("Visible todos:");
    for item in visible_todos(state) {
        let status = if item.completed { "✓" } else { " " };
        println!("  [{status}] #{} {}", item.id, item.text);
    }

    println!(
        "Completed: {}/{} ({} active)",
        completed_count(state.items()),
        state.items().len(),
        active_count(state.items())
    );
}

fn print_notifications(store: &NotifyTodoStore) {
    let notifications = store.state(|s| s.notifications.clone());
    if notifications.is_empty() {
        println!("Notifications: none");
        return;
    }

    println!("Notifications:");
    for notification in notifications.iter() {
        println!("  ({}) {}", notification.id, notification.text);
    }
}
