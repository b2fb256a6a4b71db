//! Client behavior against a live backend, including queue replay.

mod common;

use pretty_assertions::assert_eq;

use habit_core::types::Habit;
use habitgrid_client::{
    ApiClient, ClientError, ConnectionStatus, ConnectivityMonitor, NewHabit, Outcome,
    SessionStore, SyncAction,
};

#[tokio::test]
async fn login_stores_token_and_user() {
    let base_url = common::spawn_backend().await;
    let client = common::fresh_client(&base_url);

    let login = client.login("toxir", "toxir123").await.unwrap();

    assert_eq!(login.token, "user_toxir");
    assert_eq!(login.user.username, "Toxir");
    assert_eq!(client.session().token().as_deref(), Some("user_toxir"));
    assert_eq!(client.session().user().unwrap().code, "toxir");
}

#[tokio::test]
async fn login_rejection_surfaces_server_message() {
    let base_url = common::spawn_backend().await;
    let client = common::fresh_client(&base_url);

    let err = client.login("toxir", "wrong").await.unwrap_err();

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "wrong password");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn mutations_confirm_against_live_server() {
    let client = common::logged_in_client().await;

    let habit = match client.add_habit(NewHabit::named("Read")).await {
        Outcome::Confirmed(habit) => habit,
        Outcome::Queued(_) => panic!("server is up"),
    };
    assert!(!habit.provisional);

    assert_eq!(
        client.toggle_completion(habit.id, 15, 6, 2024).await,
        Outcome::Confirmed(true)
    );
    assert_eq!(
        client.toggle_completion(habit.id, 15, 6, 2024).await,
        Outcome::Confirmed(false)
    );

    let snapshot = client.sync_data().await;
    assert!(!snapshot.from_cache);
    assert_eq!(snapshot.habits.len(), 1);
    assert!(client.queue().is_empty());
}

#[tokio::test]
async fn sync_overwrites_stale_cache() {
    let client = common::logged_in_client().await;

    // Poison the cache with a habit the server never saw.
    client
        .session()
        .set_habits(vec![Habit::new(99, "Stale", 0)])
        .unwrap();

    let snapshot = client.sync_data().await;

    assert!(!snapshot.from_cache);
    assert!(snapshot.habits.is_empty());
    assert!(client.session().habits().is_empty());
}

#[tokio::test]
async fn rejected_token_clears_session() {
    let base_url = common::spawn_backend().await;
    let session = SessionStore::open(common::unique_temp_path("session"));
    let user = habit_core::types::User {
        id: uuid::Uuid::new_v4(),
        code: "ghost".to_string(),
        username: "Ghost".to_string(),
        language: "uz".to_string(),
        is_admin: false,
        created_at: chrono::Utc::now(),
    };
    session.set_session("user_ghost".to_string(), user).unwrap();
    let client = ApiClient::new(&base_url, session);

    let snapshot = client.sync_data().await;

    assert!(snapshot.from_cache);
    assert!(client.session().token().is_none());
    assert!(client.session().user().is_none());
}

#[tokio::test]
async fn drain_replays_in_fifo_order() {
    let client = common::logged_in_client().await;

    client
        .queue()
        .enqueue(SyncAction::AddHabit(NewHabit::named("Read")));
    client.queue().enqueue(SyncAction::ToggleCompletion {
        habit_id: 1,
        day: 15,
        month: 6,
        year: 2024,
    });
    client.queue().enqueue(SyncAction::UpdateLanguage {
        language: "en".to_string(),
    });

    client.process_sync_queue().await;

    assert!(client.queue().is_empty());
    let snapshot = client.sync_data().await;
    assert_eq!(snapshot.habits.len(), 1);
    assert_eq!(snapshot.habits[0].name, "Read");
    assert_eq!(snapshot.completions.get("1-2024-6-15"), Some(&true));
    assert_eq!(snapshot.user.unwrap().language, "en");
}

#[tokio::test]
async fn drain_halts_on_failure_and_requeues_to_tail() {
    let client = common::logged_in_client().await;

    // The server rejects a blank habit name, so this item can never
    // replay successfully.
    let poison = SyncAction::AddHabit(NewHabit::named("  "));
    let valid = SyncAction::UpdateLanguage {
        language: "en".to_string(),
    };
    client.queue().enqueue(poison.clone());
    client.queue().enqueue(valid.clone());

    client.process_sync_queue().await;

    // One pass: the poison item failed, moved to the tail, and the
    // valid item behind it was not attempted.
    assert_eq!(client.queue().actions(), vec![valid, poison]);
    let snapshot = client.sync_data().await;
    assert_eq!(snapshot.user.unwrap().language, "uz");
}

#[tokio::test]
async fn reconnect_drains_exactly_once() {
    let client = common::logged_in_client().await;
    let monitor = ConnectivityMonitor::new(client.clone());

    monitor.set_offline();
    assert_eq!(monitor.status(), ConnectionStatus::Offline);
    client
        .queue()
        .enqueue(SyncAction::AddHabit(NewHabit::named("Read")));

    monitor.set_online().await;
    // A redundant online report must not replay anything again.
    monitor.set_online().await;

    assert_eq!(monitor.status(), ConnectionStatus::Online);
    assert!(client.queue().is_empty());
    let snapshot = client.sync_data().await;
    assert_eq!(snapshot.habits.len(), 1);
}

#[tokio::test]
async fn snapshot_exposes_month_stats() {
    let client = common::logged_in_client().await;
    let habit = client.add_habit(NewHabit::named("Read")).await.into_inner();

    for day in 1..=15 {
        client.toggle_completion(habit.id, day, 6, 2024).await;
    }

    let snapshot = client.sync_data().await;
    let stats = snapshot.habit_stats(habit.id, 2024, 6);
    assert_eq!(stats.completed, 15);
    assert_eq!(stats.percentage, 50);
    assert_eq!(snapshot.overall_stats(2024, 6).percentage, 50);
}

#[tokio::test]
async fn logout_clears_session_even_when_online() {
    let client = common::logged_in_client().await;
    assert!(client.session().token().is_some());

    client.logout().await;

    assert!(client.session().token().is_none());
    assert!(client.session().user().is_none());
}

#[tokio::test]
async fn health_check_is_true() {
    let base_url = common::spawn_backend().await;
    let client = common::fresh_client(&base_url);
    assert!(client.check_health().await);
}

#[tokio::test]
async fn reset_clears_server_and_cache() {
    let client = common::logged_in_client().await;
    client.add_habit(NewHabit::named("Read")).await;

    client.reset_data().await.unwrap();

    assert!(client.session().habits().is_empty());
    let snapshot = client.sync_data().await;
    assert!(snapshot.habits.is_empty());
}
