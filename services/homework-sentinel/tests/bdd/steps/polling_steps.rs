//! BDD step definitions for the poll loop

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use homework_sentinel::clock::Clock;
use homework_sentinel::config::TelegramConfig;
use homework_sentinel::practicum::PracticumClient;
use homework_sentinel::telegram::TelegramNotifier;
use homework_sentinel::{CycleOutcome, Engine};

use crate::world::HomeworkWorld;

const STARTUP_TIME: i64 = 1_700_000_000;

/// Frozen clock; cycles are driven one by one so sleeping is never needed
struct FrozenClock;

#[async_trait::async_trait]
impl Clock for FrozenClock {
    fn unix_now(&self) -> i64 {
        STARTUP_TIME
    }

    async fn sleep(&self, _duration: Duration) {}
}

fn engine(world: &mut HomeworkWorld) -> &mut Engine {
    if world.engine.is_none() {
        let http = world.http();
        world.config.tracker.token = Some("practicum".to_string());
        world.config.tracker.endpoint = "http://tracker.test/api/statuses/".to_string();
        world.config.telegram = TelegramConfig {
            token: Some("123:abc".to_string()),
            chat_id: Some("42".to_string()),
            api_url: "http://telegram.test".to_string(),
        };

        let source = Arc::new(PracticumClient::new(&world.config.tracker, http.clone()));
        let notifier = Arc::new(TelegramNotifier::new(&world.config.telegram, http));
        world.engine = Some(Engine::new(
            source,
            notifier,
            Arc::new(FrozenClock),
            &world.config,
            CancellationToken::new(),
        ));
    }
    world.engine.as_mut().expect("engine just built")
}

#[given("the tracker follows the server's current date")]
fn tracker_advances_cursor(world: &mut HomeworkWorld) {
    world.config.tracker.advance_cursor = true;
}

#[given(expr = "the API answers {string}")]
fn api_answers(world: &mut HomeworkWorld, body: String) {
    world.http().push_answer(200, &body);
}

#[given(expr = "the API responds with status {int}")]
fn api_status(world: &mut HomeworkWorld, status: u16) {
    world.http().push_answer(status, "");
}

#[when(expr = "the sentinel runs {int} cycle(s)")]
async fn run_cycles(world: &mut HomeworkWorld, cycles: usize) {
    for _ in 0..cycles {
        let outcome = engine(world).run_cycle().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "the chat received {int} message(s)")]
fn chat_received(world: &mut HomeworkWorld, count: usize) {
    assert_eq!(world.http().attempts().len(), count, "{:?}", world.http().attempts());
}

#[then(expr = "{int} delivery attempt(s) was/were made")]
fn delivery_attempts(world: &mut HomeworkWorld, count: usize) {
    assert_eq!(world.http().attempts().len(), count);
}

#[then(expr = "message {int} is {string}")]
fn message_n_is(world: &mut HomeworkWorld, index: usize, text: String) {
    let attempts = world.http().attempts();
    assert_eq!(attempts[index - 1], text);
}

#[then(expr = "message {int} starts with {string}")]
fn message_n_starts_with(world: &mut HomeworkWorld, index: usize, prefix: String) {
    let attempts = world.http().attempts();
    assert!(attempts[index - 1].starts_with(&prefix), "{}", attempts[index - 1]);
}

#[then("the last cycle found no updates")]
fn last_cycle_no_updates(world: &mut HomeworkWorld) {
    assert_eq!(world.outcomes.last(), Some(&CycleOutcome::NoUpdates));
}

#[then("no failure alert was delivered")]
fn no_alert_delivered(world: &mut HomeworkWorld) {
    assert!(!world.outcomes.is_empty());
    for outcome in &world.outcomes {
        assert!(
            matches!(outcome, CycleOutcome::Failed { alerted: false, .. }),
            "{outcome:?}"
        );
    }
    let state = world.engine.as_ref().expect("engine not built").state();
    assert!(state.last_report.is_empty());
    assert!(state.last_error.is_empty());
}

#[then(expr = "every request asked for changes since {int}")]
fn every_request_since(world: &mut HomeworkWorld, since: i64) {
    let from_dates = world.http().from_dates();
    assert!(!from_dates.is_empty());
    assert!(from_dates.iter().all(|d| *d == since.to_string()), "{from_dates:?}");
}

#[then(expr = "the requests asked for changes since {string}")]
fn requests_since(world: &mut HomeworkWorld, expected: String) {
    let expected: Vec<String> = expected.split(", ").map(str::to_string).collect();
    assert_eq!(world.http().from_dates(), expected);
}
