//! BDD step definitions for the service binary

use cucumber::{given, then, when};
use tokio::process::Command;

use homework_sentinel::config::{PRACTICUM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR};

use crate::world::HomeworkWorld;

fn sentinel_command(world: &HomeworkWorld) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_homework-sentinel"));
    command.current_dir(std::env::temp_dir());
    if world.clear_environment {
        for var in [PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR] {
            command.env_remove(var);
        }
    }
    command
}

#[given("no credentials in the environment")]
fn no_credentials_in_environment(world: &mut HomeworkWorld) {
    world.clear_environment = true;
}

#[when("the sentinel binary is started")]
async fn start_binary(world: &mut HomeworkWorld) {
    let output = sentinel_command(world)
        .args(["--retry-period", "1"])
        .output()
        .await
        .expect("failed to run sentinel binary");
    world.process_output = Some(output);
}

#[when(expr = "the sentinel binary is started with config {string}")]
async fn start_binary_with_config(world: &mut HomeworkWorld, path: String) {
    let output = sentinel_command(world)
        .args(["--config", &path])
        .output()
        .await
        .expect("failed to run sentinel binary");
    world.process_output = Some(output);
}

#[when(expr = "the sentinel binary is started with retry period {string}")]
async fn start_binary_with_retry_period(world: &mut HomeworkWorld, period: String) {
    let output = sentinel_command(world)
        .args(["--retry-period", &period])
        .output()
        .await
        .expect("failed to run sentinel binary");
    world.process_output = Some(output);
}

#[then("it exits with a failure status")]
fn exits_with_failure(world: &mut HomeworkWorld) {
    let output = world.process_output.as_ref().expect("binary not started");
    assert!(!output.status.success(), "{output:?}");
}

#[then(expr = "its error output mentions {string}")]
fn error_output_mentions(world: &mut HomeworkWorld, text: String) {
    let output = world.process_output.as_ref().expect("binary not started");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&text), "{stderr}");
}

#[then(expr = "its error output has the line {string}")]
fn error_output_has_line(world: &mut HomeworkWorld, line: String) {
    let output = world.process_output.as_ref().expect("binary not started");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.lines().any(|l| l == line), "{stderr}");
}

#[then(expr = "its error output does not mention {string}")]
fn error_output_does_not_mention(world: &mut HomeworkWorld, text: String) {
    let output = world.process_output.as_ref().expect("binary not started");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains(&text), "{stderr}");
}
