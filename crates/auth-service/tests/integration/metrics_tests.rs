//! Per-outcome auth metrics.
//!
//! Uses a thread-local `DebuggingRecorder` and drives the service on a
//! current-thread runtime so every `auth_*_total` increment lands on the
//! recording thread.

use auth_test_utils::*;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

/// Counter value for `name{status=...}`, 0 if never recorded.
fn counter(snapshotter: &Snapshotter, name: &str, status: &str) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| key.key().name() == name)
        .filter(|(key, _, _, _)| {
            key.key()
                .labels()
                .any(|l| l.key() == "status" && l.value() == status)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => v,
            _ => 0,
        })
        .sum()
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build")
        .block_on(future)
}

#[test]
fn test_auth_outcomes_counted_by_status() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        run(async {
            let fakes = Fakes::new();
            let service = fakes.auth_service();
            let alice = TestUserBuilder::alice();

            let _ = service.signup(&alice.clone().build()).await;
            let _ = service.signup(&alice.clone().build()).await;
            let _ = service.login(&alice.login()).await;
            let _ = service
                .login(&login_input(TEST_EMAIL_ALICE, TEST_WRONG_PASSWORD))
                .await;
            let _ = service.login(&login_input(TEST_EMAIL_GHOST, "x")).await;
        })
    });

    assert_eq!(counter(&snapshotter, "auth_signup_total", "success"), 1);
    assert_eq!(
        counter(&snapshotter, "auth_signup_total", "creation_failed"),
        1
    );
    assert_eq!(counter(&snapshotter, "auth_login_total", "success"), 1);
    assert_eq!(
        counter(&snapshotter, "auth_login_total", "invalid_password"),
        1
    );
    assert_eq!(counter(&snapshotter, "auth_login_total", "invalid_email"), 1);
}

#[test]
fn test_metric_labels_carry_no_user_data() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        run(async {
            let fakes = Fakes::new();
            let service = fakes.auth_service();
            let _ = service.signup(&TestUserBuilder::alice().build()).await;
        })
    });

    for (key, _, _, _) in snapshotter.snapshot().into_vec() {
        for label in key.key().labels() {
            assert!(!label.value().contains(TEST_EMAIL_ALICE));
            assert!(!label.value().contains(TEST_USERNAME_ALICE));
        }
    }
}
