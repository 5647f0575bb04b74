//! Signal policy tests.
//!
//! Signal dispositions are process-wide, so this binary holds a single test.

#![cfg(unix)]

use std::time::Duration;

use probe_ep::lifecycle::Signals;
use probe_ep::Shutdown;

fn raise(signal: libc::c_int) {
    let rc = unsafe { libc::raise(signal) };
    assert_eq!(rc, 0, "raise({signal}) failed");
}

#[tokio::test]
async fn test_sigint_is_ignored_and_sigterm_triggers_shutdown() {
    let shutdown = Shutdown::new();
    let mut triggered = shutdown.subscribe();
    let signals = Signals::install().unwrap();
    let listener = tokio::spawn(signals.listen(shutdown.clone()));

    raise(libc::SIGINT);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!shutdown.is_triggered(), "SIGINT must not start shutdown");
    assert!(!listener.is_finished());

    raise(libc::SIGTERM);
    tokio::time::timeout(Duration::from_secs(5), triggered.triggered())
        .await
        .expect("SIGTERM should trigger shutdown");
    assert!(shutdown.is_triggered());

    tokio::time::timeout(Duration::from_secs(5), listener)
        .await
        .expect("listener should return after SIGTERM")
        .unwrap();
}
