//! Integration tests for the lockout state machine as driven through
//! credential validation. Window-expiry behavior is unit tested on the
//! engine itself, where the clock is an explicit input.

use crate::helpers::TestHarness;

#[tokio::test]
async fn test_four_mismatches_lock_out_the_account() {
    // max_invalid_password_attempts = 3 in the test config.
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;

    for _ in 0..4 {
        assert!(!app.membership.validate_user("alice", "wrong!!!").await.unwrap());
    }
    let profile = app.membership.get_user("alice", false).await.unwrap().unwrap();
    assert!(profile.is_locked_out);

    // The correct password is rejected until an explicit unlock.
    assert!(!app.membership.validate_user("alice", "P@ssw0rd1").await.unwrap());
    assert!(app.membership.unlock_user("alice").await.unwrap());
    assert!(app.membership.validate_user("alice", "P@ssw0rd1").await.unwrap());
}

#[tokio::test]
async fn test_success_resets_the_failure_sequence() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;

    for _ in 0..3 {
        app.membership.validate_user("alice", "wrong!!!").await.unwrap();
    }
    assert!(app.membership.validate_user("alice", "P@ssw0rd1").await.unwrap());

    // Counters were zeroed, so it takes four fresh mismatches to lock.
    for _ in 0..3 {
        app.membership.validate_user("alice", "wrong!!!").await.unwrap();
    }
    let profile = app.membership.get_user("alice", false).await.unwrap().unwrap();
    assert!(!profile.is_locked_out);

    app.membership.validate_user("alice", "wrong!!!").await.unwrap();
    let profile = app.membership.get_user("alice", false).await.unwrap().unwrap();
    assert!(profile.is_locked_out);
}

#[tokio::test]
async fn test_locked_account_ignores_further_attempts() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;

    for _ in 0..4 {
        app.membership.validate_user("alice", "wrong!!!").await.unwrap();
    }

    // Attempts against a locked account return false without driving
    // the counters further.
    assert!(!app.membership.validate_user("alice", "wrong!!!").await.unwrap());
    assert!(!app.membership.validate_user("alice", "P@ssw0rd1").await.unwrap());
}

#[tokio::test]
async fn test_unlock_clears_flag_but_not_counters() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;

    for _ in 0..4 {
        app.membership.validate_user("alice", "wrong!!!").await.unwrap();
    }
    assert!(app.membership.unlock_user("alice").await.unwrap());
    let profile = app.membership.get_user("alice", false).await.unwrap().unwrap();
    assert!(!profile.is_locked_out);

    // Counters survived the unlock; one more in-window mismatch
    // re-locks immediately.
    assert!(!app.membership.validate_user("alice", "wrong!!!").await.unwrap());
    let profile = app.membership.get_user("alice", false).await.unwrap().unwrap();
    assert!(profile.is_locked_out);
}

#[tokio::test]
async fn test_unlock_unknown_user_returns_false() {
    let app = TestHarness::new();
    assert!(!app.membership.unlock_user("nobody").await.unwrap());
}
