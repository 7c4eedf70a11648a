//! Integration tests for the user query and projection operations.

use doorman::types::PageRequest;

use crate::helpers::TestHarness;

#[tokio::test]
async fn test_get_all_users_paginates_over_the_application() {
    let app = TestHarness::new();
    for i in 0..5 {
        app.create_user(&format!("user{i}"), "P@ssw0rd1", &format!("u{i}@x.com"))
            .await;
    }

    let page = app
        .membership
        .get_all_users(&PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);

    let last = app
        .membership
        .get_all_users(&PageRequest::new(3, 2))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next);
    assert!(last.has_previous);
}

#[tokio::test]
async fn test_find_users_by_email_substring() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "alice@corp.example").await;
    app.create_user("bob", "P@ssw0rd2", "bob@other.example").await;

    let page = app
        .membership
        .find_users_by_email("corp", &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].username, "alice");
}

#[tokio::test]
async fn test_find_users_by_name_counts_the_filtered_set() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.create_user("alison", "P@ssw0rd2", "b@x.com").await;
    app.create_user("bob", "P@ssw0rd3", "c@x.com").await;

    let page = app
        .membership
        .find_users_by_name("ali", &PageRequest::new(1, 1))
        .await
        .unwrap();
    // total_items covers the filtered set, not the page or the store.
    assert_eq!(page.total_items, 2);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn test_online_count_follows_validation() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.create_user("bob", "P@ssw0rd2", "b@x.com").await;
    assert_eq!(app.membership.get_number_of_users_online().await.unwrap(), 0);

    app.membership.validate_user("alice", "P@ssw0rd1").await.unwrap();
    app.membership.validate_user("bob", "P@ssw0rd2").await.unwrap();
    assert_eq!(app.membership.get_number_of_users_online().await.unwrap(), 2);
}

#[tokio::test]
async fn test_get_user_by_key_and_email_lookup() {
    let app = TestHarness::new();
    let profile = app.create_user("alice", "P@ssw0rd1", "a@x.com").await;

    let by_key = app.membership.get_user_by_key(profile.id).await.unwrap().unwrap();
    assert_eq!(by_key.username, "alice");

    let username = app
        .membership
        .get_user_name_by_email("a@x.com")
        .await
        .unwrap();
    assert_eq!(username.as_deref(), Some("alice"));
    assert!(app.membership.get_user_name_by_email("nobody@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_user_can_mark_online() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;

    let profile = app.membership.get_user("alice", true).await.unwrap().unwrap();
    assert!(profile.is_online);
    assert_eq!(app.membership.get_number_of_users_online().await.unwrap(), 1);
}
