//! Integration tests for role lifecycle and batch membership edits.

use doorman::ErrorKind;

use crate::helpers::TestHarness;

#[tokio::test]
async fn test_create_role_and_exists() {
    let app = TestHarness::new();
    assert!(!app.roles.role_exists("Admin").await.unwrap());

    app.roles.create_role("Admin").await.unwrap();
    assert!(app.roles.role_exists("Admin").await.unwrap());

    let err = app.roles.create_role("Admin").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_add_and_remove_users_across_roles() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.create_user("bob", "P@ssw0rd2", "b@x.com").await;
    app.roles.create_role("Admin").await.unwrap();

    app.roles
        .add_users_to_roles(&["alice".into(), "bob".into()], &["Admin".into()])
        .await
        .unwrap();
    let mut members = app.roles.get_users_in_role("Admin").await.unwrap().unwrap();
    members.sort();
    assert_eq!(members, vec!["alice", "bob"]);

    app.roles
        .remove_users_from_roles(&["bob".into()], &["Admin".into()])
        .await
        .unwrap();
    let members = app.roles.get_users_in_role("Admin").await.unwrap().unwrap();
    assert_eq!(members, vec!["alice"]);
}

#[tokio::test]
async fn test_membership_edits_are_idempotent() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.roles.create_role("Admin").await.unwrap();

    app.roles
        .add_users_to_roles(&["alice".into()], &["Admin".into()])
        .await
        .unwrap();
    app.roles
        .add_users_to_roles(&["alice".into()], &["Admin".into()])
        .await
        .unwrap();
    assert_eq!(app.roles.get_roles_for_user("alice").await.unwrap(), vec!["Admin"]);

    // Removing a role never held changes nothing.
    app.roles.create_role("Editor").await.unwrap();
    app.roles
        .remove_users_from_roles(&["alice".into()], &["Editor".into()])
        .await
        .unwrap();
    assert_eq!(app.roles.get_roles_for_user("alice").await.unwrap(), vec!["Admin"]);
}

#[tokio::test]
async fn test_empty_input_lists_are_a_noop() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.roles.create_role("Admin").await.unwrap();

    app.roles.add_users_to_roles(&[], &["Admin".into()]).await.unwrap();
    app.roles.add_users_to_roles(&["alice".into()], &[]).await.unwrap();
    assert!(app.roles.get_roles_for_user("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unresolved_names_are_skipped() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.roles.create_role("Admin").await.unwrap();

    app.roles
        .add_users_to_roles(
            &["alice".into(), "ghost".into()],
            &["Admin".into(), "NoSuchRole".into()],
        )
        .await
        .unwrap();
    let members = app.roles.get_users_in_role("Admin").await.unwrap().unwrap();
    assert_eq!(members, vec!["alice"]);
}

#[tokio::test]
async fn test_delete_populated_role_fails_and_leaves_state() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.roles.create_role("Admin").await.unwrap();
    app.roles
        .add_users_to_roles(&["alice".into()], &["Admin".into()])
        .await
        .unwrap();

    let err = app.roles.delete_role("Admin", true).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RolePopulated);

    // Nothing changed: the role and the membership are intact.
    assert!(app.roles.role_exists("Admin").await.unwrap());
    assert!(app.roles.is_user_in_role("alice", "Admin").await.unwrap());
}

#[tokio::test]
async fn test_delete_populated_role_cascades_when_allowed() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.create_user("bob", "P@ssw0rd2", "b@x.com").await;
    app.roles.create_role("Admin").await.unwrap();
    app.roles
        .add_users_to_roles(&["alice".into(), "bob".into()], &["Admin".into()])
        .await
        .unwrap();

    assert!(app.roles.delete_role("Admin", false).await.unwrap());
    assert!(!app.roles.role_exists("Admin").await.unwrap());
    assert!(app.roles.get_roles_for_user("alice").await.unwrap().is_empty());
    assert!(app.roles.get_roles_for_user("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_role_returns_false() {
    let app = TestHarness::new();
    assert!(!app.roles.delete_role("NoSuchRole", true).await.unwrap());
}

#[tokio::test]
async fn test_users_in_role_distinguishes_missing_from_empty() {
    let app = TestHarness::new();
    assert!(app.roles.get_users_in_role("NoSuchRole").await.unwrap().is_none());

    app.roles.create_role("Admin").await.unwrap();
    let members = app.roles.get_users_in_role("Admin").await.unwrap();
    assert_eq!(members, Some(Vec::new()));
}

#[tokio::test]
async fn test_find_users_in_role_filters_by_substring() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.create_user("alison", "P@ssw0rd2", "b@x.com").await;
    app.create_user("bob", "P@ssw0rd3", "c@x.com").await;
    app.roles.create_role("Admin").await.unwrap();
    app.roles
        .add_users_to_roles(
            &["alice".into(), "alison".into(), "bob".into()],
            &["Admin".into()],
        )
        .await
        .unwrap();

    let mut matched = app
        .roles
        .find_users_in_role("Admin", "ali")
        .await
        .unwrap()
        .unwrap();
    matched.sort();
    assert_eq!(matched, vec!["alice", "alison"]);
    assert!(app.roles.find_users_in_role("NoSuchRole", "ali").await.unwrap().is_none());
}

#[tokio::test]
async fn test_is_user_in_role() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.roles.create_role("Admin").await.unwrap();

    assert!(!app.roles.is_user_in_role("alice", "Admin").await.unwrap());
    app.roles
        .add_users_to_roles(&["alice".into()], &["Admin".into()])
        .await
        .unwrap();
    assert!(app.roles.is_user_in_role("alice", "Admin").await.unwrap());
    assert!(!app.roles.is_user_in_role("ghost", "Admin").await.unwrap());
    assert!(!app.roles.is_user_in_role("alice", "NoSuchRole").await.unwrap());
}

#[tokio::test]
async fn test_get_all_roles() {
    let app = TestHarness::new();
    app.roles.create_role("Admin").await.unwrap();
    app.roles.create_role("Editor").await.unwrap();

    let mut names = app.roles.get_all_roles().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["Admin", "Editor"]);
}

#[tokio::test]
async fn test_deleting_a_user_leaves_role_documents_alone() {
    let app = TestHarness::new();
    app.create_user("alice", "P@ssw0rd1", "a@x.com").await;
    app.roles.create_role("Admin").await.unwrap();
    app.roles
        .add_users_to_roles(&["alice".into()], &["Admin".into()])
        .await
        .unwrap();

    app.membership.delete_user("alice").await.unwrap();
    assert!(app.roles.role_exists("Admin").await.unwrap());
    let members = app.roles.get_users_in_role("Admin").await.unwrap();
    assert_eq!(members, Some(Vec::new()));
}
