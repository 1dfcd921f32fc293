//! Integration tests for the optimistic coordinator.
//!
//! These exercise the full local-then-remote protocol against the in-memory
//! provider: commit keeps the optimistic state, rollback undoes it where a
//! compensation is defined, and the deliberate compensation gaps stay
//! exactly as documented.

use std::sync::Arc;

use optifs_client::testing::{InMemoryProvider, RecordingNotifier};
use optifs_client::{ClientTelemetry, OpOutcome, OptimisticFileSystem, ProviderError};
use optifs_core::{ClientFileSystem, DirectoryEntry, PermissionEntity, PermissionRole};

struct Harness {
    fs: OptimisticFileSystem<InMemoryProvider>,
    provider: InMemoryProvider,
    notifier: Arc<RecordingNotifier>,
    telemetry: Arc<ClientTelemetry>,
}

fn harness() -> Harness {
    let provider = InMemoryProvider::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let telemetry = Arc::new(ClientTelemetry::new());
    let fs = OptimisticFileSystem::new(
        provider.clone(),
        ClientFileSystem::new(),
        notifier.clone(),
        Arc::clone(&telemetry),
    );
    Harness {
        fs,
        provider,
        notifier,
        telemetry,
    }
}

fn file(path: &str) -> DirectoryEntry {
    DirectoryEntry::new_file(path)
}

fn paths(fs: &OptimisticFileSystem<InMemoryProvider>, dir: &str) -> Vec<String> {
    fs.local()
        .state()
        .get_cached(dir)
        .into_iter()
        .map(|e| e.full_path)
        .collect()
}

#[tokio::test]
async fn list_publishes_authoritative_listing_and_selects_first() {
    let h = harness();
    h.provider
        .stock_listing("/docs", vec![file("/docs/a.txt"), file("/docs/b.txt")]);

    let outcome = h.fs.handle_list("/docs").await;

    assert_eq!(outcome, OpOutcome::Committed);
    assert_eq!(h.fs.local().state().current_path().as_deref(), Some("/docs"));
    assert_eq!(h.fs.local().current_files().len(), 2);
    assert_eq!(
        h.fs.local().state().selected().map(|e| e.full_path),
        Some("/docs/a.txt".to_string())
    );
}

#[tokio::test]
async fn list_of_empty_directory_clears_selection() {
    let h = harness();
    h.fs.local().state().select(Some(file("/stale")));

    h.fs.handle_list("/empty").await;

    assert_eq!(h.fs.local().state().selected(), None);
}

#[tokio::test]
async fn list_failure_is_absorbed_and_reported() {
    let h = harness();
    h.provider
        .fail_next("list", ProviderError::Remote("unreachable".into()));

    let outcome = h.fs.handle_list("/docs").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert_eq!(
        h.notifier.notifications(),
        vec![("Cannot get directory list".to_string(), "List Error".to_string())]
    );
    // Navigation itself still happened (stale-while-revalidate view).
    assert_eq!(h.fs.local().state().current_path().as_deref(), Some("/docs"));
}

#[tokio::test]
async fn create_folder_commit_keeps_synthesized_entry() {
    let h = harness();
    h.fs.handle_list("/docs").await;

    let outcome = h.fs.handle_create_folder("/docs/new").await;

    assert_eq!(outcome, OpOutcome::Committed);
    assert_eq!(paths(&h.fs, "/docs/"), vec!["/docs/new"]);
    assert_eq!(h.telemetry.committed(), 2); // list + create
}

#[tokio::test]
async fn create_folder_rollback_removes_synthesized_entry() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt")], "/docs/");
    h.provider
        .fail_next("create_folder", ProviderError::Remote("quota".into()));

    let outcome = h.fs.handle_create_folder("/docs/new").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert_eq!(paths(&h.fs, "/docs/"), vec!["/docs/a.txt"]);
    assert_eq!(
        h.notifier.notifications(),
        vec![(
            "Cannot create folder".to_string(),
            "Create Folder Error".to_string()
        )]
    );
    assert_eq!(h.telemetry.rolled_back(), 1);
}

#[tokio::test]
async fn copy_rollback_removes_destination() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt")], "/docs/");
    h.provider
        .fail_next("copy", ProviderError::Remote("boom".into()));

    let outcome = h.fs.handle_copy("/docs/a.txt", "/archive/a.txt").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert!(paths(&h.fs, "/archive/").is_empty());
    assert_eq!(paths(&h.fs, "/docs/"), vec!["/docs/a.txt"]);
}

#[tokio::test]
async fn move_rollback_does_not_restore_source() {
    // Pins the documented compensation gap: the destination entry is
    // removed, but the source entry stays gone until the next full listing.
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt")], "/docs/");
    h.provider
        .fail_next("move_item", ProviderError::Remote("boom".into()));

    let outcome = h.fs.handle_move("/docs/a.txt", "/archive/a.txt").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert!(paths(&h.fs, "/archive/").is_empty());
    assert!(paths(&h.fs, "/docs/").is_empty(), "source is not restored");
}

#[tokio::test]
async fn rename_rollback_restores_old_path() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/old.txt")], "/docs/");
    h.provider
        .fail_next("rename", ProviderError::Remote("boom".into()));

    let outcome = h.fs.handle_rename("/docs/old.txt", "/docs/new.txt").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert_eq!(paths(&h.fs, "/docs/"), vec!["/docs/old.txt"]);
}

#[tokio::test]
async fn remove_failure_has_no_compensation() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt")], "/docs/");
    h.provider
        .fail_next("remove", ProviderError::Remote("boom".into()));

    let outcome = h.fs.handle_remove(&["/docs/a.txt".to_string()]).await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    // The optimistic removal stands until the next full listing.
    assert!(paths(&h.fs, "/docs/").is_empty());
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn edit_failure_reports_without_structural_change() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt")], "/docs/");
    h.provider
        .fail_next("edit", ProviderError::Remote("boom".into()));

    let outcome = h.fs.handle_edit("/docs/a.txt", "contents").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert_eq!(paths(&h.fs, "/docs/"), vec!["/docs/a.txt"]);
    assert_eq!(
        h.notifier.notifications(),
        vec![("Cannot edit item".to_string(), "Edit Error".to_string())]
    );
}

#[tokio::test]
async fn get_content_returns_body_and_none_on_failure() {
    let h = harness();

    let content = h.fs.handle_get_content("/docs/a.txt").await;
    assert_eq!(content.as_deref(), Some("content of /docs/a.txt"));

    h.provider
        .fail_next("get_content", ProviderError::Remote("boom".into()));
    assert_eq!(h.fs.handle_get_content("/docs/a.txt").await, None);
    assert_eq!(
        h.notifier.notifications(),
        vec![("Cannot get item".to_string(), "Get Content Error".to_string())]
    );
}

#[tokio::test]
async fn api_errors_are_suppressed_from_notification() {
    let h = harness();
    h.provider
        .fail_next("create_folder", ProviderError::Api("duplicate name".into()));

    let outcome = h.fs.handle_create_folder("/docs/new").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert_eq!(h.notifier.count(), 0, "API errors are not re-surfaced");
    assert_eq!(h.telemetry.errors_suppressed(), 1);
    // Compensation still ran.
    assert!(paths(&h.fs, "/docs/").is_empty());
}

#[tokio::test]
async fn set_permissions_failure_leaves_optimistic_grant() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt")], "/docs/");
    h.provider
        .fail_next("set_permissions", ProviderError::Remote("boom".into()));

    let outcome = h
        .fs
        .handle_set_permissions(
            "/docs/a.txt",
            PermissionRole::Readers,
            &PermissionEntity::new("alice"),
            false,
        )
        .await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    let listing = h.fs.local().state().get_cached("/docs/");
    assert!(listing[0].permissions.readers.contains("alice"));
}

#[tokio::test]
async fn multi_move_failure_has_no_compensation() {
    let h = harness();
    h.fs.local()
        .state()
        .set_directory_files(vec![file("/docs/a.txt"), file("/docs/b.txt")], "/docs/");
    h.provider
        .fail_next("move_multiple", ProviderError::Remote("boom".into()));

    let items = vec!["/docs/a.txt".to_string(), "/docs/b.txt".to_string()];
    let outcome = h.fs.handle_move_multiple(&items, "/archive").await;

    assert_eq!(outcome, OpOutcome::RolledBack);
    assert!(paths(&h.fs, "/docs/").is_empty());
    assert_eq!(
        paths(&h.fs, "/archive/"),
        vec!["/archive/a.txt", "/archive/b.txt"]
    );
    assert_eq!(
        h.notifier.notifications(),
        vec![("Cannot move items".to_string(), "Move Error".to_string())]
    );
}

#[tokio::test]
async fn navigate_up_lists_parent_of_current_path() {
    let h = harness();
    h.provider.stock_listing("/a", vec![file("/a/child")]);
    h.fs.handle_list("/a/b").await;

    let outcome = h.fs.handle_navigate_up().await.unwrap();

    assert_eq!(outcome, OpOutcome::Committed);
    assert_eq!(h.fs.local().state().current_path().as_deref(), Some("/a"));
    assert_eq!(h.fs.local().current_files().len(), 1);
}

#[tokio::test]
async fn navigate_up_without_current_path_reports_and_reraises() {
    let h = harness();

    let err = h.fs.handle_navigate_up().await.unwrap_err();

    assert!(matches!(err, ProviderError::Remote(_)));
    assert_eq!(
        h.notifier.notifications(),
        vec![(
            "Cannot navigate to parent directory".to_string(),
            "Navigate Error".to_string()
        )]
    );
    assert!(h.provider.calls().is_empty(), "provider never invoked");
}

#[tokio::test]
async fn selection_accessors_match_by_full_path() {
    let h = harness();
    h.provider
        .stock_listing("/docs", vec![file("/docs/a.txt"), file("/docs/b.txt")]);
    h.fs.handle_list("/docs").await;

    let item = h.fs.get_item_by_name("/docs/b.txt").unwrap();
    assert_eq!(item.name, "b.txt");

    h.fs.on_select_item_by_name("/docs/b.txt");
    assert_eq!(
        h.fs.local().state().selected().map(|e| e.full_path),
        Some("/docs/b.txt".to_string())
    );

    // Unknown path clears the selection.
    h.fs.on_select_item_by_name("/docs/missing.txt");
    assert_eq!(h.fs.local().state().selected(), None);
}

#[tokio::test]
async fn instance_gauge_follows_coordinator_lifecycle() {
    let telemetry = Arc::new(ClientTelemetry::new());
    let make = || {
        OptimisticFileSystem::new(
            InMemoryProvider::new(),
            ClientFileSystem::new(),
            Arc::new(RecordingNotifier::new()) as Arc<dyn optifs_client::Notifier>,
            Arc::clone(&telemetry),
        )
    };

    let first = make();
    let second = make();
    assert_eq!(telemetry.instances(), 2);

    drop(first);
    assert_eq!(telemetry.instances(), 1);
    drop(second);
    assert_eq!(telemetry.instances(), 0);
}
