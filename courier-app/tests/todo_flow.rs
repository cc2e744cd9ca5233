//! End-to-end flows through the assembled application: dispatch, caching,
//! invalidation, outbox, and sync.

use std::sync::Arc;

use courier_app::{build_app, App};
use courier_core::Priority;
use courier_storage::{CommandOutbox, JsonFileStore, LocalStore, MemoryStore};
use courier_sync::SyncClient;
use courier_test_utils::{CountingStore, MockSyncClient};
use courier_todo::{
    keys, CreateTodo, DeleteTodo, GetAllTodos, GetTodoById, GetTodoStats, MarkTodoCompleted,
    UpdateTodo,
};

fn memory_app(sync_client: Arc<dyn SyncClient>) -> App {
    build_app(Arc::new(MemoryStore::new()), sync_client).unwrap()
}

#[tokio::test]
async fn create_enqueues_a_decodable_record_and_drops_cached_reads() {
    let app = memory_app(Arc::new(MockSyncClient::accepting()));

    // Warm the cache entries the command must invalidate.
    app.mediator.query(GetAllTodos::default()).await.unwrap();
    app.mediator.query(GetTodoStats).await.unwrap();
    assert!(app.cache.contains("todos:all:true:all").unwrap());
    assert!(app.cache.contains("todos:stats").unwrap());

    let command = CreateTodo::new("Buy milk");
    command.validate().unwrap();
    app.mediator.send(command).await.unwrap();

    let records = app.outbox.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command_type, "CreateTodo");
    let decoded: CreateTodo = records[0].decode_payload().unwrap();
    assert_eq!(decoded.title, "Buy milk");

    assert!(!app.cache.contains("todos:all:true:all").unwrap());
    assert!(!app.cache.contains("todos:stats").unwrap());
}

#[tokio::test]
async fn repeated_query_is_served_from_cache() {
    let store = Arc::new(CountingStore::new(MemoryStore::new()));
    let app = build_app(store.clone(), Arc::new(MockSyncClient::accepting())).unwrap();

    let query = GetAllTodos {
        include_completed: false,
        priority_filter: None,
    };
    let first = app.mediator.query(query.clone()).await.unwrap();
    let loads_after_first = store.loads_for("todos");
    let second = app.mediator.query(query).await.unwrap();

    assert!(first.is_empty());
    assert!(second.is_empty());
    assert_eq!(store.loads_for("todos"), loads_after_first);
}

#[tokio::test]
async fn accepted_sync_empties_the_outbox_and_rejection_keeps_it() {
    let client = Arc::new(MockSyncClient::accepting());
    let app = memory_app(client.clone());

    for title in ["a", "b", "c"] {
        app.mediator.send(CreateTodo::new(title)).await.unwrap();
    }
    assert_eq!(app.outbox.list_all().await.unwrap().len(), 3);

    let report = app.synchronizer.sync().await.unwrap();
    assert_eq!(report.accepted, 3);
    assert!(app.outbox.list_all().await.unwrap().is_empty());
    assert_eq!(client.pushed().len(), 3);

    // Same flow against a rejecting endpoint: every record stays.
    let app = memory_app(Arc::new(MockSyncClient::rejecting(422)));
    for title in ["d", "e"] {
        app.mediator.send(CreateTodo::new(title)).await.unwrap();
    }
    let report = app.synchronizer.sync().await.unwrap();
    assert_eq!(report.failed, 2);
    assert_eq!(app.outbox.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn lifecycle_create_complete_filter_and_stats() {
    let app = memory_app(Arc::new(MockSyncClient::accepting()));

    app.mediator
        .send(CreateTodo {
            title: "write report".to_string(),
            description: String::new(),
            priority: Priority::High,
        })
        .await
        .unwrap();
    app.mediator.send(CreateTodo::new("buy milk")).await.unwrap();

    let all = app.mediator.query(GetAllTodos::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let report = all.iter().find(|view| view.title == "write report").unwrap();
    app.mediator
        .send(MarkTodoCompleted::new(report.id))
        .await
        .unwrap();

    // The mutation invalidated the pending-only list, so this re-reads.
    let pending = app
        .mediator
        .query(GetAllTodos {
            include_completed: false,
            priority_filter: None,
        })
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].title, "buy milk");

    let fetched = app
        .mediator
        .query(GetTodoById::new(report.id))
        .await
        .unwrap()
        .unwrap();
    assert!(fetched.is_completed);
    assert!(fetched.completed_at.is_some());

    let stats = app.mediator.query(GetTodoStats).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 1);
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let app = memory_app(Arc::new(MockSyncClient::accepting()));
    app.mediator.send(CreateTodo::new("draft")).await.unwrap();

    let all = app.mediator.query(GetAllTodos::default()).await.unwrap();
    let id = all[0].id;

    app.mediator
        .send(UpdateTodo {
            id,
            title: "final".to_string(),
            description: "polished".to_string(),
            priority: Priority::Low,
            is_completed: false,
        })
        .await
        .unwrap();

    let updated = app
        .mediator
        .query(GetTodoById::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "final");
    assert_eq!(updated.priority, Priority::Low);

    app.mediator.send(DeleteTodo::new(id)).await.unwrap();
    assert_eq!(
        app.mediator.query(GetTodoById::new(id)).await.unwrap(),
        None
    );

    // Three mutations, three outbox records awaiting sync.
    assert_eq!(app.outbox.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn mutation_turns_a_cached_list_stale() {
    let app = memory_app(Arc::new(MockSyncClient::accepting()));

    let key = keys::all_todos(true, None);
    app.mediator.query(GetAllTodos::default()).await.unwrap();
    assert!(app.cache.contains(&key).unwrap());

    app.mediator.send(CreateTodo::new("new item")).await.unwrap();
    assert!(!app.cache.contains(&key).unwrap());

    let refreshed = app.mediator.query(GetAllTodos::default()).await.unwrap();
    assert_eq!(refreshed.len(), 1);
}

#[tokio::test]
async fn outbox_survives_a_restart_on_the_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store: Arc<dyn LocalStore> = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
        let app = build_app(store, Arc::new(MockSyncClient::failing())).unwrap();
        app.mediator.send(CreateTodo::new("offline")).await.unwrap();
        // The endpoint is unreachable; the record stays queued.
        let report = app.synchronizer.sync().await.unwrap();
        assert_eq!(report.failed, 1);
    }

    // A new process over the same directory still sees the record and can
    // now deliver it.
    let store: Arc<dyn LocalStore> = Arc::new(JsonFileStore::open(dir.path()).await.unwrap());
    let app = build_app(store, Arc::new(MockSyncClient::accepting())).unwrap();
    assert_eq!(app.outbox.list_all().await.unwrap().len(), 1);

    let report = app.synchronizer.sync().await.unwrap();
    assert_eq!(report.accepted, 1);
    assert!(app.outbox.list_all().await.unwrap().is_empty());

    let todos = app.mediator.query(GetAllTodos::default()).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "offline");
}
