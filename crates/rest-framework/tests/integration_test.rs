use async_trait::async_trait;
use rest_framework::pipeline::handler::{default_error_handler, FallibleHandler, Flow, WrapAsync};
use rest_framework::{
    Body, Fields, FrameworkError, HttpError, Pipeline, Record, Request, ResourceActor,
    ResourceClient, Response,
};
use std::sync::atomic::{AtomicU64, Ordering};

fn counter_ids() -> impl Fn() -> String + Send + Sync + 'static {
    let counter = AtomicU64::new(1);
    move || format!("rec_{}", counter.fetch_add(1, Ordering::SeqCst))
}

// --- Store ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    // Start Actor
    let (actor, client) = ResourceActor::<Record>::new(10, counter_ids());
    let handle = tokio::spawn(actor.run());

    // 1. Create
    let bob = client
        .create(Fields::new().with("username", "Bob").with("content", "hi"))
        .await
        .unwrap();
    let alice = client
        .create(Fields::new().with("username", "Alice").with("content", "hello"))
        .await
        .unwrap();
    assert_ne!(bob.id, alice.id);

    // 2. Read after write
    let fetched = client.get(bob.id.clone()).await.unwrap().unwrap();
    assert_eq!(fetched.get("content"), Some("hi"));

    // 3. Update keeps identity and merges
    let updated = client
        .update(bob.id.clone(), Fields::new().with("content", "edited"))
        .await
        .unwrap();
    assert_eq!(updated.id, bob.id);
    assert_eq!(updated.get("username"), Some("Bob"));
    assert_eq!(updated.get("content"), Some("edited"));

    // 4. Delete
    client.delete(bob.id.clone()).await.unwrap();
    assert!(client.get(bob.id.clone()).await.unwrap().is_none());
    assert_eq!(
        client.delete(bob.id.clone()).await.unwrap_err(),
        FrameworkError::NotFound(bob.id.clone())
    );

    // 5. Survivors keep order
    let carol = client
        .create(Fields::new().with("username", "Carol"))
        .await
        .unwrap();
    let ids: Vec<String> = client
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![alice.id, carol.id]);

    // 6. Shutdown once every client is gone
    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_seeded_records_come_first() {
    let (actor, client) = ResourceActor::<Record>::new(10, counter_ids());
    let actor = actor
        .seed([
            Fields::new().with("username", "Bob"),
            Fields::new().with("username", "Alice"),
        ])
        .unwrap();
    tokio::spawn(actor.run());

    client.create(Fields::new().with("username", "Kelly")).await.unwrap();

    let names: Vec<String> = client
        .list()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.get("username").map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Bob", "Alice", "Kelly"]);
}

#[tokio::test]
async fn test_closed_actor_is_reported() {
    let (actor, client) = ResourceActor::<Record>::new(1, counter_ids());
    drop(actor);

    let err = client.list().await.unwrap_err();
    assert_eq!(err, FrameworkError::ActorClosed);
}

// --- Pipeline over the store ---

struct ShowRecord;

#[async_trait]
impl FallibleHandler<ResourceClient<Record>> for ShowRecord {
    async fn try_call(
        &self,
        req: &mut Request,
        store: &ResourceClient<Record>,
    ) -> Result<Flow, HttpError> {
        let id = req.param("id").unwrap_or_default().to_string();
        let record = store
            .get(id.clone())
            .await?
            .ok_or_else(|| HttpError::not_found(format!("Record not found: {id}")))?;
        Ok(Response::json(record).into())
    }
}

#[tokio::test]
async fn test_pipeline_reads_through_client_state() {
    let (actor, client) = ResourceActor::<Record>::new(10, counter_ids());
    tokio::spawn(actor.run());
    let created = client
        .create(Fields::new().with("content", "hi"))
        .await
        .unwrap();

    let pipeline = Pipeline::new()
        .get("/records/:id", WrapAsync::new(ShowRecord))
        .on_error(default_error_handler());

    let found = pipeline
        .handle(Request::get(format!("/records/{}", created.id)), &client)
        .await;
    assert_eq!(found.status, 200);
    assert_eq!(
        found.body,
        Body::Json(serde_json::json!({ "id": "rec_1", "content": "hi" }))
    );

    let missing = pipeline.handle(Request::get("/records/nope"), &client).await;
    assert_eq!(missing.status, 404);
    assert_eq!(missing.text_body(), Some("Record not found: nope"));
}
