//! Repository behaviour shared by every backend.
//!
//! Each check is a plain async fn over a `UserRepository` with an empty
//! collection. The in-memory backend runs them unconditionally. The MongoDB
//! run is `#[ignore]`d and needs `USERD_TEST_MONGO_URI`, e.g.
//!
//! ```sh
//! USERD_TEST_MONGO_URI=mongodb://localhost:27017 cargo test -- --ignored
//! ```

use userd::{ObjectId, StoreError, UserPatch, UserRepository};

fn ada() -> UserPatch {
    UserPatch::default().with_name("A").with_email("a@x.com")
}

async fn create_then_get_round_trips(users: &UserRepository) {
    let created = users.create(ada()).await.unwrap();
    assert!(!created.id_hex().is_empty());

    let fetched = users.get(&created.id_hex()).await.unwrap();
    assert_eq!(fetched.name.as_deref(), Some("A"));
    assert_eq!(fetched.email.as_deref(), Some("a@x.com"));
    assert_eq!(fetched, created);
}

async fn empty_collection_lists_nothing(users: &UserRepository) {
    assert!(users.list().await.unwrap().is_empty());
}

async fn list_returns_every_user(users: &UserRepository) {
    let first = users.create(ada()).await.unwrap();
    let second = users
        .create(UserPatch::default().with_name("B"))
        .await
        .unwrap();

    let all = users.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&first));
    assert!(all.contains(&second));
}

async fn update_only_name_keeps_email(users: &UserRepository) {
    let created = users.create(ada()).await.unwrap();

    let updated = users
        .update(&created.id_hex(), UserPatch::default().with_name("B"))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name.as_deref(), Some("B"));
    assert_eq!(updated.email.as_deref(), Some("a@x.com"));
    assert_eq!(users.get(&created.id_hex()).await.unwrap(), updated);
}

async fn update_adds_missing_field(users: &UserRepository) {
    let created = users
        .create(UserPatch::default().with_name("Ada"))
        .await
        .unwrap();
    assert!(created.email.is_none());

    let updated = users
        .update(&created.id_hex(), UserPatch::default().with_email("ada@x.com"))
        .await
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Ada"));
    assert_eq!(updated.email.as_deref(), Some("ada@x.com"));
}

async fn empty_update_returns_current_state(users: &UserRepository) {
    let created = users.create(ada()).await.unwrap();

    let unchanged = users
        .update(&created.id_hex(), UserPatch::default())
        .await
        .unwrap();
    assert_eq!(unchanged, created);
}

async fn update_missing_user_is_not_found(users: &UserRepository) {
    let id = ObjectId::new().to_hex();
    let result = users
        .update(&id, UserPatch::default().with_name("x"))
        .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));

    let result = users.update(&id, UserPatch::default()).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

async fn delete_twice_reports_not_found_second_time(users: &UserRepository) {
    let created = users.create(ada()).await.unwrap();

    users.delete(&created.id_hex()).await.unwrap();
    assert!(matches!(
        users.delete(&created.id_hex()).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        users.get(&created.id_hex()).await,
        Err(StoreError::NotFound(_))
    ));
}

async fn malformed_ids_are_rejected(users: &UserRepository) {
    for result in [
        users.get("not-an-id").await.map(|_| ()),
        users
            .update("not-an-id", UserPatch::default())
            .await
            .map(|_| ()),
        users.delete("not-an-id").await,
    ] {
        assert!(matches!(result, Err(StoreError::InvalidId(_))));
    }
}

async fn create_without_email_omits_it(users: &UserRepository) {
    let created = users
        .create(UserPatch::default().with_name("Ada"))
        .await
        .unwrap();
    assert_eq!(created.name.as_deref(), Some("Ada"));
    assert!(created.email.is_none());

    let fetched = users.get(&created.id_hex()).await.unwrap();
    assert!(fetched.email.is_none());
}

macro_rules! in_memory_tests {
    ($($name:ident),* $(,)?) => {
        mod in_memory {
            $(
                #[tokio::test]
                async fn $name() {
                    super::$name(&userd::UserRepository::in_memory()).await;
                }
            )*
        }
    };
}

in_memory_tests!(
    create_then_get_round_trips,
    empty_collection_lists_nothing,
    list_returns_every_user,
    update_only_name_keeps_email,
    update_adds_missing_field,
    empty_update_returns_current_state,
    update_missing_user_is_not_found,
    delete_twice_reports_not_found_second_time,
    malformed_ids_are_rejected,
    create_without_email_omits_it,
);

#[cfg(feature = "backend-mongo")]
mod mongo {
    use userd::{ObjectId, StoreConfig, UserRepository};

    const URI_VAR: &str = "USERD_TEST_MONGO_URI";

    /// Repository over a fresh, uniquely named collection.
    async fn fresh_repository(uri: &str) -> (UserRepository, StoreConfig) {
        let cfg = StoreConfig {
            uri: uri.to_string(),
            database: "userd_test".to_string(),
            collection: format!("users_{}", ObjectId::new().to_hex()),
            connect_timeout_secs: 5,
            ..StoreConfig::default()
        };
        let users = UserRepository::connect(&cfg).await.unwrap();
        (users, cfg)
    }

    async fn drop_collection(cfg: &StoreConfig) {
        let client = mongodb::Client::with_uri_str(&cfg.uri).await.unwrap();
        client
            .database(&cfg.database)
            .collection::<mongodb::bson::Document>(&cfg.collection)
            .drop(None)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore = "needs a MongoDB deployment at USERD_TEST_MONGO_URI"]
    async fn mongo_backend_contract() {
        let Ok(uri) = std::env::var(URI_VAR) else {
            eprintln!("{URI_VAR} not set, skipping");
            return;
        };

        macro_rules! run {
            ($($check:ident),* $(,)?) => {
                $(
                    let (users, cfg) = fresh_repository(&uri).await;
                    super::$check(&users).await;
                    drop_collection(&cfg).await;
                )*
            };
        }

        run!(
            create_then_get_round_trips,
            empty_collection_lists_nothing,
            list_returns_every_user,
            update_only_name_keeps_email,
            update_adds_missing_field,
            empty_update_returns_current_state,
            update_missing_user_is_not_found,
            delete_twice_reports_not_found_second_time,
            malformed_ids_are_rejected,
            create_without_email_omits_it,
        );
    }
}
