use super::*;
use crate::arc_path;

#[tokio::test]
async fn test_values_survive_a_restart() {
    let fs = Fs::mock();
    let path = arc_path("/data/sandwich-hub/storage.toml");

    let storage = Storage::spawn(fs.clone(), path.clone()).await.unwrap();
    assert_eq!(storage.get(TOKEN_KEY).await, None);
    storage.set(TOKEN_KEY, "tok-1").await.unwrap();

    let reopened = Storage::spawn(fs, path).await.unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).await.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_remove_deletes_the_key() {
    let storage = Storage::spawn(Fs::mock(), arc_path("storage.toml"))
        .await
        .unwrap();
    storage.set(TOKEN_KEY, "tok").await.unwrap();
    storage.remove(TOKEN_KEY).await.unwrap();
    storage.remove("never-set").await.unwrap();
    assert_eq!(storage.get(TOKEN_KEY).await, None);
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let fs = Fs::mock();
    let path = arc_path("storage.toml");
    fs.write(path.clone(), "not = [valid").await.unwrap();
    assert!(Storage::spawn(fs, path).await.is_err());
}

#[tokio::test]
async fn test_owned_sandwiches_are_deduplicated() {
    let storage = Storage::mock();
    storage.remember_sandwich(4).await.unwrap();
    storage.remember_sandwich(9).await.unwrap();
    storage.remember_sandwich(4).await.unwrap();

    assert_eq!(storage.owned_sandwiches().await, vec![4, 9]);
    assert!(storage.owns_sandwich(9).await);

    storage.forget_sandwich(4).await.unwrap();
    assert_eq!(storage.owned_sandwiches().await, vec![9]);
    assert!(!storage.owns_sandwich(4).await);
}

#[tokio::test]
async fn test_malformed_owned_list_reads_as_empty() {
    let storage = Storage::mock();
    storage.set(MY_SANDWICHES_KEY, "oops").await.unwrap();
    assert!(storage.owned_sandwiches().await.is_empty());
}

#[tokio::test]
async fn test_concurrent_updates_keep_every_id() {
    let fs = Fs::mock();
    let path = arc_path("storage.toml");
    let storage = Storage::spawn(fs.clone(), path.clone()).await.unwrap();

    let handles: Vec<_> = (1..=20)
        .map(|id| {
            let storage = storage.clone();
            tokio::spawn(async move { storage.remember_sandwich(id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let (forget, remember) = tokio::join!(storage.forget_sandwich(3), storage.remember_sandwich(21));
    forget.unwrap();
    remember.unwrap();

    let mut owned = storage.owned_sandwiches().await;
    owned.sort();
    let expected: Vec<i64> = (1..=21).filter(|id| *id != 3).collect();
    assert_eq!(owned, expected);

    let reopened = Storage::spawn(fs, path).await.unwrap();
    assert_eq!(reopened.owned_sandwiches().await.len(), 20);
}
