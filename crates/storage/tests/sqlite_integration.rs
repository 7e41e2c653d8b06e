use storage::repository::{ProgressRepository, Storage};
use storage::sqlite::SqliteRepository;
use tutor_core::model::UserId;

#[tokio::test]
async fn sqlite_progress_defaults_and_upserts() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let user = UserId::new(1_348_491_591);
    assert_eq!(repo.get_progress(user).await.unwrap(), 0);

    repo.set_progress(user, 3).await.unwrap();
    repo.set_progress(user, 4).await.unwrap();
    assert_eq!(repo.get_progress(user).await.unwrap(), 4);
}

#[tokio::test]
async fn sqlite_progress_is_isolated_per_user() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_isolation?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set_progress(UserId::new(1), 7).await.unwrap();
    repo.set_progress(UserId::new(2), 1).await.unwrap();

    assert_eq!(repo.get_progress(UserId::new(1)).await.unwrap(), 7);
    assert_eq!(repo.get_progress(UserId::new(2)).await.unwrap(), 1);
    assert_eq!(repo.get_progress(UserId::new(3)).await.unwrap(), 0);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set_progress(UserId::new(9), 2).await.unwrap();
    repo.migrate().await.expect("second migrate");

    assert_eq!(repo.get_progress(UserId::new(9)).await.unwrap(), 2);
}

#[tokio::test]
async fn storage_sqlite_exposes_progress_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.progress.set_progress(UserId::new(5), 11).await.unwrap();
    assert_eq!(storage.progress.get_progress(UserId::new(5)).await.unwrap(), 11);
}
