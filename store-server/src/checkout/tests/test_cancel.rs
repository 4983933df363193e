//! Lock release: idempotency and terminal-state immutability

use super::*;

#[tokio::test]
async fn cancel_releases_an_active_lock() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 2).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let token = mgr.create(&cart).await.unwrap().reservation.token;
    let outcome = mgr.cancel(&token).await.unwrap();

    assert_eq!(outcome, CancelOutcome::Released);
    assert_eq!(lock_status(&db, &token).await, LockStatus::Cancelled);
}

#[tokio::test]
async fn cancel_is_idempotent() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 2).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let token = mgr.create(&cart).await.unwrap().reservation.token;
    mgr.cancel(&token).await.unwrap();

    let outcome = mgr.cancel(&token).await.unwrap();
    assert_eq!(
        outcome,
        CancelOutcome::AlreadyTerminal(LockStatus::Cancelled)
    );
}

#[tokio::test]
async fn cancel_of_unknown_token_reports_not_found() {
    let db = test_db().await;
    let outcome = manager(&db).cancel("lock_doesnotexist").await.unwrap();
    assert_eq!(outcome, CancelOutcome::NotFound);
}

#[tokio::test]
async fn cancel_of_overdue_lock_expires_it() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 2).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let token = mgr.create(&cart).await.unwrap().reservation.token;
    backdate_lock(&db, &token, now_millis() - 1_000).await;

    // The clock decides before the sweeper gets a chance
    let outcome = mgr.cancel(&token).await.unwrap();
    assert_eq!(outcome, CancelOutcome::AlreadyTerminal(LockStatus::Expired));
    assert_eq!(lock_status(&db, &token).await, LockStatus::Expired);
}

#[tokio::test]
async fn cancel_after_finalize_never_reopens_the_lock() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 2).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let token = mgr.create(&cart).await.unwrap().reservation.token;
    OrderFinalizer::new(db.clone())
        .finalize(&token, true)
        .await
        .unwrap();

    let outcome = mgr.cancel(&token).await.unwrap();
    assert_eq!(outcome, CancelOutcome::AlreadyTerminal(LockStatus::Used));
    assert_eq!(lock_status(&db, &token).await, LockStatus::Used);
    // The consumed stock stays consumed
    assert_eq!(stock_of(&db, &sku).await, 1);
}
