//! Expiry sweeper: the backstop for abandoned locks

use super::*;

#[tokio::test]
async fn sweep_expires_only_overdue_active_locks() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 10).await;
    let cart_a = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let cart_b = seed_cart(&db, "s2", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let overdue = mgr.create(&cart_a).await.unwrap().reservation.token;
    let live = mgr.create(&cart_b).await.unwrap().reservation.token;
    backdate_lock(&db, &overdue, now_millis() - 1_000).await;

    sweeper(&db).sweep_once().await;

    assert_eq!(lock_status(&db, &overdue).await, LockStatus::Expired);
    assert_eq!(lock_status(&db, &live).await, LockStatus::Active);
}

#[tokio::test]
async fn sweep_never_touches_terminal_locks() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 10).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let token = mgr.create(&cart).await.unwrap().reservation.token;
    mgr.cancel(&token).await.unwrap();
    // Even with the deadline in the past, cancelled stays cancelled
    backdate_lock(&db, &token, now_millis() - 1_000).await;

    sweeper(&db).sweep_once().await;

    assert_eq!(lock_status(&db, &token).await, LockStatus::Cancelled);
}

#[tokio::test]
async fn sweep_is_a_noop_when_nothing_is_overdue() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 10).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;

    sweeper(&db).sweep_once().await;
    assert_eq!(lock_status(&db, &token).await, LockStatus::Active);
}

#[tokio::test]
async fn expire_due_reports_how_many_locks_it_flipped() {
    // The startup catch-up path: several locks went overdue while down
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 10).await;
    let mgr = manager(&db);
    let repo = ReservationRepository::new(db.clone());

    let mut overdue = Vec::new();
    for session in ["s1", "s2", "s3"] {
        let cart = seed_cart(&db, session, &[(&sku, 1)]).await;
        overdue.push(mgr.create(&cart).await.unwrap().reservation.token);
    }
    for token in &overdue {
        backdate_lock(&db, token, now_millis() - 1_000).await;
    }

    let flipped = repo.expire_due(now_millis()).await.unwrap();
    assert_eq!(flipped, 3);

    // A second pass finds nothing left to do
    assert_eq!(repo.expire_due(now_millis()).await.unwrap(), 0);
}
