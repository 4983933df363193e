//! Finalization: the atomic lock-to-order transaction

use super::*;

use shared::models::OrderStatus;

#[tokio::test]
async fn finalize_consumes_the_lock_atomically() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1050, 5).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 2)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;
    let order = OrderFinalizer::new(db.clone())
        .finalize(&token, true)
        .await
        .unwrap();

    // Stock moved exactly once, at finalization
    assert_eq!(stock_of(&db, &sku).await, 3);
    assert_eq!(lock_status(&db, &token).await, LockStatus::Used);

    // The order carries the frozen snapshot
    assert_eq!(order.lock_token, token);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.items[0].unit_price, Decimal::new(1050, 2));
    assert_eq!(order.subtotal, Decimal::new(2100, 2));
    assert_eq!(order.shipping_fee, Decimal::new(499, 2));
    assert_eq!(order.total, Decimal::new(2599, 2));
    assert_eq!(order.status, OrderStatus::Paid);

    // The cart was emptied in the same transaction
    let cart_row = CartRepository::new(db.clone())
        .find_by_id(&cart)
        .await
        .unwrap()
        .unwrap();
    assert!(cart_row.items.is_empty());
}

#[tokio::test]
async fn second_finalize_fails_without_moving_stock() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 5).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 2)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;
    let finalizer = OrderFinalizer::new(db.clone());
    finalizer.finalize(&token, true).await.unwrap();

    let err = finalizer.finalize(&token, true).await.unwrap_err();
    assert!(matches!(err, CheckoutError::LockAlreadyUsed));
    assert_eq!(stock_of(&db, &sku).await, 3);
}

#[tokio::test]
async fn finalize_of_overdue_lock_fails_and_expires_it() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 5).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 2)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;
    backdate_lock(&db, &token, now_millis() - 1_000).await;

    let err = OrderFinalizer::new(db.clone())
        .finalize(&token, true)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::LockExpired));
    assert_eq!(lock_status(&db, &token).await, LockStatus::Expired);
    assert_eq!(stock_of(&db, &sku).await, 5);
}

#[tokio::test]
async fn finalize_of_cancelled_lock_fails() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 5).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 2)]).await;
    let mgr = manager(&db);

    let token = mgr.create(&cart).await.unwrap().reservation.token;
    mgr.cancel(&token).await.unwrap();

    let err = OrderFinalizer::new(db.clone())
        .finalize(&token, true)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::LockAlreadyUsed));
}

#[tokio::test]
async fn finalize_of_unknown_token_fails_as_expired() {
    let db = test_db().await;
    let err = OrderFinalizer::new(db.clone())
        .finalize("lock_doesnotexist", true)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::LockExpired));
}

#[tokio::test]
async fn finalize_rolls_back_when_stock_shrank() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 5).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 3)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;

    // Stock dropped out of band after the lock was taken
    ProductRepository::new(db.clone())
        .set_stock(&sku, 1)
        .await
        .unwrap();

    let err = OrderFinalizer::new(db.clone())
        .finalize(&token, true)
        .await
        .unwrap_err();
    match err {
        CheckoutError::StockChanged(items) => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].unit, sku);
            assert_eq!(items[0].requested, 3);
            assert_eq!(items[0].available, 1);
        }
        other => panic!("expected StockChanged, got {other:?}"),
    }

    // Everything rolled back: stock untouched, lock still usable
    assert_eq!(stock_of(&db, &sku).await, 1);
    assert_eq!(lock_status(&db, &token).await, LockStatus::Active);
}

#[tokio::test]
async fn unconfirmed_transfer_order_is_pending_verification() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 5).await;
    let cart = seed_cart(&db, "s1", &[(&sku, 1)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;
    let order = OrderFinalizer::new(db.clone())
        .finalize(&token, false)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::PendingVerification);
    assert!(order.payment_reference.is_none());
}

#[tokio::test]
async fn preauthorized_card_order_is_paid_without_confirmation() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 5).await;
    let cart = seed_cart_with(
        &db,
        "s1",
        &[(&sku, 1)],
        Some(standard_shipping()),
        Some(PaymentMethod::Card),
    )
    .await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;
    let order = OrderFinalizer::new(db.clone())
        .finalize(&token, false)
        .await
        .unwrap();

    // The gateway reference stands in for explicit confirmation
    assert_eq!(order.status, OrderStatus::Paid);
    assert!(order.payment_reference.is_some());
}

#[tokio::test]
async fn concurrent_finalizes_never_oversell() {
    let db = test_db().await;
    let sku = seed_product(&db, "SKU X", 1000, 2).await;
    let cart_a = seed_cart(&db, "s1", &[(&sku, 1)]).await;
    let cart_b = seed_cart(&db, "s2", &[(&sku, 1)]).await;
    let mgr = manager(&db);

    let token_a = mgr.create(&cart_a).await.unwrap().reservation.token;
    let token_b = mgr.create(&cart_b).await.unwrap().reservation.token;

    // Only one unit left for two live locks
    ProductRepository::new(db.clone())
        .set_stock(&sku, 1)
        .await
        .unwrap();

    let finalizer_a = OrderFinalizer::new(db.clone());
    let finalizer_b = OrderFinalizer::new(db.clone());
    let (result_a, result_b) = tokio::join!(
        finalizer_a.finalize(&token_a, true),
        finalizer_b.finalize(&token_b, true)
    );

    let committed = [result_a.is_ok(), result_b.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert!(committed <= 1);

    let stock = stock_of(&db, &sku).await;
    assert!(stock >= 0);
    if committed == 1 {
        assert_eq!(stock, 0);
    }

    #[derive(serde::Deserialize)]
    struct CountRow {
        count: i64,
    }
    let mut result = db
        .query("SELECT count() FROM type::table($tb) GROUP ALL")
        .bind(("tb", "order"))
        .await
        .unwrap();
    let counts: Vec<CountRow> = result.take(0).unwrap();
    let orders = counts.first().map(|c| c.count).unwrap_or(0);
    assert_eq!(orders as usize, committed);
}

#[tokio::test]
async fn finalize_handles_multiple_units() {
    let db = test_db().await;
    let sku_a = seed_product(&db, "SKU A", 1000, 4).await;
    let sku_b = seed_product(&db, "SKU B", 250, 10).await;
    let cart = seed_cart(&db, "s1", &[(&sku_a, 2), (&sku_b, 3)]).await;

    let token = manager(&db).create(&cart).await.unwrap().reservation.token;
    let order = OrderFinalizer::new(db.clone())
        .finalize(&token, true)
        .await
        .unwrap();

    assert_eq!(order.items.len(), 2);
    assert_eq!(stock_of(&db, &sku_a).await, 2);
    assert_eq!(stock_of(&db, &sku_b).await, 7);
}
