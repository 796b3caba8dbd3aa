//! End-to-end order lifecycle tests against a real (tempdir) database

mod common;

use common::{customer, seed_menu_item, setup, staff};
use futures::future::join_all;

use order_server::db::repository::{OrderRepository, RepoError};
use shared::error::ErrorCode;
use shared::models::{OrderLineInput, OrderStatus, PlaceOrderRequest};
use shared::realtime::{EventName, OrderEventPayload, Topic};

fn request_for(items: Vec<(String, i32)>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        customer_name: Some("Ana".to_string()),
        items: items
            .into_iter()
            .map(|(menu_item_ref, quantity)| OrderLineInput {
                menu_item_ref,
                quantity,
            })
            .collect(),
        special_instructions: None,
    }
}

#[tokio::test]
async fn place_order_computes_totals_from_menu_prices() {
    let ctx = setup().await;
    let item_a = seed_menu_item(&ctx.state, "Masala Dosa", 100.0, true).await;
    let item_b = seed_menu_item(&ctx.state, "Filter Coffee", 50.0, true).await;

    let actor = customer("user:ana", "Ana");
    let order = ctx
        .state
        .orders
        .place_order(&actor, request_for(vec![(item_a, 2), (item_b, 1)]))
        .await
        .unwrap();

    assert_eq!(order.subtotal, 250.0);
    assert_eq!(order.service_fee, 5.0);
    assert_eq!(order.total, 255.0);
    assert_eq!(order.status, OrderStatus::Placed);
    assert!(order.order_number.starts_with("ORD"));
    assert_eq!(order.order_number.len(), 9);
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.lines[0].name, "Masala Dosa");
    assert_eq!(order.lines[0].subtotal, 200.0);
    assert!(order.estimated_ready_at > order.created_at);
    assert!(order.completed_at.is_none());
}

#[tokio::test]
async fn empty_order_is_rejected_without_side_effects() {
    let ctx = setup().await;
    let transport = ctx.state.hub.memory_transport();
    ctx.state.hub.subscribe(transport.connection_id(), Topic::Staff);

    let actor = customer("user:ana", "Ana");
    let err = ctx
        .state
        .orders
        .place_order(&actor, request_for(vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderEmpty);

    // Nothing persisted, nothing published
    let page = ctx
        .state
        .orders
        .list_orders(None, 1, 50)
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 0);
    assert!(transport.try_read_frame().is_none());
}

#[tokio::test]
async fn unknown_and_unavailable_items_are_rejected() {
    let ctx = setup().await;
    let sold_out = seed_menu_item(&ctx.state, "Specials Thali", 120.0, false).await;
    let actor = customer("user:ana", "Ana");

    let err = ctx
        .state
        .orders
        .place_order(&actor, request_for(vec![("menu_item:missing".to_string(), 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MenuItemNotFound);

    let err = ctx
        .state
        .orders
        .place_order(&actor, request_for(vec![(sold_out, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ItemUnavailable);
}

#[tokio::test]
async fn staff_walks_the_full_lifecycle() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Idli", 40.0, true).await;
    let placed = ctx
        .state
        .orders
        .place_order(&customer("user:ana", "Ana"), request_for(vec![(item, 1)]))
        .await
        .unwrap();
    let id = placed.id.clone().unwrap();
    let operator = staff("user:staff1", "Raj");

    for next in [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        let updated = ctx
            .state
            .orders
            .update_status(&id, next, &operator)
            .await
            .unwrap();
        assert_eq!(updated.status, next);
        assert!(updated.completed_at.is_none());
    }

    let completed = ctx
        .state
        .orders
        .update_status(&id, OrderStatus::Completed, &operator)
        .await
        .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.completed_at.is_some());

    // Terminal: no further transitions
    let err = ctx
        .state
        .orders
        .update_status(&id, OrderStatus::Cancelled, &operator)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn backward_transition_leaves_store_unchanged() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Vada", 30.0, true).await;
    let placed = ctx
        .state
        .orders
        .place_order(&customer("user:ana", "Ana"), request_for(vec![(item, 1)]))
        .await
        .unwrap();
    let id = placed.id.clone().unwrap();
    let operator = staff("user:staff1", "Raj");

    for next in [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        ctx.state
            .orders
            .update_status(&id, next, &operator)
            .await
            .unwrap();
    }

    let err = ctx
        .state
        .orders
        .update_status(&id, OrderStatus::Preparing, &operator)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    let current = ctx.state.orders.get_order(&id, &operator).await.unwrap();
    assert_eq!(current.status, OrderStatus::Ready);
}

#[tokio::test]
async fn customers_may_only_cancel_their_own_orders() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Pongal", 60.0, true).await;
    let ana = customer("user:ana", "Ana");
    let bela = customer("user:bela", "Bela");

    let order = ctx
        .state
        .orders
        .place_order(&ana, request_for(vec![(item, 1)]))
        .await
        .unwrap();
    let id = order.id.clone().unwrap();

    // Another customer cannot cancel it
    let err = ctx.state.orders.cancel(&id, &bela).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    // A customer cannot advance status at all
    let err = ctx
        .state
        .orders
        .update_status(&id, OrderStatus::Accepted, &ana)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    // The owner can cancel
    let cancelled = ctx.state.orders.cancel(&id, &ana).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn stale_compare_and_set_loses_with_conflict() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Upma", 45.0, true).await;
    let placed = ctx
        .state
        .orders
        .place_order(&customer("user:ana", "Ana"), request_for(vec![(item, 1)]))
        .await
        .unwrap();

    let repo = OrderRepository::new(ctx.state.get_db());
    let record = repo
        .find_by_number(&placed.order_number)
        .await
        .unwrap()
        .unwrap();
    let id = record.id.unwrap();
    let now = shared::util::now_millis();

    // First writer wins
    repo.transition_status(&id, OrderStatus::Placed, OrderStatus::Accepted, None, now)
        .await
        .unwrap();

    // Second writer still believes the order is Placed
    let err = repo
        .transition_status(&id, OrderStatus::Placed, OrderStatus::Accepted, None, now)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[tokio::test]
async fn concurrent_compare_and_set_has_exactly_one_winner() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Sambar Rice", 70.0, true).await;
    let placed = ctx
        .state
        .orders
        .place_order(&customer("user:ana", "Ana"), request_for(vec![(item, 1)]))
        .await
        .unwrap();

    let repo = OrderRepository::new(ctx.state.get_db());
    let record = repo
        .find_by_number(&placed.order_number)
        .await
        .unwrap()
        .unwrap();
    let id = record.id.unwrap();
    let now = shared::util::now_millis();

    let (a, b) = tokio::join!(
        repo.transition_status(&id, OrderStatus::Placed, OrderStatus::Accepted, None, now),
        repo.transition_status(&id, OrderStatus::Placed, OrderStatus::Cancelled, None, now),
    );

    let winners = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent writer may win");
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(loser.unwrap_err(), RepoError::Conflict(_)));
}

#[tokio::test]
async fn concurrent_placements_get_distinct_order_numbers() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Poori", 55.0, true).await;
    let actor = customer("user:ana", "Ana");

    let placements = (0..8).map(|_| {
        let orders = ctx.state.orders.clone();
        let actor = actor.clone();
        let request = request_for(vec![(item.clone(), 1)]);
        async move { orders.place_order(&actor, request).await }
    });
    let results = join_all(placements).await;

    let mut numbers: Vec<String> = results
        .into_iter()
        .map(|r| r.unwrap().order_number)
        .collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 8, "order numbers must be distinct");
}

#[tokio::test]
async fn status_update_broadcasts_one_snapshot_per_subscriber() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Kesari", 35.0, true).await;

    let staff_screen = ctx.state.hub.memory_transport();
    let kiosk = ctx.state.hub.memory_transport();
    ctx.state
        .hub
        .subscribe(staff_screen.connection_id(), Topic::Staff);
    ctx.state.hub.subscribe(kiosk.connection_id(), Topic::Customer);

    let placed = ctx
        .state
        .orders
        .place_order(&customer("user:ana", "Ana"), request_for(vec![(item, 1)]))
        .await
        .unwrap();

    // Both topics received the creation event
    for transport in [&staff_screen, &kiosk] {
        let frame = transport.read_frame().await.unwrap();
        let payload: OrderEventPayload = frame.parse_payload().unwrap();
        assert_eq!(payload.event, EventName::NewOrder);
        assert_eq!(payload.order.status, OrderStatus::Placed);
    }

    let id = placed.id.clone().unwrap();
    ctx.state
        .orders
        .update_status(&id, OrderStatus::Accepted, &staff("user:staff1", "Raj"))
        .await
        .unwrap();

    // Exactly one status event each, carrying the new snapshot
    for transport in [&staff_screen, &kiosk] {
        let frame = transport.read_frame().await.unwrap();
        let payload: OrderEventPayload = frame.parse_payload().unwrap();
        assert_eq!(payload.event, EventName::OrderStatusUpdated);
        assert_eq!(payload.order.status, OrderStatus::Accepted);
        assert!(transport.try_read_frame().is_none());
    }

    // A connection subscribing after the update sees nothing...
    let late = ctx.state.hub.memory_transport();
    ctx.state.hub.subscribe(late.connection_id(), Topic::Customer);
    assert!(late.try_read_frame().is_none());

    // ...but resolves current truth through tracking
    let tracked = ctx
        .state
        .tracking
        .resolve(Some(&placed.order_number))
        .await
        .unwrap();
    assert_eq!(tracked.status, OrderStatus::Accepted);
}

#[tokio::test]
async fn deactivated_orders_leave_default_queries_but_are_retained() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Rava Dosa", 90.0, true).await;
    let placed = ctx
        .state
        .orders
        .place_order(&customer("user:ana", "Ana"), request_for(vec![(item, 1)]))
        .await
        .unwrap();

    let repo = OrderRepository::new(ctx.state.get_db());
    let record = repo
        .find_by_number(&placed.order_number)
        .await
        .unwrap()
        .unwrap();
    let id = record.id.clone().unwrap();
    repo.deactivate(&id).await.unwrap();

    // Gone from tracking and from the staff queue
    let err = ctx
        .state
        .tracking
        .resolve(Some(&placed.order_number))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
    let page = ctx.state.orders.list_orders(None, 1, 50).await.unwrap();
    assert_eq!(page.pagination.total, 0);

    // Still physically present in the store
    let retained = repo.find_by_id(&id).await.unwrap().unwrap();
    assert!(!retained.is_active);
}

#[tokio::test]
async fn tracking_resolves_tokens_and_falls_back_to_latest() {
    let ctx = setup().await;
    let item = seed_menu_item(&ctx.state, "Bonda", 25.0, true).await;
    let actor = customer("user:ana", "Ana");

    let first = ctx
        .state
        .orders
        .place_order(&actor, request_for(vec![(item.clone(), 1)]))
        .await
        .unwrap();
    // Ensure distinct created_at for deterministic "latest"
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = ctx
        .state
        .orders
        .place_order(&actor, request_for(vec![(item, 2)]))
        .await
        .unwrap();

    // By order number, with display marker and lowercase
    let token = format!("#{}", first.order_number.to_lowercase());
    let resolved = ctx.state.tracking.resolve(Some(&token)).await.unwrap();
    assert_eq!(resolved.order_number, first.order_number);

    // By record id
    let resolved = ctx
        .state
        .tracking
        .resolve(Some(first.id.as_deref().unwrap()))
        .await
        .unwrap();
    assert_eq!(resolved.order_number, first.order_number);

    // No token: best-effort newest active order
    let resolved = ctx.state.tracking.resolve(None).await.unwrap();
    assert_eq!(resolved.order_number, second.order_number);

    // Unknown token
    let err = ctx
        .state
        .tracking
        .resolve(Some("ORD999999"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}
