//! End-to-end order lifecycle tests against a fresh in-memory database:
//! place, resume, update, and settle for both dine-in and takeaway.

use pos_core::db::models::{DiningTableCreate, MenuItem, MenuItemCreate, StoreCreate};
use pos_core::{
    CatalogService, CheckoutProcessor, CustomerInfo, DbService, OrderLifecycle, OrderStatus,
    PaymentMethod, PosError, SessionContext,
};

struct Fixture {
    catalog: CatalogService,
    lifecycle: OrderLifecycle,
    checkout: CheckoutProcessor,
    ctx: SessionContext,
    table_id: String,
    burger: MenuItem,
    fries: MenuItem,
}

async fn fixture() -> Fixture {
    let db = DbService::open_in_memory().await.unwrap();
    let catalog = CatalogService::new(&db);

    let store = catalog
        .create_store(StoreCreate {
            name: "Main".to_string(),
            address: "1 High St".to_string(),
        })
        .await
        .unwrap();
    let store_id = store.id.clone().unwrap().to_string();

    let burger = catalog
        .create_item(MenuItemCreate {
            name: "Burger".to_string(),
            price: 12.99,
            category: None,
            storeid: store.id.clone(),
        })
        .await
        .unwrap();
    let fries = catalog
        .create_item(MenuItemCreate {
            name: "Fries".to_string(),
            price: 4.99,
            category: None,
            storeid: store.id.clone(),
        })
        .await
        .unwrap();

    let table = catalog
        .create_table(DiningTableCreate {
            table_no: 5,
            size: Some(4),
            label: "Main hall".to_string(),
            storeid: store.id.clone(),
        })
        .await
        .unwrap();
    let table_id = table.id.unwrap().to_string();

    Fixture {
        lifecycle: OrderLifecycle::new(&db),
        checkout: CheckoutProcessor::new(&db),
        ctx: SessionContext::new(store_id, "user:cashier1"),
        catalog,
        table_id,
        burger,
        fries,
    }
}

#[tokio::test]
async fn place_dine_in_binds_and_occupies_the_table() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    assert!(!session.resumed);
    assert!(!session.table.is_occupied);

    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.fries).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();

    assert!(session.cart.is_placed());
    assert_eq!(session.cart.version, 1);
    let receipt = session.cart.receipt_no.unwrap();
    assert!(receipt > 0);

    let table = fx
        .catalog
        .tables_for_store(&fx.ctx.store_id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.table_no == 5)
        .unwrap();
    assert!(table.is_occupied);

    let detail = fx
        .lifecycle
        .get_order(session.cart.id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(detail.status, OrderStatus::Pending);
    assert_eq!(detail.receipt_no, receipt);
    assert_eq!(detail.subtotal, 30.97);
    assert_eq!(detail.tax, 3.10);
    assert_eq!(detail.total_amount, 34.07);
    assert_eq!(detail.order_items.len(), 2);
    assert_eq!(detail.order_items[0].name, "Burger");
    assert_eq!(detail.order_items[0].quantity, 2);
    assert_eq!(detail.order_items[1].name, "Fries");
}

#[tokio::test]
async fn reopening_an_occupied_table_resumes_the_pending_order() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();
    let placed_id = session.cart.id.clone().unwrap();

    let resumed = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    assert!(resumed.resumed);
    assert_eq!(resumed.cart.id.as_deref(), Some(placed_id.as_str()));
    assert_eq!(resumed.cart.receipt_no, session.cart.receipt_no);
    assert_eq!(resumed.cart.lines.len(), 1);
    assert_eq!(resumed.cart.lines[0].name, "Burger");
    assert_eq!(resumed.cart.version, 1);
}

#[tokio::test]
async fn placing_a_second_order_on_an_occupied_table_conflicts() {
    let fx = fixture().await;

    let mut first = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    first.cart.add_item(&fx.burger).unwrap();
    fx.lifecycle.place(&mut first.cart, &fx.ctx).await.unwrap();

    // A racing draft created before the first placement landed
    let mut second = pos_core::OrderCart::new_dine_in(&fx.table_id);
    second.add_item(&fx.fries).unwrap();
    let err = fx.lifecycle.place(&mut second, &fx.ctx).await.unwrap_err();
    assert!(matches!(err, PosError::Conflict { .. }));
    assert!(!second.is_placed());
}

#[tokio::test]
async fn update_replaces_lines_and_keeps_the_receipt() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.fries).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();
    let receipt = session.cart.receipt_no.unwrap();

    // Remove the burger, double the fries
    let burger_id = fx.burger.id.as_ref().unwrap().to_string();
    let fries_id = fx.fries.id.as_ref().unwrap().to_string();
    session.cart.set_quantity(&burger_id, 0).unwrap();
    session.cart.set_quantity(&fries_id, 2).unwrap();
    fx.lifecycle.update(&mut session.cart).await.unwrap();
    assert_eq!(session.cart.version, 2);

    let detail = fx
        .lifecycle
        .get_order(session.cart.id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(detail.receipt_no, receipt);
    assert_eq!(detail.version, 2);
    assert_eq!(detail.order_items.len(), 1);
    assert_eq!(detail.order_items[0].name, "Fries");
    assert_eq!(detail.order_items[0].quantity, 2);
    assert_eq!(detail.subtotal, 9.98);
    assert_eq!(detail.total_amount, 10.98);
}

#[tokio::test]
async fn stale_version_update_conflicts() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();

    // Two operators resume the same order
    let mut other = fx
        .lifecycle
        .current_pending_for_table(&fx.table_id)
        .await
        .unwrap()
        .unwrap();
    other.add_item(&fx.fries).unwrap();
    fx.lifecycle.update(&mut other).await.unwrap();

    // The first cart is now one version behind
    session.cart.add_item(&fx.burger).unwrap();
    let err = fx.lifecycle.update(&mut session.cart).await.unwrap_err();
    assert!(matches!(err, PosError::Conflict { .. }));

    // The concurrent edit survived
    let detail = fx
        .lifecycle
        .get_order(other.id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(detail.order_items.len(), 2);
}

#[tokio::test]
async fn settle_completes_the_order_and_releases_the_table() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.fries).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();
    let order_id = session.cart.id.clone().unwrap();

    let settlement = fx
        .checkout
        .settle(
            &mut session.cart,
            PaymentMethod::Cash,
            40.0,
            CustomerInfo::default(),
        )
        .await
        .unwrap();
    assert_eq!(settlement.total, 34.07);
    assert_eq!(settlement.amount_paid, 40.0);
    assert_eq!(settlement.change_due, 5.93);
    assert_eq!(session.cart.status, OrderStatus::Completed);

    let detail = fx.lifecycle.get_order(&order_id).await.unwrap();
    assert_eq!(detail.status, OrderStatus::Completed);
    assert!(detail.completed_at.is_some());

    let table = fx
        .catalog
        .tables_for_store(&fx.ctx.store_id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.table_no == 5)
        .unwrap();
    assert!(!table.is_occupied);

    let payments = fx.checkout.payments_for_order(&order_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount_paid, 40.0);
    assert_eq!(payments[0].change_due, 5.93);
    assert_eq!(payments[0].payment_method, PaymentMethod::Cash);

    // Freed table opens as a fresh draft
    let reopened = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    assert!(!reopened.resumed);
    assert!(reopened.cart.is_empty());
}

#[tokio::test]
async fn insufficient_payment_leaves_the_order_untouched() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.burger).unwrap();
    session.cart.add_item(&fx.fries).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();
    let order_id = session.cart.id.clone().unwrap();

    let err = fx
        .checkout
        .settle(
            &mut session.cart,
            PaymentMethod::Cash,
            30.0,
            CustomerInfo::default(),
        )
        .await
        .unwrap_err();
    match err {
        PosError::InsufficientPayment { paid, total } => {
            assert_eq!(paid, 30.0);
            assert_eq!(total, 34.07);
        }
        other => panic!("expected InsufficientPayment, got {other:?}"),
    }

    let detail = fx.lifecycle.get_order(&order_id).await.unwrap();
    assert_eq!(detail.status, OrderStatus::Pending);
    assert!(fx.checkout.payments_for_order(&order_id).await.unwrap().is_empty());

    let table = fx
        .catalog
        .tables_for_store(&fx.ctx.store_id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.table_no == 5)
        .unwrap();
    assert!(table.is_occupied);
}

#[tokio::test]
async fn settling_twice_conflicts() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    session.cart.add_item(&fx.fries).unwrap();
    fx.lifecycle.place(&mut session.cart, &fx.ctx).await.unwrap();
    let order_id = session.cart.id.clone().unwrap();

    fx.checkout
        .settle(
            &mut session.cart,
            PaymentMethod::Card,
            10.0,
            CustomerInfo::default(),
        )
        .await
        .unwrap();

    // A stale copy of the cart that still believes the order is pending
    let mut stale = fx.lifecycle.get_order(&order_id).await.unwrap();
    stale.status = OrderStatus::Pending;
    let mut stale_cart = pos_core::OrderCart::from_detail(&stale, Some(fx.table_id.clone()));
    let err = fx
        .checkout
        .settle(
            &mut stale_cart,
            PaymentMethod::Card,
            10.0,
            CustomerInfo::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PosError::Conflict { .. }));

    assert_eq!(
        fx.checkout.payments_for_order(&order_id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn takeaway_flow_needs_no_table() {
    let fx = fixture().await;

    let mut cart = fx.lifecycle.start_takeaway();
    cart.add_item(&fx.fries).unwrap();
    fx.lifecycle.place(&mut cart, &fx.ctx).await.unwrap();
    let order_id = cart.id.clone().unwrap();

    let backlog = fx.lifecycle.pending_orders().await.unwrap();
    assert_eq!(backlog.len(), 1);
    assert_eq!(backlog[0].id.to_string(), order_id);

    let customer = CustomerInfo {
        name: "Ada".to_string(),
        address: "2 Low St".to_string(),
        mobile: "555-0100".to_string(),
    };
    let settlement = fx
        .checkout
        .settle(&mut cart, PaymentMethod::Upi, 5.49, customer.clone())
        .await
        .unwrap();
    assert_eq!(settlement.total, 5.49);
    assert_eq!(settlement.change_due, 0.0);

    let detail = fx.lifecycle.get_order(&order_id).await.unwrap();
    assert_eq!(detail.status, OrderStatus::Completed);
    assert_eq!(detail.customer(), customer);
}

#[tokio::test]
async fn placing_an_empty_cart_is_rejected() {
    let fx = fixture().await;

    let mut session = fx.lifecycle.open_table(&fx.table_id).await.unwrap();
    let err = fx
        .lifecycle
        .place(&mut session.cart, &fx.ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, PosError::Validation { .. }));
    assert!(!session.cart.is_placed());

    // Nothing was written; the table stays free
    let table = fx
        .catalog
        .tables_for_store(&fx.ctx.store_id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.table_no == 5)
        .unwrap();
    assert!(!table.is_occupied);
}

#[tokio::test]
async fn menu_groups_by_category_in_name_order() {
    let db = DbService::open_in_memory().await.unwrap();
    let catalog = CatalogService::new(&db);
    let store = catalog
        .create_store(StoreCreate {
            name: "Main".to_string(),
            address: String::new(),
        })
        .await
        .unwrap();
    let store_id = store.id.clone().unwrap().to_string();

    let mains = catalog
        .create_category(pos_core::db::models::CategoryCreate {
            name: "Mains".to_string(),
        })
        .await
        .unwrap();
    let drinks = catalog
        .create_category(pos_core::db::models::CategoryCreate {
            name: "Drinks".to_string(),
        })
        .await
        .unwrap();

    for (name, price, category) in [
        ("Pasta", 11.50, mains.id.clone()),
        ("Cola", 2.50, drinks.id.clone()),
        ("Burger", 12.99, mains.id.clone()),
    ] {
        catalog
            .create_item(MenuItemCreate {
                name: name.to_string(),
                price,
                category,
                storeid: store.id.clone(),
            })
            .await
            .unwrap();
    }

    let menu = catalog.menu_for_store(&store_id).await.unwrap();
    assert_eq!(menu.len(), 2);
    assert_eq!(menu[0].0, "Drinks");
    assert_eq!(menu[1].0, "Mains");
    let mains_names: Vec<&str> = menu[1].1.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(mains_names, vec!["Burger", "Pasta"]);
}

#[tokio::test]
async fn duplicate_table_number_conflicts() {
    let fx = fixture().await;
    let store_rid = fx.burger.storeid.clone();
    let err = fx
        .catalog
        .create_table(DiningTableCreate {
            table_no: 5,
            size: None,
            label: String::new(),
            storeid: store_rid,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PosError::Conflict { .. }));
}
