//! End-to-end shopping flow: sign up, customize a keyboard, manage the
//! cart, and check out, with local and remote state compared at each step.

use rust_decimal::Decimal;

use keebcraft_core::{Size, SwitchColor};
use keebcraft_integration_tests::{FakeUserStore, seeded_catalog};
use keebcraft_storefront::cart::CartSynchronizer;
use keebcraft_storefront::customize::Customization;
use keebcraft_storefront::remote::{CatalogApi, UserApi};
use keebcraft_storefront::session::SessionStore;

#[tokio::test]
async fn test_signup_customize_and_checkout() {
    let catalog = seeded_catalog();
    let users = FakeUserStore::default();
    let session = SessionStore::in_memory();

    // Sign up and record the session identity.
    let mut user = users.create_user("mika", "hunter").await.expect("signup");
    session.set_credentials("mika", "hunter");
    assert!(user.logged_in);
    assert!(user.cart.is_empty());

    // Customize the Aurora: draft copies the canonical record, the shopper
    // owns size and switch color.
    let aurora = catalog
        .get(keebcraft_core::KeyboardId::new(1))
        .await
        .expect("seeded");
    let mut customization = Customization::begin(session.clone(), &aurora);
    customization.apply_size(Size::Full);
    customization.apply_switch_color(SwitchColor::Red);
    let line = customization.commit().expect("complete draft");
    assert_eq!(line.name, "Aurora");
    assert_eq!(line.quantity, 1);

    // The canonical record is untouched by customization.
    let canonical = catalog
        .get(aurora.id)
        .await
        .expect("still present");
    assert_eq!(canonical, aurora);

    // Add to cart and bump the quantity; the remote store tracks both.
    let sync = CartSynchronizer::new(users.clone(), session.clone());
    let key = line.line_key;
    sync.add_line(&mut user, line).await.expect("add");
    sync.increase_quantity(&mut user, key).await.expect("bump");

    let stored = users.stored("mika").expect("remote aggregate");
    assert_eq!(stored.cart.len(), 1);
    assert_eq!(stored.cart.first().map(|l| l.quantity), Some(2));
    assert_eq!(user.cart_total(), Decimal::from(240));

    // Check out: history gains the lines, both carts empty out.
    sync.place_order(&mut user).await.expect("checkout");
    assert!(user.cart.is_empty());
    assert_eq!(user.order_history.len(), 1);

    let stored = users.stored("mika").expect("remote aggregate");
    assert!(stored.cart.is_empty());
    assert_eq!(stored.order_history.len(), 1);
    assert_eq!(users.order_history("mika").await.len(), 1);
}

#[tokio::test]
async fn test_value_identical_lines_stay_independent() {
    let catalog = seeded_catalog();
    let users = FakeUserStore::default();
    let session = SessionStore::in_memory();

    let mut user = users.create_user("mika", "hunter").await.expect("signup");
    session.set_credentials("mika", "hunter");

    let borealis = catalog
        .get(keebcraft_core::KeyboardId::new(2))
        .await
        .expect("seeded");

    // Two separately committed customizations with identical choices.
    let sync = CartSynchronizer::new(users.clone(), session.clone());
    let mut keys = Vec::new();
    for _ in 0..2 {
        let mut customization = Customization::begin(session.clone(), &borealis);
        customization.apply_size(Size::Compact);
        customization.apply_switch_color(SwitchColor::Red);
        let line = customization.commit().expect("complete");
        keys.push(line.line_key);
        sync.add_line(&mut user, line).await.expect("add");
    }

    assert_eq!(user.cart.len(), 2);
    assert_ne!(keys[0], keys[1]);

    // Removing by the second key leaves exactly the first line.
    sync.remove_line(&mut user, keys[1]).await.expect("remove");
    assert_eq!(user.cart.len(), 1);
    assert_eq!(user.cart.first().map(|l| l.line_key), Some(keys[0]));
    assert_eq!(users.stored("mika").map(|u| u.cart.len()), Some(1));
}

#[tokio::test]
async fn test_login_distinguishes_wrong_password() {
    use keebcraft_storefront::remote::users::AuthFailure;

    let users = FakeUserStore::default();
    users.create_user("mika", "hunter").await.expect("signup");

    assert!(users.login("mika", "hunter").await.is_ok());
    assert!(matches!(
        users.login("mika", "wrong").await,
        Err(AuthFailure::InvalidCredentials)
    ));
    assert!(matches!(
        users.login("nobody", "hunter").await,
        Err(AuthFailure::NotFound)
    ));
}

#[tokio::test]
async fn test_catalog_filter_and_search_semantics() {
    let catalog = seeded_catalog();

    let mid = catalog.filter(Decimal::from(80), Decimal::from(150)).await;
    let names: Vec<&str> = mid.iter().map(|k| k.name.as_str()).collect();
    assert_eq!(names, vec!["Aurora", "Borealis"]);

    let hits = catalog.search("oRe").await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().map(|k| k.name.as_str()), Some("Borealis"));

    assert!(catalog.search("zzz").await.is_empty());
}
