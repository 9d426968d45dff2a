use cart::CartState;
use products::ProductState;
use rewind_engine::{
    attach_json, Container, HistoryConfig, HistoryConfigBuilder, HistoryHandle, JsonCodec, Store,
};
use std::error::Error;
use std::sync::Arc;
use stress_test::{stress_test_history, stress_test_scaling};
use tracing_subscriber::EnvFilter;

pub mod cart;
pub mod products;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    cart_walkthrough()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_main())
}

type CartHistory = HistoryHandle<Store<CartState>, JsonCodec>;

fn show(step: &str, store: &Store<CartState>, history: &CartHistory) {
    println!(
        "  {:<34} {:<46} past={} future={}",
        step,
        store.read(|cart| cart.summary()),
        history.past_len(),
        history.future_len()
    );
}

/// Walk a cart through adds, undos and redos, printing each step.
fn cart_walkthrough() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║            CART UNDO/REDO WALKTHROUGH                      ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // The catalogue is loaded once and never undone, so it opts out.
    let products = Arc::new(Store::new("ProductStore", ProductState::default()));
    let _product_history = attach_json(products.clone(), HistoryConfig::disabled())?;
    let mut catalogue = ProductState::default();
    catalogue.fetch_products()?;
    products.set_state(catalogue)?;

    let find = |name: &str| {
        products
            .read(|state| state.find(name).cloned())
            .ok_or_else(|| format!("{} is not in the catalogue", name))
    };
    let gum = find("Pineapple Gum")?;
    let dried = find("Dried Pineapple")?;
    let juice = find("Pineapple Juice")?;

    let cart = Arc::new(Store::new("CartStore", CartState::default()));
    let history = attach_json(
        cart.clone(),
        HistoryConfigBuilder::new().label("CartStore").max_history(50).build(),
    )?;
    show("attached", &cart, &history);

    cart.patch(|c| c.add_item(1, &gum))?;
    show("add 1 Pineapple Gum", &cart, &history);

    cart.patch(|c| c.add_item(2, &dried))?;
    show("add 2 Dried Pineapple", &cart, &history);

    history.undo()?;
    show("undo", &cart, &history);

    history.undo()?;
    show("undo", &cart, &history);

    let applied = history.undo()?;
    show(if applied { "undo" } else { "undo (nothing to undo)" }, &cart, &history);

    history.redo()?;
    show("redo", &cart, &history);

    cart.patch(|c| c.update_item_count(3, &juice))?;
    show("set Pineapple Juice to 3", &cart, &history);

    let applied = history.redo()?;
    show(if applied { "redo" } else { "redo (nothing to redo)" }, &cart, &history);

    cart.patch(|c| c.remove_item(&gum.name))?;
    show("remove Pineapple Gum", &cart, &history);

    history.undo()?;
    show("undo", &cart, &history);

    let (count, price) = cart.read(|c| (c.total_count(), c.total_price()));
    println!("\n  Cart holds {} items worth ${:.2}", count, price);
    Ok(())
}

async fn async_main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Run async stress tests
    println!("\n\n╔════════════════════════════════════════════════════════════╗");
    println!("║            ASYNC STRESS TESTS                               ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    // Test 1: few writers
    let stats = stress_test_history(4, 100, 200).await?;
    stats.print();

    // Test 2: more writers, longer replay sequence
    let stats = stress_test_history(10, 200, 1000).await?;
    stats.print();

    // Test 3: Scaling analysis
    stress_test_scaling(12, 4).await?;

    println!("\n✓ All stress tests completed successfully!");
    Ok(())
}
