//! Cart and order commands.
//!
//! Lines are addressed by their 1-based position as printed by
//! `cart show`; the position is resolved to the line's local key before
//! the mutation runs.

use clap::Subcommand;
use uuid::Uuid;

use keebcraft_core::{KeyboardId, Size, SwitchColor, User};
use keebcraft_storefront::StoreApp;

use super::{parse_size, parse_switch_color};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Customize a catalog keyboard and add it to the cart
    Add {
        /// Catalog keyboard id
        id: i32,

        /// Form factor: compact, tenkeyless, or full
        #[arg(short, long, value_parser = parse_size)]
        size: Size,

        /// Switch color: brown, red, or blue
        #[arg(short = 'c', long = "switch", value_parser = parse_switch_color)]
        switch_color: SwitchColor,
    },
    /// Remove a line (1-based position from `cart show`)
    Remove { line: usize },
    /// Increase a line's quantity by one
    Increase { line: usize },
    /// Decrease a line's quantity by one (floored at 1)
    Decrease { line: usize },
    /// Place the order: push the cart to history and clear it
    Checkout,
    /// Show past orders
    History,
}

pub async fn run(app: &StoreApp, action: CartAction) -> Result<(), Box<dyn std::error::Error>> {
    let sync = app.synchronizer();
    // Settle any cart clear still owed from an earlier checkout; the debt
    // stays queued if the store is still down.
    if let Err(e) = sync.retry_pending_clear().await {
        tracing::warn!("owed cart clear still failing: {e}");
    }

    match action {
        CartAction::Show => {
            let user = app.current_user().await?;
            print_cart(&user);
        }
        CartAction::Add {
            id,
            size,
            switch_color,
        } => {
            let mut customization = app.customize(KeyboardId::new(id)).await?;
            customization.apply_size(size);
            customization.apply_switch_color(switch_color);

            let mut user = app.current_user().await?;
            app.commit_customization(&customization, &mut user).await?;
            print_cart(&user);
        }
        CartAction::Remove { line } => {
            let mut user = app.current_user().await?;
            let key = line_key_at(&user, line)?;
            sync.remove_line(&mut user, key).await?;
            print_cart(&user);
        }
        CartAction::Increase { line } => {
            let mut user = app.current_user().await?;
            let key = line_key_at(&user, line)?;
            sync.increase_quantity(&mut user, key).await?;
            print_cart(&user);
        }
        CartAction::Decrease { line } => {
            let mut user = app.current_user().await?;
            let key = line_key_at(&user, line)?;
            sync.decrease_quantity(&mut user, key).await?;
            print_cart(&user);
        }
        CartAction::Checkout => {
            let mut user = app.current_user().await?;
            let lines = user.cart.len();
            sync.place_order(&mut user).await?;
            print_checkout(lines);
        }
        CartAction::History => {
            let history = app.order_history().await?;
            print_history(&history);
        }
    }
    Ok(())
}

fn line_key_at(user: &User, line: usize) -> Result<Uuid, Box<dyn std::error::Error>> {
    line.checked_sub(1)
        .and_then(|index| user.cart.get(index))
        .map(|l| l.line_key)
        .ok_or_else(|| format!("no cart line {line} (see `cart show`)").into())
}

#[allow(clippy::print_stdout)]
fn print_cart(user: &User) {
    if user.cart.is_empty() {
        println!("cart is empty");
        return;
    }
    for (index, line) in user.cart.iter().enumerate() {
        println!(
            "{:>3}. {:<12} ${:<8} x{:<3} {:?} {:?}",
            index + 1,
            line.name,
            line.price,
            line.quantity,
            line.size,
            line.switch_color
        );
    }
    println!("total: ${}", user.cart_total());
}

#[allow(clippy::print_stdout)]
fn print_checkout(lines: usize) {
    println!("order placed ({lines} lines)");
}

#[allow(clippy::print_stdout)]
fn print_history(history: &[keebcraft_core::CartLine]) {
    if history.is_empty() {
        println!("no past orders");
        return;
    }
    for line in history {
        println!(
            "{:<12} ${:<8} x{:<3} {:?} {:?}",
            line.name, line.price, line.quantity, line.size, line.switch_color
        );
    }
}
