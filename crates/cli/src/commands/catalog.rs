//! Catalog browsing and inventory management commands.

use clap::Subcommand;
use rust_decimal::Decimal;

use keebcraft_core::{Keyboard, KeyboardId, NewKeyboard, Size, SwitchColor};
use keebcraft_storefront::StoreApp;

use super::{parse_size, parse_switch_color};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List every keyboard in the catalog
    List,
    /// Show one keyboard by id
    Get { id: i32 },
    /// Search keyboards by name fragment
    Search { term: String },
    /// Filter keyboards by inclusive price range
    Filter { from: Decimal, to: Decimal },
    /// Add a keyboard to the catalog (inventory management)
    Add {
        /// Keyboard name (2-10 letters)
        #[arg(short, long)]
        name: String,

        /// Unit price in dollars
        #[arg(short, long)]
        price: Decimal,

        /// Units available
        #[arg(short, long)]
        quantity: i64,

        /// Form factor: compact, tenkeyless, or full
        #[arg(short, long, value_parser = parse_size)]
        size: Size,

        /// Switch color: brown, red, or blue
        #[arg(short = 'c', long = "switch", value_parser = parse_switch_color)]
        switch_color: SwitchColor,
    },
    /// Remove a keyboard from the catalog (inventory management)
    Remove { id: i32 },
}

pub async fn run(app: &StoreApp, action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::List => print_keyboards(&app.list_keyboards().await),
        CatalogAction::Get { id } => match app.get_keyboard(KeyboardId::new(id)).await {
            Some(keyboard) => print_keyboards(std::slice::from_ref(&keyboard)),
            None => return Err(format!("no keyboard with id {id}").into()),
        },
        CatalogAction::Search { term } => {
            print_keyboards(&app.search_keyboards(&term).await);
        }
        CatalogAction::Filter { from, to } => {
            print_keyboards(&app.filter_keyboards(from, to).await?);
        }
        CatalogAction::Add {
            name,
            price,
            quantity,
            size,
            switch_color,
        } => {
            let created = app
                .add_keyboard(&NewKeyboard {
                    name,
                    price,
                    quantity,
                    size,
                    switch_color,
                })
                .await?;
            print_keyboards(std::slice::from_ref(&created));
        }
        CatalogAction::Remove { id } => {
            app.delete_keyboard(KeyboardId::new(id)).await?;
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_keyboards(keyboards: &[Keyboard]) {
    if keyboards.is_empty() {
        println!("no keyboards");
        return;
    }
    for k in keyboards {
        println!(
            "#{:<4} {:<12} ${:<8} qty {:<4} {:?} {:?}",
            k.id, k.name, k.price, k.quantity, k.size, k.switch_color
        );
    }
}
