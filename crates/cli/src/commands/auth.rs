//! Authentication commands.

use clap::Subcommand;

use keebcraft_storefront::StoreApp;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in to an existing account
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create a new account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Log out and clear the session
    Logout,
    /// Show the current session identity
    Whoami,
}

#[allow(clippy::print_stdout)]
pub async fn run(app: &StoreApp, action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { username, password } => {
            let user = app.login(&username, &password).await?;
            println!(
                "logged in as {} ({} cart lines, {} past orders)",
                user.username,
                user.cart.len(),
                user.order_history.len()
            );
        }
        AuthAction::Signup { username, password } => {
            let user = app.signup(&username, &password).await?;
            println!("account created: {}", user.username);
        }
        AuthAction::Logout => {
            app.logout().await;
            println!("logged out");
        }
        AuthAction::Whoami => match app.session().username() {
            Some(username) => println!("{username}"),
            None => println!("not logged in"),
        },
    }
    Ok(())
}
