//! Pedido Listo command-line client

use std::{
    process,
    sync::{Arc, RwLock},
};

use clap::{Args, Parser, Subcommand};
use pedido_listo::{
    dates::format_date,
    menu::orderable,
    orders::orders_for_customer,
    pricing::format_currency,
    session::{Credentials, SessionStore},
    storage::MemoryStore,
};
use pedido_listo_app::{
    auth::flow,
    backend::Anonymous,
    config::PortalConfig,
    context::AppContext,
    observability::init_logging,
    state::SessionSlot,
};

#[derive(Debug, Parser)]
#[command(name = "pedido-listo", about = "Pedido Listo CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: PortalConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the menu.
    Menu(MenuArgs),

    /// Sign in as a customer and list their orders.
    Orders(OrdersArgs),
}

#[derive(Debug, Args)]
struct MenuArgs {
    /// Include dishes customers can't order right now
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Args)]
struct OrdersArgs {
    /// Customer e-mail
    #[arg(long, env = "PEDIDO_LISTO_EMAIL")]
    email: String,

    /// Customer password
    #[arg(long, env = "PEDIDO_LISTO_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main(flavor = "current_thread")]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = init_logging(&cli.config.logging, std::io::stderr) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Menu(args) => list_menu(&cli.config, args).await,
        Commands::Orders(args) => list_orders(&cli.config, args).await,
    }
}

async fn list_menu(config: &PortalConfig, args: MenuArgs) -> Result<(), String> {
    let context = AppContext::from_config(config, None, Arc::new(Anonymous))
        .map_err(|error| error.to_string())?;

    let mut dishes = context
        .menu
        .list_dishes()
        .await
        .map_err(|error| format!("failed to load the menu: {error}"))?;

    if !args.all {
        dishes = orderable(dishes);
    }

    for dish in dishes {
        println!(
            "{:>5}  {:<32} {:<20} {:>10}  {}",
            dish.id,
            dish.name,
            dish.category,
            format_currency(dish.price),
            dish.status
        );
    }

    Ok(())
}

async fn list_orders(config: &PortalConfig, args: OrdersArgs) -> Result<(), String> {
    let sessions = Arc::new(RwLock::new(SessionStore::load(MemoryStore::new())));

    let context = AppContext::from_config(config, None, sessions.clone())
        .map_err(|error| error.to_string())?;

    let credentials = Credentials {
        email: args.email,
        password: args.password,
    };

    flow::login(context.auth.as_ref(), sessions.as_ref(), &credentials)
        .await
        .map_err(|error| error.login_notice().message)?;

    let customer = sessions
        .current()
        .map(|session| session.user.national_id)
        .ok_or_else(|| "signed in without a session".to_string())?;

    let orders = context
        .orders
        .list_orders()
        .await
        .map_err(|error| format!("failed to load orders: {error}"))?;

    for order in orders_for_customer(orders, &customer) {
        println!(
            "#{:<6} {}  {:<10} {:>10}",
            order.id,
            format_date(&order.placed_at),
            order.status.as_str(),
            format_currency(order.total)
        );
    }

    Ok(())
}
