use canteen::money::{format_minor, resolve_currency};
use canteen_app::domain::{
    orders::{OrdersService, PgOrdersService},
    users::records::UserUuid,
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct BoardArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Admin the board is read as
    #[arg(long)]
    admin_uuid: Uuid,

    /// Include delivered orders
    #[arg(long)]
    all: bool,

    /// ISO 4217 currency used to display prices
    #[arg(long, env = "CANTEEN_CURRENCY", default_value = "INR")]
    currency: String,
}

pub(crate) async fn run(args: BoardArgs) -> Result<(), String> {
    let currency = resolve_currency(&args.currency)
        .ok_or_else(|| format!("unknown currency: {}", args.currency))?;

    let db = crate::cli::connect(&args.database_url).await?;

    let orders = PgOrdersService::new(db)
        .list_all_orders(UserUuid::from_uuid(args.admin_uuid))
        .await
        .map_err(|error| format!("failed to load orders: {error}"))?;

    let orders: Vec<_> = orders
        .into_iter()
        .filter(|order| args.all || order.status.is_active())
        .collect();

    if orders.is_empty() {
        println!("no orders");
        return Ok(());
    }

    for order in orders {
        println!(
            "#{:<5} {:<10} {:<8} {:>12}  {}",
            order.token_number,
            order.status,
            order.payment_status,
            format_minor(order.total_price, currency),
            order.customer_name.as_deref().unwrap_or("-"),
        );

        for line in &order.lines {
            println!(
                "        {} x {} @ {}",
                line.quantity,
                line.name.as_deref().unwrap_or("(withdrawn item)"),
                format_minor(line.price, currency),
            );
        }

        if let Some(action) = order.status.next_action() {
            println!("        next: {action}");
        }
    }

    Ok(())
}
