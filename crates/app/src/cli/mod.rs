use canteen_app::database::{self, Db};
use clap::{Parser, Subcommand};

mod db;
mod menu;
mod orders;
mod session;
mod user;

#[derive(Debug, Parser)]
#[command(name = "canteen-app", about = "Canteen CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Session(session::SessionCommand),
    Menu(menu::MenuCommand),
    Orders(orders::OrdersCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Menu(command) => menu::run(command).await,
            Commands::Orders(command) => orders::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}
