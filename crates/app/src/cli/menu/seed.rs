use std::path::PathBuf;

use canteen::menu::seed::MenuSeed;
use canteen_app::domain::{
    menu::{MenuService, PgMenuService},
    users::records::UserUuid,
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SeedMenuArgs {
    /// YAML seed file
    #[arg(long)]
    file: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Act as this admin instead of relying on an owner connection
    #[arg(long)]
    admin_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: SeedMenuArgs) -> Result<(), String> {
    let items = MenuSeed::from_path(&args.file)
        .and_then(MenuSeed::into_items)
        .map_err(|error| format!("failed to load {}: {error}", args.file.display()))?;

    let db = crate::cli::connect(&args.database_url).await?;

    let records = PgMenuService::new(db)
        .upsert_items(args.admin_uuid.map(UserUuid::from_uuid), items)
        .await
        .map_err(|error| format!("failed to seed menu: {error}"))?;

    for record in &records {
        println!(
            "{}  {:<10} {:<24} {:>8}{}",
            record.uuid,
            record.category,
            record.name,
            record.price,
            if record.is_special { "  special" } else { "" }
        );
    }

    println!("seeded {} menu items", records.len());

    Ok(())
}
