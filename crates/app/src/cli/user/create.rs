use canteen_app::domain::users::{
    PgUsersService, UsersService,
    data::NewUser,
    records::{Role, UserUuid},
};
use clap::Args;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Grant the admin role
    #[arg(long)]
    admin: bool,

    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let service = PgUsersService::new(db);
    let uuid = args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid);
    let roles = if args.admin { vec![Role::Admin] } else { Vec::new() };

    let profile = service
        .create_user(NewUser {
            uuid,
            name: args.name,
            roles,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", profile.uuid);
    println!("user_name: {}", profile.name);
    println!("admin: {}", profile.is_admin());

    Ok(())
}
