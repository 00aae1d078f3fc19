use canteen_app::database::APP_ROLE_TABLE_GRANTS;
use clap::Args;
use sqlx::{query, query_scalar};

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Runtime role the JSON API connects as
    #[arg(long, default_value = "canteen_app")]
    role_name: String,

    /// Runtime role password
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role-name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    // CREATE/ALTER ROLE needs the owner connection, not the runtime one.
    let db = crate::cli::connect(&args.database_url).await?;

    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    // Role identifiers cannot be bound as parameters, so quote them server-side.
    let role_ident: String = query_scalar("SELECT quote_ident($1)")
        .bind(&args.role_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to quote role-name: {error}"))?;

    let password_lit: String = query_scalar("SELECT quote_literal($1)")
        .bind(&args.password)
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to quote password: {error}"))?;

    let role_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to check role existence: {error}"))?;

    let verb = if role_exists { "ALTER" } else { "CREATE" };

    query(&format!(
        "{verb} ROLE {role_ident} LOGIN PASSWORD {password_lit} \
         NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS"
    ))
    .execute(&mut *tx)
    .await
    .map_err(|error| format!("failed to {} role: {error}", verb.to_lowercase()))?;

    let database_ident: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut *tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let mut statements = vec![
        format!("GRANT CONNECT ON DATABASE {database_ident} TO {role_ident}"),
        format!("GRANT USAGE ON SCHEMA public TO {role_ident}"),
        format!("REVOKE ALL ON ALL TABLES IN SCHEMA public FROM {role_ident}"),
    ];

    statements.extend(
        APP_ROLE_TABLE_GRANTS
            .iter()
            .map(|(table, privileges)| format!("GRANT {privileges} ON {table} TO {role_ident}")),
    );

    statements.push(format!(
        "GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO {role_ident}"
    ));

    for sql in statements {
        query(&sql)
            .execute(&mut *tx)
            .await
            .map_err(|error| format!("failed to apply `{sql}`: {error}"))?;
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);
    println!("granted {} tables", APP_ROLE_TABLE_GRANTS.len());

    Ok(())
}
