//! Seed the database with asset types, system accounts, and demo users.
//!
//! Idempotent: safe to run against an already-seeded database.
//!
//! Usage: cargo run --bin seed [--env dev]

use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use wallet_ledger::config::AppConfig;
use wallet_ledger::logging::init_logging;

const ASSETS: [&str; 3] = ["GOLD", "DIAMONDS", "LOYALTY"];
const TREASURY_EMAIL: &str = "treasury@system.dino-ventures.local";
const REVENUE_EMAIL: &str = "revenue@system.dino-ventures.local";
const TREASURY_SUPPLY: &str = "1000000000";

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)
        .with_context(|| format!("Failed to load config for env '{}'", env))?;
    let _log_guard = init_logging(&config);

    tracing::info!("Starting database seeding");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.postgres_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    let asset_ids = seed_assets(&pool).await?;
    seed_system_accounts(&pool, &asset_ids).await?;
    seed_demo_users(&pool, &asset_ids).await?;
    report(&pool).await?;

    Ok(())
}

async fn seed_assets(pool: &PgPool) -> anyhow::Result<Vec<(String, Uuid)>> {
    let mut asset_ids = Vec::new();
    for code in ASSETS {
        sqlx::query("INSERT INTO asset_types_tb (code) VALUES ($1) ON CONFLICT (code) DO NOTHING")
            .bind(code)
            .execute(pool)
            .await?;
        let id: Uuid = sqlx::query("SELECT id FROM asset_types_tb WHERE code = $1")
            .bind(code)
            .fetch_one(pool)
            .await?
            .get("id");
        asset_ids.push((code.to_string(), id));
    }
    tracing::info!(assets = ?ASSETS, "Asset types created");
    Ok(asset_ids)
}

async fn upsert_user(pool: &PgPool, email: &str, name: &str, account_type: &str) -> anyhow::Result<Uuid> {
    sqlx::query(
        r#"INSERT INTO users_tb (email, name, account_type)
           VALUES ($1, $2, $3)
           ON CONFLICT (email) DO NOTHING"#,
    )
    .bind(email)
    .bind(name)
    .bind(account_type)
    .execute(pool)
    .await?;

    let id = sqlx::query("SELECT id FROM users_tb WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?
        .get("id");
    Ok(id)
}

/// Create a wallet at `balance` with a matching BONUS journal entry, so
/// the seeded state still satisfies balance == signed journal sum.
/// No-op when the wallet already exists.
async fn seed_wallet(
    pool: &PgPool,
    user_id: Uuid,
    asset_id: Uuid,
    balance: &str,
) -> anyhow::Result<()> {
    let inserted = sqlx::query(
        r#"INSERT INTO wallets_tb (user_id, asset_id, balance)
           VALUES ($1, $2, $3::numeric)
           ON CONFLICT (user_id, asset_id) DO NOTHING
           RETURNING id"#,
    )
    .bind(user_id)
    .bind(asset_id)
    .bind(balance)
    .fetch_optional(pool)
    .await?;

    let Some(row) = inserted else {
        return Ok(());
    };
    let wallet_id: Uuid = row.get("id");

    if balance != "0" {
        sqlx::query(
            r#"INSERT INTO journal_entries_tb
                 (id, wallet_id, asset_id, transaction_type, direction, amount)
               VALUES ($1, $2, $3, 'BONUS', 'CREDIT', $4::numeric)"#,
        )
        .bind(Uuid::new_v4())
        .bind(wallet_id)
        .bind(asset_id)
        .bind(balance)
        .execute(pool)
        .await?;
    }
    Ok(())
}

async fn seed_system_accounts(
    pool: &PgPool,
    asset_ids: &[(String, Uuid)],
) -> anyhow::Result<()> {
    let treasury = upsert_user(pool, TREASURY_EMAIL, "Treasury", "SYSTEM").await?;
    let revenue = upsert_user(pool, REVENUE_EMAIL, "Revenue", "SYSTEM").await?;
    tracing::info!(%treasury, %revenue, "System accounts created");

    for (_, asset_id) in asset_ids {
        seed_wallet(pool, treasury, *asset_id, TREASURY_SUPPLY).await?;
        seed_wallet(pool, revenue, *asset_id, "0").await?;
    }
    tracing::info!("System wallets created");
    Ok(())
}

async fn seed_demo_users(pool: &PgPool, asset_ids: &[(String, Uuid)]) -> anyhow::Result<()> {
    let alice = upsert_user(pool, "alice@example.com", "Alice Johnson", "USER").await?;
    let bob = upsert_user(pool, "bob@example.com", "Bob Smith", "USER").await?;
    tracing::info!(%alice, %bob, "Demo users created");

    let initial_balances: [(Uuid, &str, &str); 6] = [
        (alice, "GOLD", "1000"),
        (alice, "DIAMONDS", "50"),
        (alice, "LOYALTY", "500"),
        (bob, "GOLD", "500"),
        (bob, "DIAMONDS", "25"),
        (bob, "LOYALTY", "200"),
    ];

    for (user_id, code, amount) in initial_balances {
        let asset_id = asset_ids
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, id)| *id)
            .context("Unknown asset code in seed table")?;
        seed_wallet(pool, user_id, asset_id, amount).await?;
        tracing::info!(%user_id, asset = code, amount, "Demo balance seeded");
    }
    Ok(())
}

async fn report(pool: &PgPool) -> anyhow::Result<()> {
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users_tb")
        .fetch_one(pool)
        .await?;
    let wallets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wallets_tb")
        .fetch_one(pool)
        .await?;
    let assets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM asset_types_tb")
        .fetch_one(pool)
        .await?;
    let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM journal_entries_tb")
        .fetch_one(pool)
        .await?;

    tracing::info!(users, wallets, assets, journal_entries = entries, "Seeding complete");
    Ok(())
}
