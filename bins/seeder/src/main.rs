//! Seeds the shared budget-category reference table.
//!
//! Categories are global reference data shared by every user; this binary
//! inserts a default set once, skipping the run if any already exist.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pocketplan_db::{CategoryRepository, connect};
use pocketplan_shared::AppConfig;

/// (name, typical percentage of income, typical monthly amount)
const DEFAULT_CATEGORIES: &[(&str, Option<Decimal>, Option<Decimal>)] = &[
    ("Charity", Some(dec!(5.00)), None),
    ("Dining", Some(dec!(5.00)), Some(dec!(250))),
    ("Entertainment", Some(dec!(5.00)), Some(dec!(150))),
    ("Groceries", Some(dec!(10.00)), Some(dec!(400))),
    ("Healthcare", Some(dec!(6.50)), Some(dec!(300))),
    ("Housing", Some(dec!(28.00)), Some(dec!(1500))),
    ("Insurance", Some(dec!(6.00)), Some(dec!(200))),
    ("Personal Care", Some(dec!(3.00)), Some(dec!(100))),
    ("Savings", Some(dec!(12.50)), None),
    ("Subscriptions", None, Some(dec!(40))),
    ("Transportation", Some(dec!(13.00)), Some(dec!(450))),
    ("Utilities", Some(dec!(6.00)), Some(dec!(250))),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pocketplan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("Failed to load configuration");
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    let category_repo = CategoryRepository::new(db);

    let existing = category_repo.list(None).await?;
    if !existing.is_empty() {
        info!(count = existing.len(), "Categories already seeded, nothing to do");
        return Ok(());
    }

    for (name, typical_percentage, typical_monthly_amount) in DEFAULT_CATEGORIES {
        let category = category_repo
            .create(name, *typical_percentage, *typical_monthly_amount)
            .await?;
        info!(category_id = %category.id, name = %category.name, "Category seeded");
    }

    info!(count = DEFAULT_CATEGORIES.len(), "Seeding complete");
    Ok(())
}
