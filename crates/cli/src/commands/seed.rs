//! Seed the database with a demo household.
//!
//! Creates a user who founds the household, a few items dated relative to
//! today and the household's shopping list with one entry.

use chrono::{Days, NaiveDate};

use freshkeep_server::config::FreshkeepConfig;
use freshkeep_server::db;
use freshkeep_server::services::{Caller, CreateItem, SignUp};
use freshkeep_server::state::AppState;

/// Options for [`demo`].
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub household: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Demo inventory: name, quantity, days until expiry, storage location.
const DEMO_ITEMS: &[(&str, i32, u64, &str)] = &[
    ("Milk", 2, 4, "Fridge"),
    ("Bread", 1, 6, "Pantry"),
    ("Apples", 6, 12, "Fridge"),
    ("Cheese", 1, 20, "Fridge"),
];

/// Create the demo data.
///
/// # Errors
///
/// Returns an error if configuration is missing, the database is unreachable
/// or any of the records is rejected (e.g. the email is already registered).
pub async fn demo(options: SeedOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = FreshkeepConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");

    let state = AppState::new(pool);

    let user = state
        .accounts()
        .create_user(SignUp {
            email: options.email,
            password: options.password,
            name: options.name,
            household_name: Some(options.household),
        })
        .await?;
    let household_id = user
        .household_id
        .ok_or("seeded user was not placed in a household")?;
    tracing::info!(user_id = %user.id, household_id = %household_id, "Created user and household");

    let caller = Caller::new(user.id);
    let today = state.clock().today();
    for &(name, quantity, days, location) in DEMO_ITEMS {
        let item = state
            .items()
            .create_item(
                caller,
                CreateItem {
                    name: name.to_owned(),
                    quantity,
                    expiration_date: days_from(today, days)?,
                    storage_location: Some(location.to_owned()),
                    household_id,
                },
            )
            .await?;
        tracing::info!(item_id = %item.id, name, "Created item");
    }

    let list = state.shopping().get_or_create_list(household_id).await?;
    state.shopping().add_item(list.id, "Coffee", 1).await?;
    tracing::info!(list_id = %list.id, "Created shopping list");

    tracing::info!("Seeding complete!");
    Ok(())
}

fn days_from(today: NaiveDate, days: u64) -> Result<NaiveDate, String> {
    today
        .checked_add_days(Days::new(days))
        .ok_or_else(|| format!("{today} + {days} days is out of range"))
}
