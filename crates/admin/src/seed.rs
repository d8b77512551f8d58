//! Idempotent sample-data seeding.
//!
//! Creates the `admin` account plus a small catalogue of categories,
//! suppliers and items. Rows are looked up by name first and only created
//! when absent; existing rows are never modified. The whole run is one
//! transaction, so a failure leaves the database untouched.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use stockroom_core::{
    AccountId, CategoryId, DEFAULT_THRESHOLD, Email, Price, StockLevel, SupplierId, Username,
};

use crate::db::{RepositoryError, accounts, categories, items, suppliers};
use crate::models::{Account, CategoryInput, ItemInput, NewAccount, SupplierInput};
use crate::services::auth::{AuthError, hash_password};

/// Username of the seeded administrator.
pub const ADMIN_USERNAME: &str = "admin";
/// Password used when none is supplied.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PHONE: &str = "123456789";
const ADMIN_POSITION: &str = "Administrator";

struct CategorySeed {
    name: &'static str,
    description: &'static str,
}

struct SupplierSeed {
    name: &'static str,
    contact_person: &'static str,
    email: &'static str,
    phone: &'static str,
    address: &'static str,
}

struct ItemSeed {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    supplier: &'static str,
    price_cents: i64,
    stock_quantity: i32,
}

const CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        name: "Electronics",
        description: "Electronic devices and accessories",
    },
    CategorySeed {
        name: "Food",
        description: "Food and beverage items",
    },
    CategorySeed {
        name: "Clothing",
        description: "Clothing and fashion items",
    },
    CategorySeed {
        name: "Office Supplies",
        description: "Office supplies and stationery",
    },
];

const SUPPLIERS: &[SupplierSeed] = &[
    SupplierSeed {
        name: "ElectroTech Inc.",
        contact_person: "John Doe",
        email: "john@electrotech.com",
        phone: "123-456-7890",
        address: "123 Tech St, San Francisco, CA",
    },
    SupplierSeed {
        name: "Fresh Foods Ltd.",
        contact_person: "Jane Smith",
        email: "jane@freshfoods.com",
        phone: "098-765-4321",
        address: "456 Food Ave, Chicago, IL",
    },
    SupplierSeed {
        name: "Fashion Forward Co.",
        contact_person: "Sam Wilson",
        email: "sam@fashionforward.com",
        phone: "555-123-4567",
        address: "789 Fashion Blvd, New York, NY",
    },
];

const ITEMS: &[ItemSeed] = &[
    ItemSeed {
        name: "Laptop",
        description: "High performance laptop",
        category: "Electronics",
        supplier: "ElectroTech Inc.",
        price_cents: 99_999,
        stock_quantity: 10,
    },
    ItemSeed {
        name: "Smartphone",
        description: "Latest smartphone model",
        category: "Electronics",
        supplier: "ElectroTech Inc.",
        price_cents: 59_999,
        stock_quantity: 15,
    },
    ItemSeed {
        name: "Chocolate Bar",
        description: "Delicious chocolate bar",
        category: "Food",
        supplier: "Fresh Foods Ltd.",
        price_cents: 299,
        stock_quantity: 100,
    },
    ItemSeed {
        name: "T-Shirt",
        description: "Cotton t-shirt",
        category: "Clothing",
        supplier: "Fashion Forward Co.",
        price_cents: 1_999,
        stock_quantity: 50,
    },
    ItemSeed {
        name: "Notebook",
        description: "Spiral notebook",
        category: "Office Supplies",
        supplier: "ElectroTech Inc.",
        price_cents: 399,
        stock_quantity: 200,
    },
    ItemSeed {
        name: "Headphones",
        description: "Wireless headphones",
        category: "Electronics",
        supplier: "ElectroTech Inc.",
        price_cents: 8_999,
        stock_quantity: 5,
    },
];

/// Errors that abort a seed run.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("could not hash admin password: {0}")]
    Auth(#[from] AuthError),

    /// The built-in catalogue is inconsistent.
    #[error("invalid seed data: {0}")]
    InvalidData(String),
}

/// Options for a seed run.
#[derive(Debug)]
pub struct SeedOptions {
    /// Password given to the `admin` account if it has to be created.
    pub admin_password: SecretString,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            admin_password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
        }
    }
}

/// Rows created versus found already present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub created: usize,
    pub existing: usize,
}

impl Tally {
    const fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.existing += 1;
        }
    }
}

/// Outcome of a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub accounts: Tally,
    pub categories: Tally,
    pub suppliers: Tally,
    pub items: Tally,
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("accounts", self.accounts),
            ("categories", self.categories),
            ("suppliers", self.suppliers),
            ("items", self.items),
        ];
        for (i, (label, tally)) in rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{label}: {} created / {} existing",
                tally.created, tally.existing
            )?;
        }
        Ok(())
    }
}

/// Seed the database.
///
/// # Errors
///
/// Returns `SeedError` if any step fails; nothing is committed in that case.
pub async fn run(pool: &PgPool, options: &SeedOptions) -> Result<SeedReport, SeedError> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    let admin = seed_admin(&mut tx, options, &mut report.accounts).await?;
    let category_ids = seed_categories(&mut tx, admin.id, &mut report.categories).await?;
    let supplier_ids = seed_suppliers(&mut tx, admin.id, &mut report.suppliers).await?;
    seed_items(
        &mut tx,
        admin.id,
        &category_ids,
        &supplier_ids,
        &mut report.items,
    )
    .await?;

    tx.commit().await?;
    tracing::info!(%report, "Seed complete");
    Ok(report)
}

async fn seed_admin(
    conn: &mut PgConnection,
    options: &SeedOptions,
    tally: &mut Tally,
) -> Result<Account, SeedError> {
    let username = parse_seed(Username::parse(ADMIN_USERNAME))?;

    if let Some(existing) = accounts::find_by_username_with(&mut *conn, &username).await? {
        tally.record(false);
        tracing::info!(username = ADMIN_USERNAME, "Account already exists");
        return Ok(existing);
    }

    let account = NewAccount {
        username,
        email: parse_seed(Email::parse(ADMIN_EMAIL))?,
        phone_number: Some(ADMIN_PHONE.to_owned()),
        position: Some(ADMIN_POSITION.to_owned()),
        is_staff: true,
        is_superuser: true,
    };
    let password_hash = hash_password(options.admin_password.expose_secret())?;
    let created = accounts::create_with(&mut *conn, &account, &password_hash).await?;

    tally.record(true);
    tracing::info!(username = ADMIN_USERNAME, account_id = %created.id, "Created account");
    Ok(created)
}

async fn seed_categories(
    conn: &mut PgConnection,
    admin: AccountId,
    tally: &mut Tally,
) -> Result<HashMap<&'static str, CategoryId>, SeedError> {
    let mut ids = HashMap::new();

    for seed in CATEGORIES {
        let category = match categories::find_by_name_with(&mut *conn, seed.name).await? {
            Some(existing) => {
                tally.record(false);
                tracing::info!(name = seed.name, "Category already exists");
                existing
            }
            None => {
                let input = CategoryInput {
                    name: seed.name.to_owned(),
                    description: Some(seed.description.to_owned()),
                };
                let created = categories::create_with(&mut *conn, &input, admin).await?;
                tally.record(true);
                tracing::info!(name = seed.name, category_id = %created.id, "Created category");
                created
            }
        };
        ids.insert(seed.name, category.id);
    }

    Ok(ids)
}

async fn seed_suppliers(
    conn: &mut PgConnection,
    admin: AccountId,
    tally: &mut Tally,
) -> Result<HashMap<&'static str, SupplierId>, SeedError> {
    let mut ids = HashMap::new();

    for seed in SUPPLIERS {
        let supplier = match suppliers::find_by_name_with(&mut *conn, seed.name).await? {
            Some(existing) => {
                tally.record(false);
                tracing::info!(name = seed.name, "Supplier already exists");
                existing
            }
            None => {
                let input = SupplierInput {
                    name: seed.name.to_owned(),
                    contact_person: Some(seed.contact_person.to_owned()),
                    email: Some(parse_seed(Email::parse(seed.email))?),
                    phone: Some(seed.phone.to_owned()),
                    address: Some(seed.address.to_owned()),
                };
                let created = suppliers::create_with(&mut *conn, &input, admin).await?;
                tally.record(true);
                tracing::info!(name = seed.name, supplier_id = %created.id, "Created supplier");
                created
            }
        };
        ids.insert(seed.name, supplier.id);
    }

    Ok(ids)
}

async fn seed_items(
    conn: &mut PgConnection,
    admin: AccountId,
    category_ids: &HashMap<&'static str, CategoryId>,
    supplier_ids: &HashMap<&'static str, SupplierId>,
    tally: &mut Tally,
) -> Result<(), SeedError> {
    for seed in ITEMS {
        if items::find_by_name_with(&mut *conn, seed.name).await?.is_some() {
            tally.record(false);
            tracing::info!(name = seed.name, "Item already exists");
            continue;
        }

        let input = item_input(seed, category_ids, supplier_ids)?;
        let created = items::create_with(&mut *conn, &input, admin).await?;
        tally.record(true);
        tracing::info!(name = seed.name, item_id = %created.id, "Created item");
    }

    Ok(())
}

fn item_input(
    seed: &ItemSeed,
    category_ids: &HashMap<&'static str, CategoryId>,
    supplier_ids: &HashMap<&'static str, SupplierId>,
) -> Result<ItemInput, SeedError> {
    let category = *category_ids.get(seed.category).ok_or_else(|| {
        SeedError::InvalidData(format!("{}: unknown category {}", seed.name, seed.category))
    })?;
    let supplier = *supplier_ids.get(seed.supplier).ok_or_else(|| {
        SeedError::InvalidData(format!("{}: unknown supplier {}", seed.name, seed.supplier))
    })?;

    Ok(ItemInput {
        name: seed.name.to_owned(),
        description: Some(seed.description.to_owned()),
        category,
        supplier,
        price: parse_seed(Price::new(Decimal::new(seed.price_cents, 2)))?,
        stock: parse_seed(StockLevel::new(seed.stock_quantity, DEFAULT_THRESHOLD))?,
    })
}

fn parse_seed<T, E: fmt::Display>(result: Result<T, E>) -> Result<T, SeedError> {
    result.map_err(|e| SeedError::InvalidData(e.to_string()))
}
