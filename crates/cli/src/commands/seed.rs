//! Seed the database with demo data for local development.

use teknokalakal_core::Money;
use teknokalakal_storefront::db::ProductRepository;
use teknokalakal_storefront::db::products::ProductInput;
use teknokalakal_storefront::models::product::ImageRef;
use teknokalakal_storefront::services::AuthService;

const DEMO_VENDOR_EMAIL: &str = "demo-vendor@teknokalakal.ph";

/// Demo catalog: (title, description, price in centavos, stock, category).
const DEMO_PRODUCTS: &[(&str, &str, i64, i32, &str)] = &[
    (
        "Hand tractor (kuliglig)",
        "Two-wheel walking tractor for rice paddies",
        45_000_00,
        3,
        "Farm machinery",
    ),
    (
        "Fish net, 3-inch mesh",
        "Nylon gill net, 100 meters",
        2_500_00,
        25,
        "Fishing gear",
    ),
    (
        "Knapsack sprayer, 16L",
        "Manual backpack sprayer for pesticide application",
        1_200_00,
        40,
        "Farm tools",
    ),
    (
        "Tilapia fingerlings (per 100)",
        "Grade-A fingerlings from a BFAR-registered hatchery",
        350_00,
        200,
        "Aquaculture",
    ),
];

/// Create a demo vendor and a handful of listings.
///
/// Idempotence is intentionally not attempted: re-seeding an already-seeded
/// database fails on the vendor's unique email.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    let vendor = AuthService::new(&pool)
        .signup(
            "Demo Vendor",
            DEMO_VENDOR_EMAIL,
            "demo-vendor",
            "demo-vendor-password",
        )
        .await?;
    tracing::info!(user_id = %vendor.id, "demo vendor created");

    let products = ProductRepository::new(&pool);
    for (title, description, price, stock, category) in DEMO_PRODUCTS {
        let category_id = sqlx::query_scalar(
            "INSERT INTO shop.category (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id",
        )
        .bind(category)
        .fetch_one(&pool)
        .await?;

        let product = products
            .create(
                vendor.id,
                &ProductInput {
                    title: (*title).to_owned(),
                    description: Some((*description).to_owned()),
                    price: Money::from_centavos(*price),
                    stock: *stock,
                    images: Vec::<ImageRef>::new(),
                    category_id: Some(teknokalakal_core::CategoryId::new(category_id)),
                    properties: None,
                },
            )
            .await?;

        tracing::info!(product_id = %product.id, title, "seeded product");
    }

    tracing::info!("seed complete");
    Ok(())
}
