use anyhow::Context;
use clap::{Parser, Subcommand};
use rentora_auth::RegisterAttrs;
use rentora_config::load as load_config;
use rentora_database::{NewProperty, Price, PropertyRepository, UserRepository};
use rentora_gateway::{create_router, GatewayState};
use rentora_runtime::{telemetry, BackendServices};
use sqlx::Row;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "rentora-backend")]
#[command(about = "Rentora property-listing backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Seed the database with a demo landlord and listings
    SeedData,
    /// Dump users and properties from the database
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::SeedData => seed_data().await,
        Commands::DumpData => dump_data().await,
    }
}

async fn run_server() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("starting Rentora backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let address = format!("{}:{}", config.http.address, config.http.port);

    let state = GatewayState::new(services.db_pool.clone(), Arc::new(config));
    let app = create_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(rentora_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    info!("seeding database with demo data");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = UserRepository::new(services.db_pool.clone());
    if users.email_exists("demo@rentora.dev").await? {
        println!("Demo landlord already exists, nothing to do");
        return Ok(());
    }

    let (landlord, _tokens) = services
        .authenticator
        .register(RegisterAttrs {
            email: Some("demo@rentora.dev".to_string()),
            password1: Some("Demo12345!".to_string()),
            password2: Some("Demo12345!".to_string()),
            name: Some("Demo Landlord".to_string()),
            username: None,
        })
        .await
        .context("failed to register demo landlord")?;

    let properties = PropertyRepository::new(services.db_pool.clone());

    properties
        .create(&NewProperty {
            title: "Seaside villa".to_string(),
            description: "Three bedrooms a short walk from the beach.".to_string(),
            price_per_night: Price::from_cents(48_000),
            bedrooms: 3,
            bathrooms: 2,
            max_guests: 6,
            country: "Portugal".to_string(),
            city: "Lagos".to_string(),
            category: "Beach".to_string(),
            image: Some("uploads/properties/seaside-villa.jpg".to_string()),
            landlord_id: landlord.id.clone(),
        })
        .await
        .context("failed to insert demo property")?;

    properties
        .create(&NewProperty {
            title: "Forest cabin".to_string(),
            description: "A quiet cabin with a wood stove.".to_string(),
            price_per_night: Price::from_cents(12_500),
            bedrooms: 1,
            bathrooms: 1,
            max_guests: 2,
            country: "Sweden".to_string(),
            city: "Falun".to_string(),
            category: "Cabins".to_string(),
            image: None,
            landlord_id: landlord.id.clone(),
        })
        .await
        .context("failed to insert demo property")?;

    println!("Database seeded:");
    println!("- 1 landlord created ({})", landlord.email);
    println!("- 2 properties created");
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}

async fn dump_data() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let users = sqlx::query(
        r#"
        SELECT id, email, username, name, created_at
        FROM users
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found in database");
    } else {
        println!(
            "{:<38} {:<30} {:<20} {:<20} {:<25}",
            "ID", "Email", "Username", "Name", "Created At"
        );
        println!("{}", "-".repeat(135));
        for user in users {
            let id: String = user.get("id");
            let email: String = user.get("email");
            let username: String = user.get("username");
            let name: String = user.get("name");
            let created_at: String = user.get("created_at");
            println!("{id:<38} {email:<30} {username:<20} {name:<20} {created_at:<25}");
        }
    }

    let properties = sqlx::query(
        r#"
        SELECT id, title, price_per_night_cents, city, country, category, landlord_id, created_at
        FROM properties
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&services.db_pool)
    .await
    .context("failed to fetch properties")?;

    println!("\n=== PROPERTIES ===");
    if properties.is_empty() {
        println!("No properties found in database");
    } else {
        println!(
            "{:<38} {:<25} {:<12} {:<15} {:<12} {:<12} {:<38}",
            "ID", "Title", "Price/night", "City", "Country", "Category", "Landlord"
        );
        println!("{}", "-".repeat(155));
        for property in properties {
            let id: String = property.get("id");
            let title: String = property.get("title");
            let cents: i64 = property.get("price_per_night_cents");
            let city: String = property.get("city");
            let country: String = property.get("country");
            let category: String = property.get("category");
            let landlord_id: String = property.get("landlord_id");
            let price = Price::from_cents(cents).to_string();
            println!(
                "{id:<38} {title:<25} {price:<12} {city:<15} {country:<12} {category:<12} {landlord_id:<38}"
            );
        }
    }

    Ok(())
}
