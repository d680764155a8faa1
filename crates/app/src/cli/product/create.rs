use clap::Args;
use trolley_app::{
    database,
    domain::products::{PgProductsService, ProductsService, data::NewProduct},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Price in minor units (1000 is 10.00)
    #[arg(long)]
    price: u64,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "")]
    image_url: String,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let db = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    db.migrate()
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    let service = PgProductsService::new(db.clone());

    let product = service
        .create_product(NewProduct {
            uuid: args.product_uuid.unwrap_or_else(Uuid::now_v7).into(),
            name: args.name,
            price: args.price,
            description: args.description,
            image_url: args.image_url,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"));

    db.close().await;

    let product = product?;

    println!("product_uuid: {}", product.uuid);
    println!("product_name: {}", product.name);
    println!("product_price: {}", product.price);

    Ok(())
}
