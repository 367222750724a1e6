use alma_app::{
    context::AppContext,
    domain::products::{
        ProductsService,
        data::{NewProduct, ProductUpdate},
        models::ProductUuid,
    },
};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use crate::cli::output::print_json;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// List live products
    List,

    /// Show a product
    Get(ProductArgs),

    /// Add a product to the catalog
    Create(CreateProductArgs),

    /// Replace a product's catalog fields
    Update(UpdateProductArgs),

    /// Remove a product from the catalog
    Delete(ProductArgs),
}

#[derive(Debug, Args)]
struct ProductArgs {
    #[arg(long)]
    product_uuid: ProductUuid,
}

#[derive(Debug, Args)]
struct CatalogFields {
    /// Display name
    #[arg(long)]
    name: String,

    /// Unit price before discount
    #[arg(long)]
    price: Decimal,

    /// Discount in percent (0-100)
    #[arg(long)]
    discount_percent: Option<Decimal>,

    /// Points earned per unit bought
    #[arg(long, default_value_t = 0)]
    bonus_points: u64,
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<ProductUuid>,

    #[command(flatten)]
    fields: CatalogFields,
}

#[derive(Debug, Args)]
struct UpdateProductArgs {
    #[arg(long)]
    product_uuid: ProductUuid,

    #[command(flatten)]
    fields: CatalogFields,
}

pub(crate) async fn run(command: ProductCommand, ctx: &AppContext) -> Result<(), String> {
    match command.command {
        ProductSubcommand::List => {
            let products = ctx
                .products
                .list_products()
                .await
                .map_err(|error| format!("failed to list products: {error}"))?;

            print_json(&products)
        }
        ProductSubcommand::Get(args) => {
            let product = ctx
                .products
                .get_product(args.product_uuid)
                .await
                .map_err(|error| format!("failed to get product: {error}"))?;

            print_json(&product)
        }
        ProductSubcommand::Create(args) => {
            let product = ctx
                .products
                .create_product(NewProduct {
                    uuid: args.product_uuid.unwrap_or_default(),
                    name: args.fields.name,
                    price: args.fields.price,
                    discount_percent: args.fields.discount_percent,
                    bonus_points: args.fields.bonus_points,
                })
                .await
                .map_err(|error| format!("failed to create product: {error}"))?;

            print_json(&product)
        }
        ProductSubcommand::Update(args) => {
            let product = ctx
                .products
                .update_product(
                    args.product_uuid,
                    ProductUpdate {
                        name: args.fields.name,
                        price: args.fields.price,
                        discount_percent: args.fields.discount_percent,
                        bonus_points: args.fields.bonus_points,
                    },
                )
                .await
                .map_err(|error| format!("failed to update product: {error}"))?;

            print_json(&product)
        }
        ProductSubcommand::Delete(args) => {
            ctx.products
                .delete_product(args.product_uuid)
                .await
                .map_err(|error| format!("failed to delete product: {error}"))?;

            print_json(&serde_json::json!({ "deleted": args.product_uuid }))
        }
    }
}
