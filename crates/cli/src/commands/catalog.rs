//! Catalog browsing commands.

#![allow(clippy::print_stdout)]

use tradeyard_storefront::catalog::Product;

use super::{CliError, Context};

/// Print every category with its product count.
pub fn categories(ctx: &Context) {
    for category in ctx.catalog.categories() {
        let count = ctx
            .catalog
            .products_in_category(category.handle.as_str())
            .count();
        println!("{:<24} {} ({count})", category.handle, category.name);
    }
}

/// Print products, optionally limited to one category.
///
/// The category may be given as a handle or a display name.
pub fn list(ctx: &Context, category: Option<&str>) -> Result<(), CliError> {
    let products: Vec<&Product> = match category {
        Some(name) => {
            let category = ctx
                .catalog
                .category(name)
                .or_else(|| ctx.catalog.resolve_category(name))
                .ok_or_else(|| CliError::Invalid(format!("Unknown category: {name}")))?;
            ctx.catalog
                .products_in_category(category.handle.as_str())
                .collect()
        }
        None => ctx.catalog.products().iter().collect(),
    };

    for product in products {
        print_summary(product);
    }
    Ok(())
}

/// Print one product in full.
pub fn show(ctx: &Context, handle: &str) -> Result<(), CliError> {
    let product = ctx
        .catalog
        .product(handle)
        .ok_or_else(|| CliError::UnknownProduct(handle.to_string()))?;

    print_summary(product);
    println!("  {}", product.description);
    if let Some(vendor) = ctx.catalog.vendor(product.vendor_id) {
        println!("  Sold by {} (ships from {})", vendor.name, vendor.postal_code);
    }
    println!("  Minimum order: {}", product.minimum_quantity());
    for option in &product.shipping_options {
        println!(
            "  Shipping [{}] {} {}",
            option.id,
            option.carrier,
            option.price.display()
        );
    }
    Ok(())
}

fn print_summary(product: &Product) {
    let discount = product
        .discount_percent()
        .map(|pct| format!(" (-{pct}%)"))
        .unwrap_or_default();
    let stock = if product.stock.is_available() {
        ""
    } else {
        " [out of stock]"
    };
    println!(
        "{:>5}  {:<32} {}{discount}{stock}",
        product.id,
        product.handle,
        product.price.display()
    );
}
