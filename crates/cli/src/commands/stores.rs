//! Cart, wishlist and comparison commands.

#![allow(clippy::print_stdout)]

use tradeyard_core::ProductId;
use tradeyard_storefront::catalog::Product;
use tradeyard_storefront::stores::{COMPARISON_LIMIT, CartStore, ShopperSession};

use super::{CliError, Context};

pub fn add_to_cart(
    ctx: &Context,
    session: &mut ShopperSession,
    product_id: ProductId,
    quantity: Option<u32>,
    shipping: Option<&str>,
) -> Result<(), CliError> {
    let product = ctx.product(product_id)?;
    if !product.stock.is_available() {
        return Err(CliError::Invalid(format!("{} is out of stock", product.handle)));
    }
    let option = shipping
        .map(|id| {
            product.shipping_option(id).cloned().ok_or_else(|| {
                CliError::Invalid(format!("No shipping option '{id}' for {}", product.handle))
            })
        })
        .transpose()?;

    session.cart.add_to_cart(product, quantity, option);
    Ok(())
}

pub fn update_quantity(
    session: &mut ShopperSession,
    product_id: ProductId,
    quantity: i64,
) -> Result<(), CliError> {
    if session.cart.update_quantity(product_id, quantity) {
        Ok(())
    } else {
        Err(CliError::NotInCart(product_id))
    }
}

pub fn remove_from_cart(session: &mut ShopperSession, product_id: ProductId) -> Result<(), CliError> {
    if session.cart.remove_from_cart(product_id) {
        Ok(())
    } else {
        Err(CliError::NotInCart(product_id))
    }
}

pub fn toggle_wishlist(
    ctx: &Context,
    session: &mut ShopperSession,
    product_id: ProductId,
) -> Result<(), CliError> {
    let product = ctx.product(product_id)?;
    if session.wishlist.toggle(product) {
        println!("Saved {}", product.handle);
    } else {
        println!("Removed {}", product.handle);
    }
    Ok(())
}

pub fn add_to_comparison(
    ctx: &Context,
    session: &mut ShopperSession,
    product_id: ProductId,
) -> Result<(), CliError> {
    let product = ctx.product(product_id)?;
    if session.comparison.is_full() && !session.comparison.contains(product_id) {
        println!("Comparison is full ({COMPARISON_LIMIT} products), {} not added", product.handle);
    } else {
        session.comparison.add(product);
    }
    Ok(())
}

pub fn print_cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for item in cart.items() {
        let shipping = item
            .shipping_option
            .as_ref()
            .map(|o| format!(" + {} {}", o.carrier, o.price.display()))
            .unwrap_or_default();
        println!(
            "{:>5}  {:<32} {} x {} = {}{shipping}",
            item.product.id,
            item.product.handle,
            item.quantity,
            item.product.price.display(),
            item.line_price().display(),
        );
    }
    println!("Items:    {}", cart.item_count());
    println!("Subtotal: {}", cart.subtotal().display());
    println!("Shipping: {}", cart.shipping_total().display());
    println!("Total:    {}", cart.total().display());
}

pub fn print_products(title: &str, products: &[Product]) {
    println!("{title} ({})", products.len());
    for product in products {
        println!(
            "{:>5}  {:<32} {}",
            product.id,
            product.handle,
            product.price.display()
        );
    }
}
