//! Freight quote command.
//!
//! Ctrl+C while a quote is in flight cancels the request.

#![allow(clippy::print_stdout)]

use tradeyard_core::{ProductId, QuoteStatus};
use tradeyard_storefront::config::FreightConfig;
use tradeyard_storefront::freight::{FreightClient, FreightQuoteRequest, format_quotes};
use tradeyard_storefront::stores::ShopperSession;

use super::{CliError, Context};

pub struct QuoteArgs<'a> {
    pub destination: &'a str,
    pub origin: Option<&'a str>,
    pub product_id: Option<ProductId>,
    /// Zero-based position in the printed list.
    pub select: Option<usize>,
}

/// A user-supplied origin, ignoring blank values.
fn explicit_origin(origin: Option<&str>) -> Option<&str> {
    origin.map(str::trim).filter(|o| !o.is_empty())
}

pub async fn run(
    ctx: &Context,
    session: &mut ShopperSession,
    args: &QuoteArgs<'_>,
) -> Result<(), CliError> {
    if args.select.is_some() && args.product_id.is_none() {
        return Err(CliError::Invalid(
            "--select needs --product-id to know which line to attach to".to_string(),
        ));
    }
    if args.destination.trim().is_empty() {
        return Err(CliError::Invalid("Destination postal code is required".to_string()));
    }

    let first = match args.product_id {
        Some(id) => session.cart.get(id).ok_or(CliError::NotInCart(id))?,
        None => session
            .cart
            .items()
            .first()
            .ok_or_else(|| CliError::Invalid("Cart is empty".to_string()))?,
    };
    let origin = explicit_origin(args.origin)
        .map(str::to_string)
        .or_else(|| {
            ctx.catalog
                .vendor(first.product.vendor_id)
                .map(|v| v.postal_code.clone())
        })
        .ok_or_else(|| CliError::Invalid("Origin postal code is required".to_string()))?;

    let request = if args.product_id.is_some() {
        FreightQuoteRequest::for_item(first, &origin, args.destination)
    } else {
        FreightQuoteRequest::from_cart(&session.cart, &origin, args.destination)
    };

    let client = FreightClient::new(&FreightConfig::from_env()?);
    println!(
        "Requesting quotes {} -> {} (timeout {}s)...",
        request.origin_postal_code,
        request.destination_postal_code,
        client.timeout().as_secs()
    );

    let task = client.spawn_quote(request);
    let result = tokio::select! {
        result = task => result,
        _ = tokio::signal::ctrl_c() => {
            println!("Cancelled");
            return Ok(());
        }
    };

    let status = if result.is_ok() {
        QuoteStatus::Success
    } else {
        QuoteStatus::Error
    };
    tracing::debug!(?status, "Quote attempt settled");

    let options = format_quotes(&result?);
    if options.is_empty() {
        println!("No carriers returned a quote");
        return Ok(());
    }
    for (index, option) in options.iter().enumerate() {
        println!("[{index}] {}", option.label);
    }

    if let (Some(product_id), Some(index)) = (args.product_id, args.select) {
        let option = options
            .get(index)
            .ok_or_else(|| CliError::Invalid(format!("No quote at position {index}")))?;
        if !option.is_selectable() {
            return Err(CliError::Invalid(format!("Quote {} has no price", option.id)));
        }
        session.cart.attach_quote(product_id, option.to_quote());
        println!("Attached {} to product {product_id}", option.carrier);
    }
    Ok(())
}
