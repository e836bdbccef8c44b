//! Bag editing and inspection commands.

use anyhow::Result;
use chrono::DateTime;
use dialoguer::Confirm;
use ritual_bag::bag::RitualBag;
use ritual_bag::{BagError, Money, ProductId};

use super::{AddArgs, CatalogAddArgs, ConfirmArgs, KeyArgs, UpdateArgs};
use crate::context::Context;

/// Add one unit of a product.
pub fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let vault = ctx.vault()?;
    let (line, bag) = vault.update(&ctx.session, ctx.currency()?, |bag| {
        let price = Money::from_decimal(args.price, bag.currency())
            .ok_or_else(|| BagError::InvalidAmount(args.price.to_string()))?;
        bag.add_item(
            args.product.as_str(),
            args.variant.as_deref(),
            args.name.as_str(),
            price,
            args.image.as_str(),
        )
        .cloned()
    })?;

    tracing::info!(session = %ctx.session, key = %line.key, quantity = line.quantity, "added item");
    report(
        ctx,
        &format!("Added {} ({}), now x{}", line.display_name, line.key, line.quantity),
        &bag,
    )
}

/// Add one unit of a product priced from the catalog fixture.
pub fn add_from_catalog(args: CatalogAddArgs, ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    ctx.output
        .debug(&format!("Loaded catalog with {} products", catalog.len()));

    let product_id = ProductId::new(args.product.as_str());
    let vault = ctx.vault()?;
    let (line, bag) = vault.update(&ctx.session, ctx.currency()?, |bag| {
        bag.add_from_catalog(&catalog, &product_id, args.variant.as_deref())
            .cloned()
    })?;

    tracing::info!(session = %ctx.session, key = %line.key, quantity = line.quantity, "added catalog item");
    report(
        ctx,
        &format!(
            "Added {} ({}) at {}, now x{}",
            line.display_name,
            line.key,
            line.unit_price.display(),
            line.quantity
        ),
        &bag,
    )
}

/// Remove a line.
pub fn remove(args: KeyArgs, ctx: &Context) -> Result<()> {
    let key = args.key();
    let vault = ctx.vault()?;
    let (removed, bag) = vault.update(&ctx.session, ctx.currency()?, |bag| {
        Ok(bag.remove_item(&key))
    })?;

    if removed {
        report(ctx, &format!("Removed {}", key), &bag)
    } else {
        ctx.output.warn(&format!("No line for {} in the bag", key));
        report(ctx, "Bag unchanged", &bag)
    }
}

/// Set a line's quantity.
pub fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let key = args.line.key();
    let vault = ctx.vault()?;
    let (changed, bag) = vault.update(&ctx.session, ctx.currency()?, |bag| {
        bag.update_quantity(&key, args.quantity)
    })?;

    let msg = match bag.get(&key) {
        Some(line) if changed => format!("Set {} to x{}", key, line.quantity),
        None if changed => format!("Removed {}", key),
        Some(_) => format!("{} already at x{}", key, args.quantity),
        None => {
            ctx.output.warn(&format!("No line for {} in the bag", key));
            "Bag unchanged".to_string()
        }
    };
    report(ctx, &msg, &bag)
}

/// Remove every line.
pub fn clear(args: ConfirmArgs, ctx: &Context) -> Result<()> {
    let vault = ctx.vault()?;
    let current = vault.load_or_new(&ctx.session, ctx.currency()?)?;

    if current.is_empty() {
        return report(ctx, "Bag is already empty", &current);
    }

    if !confirm(
        &args,
        ctx,
        &format!("Remove all {} lines from the bag?", current.line_count()),
    )? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    let ((), bag) = vault.update(&ctx.session, ctx.currency()?, |bag| {
        bag.clear();
        Ok(())
    })?;
    report(ctx, "Cleared the bag", &bag)
}

/// Show lines and totals.
pub fn show(ctx: &Context) -> Result<()> {
    let vault = ctx.vault()?;
    let record = vault.load_record(&ctx.session)?;
    let bag = vault.load_or_new(&ctx.session, ctx.currency()?)?;

    if ctx.output.is_json() {
        ctx.output.json(&bag.checkout_snapshot()?);
        return Ok(());
    }

    ctx.output.header(&format!("Ritual Bag ({})", ctx.session));
    if let Some(saved_at) = record.as_ref().and_then(|r| format_timestamp(r.saved_at)) {
        ctx.output.kv("Saved", &saved_at);
    }
    ctx.output.kv("Version", &bag.version().to_string());

    if bag.is_empty() {
        ctx.output.info("Your bag is empty");
        return Ok(());
    }

    println!();
    ctx.output.bag_lines(bag.lines());
    println!();
    ctx.output.totals(&bag.totals()?);
    Ok(())
}

/// Print the checkout snapshot as JSON.
pub fn checkout(ctx: &Context) -> Result<()> {
    let vault = ctx.vault()?;
    let bag = vault.load_or_new(&ctx.session, ctx.currency()?)?;

    if bag.is_empty() {
        ctx.output.warn("Checking out an empty bag");
    }

    ctx.output.json(&bag.checkout_snapshot()?);
    Ok(())
}

/// List sessions with a stored bag.
pub fn sessions(ctx: &Context) -> Result<()> {
    let vault = ctx.vault()?;
    let sessions = vault.sessions()?;

    if ctx.output.is_json() {
        ctx.output.json(&sessions);
        return Ok(());
    }

    ctx.output.header("Stored bags");
    if sessions.is_empty() {
        ctx.output.info("No stored bags");
        return Ok(());
    }

    for session in &sessions {
        let Some(record) = vault.load_record(session)? else {
            continue;
        };
        let saved = format_timestamp(record.saved_at).unwrap_or_else(|| "-".to_string());
        let marker = if *session == ctx.session { " (current)" } else { "" };
        ctx.output.list_item(&format!(
            "{}{}: {} lines, saved {}",
            session,
            marker,
            record.lines.len(),
            saved
        ));
    }
    Ok(())
}

/// Delete the stored bag.
pub fn discard(args: ConfirmArgs, ctx: &Context) -> Result<()> {
    let vault = ctx.vault()?;

    if vault.load_record(&ctx.session)?.is_none() {
        ctx.output.info(&format!("No stored bag for {}", ctx.session));
        return Ok(());
    }

    if !confirm(
        &args,
        ctx,
        &format!("Discard the stored bag for {}?", ctx.session),
    )? {
        ctx.output.info("Cancelled");
        return Ok(());
    }

    vault.discard(&ctx.session)?;
    ctx.output
        .success(&format!("Discarded bag for {}", ctx.session));
    Ok(())
}

/// Print a result message and the bag totals, or the snapshot in JSON mode.
fn report(ctx: &Context, msg: &str, bag: &RitualBag) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&bag.checkout_snapshot()?);
        return Ok(());
    }

    ctx.output.success(msg);
    ctx.output.totals(&bag.totals()?);
    Ok(())
}

/// Ask before a destructive change. JSON mode and `--yes` skip the prompt.
fn confirm(args: &ConfirmArgs, ctx: &Context, prompt: &str) -> Result<bool> {
    if args.yes || ctx.output.is_json() {
        return Ok(true);
    }

    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn format_timestamp(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}
