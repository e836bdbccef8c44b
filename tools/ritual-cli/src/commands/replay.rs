//! Scripted replay of bag actions.

use std::fs;

use anyhow::{Context as _, Result};
use indicatif::ProgressBar;
use ritual_bag::bag::{BagAction, RitualBag};
use ritual_bag::BagError;
use serde::Serialize;

use super::ReplayArgs;
use crate::context::Context;

/// Outcome of one scripted action.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Serialize)]
struct ReplayReport<'a> {
    steps: &'a [StepOutcome],
    is_open: bool,
    snapshot: ritual_bag::bag::CheckoutSnapshot,
}

/// Run the replay command.
pub fn run(args: ReplayArgs, ctx: &Context) -> Result<()> {
    let content = fs::read_to_string(ctx.resolve_path(&args.file))
        .with_context(|| format!("Failed to read replay script: {}", args.file))?;
    let actions = BagAction::list_from_json(&content)
        .with_context(|| format!("Failed to parse replay script: {}", args.file))?;

    ctx.output.header(&format!("Replaying {} actions", actions.len()));
    tracing::info!(file = %args.file, actions = actions.len(), persist = args.persist, "replaying script");

    let (steps, bag) = if args.persist {
        let vault = ctx.vault()?;
        vault.update(&ctx.session, ctx.currency()?, |bag| {
            let pb = ctx.output.progress(actions.len() as u64, "actions");
            let steps = apply_script(bag, &actions, args.strict, &pb);
            pb.finish_and_clear();
            steps
        })?
    } else {
        let mut bag = RitualBag::new(ctx.currency()?);
        let pb = ctx.output.progress(actions.len() as u64, "actions");
        let steps = apply_script(&mut bag, &actions, args.strict, &pb);
        pb.finish_and_clear();
        (steps?, bag)
    };

    if ctx.output.is_json() {
        ctx.output.json(&ReplayReport {
            steps: &steps,
            is_open: bag.is_open(),
            snapshot: bag.checkout_snapshot()?,
        });
        return Ok(());
    }

    for step in &steps {
        match &step.error {
            None => ctx.output.list_item(&format!("#{} {}", step.index, step.action)),
            Some(err) => ctx
                .output
                .warn(&format!("#{} {} rejected: {}", step.index, step.action, err)),
        }
    }

    let rejected = steps.iter().filter(|s| !s.is_ok()).count();
    if rejected == 0 {
        ctx.output.success(&format!("Applied {} actions", steps.len()));
    } else {
        ctx.output.success(&format!(
            "Applied {} actions, {} rejected",
            steps.len() - rejected,
            rejected
        ));
    }
    if args.persist {
        ctx.output
            .kv("Saved", &format!("{} (version {})", ctx.session, bag.version()));
    }
    ctx.output
        .kv("Drawer", if bag.is_open() { "open" } else { "closed" });

    if !bag.is_empty() {
        ctx.output.bag_lines(bag.lines());
    }
    ctx.output.totals(&bag.totals()?);
    Ok(())
}

/// Apply `actions` in order.
///
/// Rejected actions leave the bag unchanged and are recorded; with `strict`
/// the first rejection aborts the whole script instead.
pub fn apply_script(
    bag: &mut RitualBag,
    actions: &[BagAction],
    strict: bool,
    pb: &ProgressBar,
) -> Result<Vec<StepOutcome>, BagError> {
    let mut steps = Vec::with_capacity(actions.len());

    for (index, action) in actions.iter().enumerate() {
        let name = action.name();
        let error = match bag.dispatch(action.clone()) {
            Ok(()) => None,
            Err(e) if strict => {
                tracing::warn!(index, action = name, error = %e, "replay aborted");
                return Err(e);
            }
            Err(e) => {
                tracing::debug!(index, action = name, error = %e, "action rejected");
                Some(e.to_string())
            }
        };
        steps.push(StepOutcome {
            index,
            action: name,
            error,
        });
        pb.inc(1);
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritual_bag::bag::ItemKey;
    use ritual_bag::{Currency, Money};

    fn script() -> Vec<BagAction> {
        BagAction::list_from_json(
            r#"[
                {"type": "add_item", "product_id": "prod-1", "display_name": "Rose Oil",
                 "unit_price": {"amount_cents": 4200, "currency": "USD"}},
                {"type": "add_item", "product_id": "", "display_name": "Blank",
                 "unit_price": {"amount_cents": 100, "currency": "USD"}},
                {"type": "update_quantity", "key": {"product_id": "prod-1"}, "quantity": 5},
                {"type": "close_drawer"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_apply_script_records_rejections() {
        let mut bag = RitualBag::new(Currency::USD);
        let steps = apply_script(&mut bag, &script(), false, &ProgressBar::hidden()).unwrap();

        assert_eq!(steps.len(), 4);
        assert!(steps[0].is_ok());
        assert!(!steps[1].is_ok());
        assert_eq!(steps[1].action, "add_item");
        assert!(steps[2].is_ok());

        assert_eq!(bag.get(&ItemKey::product("prod-1")).unwrap().quantity, 5);
        assert_eq!(
            bag.total_price().unwrap(),
            Money::new(21000, Currency::USD)
        );
        assert!(!bag.is_open());
    }

    #[test]
    fn test_apply_script_strict_stops() {
        let mut bag = RitualBag::new(Currency::USD);
        let err = apply_script(&mut bag, &script(), true, &ProgressBar::hidden()).unwrap_err();

        assert_eq!(err, BagError::EmptyProductId);
        // Steps before the rejection were applied to the working bag.
        assert_eq!(bag.line_count(), 1);
    }

    #[test]
    fn test_step_outcome_json() {
        let step = StepOutcome {
            index: 0,
            action: "clear",
            error: None,
        };
        assert_eq!(
            serde_json::to_string(&step).unwrap(),
            r#"{"index":0,"action":"clear"}"#
        );
    }
}
