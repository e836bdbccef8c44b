//! Reducer actions.
//!
//! Each bag operation as a serializable value, so UI events, scripted
//! sessions and replays can all drive the bag through [`RitualBag::dispatch`].

use crate::bag::{ItemKey, RitualBag};
use crate::error::BagError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A single bag operation.
///
/// Serialized with a `type` tag:
///
/// ```json
/// {"type": "add_item", "product_id": "prod-1", "display_name": "Rose Oil",
///  "unit_price": {"amount_cents": 4200, "currency": "USD"}, "image_url": "img.jpg"}
/// {"type": "update_quantity", "key": {"product_id": "prod-1"}, "quantity": 5}
/// {"type": "close_drawer"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BagAction {
    AddItem {
        product_id: ProductId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
        display_name: String,
        unit_price: Money,
        #[serde(default)]
        image_url: String,
    },
    RemoveItem {
        key: ItemKey,
    },
    UpdateQuantity {
        key: ItemKey,
        quantity: i64,
    },
    Clear,
    OpenDrawer,
    CloseDrawer,
}

impl BagAction {
    /// Short name for logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            BagAction::AddItem { .. } => "add_item",
            BagAction::RemoveItem { .. } => "remove_item",
            BagAction::UpdateQuantity { .. } => "update_quantity",
            BagAction::Clear => "clear",
            BagAction::OpenDrawer => "open_drawer",
            BagAction::CloseDrawer => "close_drawer",
        }
    }

    /// Parse a JSON array of actions.
    pub fn list_from_json(json: &str) -> Result<Vec<BagAction>, BagError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl RitualBag {
    /// Apply one action.
    pub fn dispatch(&mut self, action: BagAction) -> Result<(), BagError> {
        match action {
            BagAction::AddItem {
                product_id,
                variant,
                display_name,
                unit_price,
                image_url,
            } => {
                self.add_item(
                    product_id,
                    variant.as_deref(),
                    display_name,
                    unit_price,
                    image_url,
                )?;
            }
            BagAction::RemoveItem { key } => {
                self.remove_item(&key);
            }
            BagAction::UpdateQuantity { key, quantity } => {
                self.update_quantity(&key, quantity)?;
            }
            BagAction::Clear => self.clear(),
            BagAction::OpenDrawer => self.open_drawer(),
            BagAction::CloseDrawer => self.close_drawer(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_parse_action_script() {
        let actions = BagAction::list_from_json(
            r#"[
                {"type": "add_item", "product_id": "prod-2", "variant": "50ml",
                 "display_name": "Oud Elixir",
                 "unit_price": {"amount_cents": 6000, "currency": "USD"}},
                {"type": "update_quantity", "key": {"product_id": "prod-2", "variant": "50ml"}, "quantity": 3},
                {"type": "close_drawer"}
            ]"#,
        )
        .unwrap();

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].name(), "add_item");
        assert_eq!(actions[2], BagAction::CloseDrawer);
    }

    #[test]
    fn test_dispatch_matches_direct_calls() {
        let mut bag = RitualBag::new(Currency::USD);
        let key = ItemKey::variant("prod-2", "50ml");
        let script = vec![
            BagAction::AddItem {
                product_id: ProductId::new("prod-2"),
                variant: Some("50ml".to_string()),
                display_name: "Oud Elixir".to_string(),
                unit_price: Money::new(6000, Currency::USD),
                image_url: String::new(),
            },
            BagAction::UpdateQuantity {
                key: key.clone(),
                quantity: 3,
            },
            BagAction::CloseDrawer,
        ];

        for action in script {
            bag.dispatch(action).unwrap();
        }

        assert_eq!(bag.get(&key).unwrap().quantity, 3);
        assert_eq!(bag.total_price().unwrap(), Money::new(18000, Currency::USD));
        assert!(!bag.is_open());
    }

    #[test]
    fn test_empty_variant_in_script_targets_plain_line() {
        let mut bag = RitualBag::new(Currency::USD);
        let actions = BagAction::list_from_json(
            r#"[
                {"type": "add_item", "product_id": "p", "variant": "", "display_name": "Balm",
                 "unit_price": {"amount_cents": 1500, "currency": "USD"}},
                {"type": "update_quantity", "key": {"product_id": "p", "variant": ""}, "quantity": 7}
            ]"#,
        )
        .unwrap();
        for action in actions {
            bag.dispatch(action).unwrap();
        }
        assert_eq!(bag.get(&ItemKey::product("p")).unwrap().quantity, 7);

        let remove = BagAction::list_from_json(
            r#"[{"type": "remove_item", "key": {"product_id": "p", "variant": ""}}]"#,
        )
        .unwrap();
        for action in remove {
            bag.dispatch(action).unwrap();
        }
        assert!(bag.is_empty());
    }

    #[test]
    fn test_dispatch_remove_missing_is_ok() {
        let mut bag = RitualBag::new(Currency::USD);
        bag.dispatch(BagAction::RemoveItem {
            key: ItemKey::product("prod-404"),
        })
        .unwrap();
        assert!(bag.is_empty());
    }

    #[test]
    fn test_unknown_action_type_is_rejected() {
        let result = BagAction::list_from_json(r#"[{"type": "checkout"}]"#);
        assert!(matches!(result, Err(BagError::Serialization(_))));
    }
}
