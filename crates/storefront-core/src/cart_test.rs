use super::*;

fn snapshot(lines: &[(&str, &str, u32)]) -> CartSnapshot {
    CartSnapshot {
        id: "gid://shopify/Cart/c1".to_string(),
        checkout_url: None,
        total_quantity: lines.iter().map(|(_, _, q)| q).sum(),
        subtotal: None,
        lines: lines
            .iter()
            .map(|(line_id, variant_id, quantity)| CartLine {
                id: (*line_id).to_string(),
                variant_id: (*variant_id).to_string(),
                quantity: *quantity,
                total: None,
            })
            .collect(),
    }
}

#[test]
fn clamp_quantity_never_goes_below_one() {
    assert_eq!(clamp_quantity(0), 1);
    assert_eq!(clamp_quantity(-5), 1);
    assert_eq!(clamp_quantity(1), 1);
    assert_eq!(clamp_quantity(7), 7);
}

#[test]
fn new_variant_becomes_lines_add() {
    let plan = plan_cart_mutations(&[StagedLine::new("v1", 2)], &CartLineIndex::default());
    assert_eq!(
        plan.adds,
        vec![CartLineAdd {
            merchandise_id: "v1".to_string(),
            quantity: 2,
        }]
    );
    assert!(plan.updates.is_empty());
}

#[test]
fn existing_line_with_new_quantity_becomes_lines_update_by_line_id() {
    let index = snapshot(&[("line-1", "v1", 1)]).line_index();
    let plan = plan_cart_mutations(&[StagedLine::new("v1", 3)], &index);
    assert!(plan.adds.is_empty());
    assert_eq!(
        plan.updates,
        vec![CartLineUpdate {
            id: "line-1".to_string(),
            quantity: 3,
        }]
    );
    let mutations = plan.into_mutations();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action(), CartAction::LinesUpdate);
}

#[test]
fn unchanged_quantity_produces_nothing() {
    let index = snapshot(&[("line-1", "v1", 2)]).line_index();
    assert!(plan_cart_mutations(&[StagedLine::new("v1", 2)], &index).is_empty());
}

#[test]
fn zero_and_negative_quantities_are_omitted() {
    let index = snapshot(&[("line-1", "v1", 2)]).line_index();
    let plan = plan_cart_mutations(
        &[
            StagedLine::new("v1", 0),
            StagedLine::new("v2", 0),
            StagedLine::new("v3", -1),
            StagedLine::new("v4", 1),
        ],
        &index,
    );
    assert!(plan.updates.is_empty());
    assert_eq!(plan.adds.len(), 1);
    assert_eq!(plan.adds[0].merchandise_id, "v4");
}

#[test]
fn last_staged_entry_for_a_variant_wins() {
    let plan = plan_cart_mutations(
        &[StagedLine::new("v1", 1), StagedLine::new("v1", 4)],
        &CartLineIndex::default(),
    );
    assert_eq!(plan.adds.len(), 1);
    assert_eq!(plan.adds[0].quantity, 4);
}

#[test]
fn mixed_plan_emits_add_before_update() {
    let index = snapshot(&[("line-9", "v9", 1)]).line_index();
    let mutations =
        plan_cart_mutations(&[StagedLine::new("v9", 2), StagedLine::new("v1", 1)], &index)
            .into_mutations();
    let actions: Vec<_> = mutations.iter().map(CartMutation::action).collect();
    assert_eq!(actions, [CartAction::LinesAdd, CartAction::LinesUpdate]);
}

#[test]
fn line_index_keeps_first_line_per_variant() {
    let index = snapshot(&[("line-1", "v1", 1), ("line-2", "v1", 5)]).line_index();
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("v1").map(|l| l.line_id.as_str()), Some("line-1"));
}

#[test]
fn inputs_json_uses_api_field_names() {
    let add = CartMutation::LinesAdd(vec![CartLineAdd {
        merchandise_id: "v1".to_string(),
        quantity: 2,
    }]);
    let json: serde_json::Value = serde_json::from_str(&add.inputs_json()).unwrap();
    assert_eq!(json["lines"][0]["merchandiseId"], "v1");
    assert_eq!(json["lines"][0]["quantity"], 2);
}

#[test]
fn from_form_decodes_update() {
    let mutation =
        CartMutation::from_form("LinesUpdate", r#"{"lines":[{"id":"line-1","quantity":3}]}"#)
            .unwrap();
    assert_eq!(
        mutation,
        CartMutation::LinesUpdate(vec![CartLineUpdate {
            id: "line-1".to_string(),
            quantity: 3,
        }])
    );
}

#[test]
fn from_form_rejects_unknown_action() {
    let err = CartMutation::from_form("LinesRemove", r#"{"lines":[]}"#).unwrap_err();
    assert!(matches!(err, CoreError::UnknownCartAction(ref a) if a == "LinesRemove"));
}

#[test]
fn from_form_rejects_zero_quantity() {
    let err = CartMutation::from_form(
        "LinesAdd",
        r#"{"lines":[{"merchandiseId":"v1","quantity":0}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::InvalidQuantity { quantity: 0, .. }));
}

#[test]
fn from_form_rejects_malformed_inputs() {
    let err = CartMutation::from_form("LinesAdd", "not json").unwrap_err();
    assert!(matches!(err, CoreError::CartInputs { .. }));
}
