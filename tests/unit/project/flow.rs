use super::*;

fn sprite(n: u32) -> Option<ActorId> {
    Some(ActorId::new(format!("sprite-{n}")))
}

#[test]
fn push_block_assigns_sequential_ids() {
    let mut f = Flow::new("flow-1", "Flow 1");
    let a = f.push_block("moveXBy50", sprite(1));
    let b = f.push_block("sayHello", sprite(2));
    assert_eq!(a.as_str(), "block-1");
    assert_eq!(b.as_str(), "block-2");
    assert_eq!(f.blocks.len(), 2);
}

#[test]
fn push_block_skips_ids_still_in_use() {
    let mut f = Flow::new("flow-1", "Flow 1");
    f.push_block("moveXBy50", sprite(1));
    let second = f.push_block("moveXBy50", sprite(1));
    f.remove_block(&BlockId::from("block-1"));
    // One block left, but `block-2` is taken.
    let third = f.push_block("moveYBy50", sprite(1));
    assert_eq!(second.as_str(), "block-2");
    assert_eq!(third.as_str(), "block-3");
    f.validate().expect("ids stay unique");
}

#[test]
fn move_block_reorders_and_checks_bounds() {
    let mut f = Flow::new("flow-1", "Flow 1");
    f.push_block("a", sprite(1));
    f.push_block("b", sprite(1));
    f.push_block("c", sprite(1));

    f.move_block(0, 2).expect("in range");
    let order: Vec<&str> = f.blocks.iter().map(|b| b.action.as_str()).collect();
    assert_eq!(order, ["b", "c", "a"]);

    let err = f.move_block(0, 3).unwrap_err();
    assert!(matches!(err, FlowError::Validation(_)));
}

#[test]
fn blocks_for_keeps_flow_order() {
    let mut f = Flow::new("flow-1", "Flow 1");
    f.push_block("a", sprite(1));
    f.push_block("b", sprite(2));
    f.push_block("c", sprite(1));
    f.push_block("d", None);

    let one = ActorId::from("sprite-1");
    let actions: Vec<&str> = f.blocks_for(&one).map(|b| b.action.as_str()).collect();
    assert_eq!(actions, ["a", "c"]);
}

#[test]
fn duplicate_block_ids_fail_validation() {
    let mut f = Flow::new("flow-1", "Flow 1");
    f.blocks.push(ActionBlock::new("block-1", "a", sprite(1)));
    f.blocks.push(ActionBlock::new("block-1", "b", sprite(1)));
    assert!(f.validate().is_err());
}

#[test]
fn legacy_target_field_name_is_accepted() {
    let b: ActionBlock = serde_json::from_str(
        r#"{"id":"block-1","action":"moveXBy50","targetActorId":"sprite-1"}"#,
    )
    .unwrap();
    assert_eq!(b.target, sprite(1));

    let unassigned: ActionBlock =
        serde_json::from_str(r#"{"id":"block-2","action":"sayHello"}"#).unwrap();
    assert_eq!(unassigned.target, None);
}

#[test]
fn book_starts_with_one_active_flow() {
    let book = FlowBook::default();
    assert_eq!(book.len(), 1);
    assert_eq!(book.active_id().as_str(), "flow-1");
    assert_eq!(book.active().map(|f| f.name.as_str()), Some("Flow 1"));
}

#[test]
fn add_flow_activates_the_new_flow() {
    let mut book = FlowBook::default();
    let id = book.add_flow();
    assert_eq!(id.as_str(), "flow-2");
    assert_eq!(book.active_id(), &id);
    assert_eq!(book.get(&id).map(|f| f.name.as_str()), Some("Flow 2"));

    book.set_active(&FlowId::from("flow-1")).unwrap();
    assert_eq!(book.active_id().as_str(), "flow-1");
    assert!(book.set_active(&FlowId::from("flow-9")).is_err());
}

#[test]
fn deleting_active_flow_falls_back_to_first() {
    let mut book = FlowBook::default();
    let second = book.add_flow();
    book.delete_flow(&second).unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book.active_id().as_str(), "flow-1");

    let err = book.delete_flow(&FlowId::from("flow-1")).unwrap_err();
    assert!(err.is_invalid_state());
}

#[test]
fn rename_and_active_mut_edit_in_place() {
    let mut book = FlowBook::default();
    book.rename(&FlowId::from("flow-1"), "Dance").unwrap();
    book.active_mut()
        .expect("active flow")
        .push_block("rotate360", sprite(1));

    let active = book.active().expect("active flow");
    assert_eq!(active.name, "Dance");
    assert_eq!(active.blocks.len(), 1);
    assert!(book.rename(&FlowId::from("nope"), "x").is_err());
}
