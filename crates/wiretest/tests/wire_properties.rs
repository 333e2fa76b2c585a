//! End-to-end properties of the mock flavors, driven through the host
//! boundary ([`WireBindings`] and boxed [`WireAdapter`]s).
//!
//! 1. connect → update(cfg) → connect leaves the last config `{}`.
//! 2. An unfiltered emit reaches every live instance and no disconnected one.
//! 3. A filtered emit reaches only matching instances, and membership changes
//!    made by callbacks do not alter the pass in progress.
//! 4. Default error payloads match each profile exactly.
//! 5. An out-of-range status fails with the exact message and delivers nothing.
//! 6. Two usages with different configs: a filtered emit (and a filtered
//!    error) reaches only the matching one; the other keeps undefined data.
//! 7. Disconnect then emit leaves the previously delivered value in place.
//! 8. A second disconnect is harmless.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};
use wiretest::{
    AdapterId, ErrorOptions, WireAdapter, WireAdapterMock, WireBindings, WireConfig, WireResult,
    config_from, create_apex_test_wire_adapter, create_lds_test_wire_adapter,
    create_test_wire_adapter,
};

type Slot = Rc<RefCell<Vec<Value>>>;

fn wire(bindings: &WireBindings, id: &AdapterId) -> (Box<dyn WireAdapter>, Slot) {
    let slot: Slot = Rc::default();
    let sink = Rc::clone(&slot);
    let adapter = bindings
        .construct(id, Rc::new(move |v| sink.borrow_mut().push(v)))
        .expect("mock identities always resolve");
    (adapter, slot)
}

fn last(slot: &Slot) -> Option<Value> {
    slot.borrow().last().cloned()
}

#[test]
fn reconnect_resets_last_config() {
    let bindings = WireBindings::new();
    let mock = create_test_wire_adapter(None);
    let (adapter, _) = wire(&bindings, mock.id());

    adapter.connect();
    adapter.update(config_from(json!({ "p": "v1" })));
    assert_eq!(json!(mock.get_last_config()), json!({ "p": "v1" }));
    adapter.connect();
    assert_eq!(json!(mock.get_last_config()), json!({}));
}

#[test]
fn unfiltered_emit_skips_disconnected() {
    let bindings = WireBindings::new();
    let mock = create_test_wire_adapter(None);
    let wired: Vec<_> = (0..3).map(|_| wire(&bindings, mock.id())).collect();
    for (adapter, _) in &wired {
        adapter.connect();
    }
    wired[1].0.disconnect();

    assert_eq!(mock.emit(json!("x")), 2);
    assert_eq!(last(&wired[0].1), Some(json!("x")));
    assert_eq!(last(&wired[1].1), None);
    assert_eq!(last(&wired[2].1), Some(json!("x")));
}

#[test]
fn callback_membership_changes_do_not_alter_the_pass() {
    let bindings = WireBindings::new();
    let mock = create_test_wire_adapter(None);

    let late: Rc<RefCell<Option<Box<dyn WireAdapter>>>> = Rc::default();
    let (victim, victim_slot) = wire(&bindings, mock.id());
    let victim = Rc::new(victim);

    let late_bindings = bindings.clone();
    let late_id = mock.id().clone();
    let late_slot = Rc::clone(&late);
    let victim_handle = Rc::clone(&victim);
    let trigger = bindings
        .construct(
            mock.id(),
            Rc::new(move |_| {
                victim_handle.disconnect();
                let (adapter, _) = wire(&late_bindings, &late_id);
                adapter.connect();
                *late_slot.borrow_mut() = Some(adapter);
            }),
        )
        .unwrap();

    trigger.connect();
    victim.connect();
    trigger.update(config_from(json!({ "k": 1 })));
    victim.update(config_from(json!({ "k": 1 })));

    let delivered = mock.emit_filtered(json!("go"), |cfg| cfg.get("k") == Some(&json!(1)));
    assert_eq!(delivered, 2);
    assert_eq!(last(&victim_slot), Some(json!("go")));
    assert!(late.borrow().is_some());
    // trigger and the late joiner are live; the victim left mid-pass
    assert_eq!(mock.live_count(), 2);
}

#[test]
fn default_error_payloads() {
    let bindings = WireBindings::new();
    let lds = create_lds_test_wire_adapter(None);
    let apex = create_apex_test_wire_adapter(None);
    let (lds_adapter, lds_slot) = wire(&bindings, lds.id());
    let (apex_adapter, apex_slot) = wire(&bindings, apex.id());
    lds_adapter.connect();
    apex_adapter.connect();

    lds.error(None, None, None).unwrap();
    apex.error(None, None, None).unwrap();

    assert_eq!(
        last(&lds_slot),
        Some(json!({ "error": {
            "body": [{
                "errorCode": "NOT_FOUND",
                "message": "The requested resource does not exist",
            }],
            "ok": false,
            "status": 404,
            "statusText": "NOT_FOUND",
        }}))
    );
    assert_eq!(
        last(&apex_slot),
        Some(json!({ "error": {
            "body": { "message": "An internal server error has occurred" },
            "ok": false,
            "status": 400,
            "statusText": "Bad Request",
        }}))
    );
}

#[test]
fn invalid_status_delivers_nothing() {
    let bindings = WireBindings::new();
    let lds = create_lds_test_wire_adapter(None);
    let (adapter, slot) = wire(&bindings, lds.id());
    adapter.connect();
    let before = slot.borrow().len();

    let err = lds.error(Some(json!("body")), Some(300), None).unwrap_err();
    assert_eq!(err.to_string(), "'status' must be >= 400 or <= 599");
    assert_eq!(slot.borrow().len(), before);
}

#[test]
fn filtered_emit_between_two_usages() {
    let bindings = WireBindings::new();
    let lds = create_lds_test_wire_adapter(None);
    let (first, first_slot) = wire(&bindings, lds.id());
    let (second, second_slot) = wire(&bindings, lds.id());
    first.connect();
    first.update(config_from(json!({ "p": "a" })));
    second.connect();
    second.update(config_from(json!({ "p": "a", "p2": "second" })));

    let delivered = lds.emit_filtered(json!({ "foo": "bar" }), |cfg| {
        cfg.get("p2") == Some(&json!("second"))
    });
    assert_eq!(delivered, 1);

    let first_result = WireResult::from_value(&last(&first_slot).unwrap()).unwrap();
    assert_eq!(first_result.data, None);
    assert_eq!(first_result.error, None);
    let second_result = WireResult::from_value(&last(&second_slot).unwrap()).unwrap();
    assert_eq!(second_result.data, Some(json!({ "foo": "bar" })));
}

#[test]
fn filtered_error_between_two_usages() {
    let bindings = WireBindings::new();
    let lds = create_lds_test_wire_adapter(None);
    let (first, first_slot) = wire(&bindings, lds.id());
    let (second, second_slot) = wire(&bindings, lds.id());
    first.connect();
    first.update(config_from(json!({ "p": "a" })));
    second.connect();
    second.update(config_from(json!({ "p": "a", "p2": "second" })));

    let only_second = |cfg: &WireConfig| cfg.get("p2") == Some(&json!("second"));
    lds.emit_error(Some(ErrorOptions::new().status(500)), Some(&only_second))
        .unwrap();

    assert_eq!(last(&first_slot), Some(json!({})));
    assert_eq!(last(&second_slot).unwrap()["error"]["status"], json!(500));
}

#[test]
fn disconnect_keeps_previous_value() {
    let bindings = WireBindings::new();
    let lds = create_lds_test_wire_adapter(None);
    let (adapter, slot) = wire(&bindings, lds.id());
    adapter.connect();
    lds.emit(json!({ "foo": "bar" }));
    adapter.disconnect();
    lds.emit(json!({ "bar": "baz" }));
    assert_eq!(last(&slot), Some(json!({ "data": { "foo": "bar" } })));
}

#[test]
fn double_disconnect_is_harmless() {
    let bindings = WireBindings::new();
    let mock = create_test_wire_adapter(None);
    let (adapter, _) = wire(&bindings, mock.id());
    let (other, other_slot) = wire(&bindings, mock.id());
    adapter.connect();
    other.connect();

    adapter.disconnect();
    adapter.disconnect();
    assert_eq!(mock.live_count(), 1);
    assert_eq!(mock.emit(json!(1)), 1);
    assert_eq!(last(&other_slot), Some(json!(1)));
}
