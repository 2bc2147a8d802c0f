/// Tests for DynEvent and DynEventHandler
///
/// These tests validate signature-checked connection, emission order and
/// the disconnect discipline on both sides.

use super::*;
use crate::rtti::{Var, VarType};
use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Helper Functions
// ============================================================================

fn sig(text: &str) -> Signature {
    text.parse().unwrap()
}

/// Handler that appends `tag:value` to a shared log
fn recording_handler(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> DynEventHandler {
    let log = log.clone();
    DynEventHandler::new(move |value: i32| {
        log.lock().unwrap().push(format!("{}:{}", tag, value));
    })
}

// ============================================================================
// Tests: Connect
// ============================================================================

#[test]
fn test_connect_matching_signature() {
    let event = DynEvent::new(sig("void(int)"));
    let handler = DynEventHandler::new(|_: i32| {});

    assert!(event.connect(&handler));
    assert_eq!(event.num_of_connects(), 1);
    assert_eq!(handler.num_of_connects(), 1);
    assert!(event.is_connected(&handler));
}

#[test]
fn test_connect_mismatch_refused() {
    let ev1 = DynEvent::new(sig("void(int)"));
    let ev2 = DynEvent::new(sig("void(float)"));
    let handler = DynEventHandler::new(|_: i32| {});

    assert!(ev1.connect(&handler));
    assert!(!ev2.connect(&handler));

    assert_eq!(ev2.num_of_connects(), 0);
    assert_eq!(handler.num_of_connects(), 1);
}

#[test]
fn test_connect_return_type_must_match() {
    let event = DynEvent::new(sig("void(int)"));
    let handler = DynEventHandler::new(|v: i32| v);
    assert!(!event.connect(&handler));
    assert_eq!(event.num_of_connects(), 0);
}

#[test]
fn test_unbound_handler_never_connects() {
    let event = DynEvent::new(sig("void()"));
    let handler = DynEventHandler::from_func(DynFunc::default());
    assert!(!event.connect(&handler));
}

#[test]
fn test_double_connect_is_noop() {
    let event = DynEvent::new(sig("void(int)"));
    let log = Arc::new(Mutex::new(Vec::new()));
    let handler = recording_handler("h", &log);

    assert!(event.connect(&handler));
    assert!(event.connect(&handler));
    assert_eq!(event.num_of_connects(), 1);
    assert_eq!(handler.num_of_connects(), 1);

    event.emit_str("Param0=\"1\"");
    assert_eq!(*log.lock().unwrap(), vec!["h:1".to_string()]);
}

#[test]
fn test_disconnect() {
    let event = DynEvent::new(sig("void(int)"));
    let handler = DynEventHandler::new(|_: i32| {});
    event.connect(&handler);

    assert!(event.disconnect(&handler));
    assert!(!event.disconnect(&handler));
    assert_eq!(event.num_of_connects(), 0);
    assert_eq!(handler.num_of_connects(), 0);
}

// ============================================================================
// Tests: Emit
// ============================================================================

#[test]
fn test_emit_in_connection_order() {
    let event = DynEvent::new(sig("void(int)"));
    let log = Arc::new(Mutex::new(Vec::new()));
    let a = recording_handler("a", &log);
    let b = recording_handler("b", &log);
    event.connect(&b);
    event.connect(&a);

    assert!(event.emit(&DynParams::from_values(VarType::Void, vec![Var::Int(7)])));
    assert_eq!(*log.lock().unwrap(), vec!["b:7".to_string(), "a:7".to_string()]);
}

#[test]
fn test_emit_mismatch_is_noop() {
    let event = DynEvent::new(sig("void(int)"));
    let log = Arc::new(Mutex::new(Vec::new()));
    let handler = recording_handler("h", &log);
    event.connect(&handler);

    assert!(!event.emit(&DynParams::from_values(VarType::Void, vec![Var::UInt(7)])));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_emit_table() {
    let event = DynEvent::new(sig("void(int)"));
    let log = Arc::new(Mutex::new(Vec::new()));
    let handler = recording_handler("t", &log);
    event.connect(&handler);

    let table: toml::Table = toml::from_str("Param0 = 42").unwrap();
    assert!(event.emit_table(&table));
    assert_eq!(*log.lock().unwrap(), vec!["t:42".to_string()]);
}

#[test]
fn test_handler_on_several_events() {
    let ev1 = DynEvent::new(sig("void(int)"));
    let ev2 = DynEvent::new(sig("void(int)"));
    let count = Arc::new(AtomicU32::new(0));
    let count_clone = count.clone();
    let handler = DynEventHandler::new(move |v: i32| {
        count_clone.fetch_add(v as u32, Ordering::SeqCst);
    });

    ev1.connect(&handler);
    ev2.connect(&handler);
    assert_eq!(handler.num_of_connects(), 2);

    ev1.emit_str("Param0=1");
    ev2.emit_str("Param0=10");
    assert_eq!(count.load(Ordering::SeqCst), 11);
}

// ============================================================================
// Tests: Teardown
// ============================================================================

#[test]
fn test_event_drop_disconnects_handlers() {
    let handler = DynEventHandler::new(|_: i32| {});
    let keep = DynEvent::new(sig("void(int)"));
    keep.connect(&handler);
    {
        let event = DynEvent::new(sig("void(int)"));
        event.connect(&handler);
        assert_eq!(handler.num_of_connects(), 2);
    }
    assert_eq!(handler.num_of_connects(), 1);
    assert!(keep.is_connected(&handler));
}

#[test]
fn test_handler_drop_disconnects_from_events() {
    let ev1 = DynEvent::new(sig("void(int)"));
    let ev2 = DynEvent::new(sig("void(int)"));
    {
        let handler = DynEventHandler::new(|_: i32| {});
        ev1.connect(&handler);
        ev2.connect(&handler);
    }
    assert_eq!(ev1.num_of_connects(), 0);
    assert_eq!(ev2.num_of_connects(), 0);
}

#[test]
fn test_disconnect_all() {
    let ev1 = DynEvent::new(sig("void()"));
    let ev2 = DynEvent::new(sig("void()"));
    let handler = DynEventHandler::new(|| {});
    ev1.connect(&handler);
    ev2.connect(&handler);

    handler.disconnect_all();
    assert_eq!(handler.num_of_connects(), 0);
    assert_eq!(ev1.num_of_connects(), 0);
    assert_eq!(ev2.num_of_connects(), 0);
}

#[test]
fn test_handler_disconnects_other_during_emit() {
    let event = Arc::new(DynEvent::new(sig("void()")));
    let log = Arc::new(Mutex::new(Vec::new()));

    let second_log = log.clone();
    let second = Arc::new(DynEventHandler::new(move || {
        second_log.lock().unwrap().push("second");
    }));

    let first_log = log.clone();
    let event_clone = event.clone();
    let second_clone = second.clone();
    let first = DynEventHandler::new(move || {
        first_log.lock().unwrap().push("first");
        event_clone.disconnect(&second_clone);
    });

    event.connect(&first);
    event.connect(&second);
    event.emit_str("");

    assert_eq!(*log.lock().unwrap(), vec!["first"]);
    assert_eq!(event.num_of_connects(), 1);

    // first holds clones of event and second; break the cycle
    drop(first);
}

#[test]
fn test_handler_may_disconnect_itself_during_emit() {
    let event = Arc::new(DynEvent::new(sig("void()")));
    let count = Arc::new(AtomicU32::new(0));

    let slot: Arc<Mutex<Option<Arc<DynEventHandler>>>> = Arc::new(Mutex::new(None));
    let slot_clone = slot.clone();
    let event_clone = event.clone();
    let count_clone = count.clone();
    let handler = Arc::new(DynEventHandler::new(move || {
        count_clone.fetch_add(1, Ordering::SeqCst);
        if let Some(me) = slot_clone.lock().unwrap().take() {
            event_clone.disconnect(&me);
        }
    }));
    *slot.lock().unwrap() = Some(handler.clone());

    event.connect(&handler);
    event.emit_str("");
    event.emit_str("");

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(event.num_of_connects(), 0);
}
