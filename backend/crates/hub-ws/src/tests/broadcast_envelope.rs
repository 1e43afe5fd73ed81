use crate::{BroadcastEnvelope, ConnectionId};

use serde_json::{Value, json};

#[test]
fn given_envelope_when_serialized_then_wire_shape_matches() {
    // Given
    let envelope =
        BroadcastEnvelope::from_data("alerts", "alert", &json!({"level": "high"})).unwrap();

    // When
    let wire = envelope.to_wire(1_700_000_000).unwrap();

    // Then
    let parsed: Value = serde_json::from_str(wire.as_str()).unwrap();
    assert_eq!(
        parsed,
        json!({"type": "alert", "data": {"level": "high"}, "timestamp": 1_700_000_000})
    );
}

#[test]
fn given_no_data_when_serialized_then_data_is_null() {
    let envelope = BroadcastEnvelope::new("", "tick", None);

    let wire = envelope.to_wire(5).unwrap();

    assert_eq!(wire.as_str(), r#"{"type":"tick","data":null,"timestamp":5}"#);
}

#[test]
fn given_exclusions_when_built_then_collected() {
    let a = ConnectionId::new();
    let b = ConnectionId::new();

    let envelope = BroadcastEnvelope::new("room", "t", None)
        .excluding(a)
        .excluding(b)
        .excluding(a);

    assert_eq!(envelope.excluded.len(), 2);
    assert!(envelope.excluded.contains(&a));
    assert!(envelope.excluded.contains(&b));
    assert!(!envelope.is_global());
}
