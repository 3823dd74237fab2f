#![no_main]

use flicker_core::StateTrace;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Deserialization validates ordering and geometry; it must reject bad
    // input with an error, never a panic.
    let Ok(trace) = serde_json::from_slice::<StateTrace>(data) else {
        return;
    };
    for pair in trace.snapshots().windows(2) {
        assert!(pair[0].timestamp() < pair[1].timestamp());
    }
    let encoded = serde_json::to_vec(&trace).expect("serializable");
    let decoded: StateTrace = serde_json::from_slice(&encoded).expect("round trip");
    assert_eq!(decoded, trace);
});
