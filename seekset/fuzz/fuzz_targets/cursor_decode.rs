#![no_main]

use libfuzzer_sys::fuzz_target;
use seekset::{BinaryCodec, CursorCodec, JsonCodec, Value};

fn has_nan(values: &[Value]) -> bool {
    values
        .iter()
        .any(|v| matches!(v, Value::Float(f) if f.is_nan()))
}

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding untrusted tokens must never panic or blow memory - only
    // return values or errors.
    let binary = BinaryCodec::new();
    if let Ok(values) = binary.decode(token) {
        // Whatever decoded must re-encode and decode to the same values
        // (NaN floats excepted: they decode fine but never compare equal)
        if !has_nan(&values) {
            let reencoded = binary.encode(&values);
            assert_eq!(binary.decode(&reencoded).as_ref(), Ok(&values));
        }
    }

    let json = JsonCodec::new();
    if let Ok(values) = json.decode(token) {
        let reencoded = json.encode(&values);
        assert_eq!(json.decode(&reencoded).as_ref(), Ok(&values));
    }
});
