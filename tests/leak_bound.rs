//! Repeats a fixed batch of encode/decode calls, most of them failing, and
//! checks that the live heap footprint does not grow with the batch count.

use std::alloc::{GlobalAlloc, Layout, System};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicIsize, Ordering};

use bencodec::{decode, encode, from_bytes, to_bytes, DecodeError, EncodeError, Value};
use bytes::Bytes;

struct CountingAlloc;

static LIVE_BYTES: AtomicIsize = AtomicIsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size() as isize, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size() as isize, Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            LIVE_BYTES.fetch_add(new_size as isize - layout.size() as isize, Ordering::Relaxed);
        }
        new_ptr
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

/// Inputs from the stress batch with the outcome each must keep producing;
/// `None` means the input decodes.
const CASES: &[(&[u8], Option<DecodeError>)] = &[
    (b"d3:foo4:spam3:bar", Some(DecodeError::UnexpectedEnd { offset: 17 })),
    (b"d3:foo4:spam3:bari42e", Some(DecodeError::UnexpectedEnd { offset: 21 })),
    (
        b"d3:foo4:spam3:bari42ee",
        Some(DecodeError::InvalidDictionaryKeyOrder {
            offset: 12,
            reason: "keys not in ascending order",
        }),
    ),
    (b"d3:bar4:spam3:fooi42ee", None),
    (b"d3:bar3:baz3:foo3:quxe", None),
    (
        b"ld1:ai1e1:bl4:spam4:eggseei-0e",
        Some(DecodeError::InvalidInteger {
            offset: 27,
            reason: "negative zero",
        }),
    ),
    (b"99999999999:short", Some(DecodeError::UnexpectedEnd { offset: 17 })),
    (b"i9223372036854775808e", Some(DecodeError::IntegerOverflow { offset: 1 })),
];

fn run_batch(deep: &[u8]) {
    for (case, expected) in CASES {
        match expected {
            Some(e) => {
                assert_eq!(decode(case), Err(e.clone()));
                assert_eq!(from_bytes::<BTreeMap<String, Value>>(case), Err(e.clone()));
            }
            None => {
                assert!(decode(case).is_ok());
                assert!(from_bytes::<BTreeMap<String, Value>>(case).is_ok());
            }
        }

        let wrapped = encode(&Value::bytes(case)).unwrap();
        assert_eq!(decode(&wrapped), Ok(Value::bytes(case)));
    }

    assert!(matches!(
        decode(deep),
        Err(DecodeError::MaxDepthExceeded { .. })
    ));

    let mut nested = BTreeMap::new();
    nested.insert("ok", vec![Some(1.0f64)]);
    assert!(matches!(
        to_bytes(&nested),
        Err(EncodeError::UnsupportedType { .. })
    ));

    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"pieces"), Value::bytes(&[7; 4096]));
    dict.insert(Bytes::from_static(b"list"), Value::List(vec![Value::Integer(1); 64]));
    let encoded = encode(&Value::Dict(dict)).unwrap();
    assert_eq!(decode(&encoded).map(|v| encode(&v).unwrap()), Ok(encoded));
}

#[test]
fn test_repeated_calls_leave_footprint_bounded() {
    let deep = b"l".repeat(100_000);

    // Warm up once so lazily initialised runtime state is excluded.
    run_batch(&deep);
    let baseline = LIVE_BYTES.load(Ordering::Relaxed);

    // Checked after every batch; the slack covers allocations made by the
    // test harness itself, not by the codec.
    for batch in 0..2_000 {
        run_batch(&deep);
        let growth = LIVE_BYTES.load(Ordering::Relaxed) - baseline;
        assert!(
            growth <= 64 * 1024,
            "live heap grew by {growth} bytes after batch {batch}"
        );
    }
}
