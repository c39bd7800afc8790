use std::borrow::Cow;
use std::sync::OnceLock;

use crate::{KeyParameters, ShareLike};

/// Unbound 3-of-5, 2048-bit key shared by tests that only read it.
fn key_3_of_5() -> &'static KeyParameters {
    static KEY: OnceLock<KeyParameters> = OnceLock::new();
    KEY.get_or_init(|| KeyParameters::new(3, 5, 2048).expect("KeyParameters::new failed"))
}

/// Fresh 1024-bit key for tests that bind.
fn fresh_key(threshold: u32, share_count: u32) -> KeyParameters {
    KeyParameters::new(threshold, share_count, 1024).expect("KeyParameters::new failed")
}

/// Share as an external sharer would hand it over: x coordinate plus y bytes.
#[derive(Clone, Debug)]
struct TestShare {
    x: u32,
    y: Vec<u8>,
}

impl ShareLike for TestShare {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        let mut out = self.x.to_be_bytes().to_vec();
        out.extend_from_slice(&self.y);
        Cow::Owned(out)
    }
}

fn test_shares(count: u32, seed: u8) -> Vec<TestShare> {
    (1..=count)
        .map(|x| TestShare {
            x,
            y: (0..32u8).map(|i| i.wrapping_mul(seed).wrapping_add(x as u8)).collect(),
        })
        .collect()
}

pub mod integration;
