use super::{fresh_key, test_shares, TestShare};
use crate::{KeyParameters, KeyParamsError};

#[test]
fn test_full_bind_and_verify_flow() {
    // Dealer creates a 3-of-5 key.
    let key = KeyParameters::new(3, 5, 2048).expect("key generation failed");
    assert_eq!(key.modulus_bytes().len(), 2048 / 8);

    // External sharer produces 5 shares over the modulus.
    let shares = test_shares(5, 17);

    // Dealer binds them.
    key.bind_shares(&shares).expect("binding failed");
    assert!(key.is_bound());

    // Every holder can authenticate.
    for share in &shares {
        assert!(key.contains_share(share), "bound share {} not found", share.x);
    }

    // An unrelated sixth share is rejected.
    let stranger = TestShare {
        x: 6,
        y: vec![0x42; 32],
    };
    assert!(!key.contains_share(&stranger));
}

#[test]
fn test_second_binding_rejected_and_first_kept() {
    let key = fresh_key(2, 3);
    let first = test_shares(3, 1);
    let second = test_shares(3, 2);

    key.bind_shares(&first).unwrap();
    let err = key.bind_shares(&second).unwrap_err();
    assert!(matches!(err, KeyParamsError::AlreadyBound));

    for share in &first {
        assert!(key.contains_share(share));
    }
    for share in &second {
        assert!(!key.contains_share(share));
    }
}

#[test]
fn test_wrong_number_of_shares_rejected() {
    let key = fresh_key(2, 3);

    let err = key.bind_shares(&test_shares(2, 1)).unwrap_err();
    assert!(matches!(
        err,
        KeyParamsError::ShareCountMismatch {
            expected: 3,
            actual: 2
        }
    ));
    assert!(!key.is_bound());

    // A failed attempt does not consume the one binding.
    key.bind_shares(&test_shares(3, 1)).unwrap();
    assert!(key.is_bound());
}

#[test]
fn test_unbound_key_contains_nothing() {
    let key = fresh_key(2, 2);
    let shares = test_shares(2, 3);

    assert!(!key.contains_share(&shares[0]));
    assert!(!key.contains_fingerprint(&crate::fingerprint_bytes(b"")));
}

#[test]
fn test_byte_shares() {
    let key = fresh_key(2, 3);
    let shares: Vec<Vec<u8>> = vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()];

    key.bind_shares(&shares).unwrap();
    assert!(key.contains_share(b"beta".as_slice()));
    assert!(!key.contains_share(&b"delta".to_vec()));
    assert!(key.contains_fingerprint(&crate::fingerprint_bytes(b"gamma")));
}

#[test]
fn test_serde_round_trip_preserves_binding() {
    let key = fresh_key(2, 3);
    let shares = test_shares(3, 9);
    key.bind_shares(&shares).unwrap();

    let json = serde_json::to_string(&key).unwrap();
    let restored: KeyParameters = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.threshold(), 2);
    assert_eq!(restored.share_count(), 3);
    assert_eq!(restored.modulus_size(), key.modulus_size());
    assert_eq!(restored.modulus_bytes(), key.modulus_bytes());
    for share in &shares {
        assert!(restored.contains_share(share));
    }

    // Restored binding is still one-shot.
    assert!(matches!(
        restored.bind_shares(&shares),
        Err(KeyParamsError::AlreadyBound)
    ));
}

#[test]
fn test_serde_unbound_key_stays_unbound() {
    let key = fresh_key(2, 2);

    let json = serde_json::to_value(&key).unwrap();
    assert!(json["fingerprints"].is_null());
    assert_eq!(json["modulus_bits"], 1024);

    let restored: KeyParameters = serde_json::from_value(json).unwrap();
    assert!(!restored.is_bound());
    restored.bind_shares(&test_shares(2, 4)).unwrap();
}
