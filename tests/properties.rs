use estream::{Algorithm, EstreamError, StreamCipher};
use proptest::prelude::*;

fn algorithm_strategy() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::Hc128),
        Just(Algorithm::Hc256),
        Just(Algorithm::Rabbit),
    ]
}

/// Key and IV of valid lengths, sometimes with no IV for Rabbit
fn material_strategy() -> impl Strategy<Value = (Algorithm, Vec<u8>, Vec<u8>)> {
    (algorithm_strategy(), any::<bool>()).prop_flat_map(|(algorithm, drop_iv)| {
        let iv_len = if drop_iv && algorithm == Algorithm::Rabbit {
            0
        } else {
            algorithm.iv_len()
        };
        (
            Just(algorithm),
            prop::collection::vec(any::<u8>(), algorithm.key_len()),
            prop::collection::vec(any::<u8>(), iv_len),
        )
    })
}

fn one_shot(algorithm: Algorithm, key: &[u8], iv: &[u8], data: &[u8]) -> Vec<u8> {
    let mut cipher = algorithm.new_cipher(key, iv).unwrap();
    let mut out = data.to_vec();
    cipher.apply_keystream(&mut out);
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn chunking_does_not_change_output(
        (algorithm, key, iv) in material_strategy(),
        data in prop::collection::vec(any::<u8>(), 0..600),
        splits in prop::collection::vec(0usize..40, 0..30),
    ) {
        let expected = one_shot(algorithm, &key, &iv, &data);

        let mut cipher = algorithm.new_cipher(&key, &iv).unwrap();
        let mut out = data.clone();
        let mut rest = &mut out[..];
        for split in splits {
            let n = split.min(rest.len());
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(n);
            cipher.apply_keystream(head);
            rest = tail;
        }
        cipher.apply_keystream(rest);

        prop_assert_eq!(out, expected);
    }

    #[test]
    fn decrypt_restores_plaintext(
        (algorithm, key, iv) in material_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..1024),
    ) {
        let ciphertext = one_shot(algorithm, &key, &iv, &plaintext);
        prop_assert_eq!(ciphertext.len(), plaintext.len());
        let recovered = one_shot(algorithm, &key, &iv, &ciphertext);
        prop_assert_eq!(recovered, plaintext);
    }

    #[test]
    fn xor_keystream_matches_in_place(
        (algorithm, key, iv) in material_strategy(),
        src in prop::collection::vec(any::<u8>(), 0..300),
    ) {
        let mut cipher = algorithm.new_cipher(&key, &iv).unwrap();
        let mut dst = vec![0u8; src.len()];
        cipher.xor_keystream(&mut dst, &src);
        prop_assert_eq!(dst, one_shot(algorithm, &key, &iv, &src));
    }

    #[test]
    fn empty_transform_is_a_no_op(
        (algorithm, key, iv) in material_strategy(),
        prefix in 0usize..40,
        empties in 1usize..5,
    ) {
        let mut a = algorithm.new_cipher(&key, &iv).unwrap();
        let mut b = algorithm.new_cipher(&key, &iv).unwrap();

        let mut buf = vec![0u8; prefix];
        a.apply_keystream(&mut buf);
        b.apply_keystream(&mut buf.clone());
        for _ in 0..empties {
            a.apply_keystream(&mut []);
        }

        let mut next_a = [0u8; 64];
        let mut next_b = [0u8; 64];
        a.apply_keystream(&mut next_a);
        b.apply_keystream(&mut next_b);
        prop_assert_eq!(next_a, next_b);
    }

    #[test]
    fn wrong_key_length_rejected(
        algorithm in algorithm_strategy(),
        len in 0usize..80,
    ) {
        prop_assume!(len != algorithm.key_len());
        let key = vec![0u8; len];
        let iv = vec![0u8; algorithm.iv_len()];
        let result = algorithm.new_cipher(&key, &iv);
        let rejected =
            matches!(result, Err(EstreamError::InvalidKeyLength { actual, .. }) if actual == len);
        prop_assert!(rejected, "length {} accepted by {}", len, algorithm);
    }

    #[test]
    fn wrong_iv_length_rejected(
        algorithm in algorithm_strategy(),
        len in 0usize..80,
    ) {
        prop_assume!(!algorithm.accepts_iv_len(len));
        let key = vec![0u8; algorithm.key_len()];
        let iv = vec![0u8; len];
        let result = algorithm.new_cipher(&key, &iv);
        let rejected =
            matches!(result, Err(EstreamError::InvalidIvLength { actual, .. }) if actual == len);
        prop_assert!(rejected, "length {} accepted by {}", len, algorithm);
    }
}

#[test]
fn partial_blocks_carry_over_between_calls() {
    // Odd lengths straddle the 4-byte and 16-byte refill boundaries
    for algorithm in Algorithm::ALL {
        let key = vec![0x11; algorithm.key_len()];
        let iv = vec![0x22; algorithm.iv_len()];
        let expected = one_shot(algorithm, &key, &iv, &[0u8; 100]);

        let mut cipher = algorithm.new_cipher(&key, &iv).unwrap();
        let mut got = Vec::new();
        for len in [1usize, 3, 5, 7, 15, 17, 52] {
            let mut chunk = vec![0u8; len];
            cipher.apply_keystream(&mut chunk);
            got.extend_from_slice(&chunk);
        }
        assert_eq!(got.len(), 100);
        assert_eq!(got, expected, "{}", algorithm);
    }
}

#[test]
#[should_panic(expected = "equal length")]
fn xor_keystream_panics_on_length_mismatch() {
    let mut cipher = Algorithm::Hc128.new_cipher(&[0u8; 16], &[0u8; 16]).unwrap();
    let mut dst = [0u8; 3];
    cipher.xor_keystream(&mut dst, &[0u8; 4]);
}

#[test]
fn distinct_instances_are_independent() {
    let mut a = Algorithm::Hc256.new_cipher(&[5u8; 32], &[6u8; 32]).unwrap();
    let mut b = Algorithm::Hc256.new_cipher(&[5u8; 32], &[6u8; 32]).unwrap();

    let mut ahead = [0u8; 1000];
    a.apply_keystream(&mut ahead);

    let mut first = [0u8; 16];
    b.apply_keystream(&mut first);
    assert_eq!(first, ahead[..16]);
}

#[test]
fn instances_move_across_threads() {
    let mut cipher = Algorithm::Rabbit.new_cipher(&[9u8; 16], &[]).unwrap();
    let handle = std::thread::spawn(move || {
        let mut buf = [0u8; 32];
        cipher.apply_keystream(&mut buf);
        buf
    });
    let from_thread = handle.join().unwrap();
    assert_eq!(
        from_thread.to_vec(),
        one_shot(Algorithm::Rabbit, &[9u8; 16], &[], &[0u8; 32])
    );
}
