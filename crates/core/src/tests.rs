//! Tests for the work algorithm core

#[cfg(not(feature = "std"))]
use alloc::{format, vec::Vec};

use blake2::digest::consts::U8;
use blake2::{Blake2b, Digest};

use crate::blake2b::{H0, INITIAL_STATE, MessageWord, WORK_MESSAGE};
use crate::kernel::{VALUES_KERNEL, WORK_KERNEL, opencl_source};
use crate::vectors::{GENESIS_ACCOUNT, GENESIS_BLOCK, REFERENCE_VECTORS};
use crate::{
    BASE_DIFFICULTY, RECEIVE_DIFFICULTY, ROUNDS, SEND_DIFFICULTY, XorShift1024Star,
    from_multiplier, meets_difficulty, root_words, to_multiplier, value_meets_difficulty,
    work_digest, work_value, work_value_words,
};

/// Generic BLAKE2b-64 over `nonce || root`
fn generic_value(nonce: u64, root: &[u8; 32]) -> u64 {
    let mut hasher = Blake2b::<U8>::new();
    hasher.update(nonce.to_le_bytes());
    hasher.update(root);
    let out = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&out);
    u64::from_le_bytes(bytes)
}

fn seed_sequence() -> [u64; 16] {
    let mut state = [0u64; 16];
    for (i, word) in state.iter_mut().enumerate() {
        *word = 0x9E37_79B9_7F4A_7C15u64.wrapping_mul(i as u64 + 1);
    }
    state
}

#[test]
fn test_reference_vectors_specialized() {
    for vector in REFERENCE_VECTORS {
        assert_eq!(
            work_value(vector.nonce, &vector.root),
            vector.value,
            "specialized value mismatch for nonce {:#018x}",
            vector.nonce
        );
    }
}

#[test]
fn test_reference_vectors_generic() {
    for vector in REFERENCE_VECTORS {
        assert_eq!(generic_value(vector.nonce, &vector.root), vector.value);
    }
}

#[test]
fn test_specialized_matches_generic_on_sweep() {
    let mut rng = XorShift1024Star::from_state(seed_sequence());

    for _ in 0..512 {
        let nonce = rng.next_u64();
        let mut root = [0u8; 32];
        for chunk in root.chunks_exact_mut(8) {
            chunk.copy_from_slice(&rng.next_u64().to_le_bytes());
        }

        assert_eq!(work_value(nonce, &root), generic_value(nonce, &root));
        assert_eq!(
            work_digest(nonce, &root),
            generic_value(nonce, &root).to_le_bytes()
        );
    }
}

#[test]
fn test_word_split_path() {
    let vector = REFERENCE_VECTORS[4];
    let words = root_words(&vector.root);

    assert_eq!(words[0], 0x0706_0504_0302_0100);
    assert_eq!(work_value_words(vector.nonce, &words), vector.value);
}

#[test]
fn test_precomputed_initial_state() {
    assert_eq!(H0, 0x6a09_e667_f2bd_c900);
    assert_eq!(INITIAL_STATE[0], H0);
    assert_eq!(INITIAL_STATE[12], 0x510e_527f_ade6_82f9);
    assert_eq!(INITIAL_STATE[13], 0x9b05_688c_2b3e_6c1f);
    assert_eq!(INITIAL_STATE[14], 0xe07c_2654_04be_4294);
}

#[test]
fn test_work_message_layout() {
    assert_eq!(WORK_MESSAGE[0], MessageWord::Nonce);
    for i in 0..4 {
        assert_eq!(WORK_MESSAGE[1 + i], MessageWord::Root(i));
    }
    assert!(WORK_MESSAGE[5..].iter().all(|word| word.is_zero()));
}

#[test]
fn test_kernel_source_elides_zero_words() {
    let source = opencl_source();

    // Each non-zero message word is consumed exactly once per round
    assert_eq!(source.matches("+ nonce;").count(), ROUNDS);
    assert_eq!(source.matches("+ root[").count(), ROUNDS * 4);
    assert!(!source.contains("+ 0;"));

    assert!(source.contains(&format!("__kernel void {WORK_KERNEL}(")));
    assert!(source.contains(&format!("__kernel void {VALUES_KERNEL}(")));
    assert!(source.contains("0x6a09e667f2bdc900UL ^ v0 ^ v8"));
    assert!(source.contains("ulong v12 = 0x510e527fade682f9UL;"));
}

/// Register index of a `vN` operand
fn register(token: &str) -> usize {
    token.trim().strip_prefix('v').unwrap().parse().unwrap()
}

/// Value of an emitted operand: a register, the nonce, or a root word
fn operand_value(token: &str, v: &[u64; 16], nonce: u64, root: &[u64; 4]) -> u64 {
    match token.trim() {
        "nonce" => nonce,
        t if t.starts_with("root[") => root[t[5..t.len() - 1].parse::<usize>().unwrap()],
        t if t.starts_with("0x") => {
            u64::from_str_radix(t.trim_start_matches("0x").trim_end_matches("UL"), 16).unwrap()
        }
        t => v[register(t)],
    }
}

/// Execute the generated OpenCL `work_value` body on the host
///
/// Understands exactly the statement forms the generator writes:
/// `ulong vN = LIT`, `vA += vB [+ term]`, `vA = ROTR64(vA ^ vB, n)` and
/// `return LIT ^ vX ^ vY`.
fn run_emitted_work_value(source: &str, nonce: u64, root: &[u64; 4]) -> u64 {
    let start = source.find("static inline ulong work_value(").unwrap();
    let function = &source[start..];
    let body = &function[function.find('{').unwrap() + 1..function.find("\n}").unwrap()];

    let mut v = [0u64; 16];
    for line in body.lines() {
        let line = line.trim().trim_end_matches(';');
        if line.is_empty() || line.starts_with("/*") {
            continue;
        }

        if let Some(decl) = line.strip_prefix("ulong ") {
            let (lhs, rhs) = decl.split_once(" = ").unwrap();
            v[register(lhs)] = operand_value(rhs, &v, nonce, root);
        } else if let Some(expr) = line.strip_prefix("return ") {
            return expr
                .split(" ^ ")
                .fold(0, |acc, t| acc ^ operand_value(t, &v, nonce, root));
        } else if let Some((lhs, rhs)) = line.split_once(" += ") {
            let sum = rhs
                .split(" + ")
                .fold(0u64, |acc, t| acc.wrapping_add(operand_value(t, &v, nonce, root)));
            let target = register(lhs);
            v[target] = v[target].wrapping_add(sum);
        } else if let Some((lhs, rhs)) = line.split_once(" = ROTR64(") {
            let (xor, rotation) = rhs.trim_end_matches(')').split_once(", ").unwrap();
            let (x, y) = xor.split_once(" ^ ").unwrap();
            let mixed = operand_value(x, &v, nonce, root) ^ operand_value(y, &v, nonce, root);
            v[register(lhs)] = mixed.rotate_right(rotation.parse().unwrap());
        } else {
            panic!("unexpected kernel statement: {line}");
        }
    }

    panic!("work_value body has no return statement")
}

#[test]
fn test_emitted_kernel_matches_reference_vectors() {
    let source = opencl_source();

    for vector in REFERENCE_VECTORS {
        assert_eq!(
            run_emitted_work_value(&source, vector.nonce, &root_words(&vector.root)),
            vector.value,
            "nonce {:016x}",
            vector.nonce
        );
    }
}

#[test]
fn test_emitted_kernel_matches_generic_hash() {
    let source = opencl_source();
    let mut root = [0u8; 32];

    for i in 0..64u64 {
        let nonce = i.wrapping_mul(0xD1B5_4A32_D192_ED03) ^ (i << 59);
        root[(i % 32) as usize] = root[(i % 32) as usize].wrapping_add(nonce as u8 | 1);
        assert_eq!(
            run_emitted_work_value(&source, nonce, &root_words(&root)),
            generic_value(nonce, &root),
            "nonce {nonce:016x}"
        );
    }
}

#[test]
fn test_comparator_extremes() {
    let zero = [0x00u8; 8];
    let ones = [0xFFu8; 8];

    assert!(meets_difficulty(&zero, 0));
    assert!(!meets_difficulty(&zero, 1));

    for difficulty in [0, 1, BASE_DIFFICULTY, SEND_DIFFICULTY, u64::MAX] {
        assert!(meets_difficulty(&ones, difficulty));
    }
}

#[test]
fn test_comparator_is_little_endian() {
    // 0x01 in the last byte is the most significant one
    let mut digest = [0u8; 8];
    digest[7] = 0x01;

    assert!(meets_difficulty(&digest, 0x0100_0000_0000_0000));
    assert!(!meets_difficulty(&digest, 0x0100_0000_0000_0001));
    assert!(value_meets_difficulty(5, 5));
    assert!(!value_meets_difficulty(4, 5));
}

#[test]
fn test_genesis_work_is_valid() {
    let genesis = REFERENCE_VECTORS[REFERENCE_VECTORS.len() - 1];
    let digest = work_digest(genesis.nonce, &genesis.root);

    assert!(meets_difficulty(&digest, BASE_DIFFICULTY));
    assert!(!meets_difficulty(&digest, u64::MAX));
}

#[test]
fn test_genesis_roots_match_ledger_hex() {
    assert_eq!(
        hex::decode("E89208DD038FBB269987689621D52292AE9C35941A7484756ECCED92A65093BA").unwrap(),
        GENESIS_ACCOUNT
    );
    assert_eq!(
        hex::decode("991CF190094C00F0B68E2E5F75F6BEE95A2E0BD93CEAA4A6734DB9F19B728948").unwrap(),
        GENESIS_BLOCK
    );
}

#[test]
fn test_xorshift_reference_sequence() {
    let mut rng = XorShift1024Star::from_state(seed_sequence());
    let expected = [
        0x25d8_6741_e28f_d1c9,
        0x2b6b_7c57_bddc_bf20,
        0x2790_0a0b_f295_0d03,
        0xff2f_5c5e_3d61_8e01,
        0x3e25_45ed_510c_5d6b,
        0xb738_237d_a67a_7968,
        0x1c3e_39a7_fb49_d6e9,
        0x352a_5be6_1035_a600,
    ];

    for value in expected {
        assert_eq!(rng.next_u64(), value);
    }
}

#[test]
fn test_xorshift_is_deterministic_and_iterable() {
    let a: Vec<u64> = XorShift1024Star::from_state(seed_sequence())
        .take(64)
        .collect();
    let b: Vec<u64> = XorShift1024Star::from_state(seed_sequence())
        .take(64)
        .collect();

    assert_eq!(a, b);
    assert_ne!(a[0], a[1]);
}

#[test]
fn test_xorshift_zero_seed_does_not_degenerate() {
    let mut rng = XorShift1024Star::from_state([0; 16]);
    let outputs: Vec<u64> = (0..32).map(|_| rng.next_u64()).collect();

    assert!(outputs.iter().any(|&value| value != 0));
}

#[test]
fn test_multiplier_round_trip_network_thresholds() {
    assert_eq!(from_multiplier(BASE_DIFFICULTY, 1.0), Some(BASE_DIFFICULTY));
    assert_eq!(from_multiplier(BASE_DIFFICULTY, 8.0), Some(SEND_DIFFICULTY));
    assert_eq!(
        from_multiplier(BASE_DIFFICULTY, 0.125),
        Some(RECEIVE_DIFFICULTY)
    );

    assert_eq!(to_multiplier(BASE_DIFFICULTY, SEND_DIFFICULTY), 8.0);
    assert_eq!(to_multiplier(BASE_DIFFICULTY, RECEIVE_DIFFICULTY), 0.125);
}

#[test]
fn test_multiplier_rejects_and_saturates() {
    assert_eq!(from_multiplier(BASE_DIFFICULTY, 0.0), None);
    assert_eq!(from_multiplier(BASE_DIFFICULTY, -2.0), None);
    assert_eq!(from_multiplier(BASE_DIFFICULTY, f64::NAN), None);
    assert_eq!(from_multiplier(BASE_DIFFICULTY, f64::INFINITY), None);

    assert_eq!(from_multiplier(BASE_DIFFICULTY, 1e-30), Some(0));
    assert_eq!(from_multiplier(BASE_DIFFICULTY, 1e30), Some(u64::MAX));
}
