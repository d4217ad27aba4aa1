//! OpenCL kernel source for the work search
//!
//! The program text is generated from the work schedule in [`crate::blake2b`]
//! rather than written by hand: each G step is emitted with its message operand
//! only when the operand is not statically zero, and the precomputed initial
//! state is baked in as literals. The device therefore evaluates exactly the
//! function that [`crate::work_value`] evaluates on the host.
//!
//! Entry points:
//!
//! ```text
//! nano_work(attempt, result, root, difficulty)   one lane per candidate, winner -> result
//! work_values(nonces, values, root)              one lane per nonce, value -> values[i]
//! ```

#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::blake2b::{H0, INITIAL_STATE, MIX_LANES, MessageWord, ROTATIONS, SIGMA, WORK_MESSAGE};

/// Search kernel entry point
pub const WORK_KERNEL: &str = "nano_work";

/// Value readback kernel entry point
pub const VALUES_KERNEL: &str = "work_values";

const PRELUDE: &str = r#"#ifdef cl_khr_int64_base_atomics
#pragma OPENCL EXTENSION cl_khr_int64_base_atomics : enable
#endif

#define ROTR64(x, n) rotate((x), (ulong)(64 - (n)))
"#;

const ENTRY_POINTS: &str = r#"
__kernel void nano_work(__constant ulong *attempt,
                        __global ulong *result,
                        __constant ulong *root,
                        __constant ulong *difficulty)
{
    const ulong candidate = *attempt + get_global_id(0);
    if (candidate != 0 && work_value(candidate, root) >= *difficulty) {
#ifdef cl_khr_int64_base_atomics
        atom_xchg(result, candidate);
#else
        *result = candidate;
#endif
    }
}

__kernel void work_values(__global const ulong *nonces,
                          __global ulong *values,
                          __constant ulong *root)
{
    const size_t lane = get_global_id(0);
    values[lane] = work_value(nonces[lane], root);
}
"#;

fn operand(word: MessageWord) -> Option<String> {
    match word {
        MessageWord::Nonce => Some(String::from("nonce")),
        MessageWord::Root(i) => Some(format!("root[{i}]")),
        MessageWord::Zero => None,
    }
}

fn add_step(out: &mut String, a: usize, b: usize, word: MessageWord) {
    match operand(word) {
        Some(term) => out.push_str(&format!("    v{a} += v{b} + {term};\n")),
        None => out.push_str(&format!("    v{a} += v{b};\n")),
    }
}

fn mix_step(out: &mut String, target: usize, x: usize, rotation: u32) {
    out.push_str(&format!("    v{target} = ROTR64(v{target} ^ v{x}, {rotation});\n"));
}

fn emit_work_value(out: &mut String) {
    out.push_str("\nstatic inline ulong work_value(const ulong nonce, __constant ulong *root)\n{\n");
    for (i, word) in INITIAL_STATE.iter().enumerate() {
        out.push_str(&format!("    ulong v{i} = 0x{word:016x}UL;\n"));
    }

    for (round, sigma) in SIGMA.iter().enumerate() {
        out.push_str(&format!("    /* round {round} */\n"));
        for (&[a, b, c, d], pair) in MIX_LANES.iter().zip(sigma.chunks_exact(2)) {
            add_step(out, a, b, WORK_MESSAGE[pair[0]]);
            mix_step(out, d, a, ROTATIONS[0]);
            out.push_str(&format!("    v{c} += v{d};\n"));
            mix_step(out, b, c, ROTATIONS[1]);
            add_step(out, a, b, WORK_MESSAGE[pair[1]]);
            mix_step(out, d, a, ROTATIONS[2]);
            out.push_str(&format!("    v{c} += v{d};\n"));
            mix_step(out, b, c, ROTATIONS[3]);
        }
    }

    out.push_str(&format!("    return 0x{H0:016x}UL ^ v0 ^ v8;\n}}\n"));
}

/// Full OpenCL C program for the work kernels
pub fn opencl_source() -> String {
    let mut out = String::with_capacity(48 * 1024);
    out.push_str(PRELUDE);
    emit_work_value(&mut out);
    out.push_str(ENTRY_POINTS);
    out
}
