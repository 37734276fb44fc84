//! Test utilities.

use pprf_core::Block;

/// Asserts the correctness of correlated oblivious transfer.
pub fn assert_cot(delta: Block, choices: &[bool], msgs: &[Block], received: &[Block]) {
    assert!(choices
        .iter()
        .zip(msgs.iter().zip(received))
        .all(|(&choice, (&msg, &received))| {
            if choice {
                received == msg ^ delta
            } else {
                received == msg
            }
        }));
}

/// Asserts the single-point correlation: `w` agrees with `v` everywhere
/// except `alpha`, where it is offset by `delta`.
pub fn assert_single_point(delta: Block, vs: &[Block], ws: &[Block], alpha: u32) {
    assert_eq!(vs.len(), ws.len());
    for (i, (&v, &w)) in vs.iter().zip(ws).enumerate() {
        if i == alpha as usize {
            assert_eq!(w, v ^ delta, "the punctured index is not offset by delta");
        } else {
            assert_eq!(w, v, "leaf {i} differs");
        }
    }
}
