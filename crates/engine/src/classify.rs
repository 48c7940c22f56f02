// SPDX-License-Identifier: MIT

//! Matching an observed jump against the baked route.

use expedition_core::RouteJump;

/// Outcome of matching one observed jump against the baked route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpMatch {
    /// Index into the baked route the jump landed on, if it landed on the
    /// route at all.
    pub baked_index: Option<usize>,
    /// The jump matched the position immediately expected next (or the
    /// bootstrap special case below).
    pub expected: bool,
    /// `current_baked_index` to persist on the expedition after this jump.
    pub new_current_baked_index: i64,
}

/// `current_baked_index` is the expedition's value from before this jump;
/// `-1` means no jump has been confirmed on the route yet. `system_id` is
/// the arrived system's address from the `FSDJump` event.
///
/// The immediately expected position is checked first. A single bootstrap
/// special case lets the very first jump land on index 1 when the
/// expedition started without a confirmed current position (index 0 is the
/// system the commander was already sitting in, not a jump target, so
/// there was no way to know in advance whether they were really there).
/// Anything else is looked up by scanning forward from two past the
/// current index — the position already ruled out, plus one — to the end
/// of the route.
pub fn classify_jump(current_baked_index: i64, baked_jumps: &[RouteJump], system_id: i64) -> JumpMatch {
    if baked_jumps.is_empty() {
        return JumpMatch {
            baked_index: None,
            expected: false,
            new_current_baked_index: current_baked_index,
        };
    }

    let expected_index = current_baked_index + 1;
    let mut is_expected = expected_index >= 0
        && (expected_index as usize) < baked_jumps.len()
        && baked_jumps[expected_index as usize].system_id == system_id;
    let mut next_index = current_baked_index;

    if !is_expected
        && current_baked_index == -1
        && baked_jumps.len() > 1
        && baked_jumps[1].system_id == system_id
    {
        next_index = current_baked_index + 1;
        is_expected = true;
    }

    if is_expected {
        next_index += 1;
        return JumpMatch {
            baked_index: Some(next_index as usize),
            expected: true,
            new_current_baked_index: next_index,
        };
    }

    let mut baked_index = None;
    let scan_start = current_baked_index + 2;
    if scan_start >= 0 {
        for (i, jump) in baked_jumps.iter().enumerate().skip(scan_start as usize) {
            if jump.system_id == system_id {
                baked_index = Some(i);
                next_index = i as i64;
                break;
            }
        }
    }

    JumpMatch {
        baked_index,
        expected: false,
        new_current_baked_index: next_index,
    }
}

/// Whether `current_baked_index` has reached the end of the baked route —
/// no further jumps expected unless the route loops back.
pub fn reached_route_end(current_baked_index: i64, baked_jumps: &[RouteJump]) -> bool {
    !baked_jumps.is_empty() && current_baked_index >= baked_jumps.len() as i64 - 1
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
