// SPDX-License-Identifier: MIT

//! Tracks whether the FSD is idle, charging, or committed to a jump.
//!
//! `Status.json`'s `FSDCharging` flag goes high the instant the commander
//! starts charging and drops either because the jump actually fires
//! (`StartJump` follows almost immediately) or because the charge was
//! cancelled. The two can't be told apart until either a `StartJump`
//! arrives or [`CHARGE_TIMEOUT`] elapses with nothing following it.

use std::time::Duration;

use expedition_tailer::JumpType;

pub const CHARGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    #[default]
    Normal,
    Charging,
    Committed,
}

/// Identifies one scheduled charging timeout. A timeout whose token no
/// longer matches the state machine's current generation fired too late —
/// the state already moved on — and should be ignored.
pub type ChargeToken = u64;

#[derive(Debug, Default)]
pub struct JumpStateMachine {
    state: ChargeState,
    generation: ChargeToken,
}

impl JumpStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChargeState {
        self.state
    }

    /// `StartJump`. A hyperspace jump commits immediately, pre-empting
    /// whatever the flag-based state was. A supercruise drop just ends
    /// whatever charge was in progress; it's not a route-relevant jump.
    pub fn handle_start_jump(&mut self, jump_type: JumpType) {
        match jump_type {
            JumpType::Hyperspace => self.set_state(ChargeState::Committed),
            JumpType::Supercruise => {
                if self.state == ChargeState::Charging {
                    self.set_state(ChargeState::Normal);
                }
            }
        }
    }

    /// `FSDJump`: the jump completed, return to normal.
    pub fn handle_jump_completed(&mut self) {
        self.set_state(ChargeState::Normal);
    }

    /// A `Status.json` read reporting the FSD charging flag. Returns a
    /// token to schedule a [`CHARGE_TIMEOUT`] wakeup when charging just
    /// stopped with nothing else (yet) explaining why.
    pub fn handle_fsd_charging(&mut self, charging: bool) -> Option<ChargeToken> {
        if charging && self.state == ChargeState::Normal {
            self.set_state(ChargeState::Charging);
            None
        } else if !charging && self.state == ChargeState::Charging {
            Some(self.bump_generation())
        } else {
            None
        }
    }

    /// Apply a previously scheduled timeout. A no-op if the state already
    /// moved on, whether to a fresh charge, a committed jump, or a later
    /// timeout that already fired.
    pub fn handle_charging_timeout(&mut self, token: ChargeToken) {
        if token == self.generation && self.state == ChargeState::Charging {
            self.state = ChargeState::Normal;
        }
    }

    fn set_state(&mut self, state: ChargeState) {
        self.state = state;
        self.generation = self.generation.wrapping_add(1);
    }

    fn bump_generation(&mut self) -> ChargeToken {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

#[cfg(test)]
#[path = "jump_tests.rs"]
mod tests;
