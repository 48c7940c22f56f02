use super::*;
use expedition_tailer::JumpType;

#[test]
fn fsd_charging_flag_moves_normal_to_charging() {
    let mut fsm = JumpStateMachine::new();
    assert_eq!(fsm.handle_fsd_charging(true), None);
    assert_eq!(fsm.state(), ChargeState::Charging);
}

#[test]
fn charging_flag_dropping_schedules_a_timeout() {
    let mut fsm = JumpStateMachine::new();
    fsm.handle_fsd_charging(true);
    let token = fsm.handle_fsd_charging(false);
    assert!(token.is_some());
    // state stays Charging until the timeout actually fires or a jump starts
    assert_eq!(fsm.state(), ChargeState::Charging);
}

#[test]
fn charging_timeout_returns_to_normal() {
    let mut fsm = JumpStateMachine::new();
    fsm.handle_fsd_charging(true);
    let token = fsm.handle_fsd_charging(false).unwrap();
    fsm.handle_charging_timeout(token);
    assert_eq!(fsm.state(), ChargeState::Normal);
}

#[test]
fn stale_timeout_token_is_ignored() {
    let mut fsm = JumpStateMachine::new();
    fsm.handle_fsd_charging(true);
    let stale_token = fsm.handle_fsd_charging(false).unwrap();
    // a hyperspace StartJump arrives before the timeout fires
    fsm.handle_start_jump(JumpType::Hyperspace);
    assert_eq!(fsm.state(), ChargeState::Committed);

    fsm.handle_charging_timeout(stale_token);
    assert_eq!(fsm.state(), ChargeState::Committed);
}

#[test]
fn hyperspace_start_jump_commits_even_from_normal() {
    let mut fsm = JumpStateMachine::new();
    fsm.handle_start_jump(JumpType::Hyperspace);
    assert_eq!(fsm.state(), ChargeState::Committed);
}

#[test]
fn supercruise_start_jump_cancels_a_charge() {
    let mut fsm = JumpStateMachine::new();
    fsm.handle_fsd_charging(true);
    fsm.handle_start_jump(JumpType::Supercruise);
    assert_eq!(fsm.state(), ChargeState::Normal);
}

#[test]
fn jump_completed_always_returns_to_normal() {
    let mut fsm = JumpStateMachine::new();
    fsm.handle_start_jump(JumpType::Hyperspace);
    fsm.handle_jump_completed();
    assert_eq!(fsm.state(), ChargeState::Normal);
}
