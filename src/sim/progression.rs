//! Experience, leveling and level-up choices

use rand::seq::IndexedRandom;
use thiserror::Error;

use super::state::{
    GamePhase, GameState, LevelUpChoice, LevelUpOption, Weapon, WeaponKind,
    experience_threshold,
};
use crate::consts::LEVEL_UP_OPTION_COUNT;

/// Why a level-up choice could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("no level-up is pending")]
    NotLevelingUp,
    #[error("option {index} out of range ({available} offered)")]
    OutOfRange { index: usize, available: usize },
}

/// Level up once if the threshold is met. Returns true on level-up, leaving the
/// state in LevelingUp with fresh options. Surplus experience carries over but
/// never triggers a second level in the same step.
pub fn check_level_up(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if player.experience < player.experience_to_next_level {
        return false;
    }
    player.experience -= player.experience_to_next_level;
    player.level += 1;
    player.experience_to_next_level = experience_threshold(player.level);
    let level = player.level;

    state.level_up_options = generate_options(state);
    state.phase = GamePhase::LevelingUp;
    log::info!(
        "Level up! Now level {} ({} options)",
        level,
        state.level_up_options.len()
    );
    true
}

/// Build exactly three options: upgrades for owned weapons below max level,
/// then random unowned weapons, then health boosts as padding.
pub fn generate_options(state: &mut GameState) -> Vec<LevelUpOption> {
    let mut choices: Vec<LevelUpChoice> = state
        .weapons
        .iter()
        .filter(|w| w.can_upgrade())
        .map(|w| LevelUpChoice::Upgrade(w.kind))
        .take(LEVEL_UP_OPTION_COUNT)
        .collect();

    let unowned: Vec<WeaponKind> = WeaponKind::ALL
        .into_iter()
        .filter(|kind| !state.owns(*kind))
        .collect();
    let wanted = LEVEL_UP_OPTION_COUNT - choices.len();
    choices.extend(
        unowned
            .choose_multiple(&mut state.rng, wanted)
            .map(|kind| LevelUpChoice::NewWeapon(*kind)),
    );

    choices.resize(LEVEL_UP_OPTION_COUNT, LevelUpChoice::HealthBoost);
    choices.into_iter().map(LevelUpOption::new).collect()
}

/// Apply one choice to the state
pub fn apply_choice(state: &mut GameState, choice: LevelUpChoice) {
    match choice {
        LevelUpChoice::Upgrade(kind) => {
            if let Some(weapon) = state.weapons.iter_mut().find(|w| w.kind == kind) {
                weapon.upgrade();
                log::info!("{} upgraded to level {}", kind.name(), weapon.level);
            }
        }
        LevelUpChoice::NewWeapon(kind) => {
            if !state.owns(kind) {
                state.weapons.push(Weapon::new(kind));
                log::info!("Unlocked {}", kind.name());
            }
        }
        LevelUpChoice::HealthBoost => {
            let player = &mut state.player;
            let added = player.max_health * (state.tuning.health_boost_factor - 1.0);
            player.max_health += added;
            player.health += added;
            log::info!("Max health raised to {:.0}", player.max_health);
        }
    }
}

/// Resolve the pending level-up with the option at `index` and resume play
pub fn choose(state: &mut GameState, index: usize) -> Result<LevelUpChoice, ChoiceError> {
    if state.phase != GamePhase::LevelingUp {
        return Err(ChoiceError::NotLevelingUp);
    }
    let choice = state
        .level_up_options
        .get(index)
        .map(|opt| opt.choice)
        .ok_or(ChoiceError::OutOfRange {
            index,
            available: state.level_up_options.len(),
        })?;
    apply_choice(state, choice);
    state.level_up_options.clear();
    state.phase = GamePhase::Running;
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bounds;
    use crate::tuning::Tuning;

    fn running() -> GameState {
        let mut state = GameState::new(9, Bounds::new(800.0, 600.0), Tuning::default());
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_level_up_carries_surplus() {
        let mut state = running();
        state.player.experience = 105;
        assert!(check_level_up(&mut state));
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.experience, 5);
        assert_eq!(state.player.experience_to_next_level, 120);
        assert_eq!(state.level_up_options.len(), 3);
        assert_eq!(state.phase, GamePhase::LevelingUp);
    }

    #[test]
    fn test_one_level_per_check() {
        let mut state = running();
        state.player.experience = 500;
        assert!(check_level_up(&mut state));
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.experience, 400);
    }

    #[test]
    fn test_below_threshold_is_noop() {
        let mut state = running();
        state.player.experience = 99;
        assert!(!check_level_up(&mut state));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_options_upgrade_then_new() {
        let mut state = running();
        let options = generate_options(&mut state);
        assert_eq!(options[0].choice, LevelUpChoice::Upgrade(WeaponKind::Basic));
        for opt in &options[1..] {
            assert!(matches!(opt.choice, LevelUpChoice::NewWeapon(kind) if kind != WeaponKind::Basic));
        }
        assert_ne!(options[1].choice, options[2].choice);
    }

    #[test]
    fn test_options_padded_with_health() {
        let mut state = running();
        state.weapons = WeaponKind::ALL.into_iter().map(Weapon::new).collect();
        for weapon in &mut state.weapons {
            while weapon.upgrade() {}
        }
        let options = generate_options(&mut state);
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.choice == LevelUpChoice::HealthBoost));
    }

    #[test]
    fn test_options_capped_at_three_upgrades() {
        let mut state = running();
        state.weapons = WeaponKind::ALL.into_iter().map(Weapon::new).collect();
        let options = generate_options(&mut state);
        assert_eq!(options.len(), 3);
        assert_eq!(options[2].choice, LevelUpChoice::Upgrade(WeaponKind::Piercing));
    }

    #[test]
    fn test_choose_resumes_play() {
        let mut state = running();
        state.player.experience = 100;
        check_level_up(&mut state);
        let choice = choose(&mut state, 0).unwrap();
        assert_eq!(choice, LevelUpChoice::Upgrade(WeaponKind::Basic));
        assert_eq!(state.weapons[0].level, 2);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.level_up_options.is_empty());
    }

    #[test]
    fn test_choose_errors() {
        let mut state = running();
        assert_eq!(choose(&mut state, 0), Err(ChoiceError::NotLevelingUp));
        state.player.experience = 100;
        check_level_up(&mut state);
        assert_eq!(
            choose(&mut state, 3),
            Err(ChoiceError::OutOfRange { index: 3, available: 3 })
        );
        assert_eq!(state.phase, GamePhase::LevelingUp);
    }

    #[test]
    fn test_health_boost() {
        let mut state = running();
        state.player.health = 50.0;
        apply_choice(&mut state, LevelUpChoice::HealthBoost);
        assert!((state.player.max_health - 120.0).abs() < 1e-4);
        assert!((state.player.health - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_new_weapon_appended_once() {
        let mut state = running();
        apply_choice(&mut state, LevelUpChoice::NewWeapon(WeaponKind::Homing));
        apply_choice(&mut state, LevelUpChoice::NewWeapon(WeaponKind::Homing));
        assert_eq!(state.weapons.len(), 2);
        assert_eq!(state.weapons[1].fire_rate, 1200.0);
    }
}
