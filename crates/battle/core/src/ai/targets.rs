//! Layer 3: which targets.

use crate::battle::ActionType;
use crate::env::BattleRng;
use crate::skill::{ActionScope, TargetCount};
use crate::state::PersonIndex;

use super::AiDifficulty;
use super::context::AiContext;

/// Pick targets among `candidates` (canonical order) for `scope`.
///
/// - USER: the user
/// - ONE_*: uniform; ONE_ENEMY on Priority takes the lowest VITA
/// - TWO_*: two distinct, uniform
/// - ALL_*: every candidate
/// - ONE_PARTY: a coin picks the enemy or the allied side
pub fn select_targets(
    ctx: &AiContext<'_>,
    scope: ActionScope,
    candidates: &[PersonIndex],
    difficulty: AiDifficulty,
    rng: &mut dyn BattleRng,
) -> Vec<PersonIndex> {
    if candidates.is_empty() {
        return Vec::new();
    }
    match scope.count() {
        TargetCount::None => Vec::new(),
        TargetCount::One if scope == ActionScope::User => vec![ctx.user],
        TargetCount::One => {
            if difficulty == AiDifficulty::Priority && scope == ActionScope::OneEnemy {
                weakest(ctx, candidates).into_iter().collect()
            } else {
                vec![candidates[rng.index(candidates.len())]]
            }
        }
        TargetCount::Two => {
            let mut pool = candidates.to_vec();
            let first = pool.remove(rng.index(pool.len()));
            let mut picked = vec![first];
            if !pool.is_empty() {
                picked.push(pool.remove(rng.index(pool.len())));
            }
            picked
        }
        TargetCount::All => candidates.to_vec(),
        TargetCount::Party => {
            let enemies_side = rng.coin_flip();
            let (enemies, allies): (Vec<PersonIndex>, Vec<PersonIndex>) = candidates
                .iter()
                .partition(|idx| !idx.same_side(ctx.user));
            match (enemies_side, enemies.is_empty(), allies.is_empty()) {
                (true, false, _) | (false, _, true) => enemies,
                _ => allies,
            }
        }
    }
}

/// Candidate with the lowest VITA; the first in canonical order on ties.
fn weakest(ctx: &AiContext<'_>, candidates: &[PersonIndex]) -> Option<PersonIndex> {
    candidates
        .iter()
        .copied()
        .filter_map(|idx| ctx.roster.get(idx).map(|p| (idx, p)))
        .min_by_key(|(_, p)| p.vita())
        .map(|(idx, _)| idx)
}

/// Ward for a GUARD plan: a living ally nobody guards yet.
pub fn select_ward(ctx: &AiContext<'_>, rng: &mut dyn BattleRng) -> Vec<PersonIndex> {
    let wards = ctx.roster.guard_candidates(ctx.user);
    if wards.is_empty() {
        return Vec::new();
    }
    vec![wards[rng.index(wards.len())]]
}

/// Targets of the non-skill action types.
pub fn stance_targets(ctx: &AiContext<'_>, kind: ActionType, rng: &mut dyn BattleRng) -> Vec<PersonIndex> {
    match kind {
        ActionType::Guard => select_ward(ctx, rng),
        ActionType::Implode => ctx.roster.living_opponents(ctx.user),
        _ => vec![ctx.user],
    }
}
