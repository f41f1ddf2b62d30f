//! Turn rotation: who may raise a hand next.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::member::CrowdMember;

/// Persona indices that already asked a question this round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalkedAgents {
    talked: BTreeSet<usize>,
    persona_count: usize,
}

impl TalkedAgents {
    /// An empty rotation over `persona_count` personas.
    pub fn new(persona_count: usize) -> Self {
        Self {
            talked: BTreeSet::new(),
            persona_count,
        }
    }

    /// A rotation with the given personas already marked as talked.
    pub fn from_indices(persona_count: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            talked: indices.into_iter().collect(),
            persona_count,
        }
    }

    /// Mark a persona as having talked.
    ///
    /// Returns `true` when this completes the round; the set is then cleared
    /// so the next round starts fresh.
    pub fn record(&mut self, persona_index: usize) -> bool {
        self.talked.insert(persona_index);
        if self.is_exhausted() {
            self.talked.clear();
            return true;
        }
        false
    }

    /// Whether the persona already talked this round.
    pub fn contains(&self, persona_index: usize) -> bool {
        self.talked.contains(&persona_index)
    }

    /// Whether every persona has talked.
    pub fn is_exhausted(&self) -> bool {
        self.persona_count > 0 && self.talked.len() >= self.persona_count
    }

    /// Start a new round.
    pub fn reset(&mut self) {
        self.talked.clear();
    }

    /// Number of personas that talked this round.
    pub fn len(&self) -> usize {
        self.talked.len()
    }

    /// Whether nobody has talked this round.
    pub fn is_empty(&self) -> bool {
        self.talked.is_empty()
    }

    /// Size of the persona roster this rotation covers.
    pub fn persona_count(&self) -> usize {
        self.persona_count
    }

    /// Talked persona indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.talked.iter().copied()
    }
}

/// Lower every hand, then raise up to `count` hands among eligible members.
///
/// A member is eligible when they are not talking and their persona has not
/// talked this round. The pool is shuffled so turns spread across the room.
/// When nobody is eligible the returned roster has no raised hands, which
/// tells the caller the round is exhausted.
pub fn raise_hands(
    members: &[CrowdMember],
    talked: &TalkedAgents,
    count: usize,
    rng: &mut StdRng,
) -> Vec<CrowdMember> {
    let mut next: Vec<CrowdMember> = members
        .iter()
        .map(|m| CrowdMember {
            has_question: false,
            ..m.clone()
        })
        .collect();

    let mut pool: Vec<usize> = next
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.is_talking && !talked.contains(m.persona_index))
        .map(|(i, _)| i)
        .collect();

    if pool.is_empty() {
        return next;
    }

    pool.shuffle(rng);
    for &i in pool.iter().take(count) {
        next[i].has_question = true;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crowd::member::MemberId;
    use proptest::prelude::*;
    use rand::SeedableRng;

    /// `per_persona` members for each of `personas` personas.
    fn roster(personas: usize, per_persona: usize, rng: &mut StdRng) -> Vec<CrowdMember> {
        (0..personas * per_persona)
            .map(|i| CrowdMember::new(MemberId::from_rng(rng), i % personas, i as u32 + 1))
            .collect()
    }

    fn raised(members: &[CrowdMember]) -> Vec<&CrowdMember> {
        members.iter().filter(|m| m.has_question).collect()
    }

    #[test]
    fn raises_at_most_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let members = roster(8, 4, &mut rng);
        let next = raise_hands(&members, &TalkedAgents::new(8), 5, &mut rng);
        assert_eq!(raised(&next).len(), 5);
        assert_eq!(next.len(), members.len());
    }

    #[test]
    fn small_pool_raises_everyone_eligible() {
        let mut rng = StdRng::seed_from_u64(2);
        let members = roster(2, 1, &mut rng);
        let next = raise_hands(&members, &TalkedAgents::new(2), 5, &mut rng);
        assert_eq!(raised(&next).len(), 2);
    }

    #[test]
    fn clears_previous_hands() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut members = roster(4, 2, &mut rng);
        for m in &mut members {
            m.has_question = true;
        }
        let next = raise_hands(&members, &TalkedAgents::new(4), 1, &mut rng);
        assert_eq!(raised(&next).len(), 1);
    }

    #[test]
    fn talking_member_never_raises() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut members = roster(1, 3, &mut rng);
        members[0].is_talking = true;
        for _ in 0..50 {
            let next = raise_hands(&members, &TalkedAgents::new(1), 5, &mut rng);
            assert!(!next[0].has_question);
            assert_eq!(raised(&next).len(), 2);
        }
    }

    #[test]
    fn exhausted_round_raises_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let members = roster(8, 3, &mut rng);
        let talked = TalkedAgents::from_indices(8, 0..8);
        let next = raise_hands(&members, &talked, 5, &mut rng);
        assert!(raised(&next).is_empty());
    }

    #[test]
    fn only_untalked_persona_selected() {
        let mut rng = StdRng::seed_from_u64(6);
        let members = roster(8, 3, &mut rng);
        let talked = TalkedAgents::from_indices(8, 0..7);
        for _ in 0..50 {
            let next = raise_hands(&members, &talked, 5, &mut rng);
            let hands = raised(&next);
            assert_eq!(hands.len(), 3);
            assert!(hands.iter().all(|m| m.persona_index == 7));
        }
    }

    #[test]
    fn last_persona_all_talking_raises_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut members = roster(8, 2, &mut rng);
        for m in members.iter_mut().filter(|m| m.persona_index == 7) {
            m.is_talking = true;
        }
        let talked = TalkedAgents::from_indices(8, 0..7);
        let next = raise_hands(&members, &talked, 5, &mut rng);
        assert!(raised(&next).is_empty());
    }

    #[test]
    fn same_seed_same_selection() {
        let members = roster(8, 4, &mut StdRng::seed_from_u64(0));
        let talked = TalkedAgents::from_indices(8, [1, 4]);
        let a = raise_hands(&members, &talked, 5, &mut StdRng::seed_from_u64(99));
        let b = raise_hands(&members, &talked, 5, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn record_resets_after_full_round() {
        let mut talked = TalkedAgents::new(3);
        assert!(!talked.record(0));
        assert!(!talked.record(0));
        assert!(!talked.record(2));
        assert_eq!(talked.iter().collect::<Vec<_>>(), vec![0, 2]);
        assert!(talked.record(1));
        assert!(talked.is_empty());
    }

    #[test]
    fn empty_roster_never_exhausted() {
        let talked = TalkedAgents::new(0);
        assert!(!talked.is_exhausted());
    }

    proptest! {
        #[test]
        fn selection_respects_rotation(
            seed in any::<u64>(),
            personas in 1usize..10,
            per_persona in 1usize..5,
            talked_mask in any::<u16>(),
            talking_mask in any::<u64>(),
            count in 0usize..8,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut members = roster(personas, per_persona, &mut rng);
            for (i, m) in members.iter_mut().enumerate() {
                m.is_talking = talking_mask & (1 << (i % 64)) != 0;
            }
            let talked = TalkedAgents::from_indices(
                personas,
                (0..personas).filter(|p| talked_mask & (1 << p) != 0),
            );

            let next = raise_hands(&members, &talked, count, &mut rng);
            let hands = raised(&next);

            prop_assert!(hands.len() <= count);
            for m in &hands {
                prop_assert!(!m.is_talking);
                prop_assert!(!talked.contains(m.persona_index));
            }
            if talked.is_exhausted() {
                prop_assert!(hands.is_empty());
            }
            for (before, after) in members.iter().zip(&next) {
                prop_assert_eq!(before.id, after.id);
                prop_assert_eq!(before.is_talking, after.is_talking);
            }
        }
    }
}
