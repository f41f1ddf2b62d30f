//! The press-room crowd.
//!
//! [`Crowd`] is a value: every transition (raising hands, calling on a member,
//! sending them back to their seat) returns a new roster instead of mutating
//! the old one, so a renderer holding the previous roster never sees a
//! half-applied update.

pub mod member;
pub mod scheduler;

pub use member::{CrowdMember, MemberId};
pub use scheduler::{TalkedAgents, raise_hands};

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::{CrowdConfig, MAX_CROWD_SIZE};
use crate::error::{CoreError, CoreResult};

/// All crowd members, in seating order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crowd {
    members: Vec<CrowdMember>,
}

impl Crowd {
    /// Seat a fresh crowd and raise the first hands.
    ///
    /// Avatar seeds `1..=size` are dealt out in random order and each member
    /// gets a random persona. Sizes above [`MAX_CROWD_SIZE`] are capped.
    pub fn generate(persona_count: usize, config: &CrowdConfig, rng: &mut StdRng) -> Self {
        if persona_count == 0 {
            return Self::default();
        }

        let size = u32::try_from(config.size.min(MAX_CROWD_SIZE)).unwrap_or(u32::MAX);
        let mut seeds: Vec<u32> = (1..=size).collect();
        seeds.shuffle(rng);

        let members = seeds
            .into_iter()
            .map(|seed| {
                let persona_index = rng.random_range(0..persona_count);
                CrowdMember::new(MemberId::from_rng(rng), persona_index, seed)
            })
            .collect::<Vec<_>>();

        Self::from_members(members).with_hands_raised(
            &TalkedAgents::new(persona_count),
            config.hands,
            rng,
        )
    }

    /// Wrap an existing roster.
    pub fn from_members(members: Vec<CrowdMember>) -> Self {
        Self { members }
    }

    /// All members in seating order.
    pub fn members(&self) -> &[CrowdMember] {
        &self.members
    }

    /// Look up a member.
    pub fn get(&self, id: MemberId) -> Option<&CrowdMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the room is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members with a raised hand.
    pub fn raised(&self) -> impl Iterator<Item = &CrowdMember> {
        self.members.iter().filter(|m| m.has_question)
    }

    /// The member at the microphone, if any.
    pub fn talking(&self) -> Option<&CrowdMember> {
        self.members.iter().find(|m| m.is_talking)
    }

    /// A new roster with hands re-raised for the current rotation.
    pub fn with_hands_raised(&self, talked: &TalkedAgents, count: usize, rng: &mut StdRng) -> Self {
        Self {
            members: raise_hands(&self.members, talked, count, rng),
        }
    }

    /// Call on a member with a raised hand.
    ///
    /// The member starts talking and their question is claimed; everyone else
    /// stops talking. Other raised hands stay up.
    pub fn claim(&self, id: MemberId) -> CoreResult<Self> {
        let member = self.get(id).ok_or(CoreError::UnknownMember(id))?;
        if member.is_talking {
            return Err(CoreError::AlreadyTalking(id));
        }
        if !member.has_question {
            return Err(CoreError::NoQuestion(id));
        }

        let members = self
            .members
            .iter()
            .map(|m| CrowdMember {
                has_question: m.has_question && m.id != id,
                is_talking: m.id == id,
                ..m.clone()
            })
            .collect();
        Ok(Self { members })
    }

    /// Send a talking member back to their seat.
    pub fn release(&self, id: MemberId) -> CoreResult<Self> {
        if self.get(id).is_none() {
            return Err(CoreError::UnknownMember(id));
        }
        let members = self
            .members
            .iter()
            .map(|m| CrowdMember {
                is_talking: m.is_talking && m.id != id,
                ..m.clone()
            })
            .collect();
        Ok(Self { members })
    }
}
