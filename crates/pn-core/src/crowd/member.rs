//! Crowd member identity and speaking state.

use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a crowd member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub Uuid);

impl MemberId {
    /// Generate a new random member ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Generate a v4 ID from a seeded RNG, so crowds are reproducible.
    pub fn from_rng(rng: &mut StdRng) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.random()).into_uuid())
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// One seat in the press room.
///
/// A member who `is_talking` never also `has_question`: the question was
/// claimed when they were called on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdMember {
    /// Unique ID.
    pub id: MemberId,
    /// Index into the persona roster.
    pub persona_index: usize,
    /// Avatar number used by the display.
    pub seed: u32,
    /// Hand is raised.
    pub has_question: bool,
    /// Currently at the microphone.
    pub is_talking: bool,
}

impl CrowdMember {
    /// A seated member with no hand raised.
    pub fn new(id: MemberId, persona_index: usize, seed: u32) -> Self {
        Self {
            id,
            persona_index,
            seed,
            has_question: false,
            is_talking: false,
        }
    }

    /// Whether the member can be called on right now.
    pub fn can_be_called(&self) -> bool {
        self.has_question && !self.is_talking
    }
}
