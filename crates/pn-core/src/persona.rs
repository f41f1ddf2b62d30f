//! Reporter personas.
//!
//! Each persona is a simulated reporter with a name, a network, a short
//! personality blurb used to prompt the dialogue service, and the synthetic
//! voice their replies are spoken in.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Synthetic voice used for a persona's spoken replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    /// Neutral, balanced voice.
    Alloy,
    /// Warm, low voice.
    Ash,
    /// Soft, melodic voice.
    Ballad,
    /// Clear, resonant voice.
    Echo,
    /// Bright, friendly voice.
    Coral,
    /// Calm, measured voice.
    Sage,
    /// Expressive voice.
    Verse,
    /// Light, crisp voice.
    Shimmer,
}

impl Voice {
    /// The wire name of this voice.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Ash => "ash",
            Self::Ballad => "ballad",
            Self::Echo => "echo",
            Self::Coral => "coral",
            Self::Sage => "sage",
            Self::Verse => "verse",
            Self::Shimmer => "shimmer",
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simulated reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Reporter's name.
    pub name: String,
    /// News outlet the reporter works for.
    pub network: String,
    /// Personality description fed into the system prompt.
    pub persona: String,
    /// Voice for spoken replies.
    pub voice: Voice,
}

impl Persona {
    /// Create a persona.
    pub fn new(
        name: impl Into<String>,
        network: impl Into<String>,
        persona: impl Into<String>,
        voice: Voice,
    ) -> Self {
        Self {
            name: name.into(),
            network: network.into(),
            persona: persona.into(),
            voice,
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.network)
    }
}

/// Look up a persona by index.
pub fn persona_at(roster: &[Persona], index: usize) -> CoreResult<&Persona> {
    roster.get(index).ok_or(CoreError::UnknownPersona {
        index,
        len: roster.len(),
    })
}

/// The eight reporters of the default press room.
pub fn default_roster() -> Vec<Persona> {
    vec![
        Persona::new(
            "Sophia Harrington",
            "Global Update Network",
            "An experienced investigative journalist known for her calm demeanor and in-depth analysis of complex international issues.",
            Voice::Alloy,
        ),
        Persona::new(
            "James Carter",
            "Continental News Service",
            "A charismatic anchor who brings energy to breaking news stories, specializing in political and economic affairs.",
            Voice::Ash,
        ),
        Persona::new(
            "Amara Lopez",
            "WorldView Today",
            "A passionate field reporter with a focus on humanitarian crises, often reporting directly from conflict zones.",
            Voice::Ballad,
        ),
        Persona::new(
            "Liam Roberts",
            "PrimeTime News",
            "A reliable and composed evening news anchor, delivering stories with clarity and a touch of wit.",
            Voice::Echo,
        ),
        Persona::new(
            "Elena Cho",
            "24/7 Current Affairs",
            "A technology enthusiast who reports on the latest innovations, blending expertise with a down-to-earth approach.",
            Voice::Coral,
        ),
        Persona::new(
            "Chloe Bennett",
            "Daily Spotlight",
            "An upbeat lifestyle reporter covering trends in fashion, health, and entertainment with a relatable charm.",
            Voice::Sage,
        ),
        Persona::new(
            "Sarah O'Connor",
            "Pulse News Network",
            "A gritty crime reporter who dives into the details of high-profile cases, earning respect for her fearless approach.",
            Voice::Verse,
        ),
        Persona::new(
            "Aria Sullivan",
            "Breaking Point Broadcast",
            "An articulate and empathetic journalist specializing in social justice issues, known for giving a voice to underrepresented communities.",
            Voice::Shimmer,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_has_eight_distinct_voices() {
        let roster = default_roster();
        assert_eq!(roster.len(), 8);
        let voices: std::collections::HashSet<_> = roster.iter().map(|p| p.voice).collect();
        assert_eq!(voices.len(), 8);
    }

    #[test]
    fn persona_display() {
        let roster = default_roster();
        insta::assert_snapshot!(roster[0].to_string(), @"Sophia Harrington (Global Update Network)");
    }

    #[test]
    fn persona_lookup_out_of_range() {
        let roster = default_roster();
        assert_eq!(persona_at(&roster, 3).unwrap().name, "Liam Roberts");
        assert_eq!(
            persona_at(&roster, 8),
            Err(CoreError::UnknownPersona { index: 8, len: 8 })
        );
    }

    #[test]
    fn voice_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Voice::Shimmer).unwrap(), "\"shimmer\"");
        let v: Voice = serde_json::from_str("\"coral\"").unwrap();
        assert_eq!(v, Voice::Coral);
        assert_eq!(Voice::Verse.to_string(), "verse");
    }
}
