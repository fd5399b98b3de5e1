//! The fixed persona set and its handoff transition table.

use serde::{Deserialize, Serialize};

/// The personas a call can be handled by.
///
/// The set is closed: handoffs go through [`PersonaKind::next`] rather than
/// a name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaKind {
    /// Verifies the caller's identity.
    Intake,
    /// Runs the health check, logs requests, escalates or ends the call.
    CheckIn,
}

/// Events that move a session from one persona to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The caller passed identity verification.
    IdentityVerified,
}

impl PersonaKind {
    /// Every persona, in session start order.
    pub const ALL: [PersonaKind; 2] = [PersonaKind::Intake, PersonaKind::CheckIn];

    /// The persona every session starts in.
    pub const INITIAL: PersonaKind = PersonaKind::Intake;

    /// Returns the short key for this persona.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::CheckIn => "check-in",
        }
    }

    /// Returns the agent name announced to the room and used in prompts.
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::Intake => "IntakeAgent",
            Self::CheckIn => "CheckInAgent",
        }
    }

    /// Returns the instructions file name for this persona.
    pub fn prompt_file(self) -> &'static str {
        match self {
            Self::Intake => "intake_prompt.toml",
            Self::CheckIn => "check_in_prompt.toml",
        }
    }

    /// Transition table. Returns `None` when `transition` is not valid from
    /// this persona.
    pub fn next(self, transition: Transition) -> Option<PersonaKind> {
        match (self, transition) {
            (Self::Intake, Transition::IdentityVerified) => Some(Self::CheckIn),
            (Self::CheckIn, Transition::IdentityVerified) => None,
        }
    }
}

impl std::fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonaKind {
    type Err = ParsePersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intake" => Ok(Self::Intake),
            "check-in" => Ok(Self::CheckIn),
            _ => Err(ParsePersonaError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown persona key.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown persona: {0}")]
pub struct ParsePersonaError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_key_round_trip() {
        for kind in PersonaKind::ALL {
            assert_eq!(kind.as_str().parse::<PersonaKind>().unwrap(), kind);
        }
        assert!("operator".parse::<PersonaKind>().is_err());
    }

    #[test]
    fn transition_table() {
        assert_eq!(
            PersonaKind::Intake.next(Transition::IdentityVerified),
            Some(PersonaKind::CheckIn)
        );
        assert_eq!(PersonaKind::CheckIn.next(Transition::IdentityVerified), None);
    }

    #[test]
    fn agent_names() {
        assert_eq!(PersonaKind::Intake.agent_name(), "IntakeAgent");
        assert_eq!(PersonaKind::CheckIn.agent_name(), "CheckInAgent");
        assert_eq!(PersonaKind::INITIAL, PersonaKind::Intake);
    }
}
