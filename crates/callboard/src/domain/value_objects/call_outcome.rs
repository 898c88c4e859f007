//! CallOutcome - What happened when the room was dialled

use serde::{Deserialize, Serialize};

/// Outcome of a single call attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Picked,
    NotPickedAttempt1,
    NotPickedAttempt2,
    NotPickedFinal,
}

/// Which unanswered attempt a missed call was
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MissedAttempt {
    First,
    Second,
    Final,
}

impl CallOutcome {
    /// Every outcome, in the order the console offers them
    pub const ALL: [CallOutcome; 4] = [
        CallOutcome::Picked,
        CallOutcome::NotPickedAttempt1,
        CallOutcome::NotPickedAttempt2,
        CallOutcome::NotPickedFinal,
    ];

    pub fn is_picked(self) -> bool {
        matches!(self, CallOutcome::Picked)
    }

    /// The missed attempt this outcome stands for, `None` when picked
    pub fn missed_attempt(self) -> Option<MissedAttempt> {
        match self {
            CallOutcome::Picked => None,
            CallOutcome::NotPickedAttempt1 => Some(MissedAttempt::First),
            CallOutcome::NotPickedAttempt2 => Some(MissedAttempt::Second),
            CallOutcome::NotPickedFinal => Some(MissedAttempt::Final),
        }
    }

    /// Human-readable label used in reports and exports
    pub fn label(self) -> &'static str {
        match self {
            CallOutcome::Picked => "Picked",
            CallOutcome::NotPickedAttempt1 => "Not Picked (Attempt 1)",
            CallOutcome::NotPickedAttempt2 => "Not Picked (Attempt 2)",
            CallOutcome::NotPickedFinal => "Not Picked (Final)",
        }
    }
}

impl From<MissedAttempt> for CallOutcome {
    fn from(attempt: MissedAttempt) -> Self {
        match attempt {
            MissedAttempt::First => CallOutcome::NotPickedAttempt1,
            MissedAttempt::Second => CallOutcome::NotPickedAttempt2,
            MissedAttempt::Final => CallOutcome::NotPickedFinal,
        }
    }
}

impl std::fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for CallOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "picked" => Ok(CallOutcome::Picked),
            "not_picked_attempt1" | "attempt1" => Ok(CallOutcome::NotPickedAttempt1),
            "not_picked_attempt2" | "attempt2" => Ok(CallOutcome::NotPickedAttempt2),
            "not_picked_final" | "final" => Ok(CallOutcome::NotPickedFinal),
            _ => Err(format!("Unknown call outcome: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missed_attempt_round_trips_through_outcome() {
        for outcome in CallOutcome::ALL.into_iter().filter(|o| !o.is_picked()) {
            let attempt = outcome.missed_attempt().unwrap();
            assert_eq!(CallOutcome::from(attempt), outcome);
        }
        assert_eq!(CallOutcome::Picked.missed_attempt(), None);
    }

    #[test]
    fn test_parse_short_names() {
        assert_eq!("final".parse::<CallOutcome>().unwrap(), CallOutcome::NotPickedFinal);
        assert_eq!("Picked".parse::<CallOutcome>().unwrap(), CallOutcome::Picked);
        assert!("busy".parse::<CallOutcome>().is_err());
    }
}
