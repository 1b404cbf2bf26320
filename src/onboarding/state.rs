//! Wizard state machine — which step is shown and where submission stands.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The five steps of the onboarding wizard.
///
/// Progresses linearly: Personal → Contact → Employment → Academic →
/// Emergency. Navigation clamps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Personal,
    Contact,
    Employment,
    Academic,
    Emergency,
}

impl OnboardingStep {
    pub const FIRST: OnboardingStep = Self::Personal;
    pub const LAST: OnboardingStep = Self::Emergency;
    pub const COUNT: u8 = 5;

    pub const ALL: [OnboardingStep; OnboardingStep::COUNT as usize] = [
        Self::Personal,
        Self::Contact,
        Self::Employment,
        Self::Academic,
        Self::Emergency,
    ];

    /// 1-based step number as shown in the progress bar.
    pub fn number(&self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Contact => 2,
            Self::Employment => 3,
            Self::Academic => 4,
            Self::Emergency => 5,
        }
    }

    pub fn from_number(n: u8) -> Option<OnboardingStep> {
        match n {
            1 => Some(Self::Personal),
            2 => Some(Self::Contact),
            3 => Some(Self::Employment),
            4 => Some(Self::Academic),
            5 => Some(Self::Emergency),
            _ => None,
        }
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        Self::from_number(self.number() + 1)
    }

    /// The preceding step, if any.
    pub fn previous(&self) -> Option<OnboardingStep> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_last(&self) -> bool {
        *self == Self::LAST
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Personal => "Personal Details",
            Self::Contact => "Contact Details",
            Self::Employment => "Employment Details",
            Self::Academic => "Academic Details",
            Self::Emergency => "Emergency Contact",
        }
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Personal => "personal",
            Self::Contact => "contact",
            Self::Employment => "employment",
            Self::Academic => "academic",
            Self::Emergency => "emergency",
        };
        write!(f, "{s}")
    }
}

/// Where the final write stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Success or Error.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error(_))
    }
}

/// Navigation, submission and validation state of one wizard instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub current_step: OnboardingStep,
    pub submission: SubmissionState,
    /// Identifiers of fields failing validation on the active step.
    pub validation_errors: BTreeSet<String>,
}

impl FlowState {
    /// Move forward one step. Returns false when already on the last step.
    pub fn next_step(&mut self) -> bool {
        match self.current_step.next() {
            Some(next) => {
                self.current_step = next;
                true
            }
            None => false,
        }
    }

    /// Move back one step. Returns false when already on the first step.
    pub fn previous_step(&mut self) -> bool {
        match self.current_step.previous() {
            Some(prev) => {
                self.current_step = prev;
                true
            }
            None => false,
        }
    }

    /// Drop a field's validation error. Returns whether one was present.
    pub fn clear_error(&mut self, key: &str) -> bool {
        self.validation_errors.remove(key)
    }

    pub fn has_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }
}
