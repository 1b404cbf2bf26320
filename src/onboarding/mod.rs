//! Employee onboarding wizard.
//!
//! A five-step form (personal, contact, employment, academic, emergency
//! contact) that validates each step before moving on and writes one
//! employee record to the document store when submitted.

pub mod flow;
pub mod model;
pub mod state;
pub mod validation;

pub use flow::{FlowSnapshot, NOT_LOGGED_IN, OnboardingFlow, SubmitOutcome, UNKNOWN_ERROR};
pub use model::{
    EducationField, EducationItem, FormField, GENDER_OPTIONS, LeaveBalance, OnboardingForm,
    PERFORMANCE_METRICS, Role,
};
pub use state::{FlowState, OnboardingStep, SubmissionState};
pub use validation::{ValidationErrors, first_invalid_step, validate_step, validate_step_number};
