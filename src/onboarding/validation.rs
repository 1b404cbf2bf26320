//! Per-step required-field checks.

use std::collections::BTreeSet;

use super::model::{EducationField, FormField, OnboardingForm};
use super::state::OnboardingStep;

/// Identifiers of fields failing validation.
pub type ValidationErrors = BTreeSet<String>;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Required fields of `step` that are blank in `form`.
///
/// Academic-step failures are keyed per item (`degree_<id>` …) so several
/// items can report independently. The employment step has no required
/// fields.
pub fn validate_step(step: OnboardingStep, form: &OnboardingForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let mut require = |field: FormField| {
        if is_blank(form.field(field)) {
            errors.insert(field.key().to_string());
        }
    };

    match step {
        OnboardingStep::Personal => {
            require(FormField::FullName);
            require(FormField::DateOfBirth);
            require(FormField::Gender);
        }
        OnboardingStep::Contact => {
            require(FormField::ContactNumber);
            require(FormField::CurrentAddress);
            if !form.is_permanent_address_same_as_current {
                require(FormField::PermanentAddress);
            }
        }
        OnboardingStep::Employment => {}
        OnboardingStep::Academic => {
            for item in &form.educational_history {
                for field in EducationField::REQUIRED {
                    if is_blank(item.field(field)) {
                        errors.insert(field.error_key(&item.id));
                    }
                }
            }
        }
        OnboardingStep::Emergency => {
            require(FormField::EmergencyContactName);
            require(FormField::EmergencyContactNumber);
        }
    }

    errors
}

/// Validate by 1-based step number. Numbers outside 1..=5 have no fields.
pub fn validate_step_number(step: u8, form: &OnboardingForm) -> ValidationErrors {
    OnboardingStep::from_number(step)
        .map(|s| validate_step(s, form))
        .unwrap_or_default()
}

/// First step (in wizard order) with failing fields, with its errors.
pub fn first_invalid_step(form: &OnboardingForm) -> Option<(OnboardingStep, ValidationErrors)> {
    OnboardingStep::ALL.into_iter().find_map(|step| {
        let errors = validate_step(step, form);
        (!errors.is_empty()).then_some((step, errors))
    })
}
