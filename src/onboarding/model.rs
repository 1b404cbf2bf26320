//! Onboarding form data model — the employee record as written to the store.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;

/// Gender choices offered by the personal-details step.
pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];

/// Labels of the performance radar chart, seeded at 50 on every new record.
pub const PERFORMANCE_METRICS: [&str; 5] = [
    "Productivity",
    "Quality of Work",
    "Communication",
    "Teamwork",
    "Problem Solving",
];

/// Starting score for every performance metric.
pub const DEFAULT_METRIC_SCORE: f32 = 50.0;

/// Starter allotment per leave type.
const STARTER_LEAVE_DAYS: f64 = 6.0;

/// Account role stored on the employee record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Employee,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Employee => write!(f, "EMPLOYEE"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

/// One entry of the educational history, keyed by a generated id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationItem {
    pub id: String,
    pub degree: String,
    pub university: String,
    pub year: String,
    pub specialisation: String,
}

impl EducationItem {
    /// A blank item with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            degree: String::new(),
            university: String::new(),
            year: String::new(),
            specialisation: String::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: EducationField, value: impl Into<String>) -> Self {
        *self.field_mut(field) = value.into();
        self
    }

    pub fn field(&self, field: EducationField) -> &str {
        match field {
            EducationField::Degree => &self.degree,
            EducationField::University => &self.university,
            EducationField::Year => &self.year,
            EducationField::Specialisation => &self.specialisation,
        }
    }

    pub fn field_mut(&mut self, field: EducationField) -> &mut String {
        match field {
            EducationField::Degree => &mut self.degree,
            EducationField::University => &mut self.university,
            EducationField::Year => &mut self.year,
            EducationField::Specialisation => &mut self.specialisation,
        }
    }
}

impl Default for EducationItem {
    fn default() -> Self {
        Self::new()
    }
}

/// Editable fields of an [`EducationItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EducationField {
    Degree,
    University,
    Year,
    Specialisation,
}

impl EducationField {
    /// Fields that must be non-blank on the academic step.
    pub const REQUIRED: [EducationField; 3] = [Self::Degree, Self::University, Self::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::University => "university",
            Self::Year => "year",
            Self::Specialisation => "specialisation",
        }
    }

    /// Validation identifier for this field on a specific item, e.g. `degree_<id>`.
    pub fn error_key(&self, item_id: &str) -> String {
        format!("{}_{}", self.as_str(), item_id)
    }
}

impl FromStr for EducationField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "degree" => Ok(Self::Degree),
            "university" => Ok(Self::University),
            "year" => Ok(Self::Year),
            "specialisation" => Ok(Self::Specialisation),
            other => Err(FieldError::Unknown(other.to_string())),
        }
    }
}

/// Scalar text fields of the form, addressable by their camelCase identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    DateOfBirth,
    Gender,
    ContactNumber,
    CurrentAddress,
    PermanentAddress,
    EmployeeId,
    DateOfJoining,
    Department,
    Designation,
    EmergencyContactName,
    EmergencyContactNumber,
}

impl FormField {
    pub const ALL: [FormField; 12] = [
        Self::FullName,
        Self::DateOfBirth,
        Self::Gender,
        Self::ContactNumber,
        Self::CurrentAddress,
        Self::PermanentAddress,
        Self::EmployeeId,
        Self::DateOfJoining,
        Self::Department,
        Self::Designation,
        Self::EmergencyContactName,
        Self::EmergencyContactNumber,
    ];

    /// Identifier used in the serialized record and in validation errors.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
            Self::ContactNumber => "contactNumber",
            Self::CurrentAddress => "currentAddress",
            Self::PermanentAddress => "permanentAddress",
            Self::EmployeeId => "employeeId",
            Self::DateOfJoining => "dateOfJoining",
            Self::Department => "department",
            Self::Designation => "designation",
            Self::EmergencyContactName => "emergencyContactName",
            Self::EmergencyContactNumber => "emergencyContactNumber",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| FieldError::Unknown(s.to_string()))
    }
}

/// Leave allotment for one leave type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    #[serde(rename = "type")]
    pub leave_type: String,
    pub balance: f64,
    pub total: f64,
}

impl LeaveBalance {
    fn starter(leave_type: &str) -> Self {
        Self {
            leave_type: leave_type.to_string(),
            balance: STARTER_LEAVE_DAYS,
            total: STARTER_LEAVE_DAYS,
        }
    }

    /// Casual, Sick and Unpaid leave at the starter allotment.
    pub fn starter_set() -> Vec<Self> {
        ["Casual", "Sick", "Unpaid"]
            .into_iter()
            .map(Self::starter)
            .collect()
    }
}

/// Default performance-review map: every metric at [`DEFAULT_METRIC_SCORE`].
pub fn default_performance_review() -> BTreeMap<String, f32> {
    PERFORMANCE_METRICS
        .iter()
        .map(|label| (label.to_string(), DEFAULT_METRIC_SCORE))
        .collect()
}

/// The employee profile collected by the onboarding wizard.
///
/// Serialized camelCase; this is the exact document written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingForm {
    pub role: Role,

    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,

    pub contact_number: String,
    pub current_address: String,
    pub permanent_address: String,
    pub is_permanent_address_same_as_current: bool,

    pub employee_id: String,
    pub date_of_joining: String,
    pub department: String,
    pub designation: String,

    pub educational_history: Vec<EducationItem>,

    pub emergency_contact_name: String,
    pub emergency_contact_number: String,

    // Seeded for the attendance, leave and review screens.
    pub is_clocked_in: bool,
    pub last_clock_in_time: Option<DateTime<Utc>>,
    pub leave_balances: Vec<LeaveBalance>,
    pub performance_review: BTreeMap<String, f32>,
}

impl Default for OnboardingForm {
    fn default() -> Self {
        Self {
            role: Role::default(),
            full_name: String::new(),
            date_of_birth: String::new(),
            gender: String::new(),
            contact_number: String::new(),
            current_address: String::new(),
            permanent_address: String::new(),
            is_permanent_address_same_as_current: false,
            employee_id: String::new(),
            date_of_joining: String::new(),
            department: String::new(),
            designation: String::new(),
            educational_history: vec![EducationItem::new()],
            emergency_contact_name: String::new(),
            emergency_contact_number: String::new(),
            is_clocked_in: false,
            last_clock_in_time: None,
            leave_balances: LeaveBalance::starter_set(),
            performance_review: default_performance_review(),
        }
    }
}

impl OnboardingForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::DateOfBirth => &self.date_of_birth,
            FormField::Gender => &self.gender,
            FormField::ContactNumber => &self.contact_number,
            FormField::CurrentAddress => &self.current_address,
            FormField::PermanentAddress => &self.permanent_address,
            FormField::EmployeeId => &self.employee_id,
            FormField::DateOfJoining => &self.date_of_joining,
            FormField::Department => &self.department,
            FormField::Designation => &self.designation,
            FormField::EmergencyContactName => &self.emergency_contact_name,
            FormField::EmergencyContactNumber => &self.emergency_contact_number,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FullName => &mut self.full_name,
            FormField::DateOfBirth => &mut self.date_of_birth,
            FormField::Gender => &mut self.gender,
            FormField::ContactNumber => &mut self.contact_number,
            FormField::CurrentAddress => &mut self.current_address,
            FormField::PermanentAddress => &mut self.permanent_address,
            FormField::EmployeeId => &mut self.employee_id,
            FormField::DateOfJoining => &mut self.date_of_joining,
            FormField::Department => &mut self.department,
            FormField::Designation => &mut self.designation,
            FormField::EmergencyContactName => &mut self.emergency_contact_name,
            FormField::EmergencyContactNumber => &mut self.emergency_contact_number,
        }
    }

    /// Look up an education item by id.
    pub fn education_item(&self, id: &str) -> Option<&EducationItem> {
        self.educational_history.iter().find(|item| item.id == id)
    }
}
