//! Normalization and validation of raw employee form fields.
//!
//! Every check reports into a [`FieldErrors`] collector so a rejected form
//! lists all offending fields at once instead of stopping at the first.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use strum::IntoEnumIterator;
use uuid::Uuid;
use validator::{ValidateEmail, ValidationErrors};

use crate::{
    error::{AppError, AppResult, FieldError},
    model::employee::{BloodGroup, Employee, EmployeeChanges, Gender, NewEmployee},
};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 100;
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 100;
pub const MAX_EXPERIENCE: i32 = 50;
pub const MAX_HIRE_YEARS_AGO: i32 = 50;

static NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z' -]+$").unwrap());
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?\d{10,15}$").unwrap());
static CNIC_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{13}$").unwrap());

/// Multipart field names accepted for employee records.
pub mod field {
    pub const EMAIL: &str = "Email";
    pub const CAMPUS_ID: &str = "CampusId";
    pub const DESIGNATION_ID: &str = "DesignationId";
    pub const USER_ID: &str = "UserId";
    pub const FULL_NAME: &str = "FullName";
    pub const FATHER_NAME: &str = "FatherName";
    pub const GENDER: &str = "Gender";
    pub const DATE_OF_BIRTH: &str = "DateOfBirth";
    pub const CNIC: &str = "CNIC";
    pub const PHONE_NO: &str = "PhoneNo";
    pub const MOBILE_NO: &str = "MobileNo";
    pub const BLOOD_GROUP: &str = "BloodGroup";
    pub const HIRE_DATE: &str = "HireDate";
    pub const SALARY: &str = "Salary";
    pub const IS_HOURLY_SALARY: &str = "IsHourlySalary";
    pub const EXPERIENCE: &str = "Experience";
}

/// Text parts of an employee multipart form, keyed by field name.
#[derive(Debug, Default, Clone)]
pub struct RawEmployeeForm {
    fields: HashMap<String, String>,
}

impl RawEmployeeForm {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Trimmed value; blank values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEmployeeForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = RawEmployeeForm::default();
        for (k, v) in iter {
            form.insert(k, v);
        }
        form
    }
}

#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Records the error (if any) and hands back the value on success.
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(msg) => {
                self.push(field, msg);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Folds `validator` derive errors in, one entry per failed rule, ordered
    /// by field name.
    pub fn extend_from(&mut self, errors: ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, failures) in fields {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", failure.code));
                self.push(&field, message);
            }
        }
    }

    pub fn into_result(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

// ---------- single-field rules ----------

pub fn normalize_name(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("cannot be empty or whitespace".into());
    }
    if !NAME_REGEX.is_match(value) {
        return Err("can only contain letters, spaces, hyphens, and apostrophes".into());
    }
    if value.contains("  ") {
        return Err("cannot contain consecutive spaces".into());
    }
    let len = value.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(format!(
            "must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"
        ));
    }
    Ok(value.to_string())
}

pub fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.trim()
        .parse::<Gender>()
        .map_err(|_| "must be one of: Male, Female, Other, M, F".to_string())
}

pub fn parse_blood_group(raw: &str) -> Result<BloodGroup, String> {
    raw.trim().parse::<BloodGroup>().map_err(|_| {
        let allowed: Vec<String> = BloodGroup::iter().map(|g| g.to_string()).collect();
        format!("must be one of: {}", allowed.join(", "))
    })
}

/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and `DD/MM/YY`; first match wins.
/// Two-digit years 69-99 map to 19xx, 00-68 to 20xx.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let value = raw.trim();
    let invalid = || format!("invalid date '{value}', use YYYY-MM-DD, DD/MM/YYYY or DD/MM/YY");

    let dashed: Vec<&str> = value.split('-').collect();
    if dashed.len() == 3 && dashed[0].len() == 4 {
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(date);
        }
    }

    let slashed: Vec<&str> = value.split('/').collect();
    if slashed.len() == 3 {
        match slashed[2].len() {
            4 => {
                if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
                    return Ok(date);
                }
            }
            2 => {
                let parts = (
                    slashed[0].parse::<u32>(),
                    slashed[1].parse::<u32>(),
                    slashed[2].parse::<i32>(),
                );
                if let (Ok(day), Ok(month), Ok(yy)) = parts {
                    let year = if yy >= 69 { 1900 + yy } else { 2000 + yy };
                    if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                        return Ok(date);
                    }
                }
            }
            _ => {}
        }
    }

    Err(invalid())
}

/// Whole years between `dob` and `on`.
pub fn age_on(dob: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

pub fn check_date_of_birth(dob: NaiveDate, today: NaiveDate) -> Result<NaiveDate, String> {
    if dob > today {
        return Err("cannot be in the future".into());
    }
    let age = age_on(dob, today);
    if age < MIN_AGE {
        return Err(format!("employee must be at least {MIN_AGE} years old"));
    }
    if age > MAX_AGE {
        return Err(format!("invalid date of birth (age > {MAX_AGE} years)"));
    }
    Ok(dob)
}

pub fn check_hire_date(hire: NaiveDate, today: NaiveDate) -> Result<NaiveDate, String> {
    if hire > today {
        return Err("cannot be in the future".into());
    }
    if today.year() - hire.year() > MAX_HIRE_YEARS_AGO {
        return Err(format!("cannot be more than {MAX_HIRE_YEARS_AGO} years ago"));
    }
    Ok(hire)
}

pub fn check_age_at_hire(dob: NaiveDate, hire: NaiveDate) -> Result<(), String> {
    if age_on(dob, hire) < MIN_AGE {
        return Err(format!("employee must be at least {MIN_AGE} years old at hire date"));
    }
    Ok(())
}

pub fn normalize_cnic(raw: &str) -> Result<String, String> {
    let digits: String = raw.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if !CNIC_DIGITS_REGEX.is_match(&digits) {
        return Err("must be 13 digits (format: XXXXX-XXXXXXX-X or XXXXXXXXXXXXX)".into());
    }
    Ok(format!("{}-{}-{}", &digits[..5], &digits[5..12], &digits[12..]))
}

pub fn normalize_phone(raw: &str) -> Result<String, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '(' | ')'))
        .collect();
    if !PHONE_REGEX.is_match(&cleaned) {
        return Err("must be 10-15 digits, optionally starting with +".into());
    }
    Ok(cleaned)
}

pub fn normalize_email(raw: &str) -> Result<String, String> {
    let value = raw.trim().to_lowercase();
    if value.len() > EMAIL_MAX_LEN {
        return Err(format!("cannot exceed {EMAIL_MAX_LEN} characters"));
    }
    // single-label domains such as `localhost` are refused
    let dotted_domain = value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !value.validate_email() || !dotted_domain {
        return Err("must be a valid email address".into());
    }
    Ok(value)
}

pub fn parse_positive_id(raw: &str) -> Result<u64, String> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err("must be a positive integer".into()),
    }
}

pub fn parse_salary(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(_) => Err("cannot be negative".into()),
        Err(_) => Err("must be a number".into()),
    }
}

pub fn parse_experience(raw: &str) -> Result<i32, String> {
    match raw.trim().parse::<i32>() {
        Ok(v) if (0..=MAX_EXPERIENCE).contains(&v) => Ok(v),
        _ => Err(format!("must be a whole number of years between 0 and {MAX_EXPERIENCE}")),
    }
}

pub fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err("must be true or false".into()),
    }
}

pub fn parse_user_ref(raw: &str) -> Result<String, String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| "must be a valid UUID".to_string())
}

// ---------- whole-form rules ----------

fn optional<T>(
    form: &RawEmployeeForm,
    errors: &mut FieldErrors,
    name: &str,
    rule: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    form.get(name).and_then(|raw| errors.check(name, rule(raw)))
}

fn required<T>(
    form: &RawEmployeeForm,
    errors: &mut FieldErrors,
    name: &str,
    rule: impl FnOnce(&str) -> Result<T, String>,
) -> Option<T> {
    match form.get(name) {
        Some(raw) => errors.check(name, rule(raw)),
        None => {
            errors.push(name, "field required");
            None
        }
    }
}

/// Validates a create form, returning a record with canonical field values.
pub fn validate_new_employee(form: &RawEmployeeForm, today: NaiveDate) -> AppResult<NewEmployee> {
    let mut errors = FieldErrors::default();

    let email = required(form, &mut errors, field::EMAIL, normalize_email);
    let campus_id = required(form, &mut errors, field::CAMPUS_ID, parse_positive_id);
    let designation_id = required(form, &mut errors, field::DESIGNATION_ID, parse_positive_id);
    let full_name = required(form, &mut errors, field::FULL_NAME, normalize_name);
    let father_name = required(form, &mut errors, field::FATHER_NAME, normalize_name);
    let gender = required(form, &mut errors, field::GENDER, parse_gender);
    let date_of_birth = required(form, &mut errors, field::DATE_OF_BIRTH, |raw| {
        parse_date(raw).and_then(|d| check_date_of_birth(d, today))
    });
    let cnic = required(form, &mut errors, field::CNIC, normalize_cnic);
    let phone_no = required(form, &mut errors, field::PHONE_NO, normalize_phone);

    let user_id = optional(form, &mut errors, field::USER_ID, parse_user_ref);
    let mobile_no = optional(form, &mut errors, field::MOBILE_NO, normalize_phone);
    let blood_group = optional(form, &mut errors, field::BLOOD_GROUP, parse_blood_group);
    let hire_date = optional(form, &mut errors, field::HIRE_DATE, |raw| {
        parse_date(raw).and_then(|d| check_hire_date(d, today))
    });
    let salary = optional(form, &mut errors, field::SALARY, parse_salary);
    let is_hourly_salary = optional(form, &mut errors, field::IS_HOURLY_SALARY, parse_flag);
    let experience = optional(form, &mut errors, field::EXPERIENCE, parse_experience);

    if let (Some(dob), Some(hire)) = (date_of_birth, hire_date) {
        if let Err(msg) = check_age_at_hire(dob, hire) {
            errors.push(field::HIRE_DATE, msg);
        }
    }

    match (
        errors.into_result(),
        email,
        campus_id,
        designation_id,
        full_name,
        father_name,
        gender,
        date_of_birth,
        cnic,
        phone_no,
    ) {
        (
            Ok(()),
            Some(email),
            Some(campus_id),
            Some(designation_id),
            Some(full_name),
            Some(father_name),
            Some(gender),
            Some(date_of_birth),
            Some(cnic),
            Some(phone_no),
        ) => Ok(NewEmployee {
            campus_id,
            designation_id,
            user_id,
            full_name,
            father_name,
            gender,
            date_of_birth,
            cnic,
            phone_no,
            mobile_no,
            blood_group,
            email,
            hire_date,
            salary,
            is_hourly_salary: is_hourly_salary.unwrap_or(false),
            experience,
            image_path: None,
        }),
        (Err(e), ..) => Err(e),
        // every missing required value has already been recorded above
        _ => Err(AppError::field("form", "incomplete employee form")),
    }
}

/// Validates the supplied subset of an update form against the stored record.
pub fn validate_employee_changes(
    form: &RawEmployeeForm,
    existing: &Employee,
    today: NaiveDate,
) -> AppResult<EmployeeChanges> {
    let mut errors = FieldErrors::default();

    let changes = EmployeeChanges {
        campus_id: optional(form, &mut errors, field::CAMPUS_ID, parse_positive_id),
        designation_id: optional(form, &mut errors, field::DESIGNATION_ID, parse_positive_id),
        user_id: optional(form, &mut errors, field::USER_ID, parse_user_ref),
        full_name: optional(form, &mut errors, field::FULL_NAME, normalize_name),
        father_name: optional(form, &mut errors, field::FATHER_NAME, normalize_name),
        gender: optional(form, &mut errors, field::GENDER, parse_gender),
        date_of_birth: optional(form, &mut errors, field::DATE_OF_BIRTH, |raw| {
            parse_date(raw).and_then(|d| check_date_of_birth(d, today))
        }),
        cnic: optional(form, &mut errors, field::CNIC, normalize_cnic),
        phone_no: optional(form, &mut errors, field::PHONE_NO, normalize_phone),
        mobile_no: optional(form, &mut errors, field::MOBILE_NO, normalize_phone),
        blood_group: optional(form, &mut errors, field::BLOOD_GROUP, parse_blood_group),
        email: optional(form, &mut errors, field::EMAIL, normalize_email),
        hire_date: optional(form, &mut errors, field::HIRE_DATE, |raw| {
            parse_date(raw).and_then(|d| check_hire_date(d, today))
        }),
        salary: optional(form, &mut errors, field::SALARY, parse_salary),
        is_hourly_salary: optional(form, &mut errors, field::IS_HOURLY_SALARY, parse_flag),
        experience: optional(form, &mut errors, field::EXPERIENCE, parse_experience),
        image_path: None,
    };

    if changes.date_of_birth.is_some() || changes.hire_date.is_some() {
        let dob = changes.date_of_birth.unwrap_or(existing.date_of_birth);
        if let Some(hire) = changes.hire_date.or(existing.hire_date) {
            if let Err(msg) = check_age_at_hire(dob, hire) {
                errors.push(field::HIRE_DATE, msg);
            }
        }
    }

    errors.into_result().map(|()| changes)
}
