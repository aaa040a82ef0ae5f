use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    #[strum(to_string = "Male", serialize = "M")]
    Male,
    #[strum(to_string = "Female", serialize = "F")]
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum BloodGroup {
    #[strum(serialize = "A+")]
    APositive,
    #[strum(serialize = "A-")]
    ANegative,
    #[strum(serialize = "B+")]
    BPositive,
    #[strum(serialize = "B-")]
    BNegative,
    #[strum(serialize = "AB+")]
    AbPositive,
    #[strum(serialize = "AB-")]
    AbNegative,
    #[strum(serialize = "O+")]
    OPositive,
    #[strum(serialize = "O-")]
    ONegative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[schema(
    example = json!({
        "EmployeeId": 1,
        "CampusId": 1,
        "DesignationId": 5,
        "UserId": null,
        "FullName": "John Doe",
        "FatherName": "Robert Doe",
        "Gender": "Male",
        "DateOfBirth": "1990-05-15",
        "CNIC": "12345-6789012-3",
        "PhoneNo": "+923001234567",
        "MobileNo": "+923219876543",
        "BloodGroup": "O+",
        "Email": "john.doe@company.com",
        "HireDate": "2024-01-15",
        "Salary": 50000.0,
        "IsHourlySalary": false,
        "Experience": 5,
        "ImagePath": "3f0c5a8e-0c39-4b8e-9b3e-0a9e58f4a0d1.png",
        "CreatedDate": "2026-01-01T00:00:00Z",
        "CreatedBy": 1,
        "ModifiedDate": null,
        "ModifiedBy": null,
        "IsActive": true
    })
)]
pub struct Employee {
    pub employee_id: u64,
    pub campus_id: u64,
    pub designation_id: u64,
    pub user_id: Option<String>,
    pub full_name: String,
    pub father_name: String,
    pub gender: String,
    #[schema(value_type = String, format = "date")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "CNIC")]
    pub cnic: String,
    pub phone_no: String,
    pub mobile_no: Option<String>,
    pub blood_group: Option<String>,
    pub email: String,
    #[schema(value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub is_hourly_salary: bool,
    pub experience: Option<i32>,
    pub image_path: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_date: DateTime<Utc>,
    pub created_by: u64,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub modified_date: Option<DateTime<Utc>>,
    pub modified_by: Option<u64>,
    #[serde(skip)]
    pub is_deleted: bool,
    pub is_active: bool,
}

/// A fully validated employee ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub campus_id: u64,
    pub designation_id: u64,
    pub user_id: Option<String>,
    pub full_name: String,
    pub father_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub cnic: String,
    pub phone_no: String,
    pub mobile_no: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub email: String,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub is_hourly_salary: bool,
    pub experience: Option<i32>,
    pub image_path: Option<String>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub campus_id: Option<u64>,
    pub designation_id: Option<u64>,
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub cnic: Option<String>,
    pub phone_no: Option<String>,
    pub mobile_no: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub email: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub is_hourly_salary: Option<bool>,
    pub experience: Option<i32>,
    pub image_path: Option<String>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        *self == EmployeeChanges::default()
    }
}
