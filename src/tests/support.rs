use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tempfile::TempDir;

use crate::{
    config::{Config, UploadConfig},
    error::{AppError, AppResult},
    model::{
        employee::{Employee, EmployeeChanges, NewEmployee},
        user::{NewUser, User},
    },
    repository::{EmployeeRepository, UniqueField, UserRepository},
    services::EmployeeService,
    storage::{ImageStore, LocalBlobStore},
    utils::validation::RawEmployeeForm,
};

pub const JWT_SECRET: &str = "test-secret";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

pub fn test_config(upload_dir: &TempDir) -> Config {
    Config {
        database_url: "mysql://unused".into(),
        jwt_secret: JWT_SECRET.into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 1800,
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        api_prefix: "/api/v1".into(),
        log_dir: "logs".into(),
        upload: UploadConfig {
            dir: upload_dir.path().to_path_buf(),
            ..UploadConfig::default()
        },
    }
}

/// A complete, valid create form.
pub fn valid_form() -> RawEmployeeForm {
    [
        ("Email", "John.Doe@Company.com"),
        ("CampusId", "1"),
        ("DesignationId", "3"),
        ("FullName", "John Doe"),
        ("FatherName", "Richard Doe"),
        ("Gender", "m"),
        ("DateOfBirth", "1990-05-17"),
        ("CNIC", "3520212345671"),
        ("PhoneNo", "+92 300 1234567"),
        ("HireDate", "15/01/2020"),
        ("Salary", "85000"),
    ]
    .into_iter()
    .collect()
}

pub fn png(name: &str, size: usize) -> crate::storage::UploadedImage {
    crate::storage::UploadedImage::from_bytes(name, "image/png", vec![0x89; size])
}

pub fn files_in(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0)
}

pub fn employee_service(
    repo: Arc<InMemoryEmployeeRepository>,
    dir: &TempDir,
) -> EmployeeService {
    let images = ImageStore::new(
        Arc::new(LocalBlobStore::new(dir.path())),
        test_config(dir).upload,
    );
    EmployeeService::new(repo, images).with_clock(today)
}

// ---------- employees ----------

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    rows: Mutex<Vec<Employee>>,
    pub fail_create: AtomicBool,
    pub fail_update: AtomicBool,
}

impl InMemoryEmployeeRepository {
    pub fn failing_create() -> Self {
        let repo = Self::default();
        repo.fail_create.store(true, Ordering::SeqCst);
        repo
    }

    /// Every stored row, soft-deleted ones included.
    pub fn all_rows(&self) -> Vec<Employee> {
        self.rows.lock().unwrap().clone()
    }

    fn live(&self) -> Vec<Employee> {
        self.all_rows().into_iter().filter(|e| !e.is_deleted).collect()
    }
}

fn value_of<'a>(employee: &'a Employee, field: UniqueField) -> Option<&'a str> {
    match field {
        UniqueField::Cnic => Some(&employee.cnic),
        UniqueField::Email => Some(&employee.email),
        UniqueField::UserRef => employee.user_id.as_deref(),
    }
}

fn apply(employee: &mut Employee, changes: &EmployeeChanges) {
    macro_rules! set {
        ($($field:ident),*) => {
            $(if let Some(v) = &changes.$field { employee.$field = v.clone(); })*
        };
    }
    set!(campus_id, designation_id, full_name, father_name, date_of_birth, cnic, phone_no, email, is_hourly_salary);

    macro_rules! set_opt {
        ($($field:ident),*) => {
            $(if let Some(v) = &changes.$field { employee.$field = Some(v.clone()); })*
        };
    }
    set_opt!(user_id, mobile_no, hire_date, salary, experience, image_path);

    if let Some(g) = changes.gender {
        employee.gender = g.to_string();
    }
    if let Some(b) = changes.blood_group {
        employee.blood_group = Some(b.to_string());
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn get_by_id(&self, id: u64) -> AppResult<Option<Employee>> {
        Ok(self.live().into_iter().find(|e| e.employee_id == id))
    }

    async fn get_by_unique_field(&self, field: UniqueField, value: &str) -> AppResult<Option<Employee>> {
        Ok(self
            .live()
            .into_iter()
            .find(|e| value_of(e, field) == Some(value)))
    }

    async fn exists_by(&self, field: UniqueField, value: &str, exclude_id: Option<u64>) -> AppResult<bool> {
        Ok(self
            .live()
            .iter()
            .any(|e| value_of(e, field) == Some(value) && Some(e.employee_id) != exclude_id))
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>> {
        let mut rows = self.live();
        rows.sort_by_key(|e| e.employee_id);
        Ok(rows.into_iter().skip(skip as usize).take(limit as usize).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.live().len() as i64)
    }

    async fn create(&self, new: &NewEmployee, created_by: u64) -> AppResult<Employee> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("insert failed")));
        }
        let mut rows = self.rows.lock().unwrap();
        let employee = Employee {
            employee_id: rows.len() as u64 + 1,
            campus_id: new.campus_id,
            designation_id: new.designation_id,
            user_id: new.user_id.clone(),
            full_name: new.full_name.clone(),
            father_name: new.father_name.clone(),
            gender: new.gender.to_string(),
            date_of_birth: new.date_of_birth,
            cnic: new.cnic.clone(),
            phone_no: new.phone_no.clone(),
            mobile_no: new.mobile_no.clone(),
            blood_group: new.blood_group.map(|b| b.to_string()),
            email: new.email.clone(),
            hire_date: new.hire_date,
            salary: new.salary,
            is_hourly_salary: new.is_hourly_salary,
            experience: new.experience,
            image_path: new.image_path.clone(),
            created_date: Utc::now(),
            created_by,
            modified_date: None,
            modified_by: None,
            is_deleted: false,
            is_active: true,
        };
        rows.push(employee.clone());
        Ok(employee)
    }

    async fn update(&self, id: u64, changes: &EmployeeChanges, modified_by: u64) -> AppResult<Option<Employee>> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(AppError::Internal(anyhow::anyhow!("update failed")));
        }
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|e| e.employee_id == id && !e.is_deleted) else {
            return Ok(None);
        };
        apply(row, changes);
        row.modified_by = Some(modified_by);
        row.modified_date = Some(Utc::now());
        Ok(Some(row.clone()))
    }

    async fn hard_delete(&self, id: u64) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.employee_id != id);
        Ok(rows.len() < before)
    }

    async fn soft_delete(&self, id: u64, modified_by: u64) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|e| e.employee_id == id && !e.is_deleted) {
            Some(row) => {
                row.is_deleted = true;
                row.is_active = false;
                row.modified_by = Some(modified_by);
                row.modified_date = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, id: u64) -> AppResult<bool> {
        Ok(self.live().iter().any(|e| e.employee_id == id))
    }
}

// ---------- users ----------

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn set_active(&self, username: &str, active: bool) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(user) = rows.iter_mut().find(|u| u.username == username) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: u64) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.username == username).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let created = User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            hashed_password: user.hashed_password.clone(),
            full_name: user.full_name.clone(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn update_full_name(&self, id: u64, full_name: &str) -> AppResult<Option<User>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|u| u.id == id).map(|u| {
            u.full_name = Some(full_name.to_string());
            u.updated_at = Some(Utc::now());
            u.clone()
        }))
    }

    async fn delete(&self, id: u64) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() < before)
    }
}
