//! Employee workflows: validation, duplicate checks, image storage and
//! persistence, with compensation for images when a later step fails.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use strum_macros::Display;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    model::employee::Employee,
    repository::EmployeeRepository,
    services::duplicate_checker::{CheckMode, UniqueValues, ensure_unique},
    storage::{ImageStore, UploadedImage},
    utils::validation::{RawEmployeeForm, validate_employee_changes, validate_new_employee},
};

/// Progress of a create request. `Failed` is reported against the last
/// stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CreateStage {
    Received,
    Validated,
    DuplicateChecked,
    ImageStored,
    Persisted,
    Done,
}

#[derive(Clone)]
pub struct EmployeeService {
    repo: Arc<dyn EmployeeRepository>,
    images: ImageStore,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

fn not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Employee with ID {id} not found"))
}

impl EmployeeService {
    pub fn new(repo: Arc<dyn EmployeeRepository>, images: ImageStore) -> Self {
        Self {
            repo,
            images,
            today: utc_today,
        }
    }

    /// Replaces the source of "today" used for age and hire-date rules.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    #[instrument(name = "employee_create", skip(self, form, image))]
    pub async fn create(
        &self,
        form: &RawEmployeeForm,
        image: Option<&UploadedImage>,
        actor: u64,
    ) -> AppResult<Employee> {
        let mut stage = CreateStage::Received;
        let result = self.run_create(form, image, actor, &mut stage).await;

        match &result {
            Ok(employee) => info!(employee_id = employee.employee_id, "Employee created"),
            Err(e) => warn!(failed_at = %stage, error = %e, "Employee create failed"),
        }
        result
    }

    async fn run_create(
        &self,
        form: &RawEmployeeForm,
        image: Option<&UploadedImage>,
        actor: u64,
        stage: &mut CreateStage,
    ) -> AppResult<Employee> {
        let mut record = validate_new_employee(form, (self.today)())?;
        self.advance(stage, CreateStage::Validated);

        // must run before the image is stored
        ensure_unique(self.repo.as_ref(), UniqueValues::from(&record), CheckMode::Create).await?;
        self.advance(stage, CreateStage::DuplicateChecked);

        let stored = image.map(|img| self.images.store(img)).transpose()?;
        record.image_path = stored.clone();
        self.advance(stage, CreateStage::ImageStored);

        let employee = match self.repo.create(&record, actor).await {
            Ok(employee) => employee,
            Err(e) => {
                if let Some(key) = &stored {
                    self.images.discard(key);
                }
                return Err(e);
            }
        };
        self.advance(stage, CreateStage::Persisted);

        self.advance(stage, CreateStage::Done);
        Ok(employee)
    }

    fn advance(&self, stage: &mut CreateStage, next: CreateStage) {
        debug!(from = %stage, to = %next, "employee create transition");
        *stage = next;
    }

    #[instrument(name = "employee_update", skip(self, form, image))]
    pub async fn update(
        &self,
        id: u64,
        form: &RawEmployeeForm,
        image: Option<&UploadedImage>,
        actor: u64,
    ) -> AppResult<Employee> {
        let existing = self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))?;

        let mut changes = validate_employee_changes(form, &existing, (self.today)())?;
        if changes.is_empty() && image.is_none() {
            return Err(AppError::BadRequest("No fields provided for update".to_string()));
        }

        ensure_unique(
            self.repo.as_ref(),
            UniqueValues::from(&changes),
            CheckMode::Update { id },
        )
        .await?;

        let new_image = image.map(|img| self.images.store(img)).transpose()?;
        changes.image_path = new_image.clone();

        let outcome = self
            .repo
            .update(id, &changes, actor)
            .await
            .and_then(|row| row.ok_or_else(|| not_found(id)));

        let updated = match outcome {
            Ok(updated) => updated,
            Err(err) => {
                // the old image is still referenced, only the new one goes
                if let Some(key) = &new_image {
                    self.images.discard(key);
                }
                warn!(error = %err, "Employee update failed");
                return Err(err);
            }
        };

        if let (Some(new_key), Some(old_key)) = (&new_image, &existing.image_path) {
            if new_key != old_key {
                self.images.discard(old_key);
            }
        }

        info!("Employee updated");
        Ok(updated)
    }

    pub async fn get(&self, id: u64) -> AppResult<Employee> {
        self.repo.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>> {
        self.repo.list(skip, limit).await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repo.count().await
    }

    #[instrument(name = "employee_soft_delete", skip(self))]
    pub async fn soft_delete(&self, id: u64, actor: u64) -> AppResult<()> {
        if !self.repo.soft_delete(id, actor).await? {
            return Err(not_found(id));
        }
        info!(employee_id = id, "Employee soft-deleted");
        Ok(())
    }
}
