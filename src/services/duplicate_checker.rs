use crate::{
    error::{AppError, AppResult},
    model::employee::{EmployeeChanges, NewEmployee},
    repository::{EmployeeRepository, UniqueField},
};

/// Whether the candidate is a new row or an edit of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    Create,
    Update { id: u64 },
}

/// Unique values carried by a candidate record; `None` is not checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueValues<'a> {
    pub cnic: Option<&'a str>,
    pub email: Option<&'a str>,
    pub user_ref: Option<&'a str>,
}

impl<'a> From<&'a NewEmployee> for UniqueValues<'a> {
    fn from(employee: &'a NewEmployee) -> Self {
        Self {
            cnic: Some(&employee.cnic),
            email: Some(&employee.email),
            user_ref: employee.user_id.as_deref(),
        }
    }
}

impl<'a> From<&'a EmployeeChanges> for UniqueValues<'a> {
    fn from(changes: &'a EmployeeChanges) -> Self {
        Self {
            cnic: changes.cnic.as_deref(),
            email: changes.email.as_deref(),
            user_ref: changes.user_id.as_deref(),
        }
    }
}

/// Fails with a conflict on the first unique value already held by a live row.
pub async fn ensure_unique(
    repo: &dyn EmployeeRepository,
    values: UniqueValues<'_>,
    mode: CheckMode,
) -> AppResult<()> {
    let exclude_id = match mode {
        CheckMode::Create => None,
        CheckMode::Update { id } => Some(id),
    };

    let candidates = [
        (UniqueField::Cnic, values.cnic),
        (UniqueField::Email, values.email),
        (UniqueField::UserRef, values.user_ref),
    ];

    for (field, value) in candidates {
        let Some(value) = value else { continue };

        if repo.exists_by(field, value, exclude_id).await? {
            let message = match mode {
                CheckMode::Create => {
                    format!("Employee with {} {} already exists", field.label(), value)
                }
                CheckMode::Update { .. } => {
                    format!("{} {} is already used by another employee", field.label(), value)
                }
            };
            return Err(AppError::Conflict(message));
        }
    }

    Ok(())
}
