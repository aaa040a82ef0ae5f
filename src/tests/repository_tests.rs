use super::support::*;
use crate::{
    model::employee::NewEmployee,
    repository::{EmployeeRepository, UniqueField},
    utils::validation::validate_new_employee,
};

const ACTOR: u64 = 7;

fn new_employee() -> NewEmployee {
    let mut new = validate_new_employee(&valid_form(), today()).unwrap();
    new.user_id = Some("EMP-001".into());
    new
}

#[actix_web::test]
async fn unique_field_lookup_skips_deleted_rows() {
    let repo = InMemoryEmployeeRepository::default();
    let created = repo.create(&new_employee(), ACTOR).await.unwrap();

    let by_cnic = repo
        .get_by_unique_field(UniqueField::Cnic, "35202-1234567-1")
        .await
        .unwrap();
    assert_eq!(by_cnic.map(|e| e.employee_id), Some(created.employee_id));
    assert!(repo
        .get_by_unique_field(UniqueField::UserRef, "EMP-001")
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .get_by_unique_field(UniqueField::Email, "someone@else.com")
        .await
        .unwrap()
        .is_none());

    assert!(repo.soft_delete(created.employee_id, ACTOR).await.unwrap());

    for (field, value) in [
        (UniqueField::Cnic, "35202-1234567-1"),
        (UniqueField::Email, "john.doe@company.com"),
        (UniqueField::UserRef, "EMP-001"),
    ] {
        assert!(repo.get_by_unique_field(field, value).await.unwrap().is_none());
    }
}

#[actix_web::test]
async fn exists_is_false_once_soft_deleted() {
    let repo = InMemoryEmployeeRepository::default();
    let created = repo.create(&new_employee(), ACTOR).await.unwrap();

    assert!(repo.exists(created.employee_id).await.unwrap());
    assert!(!repo.exists(created.employee_id + 1).await.unwrap());

    repo.soft_delete(created.employee_id, ACTOR).await.unwrap();
    assert!(!repo.exists(created.employee_id).await.unwrap());
    assert_eq!(repo.all_rows().len(), 1);
}

#[actix_web::test]
async fn hard_delete_removes_soft_deleted_rows_too() {
    let repo = InMemoryEmployeeRepository::default();
    let created = repo.create(&new_employee(), ACTOR).await.unwrap();
    repo.soft_delete(created.employee_id, ACTOR).await.unwrap();

    assert!(repo.hard_delete(created.employee_id).await.unwrap());
    assert!(repo.all_rows().is_empty());
    assert!(!repo.hard_delete(created.employee_id).await.unwrap());
}
