use super::Registry;
use crate::domain::{
    BeneficiaryDraft, Entity, Gender, ProjectCategory, ProjectDraft, RegistryError, Suffix,
    ValidationError, Verdict,
};
use crate::infra::db::Database;

fn setup() -> (Database, Registry) {
    let db = Database::open_in_memory().expect("in-memory database");
    let registry = Registry::new(&db);
    (db, registry)
}

fn skills_training() -> ProjectDraft {
    ProjectDraft::new("Skills Training", "SKILLS TRAINING PROGRAM REGISTRATION")
}

#[test]
fn login_matches_seeded_account_only() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    assert!(registry.validate_login("admin", "admin123")?);
    assert!(!registry.validate_login("admin", "admin")?);
    assert!(!registry.validate_login("ADMIN", "admin123")?);
    assert!(!registry.validate_login("", "")?);
    Ok(())
}

#[test]
fn second_identical_project_is_reported_duplicate() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let draft = skills_training();

    assert!(registry.validate_project(&draft, None)?.is_accepted());
    registry.add_project(&draft)?;

    let verdict = registry.validate_project(&draft, None)?;
    assert_eq!(verdict, Verdict::Rejected(ValidationError::DuplicateProject));
    assert_eq!(registry.get_projects_list()?.len(), 1);
    Ok(())
}

#[test]
fn project_round_trip_trims_and_fills_blanks() -> anyhow::Result<()> {
    let (_db, registry) = setup();

    let id = registry.add_project(&ProjectDraft::new(
        "  Skills Training  ",
        " SKILLS TRAINING PROGRAM REGISTRATION ",
    ))?;
    let project = registry.get_project_by_id(id)?.expect("stored");
    assert_eq!(project.name, "Skills Training");
    assert_eq!(
        project.category_label(),
        "SKILLS TRAINING PROGRAM REGISTRATION"
    );

    let blank = registry.add_project(&ProjectDraft::new(" ", ""))?;
    let project = registry.get_project_by_id(blank)?.expect("stored");
    assert_eq!(project.name, "-");
    assert_eq!(project.category_label(), "-");

    let map = registry.get_projects_map()?;
    assert_eq!(map.len(), 2);
    assert_eq!(map[&id], "Skills Training");
    Ok(())
}

#[test]
fn editing_project_to_its_own_values_is_accepted() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let id = registry.save_project(None, &skills_training())?;
    let other = registry.save_project(
        None,
        &ProjectDraft::new("Welding", "SKILLS TRAINING PROGRAM REGISTRATION"),
    )?;

    assert_eq!(registry.save_project(Some(id), &skills_training())?, id);

    let err = registry
        .save_project(Some(other), &skills_training())
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::DuplicateProject)
    ));
    Ok(())
}

#[test]
fn edit_and_delete_of_missing_ids_are_reported() -> anyhow::Result<()> {
    let (_db, registry) = setup();

    let err = registry
        .edit_project(404, &skills_training())
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            entity: Entity::Project,
            id: 404
        }
    ));
    assert!(matches!(
        registry.delete_project(404),
        Err(RegistryError::NotFound { .. })
    ));

    let draft = BeneficiaryDraft::new("DELACRUZ", "JUAN").with_project(1);
    assert!(matches!(
        registry.edit_beneficiary(7, &draft),
        Err(RegistryError::NotFound {
            entity: Entity::Beneficiary,
            id: 7
        })
    ));
    assert!(matches!(
        registry.delete_beneficiary(7),
        Err(RegistryError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn project_with_beneficiaries_cannot_be_deleted() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let project_id = registry.save_project(None, &skills_training())?;
    let beneficiary_id = registry.save_beneficiary(
        None,
        &BeneficiaryDraft::new("DELACRUZ", "JUAN").with_project(project_id),
    )?;

    let err = registry.delete_project(project_id).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::ProjectInUse {
            beneficiaries: 1,
            ..
        }
    ));
    assert!(registry.get_project_by_id(project_id)?.is_some());

    registry.delete_beneficiary(beneficiary_id)?;
    registry.delete_project(project_id)?;
    assert!(registry.get_project_by_id(project_id)?.is_none());
    Ok(())
}

#[test]
fn duplicate_beneficiary_is_rejected() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let project_id = registry.save_project(None, &skills_training())?;

    let tuples = [
        ("DELACRUZ", "JUAN", "", None),
        ("SANTOS", "MARIA", "REYES", Some(Suffix::Senior)),
        ("LIM", "ANA", "CO", Some(Suffix::ThirdOrLater)),
    ];
    for (lname, fname, mname, suffix) in tuples {
        let mut draft = BeneficiaryDraft::new(lname, fname)
            .with_mname(mname)
            .with_project(project_id);
        draft.suffix = suffix;

        assert!(registry.validate_beneficiary(&draft, None)?.is_accepted());
        registry.add_beneficiary(&draft)?;

        let verdict = registry.validate_beneficiary(&draft, None)?;
        assert_eq!(verdict.message(), "Duplicate beneficiary exists.");

        // Surrounding whitespace does not make a new person.
        let padded = BeneficiaryDraft {
            lname: format!(" {lname} "),
            mname: format!("{mname}  "),
            ..draft.clone()
        };
        assert!(!registry.validate_beneficiary(&padded, None)?.is_accepted());
    }
    Ok(())
}

#[test]
fn editing_beneficiary_excludes_itself() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let project_id = registry.save_project(None, &skills_training())?;
    let draft = BeneficiaryDraft::new("DELACRUZ", "JUAN").with_project(project_id);
    let id = registry.save_beneficiary(None, &draft)?;
    assert_eq!(id, 1);

    let verdict = registry.validate_beneficiary(&draft, Some(1))?;
    assert!(verdict.is_accepted());
    assert_eq!(verdict.message(), "");

    let updated = draft.clone().with_gender(Gender::Male).with_contactno("0917");
    assert_eq!(registry.save_beneficiary(Some(id), &updated)?, id);
    let stored = registry.get_beneficiary_by_id(id)?.expect("stored");
    assert_eq!(stored.gender, Some(Gender::Male));
    assert_eq!(stored.contactno.as_deref(), Some("0917"));

    let other = registry.save_beneficiary(
        None,
        &BeneficiaryDraft::new("REYES", "ANA").with_project(project_id),
    )?;
    let err = registry.save_beneficiary(Some(other), &draft).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Validation(ValidationError::DuplicateBeneficiary)
    ));
    Ok(())
}

#[test]
fn deleted_project_is_an_invalid_reference() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let project_id = registry.save_project(None, &skills_training())?;
    registry.delete_project(project_id)?;

    let draft = BeneficiaryDraft::new("DELACRUZ", "JUAN").with_project(project_id);
    let verdict = registry.validate_beneficiary(&draft, None)?;
    assert_eq!(
        verdict,
        Verdict::Rejected(ValidationError::UnknownProject(project_id))
    );
    assert_eq!(verdict.message(), "Invalid project selected.");
    Ok(())
}

#[test]
fn empty_optional_fields_list_as_dash() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let project_id = registry.save_project(None, &skills_training())?;
    let id = registry.add_beneficiary(
        &BeneficiaryDraft::new("DELACRUZ", "JUAN")
            .with_mname("   ")
            .with_project(project_id),
    )?;

    let stored = registry.get_beneficiary_by_id(id)?.expect("stored");
    assert_eq!(stored.mname, None);
    assert_eq!(stored.street, None);

    let rows = registry.get_beneficiaries()?;
    assert_eq!(rows.len(), 1);
    for column in &rows[0].text_columns()[2..] {
        assert_eq!(*column, "-");
    }
    assert_eq!(rows[0].project_id, Some(project_id));
    Ok(())
}

#[test]
fn search_filters_roster_and_projects() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let rice = registry.save_project(
        None,
        &ProjectDraft::new("Rice Retail", ProjectCategory::LivelihoodAssistance.label()),
    )?;
    let spes = registry.save_project(
        None,
        &ProjectDraft::new("Summer Jobs", ProjectCategory::Spes.label()),
    )?;
    registry.save_beneficiary(
        None,
        &BeneficiaryDraft::new("DELACRUZ", "JUAN")
            .with_address("RIZAL ST.", "POBLACION")
            .with_project(rice),
    )?;
    registry.save_beneficiary(
        None,
        &BeneficiaryDraft::new("REYES", "ANA").with_project(spes),
    )?;

    assert_eq!(registry.search_beneficiaries("")?.len(), 2);
    let hits = registry.search_beneficiaries("poblacion")?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].row.lname, "DELACRUZ");
    assert_eq!(hits[0].project_name, "Rice Retail");

    let hits = registry.search_beneficiaries("summer")?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].row.lname, "REYES");

    assert_eq!(registry.search_projects("livelihood")?.len(), 1);
    assert_eq!(registry.search_projects("")?.len(), 2);
    assert_eq!(registry.count_beneficiaries_for_project(rice)?, 1);
    Ok(())
}

#[test]
fn blank_names_reported_before_missing_project() -> anyhow::Result<()> {
    let (_db, registry) = setup();
    let err = registry
        .save_beneficiary(None, &BeneficiaryDraft::new("", "JUAN"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Last name and First name are required.");

    let err = registry
        .save_beneficiary(None, &BeneficiaryDraft::new("DELACRUZ", "JUAN"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Please select a valid project.");
    assert!(registry.get_beneficiaries()?.is_empty());
    Ok(())
}

#[test]
fn poisoned_connection_is_a_storage_fault() {
    let (db, registry) = setup();
    let conn = db.connection();
    let _ = std::thread::spawn(move || {
        let _guard = conn.lock().unwrap();
        panic!("panic while holding the connection");
    })
    .join();

    let err = registry.get_projects_list().unwrap_err();
    assert!(matches!(err, RegistryError::Storage(_)));
    assert!(!err.is_user_correctable());

    let err = registry
        .save_project(None, &skills_training())
        .unwrap_err();
    assert!(matches!(err, RegistryError::Storage(_)));
}
