use folioapp::api::FolioApi;
use folioapp::model::{ContactInfo, ContactInfoPatch, SkillCategory};
use folioapp::repository::Repository;
use folioapp::store::fs_backend::FsBackend;
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn setup() -> (TempDir, Arc<FsBackend>) {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(FsBackend::new(dir.path().to_path_buf()));
    (dir, backend)
}

fn read(dir: &TempDir, file: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.path().join(file)).unwrap()).unwrap()
}

#[tokio::test]
async fn reads_existing_site_data() {
    let (dir, backend) = setup();
    fs::write(
        dir.path().join("portfolio.json"),
        json!({
            "personalInfo": {
                "id": "1",
                "name": "Existing",
                "title": "Engineer",
                "description": "d",
                "typingTexts": ["a"],
                "location": "L",
                "socialLinks": {"email": "e@example.com"},
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z"
            },
            "skillCategories": [
                {"id": "s1", "title": "Languages", "icon": "💻", "skills": ["Rust"], "order": 2,
                 "createdAt": "2024-01-01T00:00:00.000Z", "updatedAt": "2024-01-01T00:00:00.000Z"}
            ]
        })
        .to_string(),
    )
    .unwrap();
    fs::write(dir.path().join("projects.json"), "[]").unwrap();

    let api = FolioApi::with_backend(backend);
    let portfolio = api.portfolio().await.unwrap();

    let info = portfolio.personal_info.unwrap();
    assert_eq!(info.id, "1");
    assert_eq!(info.data.name, "Existing");
    assert_eq!(info.data.social_links.email, "e@example.com");
    assert_eq!(portfolio.skill_categories.len(), 1);
    assert!(portfolio.about_info.is_none());
    assert!(portfolio.projects.is_empty());
    assert!(portfolio.experiences.is_empty());
}

#[tokio::test]
async fn writes_leave_other_sections_and_unknown_keys_alone() {
    let (dir, backend) = setup();
    fs::write(
        dir.path().join("portfolio.json"),
        json!({
            "aboutInfo": {"id": "a", "title": "About", "description": "x",
                          "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"},
            "customSection": {"keep": true}
        })
        .to_string(),
    )
    .unwrap();

    let categories: Repository<SkillCategory> = Repository::new(backend);
    categories
        .create(SkillCategory {
            title: "Tools".into(),
            icon: "🛠".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    let raw = read(&dir, "portfolio.json");
    assert_eq!(raw["aboutInfo"]["title"], "About");
    assert_eq!(raw["customSection"]["keep"], true);
    assert_eq!(raw["skillCategories"][0]["title"], "Tools");
}

#[tokio::test]
async fn upsert_merges_into_existing_contact_info() {
    let (dir, backend) = setup();
    let api = FolioApi::with_backend(backend);

    let created = api
        .contact_info()
        .upsert(ContactInfo {
            email: "a@example.com".into(),
            location: "Somewhere".into(),
            phone: Some("123".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let patch = ContactInfoPatch {
        email: Some("b@example.com".into()),
        ..Default::default()
    };
    api.contact_info().update(&created.id, &patch).await.unwrap();

    let raw = read(&dir, "portfolio.json");
    assert_eq!(raw["contactInfo"]["email"], "b@example.com");
    assert_eq!(raw["contactInfo"]["phone"], "123");
    assert_eq!(raw["contactInfo"]["id"], created.id.as_str());
}

#[tokio::test]
async fn no_temp_files_are_left_behind() {
    let (dir, backend) = setup();
    let api = FolioApi::with_backend(backend);
    api.seed(false).await.unwrap();

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
    assert!(read(&dir, "projects.json").is_array());
    assert!(read(&dir, "experiences.json").is_array());
    assert!(read(&dir, "portfolio.json")["siteSettings"].is_object());
}

#[tokio::test]
async fn contact_info_saved_without_base_fields_is_readable_and_editable() {
    let (dir, backend) = setup();
    fs::write(
        dir.path().join("portfolio.json"),
        json!({
            "contactInfo": {
                "email": "owner@example.com",
                "location": "Lisbon",
                "updatedAt": "2024-03-01T12:00:00.000Z"
            }
        })
        .to_string(),
    )
    .unwrap();
    let api = FolioApi::with_backend(backend);

    let portfolio = api.portfolio().await.unwrap();
    let contact = portfolio.contact_info.unwrap();
    assert_eq!(contact.id, "contact-info");
    assert_eq!(contact.data.email, "owner@example.com");
    assert_eq!(contact.created_at, contact.updated_at);

    let public = api.public_site().await;
    assert_eq!(public.contact_info.data.email, "owner@example.com");

    let saved = api
        .contact_info()
        .upsert(ContactInfo {
            email: "new@example.com".into(),
            location: "Porto".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(saved.id, "contact-info");
    assert_eq!(saved.created_at, contact.created_at);

    let raw = read(&dir, "portfolio.json");
    assert!(raw["contactInfo"].is_object());
    assert_eq!(raw["contactInfo"]["id"], "contact-info");
    assert_eq!(raw["contactInfo"]["email"], "new@example.com");
    assert_eq!(raw["contactInfo"]["createdAt"], "2024-03-01T12:00:00.000Z");
}
