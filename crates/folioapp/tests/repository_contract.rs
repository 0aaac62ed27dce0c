//! The CRUD contract, run against every backend.

use folioapp::error::ErrorKind;
use folioapp::model::{Experience, PersonalInfo, Project, ProjectPatch, SkillCategory};
use folioapp::repository::{Repository, Singleton};
use folioapp::store::fs_backend::FsBackend;
use folioapp::store::mem_backend::MemBackend;
use folioapp::store::sqlite_backend::SqliteBackend;
use folioapp::store::StorageBackend;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

struct Harness {
    name: &'static str,
    backend: Arc<dyn StorageBackend>,
    _dir: Option<TempDir>,
}

fn backends() -> Vec<Harness> {
    let fs_dir = TempDir::new().unwrap();
    let sqlite_dir = TempDir::new().unwrap();
    let sqlite = SqliteBackend::open(sqlite_dir.path().join("folio.db")).unwrap();

    vec![
        Harness {
            name: "json",
            backend: Arc::new(FsBackend::new(fs_dir.path().to_path_buf())),
            _dir: Some(fs_dir),
        },
        Harness {
            name: "sqlite",
            backend: Arc::new(sqlite),
            _dir: Some(sqlite_dir),
        },
        Harness {
            name: "memory",
            backend: Arc::new(MemBackend::new()),
            _dir: None,
        },
    ]
}

fn project(title: &str) -> Project {
    Project {
        title: title.to_string(),
        description: "D".to_string(),
        image: "i.png".to_string(),
        technologies: vec!["X".to_string()],
        github: "g".to_string(),
        demo: None,
        featured: false,
    }
}

#[tokio::test]
async fn create_get_update_delete_on_every_backend() {
    for h in backends() {
        let repo: Repository<Project> = Repository::new(h.backend.clone());

        assert!(repo.get_all().await.unwrap().is_empty(), "{}", h.name);

        let created = repo.create(project("T")).await.unwrap();
        let fetched = repo.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched.as_ref(), Some(&created), "{}", h.name);

        let patch = ProjectPatch {
            featured: Some(true),
            ..Default::default()
        };
        let updated = repo.update(&created.id, &patch).await.unwrap();
        assert!(updated.data.featured, "{}", h.name);
        assert_eq!(updated.data.title, "T", "{}", h.name);
        assert_eq!(updated.created_at, created.created_at, "{}", h.name);
        assert!(updated.updated_at > created.updated_at, "{}", h.name);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none(), "{}", h.name);
        assert_eq!(
            repo.delete(&created.id).await.unwrap_err().kind(),
            ErrorKind::NotFound,
            "{}",
            h.name
        );
    }
}

#[tokio::test]
async fn newest_projects_list_first_and_categories_keep_insertion_order() {
    for h in backends() {
        let projects: Repository<Project> = Repository::new(h.backend.clone());
        let first = projects.create(project("first")).await.unwrap();
        let second = projects.create(project("second")).await.unwrap();
        let ids: Vec<_> = projects
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id], "{}", h.name);

        let categories: Repository<SkillCategory> = Repository::new(h.backend.clone());
        for title in ["a", "b", "c"] {
            categories
                .create(SkillCategory {
                    title: title.to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        let titles: Vec<_> = categories
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"], "{}", h.name);
    }
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    for h in backends() {
        let repo: Repository<Experience> = Repository::new(h.backend.clone());
        let mut ids = HashSet::new();
        for i in 0..20 {
            let record = repo
                .create(Experience {
                    title: format!("role {i}"),
                    ..Default::default()
                })
                .await
                .unwrap();
            ids.insert(record.id);
        }
        assert_eq!(ids.len(), 20, "{}", h.name);
    }
}

#[tokio::test]
async fn collections_do_not_leak_into_each_other() {
    for h in backends() {
        let projects: Repository<Project> = Repository::new(h.backend.clone());
        let experiences: Repository<Experience> = Repository::new(h.backend.clone());

        let created = projects.create(project("only")).await.unwrap();
        assert!(experiences.get_all().await.unwrap().is_empty(), "{}", h.name);
        assert!(
            experiences.get_by_id(&created.id).await.unwrap().is_none(),
            "{}",
            h.name
        );
    }
}

#[tokio::test]
async fn singleton_upsert_keeps_one_record() {
    for h in backends() {
        let singleton = Singleton::new(Repository::<PersonalInfo>::new(h.backend.clone()));
        assert!(singleton.get().await.unwrap().is_none(), "{}", h.name);

        singleton
            .upsert(PersonalInfo {
                name: "A".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        singleton
            .upsert(PersonalInfo {
                name: "B".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let all = singleton.repository().get_all().await.unwrap();
        assert_eq!(all.len(), 1, "{}", h.name);
        assert_eq!(all[0].data.name, "B", "{}", h.name);
    }
}

#[tokio::test]
async fn state_survives_reopening_the_store() {
    let dir = TempDir::new().unwrap();

    let id = {
        let backend = Arc::new(SqliteBackend::open(dir.path().join("folio.db")).unwrap());
        let repo: Repository<Project> = Repository::new(backend);
        repo.create(project("kept")).await.unwrap().id
    };
    let backend = Arc::new(SqliteBackend::open(dir.path().join("folio.db")).unwrap());
    let repo: Repository<Project> = Repository::new(backend);
    assert_eq!(
        repo.get_by_id(&id).await.unwrap().unwrap().data.title,
        "kept"
    );

    let id = {
        let repo: Repository<Project> = Repository::new(Arc::new(FsBackend::new(dir.path())));
        repo.create(project("also kept")).await.unwrap().id
    };
    let repo: Repository<Project> = Repository::new(Arc::new(FsBackend::new(dir.path())));
    assert_eq!(
        repo.get_by_id(&id).await.unwrap().unwrap().data.title,
        "also kept"
    );
}
