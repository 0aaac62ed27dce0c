//! # API Facade
//!
//! [`FolioApi`] is the single entry point for every UI (the HTTP server and the
//! CLI). It owns one repository per content type, all sharing one backend and
//! one clock, and adds the read models the site needs on top of plain CRUD.
//!
//! ## Role and Responsibilities
//!
//! - **Hands out** typed repositories (`projects()`, `personal_info()`, ...)
//! - **Aggregates** every section into one [`Portfolio`] document
//! - **Falls back** to built-in content for the public view ([`PublicSite`])
//! - **Counts** content for the admin dashboard ([`Dashboard`])
//! - **Seeds** an empty store with built-in content
//!
//! ## What the API Does NOT Do
//!
//! - **Authorization**: callers check [`crate::auth::AdminGate`] first
//! - **Required-field validation**: callers run [`crate::validate::Validate`]
//! - **Presentation**: returns data structures, never strings
//!
//! ## Runtime-selected collections
//!
//! The CLI names collections at runtime. `list_values`, `get_value` and
//! `delete` dispatch on [`Collection`] and work with plain JSON so callers do
//! not need to know the payload type.

use crate::clock::{Clock, SystemClock};
use crate::defaults::{self, fallback_record};
use crate::error::Result;
use crate::model::{
    AboutInfo, ContactInfo, Content, Experience, PersonalInfo, Project, Record, SiteSettings,
    SkillCategory,
};
use crate::repository::{Repository, Singleton};
use crate::store::{Collection, StorageBackend};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Every section, as stored. Absent singletons are `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub personal_info: Option<Record<PersonalInfo>>,
    pub about_info: Option<Record<AboutInfo>>,
    pub skill_categories: Vec<Record<SkillCategory>>,
    pub contact_info: Option<Record<ContactInfo>>,
    pub site_settings: Option<Record<SiteSettings>>,
    pub projects: Vec<Record<Project>>,
    pub experiences: Vec<Record<Experience>>,
}

/// What visitors see. Every section is present; skill categories are sorted
/// by `order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSite {
    pub personal_info: Record<PersonalInfo>,
    pub about_info: Record<AboutInfo>,
    pub skill_categories: Vec<Record<SkillCategory>>,
    pub contact_info: Record<ContactInfo>,
    pub site_settings: Record<SiteSettings>,
    pub projects: Vec<Record<Project>>,
    pub featured_projects: Vec<Record<Project>>,
    pub experiences: Vec<Record<Experience>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: usize,
    pub featured: usize,
    pub regular: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredSections {
    pub personal_info: bool,
    pub about_info: bool,
    pub contact_info: bool,
    pub site_settings: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub projects: ProjectStats,
    pub experiences: usize,
    pub skill_categories: usize,
    pub configured: ConfiguredSections,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedEntry {
    pub collection: Collection,
    pub created: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub entries: Vec<SeedEntry>,
}

impl SeedReport {
    pub fn total_written(&self) -> usize {
        self.entries.iter().map(|e| e.created + e.updated).sum()
    }
}

/// Dispatch a generic method over a runtime [`Collection`].
macro_rules! for_collection {
    ($collection:expr, $self:ident . $method:ident ( $($arg:expr),* )) => {
        match $collection {
            Collection::PersonalInfo => $self.$method::<PersonalInfo>($($arg),*).await,
            Collection::AboutInfo => $self.$method::<AboutInfo>($($arg),*).await,
            Collection::ContactInfo => $self.$method::<ContactInfo>($($arg),*).await,
            Collection::SiteSettings => $self.$method::<SiteSettings>($($arg),*).await,
            Collection::SkillCategories => $self.$method::<SkillCategory>($($arg),*).await,
            Collection::Projects => $self.$method::<Project>($($arg),*).await,
            Collection::Experiences => $self.$method::<Experience>($($arg),*).await,
        }
    };
}

#[derive(Clone)]
pub struct FolioApi {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    timeout: Option<Duration>,
    personal_info: Singleton<PersonalInfo>,
    about_info: Singleton<AboutInfo>,
    contact_info: Singleton<ContactInfo>,
    site_settings: Singleton<SiteSettings>,
    skill_categories: Repository<SkillCategory>,
    projects: Repository<Project>,
    experiences: Repository<Experience>,
}

impl FolioApi {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            personal_info: Singleton::new(build(&backend, &clock, timeout)),
            about_info: Singleton::new(build(&backend, &clock, timeout)),
            contact_info: Singleton::new(build(&backend, &clock, timeout)),
            site_settings: Singleton::new(build(&backend, &clock, timeout)),
            skill_categories: build(&backend, &clock, timeout),
            projects: build(&backend, &clock, timeout),
            experiences: build(&backend, &clock, timeout),
            backend,
            clock,
            timeout,
        }
    }

    /// Wall clock, no timeout.
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self::new(backend, Arc::new(SystemClock), None)
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    /// A repository for any content type, sharing this API's backend and clock.
    pub fn repository<T: Content>(&self) -> Repository<T> {
        build(&self.backend, &self.clock, self.timeout)
    }

    pub fn singleton<T: Content>(&self) -> Singleton<T> {
        Singleton::new(self.repository())
    }

    pub fn personal_info(&self) -> &Singleton<PersonalInfo> {
        &self.personal_info
    }

    pub fn about_info(&self) -> &Singleton<AboutInfo> {
        &self.about_info
    }

    pub fn contact_info(&self) -> &Singleton<ContactInfo> {
        &self.contact_info
    }

    pub fn site_settings(&self) -> &Singleton<SiteSettings> {
        &self.site_settings
    }

    pub fn skill_categories(&self) -> &Repository<SkillCategory> {
        &self.skill_categories
    }

    pub fn projects(&self) -> &Repository<Project> {
        &self.projects
    }

    pub fn experiences(&self) -> &Repository<Experience> {
        &self.experiences
    }

    /// Every section in one document. The first failing read fails the whole
    /// aggregate.
    pub async fn portfolio(&self) -> Result<Portfolio> {
        Ok(Portfolio {
            personal_info: self.personal_info.get().await?,
            about_info: self.about_info.get().await?,
            skill_categories: self.skill_categories.get_all().await?,
            contact_info: self.contact_info.get().await?,
            site_settings: self.site_settings.get().await?,
            projects: self.projects.get_all().await?,
            experiences: self.experiences.get_all().await?,
        })
    }

    /// The visitor view. Never fails: unreadable or empty sections are
    /// replaced by built-in content.
    pub async fn public_site(&self) -> PublicSite {
        let personal_info =
            singleton_or_default(&self.personal_info, defaults::personal_info).await;
        let about_info = singleton_or_default(&self.about_info, defaults::about_info).await;
        let contact_info = singleton_or_default(&self.contact_info, defaults::contact_info).await;
        let site_settings =
            singleton_or_default(&self.site_settings, defaults::site_settings).await;

        let mut skill_categories =
            list_or_default(&self.skill_categories, defaults::skill_categories).await;
        skill_categories.sort_by_key(|record| record.data.order);

        let projects = list_or_default(&self.projects, defaults::projects).await;
        let featured_projects = projects
            .iter()
            .filter(|record| record.data.featured)
            .cloned()
            .collect();
        let experiences = list_or_default(&self.experiences, defaults::experiences).await;

        PublicSite {
            personal_info,
            about_info,
            skill_categories,
            contact_info,
            site_settings,
            projects,
            featured_projects,
            experiences,
        }
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let projects = self.projects.get_all().await?;
        let featured = projects.iter().filter(|p| p.data.featured).count();

        Ok(Dashboard {
            projects: ProjectStats {
                total: projects.len(),
                featured,
                regular: projects.len() - featured,
            },
            experiences: self.experiences.get_all().await?.len(),
            skill_categories: self.skill_categories.get_all().await?.len(),
            configured: ConfiguredSections {
                personal_info: self.personal_info.get().await?.is_some(),
                about_info: self.about_info.get().await?.is_some(),
                contact_info: self.contact_info.get().await?.is_some(),
                site_settings: self.site_settings.get().await?.is_some(),
            },
        })
    }

    /// Write built-in content into empty collections. With `force`, existing
    /// singletons are overwritten too; keyed collections that already hold
    /// records are always left alone.
    pub async fn seed(&self, force: bool) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        report
            .entries
            .push(seed_singleton(&self.personal_info, defaults::personal_info(), force).await?);
        report
            .entries
            .push(seed_singleton(&self.about_info, defaults::about_info(), force).await?);
        report
            .entries
            .push(seed_singleton(&self.contact_info, defaults::contact_info(), force).await?);
        report
            .entries
            .push(seed_singleton(&self.site_settings, defaults::site_settings(), force).await?);
        report
            .entries
            .push(seed_collection(&self.skill_categories, defaults::skill_categories()).await?);
        report
            .entries
            .push(seed_collection(&self.projects, defaults::projects()).await?);
        report
            .entries
            .push(seed_collection(&self.experiences, defaults::experiences()).await?);

        tracing::info!(written = report.total_written(), force, "seed finished");
        Ok(report)
    }

    pub async fn list_values(&self, collection: Collection) -> Result<Vec<Value>> {
        for_collection!(collection, self.list_values_of())
    }

    pub async fn get_value(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        for_collection!(collection, self.get_value_of(id))
    }

    pub async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        for_collection!(collection, self.delete_of(id))
    }

    async fn list_values_of<T: Content>(&self) -> Result<Vec<Value>> {
        self.repository::<T>()
            .get_all()
            .await?
            .iter()
            .map(|record| serde_json::to_value(record).map_err(Into::into))
            .collect()
    }

    async fn get_value_of<T: Content>(&self, id: &str) -> Result<Option<Value>> {
        match self.repository::<T>().get_by_id(id).await? {
            Some(record) => Ok(Some(serde_json::to_value(&record)?)),
            None => Ok(None),
        }
    }

    async fn delete_of<T: Content>(&self, id: &str) -> Result<()> {
        self.repository::<T>().delete(id).await
    }
}

fn build<T: Content>(
    backend: &Arc<dyn StorageBackend>,
    clock: &Arc<dyn Clock>,
    timeout: Option<Duration>,
) -> Repository<T> {
    Repository::new(Arc::clone(backend))
        .with_clock(Arc::clone(clock))
        .with_timeout(timeout)
}

async fn singleton_or_default<T: Content>(
    singleton: &Singleton<T>,
    fallback: fn() -> T,
) -> Record<T> {
    let key = T::COLLECTION.slug();
    match singleton.get().await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::warn!(collection = key, "section is empty; serving built-in content");
            fallback_record(key, fallback())
        }
        Err(e) => {
            tracing::warn!(collection = key, error = %e, "section unreadable; serving built-in content");
            fallback_record(key, fallback())
        }
    }
}

async fn list_or_default<T: Content>(
    repo: &Repository<T>,
    fallback: fn() -> Vec<T>,
) -> Vec<Record<T>> {
    let key = T::COLLECTION.slug();
    let records = match repo.get_all().await {
        Ok(records) if !records.is_empty() => return records,
        Ok(_) => {
            tracing::warn!(collection = key, "collection is empty; serving built-in content");
            fallback()
        }
        Err(e) => {
            tracing::warn!(collection = key, error = %e, "collection unreadable; serving built-in content");
            fallback()
        }
    };
    records
        .into_iter()
        .enumerate()
        .map(|(i, data)| fallback_record(&format!("{key}-{}", i + 1), data))
        .collect()
}

async fn seed_singleton<T: Content>(
    singleton: &Singleton<T>,
    data: T,
    force: bool,
) -> Result<SeedEntry> {
    let mut entry = SeedEntry {
        collection: T::COLLECTION,
        created: 0,
        updated: 0,
    };
    match singleton.get().await? {
        None => {
            singleton.repository().create(data).await?;
            entry.created = 1;
        }
        Some(existing) if force => {
            singleton.update(&existing.id, &data).await?;
            entry.updated = 1;
        }
        Some(_) => {}
    }
    Ok(entry)
}

async fn seed_collection<T: Content>(repo: &Repository<T>, items: Vec<T>) -> Result<SeedEntry> {
    let mut entry = SeedEntry {
        collection: T::COLLECTION,
        created: 0,
        updated: 0,
    };
    if !repo.get_all().await?.is_empty() {
        return Ok(entry);
    }
    // Prepend collections list newest first; create in reverse so the stored
    // order matches the built-in order.
    let items: Vec<T> = match T::COLLECTION.placement() {
        crate::store::Placement::Prepend => items.into_iter().rev().collect(),
        crate::store::Placement::Append => items,
    };
    for item in items {
        repo.create(item).await?;
        entry.created += 1;
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::mem_backend::MemBackend;
    use chrono::{DateTime, Utc};

    fn api() -> (FolioApi, Arc<MemBackend>) {
        let backend = Arc::new(MemBackend::new());
        let clock = Arc::new(ManualClock::at(DateTime::<Utc>::UNIX_EPOCH));
        (FolioApi::new(backend.clone(), clock, None), backend)
    }

    fn project(title: &str, featured: bool) -> Project {
        Project {
            title: title.into(),
            featured,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn portfolio_of_empty_store_has_null_singletons() {
        let (api, _) = api();
        let portfolio = api.portfolio().await.unwrap();
        assert!(portfolio.personal_info.is_none());
        assert!(portfolio.projects.is_empty());

        let value = serde_json::to_value(&portfolio).unwrap();
        assert!(value["personalInfo"].is_null());
        assert!(value["skillCategories"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn portfolio_propagates_backend_errors() {
        let (api, backend) = api();
        backend.set_simulate_read_error(true);
        assert!(api.portfolio().await.is_err());
    }

    #[tokio::test]
    async fn public_site_falls_back_per_section() {
        let (api, backend) = api();
        api.projects().create(project("Mine", true)).await.unwrap();

        let site = api.public_site().await;
        assert_eq!(site.projects.len(), 1);
        assert_eq!(site.projects[0].data.title, "Mine");
        assert_eq!(site.personal_info.id, "default-personal-info");
        assert!(!site.experiences.is_empty());

        backend.set_simulate_read_error(true);
        let site = api.public_site().await;
        assert_eq!(site.projects.len(), defaults::projects().len());
        assert!(site.projects.iter().all(|p| p.id.starts_with("default-")));
    }

    #[tokio::test]
    async fn public_site_sorts_skills_and_picks_featured() {
        let (api, _) = api();
        for (title, order) in [("c", 3), ("a", 1), ("b", 2)] {
            api.skill_categories()
                .create(SkillCategory {
                    title: title.into(),
                    icon: "x".into(),
                    order,
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        api.projects().create(project("plain", false)).await.unwrap();
        api.projects().create(project("star", true)).await.unwrap();

        let site = api.public_site().await;
        let titles: Vec<_> = site
            .skill_categories
            .iter()
            .map(|r| r.data.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(site.featured_projects.len(), 1);
        assert_eq!(site.featured_projects[0].data.title, "star");

        // admin view keeps storage order
        let stored: Vec<_> = api
            .skill_categories()
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data.title)
            .collect();
        assert_eq!(stored, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn dashboard_counts_projects() {
        let (api, _) = api();
        api.projects().create(project("a", true)).await.unwrap();
        api.projects().create(project("b", false)).await.unwrap();
        api.projects().create(project("c", false)).await.unwrap();
        api.personal_info()
            .upsert(defaults::personal_info())
            .await
            .unwrap();

        let dashboard = api.dashboard().await.unwrap();
        assert_eq!(
            dashboard.projects,
            ProjectStats {
                total: 3,
                featured: 1,
                regular: 2
            }
        );
        assert!(dashboard.configured.personal_info);
        assert!(!dashboard.configured.site_settings);
    }

    #[tokio::test]
    async fn seed_fills_empty_store_once() {
        let (api, _) = api();
        let first = api.seed(false).await.unwrap();
        assert!(first.total_written() > 0);

        let projects = api.projects().get_all().await.unwrap();
        let expected: Vec<_> = defaults::projects().into_iter().map(|p| p.title).collect();
        let stored: Vec<_> = projects.into_iter().map(|r| r.data.title).collect();
        assert_eq!(stored, expected);

        let second = api.seed(false).await.unwrap();
        assert_eq!(second.total_written(), 0);
    }

    #[tokio::test]
    async fn forced_seed_overwrites_singletons_only() {
        let (api, _) = api();
        api.personal_info()
            .upsert(PersonalInfo {
                name: "Custom".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        api.projects().create(project("keep", false)).await.unwrap();

        let report = api.seed(true).await.unwrap();
        let personal = report
            .entries
            .iter()
            .find(|e| e.collection == Collection::PersonalInfo)
            .unwrap();
        assert_eq!(personal.updated, 1);

        let info = api.personal_info().get().await.unwrap().unwrap();
        assert_eq!(info.data.name, defaults::personal_info().name);
        assert_eq!(api.projects().get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn runtime_dispatch_matches_typed_access() {
        let (api, _) = api();
        let created = api.projects().create(project("x", false)).await.unwrap();

        let listed = api.list_values(Collection::Projects).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], created.id.as_str());

        let shown = api
            .get_value(Collection::Projects, &created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shown["title"], "x");

        api.delete(Collection::Projects, &created.id).await.unwrap();
        assert!(api
            .get_value(Collection::Projects, &created.id)
            .await
            .unwrap()
            .is_none());
    }
}
