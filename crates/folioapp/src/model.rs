//! Content types.
//!
//! Every stored record is a [`Record<T>`]: the repository-owned base fields
//! (`id`, `createdAt`, `updatedAt`) with the payload `T` flattened beside them.
//! Field names serialize in camelCase so the JSON files stay readable by the
//! site front end.
//!
//! Payload structs default every missing field on read, so older documents
//! with fewer fields still load. Unset optional payload fields serialize as
//! `null`, so saving a full payload over a stored record clears them. Patch
//! types omit absent fields instead. Required-field checks live in
//! [`crate::validate`], not here.

use crate::store::Collection;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Base fields assigned by the repository. Never taken from a payload.
pub const BASE_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

/// A payload type stored in one [`Collection`].
pub trait Content: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Partial form of the payload: every field optional, absent fields
    /// untouched by an update.
    type Patch: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static;
}

// --- Singletons ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalSocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub email: String,
}

/// Hero section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Phrases cycled by the typing animation.
    pub typing_texts: Vec<String>,
    pub profile_image: Option<String>,
    pub location: String,
    pub social_links: PersonalSocialLinks,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typing_texts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<PersonalSocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

impl Content for PersonalInfo {
    const COLLECTION: Collection = Collection::PersonalInfo;
    type Patch = PersonalInfoPatch;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Highlight {
    /// Icon name or emoji.
    pub icon: String,
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutInfo {
    pub title: String,
    pub description: String,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInfoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<Highlight>>,
}

impl Content for AboutInfo {
    const COLLECTION: Collection = Collection::AboutInfo;
    type Patch = AboutInfoPatch;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: Option<String>,
    pub location: String,
    pub social_links: ContactSocialLinks,
    /// Address that receives contact form submissions.
    pub contact_form_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<ContactSocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_form_email: Option<String>,
}

impl Content for ContactInfo {
    const COLLECTION: Collection = Collection::ContactInfo;
    type Patch = ContactInfoPatch;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub google_analytics_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub favicon: Option<String>,
    pub logo: Option<String>,
    pub theme: Theme,
    pub seo: Seo,
    pub analytics: Option<Analytics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
}

impl Content for SiteSettings {
    const COLLECTION: Collection = Collection::SiteSettings;
    type Patch = SiteSettingsPatch;
}

// --- Keyed collections ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillCategory {
    pub title: String,
    /// Emoji or icon name.
    pub icon: String,
    pub skills: Vec<String>,
    /// Sort key for the public skills section (ascending).
    pub order: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Content for SkillCategory {
    const COLLECTION: Collection = Collection::SkillCategories;
    type Patch = SkillCategoryPatch;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub github: String,
    pub demo: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Content for Project {
    const COLLECTION: Collection = Collection::Projects;
    type Patch = ProjectPatch;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    /// Free-form, e.g. "Mar 2025 - May 2025".
    pub period: String,
    pub description: Vec<String>,
    pub technologies: Vec<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Content for Experience {
    const COLLECTION: Collection = Collection::Experiences;
    type Patch = ExperiencePatch;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn record_flattens_payload_in_camel_case() {
        let record = Record {
            id: "p1".to_string(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            data: Project {
                title: "T".into(),
                technologies: vec!["Rust".into()],
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["title"], "T");
        assert_eq!(value["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value.get("demo"), Some(&Value::Null));
        assert!(value.get("data").is_none());
    }

    #[test]
    fn older_documents_load_with_defaults() {
        let stored = json!({
            "id": "x",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-01T10:00:00.000Z",
            "title": "Languages",
            "legacyField": true
        });
        let record: Record<SkillCategory> = serde_json::from_value(stored).unwrap();
        assert_eq!(record.data.title, "Languages");
        assert!(record.data.skills.is_empty());
        assert_eq!(record.data.order, 0);
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = PersonalInfoPatch {
            name: Some("B".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"name": "B"}));
    }
}
