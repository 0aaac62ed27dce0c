//! Required-field checks.
//!
//! The repository stores any payload that has the right shape. Whether a
//! payload is *complete* is decided here, by the callers that accept input
//! (HTTP handlers and the CLI), before `create` or `upsert`.

use crate::error::{FolioError, Result};
use crate::model::{
    AboutInfo, ContactInfo, Content, Experience, PersonalInfo, Project, SiteSettings,
    SkillCategory,
};

pub trait Validate: Content {
    /// Camel-case names of required fields that are blank.
    fn missing_fields(&self) -> Vec<&'static str>;

    fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        Err(FolioError::validation(
            Self::COLLECTION,
            format!("missing required fields: {}", missing.join(", ")),
        ))
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn collect(fields: &[(&'static str, &String)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| *name)
        .collect()
}

impl Validate for Project {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", &self.title),
            ("description", &self.description),
            ("image", &self.image),
            ("github", &self.github),
        ])
    }
}

impl Validate for Experience {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("title", &self.title),
            ("company", &self.company),
            ("location", &self.location),
            ("period", &self.period),
        ])
    }
}

impl Validate for SkillCategory {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[("title", &self.title), ("icon", &self.icon)])
    }
}

impl Validate for PersonalInfo {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("name", &self.name),
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("socialLinks.email", &self.social_links.email),
        ])
    }
}

impl Validate for AboutInfo {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[("title", &self.title), ("description", &self.description)])
    }
}

impl Validate for ContactInfo {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[("email", &self.email), ("location", &self.location)])
    }
}

impl Validate for SiteSettings {
    fn missing_fields(&self) -> Vec<&'static str> {
        collect(&[
            ("siteName", &self.site_name),
            ("tagline", &self.tagline),
            ("description", &self.description),
        ])
    }
}
