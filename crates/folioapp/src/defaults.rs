//! Built-in content.
//!
//! Used two ways: the public view falls back to these when a section cannot be
//! read or is empty, and `seed` writes them into an empty store so a fresh
//! install has something to edit.

use crate::model::{
    AboutInfo, Analytics, ContactInfo, ContactSocialLinks, Experience, Highlight, PersonalInfo,
    PersonalSocialLinks, Project, Record, SiteSettings, Seo, SkillCategory, Theme,
};
use chrono::{DateTime, Utc};

/// Wrap built-in content as a record. Fallback records are never persisted,
/// so they get a stable `default-*` id and epoch timestamps.
pub fn fallback_record<T>(key: &str, data: T) -> Record<T> {
    Record {
        id: format!("default-{key}"),
        created_at: DateTime::<Utc>::UNIX_EPOCH,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
        data,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn personal_info() -> PersonalInfo {
    PersonalInfo {
        name: "Your Name".into(),
        title: "Software Engineer".into(),
        description: "I build reliable software and enjoy turning ideas into working products."
            .into(),
        typing_texts: strings(&["Software Engineer", "Open Source Contributor", "Problem Solver"]),
        profile_image: None,
        location: "Earth".into(),
        social_links: PersonalSocialLinks {
            github: Some("https://github.com/".into()),
            linkedin: None,
            twitter: None,
            email: "hello@example.com".into(),
        },
        resume_url: None,
    }
}

pub fn about_info() -> AboutInfo {
    AboutInfo {
        title: "About Me".into(),
        description: "A short introduction goes here. Edit it from the admin panel.".into(),
        highlights: vec![
            Highlight {
                icon: "💻".into(),
                text: "Clean, maintainable code".into(),
                color: "blue".into(),
            },
            Highlight {
                icon: "🚀".into(),
                text: "Shipping early and often".into(),
                color: "green".into(),
            },
            Highlight {
                icon: "🤝".into(),
                text: "Collaborative by default".into(),
                color: "purple".into(),
            },
        ],
    }
}

pub fn contact_info() -> ContactInfo {
    ContactInfo {
        email: "hello@example.com".into(),
        phone: None,
        location: "Earth".into(),
        social_links: ContactSocialLinks {
            github: Some("https://github.com/".into()),
            ..Default::default()
        },
        contact_form_email: None,
    }
}

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        site_name: "Portfolio".into(),
        tagline: "Projects, experience and contact details".into(),
        description: "A personal portfolio site.".into(),
        keywords: strings(&["portfolio", "software", "projects"]),
        favicon: None,
        logo: None,
        theme: Theme {
            primary_color: "#3b82f6".into(),
            secondary_color: "#8b5cf6".into(),
        },
        seo: Seo {
            title: "Portfolio".into(),
            description: "A personal portfolio site.".into(),
            image: None,
        },
        analytics: Some(Analytics::default()),
    }
}

pub fn skill_categories() -> Vec<SkillCategory> {
    vec![
        SkillCategory {
            title: "Languages".into(),
            icon: "💻".into(),
            skills: strings(&["Rust", "TypeScript", "Python", "SQL"]),
            order: 1,
        },
        SkillCategory {
            title: "Frameworks".into(),
            icon: "🧩".into(),
            skills: strings(&["Axum", "Tokio", "React"]),
            order: 2,
        },
        SkillCategory {
            title: "Tools".into(),
            icon: "🛠".into(),
            skills: strings(&["Git", "Docker", "Linux"]),
            order: 3,
        },
    ]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            title: "Sample Project".into(),
            description: "Describe what the project does and what you learned building it."
                .into(),
            image: "/images/project-placeholder.png".into(),
            technologies: strings(&["Rust", "SQLite"]),
            github: "https://github.com/".into(),
            demo: None,
            featured: true,
        },
        Project {
            title: "Another Project".into(),
            description: "A second example entry. Replace or delete it from the admin panel."
                .into(),
            image: "/images/project-placeholder.png".into(),
            technologies: strings(&["TypeScript"]),
            github: "https://github.com/".into(),
            demo: None,
            featured: false,
        },
    ]
}

pub fn experiences() -> Vec<Experience> {
    vec![Experience {
        title: "Software Engineer".into(),
        company: "Example Co.".into(),
        location: "Remote".into(),
        period: "2023 - Present".into(),
        description: strings(&[
            "Built and maintained backend services.",
            "Worked closely with product and design.",
        ]),
        technologies: strings(&["Rust", "PostgreSQL"]),
        featured: true,
    }]
}
