//! Static project catalog

use crate::core::security::SLUG_PATTERN;
use crate::utils::error::{GatewayError, Result};
use serde::Serialize;

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub tags: &'static [&'static str],
    pub year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

static PROJECTS: &[Project] = &[
    Project {
        slug: "folio-gateway",
        title: "Folio Gateway",
        summary: "The API behind this site: contact form, chat assistant and \
                  privacy-preserving analytics, with rate limiting shared across instances.",
        tags: &["rust", "actix-web", "redis"],
        year: 2024,
        url: None,
    },
    Project {
        slug: "edge-cache",
        title: "Edge Cache",
        summary: "A write-through cache in front of a slow inventory service, cutting p99 \
                  latency by an order of magnitude.",
        tags: &["caching", "performance"],
        year: 2023,
        url: None,
    },
    Project {
        slug: "design-system",
        title: "Design System",
        summary: "Component library and tokens shared by four product teams.",
        tags: &["frontend", "accessibility"],
        year: 2022,
        url: Some("https://example.com/design-system"),
    },
];

/// Read-only access to the catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectCatalog;

impl ProjectCatalog {
    pub fn all(&self) -> &'static [Project] {
        PROJECTS
    }

    /// Look up a project; invalid slugs are a bad request, unknown ones not found
    pub fn find(&self, slug: &str) -> Result<&'static Project> {
        if !SLUG_PATTERN.is_match(slug) {
            return Err(GatewayError::bad_request(
                "Project slug may only contain letters, digits, '-' and '_'",
            ));
        }
        PROJECTS
            .iter()
            .find(|p| p.slug == slug)
            .ok_or_else(|| GatewayError::not_found(format!("Project '{}' not found", slug)))
    }
}
