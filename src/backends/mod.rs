// Search backend module.
// Defines the trait for the external job search collaborator and its
// implementations. The tool never scrapes job boards itself; it hands a
// site list, role, and location to a backend and gets a table of postings.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::posting::ScrapedJob;
use crate::settings::SearchParams;

pub mod jobspy;

pub use jobspy::JobSpyBackend;

/// One search call: every enabled site, one role, one country.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub sites: Vec<String>,
    pub role: String,
    pub country: String,
    pub params: SearchParams,
}

/// Trait that all search backends must implement.
/// A backend either returns the postings it found or fails the whole call;
/// retry and pagination are its own concern.
#[async_trait]
pub trait JobSearch: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Run one search across the given sites, returning every posting found.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ScrapedJob>, AppError>;
}
