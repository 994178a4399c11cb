//! Supabase adapters: GoTrue identity and object storage.
//!
//! Both adapters talk to the same project URL and send the project key in
//! the `apikey` header. Storage removals also need the key as a bearer token.

mod identity;
mod storage;

use std::time::Duration;

use reqwest::Url;
use zeroize::Zeroizing;

pub use identity::SupabaseIdentityProvider;
pub use storage::{DisabledObjectStorage, SupabaseObjectStorage};

/// Request timeout for identity and storage calls.
pub const SUPABASE_TIMEOUT: Duration = Duration::from_secs(15);

/// Project coordinates shared by the Supabase adapters.
#[derive(Clone)]
pub struct SupabaseProject {
    base_url: Url,
    api_key: Zeroizing<String>,
}

impl SupabaseProject {
    /// Describe a project by URL and key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: Zeroizing::new(api_key.into()),
        }
    }

    /// Join `path` onto the project URL.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `path` does not form a valid URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://demo.supabase.co")]
    #[case("https://demo.supabase.co/")]
    fn endpoints_resolve_from_the_project_root(#[case] base: &str) {
        let project = SupabaseProject::new(Url::parse(base).expect("url"), "anon");
        let url = project.endpoint("auth/v1/signup").expect("join");
        assert_eq!(url.as_str(), "https://demo.supabase.co/auth/v1/signup");
    }
}
