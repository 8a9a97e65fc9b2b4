use crate::common::error::{EmptyRepositoryName, RepositoryUrlParse, Result};
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use url::Url;

/// A named remote helm chart repository. The URL is passed to `helm repo add` exactly as it was
/// given.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RepositoryEntry {
    name: String,
    url: String,
}

impl RepositoryEntry {
    /// Creates a validated repository entry.
    pub fn new<N, U>(name: N, url: U) -> Result<Self>
    where
        N: ToString,
        U: ToString,
    {
        let entry = Self {
            name: name.to_string(),
            url: url.to_string(),
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Entries which are deserialized skip the checks in RepositoryEntry::new(), so they are
    /// validated again before they are used.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            !self.name.trim().is_empty(),
            EmptyRepositoryName {
                url: self.url.clone()
            }
        );
        Url::parse(self.url.as_str()).context(RepositoryUrlParse {
            name: self.name.clone(),
            url: self.url.clone(),
        })?;
        Ok(())
    }
}
