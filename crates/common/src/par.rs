use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// A pre-authenticated request (PAR) URL.
///
/// Possession of the URL is the credential: it grants read and/or write
///  access to a bucket (or a prefix of one) with no further auth. Object
///  URLs are formed by appending the object key below it, e.g.
///
/// ```text
/// https://objectstorage.<region>.oraclecloud.com/p/<token>/n/<namespace>/b/<bucket>/o/
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Par(Url);

#[derive(Debug, thiserror::Error)]
pub enum ParError {
    #[error("invalid PAR url: {0}")]
    Parse(#[from] url::ParseError),
    #[error("unsupported PAR scheme: {0}")]
    UnsupportedScheme(String),
    #[error("PAR url cannot address objects: {0}")]
    CannotBeABase(String),
}

impl Par {
    pub fn parse(raw: &str) -> Result<Self, ParError> {
        let url = Url::parse(raw.trim())?;
        Self::try_from(url)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Url of the object `key` below this PAR.
    ///
    /// Each `/`-separated segment of the key is appended as its own
    ///  percent-encoded path segment, so names with spaces, `?` or `#`
    ///  still address the right object.
    pub fn object_url(&self, key: &str) -> Url {
        let mut url = self.0.clone();
        // NOTE: a PAR is validated as a base url at construction,
        //  so path_segments_mut cannot fail here
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(key.split('/'));
        }
        url
    }

    /// Best-effort bucket name from the `/b/<bucket>/` part of the url
    pub fn bucket_name(&self) -> Option<String> {
        let mut segments = self.0.path_segments()?;
        segments.find(|segment| *segment == "b")?;
        segments
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }
}

impl TryFrom<Url> for Par {
    type Error = ParError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ParError::UnsupportedScheme(other.to_string())),
        }
        if url.cannot_be_a_base() {
            return Err(ParError::CannotBeABase(url.to_string()));
        }
        Ok(Self(url))
    }
}

impl TryFrom<String> for Par {
    type Error = ParError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<Par> for String {
    fn from(par: Par) -> Self {
        par.0.into()
    }
}

impl FromStr for Par {
    type Err = ParError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Par {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
