use url::Url;

use crate::error::Error;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1/";
const IDENTITY_HOST: &str = "https://identitytoolkit.googleapis.com/v1/";

/// Where the backend services live.
///
/// Determines base URLs and whether emulator-only headers are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Google-hosted production APIs.
    Production,
    /// Local Firebase emulator suite. `firestore` and `auth` are
    /// `host:port` pairs (e.g. `127.0.0.1:8080`, `127.0.0.1:9099`).
    Emulator { firestore: String, auth: String },
    /// Explicit base URLs, already ending in the API version segment.
    Custom { firestore: Url, identity: Url },
}

impl Endpoint {
    /// Base URL for Firestore REST calls, ending in `/v1/`.
    pub fn firestore_base(&self) -> Result<Url, Error> {
        match self {
            Self::Production => Ok(Url::parse(FIRESTORE_HOST)?),
            Self::Emulator { firestore, .. } => {
                Ok(Url::parse(&format!("http://{}/v1/", firestore.trim_end_matches('/')))?)
            }
            Self::Custom { firestore, .. } => Ok(with_trailing_slash(firestore)),
        }
    }

    /// Base URL for Identity Toolkit calls, ending in `/v1/`.
    ///
    /// The auth emulator serves the toolkit under a host-named path prefix.
    pub fn identity_base(&self) -> Result<Url, Error> {
        match self {
            Self::Production => Ok(Url::parse(IDENTITY_HOST)?),
            Self::Emulator { auth, .. } => Ok(Url::parse(&format!(
                "http://{}/identitytoolkit.googleapis.com/v1/",
                auth.trim_end_matches('/')
            ))?),
            Self::Custom { identity, .. } => Ok(with_trailing_slash(identity)),
        }
    }

    /// Emulators accept `Bearer owner` to bypass security rules.
    pub fn is_emulator(&self) -> bool {
        matches!(self, Self::Emulator { .. })
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
