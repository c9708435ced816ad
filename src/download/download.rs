//! The resource to fetch and the name it is saved under.
//!
//! ```rust
//! use splitfetch::download::Download;
//! use std::convert::TryFrom;
//!
//! // The file name is taken from the last segment of the URL path.
//! let download = Download::try_from("https://example.com/images/disk%20one.iso")?;
//! assert_eq!(download.filename, "disk one.iso");
//!
//! // Or pick a name yourself.
//! let url = reqwest::Url::parse("https://example.com/download?id=7")?;
//! let download = Download::new(&url, "release.tar.gz");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Error;

use reqwest::Url;
use std::convert::TryFrom;
use std::time::{SystemTime, UNIX_EPOCH};

/// Represents a file to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// URL of the file to download.
    pub url: Url,
    /// File name used to save the file on disk.
    pub filename: String,
}

impl Download {
    /// Creates a new [`Download`].
    ///
    /// When using [`Download::try_from`], the file name is extracted from the
    /// URL instead.
    pub fn new(url: &Url, filename: &str) -> Self {
        Self {
            url: url.clone(),
            filename: String::from(filename),
        }
    }

    /// Name of the output file.
    ///
    /// With `timestamped`, the name is prefixed with the current time in
    /// nanoseconds since the epoch, in hexadecimal, so repeated downloads of
    /// the same URL do not overwrite each other.
    pub fn output_name(&self, timestamped: bool) -> String {
        if !timestamped {
            return self.filename.clone();
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{:x}_{}", nanos, self.filename)
    }
}

impl TryFrom<&Url> for Download {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        value
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "The url \"{}\" does not contain a valid path",
                    value
                ))
            })?
            .next_back()
            .filter(|segment| !segment.is_empty())
            .map(|segment| Download {
                url: value.clone(),
                filename: form_urlencoded::parse(segment.as_bytes())
                    .map(|(key, val)| [key, val].concat())
                    .collect(),
            })
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", value))
            })
    }
}

impl TryFrom<&str> for Download {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| Download::try_from(&u))
    }
}
