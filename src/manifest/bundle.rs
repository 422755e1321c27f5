use std::fmt;
use std::str::FromStr;

use super::ManifestError;

pub const NAMESPACE_SEP: char = '\\';

const BUNDLE_KIND: &str = "Plugin FQCN";

/// Drops leading namespace separators so `\V\B\C` and `V\B\C` name the same bundle.
pub fn normalize_fqcn(fqcn: &str) -> &str {
    fqcn.trim_start_matches(NAMESPACE_SEP)
}

/// First namespace segment of a fully-qualified name, or the whole name when it has none.
pub fn vendor_of(fqcn: &str) -> &str {
    fqcn.split_once(NAMESPACE_SEP).map_or(fqcn, |(vendor, _)| vendor)
}

/// Fully-qualified bundle class name of the form `Vendor\BundleName\ClassName`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleName {
    fqcn: String,
    vendor: String,
    bundle: String,
    class_name: String,
}

impl BundleName {
    pub fn parse(fqcn: &str) -> Result<Self, ManifestError> {
        let trimmed = normalize_fqcn(fqcn);
        if trimmed.is_empty() {
            return Err(ManifestError::empty(BUNDLE_KIND));
        }

        let segments: Vec<&str> = trimmed.split(NAMESPACE_SEP).collect();
        if segments.len() < 3 {
            return Err(ManifestError::Validation {
                kind: BUNDLE_KIND,
                reason: format!("'{}' must have the form Vendor\\BundleName\\ClassName", fqcn),
            });
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ManifestError::Validation {
                kind: BUNDLE_KIND,
                reason: format!("'{}' contains an empty namespace segment", fqcn),
            });
        }

        Ok(Self {
            fqcn: trimmed.to_string(),
            vendor: segments[0].to_string(),
            bundle: segments[1].to_string(),
            class_name: segments[segments.len() - 1].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.fqcn
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Key under which a routing entry of this bundle is stored.
    pub fn routing_key(&self, path_key: &str) -> String {
        format!("{}_{}", self.class_name, path_key)
    }

    /// Resource reference understood by the host router.
    pub fn resource(&self, relative: &str) -> String {
        format!("@{}/{}", self.class_name, relative)
    }
}

impl FromStr for BundleName {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BundleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqcn)
    }
}
