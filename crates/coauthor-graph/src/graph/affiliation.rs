//! Affiliation classification against the home institution markers.

use serde::Serialize;

use crate::config::AffiliationMarkers;

/// Where an author's affiliation places them relative to the home institution.
///
/// Classification is substring containment on free text. Affiliations that
/// mention the home institution only in passing are still counted as
/// internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliationClass {
    /// Home institution and home department.
    InternalDepartment,
    /// Home institution, other department.
    InternalInstitution,
    /// Some other institution.
    Other,
    /// No affiliation recorded.
    Unknown,
}

impl AffiliationClass {
    /// Classify affiliation text. Evaluated in order: unknown, department,
    /// institution, other.
    #[must_use]
    pub fn classify(affiliation: &str, markers: &AffiliationMarkers) -> Self {
        let affiliation = affiliation.trim();
        if affiliation.is_empty() {
            return Self::Unknown;
        }

        let institution = contains(affiliation, &markers.institution);
        if institution && contains(affiliation, &markers.department) {
            Self::InternalDepartment
        } else if institution {
            Self::InternalInstitution
        } else {
            Self::Other
        }
    }

    /// Check whether the class is within the home institution.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::InternalDepartment | Self::InternalInstitution)
    }

    /// Short label for detail listings.
    #[must_use]
    pub fn tag(self, markers: &AffiliationMarkers) -> &str {
        match self {
            Self::InternalDepartment => &markers.department_label,
            Self::InternalInstitution => &markers.institution_label,
            Self::Other => "Other",
            Self::Unknown => "N/A",
        }
    }
}

fn contains(haystack: &str, marker: &str) -> bool {
    !marker.is_empty() && haystack.contains(marker)
}
