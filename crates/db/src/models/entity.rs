use serde::{Deserialize, Serialize};

/// The closed set of admin-addressable entity types.
///
/// Every admin operation that names an entity type parses the caller's
/// string into this enum; table names come from `table()` and are never
/// interpolated from request input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Registrations,
    Contacts,
    Abstracts,
    Speakers,
    Sponsorships,
    Payments,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Registrations,
        EntityKind::Contacts,
        EntityKind::Abstracts,
        EntityKind::Speakers,
        EntityKind::Sponsorships,
        EntityKind::Payments,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Registrations => "registrations",
            EntityKind::Contacts => "contacts",
            EntityKind::Abstracts => "abstracts",
            EntityKind::Speakers => "speakers",
            EntityKind::Sponsorships => "sponsorships",
            EntityKind::Payments => "payments",
        }
    }

    /// The full status vocabulary for this kind.
    pub fn statuses(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Registrations => &["pending", "approved", "rejected"],
            EntityKind::Contacts => &["new", "in_progress", "resolved"],
            EntityKind::Abstracts => &[
                "submitted",
                "under_review",
                "accepted",
                "rejected",
                "revision_required",
            ],
            EntityKind::Speakers => &["pending", "approved", "rejected"],
            EntityKind::Sponsorships => &[
                "submitted",
                "under_review",
                "negotiating",
                "approved",
                "rejected",
            ],
            EntityKind::Payments => &["pending", "verified", "rejected"],
        }
    }

    /// The "not yet finalized" subset used by the pending queue.
    pub fn pending_statuses(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Registrations => &["pending"],
            EntityKind::Contacts => &["new", "in_progress"],
            EntityKind::Abstracts => &["submitted", "under_review", "revision_required"],
            EntityKind::Speakers => &["pending"],
            EntityKind::Sponsorships => &["submitted", "under_review", "negotiating"],
            EntityKind::Payments => &["pending"],
        }
    }

    pub fn is_valid_status(&self, status: &str) -> bool {
        self.statuses().contains(&status)
    }

    /// Target status for the bulk `approve` action, where the vocabulary
    /// has one.
    pub fn approve_target(&self) -> Option<&'static str> {
        match self {
            EntityKind::Registrations => Some("approved"),
            EntityKind::Contacts => None,
            EntityKind::Abstracts => Some("accepted"),
            EntityKind::Speakers => Some("approved"),
            EntityKind::Sponsorships => Some("approved"),
            EntityKind::Payments => Some("verified"),
        }
    }

    /// Target status for the bulk `reject` action.
    pub fn reject_target(&self) -> Option<&'static str> {
        match self {
            EntityKind::Contacts => None,
            _ => Some("rejected"),
        }
    }

    /// Target status for the bulk `mark_reviewed` action.
    pub fn reviewed_target(&self) -> Option<&'static str> {
        match self {
            EntityKind::Contacts => Some("in_progress"),
            EntityKind::Abstracts | EntityKind::Sponsorships => Some("under_review"),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "registrations" | "registration" => Ok(EntityKind::Registrations),
            "contacts" | "contact" => Ok(EntityKind::Contacts),
            "abstracts" | "abstract" => Ok(EntityKind::Abstracts),
            "speakers" | "speaker" => Ok(EntityKind::Speakers),
            "sponsorships" | "sponsorship" => Ok(EntityKind::Sponsorships),
            "payments" | "payment" => Ok(EntityKind::Payments),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singular_and_plural_forms() {
        assert_eq!("abstracts".parse::<EntityKind>().unwrap(), EntityKind::Abstracts);
        assert_eq!("abstract".parse::<EntityKind>().unwrap(), EntityKind::Abstracts);
        assert!("projects".parse::<EntityKind>().is_err());
    }

    #[test]
    fn every_kind_validates_its_own_vocabulary() {
        for kind in EntityKind::ALL {
            for status in kind.statuses() {
                assert!(kind.is_valid_status(status));
            }
            assert!(!kind.is_valid_status("definitely_not_a_status"));
        }
    }

    #[test]
    fn pending_subsets_are_drawn_from_the_vocabulary() {
        for kind in EntityKind::ALL {
            for status in kind.pending_statuses() {
                assert!(kind.is_valid_status(status), "{kind}: {status}");
            }
        }
    }

    #[test]
    fn bulk_targets_are_drawn_from_the_vocabulary() {
        for kind in EntityKind::ALL {
            for target in [
                kind.approve_target(),
                kind.reject_target(),
                kind.reviewed_target(),
            ]
            .into_iter()
            .flatten()
            {
                assert!(kind.is_valid_status(target), "{kind}: {target}");
            }
        }
    }

    #[test]
    fn contacts_cannot_be_approved_or_rejected() {
        assert!(EntityKind::Contacts.approve_target().is_none());
        assert!(EntityKind::Contacts.reject_target().is_none());
        assert_eq!(EntityKind::Contacts.reviewed_target(), Some("in_progress"));
    }
}
