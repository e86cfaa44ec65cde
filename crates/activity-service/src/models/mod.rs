//! Activity Service models.
//!
//! Contains data types used across the Activity Service.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Ordered list of participant emails.
///
/// Insertion order is signup order. Duplicates are refused at insert time,
/// so the list never holds the same email twice. Only built through
/// [`Roster::from_emails`] and [`Roster::insert`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster(Vec<String>);

impl Roster {
    /// Build a roster from emails, keeping the first occurrence of each.
    pub fn from_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Roster::default();
        for email in emails {
            roster.insert(email.into());
        }
        roster
    }

    /// Append `email` unless it is already present.
    ///
    /// Returns `false` if the email was already on the roster.
    pub fn insert(&mut self, email: String) -> bool {
        if self.contains(&email) {
            return false;
        }
        self.0.push(email);
        true
    }

    /// Remove `email`, keeping the order of the remaining entries.
    ///
    /// Returns `false` if the email was not on the roster.
    pub fn remove(&mut self, email: &str) -> bool {
        match self.0.iter().position(|e| e == email) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.iter().any(|e| e == email)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// An extracurricular activity.
///
/// The activity name is the catalog key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    /// Short description shown to students.
    pub description: String,

    /// Human readable meeting times.
    pub schedule: String,

    /// Roster capacity.
    pub max_participants: u32,

    /// Signed-up students, in signup order.
    pub participants: Roster,
}

impl Activity {
    /// Number of students currently signed up.
    pub fn participant_count(&self) -> u32 {
        u32::try_from(self.participants.len()).unwrap_or(u32::MAX)
    }

    /// Remaining capacity.
    pub fn spots_left(&self) -> u32 {
        self.max_participants
            .saturating_sub(self.participant_count())
    }

    pub fn is_full(&self) -> bool {
        self.participant_count() >= self.max_participants
    }
}

/// Activities keyed by name, in insertion order.
///
/// Serializes as a JSON object whose keys follow insertion order, so the
/// seed order reaches clients unchanged. Names are unique; a repeated name
/// keeps the first entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog(Vec<(String, Activity)>);

impl Catalog {
    /// Build a catalog from `(name, activity)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Activity)>,
        S: Into<String>,
    {
        let mut catalog = Catalog::default();
        for (name, activity) in entries {
            catalog.insert(name.into(), activity);
        }
        catalog
    }

    /// Append an activity unless the name is taken.
    ///
    /// Returns `false` if an activity with that name already exists.
    pub fn insert(&mut self, name: String, activity: Activity) -> bool {
        if self.get(&name).is_some() {
            return false;
        }
        self.0.push((name, activity));
        true
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, activity)| activity)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.0
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, activity)| activity)
    }

    /// Iterate `(name, activity)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.0.iter().map(|(name, activity)| (name.as_str(), activity))
    }

    /// Activity names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Activity)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        Catalog::from_entries(iter)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, activity) in &self.0 {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

/// Response for `GET /activities/{name}/participants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantsResponse {
    /// Activity name.
    pub activity: String,

    /// Signed-up students, in signup order.
    pub participants: Vec<String>,

    /// Number of signed-up students.
    pub count: u32,

    /// Roster capacity.
    pub max_participants: u32,
}

/// Response for signup and removal.
///
/// Returned by `POST` and `DELETE /activities/{name}/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentResponse {
    /// Confirmation message.
    pub message: String,

    /// Remaining capacity after the change.
    pub spots_left: u32,
}

/// Last value of `key` among decoded query pairs.
///
/// A repeated key resolves to its final occurrence.
fn last_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Query string for `GET /activities`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
}

impl SearchQuery {
    /// Read `search` from decoded query pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            search: last_value(pairs, "search"),
        }
    }
}

/// Query string for signup and removal.
///
/// `email` is optional here so a missing value is reported with the
/// service's own error body instead of a framework rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentQuery {
    pub email: Option<String>,
}

impl EnrollmentQuery {
    /// Read `email` from decoded query pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: last_value(pairs, "email"),
        }
    }
}
