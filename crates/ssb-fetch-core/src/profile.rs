//! Feed profiles folded from `about` assertions.
//!
//! An about assertion is a record whose content looks like
//! `{ "type": "about", "about": <feed>, "name": ..., "image": ... }`.
//! Every field is last-writer-wins on its own: a later assertion that sets
//! only `name` leaves an earlier `description` in place.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::ssb_ref::{normalize, Identifier};

/// Fields a profile resolution tracks by default.
pub const PROFILE_FIELDS: [&str; 4] = ["name", "image", "description", "location"];

/// Content `type` of an about assertion.
pub const ABOUT_TYPE: &str = "about";

/// Keys of an about assertion that are envelope, not profile data.
const ENVELOPE_KEYS: [&str; 2] = ["type", "about"];

/// Running per-subject, per-field reduction over about assertions.
///
/// Feed it record contents in stream order; the value kept for each field is
/// the one from the most recent assertion that set it.
#[derive(Debug, Default, Clone)]
pub struct AboutFold {
    subjects: HashMap<Identifier, Map<String, Value>>,
}

impl AboutFold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one record content. Returns `false` if it is not an about
    /// assertion with a valid subject.
    pub fn apply(&mut self, content: &Value) -> bool {
        let Some(obj) = content.as_object() else {
            return false;
        };
        if obj.get("type").and_then(Value::as_str) != Some(ABOUT_TYPE) {
            return false;
        }
        let Some(subject) = obj
            .get("about")
            .and_then(Value::as_str)
            .and_then(|s| normalize(s).ok())
        else {
            return false;
        };

        let fields = self.subjects.entry(subject).or_default();
        for (key, value) in obj {
            if !ENVELOPE_KEYS.contains(&key.as_str()) {
                fields.insert(key.clone(), value.clone());
            }
        }
        true
    }

    /// Latest value of `field` asserted about `subject`.
    pub fn latest(&self, subject: &Identifier, field: &str) -> Option<&Value> {
        self.subjects.get(subject)?.get(field)
    }

    /// All latest values asserted about `subject`.
    pub fn fields(&self, subject: &Identifier) -> Option<&Map<String, Value>> {
        self.subjects.get(subject)
    }
}

/// Fold a sequence of record contents, in stream order.
pub fn fold_about<'a, I>(contents: I) -> AboutFold
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut fold = AboutFold::new();
    for content in contents {
        fold.apply(content);
    }
    fold
}

/// Normalize an `image` value: a bare string becomes `{ "link": string }`,
/// anything else is passed through untouched.
pub fn normalize_image(value: Value) -> Value {
    match value {
        Value::String(link) => json!({ "link": link }),
        other => other,
    }
}

/// A profile snapshot for one feed.
///
/// Serializes as a flat JSON object: the profile fields followed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    fields: Map<String, Value>,
    id: String,
}

impl Profile {
    /// An empty profile for `feed`.
    pub fn new(feed: &Identifier) -> Self {
        Self {
            fields: Map::new(),
            id: feed.canonical_id().to_string(),
        }
    }

    /// Set a field. `image` is normalized; `id` is owned by the profile and ignored.
    pub fn set(&mut self, field: &str, value: Value) {
        match field {
            "id" => {}
            "image" => {
                self.fields.insert(field.to_string(), normalize_image(value));
            }
            _ => {
                self.fields.insert(field.to_string(), value);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Render as a JSON value.
    pub fn to_json(&self) -> Value {
        let mut obj = self.fields.clone();
        obj.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(obj)
    }
}
