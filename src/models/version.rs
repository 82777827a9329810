use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Symbol version identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[schema(value_type = String)]
pub struct VersionId(String);

impl VersionId {
    /// Generate a random 21-character alphanumeric id
    pub fn generate() -> Self {
        use rand::Rng;
        let id: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(21)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated or iterated symbol. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SymbolVersion {
    pub id: VersionId,
    /// Sanitized symbol markup (no text layers, no canvas frame)
    pub svg: String,
    /// Prompt that produced this symbol
    pub prompt: String,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at: i64,
}

impl SymbolVersion {
    pub fn new(svg: String, prompt: String) -> Self {
        Self {
            id: VersionId::generate(),
            svg,
            prompt,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Ordered collection of symbol versions, newest first, plus the id of the
/// selected one.
///
/// The selection is only ever a key into `versions`; it never owns or
/// borrows a version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    versions: Vec<SymbolVersion>,
    selected_id: Option<VersionId>,
}

impl VersionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new version at the front and select it.
    pub fn add(&mut self, svg: String, prompt: String) -> &SymbolVersion {
        let version = SymbolVersion::new(svg, prompt);
        self.selected_id = Some(version.id.clone());
        self.versions.insert(0, version);
        &self.versions[0]
    }

    /// Select a version by id. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: &VersionId) -> bool {
        if self.get(id).is_some() {
            self.selected_id = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Delete a version. If it was selected, the selection falls back to the
    /// most recent remaining version, or to none.
    pub fn remove(&mut self, id: &VersionId) -> Option<SymbolVersion> {
        let index = self.versions.iter().position(|v| &v.id == id)?;
        let removed = self.versions.remove(index);
        self.selected_id = fallback_selection(&self.versions, self.selected_id.take(), id);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.versions.clear();
        self.selected_id = None;
    }

    pub fn get(&self, id: &VersionId) -> Option<&SymbolVersion> {
        self.versions.iter().find(|v| &v.id == id)
    }

    /// The currently selected version, if any
    pub fn current(&self) -> Option<&SymbolVersion> {
        self.selected_id.as_ref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&VersionId> {
        self.selected_id.as_ref()
    }

    pub fn versions(&self) -> &[SymbolVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Selection after `removed` has been taken out of `remaining`.
fn fallback_selection(
    remaining: &[SymbolVersion],
    selected: Option<VersionId>,
    removed: &VersionId,
) -> Option<VersionId> {
    match selected {
        Some(id) if &id == removed => remaining.first().map(|v| v.id.clone()),
        other => other,
    }
}
