//! The [`Entity`] trait shared by every stored collection item.

/// An item that can live in a CRUD store.
///
/// Ids are strings and unique within a store. An empty id means "not yet
/// persisted"; backends are free to assign one on insert.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Partial update applied by `update(id, patch)`.
    type Patch: Clone + Send + Sync + 'static;

    /// Short lowercase name used in logs and error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Apply a partial update in place. Fields left as `None` in the patch
    /// are untouched.
    fn apply(&mut self, patch: &Self::Patch);

    /// Returns `true` if the item has not been assigned an id yet.
    fn is_unassigned(&self) -> bool {
        self.id().is_empty()
    }
}
