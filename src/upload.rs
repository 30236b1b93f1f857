//! Upload batch state machine.
//!
//! Collects the user's selected screenshots, carries their editable titles,
//! and owns the submission lifecycle. The batch is generic over an
//! [`ImageSource`] so the state machine runs under native tests; in the
//! browser the source is `web_sys::File` and preview handles are object
//! URLs.

use thiserror::Error;

/// Media types the batch accepts; anything else is rejected before any
/// side effect happens for it.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Title sent for an entry whose user-edited title is empty at submit time.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled";

/// Port over a selected image file: identity plus a revocable preview
/// reference for rendering it before upload.
pub trait ImageSource: Clone {
    fn file_name(&self) -> String;
    fn media_type(&self) -> String;
    /// Allocate a display reference. Must be balanced by exactly one
    /// [`ImageSource::revoke_preview`] for the returned value.
    fn create_preview(&self) -> String;
    fn revoke_preview(&self, preview_url: &str);
}

impl ImageSource for web_sys::File {
    fn file_name(&self) -> String {
        self.name()
    }

    fn media_type(&self) -> String {
        self.type_()
    }

    fn create_preview(&self) -> String {
        web_sys::Url::create_object_url_with_blob(self).unwrap_or_else(|err| {
            log::error!("failed to create preview URL: {err:?}");
            String::new()
        })
    }

    fn revoke_preview(&self, preview_url: &str) {
        if let Err(err) = web_sys::Url::revoke_object_url(preview_url) {
            log::warn!("failed to revoke preview URL: {err:?}");
        }
    }
}

/// One selected image plus its user-editable title and live preview handle.
#[derive(Clone)]
pub struct ImageEntry<F: ImageSource> {
    pub id: u64,
    pub file: F,
    pub title: String,
    pub preview_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Precondition failures checked before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please select at least one image file.")]
    EmptyBatch,
    #[error("An analysis is already in progress.")]
    AlreadyInFlight,
}

/// Ordered payload the multipart builder consumes: one `(file, title)` pair
/// per entry, in insertion order, plus the optional session-name override.
pub struct SubmissionParts<F> {
    pub session_name: Option<String>,
    pub images: Vec<(F, String)>,
}

pub struct UploadBatch<F: ImageSource> {
    next_id: u64,
    session_name: String,
    entries: Vec<ImageEntry<F>>,
    submission: SubmissionState,
}

impl<F: ImageSource> Default for UploadBatch<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ImageSource> UploadBatch<F> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            session_name: String::new(),
            entries: Vec::new(),
            submission: SubmissionState::Idle,
        }
    }

    /// Append accepted files as new entries, preserving arrival order.
    ///
    /// Files outside [`ACCEPTED_IMAGE_TYPES`] are skipped whole. A fresh
    /// selection invalidates any previous submission outcome, so the
    /// submission state drops back to idle when anything was added. Returns
    /// the number of entries added.
    pub fn add_files<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = F>,
    {
        let mut added = 0;
        for file in files {
            let media_type = file.media_type();
            if !ACCEPTED_IMAGE_TYPES.contains(&media_type.as_str()) {
                log::warn!(
                    "rejected file {} with unsupported type {:?}",
                    file.file_name(),
                    media_type
                );
                continue;
            }

            let title = title_from_file_name(&file.file_name());
            let preview_url = file.create_preview();
            self.entries.push(ImageEntry {
                id: self.next_id,
                file,
                title,
                preview_url,
            });
            self.next_id += 1;
            added += 1;
        }

        if added > 0 {
            self.submission = SubmissionState::Idle;
        }
        added
    }

    /// Update the title of the matching entry; no-op when `id` is absent.
    pub fn set_entry_title(&mut self, id: u64, title: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.title = title.to_string();
        }
    }

    /// Remove the matching entry and release its preview handle exactly
    /// once. Returns whether an entry was removed.
    pub fn remove_entry(&mut self, id: u64) -> bool {
        let Some(position) = self.entries.iter().position(|entry| entry.id == id) else {
            return false;
        };
        let entry = self.entries.remove(position);
        entry.file.revoke_preview(&entry.preview_url);
        true
    }

    /// Store the session-name override, trimmed; whitespace-only input means
    /// no override.
    pub fn set_session_name(&mut self, name: &str) {
        self.session_name = name.trim().to_string();
    }

    pub fn session_name_override(&self) -> Option<String> {
        (!self.session_name.is_empty()).then(|| self.session_name.clone())
    }

    pub fn entries(&self) -> &[ImageEntry<F>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    /// Claim the single in-flight submission slot.
    ///
    /// Fails before any network activity for an empty batch or a submission
    /// already in flight; entries are untouched either way.
    pub fn begin_submission(&mut self) -> Result<(), SubmitError> {
        if self.entries.is_empty() {
            return Err(SubmitError::EmptyBatch);
        }
        if self.submission == SubmissionState::InFlight {
            return Err(SubmitError::AlreadyInFlight);
        }
        self.submission = SubmissionState::InFlight;
        Ok(())
    }

    /// Record the outcome of the in-flight submission. Entries are kept so
    /// the user can inspect or resubmit the same selection.
    pub fn finish_submission(&mut self, success: bool) {
        self.submission = if success {
            SubmissionState::Succeeded
        } else {
            SubmissionState::Failed
        };
    }

    /// Snapshot of everything the outbound request needs, in insertion
    /// order, with empty titles defaulted.
    pub fn submission_parts(&self) -> SubmissionParts<F> {
        SubmissionParts {
            session_name: self.session_name_override(),
            images: self
                .entries
                .iter()
                .map(|entry| {
                    let title = if entry.title.is_empty() {
                        UNTITLED_PLACEHOLDER.to_string()
                    } else {
                        entry.title.clone()
                    };
                    (entry.file.clone(), title)
                })
                .collect(),
        }
    }

    /// Drop every entry, releasing each preview handle, and return to idle.
    pub fn reset(&mut self) {
        for entry in self.entries.drain(..) {
            entry.file.revoke_preview(&entry.preview_url);
        }
        self.submission = SubmissionState::Idle;
    }
}

/// Default entry title: the file name with its extension stripped.
fn title_from_file_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, extension)) if !extension.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone)]
    struct FakeImage {
        name: &'static str,
        media_type: &'static str,
        live_previews: Rc<Cell<usize>>,
    }

    impl ImageSource for FakeImage {
        fn file_name(&self) -> String {
            self.name.to_string()
        }

        fn media_type(&self) -> String {
            self.media_type.to_string()
        }

        fn create_preview(&self) -> String {
            self.live_previews.set(self.live_previews.get() + 1);
            format!("blob:{}", self.name)
        }

        fn revoke_preview(&self, _preview_url: &str) {
            assert!(self.live_previews.get() > 0, "preview released twice");
            self.live_previews.set(self.live_previews.get() - 1);
        }
    }

    struct Fixture {
        live_previews: Rc<Cell<usize>>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                live_previews: Rc::new(Cell::new(0)),
            }
        }

        fn image(&self, name: &'static str, media_type: &'static str) -> FakeImage {
            FakeImage {
                name,
                media_type,
                live_previews: self.live_previews.clone(),
            }
        }

        fn png(&self, name: &'static str) -> FakeImage {
            self.image(name, "image/png")
        }
    }

    #[test]
    fn test_add_files_filters_unsupported_types() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();

        let added = batch.add_files([
            fx.png("landing.png"),
            fx.image("notes.txt", "text/plain"),
            fx.image("photo.jpg", "image/jpeg"),
            fx.image("icon.webp", "image/webp"),
            fx.image("movie.mp4", "video/mp4"),
        ]);

        assert_eq!(added, 3);
        assert_eq!(batch.len(), 3);
        // No side effects for rejected files.
        assert_eq!(fx.live_previews.get(), 3);
    }

    #[test]
    fn test_default_titles_strip_extension() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([
            fx.png("landing-page.png"),
            fx.png("archive.tar.gz"),
            fx.png("noext"),
        ]);

        let titles: Vec<&str> = batch.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["landing-page", "archive.tar", "noext"]);
    }

    #[test]
    fn test_entry_ids_are_unique_across_additions() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([fx.png("a.png"), fx.png("b.png")]);
        let first = batch.entries()[0].id;
        batch.remove_entry(first);
        batch.add_files([fx.png("c.png")]);

        let mut ids: Vec<u64> = batch.entries().iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), batch.len());
        assert!(!ids.contains(&first));
    }

    #[test]
    fn test_live_previews_track_entries() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();

        batch.add_files([fx.png("a.png"), fx.png("b.png"), fx.png("c.png")]);
        assert_eq!(fx.live_previews.get(), batch.len());

        let second = batch.entries()[1].id;
        assert!(batch.remove_entry(second));
        assert_eq!(fx.live_previews.get(), batch.len());

        // Removing the same id again is a no-op, not a double release.
        assert!(!batch.remove_entry(second));
        assert_eq!(fx.live_previews.get(), batch.len());

        batch.add_files([fx.png("d.png")]);
        assert_eq!(fx.live_previews.get(), batch.len());
    }

    #[test]
    fn test_reset_releases_every_preview() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([fx.png("a.png"), fx.png("b.png")]);

        batch.reset();

        assert!(batch.is_empty());
        assert_eq!(fx.live_previews.get(), 0);
        assert_eq!(batch.submission(), SubmissionState::Idle);
    }

    #[test]
    fn test_set_entry_title_ignores_absent_id() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([fx.png("a.png")]);
        let id = batch.entries()[0].id;

        batch.set_entry_title(id, "Checkout");
        batch.set_entry_title(id + 999, "Ignored");

        assert_eq!(batch.entries()[0].title, "Checkout");
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_session_name_override_trims_to_none() {
        let mut batch: UploadBatch<FakeImage> = UploadBatch::new();

        batch.set_session_name("   ");
        assert_eq!(batch.session_name_override(), None);

        batch.set_session_name("  Checkout Flow  ");
        assert_eq!(
            batch.session_name_override(),
            Some("Checkout Flow".to_string())
        );
    }

    #[test]
    fn test_begin_submission_rejects_empty_batch() {
        let mut batch: UploadBatch<FakeImage> = UploadBatch::new();
        assert_eq!(batch.begin_submission(), Err(SubmitError::EmptyBatch));
        assert_eq!(batch.submission(), SubmissionState::Idle);
    }

    #[test]
    fn test_begin_submission_rejects_concurrent_submit() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([fx.png("a.png")]);

        batch.begin_submission().unwrap();
        assert_eq!(batch.submission(), SubmissionState::InFlight);
        assert_eq!(batch.begin_submission(), Err(SubmitError::AlreadyInFlight));

        batch.finish_submission(true);
        assert_eq!(batch.submission(), SubmissionState::Succeeded);
        // A settled batch may be resubmitted.
        batch.begin_submission().unwrap();
        batch.finish_submission(false);
        assert_eq!(batch.submission(), SubmissionState::Failed);
    }

    #[test]
    fn test_adding_files_returns_submission_to_idle() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([fx.png("a.png")]);
        batch.begin_submission().unwrap();
        batch.finish_submission(true);

        batch.add_files([fx.png("b.png")]);
        assert_eq!(batch.submission(), SubmissionState::Idle);
    }

    #[test]
    fn test_submission_parts_preserve_order_and_default_titles() {
        let fx = Fixture::new();
        let mut batch = UploadBatch::new();
        batch.add_files([fx.png("home.png"), fx.png("cart.png")]);
        batch.set_session_name("Checkout Flow");
        let second = batch.entries()[1].id;
        batch.set_entry_title(second, "");

        let parts = batch.submission_parts();

        assert_eq!(parts.session_name, Some("Checkout Flow".to_string()));
        assert_eq!(parts.images.len(), 2);
        assert_eq!(parts.images[0].0.file_name(), "home.png");
        assert_eq!(parts.images[0].1, "home");
        assert_eq!(parts.images[1].0.file_name(), "cart.png");
        assert_eq!(parts.images[1].1, UNTITLED_PLACEHOLDER);
        // Entries survive the snapshot.
        assert_eq!(batch.len(), 2);
    }
}
