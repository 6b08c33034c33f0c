//! Per-file pipeline: recognize, name, move, tag.
//!
//! # Architecture
//!
//! The [`Tagger`] owns three collaborators behind traits so tests can swap
//! them out:
//! - a [`Recognizer`] (Shazam or AcoustID)
//! - a [`CoverFetcher`] for downloading cover art
//! - a [`TagWriter`] for writing tags into the moved file
//!
//! Files are processed one at a time; the retry delay already paces requests
//! to the recognition service.

mod plan;

pub use plan::{Plan, PlanEntry};

use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cover::CoverFetcher;
use crate::error::{Error, Result};
use crate::metadata::TagWriter;
use crate::naming::TrackTags;
use crate::organizer::{self, Layout, Placement, TransferMode};
use crate::recognition::{RetryPolicy, Recognizer, recognize_with_retry};

/// Knobs for a tagging run
#[derive(Debug, Clone, Default)]
pub struct TaggerOptions {
    pub retry: RetryPolicy,
    pub placement: Placement,
    /// Move/copy and tag files; `false` only plans
    pub modify: bool,
}

/// Outcome of [`Tagger::run_batch`]
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully processed files
    pub entries: Vec<PlanEntry>,
    /// Files that failed, with the error recorded on the entry
    pub failures: Vec<PlanEntry>,
    /// Number of files handed to the batch
    pub total: usize,
    /// Stopped early by Ctrl-C
    pub cancelled: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.len()
    }

    /// All entries, failures included, in processing order of their kind.
    pub fn into_plan(self, placement: &Placement) -> Plan {
        let mut entries = self.entries;
        entries.extend(self.failures);
        Plan::new(placement.layout, entries)
    }
}

/// Outcome of [`Tagger::apply_plan`]
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// (source, destination) of every applied entry
    pub applied: Vec<(PathBuf, PathBuf)>,
    /// Entries not selected, or whose source no longer exists
    pub skipped: usize,
    /// (source, error message)
    pub failures: Vec<(PathBuf, String)>,
}

pub struct Tagger {
    recognizer: Arc<dyn Recognizer>,
    covers: Arc<dyn CoverFetcher>,
    writer: Arc<dyn TagWriter>,
    options: TaggerOptions,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Tagger {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        covers: Arc<dyn CoverFetcher>,
        writer: Arc<dyn TagWriter>,
        options: TaggerOptions,
    ) -> Self {
        Self {
            recognizer,
            covers,
            writer,
            options,
        }
    }

    /// Recognize one file and work out where it goes; apply it unless this is a dry run.
    pub async fn process_file(&self, path: &Path) -> Result<PlanEntry> {
        let track = recognize_with_retry(self.recognizer.as_ref(), path, self.options.retry).await?;

        let tags = TrackTags::from_recognized(&track);
        let destination = self.destination_for(path, &tags);
        tracing::debug!("[{}] -> {:?}", display_name(path), destination);

        let mut entry = PlanEntry::recognized(path.to_path_buf(), destination, tags, track.cover_url);

        if self.options.modify {
            let final_path = self.apply_entry(&entry).await?;
            entry.destination = Some(final_path);
        }
        Ok(entry)
    }

    fn destination_for(&self, source: &Path, tags: &TrackTags) -> PathBuf {
        let planned = organizer::planned_destination(source, tags, &self.options.placement);
        organizer::unique_destination(&planned, source)
    }

    /// Where a plan entry goes: derived from its tags, except that in the flat
    /// layout the file name of the plan's `destination` is kept.
    fn plan_destination(&self, entry: &PlanEntry) -> PathBuf {
        let placement = &self.options.placement;
        let planned = organizer::planned_destination(&entry.source, &entry.tags(), placement);
        let candidate = match entry.destination.as_deref() {
            Some(edited) if placement.layout == Layout::Flat => {
                organizer::edited_destination(&planned, edited, &entry.source)
            }
            _ => planned,
        };
        organizer::unique_destination(&candidate, &entry.source)
    }

    /// Move/copy the entry's file to its destination and write its tags.
    ///
    /// A cover that cannot be downloaded is logged and skipped; the tags are
    /// still written.
    pub async fn apply_entry(&self, entry: &PlanEntry) -> Result<PathBuf> {
        let destination = entry.destination.as_deref().ok_or_else(|| {
            Error::organization(format!("No destination planned for {:?}", entry.source))
        })?;

        let mode = TransferMode::for_placement(&self.options.placement);
        organizer::transfer(&entry.source, destination, mode)?;

        let cover = match entry.cover_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => match self.covers.fetch(url).await {
                Ok(image) => Some(image),
                Err(e) => {
                    tracing::warn!("[{}] cover art skipped: {}", display_name(&entry.source), e);
                    None
                }
            },
            None => {
                tracing::debug!("[{}] no cover art", display_name(&entry.source));
                None
            }
        };

        self.writer
            .write_tags(destination, &entry.tags(), cover.as_ref())?;

        Ok(destination.to_path_buf())
    }

    /// Process `files` in order, advancing `progress` and honoring `cancel`.
    pub async fn run_batch(
        &self,
        files: &[PathBuf],
        progress: &ProgressBar,
        cancel: &AtomicBool,
    ) -> BatchReport {
        let mut report = BatchReport {
            total: files.len(),
            ..Default::default()
        };

        for (i, path) in files.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                tracing::warn!("Cancelled with {} file(s) left", files.len() - i);
                report.cancelled = true;
                break;
            }

            progress.set_message(display_name(path));
            match self.process_file(path).await {
                Ok(entry) => report.entries.push(entry),
                Err(e) => {
                    tracing::warn!("[{}] {}", display_name(path), e);
                    report.failures.push(PlanEntry::failed(path.clone(), e.to_string()));
                }
            }
            progress.inc(1);
        }

        report
    }

    /// Execute a reviewed plan with the current placement.
    ///
    /// Destinations are recomputed from each entry's tags, so hand edits to
    /// the plan take effect.
    pub async fn apply_plan(&self, plan: &Plan, progress: &ProgressBar) -> ApplyReport {
        let mut report = ApplyReport::default();

        for entry in &plan.entries {
            progress.set_message(display_name(&entry.source));

            if !entry.apply {
                report.skipped += 1;
            } else if !entry.source.exists() {
                tracing::warn!("Skipping {:?}: source no longer exists", entry.source);
                report.skipped += 1;
            } else {
                let mut entry = entry.clone();
                entry.sanitize_tags();
                entry.destination = Some(self.plan_destination(&entry));

                match self.apply_entry(&entry).await {
                    Ok(dest) => report.applied.push((entry.source.clone(), dest)),
                    Err(e) => {
                        tracing::warn!("[{}] {}", display_name(&entry.source), e);
                        report.failures.push((entry.source.clone(), e.to_string()));
                    }
                }
            }
            progress.inc(1);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::RecognitionError;
    use crate::recognition::traits::mocks::{FixedRecognizer, ScriptedRecognizer};
    use crate::test_utils::{MockCoverFetcher, RecordingTagWriter, beatles_recognizer, dummy_audio_file};
    use std::time::Duration;
    use tempfile::tempdir;

    fn options(placement: Placement, modify: bool) -> TaggerOptions {
        TaggerOptions {
            retry: RetryPolicy::new(1, Duration::ZERO),
            placement,
            modify,
        }
    }

    fn tagger_with(
        recognizer: Arc<dyn Recognizer>,
        writer: Arc<RecordingTagWriter>,
        covers: Arc<MockCoverFetcher>,
        options: TaggerOptions,
    ) -> Tagger {
        Tagger::new(recognizer, covers, writer, options)
    }

    fn output_to(dir: &Path, layout: Layout) -> Placement {
        Placement {
            layout,
            output_dir: Some(dir.to_path_buf()),
            copy_to: None,
        }
    }

    #[tokio::test]
    async fn test_recognize_and_rename_flat() {
        for ext in ["mp3", "ogg"] {
            let temp = tempdir().unwrap();
            let source = dummy_audio_file(temp.path(), &format!("fileToTest.{}", ext));
            let writer = Arc::new(RecordingTagWriter::default());
            let tagger = tagger_with(
                Arc::new(beatles_recognizer()),
                writer.clone(),
                Arc::new(MockCoverFetcher::ok()),
                options(output_to(temp.path(), Layout::Flat), true),
            );

            let entry = tagger.process_file(&source).await.unwrap();

            let expected = temp
                .path()
                .join(format!("Drive My Car - The Beatles - Rubber Soul.{}", ext));
            assert_eq!(entry.destination.as_deref(), Some(expected.as_path()));
            assert!(expected.exists(), "File not found at {:?}", expected);
            assert!(!source.exists());
            assert_eq!(writer.written_paths(), vec![expected]);
        }
    }

    #[tokio::test]
    async fn test_recognize_and_rename_plex() {
        for ext in ["mp3", "ogg"] {
            let temp = tempdir().unwrap();
            let source = dummy_audio_file(temp.path(), &format!("fileToTest.{}", ext));
            let tagger = tagger_with(
                Arc::new(beatles_recognizer()),
                Arc::new(RecordingTagWriter::default()),
                Arc::new(MockCoverFetcher::ok()),
                options(output_to(temp.path(), Layout::Plex), true),
            );

            let entry = tagger.process_file(&source).await.unwrap();

            let expected = temp
                .path()
                .join("The Beatles")
                .join("Rubber Soul")
                .join(format!("Drive My Car.{}", ext));
            assert_eq!(entry.destination.as_deref(), Some(expected.as_path()));
            assert!(expected.exists(), "File not found at {:?}", expected);
        }
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "fileToTest.mp3");
        let writer = Arc::new(RecordingTagWriter::default());
        let out = temp.path().join("library");
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            writer.clone(),
            Arc::new(MockCoverFetcher::ok()),
            options(output_to(&out, Layout::Plex), false),
        );

        let entry = tagger.process_file(&source).await.unwrap();

        assert!(source.exists());
        assert!(!out.exists());
        assert!(writer.written_paths().is_empty());
        assert!(entry.apply);
        assert_eq!(entry.title, "Drive My Car");
    }

    #[tokio::test]
    async fn test_copy_to_keeps_source() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "in.mp3");
        let copies = temp.path().join("copies");
        let placement = Placement {
            layout: Layout::Flat,
            output_dir: None,
            copy_to: Some(copies.clone()),
        };
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(placement, true),
        );

        tagger.process_file(&source).await.unwrap();

        assert!(source.exists());
        assert!(copies.join("Drive My Car - The Beatles - Rubber Soul.mp3").exists());
    }

    #[tokio::test]
    async fn test_existing_destination_gets_numbered() {
        let temp = tempdir().unwrap();
        let taken = dummy_audio_file(temp.path(), "Drive My Car - The Beatles - Rubber Soul.mp3");
        let source = dummy_audio_file(temp.path(), "other.mp3");
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let entry = tagger.process_file(&source).await.unwrap();

        assert!(taken.exists());
        assert_eq!(
            entry.destination,
            Some(temp.path().join("Drive My Car - The Beatles - Rubber Soul (1).mp3"))
        );
    }

    #[tokio::test]
    async fn test_cover_is_fetched_and_embedded() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let writer = Arc::new(RecordingTagWriter::default());
        let covers = Arc::new(MockCoverFetcher::ok());
        let recognizer = FixedRecognizer::new("Drive My Car", "The Beatles", "Rubber Soul")
            .with_cover("https://img.example/cover.jpg");
        let tagger = tagger_with(
            Arc::new(recognizer),
            writer.clone(),
            covers.clone(),
            options(Placement::default(), true),
        );

        tagger.process_file(&source).await.unwrap();

        assert_eq!(covers.call_count(), 1);
        assert_eq!(writer.covers_written(), 1);
    }

    #[tokio::test]
    async fn test_cover_failure_still_writes_tags() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let writer = Arc::new(RecordingTagWriter::default());
        let recognizer = FixedRecognizer::new("Drive My Car", "The Beatles", "Rubber Soul")
            .with_cover("https://img.example/missing.jpg");
        let tagger = tagger_with(
            Arc::new(recognizer),
            writer.clone(),
            Arc::new(MockCoverFetcher::failing()),
            options(Placement::default(), true),
        );

        assert!(tagger.process_file(&source).await.is_ok());
        assert_eq!(writer.written_paths().len(), 1);
        assert_eq!(writer.covers_written(), 0);
    }

    #[tokio::test]
    async fn test_tag_failure_is_an_error() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            Arc::new(RecordingTagWriter::failing()),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let result = tagger.process_file(&source).await;
        assert!(matches!(result, Err(Error::Tagging { .. })));
    }

    #[tokio::test]
    async fn test_recognition_failure_is_reported() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let tagger = tagger_with(
            Arc::new(ScriptedRecognizer::new(vec![])),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let result = tagger.process_file(&source).await;
        assert!(matches!(
            result,
            Err(Error::Recognition(RecognitionError::NoMatch))
        ));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_run_batch_counts_successes_and_failures() {
        let temp = tempdir().unwrap();
        let first = dummy_audio_file(temp.path(), "first.mp3");
        let second = dummy_audio_file(temp.path(), "second.mp3");
        let recognizer = ScriptedRecognizer::new(vec![
            Err(RecognitionError::Network("timeout".to_string())),
            Ok(Some(crate::recognition::RecognizedTrack {
                title: Some("Girl".to_string()),
                artist: Some("The Beatles".to_string()),
                album: Some("Rubber Soul".to_string()),
                cover_url: None,
            })),
        ]);
        let tagger = tagger_with(
            Arc::new(recognizer),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), false),
        );

        let report = tagger
            .run_batch(&[first.clone(), second], &ProgressBar::hidden(), &AtomicBool::new(false))
            .await;

        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, first);
        assert!(!report.failures[0].apply);
        assert!(report.failures[0].error.as_deref().unwrap().contains("timeout"));

        let plan = report.into_plan(&Placement::default());
        assert_eq!(plan.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_run_batch_stops_when_cancelled() {
        let temp = tempdir().unwrap();
        let file = dummy_audio_file(temp.path(), "a.mp3");
        let recognizer = Arc::new(beatles_recognizer());
        let tagger = tagger_with(
            recognizer.clone(),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let report = tagger
            .run_batch(&[file.clone()], &ProgressBar::hidden(), &AtomicBool::new(true))
            .await;

        assert!(report.cancelled);
        assert_eq!(report.succeeded(), 0);
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
        assert!(file.exists());
    }

    #[tokio::test]
    async fn test_apply_plan_uses_edited_tags() {
        let temp = tempdir().unwrap();
        let edited = dummy_audio_file(temp.path(), "a.mp3");
        let unticked = dummy_audio_file(temp.path(), "b.mp3");
        let writer = Arc::new(RecordingTagWriter::default());
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            writer.clone(),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let mut first = PlanEntry::recognized(
            edited.clone(),
            temp.path().join("stale.mp3"),
            crate::test_utils::beatles_tags(),
            None,
        );
        first.title = "Norwegian Wood".to_string();
        first.destination = None;
        let mut second = first.clone();
        second.source = unticked.clone();
        second.apply = false;
        let missing = PlanEntry {
            source: temp.path().join("gone.mp3"),
            ..first.clone()
        };
        let plan = Plan::new(Layout::Flat, vec![first, second, missing]);

        let report = tagger.apply_plan(&plan, &ProgressBar::hidden()).await;

        let expected = temp.path().join("Norwegian Wood - The Beatles - Rubber Soul.mp3");
        assert_eq!(report.applied, vec![(edited, expected.clone())]);
        assert_eq!(report.skipped, 2);
        assert!(report.failures.is_empty());
        assert!(expected.exists());
        assert!(unticked.exists());
        assert_eq!(writer.written_paths(), vec![expected]);
    }

    fn plan_entry(source: &Path, destination: Option<PathBuf>) -> PlanEntry {
        let mut entry = PlanEntry::recognized(
            source.to_path_buf(),
            PathBuf::new(),
            crate::test_utils::beatles_tags(),
            None,
        );
        entry.destination = destination;
        entry
    }

    #[tokio::test]
    async fn test_apply_plan_sanitizes_edited_tags() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let writer = Arc::new(RecordingTagWriter::default());
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            writer.clone(),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let mut entry = plan_entry(&source, None);
        entry.title = "AC/DC".to_string();
        let plan = Plan::new(Layout::Flat, vec![entry]);

        let report = tagger.apply_plan(&plan, &ProgressBar::hidden()).await;

        let expected = temp.path().join("Acdc - The Beatles - Rubber Soul.mp3");
        assert_eq!(report.applied, vec![(source, expected.clone())]);
        assert!(expected.exists());
        assert!(!temp.path().join("AC").exists());
        assert_eq!(writer.written_tags()[0].title, "Acdc");
    }

    #[tokio::test]
    async fn test_apply_plan_dot_names_stay_inside_output_dir() {
        let temp = tempdir().unwrap();
        let library = temp.path().join("lib");
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(output_to(&library, Layout::Plex), true),
        );

        let mut entry = plan_entry(&source, None);
        entry.artist = "..".to_string();
        entry.album = "..".to_string();
        let plan = Plan::new(Layout::Plex, vec![entry]);

        let report = tagger.apply_plan(&plan, &ProgressBar::hidden()).await;

        let expected = library
            .join("Unknown song")
            .join("Unknown song")
            .join("Drive My Car.mp3");
        assert_eq!(report.applied, vec![(source, expected.clone())]);
        assert!(expected.exists());
        assert!(!temp.path().join("Drive My Car.mp3").exists());
    }

    #[tokio::test]
    async fn test_apply_plan_keeps_renamed_flat_destination() {
        let temp = tempdir().unwrap();
        let renamed = dummy_audio_file(temp.path(), "a.mp3");
        let clashing = dummy_audio_file(temp.path(), "b.mp3");
        dummy_audio_file(temp.path(), "My Song.mp3");
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(Placement::default(), true),
        );

        let plan = Plan::new(
            Layout::Flat,
            vec![
                plan_entry(&renamed, Some(PathBuf::from("/anywhere/favourite/take.MP3"))),
                plan_entry(&clashing, Some(temp.path().join("my song.mp3"))),
            ],
        );

        let report = tagger.apply_plan(&plan, &ProgressBar::hidden()).await;

        assert_eq!(
            report.applied,
            vec![
                (renamed, temp.path().join("Take.mp3")),
                (clashing, temp.path().join("My Song (1).mp3")),
            ]
        );
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_apply_plan_plex_ignores_destination_name() {
        let temp = tempdir().unwrap();
        let source = dummy_audio_file(temp.path(), "a.mp3");
        let tagger = tagger_with(
            Arc::new(beatles_recognizer()),
            Arc::new(RecordingTagWriter::default()),
            Arc::new(MockCoverFetcher::ok()),
            options(output_to(temp.path(), Layout::Plex), true),
        );

        let plan = Plan::new(
            Layout::Plex,
            vec![plan_entry(&source, Some(temp.path().join("Take.mp3")))],
        );

        let report = tagger.apply_plan(&plan, &ProgressBar::hidden()).await;

        let expected = temp
            .path()
            .join("The Beatles")
            .join("Rubber Soul")
            .join("Drive My Car.mp3");
        assert_eq!(report.applied, vec![(source, expected)]);
    }
}
