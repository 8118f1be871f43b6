// Application state and the operations the UI can trigger
//
// Every operation that changes the store runs in the same order:
// mutate -> persist -> refilter -> bump revision (the frontend re-renders on a new revision).
// The selection is a path and is resolved against the store on every read.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::catalog::{self, ExerciseDisplay, ExpansionState, RenderTree, filterStore, normalizeSearchTerm, project, tags};
use crate::dialogs::{Confirm, Confirmation};
use crate::error::{AppError, AppResult};
use crate::extraction::ExtractionRequest;
use crate::files::FileOps;
use crate::models::{ContainerKey, Exercise, Settings, SortKey, Store};
use crate::storage::{self, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RenameOutcome {
    Unchanged,
    Renamed { oldPath: String, newPath: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    pub success: bool,
    pub partialSuccess: bool,
    pub deletedPaths: Vec<String>,
    pub failedPaths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DeleteOutcome {
    Cancelled,
    Completed(DeleteReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ImportOutcome {
    NoExercises,
    Imported { courseName: String, week: String, count: usize },
}

/// Everything the frontend needs to draw the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibrarySnapshot {
    pub revision: u64,
    pub searchTerm: String,
    pub sortKey: SortKey,
    pub tree: RenderTree,
    pub current: Option<ExerciseDisplay>,
    pub importing: bool,
}

pub struct Library {
    db: Store,
    filtered: Option<Store>, // None while no search is active: the view is `db` itself
    searchTerm: String,
    sortKey: SortKey,
    expansion: ExpansionState,
    currentPath: Option<String>,
    settings: Settings,
    importing: bool,
    revision: u64,
    persistence: Box<dyn KeyValueStore>,
}

impl Library {
    /// Load and migrate persisted data
    pub fn load(persistence: Box<dyn KeyValueStore>) -> Self {
        let db = catalog::migrate(&storage::loadRawExercises(persistence.as_ref()));
        let settings = storage::loadSettings(persistence.as_ref());
        info!(
            "[Library::load] {} courses, keywords: {}",
            db.courses.len(),
            settings.keywords
        );

        Self {
            db,
            filtered: None,
            searchTerm: String::new(),
            sortKey: SortKey::default(),
            expansion: ExpansionState::default(),
            currentPath: None,
            settings,
            importing: false,
            revision: 0,
            persistence,
        }
    }

    // ============================================
    // READ SIDE
    // ============================================

    pub fn store(&self) -> &Store {
        &self.db
    }

    /// Current filtered view (the store itself when no search is active)
    pub fn view(&self) -> &Store {
        self.filtered.as_ref().unwrap_or(&self.db)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn searchTerm(&self) -> &str {
        &self.searchTerm
    }

    pub fn sortKey(&self) -> SortKey {
        self.sortKey
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn isImporting(&self) -> bool {
        self.importing
    }

    /// The displayed exercise, looked up in the store
    pub fn currentExercise(&self) -> Option<&Exercise> {
        self.currentPath.as_deref().and_then(|p| self.db.findExercise(p))
    }

    pub fn currentDisplay(&self) -> Option<ExerciseDisplay> {
        self.currentExercise().map(ExerciseDisplay::from)
    }

    pub fn renderTree(&mut self) -> RenderTree {
        if !self.expansion.isInitialized() {
            let courses = self.view().courses.keys().cloned().collect::<Vec<_>>();
            self.expansion.seedCourses(courses.iter());
        }
        project(
            self.view(),
            self.sortKey,
            &self.expansion,
            self.currentExercise().map(|e| e.path.as_str()),
            !self.searchTerm.is_empty(),
        )
    }

    pub fn snapshot(&mut self) -> LibrarySnapshot {
        LibrarySnapshot {
            revision: self.revision,
            searchTerm: self.searchTerm.clone(),
            sortKey: self.sortKey,
            tree: self.renderTree(),
            current: self.currentDisplay(),
            importing: self.importing,
        }
    }

    // ============================================
    // VIEW STATE
    // ============================================

    pub fn search(&mut self, term: &str) {
        self.searchTerm = normalizeSearchTerm(term);
        self.refilter();
        self.revision += 1;
        debug!("[Library::search] '{}' -> {} courses", self.searchTerm, self.view().courses.len());
    }

    pub fn setSort(&mut self, key: SortKey) {
        self.sortKey = key;
        self.revision += 1;
    }

    pub fn setExpanded(&mut self, key: ContainerKey, expanded: bool) {
        self.expansion.setExpanded(key, expanded);
    }

    pub fn select(&mut self, path: &str) -> AppResult<ExerciseDisplay> {
        let exercise = self
            .db
            .findExercise(path)
            .ok_or_else(|| AppError::NotFound(path.to_string()))?;
        let display = ExerciseDisplay::from(exercise);
        self.currentPath = Some(path.to_string());
        self.revision += 1;
        Ok(display)
    }

    pub fn clearSelection(&mut self) {
        if self.currentPath.take().is_some() {
            self.revision += 1;
        }
    }

    fn refilter(&mut self) {
        self.filtered = match filterStore(&self.db, &self.searchTerm) {
            std::borrow::Cow::Borrowed(_) => None,
            std::borrow::Cow::Owned(view) => Some(view),
        };
    }

    /// Persist, refilter, signal. Persistence is fire-and-forget: a failed write is logged.
    fn commit(&mut self, reason: &str) {
        if let Err(e) = storage::saveExercises(self.persistence.as_mut(), &self.db) {
            error!("[Library::commit] {}: {}", reason, e);
        }
        self.refilter();
        self.revision += 1;
        debug!("[Library::commit] {} (revision {})", reason, self.revision);
    }

    fn forgetSelectionIfGone(&mut self, deleted: &[String]) {
        if let Some(current) = &self.currentPath {
            if deleted.contains(current) {
                info!("[Library] Displayed exercise {} was deleted, clearing view", current);
                self.currentPath = None;
            }
        }
    }

    // ============================================
    // TAGS
    // ============================================

    /// Returns false when the tag was already there
    pub fn addTag(&mut self, path: &str, tag: &str) -> AppResult<bool> {
        let exercise = self
            .db
            .findExerciseMut(path)
            .ok_or_else(|| AppError::NotFound(path.to_string()))?;
        let added = tags::addTag(&mut exercise.tags, tag)?;
        if added {
            self.commit("addTag");
        }
        Ok(added)
    }

    /// Returns false when the tag was not there
    pub fn removeTag(&mut self, path: &str, tag: &str) -> AppResult<bool> {
        let exercise = self
            .db
            .findExerciseMut(path)
            .ok_or_else(|| AppError::NotFound(path.to_string()))?;
        let removed = tags::removeTag(&mut exercise.tags, tag);
        if removed {
            self.commit("removeTag");
        }
        Ok(removed)
    }

    // ============================================
    // RENAME
    // ============================================

    pub fn renameExercise(&mut self, path: &str, newName: &str, files: &dyn FileOps) -> AppResult<RenameOutcome> {
        if !self.db.contains(path) {
            return Err(AppError::NotFound(path.to_string()));
        }
        let Some(newPath) = renamedPath(path, newName)? else {
            return Ok(RenameOutcome::Unchanged);
        };
        if self.db.contains(&newPath) {
            return Err(AppError::validation("An exercise with that name already exists"));
        }

        files.rename(path, &newPath)?;

        // same record, new path: tags and position are untouched
        if let Some(exercise) = self.db.findExerciseMut(path) {
            exercise.path = newPath.clone();
        }
        if self.currentPath.as_deref() == Some(path) {
            self.currentPath = Some(newPath.clone());
        }
        self.commit("renameExercise");

        info!("[Library::renameExercise] {} -> {}", path, newPath);
        Ok(RenameOutcome::Renamed {
            oldPath: path.to_string(),
            newPath,
        })
    }

    // ============================================
    // DELETE
    // ============================================

    pub fn deleteExercise(&mut self, path: &str, confirm: &dyn Confirm, files: &dyn FileOps) -> AppResult<DeleteOutcome> {
        let location = self
            .db
            .locate(path)
            .ok_or_else(|| AppError::NotFound(path.to_string()))?;

        let answer = confirm.confirm(
            "Confirm Deletion",
            "Are you sure you want to delete this exercise?",
            &format!("You are about to permanently delete:\n{}", path),
        );
        if answer == Confirmation::Cancelled {
            return Ok(DeleteOutcome::Cancelled);
        }

        files.delete(path)?;

        self.db.removeExercise(&location.course, &location.week, location.index);
        let deleted = vec![path.to_string()];
        self.forgetSelectionIfGone(&deleted);
        self.commit("deleteExercise");

        Ok(DeleteOutcome::Completed(DeleteReport {
            success: true,
            partialSuccess: false,
            deletedPaths: deleted,
            failedPaths: Vec::new(),
        }))
    }

    pub fn deleteWeek(&mut self, course: &str, week: &str, confirm: &dyn Confirm, files: &dyn FileOps) -> AppResult<DeleteOutcome> {
        let paths = self.db.weekPaths(course, week);
        if paths.is_empty() {
            return Err(AppError::NotFound(format!("{} / {}", course, week)));
        }

        let answer = confirm.confirm(
            "Confirm Week Deletion",
            &format!("Are you sure you want to delete \"{}\" from \"{}\"?", week, course),
            &format!("This will permanently delete {} exercise(s).", paths.len()),
        );
        if answer == Confirmation::Cancelled {
            return Ok(DeleteOutcome::Cancelled);
        }

        let report = self.deleteBatch(course, Some(week), &paths, files);
        Ok(DeleteOutcome::Completed(report))
    }

    pub fn deleteCourse(&mut self, course: &str, confirm: &dyn Confirm, files: &dyn FileOps) -> AppResult<DeleteOutcome> {
        let paths = self.db.coursePaths(course);
        if paths.is_empty() {
            return Err(AppError::NotFound(course.to_string()));
        }

        let answer = confirm.confirm(
            "Confirm Course Deletion",
            &format!("Are you sure you want to delete the entire course \"{}\"?", course),
            &format!("This will permanently delete {} exercise(s) across all weeks.", paths.len()),
        );
        if answer == Confirmation::Cancelled {
            return Ok(DeleteOutcome::Cancelled);
        }

        let report = self.deleteBatch(course, None, &paths, files);
        if !report.deletedPaths.is_empty() {
            removeEmptyDirs(&report.deletedPaths, files);
        }
        Ok(DeleteOutcome::Completed(report))
    }

    fn deleteBatch(&mut self, course: &str, week: Option<&str>, paths: &[String], files: &dyn FileOps) -> DeleteReport {
        let batch = files.deleteAll(paths);
        let report = DeleteReport {
            success: batch.failedPaths.is_empty(),
            partialSuccess: !batch.deletedPaths.is_empty() && !batch.failedPaths.is_empty(),
            deletedPaths: batch.deletedPaths,
            failedPaths: batch.failedPaths,
        };

        if report.partialSuccess {
            warn!(
                "[Library::deleteBatch] {}: {} file(s) could not be deleted",
                course,
                report.failedPaths.len()
            );
        }

        if !report.deletedPaths.is_empty() {
            self.db.removePaths(course, week, &report.deletedPaths);
            self.forgetSelectionIfGone(&report.deletedPaths);
            self.commit(if week.is_some() { "deleteWeek" } else { "deleteCourse" });
        }
        report
    }

    // ============================================
    // IMPORT
    // ============================================

    /// Validate an import request and mark an import as running
    pub fn beginImport(&mut self, pdfPath: &str, courseName: &str, weekNumber: &str) -> AppResult<ExtractionRequest> {
        let courseName = courseName.trim();
        let weekNumber = weekNumber.trim();
        if courseName.is_empty() || weekNumber.is_empty() {
            return Err(AppError::validation("Please fill in all fields"));
        }
        if pdfPath.trim().is_empty() {
            return Err(AppError::validation("Please select a PDF file"));
        }
        if self.importing {
            return Err(AppError::validation("An import is already running"));
        }

        self.importing = true;
        self.revision += 1;
        Ok(ExtractionRequest {
            pdfPath: pdfPath.trim().to_string(),
            courseName: courseName.to_string(),
            weekNumber: weekNumber.to_string(),
        })
    }

    /// Clear the running-import flag, whatever the extraction outcome was
    pub fn endImport(&mut self) {
        self.importing = false;
        self.revision += 1;
    }

    /// Store extracted exercises and show the first one
    pub fn ingestExtraction(&mut self, courseName: &str, weekNumber: &str, paths: &[String]) -> ImportOutcome {
        let Some(week) = self.db.ingest(courseName, weekNumber, paths) else {
            info!("[Library::ingestExtraction] No exercises found for {} week {}", courseName, weekNumber);
            return ImportOutcome::NoExercises;
        };

        self.expansion.setExpanded(ContainerKey::course(courseName), true);
        self.expansion.setExpanded(ContainerKey::week(courseName, &week), true);
        self.currentPath = paths.first().cloned();
        self.commit("ingestExtraction");

        ImportOutcome::Imported {
            courseName: courseName.to_string(),
            week,
            count: paths.len(),
        }
    }

    // ============================================
    // SETTINGS
    // ============================================

    pub fn saveSettings(&mut self, keywords: &str) -> AppResult<&Settings> {
        let keywords = keywords.trim();
        if keywords.is_empty() {
            return Err(AppError::validation("Please enter at least one keyword"));
        }
        self.settings = Settings {
            keywords: keywords.to_string(),
        };
        self.persistSettings()?;
        Ok(&self.settings)
    }

    /// Returns false when the keyword was already present
    pub fn addKeyword(&mut self, keyword: &str) -> AppResult<bool> {
        let mut keywords = self.settings.keywordList();
        if !tags::addTag(&mut keywords, keyword)? {
            return Ok(false);
        }
        self.settings = Settings::fromKeywords(&keywords);
        self.persistSettings()?;
        Ok(true)
    }

    /// Returns false when the keyword was not present
    pub fn removeKeyword(&mut self, keyword: &str) -> AppResult<bool> {
        let mut keywords = self.settings.keywordList();
        if !keywords.iter().any(|k| k == keyword) {
            return Ok(false);
        }
        if keywords.len() == 1 {
            return Err(AppError::validation("Please enter at least one keyword"));
        }
        tags::removeTag(&mut keywords, keyword);
        self.settings = Settings::fromKeywords(&keywords);
        self.persistSettings()?;
        Ok(true)
    }

    fn persistSettings(&mut self) -> AppResult<()> {
        storage::saveSettings(self.persistence.as_mut(), &self.settings)?;
        info!("[Library] Settings saved, keywords: {}", self.settings.keywords);
        Ok(())
    }
}

/// New path for a rename: same directory, `<newName>.png`. None when nothing would change.
pub fn renamedPath(path: &str, newName: &str) -> AppResult<Option<String>> {
    let newName = newName.trim();
    let newName = newName.strip_suffix(".png").unwrap_or(newName);
    if newName.is_empty() {
        return Ok(None);
    }
    if newName.contains(['/', '\\']) || newName == "." || newName == ".." {
        return Err(AppError::validation("Name must not contain path separators"));
    }

    let current = Path::new(path);
    let currentStem = current.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    if currentStem == newName {
        return Ok(None);
    }

    let fileName = format!("{}.png", newName);
    let newPath = match current.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(fileName),
        _ => PathBuf::from(fileName),
    };
    Ok(Some(newPath.to_string_lossy().to_string()))
}

/// Best-effort cleanup of week directories (and their course directory) left empty by a delete
fn removeEmptyDirs(deleted: &[String], files: &dyn FileOps) {
    let mut dirs: Vec<PathBuf> = deleted
        .iter()
        .filter_map(|p| Path::new(p).parent().map(Path::to_path_buf))
        .collect();
    dirs.sort();
    dirs.dedup();

    let mut parents = Vec::new();
    for dir in &dirs {
        if files.removeDirIfEmpty(dir) {
            if let Some(parent) = dir.parent() {
                parents.push(parent.to_path_buf());
            }
        }
    }
    parents.sort();
    parents.dedup();
    for parent in parents {
        files.removeDirIfEmpty(&parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::FixedAnswer;
    use crate::files::LocalFileOps;
    use crate::storage::{EXERCISES_KEY, MemoryStore, SETTINGS_KEY};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Records calls; paths listed in `failing` fail
    #[derive(Default)]
    struct FakeFiles {
        failing: HashSet<String>,
        deleted: RefCell<Vec<String>>,
        renamed: RefCell<Vec<(String, String)>>,
        removedDirs: RefCell<Vec<PathBuf>>,
    }

    impl FakeFiles {
        fn failingOn(paths: &[&str]) -> Self {
            Self {
                failing: paths.iter().map(|p| p.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl FileOps for FakeFiles {
        fn rename(&self, oldPath: &str, newPath: &str) -> AppResult<()> {
            if self.failing.contains(oldPath) {
                return Err(AppError::fileOperation(oldPath, "permission denied"));
            }
            self.renamed.borrow_mut().push((oldPath.to_string(), newPath.to_string()));
            Ok(())
        }

        fn delete(&self, path: &str) -> AppResult<()> {
            if self.failing.contains(path) {
                return Err(AppError::fileOperation(path, "permission denied"));
            }
            self.deleted.borrow_mut().push(path.to_string());
            Ok(())
        }

        fn removeDirIfEmpty(&self, dir: &Path) -> bool {
            self.removedDirs.borrow_mut().push(dir.to_path_buf());
            true
        }
    }

    const YES: FixedAnswer = FixedAnswer(Confirmation::Confirmed);
    const NO: FixedAnswer = FixedAnswer(Confirmation::Cancelled);

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|p| p.to_string()).collect()
    }

    fn library() -> (Library, MemoryStore) {
        let kv = MemoryStore::new();
        (Library::load(Box::new(kv.clone())), kv)
    }

    fn withAlgo() -> (Library, MemoryStore) {
        let (mut lib, kv) = library();
        lib.ingestExtraction("Algo", "1", &paths(&["/a/exercise_2.png", "/a/exercise_1.png"]));
        (lib, kv)
    }

    #[test]
    fn test_load_migrates_legacy_data_and_settings() {
        let kv = MemoryStore::with(EXERCISES_KEY, json!({ "Algo": { "Week 1": ["/a/exercise_1.png"] } }));
        let lib = Library::load(Box::new(kv));
        assert_eq!(lib.store().weekPaths("Algo", "Week 1"), vec!["/a/exercise_1.png"]);
        assert_eq!(lib.settings(), &Settings::default());
        assert!(std::ptr::eq(lib.view(), lib.store()));
    }

    #[test]
    fn test_algo_scenario() {
        let (mut lib, _) = withAlgo();

        let tree = lib.renderTree();
        let leaves: Vec<_> = tree.courses[0].weeks[0].exercises.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(leaves, vec!["/a/exercise_1.png", "/a/exercise_2.png"]);

        lib.search("algo");
        assert_eq!(lib.view().exercises().count(), 2);

        lib.search("nomatch");
        assert!(lib.view().isEmpty());
        assert_eq!(lib.renderTree().emptyMessage.as_deref(), Some("No exercises found"));
    }

    #[test]
    fn test_ingest_selects_first_exercise_and_persists() {
        let (lib, kv) = withAlgo();
        assert_eq!(lib.currentExercise().unwrap().path, "/a/exercise_2.png");
        assert_eq!(kv.writes(EXERCISES_KEY), 1);
    }

    #[test]
    fn test_ingest_nothing_is_reported_and_not_persisted() {
        let (mut lib, kv) = library();
        assert_eq!(lib.ingestExtraction("Algo", "1", &[]), ImportOutcome::NoExercises);
        assert!(lib.store().isEmpty());
        assert_eq!(kv.writes(EXERCISES_KEY), 0);
    }

    #[test]
    fn test_tag_add_then_remove_persists_twice() {
        let (mut lib, kv) = withAlgo();
        let before = lib.store().findExercise("/a/exercise_1.png").unwrap().tags.clone();
        let writesBefore = kv.writes(EXERCISES_KEY);

        assert!(lib.addTag("/a/exercise_1.png", "Midterm").unwrap());
        assert!(lib.removeTag("/a/exercise_1.png", "midterm").unwrap());

        assert_eq!(lib.store().findExercise("/a/exercise_1.png").unwrap().tags, before);
        assert_eq!(kv.writes(EXERCISES_KEY) - writesBefore, 2);
    }

    #[test]
    fn test_duplicate_tag_and_absent_tag_do_not_persist() {
        let (mut lib, kv) = withAlgo();
        lib.addTag("/a/exercise_1.png", "graphs").unwrap();
        let writes = kv.writes(EXERCISES_KEY);

        assert!(!lib.addTag("/a/exercise_1.png", " GRAPHS ").unwrap());
        assert!(!lib.removeTag("/a/exercise_1.png", "proofs").unwrap());
        assert!(lib.addTag("/a/exercise_1.png", "  ").is_err());
        assert_eq!(kv.writes(EXERCISES_KEY), writes);
    }

    #[test]
    fn test_tag_edit_refreshes_filtered_view() {
        let (mut lib, _) = withAlgo();
        lib.search("graphs");
        assert!(lib.view().isEmpty());

        lib.addTag("/a/exercise_2.png", "graphs").unwrap();
        assert_eq!(lib.view().weekPaths("Algo", "Week 1"), vec!["/a/exercise_2.png"]);
        // the edit went to the canonical store, not to a copy
        assert_eq!(lib.store().findExercise("/a/exercise_2.png").unwrap().tags, vec!["graphs"]);
    }

    #[test]
    fn test_mutations_bump_revision() {
        let (mut lib, _) = withAlgo();
        let revision = lib.revision();
        lib.addTag("/a/exercise_1.png", "x").unwrap();
        assert!(lib.revision() > revision);
    }

    #[test]
    fn test_rename_displayed_exercise_keeps_tags_and_position() {
        let (mut lib, kv) = withAlgo();
        lib.addTag("/a/exercise_1.png", "graphs").unwrap();
        lib.select("/a/exercise_1.png").unwrap();
        let location = lib.store().locate("/a/exercise_1.png").unwrap();
        let writes = kv.writes(EXERCISES_KEY);

        let files = FakeFiles::default();
        let outcome = lib.renameExercise("/a/exercise_1.png", "dijkstra", &files).unwrap();

        assert_eq!(
            outcome,
            RenameOutcome::Renamed { oldPath: "/a/exercise_1.png".into(), newPath: "/a/dijkstra.png".into() }
        );
        let current = lib.currentExercise().unwrap();
        assert_eq!(current.path, "/a/dijkstra.png");
        assert_eq!(current.tags, vec!["graphs"]);
        let moved = lib.store().locate("/a/dijkstra.png").unwrap();
        assert_eq!((moved.course, moved.week, moved.index), (location.course, location.week, location.index));
        assert_eq!(files.renamed.borrow().len(), 1);
        assert_eq!(kv.writes(EXERCISES_KEY), writes + 1);
    }

    #[test]
    fn test_rename_failure_leaves_store_untouched() {
        let (mut lib, kv) = withAlgo();
        let before = lib.store().clone();
        let writes = kv.writes(EXERCISES_KEY);

        let files = FakeFiles::failingOn(&["/a/exercise_1.png"]);
        let err = lib.renameExercise("/a/exercise_1.png", "dijkstra", &files).unwrap_err();

        assert!(matches!(err, AppError::FileOperation { .. }));
        assert_eq!(lib.store(), &before);
        assert_eq!(kv.writes(EXERCISES_KEY), writes);
    }

    #[test]
    fn test_rename_to_same_or_empty_name_is_noop() {
        let (mut lib, _) = withAlgo();
        let files = FakeFiles::default();
        assert_eq!(lib.renameExercise("/a/exercise_1.png", "exercise_1", &files).unwrap(), RenameOutcome::Unchanged);
        assert_eq!(lib.renameExercise("/a/exercise_1.png", "  ", &files).unwrap(), RenameOutcome::Unchanged);
        assert!(files.renamed.borrow().is_empty());
    }

    #[test]
    fn test_rename_onto_existing_exercise_is_rejected() {
        let (mut lib, _) = withAlgo();
        let files = FakeFiles::default();
        let err = lib.renameExercise("/a/exercise_1.png", "exercise_2", &files).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(files.renamed.borrow().is_empty());
    }

    #[test]
    fn test_renamed_path() {
        assert_eq!(renamedPath("/a/b/exercise_1.png", "graphs").unwrap().as_deref(), Some("/a/b/graphs.png"));
        assert_eq!(renamedPath("/a/b/exercise_1.png", "graphs.png").unwrap().as_deref(), Some("/a/b/graphs.png"));
        assert_eq!(renamedPath("exercise_1.png", "graphs").unwrap().as_deref(), Some("graphs.png"));
        assert!(renamedPath("/a/exercise_1.png", "../evil").is_err());
    }

    #[test]
    fn test_delete_cancelled_changes_nothing() {
        let (mut lib, kv) = withAlgo();
        let writes = kv.writes(EXERCISES_KEY);
        let files = FakeFiles::default();

        assert_eq!(lib.deleteExercise("/a/exercise_1.png", &NO, &files).unwrap(), DeleteOutcome::Cancelled);
        assert_eq!(lib.deleteWeek("Algo", "Week 1", &NO, &files).unwrap(), DeleteOutcome::Cancelled);
        assert_eq!(lib.deleteCourse("Algo", &NO, &files).unwrap(), DeleteOutcome::Cancelled);

        assert_eq!(lib.store().exercises().count(), 2);
        assert!(files.deleted.borrow().is_empty());
        assert_eq!(kv.writes(EXERCISES_KEY), writes);
    }

    #[test]
    fn test_delete_sole_exercise_cascades_and_clears_selection() {
        let (mut lib, _) = library();
        lib.ingestExtraction("Algo", "1", &paths(&["/a/exercise_1.png"]));
        assert!(lib.currentExercise().is_some());

        let files = FakeFiles::default();
        lib.deleteExercise("/a/exercise_1.png", &YES, &files).unwrap();

        assert!(lib.store().isEmpty());
        assert!(lib.currentExercise().is_none());
        assert!(lib.snapshot().current.is_none());
    }

    #[test]
    fn test_delete_exercise_failure_is_reported() {
        let (mut lib, _) = withAlgo();
        let files = FakeFiles::failingOn(&["/a/exercise_1.png"]);
        let err = lib.deleteExercise("/a/exercise_1.png", &YES, &files).unwrap_err();
        assert!(matches!(err, AppError::FileOperation { .. }));
        assert!(lib.store().contains("/a/exercise_1.png"));
    }

    #[test]
    fn test_delete_exercise_from_filtered_view_hits_the_right_record() {
        let (mut lib, _) = withAlgo();
        lib.addTag("/a/exercise_1.png", "graphs").unwrap();
        lib.search("graphs");
        // position 0 in the view, position 1 in the store
        assert_eq!(lib.view().weekPaths("Algo", "Week 1"), vec!["/a/exercise_1.png"]);

        lib.deleteExercise("/a/exercise_1.png", &YES, &FakeFiles::default()).unwrap();
        assert_eq!(lib.store().weekPaths("Algo", "Week 1"), vec!["/a/exercise_2.png"]);
        assert!(lib.view().isEmpty());
    }

    #[test]
    fn test_partial_week_delete() {
        let (mut lib, _) = library();
        lib.ingestExtraction("Algo", "1", &paths(&["/a/exercise_1.png", "/a/exercise_2.png", "/a/exercise_3.png"]));
        lib.select("/a/exercise_1.png").unwrap();

        let files = FakeFiles::failingOn(&["/a/exercise_2.png"]);
        let outcome = lib.deleteWeek("Algo", "Week 1", &YES, &files).unwrap();

        let DeleteOutcome::Completed(report) = outcome else {
            panic!("expected a completed delete");
        };
        assert!(report.partialSuccess);
        assert!(!report.success);
        assert_eq!(report.deletedPaths.len(), 2);
        assert_eq!(report.failedPaths, vec!["/a/exercise_2.png"]);
        assert_eq!(lib.store().weekPaths("Algo", "Week 1"), vec!["/a/exercise_2.png"]);
        assert!(lib.currentExercise().is_none());
    }

    #[test]
    fn test_week_delete_where_everything_fails_keeps_store() {
        let (mut lib, kv) = withAlgo();
        let writes = kv.writes(EXERCISES_KEY);
        let files = FakeFiles::failingOn(&["/a/exercise_1.png", "/a/exercise_2.png"]);

        let DeleteOutcome::Completed(report) = lib.deleteWeek("Algo", "Week 1", &YES, &files).unwrap() else {
            panic!("expected a completed delete");
        };
        assert!(!report.success && !report.partialSuccess);
        assert_eq!(lib.store().exercises().count(), 2);
        assert_eq!(kv.writes(EXERCISES_KEY), writes);
    }

    #[test]
    fn test_delete_last_week_removes_course() {
        let (mut lib, _) = withAlgo();
        lib.ingestExtraction("Nets", "1", &paths(&["/n/exercise_1.png"]));

        lib.deleteWeek("Algo", "Week 1", &YES, &FakeFiles::default()).unwrap();
        assert!(lib.store().course("Algo").is_none());
        assert!(lib.store().course("Nets").is_some());
        // selection was in Nets and survives
        assert_eq!(lib.currentExercise().unwrap().path, "/n/exercise_1.png");
    }

    #[test]
    fn test_delete_course_removes_everything_and_cleans_dirs() {
        let (mut lib, _) = withAlgo();
        lib.ingestExtraction("Algo", "2", &paths(&["/b/exercise_1.png"]));
        let files = FakeFiles::default();

        let DeleteOutcome::Completed(report) = lib.deleteCourse("Algo", &YES, &files).unwrap() else {
            panic!("expected a completed delete");
        };
        assert!(report.success);
        assert_eq!(report.deletedPaths.len(), 3);
        assert!(lib.store().isEmpty());
        assert!(lib.currentExercise().is_none());
        assert!(files.removedDirs.borrow().contains(&PathBuf::from("/a")));
        assert!(files.removedDirs.borrow().contains(&PathBuf::from("/b")));
    }

    #[test]
    fn test_delete_unknown_targets() {
        let (mut lib, _) = withAlgo();
        let files = FakeFiles::default();
        assert!(matches!(lib.deleteWeek("Algo", "Week 9", &YES, &files), Err(AppError::NotFound(_))));
        assert!(matches!(lib.deleteCourse("Nope", &YES, &files), Err(AppError::NotFound(_))));
        assert!(matches!(lib.deleteExercise("/nope.png", &YES, &files), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_with_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let week = dir.path().join("Algo").join("week-1");
        std::fs::create_dir_all(&week).unwrap();
        let files: Vec<String> = (1..=2)
            .map(|i| {
                let p = week.join(format!("exercise_{}.png", i));
                std::fs::write(&p, b"png").unwrap();
                p.to_string_lossy().to_string()
            })
            .collect();

        let (mut lib, _) = library();
        lib.ingestExtraction("Algo", "1", &files);
        lib.deleteCourse("Algo", &YES, &LocalFileOps).unwrap();

        assert!(lib.store().isEmpty());
        assert!(!week.exists());
        assert!(!dir.path().join("Algo").exists());
    }

    #[test]
    fn test_expansion_survives_search_and_sort() {
        let (mut lib, _) = withAlgo();
        lib.ingestExtraction("Nets", "1", &paths(&["/n/exercise_1.png"]));
        lib.setExpanded(ContainerKey::course("Algo"), false);

        lib.setSort(SortKey::CourseDesc);
        lib.search("a");
        lib.search("");
        let tree = lib.renderTree();
        let algo = tree.courses.iter().find(|c| c.name == "Algo").unwrap();
        let nets = tree.courses.iter().find(|c| c.name == "Nets").unwrap();
        assert!(!algo.expanded);
        assert!(nets.expanded && nets.weeks[0].expanded);
        assert_eq!(tree.courses[0].name, "Nets");
    }

    #[test]
    fn test_first_render_of_loaded_data_expands_courses() {
        let kv = MemoryStore::with(EXERCISES_KEY, json!({ "Algo": { "Week 1": ["/a.png"] }, "Nets": { "Week 1": ["/n.png"] } }));
        let mut lib = Library::load(Box::new(kv));
        assert!(lib.renderTree().courses.iter().all(|c| c.expanded));

        lib.setExpanded(ContainerKey::course("Algo"), false);
        assert!(!lib.renderTree().courses[0].expanded);
    }

    #[test]
    fn test_select_unknown_path() {
        let (mut lib, _) = withAlgo();
        assert!(matches!(lib.select("/nope.png"), Err(AppError::NotFound(_))));
        let display = lib.select("/a/exercise_1.png").unwrap();
        assert_eq!(display.title, "Exercise 1");
        lib.clearSelection();
        assert!(lib.currentDisplay().is_none());
    }

    #[test]
    fn test_import_validation_and_single_flight() {
        let (mut lib, _) = library();
        assert!(matches!(lib.beginImport("/s.pdf", " ", "1"), Err(AppError::Validation(_))));
        assert!(matches!(lib.beginImport("/s.pdf", "Algo", ""), Err(AppError::Validation(_))));
        assert!(matches!(lib.beginImport("", "Algo", "1"), Err(AppError::Validation(_))));

        let request = lib.beginImport("/s.pdf", " Algo ", " 1 ").unwrap();
        assert_eq!(request.courseName, "Algo");
        assert_eq!(request.weekNumber, "1");
        assert!(lib.isImporting());
        assert!(matches!(lib.beginImport("/s.pdf", "Algo", "2"), Err(AppError::Validation(_))));

        lib.endImport();
        assert!(lib.beginImport("/s.pdf", "Algo", "2").is_ok());
    }

    #[test]
    fn test_keyword_editor() {
        let (mut lib, kv) = library();
        assert!(lib.addKeyword(" Aufgabe ").unwrap());
        assert!(!lib.addKeyword("aufgabe").unwrap());
        assert!(lib.addKeyword("").is_err());
        assert_eq!(lib.settings().keywords, "Tutoraufgabe,Exercise,Hausaufgabe,aufgabe");

        assert!(lib.removeKeyword("Exercise").unwrap());
        assert!(!lib.removeKeyword("Exercise").unwrap());
        assert_eq!(lib.settings().keywordList(), vec!["Tutoraufgabe", "Hausaufgabe", "aufgabe"]);
        assert_eq!(kv.writes(SETTINGS_KEY), 2);
    }

    #[test]
    fn test_last_keyword_cannot_be_removed() {
        let (mut lib, _) = library();
        lib.saveSettings("only").unwrap();
        assert!(matches!(lib.removeKeyword("only"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_save_settings_validates_and_persists() {
        let (mut lib, kv) = library();
        assert!(matches!(lib.saveSettings("   "), Err(AppError::Validation(_))));
        assert_eq!(kv.writes(SETTINGS_KEY), 0);

        lib.saveSettings(" Blatt,Aufgabe ").unwrap();
        let reloaded = Library::load(Box::new(kv.clone()));
        assert_eq!(reloaded.settings().keywords, "Blatt,Aufgabe");
    }
}
