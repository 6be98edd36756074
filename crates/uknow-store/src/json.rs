//! JSON file store.
//!
//! Layout under the root directory:
//!
//! ```text
//! sets/<set-id>.json   one pretty-printed card set with its cards
//! records.jsonl        performance records, one JSON object per line
//! ```
//!
//! Set files are written to a temporary file and renamed into place, so a set
//! and its cards become visible together. Records are appended with a single
//! write per line and never rewritten.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use uuid::Uuid;

use uknow_core::error::StoreError;
use uknow_core::model::{Card, CardSet, CardSetSummary, PerformanceRecord};
use uknow_core::traits::{CardStore, RecordStore};

const SETS_DIR: &str = "sets";
const RECORDS_FILE: &str = "records.jsonl";

/// File-backed store rooted at a directory.
pub struct JsonFileStore {
    root: PathBuf,
    append_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(root.join(SETS_DIR))?;
        tracing::debug!("opened json store at {}", root.display());
        Ok(Self {
            root,
            append_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sets_dir(&self) -> PathBuf {
        self.root.join(SETS_DIR)
    }

    fn set_path(&self, id: Uuid) -> PathBuf {
        self.sets_dir().join(format!("{id}.json"))
    }

    fn records_path(&self) -> PathBuf {
        self.root.join(RECORDS_FILE)
    }

    fn read_set(path: &Path) -> Result<CardSet, StoreError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Every readable set on disk. Unreadable files are skipped with a warning.
    fn all_sets(&self) -> Result<Vec<CardSet>, StoreError> {
        let mut sets = Vec::new();
        for entry in fs::read_dir(self.sets_dir())? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::read_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => tracing::warn!("skipping {}: {e}", path.display()),
            }
        }
        Ok(sets)
    }
}

impl CardStore for JsonFileStore {
    fn save_set(&self, set: &CardSet) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(set)?;
        let mut tmp = NamedTempFile::new_in(self.sets_dir())?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.set_path(set.id))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn card(&self, id: Uuid) -> Result<Option<Card>, StoreError> {
        Ok(self
            .all_sets()?
            .into_iter()
            .flat_map(|s| s.cards)
            .find(|c| c.id == id))
    }

    fn cards(&self, ids: &[Uuid]) -> Result<Vec<Card>, StoreError> {
        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        Ok(self
            .all_sets()?
            .into_iter()
            .flat_map(|s| s.cards)
            .filter(|c| wanted.contains(&c.id))
            .collect())
    }

    fn cards_in_set(&self, set_id: Uuid) -> Result<Vec<Card>, StoreError> {
        Ok(self.set(set_id)?.map(|s| s.cards).unwrap_or_default())
    }

    fn set(&self, id: Uuid) -> Result<Option<CardSet>, StoreError> {
        let path = self.set_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_set(&path).map(Some)
    }

    fn list_sets(&self) -> Result<Vec<CardSetSummary>, StoreError> {
        let mut summaries: Vec<CardSetSummary> =
            self.all_sets()?.iter().map(CardSet::summary).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

impl RecordStore for JsonFileStore {
    fn append(&self, record: &PerformanceRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.append_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.records_path())?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn records_for_learner(&self, learner_id: &str) -> Result<Vec<PerformanceRecord>, StoreError> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut records = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PerformanceRecord>(&line) {
                Ok(record) if record.learner_id == learner_id => records.push(record),
                Ok(_) => {}
                Err(e) => tracing::warn!("skipping corrupt record at {}:{}: {e}", path.display(), n + 1),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uknow_core::model::Outcome;

    fn make_set(title: &str, terms: &[&str]) -> CardSet {
        let id = Uuid::new_v4();
        CardSet {
            id,
            title: title.into(),
            created_at: Utc::now(),
            cards: terms
                .iter()
                .map(|t| Card {
                    id: Uuid::new_v4(),
                    term: t.to_string(),
                    question: format!("Who or what is {t}?"),
                    answer: format!("{t} appears in the notes"),
                    context: format!("{t} appears in the notes"),
                    set_id: id,
                })
                .collect(),
        }
    }

    #[test]
    fn persists_sets_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let set = make_set("History", &["Rome", "Carthage"]);
        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.save_set(&set).unwrap();
        }

        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.set(set.id).unwrap(), Some(set.clone()));
        assert_eq!(store.card(set.cards[1].id).unwrap(), Some(set.cards[1].clone()));
        assert_eq!(store.list_sets().unwrap()[0].card_count, 2);
        assert!(dir.path().join("sets").join(format!("{}.json", set.id)).exists());
    }

    #[test]
    fn batch_card_lookup_spans_sets() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let history = make_set("History", &["Rome", "Carthage"]);
        let science = make_set("Science", &["Newton"]);
        store.save_set(&history).unwrap();
        store.save_set(&science).unwrap();

        let ids = [history.cards[1].id, science.cards[0].id, Uuid::new_v4()];
        let mut terms: Vec<String> = store
            .cards(&ids)
            .unwrap()
            .into_iter()
            .map(|c| c.term)
            .collect();
        terms.sort();
        assert_eq!(terms, vec!["Carthage", "Newton"]);
        assert!(store.cards(&[]).unwrap().is_empty());
    }

    #[test]
    fn missing_set_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.set(Uuid::new_v4()).unwrap().is_none());
        assert!(store.cards_in_set(Uuid::new_v4()).unwrap().is_empty());
        assert!(store.list_sets().unwrap().is_empty());
    }

    #[test]
    fn records_append_and_filter() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.records_for_learner("ana").unwrap().is_empty());

        let card_id = Uuid::new_v4();
        let a1 = PerformanceRecord::new(card_id, "ana", Outcome::Correct);
        let b1 = PerformanceRecord::new(card_id, "ben", Outcome::Correct);
        let a2 = PerformanceRecord::new(card_id, "ana", Outcome::Incorrect);
        for r in [&a1, &b1, &a2] {
            store.append(r).unwrap();
        }

        let content = std::fs::read_to_string(dir.path().join("records.jsonl")).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(store.records_for_learner("ana").unwrap(), vec![a1, a2]);
    }

    #[test]
    fn corrupt_lines_and_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        let record = PerformanceRecord::new(Uuid::new_v4(), "ana", Outcome::Correct);
        store.append(&record).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("records.jsonl"))
            .unwrap();
        writeln!(file, "{{not json").unwrap();
        store
            .append(&PerformanceRecord::new(record.card_id, "ana", Outcome::Incorrect))
            .unwrap();
        assert_eq!(store.records_for_learner("ana").unwrap().len(), 2);

        std::fs::write(dir.path().join("sets").join("broken.json"), "{").unwrap();
        let set = make_set("Ok", &["Athens"]);
        store.save_set(&set).unwrap();
        assert_eq!(store.list_sets().unwrap().len(), 1);
    }
}
