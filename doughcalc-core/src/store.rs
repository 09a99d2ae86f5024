//! Recipe store: named recipe snapshots keyed by an opaque id.
//!
//! The calculator only depends on the [`RecipeStore`] trait. Two backends are
//! provided: [`MemoryRecipeStore`] and [`FileRecipeStore`], which keeps the
//! whole collection in one JSON document under a single fixed key.

use crate::input::sanitize;
use crate::recipe::{Recipe, SavedRecipe};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key the recipe collection is stored under.
pub const COLLECTION_KEY: &str = "pizza-dough-recipes";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("recipe not found: {id}")]
    NotFound { id: String },

    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub trait RecipeStore {
    /// All snapshots, oldest first.
    fn list(&self) -> StoreResult<Vec<SavedRecipe>>;

    /// Store a snapshot of `recipe` under `name`, assigning a fresh id.
    fn save(&mut self, name: &str, recipe: &Recipe) -> StoreResult<SavedRecipe>;

    /// Remove a snapshot. Returns `false` if no snapshot had that id.
    fn delete(&mut self, id: &str) -> StoreResult<bool>;

    fn load(&self, id: &str) -> StoreResult<SavedRecipe>;
}

/// Save `recipe` unless `name` is blank.
///
/// A blank name declines the save and returns `Ok(None)`.
pub fn save_named<S>(store: &mut S, name: &str, recipe: &Recipe) -> StoreResult<Option<SavedRecipe>>
where
    S: RecipeStore + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        debug!("blank recipe name, save declined");
        return Ok(None);
    }
    store.save(name, recipe).map(Some)
}

/// Millisecond timestamp id, bumped past any numeric id already taken.
fn allocate_id<'a>(existing: impl Iterator<Item = &'a str>) -> String {
    let now = chrono::Utc::now().timestamp_millis();
    let taken = existing.filter_map(|id| id.parse::<i64>().ok()).max();
    match taken {
        Some(max) if max >= now => (max + 1).to_string(),
        _ => now.to_string(),
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: Vec<SavedRecipe>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_recipes(recipes: Vec<SavedRecipe>) -> Self {
        Self { recipes }
    }

    fn snapshot(&self) -> &[SavedRecipe] {
        &self.recipes
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn list(&self) -> StoreResult<Vec<SavedRecipe>> {
        Ok(self.recipes.clone())
    }

    fn save(&mut self, name: &str, recipe: &Recipe) -> StoreResult<SavedRecipe> {
        let saved = SavedRecipe {
            id: allocate_id(self.recipes.iter().map(|r| r.id.as_str())),
            name: name.to_string(),
            recipe: *recipe,
        };
        self.recipes.push(saved.clone());
        Ok(saved)
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        Ok(self.recipes.len() != before)
    }

    fn load(&self, id: &str) -> StoreResult<SavedRecipe> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

#[derive(Debug, Serialize)]
struct Collection<'a> {
    #[serde(rename = "pizza-dough-recipes")]
    recipes: &'a [SavedRecipe],
}

/// JSON-file backed store. Every mutation rewrites the file.
#[derive(Clone, Debug)]
pub struct FileRecipeStore {
    path: PathBuf,
    inner: MemoryRecipeStore,
}

/// Decode one stored record.
///
/// A record that does not decode as a whole is rebuilt key by key: keys whose
/// value does not fit (wrong type, unknown style, negative count) are dropped
/// and take their defaults. One level of nesting is handled the same way, so a
/// bad `preFerment.type` only loses that field. Non-objects yield `None`.
fn decode_record(index: usize, raw: Value) -> Option<SavedRecipe> {
    let fields = match raw {
        Value::Object(fields) => fields,
        other => {
            warn!(index, record = %other, "dropping stored recipe that is not an object");
            return None;
        }
    };
    if let Ok(saved) = serde_json::from_value::<SavedRecipe>(Value::Object(fields.clone())) {
        return Some(saved);
    }

    let decodes = |doc: &Map<String, Value>| {
        serde_json::from_value::<SavedRecipe>(Value::Object(doc.clone())).is_ok()
    };
    let mut kept = Map::new();
    for (key, value) in fields {
        kept.insert(key.clone(), value.clone());
        if decodes(&kept) {
            continue;
        }
        kept.remove(&key);
        let Value::Object(inner) = value else {
            warn!(index, field = %key, "stored recipe field unreadable, using default");
            continue;
        };
        kept.insert(key.clone(), Value::Object(Map::new()));
        for (sub, sub_value) in inner {
            if let Some(Value::Object(slot)) = kept.get_mut(&key) {
                slot.insert(sub.clone(), sub_value);
            }
            if !decodes(&kept) {
                if let Some(Value::Object(slot)) = kept.get_mut(&key) {
                    slot.remove(&sub);
                }
                warn!(index, field = %format!("{key}.{sub}"), "stored recipe field unreadable, using default");
            }
        }
        if !decodes(&kept) {
            kept.remove(&key);
            warn!(index, field = %key, "stored recipe field unreadable, using default");
        }
    }
    match serde_json::from_value::<SavedRecipe>(Value::Object(kept)) {
        Ok(saved) => Some(saved),
        Err(err) => {
            warn!(index, %err, "dropping unreadable stored recipe");
            None
        }
    }
}

/// On-disk shape as read back: records stay raw until [`decode_record`].
#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "pizza-dough-recipes", default)]
    recipes: Vec<Value>,
}

/// Decode a collection document. Fails only when the document itself is
/// unusable; bad records are handled one by one.
fn decode_collection(raw: &[u8]) -> serde_json::Result<Vec<SavedRecipe>> {
    let doc: RawCollection = serde_json::from_slice(raw)?;
    Ok(doc
        .recipes
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| decode_record(index, record))
        .collect())
}

impl FileRecipeStore {
    /// Open the collection at `path`.
    ///
    /// A missing or unreadable document is treated as empty. Within a
    /// readable document, bad records lose only their bad fields.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let recipes = match fs::read(&path) {
            Ok(raw) => match decode_collection(&raw) {
                Ok(recipes) => recipes,
                Err(err) => {
                    warn!(?path, %err, "recipe collection is corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "no recipe collection yet");
                Vec::new()
            }
            Err(err) => {
                warn!(?path, %err, "recipe collection unreadable, starting empty");
                Vec::new()
            }
        };
        let recipes: Vec<SavedRecipe> = recipes
            .into_iter()
            .map(|r| SavedRecipe {
                recipe: sanitize(r.recipe),
                ..r
            })
            .collect();
        info!(?path, count = recipes.len(), "opened recipe collection");
        Self {
            path,
            inner: MemoryRecipeStore::from_recipes(recipes),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StoreResult<()> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let doc = Collection {
            recipes: self.inner.snapshot(),
        };
        let raw = serde_json::to_vec_pretty(&doc)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!(path = ?self.path, "recipe collection written");
        Ok(())
    }
}

impl RecipeStore for FileRecipeStore {
    fn list(&self) -> StoreResult<Vec<SavedRecipe>> {
        self.inner.list()
    }

    fn save(&mut self, name: &str, recipe: &Recipe) -> StoreResult<SavedRecipe> {
        let saved = self.inner.save(name, recipe)?;
        self.persist()?;
        info!(id = %saved.id, name = %saved.name, "recipe saved");
        Ok(saved)
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let removed = self.inner.delete(id)?;
        if removed {
            self.persist()?;
            info!(id, "recipe deleted");
        }
        Ok(removed)
    }

    fn load(&self, id: &str) -> StoreResult<SavedRecipe> {
        self.inner.load(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RecipeEdit;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_name_declines_save() {
        let mut store = MemoryRecipeStore::new();
        let out = save_named(&mut store, "   ", &Recipe::default()).unwrap();
        assert!(out.is_none());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn save_trims_name_and_assigns_unique_ids() {
        let mut store = MemoryRecipeStore::new();
        let a = save_named(&mut store, " Weekend ", &Recipe::default()).unwrap().unwrap();
        let b = save_named(&mut store, "Weekday", &Recipe::default()).unwrap().unwrap();
        assert_eq!(a.name, "Weekend");
        assert_ne!(a.id, b.id);
        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Weekend".to_string(), "Weekday".to_string()]);
    }

    #[test]
    fn load_and_delete_by_id() {
        let mut store = MemoryRecipeStore::new();
        let recipe = Recipe::default().apply(RecipeEdit::DoughBalls(6));
        let saved = store.save("Six", &recipe).unwrap();

        assert_eq!(store.load(&saved.id).unwrap().recipe, recipe);
        assert!(store.delete(&saved.id).unwrap());
        assert!(!store.delete(&saved.id).unwrap());
        assert!(store.load(&saved.id).unwrap_err().is_not_found());
    }

    #[test]
    fn allocate_id_skips_taken_ids() {
        let far_future = "99999999999999";
        assert_eq!(allocate_id([far_future].into_iter()), "100000000000000");
        assert!(allocate_id(["not-a-number"].into_iter()).parse::<i64>().is_ok());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");

        let mut store = FileRecipeStore::open(&path);
        let saved = store.save("Biga night", &Recipe::default()).unwrap();
        drop(store);

        let reopened = FileRecipeStore::open(&path);
        assert_eq!(reopened.load(&saved.id).unwrap(), saved);

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[COLLECTION_KEY][0]["name"], "Biga night");
        assert_eq!(raw[COLLECTION_KEY][0]["doughBalls"], 4);
    }

    #[test]
    fn missing_or_corrupt_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileRecipeStore::open(dir.path().join("none.json"));
        assert!(missing.list().unwrap().is_empty());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, b"{ not json").unwrap();
        let mut store = FileRecipeStore::open(&bad);
        assert!(store.list().unwrap().is_empty());
        store.save("Fresh", &Recipe::default()).unwrap();
        assert_eq!(FileRecipeStore::open(&bad).list().unwrap().len(), 1);
    }

    #[test]
    fn one_bad_record_does_not_cost_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        fs::write(
            &path,
            r#"{"pizza-dough-recipes":[
                {"id":"1","name":"Good","doughBalls":6},
                {"id":"2","name":"Bad","ballWeight":null,"doughBalls":-1,
                 "preFerment":{"enabled":true,"type":"sourdough","percentage":30}},
                "not a record"
            ]}"#,
        )
        .unwrap();

        let mut store = FileRecipeStore::open(&path);
        let names: Vec<String> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Good".to_string(), "Bad".to_string()]);

        let bad = store.load("2").unwrap().recipe;
        let d = Recipe::default();
        assert_eq!(bad.ball_weight, d.ball_weight);
        assert_eq!(bad.dough_balls, d.dough_balls);
        assert!(bad.pre_ferment.enabled);
        assert_eq!(bad.pre_ferment.kind, d.pre_ferment.kind);
        assert_eq!(bad.pre_ferment.percentage, 30.0);

        store.save("New", &Recipe::default()).unwrap();
        let reopened = FileRecipeStore::open(&path);
        let names: Vec<String> = reopened.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["Good".to_string(), "Bad".to_string(), "New".to_string()]
        );
        assert_eq!(reopened.load("1").unwrap().recipe.dough_balls, 6);
    }

    #[test]
    fn wrong_collection_shape_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        fs::write(&path, r#"{"pizza-dough-recipes":{"id":"1"}}"#).unwrap();
        assert!(FileRecipeStore::open(&path).list().unwrap().is_empty());

        fs::write(&path, r#"{"other-key":[]}"#).unwrap();
        assert!(FileRecipeStore::open(&path).list().unwrap().is_empty());
    }

    #[test]
    fn partial_records_are_defaulted_and_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        fs::write(
            &path,
            r#"{"pizza-dough-recipes":[{"id":"1","name":"Old","ballWeight":10,"ingredients":{"flour":90,"water":65}}]}"#,
        )
        .unwrap();

        let store = FileRecipeStore::open(&path);
        let old = store.load("1").unwrap();
        assert_eq!(old.recipe.ball_weight, 50.0);
        assert_eq!(old.recipe.ingredients.flour, 100.0);
        assert_eq!(old.recipe.ingredients.water, 65.0);
        assert_eq!(old.recipe.ingredients.salt, 2.5);
        assert_eq!(old.recipe.timing, Recipe::default().timing);
    }
}
