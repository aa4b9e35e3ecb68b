/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/parameters.rs
 * Responsibility: File-backed CRUD store for the bot's key-value parameters
 */

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::RwLock;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Parameter not found")]
    NotFound,
    #[error("A parameter with this name already exists")]
    DuplicateName,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Text,
    Number,
    Url,
    Key,
    Boolean,
    Email,
}

impl ParameterKind {
    pub const ALL: [ParameterKind; 6] = [
        ParameterKind::Text,
        ParameterKind::Number,
        ParameterKind::Url,
        ParameterKind::Key,
        ParameterKind::Boolean,
        ParameterKind::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterKind::Text => "text",
            ParameterKind::Number => "number",
            ParameterKind::Url => "url",
            ParameterKind::Key => "key",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Email => "email",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                StoreError::Invalid(format!("Type must be one of: {}", names.join(", ")))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload as it arrives from the API or CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Option<Value>,
}

impl ParameterInput {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            kind: Some(kind.into()),
            value: Some(Value::String(value.into())),
        }
    }

    fn validate(&self) -> Result<(String, ParameterKind, String), StoreError> {
        let missing = || StoreError::Invalid("Name, type, and value are required".to_string());

        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).ok_or_else(missing)?;
        let kind = self.kind.as_deref().filter(|k| !k.is_empty()).ok_or_else(missing)?;
        let value = match &self.value {
            None | Some(Value::Null) => return Err(missing()),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        Ok((name.to_string(), kind.parse()?, value))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    next_id: i64,
    parameters: Vec<Parameter>,
}

impl StoreState {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.parameters.iter().any(|p| p.name == name && Some(p.id) != except)
    }
}

pub struct ParameterStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl ParameterStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state: StoreState = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read parameter store at {:?}", path))?;
            serde_yaml::from_str(&content).context("Failed to parse parameter store")?
        } else {
            StoreState::default()
        };
        tracing::info!(path = %path.display(), count = state.parameters.len(), "parameter store ready");
        Ok(Self { path, state: RwLock::new(state) })
    }

    fn persist(&self, state: &StoreState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }
        let yaml = serde_yaml::to_string(state)?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write parameter store at {:?}", self.path))?;
        Ok(())
    }

    /// Newest first.
    pub async fn list(&self) -> Vec<Parameter> {
        let state = self.state.read().await;
        let mut parameters = state.parameters.clone();
        parameters.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        parameters
    }

    pub async fn get(&self, id: i64) -> Result<Parameter, StoreError> {
        let state = self.state.read().await;
        state.parameters.iter().find(|p| p.id == id).cloned().ok_or(StoreError::NotFound)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Parameter, StoreError> {
        let state = self.state.read().await;
        state.parameters.iter().find(|p| p.name == name).cloned().ok_or(StoreError::NotFound)
    }

    pub async fn create(&self, input: &ParameterInput) -> Result<Parameter, StoreError> {
        let (name, kind, value) = input.validate()?;
        let mut state = self.state.write().await;
        if state.name_taken(&name, None) {
            return Err(StoreError::DuplicateName);
        }

        let now = Utc::now();
        let mut next = state.clone();
        next.next_id = next.next_id.max(0) + 1;
        let parameter = Parameter {
            id: next.next_id,
            name,
            kind,
            value,
            created_at: now,
            updated_at: now,
        };
        next.parameters.push(parameter.clone());
        self.persist(&next)?;
        *state = next;

        tracing::info!(id = parameter.id, name = %parameter.name, "parameter created");
        Ok(parameter)
    }

    pub async fn update(&self, id: i64, input: &ParameterInput) -> Result<Parameter, StoreError> {
        let (name, kind, value) = input.validate()?;
        let mut state = self.state.write().await;
        if !state.parameters.iter().any(|p| p.id == id) {
            return Err(StoreError::NotFound);
        }
        if state.name_taken(&name, Some(id)) {
            return Err(StoreError::DuplicateName);
        }

        let mut next = state.clone();
        let Some(parameter) = next.parameters.iter_mut().find(|p| p.id == id) else {
            return Err(StoreError::NotFound);
        };
        parameter.name = name;
        parameter.kind = kind;
        parameter.value = value;
        parameter.updated_at = Utc::now();
        let updated = parameter.clone();
        self.persist(&next)?;
        *state = next;

        tracing::info!(id, name = %updated.name, "parameter updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let before = next.parameters.len();
        next.parameters.retain(|p| p.id != id);
        if next.parameters.len() == before {
            return Err(StoreError::NotFound);
        }
        self.persist(&next)?;
        *state = next;

        tracing::info!(id, "parameter deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_assigns_ids_and_persists() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data").join("parameters.yml");

        let store = ParameterStore::open(&path)?;
        let first = store.create(&ParameterInput::new("api_url", "url", "https://example.com")).await?;
        let second = store.create(&ParameterInput::new("retries", "number", "3")).await?;
        assert_eq!((first.id, second.id), (1, 2));

        let reopened = ParameterStore::open(&path)?;
        assert_eq!(reopened.get(2).await?.value, "3");
        let third = reopened.create(&ParameterInput::new("debug", "boolean", "true")).await?;
        assert_eq!(third.id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ParameterStore::open(dir.path().join("p.yml"))?;
        store.create(&ParameterInput::new("a", "text", "1")).await?;
        let b = store.create(&ParameterInput::new("b", "text", "2")).await?;
        store.delete(b.id).await?;
        let c = store.create(&ParameterInput::new("c", "text", "3")).await?;
        assert_eq!(c.id, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_newest_first() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ParameterStore::open(dir.path().join("p.yml"))?;
        for name in ["one", "two", "three"] {
            store.create(&ParameterInput::new(name, "text", "x")).await?;
        }
        let names: Vec<_> = store.list().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["three", "two", "one"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_validation_messages() {
        let dir = tempdir().unwrap();
        let store = ParameterStore::open(dir.path().join("p.yml")).unwrap();

        let err = store.create(&ParameterInput::new("  ", "text", "x")).await.unwrap_err();
        assert_eq!(err.to_string(), "Name, type, and value are required");

        let no_value = ParameterInput { value: None, ..ParameterInput::new("n", "text", "") };
        assert!(matches!(store.create(&no_value).await, Err(StoreError::Invalid(_))));

        let err = store.create(&ParameterInput::new("n", "color", "red")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type must be one of: text, number, url, key, boolean, email"
        );
    }

    #[tokio::test]
    async fn test_duplicate_names_rejected_on_create_and_update() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let store = ParameterStore::open(dir.path().join("p.yml"))?;
        store.create(&ParameterInput::new("token", "key", "abc")).await?;
        let other = store.create(&ParameterInput::new("owner", "email", "a@b.c")).await?;

        assert!(matches!(
            store.create(&ParameterInput::new("token", "key", "zzz")).await,
            Err(StoreError::DuplicateName)
        ));
        assert!(matches!(
            store.update(other.id, &ParameterInput::new("token", "key", "zzz")).await,
            Err(StoreError::DuplicateName)
        ));

        let renamed = store.update(other.id, &ParameterInput::new("owner", "email", "x@y.z")).await?;
        assert_eq!(renamed.value, "x@y.z");
        assert!(renamed.updated_at >= renamed.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let dir = tempdir().unwrap();
        let store = ParameterStore::open(dir.path().join("p.yml")).unwrap();
        assert!(matches!(store.get(9).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(9).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.update(9, &ParameterInput::new("a", "text", "b")).await,
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let input: ParameterInput =
            serde_json::from_str(r#"{"name": "limit", "type": "number", "value": 42}"#).unwrap();
        let (_, kind, value) = input.validate().unwrap();
        assert_eq!(kind, ParameterKind::Number);
        assert_eq!(value, "42");
    }
}
