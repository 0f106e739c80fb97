use crate::core::{Lead, LeadStore, LeadSubmission};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Lead collection kept as a single JSON array on disk.
///
/// Every append rewrites the whole file through a sibling `.tmp` file and a
/// rename, so readers never see a half-written array. Appends are serialized
/// by an async mutex.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates the parent directory and an empty `[]` collection if the file
    /// does not exist yet. Existing files are left alone.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        store.ensure_file().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if !fs::try_exists(&self.path).await? {
            fs::write(&self.path, b"[]").await?;
            tracing::info!("📁 Created empty leads file at {}", self.path.display());
        }
        Ok(())
    }

    async fn read_leads(&self) -> Result<Vec<Lead>> {
        let content = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl LeadStore for JsonFileStore {
    async fn append(&self, submission: LeadSubmission, source_ip: &str) -> Result<Lead> {
        let lead = Lead::new(submission, source_ip);

        let _guard = self.write_lock.lock().await;
        let mut leads = self.read_leads().await?;
        leads.push(lead.clone());

        let serialized = serde_json::to_string_pretty(&leads)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, serialized).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(
            "Leads file {} now holds {} record(s)",
            self.path.display(),
            leads.len()
        );
        Ok(lead)
    }

    async fn all(&self) -> Result<Vec<Lead>> {
        self.read_leads().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn submission(name: &str) -> LeadSubmission {
        LeadSubmission {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: "Please quote an Apex trigger.".to_string(),
            services: vec!["apex".to_string()],
            contact_me_by_fax: String::new(),
        }
    }

    #[tokio::test]
    async fn test_open_creates_missing_file_and_parent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("leads.json");

        let store = JsonFileStore::open(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_leads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leads.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.append(submission("Ada"), "1.2.3.4").await.unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_persists_and_cleans_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leads.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        let first = store.append(submission("Ada"), "203.0.113.5").await.unwrap();
        let second = store.append(submission("Alan"), "198.51.100.1").await.unwrap();

        let leads = store.all().await.unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].id, first.id);
        assert_eq!(leads[1].id, second.id);
        assert_eq!(leads[0].masked_ip, "203.0.xxx.xxx");
        assert!(!temp_dir.path().join("leads.json.tmp").exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"maskedIp\": \"198.51.xxx.xxx\""));
        assert!(!raw.contains("198.51.100.1"));
    }

    #[tokio::test]
    async fn test_append_fails_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leads.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = store.append(submission("Ada"), "1.2.3.4").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_append_fails_on_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leads.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();

        let err = store.append(submission("Ada"), "1.2.3.4").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Storage);
        // 原檔不應被覆蓋
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_all_kept() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(
            JsonFileStore::open(temp_dir.path().join("leads.json"))
                .await
                .unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append(submission(&format!("Client{}", i)), "10.0.0.1")
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        let stored: Vec<_> = store.all().await.unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(stored.len(), 20);
        assert!(ids.iter().all(|id| stored.contains(id)));
    }
}
