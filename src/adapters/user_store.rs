use crate::core::UserStore;
use crate::domain::model::{NewUser, User};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{validate_age, validate_required_text};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

type UserTable = BTreeMap<String, User>;

/// Joins selected terms the way they are stored: `", "`-separated, blanks dropped.
fn join_terms(terms: &[String]) -> String {
    terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_new(table: &mut UserTable, new_user: NewUser) -> Result<User> {
    validate_required_text("username", &new_user.username)?;
    validate_required_text("name", &new_user.name)?;
    validate_required_text("mobile", &new_user.mobile)?;
    validate_age(new_user.age)?;

    let mobile = new_user.mobile.trim().to_string();
    if table.contains_key(&mobile) {
        return Err(AppError::DuplicateUser {
            field: "mobile".to_string(),
            value: mobile,
        });
    }
    let username = new_user.username.trim().to_string();
    if table.values().any(|u| u.username == username) {
        return Err(AppError::DuplicateUser {
            field: "username".to_string(),
            value: username,
        });
    }

    let now = Utc::now();
    let user = User {
        username,
        name: new_user.name.trim().to_string(),
        mobile: mobile.clone(),
        age: new_user.age,
        allergies: join_terms(&new_user.allergies),
        health_conditions: join_terms(&new_user.health_conditions),
        registered_at: now,
        updated_at: now,
    };
    table.insert(mobile, user.clone());
    Ok(user)
}

fn apply_profile_update(
    table: &mut UserTable,
    mobile: &str,
    allergies: &[String],
    health_conditions: &[String],
) -> Result<User> {
    let user = table
        .get_mut(mobile.trim())
        .ok_or_else(|| AppError::UserNotFound {
            mobile: mobile.to_string(),
        })?;

    user.allergies = join_terms(allergies);
    user.health_conditions = join_terms(health_conditions);
    user.updated_at = Utc::now();
    Ok(user.clone())
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<UserTable>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().await;
        insert_new(&mut users, new_user)
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(mobile.trim()).cloned())
    }

    async fn update_profile(
        &self,
        mobile: &str,
        allergies: &[String],
        health_conditions: &[String],
    ) -> Result<User> {
        let mut users = self.users.lock().await;
        apply_profile_update(&mut users, mobile, allergies, health_conditions)
    }
}

/// Users kept in a single JSON file keyed by mobile number.
///
/// Every operation re-reads the file; writes go to a sibling temp file and are renamed
/// into place. The mutex serialises access from this process only.
#[derive(Debug, Clone)]
pub struct FileUserStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<UserTable> {
        match tokio::fs::read(&self.path).await {
            Ok(data) if data.iter().all(u8::is_ascii_whitespace) => Ok(UserTable::new()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, table: &UserTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Saved {} user(s) to {}", table.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        let _guard = self.lock.lock().await;
        let mut table = self.load().await?;
        let user = insert_new(&mut table, new_user)?;
        self.save(&table).await?;
        tracing::info!("Registered user {}", user.username);
        Ok(user)
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>> {
        let _guard = self.lock.lock().await;
        let table = self.load().await?;
        Ok(table.get(mobile.trim()).cloned())
    }

    async fn update_profile(
        &self,
        mobile: &str,
        allergies: &[String],
        health_conditions: &[String],
    ) -> Result<User> {
        let _guard = self.lock.lock().await;
        let mut table = self.load().await?;
        let user = apply_profile_update(&mut table, mobile, allergies, health_conditions)?;
        self.save(&table).await?;
        tracing::info!("Updated profile for {}", user.username);
        Ok(user)
    }
}
