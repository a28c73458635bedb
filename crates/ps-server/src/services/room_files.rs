//! Room → document URL mapping.
//!
//! Independent of the relay: uploads write it, lookups read it, and the
//! relay never touches it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use redis::AsyncCommands;
use tokio::sync::Mutex;

use ps_common::config::RoomsBackend;
use ps_common::AppConfig;

/// Redis key prefix for room file URLs.
const ROOM_FILE_PREFIX: &str = "ps:room-file:";

pub enum RoomFileStore {
    Json(JsonRoomFileStore),
    Redis(RedisRoomFileStore),
}

impl RoomFileStore {
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.rooms.backend {
            RoomsBackend::Json => Ok(Self::Json(
                JsonRoomFileStore::load(&config.rooms.json_path).await?,
            )),
            RoomsBackend::Redis => {
                let client = redis::Client::open(config.redis.url.as_str())?;
                let conn = client.get_connection_manager().await?;
                tracing::info!("Connected to Redis");
                Ok(Self::Redis(RedisRoomFileStore { conn }))
            }
        }
    }

    /// File URL previously stored for a room.
    pub async fn get(&self, room_id: &str) -> anyhow::Result<Option<String>> {
        match self {
            Self::Json(store) => Ok(store.get(room_id).await),
            Self::Redis(store) => store.get(room_id).await,
        }
    }

    /// Point a room at a file URL, replacing any earlier one.
    pub async fn set(&self, room_id: &str, file_url: &str) -> anyhow::Result<()> {
        match self {
            Self::Json(store) => store.set(room_id, file_url).await,
            Self::Redis(store) => store.set(room_id, file_url).await,
        }?;
        tracing::info!(room_id, file_url, "Room file updated");
        Ok(())
    }
}

// ─── JSON file ───────────────────────────────────────────────

/// In-memory map rewritten to a pretty-printed JSON object on every change.
pub struct JsonRoomFileStore {
    path: PathBuf,
    map: Mutex<BTreeMap<String, String>>,
}

impl JsonRoomFileStore {
    /// Read the map from `path`, starting empty if the file does not exist.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map: BTreeMap<String, String> = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| anyhow::anyhow!("Invalid room map {}: {}", path.display(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read room map {}: {}",
                    path.display(),
                    e
                ))
            }
        };
        tracing::info!(path = %path.display(), rooms = map.len(), "Room map loaded");
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    async fn get(&self, room_id: &str) -> Option<String> {
        self.map.lock().await.get(room_id).cloned()
    }

    async fn set(&self, room_id: &str, file_url: &str) -> anyhow::Result<()> {
        let mut map = self.map.lock().await;
        map.insert(room_id.to_string(), file_url.to_string());
        // Lock held across the write: file contents never go backwards.
        let raw = serde_json::to_vec_pretty(&*map)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to write room map {}: {}", self.path.display(), e))?;
        Ok(())
    }
}

// ─── Redis ───────────────────────────────────────────────────

pub struct RedisRoomFileStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisRoomFileStore {
    async fn get(&self, room_id: &str) -> anyhow::Result<Option<String>> {
        let key = format!("{}{}", ROOM_FILE_PREFIX, room_id);
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(&key).await?)
    }

    async fn set(&self, room_id: &str, file_url: &str) -> anyhow::Result<()> {
        let key = format!("{}{}", ROOM_FILE_PREFIX, room_id);
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(&key, file_url).await?;
        Ok(())
    }
}
