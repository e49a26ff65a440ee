use serde::{de::DeserializeOwned, Deserialize, Serialize};
use storymap_shared::config::StoryConfig;
use storymap_shared::models::{sorted_newest_first, City, Memory, Playlist};
use tracing::warn;

pub const CITIES: &str = "cities";
pub const MEMORIES: &str = "memories";
pub const PLAYLISTS: &str = "playlists";

const STORY_CONFIG_PATH: &str = "/static/story.json";

/// Build the URL of a document collection.
pub fn build_collection_url(base: &str, collection: &str) -> String {
    format!("{}/collections/{}", base.trim_end_matches('/'), collection)
}

/// Build the URL of a single document.
pub fn build_document_url(base: &str, collection: &str, id: &str) -> String {
    format!("{}/{}", build_collection_url(base, collection), id)
}

/// Memories are filtered server-side by chapter.
pub fn build_memories_url(base: &str, chapter_id: &str) -> String {
    format!("{}?chapterId={}", build_collection_url(base, MEMORIES), chapter_id)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DocumentList<T> {
    #[serde(default)]
    pub documents: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreError {
    pub error: String,
}

/// Turn a store error body into a message, falling back to the HTTP status.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<StoreError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("Request failed with status {status}"))
}

fn origin() -> Result<String, String> {
    web_sys::window()
        .ok_or_else(|| "No window".to_string())?
        .location()
        .origin()
        .map_err(|_| "No origin".to_string())
}

fn api_base() -> Result<String, String> {
    Ok(format!("{}/api", origin()?))
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, String> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(error_message(status, &body))
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(resp).await?.json().await.map_err(|e| e.to_string())
}

async fn list<T: DeserializeOwned>(url: &str) -> Result<Vec<T>, String> {
    let list: DocumentList<T> = get_json(url).await?;
    Ok(list.documents)
}

async fn put<T: Serialize>(collection: &str, id: &str, doc: &T) -> Result<(), String> {
    let url = build_document_url(&api_base()?, collection, id);
    let resp = reqwest::Client::new()
        .put(url)
        .json(doc)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(resp).await.map(|_| ())
}

async fn delete(collection: &str, id: &str) -> Result<(), String> {
    let url = build_document_url(&api_base()?, collection, id);
    let resp = reqwest::Client::new()
        .delete(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(resp).await.map(|_| ())
}

// API functions

pub async fn fetch_cities() -> Result<Vec<City>, String> {
    list(&build_collection_url(&api_base()?, CITIES)).await
}

pub async fn save_city(city: &City) -> Result<(), String> {
    put(CITIES, &city.id, city).await
}

/// Write every city back after a reorder. Stops at the first failure.
pub async fn save_city_order(cities: &[City]) -> Result<(), String> {
    for city in cities {
        save_city(city).await?;
    }
    Ok(())
}

pub async fn delete_city(id: &str) -> Result<(), String> {
    delete(CITIES, id).await
}

pub async fn fetch_memories(chapter_id: &str) -> Result<Vec<Memory>, String> {
    let memories = list(&build_memories_url(&api_base()?, chapter_id)).await?;
    Ok(sorted_newest_first(memories))
}

pub async fn add_memory(memory: &Memory) -> Result<(), String> {
    put(MEMORIES, &memory.id, memory).await
}

pub async fn fetch_playlists() -> Result<Vec<Playlist>, String> {
    list(&build_collection_url(&api_base()?, PLAYLISTS)).await
}

pub async fn save_playlist(playlist: &Playlist) -> Result<(), String> {
    put(PLAYLISTS, &playlist.id, playlist).await
}

/// Load the story config. A missing file means defaults; a broken one is an error.
pub async fn fetch_story_config() -> Result<StoryConfig, String> {
    let url = format!("{}{}", origin()?, STORY_CONFIG_PATH);
    let resp = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if resp.status().as_u16() == 404 {
        return Ok(StoryConfig::default());
    }
    let text = check(resp).await?.text().await.map_err(|e| e.to_string())?;
    StoryConfig::from_json(&text).map_err(|e| e.to_string())
}

/// Fall back to the default config when the stored one cannot be used.
pub fn config_or_default(result: Result<StoryConfig, String>) -> StoryConfig {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Story config unusable, using defaults");
        StoryConfig::default()
    })
}

/// Current time as an RFC 3339 string, for new memories.
pub fn iso_now() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}
