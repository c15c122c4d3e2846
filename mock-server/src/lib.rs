use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub title: String,
    pub description: String,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadTarget {
    pub url: String,
}

/// What the server saw for one accepted upload.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Upload {
    pub target: Uuid,
    /// Part names in the order they arrived.
    pub fields: Vec<String>,
    pub appid: String,
    pub original: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

#[derive(Default)]
pub struct Store {
    pets: Vec<Pet>,
    pending: HashSet<Uuid>,
    uploads: Vec<Upload>,
}

pub type Db = Arc<RwLock<Store>>;

/// The fixture served by `app()`.
pub fn sample_pets() -> Vec<Pet> {
    vec![
        Pet {
            title: "Rex".to_string(),
            description: "A very good boy".to_string(),
            url: "https://images.example.com/rex.jpg".to_string(),
            created: "Tue Jul 18 2023 12:00:00 GMT+0000".to_string(),
        },
        Pet {
            title: "Mia".to_string(),
            description: "cat".to_string(),
            url: "https://images.example.com/mia.jpg".to_string(),
            created: "Wed Jul 19 2023 08:30:00 GMT+0000".to_string(),
        },
        Pet {
            title: "Nibbles".to_string(),
            description: "Hamster who hoards seeds".to_string(),
            url: "https://images.example.com/nibbles.jpg".to_string(),
            created: "Thu Jul 20 2023 17:45:00 GMT+0000".to_string(),
        },
    ]
}

pub fn app() -> Router {
    app_with_pets(sample_pets())
}

pub fn app_with_pets(pets: Vec<Pet>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        pets,
        ..Store::default()
    }));
    Router::new()
        .route("/pets", get(list_pets))
        .route("/upload", get(issue_upload_target))
        .route("/upload/{id}", post(receive_upload))
        .route("/uploads", get(list_uploads))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_pets(State(db): State<Db>) -> Json<Vec<Pet>> {
    Json(db.read().await.pets.clone())
}

async fn issue_upload_target(State(db): State<Db>, headers: HeaderMap) -> Json<UploadTarget> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let id = Uuid::new_v4();
    db.write().await.pending.insert(id);
    tracing::debug!(%id, "issued upload target");
    Json(UploadTarget {
        url: format!("http://{host}/upload/{id}"),
    })
}

async fn receive_upload(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Upload>), StatusCode> {
    if !db.read().await.pending.contains(&id) {
        tracing::warn!(%id, "upload to unknown or used target");
        return Err(StatusCode::NOT_FOUND);
    }

    let mut fields = Vec::new();
    let mut appid = None;
    let mut original = None;
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        fields.push(name.clone());
        match name.as_str() {
            "appid" => appid = Some(field.text().await.map_err(bad_multipart)?),
            "original" => original = Some(field.text().await.map_err(bad_multipart)?),
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                file = Some((filename, content_type, bytes.len()));
            }
            _ => {}
        }
    }

    let (Some(appid), Some(original), Some((filename, content_type, len))) = (appid, original, file)
    else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let mut store = db.write().await;
    // Checked again under the write lock: two uploads may race for one target.
    if !store.pending.remove(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let upload = Upload {
        target: id,
        fields,
        appid,
        original,
        filename,
        content_type,
        len,
    };
    store.uploads.push(upload.clone());
    tracing::info!(%id, appid = %upload.appid, len, "accepted upload");
    Ok((StatusCode::CREATED, Json(upload)))
}

async fn list_uploads(State(db): State<Db>) -> Json<Vec<Upload>> {
    Json(db.read().await.uploads.clone())
}

fn bad_multipart(err: MultipartError) -> StatusCode {
    tracing::warn!(error = %err, "malformed multipart body");
    StatusCode::BAD_REQUEST
}
