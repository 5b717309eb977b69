//! # Catalog HTTP and Realtime API
//!
//! Owns the application state and exposes it over axum.
//!
//! ## Endpoints
//!
//! | Method/Path             | Description                                      |
//! |-------------------------|--------------------------------------------------|
//! | `GET /images_info`      | id, tags and creation time of every image        |
//! | `GET /image/:image_id`  | image content, through the response simulator   |
//! | `POST /add_image`       | store a submitted image and notify subscribers    |
//! | `GET /ws`               | WebSocket upgrade for new-image notifications    |
//! | `GET /health`           | liveness plus catalog counters                   |
//!
//! ## Message Flow
//!
//! ```text
//! Client -> POST /add_image
//!   AppState: draw tags -> store.insert (write lock) -> subscriptions.broadcast(id)
//! Subscribers <- "51"
//! Client <- {id, tags, time_of_creation}
//! ```
//!
//! CORS is fully permissive: the server is a development backend.

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::common::config::{tag_vocabulary, N_TAGS_PER_IMAGE, RESPONSE_DELAY};
use crate::common::messages::{Image, ImageInfo};
use crate::processing::generator;
use crate::server::error::{ApiError, ApiResult};
use crate::server::metrics::CatalogMetrics;
use crate::server::simulator::{OutcomeStrategy, RandomOutcome, ResponseSimulator};
use crate::server::store::ImageStore;
use crate::server::subscriptions::SubscriptionManager;

/// Current Unix time in seconds.
pub fn current_time() -> i64 {
    chrono::Utc::now().timestamp()
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Everything the catalog keeps at runtime: the image store, the tag
/// vocabulary, the response simulator and the open subscriptions.
///
/// Shared with every handler as [`SharedState`].
pub struct AppState {
    /// Image records and the id counter, mutated only by [`add_image`](Self::add_image)
    store: RwLock<ImageStore>,

    /// Fixed `tag1`..`tag10` labels
    vocabulary: Vec<String>,

    /// Delay and fault injection for fetches
    simulator: ResponseSimulator,

    /// Open WebSocket subscribers
    subscriptions: SubscriptionManager,

    /// Counters reported by `/health`
    metrics: CatalogMetrics,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Seed the catalog with sample images and use random fetch outcomes.
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(RandomOutcome), RESPONSE_DELAY)
    }

    /// Seed the catalog with sample images and answer fetches through
    /// `strategy`, holding delayed fetches for `delay`.
    pub fn with_strategy(strategy: Arc<dyn OutcomeStrategy>, delay: Duration) -> Self {
        let vocabulary = tag_vocabulary();
        let store = ImageStore::with_samples(&mut rand::thread_rng(), &vocabulary, current_time());
        let metrics = CatalogMetrics::new();

        Self {
            store: RwLock::new(store),
            vocabulary,
            simulator: ResponseSimulator::with_strategy(strategy, delay, metrics.clone()),
            subscriptions: SubscriptionManager::new(),
            metrics,
        }
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    pub fn metrics(&self) -> &CatalogMetrics {
        &self.metrics
    }

    /// Metadata of every stored image, ascending by id.
    pub async fn list_infos(&self) -> Vec<ImageInfo> {
        self.store.read().await.infos()
    }

    /// Fetch an image by id.
    ///
    /// The store lock is released before the simulator runs, so a delayed
    /// fetch never holds up other requests.
    ///
    /// # Returns
    /// - `Ok(Image)`: the stored image, unchanged
    /// - `Err(ApiError::NotFound)`: unknown id, whatever the drawn outcome
    /// - `Err(ApiError::ServerFault)`: injected failure
    pub async fn get_image(&self, id: i64) -> ApiResult<Image> {
        let image = {
            let store = self.store.read().await;
            match u64::try_from(id).ok().and_then(|id| store.get(id)) {
                Some(record) => record.image.clone(),
                None => return Err(ApiError::NotFound(id.to_string())),
            }
        };

        self.simulator.respond(image).await
    }

    /// Store a submitted image and notify every subscriber of its id.
    ///
    /// The image is accepted as-is; rectangle geometry is not validated.
    /// Notification failures are logged and never reach the caller.
    ///
    /// # Returns
    /// The new record's metadata, with the same timestamp that was stored.
    pub async fn add_image(&self, image: Image) -> ImageInfo {
        let tags = generator::random_tags(&mut rand::thread_rng(), &self.vocabulary, N_TAGS_PER_IMAGE);
        let time_of_creation = current_time();

        let id = {
            let mut store = self.store.write().await;
            store.insert(image, tags.clone(), time_of_creation)
        };
        self.metrics.increment_images_added();
        info!("📥 Stored image #{} with tags {:?}", id, tags);

        let delivered = self.subscriptions.broadcast(&id.to_string()).await;
        self.metrics.add_broadcasts_sent(delivered as u64);
        debug!("📤 Image #{} announced to {} subscribers", id, delivered);

        ImageInfo {
            id,
            tags,
            time_of_creation,
        }
    }

    pub async fn image_count(&self) -> usize {
        self.store.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Build the axum application with all routes and permissive CORS.
pub fn create_app(state: SharedState) -> Router {
    Router::new()
        .route("/images_info", get(images_info_handler))
        .route("/image/:image_id", get(get_image_handler))
        .route("/add_image", post(add_image_handler))
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn images_info_handler(State(state): State<SharedState>) -> Json<Vec<ImageInfo>> {
    Json(state.list_infos().await)
}

/// Interpret the `:image_id` path segment.
///
/// Any integer literal is a valid id, however large or negative; those that
/// do not fit an `i64` can never be stored and are reported as not found.
fn parse_image_id(raw: &str) -> ApiResult<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Err(ApiError::NotFound(raw.to_string()))
    } else {
        Err(ApiError::InvalidId(raw.to_string()))
    }
}

pub async fn get_image_handler(
    State(state): State<SharedState>,
    Path(image_id): Path<String>,
) -> ApiResult<Json<Image>> {
    debug!("📥 Fetch request for image #{}", image_id);
    let id = parse_image_id(&image_id)?;
    state.get_image(id).await.map(Json)
}

pub async fn add_image_handler(
    State(state): State<SharedState>,
    Json(image): Json<Image>,
) -> Json<ImageInfo> {
    info!(
        "📥 Received image {}x{} with {} rectangles",
        image.width,
        image.height,
        image.rectangles.len()
    );
    Json(state.add_image(image).await)
}

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "image-catalog",
        "images": state.image_count().await,
        "subscribers": state.subscriptions.subscriber_count().await,
        "metrics": state.metrics.snapshot(),
    }))
}

/// WebSocket upgrade handler: `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serve one subscriber until either side goes away.
///
/// Inbound frames are read only to notice the disconnect; their content is
/// ignored.
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let (conn_id, mut rx) = state.subscriptions.register().await;

    // Forward broadcast messages to the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break; // Client disconnected
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    warn!("❌ WebSocket error on subscriber {}: {}", conn_id, e);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.subscriptions.unregister(&conn_id).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::N_SAMPLE_IMAGES;
    use crate::server::simulator::{FixedOutcome, ResponseOutcome};

    fn state_with(outcome: ResponseOutcome) -> AppState {
        AppState::with_strategy(Arc::new(FixedOutcome(outcome)), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_initial_catalog() {
        let state = state_with(ResponseOutcome::Standard);
        let infos = state.list_infos().await;

        assert_eq!(infos.len(), N_SAMPLE_IMAGES);
        assert_eq!(infos.first().map(|i| i.id), Some(1));
        assert_eq!(infos.last().map(|i| i.id), Some(N_SAMPLE_IMAGES as u64));
    }

    #[tokio::test]
    async fn test_add_returns_stored_timestamp() {
        let state = state_with(ResponseOutcome::Standard);
        let image = Image {
            width: 10,
            height: 10,
            rectangles: vec![],
        };

        let added = state.add_image(image).await;
        let listed = state.list_infos().await;
        let stored = listed.iter().find(|i| i.id == added.id).unwrap();

        assert_eq!(stored, &added);
    }

    #[tokio::test]
    async fn test_not_found_beats_injected_fault() {
        let state = state_with(ResponseOutcome::Error);
        assert_eq!(
            state.get_image(999).await,
            Err(ApiError::NotFound("999".into()))
        );
        assert_eq!(
            state.get_image(-1).await,
            Err(ApiError::NotFound("-1".into()))
        );
        assert_eq!(state.get_image(1).await, Err(ApiError::ServerFault));
    }

    #[test]
    fn test_parse_image_id() {
        assert_eq!(parse_image_id("51"), Ok(51));
        assert_eq!(parse_image_id("-1"), Ok(-1));
        assert_eq!(
            parse_image_id("99999999999999999999999"),
            Err(ApiError::NotFound("99999999999999999999999".into()))
        );
        assert_eq!(
            parse_image_id("-99999999999999999999999"),
            Err(ApiError::NotFound("-99999999999999999999999".into()))
        );
        assert_eq!(parse_image_id("abc"), Err(ApiError::InvalidId("abc".into())));
        assert_eq!(parse_image_id("-"), Err(ApiError::InvalidId("-".into())));
    }

    #[test]
    fn test_create_app() {
        let state = Arc::new(state_with(ResponseOutcome::Standard));
        let _app = create_app(state);
    }
}
