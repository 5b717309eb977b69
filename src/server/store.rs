//! # Image Store
//!
//! In-memory mapping from image id to [`ImageRecord`]. Ids are assigned by the
//! store, start at 1, grow by one per insert and are never reused. Records are
//! never removed or modified.
//!
//! The store itself is not synchronized; [`AppState`](super::api::AppState)
//! keeps it behind a `tokio::sync::RwLock` so id assignment and insertion
//! happen as one step.

use log::info;
use rand::Rng;
use std::collections::BTreeMap;

use crate::common::config::{
    IMAGE_AREA_HEIGHT, IMAGE_AREA_WIDTH, N_SAMPLE_IMAGES, N_SAMPLE_RECTANGLES, N_TAGS_PER_IMAGE,
};
use crate::common::messages::{Image, ImageInfo, ImageRecord};
use crate::processing::generator;

/// Id-ordered collection of image records.
#[derive(Debug)]
pub struct ImageStore {
    /// Ordered by id, which is also insertion order
    images: BTreeMap<u64, ImageRecord>,
    next_id: u64,
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageStore {
    /// Create an empty store whose first id will be 1.
    pub fn new() -> Self {
        Self {
            images: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Create a store seeded with the generated sample images (ids 1..=50).
    ///
    /// Each sample covers the full 120×120 area with 5 random rectangles and
    /// carries 3 random tags from `vocabulary`.
    pub fn with_samples<R: Rng + ?Sized>(rng: &mut R, vocabulary: &[String], now: i64) -> Self {
        let mut store = Self::new();

        for _ in 0..N_SAMPLE_IMAGES {
            let image = generator::random_image(
                rng,
                IMAGE_AREA_WIDTH,
                IMAGE_AREA_HEIGHT,
                N_SAMPLE_RECTANGLES,
            );
            let tags = generator::random_tags(rng, vocabulary, N_TAGS_PER_IMAGE);
            store.insert(image, tags, now);
        }

        info!("🖼️  Seeded image store with {} sample images", store.len());
        store
    }

    /// Store a new record under the next id and return that id.
    pub fn insert(&mut self, image: Image, tags: Vec<String>, time_of_creation: i64) -> u64 {
        let id = self.next_id;
        self.images.insert(
            id,
            ImageRecord {
                image,
                tags,
                time_of_creation,
            },
        );
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: u64) -> Option<&ImageRecord> {
        self.images.get(&id)
    }

    /// Metadata for every stored image, in ascending id order.
    pub fn infos(&self) -> Vec<ImageInfo> {
        self.images
            .iter()
            .map(|(id, record)| record.info(*id))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.images.len()
    }

    /// Id the next insert will receive.
    #[cfg(test)]
    fn next_id(&self) -> u64 {
        self.next_id
    }
}
