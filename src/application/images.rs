//! Image queries: listing and inspecting recorded images

use crate::domain::entities::{ImageLayer, ImageRecord, LayerRecord};
use crate::domain::ports::{LayerStore, LockMode, StoreError};
use crate::error::{StrataError, StrataResult};

/// One layer of an inspected image; `record` is `None` when the layer is
/// gone from the store
#[derive(Debug, Clone)]
pub struct LayerDetails {
    pub layer: ImageLayer,
    pub record: Option<LayerRecord>,
}

#[derive(Debug, Clone)]
pub struct ImageDetails {
    pub image: ImageRecord,
    pub layers: Vec<LayerDetails>,
}

impl ImageDetails {
    /// Sum of the present layers' sizes
    pub fn total_bytes(&self) -> u64 {
        self.layers
            .iter()
            .filter_map(|l| l.record.as_ref())
            .map(|r| r.total_bytes)
            .sum()
    }

    /// Whether every layer is still in the store (the image can run)
    pub fn is_complete(&self) -> bool {
        self.layers.iter().all(|l| l.record.is_some())
    }
}

pub struct ImagesUseCase<S>
where
    S: LayerStore,
{
    store: S,
}

impl<S> ImagesUseCase<S>
where
    S: LayerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All images, sorted by name
    pub fn list(&self) -> StrataResult<Vec<ImageRecord>> {
        let _lock = self.store.lock(LockMode::Shared)?;
        Ok(self.store.images()?)
    }

    pub fn inspect(&self, name: &str) -> StrataResult<ImageDetails> {
        let _lock = self.store.lock(LockMode::Shared)?;
        let image = self
            .store
            .image(name)?
            .ok_or_else(|| StrataError::ImageNotFound {
                name: name.to_string(),
            })?;

        let mut layers = Vec::with_capacity(image.layers.len());
        for layer in &image.layers {
            let record = match self.store.layer(&layer.key) {
                Ok(record) => Some(record),
                Err(StoreError::LayerNotFound(_)) => None,
                Err(e) => return Err(e.into()),
            };
            layers.push(LayerDetails {
                layer: layer.clone(),
                record,
            });
        }
        Ok(ImageDetails { image, layers })
    }
}
