use std::path::PathBuf;

use boatclub_common::{Rgb, TextureHandle};

use crate::barrier::LoadBarrier;
use crate::error::AssetError;

pub const WATER_TEXTURE: &str = "water.jpg";
pub const FLOOR_TEXTURE: &str = "floor.jpg";
pub const BOATHOUSE_TEXTURE: &str = "boatclub.jpg";
pub const TREE_TEXTURE: &str = "tree.jpg";

/// Every texture the scene needs, in load order.
pub const SCENE_TEXTURES: [&str; 4] = [WATER_TEXTURE, FLOOR_TEXTURE, BOATHOUSE_TEXTURE, TREE_TEXTURE];

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Resolves a named resource to decoded pixels.
pub trait TextureLoader {
    fn load(&self, name: &str) -> Result<TextureImage, AssetError>;
}

/// Loads image files relative to a root directory.
#[derive(Debug, Clone)]
pub struct ImageFileLoader {
    root: PathBuf,
}

impl ImageFileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureLoader for ImageFileLoader {
    fn load(&self, name: &str) -> Result<TextureImage, AssetError> {
        let path = self.root.join(name);
        let decoded = image::open(&path).map_err(|source| AssetError::Image {
            name: name.to_string(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!(name, width, height, "texture decoded");
        Ok(TextureImage {
            name: name.to_string(),
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

/// Generates small two-tone checker textures from a name-to-color table.
///
/// Used when no asset directory is available.
#[derive(Debug, Clone)]
pub struct SolidColorLoader {
    colors: Vec<(String, Rgb)>,
}

impl Default for SolidColorLoader {
    fn default() -> Self {
        Self::new([
            (WATER_TEXTURE, Rgb::new(0.15, 0.35, 0.6)),
            (FLOOR_TEXTURE, Rgb::new(0.3, 0.5, 0.2)),
            (BOATHOUSE_TEXTURE, Rgb::new(0.7, 0.6, 0.45)),
            (TREE_TEXTURE, Rgb::new(0.15, 0.4, 0.15)),
        ])
    }
}

impl SolidColorLoader {
    const SIZE: u32 = 4;

    pub fn new<'a>(colors: impl IntoIterator<Item = (&'a str, Rgb)>) -> Self {
        Self {
            colors: colors
                .into_iter()
                .map(|(n, c)| (n.to_string(), c))
                .collect(),
        }
    }
}

impl TextureLoader for SolidColorLoader {
    fn load(&self, name: &str) -> Result<TextureImage, AssetError> {
        let color = self
            .colors
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
            .ok_or_else(|| AssetError::TextureNotFound(name.to_string()))?;

        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut rgba = Vec::with_capacity((Self::SIZE * Self::SIZE * 4) as usize);
        for y in 0..Self::SIZE {
            for x in 0..Self::SIZE {
                let shade = if (x + y) % 2 == 0 { 1.0 } else { 0.85 };
                rgba.extend_from_slice(&[
                    to_byte(color.r * shade),
                    to_byte(color.g * shade),
                    to_byte(color.b * shade),
                    255,
                ]);
            }
        }
        Ok(TextureImage {
            name: name.to_string(),
            width: Self::SIZE,
            height: Self::SIZE,
            rgba,
        })
    }
}

/// Loaded textures, addressed by handles assigned in request order.
#[derive(Debug, Clone, Default)]
pub struct TextureSet {
    images: Vec<TextureImage>,
}

impl TextureSet {
    pub fn handle(&self, name: &str) -> Option<TextureHandle> {
        self.images
            .iter()
            .position(|img| img.name == name)
            .map(|i| TextureHandle(i as u32))
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureImage> {
        self.images.get(handle.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureHandle, &TextureImage)> {
        self.images
            .iter()
            .enumerate()
            .map(|(i, img)| (TextureHandle(i as u32), img))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Load every named texture, one worker per name, and return them in
/// request order once all have completed.
///
/// Any single failure aborts the whole load.
pub fn load_all<L>(loader: &L, names: &[&str]) -> Result<TextureSet, AssetError>
where
    L: TextureLoader + Sync,
{
    let _span = tracing::info_span!("load_textures", count = names.len()).entered();

    let (released_tx, released_rx) = crossbeam_channel::bounded(1);
    let mut barrier = LoadBarrier::new(names.len(), move |images: Vec<TextureImage>| {
        // The receiver lives until after the scope below.
        let _ = released_tx.send(images);
    });

    std::thread::scope(|scope| -> Result<(), AssetError> {
        let (done_tx, done_rx) = crossbeam_channel::bounded(names.len());
        for (index, name) in names.iter().copied().enumerate() {
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                let _ = done_tx.send((index, loader.load(name)));
            });
        }
        drop(done_tx);

        for (index, result) in done_rx {
            barrier.complete(index, result?)?;
        }
        Ok(())
    })?;

    let images = released_rx.try_recv().map_err(|_| {
        let index = barrier.pending().first().copied().unwrap_or(0);
        AssetError::Incomplete {
            name: names.get(index).copied().unwrap_or_default().to_string(),
        }
    })?;

    tracing::info!(count = images.len(), "textures loaded");
    Ok(TextureSet { images })
}
