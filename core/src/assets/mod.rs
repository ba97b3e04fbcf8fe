//! Asset loading
//!
//! The [`AssetManifest`] names every file the scene needs, relative to an
//! asset root. [`AssetCatalog::load`] reads and validates all of them up
//! front and hands out the [`SceneHandles`] the world draws with. Any
//! failure is an [`AssetLoadError`]; there is no partial scene.

mod error;
mod obj;

pub use error::AssetLoadError;
pub use obj::parse_obj;

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::render::{MeshHandle, SceneHandles, TextureHandle};

/// Faces per cubemap, in +X, -X, +Y, -Y, +Z, -Z order
pub const CUBEMAP_FACES: usize = 6;

/// Asset paths, relative to the asset root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default = "default_kart_mesh")]
    pub kart_mesh: String,
    #[serde(default = "default_kart_mesh")]
    pub landmark_mesh: String,
    #[serde(default = "default_kart_texture")]
    pub kart_texture: String,
    #[serde(default = "default_ghost_textures")]
    pub ghost_textures: [String; 2],
    #[serde(default = "default_ground_texture")]
    pub ground_texture: String,
    #[serde(default = "default_finish_line_texture")]
    pub finish_line_texture: String,
    #[serde(default = "default_landmark_textures")]
    pub landmark_textures: [String; 2],
    /// Day skybox faces
    #[serde(default = "default_day_sky")]
    pub day_sky: Vec<String>,
    /// Night skybox faces
    #[serde(default = "default_night_sky")]
    pub night_sky: Vec<String>,
}

fn default_kart_mesh() -> String {
    "assets/kart.obj".to_string()
}

fn default_kart_texture() -> String {
    "assets/kart.png".to_string()
}

fn default_ghost_textures() -> [String; 2] {
    [
        "assets/ghostKart.png".to_string(),
        "assets/ghostKart2.png".to_string(),
    ]
}

fn default_ground_texture() -> String {
    "assets/ground.jpg".to_string()
}

fn default_finish_line_texture() -> String {
    "assets/finish_line.png".to_string()
}

fn default_landmark_textures() -> [String; 2] {
    [
        "assets/Landmark_1.png".to_string(),
        "assets/Landmark_2.png".to_string(),
    ]
}

fn sky_faces(suffix: u8) -> Vec<String> {
    ["right", "left", "top", "bottom", "front", "back"]
        .iter()
        .map(|face| format!("skybox/{}{}.png", face, suffix))
        .collect()
}

fn default_day_sky() -> Vec<String> {
    sky_faces(1)
}

fn default_night_sky() -> Vec<String> {
    sky_faces(2)
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            kart_mesh: default_kart_mesh(),
            landmark_mesh: default_kart_mesh(),
            kart_texture: default_kart_texture(),
            ghost_textures: default_ghost_textures(),
            ground_texture: default_ground_texture(),
            finish_line_texture: default_finish_line_texture(),
            landmark_textures: default_landmark_textures(),
            day_sky: default_day_sky(),
            night_sky: default_night_sky(),
        }
    }
}

/// Triangle mesh, one vertex per index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The 50 x 100 ground quad, facing +Y and centred on the origin
    pub fn ground_plane() -> Self {
        let corners: [([f32; 3], [f32; 2]); 6] = [
            ([25.0, 0.0, 50.0], [1.0, 0.0]),
            ([-25.0, 0.0, 50.0], [0.0, 0.0]),
            ([-25.0, 0.0, -50.0], [0.0, 1.0]),
            ([25.0, 0.0, 50.0], [1.0, 0.0]),
            ([-25.0, 0.0, -50.0], [0.0, 1.0]),
            ([25.0, 0.0, -50.0], [1.0, 1.0]),
        ];
        Self {
            positions: corners.iter().map(|(p, _)| *p).collect(),
            normals: vec![[0.0, 1.0, 0.0]; corners.len()],
            uvs: corners.iter().map(|(_, uv)| *uv).collect(),
            indices: (0..corners.len() as u32).collect(),
        }
    }
}

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// What a [`TextureHandle`] refers to
#[derive(Debug, Clone, PartialEq)]
pub enum TextureAsset {
    Image(TextureData),
    /// Six square faces of equal size
    Cubemap(Vec<TextureData>),
}

/// Every loaded mesh and texture, addressed by handle
#[derive(Debug, Default)]
pub struct AssetCatalog {
    meshes: Vec<MeshData>,
    textures: Vec<TextureAsset>,
    mesh_paths: HashMap<PathBuf, MeshHandle>,
    texture_paths: HashMap<PathBuf, TextureHandle>,
}

impl AssetCatalog {
    /// Load everything the manifest names from under `root`.
    ///
    /// Files referenced more than once are loaded once and share a handle.
    pub fn load(
        root: &Path,
        manifest: &AssetManifest,
    ) -> Result<(AssetCatalog, SceneHandles), AssetLoadError> {
        let mut catalog = AssetCatalog::default();

        let kart_mesh = catalog.load_mesh(&root.join(&manifest.kart_mesh))?;
        let landmark_mesh = catalog.load_mesh(&root.join(&manifest.landmark_mesh))?;
        let plane_mesh = catalog.add_mesh(MeshData::ground_plane());

        let kart_texture = catalog.load_texture(&root.join(&manifest.kart_texture))?;
        let ghost_textures = [
            catalog.load_texture(&root.join(&manifest.ghost_textures[0]))?,
            catalog.load_texture(&root.join(&manifest.ghost_textures[1]))?,
        ];
        let ground_texture = catalog.load_texture(&root.join(&manifest.ground_texture))?;
        let finish_line_texture =
            catalog.load_texture(&root.join(&manifest.finish_line_texture))?;
        let landmark_textures = [
            catalog.load_texture(&root.join(&manifest.landmark_textures[0]))?,
            catalog.load_texture(&root.join(&manifest.landmark_textures[1]))?,
        ];
        let day_sky = catalog.load_cubemap("day", root, &manifest.day_sky)?;
        let night_sky = catalog.load_cubemap("night", root, &manifest.night_sky)?;

        tracing::info!(
            "Loaded {} meshes and {} textures from {}",
            catalog.meshes.len(),
            catalog.textures.len(),
            root.display()
        );

        let handles = SceneHandles {
            kart_mesh,
            landmark_mesh,
            plane_mesh,
            kart_texture,
            ghost_textures,
            ground_texture,
            finish_line_texture,
            landmark_textures,
            day_sky,
            night_sky,
        };
        Ok((catalog, handles))
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureAsset> {
        self.textures.get(handle.0 as usize)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() as u32 - 1)
    }

    fn add_texture(&mut self, texture: TextureAsset) -> TextureHandle {
        self.textures.push(texture);
        TextureHandle(self.textures.len() as u32 - 1)
    }

    fn load_mesh(&mut self, path: &Path) -> Result<MeshHandle, AssetLoadError> {
        if let Some(handle) = self.mesh_paths.get(path) {
            return Ok(*handle);
        }
        let source = read_to_string(path)?;
        let mesh = parse_obj(&source, path)?;
        tracing::debug!(
            "Loaded mesh {}: {} triangles",
            path.display(),
            mesh.triangle_count()
        );
        let handle = self.add_mesh(mesh);
        self.mesh_paths.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureHandle, AssetLoadError> {
        if let Some(handle) = self.texture_paths.get(path) {
            return Ok(*handle);
        }
        let texture = decode_image(path)?;
        let handle = self.add_texture(TextureAsset::Image(texture));
        self.texture_paths.insert(path.to_path_buf(), handle);
        Ok(handle)
    }

    fn load_cubemap(
        &mut self,
        name: &'static str,
        root: &Path,
        faces: &[String],
    ) -> Result<TextureHandle, AssetLoadError> {
        if faces.len() != CUBEMAP_FACES {
            return Err(AssetLoadError::CubemapFaces {
                name,
                count: faces.len(),
            });
        }

        let mut decoded = Vec::with_capacity(CUBEMAP_FACES);
        for face in faces {
            decoded.push(decode_image(&root.join(face))?);
        }

        let expected = decoded[0].width;
        for (face, texture) in decoded.iter().enumerate() {
            if texture.width != expected || texture.height != expected {
                return Err(AssetLoadError::CubemapFaceSize {
                    name,
                    face,
                    width: texture.width,
                    height: texture.height,
                    expected,
                });
            }
        }

        Ok(self.add_texture(TextureAsset::Cubemap(decoded)))
    }
}

fn read_to_string(path: &Path) -> Result<String, AssetLoadError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetLoadError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            AssetLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn decode_image(path: &Path) -> Result<TextureData, AssetLoadError> {
    if !path.is_file() {
        return Err(AssetLoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    let image = image::open(path).map_err(|source| AssetLoadError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
