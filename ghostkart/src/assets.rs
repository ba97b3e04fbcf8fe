//! Load and check the asset manifest

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use ghostkart_core::assets::{AssetCatalog, TextureAsset};

#[derive(Args)]
pub struct AssetsArgs {
    /// Directory the manifest paths are relative to
    pub root: PathBuf,
}

pub fn execute(args: AssetsArgs) -> Result<()> {
    let config = crate::config::load_checked();
    let (catalog, handles) = AssetCatalog::load(&args.root, &config.assets)
        .with_context(|| format!("Failed to load assets from {}", args.root.display()))?;

    println!("=== Assets Loaded ===");
    println!("Meshes: {}", catalog.mesh_count());
    println!("Textures: {}", catalog.texture_count());

    let meshes = [
        ("kart", handles.kart_mesh),
        ("landmark", handles.landmark_mesh),
        ("plane", handles.plane_mesh),
    ];
    for (name, handle) in meshes {
        if let Some(mesh) = catalog.mesh(handle) {
            println!("  {:<10} {} triangles", name, mesh.triangle_count());
        }
    }

    for (name, handle) in [("day sky", handles.day_sky), ("night sky", handles.night_sky)] {
        if let Some(TextureAsset::Cubemap(faces)) = catalog.texture(handle)
            && let Some(face) = faces.first()
        {
            println!(
                "  {:<10} {} faces of {}x{}",
                name,
                faces.len(),
                face.width,
                face.height
            );
        }
    }

    Ok(())
}
