//! Example: Export an STL file as a top-down SVG cut sheet
//!
//! Usage: cargo run --example export_stl -- path/to/file.stl
//!
//! Writes `<file>.svg` next to the input. Without an argument a 2-unit cube
//! is exported to `cube.svg` in the current directory.

use std::env;
use std::fs;
use std::path::PathBuf;

use topcut_core::{stl, ExportConfig, Exporter, MemoryObject, MemoryScene, MeshData};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let (name, mesh, output) = match args.get(1) {
        Some(stl_path) => {
            println!("Loading STL file: {}", stl_path);
            let data = fs::read(stl_path)?;
            let mesh = stl::parse_stl(&data)?;
            println!("Loaded {} vertices, {} edges", mesh.vertex_count(), mesh.edge_count());
            (stl_path.clone(), mesh, PathBuf::from(stl_path).with_extension("svg"))
        }
        None => {
            eprintln!("Usage: {} <stl-file>", args[0]);
            eprintln!("\nNo STL file provided, using default cube...");
            ("cube".to_string(), MeshData::cube(2.0), PathBuf::from("cube.svg"))
        }
    };

    let mut scene = MemoryScene::new();
    scene.add(MemoryObject::from_mesh(name, mesh));

    let mut exporter = Exporter::new(ExportConfig::new(&output))?;
    let report = exporter.export(&scene, |object| scene.resolve_world_transform(object))?;

    println!(
        "Wrote {} paths to {} ({:.1} x {:.1})",
        report.path_count,
        output.display(),
        report.canvas.0,
        report.canvas.1
    );
    Ok(())
}
