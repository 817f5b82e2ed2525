//! Minimal scene graph: one perspective camera, three lights, linear fog and a
//! single box mesh.
//!
//! Everything here is plain CPU data. GPU objects derived from it are owned by
//! the surface's `Drawable` and die with it.

mod camera;
mod color;
mod config;
mod fog;
mod geometry;
mod graph;
mod light;
mod material;
mod mesh;

pub use camera::PerspectiveCamera;
pub use color::Rgb;
pub use config::SceneConfig;
pub use fog::Fog;
pub use geometry::{BoxGeometry, MeshVertex};
pub use graph::{Scene, SceneGraph};
pub use light::{AmbientLight, PointLight, SpotLight};
pub use material::Material;
pub use mesh::Mesh;
