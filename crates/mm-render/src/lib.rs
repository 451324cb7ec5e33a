pub mod hit;
pub mod paint;
pub mod scene;

pub use hit::{Hit, hit_test};
pub use paint::{Theme, paint_scene, viewport_affine};
pub use scene::{EdgeLine, NodeBox, RenderScene};
