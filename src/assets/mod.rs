//! Model assets: file reading, glTF parsing, and asynchronous loading into
//! a scene.

pub mod io;
pub mod loader;
pub mod loaders;
pub mod prefab;
pub mod progress;

pub use io::FileAssetReader;
pub use loader::{AssetLoader, FileModelSource, LoadId, LoadRequest, LoadedModel, ModelSource};
pub use loaders::GltfLoader;
pub use prefab::{Prefab, PrefabNode, SharedPrefab};
pub use progress::{LoadEvent, ProgressChannel};
