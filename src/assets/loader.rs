//! Asynchronous, order-independent model loading into a live scene.
//!
//! Each request is fetched and parsed as a task on a shared tokio runtime.
//! Finished tasks report over a `flume` channel, and the scene is only
//! touched when the host thread drains that channel with
//! [`AssetLoader::poll`], so completions never overlap a render step.
//!
//! A per-session disposed flag is checked by the task before it reports and
//! again at the top of every completion handler. After
//! [`AssetLoader::dispose`], late completions are dropped without touching
//! the scene.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use glam::Vec3;
use rustc_hash::FxHashMap;
use tokio::runtime::Runtime;

use crate::animation::clip::AnimationClip;
use crate::assets::io::FileAssetReader;
use crate::assets::loaders::GltfLoader;
use crate::assets::prefab::Prefab;
use crate::assets::progress::{LoadEvent, ProgressChannel};
use crate::errors::{ProwlError, Result};
use crate::scene::{NodeHandle, Scene};

fn asset_runtime() -> Result<&'static Runtime> {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    if let Some(rt) = RUNTIME.get() {
        return Ok(rt);
    }
    let rt = tokio::runtime::Builder::new_multi_thread()
        .thread_name("prowl-assets")
        .enable_all()
        .build()?;
    // A concurrent initializer may win; the spare runtime is dropped
    Ok(RUNTIME.get_or_init(|| rt))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("load task panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("load task panicked: {msg}")
    } else {
        "load task panicked".to_string()
    }
}

/// Fetches and parses a model by URL.
pub trait ModelSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Prefab>>;
}

/// Reads glTF files from disk relative to an asset root.
#[derive(Debug, Clone)]
pub struct FileModelSource {
    reader: FileAssetReader,
}

impl FileModelSource {
    pub fn new(root: impl AsRef<std::path::Path>) -> Self {
        Self {
            reader: FileAssetReader::new(root),
        }
    }
}

impl ModelSource for FileModelSource {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Prefab>> {
        let reader = self.reader.clone();
        let url = url.to_string();
        async move { GltfLoader::load(&reader, &url).await }.boxed()
    }
}

/// Where and how a loaded model is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub url: String,
    pub scale: f32,
    pub position: Vec3,
    /// Euler angles (XYZ order, radians).
    pub rotation: Option<Vec3>,
}

impl LoadRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scale: 1.0,
            position: Vec3::ZERO,
            rotation: None,
        }
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

/// Identifies one [`AssetLoader::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(u64);

/// A model that was inserted into the scene.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub id: LoadId,
    pub url: String,
    pub root: NodeHandle,
    pub animations: Vec<AnimationClip>,
}

struct Completion {
    id: LoadId,
    result: Result<Prefab>,
}

pub struct AssetLoader {
    source: Arc<dyn ModelSource>,
    runtime: &'static Runtime,

    tx: flume::Sender<Completion>,
    rx: flume::Receiver<Completion>,

    pending: FxHashMap<LoadId, LoadRequest>,
    next_id: u64,
    batch_loaded: usize,
    batch_failed: usize,

    disposed: Arc<AtomicBool>,
    progress: ProgressChannel,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn ModelSource>) -> Result<Self> {
        let (tx, rx) = flume::unbounded();
        Ok(Self {
            source,
            runtime: asset_runtime()?,
            tx,
            rx,
            pending: FxHashMap::default(),
            next_id: 0,
            batch_loaded: 0,
            batch_failed: 0,
            disposed: Arc::new(AtomicBool::new(false)),
            progress: ProgressChannel::new(),
        })
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressChannel {
        &self.progress
    }

    /// Number of requests that have not settled yet.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Starts loading `request` in the background. Fire-and-forget.
    ///
    /// Requests made after [`dispose`](Self::dispose) are ignored.
    pub fn load(&mut self, request: LoadRequest) -> LoadId {
        let id = LoadId(self.next_id);
        self.next_id += 1;

        if self.is_disposed() {
            log::debug!("Loader disposed, ignoring request for '{}'", request.url);
            return id;
        }

        if self.pending.is_empty() {
            self.batch_loaded = 0;
            self.batch_failed = 0;
            self.progress.emit(LoadEvent::BatchStarted);
        }

        log::debug!("Loading '{}'", request.url);
        let fetch = self.source.fetch(&request.url);
        self.pending.insert(id, request);

        let tx = self.tx.clone();
        let disposed = Arc::clone(&self.disposed);
        self.runtime.spawn(async move {
            // A panicking parser still settles its request as a failure
            let result = match AssertUnwindSafe(fetch).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(ProwlError::TaskJoin(panic_message(&*panic))),
            };
            if disposed.load(Ordering::Acquire) {
                return;
            }
            let _ = tx.send(Completion { id, result });
        });

        id
    }

    /// Applies every completion that has arrived, without blocking.
    pub fn poll(&mut self, scene: &mut Scene) -> Vec<LoadedModel> {
        let mut loaded = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            if let Some(model) = self.complete(completion, scene) {
                loaded.push(model);
            }
        }
        loaded
    }

    /// Blocks until every outstanding request has settled or `timeout`
    /// elapses, applying completions as they arrive.
    pub fn wait_until_settled(&mut self, scene: &mut Scene, timeout: Duration) -> Vec<LoadedModel> {
        let deadline = Instant::now().checked_add(timeout);
        let mut loaded = self.poll(scene);
        while !self.pending.is_empty() && !self.is_disposed() {
            let received = match deadline {
                Some(deadline) => self.rx.recv_deadline(deadline).ok(),
                None => self.rx.recv().ok(),
            };
            match received {
                Some(completion) => {
                    if let Some(model) = self.complete(completion, scene) {
                        loaded.push(model);
                    }
                }
                None => {
                    log::warn!("{} asset load(s) still pending after {timeout:?}", self.pending.len());
                    break;
                }
            }
        }
        loaded
    }

    fn complete(&mut self, completion: Completion, scene: &mut Scene) -> Option<LoadedModel> {
        if self.is_disposed() {
            log::debug!("Dropping asset completion received after teardown");
            return None;
        }

        let request = self.pending.remove(&completion.id)?;

        let model = match completion.result {
            Ok(prefab) => {
                let root = scene.instantiate(&prefab, &request.url);
                if let Some(node) = scene.get_node_mut(root) {
                    let t = &mut node.transform;
                    t.scale = Vec3::splat(request.scale);
                    t.position = request.position;
                    if let Some(r) = request.rotation {
                        t.set_rotation_euler(r.x, r.y, r.z);
                    }
                }
                log::info!("Loaded '{}'", request.url);
                self.batch_loaded += 1;
                Some(LoadedModel {
                    id: completion.id,
                    url: request.url,
                    root,
                    animations: prefab.animations,
                })
            }
            Err(err) => {
                self.batch_failed += 1;
                self.progress.emit(LoadEvent::Error {
                    url: request.url,
                    message: err.to_string(),
                });
                None
            }
        };

        if self.pending.is_empty() {
            self.progress.emit(LoadEvent::BatchCompleted {
                loaded: self.batch_loaded,
                failed: self.batch_failed,
            });
        }

        model
    }

    /// Marks the session as torn down. Pending requests keep running but
    /// their results are discarded.
    pub fn dispose(&mut self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if !self.pending.is_empty() {
            log::debug!("Disposing loader with {} pending request(s)", self.pending.len());
        }
        self.pending.clear();
    }

    /// Handle to the disposed flag, for completion paths outside the loader.
    #[must_use]
    pub fn disposed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.disposed)
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.disposed.store(true, Ordering::Release);
    }
}
