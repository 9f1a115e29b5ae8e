//! Multi-threaded render passes.
//!
//! A pass fills a queue with every tile of the frame and starts a fixed pool
//! of workers that pull tiles until the queue is empty or the pass is
//! cancelled. Each tile is rendered to a private buffer and only then copied
//! into the shared [`FrameBuffer`], so a tile is either fully written or
//! untouched.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::tile::{generate_tiles, render_tile, Tile, GRID_RESOLUTION};
use crate::{FrameBuffer, Raytracer};

/// Errors reported by a [`Renderer`].
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("a render pass is already running")]
    AlreadyRendering,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("{count} tile(s) were lost to panicking workers")]
    WorkerPanicked { count: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Counters shared between a pass and its workers.
#[derive(Debug, Default)]
struct PassState {
    cancel: AtomicBool,
    completed: AtomicUsize,
    lost: AtomicUsize,
    active_workers: AtomicUsize,
}

/// One worker's share of a pass.
struct Worker {
    id: usize,
    tiles: Receiver<Tile>,
    raytracer: Arc<Raytracer>,
    framebuffer: Arc<FrameBuffer>,
    state: Arc<PassState>,
    // Disconnects the pass's done channel once every worker is gone.
    _done: Sender<()>,
}

impl Worker {
    fn run(self) {
        for tile in self.tiles.iter() {
            if self.state.cancel.load(Ordering::Relaxed) {
                break;
            }

            let raytracer = &self.raytracer;
            match panic::catch_unwind(AssertUnwindSafe(|| render_tile(&tile, raytracer))) {
                Ok(pixels) => {
                    self.framebuffer.write_tile(&tile, &pixels);
                    self.state.completed.fetch_add(1, Ordering::SeqCst);
                    log::debug!("Worker {} finished tile {}", self.id, tile.index);
                }
                Err(_) => {
                    self.state.lost.fetch_add(1, Ordering::SeqCst);
                    log::error!(
                        "Worker {} panicked on tile {} at ({}, {})",
                        self.id,
                        tile.index,
                        tile.x,
                        tile.y
                    );
                }
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.state.active_workers.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A started pass.
struct RenderPass {
    framebuffer: Arc<FrameBuffer>,
    state: Arc<PassState>,
    done: Receiver<()>,
    total_tiles: usize,
    started: Instant,
    _pool: rayon::ThreadPool,
}

/// Drives render passes of a [`Raytracer`] on a pool of worker threads.
///
/// Only one pass runs at a time. Pixel values do not depend on the number of
/// workers or the order tiles are picked up in.
pub struct Renderer {
    raytracer: Arc<Raytracer>,
    pass: Option<RenderPass>,
}

impl Renderer {
    pub fn new(raytracer: Raytracer) -> Self {
        Self {
            raytracer: Arc::new(raytracer),
            pass: None,
        }
    }

    pub fn raytracer(&self) -> &Arc<Raytracer> {
        &self.raytracer
    }

    /// Start a pass and return the buffer it renders into.
    ///
    /// Returns immediately; use [`wait_for_finish`](Self::wait_for_finish)
    /// to block until every worker has exited.
    pub fn start_rendering(&mut self) -> RenderResult<Arc<FrameBuffer>> {
        if self.is_rendering() {
            return Err(RenderError::AlreadyRendering);
        }

        let settings = self.raytracer.settings();
        let (width, height) = settings.resolution();
        let threads = settings.amount_threads();

        let tiles = generate_tiles(width, height, GRID_RESOLUTION);
        let total_tiles = tiles.len();

        let (tile_tx, tile_rx) = crossbeam_channel::unbounded();
        for tile in tiles {
            // The receiver is alive, so sending cannot fail.
            let _ = tile_tx.send(tile);
        }
        drop(tile_tx);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("ember-tile-{i}"))
            .panic_handler(|_| log::error!("Render worker thread panicked"))
            .build()?;

        let framebuffer = Arc::new(FrameBuffer::new(width, height));
        let state = Arc::new(PassState::default());
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

        log::info!(
            "Rendering {}x{} with {} thread(s), {} tiles",
            width,
            height,
            threads,
            total_tiles
        );

        state.active_workers.store(threads, Ordering::SeqCst);
        for id in 0..threads {
            let worker = Worker {
                id,
                tiles: tile_rx.clone(),
                raytracer: Arc::clone(&self.raytracer),
                framebuffer: Arc::clone(&framebuffer),
                state: Arc::clone(&state),
                _done: done_tx.clone(),
            };
            pool.spawn(move || worker.run());
        }

        self.pass = Some(RenderPass {
            framebuffer: Arc::clone(&framebuffer),
            state,
            done: done_rx,
            total_tiles,
            started: Instant::now(),
            _pool: pool,
        });

        Ok(framebuffer)
    }

    /// Whether any worker of the current pass is still running.
    pub fn is_rendering(&self) -> bool {
        self.pass
            .as_ref()
            .is_some_and(|pass| pass.state.active_workers.load(Ordering::SeqCst) > 0)
    }

    /// Block until every worker of the current pass has exited.
    ///
    /// A cancelled pass finishes normally. Tiles lost to panics are reported
    /// as [`RenderError::WorkerPanicked`]; the rest of the frame is still
    /// rendered.
    pub fn wait_for_finish(&mut self) -> RenderResult<()> {
        let Some(pass) = self.pass.as_ref() else {
            return Ok(());
        };

        // Nothing is ever sent; recv fails once all workers dropped their sender.
        while pass.done.recv().is_ok() {}

        let completed = pass.state.completed.load(Ordering::SeqCst);
        let lost = pass.state.lost.load(Ordering::SeqCst);

        if pass.state.cancel.load(Ordering::SeqCst) {
            log::info!(
                "Render cancelled after {}/{} tiles in {:.2?}",
                completed,
                pass.total_tiles,
                pass.started.elapsed()
            );
        } else {
            log::info!(
                "Render finished {}/{} tiles in {:.2?}",
                completed,
                pass.total_tiles,
                pass.started.elapsed()
            );
        }

        if lost > 0 {
            return Err(RenderError::WorkerPanicked { count: lost });
        }
        Ok(())
    }

    /// Ask the workers of the current pass to stop.
    ///
    /// Does not block. Tiles already being rendered are finished and written;
    /// no further tiles are started.
    pub fn stop_rendering(&self) {
        if let Some(pass) = &self.pass {
            if !pass.state.cancel.swap(true, Ordering::SeqCst) {
                log::warn!(
                    "Cancelling render at {}/{} tiles",
                    pass.state.completed.load(Ordering::SeqCst),
                    pass.total_tiles
                );
            }
        }
    }

    /// Number of tiles written by the current pass.
    pub fn tiles_completed(&self) -> usize {
        self.pass
            .as_ref()
            .map_or(0, |pass| pass.state.completed.load(Ordering::SeqCst))
    }

    /// Fraction of tiles written by the current pass, in [0, 1].
    pub fn progress(&self) -> f32 {
        match &self.pass {
            Some(pass) if pass.total_tiles > 0 => {
                pass.state.completed.load(Ordering::SeqCst) as f32 / pass.total_tiles as f32
            }
            _ => 0.0,
        }
    }

    /// Buffer of the current or last pass.
    pub fn framebuffer(&self) -> Option<&Arc<FrameBuffer>> {
        self.pass.as_ref().map(|pass| &pass.framebuffer)
    }

    /// Render a whole frame and return its BGR bytes.
    pub fn render(&mut self) -> RenderResult<Vec<u8>> {
        let framebuffer = self.start_rendering()?;
        self.wait_for_finish()?;
        Ok(framebuffer.snapshot())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if self.is_rendering() {
            self.stop_rendering();
        }
    }
}
