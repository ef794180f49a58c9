//! Background driver that advances the board at a fixed cadence

use super::render::RenderSink;
use crate::board::SharedBoard;
use crate::game_of_life::GameOfLifeRules;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default pause between generations: three generations per second
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000 / 3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("simulation is already running")]
    AlreadyRunning,
    #[error("simulation is not running")]
    NotRunning,
    #[error("failed to spawn simulation thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
}

/// One-shot cancellation flag the worker can sleep on
#[derive(Debug, Default)]
struct CancelSignal {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

impl CancelSignal {
    fn cancel(&self) {
        *self.cancelled.lock() = true;
        self.wake.notify_all();
    }

    fn is_cancelled(&self) -> bool {
        *self.cancelled.lock()
    }

    /// Sleep for `period` unless cancelled first. Returns `true` if cancelled.
    fn wait(&self, period: Duration) -> bool {
        let deadline = Instant::now() + period;
        let mut cancelled = self.cancelled.lock();
        while !*cancelled {
            if self.wake.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

struct Worker {
    signal: Arc<CancelSignal>,
    handle: JoinHandle<u64>,
}

/// Drives a [`SharedBoard`] forward one generation per period on its own thread.
///
/// At most one worker exists per loop: `start` is rejected while running and
/// `stop` joins the worker before returning, so a stop/start pair can never
/// leave two workers stepping the same board.
pub struct SimulationLoop {
    board: SharedBoard,
    renderer: Arc<dyn RenderSink>,
    period: Duration,
    worker: Option<Worker>,
}

impl SimulationLoop {
    pub fn new(board: SharedBoard, renderer: Arc<dyn RenderSink>) -> Self {
        Self::with_period(board, renderer, DEFAULT_PERIOD)
    }

    pub fn with_period(board: SharedBoard, renderer: Arc<dyn RenderSink>, period: Duration) -> Self {
        Self {
            board,
            renderer,
            period,
            worker: None,
        }
    }

    pub fn state(&self) -> LoopState {
        if self.worker.is_some() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    /// Spawn the worker thread
    pub fn start(&mut self) -> Result<(), LoopError> {
        if self.worker.is_some() {
            return Err(LoopError::AlreadyRunning);
        }

        let signal = Arc::new(CancelSignal::default());
        let board = Arc::clone(&self.board);
        let renderer = Arc::clone(&self.renderer);
        let period = self.period;
        let worker_signal = Arc::clone(&signal);

        let handle = thread::Builder::new()
            .name("simulation".into())
            .spawn(move || run_loop(&board, renderer.as_ref(), &worker_signal, period))?;

        log::info!("Simulation started (period: {}ms)", period.as_millis());
        self.worker = Some(Worker { signal, handle });
        Ok(())
    }

    /// Cancel the worker and wait for it to leave its current tick.
    /// Returns the number of ticks the worker ran.
    pub fn stop(&mut self) -> Result<u64, LoopError> {
        let worker = self.worker.take().ok_or(LoopError::NotRunning)?;
        worker.signal.cancel();

        let ticks = match worker.handle.join() {
            Ok(ticks) => ticks,
            Err(_) => {
                log::warn!("Simulation thread panicked");
                0
            }
        };
        log::info!("Simulation stopped after {} ticks", ticks);
        Ok(ticks)
    }
}

impl Drop for SimulationLoop {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.stop();
        }
    }
}

fn run_loop(board: &SharedBoard, renderer: &dyn RenderSink, signal: &CancelSignal, period: Duration) -> u64 {
    let mut ticks = 0;

    while !signal.is_cancelled() {
        let snapshot = board.snapshot();

        if let Some(dims) = snapshot.dimensions {
            let next = GameOfLifeRules::step(&snapshot.cells, dims.width, dims.height);
            log::debug!(
                "Generation {}: {} -> {} cells",
                snapshot.generation + 1,
                snapshot.cells.len(),
                next.len()
            );
            if board.replace_cells(next, snapshot.epoch) {
                renderer.request_render();
            } else {
                log::debug!("Board changed during tick, generation discarded");
            }
        }
        ticks += 1;

        if signal.wait(period) {
            break;
        }
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::game_of_life::{Cell, Dimensions, LiveSet};
    use crate::simulation::render::NoRender;
    use itertools::iproduct;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn blinker_phases() -> (LiveSet, LiveSet) {
        let horizontal = [(1, 2), (2, 2), (3, 2)].into_iter().map(Cell::from).collect();
        let vertical = [(2, 1), (2, 2), (2, 3)].into_iter().map(Cell::from).collect();
        (horizontal, vertical)
    }

    fn wait_for_generation(board: &BoardState, generation: u64) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while board.snapshot().generation < generation {
            assert!(Instant::now() < deadline, "simulation made no progress");
            thread::yield_now();
        }
    }

    #[test]
    fn test_start_stop_state_machine() {
        let board = BoardState::shared();
        let mut sim = SimulationLoop::with_period(board, Arc::new(NoRender), Duration::from_millis(5));

        assert_eq!(sim.state(), LoopState::Stopped);
        assert!(matches!(sim.stop(), Err(LoopError::NotRunning)));

        sim.start().unwrap();
        assert_eq!(sim.state(), LoopState::Running);
        assert!(matches!(sim.start(), Err(LoopError::AlreadyRunning)));

        sim.stop().unwrap();
        assert_eq!(sim.state(), LoopState::Stopped);
        assert!(matches!(sim.stop(), Err(LoopError::NotRunning)));
    }

    #[test]
    fn test_unsized_board_is_left_alone() {
        let board = BoardState::shared();
        let renders = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&renders);
        let sink = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(sink), Duration::from_millis(1));

        sim.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        let ticks = sim.stop().unwrap();

        assert!(ticks > 0);
        assert_eq!(board.snapshot().generation, 0);
        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_loop_advances_blinker() {
        let board = BoardState::shared();
        board.set_dimensions(5, 5);
        let (horizontal, vertical) = blinker_phases();
        board.add_cells(horizontal.iter().copied());

        let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(NoRender), Duration::ZERO);
        sim.start().unwrap();
        wait_for_generation(&board, 3);
        sim.stop().unwrap();

        let snapshot = board.snapshot();
        let expected = if snapshot.generation % 2 == 0 { &horizontal } else { &vertical };
        assert_eq!(&snapshot.cells, expected);
    }

    #[test]
    fn test_stop_wakes_sleeping_worker() {
        let board = BoardState::shared();
        board.set_dimensions(3, 3);
        let mut sim = SimulationLoop::with_period(board, Arc::new(NoRender), Duration::from_secs(60));

        sim.start().unwrap();
        let started = Instant::now();
        sim.stop().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_snapshots_never_torn_while_running() {
        let board = BoardState::shared();
        board.set_dimensions(5, 5);
        let (horizontal, vertical) = blinker_phases();
        board.add_cells(horizontal.iter().copied());

        let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(NoRender), Duration::ZERO);
        sim.start().unwrap();

        let mut observed = 0;
        loop {
            let snapshot = board.snapshot();
            let expected = if snapshot.generation % 2 == 0 { &horizontal } else { &vertical };
            assert_eq!(&snapshot.cells, expected, "torn read at generation {}", snapshot.generation);
            observed += 1;
            if snapshot.generation >= 1_000 {
                break;
            }
        }

        let ticks = sim.stop().unwrap();
        assert!(ticks >= 1_000);
        assert!(observed > 0);
    }

    #[test]
    fn test_concurrent_input_and_simulation() {
        let board = BoardState::shared();
        let dims = Dimensions::new(30, 30);
        board.set_dimensions(dims.width, dims.height);

        let renders = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&renders);
        let sink = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(sink), Duration::ZERO);
        sim.start().unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let input = {
            let board = Arc::clone(&board);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut i = 0usize;
                while !done.load(Ordering::SeqCst) {
                    board.add_cell(i % 30, (i * 7) % 30);
                    board.add_cell(i % 30 + 1, (i * 7) % 30);
                    board.add_cell(i % 30 + 2, (i * 7) % 30);
                    if i % 97 == 0 {
                        board.reset();
                    }
                    i += 1;
                    thread::sleep(Duration::from_micros(50));
                }
            })
        };

        let deadline = Instant::now() + Duration::from_secs(60);
        while renders.load(Ordering::SeqCst) < 1_000 {
            assert!(Instant::now() < deadline, "simulation made no progress");
            let snapshot = board.snapshot();
            assert_eq!(snapshot.dimensions, Some(dims));
            assert!(snapshot.cells.iter().all(|c| dims.contains(c)));
            assert!(snapshot.living_count() <= dims.area());
        }

        done.store(true, Ordering::SeqCst);
        input.join().unwrap();
        let ticks = sim.stop().unwrap();
        assert!(ticks >= 1_000);
    }

    #[test]
    fn test_resize_while_running_keeps_cells_in_bounds() {
        let board = BoardState::shared();
        board.set_dimensions(40, 40);
        let block = || iproduct!(30..32, 30..32).map(Cell::from);
        board.add_cells(block());

        let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(NoRender), Duration::ZERO);
        sim.start().unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let resizer = {
            let board = Arc::clone(&board);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for i in 0..200 {
                    if i % 2 == 0 {
                        board.set_dimensions(10, 10);
                    } else {
                        board.set_dimensions(40, 40);
                        board.add_cells(block());
                    }
                    thread::sleep(Duration::from_micros(500));
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let mut observed = 0usize;
        while !done.load(Ordering::SeqCst) {
            let snapshot = board.snapshot();
            let dims = snapshot.dimensions.unwrap();
            assert!(
                snapshot.cells.iter().all(|c| dims.contains(c)),
                "cell outside {} at generation {}",
                dims,
                snapshot.generation
            );
            observed += 1;
        }

        resizer.join().unwrap();
        sim.stop().unwrap();

        let snapshot = board.snapshot();
        let dims = snapshot.dimensions.unwrap();
        assert_eq!(dims, Dimensions::new(40, 40));
        assert!(snapshot.cells.iter().all(|c| dims.contains(c)));
        assert!(observed > 0);
    }

    #[test]
    fn test_repeated_start_stop_cycles() {
        let board = BoardState::shared();
        board.set_dimensions(8, 8);
        board.add_cells([(1, 1), (2, 1), (1, 2), (2, 2)].into_iter().map(Cell::from));

        let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(NoRender), Duration::from_secs(1));
        for _ in 0..10_000 {
            sim.start().unwrap();
            sim.stop().unwrap();
        }

        assert_eq!(sim.state(), LoopState::Stopped);
        assert_eq!(board.living_count(), 4);
    }

    #[test]
    fn test_drop_stops_worker() {
        let board = BoardState::shared();
        board.set_dimensions(4, 4);
        {
            let mut sim = SimulationLoop::with_period(Arc::clone(&board), Arc::new(NoRender), Duration::ZERO);
            sim.start().unwrap();
            wait_for_generation(&board, 1);
        }
        let generation = board.snapshot().generation;
        thread::sleep(Duration::from_millis(20));
        assert_eq!(board.snapshot().generation, generation);
    }
}
