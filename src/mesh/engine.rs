use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::mesh::canvas::{Canvas, CanvasParameters};
use crate::mesh::context::MeshContext;
use crate::mesh::rotation::RotationStrategy;
use crate::mesh::sampler::Surface;

pub type BoxedSurface = Box<dyn Surface + Send>;

pub enum MeshCommand {
    Generate {
        params: CanvasParameters,
        surface: BoxedSurface,
    },
    SetRotationAngle(f32),
    SetStrategy(RotationStrategy),
    Rotate,
    Stop,
}

/// Copy of a freshly generated mesh, handed to the consumer thread.
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    pub canvas: Canvas,
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
    pub z_range: (f32, f32),
}

#[derive(Debug)]
pub enum MeshEvent {
    Generated(MeshSnapshot),
    /// Vertex buffer after one rotation step.
    Rotated(Vec<f32>),
    Error(String),
}

pub struct MeshEngine {
    tx_cmd: Sender<MeshCommand>,
    rx_event: Receiver<MeshEvent>,
    last_error: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl Default for MeshEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshEngine {
    pub fn new() -> Self {
        Self::spawn(MeshContext::new)
    }

    pub fn with_grid_limit(max_width: u32, max_height: u32) -> Self {
        Self::spawn(move || MeshContext::with_grid_limit(max_width, max_height))
    }

    fn spawn<F>(make_context: F) -> Self
    where
        F: FnOnce() -> MeshContext + Send + 'static,
    {
        let (tx_cmd, rx_cmd) = channel::unbounded::<MeshCommand>();
        let (tx_event, rx_event) = channel::bounded::<MeshEvent>(2);
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);

        let thread_handle = thread::spawn(move || {
            mesh_thread(make_context(), rx_cmd, tx_event, last_error_clone);
        });

        Self {
            tx_cmd,
            rx_event,
            last_error,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn generate<S>(&self, params: CanvasParameters, surface: S)
    where
        S: Surface + Send + 'static,
    {
        let _ = self.tx_cmd.send(MeshCommand::Generate {
            params,
            surface: Box::new(surface),
        });
    }

    pub fn set_rotation_angle(&self, angle: f32) {
        let _ = self.tx_cmd.send(MeshCommand::SetRotationAngle(angle));
    }

    pub fn set_strategy(&self, strategy: RotationStrategy) {
        let _ = self.tx_cmd.send(MeshCommand::SetStrategy(strategy));
    }

    pub fn rotate(&self) {
        let _ = self.tx_cmd.send(MeshCommand::Rotate);
    }

    pub fn try_recv_event(&self) -> Option<MeshEvent> {
        self.rx_event.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `None` on timeout or if the
    /// worker has gone away.
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<MeshEvent> {
        match self.rx_event.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(MeshCommand::Stop);
    }
}

impl Drop for MeshEngine {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(MeshCommand::Stop);
        // a worker blocked on a full event queue wakes once the receiver is gone
        let (_, closed) = channel::bounded(0);
        drop(std::mem::replace(&mut self.rx_event, closed));
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn mesh_thread(
    mut context: MeshContext,
    rx_cmd: Receiver<MeshCommand>,
    tx_event: Sender<MeshEvent>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    loop {
        let cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        match cmd {
            MeshCommand::Generate { params, surface } => {
                *last_error.lock() = None;

                match context.generate(&params, surface.as_ref()) {
                    Ok(()) => {
                        let _ = tx_event.send(MeshEvent::Generated(snapshot(&context)));
                    }
                    Err(e) => {
                        let message = e.to_string();
                        *last_error.lock() = Some(message.clone());
                        let _ = tx_event.send(MeshEvent::Error(message));
                    }
                }
            }
            MeshCommand::SetRotationAngle(angle) => context.set_rotation_angle(angle),
            MeshCommand::SetStrategy(strategy) => {
                debug!("rotation strategy set to {}", strategy.name());
                context.set_rotation_strategy(strategy);
            }
            MeshCommand::Rotate => {
                context.rotate();
                if tx_event
                    .try_send(MeshEvent::Rotated(context.vertices().to_vec()))
                    .is_err()
                {
                    warn!("event queue full, dropping rotation frame");
                }
            }
            MeshCommand::Stop => return,
        }
    }
}

fn snapshot(context: &MeshContext) -> MeshSnapshot {
    MeshSnapshot {
        canvas: context.canvas().clone(),
        vertices: context.vertices().to_vec(),
        indices: context.indices().to_vec(),
        z_range: context.z_range().unwrap_or((0.0, 0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::canvas::{Extent, Resolution};
    use crate::mesh::topology::Topology;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn params(nx: u32, ny: u32, topology: Topology) -> CanvasParameters {
        CanvasParameters::new(
            Resolution::new(nx, ny),
            Extent::new(2.0, 2.0, -1.0, -1.0),
            topology,
        )
    }

    #[test]
    fn generate_reports_snapshot() {
        let engine = MeshEngine::with_grid_limit(16, 16);
        engine.generate(params(3, 3, Topology::PlanarSquare), |x: f32, y: f32| x + y);

        match engine.recv_event_timeout(TIMEOUT) {
            Some(MeshEvent::Generated(snapshot)) => {
                assert_eq!(snapshot.vertices.len(), 27);
                assert_eq!(snapshot.indices.len(), 24);
                assert_eq!(snapshot.canvas.vertex_count, 9);
                assert_eq!(snapshot.z_range, (-2.0, 2.0));
            }
            _ => panic!("expected a generated mesh"),
        }
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn failure_sets_last_error() {
        let engine = MeshEngine::with_grid_limit(4, 4);
        engine.generate(params(8, 8, Topology::PlanarSquare), |_: f32, _: f32| 0.0_f32);

        match engine.recv_event_timeout(TIMEOUT) {
            Some(MeshEvent::Error(message)) => assert!(message.contains("overflow")),
            _ => panic!("expected an error event"),
        }
        assert!(engine.last_error().is_some());

        engine.generate(params(4, 4, Topology::PlanarSquare), |_: f32, _: f32| 0.0_f32);
        assert!(matches!(
            engine.recv_event_timeout(TIMEOUT),
            Some(MeshEvent::Generated(_))
        ));
        assert_eq!(engine.last_error(), None);
    }

    #[test]
    fn rotate_streams_vertex_frames() {
        let engine = MeshEngine::with_grid_limit(8, 8);
        engine.generate(params(2, 2, Topology::PlanarSquare), |_: f32, _: f32| 1.0_f32);
        assert!(matches!(
            engine.recv_event_timeout(TIMEOUT),
            Some(MeshEvent::Generated(_))
        ));

        engine.set_strategy(RotationStrategy::Exact);
        engine.set_rotation_angle(std::f32::consts::FRAC_PI_2);
        engine.rotate();

        match engine.recv_event_timeout(TIMEOUT) {
            Some(MeshEvent::Rotated(vertices)) => {
                assert_eq!(vertices.len(), 12);
                // (-1, -1) turns to (1, -1)
                assert!((vertices[0] - 1.0).abs() < 1e-6);
                assert!((vertices[1] + 1.0).abs() < 1e-6);
                assert_eq!(vertices[2], 1.0);
            }
            _ => panic!("expected a rotation frame"),
        }
    }

    #[test]
    fn slow_consumer_loses_frames_not_commands() {
        let engine = MeshEngine::with_grid_limit(4, 4);
        engine.generate(params(2, 2, Topology::PlanarSquare), |_: f32, _: f32| 0.0_f32);
        assert!(matches!(
            engine.recv_event_timeout(TIMEOUT),
            Some(MeshEvent::Generated(_))
        ));

        for _ in 0..10 {
            engine.rotate();
        }
        engine.generate(params(3, 3, Topology::PlanarSquare), |_: f32, _: f32| 0.0_f32);

        let mut generated = false;
        while let Some(event) = engine.recv_event_timeout(TIMEOUT) {
            if let MeshEvent::Generated(snapshot) = event {
                assert_eq!(snapshot.canvas.vertex_count, 9);
                generated = true;
                break;
            }
        }
        assert!(generated);
    }

    #[test]
    fn drop_with_undrained_events_still_joins() {
        let (done_tx, done_rx) = channel::bounded(1);
        thread::spawn(move || {
            let engine = MeshEngine::with_grid_limit(8, 8);
            for n in 2..8 {
                engine.generate(params(n, n, Topology::PlanarSquare), |x: f32, _: f32| x);
            }
            drop(engine);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(TIMEOUT).is_ok());
    }

    #[test]
    fn drop_joins_worker() {
        let engine = MeshEngine::with_grid_limit(4, 4);
        engine.stop();
        drop(engine);
    }
}
