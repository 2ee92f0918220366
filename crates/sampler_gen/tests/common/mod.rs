//! Shared test algorithms.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sampler_core::{Engine, IntWidth, Repetition, Result, Value, ValueKind};
use sampler_gen::{Algorithm, AlgorithmState};

/// Counts resolutions and yields 0, 1, 2, ... on successive draws.
#[derive(Clone, Default)]
pub struct Sequential {
    pub resolves: Arc<AtomicUsize>,
    pub draws: Arc<AtomicUsize>,
    pub last_repetition: Arc<std::sync::Mutex<Option<Repetition>>>,
}

impl Sequential {
    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn draw_count(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }

    pub fn last_repetition(&self) -> Option<Repetition> {
        *self.last_repetition.lock().unwrap()
    }
}

/// State recorded at resolution: whether a table was built.
pub struct SequentialState {
    pub precomputed: bool,
}

impl Algorithm for Sequential {
    fn kind(&self) -> ValueKind {
        ValueKind::Int(IntWidth::W64)
    }

    fn resolve(&self, _params: &[Value], repetition: Repetition) -> Result<AlgorithmState> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        *self.last_repetition.lock().unwrap() = Some(repetition);
        Ok(Arc::new(SequentialState {
            precomputed: !repetition.is_single(),
        }))
    }

    fn draw(&self, _engine: &mut dyn Engine, _state: &(dyn Any + Send + Sync)) -> Value {
        Value::Int(self.draws.fetch_add(1, Ordering::SeqCst) as i64)
    }
}
