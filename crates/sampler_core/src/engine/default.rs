//! Thread-local default engine.
//!
//! Convenience entry points (`draw(request)` without an explicit engine)
//! draw from a per-thread [`StdEngine`]. Its lifecycle is explicit:
//!
//! 1. **Creation**: lazily on first use from an entropy seed, or eagerly via
//!    [`init_default_engine`].
//! 2. **Reseeding**: [`reseed_default_engine`] restarts the stream.
//! 3. **Teardown**: [`teardown_default_engine`] drops the engine; the next use
//!    creates a fresh one. Otherwise it lives until the thread exits.
//!
//! Each thread owns its engine, so no locking is involved. Algorithms never
//! reach for this state on their own: they take the engine as an argument.
//! Callers needing isolation or reproducibility across threads should pass
//! their own engine instead.

use std::cell::RefCell;

use super::{Engine, StdEngine};

thread_local! {
    static DEFAULT_ENGINE: RefCell<Option<StdEngine>> = const { RefCell::new(None) };
}

/// Creates (or replaces) this thread's default engine.
///
/// Returns the seed in effect; `None` draws one from OS entropy.
pub fn init_default_engine(seed: Option<u64>) -> u64 {
    DEFAULT_ENGINE.with(|slot| {
        let engine = match seed {
            Some(seed) => StdEngine::from_seed(seed),
            None => StdEngine::from_entropy(),
        };
        let seed = engine.seed();
        *slot.borrow_mut() = Some(engine);
        tracing::debug!(seed, "default engine initialised");
        seed
    })
}

/// Reseeds this thread's default engine, creating it if needed.
///
/// Returns the seed in effect.
pub fn reseed_default_engine(seed: Option<u64>) -> u64 {
    DEFAULT_ENGINE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let seed = match slot.as_mut() {
            Some(engine) => engine.reseed(seed),
            None => {
                let engine = match seed {
                    Some(seed) => StdEngine::from_seed(seed),
                    None => StdEngine::from_entropy(),
                };
                let seed = engine.seed();
                *slot = Some(engine);
                seed
            }
        };
        tracing::debug!(seed, "default engine reseeded");
        seed
    })
}

/// Drops this thread's default engine.
pub fn teardown_default_engine() {
    DEFAULT_ENGINE.with(|slot| {
        if slot.borrow_mut().take().is_some() {
            tracing::debug!("default engine torn down");
        }
    });
}

/// Returns the seed of this thread's default engine, if one exists.
pub fn default_engine_seed() -> Option<u64> {
    DEFAULT_ENGINE.with(|slot| slot.borrow().as_ref().map(Engine::seed))
}

/// Runs `f` with exclusive access to this thread's default engine.
///
/// The engine is created from entropy if it does not exist yet.
///
/// # Panics
///
/// Panics if called re-entrantly from inside `f`, since the engine is
/// already borrowed.
///
/// # Examples
///
/// ```rust
/// use sampler_core::engine::{init_default_engine, with_default_engine, Engine};
///
/// init_default_engine(Some(7));
/// let first = with_default_engine(|engine| engine.next_word());
///
/// init_default_engine(Some(7));
/// assert_eq!(with_default_engine(|engine| engine.next_word()), first);
/// ```
pub fn with_default_engine<R>(f: impl FnOnce(&mut StdEngine) -> R) -> R {
    DEFAULT_ENGINE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let engine = slot.get_or_insert_with(|| {
            let engine = StdEngine::from_entropy();
            tracing::debug!(seed = engine.seed(), "default engine created lazily");
            engine
        });
        f(engine)
    })
}
