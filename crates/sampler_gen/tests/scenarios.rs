//! End-to-end scenarios for the sampler protocol.
//!
//! Covers reproducibility, resolve-once amortisation, distinct filling,
//! type deduction, coverage of array fills, repetition-dependent resolution,
//! and sharing resolved samplers across threads.

mod common;

use std::collections::{HashMap, HashSet};

use common::{Sequential, SequentialState};
use sampler_core::{
    Engine, IntWidth, Repetition, SamplingConfig, SamplingError, StdEngine, Value, ValueKind,
};
use sampler_gen::{
    Collection, Distribution, Interval, Payload, Request, Sampler, SamplingContext,
};

fn context_with_counter() -> (SamplingContext, Sequential) {
    let counter = Sequential::default();
    let context = SamplingContext::default().with_algorithm("counter", counter.clone());
    (context, counter)
}

fn counter_request() -> Request {
    Request::Type(ValueKind::Named("counter".to_string()))
}

/// Two engines with the same seed give the same scalar draw.
#[test]
fn test_seeded_scalar_draws_match() {
    let context = SamplingContext::default();
    let request = Request::from(1..=10i64);
    let mut first = StdEngine::from_seed(42);
    let mut second = StdEngine::from_seed(42);

    let a = context.draw(&mut first, &request).unwrap();
    let b = context.draw(&mut second, &request).unwrap();
    assert_eq!(a, b);
    assert!(matches!(a, Value::Int(1..=10)));
}

/// Filling an array resolves exactly once, however long the array is.
#[test]
fn test_fill_resolves_once() {
    let (context, counter) = context_with_counter();
    let mut engine = StdEngine::from_seed(1);
    let mut out = vec![Value::Bool(false); 5];

    context.fill(&mut engine, &mut out, &counter_request()).unwrap();
    assert_eq!(counter.resolve_count(), 1);
    assert_eq!(counter.draw_count(), 5);
    assert_eq!(counter.last_repetition(), Some(Repetition::Many));

    let unit = Request::from(Distribution::interval(ValueKind::Float64, Interval::CloseOpen01));
    let mut floats = [0.0f64; 5];
    context.fill_as(&mut engine, &mut floats, &unit).unwrap();
    assert!(floats.iter().all(|x| (0.0..1.0).contains(x)));
}

/// Every element of a filled array comes from a draw.
#[test]
fn test_fill_covers_every_element() {
    let (context, counter) = context_with_counter();
    let mut engine = StdEngine::from_seed(1);
    let sentinel = Value::Str("untouched".to_string());
    let mut out = vec![sentinel.clone(); 100];

    context.fill(&mut engine, &mut out, &counter_request()).unwrap();
    assert!(out.iter().all(|v| *v != sentinel));
    let expected: Vec<Value> = (0..100).map(Value::Int).collect();
    assert_eq!(out, expected);
}

/// Fifty distinct integers from a range of a thousand.
#[test]
fn test_distinct_integers() {
    let context = SamplingContext::default();
    let mut engine = StdEngine::from_seed(42);
    let mut set: HashSet<i64> = HashSet::new();

    context
        .fill_distinct(&mut engine, &mut set, 50, &Request::from(1..=1000i64))
        .unwrap();
    assert_eq!(set.len(), 50);
    assert!(set.iter().all(|x| (1..=1000).contains(x)));
}

/// A three-entry map with integer keys and string values.
#[test]
fn test_distinct_map_from_pairs() {
    let context = SamplingContext::default();
    let mut engine = StdEngine::from_seed(42);
    let names = Collection::values(["north", "south", "east", "west"]);
    let request = Request::from(Distribution::pair(1..=1000i64, names));

    let mut map: HashMap<i64, String> = HashMap::new();
    context.fill_distinct(&mut engine, &mut map, 3, &request).unwrap();
    assert_eq!(map.len(), 3);
    for (key, value) in &map {
        assert!((1..=1000).contains(key));
        assert!(["north", "south", "east", "west"].contains(&value.as_str()));
    }
}

/// Pair kinds are deduced from the parameters.
#[test]
fn test_pair_kind_deduction() {
    let names = Collection::values(["x", "y"]);
    let dist = Distribution::pair(1..=1000i64, names);
    assert_eq!(
        dist.kind(),
        &ValueKind::pair(ValueKind::Int(IntWidth::W64), ValueKind::Str)
    );
    assert_eq!(dist.kind().to_string(), "Pair<Int64, String>");
}

/// Deduction and map filling work when one side of a pair is a bare kind.
#[test]
fn test_pair_of_kind_and_values() {
    let context = SamplingContext::default();
    let mut engine = StdEngine::from_seed(17);
    let switches = Collection::values(["on", "off"]);

    let keyed_by_kind = Distribution::pair(ValueKind::UInt(IntWidth::W16), switches.clone());
    assert_eq!(
        keyed_by_kind.kind(),
        &ValueKind::pair(ValueKind::UInt(IntWidth::W16), ValueKind::Str)
    );
    let map: HashMap<u16, String> = context
        .distinct(&mut engine, 100, &Request::from(keyed_by_kind))
        .unwrap();
    assert_eq!(map.len(), 100);
    assert!(map.values().all(|v| v == "on" || v == "off"));

    let valued_by_kind = Distribution::pair(switches, ValueKind::Bool);
    assert_eq!(
        valued_by_kind.kind(),
        &ValueKind::pair(ValueKind::Str, ValueKind::Bool)
    );
    let map: HashMap<String, bool> = context
        .distinct(&mut engine, 2, &Request::from(valued_by_kind))
        .unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.contains_key("on") && map.contains_key("off"));
}

/// Single draws keep parameters verbatim; bulk draws precompute.
#[test]
fn test_resolution_depends_on_repetition() {
    let context = SamplingContext::default();
    let weighted = Request::from(Collection::weighted([("a", 1.0), ("b", 2.0), ("c", 3.0)]));

    let single = context.resolve(&weighted, Repetition::Single).unwrap();
    assert!(matches!(single, Sampler::Trivial { .. }));
    let many = context.resolve(&weighted, Repetition::Many).unwrap();
    assert!(matches!(many.payload(), Some(Payload::Alias { .. })));

    let (context, counter) = context_with_counter();
    for (repetition, precomputed) in [(Repetition::Single, false), (Repetition::Many, true)] {
        let sampler = context.resolve(&counter_request(), repetition).unwrap();
        assert_eq!(counter.last_repetition(), Some(repetition));
        let Some(Payload::Custom(custom)) = sampler.payload() else {
            panic!("expected a custom payload, got {:?}", sampler);
        };
        assert_eq!(custom.name(), "counter");
        let state = custom.state().downcast_ref::<SequentialState>().unwrap();
        assert_eq!(state.precomputed, precomputed);
    }
}

/// A sampler resolved for many draws is rejected for a single draw.
#[test]
fn test_repetition_mismatch() {
    let context = SamplingContext::default();
    let mut engine = StdEngine::from_seed(3);
    let bulk = context.resolve(&Request::from(1..=6i64), Repetition::Many).unwrap();

    let err = context.draw(&mut engine, &Request::from(bulk.clone())).unwrap_err();
    assert_eq!(
        err,
        SamplingError::RepetitionMismatch {
            resolved: Repetition::Many,
            requested: Repetition::Single,
        }
    );

    let mut out = vec![Value::Int(0); 3];
    context.fill(&mut engine, &mut out, &Request::from(bulk)).unwrap();
}

/// Requests without a strategy are reported, not guessed at.
#[test]
fn test_unsupported_requests() {
    let context = SamplingContext::default();
    let mut engine = StdEngine::from_seed(3);

    let err = context.draw(&mut engine, &counter_request()).unwrap_err();
    assert!(matches!(err, SamplingError::UnsupportedRequest { .. }));
    assert!(err.to_string().contains("counter"));

    let err = context
        .draw(&mut engine, &Request::Type(ValueKind::Any))
        .unwrap_err();
    assert!(matches!(err, SamplingError::UnsupportedRequest { .. }));
}

/// A universe smaller than the target fails fast instead of looping.
#[test]
fn test_universe_too_small() {
    let context = SamplingContext::default();
    let mut engine = StdEngine::from_seed(3);
    let mut set: HashSet<bool> = HashSet::new();

    let err = context
        .fill_distinct(&mut engine, &mut set, 3, &Request::of::<bool>())
        .unwrap_err();
    assert_eq!(
        err,
        SamplingError::UniverseTooSmall {
            target: 3,
            universe: 2
        }
    );
}

/// The attempt limit bounds distinct fills whose universe is unknown.
#[test]
fn test_attempt_limit_bounds_unknown_universes() {
    let config = SamplingConfig::builder()
        .check_universe(false)
        .distinct_attempt_limit(50)
        .build()
        .unwrap();
    let context = SamplingContext::new(config);
    let mut engine = StdEngine::from_seed(3);
    let mut set: HashSet<Value> = HashSet::new();

    let err = context
        .fill_distinct(&mut engine, &mut set, 5, &Request::from(Collection::values(["only"])))
        .unwrap_err();
    assert!(matches!(
        err,
        SamplingError::UniverseExhausted {
            target: 5,
            reached: 1,
            attempts: 50
        }
    ));
}

/// One resolved sampler serves several threads, each with its own engine.
#[test]
fn test_sampler_shared_across_threads() {
    let context = SamplingContext::default();
    let sampler = context
        .resolve(&Request::from(Distribution::normal(0.0, 1.0)), Repetition::Many)
        .unwrap();

    let draws: Vec<Vec<Value>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let sampler = &sampler;
                scope.spawn(move || {
                    let mut engine = StdEngine::from_seed(seed);
                    (0..100).map(|_| sampler.draw(&mut engine)).collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (seed, thread_draws) in draws.iter().enumerate() {
        let mut engine = StdEngine::from_seed(seed as u64);
        let replay: Vec<Value> = (0..100).map(|_| sampler.draw(&mut engine)).collect();
        assert_eq!(thread_draws, &replay);
    }
}

/// Engines can be passed as trait objects.
#[test]
fn test_dynamic_engine() {
    let context = SamplingContext::default();
    let mut boxed: Box<dyn Engine> = Box::new(StdEngine::from_seed(9));
    let mut direct = StdEngine::from_seed(9);
    let request = Request::from(Collection::alphanumeric());

    assert_eq!(
        context.draw(&mut boxed, &request).unwrap(),
        context.draw(&mut direct, &request).unwrap()
    );
}

/// Default-engine convenience functions replay after reseeding.
#[test]
fn test_default_engine_entry_points() {
    let config = SamplingConfig::builder().seed(2024).build().unwrap();
    let context = SamplingContext::new(config);

    assert_eq!(context.apply_seed(), Some(2024));
    let first: i64 = sampler_gen::draw_as(&Request::from(1..=1_000_000i64)).unwrap();
    context.apply_seed();
    let second: i64 = sampler_gen::draw_as(&Request::from(1..=1_000_000i64)).unwrap();
    assert_eq!(first, second);
    sampler_core::engine::teardown_default_engine();
}
