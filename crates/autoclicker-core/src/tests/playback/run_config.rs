use crate::{EngineError, RunConfig, RunSettings};

use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

const SAMPLES: usize = 10_000;

fn settings(wait: &str, reps: &str, dpi: &str, jitter: &str) -> RunSettings {
    RunSettings {
        wait_seconds: wait.to_string(),
        repetitions: reps.to_string(),
        dpi_scale: dpi.to_string(),
        randomize_delay: true,
        jitter_range: jitter.to_string(),
        scroll_amount: "3".to_string(),
    }
}

/// WHAT: Valid text fields parse into a RunConfig
/// WHY: The UI stores raw text and parses it at start
#[test]
#[allow(clippy::unwrap_used)]
fn given_numeric_settings_when_parsing_then_config_built() {
    // Given: Well-formed settings with surrounding whitespace
    let raw = settings(" 1.5 ", "3", "1.25", "0.2");

    // When: Parsing
    let config = RunConfig::parse(&raw).unwrap();

    // Then: Every field is carried over
    assert_eq!(config.repetitions, 3);
    assert!((config.wait_seconds - 1.5).abs() < f64::EPSILON);
    assert!((config.dpi_scale - 1.25).abs() < f64::EPSILON);
    assert!((config.jitter_range - 0.2).abs() < f64::EPSILON);
    assert!(config.randomize_delay);
}

/// WHAT: Non-numeric and out-of-range values are rejected
/// WHY: Invalid settings must abort the run before any action
#[test]
fn given_invalid_settings_when_parsing_then_invalid_run_config() {
    let cases = [
        settings("abc", "1", "1", "0"),
        settings("1", "two", "1", "0"),
        settings("1", "0", "1", "0"),
        settings("1", "-1", "1", "0"),
        settings("1", "1", "0", "0"),
        settings("1", "1", "-2", "0"),
        settings("-0.5", "1", "1", "0"),
        settings("1", "1", "1", "-1"),
        settings("NaN", "1", "1", "0"),
        settings("1", "1", "inf", "0"),
    ];

    for raw in cases {
        let result = RunConfig::parse(&raw);
        assert!(
            matches!(result, Err(EngineError::InvalidRunConfig { .. })),
            "expected rejection for {:?}",
            raw
        );
    }
}

/// WHAT: Zero jitter yields exactly the wait time
/// WHY: Randomization must be a no-op when the range is zero
#[test]
#[allow(clippy::unwrap_used)]
fn given_zero_jitter_when_sampling_delays_then_always_wait_seconds() {
    // Given: Randomization enabled with a zero range
    let config = RunConfig::new(0.75, 1, 1.0, true, 0.0).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    // When/Then: Every delay equals the wait time
    for _ in 0..SAMPLES {
        assert_eq!(config.next_delay(&mut rng), Duration::from_secs_f64(0.75));
    }
}

/// WHAT: Jittered delays stay within [max(0, wait - r), wait + r]
/// WHY: Jitter is bounded and a delay is never negative
#[test]
#[allow(clippy::unwrap_used)]
fn given_jitter_range_when_sampling_delays_then_within_bounds() {
    // Given: wait 0.3 with jitter 0.5, so the lower bound clamps to 0
    let config = RunConfig::new(0.3, 1, 1.0, true, 0.5).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let upper = Duration::from_secs_f64(0.8 + 1e-9);

    // When: Sampling many delays
    let delays: Vec<Duration> = (0..SAMPLES).map(|_| config.next_delay(&mut rng)).collect();

    // Then: All lie in range and the clamp at zero is reached
    assert!(delays.iter().all(|d| *d <= upper));
    assert!(delays.iter().any(|d| d.is_zero()));
    assert!(delays.iter().any(|d| *d > Duration::from_secs_f64(0.3)));
}

/// WHAT: Jitter is ignored when randomization is off
/// WHY: The jitter range only matters with randomize enabled
#[test]
#[allow(clippy::unwrap_used)]
fn given_randomize_off_when_sampling_delays_then_jitter_ignored() {
    let config = RunConfig::new(2.0, 1, 1.0, false, 1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..100 {
        assert_eq!(config.next_delay(&mut rng), Duration::from_secs(2));
    }
}

/// WHAT: Scroll amount field parses leniently
/// WHY: Capture reads it at event time and treats garbage as unreadable
#[test]
fn given_scroll_amount_text_when_reading_then_parsed_or_none() {
    let mut raw = RunSettings::default();
    assert_eq!(raw.scroll_amount(), Some(3.0));

    raw.scroll_amount = "lots".to_string();
    assert_eq!(raw.scroll_amount(), None);
}
