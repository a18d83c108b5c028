//! Synthetic security event generation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use shared::DeviceCategory;

use crate::error::WorkerResult;
use crate::traits::EventSource;

/// Users an event can be attributed to
pub const USERS: [&str; 4] = ["alice", "bob", "charlie", "system"];

/// Event type used for category keys with no dedicated event set
pub const GENERIC_EVENT_TYPE: &str = "event";

const ACCESS_CONTROLLER_EVENTS: [&str; 2] = ["access_granted", "access_denied"];
const FACE_READER_EVENTS: [&str; 2] = ["face_match", "face_no_match"];
const ANPR_EVENTS: [&str; 2] = ["plate_read", "plate_mismatch"];
const GENERIC_EVENTS: [&str; 1] = [GENERIC_EVENT_TYPE];

const ACCESS_METHODS: [&str; 3] = ["card", "pin", "mobile"];
const LANES: [&str; 2] = ["INBOUND", "OUTBOUND"];

/// One generated event before it is stamped with device id and time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEvent {
    pub event_type: String,
    pub username: String,
    pub payload: Value,
}

/// Randomized event generator
///
/// Event type, username and payload fields are drawn independently and
/// uniformly. Category keys are matched as strings so that unknown kinds fall
/// back to the generic event set instead of failing.
#[derive(Debug)]
pub struct EventGenerator<R = StdRng> {
    rng: R,
}

impl EventGenerator<StdRng> {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EventGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Event types a category key can produce
    pub fn event_types_for(category_key: &str) -> &'static [&'static str] {
        match category_key {
            "access_controller" => &ACCESS_CONTROLLER_EVENTS,
            "face_reader" => &FACE_READER_EVENTS,
            "anpr" => &ANPR_EVENTS,
            _ => &GENERIC_EVENTS,
        }
    }

    /// Generate an event for a known category
    pub fn generate_for(&mut self, category: DeviceCategory) -> GeneratedEvent {
        self.generate(category.as_str())
    }

    /// Generate an event for an arbitrary category key
    pub fn generate(&mut self, category_key: &str) -> GeneratedEvent {
        let username = self.pick(&USERS).to_string();
        let event_type = self.pick(Self::event_types_for(category_key)).to_string();
        let payload = self.build_payload(category_key);

        GeneratedEvent {
            event_type,
            username,
            payload,
        }
    }

    fn build_payload(&mut self, category_key: &str) -> Value {
        match category_key {
            "access_controller" => json!({
                "door_id": "A1",
                "method": self.pick(&ACCESS_METHODS),
                "ok": self.rng.gen_bool(0.8),
            }),
            "face_reader" => json!({
                "face_id": format!("F-{}", self.rng.gen_range(0..=9999)),
                "match_score": round2(0.7 + self.rng.gen::<f64>() * 0.3),
            }),
            "anpr" => json!({
                "plate": self.random_plate(),
                "confidence": round2(0.8 + self.rng.gen::<f64>() * 0.2),
                "lane": self.pick(&LANES),
            }),
            _ => json!({ "note": "generic_event" }),
        }
    }

    /// Three uppercase letters followed by a four digit number
    fn random_plate(&mut self) -> String {
        let letters: String = (0..3).map(|_| self.rng.gen_range(b'A'..=b'Z') as char).collect();
        format!("{letters}{}", self.rng.gen_range(1000..=9999))
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        // Every option table above is non-empty
        options.choose(&mut self.rng).copied().unwrap_or(GENERIC_EVENT_TYPE)
    }
}

impl<R: Rng + Send> EventSource for EventGenerator<R> {
    fn next_event(&mut self, category: DeviceCategory) -> WorkerResult<GeneratedEvent> {
        Ok(self.generate_for(category))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
