//! Itinerary suggestions from an external generative model.
//!
//! # Responsibility
//! - Define the request/response contract of the suggestion collaborator.
//! - Turn every failure into an empty result so callers render a neutral
//!   state.
//! - Serialize callers: a request issued while another is outstanding is
//!   answered with `Busy` instead of racing it.
//!
//! # Invariants
//! - `suggest` never panics and never returns partial data.
//! - No retries and no caching.

pub mod gemini;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

pub use gemini::GeminiClient;

/// Event kinds offered by the planner.
pub const EVENT_KINDS: &[&str] = &[
    "Wedding",
    "Corporate Retreat",
    "VIP Desert Tour",
    "Private Nile Cruise",
];

pub const DEFAULT_GUEST_COUNT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub event_kind: String,
    pub guest_count: u32,
}

/// Structured itinerary returned by the model.
///
/// `themeName`, `venue` and `itinerary` are required; a payload missing any
/// of them is a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySuggestion {
    pub theme_name: String,
    pub venue: String,
    pub itinerary: Vec<ItineraryStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryStep {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub description: String,
}

/// Failure talking to or understanding the external service.
#[derive(Debug)]
pub enum ExternalServiceError {
    MissingCredential,
    Transport(minreq::Error),
    Status { code: i32, body: String },
    MalformedResponse(String),
    Payload(serde_json::Error),
}

impl Display for ExternalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "suggestion service credential is not configured"),
            Self::Transport(err) => write!(f, "suggestion request failed: {err}"),
            Self::Status { code, body } => {
                write!(f, "suggestion service returned status {code}: {body}")
            }
            Self::MalformedResponse(message) => {
                write!(f, "suggestion response is malformed: {message}")
            }
            Self::Payload(err) => write!(f, "suggestion payload is invalid: {err}"),
        }
    }
}

impl Error for ExternalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Payload(err) => Some(err),
            Self::MissingCredential | Self::Status { .. } | Self::MalformedResponse(_) => None,
        }
    }
}

impl From<minreq::Error> for ExternalServiceError {
    fn from(value: minreq::Error) -> Self {
        Self::Transport(value)
    }
}

/// Transport seam for the suggestion collaborator.
pub trait SuggestionClient {
    fn request_suggestion(
        &self,
        request: &SuggestionRequest,
    ) -> Result<ItinerarySuggestion, ExternalServiceError>;
}

/// Asks `client` for an itinerary; any failure is logged and yields `None`.
pub fn suggest<C: SuggestionClient + ?Sized>(
    client: &C,
    event_kind: &str,
    guest_count: u32,
) -> Option<ItinerarySuggestion> {
    let request = SuggestionRequest {
        event_kind: event_kind.to_string(),
        guest_count,
    };
    match client.request_suggestion(&request) {
        Ok(suggestion) => {
            info!(
                "event=suggest module=suggest status=ok steps={}",
                suggestion.itinerary.len()
            );
            Some(suggestion)
        }
        Err(err) => {
            warn!("event=suggest module=suggest status=error error={err}");
            None
        }
    }
}

/// Result of a guarded suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Ready(ItinerarySuggestion),
    /// The service failed; render the neutral empty state.
    Empty,
    /// Another request is still outstanding; nothing was sent.
    Busy,
}

/// Suggestion client with a single-flight guard.
pub struct SuggestionService<C: SuggestionClient> {
    client: C,
    in_flight: AtomicBool,
}

impl<C: SuggestionClient> SuggestionService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn request(&self, event_kind: &str, guest_count: u32) -> SuggestionOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            info!("event=suggest module=suggest status=skipped reason=busy");
            return SuggestionOutcome::Busy;
        };
        match suggest(&self.client, event_kind, guest_count) {
            Some(suggestion) => SuggestionOutcome::Ready(suggestion),
            None => SuggestionOutcome::Empty,
        }
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
