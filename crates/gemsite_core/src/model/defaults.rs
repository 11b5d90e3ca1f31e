//! Compiled-in factory content.
//!
//! Used when neither a share link nor persisted storage supplies a document,
//! and after a factory reset.

use crate::model::document::{ContentDocument, ContentValue};

const LOGO_URL: &str =
    "https://images.unsplash.com/photo-1614850523296-d8c1af93d400?auto=format&fit=crop&q=80&w=200";
const HERO_BACKGROUND: &str =
    "https://images.unsplash.com/photo-1544111325-4a69622d1e28?auto=format&fit=crop&q=80&w=2000";
const ITINERARY_BACKGROUND: &str =
    "https://images.unsplash.com/photo-1539768942893-daf53e448371?auto=format&fit=crop&q=80&w=2000";

/// Returns a fresh copy of the factory content document.
pub fn default_document() -> ContentDocument {
    ContentDocument::from_entries([
        ("brand", brand()),
        ("hero", hero()),
        ("philosophy", philosophy()),
        ("stickySection", itinerary()),
        ("booking", booking()),
    ])
}

fn brand() -> ContentValue {
    ContentValue::map([
        ("name", ContentValue::text("GEM Events")),
        ("tagline", ContentValue::text("Global Events Management")),
        ("logoUrl", ContentValue::text(LOGO_URL)),
        (
            "philosophy",
            ContentValue::text("We do not provide a service. We provide an experience."),
        ),
        (
            "cumulativeExperience",
            ContentValue::text("50 years of cumulative team experience"),
        ),
    ])
}

fn hero() -> ContentValue {
    ContentValue::map([
        ("title", ContentValue::text("The Art of Distinction")),
        (
            "subtitle",
            ContentValue::text(
                "Bespoke event management across Africa, Europe, and Asia. \
                 From intimate retreats to grand spectacles of 1,000+.",
            ),
        ),
        ("backgroundImage", ContentValue::text(HERO_BACKGROUND)),
    ])
}

fn philosophy() -> ContentValue {
    ContentValue::map([
        ("badge", ContentValue::text("A Once in a Lifetime Promise")),
        ("title", ContentValue::text("Not a Service. An Experience.")),
        (
            "mainText",
            ContentValue::text(
                "If you are looking for a partner to manage every intricate detail of your \
                 journey, you have landed on the right page. We curate more than 50 years of \
                 cumulative team experience to deliver precision-engineered events and \
                 leisure activities.",
            ),
        ),
        (
            "cards",
            ContentValue::List(vec![
                card(
                    "01",
                    "Global Reach",
                    "Mastery in managing world-class events across Africa, Europe, and Asia. \
                     Boundaries are simply starting points for our concierge team.",
                ),
                card(
                    "02",
                    "Perfect Scalability",
                    "Versatile management for groups ranging from intimate private retreats \
                     to massive 1,000-member corporate incentives.",
                ),
                card(
                    "03",
                    "Bespoke Detail",
                    "From corporate summits to high-end leisure activities, we manage every \
                     single detail of your trip, so you only have to focus on the moment.",
                ),
            ]),
        ),
    ])
}

fn itinerary() -> ContentValue {
    ContentValue::map([
        ("backgroundImage", ContentValue::text(ITINERARY_BACKGROUND)),
        ("title", ContentValue::text("Unrivaled Experiences")),
        (
            "items",
            ContentValue::List(vec![
                experience(
                    "Private Giza Gala",
                    "The Great Pyramids, Egypt",
                    "An exclusive evening dinner under the stars at the base of the Sphinx, \
                     featuring world-class catering and private symphonic performances.",
                ),
                experience(
                    "Nile Sophistication",
                    "Luxor & Aswan, Egypt",
                    "Private charter of a luxury Dahabiya. Navigate the timeless waters of the \
                     Nile with sunset cocktails and candlelit temple explorations.",
                ),
            ]),
        ),
    ])
}

fn booking() -> ContentValue {
    ContentValue::map([
        ("title", ContentValue::text("Let Us Manage The Details")),
        (
            "description",
            ContentValue::text(
                "From global logistics to the finest artistic touches, we handle everything. \
                 Share your vision and let our decades of experience take the helm.",
            ),
        ),
    ])
}

fn card(id: &str, title: &str, text: &str) -> ContentValue {
    ContentValue::map([
        ("id", ContentValue::text(id)),
        ("title", ContentValue::text(title)),
        ("text", ContentValue::text(text)),
    ])
}

fn experience(title: &str, location: &str, description: &str) -> ContentValue {
    ContentValue::map([
        ("title", ContentValue::text(title)),
        ("location", ContentValue::text(location)),
        ("description", ContentValue::text(description)),
    ])
}
