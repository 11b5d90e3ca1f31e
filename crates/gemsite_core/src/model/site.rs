//! Typed view over the content document.
//!
//! # Responsibility
//! - Give callers named sections (brand, hero, philosophy, itinerary,
//!   booking) instead of raw dotted paths.
//! - Map every editor-exposed field to the dotted path the mutator uses.
//!
//! # Invariants
//! - JSON field names match the persisted/shared document exactly
//!   (`logoUrl`, `stickySection`, `mainText`, ...).
//! - Every leaf is optional; a missing leaf never fails conversion.
//! - Keys unknown to the typed view are ignored here and kept in the
//!   underlying document.

use crate::model::document::{ContentDocument, ShapeError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    #[serde(default)]
    pub brand: Brand,
    #[serde(default)]
    pub hero: Hero,
    #[serde(default)]
    pub philosophy: Philosophy,
    #[serde(default)]
    pub sticky_section: StickySection,
    #[serde(default)]
    pub booking: Booking,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// External URL or embedded `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_experience: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Philosophy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_text: Option<String>,
    #[serde(default)]
    pub cards: Vec<PhilosophyCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilosophyCard {
    /// Display ordinal such as `"01"`; not editable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The itinerary ("signature collection") section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ExperienceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SiteContent {
    /// Reads the typed view out of a document.
    ///
    /// Fails only when a known section has the wrong container type, e.g.
    /// `philosophy.cards` stored as a mapping.
    pub fn from_document(document: &ContentDocument) -> Result<Self, ShapeError> {
        let value = document.to_json_value()?;
        Ok(serde_json::from_value(value)?)
    }

    /// Converts the typed view into a document; `None` leaves are omitted.
    pub fn to_document(&self) -> Result<ContentDocument, ShapeError> {
        let value = serde_json::to_value(self)?;
        ContentDocument::from_json_value(value)
    }
}

/// Every field the editor exposes, with list positions where relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    BrandName,
    BrandTagline,
    BrandLogo,
    BrandManifesto,
    BrandExperience,
    HeroTitle,
    HeroSubtitle,
    HeroBackground,
    PhilosophyBadge,
    PhilosophyTitle,
    PhilosophyMainText,
    PhilosophyCardTitle(usize),
    PhilosophyCardText(usize),
    ItineraryBackground,
    ItineraryTitle,
    ItineraryItemTitle(usize),
    ItineraryItemLocation(usize),
    ItineraryItemDescription(usize),
    BookingTitle,
    BookingDescription,
}

impl EditField {
    /// Dotted document path this field is stored under.
    pub fn path(&self) -> String {
        match self {
            Self::BrandName => "brand.name".to_string(),
            Self::BrandTagline => "brand.tagline".to_string(),
            Self::BrandLogo => "brand.logoUrl".to_string(),
            Self::BrandManifesto => "brand.philosophy".to_string(),
            Self::BrandExperience => "brand.cumulativeExperience".to_string(),
            Self::HeroTitle => "hero.title".to_string(),
            Self::HeroSubtitle => "hero.subtitle".to_string(),
            Self::HeroBackground => "hero.backgroundImage".to_string(),
            Self::PhilosophyBadge => "philosophy.badge".to_string(),
            Self::PhilosophyTitle => "philosophy.title".to_string(),
            Self::PhilosophyMainText => "philosophy.mainText".to_string(),
            Self::PhilosophyCardTitle(index) => format!("philosophy.cards.{index}.title"),
            Self::PhilosophyCardText(index) => format!("philosophy.cards.{index}.text"),
            Self::ItineraryBackground => "stickySection.backgroundImage".to_string(),
            Self::ItineraryTitle => "stickySection.title".to_string(),
            Self::ItineraryItemTitle(index) => format!("stickySection.items.{index}.title"),
            Self::ItineraryItemLocation(index) => format!("stickySection.items.{index}.location"),
            Self::ItineraryItemDescription(index) => {
                format!("stickySection.items.{index}.description")
            }
            Self::BookingTitle => "booking.title".to_string(),
            Self::BookingDescription => "booking.description".to_string(),
        }
    }

    /// Image fields accept URLs or uploaded `data:` URIs.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::BrandLogo | Self::HeroBackground | Self::ItineraryBackground
        )
    }

    /// Fields exposed for `content`, list fields expanded per entry.
    pub fn all_for(content: &SiteContent) -> Vec<EditField> {
        let mut fields = vec![
            Self::BrandName,
            Self::BrandTagline,
            Self::BrandLogo,
            Self::BrandManifesto,
            Self::BrandExperience,
            Self::HeroTitle,
            Self::HeroSubtitle,
            Self::HeroBackground,
            Self::PhilosophyBadge,
            Self::PhilosophyTitle,
            Self::PhilosophyMainText,
        ];
        for index in 0..content.philosophy.cards.len() {
            fields.push(Self::PhilosophyCardTitle(index));
            fields.push(Self::PhilosophyCardText(index));
        }
        fields.push(Self::ItineraryBackground);
        fields.push(Self::ItineraryTitle);
        for index in 0..content.sticky_section.items.len() {
            fields.push(Self::ItineraryItemTitle(index));
            fields.push(Self::ItineraryItemLocation(index));
            fields.push(Self::ItineraryItemDescription(index));
        }
        fields.push(Self::BookingTitle);
        fields.push(Self::BookingDescription);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::{EditField, SiteContent};
    use crate::model::defaults::default_document;
    use crate::model::document::ContentDocument;

    #[test]
    fn defaults_convert_to_typed_view() {
        let content = SiteContent::from_document(&default_document()).unwrap();
        assert_eq!(content.brand.name.as_deref(), Some("GEM Events"));
        assert_eq!(content.philosophy.cards.len(), 3);
        assert_eq!(content.sticky_section.items.len(), 2);
        assert_eq!(
            content.sticky_section.items[0].title.as_deref(),
            Some("Private Giza Gala")
        );
    }

    #[test]
    fn typed_view_round_trips_through_document() {
        let content = SiteContent::from_document(&default_document()).unwrap();
        assert_eq!(content.to_document().unwrap(), default_document());
    }

    #[test]
    fn mapping_where_list_expected_is_a_shape_error() {
        let doc = ContentDocument::new()
            .update("philosophy.cards.first.title", "x")
            .unwrap();
        assert!(SiteContent::from_document(&doc).is_err());
    }

    #[test]
    fn edit_field_paths_use_document_keys() {
        assert_eq!(EditField::BrandLogo.path(), "brand.logoUrl");
        assert_eq!(
            EditField::ItineraryItemDescription(1).path(),
            "stickySection.items.1.description"
        );
        assert!(EditField::HeroBackground.is_image());
        assert!(!EditField::HeroTitle.is_image());
    }

    #[test]
    fn all_for_expands_list_entries() {
        let content = SiteContent::from_document(&default_document()).unwrap();
        let fields = EditField::all_for(&content);
        assert!(fields.contains(&EditField::PhilosophyCardText(2)));
        assert!(fields.contains(&EditField::ItineraryItemLocation(1)));
        assert!(!fields.contains(&EditField::ItineraryItemLocation(2)));
    }
}
