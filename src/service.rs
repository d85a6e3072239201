//! Offered services and their display labels.
//!
//! The contact form submits a short service code. Known codes map to a fixed
//! label; anything else is kept verbatim and used as its own label.

use std::borrow::Cow;
use std::fmt;

/// A service the submitter is enquiring about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceCode {
    Inspections,
    ConstructionMonitoring,
    SolarPanels,
    ExteriorSurveys,
    Security,
    VisualContent,
    RealEstateMarketing,
    Events,
    Other,
    /// A code outside the table, kept as submitted.
    Unrecognized(String),
}

impl ServiceCode {
    /// Every known service, in the order the form lists them.
    pub const KNOWN: [ServiceCode; 9] = [
        ServiceCode::Inspections,
        ServiceCode::ConstructionMonitoring,
        ServiceCode::SolarPanels,
        ServiceCode::ExteriorSurveys,
        ServiceCode::Security,
        ServiceCode::VisualContent,
        ServiceCode::RealEstateMarketing,
        ServiceCode::Events,
        ServiceCode::Other,
    ];

    /// Resolve a submitted code.
    ///
    /// Accepts the canonical codes, the older Portuguese form values and the
    /// catalog ids. Matching is exact: codes are machine values, not free text.
    pub fn parse(code: &str) -> Self {
        match code {
            "inspections" | "inspecoes" | "inspecoes-aereas" => Self::Inspections,
            "construction-monitoring" | "acompanhamento" | "acompanhamento-obras" => {
                Self::ConstructionMonitoring
            }
            "solar-panels" | "paineis" | "paineis-solares" => Self::SolarPanels,
            "exterior-surveys" | "espacos" | "espacos-exteriores" => Self::ExteriorSurveys,
            "security" | "seguranca" | "seguranca-perimetros" => Self::Security,
            "visual-content" | "conteudos" | "conteudos-visuais" => Self::VisualContent,
            "real-estate-marketing" | "imobiliario" => Self::RealEstateMarketing,
            "events" | "eventos" => Self::Events,
            "other" | "outro" => Self::Other,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Canonical code for this service.
    pub fn code(&self) -> &str {
        match self {
            Self::Inspections => "inspections",
            Self::ConstructionMonitoring => "construction-monitoring",
            Self::SolarPanels => "solar-panels",
            Self::ExteriorSurveys => "exterior-surveys",
            Self::Security => "security",
            Self::VisualContent => "visual-content",
            Self::RealEstateMarketing => "real-estate-marketing",
            Self::Events => "events",
            Self::Other => "other",
            Self::Unrecognized(code) => code,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::Inspections => "Aerial Technical Inspections",
            Self::ConstructionMonitoring => "Construction Monitoring",
            Self::SolarPanels => "Solar Panel Inspection",
            Self::ExteriorSurveys => "Exterior Space Surveys",
            Self::Security => "Security Verification",
            Self::VisualContent => "Visual Content",
            Self::RealEstateMarketing => "Real Estate Marketing",
            Self::Events => "Events & Corporate",
            Self::Other => "Other",
            Self::Unrecognized(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Look up the label for a raw service code.
///
/// Unknown codes come back unchanged. Never fails.
///
/// ```
/// use contact_relay::resolve_label;
///
/// assert_eq!(resolve_label("inspections"), "Aerial Technical Inspections");
/// assert_eq!(resolve_label("kite-surveys"), "kite-surveys");
/// ```
pub fn resolve_label(code: &str) -> Cow<'_, str> {
    match ServiceCode::parse(code) {
        ServiceCode::Unrecognized(_) => Cow::Borrowed(code),
        known => Cow::Owned(known.label().to_string()),
    }
}
