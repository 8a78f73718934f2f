use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{CatalogError, Result};
use crate::media::attribute::{Attribute, AttributeKind};

/// Structural attributes: they describe image geometry and encoding, not
/// catalogable metadata, and are never persisted.
pub const REQUIRED_ATTRIBUTE_NAMES: [&str; 7] = [
    "displayWindow",
    "dataWindow",
    "screenWindowCenter",
    "screenWindowWidth",
    "lineOrder",
    "compression",
    "channels",
];

/// Standard header attributes and the type each is expected to carry.
const CANONICAL_ATTRIBUTE_TYPES: &[(&str, AttributeKind)] = &[
    ("pixelAspectRatio", AttributeKind::Float),
    ("chromaticities", AttributeKind::Chromaticity),
    ("whiteLuminance", AttributeKind::Float),
    ("renderingTransform", AttributeKind::String),
    ("lookModTransform", AttributeKind::String),
    ("xDensity", AttributeKind::Float),
    ("owner", AttributeKind::String),
    ("comments", AttributeKind::String),
    ("capDate", AttributeKind::String),
    ("utcOffset", AttributeKind::Float),
    ("longitude", AttributeKind::Float),
    ("latitude", AttributeKind::Float),
    ("altitude", AttributeKind::Float),
    ("focus", AttributeKind::Float),
    ("expTime", AttributeKind::Float),
    ("aperture", AttributeKind::Float),
    ("isoSpeed", AttributeKind::Float),
    ("wrapmodes", AttributeKind::String),
    ("framesPerSecond", AttributeKind::Rational),
    ("dwaCompressionLevel", AttributeKind::Float),
    ("imageCounter", AttributeKind::Integer),
    ("reelName", AttributeKind::String),
    ("cameraMake", AttributeKind::String),
    ("cameraModel", AttributeKind::String),
    ("cameraSerialNumber", AttributeKind::String),
    ("lensMake", AttributeKind::String),
    ("lensModel", AttributeKind::String),
    ("nominalFocalLength", AttributeKind::Float),
    ("effectiveFocalLength", AttributeKind::Float),
];

/// Other spellings of canonical names, as written by common image libraries.
/// They only fill in the `canonical_name` column; they are not canonical
/// themselves and are never type-checked.
const CANONICAL_ALIASES: &[(&str, &str)] = &[
    ("PixelAspectRatio", "pixelAspectRatio"),
    ("Copyright", "owner"),
    ("ImageDescription", "comments"),
    ("DateTime", "capDate"),
    ("FramesPerSecond", "framesPerSecond"),
    ("ExposureTime", "expTime"),
    ("FNumber", "aperture"),
    ("Make", "cameraMake"),
    ("Model", "cameraModel"),
];

/// A canonical attribute delivered with the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub name: String,
    pub expected: AttributeKind,
    pub found: AttributeKind,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "saw unexpected type {} for canonical attribute `{}' (expected {})",
            self.found, self.name, self.expected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Not a name we know; cataloged without checks.
    Unregistered,
    Conforms,
    Mismatch(TypeMismatch),
}

#[derive(Debug, Clone)]
pub struct AttributeClassifier {
    required: HashSet<&'static str>,
    canonical: HashMap<&'static str, AttributeKind>,
    aliases: HashMap<&'static str, &'static str>,
}

impl Default for AttributeClassifier {
    fn default() -> Self {
        Self {
            required: REQUIRED_ATTRIBUTE_NAMES.into_iter().collect(),
            canonical: CANONICAL_ATTRIBUTE_TYPES.iter().copied().collect(),
            aliases: CANONICAL_ALIASES.iter().copied().collect(),
        }
    }
}

impl AttributeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.contains_key(name)
    }

    /// Canonical name for `name`: itself when registered, the alias target
    /// when it is a known alternate spelling.
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        match self.canonical.get_key_value(name) {
            Some((canonical, _)) => Some(*canonical),
            None => self.aliases.get(name).copied(),
        }
    }

    pub fn expected_type(&self, name: &str) -> Result<AttributeKind> {
        self.canonical
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownCanonicalName(name.to_string()))
    }

    pub fn validate(&self, attribute: &Attribute) -> Result<Validation> {
        if !self.is_canonical(&attribute.name) {
            return Ok(Validation::Unregistered);
        }

        let expected = self.expected_type(&attribute.name)?;
        let found = attribute.kind();
        if found == expected {
            Ok(Validation::Conforms)
        } else {
            Ok(Validation::Mismatch(TypeMismatch {
                name: attribute.name.clone(),
                expected,
                found,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::attribute::AttributeValue;

    #[test]
    fn test_required_names_are_not_canonical() {
        let classifier = AttributeClassifier::new();
        for name in REQUIRED_ATTRIBUTE_NAMES {
            assert!(classifier.is_required(name), "{name} should be required");
            assert!(!classifier.is_canonical(name), "{name} should not be canonical");
        }
        assert!(!classifier.is_required("pixelAspectRatio"));
        assert!(!classifier.is_required("myCustomTag"));
    }

    #[test]
    fn test_expected_type_for_canonical_names() -> Result<()> {
        let classifier = AttributeClassifier::new();
        assert_eq!(classifier.expected_type("pixelAspectRatio")?, AttributeKind::Float);
        assert_eq!(classifier.expected_type("framesPerSecond")?, AttributeKind::Rational);
        assert_eq!(classifier.expected_type("chromaticities")?, AttributeKind::Chromaticity);
        assert_eq!(classifier.expected_type("owner")?, AttributeKind::String);
        Ok(())
    }

    #[test]
    fn test_expected_type_fails_for_unknown_names() {
        let classifier = AttributeClassifier::new();
        for name in ["myCustomTag", "compression", "", "PixelAspectRatio"] {
            let err = classifier.expected_type(name).unwrap_err();
            assert!(matches!(err, CatalogError::UnknownCanonicalName(ref n) if n == name));
        }
    }

    #[test]
    fn test_canonical_name_resolves_aliases() {
        let classifier = AttributeClassifier::new();
        assert_eq!(classifier.canonical_name("pixelAspectRatio"), Some("pixelAspectRatio"));
        assert_eq!(classifier.canonical_name("Copyright"), Some("owner"));
        assert_eq!(classifier.canonical_name("myCustomTag"), None);
        assert!(!classifier.is_canonical("Copyright"));
        assert!(classifier.expected_type("Copyright").is_err());
    }

    #[test]
    fn test_aliases_are_not_type_checked() -> Result<()> {
        let classifier = AttributeClassifier::new();
        let alias = Attribute::new("Copyright", AttributeValue::Float(2.0));
        assert!(!classifier.is_canonical(&alias.name));
        assert_eq!(classifier.validate(&alias)?, Validation::Unregistered);
        Ok(())
    }

    #[test]
    fn test_validate_passes_matching_and_unregistered() -> Result<()> {
        let classifier = AttributeClassifier::new();
        let par = Attribute::new("pixelAspectRatio", AttributeValue::Float(1.0));
        assert_eq!(classifier.validate(&par)?, Validation::Conforms);

        let custom = Attribute::new("myCustomTag", AttributeValue::Integer(3));
        assert_eq!(classifier.validate(&custom)?, Validation::Unregistered);
        Ok(())
    }

    #[test]
    fn test_validate_reports_mismatch() -> Result<()> {
        let classifier = AttributeClassifier::new();
        let par = Attribute::new("pixelAspectRatio", AttributeValue::Integer(1));
        let Validation::Mismatch(mismatch) = classifier.validate(&par)? else {
            panic!("expected a mismatch");
        };
        assert_eq!(mismatch.expected, AttributeKind::Float);
        assert_eq!(mismatch.found, AttributeKind::Integer);
        assert_eq!(
            mismatch.to_string(),
            "saw unexpected type int for canonical attribute `pixelAspectRatio' (expected float)"
        );
        Ok(())
    }
}
