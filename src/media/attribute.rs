use std::fmt;

/// Tag of an attribute value. `Unsupported` covers every header type the
/// catalog has no table for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Integer,
    Rational,
    Float,
    String,
    Chromaticity,
    Unsupported,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Integer => "int",
            AttributeKind::Rational => "rational",
            AttributeKind::Float => "float",
            AttributeKind::String => "string",
            AttributeKind::Chromaticity => "chromaticities",
            AttributeKind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Scalar,
    Vec2,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Scalar => "scalar",
            Aggregate::Vec2 => "vec2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VecSemantics {
    NoSemantics,
    Rational,
}

impl VecSemantics {
    pub fn as_str(&self) -> &'static str {
        match self {
            VecSemantics::NoSemantics => "nosemantics",
            VecSemantics::Rational => "rational",
        }
    }
}

/// Shape of a value: base kind, aggregate, vector semantics and element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDesc {
    pub kind: AttributeKind,
    pub aggregate: Aggregate,
    pub vec_semantics: VecSemantics,
    pub count: u32,
}

impl TypeDesc {
    const fn scalar(kind: AttributeKind, count: u32) -> Self {
        Self {
            kind,
            aggregate: Aggregate::Scalar,
            vec_semantics: VecSemantics::NoSemantics,
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Integer(i32),
    Rational { numerator: i32, denominator: u32 },
    Float(f64),
    String(String),
    /// rx, ry, gx, gy, bx, by, wx, wy
    Chromaticity([f64; 8]),
    Unsupported { type_name: String, size: usize },
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::Rational { .. } => AttributeKind::Rational,
            AttributeValue::Float(_) => AttributeKind::Float,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Chromaticity(_) => AttributeKind::Chromaticity,
            AttributeValue::Unsupported { .. } => AttributeKind::Unsupported,
        }
    }

    pub fn type_desc(&self) -> TypeDesc {
        match self {
            AttributeValue::Rational { .. } => TypeDesc {
                kind: AttributeKind::Rational,
                aggregate: Aggregate::Vec2,
                vec_semantics: VecSemantics::Rational,
                count: 1,
            },
            AttributeValue::Chromaticity(values) => {
                TypeDesc::scalar(AttributeKind::Chromaticity, values.len() as u32)
            }
            other => TypeDesc::scalar(other.kind(), 1),
        }
    }
}

/// One named value read from an image header.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        self.value.kind()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AttributeValue::Unsupported { type_name, size } => {
                write!(f, "{} (type {}, {} bytes)", self.name, type_name, size)
            }
            value => write!(f, "{} (type {})", self.name, value.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_is_a_vec2_with_rational_semantics() {
        let desc = AttributeValue::Rational {
            numerator: 24000,
            denominator: 1001,
        }
        .type_desc();
        assert_eq!(desc.kind, AttributeKind::Rational);
        assert_eq!(desc.aggregate, Aggregate::Vec2);
        assert_eq!(desc.vec_semantics, VecSemantics::Rational);
        assert_eq!(desc.count, 1);
    }

    #[test]
    fn test_chromaticities_count_eight_elements() {
        let desc = AttributeValue::Chromaticity([0.0; 8]).type_desc();
        assert_eq!(desc.kind.as_str(), "chromaticities");
        assert_eq!(desc.aggregate, Aggregate::Scalar);
        assert_eq!(desc.count, 8);
    }

    #[test]
    fn test_display_uses_header_type_name_for_unsupported() {
        let attr = Attribute::new(
            "worldToCamera",
            AttributeValue::Unsupported {
                type_name: "m44f".to_string(),
                size: 64,
            },
        );
        assert_eq!(attr.to_string(), "worldToCamera (type m44f, 64 bytes)");
        assert_eq!(attr.kind(), AttributeKind::Unsupported);
    }
}
