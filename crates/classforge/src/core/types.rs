//! Core type definitions shared by the parser and the backends
//!
//! Member access levels, entity kinds, and relationship kinds.

use std::fmt;

use serde::Serialize;

/// Access level of a property or method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    /// Members without a marker are private
    #[default]
    Private,
}

impl Access {
    /// Map a leading signature marker to an access level
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '+' => Some(Access::Public),
            '#' => Some(Access::Protected),
            '-' => Some(Access::Private),
            _ => None,
        }
    }

    pub fn marker(self) -> char {
        match self {
            Access::Public => '+',
            Access::Protected => '#',
            Access::Private => '-',
        }
    }

    /// Keyword shared by Java, C#, C++, TypeScript and PHP
    pub fn keyword(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }

    /// Access of an abstract member; private ones become protected
    pub fn overridable(self) -> Access {
        match self {
            Access::Private => Access::Protected,
            access => access,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Kind of a class-like entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ClassKind {
    #[default]
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "abstract class")]
    AbstractClass,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "enum")]
    Enum,
}

impl ClassKind {
    /// Kinds that get constructors, accessors and equality methods
    pub fn is_class_like(self) -> bool {
        matches!(self, ClassKind::Class | ClassKind::AbstractClass)
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassKind::Class => write!(f, "class"),
            ClassKind::AbstractClass => write!(f, "abstract class"),
            ClassKind::Interface => write!(f, "interface"),
            ClassKind::Enum => write!(f, "enum"),
        }
    }
}

/// UML relationship kind recovered from an edge's visual style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Association,
    Aggregation,
    Composition,
    Extends,
    Implements,
}

impl RelationshipKind {
    /// Extends and implements are recorded on the source only
    pub fn is_bidirectional(self) -> bool {
        matches!(
            self,
            RelationshipKind::Association
                | RelationshipKind::Aggregation
                | RelationshipKind::Composition
        )
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Association => write!(f, "association"),
            RelationshipKind::Aggregation => write!(f, "aggregation"),
            RelationshipKind::Composition => write!(f, "composition"),
            RelationshipKind::Extends => write!(f, "extends"),
            RelationshipKind::Implements => write!(f, "implements"),
        }
    }
}

/// Which end of a bidirectional relationship an entry was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The owner is the edge source
    To,
    /// The owner is the edge target
    From,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::To => write!(f, "to"),
            Direction::From => write!(f, "from"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_markers_are_total() {
        assert_eq!(Access::from_marker('+'), Some(Access::Public));
        assert_eq!(Access::from_marker('#'), Some(Access::Protected));
        assert_eq!(Access::from_marker('-'), Some(Access::Private));
        assert_eq!(Access::from_marker('~'), None);
        assert_eq!(Access::default(), Access::Private);

        for access in [Access::Public, Access::Protected, Access::Private] {
            assert_eq!(Access::from_marker(access.marker()), Some(access));
        }
    }

    #[test]
    fn test_class_kind_display() {
        assert_eq!(ClassKind::AbstractClass.to_string(), "abstract class");
        assert_eq!(ClassKind::Enum.to_string(), "enum");
        assert!(ClassKind::Class.is_class_like());
        assert!(!ClassKind::Interface.is_class_like());
    }

    #[test]
    fn test_relationship_kind_direction() {
        assert!(RelationshipKind::Composition.is_bidirectional());
        assert!(!RelationshipKind::Extends.is_bidirectional());
        assert_eq!(RelationshipKind::Implements.to_string(), "implements");
    }
}
