//! Syntax tree: the typed, relationship-resolved IR shared by every backend

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::{Access, ClassKind, Direction, RelationshipKind};

/// Type used for properties declared without one
pub const UNSPECIFIED_TYPE: &str = "unspecified";
/// Return type used for methods declared without one
pub const VOID_TYPE: &str = "void";

/// Normalized constraint annotations of one member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConstraintSet {
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_final: bool,
    pub required: bool,
    pub unique: bool,
    pub pk: bool,
    pub identity: bool,
    pub generated: bool,
    pub lob: bool,
    pub fk: bool,
    pub fk_target: Option<String>,
    pub length: Option<u32>,
    /// Precision and scale
    pub size: Option<(u32, u32)>,
    pub format: Option<String>,
    /// Tokens no rule recognized
    pub other: BTreeSet<String>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Column is filled in by the database
    pub fn is_auto_valued(&self) -> bool {
        self.identity || self.generated
    }

    fn tokens(&self) -> Vec<String> {
        let flags = [
            (self.is_static, "static"),
            (self.is_abstract, "abstract"),
            (self.is_virtual, "virtual"),
            (self.is_final, "final"),
            (self.required, "required"),
            (self.unique, "unique"),
            (self.pk, "pk"),
            (self.identity, "identity"),
            (self.generated, "generated"),
            (self.lob, "lob"),
        ];
        let mut tokens: Vec<String> = flags
            .iter()
            .filter(|(set, _)| *set)
            .map(|(_, name)| name.to_string())
            .collect();

        if self.fk {
            tokens.push(match &self.fk_target {
                Some(target) => format!("fk:{}", target),
                None => "fk".to_string(),
            });
        }
        if let Some(length) = self.length {
            tokens.push(format!("length:{}", length));
        }
        if let Some((precision, scale)) = self.size {
            tokens.push(format!("size:{}:{}", precision, scale));
        }
        if let Some(format) = &self.format {
            tokens.push(format!("format:{}", format));
        }
        tokens.extend(self.other.iter().cloned());
        tokens
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.tokens().join(", "))
    }
}

/// A property line of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDef {
    pub access: Access,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub default_value: Option<String>,
    pub constraints: ConstraintSet,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            access: Access::Private,
            name: name.into(),
            ty: ty.into(),
            default_value: None,
            constraints: ConstraintSet::new(),
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn is_static(&self) -> bool {
        self.constraints.is_static
    }
}

impl fmt::Display for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.access.marker(), self.name)?;
        if self.ty != UNSPECIFIED_TYPE {
            write!(f, ": {}", self.ty)?;
        }
        if let Some(value) = &self.default_value {
            write!(f, " = {}", value)?;
        }
        if !self.constraints.is_empty() {
            write!(f, " {}", self.constraints)?;
        }
        Ok(())
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl ParameterDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Placeholder name for a parameter declared by type only
    pub fn positional_name(index: usize) -> String {
        format!("arg{}", index)
    }
}

impl fmt::Display for ParameterDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A method line of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDef {
    pub access: Access,
    pub name: String,
    pub parameters: Vec<ParameterDef>,
    pub return_type: String,
    pub constraints: ConstraintSet,
}

impl MethodDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            access: Access::Private,
            name: name.into(),
            parameters: Vec::new(),
            return_type: VOID_TYPE.to_string(),
            constraints: ConstraintSet::new(),
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.parameters.push(ParameterDef::new(name, ty));
        self
    }

    pub fn with_return_type(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn returns_void(&self) -> bool {
        self.return_type == VOID_TYPE
    }
}

impl fmt::Display for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "{}{}({})", self.access.marker(), self.name, params.join(", "))?;
        if !self.returns_void() {
            write!(f, ": {}", self.return_type)?;
        }
        if !self.constraints.is_empty() {
            write!(f, " {}", self.constraints)?;
        }
        Ok(())
    }
}

/// Relationship entries recorded on one entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationshipBag {
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub association: Vec<(Direction, String)>,
    pub aggregation: Vec<(Direction, String)>,
    pub composition: Vec<(Direction, String)>,
}

impl RelationshipBag {
    pub fn is_empty(&self) -> bool {
        self.extends.is_empty()
            && self.implements.is_empty()
            && self.association.is_empty()
            && self.aggregation.is_empty()
            && self.composition.is_empty()
    }

    /// Directed entries of one bidirectional kind
    pub fn links(&self, kind: RelationshipKind) -> &[(Direction, String)] {
        match kind {
            RelationshipKind::Association => &self.association,
            RelationshipKind::Aggregation => &self.aggregation,
            RelationshipKind::Composition => &self.composition,
            RelationshipKind::Extends | RelationshipKind::Implements => &[],
        }
    }

    pub(crate) fn push_link(&mut self, kind: RelationshipKind, direction: Direction, other: &str) {
        let entry = (direction, other.to_string());
        match kind {
            RelationshipKind::Association => self.association.push(entry),
            RelationshipKind::Aggregation => self.aggregation.push(entry),
            RelationshipKind::Composition => self.composition.push(entry),
            RelationshipKind::Extends => self.extends.push(entry.1),
            RelationshipKind::Implements => self.implements.push(entry.1),
        }
    }

    /// Ids of every associated, aggregated or composed entity
    pub fn referenced_ids(&self) -> impl Iterator<Item = &str> {
        [
            RelationshipKind::Association,
            RelationshipKind::Aggregation,
            RelationshipKind::Composition,
        ]
        .into_iter()
        .flat_map(move |kind| self.links(kind))
        .map(|(_, id)| id.as_str())
    }
}

/// Position of a member within its region of the class box
pub type MemberId = usize;

/// A class-like entity of the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDef {
    #[serde(rename = "type")]
    pub kind: ClassKind,
    pub name: String,
    pub stereotype: Option<String>,
    pub properties: IndexMap<MemberId, PropertyDef>,
    pub methods: IndexMap<MemberId, MethodDef>,
    pub relationships: RelationshipBag,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            kind,
            name: name.into(),
            stereotype: None,
            properties: IndexMap::new(),
            methods: IndexMap::new(),
            relationships: RelationshipBag::default(),
        }
    }

    /// Append a property after the existing ones
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        let id = self.properties.len();
        self.properties.insert(id, property);
        self
    }

    /// Append a method after the existing ones
    pub fn with_method(mut self, method: MethodDef) -> Self {
        let id = self.methods.len();
        self.methods.insert(id, method);
        self
    }

    pub fn property_list(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.values()
    }

    pub fn method_list(&self) -> impl Iterator<Item = &MethodDef> {
        self.methods.values()
    }

    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.values().any(|m| m.name == name)
    }
}

/// The complete IR of one diagram, keyed by cell id in diagram order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SyntaxTree {
    classes: IndexMap<String, ClassDef>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, class: ClassDef) {
        self.classes.insert(id.into(), class);
    }

    pub fn get(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut ClassDef> {
        self.classes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassDef)> {
        self.classes.iter().map(|(id, class)| (id.as_str(), class))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    /// First entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<(&str, &ClassDef)> {
        self.iter().find(|(_, class)| class.name == name)
    }

    /// Record one classified edge on both endpoints
    ///
    /// Extends and implements land on the source only; the other kinds land on
    /// both ends, tagged with the direction of the drawn edge. Returns false when
    /// either endpoint is not an entity of this tree.
    pub fn link(&mut self, kind: RelationshipKind, source: &str, target: &str) -> bool {
        if !self.contains(source) || !self.contains(target) {
            return false;
        }
        if let Some(class) = self.get_mut(source) {
            class.relationships.push_link(kind, Direction::To, target);
        }
        if kind.is_bidirectional() {
            if let Some(class) = self.get_mut(target) {
                class.relationships.push_link(kind, Direction::From, source);
            }
        }
        true
    }

    /// Serialize the tree as pretty JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
