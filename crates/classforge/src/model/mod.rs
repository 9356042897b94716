//! Data model: the style tree consumed by the builder and the syntax tree
//! shared by every backend

pub mod resolve;
pub mod style;
pub mod syntax;

pub use resolve::{collect_interface_methods, owed_methods, resolve_dependencies, Dependencies};
pub use style::{CellValue, RelationshipEdge, StyleCell, StyleMap, StyleTree};
pub use syntax::{
    ClassDef, ConstraintSet, MemberId, MethodDef, ParameterDef, PropertyDef, RelationshipBag,
    SyntaxTree, UNSPECIFIED_TYPE, VOID_TYPE,
};
