//! Member signature parser
//!
//! Grammar of one member line:
//!
//! ```text
//! property := [access] name [":" type] ["=" default] [constraints]
//! method   := [access] name ["(" params ")"] [":" return-type] [constraints]
//! access   := "+" | "#" | "-"
//! params   := [param ("," param)*]
//! param    := [name ":"] type
//! constraints := "{" token ("," token)* "}"
//! ```
//!
//! Constraint tokens are classified tolerantly; misplaced braces and
//! parentheses are fatal.

use super::constraints;
use crate::core::chumsky_utils::split_items;
use crate::core::{Access, GenerationError};
use crate::model::{
    ConstraintSet, MethodDef, ParameterDef, PropertyDef, UNSPECIFIED_TYPE, VOID_TYPE,
};

/// Which region of a class box a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Property,
    Method,
}

/// A parsed member line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Property(PropertyDef),
    Method(MethodDef),
}

/// Parse one line as the given member kind
pub fn parse_member(line: &str, kind: MemberKind) -> Result<Member, GenerationError> {
    match kind {
        MemberKind::Property => parse_property(line).map(Member::Property),
        MemberKind::Method => parse_method(line).map(Member::Method),
    }
}

/// Parse a property signature such as `+name: string = "n/a" {required}`
pub fn parse_property(line: &str) -> Result<PropertyDef, GenerationError> {
    let (text, constraints) = split_constraints(line)?;
    let (access, rest) = split_access(text);

    // Types never contain '=', so the first one starts the default
    let (declaration, default_value) = match rest.split_once('=') {
        Some((declaration, value)) => (declaration, Some(value)),
        None => (rest, None),
    };
    let (name, ty) = declaration.split_once(':').unwrap_or((declaration, ""));

    let name = required_name(line, name)?;
    let ty = ty.trim();
    let ty = if ty.is_empty() { UNSPECIFIED_TYPE } else { ty };
    Ok(PropertyDef {
        access,
        name,
        ty: ty.to_string(),
        default_value: default_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        constraints,
    })
}

/// Parse a method signature such as `+rename(name: string, int): bool {final}`
pub fn parse_method(line: &str) -> Result<MethodDef, GenerationError> {
    let (text, constraints) = split_constraints(line)?;
    let (access, rest) = split_access(text);

    let Some(open) = rest.find('(') else {
        if rest.contains(')') {
            return Err(GenerationError::malformed(
                line,
                "closing parenthesis without opening parenthesis",
            ));
        }
        // No parameter list at all: `name` or `name: type`
        let (name, return_type) = match rest.split_once(':') {
            Some((name, ty)) => (name, ty),
            None => (rest, ""),
        };
        return Ok(MethodDef {
            access,
            name: required_name(line, name)?,
            parameters: Vec::new(),
            return_type: return_type_or_void(return_type),
            constraints,
        });
    };

    let close = rest
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| GenerationError::malformed(line, "missing closing parenthesis"))?;

    let name = required_name(line, &rest[..open])?;
    let parameters = parse_parameters(line, &rest[open + 1..close])?;

    let tail = rest[close + 1..].trim();
    let return_type = if tail.is_empty() {
        VOID_TYPE.to_string()
    } else if let Some(ty) = tail.strip_prefix(':') {
        return_type_or_void(ty)
    } else {
        return Err(GenerationError::malformed(
            line,
            format!("unexpected '{}' after parameter list", tail),
        ));
    };

    Ok(MethodDef {
        access,
        name,
        parameters,
        return_type,
        constraints,
    })
}

fn parse_parameters(line: &str, list: &str) -> Result<Vec<ParameterDef>, GenerationError> {
    let items = split_items(list, ",()")
        .ok_or_else(|| GenerationError::malformed(line, "nested parentheses in parameter list"))?;

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| match item.split_once(':') {
            Some((name, ty)) => {
                let name = name.trim();
                let ty = ty.trim();
                ParameterDef::new(
                    if name.is_empty() {
                        ParameterDef::positional_name(index)
                    } else {
                        name.to_string()
                    },
                    if ty.is_empty() { UNSPECIFIED_TYPE } else { ty },
                )
            }
            None => ParameterDef::new(ParameterDef::positional_name(index), item.as_str()),
        })
        .collect())
}

/// Strip a trailing `{...}` block and classify its tokens
fn split_constraints(line: &str) -> Result<(&str, ConstraintSet), GenerationError> {
    let text = line.trim();
    let Some(close) = text.rfind('}') else {
        return Ok((text, ConstraintSet::new()));
    };

    let open = text[..close]
        .rfind('{')
        .ok_or_else(|| GenerationError::malformed(line, "closing brace without opening brace"))?;

    if !text[close + 1..].trim().is_empty() {
        return Err(GenerationError::malformed(
            line,
            "text after constraint block",
        ));
    }

    let tokens = constraints::tokenize(&text[open + 1..close])
        .ok_or_else(|| GenerationError::malformed(line, "unbalanced braces in constraint block"))?;

    Ok((text[..open].trim_end(), constraints::classify(&tokens)))
}

fn split_access(text: &str) -> (Access, &str) {
    let mut chars = text.chars();
    match chars.next().and_then(Access::from_marker) {
        Some(access) => (access, chars.as_str().trim_start()),
        None => (Access::Private, text),
    }
}

fn required_name(line: &str, name: &str) -> Result<String, GenerationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GenerationError::malformed(line, "missing member name"));
    }
    Ok(name.to_string())
}

fn return_type_or_void(ty: &str) -> String {
    let ty = ty.trim();
    let ty = if ty.is_empty() { VOID_TYPE } else { ty };
    ty.to_string()
}
