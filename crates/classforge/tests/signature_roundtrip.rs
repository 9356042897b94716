//! Property tests: a parsed signature prints back to text that parses the same

use classforge::parser::{parse_method, parse_property};
use proptest::prelude::*;

fn access() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "+", "#", "-"])
}

fn type_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["string", "int32", "int64", "decimal", "Customer", "date"])
}

fn constraint_block() -> impl Strategy<Value = String> {
    prop::sample::subsequence(
        vec![
            "pk",
            "identity",
            "unique",
            "required",
            "static",
            "final",
            "length:40",
            "size:10:2",
            "fk:Customer",
            "indexed",
        ],
        0..5,
    )
    .prop_map(|tokens| {
        if tokens.is_empty() {
            String::new()
        } else {
            format!(" {{{}}}", tokens.join(", "))
        }
    })
}

proptest! {
    #[test]
    fn property_display_reparses(
        access in access(),
        name in "[a-z][a-zA-Z0-9_]{0,10}",
        ty in prop::option::of(type_name()),
        default in prop::option::of(prop_oneof!["[0-9]{1,4}", "\"[a-z]{1,4}:[a-z0-9/]{0,6}\""]),
        constraints in constraint_block(),
    ) {
        let mut line = format!("{}{}", access, name);
        if let Some(ty) = ty {
            line.push_str(&format!(": {}", ty));
        }
        if let Some(default) = &default {
            line.push_str(&format!(" = {}", default));
        }
        line.push_str(&constraints);

        let parsed = parse_property(&line).unwrap();
        prop_assert_eq!(&parsed.name, &name);
        prop_assert_eq!(parsed.default_value.as_ref(), default.as_ref());

        let printed = parsed.to_string();
        let reparsed = parse_property(&printed).unwrap();
        prop_assert_eq!(&reparsed, &parsed);
        prop_assert_eq!(reparsed.to_string(), printed);
    }

    #[test]
    fn method_display_reparses(
        access in access(),
        name in "[a-z][a-zA-Z0-9_]{0,10}",
        params in prop::collection::vec(("[a-z]{1,6}", type_name()), 0..4),
        ret in prop::option::of(type_name()),
        constraints in constraint_block(),
    ) {
        let params: Vec<String> = params
            .iter()
            .map(|(param, ty)| format!("{}: {}", param, ty))
            .collect();
        let mut line = format!("{}{}({})", access, name, params.join(", "));
        if let Some(ret) = ret {
            line.push_str(&format!(": {}", ret));
        }
        line.push_str(&constraints);

        let parsed = parse_method(&line).unwrap();
        prop_assert_eq!(parsed.parameters.len(), params.len());

        let printed = parsed.to_string();
        let reparsed = parse_method(&printed).unwrap();
        prop_assert_eq!(&reparsed, &parsed);
        prop_assert_eq!(reparsed.to_string(), printed);
    }
}
