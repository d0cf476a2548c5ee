//! Java type → Python type hint mapping.

use crate::model::JavaType;

/// Hint for a scalar or well-known class, looked up by simple name.
fn scalar_hint(name: &str) -> Option<&'static str> {
    let hint = match name {
        "void" | "Void" => "None",
        "boolean" | "Boolean" => "bool",
        "byte" | "Byte" | "short" | "Short" | "int" | "Integer" | "long" | "Long"
        | "BigInteger" => "int",
        "float" | "Float" | "double" | "Double" => "float",
        "char" | "Character" | "String" | "CharSequence" => "str",
        "Object" => "object",
        "ByteBuffer" => "bytearray",
        _ => return None,
    };
    Some(hint)
}

/// Python generic alias for a Java container, looked up by simple name.
fn container_hint(name: &str) -> Option<&'static str> {
    let hint = match name {
        "List" | "ArrayList" | "LinkedList" | "Collection" | "Iterable" | "Vector" => "List",
        "Set" | "HashSet" | "TreeSet" | "LinkedHashSet" | "SortedSet" => "Set",
        "Map" | "HashMap" | "TreeMap" | "LinkedHashMap" | "SortedMap" => "Dict",
        "Optional" => "Optional",
        "Iterator" => "Iterator",
        _ => return None,
    };
    Some(hint)
}

/// Map a Java type to a Python type hint.
///
/// Known scalars and containers are translated, generic arguments are mapped
/// recursively, arrays become `List[...]` (`byte[]` becomes `bytes`), and
/// anything unknown is kept as written.
pub fn python_hint(ty: &JavaType) -> String {
    match ty {
        JavaType::Named { name, args } => {
            let simple = ty.simple_name().unwrap_or(name.as_str());
            if args.is_empty() {
                if let Some(hint) = scalar_hint(simple).or_else(|| container_hint(simple)) {
                    return hint.to_string();
                }
                return name.clone();
            }
            let outer = container_hint(simple).unwrap_or(name.as_str());
            let inner: Vec<String> = args.iter().map(python_hint).collect();
            format!("{}[{}]", outer, inner.join(", "))
        }
        JavaType::Array(inner) => match inner.as_ref() {
            JavaType::Named { name, args } if name == "byte" && args.is_empty() => {
                "bytes".to_string()
            }
            other => format!("List[{}]", python_hint(other)),
        },
        JavaType::Wildcard {
            bound: Some(bound), ..
        } => python_hint(bound),
        JavaType::Wildcard { bound: None, .. } => ty.to_string(),
        JavaType::Literal(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(name: &str, args: Vec<JavaType>) -> JavaType {
        JavaType::Named {
            name: name.to_string(),
            args,
        }
    }

    #[test]
    fn primitives() {
        assert_eq!(python_hint(&JavaType::named("int")), "int");
        assert_eq!(python_hint(&JavaType::named("boolean")), "bool");
        assert_eq!(python_hint(&JavaType::named("double")), "float");
        assert_eq!(python_hint(&JavaType::named("String")), "str");
        assert_eq!(python_hint(&JavaType::named("void")), "None");
    }

    #[test]
    fn boxed_types() {
        assert_eq!(python_hint(&JavaType::named("Integer")), "int");
        assert_eq!(python_hint(&JavaType::named("java.lang.Long")), "int");
    }

    #[test]
    fn list_of_string_resolves_argument() {
        let ty = generic("List", vec![JavaType::named("String")]);
        assert_eq!(python_hint(&ty), "List[str]");
    }

    #[test]
    fn nested_containers() {
        let ty = generic(
            "HashMap",
            vec![
                JavaType::named("String"),
                generic("ArrayList", vec![JavaType::named("Double")]),
            ],
        );
        assert_eq!(python_hint(&ty), "Dict[str, List[float]]");
    }

    #[test]
    fn arrays() {
        let bytes = JavaType::Array(Box::new(JavaType::named("byte")));
        assert_eq!(python_hint(&bytes), "bytes");
        let ints = JavaType::Array(Box::new(JavaType::named("int")));
        assert_eq!(python_hint(&ints), "List[int]");
        let grid = JavaType::Array(Box::new(ints));
        assert_eq!(python_hint(&grid), "List[List[int]]");
    }

    #[test]
    fn unknown_types_pass_through() {
        assert_eq!(python_hint(&JavaType::named("Pose2d")), "Pose2d");
        let ty = generic("Pair", vec![JavaType::named("Integer")]);
        assert_eq!(python_hint(&ty), "Pair[int]");
    }

    #[test]
    fn wildcards() {
        let bounded = generic(
            "List",
            vec![JavaType::Wildcard {
                bound: Some(Box::new(JavaType::named("Number"))),
                upper: true,
            }],
        );
        assert_eq!(python_hint(&bounded), "List[Number]");
        let bare = generic(
            "List",
            vec![JavaType::Wildcard {
                bound: None,
                upper: true,
            }],
        );
        assert_eq!(python_hint(&bare), "List[?]");
    }

    #[test]
    fn literal_falls_back_to_source() {
        assert_eq!(python_hint(&JavaType::Literal("List<<String>".into())), "List<<String>");
    }
}
