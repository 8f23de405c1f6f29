//! avs-core - Fundamental types
//!
//! This crate provides the core types used throughout avs-script:
//! - `Statement`: Import / LoadPlugin dependency lines
//! - `Value`: Arguments handed to plugin invocations
//! - `ScriptError`: Structured errors with stable codes

mod error;
mod statement;
mod value;

pub use error::{codes, ScriptError};
pub use statement::Statement;
pub use value::Value;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{ScriptError, Statement, Value};
}

#[cfg(test)]
mod tests {
    use super::*;

    mod statement_tests {
        use super::*;

        #[test]
        fn test_import_format() {
            let s = Statement::import("C:\\plugins\\colors_rgb.avsi");
            assert_eq!(s.to_string(), "Import(\"C:\\plugins\\colors_rgb.avsi\")");
        }

        #[test]
        fn test_load_plugin_format() {
            let s = Statement::load_plugin("/opt/avs/DeDup.dll");
            assert_eq!(s.to_string(), "LoadPlugin(\"/opt/avs/DeDup.dll\")");
        }

        #[test]
        fn test_path_is_verbatim() {
            // No escaping or normalization beyond quoting
            let s = Statement::import("./a/../b \"c\".avsi");
            assert_eq!(s.path(), "./a/../b \"c\".avsi");
            assert_eq!(s.to_string(), "Import(\"./a/../b \"c\".avsi\")");
        }

        #[test]
        fn test_equality_follows_rendered_line() {
            assert_eq!(Statement::import("a"), Statement::import("a"));
            assert_ne!(Statement::import("a"), Statement::load_plugin("a"));
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&Statement::load_plugin("x.dll")).unwrap();
            assert_eq!(json, r#"{"kind":"LoadPlugin","path":"x.dll"}"#);
        }
    }

    mod value_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let v: Value = 42i64.into();
            assert_eq!(v.as_int(), Some(42));
            assert_eq!(v.as_float(), Some(42.0));
        }

        #[test]
        fn test_from_str() {
            let v: Value = "hello".into();
            assert_eq!(v.as_text(), Some("hello"));
        }

        #[test]
        fn test_from_option() {
            let v: Value = None::<i64>.into();
            assert!(v.is_null());
            let v: Value = Some(true).into();
            assert_eq!(v.as_bool(), Some(true));
        }

        #[test]
        fn test_type_name() {
            assert_eq!(Value::Int(0).type_name(), "Int");
            assert_eq!(Value::Float(0.5).type_name(), "Float");
            assert_eq!(Value::Text(String::new()).type_name(), "Text");
            assert_eq!(Value::Bool(true).type_name(), "Bool");
            assert_eq!(Value::Null.type_name(), "Null");
        }

        #[test]
        fn test_to_script() {
            assert_eq!(Value::from("0.123").to_script(), "\"0.123\"");
            assert_eq!(Value::Int(-3).to_script(), "-3");
            assert_eq!(Value::Float(2.0).to_script(), "2.0");
            assert_eq!(Value::Float(0.25).to_script(), "0.25");
            assert_eq!(Value::Bool(false).to_script(), "false");
            assert_eq!(Value::Null.to_script(), "");
        }

        #[test]
        fn test_to_script_text_with_quotes() {
            let v = Value::from("say \"hi\"");
            assert_eq!(v.to_script(), r#""""say "hi"""""#);
            assert_eq!(Value::from("it's").to_script(), "\"it's\"");
        }
    }

    mod error_tests {
        use super::*;
        use std::io;

        #[test]
        fn test_error_codes() {
            assert_eq!(ScriptError::name_collision("baR", "bar").code(), codes::NAME_COLLISION);
            assert_eq!(ScriptError::reserved_name("code").code(), codes::RESERVED_NAME);
            assert_eq!(ScriptError::unknown_plugin("nope").code(), codes::UNKNOWN_PLUGIN);
            assert_eq!(ScriptError::config("bad").code(), codes::CONFIG);
        }

        #[test]
        fn test_error_display() {
            let err = ScriptError::name_collision("baR", "bar");
            let display = format!("{}", err);
            assert!(display.contains("baR"));
            assert!(display.contains("'bar'"));
        }

        #[test]
        fn test_requirement_error_keeps_source() {
            use std::error::Error as _;
            let err = ScriptError::requirement(
                "/missing",
                io::Error::new(io::ErrorKind::NotFound, "not found"),
            );
            assert_eq!(err.code(), codes::REQUIREMENT_RESOLUTION);
            assert!(err.source().is_some());
            assert!(err.suggestion().is_some());
        }

        #[test]
        fn test_from_json_error() {
            let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
            let err: ScriptError = json_err.into();
            assert_eq!(err.code(), codes::CONFIG);
        }
    }
}
