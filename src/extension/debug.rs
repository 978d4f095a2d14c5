//! `dump()` for development builds.

use std::collections::HashMap;
use tera::{Function, Result, Tera, Value};

use super::Extension;

/// Registers `dump`.
#[derive(Debug, Default)]
pub struct DebugExtension;

impl Extension for DebugExtension {
    fn name(&self) -> &str {
        "debug"
    }

    fn register(&self, tera: &mut Tera) {
        tera.register_function("dump", Dump);
    }
}

/// `dump(value=...)` prints `value` as pretty JSON inside `<pre>`.
///
/// Without `value`, every argument is dumped as one object.
struct Dump;

impl Function for Dump {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let pretty = match args.get("value") {
            Some(value) => serde_json::to_string_pretty(value)?,
            None => {
                let all: serde_json::Map<String, Value> =
                    args.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                serde_json::to_string_pretty(&all)?
            }
        };
        Ok(Value::String(format!("<pre>{}</pre>", tera::escape_html(&pretty))))
    }

    fn is_safe(&self) -> bool {
        true
    }
}
