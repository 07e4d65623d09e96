use serde::{Deserialize, Serialize};

pub const DEFAULT_METHOD_NAME: &str = "Copy";
pub const DEFAULT_TAG_KEY: &str = "deepcopy";

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// What the generated method does with a nil pointer receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootNilPolicy {
    /// Return nil before dereferencing the receiver.
    #[default]
    Guard,
    /// Dereference unconditionally; a nil receiver panics at runtime.
    Assume,
}

impl RootNilPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "guard" | "1" | "true" => Some(Self::Guard),
            "assume" | "0" | "false" => Some(Self::Assume),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    pub root_nil: RootNilPolicy,
    /// Name of the generated method, and of the method a field's type must expose to be
    /// copied by call-through.
    pub method_name: String,
    /// Struct tag key carrying the `skip` directive.
    pub tag_key: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            root_nil: RootNilPolicy::default(),
            method_name: DEFAULT_METHOD_NAME.to_string(),
            tag_key: DEFAULT_TAG_KEY.to_string(),
        }
    }
}

impl SynthesisOptions {
    /// Defaults overridden by `DEEPCOPY_ROOT_NIL`, `DEEPCOPY_METHOD` and
    /// `DEEPCOPY_TAG_KEY`. Unrecognised values fall back to the default.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(policy) = env_string("DEEPCOPY_ROOT_NIL").and_then(|v| RootNilPolicy::parse(&v)) {
            options.root_nil = policy;
        }
        if let Some(method) = env_string("DEEPCOPY_METHOD") {
            options.method_name = method;
        }
        if let Some(key) = env_string("DEEPCOPY_TAG_KEY") {
            options.tag_key = key;
        }
        options
    }
}
