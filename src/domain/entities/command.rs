use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Parsed argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Bool(bool),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            ArgValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            ArgValue::Str(_) => None,
        }
    }
}

/// Transforms a raw token into its final value, or explains why it can't
pub type Coercion = Arc<dyn Fn(&str) -> Result<ArgValue, String> + Send + Sync>;

/// Positional parameter of a command
#[derive(Clone)]
pub struct Positional {
    pub name: String,
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<String>,
    pub coerce: Option<Coercion>,
}

impl Positional {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: true,
            default: None,
            coerce: None,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_coercion<F>(mut self, coerce: F) -> Self
    where
        F: Fn(&str) -> Result<ArgValue, String> + Send + Sync + 'static,
    {
        self.coerce = Some(Arc::new(coerce));
        self
    }

    /// `<name>` when required, `[name]` otherwise
    pub fn usage(&self) -> String {
        if self.required {
            format!("<{}>", self.name)
        } else {
            format!("[{}]", self.name)
        }
    }

    pub fn resolve(&self, raw: &str) -> Result<ArgValue, String> {
        match &self.coerce {
            Some(coerce) => coerce(raw),
            None => Ok(ArgValue::Str(raw.to_string())),
        }
    }
}

impl fmt::Debug for Positional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Positional")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("coerce", &self.coerce.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Present or absent, never takes a value
    Boolean,
    /// Takes the next token (or `--name=value`)
    String,
}

/// Optional `--flag` of a command
#[derive(Clone)]
pub struct Flag {
    pub name: String,
    pub short: Option<char>,
    pub description: Option<String>,
    pub kind: FlagKind,
    pub default: Option<String>,
    pub coerce: Option<Coercion>,
}

impl Flag {
    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            description: None,
            kind: FlagKind::Boolean,
            default: None,
            coerce: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self {
            kind: FlagKind::String,
            ..Self::boolean(name)
        }
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_coercion<F>(mut self, coerce: F) -> Self
    where
        F: Fn(&str) -> Result<ArgValue, String> + Send + Sync + 'static,
    {
        self.coerce = Some(Arc::new(coerce));
        self
    }

    /// Whether `token` names this flag (`--name` or `-s`)
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return long == self.name;
        }
        match (token.strip_prefix('-'), self.short) {
            (Some(short), Some(c)) => short.len() == c.len_utf8() && short.starts_with(c),
            _ => false,
        }
    }

    pub fn usage(&self) -> String {
        let mut usage = match self.short {
            Some(c) => format!("-{}, --{}", c, self.name),
            None => format!("--{}", self.name),
        };
        if self.kind == FlagKind::String {
            usage.push_str(" <value>");
        }
        usage
    }

    pub fn resolve(&self, raw: &str) -> Result<ArgValue, String> {
        match &self.coerce {
            Some(coerce) => coerce(raw),
            None => Ok(ArgValue::Str(raw.to_string())),
        }
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("coerce", &self.coerce.is_some())
            .finish()
    }
}

/// Values produced by parsing a command line against a command's parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: HashMap<String, ArgValue>,
}

impl ParsedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    /// Boolean flags default to false when unset
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(ArgValue::as_bool).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_matches() {
        let flag = Flag::boolean("remove").with_short('r');
        assert!(flag.matches("--remove"));
        assert!(flag.matches("-r"));
        assert!(!flag.matches("-rf"));
        assert!(!flag.matches("--r"));
        assert!(!flag.matches("remove"));
    }

    #[test]
    fn test_usage_strings() {
        assert_eq!(Positional::required("steam-id").usage(), "<steam-id>");
        assert_eq!(Positional::optional("roll").usage(), "[roll]");
        assert_eq!(Flag::boolean("remove").with_short('r').usage(), "-r, --remove");
        assert_eq!(Flag::string("reason").usage(), "--reason <value>");
    }

    #[test]
    fn test_coercion_applies() {
        let pos = Positional::optional("count")
            .with_coercion(|raw| Ok(ArgValue::Str(raw.to_uppercase())));
        assert_eq!(pos.resolve("abc"), Ok(ArgValue::Str("ABC".to_string())));
    }

    #[test]
    fn test_parsed_args_accessors() {
        let mut args = ParsedArgs::new();
        args.insert("steam-id", ArgValue::Str("7656".to_string()));
        args.insert("remove", ArgValue::Bool(true));

        assert_eq!(args.str("steam-id"), Some("7656"));
        assert!(args.flag("remove"));
        assert!(!args.flag("missing"));
        assert_eq!(args.str("remove"), None);
    }
}
