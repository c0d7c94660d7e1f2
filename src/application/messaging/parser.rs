//! Message parser - Turns raw chat text into tokens and typed arguments

use crate::application::errors::CommandError;
use crate::domain::entities::{ArgValue, FlagKind, ParsedArgs};
use crate::plugins::CommandSpec;

/// Recognises command lines by their root keyword
pub struct MessageParser {
    root: String,
}

impl MessageParser {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// The command line after the root keyword, or `None` when `text` is not
    /// addressed to the bot. An empty root keyword accepts every message.
    pub fn strip_root<'t>(&self, text: &'t str) -> Option<&'t str> {
        let text = text.trim();
        if self.root.is_empty() {
            return Some(text);
        }

        let rest = text.strip_prefix(self.root.as_str())?;
        // "cheevobot" must not match a root keyword of "cheevo"
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.trim_start())
    }

    /// Split on whitespace; a double-quoted run stays one token
    pub fn tokenize(line: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut quoted = false;

        for c in line.chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    quoted = true;
                }
                c if c.is_whitespace() && !in_quotes => {
                    if !current.is_empty() || quoted {
                        tokens.push(std::mem::take(&mut current));
                    }
                    quoted = false;
                }
                c => current.push(c),
            }
        }
        if !current.is_empty() || quoted {
            tokens.push(current);
        }
        tokens
    }

    pub fn is_help(token: &str) -> bool {
        matches!(token, "help" | "--help" | "-h")
    }

    /// Parse the tokens after the command name against its parameters
    pub fn parse_args(spec: &CommandSpec, tokens: &[String]) -> Result<ParsedArgs, CommandError> {
        let usage = |message: String| CommandError::Usage {
            message,
            usage: spec.usage(),
        };

        let mut args = ParsedArgs::new();
        let mut positionals: Vec<&str> = Vec::new();
        let mut only_positionals = false;
        let mut iter = tokens.iter();

        while let Some(token) = iter.next() {
            if only_positionals || !looks_like_flag(token) {
                positionals.push(token);
                continue;
            }
            if token == "--" {
                only_positionals = true;
                continue;
            }

            let (name, inline) = match token.split_once('=') {
                Some((name, value)) if token.starts_with("--") => (name, Some(value)),
                _ => (token.as_str(), None),
            };

            let Some(flag) = spec.flags.iter().find(|f| f.matches(name)) else {
                if spec.strict {
                    return Err(usage(format!("Unknown argument: {}", name)));
                }
                tracing::debug!("Ignoring unknown argument {} for {}", name, spec.name);
                continue;
            };

            let value = match flag.kind {
                FlagKind::Boolean => match inline {
                    None | Some("true") => ArgValue::Bool(true),
                    Some("false") => ArgValue::Bool(false),
                    Some(other) => {
                        return Err(usage(format!("Invalid value for --{}: {}", flag.name, other)));
                    }
                },
                FlagKind::String => {
                    let raw = match inline {
                        Some(raw) => raw,
                        None => iter
                            .next()
                            .map(String::as_str)
                            .ok_or_else(|| usage(format!("Missing value for --{}", flag.name)))?,
                    };
                    flag.resolve(raw)
                        .map_err(|e| usage(format!("Invalid value for --{}: {}", flag.name, e)))?
                }
            };
            args.insert(flag.name.clone(), value);
        }

        let mut supplied = positionals.into_iter();
        for positional in &spec.positionals {
            let raw = match supplied.next() {
                Some(raw) => raw.to_string(),
                None => match &positional.default {
                    Some(default) => default.clone(),
                    None if positional.required => {
                        return Err(usage(format!("Missing required argument: {}", positional.name)));
                    }
                    None => continue,
                },
            };
            let value = positional
                .resolve(&raw)
                .map_err(|e| usage(format!("Invalid value for {}: {}", positional.name, e)))?;
            args.insert(positional.name.clone(), value);
        }

        if let Some(extra) = supplied.next() {
            if spec.strict {
                return Err(usage(format!("Unknown argument: {}", extra)));
            }
        }

        for flag in &spec.flags {
            if args.get(&flag.name).is_some() {
                continue;
            }
            match (flag.kind, &flag.default) {
                (FlagKind::Boolean, _) => args.insert(flag.name.clone(), ArgValue::Bool(false)),
                (FlagKind::String, Some(default)) => {
                    let value = flag
                        .resolve(default)
                        .map_err(|e| usage(format!("Invalid default for --{}: {}", flag.name, e)))?;
                    args.insert(flag.name.clone(), value);
                }
                (FlagKind::String, None) => {}
            }
        }

        Ok(args)
    }
}

/// `-x`/`--xyz`, but not a bare `-` or a negative number
fn looks_like_flag(token: &str) -> bool {
    match token.strip_prefix('-') {
        Some(rest) => !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Flag, Positional};
    use crate::plugins::CommandHandler;

    fn tokens(line: &str) -> Vec<String> {
        MessageParser::tokenize(line)
    }

    fn permission_spec() -> CommandSpec {
        CommandSpec::new("whitelist", "Whitelist a user or group", CommandHandler::sync(|_| Ok(None)))
            .with_positional(Positional::required("steam-id"))
            .with_flag(Flag::boolean("remove").with_short('r'))
    }

    #[test]
    fn test_strip_root() {
        let parser = MessageParser::new("cheevo");
        assert_eq!(parser.strip_root("cheevo dice 2d6"), Some("dice 2d6"));
        assert_eq!(parser.strip_root("  cheevo   uptime "), Some("uptime"));
        assert_eq!(parser.strip_root("cheevo"), Some(""));
        assert_eq!(parser.strip_root("cheevobot dice"), None);
        assert_eq!(parser.strip_root("hello cheevo"), None);
    }

    #[test]
    fn test_empty_root_accepts_everything() {
        let parser = MessageParser::new("");
        assert_eq!(parser.strip_root("dice"), Some("dice"));
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokens("  dice   3d6 "), vec!["dice", "3d6"]);
        assert_eq!(tokens(r#"say "hello there" now"#), vec!["say", "hello there", "now"]);
        assert_eq!(tokens(r#"say """#), vec!["say", ""]);
        assert!(tokens("   ").is_empty());
    }

    #[test]
    fn test_parse_required_positional() {
        let args = MessageParser::parse_args(&permission_spec(), &tokens("7656")).unwrap();
        assert_eq!(args.str("steam-id"), Some("7656"));
        assert!(!args.flag("remove"));
    }

    #[test]
    fn test_parse_short_and_long_flags() {
        for line in ["7656 -r", "-r 7656", "7656 --remove", "7656 --remove=true"] {
            let args = MessageParser::parse_args(&permission_spec(), &tokens(line)).unwrap();
            assert!(args.flag("remove"), "{}", line);
            assert_eq!(args.str("steam-id"), Some("7656"), "{}", line);
        }
    }

    #[test]
    fn test_missing_required_is_usage_error() {
        let err = MessageParser::parse_args(&permission_spec(), &[]).unwrap_err();
        match err {
            CommandError::Usage { message, usage } => {
                assert_eq!(message, "Missing required argument: steam-id");
                assert_eq!(usage, "whitelist <steam-id> [options]");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_flag_strict_and_lenient() {
        let err = MessageParser::parse_args(&permission_spec(), &tokens("7656 --force")).unwrap_err();
        assert!(err.to_string().contains("Unknown argument: --force"));

        let lenient = permission_spec().lenient();
        let args = MessageParser::parse_args(&lenient, &tokens("7656 --force extra")).unwrap();
        assert_eq!(args.str("steam-id"), Some("7656"));
    }

    #[test]
    fn test_surplus_positional_is_rejected() {
        let err = MessageParser::parse_args(&permission_spec(), &tokens("1 2")).unwrap_err();
        assert!(err.to_string().contains("Unknown argument: 2"));
    }

    #[test]
    fn test_defaults_and_coercions() {
        let spec = CommandSpec::new("roll", "Roll", CommandHandler::sync(|_| Ok(None)))
            .with_positional(
                Positional::optional("roll")
                    .with_default("1d6")
                    .with_coercion(|raw| Ok(ArgValue::Str(format!("<{}>", raw)))),
            )
            .with_flag(Flag::string("label").with_short('l').with_default("none"));

        let args = MessageParser::parse_args(&spec, &[]).unwrap();
        assert_eq!(args.str("roll"), Some("<1d6>"));
        assert_eq!(args.str("label"), Some("none"));

        let args = MessageParser::parse_args(&spec, &tokens("2d8 -l fun")).unwrap();
        assert_eq!(args.str("roll"), Some("<2d8>"));
        assert_eq!(args.str("label"), Some("fun"));

        let err = MessageParser::parse_args(&spec, &tokens("--label")).unwrap_err();
        assert!(err.to_string().contains("Missing value for --label"));
    }

    #[test]
    fn test_coercion_failure_is_usage_error() {
        let spec = CommandSpec::new("roll", "Roll", CommandHandler::sync(|_| Ok(None)))
            .with_positional(Positional::required("n").with_coercion(|_| Err("not a roll".to_string())));

        let err = MessageParser::parse_args(&spec, &tokens("x")).unwrap_err();
        assert!(matches!(err, CommandError::Usage { .. }));
        assert!(err.to_string().contains("Invalid value for n: not a roll"));
    }

    #[test]
    fn test_negative_numbers_are_positionals() {
        let spec = CommandSpec::new("echo", "Echo", CommandHandler::sync(|_| Ok(None)))
            .with_positional(Positional::required("n"));
        let args = MessageParser::parse_args(&spec, &tokens("-5")).unwrap();
        assert_eq!(args.str("n"), Some("-5"));
    }
}
