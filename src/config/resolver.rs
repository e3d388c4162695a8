//! Settings resolution from defaults, environment variables and arguments.
//!
//! Resolution runs four passes over a fresh instance, in this order:
//!
//! 1. every field with a declared default takes it;
//! 2. every field is bound to a command-line argument whose help shows the
//!    value from step 1;
//! 3. the prefixed environment variable, or failing that the unprefixed one,
//!    overrides the bound value;
//! 4. an argument given on the command line overrides everything else.
//!
//! Each pass may overwrite the previous one, so a field ends up with the
//! value of the highest [`Source`] that supplied one.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

use super::env::{Environment, ProcessEnv};
use super::error::{ConfigError, ValueError};
use super::redact;
use super::schema::FieldDescriptor;
use super::settings::{load, store, Settings};
use super::value::{parse_input, Value, ValueKind};

/// Argument id collecting everything after the first non-flag argument.
const TRAILING_ID: &str = "__trailing";

/// Where the final value of a field came from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// No default was declared and no source supplied a value.
    Neutral,
    /// The declared default.
    Default,
    /// The environment variable without prefix.
    EnvironmentUnprefixed,
    /// The environment variable with the configured prefix.
    EnvironmentPrefixed,
    /// An explicit command-line argument.
    CommandLine,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Neutral => write!(f, "neutral"),
            Source::Default => write!(f, "default"),
            Source::EnvironmentUnprefixed => write!(f, "environment"),
            Source::EnvironmentPrefixed => write!(f, "environment (prefixed)"),
            Source::CommandLine => write!(f, "command line"),
        }
    }
}

/// The outcome of one resolution.
#[derive(Debug, Clone)]
pub struct Resolution<S> {
    /// The resolved settings.
    pub settings: S,
    /// The source of every field, in declaration order.
    pub sources: Vec<(&'static str, Source)>,
    /// Arguments left after flag parsing stopped at the first non-flag
    /// argument or at `--`.
    pub trailing: Vec<String>,
}

impl<S> Resolution<S> {
    /// Source of the named field.
    pub fn source_of(&self, name: &str) -> Option<Source> {
        self.sources
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, source)| *source)
    }

    /// Discards everything but the settings.
    pub fn into_settings(self) -> S {
        self.settings
    }
}

/// One field's argument binding during a single resolution.
struct Binding<'a> {
    field: &'a FieldDescriptor,
    value: Value,
    source: Source,
}

/// Reads settings of type `S` from defaults, the environment and the
/// command line.
///
/// A reader holds no state between calls; every `read` builds a new
/// instance.
///
/// # Example
///
/// ```rust
/// use settings_reader::config::ConfigReader;
/// use std::collections::HashMap;
///
/// settings_reader::settings! {
///     #[derive(Debug)]
///     pub struct Config {
///         pub port: String as "Port" = "8080" => "The port to listen on",
///     }
/// }
///
/// let reader = ConfigReader::<Config>::new("demo").with_env_prefix("APP_");
/// let env = HashMap::from([("PORT".to_string(), "9090".to_string())]);
///
/// let config = reader.read(["--port=9999"], &env).unwrap();
/// assert_eq!(config.port, "9999");
///
/// let config = reader.read(Vec::<String>::new(), &env).unwrap();
/// assert_eq!(config.port, "9090");
/// ```
pub struct ConfigReader<S> {
    name: String,
    about: Option<String>,
    env_prefix: String,
    _settings: PhantomData<fn() -> S>,
}

impl<S> fmt::Debug for ConfigReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigReader")
            .field("name", &self.name)
            .field("about", &self.about)
            .field("env_prefix", &self.env_prefix)
            .finish()
    }
}

impl<S> Clone for ConfigReader<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            about: self.about.clone(),
            env_prefix: self.env_prefix.clone(),
            _settings: PhantomData,
        }
    }
}

impl<S: Settings> ConfigReader<S> {
    /// Creates a reader; `name` is the program name shown in help output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            env_prefix: String::new(),
            _settings: PhantomData,
        }
    }

    /// Sets the description shown at the top of help output.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Sets the environment variable prefix, e.g. `APP_`.
    ///
    /// Prefixed variables take precedence over unprefixed ones.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// The environment variable prefix.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Settings with only the declared defaults applied.
    pub fn default_value(&self) -> S {
        S::defaults()
    }

    /// Resolves settings from `args` (without the program name) and `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] when an environment
    /// variable does not parse, and [`ConfigError::CommandLine`] for unknown
    /// flags, malformed values, or a help request.
    pub fn read<I, T, E>(&self, args: I, env: &E) -> Result<S, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        E: Environment + ?Sized,
    {
        self.resolve(args, env).map(Resolution::into_settings)
    }

    /// Like [`read`](Self::read), also reporting sources and trailing
    /// arguments.
    pub fn resolve<I, T, E>(&self, args: I, env: &E) -> Result<Resolution<S>, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        E: Environment + ?Sized,
    {
        let schema = S::schema();
        debug!(
            settings = schema.type_name(),
            fields = schema.len(),
            prefix = %self.env_prefix,
            "resolving settings"
        );

        let mut settings = S::defaults();
        let mut bindings = bind(&settings);
        let command = self.build_command(&bindings);

        for binding in &mut bindings {
            self.apply_environment(binding, env)?;
        }

        let matches = command.try_get_matches_from(args)?;
        for binding in &mut bindings {
            let id = binding.field.name();
            if matches.value_source(id) != Some(ValueSource::CommandLine) {
                continue;
            }
            if let Some(value) = matches.get_one::<Value>(id) {
                debug!(field = id, arg = binding.field.arg_name(), "command line override");
                binding.value = value.clone();
                binding.source = Source::CommandLine;
            }
        }

        let trailing = matches
            .get_many::<String>(TRAILING_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        let mut sources = Vec::with_capacity(bindings.len());
        for binding in bindings {
            sources.push((binding.field.name(), binding.source));
            store(&mut settings, binding.field, binding.value);
        }

        Ok(Resolution {
            settings,
            sources,
            trailing,
        })
    }

    /// Resolves settings from the process arguments and environment.
    pub fn read_from_process(&self) -> Result<Resolution<S>, ConfigError> {
        self.resolve(std::env::args_os().skip(1), &ProcessEnv)
    }

    /// Resolves settings from the process, or prints the error (or the
    /// requested help) and exits.
    pub fn read_or_exit(&self) -> Resolution<S> {
        self.read_from_process().unwrap_or_else(|err| err.exit())
    }

    /// The command-line definition, with declared defaults in its help.
    pub fn command(&self) -> Command {
        let defaults = S::defaults();
        self.build_command(&bind(&defaults))
    }

    /// The environment variables consulted for each field, most preferred
    /// first.
    pub fn env_vars(&self) -> Vec<(&'static str, Vec<String>)> {
        S::schema()
            .fields()
            .iter()
            .map(|field| {
                let mut names = Vec::with_capacity(2);
                if !self.env_prefix.is_empty() {
                    names.push(field.prefixed_env_name(&self.env_prefix));
                }
                names.push(field.env_name().to_string());
                (field.name(), names)
            })
            .collect()
    }

    /// A copy of `settings` with secret fields cleared.
    pub fn without_secrets(&self, settings: &S) -> S {
        redact::without_secrets(settings)
    }

    fn build_command(&self, bindings: &[Binding<'_>]) -> Command {
        let mut command = Command::new(self.name.clone())
            .no_binary_name(true)
            .args_override_self(true);
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        for binding in bindings {
            command = command.arg(binding_arg(binding));
        }
        command.arg(
            Arg::new(TRAILING_ID)
                .value_name("ARGS")
                .num_args(1..)
                .trailing_var_arg(true)
                .hide(true)
                .value_parser(clap::value_parser!(String)),
        )
    }

    fn apply_environment<E>(&self, binding: &mut Binding<'_>, env: &E) -> Result<(), ConfigError>
    where
        E: Environment + ?Sized,
    {
        let field = binding.field;
        let Some((var, source, raw)) = self.lookup_environment(field, env) else {
            return Ok(());
        };

        let value = raw
            .into_string()
            .map_err(|_| ValueError::NotUnicode)
            .and_then(|raw| parse_input(field.kind(), &raw))
            .map_err(|err| ConfigError::InvalidEnvironment {
                var: var.clone(),
                field: field.name(),
                kind: field.kind(),
                source: (!field.is_secret()).then_some(err),
            })?;

        debug!(field = field.name(), var = %var, "environment override");
        binding.value = value;
        binding.source = source;
        Ok(())
    }

    /// Reads the prefixed variable, then the unprefixed one, each at most
    /// once.
    fn lookup_environment<E>(
        &self,
        field: &FieldDescriptor,
        env: &E,
    ) -> Option<(String, Source, OsString)>
    where
        E: Environment + ?Sized,
    {
        if !self.env_prefix.is_empty() {
            let var = field.prefixed_env_name(&self.env_prefix);
            if let Some(raw) = env.lookup_os(&var) {
                return Some((var, Source::EnvironmentPrefixed, raw));
            }
        }
        let var = field.env_name().to_string();
        env.lookup_os(&var)
            .map(|raw| (var, Source::EnvironmentUnprefixed, raw))
    }
}

fn bind<S: Settings>(settings: &S) -> Vec<Binding<'static>> {
    S::schema()
        .fields()
        .iter()
        .map(|field| Binding {
            field,
            value: load(settings, field),
            source: if field.default_value().is_some() {
                Source::Default
            } else {
                Source::Neutral
            },
        })
        .collect()
}

fn binding_arg(binding: &Binding<'_>) -> Arg {
    let field = binding.field;
    let kind = field.kind();

    let mut arg = Arg::new(field.name())
        .long(field.arg_name().to_string())
        .help(field.description())
        .value_name(kind.value_name())
        .action(ArgAction::Set)
        .value_parser(move |input: &str| parse_input(kind, input));

    // A non-boolean flag always takes the next argument as its value, even
    // when it starts with `-`.
    arg = match kind {
        ValueKind::Bool => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true"),
        _ => arg.allow_hyphen_values(true),
    };

    let shown = binding.value.to_string();
    if !field.is_secret() && !shown.is_empty() {
        arg = arg.default_value(shown);
    }
    arg
}
