//! Commands, their forms and the registry that dispatches to them
//!
//! A [`Command`] is a name plus an ordered list of [`CommandForm`]s. Every form
//! whose signature fits the input runs independently, so one invocation can
//! produce several [`Response`]s. When nothing fits the caller gets the first
//! usage page instead.

use crate::core::completion::{self, CompletionProvider, DefaultCompleter};
use crate::core::markup::{FormatterRegistry, StyledSegment};
use crate::core::parameter::ArgValue;
use crate::core::signature::{MatchFailure, MatchOutcome, Signature};
use crate::core::tokenizer::Tokenizer;
use crate::core::validator::{ValidResult, ValidationFailure, ValidatorChain};
use crate::error::{CommandError, FormatError, Result};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

type Permission<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;
type Action<C> = Arc<dyn Fn(&C, &[ArgValue]) -> ValidResult<Option<String>> + Send + Sync>;

/// Usage entries shown per page unless configured otherwise
pub const DEFAULT_ENTRIES_PER_PAGE: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => unreachable!(),
};

/// One way of invoking a command: a signature plus what to do when it matches
pub struct CommandForm<C> {
    description: String,
    signature: Signature,
    permission: Option<Permission<C>>,
    completer: Arc<dyn CompletionProvider<C>>,
    stylize: bool,
    action: Action<C>,
}

impl<C: 'static> CommandForm<C> {
    /// A form that matches `signature` and does nothing until given an executor
    pub fn new(description: impl Into<String>, signature: Signature) -> Self {
        Self {
            description: description.into(),
            signature,
            permission: None,
            completer: Arc::new(DefaultCompleter),
            stylize: false,
            action: Arc::new(|_: &C, _: &[ArgValue]| -> ValidResult<Option<String>> { Ok(None) }),
        }
    }

    /// Only contexts satisfying `predicate` may use this form
    pub fn permission<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.permission = Some(Arc::new(predicate));
        self
    }

    /// Replace the default completer
    pub fn completer<P>(mut self, provider: P) -> Self
    where
        P: CompletionProvider<C> + 'static,
    {
        self.completer = Arc::new(provider);
        self
    }

    /// Parse executor output as markup
    pub fn stylize(mut self, stylize: bool) -> Self {
        self.stylize = stylize;
        self
    }

    /// Run `executor` with the validator's payload once `validator` passes
    pub fn executes<T, E>(mut self, validator: ValidatorChain<C, T>, executor: E) -> Self
    where
        T: 'static,
        E: Fn(&C, &[ArgValue], T) -> Option<String> + Send + Sync + 'static,
    {
        self.action = Arc::new(move |context: &C, args: &[ArgValue]| -> ValidResult<Option<String>> {
            let payload = validator.validate(context, args)?;
            Ok(executor(context, args, payload))
        });
        self
    }

    /// Run `executor` without any validation
    pub fn executes_unchecked<E>(mut self, executor: E) -> Self
    where
        E: Fn(&C, &[ArgValue]) -> Option<String> + Send + Sync + 'static,
    {
        self.action = Arc::new(move |context: &C, args: &[ArgValue]| -> ValidResult<Option<String>> {
            Ok(executor(context, args))
        });
        self
    }
}

impl<C> CommandForm<C> {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn stylizes(&self) -> bool {
        self.stylize
    }

    /// Whether `context` may use this form
    pub fn permits(&self, context: &C) -> bool {
        self.permission.as_ref().is_none_or(|allowed| allowed(context))
    }

    fn run(&self, context: &C, args: &[ArgValue]) -> ValidResult<Option<String>> {
        (self.action)(context, args)
    }
}

impl<C> fmt::Debug for CommandForm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandForm")
            .field("description", &self.description)
            .field("usage", &self.signature.usage())
            .field("restricted", &self.permission.is_some())
            .field("stylize", &self.stylize)
            .finish_non_exhaustive()
    }
}

/// How one form related to the input
pub enum FormMatch<'a, C> {
    /// The context lacks permission; matching was skipped
    Denied { form: &'a CommandForm<C> },
    /// The signature fit: converted values or a conversion failure
    Fit {
        form: &'a CommandForm<C>,
        outcome: MatchOutcome,
    },
}

/// What one matching form produced
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The context may not use the form
    Denied,
    /// A token fit its slot but could not be converted
    ConversionFailed(MatchFailure),
    /// Validation rejected the converted arguments
    Invalid(ValidationFailure),
    /// Executor output; empty when it had nothing to say
    Output(Vec<StyledSegment>),
}

/// Result of dispatching input to a command
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// No form fit; the first usage page
    Usage(String),
    /// One response per fitting form, in form order
    Responses(Vec<Response>),
}

/// A named command and its forms
pub struct Command<C> {
    name: String,
    forms: Vec<CommandForm<C>>,
    entries_per_page: NonZeroUsize,
}

impl<C> Command<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forms: Vec::new(),
            entries_per_page: DEFAULT_ENTRIES_PER_PAGE,
        }
    }

    /// Add a form; forms are tried in insertion order
    pub fn form(mut self, form: CommandForm<C>) -> Self {
        self.add_form(form);
        self
    }

    pub fn add_form(&mut self, form: CommandForm<C>) {
        self.forms.push(form);
    }

    pub fn with_entries_per_page(mut self, entries_per_page: NonZeroUsize) -> Self {
        self.entries_per_page = entries_per_page;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn forms(&self) -> &[CommandForm<C>] {
        &self.forms
    }

    /// Paginated usage listing, one entry per form
    pub fn usage(&self) -> UsagePages {
        let entries = self
            .forms
            .iter()
            .map(|form| usage_line(&self.name, form))
            .collect();
        UsagePages::new(self.name.clone(), entries, self.entries_per_page)
    }

    /// Match every form against `tokens`, skipping forms that do not fit
    ///
    /// Permission is checked first, so a denied form is reported even if its
    /// signature would not have matched.
    pub fn matches<S: AsRef<str>>(&self, context: &C, tokens: &[S]) -> Vec<FormMatch<'_, C>> {
        self.forms
            .iter()
            .filter_map(|form| {
                if !form.permits(context) {
                    return Some(FormMatch::Denied { form });
                }

                match form.signature.matches(tokens) {
                    MatchOutcome::NoMatch => None,
                    outcome => Some(FormMatch::Fit { form, outcome }),
                }
            })
            .collect()
    }

    /// Match, validate and execute every fitting form
    pub fn dispatch<S: AsRef<str>>(
        &self,
        context: &C,
        formatters: &FormatterRegistry,
        tokens: &[S],
    ) -> std::result::Result<Dispatch, FormatError> {
        let matches = self.matches(context, tokens);
        if matches.is_empty() {
            debug!("No form of '{}' fits the input", self.name);
            return Ok(Dispatch::Usage(self.usage().first()));
        }

        let mut responses = Vec::with_capacity(matches.len());
        for found in matches {
            let response = match found {
                FormMatch::Denied { .. } => Response::Denied,
                FormMatch::Fit { outcome: MatchOutcome::Failed(failure), .. } => {
                    Response::ConversionFailed(failure)
                }
                FormMatch::Fit { form, outcome: MatchOutcome::Matched(values) } => {
                    match form.run(context, &values) {
                        Err(failure) => Response::Invalid(failure),
                        Ok(None) => Response::Output(Vec::new()),
                        Ok(Some(text)) if form.stylizes() => Response::Output(formatters.parse(&text)?),
                        Ok(Some(text)) => Response::Output(vec![StyledSegment::plain(text)]),
                    }
                }
                FormMatch::Fit { outcome: MatchOutcome::NoMatch, .. } => continue,
            };
            responses.push(response);
        }

        Ok(Dispatch::Responses(responses))
    }

    /// Completions from every form the context may use
    pub fn complete(&self, context: &C, tokens: &[String]) -> Vec<String> {
        let candidates = self
            .forms
            .iter()
            .filter(|form| form.permits(context))
            .map(|form| (&form.signature, form.completer.as_ref()));
        completion::complete(context, candidates, tokens)
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("forms", &self.forms)
            .finish()
    }
}

fn usage_line<C>(name: &str, form: &CommandForm<C>) -> String {
    let mut line = format!("/{name}");

    let slots = form.signature.usage();
    if !slots.is_empty() {
        line.push(' ');
        line.push_str(&slots);
    }

    if !form.description.is_empty() {
        line.push_str(" — ");
        line.push_str(&form.description);
    }

    line
}

/// Usage lines for a command split into fixed-size pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsagePages {
    name: String,
    entries: Vec<String>,
    entries_per_page: NonZeroUsize,
}

impl UsagePages {
    pub fn new(name: impl Into<String>, entries: Vec<String>, entries_per_page: NonZeroUsize) -> Self {
        Self {
            name: name.into(),
            entries,
            entries_per_page,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of pages; a command without forms still has one empty page
    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(self.entries_per_page.get()).max(1)
    }

    /// Render page `index` (zero-based)
    pub fn page(&self, index: usize) -> Option<String> {
        let count = self.page_count();
        if index >= count {
            return None;
        }

        let mut page = format!("Usage for /{} ({}/{}):", self.name, index + 1, count);
        for entry in self
            .entries
            .iter()
            .skip(index * self.entries_per_page.get())
            .take(self.entries_per_page.get())
        {
            page.push('\n');
            page.push_str(entry);
        }

        Some(page)
    }

    /// The first page, which always exists
    pub fn first(&self) -> String {
        self.page(0)
            .unwrap_or_else(|| format!("Usage for /{} (1/1):", self.name))
    }
}

/// Name-to-command map plus the formatters used for stylized output
pub struct CommandRegistry<C> {
    commands: HashMap<String, Command<C>>,
    formatters: FormatterRegistry,
    entries_per_page: NonZeroUsize,
}

impl<C: 'static> CommandRegistry<C> {
    pub fn new(formatters: FormatterRegistry) -> Self {
        Self {
            commands: HashMap::new(),
            formatters,
            entries_per_page: DEFAULT_ENTRIES_PER_PAGE,
        }
    }

    /// Page size applied to commands created by [`Self::register_form`]
    pub fn with_entries_per_page(mut self, entries_per_page: NonZeroUsize) -> Self {
        self.entries_per_page = entries_per_page;
        self
    }

    /// Register a fully built command
    pub fn register(&mut self, command: Command<C>) -> Result<()> {
        if self.commands.contains_key(command.name()) {
            return Err(CommandError::duplicate_command(command.name()));
        }

        info!("Registered command '{}' with {} form(s)", command.name(), command.forms().len());
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    /// Add a form to `name`, creating the command if needed
    pub fn register_form(&mut self, name: &str, form: CommandForm<C>) {
        let entries_per_page = self.entries_per_page;
        self.commands
            .entry(name.to_string())
            .or_insert_with(|| Command::new(name).with_entries_per_page(entries_per_page))
            .add_form(form);
        debug!("Form added to '{}'", name);
    }

    pub fn get(&self, name: &str) -> Option<&Command<C>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn formatters(&self) -> &FormatterRegistry {
        &self.formatters
    }

    fn lookup(&self, name: &str) -> Result<&Command<C>> {
        self.commands.get(name).ok_or_else(|| {
            warn!("Attempted to use unregistered command '{}'", name);
            CommandError::unknown_command(name)
        })
    }

    /// Tokenize raw host arguments and dispatch them to `name`
    #[instrument(skip(self, context, raw))]
    pub fn execute<S: AsRef<str>>(&self, name: &str, context: &C, raw: &[S]) -> Result<Dispatch> {
        let command = self.lookup(name)?;
        let tokens = Tokenizer::new().tokenize(raw);
        Ok(command.dispatch(context, &self.formatters, &tokens)?)
    }

    /// Tokenize raw host arguments and complete them against `name`
    #[instrument(skip(self, context, raw))]
    pub fn complete<S: AsRef<str>>(&self, name: &str, context: &C, raw: &[S]) -> Result<Vec<String>> {
        let command = self.lookup(name)?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let tokens = Tokenizer::new().tokenize(raw);
        Ok(command.complete(context, &tokens))
    }
}

impl<C> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parameter::ParameterSlot;
    use crate::utils::{converters, styles, validators};

    struct Sender {
        name: &'static str,
        op: bool,
    }

    const OP: Sender = Sender { name: "alice", op: true };
    const GUEST: Sender = Sender { name: "bob", op: false };

    fn give_form() -> CommandForm<Sender> {
        let signature = Signature::new(vec![
            ParameterSlot::literal("give").unwrap(),
            ParameterSlot::fixed(r"\w+", "[player]")
                .unwrap()
                .with_completions(["steve", "alex"]),
            ParameterSlot::fixed(r"\d+", "[amount]")
                .unwrap()
                .with_converter(converters::int),
        ])
        .unwrap();

        CommandForm::new("Give items to a player", signature)
            .permission(|sender: &Sender| sender.op)
            .stylize(true)
            .executes(validators::range(1.0, 64.0, vec![2]).unwrap(), |sender, args, ()| {
                Some(format!("{} gave >gold{{{}}} to {}", sender.name, args[2], args[1]))
            })
    }

    fn list_form() -> CommandForm<Sender> {
        let signature = Signature::new(vec![ParameterSlot::literal("list").unwrap()]).unwrap();
        CommandForm::new("List players", signature).executes_unchecked(|_, _| Some("steve, alex".to_string()))
    }

    fn registry() -> CommandRegistry<Sender> {
        let mut registry = CommandRegistry::new(styles::builtin());
        registry.register_form("item", give_form());
        registry.register_form("item", list_form());
        registry
    }

    fn texts(dispatch: Dispatch) -> Vec<String> {
        match dispatch {
            Dispatch::Responses(responses) => responses
                .into_iter()
                .flat_map(|response| match response {
                    Response::Output(segments) => segments.into_iter().map(|s| s.text).collect(),
                    other => vec![format!("{other:?}")],
                })
                .collect(),
            Dispatch::Usage(usage) => vec![usage],
        }
    }

    #[test]
    fn test_execute_stylized_output() {
        let result = registry().execute("item", &OP, &["give", "steve", "32"]).unwrap();
        let Dispatch::Responses(responses) = result else {
            panic!("expected responses");
        };
        let Response::Output(segments) = &responses[0] else {
            panic!("expected output");
        };
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].text, "32");
        assert_eq!(segments[1].formatters, vec!["gold"]);
    }

    #[test]
    fn test_plain_output() {
        let result = registry().execute("item", &GUEST, &["list"]).unwrap();
        assert_eq!(
            result,
            Dispatch::Responses(vec![Response::Denied, Response::Output(vec![StyledSegment::plain("steve, alex")])])
        );
    }

    #[test]
    fn test_validation_failure() {
        let result = registry().execute("item", &OP, &["give", "steve", "100"]).unwrap();
        assert_eq!(
            result,
            Dispatch::Responses(vec![Response::Invalid(ValidationFailure::new(
                "The provided value '100' at index '2' is not within required range '[1..64]'"
            ))])
        );
    }

    #[test]
    fn test_conversion_failure() {
        let result = registry()
            .execute("item", &OP, &["give", "steve", "99999999999"])
            .unwrap();
        let Dispatch::Responses(responses) = result else {
            panic!("expected responses");
        };
        let Response::ConversionFailed(failure) = &responses[0] else {
            panic!("expected conversion failure");
        };
        assert_eq!(failure.slot, 2);
        assert!(failure.message.contains("an Integer"));
    }

    #[test]
    fn test_no_match_shows_usage() {
        let result = registry().execute("item", &OP, &["take", "steve"]).unwrap();
        assert_eq!(
            result,
            Dispatch::Usage(
                "Usage for /item (1/1):\n\
                 /item [give] [player] [amount] — Give items to a player\n\
                 /item [list] — List players"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_quoted_arguments_are_joined() {
        let mut registry = CommandRegistry::new(FormatterRegistry::default());
        let signature = Signature::new(vec![ParameterSlot::fixed(".+", "[message]").unwrap()]).unwrap();
        registry
            .register(
                Command::new("say").form(
                    CommandForm::new("", signature)
                        .executes_unchecked(|_: &Sender, args| Some(args[0].to_string())),
                ),
            )
            .unwrap();

        let result = registry.execute("say", &GUEST, &["\"hello", "there\""]).unwrap();
        assert_eq!(texts(result), vec!["hello there"]);
    }

    #[test]
    fn test_malformed_markup_propagates() {
        let mut registry = CommandRegistry::new(styles::builtin());
        let signature = Signature::empty();
        registry.register_form(
            "broken",
            CommandForm::new("", signature)
                .stylize(true)
                .executes_unchecked(|_: &Sender, _| Some(">nope{x}".to_string())),
        );

        let err = registry.execute::<&str>("broken", &OP, &[]).unwrap_err();
        assert!(matches!(err, CommandError::Format(_)));
    }

    #[test]
    fn test_duplicate_and_unknown_commands() {
        let mut registry = registry();
        let err = registry.register(Command::new("item")).unwrap_err();
        assert!(matches!(err, CommandError::DuplicateCommand { .. }));

        let err = registry.execute("missing", &OP, &["x"]).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand { .. }));
        assert!(registry.complete("missing", &OP, &["x"]).is_err());
        assert_eq!(registry.names(), vec!["item"]);
    }

    #[test]
    fn test_matches_reports_denied_forms() {
        let registry = registry();
        let command = registry.get("item").unwrap();
        let found = command.matches(&GUEST, &["give", "steve", "1"]);
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0], FormMatch::Denied { .. }));

        let found = command.matches(&OP, &["give", "steve", "1"]);
        assert_eq!(found.len(), 1);
        assert!(matches!(
            &found[0],
            FormMatch::Fit { outcome: MatchOutcome::Matched(_), .. }
        ));
    }

    #[test]
    fn test_completion_respects_permissions() {
        let registry = registry();
        assert_eq!(registry.complete("item", &OP, &["give", "st"]).unwrap(), vec!["steve"]);
        assert!(registry.complete("item", &GUEST, &["give", "st"]).unwrap().is_empty());
        assert_eq!(registry.complete("item", &GUEST, &["list"]).unwrap(), vec!["list"]);
        assert!(registry.complete::<&str>("item", &OP, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_usage_pagination() {
        let entries: Vec<String> = (1..=5).map(|i| format!("/cmd [{i}]")).collect();
        let pages = UsagePages::new("cmd", entries, NonZeroUsize::new(2).unwrap());

        assert_eq!(pages.page_count(), 3);
        assert_eq!(pages.page(0).unwrap(), "Usage for /cmd (1/3):\n/cmd [1]\n/cmd [2]");
        assert_eq!(pages.page(2).unwrap(), "Usage for /cmd (3/3):\n/cmd [5]");
        assert!(pages.page(3).is_none());
    }

    #[test]
    fn test_empty_usage_has_one_page() {
        let command: Command<()> = Command::new("empty");
        let pages = command.usage();
        assert_eq!(pages.page_count(), 1);
        assert_eq!(pages.first(), "Usage for /empty (1/1):");
    }
}
