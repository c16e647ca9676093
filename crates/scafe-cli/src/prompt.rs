//! Interactive questions and their non-interactive equivalents.
//!
//! Every question has a flag. A [`Questionnaire`] only asks about what the
//! flags left open; with `--yes` it asks nothing and falls back to the
//! configured defaults.

use tracing::{debug, warn};

use scafe_adapters::catalog;
use scafe_core::domain::{DatabaseKind, ManifestInfo, PackageName, ProjectOptions, ServiceName};

use crate::{
    config::Defaults,
    error::{CliError, CliResult},
};

/// Default number of services asked for when nothing is configured.
pub const DEFAULT_SERVICE_COUNT: usize = 1;

const DEFAULT_DESCRIPTION: &str = "A microservice project";

/// Source of answers.
pub trait Prompter {
    /// Free-text answer; an empty answer yields `default` when there is one.
    fn ask(&mut self, question: &str, default: Option<&str>) -> CliResult<String>;

    /// Index into `items`.
    fn choose(&mut self, question: &str, items: &[&str], default: usize) -> CliResult<usize>;

    /// Any number of indices into `items`, possibly none.
    fn pick(&mut self, question: &str, items: &[&str]) -> CliResult<Vec<usize>>;
}

/// Terminal prompts backed by `dialoguer`.
#[cfg(feature = "interactive")]
pub struct TerminalPrompter {
    theme: dialoguer::theme::ColorfulTheme,
}

#[cfg(feature = "interactive")]
impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: dialoguer::theme::ColorfulTheme::default(),
        }
    }
}

#[cfg(feature = "interactive")]
impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str, default: Option<&str>) -> CliResult<String> {
        let mut input = dialoguer::Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn choose(&mut self, question: &str, items: &[&str], default: usize) -> CliResult<usize> {
        Ok(dialoguer::FuzzySelect::with_theme(&self.theme)
            .with_prompt(question)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn pick(&mut self, question: &str, items: &[&str]) -> CliResult<Vec<usize>> {
        Ok(dialoguer::MultiSelect::with_theme(&self.theme)
            .with_prompt(question)
            .items(items)
            .interact()?)
    }
}

/// Stand-in when the binary was built without prompts.
#[cfg(any(test, not(feature = "interactive")))]
pub struct Unavailable;

#[cfg(any(test, not(feature = "interactive")))]
impl Prompter for Unavailable {
    fn ask(&mut self, _question: &str, _default: Option<&str>) -> CliResult<String> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }

    fn choose(&mut self, _question: &str, _items: &[&str], _default: usize) -> CliResult<usize> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }

    fn pick(&mut self, _question: &str, _items: &[&str]) -> CliResult<Vec<usize>> {
        Err(CliError::FeatureNotAvailable {
            feature: "interactive",
        })
    }
}

/// The prompter for this build.
pub fn terminal() -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    {
        Box::new(TerminalPrompter::new())
    }
    #[cfg(not(feature = "interactive"))]
    {
        Box::new(Unavailable)
    }
}

/// Answers already given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Answers {
    pub services: Vec<String>,
    pub database: Option<DatabaseKind>,
    pub multi_db: Option<bool>,
    pub redis: Option<bool>,
    pub mail: Option<bool>,
    pub packages: Vec<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub author: Option<String>,
    pub repository: Option<String>,
}

pub struct Questionnaire<'a> {
    defaults: &'a Defaults,
    prompter: Option<&'a mut dyn Prompter>,
}

impl<'a> Questionnaire<'a> {
    /// Ask through `prompter` for anything `answers` leaves open.
    pub fn interactive(defaults: &'a Defaults, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            defaults,
            prompter: Some(prompter),
        }
    }

    /// Never ask; use the configured defaults.
    pub fn unattended(defaults: &'a Defaults) -> Self {
        Self {
            defaults,
            prompter: None,
        }
    }

    pub fn resolve(mut self, name: PackageName, answers: Answers) -> CliResult<ProjectOptions> {
        let services = self.services(answers.services)?;

        let database = match answers.database {
            Some(db) => db,
            None => self.database()?,
        };
        let multi_db = self.yes_no(
            answers.multi_db,
            "Use multiple databases?",
            self.defaults.multi_db,
        )?;
        let redis = self.yes_no(answers.redis, "Use Redis?", self.defaults.redis)?;
        let mail = self.yes_no(
            answers.mail,
            "Queue outgoing mail (BullMQ)?",
            self.defaults.mail,
        )?;

        let packages = self.packages(answers.packages)?;

        let manifest = ManifestInfo {
            description: self.text(
                answers.description,
                "Description",
                Some(DEFAULT_DESCRIPTION),
            )?,
            keywords: ManifestInfo::parse_keywords(&self.text(
                answers.keywords,
                "Keywords (comma separated)",
                None,
            )?),
            author: self.text(answers.author, "Author", None)?,
            repository: self.text(answers.repository, "Repository", None)?,
        };

        let mut builder = ProjectOptions::builder(name)
            .services(services)
            .database(database)
            .multi_db(multi_db)
            .redis(redis)
            .mail(mail)
            .manifest(manifest);
        for raw in packages {
            builder = builder.extra_package(PackageName::new(raw)?);
        }
        let options = builder.build()?;
        debug!(
            services = options.services().len(),
            database = %options.database(),
            "answers resolved"
        );
        Ok(options)
    }

    fn services(&mut self, given: Vec<String>) -> CliResult<Vec<ServiceName>> {
        let names = if !given.is_empty() {
            given
        } else if let Some(prompter) = self.prompter.as_deref_mut() {
            let configured = &self.defaults.services;
            let default_count = if configured.is_empty() {
                DEFAULT_SERVICE_COUNT
            } else {
                configured.len()
            };
            let raw = prompter.ask(
                "How many services (besides the gateway)?",
                Some(&default_count.to_string()),
            )?;
            let count = parse_count(&raw, default_count);

            let mut names = Vec::new();
            for i in 0..count {
                let default = configured.get(i).map(String::as_str);
                names.push(prompter.ask(&format!("Name for service #{}", i + 1), default)?);
            }
            names
        } else {
            self.defaults.services.clone()
        };

        names
            .into_iter()
            .map(|raw| ServiceName::new(raw.trim()).map_err(CliError::from))
            .collect()
    }

    fn database(&mut self) -> CliResult<DatabaseKind> {
        let default = self.defaults.database;
        let Some(prompter) = self.prompter.as_deref_mut() else {
            return Ok(default);
        };
        let items: Vec<&str> = DatabaseKind::ALL.iter().map(DatabaseKind::as_str).collect();
        let default_index = DatabaseKind::ALL
            .iter()
            .position(|db| *db == default)
            .unwrap_or(0);
        let index = prompter.choose("Database", &items, default_index)?;
        Ok(DatabaseKind::ALL.get(index).copied().unwrap_or(default))
    }

    /// Extra packages; interactive runs offer the opt-in part of the catalog.
    fn packages(&mut self, given: Vec<String>) -> CliResult<Vec<String>> {
        if !given.is_empty() {
            return Ok(given);
        }
        let Some(prompter) = self.prompter.as_deref_mut() else {
            return Ok(Vec::new());
        };
        let offered: Vec<&str> = catalog::optional().map(|entry| entry.name).collect();
        let picked = prompter.pick("Extra packages", &offered)?;
        Ok(picked
            .into_iter()
            .filter_map(|i| offered.get(i).map(|name| name.to_string()))
            .collect())
    }

    fn yes_no(&mut self, given: Option<bool>, question: &str, default: bool) -> CliResult<bool> {
        if let Some(value) = given {
            return Ok(value);
        }
        match self.prompter.as_deref_mut() {
            Some(prompter) => {
                let hint = if default { "y" } else { "n" };
                let raw = prompter.ask(&format!("{question} (y/n)"), Some(hint))?;
                Ok(parse_yes_no(&raw, default))
            }
            None => Ok(default),
        }
    }

    fn text(
        &mut self,
        given: Option<String>,
        question: &str,
        default: Option<&str>,
    ) -> CliResult<String> {
        if let Some(value) = given {
            return Ok(value.trim().to_string());
        }
        match self.prompter.as_deref_mut() {
            Some(prompter) => Ok(prompter.ask(question, default)?.trim().to_string()),
            None => Ok(default.unwrap_or_default().to_string()),
        }
    }
}

/// Parse a service count; anything that is not a non-negative integer
/// becomes `default`.
pub fn parse_count(raw: &str, default: usize) -> usize {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default;
    }
    trimmed.parse().unwrap_or_else(|_| {
        warn!(answer = trimmed, default, "not a number, using the default service count");
        default
    })
}

/// Parse a y/n answer; anything unrecognised becomes `default`.
pub fn parse_yes_no(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => true,
        "n" | "no" | "false" => false,
        "" => default,
        other => {
            warn!(answer = other, default, "unrecognised answer, using the default");
            default
        }
    }
}

/// Replays canned answers and records the questions.
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, question: &str) -> CliResult<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front().ok_or_else(|| CliError::Prompt {
            message: format!("no scripted answer for '{question}'"),
            source: None,
        })
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, default: Option<&str>) -> CliResult<String> {
        let answer = self.next(question)?;
        match default {
            Some(default) if answer.trim().is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn choose(&mut self, question: &str, items: &[&str], default: usize) -> CliResult<usize> {
        // Typed database names map onto the list; anything else keeps the default.
        let answer = self.next(question)?;
        Ok(answer
            .parse::<DatabaseKind>()
            .ok()
            .and_then(|db| items.iter().position(|item| *item == db.as_str()))
            .unwrap_or(default))
    }

    fn pick(&mut self, question: &str, items: &[&str]) -> CliResult<Vec<usize>> {
        let answer = self.next(question)?;
        Ok(answer
            .split(',')
            .filter_map(|name| items.iter().position(|item| *item == name.trim()))
            .collect())
    }
}
