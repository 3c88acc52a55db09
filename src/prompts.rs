//! Prompt and banner templates rendered with `minijinja`.
//!
//! Templates are compiled once into a [`PromptTemplates`] value and rendered
//! with strict undefined handling, so a missing variable is an error rather
//! than an empty string.
//!
//! The diff budget is computed in two steps: first the length of
//! the code prompt rendered with empty code is subtracted from the maximum,
//! then the diff is cut to that many characters. The wrapped prompt is not
//! measured again afterwards.

use minijinja::{AutoEscape, Environment, UndefinedBehavior, context};

use crate::github::IntakeError;

/// Default character budget for a wrapped diff prompt.
pub const DEFAULT_MAX_PROMPT_LENGTH: usize = 4096;

const SYSTEM_TEMPLATE: &str = "\
You are a senior software engineer reviewing a GitHub pull request. \
The user will share the pull request description and title and, when asked, \
its diff. Point out bugs, risky changes, missing tests and unclear code. \
Refer to files and lines from the diff, keep answers concise, \
and format them in Markdown.";

const CODE_TEMPLATE: &str = "\
Review the following pull request diff. List the problems you find, most severe first, \
and suggest a concrete fix for each.

```diff
{{ code }}
```";

const HELP_TEMPLATE: &str = "\
Enter `r` to review the code, `q` to quit and `n` to review a different pull request.";

const OPTIONS_TEMPLATE: &str = "\
You have chosen to review **{{ repository }}** pull request **{{ change_set }}**. \
Enter `r` to review the code, `q` to quit, `h` for help and `n` to review a different pull request.";

/// Compiled prompt templates.
#[derive(Debug)]
pub struct PromptTemplates {
    env: Environment<'static>,
}

impl PromptTemplates {
    /// Compiles the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if a template fails to parse.
    pub fn new() -> Result<Self, IntakeError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for (name, source) in [
            ("system", SYSTEM_TEMPLATE),
            ("code", CODE_TEMPLATE),
            ("help", HELP_TEMPLATE),
            ("options", OPTIONS_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|error| IntakeError::Configuration {
                    message: format!("invalid {name} template: {error}"),
                })?;
        }

        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, IntakeError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|error| IntakeError::Configuration {
                message: format!("failed to retrieve {name} template: {error}"),
            })?;

        template
            .render(ctx)
            .map_err(|error| IntakeError::Configuration {
                message: format!("{name} template rendering failed: {error}"),
            })
    }

    /// Fixed instruction opening every transcript.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if rendering fails.
    pub fn system_prompt(&self) -> Result<String, IntakeError> {
        self.render("system", context! {})
    }

    /// Wraps diff text in the review instruction.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if rendering fails.
    pub fn code_prompt(&self, code: &str) -> Result<String, IntakeError> {
        self.render("code", context! { code => code })
    }

    /// Help text listing the session commands.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if rendering fails.
    pub fn help_text(&self) -> Result<String, IntakeError> {
        self.render("help", context! {})
    }

    /// Banner confirming the selected pull request.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if rendering fails.
    pub fn options_banner(
        &self,
        repository: &str,
        change_set: &str,
    ) -> Result<String, IntakeError> {
        self.render(
            "options",
            context! { repository => repository, change_set => change_set },
        )
    }

    /// Characters left for diff text once the empty-code prompt is counted.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if rendering fails.
    pub fn code_budget(&self, max_length: usize) -> Result<usize, IntakeError> {
        let fixed = self.code_prompt("")?.chars().count();
        Ok(max_length.saturating_sub(fixed))
    }

    /// Truncates `diff` to the code budget and wraps it in the code prompt.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if rendering fails.
    pub fn review_prompt(&self, diff: &str, max_length: usize) -> Result<String, IntakeError> {
        let budget = self.code_budget(max_length)?;
        self.code_prompt(truncate_chars(diff, budget))
    }
}

/// Returns the first `limit` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    text.char_indices()
        .nth(limit)
        .and_then(|(index, _)| text.get(..index))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{DEFAULT_MAX_PROMPT_LENGTH, PromptTemplates, truncate_chars};

    #[fixture]
    fn templates() -> PromptTemplates {
        PromptTemplates::new().expect("built-in templates should compile")
    }

    #[rstest]
    #[case::shorter("abc", 5, "abc")]
    #[case::exact("abc", 3, "abc")]
    #[case::cut("abcdef", 4, "abcd")]
    #[case::zero("abc", 0, "")]
    #[case::multibyte("héllo wörld", 7, "héllo w")]
    #[case::emoji("🤖🤖🤖", 2, "🤖🤖")]
    fn truncate_chars_counts_characters(
        #[case] text: &str,
        #[case] limit: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(truncate_chars(text, limit), expected);
    }

    #[rstest]
    fn code_prompt_embeds_code_in_diff_fence(templates: PromptTemplates) {
        let prompt = templates
            .code_prompt("+fn main() {}")
            .expect("prompt should render");

        assert!(prompt.contains("```diff\n+fn main() {}\n```"), "got: {prompt}");
    }

    #[rstest]
    fn code_prompt_does_not_escape_markup(templates: PromptTemplates) {
        let prompt = templates
            .code_prompt("if a < b && c > d")
            .expect("prompt should render");

        assert!(prompt.contains("if a < b && c > d"), "got: {prompt}");
    }

    #[rstest]
    fn code_budget_subtracts_empty_prompt_length(templates: PromptTemplates) {
        let fixed = templates
            .code_prompt("")
            .expect("prompt should render")
            .chars()
            .count();

        assert_eq!(
            templates.code_budget(DEFAULT_MAX_PROMPT_LENGTH).ok(),
            Some(DEFAULT_MAX_PROMPT_LENGTH - fixed)
        );
        assert_eq!(templates.code_budget(3).ok(), Some(0));
    }

    #[rstest]
    fn review_prompt_stays_within_maximum(templates: PromptTemplates) {
        let diff = "+x\n".repeat(5_000);

        let prompt = templates
            .review_prompt(&diff, DEFAULT_MAX_PROMPT_LENGTH)
            .expect("prompt should render");

        assert_eq!(prompt.chars().count(), DEFAULT_MAX_PROMPT_LENGTH);
    }

    #[rstest]
    fn review_prompt_keeps_short_diffs_whole(templates: PromptTemplates) {
        let prompt = templates
            .review_prompt("+tiny", DEFAULT_MAX_PROMPT_LENGTH)
            .expect("prompt should render");

        assert_eq!(prompt, templates.code_prompt("+tiny").expect("prompt should render"));
    }

    #[rstest]
    fn options_banner_names_selection(templates: PromptTemplates) {
        let banner = templates
            .options_banner("svc-a", "42")
            .expect("banner should render");

        assert!(banner.contains("**svc-a**"), "got: {banner}");
        assert!(banner.contains("**42**"), "got: {banner}");
        assert!(banner.contains("`h` for help"), "got: {banner}");
    }
}
