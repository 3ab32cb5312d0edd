//! Tag substitution for verification messages.
//!
//! A template is any text holding `<tag>` markers. The `<verification_code>` marker is mandatory, while
//! the remaining ones are grouped into colors, logo and text, and are only substituted when their group
//! is provided. Every substitution is a literal replacement made in a single pass over the template:
//! marker values are never interpreted as patterns, nor scanned for markers again.

use super::domain::{Code, CodeAlphabet};
use super::error::{Error, Result};
use std::str::FromStr;

/// A built-in HTML template carrying every [TemplateTag].
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/default_template.html");

const COLOR_PREFIX: char = '#';
const MARKER_OPEN: char = '<';
const MARKER_CLOSE: char = '>';
const LINE_BREAK: &str = "<br>";

/// Represents every tag a template may contain.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
pub enum TemplateTag {
    #[strum(serialize = "primary_color")]
    PrimaryColor,
    #[strum(serialize = "secondary_color")]
    SecondaryColor,
    #[strum(serialize = "tertiary_color")]
    TertiaryColor,
    #[strum(serialize = "text_color")]
    TextColor,
    #[strum(serialize = "logo_link")]
    LogoLink,
    #[strum(serialize = "logo_url")]
    LogoUrl,
    #[strum(serialize = "title_text")]
    Title,
    #[strum(serialize = "description")]
    Description,
    #[strum(serialize = "footer_text")]
    FooterText,
    #[strum(serialize = "reasons")]
    Reasons,
    #[strum(serialize = "verification_code")]
    VerificationCode,
}

impl TemplateTag {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns the literal marker of the tag, as found in template text.
    pub fn marker(self) -> String {
        format!("{MARKER_OPEN}{}{MARKER_CLOSE}", self.name())
    }
}

/// A set of colors to paint the template with.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScheme {
    primary: String,
    secondary: String,
    tertiary: String,
    text: String,
}

/// A builder for the [ColorScheme] struct, deserializable from a json object keyed by tag name.
#[derive(Debug, Default, Deserialize)]
pub struct ColorSchemeBuilder {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub tertiary_color: Option<String>,
    pub text_color: Option<String>,
}

impl ColorSchemeBuilder {
    pub fn build(&self) -> Result<ColorScheme> {
        let required = |color: &Option<String>, tag: TemplateTag| {
            color
                .as_deref()
                .filter(|color| !color.is_empty())
                .map(normalize_color)
                .ok_or_else(|| Error::InvalidConfiguration(format!("{} must be set", tag.name())))
        };

        Ok(ColorScheme {
            primary: required(&self.primary_color, TemplateTag::PrimaryColor)?,
            secondary: required(&self.secondary_color, TemplateTag::SecondaryColor)?,
            tertiary: self
                .tertiary_color
                .as_deref()
                .map(normalize_color)
                .unwrap_or_default(),
            text: self
                .text_color
                .as_deref()
                .map(normalize_color)
                .unwrap_or_default(),
        })
    }
}

impl ColorScheme {
    /// Builds a [ColorScheme] with just the required colors.
    pub fn new(primary: &str, secondary: &str) -> Result<Self> {
        ColorSchemeBuilder {
            primary_color: Some(primary.to_string()),
            secondary_color: Some(secondary.to_string()),
            ..Default::default()
        }
        .build()
    }

    /// Builds a [ColorScheme] from a json object like `{"primary_color": "07020d", ...}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<ColorSchemeBuilder>(json)?.build()
    }

    pub fn with_tertiary(mut self, color: &str) -> Self {
        self.tertiary = normalize_color(color);
        self
    }

    pub fn with_text(mut self, color: &str) -> Self {
        self.text = normalize_color(color);
        self
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    pub fn tertiary(&self) -> &str {
        &self.tertiary
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn value(&self, tag: TemplateTag) -> Option<&str> {
        match tag {
            TemplateTag::PrimaryColor => Some(self.primary.as_str()),
            TemplateTag::SecondaryColor => Some(self.secondary.as_str()),
            TemplateTag::TertiaryColor => Some(self.tertiary.as_str()),
            TemplateTag::TextColor => Some(self.text.as_str()),
            _ => None,
        }
    }
}

fn normalize_color(color: &str) -> String {
    if color.is_empty() || color.starts_with(COLOR_PREFIX) {
        return color.to_string();
    }

    format!("{COLOR_PREFIX}{color}")
}

/// The logo to display in the template, and where it links to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Logo {
    pub link: String,
    pub url: String,
}

impl Logo {
    pub fn new(link: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            url: url.into(),
        }
    }

    /// Builds a [Logo] from a json object like `{"link": "https://x.com", "url": "https://x.com/logo.png"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn value(&self, tag: TemplateTag) -> Option<&str> {
        match tag {
            TemplateTag::LogoLink => Some(self.link.as_str()),
            TemplateTag::LogoUrl => Some(self.url.as_str()),
            _ => None,
        }
    }
}

/// The texts to display in the template. Line feeds are turned into html line breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTemplate {
    title: String,
    description: String,
    footer: String,
    reasons: String,
}

impl TextTemplate {
    pub fn new(title: &str, description: &str, footer: &str, reasons: &str) -> Self {
        let html = |text: &str| text.replace('\n', LINE_BREAK);
        Self {
            title: html(title),
            description: html(description),
            footer: html(footer),
            reasons: html(reasons),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    pub fn reasons(&self) -> &str {
        &self.reasons
    }

    fn value(&self, tag: TemplateTag) -> Option<&str> {
        match tag {
            TemplateTag::Title => Some(self.title.as_str()),
            TemplateTag::Description => Some(self.description.as_str()),
            TemplateTag::FooterText => Some(self.footer.as_str()),
            TemplateTag::Reasons => Some(self.reasons.as_str()),
            _ => None,
        }
    }
}

/// Groups all the optional values a template can be filled with.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    pub colors: Option<ColorScheme>,
    pub logo: Option<Logo>,
    pub text: Option<TextTemplate>,
}

impl TemplateContext {
    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_text(mut self, text: TextTemplate) -> Self {
        self.text = Some(text);
        self
    }

    /// Returns the value the given tag resolves to, if its group has been provided.
    pub fn value(&self, tag: TemplateTag) -> Option<&str> {
        self.colors
            .as_ref()
            .and_then(|colors| colors.value(tag))
            .or_else(|| self.logo.as_ref().and_then(|logo| logo.value(tag)))
            .or_else(|| self.text.as_ref().and_then(|text| text.value(tag)))
    }
}

/// The outcome of rendering a template: the final content and the code embedded in it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub content: String,
    pub code: Code,
}

/// Fails with [Error::MissingRequiredTag] unless the template holds the verification code marker.
pub fn ensure_required_tag(template: &str) -> Result<()> {
    let tag = TemplateTag::VerificationCode;
    if !template.contains(&tag.marker()) {
        return Error::MissingRequiredTag(tag.name()).into();
    }

    Ok(())
}

/// Embeds a brand new code into the template, and fills in the groups given by the context, if any.
pub fn render(
    template: &str,
    context: Option<&TemplateContext>,
    alphabet: CodeAlphabet,
) -> Result<Rendered> {
    ensure_required_tag(template)?;

    let code = Code::generate(alphabet);
    let content = substitute(template, |tag| match tag {
        TemplateTag::VerificationCode => Some(code.as_ref()),
        tag => context.and_then(|context| context.value(tag)),
    });

    Ok(Rendered { content, code })
}

/// Replaces every marker in the template whose tag resolves to some value, keeping any other marker as
/// is. Values are pushed straight into the output, so they are never scanned for markers.
fn substitute<'a, F>(template: &str, value_of: F) -> String
where
    F: Fn(TemplateTag) -> Option<&'a str>,
{
    let mut content = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(MARKER_OPEN) {
        content.push_str(&rest[..start]);
        let candidate = &rest[start + MARKER_OPEN.len_utf8()..];

        let resolved = candidate.find(MARKER_CLOSE).and_then(|end| {
            TemplateTag::from_str(&candidate[..end])
                .ok()
                .and_then(&value_of)
                .map(|value| (value, end + MARKER_CLOSE.len_utf8()))
        });

        rest = match resolved {
            Some((value, consumed)) => {
                content.push_str(value);
                &candidate[consumed..]
            }
            None => {
                content.push(MARKER_OPEN);
                candidate
            }
        };
    }

    content.push_str(rest);
    content
}
