//! Page rendering for ExoneraTor-OUT.
//!
//! Uses Handlebars for the page layout with two custom helpers:
//! - join: Join an array with a separator
//! - default: Fall back to a second value when the first is missing
//!
//! Localized strings are themselves small Handlebars templates. They are
//! rendered first, with escaped arguments, and inserted into the page
//! with triple-stash.

use chrono::NaiveDate;
use exonerator_core::{last_available_date, ExitFlag, ExoneratorConfig, MatchRecord};
use exonerator_outcome::{OutcomeState, QueryEcho};
use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::locale::LocaleSet;
use crate::templates::{TemplatesFile, PAGE_TEMPLATE};
use crate::RenderError;

const ABOUT_TOR_URL: &str = "https://www.torproject.org/about";
const CONTACT_URL: &str = "https://www.torproject.org/contact";

/// Request-specific values the page needs besides the outcome
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Selected language tag
    pub lang: String,
    /// Path of the current request, used for relative links
    pub path: String,
    /// Absolute base for the permanent link, without trailing slash
    pub base_url: String,
    pub today: NaiveDate,
    pub echo: QueryEcho,
}

/// Compiled page renderer with registered helpers
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
    locales: LocaleSet,
}

impl PageRenderer {
    /// Create a renderer from a templates file and string tables
    pub fn new(templates: TemplatesFile, locales: LocaleSet) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(escape_html);

        handlebars.register_helper("join", Box::new(JoinHelper));
        handlebars.register_helper("default", Box::new(DefaultHelper));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| RenderError::Template(format!("{}: {}", name, e)))?;
        }

        Ok(PageRenderer { handlebars, locales })
    }

    /// Built-in layout, English only
    pub fn embedded() -> Result<Self, RenderError> {
        Self::new(TemplatesFile::embedded()?, LocaleSet::embedded()?)
    }

    /// Built-in layout with the configured languages
    pub fn from_config(config: &ExoneratorConfig) -> Result<Self, RenderError> {
        let locales = LocaleSet::load(
            &config.languages,
            &config.default_language,
            config.locales_dir.as_deref(),
        )?;
        Self::new(TemplatesFile::embedded()?, locales)
    }

    /// Render the complete HTML page for one outcome
    pub fn render(&self, state: &OutcomeState, ctx: &PageContext) -> Result<String, RenderError> {
        let lang = self.locales.effective(&ctx.lang);

        let view = PageView {
            lang,
            outcome: state.kind().as_str(),
            text: self.locales.strings(lang),
            form: FormView {
                address: ctx.echo.address.clone(),
                date: ctx.echo.date.clone(),
                default_date: iso(last_available_date(ctx.today)),
                address_error: state.address_field_error(),
                date_error: state.date_field_error(),
            },
            summary: self.summary(state, lang, &ctx.path)?,
            details: self.details(state, lang)?,
            permanent_link: state.permanent_query().map(|query| {
                format!("{}{}?{}", ctx.base_url, ctx.path, query.query_string(lang))
            }),
            footer: self.footer(state, ctx, lang)?,
        };

        self.handlebars
            .render(PAGE_TEMPLATE, &view)
            .map_err(|e| RenderError::Render(e.to_string()))
    }

    /// Render one localized string with escaped arguments
    fn localized(&self, lang: &str, key: &str, args: &Value) -> Result<String, RenderError> {
        let template = self.locales.get(lang, key)?;
        self.handlebars
            .render_template(template, args)
            .map_err(|e| RenderError::Render(format!("{}: {}", key, e)))
    }

    fn link(&self, lang: &str, href: &str, key: &str) -> Result<String, RenderError> {
        Ok(format!(
            "<a href=\"{}\">{}</a>",
            escape_html(href),
            escape_html(self.locales.get(lang, key)?)
        ))
    }

    fn summary(
        &self,
        state: &OutcomeState,
        lang: &str,
        path: &str,
    ) -> Result<Option<SummaryView>, RenderError> {
        let contact = || -> Result<Value, RenderError> {
            Ok(json!({ "contact_link": self.link(lang, CONTACT_URL, "summary_contact_link")? }))
        };

        let (context, name, args, items) = match state {
            OutcomeState::StartPage => return Ok(None),
            OutcomeState::MissingAddress => (DANGER, "noip", json!({}), Vec::new()),
            OutcomeState::MissingDate => (DANGER, "notimestamp", json!({}), Vec::new()),
            OutcomeState::InvalidAddress { echo } => {
                (DANGER, "invalidip", json!({ "echo": echo }), Vec::new())
            }
            OutcomeState::InvalidDate { echo } => {
                (DANGER, "invalidtimestamp", json!({ "echo": echo }), Vec::new())
            }
            OutcomeState::DateTooRecent => (DANGER, "timestamptoorecent", json!({}), Vec::new()),
            OutcomeState::BackendUnreachable => (DANGER, "dbnoconnect", contact()?, Vec::new()),
            OutcomeState::NoDataInDatabase => (DANGER, "dbempty", contact()?, Vec::new()),
            OutcomeState::DateOutOfRange { requested, first, last } => (
                DANGER,
                "timestamprange",
                json!({ "requested": iso(*requested), "first": iso(*first), "last": iso(*last) }),
                Vec::new(),
            ),
            OutcomeState::NoConsensusForInterval => (DANGER, "nodata", contact()?, Vec::new()),
            OutcomeState::PositiveMatch { address, date, .. } => (
                SUCCESS,
                "positive",
                json!({ "address": address, "date": iso(*date) }),
                Vec::new(),
            ),
            OutcomeState::NegativeSameNetwork { address, date, prefix_len, related } => (
                WARNING,
                "samenetwork",
                json!({ "address": address, "date": iso(*date), "prefix_len": prefix_len }),
                related
                    .iter()
                    .map(|r| LinkView {
                        href: format!("{}?{}", path, r.requery.query_string(lang)),
                        label: r.display.clone(),
                    })
                    .collect(),
            ),
            OutcomeState::NegativeNoMatch { address, date } => (
                WARNING,
                "negative",
                json!({ "address": address, "date": iso(*date) }),
                Vec::new(),
            ),
        };

        Ok(Some(SummaryView {
            context,
            title: self.locales.get(lang, &format!("summary_{}_title", name))?.to_string(),
            body: self.localized(lang, &format!("summary_{}_body", name), &args)?,
            items,
        }))
    }

    fn details(&self, state: &OutcomeState, lang: &str) -> Result<Option<DetailsView>, RenderError> {
        let OutcomeState::PositiveMatch { address, date, matches } = state else {
            return Ok(None);
        };

        let pre = self.localized(
            lang,
            "technicaldetails_pre",
            &json!({ "address": address, "date": iso(*date) }),
        )?;
        let rows = matches
            .iter()
            .map(|record| self.row(record, lang))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(DetailsView { pre, rows }))
    }

    fn row(&self, record: &MatchRecord, lang: &str) -> Result<RowView, RenderError> {
        let exit_key = match record.exit {
            ExitFlag::Unknown => "technicaldetails_exit_unknown",
            ExitFlag::Yes => "technicaldetails_exit_yes",
            ExitFlag::No => "technicaldetails_exit_no",
        };
        Ok(RowView {
            timestamp: record.timestamp.clone(),
            addresses: record.addresses.clone(),
            fingerprint: record.fingerprint.clone(),
            nickname: record.nickname.clone(),
            exit: self.locales.get(lang, exit_key)?.to_string(),
        })
    }

    fn footer(
        &self,
        state: &OutcomeState,
        ctx: &PageContext,
        lang: &str,
    ) -> Result<FooterView, RenderError> {
        let about_tor = self.localized(
            lang,
            "footer_abouttor_body",
            &json!({
                "about_link": self.link(lang, ABOUT_TOR_URL, "footer_abouttor_link_about")?,
                "contact_link": self.link(lang, CONTACT_URL, "footer_abouttor_link_contact")?,
            }),
        )?;

        let requery = if state.repeats_query() {
            ctx.echo.requery()
        } else {
            None
        };
        let languages = self
            .locales
            .languages()
            .map(|(tag, name)| LanguageView {
                href: match &requery {
                    Some(query) => format!("{}?{}", ctx.path, query.query_string(tag)),
                    None => format!("{}?lang={}", ctx.path, tag),
                },
                name: name.to_string(),
            })
            .collect();

        Ok(FooterView { about_tor, languages })
    }
}

/// Escape text for element content and quoted attribute values.
///
/// Unlike the Handlebars default, `=` is left alone so query strings in
/// `href` attributes stay readable.
pub fn escape_html(data: &str) -> String {
    let mut escaped = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '&' => escaped.push_str("&amp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ============================================================================
// View model
// ============================================================================

const DANGER: &str = "panel-danger";
const SUCCESS: &str = "panel-success";
const WARNING: &str = "panel-warning";

#[derive(Serialize)]
struct PageView<'a> {
    lang: &'a str,
    outcome: &'static str,
    text: BTreeMap<String, String>,
    form: FormView,
    summary: Option<SummaryView>,
    details: Option<DetailsView>,
    permanent_link: Option<String>,
    footer: FooterView,
}

#[derive(Serialize)]
struct FormView {
    address: Option<String>,
    date: Option<String>,
    default_date: String,
    address_error: bool,
    date_error: bool,
}

#[derive(Serialize)]
struct SummaryView {
    context: &'static str,
    title: String,
    /// Pre-rendered HTML
    body: String,
    items: Vec<LinkView>,
}

#[derive(Serialize)]
struct LinkView {
    href: String,
    label: String,
}

#[derive(Serialize)]
struct DetailsView {
    pre: String,
    rows: Vec<RowView>,
}

#[derive(Serialize)]
struct RowView {
    timestamp: String,
    addresses: Vec<String>,
    fingerprint: String,
    nickname: Option<String>,
    exit: String,
}

#[derive(Serialize)]
struct FooterView {
    about_tor: String,
    languages: Vec<LanguageView>,
}

#[derive(Serialize)]
struct LanguageView {
    href: String,
    name: String,
}

// ============================================================================
// Custom Helpers
// ============================================================================

/// Write a JSON value as escaped text; strings without quotes
fn write_escaped(value: &Value, out: &mut dyn Output) -> HelperResult {
    match value {
        Value::String(s) => out.write(&escape_html(s))?,
        other => out.write(&escape_html(&other.to_string()))?,
    }
    Ok(())
}

/// Join an array with a separator
struct JoinHelper;

impl HelperDef for JoinHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let array = h.param(0).and_then(|v| v.value().as_array());

        let separator = h
            .param(1)
            .and_then(|v| v.value().as_str())
            .unwrap_or(", ");

        if let Some(arr) = array {
            let strings: Vec<String> = arr
                .iter()
                .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                .collect();
            out.write(&escape_html(&strings.join(separator)))?;
        }

        Ok(())
    }
}

/// Default value helper
struct DefaultHelper;

impl HelperDef for DefaultHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        match h.param(0).map(|v| v.value()) {
            Some(v) if !v.is_null() => write_escaped(v, out),
            _ => match h.param(1).map(|v| v.value()) {
                Some(v) if !v.is_null() => write_escaped(v, out),
                _ => Ok(()),
            },
        }
    }
}
