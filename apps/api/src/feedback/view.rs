//! Form and result views — server-rendered HTML read from a `FeedbackSession`.
//!
//! Everything coming from the learner or the model goes through `html_escape`.

use std::time::Duration;

use html_escape::{encode_double_quoted_attribute, encode_text};
use tokio::time::Instant;

use crate::feedback::models::{FeedbackResult, FeedbackTone, LearnerLevel};
use crate::feedback::session::{FeedbackSession, RequestState};
use crate::feedback::tone::{level_option, tone_option, FormOption};

/// How long the "copied" acknowledgement stays visible.
pub const COPY_ACK_DURATION: Duration = Duration::from_millis(2500);

struct Section<'a> {
    title: &'static str,
    copy_header: &'static str,
    items: &'a [String],
}

fn sections(result: &FeedbackResult) -> [Section<'_>; 3] {
    [
        Section {
            title: "Points Forts",
            copy_header: "POINTS FORTS :",
            items: &result.strengths,
        },
        Section {
            title: "Points à Améliorer",
            copy_header: "POINTS À AMÉLIORER :",
            items: &result.areas_for_improvement,
        },
        Section {
            title: "Pistes d'Amélioration",
            copy_header: "PISTES D’AMÉLIORATION :",
            items: &result.suggestions,
        },
    ]
}

/// Plain-text version of the feedback placed on the clipboard.
/// Empty sections and an empty final message are left out.
pub fn clipboard_text(result: &FeedbackResult) -> String {
    let mut blocks: Vec<String> = sections(result)
        .iter()
        .filter(|s| !s.items.is_empty())
        .map(|s| {
            let bullets: Vec<String> = s.items.iter().map(|item| format!("- {item}")).collect();
            format!("{}\n{}", s.copy_header, bullets.join("\n"))
        })
        .collect();

    if !result.final_message.trim().is_empty() {
        blocks.push(format!("MESSAGE FINAL :\n{}", result.final_message));
    }

    blocks.join("\n\n")
}

/// Transient "copied" state of the copy action.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyAcknowledgement {
    copied_at: Option<Instant>,
}

impl CopyAcknowledgement {
    /// Copies `result` if there is one, returning the clipboard text and
    /// starting the acknowledgement.
    #[allow(dead_code)]
    pub fn copy(&mut self, result: Option<&FeedbackResult>) -> Option<String> {
        let result = result?;
        self.copied_at = Some(Instant::now());
        Some(clipboard_text(result))
    }

    pub fn is_active(&self) -> bool {
        self.copied_at
            .is_some_and(|at| at.elapsed() < COPY_ACK_DURATION)
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn word_count_label(text: &str) -> String {
    let n = word_count(text);
    if n > 1 {
        format!("{n} mots")
    } else {
        format!("{n} mot")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result view
// ────────────────────────────────────────────────────────────────────────────

const LOADING_PANEL: &str = r#"<div class="panel loading" aria-busy="true">
  <div class="bar w-1-3"></div>
  <div class="line w-full"></div>
  <div class="line w-5-6"></div>
  <div class="bar w-1-2"></div>
  <div class="line w-full"></div>
  <div class="line w-4-6"></div>
</div>"#;

const EMPTY_PANEL: &str = r#"<div class="panel empty">
  <h3>En attente d'une analyse</h3>
  <p>Remplissez le formulaire pour obtenir un feedback pédagogique détaillé.</p>
</div>"#;

pub fn render_result_panel(state: &RequestState, ack: &CopyAcknowledgement) -> String {
    match state {
        RequestState::Submitting => LOADING_PANEL.to_string(),
        RequestState::Failed(message) => format!(
            "<div class=\"panel error\" role=\"alert\">\n  <h3>Erreur de Génération</h3>\n  <p>{}</p>\n</div>",
            encode_text(message)
        ),
        RequestState::Idle => EMPTY_PANEL.to_string(),
        RequestState::Success(result) => render_feedback(result, ack),
    }
}

fn render_feedback(result: &FeedbackResult, ack: &CopyAcknowledgement) -> String {
    let copy_label = if ack.is_active() { "Copié !" } else { "Copier" };

    let mut html = String::from("<div class=\"panel feedback\">\n");
    html.push_str(&format!(
        "  <div class=\"feedback-header\">\n    <h3>Feedback Détaillé</h3>\n    \
         <button type=\"button\" id=\"copy-button\" aria-label=\"Copier le feedback\">{copy_label}</button>\n  </div>\n"
    ));

    for section in sections(result).iter().filter(|s| !s.items.is_empty()) {
        html.push_str(&format!("  <section>\n    <h4>{}</h4>\n    <ul>\n", section.title));
        for item in section.items {
            html.push_str(&format!("      <li>{}</li>\n", encode_text(item)));
        }
        html.push_str("    </ul>\n  </section>\n");
    }

    if !result.final_message.trim().is_empty() {
        html.push_str(&format!(
            "  <section class=\"final\">\n    <h4>Message Final</h4>\n    <p>{}</p>\n  </section>\n",
            encode_text(&result.final_message)
        ));
    }

    html.push_str(&format!(
        "  <textarea id=\"copy-text\" hidden readonly>{}</textarea>\n</div>",
        encode_text(&clipboard_text(result))
    ));
    html
}

// ────────────────────────────────────────────────────────────────────────────
// Form view
// ────────────────────────────────────────────────────────────────────────────

fn render_radio(name: &str, option: FormOption, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    let caption = option
        .caption
        .map(|c| format!("<small>{c}</small>"))
        .unwrap_or_default();
    format!(
        "      <label class=\"option\"><input type=\"radio\" name=\"{name}\" value=\"{}\"{checked}> \
         <span>{}</span>{caption}</label>\n",
        option.value, option.label
    )
}

pub fn render_form(session: &FeedbackSession) -> String {
    let mut html = String::from("<form id=\"feedback-form\" method=\"post\" action=\"/feedback\">\n");

    html.push_str("  <fieldset role=\"radiogroup\">\n    <legend>Niveau de l'apprenant</legend>\n");
    for level in LearnerLevel::ALL {
        html.push_str(&render_radio("level", level_option(level), level == session.level));
    }
    html.push_str("  </fieldset>\n");

    html.push_str("  <fieldset role=\"radiogroup\">\n    <legend>Ton souhaité</legend>\n");
    for tone in FeedbackTone::ALL {
        html.push_str(&render_radio("tone", tone_option(tone), tone == session.tone));
    }
    html.push_str("  </fieldset>\n");

    html.push_str(&format!(
        "  <div class=\"text-header\">\n    <label for=\"learner-text\">Texte à évaluer</label>\n    \
         <span id=\"word-count\">{}</span>\n  </div>\n",
        word_count_label(&session.text)
    ));
    html.push_str(&format!(
        "  <textarea id=\"learner-text\" name=\"text\" rows=\"12\" required \
         placeholder=\"{}\">{}</textarea>\n",
        encode_double_quoted_attribute("Collez ici le texte de l'apprenant..."),
        encode_text(&session.text)
    ));

    let disabled = if session.can_submit() { "" } else { " disabled" };
    let label = if session.is_submitting() {
        "Génération en cours..."
    } else {
        "Générer le Feedback"
    };
    html.push_str(&format!(
        "  <button type=\"submit\" id=\"submit-button\"{disabled}>{label}</button>\n</form>"
    ));
    html
}

// ────────────────────────────────────────────────────────────────────────────
// Page
// ────────────────────────────────────────────────────────────────────────────

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f1f5f9; color: #1e293b; }
main { max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }
header { text-align: center; margin-bottom: 2rem; }
.grid { display: grid; gap: 2rem; grid-template-columns: repeat(auto-fit, minmax(22rem, 1fr)); }
.card, .panel { background: #fff; border: 1px solid #e2e8f0; border-radius: .75rem; padding: 1.5rem; }
.panel.error { background: #fef2f2; border-color: #fecaca; color: #991b1b; text-align: center; }
.panel.empty { text-align: center; color: #64748b; }
.loading .bar, .loading .line { background: #e2e8f0; border-radius: .25rem; margin-bottom: .75rem; }
.loading .bar { height: 1rem; margin-top: 1.5rem; } .loading .line { height: .75rem; }
.w-full { width: 100%; } .w-5-6 { width: 83%; } .w-4-6 { width: 66%; } .w-1-2 { width: 50%; } .w-1-3 { width: 33%; }
.feedback-header, .text-header { display: flex; justify-content: space-between; align-items: center; }
fieldset { border: none; padding: 0; margin: 0 0 1.5rem; }
.option { display: block; padding: .5rem; }
.option small { display: block; color: #64748b; margin-left: 1.5rem; }
textarea#learner-text { width: 100%; box-sizing: border-box; }
button[type=submit] { width: 100%; margin-top: 1rem; padding: .6rem; background: #4f46e5; color: #fff; border: none; border-radius: .375rem; }
button:disabled { opacity: .5; cursor: not-allowed; }
@media (prefers-color-scheme: dark) {
  body { background: #020617; color: #e2e8f0; }
  .card, .panel { background: #0f172a; border-color: #1e293b; }
  .panel.error { background: #450a0a; border-color: #7f1d1d; color: #fecaca; }
}
"#;

const SCRIPT: &str = r#"
(() => {
  const form = document.getElementById('feedback-form');
  const text = document.getElementById('learner-text');
  const submit = document.getElementById('submit-button');
  const counter = document.getElementById('word-count');
  const result = document.getElementById('result-panel');
  const loading = document.getElementById('loading-panel');
  const refresh = () => {
    const t = text.value.trim();
    const n = t === '' ? 0 : t.split(/\s+/).length;
    counter.textContent = n + ' mot' + (n > 1 ? 's' : '');
    submit.disabled = t === '';
  };
  text.addEventListener('input', refresh);
  form.addEventListener('submit', () => {
    submit.disabled = true;
    submit.textContent = 'Génération en cours...';
    result.hidden = true;
    loading.hidden = false;
  });
  const copy = document.getElementById('copy-button');
  if (copy) {
    copy.addEventListener('click', () => {
      const blob = document.getElementById('copy-text').value;
      navigator.clipboard.writeText(blob).then(() => {
        copy.textContent = 'Copié !';
        setTimeout(() => { copy.textContent = 'Copier'; }, __COPY_ACK_MS__);
      });
    });
  }
})();
"#;

pub fn render_page(session: &FeedbackSession, ack: &CopyAcknowledgement) -> String {
    let script = SCRIPT.replace("__COPY_ACK_MS__", &COPY_ACK_DURATION.as_millis().to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Assistant Pédagogique IA</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<header>
  <h1>Assistant Pédagogique IA</h1>
  <p>Générez des feedbacks constructifs et personnalisés pour aider vos apprenants à progresser.</p>
</header>
<div class="grid">
<div class="card">
{form}
</div>
<div>
<div id="result-panel">
{result}
</div>
<div id="loading-panel" hidden>
{LOADING_PANEL}
</div>
</div>
</div>
</main>
<script>{script}</script>
</body>
</html>"#,
        form = render_form(session),
        result = render_result_panel(session.state(), ack),
    )
}
