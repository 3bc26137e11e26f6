//! Template-based CV renderer adapter.
//!
//! Produces a self-contained HTML document for a CV. Each named template
//! shares the same markup and differs only in its stylesheet. All document
//! text is HTML-escaped.

use async_trait::async_trait;

use crate::domain::cv::CvDocument;
use crate::ports::{CvRenderer, CvTemplate, RenderError, RenderedCv};

/// Renders a CV to styled HTML.
#[derive(Debug, Clone, Default)]
pub struct TemplateCvRenderer;

impl TemplateCvRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the complete HTML page.
    pub fn render_html(&self, document: &CvDocument, template: CvTemplate) -> String {
        let title = document
            .personal_info
            .as_ref()
            .map(|p| p.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or("Curriculum Vitae");

        let mut body = String::new();
        body.push_str(&self.render_header(document));
        body.push_str(&self.render_summary(document));
        body.push_str(&self.render_experience(document));
        body.push_str(&self.render_education(document));
        body.push_str(&self.render_projects(document));
        body.push_str(&self.render_skills(document));
        body.push_str(&self.render_certifications(document));
        body.push_str(&self.render_references(document));

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{base}
{theme}
    </style>
</head>
<body class="template-{template}">
    <article class="cv">
{body}
    </article>
</body>
</html>"#,
            title = html_escape(title),
            base = BASE_CSS,
            theme = template_css(template),
            template = template.as_str(),
            body = body
        )
    }

    fn render_header(&self, document: &CvDocument) -> String {
        let Some(info) = &document.personal_info else {
            return String::new();
        };

        let mut section = String::from("<header>\n");
        section.push_str(&format!("<h1>{}</h1>\n", html_escape(&info.name)));

        let contact: Vec<String> = [&info.email, &info.phone, &info.address]
            .iter()
            .filter(|v| !v.trim().is_empty())
            .map(|v| format!("<span>{}</span>", html_escape(v)))
            .collect();
        if !contact.is_empty() {
            section.push_str(&format!("<p class=\"contact\">{}</p>\n", contact.join(" | ")));
        }

        section.push_str("</header>\n");
        section
    }

    fn render_summary(&self, document: &CvDocument) -> String {
        match document.summary.as_deref().map(str::trim) {
            Some(summary) if !summary.is_empty() => format!(
                "<section>\n<h2>Professional Summary</h2>\n<p>{}</p>\n</section>\n",
                html_escape(summary)
            ),
            _ => String::new(),
        }
    }

    fn render_experience(&self, document: &CvDocument) -> String {
        section_list(
            "Experience",
            document.experience.iter().map(|e| {
                format!(
                    "<h3>{} <span class=\"muted\">at {}</span></h3>\n<p class=\"dates\">{} - {}</p>\n<p>{}</p>",
                    html_escape(&e.role),
                    html_escape(&e.company),
                    html_escape(&e.start_date),
                    html_escape(&e.end_date),
                    html_escape(&e.description)
                )
            }),
        )
    }

    fn render_education(&self, document: &CvDocument) -> String {
        section_list(
            "Education",
            document.education.iter().map(|e| {
                let mut item = format!(
                    "<h3>{}</h3>\n<p>{}, {}</p>",
                    html_escape(&e.degree),
                    html_escape(&e.institution),
                    html_escape(&e.year)
                );
                if !e.details.trim().is_empty() {
                    item.push_str(&format!("\n<p class=\"muted\">{}</p>", html_escape(&e.details)));
                }
                item
            }),
        )
    }

    fn render_projects(&self, document: &CvDocument) -> String {
        section_list(
            "Projects",
            document.projects.iter().map(|p| {
                let mut item = format!(
                    "<h3>{}</h3>\n<p>{}</p>",
                    html_escape(&p.name),
                    html_escape(&p.description)
                );
                if !p.technologies.trim().is_empty() {
                    item.push_str(&format!(
                        "\n<p class=\"muted\">Technologies: {}</p>",
                        html_escape(&p.technologies)
                    ));
                }
                item
            }),
        )
    }

    fn render_skills(&self, document: &CvDocument) -> String {
        if document.skills.is_empty() {
            return String::new();
        }
        let items: Vec<String> = document
            .skills
            .iter()
            .map(|s| format!("<li>{}</li>", html_escape(s)))
            .collect();
        format!(
            "<section>\n<h2>Skills</h2>\n<ul class=\"skills\">{}</ul>\n</section>\n",
            items.join("")
        )
    }

    fn render_certifications(&self, document: &CvDocument) -> String {
        section_list(
            "Certifications",
            document.certifications.iter().map(|c| {
                format!(
                    "<p><strong>{}</strong>, {} ({})</p>",
                    html_escape(&c.name),
                    html_escape(&c.issuer),
                    html_escape(&c.year)
                )
            }),
        )
    }

    fn render_references(&self, document: &CvDocument) -> String {
        section_list(
            "References",
            document.references.iter().map(|r| {
                let mut item = format!(
                    "<p><strong>{}</strong>, {}",
                    html_escape(&r.name),
                    html_escape(&r.contact)
                );
                if !r.relationship.trim().is_empty() {
                    item.push_str(&format!(" <span class=\"muted\">({})</span>", html_escape(&r.relationship)));
                }
                item.push_str("</p>");
                item
            }),
        )
    }
}

#[async_trait]
impl CvRenderer for TemplateCvRenderer {
    async fn render(&self, document: &CvDocument, template: CvTemplate) -> Result<RenderedCv, RenderError> {
        let html = self.render_html(document, template);
        Ok(RenderedCv::html(html, &base_filename(document), template))
    }
}

/// Wraps rendered entries in a titled section; empty lists render nothing.
fn section_list(title: &str, items: impl Iterator<Item = String>) -> String {
    let entries: Vec<String> = items
        .map(|item| format!("<div class=\"entry\">\n{}\n</div>\n", item))
        .collect();
    if entries.is_empty() {
        return String::new();
    }
    format!("<section>\n<h2>{}</h2>\n{}</section>\n", title, entries.concat())
}

/// File name stem from the person's name, e.g. `jane_doe_cv`.
fn base_filename(document: &CvDocument) -> String {
    let name = document
        .personal_info
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or_default();

    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        "cv".to_string()
    } else {
        format!("{}_cv", slug)
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn template_css(template: CvTemplate) -> &'static str {
    match template {
        CvTemplate::Modern => MODERN_CSS,
        CvTemplate::Classic => CLASSIC_CSS,
        CvTemplate::Minimal => MINIMAL_CSS,
    }
}

const BASE_CSS: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; padding: 2rem; line-height: 1.5; }
.cv { max-width: 800px; margin: 0 auto; }
h1 { margin: 0 0 0.25rem; }
h2 { margin-top: 1.75rem; }
h3 { margin: 0.75rem 0 0.25rem; font-size: 1.05rem; }
.entry p { margin: 0.2rem 0; }
.skills { display: flex; flex-wrap: wrap; gap: 0.5rem; padding: 0; list-style: none; }
"#;

const MODERN_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; color: #1f2937; }
header { border-bottom: 3px solid #2563eb; padding-bottom: 0.75rem; }
h2 { color: #2563eb; text-transform: uppercase; letter-spacing: 0.05em; font-size: 1rem; }
.muted, .dates, .contact { color: #6b7280; }
.skills li { background: #eff6ff; color: #1d4ed8; border-radius: 999px; padding: 0.15rem 0.75rem; }
"#;

const CLASSIC_CSS: &str = r#"
body { font-family: Georgia, "Times New Roman", serif; color: #111; }
header { text-align: center; border-bottom: 1px solid #111; padding-bottom: 0.5rem; }
h2 { border-bottom: 1px solid #999; font-variant: small-caps; }
.muted, .dates, .contact { color: #444; font-style: italic; }
.skills li::after { content: " \2022"; }
"#;

const MINIMAL_CSS: &str = r#"
body { font-family: "Helvetica Neue", Arial, sans-serif; color: #222; font-size: 0.95rem; }
h1 { font-weight: 300; }
h2 { font-weight: 400; font-size: 1rem; color: #555; }
.muted, .dates, .contact { color: #888; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cv::{ExperienceEntry, PersonalInfo, ReferenceEntry};

    fn sample() -> CvDocument {
        let mut document = CvDocument::default();
        document.personal_info = Some(PersonalInfo {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: String::new(),
            address: "Dar es Salaam".into(),
        });
        document.summary = Some("Teacher with 10 years experience".into());
        document.experience.push(ExperienceEntry {
            company: "Acme & Sons".into(),
            role: "Manager".into(),
            start_date: "01/2020".into(),
            end_date: "present".into(),
            description: "Ran <the> shop".into(),
        });
        document.skills = vec!["Rust".into(), "Teaching".into()];
        document
    }

    #[test]
    fn html_escape_escapes_special_chars() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn renders_sections_with_escaped_content() {
        let html = TemplateCvRenderer::new().render_html(&sample(), CvTemplate::Modern);

        assert!(html.contains("<title>Jane Doe</title>"));
        assert!(html.contains("Professional Summary"));
        assert!(html.contains("Acme &amp; Sons"));
        assert!(html.contains("Ran &lt;the&gt; shop"));
        assert!(!html.contains("<the>"));
        assert!(html.contains("<li>Rust</li>"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let html = TemplateCvRenderer::new().render_html(&sample(), CvTemplate::Modern);
        assert!(!html.contains("<h2>Projects</h2>"));
        assert!(!html.contains("<h2>References</h2>"));
    }

    #[test]
    fn blank_contact_fields_are_skipped() {
        let html = TemplateCvRenderer::new().render_html(&sample(), CvTemplate::Minimal);
        assert!(html.contains("<span>jane@example.com</span> | <span>Dar es Salaam</span>"));
    }

    #[test]
    fn templates_differ_only_in_style() {
        let renderer = TemplateCvRenderer::new();
        let modern = renderer.render_html(&sample(), CvTemplate::Modern);
        let classic = renderer.render_html(&sample(), CvTemplate::Classic);

        assert!(modern.contains("template-modern"));
        assert!(classic.contains("template-classic"));
        assert!(classic.contains("Georgia"));
        assert!(!modern.contains("Georgia"));
    }

    #[test]
    fn optional_reference_relationship() {
        let mut document = sample();
        document.references.push(ReferenceEntry {
            name: "John Smith".into(),
            contact: "john@example.com".into(),
            relationship: String::new(),
        });
        let html = TemplateCvRenderer::new().render_html(&document, CvTemplate::Modern);
        assert!(html.contains("<p><strong>John Smith</strong>, john@example.com</p>"));
    }

    #[test]
    fn filename_from_name() {
        assert_eq!(base_filename(&sample()), "jane_doe_cv");
        assert_eq!(base_filename(&CvDocument::default()), "cv");

        let mut odd = sample();
        odd.personal_info.as_mut().unwrap().name = "  Émile O'Neil ".into();
        assert_eq!(base_filename(&odd), "mile_o_neil_cv");
    }

    #[tokio::test]
    async fn render_produces_html_artifact() {
        let rendered = TemplateCvRenderer::new()
            .render(&sample(), CvTemplate::Classic)
            .await
            .unwrap();

        assert_eq!(rendered.filename, "jane_doe_cv.html");
        assert_eq!(rendered.template, CvTemplate::Classic);
        assert!(rendered.content_type.starts_with("text/html"));
        assert!(String::from_utf8(rendered.content).unwrap().starts_with("<!DOCTYPE html>"));
    }
}
