use crate::models::resume::{Basics, ResumeDocument};
use crate::render::{RenderedResume, ResumeRenderer, TemplateId};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Markdown for Modern and Executive, plain text for Classic.
pub struct TextRenderer;

impl ResumeRenderer for TextRenderer {
    fn render(&self, doc: &ResumeDocument, template: TemplateId) -> RenderedResume {
        let (content_type, body) = match template {
            TemplateId::Modern => ("text/markdown; charset=utf-8", render_modern(doc)),
            TemplateId::Classic => ("text/plain; charset=utf-8", render_classic(doc)),
            TemplateId::Executive => ("text/markdown; charset=utf-8", render_executive(doc)),
        };
        RenderedResume {
            template,
            content_type,
            body,
        }
    }
}

/// "2020-01" → "January 2020"; missing → "Present".
fn format_date(date: Option<&str>) -> String {
    let Some(date) = date else {
        return "Present".to_string();
    };
    let mut parts = date.split('-');
    let year = parts.next().unwrap_or(date);
    match parts
        .next()
        .and_then(|m| m.parse::<usize>().ok())
        .and_then(|m| MONTHS.get(m.wrapping_sub(1)))
    {
        Some(month) => format!("{month} {year}"),
        None => year.to_string(),
    }
}

fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    start.map(|s| format!("{} - {}", format_date(Some(s)), format_date(end)))
}

fn contact_line(basics: &Basics) -> String {
    let mut parts: Vec<String> = [&basics.email, &basics.phone, &basics.url]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if let Some(loc) = &basics.location {
        let place: Vec<&str> = [loc.city.as_deref(), loc.region.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !place.is_empty() {
            parts.push(place.join(", "));
        }
    }
    parts.extend(basics.profiles.iter().filter_map(|p| p.url.clone()));
    parts.join(" | ")
}

fn skills_inline(doc: &ResumeDocument) -> Vec<String> {
    doc.skills
        .iter()
        .map(|s| {
            if s.keywords.is_empty() {
                s.name.clone()
            } else {
                format!("{}: {}", s.name, s.keywords.join(", "))
            }
        })
        .collect()
}

fn render_modern(doc: &ResumeDocument) -> String {
    let mut out = vec![format!("# {}", doc.basics.name)];
    if let Some(label) = &doc.basics.label {
        out.push(format!("**{label}**"));
    }
    let contact = contact_line(&doc.basics);
    if !contact.is_empty() {
        out.push(contact);
    }
    if let Some(summary) = &doc.basics.summary {
        out.push(String::new());
        out.push("## Summary".to_string());
        out.push(summary.text.clone());
    }
    if !doc.skills.is_empty() {
        out.push(String::new());
        out.push("## Skills".to_string());
        out.extend(skills_inline(doc).into_iter().map(|s| format!("- {s}")));
    }
    if !doc.work.is_empty() {
        out.push(String::new());
        out.push("## Experience".to_string());
        for work in &doc.work {
            out.push(format!("### {} | {}", work.position, work.name));
            if let Some(range) = date_range(work.start_date.as_deref(), work.end_date.as_deref()) {
                out.push(format!("*{range}*"));
            }
            out.extend(work.highlights.iter().map(|h| format!("- {}", h.text)));
        }
    }
    push_projects(&mut out, doc, "## Projects", "### ");
    if !doc.education.is_empty() {
        out.push(String::new());
        out.push("## Education".to_string());
        for edu in &doc.education {
            out.push(format!("### {}", edu.institution));
            let degree = degree_line(edu.study_type.as_deref(), edu.area.as_deref());
            if !degree.is_empty() {
                out.push(degree);
            }
        }
    }
    push_certificates(&mut out, doc, "## Certifications", "- ");
    finish(out)
}

fn render_classic(doc: &ResumeDocument) -> String {
    let mut out = vec![doc.basics.name.to_uppercase()];
    let contact = contact_line(&doc.basics);
    if !contact.is_empty() {
        out.push(contact);
    }
    if let Some(summary) = &doc.basics.summary {
        out.push(String::new());
        out.push("SUMMARY".to_string());
        out.push(summary.text.clone());
    }
    if !doc.work.is_empty() {
        out.push(String::new());
        out.push("EXPERIENCE".to_string());
        for work in &doc.work {
            let range = date_range(work.start_date.as_deref(), work.end_date.as_deref())
                .map(|r| format!(", {r}"))
                .unwrap_or_default();
            out.push(format!("{}, {}{range}", work.position, work.name));
            out.extend(work.highlights.iter().map(|h| format!("- {}", h.text)));
        }
    }
    if !doc.education.is_empty() {
        out.push(String::new());
        out.push("EDUCATION".to_string());
        for edu in &doc.education {
            let degree = degree_line(edu.study_type.as_deref(), edu.area.as_deref());
            if degree.is_empty() {
                out.push(edu.institution.clone());
            } else {
                out.push(format!("{}, {degree}", edu.institution));
            }
        }
    }
    if !doc.skills.is_empty() {
        out.push(String::new());
        out.push("SKILLS".to_string());
        out.extend(skills_inline(doc));
    }
    push_projects(&mut out, doc, "PROJECTS", "");
    push_certificates(&mut out, doc, "CERTIFICATIONS", "- ");
    finish(out)
}

fn render_executive(doc: &ResumeDocument) -> String {
    let mut out = vec![format!("# {}", doc.basics.name)];
    let headline = doc
        .basics
        .label
        .clone()
        .or_else(|| doc.work.first().map(|w| w.position.clone()));
    if let Some(headline) = headline {
        out.push(format!("## {headline}"));
    }
    let contact = contact_line(&doc.basics);
    if !contact.is_empty() {
        out.push(contact);
    }
    if let Some(summary) = &doc.basics.summary {
        out.push(String::new());
        out.push("## Professional Summary".to_string());
        out.push(summary.text.clone());
    }
    let competencies: Vec<&str> = doc
        .skills
        .iter()
        .flat_map(|s| s.keywords.iter().map(String::as_str))
        .collect();
    if !competencies.is_empty() {
        out.push(String::new());
        out.push("## Core Competencies".to_string());
        out.push(competencies.join(" · "));
    }
    if !doc.work.is_empty() {
        out.push(String::new());
        out.push("## Leadership Experience".to_string());
        for work in &doc.work {
            out.push(format!("### {}, {}", work.name, work.position));
            if let Some(range) = date_range(work.start_date.as_deref(), work.end_date.as_deref()) {
                out.push(range);
            }
            if let Some(summary) = &work.summary {
                out.push(summary.clone());
            }
            out.extend(work.highlights.iter().map(|h| format!("- {}", h.text)));
        }
    }
    if !doc.education.is_empty() {
        out.push(String::new());
        out.push("## Education".to_string());
        for edu in &doc.education {
            let degree = degree_line(edu.study_type.as_deref(), edu.area.as_deref());
            out.push(if degree.is_empty() {
                format!("- {}", edu.institution)
            } else {
                format!("- {degree}, {}", edu.institution)
            });
        }
    }
    push_certificates(&mut out, doc, "## Certifications", "- ");
    finish(out)
}

fn degree_line(study_type: Option<&str>, area: Option<&str>) -> String {
    [study_type, area]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_projects(out: &mut Vec<String>, doc: &ResumeDocument, header: &str, name_prefix: &str) {
    if doc.projects.is_empty() {
        return;
    }
    out.push(String::new());
    out.push(header.to_string());
    for project in &doc.projects {
        out.push(format!("{name_prefix}{}", project.name));
        if let Some(description) = &project.description {
            out.push(description.clone());
        }
        out.extend(project.highlights.iter().map(|h| format!("- {}", h.text)));
    }
}

fn push_certificates(out: &mut Vec<String>, doc: &ResumeDocument, header: &str, prefix: &str) {
    if doc.certificates.is_empty() {
        return;
    }
    out.push(String::new());
    out.push(header.to_string());
    for cert in &doc.certificates {
        let issuer = cert
            .issuer
            .as_ref()
            .map(|i| format!(" ({i})"))
            .unwrap_or_default();
        out.push(format!("{prefix}{}{issuer}", cert.name));
    }
}

fn finish(out: Vec<String>) -> String {
    let mut body = out.join("\n");
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> ResumeDocument {
        let mut doc = ResumeDocument::new("Ada Lovelace");
        doc.basics.label = Some("Backend Engineer".to_string());
        doc.basics.email = Some("ada@example.com".to_string());
        doc.set_summary("Backend engineer focused on payment systems.");
        let work = doc.add_work("Acme", "Senior Engineer");
        doc.work[0].start_date = Some("2020-01".to_string());
        doc.add_work_highlight(work, "Reduced p99 latency by 40%").unwrap();
        doc.add_skill("Languages", vec!["Rust".to_string(), "Go".to_string()]);
        doc.add_education("State University");
        doc
    }

    #[test]
    fn test_every_template_includes_all_units() {
        let doc = document();
        for template in TemplateId::ALL {
            let rendered = TextRenderer.render(&doc, template);
            assert_eq!(rendered.template, template);
            for unit in doc.content_units() {
                assert!(rendered.body.contains(&unit.text), "{template:?} lost {}", unit.text);
            }
        }
    }

    #[test]
    fn test_template_styles_differ() {
        let doc = document();
        let modern = TextRenderer.render(&doc, TemplateId::Modern).body;
        let classic = TextRenderer.render(&doc, TemplateId::Classic).body;
        let executive = TextRenderer.render(&doc, TemplateId::Executive).body;
        assert!(modern.starts_with("# Ada Lovelace"));
        assert!(modern.find("## Skills") < modern.find("## Experience"));
        assert!(classic.starts_with("ADA LOVELACE"));
        assert!(classic.contains("Senior Engineer, Acme, January 2020 - Present"));
        assert!(executive.contains("## Core Competencies\nRust · Go"));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("2021-09-15")), "September 2021");
        assert_eq!(format_date(Some("2019")), "2019");
        assert_eq!(format_date(None), "Present");
    }
}
