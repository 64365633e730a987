//! AI text backends with ordered fallback.
//!
//! Groq is preferred when configured (lower latency), Gemini second. A
//! backend failure is logged and the next one is tried; only when every
//! backend has failed does the caller see an error. Template generation
//! is the exception: it always degrades to generic section titles.

use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::AppError;
use crate::models::project::DocumentType;

const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.1-8b-instant";
const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One generated outline entry: a section title plus a one-line
/// description the user can hand back as a generation hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutline {
    pub title: String,
    pub description: String,
}

enum TextBackend {
    Groq { api_key: String },
    Gemini { api_key: String },
}

impl TextBackend {
    fn name(&self) -> &'static str {
        match self {
            TextBackend::Groq { .. } => "groq",
            TextBackend::Gemini { .. } => "gemini",
        }
    }
}

pub struct TextProvider {
    client: reqwest::Client,
    backends: Vec<TextBackend>,
}

impl TextProvider {
    /// Build the backend chain from `GROQ_API_KEY` / `GEMINI_API_KEY`.
    /// An empty chain is allowed; generation then fails with a provider
    /// error instead of at startup.
    pub fn from_env() -> Self {
        let mut backends = Vec::new();
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                backends.push(TextBackend::Groq { api_key: key });
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                backends.push(TextBackend::Gemini { api_key: key });
            }
        }
        match backends.first() {
            Some(primary) => info!("primary text backend: {}", primary.name()),
            None => warn!("no text backend configured; generation will fail"),
        }
        TextProvider {
            client: reqwest::Client::new(),
            backends,
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        for backend in &self.backends {
            match self.call(backend, prompt).await {
                Ok(text) => {
                    info!("{} backend ok ({} chars)", backend.name(), text.len());
                    return Ok(text);
                }
                Err(e) => warn!("{} backend failed: {e}", backend.name()),
            }
        }
        Err(AppError::Provider(
            "Unable to generate content: no text backend available".into(),
        ))
    }

    async fn call(&self, backend: &TextBackend, prompt: &str) -> Result<String, String> {
        match backend {
            TextBackend::Groq { api_key } => {
                let body = json!({
                    "model": GROQ_MODEL,
                    "messages": [{"role": "user", "content": prompt}],
                    "temperature": 0.7,
                    "max_tokens": 2000,
                });
                let resp = self
                    .client
                    .post(GROQ_URL)
                    .bearer_auth(api_key)
                    .json(&body)
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| e.to_string())?;
                let v: Value = resp.json().await.map_err(|e| e.to_string())?;
                v["choices"][0]["message"]["content"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| "missing completion text".into())
            }
            TextBackend::Gemini { api_key } => {
                let body = json!({
                    "contents": [{"parts": [{"text": prompt}]}],
                });
                let resp = self
                    .client
                    .post(GEMINI_URL)
                    .query(&[("key", api_key.as_str())])
                    .json(&body)
                    .timeout(REQUEST_TIMEOUT)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| e.to_string())?;
                let v: Value = resp.json().await.map_err(|e| e.to_string())?;
                v["candidates"][0]["content"]["parts"][0]["text"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| "missing completion text".into())
            }
        }
    }

    /// Generate body text for one section. Slide content gets strict word
    /// budgets, looser when there is no image sharing the slide.
    pub async fn generate_content(
        &self,
        section_title: &str,
        main_topic: &str,
        doc_type: DocumentType,
        has_image: bool,
    ) -> Result<String, AppError> {
        let prompt = match doc_type {
            DocumentType::Pptx => {
                let (word_limit, bullet_count, words_per_bullet) = if has_image {
                    ("60-80 words total", "4-5 bullet points", "12-16 words per point")
                } else {
                    ("100-120 words total", "6-7 bullet points", "15-18 words per point")
                };
                format!(
                    "Generate content for a PowerPoint slide about \"{section_title}\" \
                     in the context of \"{main_topic}\".\n\n\
                     CRITICAL REQUIREMENTS:\n\
                     - Total content: {word_limit}\n\
                     - Number of points: {bullet_count}\n\
                     - Length per point: {words_per_bullet}\n\
                     - Each bullet point must be ONE sentence only\n\
                     - Use simple, clear language\n\
                     - NO markdown formatting (no **, *, etc.)\n\
                     - NO headers like \"Slide Title:\" or \"Key Points:\"\n\
                     - Start each line with a simple dash (-)\n\n\
                     Format example:\n\
                     - First key point in one clear sentence\n\
                     - Second important point briefly stated\n\
                     - Third relevant detail concisely\n\n\
                     Generate ONLY the bullet points, nothing else."
                )
            }
            DocumentType::Docx => format!(
                "Generate detailed content for a Word document section with the following details:\n\
                 Main Topic: {main_topic}\n\
                 Section Title: {section_title}\n\n\
                 CRITICAL REQUIREMENTS:\n\
                 - DO NOT repeat the section title in the content\n\
                 - Start directly with the content paragraphs\n\
                 - Provide well-structured, professional content with 2-3 paragraphs\n\
                 - Make it informative and business-appropriate\n\
                 - NO headers or titles in the content\n\
                 - Just the body text\n\n\
                 Generate ONLY the content paragraphs, nothing else."
            ),
        };
        self.complete(&prompt).await
    }

    /// Rework existing content per a user instruction, preserving the
    /// format the document type expects.
    pub async fn refine_content(
        &self,
        current_content: &str,
        refinement_prompt: &str,
        doc_type: DocumentType,
    ) -> Result<String, AppError> {
        let format_hint = match doc_type {
            DocumentType::Pptx => "bullet points for slides",
            DocumentType::Docx => "paragraphs for document",
        };
        let prompt = format!(
            "Current content:\n{current_content}\n\n\
             User refinement request: {refinement_prompt}\n\n\
             Please modify the content according to the user's request. \n\
             Maintain the same format and style ({format_hint})."
        );
        self.complete(&prompt).await
    }

    /// Propose section titles for a topic. Never errors: unparseable or
    /// unavailable output degrades to generic numbered placeholders.
    pub async fn generate_template(
        &self,
        main_topic: &str,
        doc_type: DocumentType,
        num_sections: Option<usize>,
    ) -> Vec<SectionOutline> {
        let (num, unit) = match doc_type {
            DocumentType::Pptx => (num_sections.unwrap_or(8), "PowerPoint slide titles"),
            DocumentType::Docx => (num_sections.unwrap_or(5), "Word document section headings"),
        };
        let (ex_title1, ex_desc1, ex_title2, ex_desc2, unit_word) = match doc_type {
            DocumentType::Pptx => (
                "Introduction to AI",
                "Overview of artificial intelligence and its impact on modern business",
                "Current Applications",
                "Real-world examples of AI in various industries",
                "slides",
            ),
            DocumentType::Docx => (
                "Introduction",
                "Background information and overview of the main topic",
                "Methodology",
                "Research approach and data collection methods",
                "sections",
            ),
        };
        let prompt = format!(
            "Create {num} {unit} with descriptions for: {main_topic}\n\n\
             Use this exact format for each item (no extra text):\n\n\
             TITLE: {ex_title1}\n\
             DESC: {ex_desc1}\n\n\
             TITLE: {ex_title2}\n\
             DESC: {ex_desc2}\n\n\
             Now create {num} {unit_word} following this format exactly. \
             Start immediately with \"TITLE:\" - no introduction or explanation."
        );

        match self.complete(&prompt).await {
            Ok(raw) => parse_outline(&raw, num),
            Err(e) => {
                warn!("template generation unavailable, using placeholders: {e}");
                fallback_outline(num)
            }
        }
    }
}

/// Parse `TITLE:`/`DESC:` pairs, ignoring any preamble before the first
/// `TITLE:`. When nothing parses, plain non-boilerplate lines become bare
/// titles; when even that fails, numbered placeholders.
pub fn parse_outline(raw: &str, num: usize) -> Vec<SectionOutline> {
    let mut outlines = Vec::new();
    let mut current: Option<SectionOutline> = None;
    let mut seen_title = false;

    for line in raw.lines() {
        let line = line.trim();
        if !seen_title && !line.starts_with("TITLE:") {
            continue;
        }
        if let Some(title) = line.strip_prefix("TITLE:") {
            seen_title = true;
            if let Some(entry) = current.take() {
                outlines.push(entry);
            }
            current = Some(SectionOutline {
                title: title.trim().to_string(),
                description: String::new(),
            });
        } else if let Some(desc) = line.strip_prefix("DESC:") {
            if let Some(entry) = current.as_mut() {
                entry.description = desc.trim().to_string();
            }
        }
    }
    if let Some(entry) = current.take() {
        outlines.push(entry);
    }

    if outlines.is_empty() {
        outlines = raw
            .lines()
            .map(str::trim)
            .filter(|l| {
                !l.is_empty()
                    && !l.starts_with("TITLE:")
                    && !l.starts_with("DESC:")
                    && !l.starts_with("Here")
                    && !l.starts_with("Generate")
                    && !l.starts_with("Create")
            })
            .take(num)
            .map(|title| SectionOutline {
                title: title.to_string(),
                description: String::new(),
            })
            .collect();
    }
    if outlines.is_empty() {
        return fallback_outline(num);
    }
    outlines.truncate(num);
    outlines
}

fn fallback_outline(num: usize) -> Vec<SectionOutline> {
    (1..=num)
        .map(|i| SectionOutline {
            title: format!("Section {i}"),
            description: String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_parses_title_desc_pairs() {
        let raw = "Sure, here you go:\n\n\
                   TITLE: Introduction\nDESC: What this covers\n\n\
                   TITLE: Deep Dive\nDESC: The details\n";
        let outlines = parse_outline(raw, 5);
        assert_eq!(outlines.len(), 2);
        assert_eq!(outlines[0].title, "Introduction");
        assert_eq!(outlines[0].description, "What this covers");
        assert_eq!(outlines[1].title, "Deep Dive");
    }

    #[test]
    fn outline_truncates_to_requested_count() {
        let raw = "TITLE: A\nTITLE: B\nTITLE: C\nTITLE: D\n";
        assert_eq!(parse_outline(raw, 2).len(), 2);
    }

    #[test]
    fn outline_falls_back_to_bare_lines() {
        let raw = "Here are your sections:\nMarket Overview\nCompetitive Landscape\n";
        let outlines = parse_outline(raw, 5);
        assert_eq!(outlines.len(), 2);
        assert_eq!(outlines[0].title, "Market Overview");
        assert!(outlines[0].description.is_empty());
    }

    #[test]
    fn outline_degrades_to_numbered_placeholders() {
        let outlines = parse_outline("", 3);
        assert_eq!(outlines.len(), 3);
        assert_eq!(outlines[0].title, "Section 1");
        assert_eq!(outlines[2].title, "Section 3");
    }

    #[actix_rt::test]
    async fn template_degrades_with_no_backends() {
        let provider = TextProvider {
            client: reqwest::Client::new(),
            backends: Vec::new(),
        };
        let outlines = provider
            .generate_template("anything", DocumentType::Docx, Some(4))
            .await;
        assert_eq!(outlines.len(), 4);
        assert_eq!(outlines[0].title, "Section 1");

        // Content generation, by contrast, surfaces the failure.
        assert!(provider
            .generate_content("Intro", "topic", DocumentType::Docx, true)
            .await
            .is_err());
    }
}
