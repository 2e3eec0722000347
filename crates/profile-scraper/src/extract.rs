//! Structured extraction of doctor profile pages
//!
//! Parsing is pure: [`Extractor::extract_page`] turns page HTML into an
//! [`ExtractionResult`] plus the owner token of the "load more FAQs" button.
//! The only I/O is the optional secondary FAQ request made through a
//! [`FaqSource`] in [`Extractor::extract`]; its failure is logged and the page
//! FAQs are kept as they are.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::schema::{BlogSpec, ExtractionSchema, FaqSpec, FieldSpec, SectionSpec};
use crate::text::{clean_text, NOT_FOUND};

// Extraction Output
// =================

/// A labelled value; missing elements carry [`NOT_FOUND`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
  pub label: &'static str,
  pub value: String,
}

/// One entry of a repeatable section, fields in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
  pub fields: Vec<Field>,
}

impl Record {
  pub fn get(&self, label: &str) -> Option<&str> {
    self.fields.iter().find(|f| f.label == label).map(|f| f.value.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faq {
  pub question: String,
  pub answer: String,
}

impl Faq {
  pub const QUESTION_LABEL: &'static str = "Faq Question";
  pub const ANSWER_LABEL: &'static str = "Faq Answer";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blog {
  pub title: String,
  pub date: String,
  /// Absolute URL of the article
  pub url: String,
}

impl Blog {
  pub const TITLE_LABEL: &'static str = "Blog Title";
  pub const DATE_LABEL: &'static str = "Blog Date";
  pub const URL_LABEL: &'static str = "Blog Url";
}

/// Everything pulled out of one profile page. Every section is always present;
/// incomplete pages yield placeholders and empty lists, never errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
  pub doctor_info: Vec<Field>,
  pub testimonials: Vec<Record>,
  pub areas_of_expertise: Vec<Record>,
  pub faqs: Vec<Faq>,
  pub blogs: Vec<Blog>,
  pub clinics: Vec<Record>,
}

/// Result of the pure parsing phase
#[derive(Debug, Clone)]
pub struct PageExtraction {
  pub result: ExtractionResult,
  /// Username embedded in the "load more FAQs" button, if the page has one
  pub faq_owner: Option<String>,
}

// FAQ Source
// ==========

/// Secondary source for the FAQs hidden behind the "load more" button
#[async_trait]
pub trait FaqSource: Send + Sync {
  /// Return the HTML fragment listing every FAQ of `owner`
  async fn fetch_faq_fragment(&self, owner: &str) -> Result<String>;
}

// Compiled Schema
// ===============

fn class_selector(token: &str) -> Result<Selector> {
  css_selector(&format!(".{token}"), token)
}

fn css_selector(css: &str, token: &str) -> Result<Selector> {
  Selector::parse(css)
    .map_err(|e| ScrapeError::Selector { token: token.to_string(), message: e.to_string() })
}

fn compile_fields(fields: &[FieldSpec]) -> Result<Vec<(&'static str, Selector)>> {
  fields.iter().map(|f| Ok((f.label, class_selector(f.class)?))).collect()
}

/// Text of the first descendant of `scope` matching `selector`, or the placeholder
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
  scope
    .select(selector)
    .next()
    .map(|el| clean_text(&el.text().collect::<String>()))
    .unwrap_or_else(|| NOT_FOUND.to_string())
}

struct CompiledSection {
  wrapper: Selector,
  fields: Vec<(&'static str, Selector)>,
}

impl CompiledSection {
  fn compile(section: &SectionSpec) -> Result<Self> {
    Ok(Self { wrapper: class_selector(section.wrapper)?, fields: compile_fields(section.fields)? })
  }

  fn extract(&self, root: ElementRef<'_>) -> Vec<Record> {
    root
      .select(&self.wrapper)
      .map(|wrapper| Record {
        fields: self
          .fields
          .iter()
          .map(|&(label, ref selector)| Field { label, value: first_text(wrapper, selector) })
          .collect(),
      })
      .collect()
  }
}

struct CompiledFaq {
  inline_wrapper: Selector,
  fragment_wrapper: Selector,
  question: Selector,
  answer: Selector,
  paragraph: Selector,
  load_more: Selector,
  owner_attribute: &'static str,
}

impl CompiledFaq {
  fn compile(faq: &FaqSpec) -> Result<Self> {
    Ok(Self {
      inline_wrapper: class_selector(faq.wrapper)?,
      fragment_wrapper: css_selector(&format!("div.{}", faq.wrapper), faq.wrapper)?,
      question: class_selector(faq.question)?,
      answer: class_selector(faq.answer)?,
      paragraph: css_selector("p", "p")?,
      load_more: css_selector(&format!("button.{}", faq.load_more), faq.load_more)?,
      owner_attribute: faq.owner_attribute,
    })
  }

  fn inline(&self, root: ElementRef<'_>) -> Vec<Faq> {
    root
      .select(&self.inline_wrapper)
      .map(|wrapper| Faq {
        question: first_text(wrapper, &self.question),
        answer: first_text(wrapper, &self.answer),
      })
      .collect()
  }

  fn owner(&self, root: ElementRef<'_>) -> Option<String> {
    root
      .select(&self.load_more)
      .next()
      .and_then(|button| button.value().attr(self.owner_attribute))
      .map(str::trim)
      .filter(|owner| !owner.is_empty())
      .map(str::to_string)
  }

  /// Loaded FAQ blocks must carry both parts; the answer is the joined text of
  /// its paragraphs, or its whole text when it has none
  fn fragment(&self, root: ElementRef<'_>) -> Vec<Faq> {
    let mut faqs = Vec::new();

    for wrapper in root.select(&self.fragment_wrapper) {
      let (Some(question), Some(answer)) =
        (wrapper.select(&self.question).next(), wrapper.select(&self.answer).next())
      else {
        continue;
      };

      let paragraphs: Vec<String> =
        answer.select(&self.paragraph).map(|p| clean_text(&p.text().collect::<String>())).collect();
      let answer = if paragraphs.is_empty() {
        clean_text(&answer.text().collect::<String>())
      } else {
        paragraphs.join(" ")
      };

      faqs.push(Faq { question: clean_text(&question.text().collect::<String>()), answer });
    }

    faqs
  }
}

struct CompiledBlog {
  wrapper: Selector,
  title: Selector,
  date: Selector,
  link: Selector,
}

impl CompiledBlog {
  fn compile(blog: &BlogSpec) -> Result<Self> {
    Ok(Self {
      wrapper: class_selector(blog.wrapper)?,
      title: class_selector(blog.title)?,
      date: class_selector(blog.date)?,
      link: css_selector("a", "a")?,
    })
  }

  /// Cards without a resolvable link, or repeating an earlier link, are dropped
  fn extract(&self, root: ElementRef<'_>, base_url: &Url) -> Vec<Blog> {
    let mut seen = HashSet::new();
    let mut blogs = Vec::new();

    for card in root.select(&self.wrapper) {
      let href = card
        .select(&self.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

      let Some(url) = href.and_then(|href| base_url.join(href).ok()) else {
        continue;
      };

      if !seen.insert(url.to_string()) {
        continue;
      }

      blogs.push(Blog {
        title: first_text(card, &self.title),
        date: first_text(card, &self.date),
        url: url.into(),
      });
    }

    blogs
  }
}

// Extractor
// =========

/// Compiled extraction schema bound to the site's base URL
pub struct Extractor {
  doctor_info: Vec<(&'static str, Selector)>,
  testimonials: CompiledSection,
  expertise: CompiledSection,
  faq: CompiledFaq,
  blogs: CompiledBlog,
  clinics: CompiledSection,
  base_url: Url,
}

impl Extractor {
  pub fn new(schema: &ExtractionSchema, base_url: Url) -> Result<Self> {
    Ok(Self {
      doctor_info: compile_fields(schema.doctor_info)?,
      testimonials: CompiledSection::compile(&schema.testimonials)?,
      expertise: CompiledSection::compile(&schema.expertise)?,
      faq: CompiledFaq::compile(&schema.faq)?,
      blogs: CompiledBlog::compile(&schema.blogs)?,
      clinics: CompiledSection::compile(&schema.clinics)?,
      base_url,
    })
  }

  /// Parse a full profile page without touching the network
  pub fn extract_page(&self, html: &str) -> PageExtraction {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let doctor_info = self
      .doctor_info
      .iter()
      .map(|&(label, ref selector)| Field { label, value: first_text(root, selector) })
      .collect();

    let mut faqs = Vec::new();
    merge_faqs(&mut faqs, self.faq.inline(root));

    let result = ExtractionResult {
      doctor_info,
      testimonials: self.testimonials.extract(root),
      areas_of_expertise: self.expertise.extract(root),
      faqs,
      blogs: self.blogs.extract(root, &self.base_url),
      clinics: self.clinics.extract(root),
    };

    PageExtraction { result, faq_owner: self.faq.owner(root) }
  }

  /// Parse the HTML fragment returned by the FAQ endpoint
  pub fn parse_faq_fragment(&self, html: &str) -> Vec<Faq> {
    let fragment = Html::parse_fragment(html);
    self.faq.fragment(fragment.root_element())
  }

  /// Parse a page and merge in the FAQs behind its "load more" button
  pub async fn extract<S>(&self, html: &str, source: &S) -> ExtractionResult
  where
    S: FaqSource + ?Sized,
  {
    let PageExtraction { mut result, faq_owner } = self.extract_page(html);

    let Some(owner) = faq_owner else {
      debug!("No FAQ load button found");
      return result;
    };

    match source.fetch_faq_fragment(&owner).await {
      Ok(fragment) => {
        let added = merge_faqs(&mut result.faqs, self.parse_faq_fragment(&fragment));
        debug!(owner = %owner, added, "Merged additional FAQs");
      }
      Err(e) => {
        warn!(owner = %owner, error = %e, "Error fetching FAQs, keeping inline FAQs only");
      }
    }

    result
  }
}

/// Append FAQs whose question text (exact, case-sensitive) is not present yet.
/// Returns how many were added.
pub fn merge_faqs(existing: &mut Vec<Faq>, incoming: impl IntoIterator<Item = Faq>) -> usize {
  let mut seen: HashSet<String> = existing.iter().map(|faq| faq.question.clone()).collect();
  let before = existing.len();

  for faq in incoming {
    if seen.insert(faq.question.clone()) {
      existing.push(faq);
    }
  }

  existing.len() - before
}
