//! Plain-text rendering of an [`ExtractionResult`]
//!
//! The output is both the persisted document and the language-model context,
//! so the layout is fixed: a titled section per schema group, a 50-character
//! rule under each title, then numbered entries separated by 20-character
//! rules. Field labels are rendered in title case.

use crate::extract::{Blog, ExtractionResult, Faq, Field, Record};
use crate::text::title_case;

const SECTION_RULE: usize = 50;
const ENTRY_RULE: usize = 20;

/// Render the extraction as the stored document text
pub fn serialize(result: &ExtractionResult) -> String {
  let mut out = String::new();

  section(&mut out, "DOCTOR INFORMATION");
  for field in &result.doctor_info {
    out.push_str(&format!("{}:\n{}\n\n", title_case(field.label), field.value));
  }

  section(&mut out, "TESTIMONIALS");
  records(&mut out, "Testimonial", &result.testimonials);

  section(&mut out, "AREAS OF EXPERTISE");
  records(&mut out, "Area of Expertise", &result.areas_of_expertise);

  section(&mut out, "FAQs");
  for (i, faq) in result.faqs.iter().enumerate() {
    entry(
      &mut out,
      "FAQ",
      i + 1,
      [(Faq::QUESTION_LABEL, faq.question.as_str()), (Faq::ANSWER_LABEL, faq.answer.as_str())],
    );
  }

  section(&mut out, "BLOGS AND ARTICLES");
  for (i, blog) in result.blogs.iter().enumerate() {
    entry(&mut out, "Blog", i + 1, blog_fields(blog));
  }

  section(&mut out, "CLINICS");
  records(&mut out, "Clinic", &result.clinics);

  out
}

// Helper Functions
// ================

fn section(out: &mut String, title: &str) {
  out.push_str(&format!("\n{title}\n{}\n\n", "=".repeat(SECTION_RULE)));
}

fn records(out: &mut String, label: &str, records: &[Record]) {
  for (i, record) in records.iter().enumerate() {
    entry(out, label, i + 1, record.fields.iter().map(|Field { label, value }| (*label, value.as_str())));
  }
}

fn entry<'a>(out: &mut String, label: &str, number: usize, fields: impl IntoIterator<Item = (&'a str, &'a str)>) {
  out.push_str(&format!("{label} #{number}\n{}\n", "-".repeat(ENTRY_RULE)));
  for (key, value) in fields {
    out.push_str(&format!("{}: {value}\n", title_case(key)));
  }
  out.push('\n');
}

fn blog_fields(blog: &Blog) -> [(&'static str, &str); 3] {
  [
    (Blog::TITLE_LABEL, blog.title.as_str()),
    (Blog::DATE_LABEL, blog.date.as_str()),
    (Blog::URL_LABEL, blog.url.as_str()),
  ]
}
