//! Style roles, running header/footer blocks and render spacing.
//!
//! All three are frequency votes over the whole corpus. Ties are broken
//! deterministically: style names and spacing values by their natural
//! order, running blocks by first appearance.

use std::collections::BTreeMap;

use fingerprint::FingerprintedDocument;
use ingest::{heading_level_from_style, DocumentProfile, ParagraphRecord};
use serde::{Deserialize, Serialize};

use crate::config::MinerConfig;

/// Fallback `spacing_after` for headings, in points.
pub const DEFAULT_SPACING_AFTER_HEADING: f64 = 12.0;
/// Fallback `spacing_after` for body paragraphs, in points.
pub const DEFAULT_SPACING_AFTER_PARAGRAPH: f64 = 6.0;

/// Semantic role a paragraph style plays in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StyleRole {
    H1,
    H2,
    H3,
    Body,
    Bullet,
    Title,
}

impl StyleRole {
    pub const ALL: [StyleRole; 6] = [
        StyleRole::H1,
        StyleRole::H2,
        StyleRole::H3,
        StyleRole::Body,
        StyleRole::Bullet,
        StyleRole::Title,
    ];

    /// Style used when the corpus shows no paragraph in this role.
    pub fn default_style(self) -> &'static str {
        match self {
            StyleRole::H1 => "Heading 1",
            StyleRole::H2 => "Heading 2",
            StyleRole::H3 => "Heading 3",
            StyleRole::Body => "Normal",
            StyleRole::Bullet => "List Bullet",
            StyleRole::Title => "Title",
        }
    }

    fn for_heading_level(level: u8) -> Option<StyleRole> {
        match level {
            1 => Some(StyleRole::H1),
            2 => Some(StyleRole::H2),
            3 => Some(StyleRole::H3),
            _ => None,
        }
    }
}

/// `role -> style name`, one entry per [`StyleRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleRoleMap(BTreeMap<StyleRole, String>);

impl StyleRoleMap {
    pub fn get(&self, role: StyleRole) -> &str {
        self.0
            .get(&role)
            .map_or(role.default_style(), String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleRole, &str)> {
        self.0.iter().map(|(role, style)| (*role, style.as_str()))
    }
}

impl Default for StyleRoleMap {
    fn default() -> Self {
        Self(
            StyleRole::ALL
                .iter()
                .map(|role| (*role, role.default_style().to_string()))
                .collect(),
        )
    }
}

/// A header or footer text block shared by the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBlock {
    /// Most frequent block, empty if no document has one.
    pub content: String,
    /// Distinct blocks, first-seen order, bounded.
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRules {
    pub spacing_after_heading: f64,
    pub spacing_after_paragraph: f64,
    pub blank_line_before_section: bool,
}

impl Default for RenderRules {
    fn default() -> Self {
        Self {
            spacing_after_heading: DEFAULT_SPACING_AFTER_HEADING,
            spacing_after_paragraph: DEFAULT_SPACING_AFTER_PARAGRAPH,
            blank_line_before_section: true,
        }
    }
}

/// A heading-styled paragraph: `Heading N`/`Überschrift N`, `Title`,
/// `Subtitle`, or any paragraph carrying an outline level.
pub fn is_heading_like(record: &ParagraphRecord) -> bool {
    let style = record.style_name.as_str();
    style.contains("Heading")
        || style.contains("Überschrift")
        || style == "Title"
        || style == "Subtitle"
        || record.outline_level.is_some()
}

/// Non-heading, non-list paragraph long enough to count as running text.
fn is_body(record: &ParagraphRecord, cfg: &MinerConfig) -> bool {
    !is_heading_like(record)
        && !record.is_list
        && record.text.trim().chars().count() > cfg.body_min_length
}

fn role_of(record: &ParagraphRecord, cfg: &MinerConfig) -> Option<StyleRole> {
    if is_heading_like(record) {
        if record.style_name == "Title" {
            return Some(StyleRole::Title);
        }
        let level = record
            .outline_level
            .or_else(|| heading_level_from_style(&record.style_name))?;
        return StyleRole::for_heading_level(level);
    }
    if record.is_list {
        return Some(StyleRole::Bullet);
    }
    is_body(record, cfg).then_some(StyleRole::Body)
}

/// Most frequent key; ties go to the smallest key.
fn most_frequent<K: Ord + Clone>(counts: &BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(&K, usize)> = None;
    for (key, count) in counts {
        if best.is_none_or(|(_, best_count)| *count > best_count) {
            best = Some((key, *count));
        }
    }
    best.map(|(key, _)| key.clone())
}

fn profiles(documents: &[FingerprintedDocument]) -> impl Iterator<Item = &DocumentProfile> {
    documents.iter().map(|doc| &doc.profile)
}

fn paragraphs(documents: &[FingerprintedDocument]) -> impl Iterator<Item = &ParagraphRecord> {
    profiles(documents)
        .flat_map(|profile| profile.paragraphs.iter())
        .filter(|record| !record.is_blank())
}

/// Pick the most used style name for every role.
pub fn extract_style_roles(documents: &[FingerprintedDocument], cfg: &MinerConfig) -> StyleRoleMap {
    let mut tallies: BTreeMap<StyleRole, BTreeMap<String, usize>> = BTreeMap::new();
    for record in paragraphs(documents) {
        if let Some(role) = role_of(record, cfg) {
            *tallies
                .entry(role)
                .or_default()
                .entry(record.style_name.clone())
                .or_default() += 1;
        }
    }

    let mut roles = StyleRoleMap::default();
    for (role, counts) in &tallies {
        if let Some(style) = most_frequent(counts) {
            roles.0.insert(*role, style);
        }
    }
    roles
}

/// Running block voted from one header/footer list per document.
pub fn extract_running_block<'a, F>(
    documents: &'a [FingerprintedDocument],
    blocks_of: F,
    variant_limit: usize,
) -> RunningBlock
where
    F: Fn(&'a DocumentProfile) -> &'a [String],
{
    // First-seen order doubles as the tie breaker.
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for profile in profiles(documents) {
        for block in blocks_of(profile) {
            match seen.iter_mut().find(|(text, _)| *text == block.as_str()) {
                Some((_, count)) => *count += 1,
                None => seen.push((block.as_str(), 1)),
            }
        }
    }

    let mut content: Option<(&str, usize)> = None;
    for (text, count) in &seen {
        if content.is_none_or(|(_, best)| *count > best) {
            content = Some((*text, *count));
        }
    }

    RunningBlock {
        content: content.map(|(text, _)| text.to_string()).unwrap_or_default(),
        variants: seen
            .iter()
            .take(variant_limit)
            .map(|(text, _)| text.to_string())
            .collect(),
    }
}

pub fn extract_header(documents: &[FingerprintedDocument], cfg: &MinerConfig) -> RunningBlock {
    extract_running_block(documents, |p| p.headers.as_slice(), cfg.variant_limit)
}

pub fn extract_footer(documents: &[FingerprintedDocument], cfg: &MinerConfig) -> RunningBlock {
    extract_running_block(documents, |p| p.footers.as_slice(), cfg.variant_limit)
}

/// Most frequent observed `spacing_after` of headings and of body text.
pub fn extract_render_rules(documents: &[FingerprintedDocument], cfg: &MinerConfig) -> RenderRules {
    // Keyed on whole twips so equal spacings compare equal.
    let mut heading: BTreeMap<i64, usize> = BTreeMap::new();
    let mut body: BTreeMap<i64, usize> = BTreeMap::new();
    for record in paragraphs(documents) {
        let Some(after) = record.spacing_after else {
            continue;
        };
        let twips = (after * 20.0).round() as i64;
        if is_heading_like(record) {
            *heading.entry(twips).or_default() += 1;
        } else if is_body(record, cfg) {
            *body.entry(twips).or_default() += 1;
        }
    }

    let points = |twips: i64| twips as f64 / 20.0;
    RenderRules {
        spacing_after_heading: most_frequent(&heading)
            .map_or(DEFAULT_SPACING_AFTER_HEADING, points),
        spacing_after_paragraph: most_frequent(&body)
            .map_or(DEFAULT_SPACING_AFTER_PARAGRAPH, points),
        blank_line_before_section: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::profile_doc;

    fn record(text: &str, style: &str) -> ParagraphRecord {
        ParagraphRecord::new(text, style)
    }

    fn with_blocks(
        name: &str,
        paragraphs: Vec<ParagraphRecord>,
        headers: &[&str],
        footers: &[&str],
    ) -> FingerprintedDocument {
        profile_doc(DocumentProfile::new(
            name,
            "",
            paragraphs,
            headers.iter().map(|s| s.to_string()).collect(),
            footers.iter().map(|s| s.to_string()).collect(),
        ))
    }

    const BODY: &str = "Der Proband berichtet über anhaltende Beschwerden.";

    #[test]
    fn roles_follow_usage() {
        let mut bullet = record("Ibuprofen 400 mg", "Aufzählung");
        bullet.is_list = true;
        let mut outlined = record("Verlauf", "Gliederung");
        outlined.outline_level = Some(2);
        let docs = vec![
            with_blocks(
                "a",
                vec![
                    record("GUTACHTEN", "Title"),
                    record("ANAMNESE", "Überschrift 1"),
                    record(BODY, "Textkörper"),
                    record(BODY, "Textkörper"),
                    record(BODY, "Normal"),
                    bullet,
                    outlined,
                ],
                &[],
                &[],
            ),
            with_blocks(
                "b",
                vec![
                    record("BEFUND", "Heading 1"),
                    record("BEFUND", "Überschrift 1"),
                ],
                &[],
                &[],
            ),
        ];

        let roles = extract_style_roles(&docs, &MinerConfig::default());
        assert_eq!(roles.get(StyleRole::H1), "Überschrift 1");
        assert_eq!(roles.get(StyleRole::H2), "Gliederung");
        assert_eq!(roles.get(StyleRole::H3), "Heading 3");
        assert_eq!(roles.get(StyleRole::Body), "Textkörper");
        assert_eq!(roles.get(StyleRole::Bullet), "Aufzählung");
        assert_eq!(roles.get(StyleRole::Title), "Title");
    }

    #[test]
    fn short_paragraphs_do_not_vote_for_body() {
        let docs = vec![
            with_blocks("a", vec![record("Kurz.", "Kurztext"), record(BODY, "Normal")], &[], &[]),
            with_blocks("b", vec![record("Auch kurz.", "Kurztext")], &[], &[]),
        ];
        let roles = extract_style_roles(&docs, &MinerConfig::default());
        assert_eq!(roles.get(StyleRole::Body), "Normal");
    }

    #[test]
    fn ties_pick_smallest_style_name() {
        let mut kapitel = record("Vorgeschichte", "Kapitel");
        kapitel.outline_level = Some(1);
        let mut abschnitt = record("Befund", "Abschnitt");
        abschnitt.outline_level = Some(1);
        let docs = vec![
            with_blocks("a", vec![kapitel], &[], &[]),
            with_blocks("b", vec![abschnitt], &[], &[]),
        ];
        let roles = extract_style_roles(&docs, &MinerConfig::default());
        assert_eq!(roles.get(StyleRole::H1), "Abschnitt");
    }

    #[test]
    fn role_map_serializes_in_role_order() {
        let json = serde_json::to_string(&StyleRoleMap::default()).expect("json");
        assert_eq!(
            json,
            r#"{"H1":"Heading 1","H2":"Heading 2","H3":"Heading 3","BODY":"Normal","BULLET":"List Bullet","TITLE":"Title"}"#
        );
    }

    #[test]
    fn header_vote_and_variants() {
        let docs = vec![
            with_blocks("a", vec![], &["Praxis Dr. Berg"], &["Seite"]),
            with_blocks("b", vec![], &["Praxis Dr. Berg\nNeurologie"], &[]),
            with_blocks("c", vec![], &["Praxis Dr. Berg\nNeurologie"], &[]),
        ];
        let cfg = MinerConfig::default();
        let header = extract_header(&docs, &cfg);
        assert_eq!(header.content, "Praxis Dr. Berg\nNeurologie");
        assert_eq!(
            header.variants,
            vec!["Praxis Dr. Berg".to_string(), "Praxis Dr. Berg\nNeurologie".to_string()]
        );
        assert_eq!(extract_footer(&docs, &cfg).content, "Seite");
    }

    #[test]
    fn missing_blocks_give_empty_content() {
        let docs = vec![with_blocks("a", vec![], &[], &[]), with_blocks("b", vec![], &[], &[])];
        assert_eq!(extract_header(&docs, &MinerConfig::default()), RunningBlock::default());
    }

    #[test]
    fn header_ties_keep_first_seen() {
        let docs = vec![
            with_blocks("a", vec![], &["Erster"], &[]),
            with_blocks("b", vec![], &["Zweiter"], &[]),
        ];
        assert_eq!(extract_header(&docs, &MinerConfig::default()).content, "Erster");
    }

    #[test]
    fn render_rules_from_observed_spacing() {
        let mut heading = record("ANAMNESE", "Heading 1");
        heading.spacing_after = Some(18.0);
        let mut body = record(BODY, "Normal");
        body.spacing_after = Some(8.0);
        let docs = vec![
            with_blocks("a", vec![heading.clone(), body.clone()], &[], &[]),
            with_blocks("b", vec![heading, body], &[], &[]),
        ];
        let rules = extract_render_rules(&docs, &MinerConfig::default());
        assert_eq!(rules.spacing_after_heading, 18.0);
        assert_eq!(rules.spacing_after_paragraph, 8.0);

        let bare = vec![
            with_blocks("a", vec![record("ANAMNESE", "Heading 1")], &[], &[]),
            with_blocks("b", vec![record(BODY, "Normal")], &[], &[]),
        ];
        assert_eq!(extract_render_rules(&bare, &MinerConfig::default()), RenderRules::default());
    }
}
