//! Ordered template skeleton: a heading node then a content slot per
//! retained anchor.

use serde::{Deserialize, Serialize};

use crate::anchor::Anchor;
use crate::config::MinerConfig;
use crate::style::StyleRole;

/// Content styles a slot accepts.
pub const SLOT_CONTENT_STYLES: [StyleRole; 2] = [StyleRole::Body, StyleRole::Bullet];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListBehavior {
    #[default]
    BulletsAllowed,
}

/// A paragraph reproduced verbatim at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedParagraph {
    pub text: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkeletonNode {
    Fixed {
        id: String,
        paragraphs: Vec<FixedParagraph>,
    },
    Slot {
        slot_id: String,
        section_name: String,
        allowed_content_styles: Vec<StyleRole>,
        list_behavior: ListBehavior,
        optional: bool,
    },
}

impl SkeletonNode {
    pub fn is_slot(&self) -> bool {
        matches!(self, SkeletonNode::Slot { .. })
    }

    /// `id` of a fixed node, `slot_id` of a slot.
    pub fn id(&self) -> &str {
        match self {
            SkeletonNode::Fixed { id, .. } => id,
            SkeletonNode::Slot { slot_id, .. } => slot_id,
        }
    }
}

/// Build the skeleton from anchors already in canonical order.
pub fn build_skeleton(anchors: &[Anchor], cfg: &MinerConfig) -> Vec<SkeletonNode> {
    let mut nodes = Vec::with_capacity(anchors.len() * 2);
    for anchor in anchors {
        nodes.push(SkeletonNode::Fixed {
            id: format!("{}_heading", anchor.id),
            paragraphs: vec![FixedParagraph {
                text: anchor.heading_text.clone(),
                style: anchor.heading_style.clone(),
            }],
        });
        nodes.push(SkeletonNode::Slot {
            slot_id: format!("{}_body", anchor.id),
            section_name: anchor.canonical_text.clone(),
            allowed_content_styles: SLOT_CONTENT_STYLES.to_vec(),
            list_behavior: ListBehavior::BulletsAllowed,
            optional: anchor.occurrence_rate < cfg.optional_slot_below,
        });
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::MatchMode;

    fn anchor(id: &str, canonical: &str, rate: f64) -> Anchor {
        Anchor {
            id: id.into(),
            canonical_text: canonical.into(),
            match_mode: MatchMode::Fuzzy,
            min_similarity: 0.88,
            occurrence_count: 0,
            occurrence_rate: rate,
            styles_seen: vec!["Heading 1".into()],
            variants_seen: vec![canonical.to_uppercase()],
            heading_text: canonical.to_uppercase(),
            heading_style: "Heading 1".into(),
        }
    }

    #[test]
    fn heading_then_slot_pairs() {
        let anchors = [anchor("anamnese", "Anamnese", 1.0), anchor("epikrise", "Epikrise", 0.6)];
        let nodes = build_skeleton(&anchors, &MinerConfig::default());
        let ids: Vec<&str> = nodes.iter().map(SkeletonNode::id).collect();
        assert_eq!(
            ids,
            vec!["anamnese_heading", "anamnese_body", "epikrise_heading", "epikrise_body"]
        );
        assert!(!nodes[0].is_slot());
        assert!(matches!(&nodes[1], SkeletonNode::Slot { optional: false, .. }));
        assert!(matches!(&nodes[3], SkeletonNode::Slot { optional: true, .. }));
    }

    #[test]
    fn optional_boundary_is_exclusive() {
        let nodes = build_skeleton(&[anchor("a", "A", 0.8)], &MinerConfig::default());
        assert!(matches!(&nodes[1], SkeletonNode::Slot { optional: false, .. }));
    }

    #[test]
    fn serialized_shape() {
        let nodes = build_skeleton(&[anchor("anamnese", "Anamnese", 1.0)], &MinerConfig::default());
        let json = serde_json::to_value(&nodes).expect("json");
        assert_eq!(
            json,
            serde_json::json!([
                {
                    "type": "fixed",
                    "id": "anamnese_heading",
                    "paragraphs": [{"text": "ANAMNESE", "style": "Heading 1"}]
                },
                {
                    "type": "slot",
                    "slot_id": "anamnese_body",
                    "section_name": "Anamnese",
                    "allowed_content_styles": ["BODY", "BULLET"],
                    "list_behavior": "bullets_allowed",
                    "optional": false
                }
            ])
        );
    }

    #[test]
    fn no_anchors_no_nodes() {
        assert!(build_skeleton(&[], &MinerConfig::default()).is_empty());
    }
}
