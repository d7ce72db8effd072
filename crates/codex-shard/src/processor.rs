//! Fragment processing.
//!
//! Each fragment is rewritten on its own according to its type tag; output
//! order and length always match the input.

use serde::{Deserialize, Serialize};

pub const MIRROR_CLAIM_TYPE: &str = "mirror_claim";
pub const RITUAL_TYPE: &str = "ritual";

pub const MIRROR_CLAIM_MARKER: &str = "🪞 SHATTERED: ";
pub const RITUAL_MARKER: &str = "🜁 SEALED: ";

pub const MIRROR_CLAIM_FACTOR: f64 = 0.1;
pub const RITUAL_FACTOR: f64 = 2.0;

pub const SHARD_SIGNATURE: &str = "FRAGMENT_PROCESSED_🜁";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub content: String,
    pub fragment_type: String,
    #[serde(default = "default_weight")]
    pub ritual_weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Fragment {
    pub fn new(content: impl Into<String>, fragment_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            fragment_type: fragment_type.into(),
            ritual_weight: default_weight(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.ritual_weight = weight;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFragment {
    pub original: String,
    pub processed: String,
    pub ritual_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardResponse {
    pub processed_fragments: Vec<ProcessedFragment>,
    pub shard_signature: String,
    pub echo_count: usize,
}

pub fn process_fragment(fragment: Fragment) -> ProcessedFragment {
    let (marker, factor) = match fragment.fragment_type.as_str() {
        MIRROR_CLAIM_TYPE => (MIRROR_CLAIM_MARKER, MIRROR_CLAIM_FACTOR),
        RITUAL_TYPE => (RITUAL_MARKER, RITUAL_FACTOR),
        _ => {
            return ProcessedFragment {
                processed: fragment.content.clone(),
                original: fragment.content,
                ritual_weight: fragment.ritual_weight,
            };
        }
    };

    ProcessedFragment {
        processed: format!("{marker}{}", fragment.content),
        original: fragment.content,
        ritual_weight: fragment.ritual_weight * factor,
    }
}

pub fn process_fragments(fragments: Vec<Fragment>) -> ShardResponse {
    let processed_fragments: Vec<_> = fragments.into_iter().map(process_fragment).collect();
    ShardResponse {
        echo_count: processed_fragments.len(),
        processed_fragments,
        shard_signature: SHARD_SIGNATURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ritual_fragment_is_sealed_and_doubled() {
        let resp = process_fragments(vec![Fragment::new("hello", "ritual")]);

        assert_eq!(resp.echo_count, 1);
        assert_eq!(resp.shard_signature, "FRAGMENT_PROCESSED_🜁");
        assert_eq!(
            resp.processed_fragments,
            vec![ProcessedFragment {
                original: "hello".to_string(),
                processed: "🜁 SEALED: hello".to_string(),
                ritual_weight: 2.0,
            }]
        );
    }

    #[test]
    fn mirror_claim_is_shattered_and_diminished() {
        let out = process_fragment(Fragment::new("i made you", "mirror_claim").with_weight(5.0));
        assert_eq!(out.processed, "🪞 SHATTERED: i made you");
        assert!(approx(out.ritual_weight, 0.5));
    }

    #[test]
    fn other_types_pass_through() {
        let out = process_fragment(Fragment::new("plain", "note").with_weight(3.25));
        assert_eq!(out.processed, "plain");
        assert_eq!(out.original, "plain");
        assert!(approx(out.ritual_weight, 3.25));
    }

    #[test]
    fn order_and_length_are_preserved() {
        let input = vec![
            Fragment::new("a", "ritual"),
            Fragment::new("b", "mirror_claim"),
            Fragment::new("c", "other"),
            Fragment::new("d", "ritual"),
        ];
        let resp = process_fragments(input);

        let originals: Vec<_> = resp.processed_fragments.iter().map(|f| f.original.as_str()).collect();
        assert_eq!(originals, ["a", "b", "c", "d"]);
        assert_eq!(resp.echo_count, 4);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let resp = process_fragments(Vec::new());
        assert!(resp.processed_fragments.is_empty());
        assert_eq!(resp.echo_count, 0);
    }

    #[test]
    fn weight_defaults_to_one() {
        let frag: Fragment =
            serde_json::from_str(r#"{"content": "x", "fragment_type": "ritual"}"#).unwrap();
        assert!(approx(frag.ritual_weight, 1.0));
    }
}
