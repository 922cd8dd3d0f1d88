//! Evidence trail construction
//!
//! Every raised flag records which report produced it, the literal tokens
//! that matched, the threshold compared against, and a short snippet of
//! surrounding report text. Strictly observational: the builder consumes
//! already-computed results and can never alter a flag value.

use crate::types::{AdvisoryFlag, EvidenceEntry, EvidenceTrail, ReportKind};

/// How many characters of context to keep on each side of a matched token
const SNIPPET_CONTEXT: usize = 24;

/// Accumulates evidence entries against the two source report texts
pub struct EvidenceBuilder<'a> {
    metar_text: Option<&'a str>,
    taf_text: Option<&'a str>,
    entries: Vec<EvidenceEntry>,
}

impl<'a> EvidenceBuilder<'a> {
    pub fn new(metar_text: Option<&'a str>, taf_text: Option<&'a str>) -> Self {
        Self {
            metar_text,
            taf_text,
            entries: Vec::new(),
        }
    }

    /// Record one entry. The snippet is cut around the first matched token
    /// when that token can be located in the source text.
    pub fn record(
        &mut self,
        flag: AdvisoryFlag,
        source: ReportKind,
        matched_tokens: Vec<String>,
        threshold_description: impl Into<String>,
    ) {
        let text = match source {
            ReportKind::Metar => self.metar_text,
            ReportKind::Taf => self.taf_text,
        };
        let snippet = text
            .zip(matched_tokens.first())
            .and_then(|(text, token)| snippet_around(text, token));
        self.entries.push(EvidenceEntry {
            flag,
            source_report: source,
            matched_tokens,
            threshold_description: threshold_description.into(),
            snippet,
        });
    }

    pub fn finish(self) -> EvidenceTrail {
        EvidenceTrail(self.entries)
    }
}

/// Cut a short excerpt around the first occurrence of a token,
/// ellipsized where truncated. Returns `None` when the token is not
/// present verbatim in the text.
pub fn snippet_around(text: &str, token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let pos = text.find(token)?;
    let start = floor_char_boundary(text, pos.saturating_sub(SNIPPET_CONTEXT));
    let end = ceil_char_boundary(text, (pos + token.len() + SNIPPET_CONTEXT).min(text.len()));

    let mut snippet = String::new();
    if start > 0 {
        snippet.push('…');
    }
    snippet.push_str(text[start..end].trim());
    if end < text.len() {
        snippet.push('…');
    }
    Some(snippet)
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_centers_on_token() {
        let text = "ENGM 241200Z 27015G25KT 0350 R01L/0250 FZFG VV001 M05/M06 Q1021";
        let s = snippet_around(text, "R01L/0250").unwrap();
        assert!(s.contains("R01L/0250"));
        assert!(s.starts_with('…'));
        assert!(s.ends_with('…'));
        // token near the start: no leading ellipsis
        let s = snippet_around(text, "ENGM").unwrap();
        assert!(!s.starts_with('…'));
        assert!(s.contains("241200Z"));
    }

    #[test]
    fn missing_token_yields_no_snippet() {
        assert_eq!(snippet_around("ENGM 241200Z", "FZFG"), None);
        assert_eq!(snippet_around("ENGM", ""), None);
    }

    #[test]
    fn builder_routes_source_text() {
        let metar = "ENGM 241200Z 0350 FZFG";
        let taf = "TAF ENGM 241100Z 2412/2512 0800 FZFG";
        let mut b = EvidenceBuilder::new(Some(metar), Some(taf));
        b.record(
            AdvisoryFlag::Lvp,
            ReportKind::Metar,
            vec!["0350".to_string()],
            "visibility 350 m < 400 m",
        );
        b.record(
            AdvisoryFlag::Lvto,
            ReportKind::Taf,
            vec!["0800".to_string()],
            "visibility 800 m",
        );
        let trail = b.finish();
        assert_eq!(trail.len(), 2);
        assert!(trail.entries()[0]
            .snippet
            .as_deref()
            .unwrap()
            .contains("0350"));
        assert!(trail.entries()[1]
            .snippet
            .as_deref()
            .unwrap()
            .contains("2412/2512"));
        assert_eq!(trail.for_flag(AdvisoryFlag::Lvp).count(), 1);
    }
}
