//! Text Budget Classifier
//!
//! Each layout allots a fixed number of characters to the free-text fields.
//! The analyzer classifies overflow against that budget and never edits text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layouts::LayoutId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    Description,
    AuthorBio,
}

impl TextField {
    pub const ALL: [TextField; 2] = [TextField::Description, TextField::AuthorBio];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Description => "description",
            TextField::AuthorBio => "authorBio",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Band a percentage over budget. Upper bounds are inclusive: 25% is mild, 50% moderate.
    pub fn from_percent_over(percent_over: f64) -> Self {
        if percent_over <= 0.0 {
            Severity::None
        } else if percent_over <= 25.0 {
            Severity::Mild
        } else if percent_over <= 50.0 {
            Severity::Moderate
        } else {
            Severity::Severe
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationVerdict {
    pub is_truncated: bool,
    pub original_length: usize,
    /// `None` when the field is unconstrained at this density.
    pub limit: Option<usize>,
    pub percent_over: f64,
    pub severity: Severity,
}

impl TruncationVerdict {
    fn within(original_length: usize, limit: Option<usize>) -> Self {
        Self {
            is_truncated: false,
            original_length,
            limit,
            percent_over: 0.0,
            severity: Severity::None,
        }
    }

    pub fn needs_warning(&self) -> bool {
        self.severity >= Severity::Mild
    }
}

/// Layout key for the limit table. Density 3 splits on mixed context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LimitKey {
    Layout(LayoutId),
    Density3Mixed,
    Density3Standalone,
}

impl LimitKey {
    fn resolve(layout: LayoutId, is_mixed_context: bool) -> Self {
        match layout {
            LayoutId::Density3 if is_mixed_context => LimitKey::Density3Mixed,
            LayoutId::Density3 => LimitKey::Density3Standalone,
            other => LimitKey::Layout(other),
        }
    }

    fn limit(&self, field: TextField) -> Option<usize> {
        match (self, field) {
            (LimitKey::Layout(LayoutId::Density1), TextField::Description) => Some(1000),
            (LimitKey::Layout(LayoutId::Density1), TextField::AuthorBio) => Some(752),
            (LimitKey::Layout(LayoutId::Density2), TextField::Description) => Some(997),
            (LimitKey::Layout(LayoutId::Density2Internal), TextField::Description) => Some(997),
            (LimitKey::Density3Mixed, TextField::Description) => Some(1397),
            (LimitKey::Density3Standalone, TextField::Description) => Some(997),
            (LimitKey::Layout(LayoutId::Density4), TextField::Description) => Some(947),
            (LimitKey::Layout(LayoutId::Density8), TextField::Description) => Some(997),
            _ => None,
        }
    }
}

/// Character budget for a field at a density, if it has one.
pub fn limit_for(field: TextField, layout: LayoutId, is_mixed_context: bool) -> Option<usize> {
    LimitKey::resolve(layout, is_mixed_context).limit(field)
}

/// Classify `text` against the budget of `field` at `layout`.
///
/// Length is counted in characters, not bytes.
pub fn analyze(
    text: Option<&str>,
    field: TextField,
    layout: LayoutId,
    is_mixed_context: bool,
) -> TruncationVerdict {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return TruncationVerdict::within(0, None),
    };

    let original_length = text.chars().count();
    let Some(limit) = limit_for(field, layout, is_mixed_context) else {
        return TruncationVerdict::within(original_length, None);
    };

    if original_length <= limit {
        return TruncationVerdict::within(original_length, Some(limit));
    }

    let percent_over = (original_length - limit) as f64 * 100.0 / limit as f64;
    TruncationVerdict {
        is_truncated: true,
        original_length,
        limit: Some(limit),
        percent_over,
        severity: Severity::from_percent_over(percent_over),
    }
}

/// Operator-facing notice for a field that will not fit its slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationWarning {
    pub identifier: String,
    pub title: String,
    /// 1-based page number.
    pub page: usize,
    /// 0-based slot on the page.
    pub slot: usize,
    pub layout: LayoutId,
    pub field: TextField,
    pub verdict: TruncationVerdict,
    pub message: String,
}

impl TruncationWarning {
    pub fn message_for(field: TextField, layout: LayoutId, verdict: &TruncationVerdict) -> String {
        format!(
            "{} has {} characters, {} allows {} ({:.1}% over)",
            field,
            verdict.original_length,
            layout,
            verdict.limit.unwrap_or_default(),
            verdict.percent_over
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_limit_table() {
        use LayoutId::*;
        // (layout, mixed context, description, authorBio)
        let table = [
            (Density1, false, Some(1000), Some(752)),
            (Density2, false, Some(997), None),
            (Density2Internal, false, Some(997), None),
            (Density3, true, Some(1397), None),
            (Density3, false, Some(997), None),
            (Density4, false, Some(947), None),
            (Density8, false, Some(997), None),
        ];
        for (layout, mixed, description, author_bio) in table {
            assert_eq!(limit_for(TextField::Description, layout, mixed), description, "{} description", layout);
            assert_eq!(limit_for(TextField::AuthorBio, layout, mixed), author_bio, "{} authorBio", layout);
        }
    }

    #[test]
    fn test_exact_mild_boundary() {
        let verdict = analyze(Some(&text(1250)), TextField::Description, LayoutId::Density1, false);
        assert!(verdict.is_truncated);
        assert_eq!(verdict.limit, Some(1000));
        assert_eq!(verdict.percent_over, 25.0);
        assert_eq!(verdict.severity, Severity::Mild);
    }

    #[test]
    fn test_exact_moderate_boundary() {
        let verdict = analyze(Some(&text(1500)), TextField::Description, LayoutId::Density1, false);
        assert_eq!(verdict.percent_over, 50.0);
        assert_eq!(verdict.severity, Severity::Moderate);
    }

    #[test]
    fn test_severe() {
        let verdict = analyze(Some(&text(1501)), TextField::Description, LayoutId::Density1, false);
        assert_eq!(verdict.severity, Severity::Severe);
    }

    #[test]
    fn test_at_limit_not_truncated() {
        let verdict = analyze(Some(&text(947)), TextField::Description, LayoutId::Density4, false);
        assert!(!verdict.is_truncated);
        assert_eq!(verdict.percent_over, 0.0);
        assert_eq!(verdict.severity, Severity::None);
    }

    #[test]
    fn test_empty_and_absent() {
        for input in [None, Some("")] {
            let verdict = analyze(input, TextField::Description, LayoutId::Density8, true);
            assert!(!verdict.is_truncated);
            assert_eq!(verdict.original_length, 0);
            assert_eq!(verdict.severity, Severity::None);
        }
    }

    #[test]
    fn test_author_bio_only_limited_at_density_one() {
        let bio = text(800);
        let one = analyze(Some(&bio), TextField::AuthorBio, LayoutId::Density1, false);
        assert!(one.is_truncated);
        assert_eq!(one.limit, Some(752));

        let four = analyze(Some(&bio), TextField::AuthorBio, LayoutId::Density4, false);
        assert!(!four.is_truncated);
        assert_eq!(four.limit, None);
        assert_eq!(four.original_length, 800);
    }

    #[test]
    fn test_density_three_context() {
        let desc = text(1200);
        let mixed = analyze(Some(&desc), TextField::Description, LayoutId::Density3, true);
        assert!(!mixed.is_truncated);
        assert_eq!(mixed.limit, Some(1397));

        let standalone = analyze(Some(&desc), TextField::Description, LayoutId::Density3, false);
        assert!(standalone.is_truncated);
        assert_eq!(standalone.limit, Some(997));
    }

    #[test]
    fn test_mixed_flag_ignored_elsewhere() {
        for layout in LayoutId::ALL.into_iter().filter(|l| *l != LayoutId::Density3) {
            for field in TextField::ALL {
                assert_eq!(limit_for(field, layout, true), limit_for(field, layout, false));
            }
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let accented = "é".repeat(1000);
        let verdict = analyze(Some(&accented), TextField::Description, LayoutId::Density1, false);
        assert_eq!(verdict.original_length, 1000);
        assert!(!verdict.is_truncated);
    }

    #[test]
    fn test_warning_message() {
        let verdict = analyze(Some(&text(1250)), TextField::Description, LayoutId::Density1, false);
        let message = TruncationWarning::message_for(TextField::Description, LayoutId::Density1, &verdict);
        assert_eq!(message, "description has 1250 characters, density-1 allows 1000 (25.0% over)");
    }

    proptest! {
        #[test]
        fn prop_truncated_iff_over_limit(len in 0usize..3000, layout_idx in 0usize..6, mixed in any::<bool>()) {
            let layout = LayoutId::ALL[layout_idx];
            let verdict = analyze(Some(&text(len)), TextField::Description, layout, mixed);
            let limit = limit_for(TextField::Description, layout, mixed).unwrap();
            prop_assert_eq!(verdict.is_truncated, len > limit);
        }

        #[test]
        fn prop_severity_monotone(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Severity::from_percent_over(lo) <= Severity::from_percent_over(hi));
        }
    }
}
