//! Page-break policy at heading boundaries.
//!
//! Explicit lists in the configuration always dominate the heuristics, so a
//! document that follows the usual layout needs no page-break configuration
//! at all while a deviating one can override single sections by number.

use crate::config::PageBreakOptions;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static RE_SECTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+\.[0-9]+)").unwrap());

/// Marker that identifies a per-version change detail H3.
const CHANGE_DETAIL_MARKER: &str = "변경 상세";

/// Transient per-run scan state.
///
/// Owned by one conversion run and mutated only by the scanner and this
/// policy; never shared or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanState {
    /// Number of H2 headings seen so far
    pub h2_count: u32,

    /// No H3 has followed the most recent H2 yet
    pub first_h3_since_h2: bool,

    /// Section number of the open image section
    pub image_section: Option<String>,

    /// The configured stop H2 has not been reached
    pub before_stop_section: bool,
}

impl ScanState {
    /// State at the start of a document.
    pub fn new() -> Self {
        Self {
            h2_count: 0,
            first_h3_since_h2: true,
            image_section: None,
            before_stop_section: true,
        }
    }

    /// Check if an image section is open.
    pub fn in_image_section(&self) -> bool {
        self.image_section.is_some()
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

/// Rule that decided a page break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakReason {
    /// H2 title is in the explicit list
    H2Listed,
    /// Explicit H2 list exists and the title is not in it
    H2NotListed,
    /// Second H2, following the change history
    AfterChangeHistory,
    /// H2 beyond the second, before the stop section
    H2BeforeStopSection,
    /// H3 section number is in the no-break list
    NoBreakListed,
    /// H3 section number is in the break list
    BreakListed,
    /// Change detail H3 with change-detail breaks disabled
    ChangeDetail,
    /// H3 opens an image section
    ImageSection,
    /// Default H3 break
    DefaultH3,
    /// No rule applied
    NoRule,
}

/// Outcome of a page-break decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakDecision {
    /// Insert a page break before the heading
    pub page_break: bool,
    /// Rule that decided
    pub reason: BreakReason,
}

impl BreakDecision {
    fn new(page_break: bool, reason: BreakReason) -> Self {
        Self { page_break, reason }
    }
}

/// An H3 heading as seen by the policy.
#[derive(Debug, Clone, Copy)]
pub struct H3Heading<'a> {
    /// Heading text
    pub title: &'a str,
    /// Leading `d.d` section number
    pub section: Option<&'a str>,
    /// The section has a configured image
    pub has_image: bool,
}

impl<'a> H3Heading<'a> {
    /// Describe an H3 title; `has_image` is decided by the caller.
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            section: section_number(title),
            has_image: false,
        }
    }

    /// Mark the heading as an image section.
    pub fn with_image(mut self, has_image: bool) -> Self {
        self.has_image = has_image;
        self
    }

    /// Check if this is a change detail heading (`v1.2 변경 상세`).
    pub fn is_change_detail(&self) -> bool {
        is_change_detail(self.title)
    }
}

/// Leading `d.d` section number of a heading title.
pub fn section_number(title: &str) -> Option<&str> {
    RE_SECTION_NUMBER
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Check if a title is a per-version change detail heading.
pub fn is_change_detail(title: &str) -> bool {
    title.starts_with('v') && title.contains(CHANGE_DETAIL_MARKER)
}

/// Page-break decision function.
#[derive(Debug, Clone)]
pub struct PageBreakPolicy {
    options: PageBreakOptions,
    h2_sections: HashSet<String>,
    h3_sections: HashSet<String>,
    no_break_h3_sections: HashSet<String>,
}

impl PageBreakPolicy {
    /// Build a policy from configuration options.
    pub fn new(options: &PageBreakOptions) -> Self {
        Self {
            options: options.clone(),
            h2_sections: options.h2_sections.iter().cloned().collect(),
            h3_sections: options.h3_sections.iter().cloned().collect(),
            no_break_h3_sections: options.no_break_h3_sections.iter().cloned().collect(),
        }
    }

    /// Options this policy was built from.
    pub fn options(&self) -> &PageBreakOptions {
        &self.options
    }

    /// Advance the state over an H2 and decide whether to break before it.
    pub fn on_h2(&self, state: &mut ScanState, title: &str) -> BreakDecision {
        state.h2_count += 1;
        state.image_section = None;

        let stop = self.options.h2_break_before_section;
        if stop > 0 && state.h2_count >= stop {
            state.before_stop_section = false;
        }

        let decision = if !self.h2_sections.is_empty() {
            if self.h2_sections.contains(title) {
                BreakDecision::new(true, BreakReason::H2Listed)
            } else {
                BreakDecision::new(false, BreakReason::H2NotListed)
            }
        } else if self.options.after_change_history && state.h2_count == 2 {
            BreakDecision::new(true, BreakReason::AfterChangeHistory)
        } else if state.before_stop_section && state.h2_count > 2 {
            BreakDecision::new(true, BreakReason::H2BeforeStopSection)
        } else {
            BreakDecision::new(false, BreakReason::NoRule)
        };

        state.first_h3_since_h2 = true;

        log::debug!(
            "H2 #{} '{}': break={} ({:?})",
            state.h2_count,
            title,
            decision.page_break,
            decision.reason
        );
        decision
    }

    /// Advance the state over an H3 and decide whether to break before it.
    pub fn on_h3(&self, state: &mut ScanState, heading: &H3Heading<'_>) -> BreakDecision {
        let listed = |set: &HashSet<String>| heading.section.is_some_and(|s| set.contains(s));
        let not_first = !state.first_h3_since_h2;

        let decision = if listed(&self.no_break_h3_sections) {
            BreakDecision::new(false, BreakReason::NoBreakListed)
        } else if listed(&self.h3_sections) {
            BreakDecision::new(not_first, BreakReason::BreakListed)
        } else if heading.is_change_detail() && !self.options.change_detail_h3_break {
            BreakDecision::new(false, BreakReason::ChangeDetail)
        } else if heading.has_image && self.options.image_h3_always_break {
            BreakDecision::new(not_first, BreakReason::ImageSection)
        } else if self.options.default_h3_break && state.before_stop_section && not_first {
            BreakDecision::new(true, BreakReason::DefaultH3)
        } else {
            BreakDecision::new(false, BreakReason::NoRule)
        };

        state.first_h3_since_h2 = false;

        log::debug!(
            "H3 '{}': break={} ({:?})",
            heading.title,
            decision.page_break,
            decision.reason
        );
        decision
    }
}

impl Default for PageBreakPolicy {
    fn default() -> Self {
        Self::new(&PageBreakOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2_breaks(policy: &PageBreakPolicy, titles: &[&str]) -> Vec<bool> {
        let mut state = ScanState::new();
        titles
            .iter()
            .map(|t| policy.on_h2(&mut state, t).page_break)
            .collect()
    }

    #[test]
    fn test_h2_defaults() {
        let policy = PageBreakPolicy::default();
        assert_eq!(
            h2_breaks(&policy, &["변경 이력", "개요", "상세"]),
            vec![false, true, true]
        );
    }

    #[test]
    fn test_h2_without_after_change_history() {
        let options = PageBreakOptions {
            after_change_history: false,
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        assert_eq!(
            h2_breaks(&policy, &["변경 이력", "개요", "상세"]),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_h2_explicit_list_is_authoritative() {
        let options = PageBreakOptions {
            h2_sections: vec!["부록".into(), "변경 이력".into()],
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        assert_eq!(
            h2_breaks(&policy, &["변경 이력", "개요", "상세", "부록"]),
            vec![true, false, false, true]
        );
    }

    #[test]
    fn test_h2_stop_section() {
        let options = PageBreakOptions {
            h2_break_before_section: 4,
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        let mut state = ScanState::new();
        let breaks: Vec<bool> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|t| policy.on_h2(&mut state, t).page_break)
            .collect();
        assert_eq!(breaks, vec![false, true, true, false, false]);
        assert!(!state.before_stop_section);
    }

    #[test]
    fn test_h2_resets_h3_state() {
        let policy = PageBreakPolicy::default();
        let mut state = ScanState::new();
        state.first_h3_since_h2 = false;
        state.image_section = Some("3.1".into());

        policy.on_h2(&mut state, "개요");

        assert!(state.first_h3_since_h2);
        assert!(!state.in_image_section());
    }

    #[test]
    fn test_h3_default_breaks_after_first() {
        let policy = PageBreakPolicy::default();
        let mut state = ScanState::new();
        policy.on_h2(&mut state, "개요");

        let first = policy.on_h3(&mut state, &H3Heading::new("1.1 목적"));
        let second = policy.on_h3(&mut state, &H3Heading::new("1.2 범위"));

        assert!(!first.page_break);
        assert!(second.page_break);
        assert_eq!(second.reason, BreakReason::DefaultH3);
    }

    #[test]
    fn test_h3_no_break_list_wins() {
        let options = PageBreakOptions {
            h3_sections: vec!["2.2".into()],
            no_break_h3_sections: vec!["2.2".into()],
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        let mut state = ScanState::new();
        state.first_h3_since_h2 = false;

        let decision = policy.on_h3(&mut state, &H3Heading::new("2.2 처리"));
        assert!(!decision.page_break);
        assert_eq!(decision.reason, BreakReason::NoBreakListed);
    }

    #[test]
    fn test_h3_break_list_respects_first_h3() {
        let options = PageBreakOptions {
            h3_sections: vec!["2.1".into(), "2.2".into()],
            default_h3_break: false,
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        let mut state = ScanState::new();
        policy.on_h2(&mut state, "기능");

        assert!(!policy.on_h3(&mut state, &H3Heading::new("2.1 조회")).page_break);
        assert!(policy.on_h3(&mut state, &H3Heading::new("2.2 등록")).page_break);
        assert!(!policy.on_h3(&mut state, &H3Heading::new("2.3 삭제")).page_break);
    }

    #[test]
    fn test_h3_change_detail_suppressed() {
        let policy = PageBreakPolicy::default();
        let mut state = ScanState::new();
        state.first_h3_since_h2 = false;

        let decision = policy.on_h3(&mut state, &H3Heading::new("v1.2 변경 상세"));
        assert!(!decision.page_break);
        assert_eq!(decision.reason, BreakReason::ChangeDetail);

        let options = PageBreakOptions {
            change_detail_h3_break: true,
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        let decision = policy.on_h3(&mut state, &H3Heading::new("v1.3 변경 상세"));
        assert!(decision.page_break);
        assert_eq!(decision.reason, BreakReason::DefaultH3);
    }

    #[test]
    fn test_h3_image_section_breaks_after_stop() {
        let options = PageBreakOptions {
            h2_break_before_section: 1,
            ..Default::default()
        };
        let policy = PageBreakPolicy::new(&options);
        let mut state = ScanState::new();
        policy.on_h2(&mut state, "아키텍처");
        policy.on_h3(&mut state, &H3Heading::new("3.1 개요"));

        let plain = policy.on_h3(&mut state, &H3Heading::new("3.2 구성"));
        let image = policy.on_h3(&mut state, &H3Heading::new("3.3 흐름").with_image(true));

        assert!(!plain.page_break);
        assert!(image.page_break);
        assert_eq!(image.reason, BreakReason::ImageSection);
    }

    #[test]
    fn test_section_number() {
        assert_eq!(section_number("3.1 결제 흐름"), Some("3.1"));
        assert_eq!(section_number("12.04 부록"), Some("12.04"));
        assert_eq!(section_number("3 결제"), None);
        assert_eq!(section_number("결제 3.1"), None);
    }

    #[test]
    fn test_is_change_detail() {
        assert!(is_change_detail("v1.2 변경 상세"));
        assert!(!is_change_detail("1.2 변경 상세"));
        assert!(!is_change_detail("v1.2 개요"));
    }
}
