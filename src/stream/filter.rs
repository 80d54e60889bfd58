//! Filter Set: the immutable, append-only collection of selection predicates consulted by
//! every other pipeline stage.

use crate::stream::descriptor::{DumpDescriptor, RecordType};
use crate::stream::error::StreamError;

/// Slack applied to `TimeInterval.begin` when matching a RIB dump's filetime, in seconds:
/// the 900s nominal RIB dump window plus a 120s fudge factor.
pub const RIB_BEGIN_SLACK_SECS: u32 = 1020;
/// Slack applied to `TimeInterval.begin` when matching an updates dump's filetime, in seconds.
pub const UPDATES_BEGIN_SLACK_SECS: u32 = 120;

/// One registered selection predicate. `FilterSet` never mutates these after the stream starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Project(String),
    Collector(String),
    RecordType(RecordType),
    TimeInterval { begin: u32, end: Option<u32> },
}

/// An elem-level filter term accepted by the filter string grammar but applied, if at all, by
/// the caller against decoded [`crate::stream::elem::Element`]s rather than by
/// [`FilterSet::matches`] against descriptors, since these constrain individual BGP elements
/// rather than whole dump files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElemFilterTerm {
    Peer(String),
    Prefix { value: String, mode: PrefixMatchMode },
    Community(String),
    AsPath(String),
    IpVersion(String),
    ElemType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixMatchMode {
    Any,
    More,
    Less,
    Exact,
}

/// Immutable, append-only collection of [`Filter`]s. `matches` is a pure conjunction of
/// per-kind predicates; a kind with no registered values is vacuously true.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    projects: Vec<String>,
    collectors: Vec<String>,
    record_types: Vec<RecordType>,
    intervals: Vec<(u32, Option<u32>)>,
    elem_terms: Vec<ElemFilterTerm>,
}

impl FilterSet {
    pub fn new() -> Self {
        FilterSet::default()
    }

    pub fn add(&mut self, filter: Filter) {
        match filter {
            Filter::Project(p) => self.projects.push(p),
            Filter::Collector(c) => self.collectors.push(c),
            Filter::RecordType(t) => self.record_types.push(t),
            Filter::TimeInterval { begin, end } => self.intervals.push((begin, end)),
        }
    }

    pub fn add_interval(&mut self, begin: u32, end: Option<u32>) {
        self.intervals.push((begin, end));
    }

    pub fn add_elem_term(&mut self, term: ElemFilterTerm) {
        self.elem_terms.push(term);
    }

    pub fn elem_terms(&self) -> &[ElemFilterTerm] {
        &self.elem_terms
    }

    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    pub fn collectors(&self) -> &[String] {
        &self.collectors
    }

    pub fn record_types(&self) -> &[RecordType] {
        &self.record_types
    }

    pub fn intervals(&self) -> &[(u32, Option<u32>)] {
        &self.intervals
    }

    /// Conjunction of per-kind predicates. Pure; no side effects.
    pub fn matches(&self, descriptor: &DumpDescriptor) -> bool {
        self.matches_project(&descriptor.project)
            && self.matches_collector(&descriptor.collector)
            && self.matches_record_type(descriptor.record_type)
            && self.matches_time(descriptor.filetime, descriptor.record_type)
    }

    fn matches_project(&self, project: &str) -> bool {
        self.projects.is_empty() || self.projects.iter().any(|p| p == project)
    }

    fn matches_collector(&self, collector: &str) -> bool {
        self.collectors.is_empty() || self.collectors.iter().any(|c| c == collector)
    }

    fn matches_record_type(&self, record_type: RecordType) -> bool {
        self.record_types.is_empty() || self.record_types.iter().any(|t| *t == record_type)
    }

    /// True if `timestamp` falls within any registered interval, `begin` relaxed by
    /// `record_type`'s slack. Used both to admit a dump descriptor by its filetime and, with
    /// the same relaxed `begin`, to filter individual entry timestamps during
    /// `fill_lookahead`.
    pub fn matches_time(&self, timestamp: u32, record_type: RecordType) -> bool {
        if self.intervals.is_empty() {
            return true;
        }
        let slack = match record_type {
            RecordType::Rib => RIB_BEGIN_SLACK_SECS,
            RecordType::Updates => UPDATES_BEGIN_SLACK_SECS,
        };
        self.intervals.iter().any(|(begin, end)| {
            let widened_begin = begin.saturating_sub(slack);
            timestamp >= widened_begin && end.map(|e| timestamp <= e).unwrap_or(true)
        })
    }
}

/// Parses the filter string grammar (a command-line-style predicate language, the same shape
/// as e.g. Wireshark display filters): `<term>[ <value>]*[ and <term> <value>]*`, values
/// optionally double-quoted, strict on unknown terms, unclosed quotes, and a trailing
/// conjunction.
pub fn parse_filter_string(input: &str) -> Result<FilterSet, StreamError> {
    let mut set = FilterSet::new();
    let tokens = tokenize(input)?;
    let mut i = 0;
    let mut saw_term = false;
    while i < tokens.len() {
        let term = tokens[i].as_str();
        if term.eq_ignore_ascii_case("and") {
            return Err(StreamError::ConfigError(
                "filter string: 'and' must separate two terms, not lead or repeat".into(),
            ));
        }
        i += 1;

        // `prefix`/`pref` optionally takes a match-mode keyword ahead of its value, e.g.
        // `prefix more 192.0.2.0/24`. Peek for it before falling through to the generic
        // single-value consumption every other term uses.
        let mode = if term.eq_ignore_ascii_case("prefix") || term.eq_ignore_ascii_case("pref") {
            match tokens.get(i).and_then(|tok| parse_prefix_mode(tok)) {
                Some(m) => {
                    i += 1;
                    Some(m)
                }
                None => None,
            }
        } else {
            None
        };

        let value = match tokens.get(i) {
            Some(v) if !v.eq_ignore_ascii_case("and") => {
                i += 1;
                Some(v.as_str())
            }
            _ => None,
        };
        apply_term(&mut set, term, value, mode)?;
        saw_term = true;

        match tokens.get(i) {
            None => break,
            Some(tok) if tok.eq_ignore_ascii_case("and") => {
                i += 1;
                if i >= tokens.len() {
                    return Err(StreamError::ConfigError(
                        "filter string: trailing 'and' with no following term".into(),
                    ));
                }
            }
            Some(other) => {
                return Err(StreamError::ConfigError(format!(
                    "filter string: expected 'and' or end of input, found '{other}'"
                )));
            }
        }
    }
    if !saw_term {
        return Err(StreamError::ConfigError("filter string: empty input".into()));
    }
    Ok(set)
}

fn tokenize(input: &str) -> Result<Vec<String>, StreamError> {
    let mut tokens = Vec::new();
    let mut chars = input.trim().chars().peekable();
    let mut current = String::new();
    let mut in_quotes = false;
    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => {
                in_quotes = true;
            }
            '"' if in_quotes => {
                in_quotes = false;
                tokens.push(std::mem::take(&mut current));
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(StreamError::ConfigError(
            "filter string: unclosed double quote".into(),
        ));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Recognizes a `prefix`/`pref` match-mode keyword. Case-insensitive.
fn parse_prefix_mode(token: &str) -> Option<PrefixMatchMode> {
    match token.to_ascii_lowercase().as_str() {
        "any" => Some(PrefixMatchMode::Any),
        "more" => Some(PrefixMatchMode::More),
        "less" => Some(PrefixMatchMode::Less),
        "exact" => Some(PrefixMatchMode::Exact),
        _ => None,
    }
}

fn apply_term(
    set: &mut FilterSet,
    term: &str,
    value: Option<&str>,
    mode: Option<PrefixMatchMode>,
) -> Result<(), StreamError> {
    let value = value.ok_or_else(|| {
        StreamError::ConfigError(format!("filter string: term '{term}' requires a value"))
    })?;
    match term.to_ascii_lowercase().as_str() {
        "project" | "proj" => set.add(Filter::Project(value.to_string())),
        "collector" | "coll" => set.add(Filter::Collector(value.to_string())),
        "router" | "rout" => set.add(Filter::Collector(value.to_string())),
        "type" => {
            let rt = match value.to_ascii_lowercase().as_str() {
                "rib" | "ribs" => RecordType::Rib,
                "updates" | "update" => RecordType::Updates,
                other => {
                    return Err(StreamError::ConfigError(format!(
                        "filter string: unknown record type '{other}'"
                    )))
                }
            };
            set.add(Filter::RecordType(rt));
        }
        "peer" => set.add_elem_term(ElemFilterTerm::Peer(value.to_string())),
        "community" | "comm" => set.add_elem_term(ElemFilterTerm::Community(value.to_string())),
        "aspath" | "path" => set.add_elem_term(ElemFilterTerm::AsPath(value.to_string())),
        "ipversion" | "ipv" => set.add_elem_term(ElemFilterTerm::IpVersion(value.to_string())),
        "elemtype" => set.add_elem_term(ElemFilterTerm::ElemType(value.to_string())),
        "prefix" | "pref" => set.add_elem_term(ElemFilterTerm::Prefix {
            value: value.to_string(),
            mode: mode.unwrap_or(PrefixMatchMode::More),
        }),
        other => {
            return Err(StreamError::ConfigError(format!(
                "filter string: unknown term '{other}'"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(project: &str, collector: &str, rt: RecordType, filetime: u32) -> DumpDescriptor {
        DumpDescriptor::new(
            format!("file-{filetime}"),
            project,
            collector,
            rt,
            filetime,
            900,
        )
    }

    #[test]
    fn empty_filter_set_matches_everything() {
        let set = FilterSet::new();
        assert!(set.matches(&desc("routeviews", "route-views2", RecordType::Rib, 100)));
    }

    #[test]
    fn project_predicate_is_disjunctive() {
        let mut set = FilterSet::new();
        set.add(Filter::Project("routeviews".into()));
        set.add(Filter::Project("ris".into()));
        assert!(set.matches(&desc("ris", "rrc00", RecordType::Rib, 0)));
        assert!(!set.matches(&desc("other", "rrc00", RecordType::Rib, 0)));
    }

    #[test]
    fn time_interval_slack_differs_by_record_type() {
        let mut set = FilterSet::new();
        set.add_interval(1405382500, Some(1405382600));
        // RIB filetime 1020s before begin still matches thanks to the wider RIB slack.
        let rib = desc("p", "c", RecordType::Rib, 1405382500 - 1000);
        assert!(set.matches(&rib));
        // Updates only get a 120s slack.
        let upd = desc("p", "c", RecordType::Updates, 1405382500 - 1000);
        assert!(!set.matches(&upd));
    }

    #[test]
    fn grammar_parses_project_and_collector() {
        let set = parse_filter_string(r#"project routeviews and collector "route-views2""#).unwrap();
        assert_eq!(set.projects(), &["routeviews".to_string()]);
        assert_eq!(set.collectors(), &["route-views2".to_string()]);
    }

    #[test]
    fn grammar_rejects_unknown_term() {
        assert!(parse_filter_string("bogus value").is_err());
    }

    #[test]
    fn grammar_rejects_unclosed_quote() {
        assert!(parse_filter_string(r#"project "routeviews"#).is_err());
    }

    #[test]
    fn grammar_rejects_trailing_conjunction() {
        assert!(parse_filter_string("project routeviews and").is_err());
    }

    fn prefix_term(set: &FilterSet) -> &ElemFilterTerm {
        set.elem_terms()
            .iter()
            .find(|t| matches!(t, ElemFilterTerm::Prefix { .. }))
            .expect("expected a Prefix term")
    }

    #[test]
    fn prefix_defaults_to_more_when_mode_omitted() {
        let set = parse_filter_string("prefix 192.0.2.0/24").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "192.0.2.0/24");
                assert_eq!(*mode, PrefixMatchMode::More);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn prefix_parses_any_mode() {
        let set = parse_filter_string("prefix any 192.0.2.0/24").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "192.0.2.0/24");
                assert_eq!(*mode, PrefixMatchMode::Any);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn prefix_parses_more_mode() {
        let set = parse_filter_string("prefix more 192.0.2.0/24").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "192.0.2.0/24");
                assert_eq!(*mode, PrefixMatchMode::More);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn prefix_parses_less_mode() {
        let set = parse_filter_string("prefix less 192.0.2.0/24").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "192.0.2.0/24");
                assert_eq!(*mode, PrefixMatchMode::Less);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn prefix_parses_exact_mode() {
        let set = parse_filter_string("prefix exact 192.0.2.0/24").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "192.0.2.0/24");
                assert_eq!(*mode, PrefixMatchMode::Exact);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn pref_alias_also_parses_mode() {
        let set = parse_filter_string("pref exact 192.0.2.0/24").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "192.0.2.0/24");
                assert_eq!(*mode, PrefixMatchMode::Exact);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn prefix_mode_keyword_does_not_swallow_a_real_value_that_looks_like_a_mode() {
        // "exact" is also a valid filter string in isolation, but here it is a mode keyword
        // followed by the real prefix value -- the combination must still parse as one term.
        let set = parse_filter_string("prefix exact 10.0.0.0/8 and project routeviews").unwrap();
        match prefix_term(&set) {
            ElemFilterTerm::Prefix { value, mode } => {
                assert_eq!(value, "10.0.0.0/8");
                assert_eq!(*mode, PrefixMatchMode::Exact);
            }
            _ => unreachable!(),
        }
        assert_eq!(set.projects(), &["routeviews".to_string()]);
    }
}
