use chrono::{DateTime, Duration, TimeZone, Utc};
use exec_signals::workflows::brief::report::{NO_ACTIVITY_LINE, NO_DATA_LINE};
use exec_signals::workflows::brief::{
    extract_signals, render_brief, Brief, BriefCompiler, BriefError, BriefPipeline, BriefScope,
    KeywordTableScorer, Post, SignalCategory,
};
use std::collections::BTreeMap;

const ACME: &str = "Acme Gold Loans";

fn compiled_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 9, 0, 0).single().expect("valid timestamp")
}

fn post(id: &str, company: &str, hours_ago: i64, text: &str) -> Post {
    Post {
        id: id.to_string(),
        profile_id: "priya-raman".to_string(),
        author_name: "Priya Raman".to_string(),
        company: company.to_string(),
        posted_at: compiled_at() - Duration::hours(hours_ago),
        text: text.to_string(),
        url: None,
        reactions: None,
        comments: None,
    }
}

fn acme_batch() -> Vec<Post> {
    vec![
        post("p-1", ACME, 4, "Hiring chief digital officer"),
        post("p-2", ACME, 8, "Expanding branch network"),
        post("p-3", ACME, 2, "Celebrating Onam with the whole team"),
    ]
}

fn mixed_batch() -> Vec<Post> {
    vec![
        post("a-1", ACME, 30, "We are hiring for an open role in collections"),
        post("a-2", ACME, 12, "Hiring relationship managers, join our team"),
        post("a-3", ACME, 12, "Hiring branch heads as we open a new branch"),
        post("a-4", ACME, 50, "Our digital transformation programme moves core banking to the cloud"),
        post("b-1", "Beta Finance", 6, "Priya has been appointed as CFO. Welcome aboard!"),
        post("b-2", "Beta Finance", 3, "Recruiting for our new office in Pune"),
        post("c-1", "Crescent Capital", 1, "Quarterly town hall recap"),
    ]
}

/// Recovers `company -> signal count` from the rendered report's structural
/// markers: a company title is a line followed by a dash underline of the
/// same length, and a signal line starts with its rank and carries a score.
fn parse_rendered_sections(rendered: &str) -> BTreeMap<String, usize> {
    let lines: Vec<&str> = rendered.lines().collect();
    let mut sections = BTreeMap::new();
    let mut current: Option<String> = None;

    for (index, line) in lines.iter().enumerate() {
        let underline = lines.get(index + 1).copied().unwrap_or_default();
        let is_title = !line.is_empty()
            && !underline.is_empty()
            && underline.chars().all(|c| c == '-')
            && underline.chars().count() == line.chars().count();

        if is_title {
            current = Some(line.to_string());
            sections.insert(line.to_string(), 0);
            continue;
        }

        let is_signal = line.chars().next().is_some_and(|c| c.is_ascii_digit())
            && line.contains("] score ");
        if let (true, Some(company)) = (is_signal, current.as_ref()) {
            *sections.get_mut(company).expect("section registered") += 1;
        }
    }

    sections
}

#[test]
fn acme_scenario_yields_hiring_and_expansion_only() {
    let posts = acme_batch();
    let brief = BriefPipeline::<KeywordTableScorer>::default()
        .run(&posts, &BriefScope::new(), compiled_at())
        .expect("brief compiles");

    assert_eq!(brief.company_sections.len(), 1);
    let section = brief.section(ACME).expect("acme section");
    assert_eq!(section.len(), 2);

    let categories: Vec<_> = section.iter().map(|signal| signal.category).collect();
    assert!(categories.contains(&SignalCategory::Hiring));
    assert!(categories.contains(&SignalCategory::Expansion));
    assert!(section.iter().all(|signal| signal.post_id != "p-3"));
}

#[test]
fn posts_without_keywords_produce_no_signals() {
    let scorer = KeywordTableScorer::standard();
    let posts = vec![
        post("q-1", ACME, 1, "Quarterly results call at 4pm"),
        post("q-2", ACME, 1, "Rehiring is not on the agenda"),
        post("q-3", ACME, 1, ""),
    ];

    assert!(extract_signals(&scorer, &posts).is_empty());
}

#[test]
fn extraction_is_repeatable() {
    let scorer = KeywordTableScorer::standard();
    let posts = mixed_batch();
    let first = extract_signals(&scorer, &posts);

    for _ in 0..3 {
        assert_eq!(extract_signals(&scorer, &posts), first);
    }
}

#[test]
fn sections_are_strictly_ordered() {
    let posts = mixed_batch();
    let scorer = KeywordTableScorer::standard();
    let mut signals = extract_signals(&scorer, &posts);
    signals.reverse();

    let brief = BriefCompiler::new()
        .compile(&posts, signals, &BriefScope::new(), compiled_at())
        .expect("brief compiles");

    let posted_at = |post_id: &str| {
        posts
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| post.posted_at)
            .expect("source post")
    };

    for section in brief.company_sections.values() {
        for pair in section.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ordered = a.score > b.score
                || (a.score == b.score && posted_at(&a.post_id) > posted_at(&b.post_id))
                || (a.score == b.score
                    && posted_at(&a.post_id) == posted_at(&b.post_id)
                    && a.post_id <= b.post_id);
            assert!(ordered, "{} should not precede {}", a.post_id, b.post_id);
        }
    }

    let acme: Vec<_> = brief
        .section(ACME)
        .expect("acme")
        .iter()
        .map(|signal| (signal.post_id.as_str(), signal.category))
        .collect();
    assert_eq!(
        acme,
        vec![
            ("a-4", SignalCategory::DigitalInitiative),
            ("a-2", SignalCategory::Hiring),
            ("a-1", SignalCategory::Hiring),
            ("a-3", SignalCategory::Hiring),
            ("a-3", SignalCategory::Expansion),
        ]
    );
}

#[test]
fn rendered_report_round_trips_company_structure() {
    let posts = mixed_batch();
    let scope = BriefScope::new().with_company("Delta Credit");
    let brief = BriefPipeline::<KeywordTableScorer>::default()
        .run(&posts, &scope, compiled_at())
        .expect("brief compiles");

    let parsed = parse_rendered_sections(&render_brief(&brief));
    let expected: BTreeMap<String, usize> = brief
        .company_sections
        .iter()
        .map(|(company, signals)| (company.clone(), signals.len()))
        .collect();

    assert_eq!(parsed, expected);
    assert!(!parsed.contains_key("Crescent Capital"));
    assert_eq!(parsed.get("Delta Credit"), Some(&0));
}

#[test]
fn compiling_twice_renders_identical_bytes() {
    let posts = mixed_batch();
    let scorer = KeywordTableScorer::standard();
    let signals = extract_signals(&scorer, &posts);
    let compiler = BriefCompiler::new().with_max_signals_per_company(Some(3));
    let scope = BriefScope::new().with_company(ACME);

    let first = compiler
        .compile(&posts, signals.clone(), &scope, compiled_at())
        .expect("first compile");
    let second = compiler
        .compile(&posts, signals, &scope, compiled_at())
        .expect("second compile");

    assert_eq!(render_brief(&first).as_bytes(), render_brief(&second).as_bytes());
}

#[test]
fn empty_batch_is_reported_and_renders_no_data() {
    let scope = BriefScope::new().with_company(ACME);
    let error = BriefPipeline::<KeywordTableScorer>::default()
        .run(&[], &scope, compiled_at())
        .expect_err("empty batch");
    assert_eq!(error, BriefError::EmptyInputBatch);

    let brief = Brief::without_data(&scope, compiled_at());
    assert_eq!(brief.signal_count(), 0);
    assert!(brief
        .company_sections
        .values()
        .all(|signals| signals.is_empty()));

    let rendered = render_brief(&brief);
    assert!(rendered.contains(NO_DATA_LINE));
}

#[test]
fn filtered_company_absent_from_batch_renders_no_activity() {
    let posts = acme_batch();
    let scope = BriefScope::new().with_company("Zenith Fincorp");
    let brief = BriefPipeline::<KeywordTableScorer>::default()
        .run(&posts, &scope, compiled_at())
        .expect("brief compiles");

    assert_eq!(brief.section("Zenith Fincorp").map(|section| section.len()), Some(0));

    let rendered = render_brief(&brief);
    let zenith = rendered
        .split("Zenith Fincorp\n--------------\n")
        .nth(1)
        .expect("zenith section rendered");
    assert!(zenith.starts_with(NO_ACTIVITY_LINE));
}
