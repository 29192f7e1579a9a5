use grade_rater::analyzers::aggregate::{class_summary, subject_report};
use grade_rater::analyzers::distribution::{cumulative_at_or_above, distribution};
use grade_rater::analyzers::grade::{Letter, Status};
use grade_rater::analyzers::rank::{Metric, Order, RankLimit, rank_by, top_and_bottom};
use grade_rater::analyzers::search::{SearchOutcome, find_by_name};
use grade_rater::config::EngineConfig;
use grade_rater::normalize::load_roster;
use grade_rater::output::write_roster_csv;
use grade_rater::roster::{Roster, Student};
use grade_rater::store::RosterStore;
use grade_rater::{Error, IngestionError};

const ROSTER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/roster.csv");
const THREE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/three_students.csv");

fn load_full() -> Roster {
    load_roster(ROSTER, &EngineConfig::default()).expect("Failed to load roster fixture")
}

fn names(students: &[&Student]) -> Vec<String> {
    students.iter().map(|s| s.name().to_string()).collect()
}

#[test]
fn test_three_student_scenario() {
    let config = EngineConfig {
        subjects: vec!["MATH".into(), "CS101".into()],
        ..EngineConfig::default()
    };
    let roster = load_roster(THREE, &config).unwrap();
    let s = roster.students();

    let totals: Vec<f64> = s.iter().map(Student::total).collect();
    let averages: Vec<Option<f64>> = s.iter().map(Student::average).collect();
    let gpas: Vec<Option<f64>> = s.iter().map(Student::gpa).collect();
    let statuses: Vec<Option<Status>> = s.iter().map(Student::status).collect();

    assert_eq!(totals, vec![170.0, 40.0, 140.0]);
    assert_eq!(averages, vec![Some(85.0), Some(40.0), Some(70.0)]);
    assert_eq!(gpas, vec![Some(3.5), Some(0.0), Some(2.5)]);
    assert_eq!(
        statuses,
        vec![Some(Status::Pass), Some(Status::Fail), Some(Status::Pass)]
    );

    let summary = class_summary(&roster);
    assert_eq!(summary.all_scores.unwrap().mean, 70.0);
}

#[test]
fn test_full_pipeline() {
    let roster = load_full();

    // The trailing blank row is dropped; the all-blank student is kept.
    assert_eq!(roster.len(), 12);

    let farah = &roster.students()[5];
    assert_eq!(farah.name(), "Farah Khan");
    assert_eq!(farah.total(), 0.0);
    assert_eq!(farah.average(), None);

    let dmitri = &roster.students()[3];
    assert_eq!(dmitri.score(0), None);
    assert_eq!(dmitri.total(), 245.0);
    assert_eq!(dmitri.average(), Some(61.25));
    assert_eq!(dmitri.gpa(), Some(2.2));

    let summary = class_summary(&roster);
    assert_eq!(summary.all_scores.as_ref().unwrap().count, 53);
    assert_eq!(summary.averages.as_ref().unwrap().count, 11);
    assert_eq!(summary.pass.total_students, 12);
    assert_eq!(summary.pass.passed, 9);
    assert_eq!(summary.pass.failed, 2);
    assert_eq!(summary.pass.no_data, 1);
    assert_eq!(summary.pass.pass_rate, Some(75.0));
    assert_eq!(summary.subjects.len(), 5);
}

#[test]
fn test_subject_pass_fail_excludes_missing() {
    let roster = load_full();
    let report = subject_report(&roster, "MATH").unwrap();

    assert_eq!(report.present, 11);
    assert_eq!(report.missing, 1);
    assert_eq!(report.passed, 8);
    assert_eq!(report.failed, 3);
}

#[test]
fn test_rankings_are_disjoint_and_ordered() {
    let roster = load_full();

    let top = rank_by(&roster, &Metric::Total, Order::Descending, RankLimit::new(3)).unwrap();
    assert_eq!(names(&top), vec!["Hana Sato", "Alice Brown", "Ella Fitzgerald"]);

    let tb = top_and_bottom(&roster, &Metric::Total, RankLimit::new(5)).unwrap();
    assert_eq!(
        names(&tb.bottom),
        vec![
            "Farah Khan",
            "Bilal Hassan",
            "Ivan Horvat",
            "Dmitri Petrov",
            "Liam O'Brien"
        ]
    );
    let top5 = names(&tb.top);
    assert!(names(&tb.bottom).iter().all(|n| !top5.contains(n)));

    let full = rank_by(&roster, &Metric::Total, Order::Ascending, RankLimit::new(100)).unwrap();
    assert_eq!(full.len(), 12);
    assert_eq!(names(&full[5..7]), vec!["Gustavo Lima", "Jamal Wright"]);
}

#[test]
fn test_search() {
    let roster = load_full();

    let found = find_by_name(&roster, "AN").unwrap();
    assert_eq!(
        names(found.students()),
        vec![
            "Bilal Hassan",
            "Farah Khan",
            "Hana Sato",
            "Ivan Horvat",
            "Keiko Tanaka"
        ]
    );

    assert_eq!(find_by_name(&roster, "").unwrap().students().len(), 12);
    assert!(matches!(
        find_by_name(&roster, "zzz-no-such-name").unwrap(),
        SearchOutcome::NoResults
    ));
}

#[test]
fn test_distributions() {
    let roster = load_full();
    let config = EngineConfig::default();

    let averages = roster.students().iter().map(Student::average);
    let dist = distribution(averages, &config.letter_scale);
    assert_eq!(dist.total, 11);
    assert_eq!(dist.missing, 1);
    let counts: Vec<(Letter, usize)> = dist.bands.iter().map(|b| (b.letter, b.count)).collect();
    assert_eq!(
        counts,
        vec![
            (Letter::A, 3),
            (Letter::B, 1),
            (Letter::C, 2),
            (Letter::D, 2),
            (Letter::F, 3)
        ]
    );

    let ssc1 = roster.subjects().index_of("SSC1").unwrap();
    let cumulative = cumulative_at_or_above(roster.subject_column(ssc1), &config.cumulative_thresholds);
    let counts: Vec<usize> = cumulative.iter().map(|t| t.count).collect();
    assert_eq!(counts, vec![0, 3, 6, 8, 10, 10, 10]);
}

#[test]
fn test_missing_file_is_ingestion_error() {
    let err = load_roster("tests/fixtures/does_not_exist.csv", &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Ingestion(IngestionError::Io { .. })));
}

#[test]
fn test_missing_name_column_fails_fast() {
    let config = EngineConfig {
        name_column: "full name".into(),
        ..EngineConfig::default()
    };
    let err = load_roster(ROSTER, &config).unwrap_err();
    assert!(matches!(
        err,
        Error::Ingestion(IngestionError::MissingColumn { ref column }) if column == "full name"
    ));
}

#[test]
fn test_reload_swaps_snapshot() {
    let store = RosterStore::new(load_full());
    let first = store.snapshot();

    let config = EngineConfig {
        subjects: vec!["MATH".into(), "CS101".into()],
        ..EngineConfig::default()
    };
    let version = store.replace(load_roster(THREE, &config).unwrap());

    assert_eq!(version, 2);
    assert_eq!(first.len(), 12);
    assert_eq!(store.snapshot().len(), 3);
}

#[test]
fn test_export_reload_edit_export_recomputes_derived_columns() {
    let config = EngineConfig {
        subjects: vec!["MATH".into(), "CS101".into()],
        ..EngineConfig::default()
    };
    let first = format!("{}/grade_rater_it_export_1.csv", std::env::temp_dir().display());
    let second = format!("{}/grade_rater_it_export_2.csv", std::env::temp_dir().display());

    write_roster_csv(&first, &load_roster(THREE, &config).unwrap(), "student name", false).unwrap();

    let reloaded = load_roster(&first, &config).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert!(reloaded.students()[0].extra().is_empty());

    let edited = reloaded.with_score(0, "MATH", Some(10.0)).unwrap();
    write_roster_csv(&second, &edited, "student name", false).unwrap();

    let content = std::fs::read_to_string(&second).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "student name,MATH,CS101,Total,Average,GPA,Status");
    assert_eq!(lines[1], "A,10,80,90,45,0,Fail");

    std::fs::remove_file(&first).unwrap();
    std::fs::remove_file(&second).unwrap();
}
