use importer::{
    CsvImporter, FieldMapping, ImportOptions, ResultImporter, ScrapedJsonImporter, group_races,
    score_groups,
};
use rust_decimal::Decimal;
use scoring::models::{Course, Gender, NormalizationConfig, RunnerStatus};

const MEET_CSV: &str = "\
Place,Athlete,School,Time,Gender,Race,Bib
1,Edward Innes,Westmont,17:51.2,Boys,Varsity,101
2,Edgar Gomez Tapia,Westmont,17:52.0,Boys,Varsity,102
3,Noah Kim,Westmont,17:53.4,Boys,Varsity,103
4,Luis Ortega,Westmont,17:54.1,Boys,Varsity,104
5,Jack Hale,Westmont,17:54.9,Boys,Varsity,105
6,Ravi Patel,Dos Pueblos,18:05.3,Boys,Varsity,201
7,Owen Ford,Dos Pueblos,18:12.8,Boys,Varsity,202
8,Ben Cruz,Dos Pueblos,18:20,Boys,Varsity,203
9,Marco Diaz,Dos Pueblos,18:31.7,Boys,Varsity,204
10,Sam Lee,Westmont,18:40.0,Boys,Varsity,106
11,Tom Reyes,Westmont,DNF,Boys,Varsity,107
1,Ana Ruiz,Dos Pueblos,19:40.1,Girls,Varsity,301
1,Will Hart,Westmont,19:01,Boys,JV,401
";

fn mapping() -> FieldMapping {
    FieldMapping {
        full_name: Some("Athlete".to_string()),
        school: Some("School".to_string()),
        time: Some("Time".to_string()),
        gender: Some("Gender".to_string()),
        place: Some("Place".to_string()),
        race: Some("Race".to_string()),
        bib: Some("Bib".to_string()),
        ..Default::default()
    }
}

fn five_k(rating: Decimal) -> Course {
    Course::new("Elings Park", 5000, rating).unwrap()
}

#[test]
fn test_csv_to_team_scores() {
    let outcome = CsvImporter
        .import(MEET_CSV, &mapping(), &ImportOptions::default())
        .unwrap();

    assert_eq!(outcome.summary.processed, 13);
    assert_eq!(outcome.summary.imported, 12);
    assert_eq!(outcome.summary.invalid_time, 1);

    let groups = group_races(&outcome.results);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Varsity Boys", "Varsity Girls", "JV Boys"]);
    assert_eq!(groups[0].results_count(), 10);

    let reports = score_groups(
        &groups,
        &five_k(Decimal::ONE),
        None,
        &NormalizationConfig::default(),
    )
    .unwrap();

    let varsity = &reports[0];
    assert_eq!(varsity.teams.len(), 1, "Dos Pueblos has only four finishers");

    let westmont = &varsity.teams[0];
    assert_eq!(westmont.school_name, "Westmont");
    assert_eq!(westmont.place, 1);
    assert_eq!(westmont.runners.len(), 6);
    assert_eq!(westmont.counting_runners().count(), 5);
    assert_eq!(westmont.runners[5].status, RunnerStatus::Displacer);
    assert_eq!(westmont.runners[5].name, "Sam Lee");
    // overall place counts the Dos Pueblos runners ahead of him
    assert_eq!(westmont.runners[5].overall_place, 10);

    let expected: u64 = [107_120, 107_200, 107_340, 107_410, 107_490].iter().sum();
    assert_eq!(westmont.score, expected);
    assert_eq!(westmont.total_time, expected);
    assert_eq!(westmont.spread, 370);

    assert!(reports[1].teams.is_empty());
    assert!(reports[2].teams.is_empty());
}

#[test]
fn test_harder_course_lowers_scores() {
    let outcome = CsvImporter
        .import(MEET_CSV, &mapping(), &ImportOptions::default())
        .unwrap();
    let groups = group_races(&outcome.results);
    let config = NormalizationConfig::default();

    let neutral = score_groups(&groups, &five_k(Decimal::ONE), None, &config).unwrap();
    let harder = score_groups(&groups, &five_k(Decimal::new(105, 2)), None, &config).unwrap();

    assert!(harder[0].teams[0].score < neutral[0].teams[0].score);
    assert_eq!(harder[0].teams[0].total_time, neutral[0].teams[0].total_time);
}

#[test]
fn test_scraped_json_matches_csv() {
    let scraped = r#"[
        {"Place": 1, "Athlete": "Edward Innes", "School": "Westmont", "Time": "17:51.2", "Gender": "Boys", "Race": "Varsity", "Bib": 101},
        {"Place": 2, "Athlete": "Edgar Gomez Tapia", "School": "Westmont", "Time": "17:52.0", "Gender": "Boys", "Race": "Varsity", "Bib": 102}
    ]"#;

    let from_json = ScrapedJsonImporter
        .import(scraped, &mapping(), &ImportOptions::default())
        .unwrap();
    let from_csv = CsvImporter
        .import(MEET_CSV, &mapping(), &ImportOptions::default())
        .unwrap();

    assert_eq!(from_json.results[..], from_csv.results[..2]);
    assert_eq!(from_json.results[1].gender, Gender::Male);
}

#[test]
fn test_one_absurd_time_does_not_sink_the_report() {
    let input = "\
Athlete,School,Time,Race
A One,Westmont,17:00,Varsity
B Two,Westmont,17:10,Varsity
C Three,Westmont,17:20,Varsity
D Four,Westmont,17:30,Varsity
E Five,Westmont,17:40,Varsity
F F,Westmont,700000:00,Varsity
";
    let outcome = CsvImporter
        .import(input, &mapping(), &ImportOptions::default())
        .unwrap();
    assert_eq!(outcome.results.len(), 6);

    let groups = group_races(&outcome.results);
    let short = Course::new("Short", 4000, Decimal::ONE).unwrap();
    let reports = score_groups(&groups, &short, None, &NormalizationConfig::default()).unwrap();

    assert_eq!(reports[0].results_count, 6);
    assert_eq!(reports[0].unscored_results, 1);
    assert_eq!(reports[0].teams.len(), 1);
    assert_eq!(reports[0].teams[0].runners.len(), 5);
}

#[test]
fn test_duplicate_bibs_are_reported() {
    let input = "\
Athlete,School,Time,Bib
Ed Innes,Westmont,17:51.2,101
Sam Lee,Westmont,18:40.0,101
";
    let outcome = CsvImporter
        .import(input, &mapping(), &ImportOptions::default())
        .unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w == "Bib '101' appears on more than one result"));
}
