use chrono::NaiveDate;
use std::{fs, path::PathBuf};
use wx_viewer::{doctest::make_test_sounding, wyoming::parse_response, Sounding};

pub fn load_all_test_soundings() -> [Sounding; 2] {
    let valid_time = NaiveDate::from_ymd_opt(2013, 5, 20)
        .and_then(|day| day.and_hms_opt(12, 0, 0))
        .expect("valid date");
    let page = load_test_file("oun_2013052012.html");
    let oun = parse_response(&page, "OUN", valid_time).expect("oops");

    [oun, make_test_sounding()]
}

pub fn load_test_file(fname: &str) -> String {
    let mut test_path = PathBuf::new();
    test_path.push("tests");
    test_path.push("data");
    test_path.push(fname);

    fs::read_to_string(&test_path).expect(&format!("Error reading file: {:#?}", test_path))
}
