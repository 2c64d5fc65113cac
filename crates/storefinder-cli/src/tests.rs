use super::*;

#[test]
fn parses_find_with_postal_code_and_items() {
    let cli = Cli::try_parse_from([
        "storefinder-cli",
        "find",
        "--postal-code",
        "V6B 1A1",
        "--item",
        "Blue Dream",
        "--item",
        "OG Kush",
    ])
    .expect("expected valid cli args");

    let Commands::Find(args) = cli.command else {
        panic!("expected find command");
    };
    let params = args.into_params();
    assert_eq!(params.postal_code.as_deref(), Some("V6B 1A1"));
    assert_eq!(params.desired_items, vec!["Blue Dream", "OG Kush"]);
    assert!(params.search_radius.is_none());
}

#[test]
fn parses_find_with_negative_longitude() {
    let cli = Cli::try_parse_from([
        "storefinder-cli",
        "find",
        "--lat",
        "49.28",
        "--lng",
        "-123.12",
        "--radius",
        "10",
    ])
    .expect("expected valid cli args");

    let Commands::Find(args) = cli.command else {
        panic!("expected find command");
    };
    let request = args.into_params().into_request().expect("valid request");
    assert_eq!(request.location.to_string(), "49.28,-123.12");
    assert_eq!(request.search_radius, Some(10.0));
}

#[test]
fn find_rejects_latitude_without_longitude() {
    let result = Cli::try_parse_from(["storefinder-cli", "find", "--lat", "49.28"]);
    assert!(result.is_err());
}

#[test]
fn parses_extract_with_file() {
    let cli = Cli::try_parse_from(["storefinder-cli", "extract", "--file", "answer.txt"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Extract { file: Some(ref f) } if f.as_os_str() == "answer.txt"
    ));
}

#[test]
fn parses_extract_from_stdin() {
    let cli = Cli::try_parse_from(["storefinder-cli", "extract"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Extract { file: None }));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["storefinder-cli"]).is_err());
}

#[test]
fn render_reports_method_and_stores() {
    let rendered = extract::render("Here you go: [{\"name\": \"Green Leaf\"}]");
    assert_eq!(rendered["method"], "bracket_span");
    assert_eq!(rendered["stores"][0]["name"], "Green Leaf");
}

#[test]
fn render_reports_diagnostic_fallback() {
    let rendered = extract::render("no stores today");
    assert_eq!(rendered["method"], "diagnostic");
    assert_eq!(rendered["stores"][0]["details"], "no stores today");
}
