use super::*;

#[test]
fn parses_parse_input_command() {
    let cli = Cli::try_parse_from(["listcheck", "parse-input", "sheet.csv"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::ParseInput { ref csv, out: None } if csv == &PathBuf::from("sheet.csv")
    ));
}

#[test]
fn parses_extract_with_hints() {
    let cli = Cli::try_parse_from([
        "listcheck",
        "extract",
        "https://www.autodrive.example/byd/seal",
        "--brand",
        "BYD",
        "--model",
        "Seal",
        "--append",
        "results.json",
    ])
    .expect("expected valid cli args");

    let Commands::Extract {
        url,
        source,
        brand,
        model,
        append,
    } = cli.command
    else {
        panic!("expected extract command");
    };
    assert_eq!(url, "https://www.autodrive.example/byd/seal");
    assert!(source.is_none());
    assert_eq!(brand.as_deref(), Some("BYD"));
    assert_eq!(model.as_deref(), Some("Seal"));
    assert_eq!(append, Some(PathBuf::from("results.json")));
}

#[test]
fn parses_compare_with_row() {
    let cli = Cli::try_parse_from([
        "listcheck",
        "compare",
        "--records",
        "records.json",
        "--results",
        "results.json",
        "--row",
        "4",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Compare { row: Some(4), .. }));
}

#[test]
fn save_report_requires_out() {
    let result = Cli::try_parse_from([
        "listcheck",
        "save-report",
        "--records",
        "records.json",
        "--results",
        "results.json",
    ]);
    assert!(result.is_err());
}

#[test]
fn help_is_reported_by_the_parser() {
    let err = Cli::try_parse_from(["listcheck", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

    let err = Cli::try_parse_from(["listcheck", "extract", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["listcheck"]).is_err());
}
