use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["treon-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_ratings_summary_defaults() {
    let cli = Cli::try_parse_from(["treon-cli", "ratings", "summary"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Summary {
                brand: None,
                json: false
            }
        })
    ));
}

#[test]
fn parses_ratings_summary_with_brand_and_json() {
    let cli = Cli::try_parse_from(["treon-cli", "ratings", "summary", "--brand", "MAC", "--json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Summary {
                brand: Some(ref b),
                json: true
            }
        }) if b == "MAC"
    ));
}

#[test]
fn parses_ratings_popular_shades() {
    let cli = Cli::try_parse_from(["treon-cli", "ratings", "popular", "--shades"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Popular { shades: true }
        })
    ));
}

#[test]
fn ratings_shade_requires_brand_and_shade() {
    assert!(Cli::try_parse_from(["treon-cli", "ratings", "shade", "--brand", "MAC"]).is_err());

    let cli = Cli::try_parse_from([
        "treon-cli", "ratings", "shade", "--brand", "MAC", "--shade", "Ruby Woo",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Shade { ref brand, ref shade }
        }) if brand == "MAC" && shade == "Ruby Woo"
    ));
}

#[test]
fn parses_ratings_add() {
    let cli = Cli::try_parse_from([
        "treon-cli", "ratings", "add", "--brand", "NARS", "--shade", "Cruella", "--score", "4",
        "--shade-id", "1",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Add {
                ref score,
                shade_id: Some(ref id),
                user: None,
                ..
            }
        }) if score == "4" && id == "1"
    ));
}

#[test]
fn ratings_clear_requires_explicit_confirmation() {
    let cli = Cli::try_parse_from(["treon-cli", "ratings", "clear"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Clear { yes: false }
        })
    ));

    let cli = Cli::try_parse_from(["treon-cli", "ratings", "clear", "--yes"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Ratings {
            command: RatingsCommands::Clear { yes: true }
        })
    ));
}

#[test]
fn ratings_clear_without_yes_leaves_the_file_alone() {
    let dir = std::env::temp_dir().join(format!("treon-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let ratings = dir.join("ratings-clear.json");
    let content = r#"[{ "brand": "MAC", "shade_name": "Ruby Woo", "rating": 5 }]"#;
    std::fs::write(&ratings, content).expect("write ratings");
    let store = treon_store::FileStore::new(&ratings, dir.join("sessions.json"));

    crate::ratings::run(&store, RatingsCommands::Clear { yes: false }).expect("run");
    assert_eq!(std::fs::read_to_string(&ratings).expect("read back"), content);

    crate::ratings::run(&store, RatingsCommands::Clear { yes: true }).expect("run");
    assert_eq!(std::fs::read_to_string(&ratings).expect("read back"), "[]");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn parses_sessions_weekly() {
    let cli = Cli::try_parse_from(["treon-cli", "sessions", "weekly", "--year", "2025", "--month", "5"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Sessions {
            command: SessionsCommands::Weekly {
                year: Some(2025),
                month: Some(5)
            }
        })
    ));
}

#[test]
fn parses_sessions_recent_limit() {
    let cli = Cli::try_parse_from(["treon-cli", "sessions", "recent", "--limit", "3"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Sessions {
            command: SessionsCommands::Recent { limit: Some(3) }
        })
    ));
}

#[test]
fn parses_catalog_count() {
    let cli = Cli::try_parse_from(["treon-cli", "catalog", "count"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Count
        })
    ));
}

#[test]
fn global_path_flags_follow_subcommands() {
    let cli = Cli::try_parse_from([
        "treon-cli",
        "sessions",
        "average",
        "--sessions-path",
        "/tmp/s.json",
        "--ratings-path",
        "/tmp/r.json",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.sessions_path, Some(PathBuf::from("/tmp/s.json")));
    assert_eq!(cli.ratings_path, Some(PathBuf::from("/tmp/r.json")));
}

#[test]
fn overrides_replace_configured_paths() {
    let cli = Cli::try_parse_from(["treon-cli", "--ratings-path", "/tmp/r.json"])
        .expect("expected valid cli args");
    let mut config = AppConfig {
        env: treon_core::Environment::Test,
        bind_addr: "127.0.0.1:3000".parse().expect("addr"),
        log_level: "info".to_string(),
        ratings_path: PathBuf::from("./data/ratings.json"),
        sessions_path: PathBuf::from("./data/sessions.json"),
        daily_sessions_path: None,
        catalog_path: None,
        recent_sessions_limit: 8,
    };

    apply_overrides(&mut config, &cli);
    assert_eq!(config.ratings_path, PathBuf::from("/tmp/r.json"));
    assert_eq!(config.sessions_path, PathBuf::from("./data/sessions.json"));
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["treon-cli", "report"]).is_err());
}
