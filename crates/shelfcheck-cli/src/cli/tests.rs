#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command, ConfigFormat};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn verify_overrides_parse() {
        let cli = Cli::parse_from([
            "shelfcheck",
            "verify",
            "--config",
            "smartphones.toml",
            "--target-url",
            "https://market.example",
            "--timeout-minutes",
            "3",
            "--headed",
            "--evidence-dir",
            "evidence",
        ]);

        let Command::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.config, Some(PathBuf::from("smartphones.toml")));
        assert_eq!(args.target_url.as_deref(), Some("https://market.example"));
        assert_eq!(args.timeout_minutes, Some(3));
        assert!(args.headed);
        assert_eq!(args.evidence_dir, Some(PathBuf::from("evidence")));
    }

    #[test]
    fn verify_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["shelfcheck", "verify"]);
        let Command::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert!(args.config.is_none());
        assert!(args.timeout_minutes.is_none());
        assert!(!args.headed);
        assert!(args.scenarios.is_empty());
    }

    #[test]
    fn scenario_flag_repeats() {
        let cli = Cli::parse_from([
            "shelfcheck",
            "verify",
            "--scenario",
            "Notebooks",
            "-s",
            "Smartphones",
        ]);
        let Command::Verify(args) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.scenarios, ["Notebooks", "Smartphones"]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["shelfcheck", "check", "--verbose", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert!(!cli.quiet);
    }

    #[test]
    fn verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["shelfcheck", "-v", "-q", "check"]);
        assert!(result.is_err());
    }

    #[test]
    fn init_format() {
        let cli = Cli::parse_from(["shelfcheck", "init", "--format", "toml", "--force"]);
        let Command::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.format, ConfigFormat::Toml);
        assert!(args.force);

        let cli = Cli::parse_from(["shelfcheck", "init"]);
        let Command::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.format, ConfigFormat::Json);
    }

    #[test]
    fn unknown_init_format_is_rejected() {
        assert!(Cli::try_parse_from(["shelfcheck", "init", "--format", "yaml"]).is_err());
    }

    #[test]
    fn negative_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["shelfcheck", "verify", "--timeout-minutes", "-1"]).is_err());
    }
}
