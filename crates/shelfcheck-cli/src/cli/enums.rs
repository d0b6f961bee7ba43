use clap::ValueEnum;

/// Config file format written by `init`
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum ConfigFormat {
    /// shelfcheck.json
    #[default]
    #[value(name = "json")]
    Json,

    /// shelfcheck.toml
    #[value(name = "toml")]
    Toml,
}

impl ConfigFormat {
    /// File name the format is written to.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Json => "shelfcheck.json",
            Self::Toml => "shelfcheck.toml",
        }
    }
}
