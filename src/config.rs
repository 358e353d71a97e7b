use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use log::LevelFilter;

/// Upper bound for `--histogram-bins`; up to nine histograms are rebuilt on
/// every filter change.
pub const MAX_HISTOGRAM_BINS: usize = 500;

/// Command line / environment configuration.
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "wine-explorer",
    version,
    about = "Wine catalog explorer and price estimator"
)]
pub struct Config {
    #[clap(long, env = "WINE_CATALOG", default_value = "wine_dataset.parquet")]
    pub catalog: PathBuf,

    #[clap(
        long,
        env = "WINE_CLIENTS",
        default_value = "client_wine.parquet",
        help = "Bottles offered for price estimation"
    )]
    pub clients: PathBuf,

    #[clap(
        long,
        default_value_t = 30,
        help = "Number of bins in price histograms, at most 500"
    )]
    pub histogram_bins: usize,

    #[clap(long, short, default_value = "info")]
    pub log_level: String,

    #[clap(long, help = "Image shown at the top of the sidebar")]
    pub logo: Option<PathBuf>,

    #[clap(long, help = "Image shown on the home page")]
    pub banner: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_HISTOGRAM_BINS).contains(&self.histogram_bins),
            "--histogram-bins must be between 1 and {MAX_HISTOGRAM_BINS}"
        );
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| anyhow::anyhow!("invalid log level '{}'", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["wine-explorer"]).unwrap();
        assert_eq!(cfg.histogram_bins, 30);
        assert_eq!(cfg.level_filter().unwrap(), LevelFilter::Info);
        assert!(cfg.logo.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn explicit_paths_and_options() {
        let cfg = Config::try_parse_from([
            "wine-explorer",
            "--catalog",
            "data/wines.csv",
            "--clients",
            "data/clients.json",
            "--histogram-bins",
            "12",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(cfg.catalog, PathBuf::from("data/wines.csv"));
        assert_eq!(cfg.clients, PathBuf::from("data/clients.json"));
        assert_eq!(cfg.histogram_bins, 12);
        assert_eq!(cfg.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cfg = Config::try_parse_from(["wine-explorer", "--histogram-bins", "0"]).unwrap();
        assert!(cfg.validate().is_err());

        let cfg = Config::try_parse_from(["wine-explorer", "--log-level", "chatty"]).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn histogram_bins_are_capped() {
        let cfg = Config::try_parse_from(["wine-explorer", "--histogram-bins", "500"]).unwrap();
        cfg.validate().unwrap();

        let cfg = Config::try_parse_from(["wine-explorer", "--histogram-bins", "501"]).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("between 1 and 500"));
    }
}
