// Entry point and high-level CLI flow.
//
// - With `--page` or `--export` the dashboard is rendered (or exported) once
//   for the filters given on the command line.
// - Otherwise an interactive menu lets the user switch between the Home and
//   Progress pages and edit the filters, recomputing on every change.
mod shell;

use clap::Parser;
use rust_dashboard::config::{
    DashboardConfig, DEFAULT_CURRENCY, DEFAULT_DATA_PATH, DEFAULT_PREVIEW_ROWS, DEFAULT_SHEET,
    DEFAULT_TARGET,
};
use rust_dashboard::error::DashboardError;
use rust_dashboard::types::{Column, FilterColumn};
use rust_dashboard::Session;
use shell::{Page, Shell};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rust_dashboard", version)]
#[command(about = "Descriptive data analysis dashboard for a policy spreadsheet")]
struct Cli {
    /// Spreadsheet (.xlsx, .xls, .ods) or .csv file with the policy sheet.
    #[arg(long, env = "DASHBOARD_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
    /// Sheet to read; a .csv file has one sheet named after the file stem.
    #[arg(long, env = "DASHBOARD_SHEET", default_value = DEFAULT_SHEET)]
    sheet: String,
    /// Investment target for the progress page.
    #[arg(long, env = "DASHBOARD_TARGET", default_value_t = DEFAULT_TARGET, allow_negative_numbers = true)]
    target: f64,
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,
    /// Regions to keep (default: all). Pass the flag with no value to keep none.
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    region: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    location: Option<Vec<String>>,
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    construction: Option<Vec<String>>,
    /// Columns of the database table (default: all).
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,
    /// Render one page and exit instead of opening the menu.
    #[arg(long, value_enum)]
    page: Option<Page>,
    /// Write the filtered rows and a JSON summary into this directory.
    #[arg(long)]
    export: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<DashboardConfig, DashboardError> {
        let display_columns = match &self.columns {
            Some(names) => names
                .iter()
                .filter(|n| !n.trim().is_empty())
                .map(|n| n.parse::<Column>())
                .collect::<Result<Vec<_>, _>>()?,
            None => Column::ALL.to_vec(),
        };
        let config = DashboardConfig {
            data_path: self.data.clone(),
            sheet: self.sheet.clone(),
            target: self.target,
            currency: self.currency.clone(),
            display_columns,
            preview_rows: self.preview_rows,
        };
        config.validate()?;
        Ok(config)
    }

    /// Filter values given on the command line, applied once the data is loaded.
    fn initial_filters(&self) -> Vec<(FilterColumn, Vec<String>)> {
        [
            (FilterColumn::Region, &self.region),
            (FilterColumn::Location, &self.location),
            (FilterColumn::Construction, &self.construction),
        ]
        .into_iter()
        .filter_map(|(column, values)| {
            values.as_ref().map(|v| {
                let kept = v
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                (column, kept)
            })
        })
        .collect()
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = match cli.config() {
        Ok(c) => c,
        Err(e) => {
            shell::report(&e);
            return ExitCode::FAILURE;
        }
    };
    let mut app = Shell::new(Session::new(config), cli.initial_filters());

    if cli.page.is_none() && cli.export.is_none() {
        return match app.run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Terminal error: {:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    let mut ok = true;
    if let Some(page) = cli.page {
        match app.render(page) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                shell::report(&e);
                ok = false;
            }
        }
    }
    if let Some(dir) = &cli.export {
        ok &= app.export(dir);
    }
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_flag_keeps_nothing_and_absent_flag_keeps_all() {
        let cli = Cli::parse_from(["rust_dashboard", "--region", "--location", "Urban,Rural"]);
        let filters = cli.initial_filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0], (FilterColumn::Region, Vec::<String>::new()));
        assert_eq!(
            filters[1],
            (FilterColumn::Location, vec!["Urban".to_string(), "Rural".to_string()])
        );
    }

    #[test]
    fn unknown_display_column_is_rejected() {
        let cli = Cli::parse_from(["rust_dashboard", "--columns", "Policy,Colour"]);
        assert!(matches!(cli.config(), Err(DashboardError::Filter(_))));
    }

    #[test]
    fn negative_target_is_a_config_error() {
        let cli = Cli::parse_from(["rust_dashboard", "--target", "-5"]);
        assert!(matches!(cli.config(), Err(DashboardError::Config(_))));
    }
}
