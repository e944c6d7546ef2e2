// Terminal presentation of the dashboard: the navigation menu, the two
// pages and the multiselect prompts. Every failure from the library ends up
// in `report`, which prints it and lets the menu carry on.
use anyhow::Result;
use clap::ValueEnum;
use log::error;
use rust_dashboard::dashboard::{compute, DashboardView};
use rust_dashboard::error::DashboardError;
use rust_dashboard::filter::FilterSelection;
use rust_dashboard::output;
use rust_dashboard::types::{Column, FilterColumn};
use rust_dashboard::util::format_int;
use rust_dashboard::Session;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    Home,
    Progress,
}

pub struct Shell {
    session: Session,
    selection: Option<FilterSelection>,
    initial_filters: Vec<(FilterColumn, Vec<String>)>,
}

/// Print a failure the way every page does: a headline and the detail.
pub fn report(err: &DashboardError) {
    error!("{}", err);
    println!("Warning: {}", err.user_message());
    println!("Details: {}\n", err);
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// What the user typed at a multiselect prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Pick {
    Done,
    All,
    None,
    Toggle(Vec<usize>),
}

/// Parse `1,3 4`, `a`, `n` or a blank line; numbers are 1-based and at most `max`.
pub fn parse_pick(input: &str, max: usize) -> Result<Pick, String> {
    let input = input.trim();
    match input.to_ascii_lowercase().as_str() {
        "" => return Ok(Pick::Done),
        "a" | "all" => return Ok(Pick::All),
        "n" | "none" => return Ok(Pick::None),
        _ => {}
    }
    let mut picks = Vec::new();
    for part in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if part.is_empty() {
            continue;
        }
        match part.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => picks.push(n - 1),
            _ => return Err(format!("'{}' is not a number between 1 and {}", part, max)),
        }
    }
    Ok(Pick::Toggle(picks))
}

impl Shell {
    pub fn new(session: Session, initial_filters: Vec<(FilterColumn, Vec<String>)>) -> Self {
        Shell {
            session,
            selection: None,
            initial_filters,
        }
    }

    /// The current selection, created from the dataset on first use.
    fn take_selection(&mut self) -> Result<FilterSelection, DashboardError> {
        if let Some(sel) = self.selection.take() {
            return Ok(sel);
        }
        let first_load = !self.session.is_loaded();
        let dataset = self.session.dataset()?;
        if first_load {
            let report = self.session.load_report()?;
            println!(
                "Processing dataset... ({} rows loaded)",
                format_int(report.loaded_rows)
            );
            if report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped due to parse/validation errors.",
                    format_int(report.skipped_rows)
                );
            }
            println!();
        }
        let mut sel = FilterSelection::all(dataset);
        for (column, values) in &self.initial_filters {
            sel.set(*column, values.iter().cloned());
        }
        Ok(sel)
    }

    fn with_view<T>(
        &mut self,
        f: impl FnOnce(&Session, &FilterSelection, &DashboardView<'_>) -> T,
    ) -> Result<T, DashboardError> {
        let selection = self.take_selection()?;
        let result = self
            .session
            .dataset()
            .map_err(DashboardError::from)
            .and_then(|dataset| compute(dataset, &selection, self.session.config()))
            .map(|view| f(&self.session, &selection, &view));
        self.selection = Some(selection);
        result
    }

    pub fn render(&mut self, page: Page) -> Result<String, DashboardError> {
        self.with_view(|session, _, dv| {
            let cfg = session.config();
            let mut out = String::new();
            match page {
                Page::Home => {
                    out.push_str("My Database\n\n");
                    out.push_str(&output::render_database(
                        &dv.view,
                        &cfg.display_columns,
                        cfg.preview_rows,
                    ));
                    out.push('\n');
                    out.push_str(&output::render_metrics(&dv.summary, &cfg.currency));
                }
                Page::Progress => {
                    out.push_str(&output::render_progress(&dv.progress, &cfg.currency));
                }
            }
            out.push_str("\n---\n\n");
            out.push_str(&graphs(dv));
            out
        })
    }

    /// Write `filtered.csv` and `summary.json` into `dir`. Returns false on failure.
    pub fn export(&mut self, dir: &Path) -> bool {
        let written = self.with_view(|session, selection, dv| {
            let dataset = session.dataset()?;
            let rows: Vec<_> = dv.view.rows().iter().map(|r| (*r).clone()).collect();
            let csv_path = dir.join("filtered.csv");
            let json_path = dir.join("summary.json");
            let wrote = output::write_csv(&csv_path, &rows)
                .and_then(|_| output::write_json(&json_path, &dv.snapshot(dataset, selection)));
            Ok::<_, DashboardError>((wrote, rows.len(), csv_path, json_path))
        });
        match written {
            Ok(Ok((Ok(()), n, csv_path, json_path))) => {
                println!(
                    "Exported {} rows to {} and the summary to {}\n",
                    format_int(n),
                    csv_path.display(),
                    json_path.display()
                );
                true
            }
            Ok(Ok((Err(e), ..))) => {
                eprintln!("Write error: {}\n", e);
                false
            }
            Ok(Err(e)) | Err(e) => {
                report(&e);
                false
            }
        }
    }

    /// Main menu loop; returns when the user exits.
    pub fn run(&mut self) -> Result<()> {
        loop {
            println!("Main Menu");
            println!("[1] Home");
            println!("[2] Progress");
            println!("[3] Filter data");
            println!("[4] Choose columns");
            println!("[5] Export");
            println!("[0] Exit\n");
            match prompt("Enter choice: ")?.as_str() {
                "1" => self.show(Page::Home),
                "2" => self.show(Page::Progress),
                "3" => self.edit_filters()?,
                "4" => self.choose_columns()?,
                "5" => {
                    let dir = prompt("Export directory (blank = current): ")?;
                    let dir = if dir.is_empty() { ".".to_string() } else { dir };
                    self.export(Path::new(&dir));
                }
                "0" => {
                    println!("Exiting the program.");
                    return Ok(());
                }
                _ => println!("Invalid choice. Please enter a number from 0 to 5.\n"),
            }
        }
    }

    fn show(&mut self, page: Page) {
        println!();
        match self.render(page) {
            Ok(text) => println!("{}", text),
            Err(e) => report(&e),
        }
    }

    fn edit_filters(&mut self) -> Result<()> {
        let mut selection = match self.take_selection() {
            Ok(s) => s,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };
        let outcome = self.edit_selection(&mut selection);
        self.selection = Some(selection);
        outcome
    }

    fn edit_selection(&self, selection: &mut FilterSelection) -> Result<()> {
        let dataset = match self.session.dataset() {
            Ok(d) => d,
            Err(e) => {
                report(&e.into());
                return Ok(());
            }
        };
        loop {
            println!("\nPlease Filter Here!");
            for (i, column) in FilterColumn::ALL.iter().enumerate() {
                println!(
                    "[{}] {} ({} of {} selected)",
                    i + 1,
                    column,
                    selection.accepted(*column).len(),
                    dataset.distinct(*column).len()
                );
            }
            println!("[0] Back\n");
            let column = match prompt("Enter choice: ")?.as_str() {
                "1" => FilterColumn::Region,
                "2" => FilterColumn::Location,
                "3" => FilterColumn::Construction,
                "0" | "" => {
                    println!();
                    return Ok(());
                }
                _ => {
                    println!("Invalid choice. Please enter a number from 0 to 3.");
                    continue;
                }
            };

            let values = dataset.distinct(column);
            loop {
                println!("\nSelect the {}:", column);
                for (i, v) in values.iter().enumerate() {
                    let mark = if selection.accepted(column).contains(v) { "x" } else { " " };
                    println!(" [{}] {}. {}", mark, i + 1, v);
                }
                let line = prompt("Toggle numbers (e.g. 1,3), 'a' = all, 'n' = none, blank = done: ")?;
                match parse_pick(&line, values.len()) {
                    Ok(Pick::Done) => break,
                    Ok(Pick::All) => selection.select_all(column, dataset),
                    Ok(Pick::None) => selection.select_none(column),
                    Ok(Pick::Toggle(idx)) => {
                        for i in idx {
                            selection.toggle(column, &values[i]);
                        }
                    }
                    Err(msg) => println!("{}", msg),
                }
            }
        }
    }

    fn choose_columns(&mut self) -> Result<()> {
        let mut shown = self.session.config().display_columns.clone();
        loop {
            println!("\nFilter the Data Columns:");
            for (i, c) in Column::ALL.iter().enumerate() {
                let mark = if shown.contains(c) { "x" } else { " " };
                println!(" [{}] {}. {}", mark, i + 1, c);
            }
            let line = prompt("Toggle numbers (e.g. 1,3), 'a' = all, 'n' = none, blank = done: ")?;
            match parse_pick(&line, Column::ALL.len()) {
                Ok(Pick::Done) => break,
                Ok(Pick::All) => shown = Column::ALL.to_vec(),
                Ok(Pick::None) => shown.clear(),
                Ok(Pick::Toggle(idx)) => {
                    for i in idx {
                        let c = Column::ALL[i];
                        if let Some(pos) = shown.iter().position(|s| *s == c) {
                            shown.remove(pos);
                        } else {
                            shown.push(c);
                        }
                    }
                    // Keep schema order regardless of toggle order.
                    shown.sort();
                }
                Err(msg) => println!("{}", msg),
            }
        }
        println!();
        self.session.config_mut().display_columns = shown;
        Ok(())
    }
}

fn graphs(dv: &DashboardView<'_>) -> String {
    let mut out = String::new();
    out.push_str(&output::render_line_chart("Investment by State", &dv.by_state));
    out.push('\n');
    out.push_str(&output::render_bar_chart(
        "Investment by Business Type",
        &dv.by_business_type,
    ));
    out.push('\n');
    out.push_str(&output::render_pie("Ratings by Regions", &dv.rating_by_state));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_dashboard::config::DashboardConfig;
    use rust_dashboard::dataset::Dataset;
    use rust_dashboard::types::Record;

    fn record(region: &str, state: &str, investment: f64) -> Record {
        Record {
            policy: "1".into(),
            expiry: None,
            location: "Urban".into(),
            state: state.into(),
            region: region.into(),
            investment,
            construction: "Frame".into(),
            business_type: "Retail".into(),
            earthquake: "No".into(),
            flood: "No".into(),
            rating: 2.0,
        }
    }

    fn shell(initial: Vec<(FilterColumn, Vec<String>)>) -> Shell {
        let ds = Dataset::from_records(vec![
            record("A", "Nairobi", 100.0),
            record("A", "Kisumu", 200.0),
            record("B", "Nairobi", 300.0),
        ]);
        let cfg = DashboardConfig {
            target: 1000.0,
            ..DashboardConfig::default()
        };
        Shell::new(Session::with_dataset(cfg, ds), initial)
    }

    #[test]
    fn parses_picks() {
        assert_eq!(parse_pick("", 3), Ok(Pick::Done));
        assert_eq!(parse_pick("A", 3), Ok(Pick::All));
        assert_eq!(parse_pick("n", 3), Ok(Pick::None));
        assert_eq!(parse_pick("1, 3", 3), Ok(Pick::Toggle(vec![0, 2])));
        assert!(parse_pick("4", 3).is_err());
        assert!(parse_pick("0", 3).is_err());
        assert!(parse_pick("x", 3).is_err());
    }

    #[test]
    fn home_page_shows_database_metrics_and_charts() {
        let mut sh = shell(vec![(FilterColumn::Region, vec!["A".into()])]);
        let text = sh.render(Page::Home).expect("render");
        assert!(text.contains("My Database"));
        assert!(text.contains("SUM KSH"));
        assert!(text.contains("300"));
        assert!(text.contains("Investment by State"));
        assert!(text.contains("Ratings by Regions"));
    }

    #[test]
    fn progress_page_reports_percent() {
        let mut sh = shell(Vec::new());
        let text = sh.render(Page::Progress).expect("render");
        assert!(text.contains("You have achieved 60% of 1,000 KSH"));
    }

    #[test]
    fn empty_selection_still_renders() {
        let mut sh = shell(vec![(FilterColumn::Construction, Vec::new())]);
        let text = sh.render(Page::Home).expect("render");
        assert!(text.contains("no data"));
        assert!(text.contains("(no rows)"));
    }

    #[test]
    fn export_writes_both_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sh = shell(Vec::new());
        assert!(sh.export(dir.path()));
        let csv = std::fs::read_to_string(dir.path().join("filtered.csv")).expect("csv");
        assert!(csv.starts_with("Policy,Expiry,Location"));
        assert_eq!(csv.lines().count(), 4);
        let json = std::fs::read_to_string(dir.path().join("summary.json")).expect("json");
        assert!(json.contains("\"filtered_rows\": 3"));
    }
}
