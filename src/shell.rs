//! Interactive, page-driven front end.
//!
//! Reads one answer per line from any [`BufRead`] and writes prompts to any
//! [`Write`], so it runs against a terminal or against scripted input in
//! tests. End of input ends the session.

use std::io::{BufRead, Write};

use chrono::NaiveDate;
use console::style;
use tracing::{debug, info, instrument};

use crate::app::{AppState, Event, Notice, Page, transition};
use crate::error::{AmError, Result};
use crate::storage::{ApplianceAttrs, HouseSummary, NewDocument, Storage};

/// Interactive session over a storage handle.
pub struct Shell<'a, R, W> {
    storage: &'a Storage,
    input: R,
    out: W,
    state: AppState,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(storage: &'a Storage, input: R, out: W) -> Self {
        Self {
            storage,
            input,
            out,
            state: AppState::new(),
        }
    }

    /// Runs until the user quits or input ends; returns the final state.
    #[instrument(skip(self))]
    pub fn run(mut self) -> Result<AppState> {
        info!("Interactive session started");
        while !self.state.is_finished() {
            let events = match self.state.page {
                Page::Menu => self.menu()?,
                Page::AddHouse => self.add_house()?,
                Page::AddAppliance => self.add_appliance()?,
                Page::ViewAppliances => self.view_appliances()?,
                Page::AddDocument => self.add_document()?,
                Page::GenerateIdentifier => self.generate_identifier()?,
                Page::Exit => break,
            };
            let Some(events) = events else {
                debug!("Input closed");
                break;
            };
            for event in events {
                self.state = transition(&self.state, event);
            }
            self.show_notice()?;
        }
        info!("Interactive session ended");
        Ok(self.state)
    }

    // === Pages ===

    fn menu(&mut self) -> Result<Option<Vec<Event>>> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", style(Page::Menu.title()).bold().underlined())?;
        for (i, page) in Page::MENU.iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, page.title())?;
        }
        let Some(choice) = self.prompt("Menu")? else {
            return Ok(None);
        };
        let event = match Page::from_choice(&choice) {
            Some(Page::Exit) => Event::Quit,
            Some(page) => Event::Select(page),
            None => Event::Failed {
                message: format!("Unknown menu choice: {choice}"),
                recoverable: true,
            },
        };
        Ok(Some(vec![event]))
    }

    fn add_house(&mut self) -> Result<Option<Vec<Event>>> {
        self.heading()?;
        let Some(name) = self.prompt("House Name")? else {
            return Ok(None);
        };
        let Some(address) = self.prompt("House Address")? else {
            return Ok(None);
        };

        Ok(Some(match self.storage.add_house(&name, Some(&address)) {
            Ok(id) => vec![
                Event::HouseSelected(id),
                Event::Completed(format!("House added with ID: {id}")),
            ],
            Err(e) => vec![failure(&e)],
        }))
    }

    fn add_appliance(&mut self) -> Result<Option<Vec<Event>>> {
        self.heading()?;
        let houses = match self.storage.get_houses() {
            Ok(houses) => houses,
            Err(e) => return Ok(Some(vec![failure(&e)])),
        };
        if !self.list_houses(&houses)? {
            return Ok(Some(vec![Event::Failed {
                message: "No houses yet: add a house first".to_string(),
                recoverable: false,
            }]));
        }
        let Some(house_id) = self.prompt_house()? else {
            return Ok(None);
        };
        let house_id = match house_id {
            Ok(id) => id,
            Err(e) => return Ok(Some(vec![failure(&e)])),
        };

        let mut answers = Vec::with_capacity(5);
        for label in ["Appliance Name", "Description", "Brand", "Model", "Purchase Date (YYYY-MM-DD)"] {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            answers.push(answer);
        }
        let [name, description, brand, model, date] =
            <[String; 5]>::try_from(answers).map_err(|_| AmError::Other("form incomplete".into()))?;

        let attrs = parse_date(&date).and_then(|purchase_date| {
            ApplianceAttrs::from_fields(Some(description), Some(brand), Some(model), purchase_date)
        });
        let result = attrs.and_then(|attrs| self.storage.add_appliance(house_id, &name, &attrs));

        Ok(Some(match result {
            Ok(id) => vec![
                Event::HouseSelected(house_id),
                Event::Completed(format!("Appliance added with ID: {id}")),
            ],
            Err(e) => vec![failure(&e)],
        }))
    }

    fn view_appliances(&mut self) -> Result<Option<Vec<Event>>> {
        self.heading()?;
        let houses = match self.storage.get_houses() {
            Ok(houses) => houses,
            Err(e) => return Ok(Some(vec![failure(&e)])),
        };
        if !self.list_houses(&houses)? {
            return Ok(Some(vec![Event::Failed {
                message: "No houses yet: add a house first".to_string(),
                recoverable: false,
            }]));
        }
        let Some(house_id) = self.prompt_house()? else {
            return Ok(None);
        };
        let house_id = match house_id {
            Ok(id) => id,
            Err(e) => return Ok(Some(vec![failure(&e)])),
        };

        let appliances = match self.storage.get_appliances_by_house(house_id) {
            Ok(rows) => rows,
            Err(e) => return Ok(Some(vec![failure(&e)])),
        };

        if appliances.is_empty() {
            writeln!(self.out, "{}", style("No appliances for this house").yellow())?;
        } else {
            writeln!(self.out, "{:>4}  {:<24}  Description", "ID", "Name")?;
            for a in &appliances {
                writeln!(
                    self.out,
                    "{:>4}  {:<24}  {}",
                    a.id,
                    a.name,
                    a.description.as_deref().unwrap_or("-")
                )?;
            }
        }
        Ok(Some(vec![Event::HouseSelected(house_id), Event::Back]))
    }

    fn add_document(&mut self) -> Result<Option<Vec<Event>>> {
        self.heading()?;
        let Some(raw_id) = self.prompt("Appliance ID")? else {
            return Ok(None);
        };
        let appliance_id = match parse_id("appliance id", &raw_id) {
            Ok(id) => id,
            Err(e) => return Ok(Some(vec![failure(&e)])),
        };

        let mut answers = Vec::with_capacity(6);
        for label in [
            "Manual Path",
            "Video Path",
            "Warranty Images",
            "Notes",
            "Serial Number",
            "Generate QR code? [y/N]",
        ] {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            answers.push(answer);
        }
        let [manual, video, warranty, notes, serial, with_qr] =
            <[String; 6]>::try_from(answers).map_err(|_| AmError::Other("form incomplete".into()))?;

        let doc = NewDocument {
            manual_path: Some(manual),
            video_path: Some(video),
            warranty_images: Some(warranty),
            notes: Some(notes),
            serial_number: Some(serial),
            qr_code_path: None,
        };
        let result = if with_qr.trim().eq_ignore_ascii_case("y") {
            self.storage
                .add_document_with_identifier(appliance_id, &doc)
                .map(|(id, _)| id)
        } else {
            self.storage.add_document(appliance_id, &doc)
        };

        Ok(Some(match result {
            Ok(id) => vec![Event::Completed(format!("Document added with ID: {id}"))],
            Err(e) => vec![failure(&e)],
        }))
    }

    fn generate_identifier(&mut self) -> Result<Option<Vec<Event>>> {
        self.heading()?;
        let Some(raw_id) = self.prompt("Appliance ID")? else {
            return Ok(None);
        };
        let result = parse_id("appliance id", &raw_id)
            .and_then(|id| self.storage.generate_identifier(id));
        Ok(Some(vec![match result {
            Ok(path) => Event::Completed(format!("QR code saved to {}", path.display())),
            Err(e) => failure(&e),
        }]))
    }

    // === Helpers ===

    fn heading(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", style(self.state.page.title()).bold())?;
        Ok(())
    }

    /// Prints the house list; returns false when there are none.
    fn list_houses(&mut self, houses: &[HouseSummary]) -> Result<bool> {
        for h in houses {
            writeln!(self.out, "  [{}] {}", h.id, h.name)?;
        }
        Ok(!houses.is_empty())
    }

    /// Asks for a house id, defaulting to the last selected house.
    fn prompt_house(&mut self) -> Result<Option<Result<i64>>> {
        let label = match self.state.selected_house {
            Some(id) => format!("House ID [{id}]"),
            None => "House ID".to_string(),
        };
        let Some(raw) = self.prompt(&label)? else {
            return Ok(None);
        };
        Ok(Some(match (raw.trim().is_empty(), self.state.selected_house) {
            (true, Some(id)) => Ok(id),
            _ => parse_id("house id", &raw),
        }))
    }

    /// Writes `label: ` and reads one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show_notice(&mut self) -> Result<()> {
        match &self.state.notice {
            Some(Notice::Success(message)) => {
                writeln!(self.out, "{} {message}", style("[OK]").green().bold())?;
            }
            Some(Notice::Error(message)) => {
                writeln!(self.out, "{} {message}", style("[ERROR]").red().bold())?;
            }
            None => {}
        }
        Ok(())
    }
}

fn failure(err: &AmError) -> Event {
    Event::Failed {
        message: err.to_string(),
        recoverable: err.is_user_recoverable(),
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AmError::invalid(field, format!("'{}' is not a number", raw.trim())))
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AmError::invalid("purchase date", format!("'{raw}' is not YYYY-MM-DD")))
}
