//! Record CLI commands
//!
//! Add, edit, list and remove commitments in the logged-in user's workspace.

use clap::{Args, Subcommand, ValueEnum};

use super::open_workspace;
use crate::config::Settings;
use crate::display::{format_record_details, format_record_page, format_record_rows};
use crate::error::{CommitmentError, CommitmentResult};
use crate::models::{BulkEdit, Record, RecordPatch};
use crate::services::workspace::{page, BulkTarget};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !amount.is_finite() {
        return Err("Amount must be a finite number".into());
    }
    Ok(amount)
}

/// Record and item fields accepted by `add` and `edit`
#[derive(Args, Debug, Default)]
pub struct RecordFields {
    #[arg(long)]
    pub reason_code: Option<String>,
    #[arg(long)]
    pub external_id: Option<String>,
    #[arg(long)]
    pub recipient: Option<String>,
    #[arg(long)]
    pub place: Option<String>,
    #[arg(long)]
    pub account: Option<String>,
    #[arg(long)]
    pub invoice: Option<String>,
    #[arg(long)]
    pub invoice_type: Option<String>,
    /// Invoice date (YYYY-MM-DD)
    #[arg(long)]
    pub invoice_date: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<String>,
    #[arg(long)]
    pub contract: Option<String>,
    #[arg(long)]
    pub payment_code: Option<String>,
    #[arg(long)]
    pub credit_model: Option<String>,
    #[arg(long)]
    pub credit_reference: Option<String>,
    #[arg(long)]
    pub payment_basis: Option<String>,
    #[arg(long)]
    pub budget_user_id: Option<String>,
    #[arg(long)]
    pub program: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub economic_code: Option<String>,
    #[arg(long)]
    pub funding_source: Option<String>,
    #[arg(long)]
    pub function: Option<String>,
    /// Amount in the header currency (e.g. "1500" or "1500.50")
    #[arg(long, value_parser = parse_amount)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub recording_account: Option<String>,
    /// Expected payment date (YYYY-MM-DD)
    #[arg(long)]
    pub expected_payment: Option<String>,
    #[arg(long)]
    pub urgent: Option<bool>,
    #[arg(long)]
    pub posting_account: Option<String>,
}

impl From<RecordFields> for RecordPatch {
    fn from(f: RecordFields) -> Self {
        RecordPatch {
            reason_code: f.reason_code,
            external_id: f.external_id,
            recipient: f.recipient,
            recipient_place: f.place,
            account_number: f.account,
            invoice_number: f.invoice,
            invoice_type: f.invoice_type,
            invoice_date: f.invoice_date,
            due_date: f.due_date,
            contract_number: f.contract,
            payment_code: f.payment_code,
            credit_model: f.credit_model,
            credit_reference_number: f.credit_reference,
            payment_basis: f.payment_basis,
            item_budget_user_id: f.budget_user_id,
            item_program_code: f.program,
            item_project_code: f.project,
            item_economic_classification_code: f.economic_code,
            item_source_of_funding_code: f.funding_source,
            item_function_code: f.function,
            item_amount: f.amount,
            item_recording_account: f.recording_account,
            item_expected_payment_date: f.expected_payment,
            item_urgent_payment: f.urgent,
            item_posting_account: f.posting_account,
        }
    }
}

/// Record subcommands
#[derive(Subcommand)]
pub enum RecordCommands {
    /// Add a new record (pre-filled from the last record when prefill is on)
    Add {
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Edit a record
    Edit {
        /// Sequence number or record ID
        record: String,
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Show record details
    Show {
        /// Sequence number or record ID
        record: String,
    },
    /// List records a page at a time
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,
        /// Only urgent records
        #[arg(long)]
        urgent: bool,
    },
    /// Remove one or more records
    Remove {
        /// Sequence numbers or record IDs
        #[arg(required = true)]
        records: Vec<String>,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// Set fields on many records at once
    BulkEdit {
        /// Sequence numbers or record IDs
        records: Vec<String>,
        /// Apply to every record
        #[arg(long, conflicts_with = "records")]
        all: bool,
        #[arg(long)]
        invoice: Option<String>,
        #[arg(long)]
        invoice_type: Option<String>,
        #[arg(long)]
        invoice_date: Option<String>,
        #[arg(long)]
        due_date: Option<String>,
        #[arg(long)]
        expected_payment: Option<String>,
        #[arg(long)]
        contract: Option<String>,
        #[arg(long)]
        payment_basis: Option<String>,
        /// Mark records urgent (true) or reset the flag (false)
        #[arg(long)]
        urgent: Option<bool>,
    },
    /// Search recipient, invoice number, account number and external ID
    Search {
        query: String,
    },
    /// Show or set the prefill preference
    Prefill {
        state: Option<Toggle>,
    },
    /// Delete the header and every record
    Clear {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

fn indexed<'r>(records: impl IntoIterator<Item = &'r Record>, all: &[Record]) -> Vec<(usize, Record)> {
    records
        .into_iter()
        .map(|record| {
            let index = all.iter().position(|r| r.id == record.id).unwrap_or(0);
            (index, record.clone())
        })
        .collect()
}

pub fn handle_record_command(
    storage: &Storage,
    settings: &Settings,
    cmd: RecordCommands,
) -> CommitmentResult<()> {
    let mut workspace = open_workspace(storage, settings)?;

    match cmd {
        RecordCommands::Add { fields } => {
            let patch: RecordPatch = fields.into();
            let record = workspace.add_record(&patch)?;
            let index = workspace.records().len() - 1;
            println!("Added record #{}", record.sequence_number.unwrap_or(0));
            print!("{}", format_record_details(&record, index));
        }

        RecordCommands::Edit { record, fields } => {
            let patch: RecordPatch = fields.into();
            if patch.is_empty() {
                println!("No changes specified. Use --help to see the record fields.");
                return Ok(());
            }
            let id = workspace.resolve(&record)?;
            let updated = workspace.update_record(id, &patch)?;
            println!("Updated record {}", updated.id);
        }

        RecordCommands::Show { record } => {
            let id = workspace.resolve(&record)?;
            let found = workspace.get(id)?;
            let index = workspace
                .records()
                .iter()
                .position(|r| r.id == id)
                .unwrap_or(0);
            print!("{}", format_record_details(found, index));
        }

        RecordCommands::List {
            page: number,
            page_size,
            urgent,
        } => {
            let all = workspace.records();
            let rows = indexed(all.iter().filter(|r| !urgent || r.item.urgent_payment), all);
            let size = page_size.unwrap_or(settings.page_size);
            print!(
                "{}",
                format_record_page(&page(&rows, number, size), &workspace.header().currency_code)
            );
        }

        RecordCommands::Remove { records, force } => {
            let ids = records
                .iter()
                .map(|r| workspace.resolve(r))
                .collect::<CommitmentResult<Vec<_>>>()?;

            if !force {
                println!("This will remove {} record(s).", ids.len());
                println!("To proceed, run again with --force flag:");
                println!("  commitments record remove {} --force", records.join(" "));
                return Ok(());
            }

            let removed = workspace.remove_records(&ids)?;
            println!("Removed {} record(s).", removed);
            if removed > 0 {
                println!("Run 'commitments sequence check' to review numbering.");
            }
        }

        RecordCommands::BulkEdit {
            records,
            all,
            invoice,
            invoice_type,
            invoice_date,
            due_date,
            expected_payment,
            contract,
            payment_basis,
            urgent,
        } => {
            let target = if all {
                BulkTarget::All
            } else if records.is_empty() {
                return Err(CommitmentError::InvalidInput(
                    "Name the records to edit or pass --all".into(),
                ));
            } else {
                BulkTarget::Ids(
                    records
                        .iter()
                        .map(|r| workspace.resolve(r))
                        .collect::<CommitmentResult<Vec<_>>>()?,
                )
            };

            let edit = BulkEdit::new(
                invoice,
                invoice_type,
                invoice_date,
                due_date,
                expected_payment,
                contract,
                payment_basis,
                urgent,
            );
            let changed = workspace.bulk_edit(&target, &edit)?;
            println!(
                "Updated {} record(s): {}",
                changed,
                edit.field_names().join(", ")
            );
        }

        RecordCommands::Search { query } => {
            let all = workspace.records();
            let rows = indexed(workspace.search(&query), all);
            print!("{}", format_record_rows(&rows, &workspace.header().currency_code));
            if !rows.is_empty() {
                println!("\n{} match(es)", rows.len());
            }
        }

        RecordCommands::Prefill { state } => {
            if let Some(state) = state {
                workspace.set_prefill(state == Toggle::On)?;
            }
            println!(
                "Prefill is {}",
                if workspace.prefill_enabled() { "on" } else { "off" }
            );
        }

        RecordCommands::Clear { force } => {
            if !force {
                println!(
                    "WARNING: This will delete the header and all {} record(s)!",
                    workspace.records().len()
                );
                println!("To proceed, run again with --force flag:");
                println!("  commitments record clear --force");
                return Ok(());
            }
            workspace.clear_all()?;
            println!("Workspace cleared.");
        }
    }

    Ok(())
}
