//! Command line interface

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::capture::{load_burp_xml, Transaction, TxnId};
use crate::config::{save_export_path, Config, ExportKey};
use crate::filter::FacetKind;
use crate::http::offset::{parse_cursor, resolve_offset};
use crate::http::DecodedMessage;
use crate::session::{Session, Side};
use crate::util::paths::config_path;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Turn captured HTTP traffic into a malleable C2 listener profile"
)]
pub struct Cli {
    /// Burp Suite XML export ("Save items") to load
    #[arg(short = 'f', long = "file", value_name = "BURP_XML", global = true)]
    pub file: Option<PathBuf>,

    /// Config file to use instead of ~/.profile-maker/config.toml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, default_value_t = false, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the candidate values of every filter facet
    Facets,
    /// List transactions in the filtered view
    List(ListArgs),
    /// Print the decoded request and response of one transaction
    Show {
        /// Transaction id as printed by `list`
        id: usize,
    },
    /// Build a profile from the marked transactions and write it out
    Export(ExportArgs),
    /// Persist default paths in the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set the default listener template
    SetTemplate { path: PathBuf },
    /// Set the default output file
    SetOutput { path: PathBuf },
}

#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Only transactions with this HTTP method
    #[arg(long)]
    pub method: Option<String>,

    /// Only transactions whose URL contains this host
    #[arg(long)]
    pub host: Option<String>,

    /// Only transactions whose mime type contains this value
    #[arg(long)]
    pub mime: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// Accept the URI of this transaction (repeatable)
    #[arg(long = "uri", value_name = "ID")]
    pub uris: Vec<usize>,

    /// Accept the URI of every transaction in the filtered view
    #[arg(long, default_value_t = false)]
    pub uris_from_view: bool,

    /// Transaction whose request becomes the profile's request
    #[arg(long, value_name = "ID")]
    pub request: Option<usize>,

    /// Byte offset in the request body where beacon data is inserted
    #[arg(long, requires = "request", conflicts_with = "request_cursor")]
    pub request_offset: Option<usize>,

    /// Request insertion point as ROW,COL in a panel of --panel-width cells
    #[arg(long, requires = "request", value_parser = parse_cursor)]
    pub request_cursor: Option<(usize, usize)>,

    /// Transaction whose response becomes the profile's response
    #[arg(long, value_name = "ID")]
    pub response: Option<usize>,

    /// Byte offset in the response body where beacon data is inserted
    #[arg(long, requires = "response", conflicts_with = "response_cursor")]
    pub response_offset: Option<usize>,

    /// Response insertion point as ROW,COL in a panel of --panel-width cells
    #[arg(long, requires = "response", value_parser = parse_cursor)]
    pub response_cursor: Option<(usize, usize)>,

    /// Transaction whose response body is served when there is no tasking
    #[arg(long, value_name = "ID")]
    pub blank: Option<usize>,

    /// Panel width used to resolve --request-cursor/--response-cursor
    #[arg(long)]
    pub panel_width: Option<usize>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Only list marked transactions and those with an accepted URI
    #[arg(long, default_value_t = false)]
    pub selected: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Listener template to merge into
    #[arg(short, long, value_name = "TEMPLATE_JSON")]
    pub template: Option<PathBuf>,

    /// File to write the profile to (overwritten)
    #[arg(short, long, value_name = "OUTPUT_JSON")]
    pub output: Option<PathBuf>,
}

impl FilterArgs {
    fn apply(&self, session: &mut Session) {
        let facets = [
            (FacetKind::Method, &self.method),
            (FacetKind::Host, &self.host),
            (FacetKind::Mime, &self.mime),
        ];
        for (kind, value) in facets {
            if let Some(value) = value {
                session.set_facet(kind, value.clone());
            }
        }
    }
}

impl SelectionArgs {
    fn apply(&self, session: &mut Session, default_width: usize) -> Result<()> {
        let width = self.panel_width.unwrap_or(default_width);
        let offset = |absolute: Option<usize>, cursor: Option<(usize, usize)>| {
            absolute
                .or_else(|| cursor.map(|(row, column)| resolve_offset(width, row, column)))
                .unwrap_or(0)
        };

        for id in &self.uris {
            session.accept_uri(TxnId(*id))?;
        }
        if self.uris_from_view {
            let ids: Vec<TxnId> = session.current_view().iter().map(|t| t.id).collect();
            for id in ids {
                session.accept_uri(id)?;
            }
        }
        if let Some(id) = self.request {
            session.set_main_request(TxnId(id), offset(self.request_offset, self.request_cursor))?;
        }
        if let Some(id) = self.response {
            session
                .set_main_response(TxnId(id), offset(self.response_offset, self.response_cursor))?;
        }
        if let Some(id) = self.blank {
            session.set_blank_response(TxnId(id))?;
        }
        Ok(())
    }
}

fn load_session(file: Option<&PathBuf>) -> Result<Session> {
    let Some(file) = file else {
        bail!("Provide the Burp XML export with -f <BURP_XML>");
    };
    let records = load_burp_xml(file)
        .with_context(|| format!("Failed to load capture {}", file.display()))?;
    Ok(Session::from_records(records))
}

fn role_tags(session: &Session, txn: &Transaction) -> String {
    let selection = session.selection();
    let mut tags = Vec::new();
    if selection.accepts_uri(&txn.c2_uri()) {
        tags.push("uri");
    }
    if selection.main_request().is_some_and(|m| m.id == txn.id) {
        tags.push("request");
    }
    if selection.main_response().is_some_and(|m| m.id == txn.id) {
        tags.push("response");
    }
    if selection.blank_response() == Some(txn.id) {
        tags.push("blank");
    }
    if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(" "))
    }
}

fn print_message(label: &str, message: &DecodedMessage) {
    println!("--- {} headers ---", label);
    for line in &message.header_lines {
        println!("{}", line);
    }
    println!("--- {} body ({} B) ---", label, message.body.len());
    if message.body.is_empty() {
        println!("[Empty body]");
    } else {
        println!("{}", String::from_utf8_lossy(&message.body));
    }
}

fn run_list(session: &mut Session, args: &ListArgs, config: &Config) -> Result<()> {
    args.filters.apply(session);
    args.selection.apply(session, config.panel_width)?;

    let view = if args.selected {
        session.selected_view()
    } else {
        session.current_view()
    };

    let active: Vec<String> = session
        .filters()
        .active()
        .iter()
        .map(|(kind, value)| format!("{}: {}", kind, value))
        .collect();
    if !active.is_empty() {
        println!("Filters applied: {}", active.join(", "));
    }

    for txn in &view {
        println!(
            "{:>5}  {:>8}  {} {}{}",
            txn.id,
            txn.method,
            txn.url,
            txn.mime,
            role_tags(session, txn)
        );
    }
    println!(
        "{} of {} transactions | accepted URIs: {}",
        view.len(),
        session.store().len(),
        session.selection().accepted_uris().len()
    );
    Ok(())
}

fn run_show(session: &Session, id: usize) -> Result<()> {
    let id = TxnId(id);
    let txn = session.get(id)?;
    println!("#{} {} {} ({})", txn.id, txn.method, txn.url, txn.mime);
    println!("URI: {}", txn.c2_uri());
    print_message("request", &session.decode(id, Side::Request)?);
    print_message("response", &session.decode(id, Side::Response)?);
    Ok(())
}

fn run_export(session: &mut Session, args: &ExportArgs, config: &Config) -> Result<()> {
    args.filters.apply(session);
    args.selection.apply(session, config.panel_width)?;

    let template = args.template.as_ref().unwrap_or(&config.template_path);
    let output = args.output.as_ref().unwrap_or(&config.output_path);

    let summary = session.export(template, output)?;
    if summary.fields.is_empty() {
        println!(
            "Nothing selected; wrote template unchanged to {} ({} B)",
            summary.output.display(),
            summary.bytes_written
        );
    } else {
        println!(
            "Wrote {} ({} B): {}",
            summary.output.display(),
            summary.bytes_written,
            summary.fields.join(", ")
        );
    }
    Ok(())
}

fn run_config(cli: &Cli, action: &ConfigCommand) -> Result<()> {
    let file = cli.config.clone().unwrap_or_else(config_path);
    let (key, path) = match action {
        ConfigCommand::SetTemplate { path } => (ExportKey::Template, path),
        ConfigCommand::SetOutput { path } => (ExportKey::Output, path),
    };
    save_export_path(&file, key, path)
        .with_context(|| format!("Failed to update {}", file.display()))?;
    println!("Set {} = {} in {}", key, path.display(), file.display());
    Ok(())
}

/// Execute a parsed command line.
pub fn run(cli: Cli, config: Config) -> Result<()> {
    match &cli.command {
        Command::Config { action } => run_config(&cli, action),
        Command::Facets => {
            let session = load_session(cli.file.as_ref())?;
            for facet in session.filters().facets() {
                println!("{}: {}", facet.name(), facet.values.join(", "));
            }
            Ok(())
        }
        Command::List(args) => {
            let mut session = load_session(cli.file.as_ref())?;
            run_list(&mut session, args, &config)
        }
        Command::Show { id } => {
            let session = load_session(cli.file.as_ref())?;
            run_show(&session, *id)
        }
        Command::Export(args) => {
            let mut session = load_session(cli.file.as_ref())?;
            run_export(&mut session, args, &config)
        }
    }
}
